//! `gh gist list` record parsing
//!
//! Each non-interactive `gh gist list` line is tab separated:
//! `<id>\t<description>\t<n> file(s)\t<public|secret>\t<RFC 3339 timestamp>`

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const MIN_FIELDS: usize = 5;

/// One gist as reported by `gh gist list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistInfo {
    pub id: String,
    pub description: String,
    pub files: u32,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

impl GistInfo {
    /// Parse a single tab separated status line.
    ///
    /// Fields beyond the fifth are ignored. Nothing is returned unless every
    /// field validates.
    pub fn parse(line: &str) -> Result<Self, DomainError> {
        if line.trim().is_empty() {
            return Err(DomainError::EmptyInput);
        }

        let chunks: Vec<&str> = line.split('\t').collect();
        if chunks.len() < MIN_FIELDS {
            return Err(DomainError::MalformedRecord {
                fields: chunks.len(),
                line: line.to_string(),
            });
        }

        let files = parse_file_count(chunks[2])?;
        let is_public = parse_visibility(chunks[3])?;
        let updated_at = parse_timestamp(chunks[4])?;

        Ok(Self {
            id: chunks[0].to_string(),
            description: chunks[1].to_string(),
            files,
            is_public,
            updated_at,
        })
    }
}

impl FromStr for GistInfo {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse the whole stdout of `gh gist list`.
///
/// Blank lines are skipped. The first bad line aborts the batch; no partial
/// list is returned.
pub fn parse_gist_list(input: &str) -> Result<Vec<GistInfo>, DomainError> {
    input
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            GistInfo::parse(line).map_err(|e| DomainError::ListParse {
                input: input.to_string(),
                source: Box::new(e),
            })
        })
        .collect()
}

/// `"6 files"` / `"1 file"` -> count
fn parse_file_count(chunk: &str) -> Result<u32, DomainError> {
    let stripped = chunk.strip_suffix("files").unwrap_or(chunk);
    let stripped = stripped.strip_suffix("file").unwrap_or(stripped);
    let stripped = stripped.trim();

    stripped
        .parse::<u32>()
        .map_err(|e| DomainError::field("files", stripped, e))
}

fn parse_visibility(chunk: &str) -> Result<bool, DomainError> {
    match chunk {
        "public" => Ok(true),
        "secret" => Ok(false),
        _ => Err(DomainError::field(
            "visibility",
            chunk,
            "expected \"public\" or \"secret\"",
        )),
    }
}

fn parse_timestamp(chunk: &str) -> Result<DateTime<Utc>, DomainError> {
    if !has_strict_rfc3339_shape(chunk) {
        return Err(DomainError::field(
            "updated_at",
            chunk,
            "expected RFC 3339 timestamp like 2006-01-02T15:04:05Z07:00",
        ));
    }
    DateTime::parse_from_rfc3339(chunk)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DomainError::field("updated_at", chunk, e))
}

/// chrono also takes a space or `t` as separator and a lowercase `z`;
/// only the upper case forms are RFC 3339 proper.
fn has_strict_rfc3339_shape(chunk: &str) -> bool {
    let bytes = chunk.as_bytes();
    if bytes.len() < 20 || bytes[10] != b'T' {
        return false;
    }
    if bytes.ends_with(b"Z") {
        return true;
    }
    match bytes.len().checked_sub(6).map(|start| &bytes[start..]) {
        Some([sign, h1, h2, b':', m1, m2]) => {
            matches!(sign, b'+' | b'-')
                && [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn test_parse_secret_gist_with_multiple_files() {
        let line = "d5b9800c636dd78defa4f15894d54d29\tTitle of gist item2\t6 files\tsecret\t2022-04-16T06:08:46Z";
        let info = GistInfo::parse(line).unwrap();

        assert_eq!(info.id, "d5b9800c636dd78defa4f15894d54d29");
        assert_eq!(info.description, "Title of gist item2");
        assert_eq!(info.files, 6);
        assert!(!info.is_public);
        assert_eq!(
            info.updated_at,
            Utc.with_ymd_and_hms(2022, 4, 16, 6, 8, 46).unwrap()
        );
    }

    #[test]
    fn test_parse_public_gist_with_single_file() {
        let info: GistInfo =
            "e915aa8c01dd438e3ffd79b05f15a4ff\tTitle of gist item3\t1 file\tpublic\t2022-04-18T03:04:38Z"
                .parse()
                .unwrap();

        assert_eq!(info.files, 1);
        assert!(info.is_public);
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let line = "abc\t\t2 files\tpublic\t2022-04-18T03:04:38Z\textra\tmore";
        let info = GistInfo::parse(line).unwrap();

        assert_eq!(info.id, "abc");
        assert_eq!(info.description, "");
        assert_eq!(info.files, 2);
    }

    #[rstest]
    #[case("2022-04-16T06:08:46Z")]
    #[case("2022-04-16T06:08:46.123Z")]
    #[case("2022-04-16T15:08:46+09:00")]
    #[case("2022-04-15T22:08:46-08:00")]
    fn test_parse_accepts_strict_rfc3339(#[case] timestamp: &str) {
        let line = format!("abc\tdesc\t1 file\tpublic\t{timestamp}");
        let info = GistInfo::parse(&line).unwrap();
        assert_eq!(
            info.updated_at.timestamp(),
            Utc.with_ymd_and_hms(2022, 4, 16, 6, 8, 46).unwrap().timestamp()
        );
    }

    #[test]
    fn test_parse_normalizes_offset_to_utc() {
        let line = "abc\tdesc\t1 file\tpublic\t2022-04-18T12:04:38+09:00";
        let info = GistInfo::parse(line).unwrap();

        assert_eq!(
            info.updated_at,
            Utc.with_ymd_and_hms(2022, 4, 18, 3, 4, 38).unwrap()
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t \n")]
    fn test_parse_empty_line_is_rejected(#[case] line: &str) {
        assert!(matches!(GistInfo::parse(line), Err(DomainError::EmptyInput)));
    }

    #[test]
    fn test_parse_too_few_fields_reports_count() {
        let err = GistInfo::parse("d5b9800c\tTitle\t6 files\tsecret").unwrap_err();

        match &err {
            DomainError::MalformedRecord { fields, line } => {
                assert_eq!(*fields, 4);
                assert_eq!(line, "d5b9800c\tTitle\t6 files\tsecret");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("missing number of chunks: 4"));
    }

    #[rstest]
    #[case("d5b9800c\tTitle\tsix files\tsecret\t2022-04-16T06:08:46Z", "files")]
    #[case("d5b9800c\tTitle\t-1 files\tsecret\t2022-04-16T06:08:46Z", "files")]
    #[case("d5b9800c\tTitle\t6 files\tprivate\t2022-04-16T06:08:46Z", "visibility")]
    #[case("d5b9800c\tTitle\t6 files\tPublic\t2022-04-16T06:08:46Z", "visibility")]
    #[case("d5b9800c\tTitle\t6 files\tsecret\t2022-04-16 06:08", "updated_at")]
    #[case("d5b9800c\tTitle\t6 files\tsecret\tyesterday", "updated_at")]
    #[case("d5b9800c\tTitle\t6 files\tsecret\t2022-04-16 06:08:46Z", "updated_at")]
    #[case("d5b9800c\tTitle\t6 files\tsecret\t2022-04-16t06:08:46Z", "updated_at")]
    #[case("d5b9800c\tTitle\t6 files\tsecret\t2022-04-16T06:08:46z", "updated_at")]
    #[case("d5b9800c\tTitle\t6 files\tsecret\t2022-04-16t06:08:46z", "updated_at")]
    #[case("d5b9800c\tTitle\t6 files\tsecret\t2022-04-16T06:08:46+0900", "updated_at")]
    fn test_parse_bad_field_names_the_field(#[case] line: &str, #[case] expected_field: &str) {
        match GistInfo::parse(line) {
            Err(DomainError::FieldParse { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_visibility_error_carries_raw_value() {
        let err = GistInfo::parse("d5b9800c\tTitle\t6 files\tprivate\t2022-04-16T06:08:46Z")
            .unwrap_err();

        match err {
            DomainError::FieldParse { raw, .. } => assert_eq!(raw, "private"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_gist_list_skips_blank_lines() {
        let input = "\
d5b9800c636dd78defa4f15894d54d29\tTitle of gist item2\t6 files\tsecret\t2022-04-16T06:08:46Z

e915aa8c01dd438e3ffd79b05f15a4ff\tTitle of gist item3\t1 file\tpublic\t2022-04-18T03:04:38Z
";
        let list = parse_gist_list(input).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "d5b9800c636dd78defa4f15894d54d29");
        assert_eq!(list[1].id, "e915aa8c01dd438e3ffd79b05f15a4ff");
    }

    #[test]
    fn test_parse_gist_list_empty_input_is_empty_list() {
        assert!(parse_gist_list("").unwrap().is_empty());
        assert!(parse_gist_list("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_gist_list_aborts_on_first_bad_line() {
        let input = "\
d5b9800c636dd78defa4f15894d54d29\tTitle of gist item2\t6 files\tsecret\t2022-04-16T06:08:46Z
broken line
e915aa8c01dd438e3ffd79b05f15a4ff\tTitle of gist item3\t1 file\tpublic\t2022-04-18T03:04:38Z";

        let err = parse_gist_list(input).unwrap_err();
        match &err {
            DomainError::ListParse { source, .. } => {
                assert!(matches!(**source, DomainError::MalformedRecord { fields: 1, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("failed to parse gist info from:"));
    }
}
