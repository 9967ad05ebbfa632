//! Domain entities: gists and gist comments as returned by the GitHub API

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::DomainError;

/// Gist ID that resolves to [`sample_comment`] without touching the network.
pub const SAMPLE_GIST_ID: &str = "42f5f23053ab59ca480f480b8d01e1fd";

const GIST_BASE_URL: &str = "https://gist.github.com/";

/// A gist as returned by `GET /gists/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gist {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
    #[serde(default)]
    pub owner: Option<GistOwner>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single file inside a gist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistFile {
    pub filename: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub raw_url: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistOwner {
    pub login: String,
}

/// Author of a gist comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub avatar_url: String,
    pub login: String,
}

/// A gist comment node from the GraphQL API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub author: Author,
    pub id: String,
    pub author_association: String,
    /// Raw markdown body
    #[serde(rename = "body")]
    pub body_raw: String,
    #[serde(rename = "bodyHTML")]
    pub body_html: String,
    pub body_text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub minimized_reason: Option<String>,
    pub is_minimized: bool,
}

/// The canned comment served for [`SAMPLE_GIST_ID`].
pub fn sample_comment() -> Comment {
    let at = |h, m, s| {
        Utc.with_ymd_and_hms(2023, 5, 28, h, m, s)
            .single()
            .unwrap_or_default()
    };

    Comment {
        author: Author {
            avatar_url: "https://avatars.githubusercontent.com/u/11840938?u=e915b35bd36abfdcbbaaa6fbe5ea0c6e8ee51e70&v=4".into(),
            login: "KEINOS".into(),
        },
        id: "GC_lADOALStqtoAIDQyZjVmMjMwNTNhYjU5Y2E0ODBmNDgwYjhkMDFlMWZkzgBF6l4".into(),
        author_association: "OWNER".into(),
        body_raw: "1st example comment @ 20230528.\r\n\r\n- This line was added by edit.".into(),
        body_html: "<p dir=\"auto\">1st example comment @ 20230528.</p>\n<ul dir=\"auto\">\n<li>This line was added by edit.</li>\n</ul>".into(),
        body_text: "1st example comment @ 20230528.\n\nThis line was added by edit.".into(),
        created_at: at(8, 36, 32),
        published_at: Some(at(8, 36, 32)),
        last_edited_at: Some(at(8, 44, 10)),
        minimized_reason: None,
        is_minimized: false,
    }
}

/// Resolve a gist selector to its ID.
///
/// Plain IDs pass through. Anything containing `/` is treated as a gist URL
/// (absolute, or relative to gist.github.com) and reduced to its last path
/// segment without a `.git` suffix.
pub fn gist_id_from_url(selector: &str) -> Result<String, DomainError> {
    let selector = selector.trim();
    if !selector.contains('/') {
        return if selector.is_empty() {
            Err(DomainError::InvalidGistId(selector.to_string()))
        } else {
            Ok(selector.to_string())
        };
    }

    let invalid = |reason: String| DomainError::InvalidGistUrl {
        url: selector.to_string(),
        reason,
    };

    let url = match Url::parse(selector) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(GIST_BASE_URL)
            .and_then(|base| base.join(selector))
            .map_err(|e| invalid(e.to_string()))?,
        Err(e) => return Err(invalid(e.to_string())),
    };

    let id = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(|s| s.strip_suffix(".git").unwrap_or(s).to_string())
        .unwrap_or_default();

    if id.is_empty() {
        return Err(invalid("no gist ID in path".into()));
    }
    Ok(id)
}
