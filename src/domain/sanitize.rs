//! Gist identifier sanitizing

/// Strip everything but ASCII letters, digits and spaces from `gist_id`.
///
/// The result is safe to splice into a GraphQL query string. Works on `char`s,
/// so multibyte input is dropped whole and never splits the ASCII around it.
pub fn sanitize_gist_id(gist_id: &str) -> String {
    gist_id.chars().filter(|c| is_allowed(*c)).collect()
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' '
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("abc123", "abc123")]
    #[case("d5b9800c636dd78defa4f15894d54d29", "d5b9800c636dd78defa4f15894d54d29")]
    #[case("  spaced out  ", "  spaced out  ")]
    #[case("a\tb\nc\r", "abc")]
    #[case("\"}) { viewer { login } }", "  viewer  login  ")]
    #[case("日本語abc🎉def", "abcdef")]
    #[case("öäü-42_x", "42x")]
    fn test_sanitize_gist_id(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_gist_id(input), expected);
    }

    #[test]
    fn test_sanitize_keeps_order_and_allowed_chars_only() {
        let input = "a🙂B\u{0}9 é-Z\u{202e}z";
        let output = sanitize_gist_id(input);

        assert!(output.chars().count() <= input.chars().count());
        assert!(output.chars().all(is_allowed));

        let expected: String = input.chars().filter(|c| is_allowed(*c)).collect();
        assert_eq!(output, expected);
        assert_eq!(output, "aB9 Zz");
    }
}
