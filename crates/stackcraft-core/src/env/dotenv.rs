//! Permissive dotenv parsing
//!
//! Lines that cannot be understood are skipped rather than reported: a stray
//! line in a `.env` file must never hide the rest of the file from discovery.

/// Parse dotenv content into key/value pairs, in file order
///
/// - blank lines and `#` comments are ignored
/// - the first `=` splits key from value
/// - one pair of matching surrounding quotes (`'` or `"`) is stripped from the value
pub fn parse(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }

            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }

            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let parsed = parse("# comment\n\nKEY=value\n   # indented comment\n");
        assert_eq!(parsed, vec![("KEY".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_parse_splits_on_first_equals() {
        let parsed = parse("DATABASE_URL=postgres://u:p@host/db?sslmode=require");
        assert_eq!(parsed[0].1, "postgres://u:p@host/db?sslmode=require");
    }

    #[test]
    fn test_parse_strips_quotes() {
        let parsed = parse("A=\"double\"\nB='single'\nC=\"unbalanced'\nD=\"\"");
        assert_eq!(parsed[0].1, "double");
        assert_eq!(parsed[1].1, "single");
        assert_eq!(parsed[2].1, "\"unbalanced'");
        assert_eq!(parsed[3].1, "");
    }

    #[test]
    fn test_parse_ignores_lines_without_key() {
        let parsed = parse("just text\n=novalue\nOK = yes ");
        assert_eq!(parsed, vec![("OK".to_string(), "yes".to_string())]);
    }

    #[test]
    fn test_parse_takes_dollar_references_literally() {
        let parsed = parse("HOST=db\nURL=postgres://$HOST/app\nPASS='pa$$word'");
        assert_eq!(parsed[1].1, "postgres://$HOST/app");
        assert_eq!(parsed[2].1, "pa$$word");
    }

    #[test]
    fn test_parse_keeps_empty_values() {
        let parsed = parse("EMPTY=");
        assert_eq!(parsed, vec![("EMPTY".to_string(), String::new())]);
    }
}
