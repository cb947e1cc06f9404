//! Identifier quoting and qualified-name parsing.

use thiserror::Error;

/// Errors from parsing qualified attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameParseError {
    #[error("empty name segment in {0:?}")]
    EmptySegment(String),

    #[error("unterminated quoted identifier in {0:?}")]
    UnterminatedQuote(String),
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn is_already_quoted(name: &str) -> bool {
    if name.len() < 2 || !name.starts_with('"') || !name.ends_with('"') {
        return false;
    }
    // Interior quotes must come in escaped pairs.
    let interior = &name[1..name.len() - 1];
    let mut chars = interior.chars();
    while let Some(c) = chars.next() {
        if c == '"' && chars.next() != Some('"') {
            return false;
        }
    }
    true
}

/// Quote an identifier the way the database expects it.
///
/// A correctly quoted name is kept as-is, a plain identifier is upper-cased
/// and quoted, and anything else is quoted with interior quotes escaped.
pub fn quote_name(name: &str) -> String {
    let name = name.trim();
    if is_already_quoted(name) {
        name.to_string()
    } else if is_plain_identifier(name) {
        format!("\"{}\"", name.to_uppercase())
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Parse a dotted qualifier (e.g. `db.schema.table`) into its segments.
///
/// Segments may be quoted, in which case dots inside quotes do not split.
/// The raw segment text is returned; quoting for output is a separate step.
pub fn parse_attribute_path(qualifier: &str) -> Result<Vec<String>, NameParseError> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = qualifier.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                // Doubled quote is an escaped quote inside the segment.
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            '.' if !in_quotes => {
                if current.is_empty() {
                    return Err(NameParseError::EmptySegment(qualifier.to_string()));
                }
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(NameParseError::UnterminatedQuote(qualifier.to_string()));
    }
    if current.is_empty() {
        return Err(NameParseError::EmptySegment(qualifier.to_string()));
    }
    parts.push(current);
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_identifier() {
        assert_eq!(quote_name("col"), "\"COL\"");
        assert_eq!(quote_name("my_col$1"), "\"MY_COL$1\"");
    }

    #[test]
    fn test_quote_already_quoted() {
        assert_eq!(quote_name("\"Mixed Case\""), "\"Mixed Case\"");
        assert_eq!(quote_name("\"has \"\"quotes\"\"\""), "\"has \"\"quotes\"\"\"");
    }

    #[test]
    fn test_quote_special_characters() {
        assert_eq!(quote_name("weird name"), "\"weird name\"");
        assert_eq!(quote_name("a\"b"), "\"a\"\"b\"");
        // A lone quote pair in the middle is not a valid quoted name.
        assert_eq!(quote_name("\"a\"b\""), "\"\"\"a\"\"b\"\"\"");
    }

    #[test]
    fn test_parse_simple_path() {
        assert_eq!(
            parse_attribute_path("db.schema.t").unwrap(),
            vec!["db", "schema", "t"]
        );
        assert_eq!(parse_attribute_path("t").unwrap(), vec!["t"]);
    }

    #[test]
    fn test_parse_quoted_segment() {
        assert_eq!(
            parse_attribute_path("\"my.schema\".t").unwrap(),
            vec!["my.schema", "t"]
        );
    }

    #[test]
    fn test_parse_empty_segment() {
        assert!(matches!(
            parse_attribute_path("a..b"),
            Err(NameParseError::EmptySegment(_))
        ));
        assert!(matches!(
            parse_attribute_path(""),
            Err(NameParseError::EmptySegment(_))
        ));
        assert!(matches!(
            parse_attribute_path("a."),
            Err(NameParseError::EmptySegment(_))
        ));
    }

    #[test]
    fn test_parse_unterminated_quote() {
        assert!(matches!(
            parse_attribute_path("\"abc"),
            Err(NameParseError::UnterminatedQuote(_))
        ));
    }
}
