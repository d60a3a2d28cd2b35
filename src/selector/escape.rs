use std::fmt::Write;

/// Escape a string for use as a CSS identifier, following the CSSOM `CSS.escape()` rules.
pub fn css_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let first = value.chars().next();
    let single_char = value.chars().nth(1).is_none();

    for (i, c) in value.chars().enumerate() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1F}' | '\u{7F}' => push_hex(&mut out, c),
            '0'..='9' if i == 0 => push_hex(&mut out, c),
            '0'..='9' if i == 1 && first == Some('-') => push_hex(&mut out, c),
            '-' if i == 0 && single_char => out.push_str("\\-"),
            c if (c as u32) >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

fn push_hex(out: &mut String, c: char) {
    // writing into a String cannot fail
    let _ = write!(out, "\\{:x} ", c as u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers_unchanged() {
        assert_eq!(css_escape("main-nav"), "main-nav");
        assert_eq!(css_escape("_private"), "_private");
        assert_eq!(css_escape("café"), "café");
    }

    #[test]
    fn test_leading_digit() {
        assert_eq!(css_escape("1a"), "\\31 a");
        assert_eq!(css_escape("-1a"), "-\\31 a");
        assert_eq!(css_escape("a1"), "a1");
    }

    #[test]
    fn test_lone_hyphen() {
        assert_eq!(css_escape("-"), "\\-");
        assert_eq!(css_escape("--"), "--");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(css_escape("a.b"), "a\\.b");
        assert_eq!(css_escape("a b"), "a\\ b");
        assert_eq!(css_escape("x:y"), "x\\:y");
        assert_eq!(css_escape("#id"), "\\#id");
    }

    #[test]
    fn test_control_and_null() {
        assert_eq!(css_escape("a\u{0}b"), "a\u{FFFD}b");
        assert_eq!(css_escape("a\u{7}"), "a\\7 ");
        assert_eq!(css_escape("\u{7f}"), "\\7f ");
    }
}
