//! Single-pass escaping of LaTeX-reserved characters in user data.

/// Characters that must be escaped in running text.
const RESERVED: [char; 5] = ['&', '%', '$', '#', '_'];

/// Escapes reserved characters in one pass. A reserved character immediately
/// preceded by a backslash is left untouched, so text that arrives already
/// escaped is not escaped twice.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = '\0';
    for ch in text.chars() {
        if RESERVED.contains(&ch) && prev != '\\' {
            out.push('\\');
        }
        out.push(ch);
        prev = ch;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_every_reserved_character() {
        assert_eq!(escape("A&B"), "A\\&B");
        assert_eq!(escape("50%"), "50\\%");
        assert_eq!(escape("$10"), "\\$10");
        assert_eq!(escape("#1"), "\\#1");
        assert_eq!(escape("snake_case"), "snake\\_case");
    }

    #[test]
    fn test_never_escapes_already_escaped_character() {
        assert_eq!(escape("A\\&B"), "A\\&B");
        assert_eq!(escape("\\%\\$\\#\\_"), "\\%\\$\\#\\_");
    }

    #[test]
    fn test_mixed_escaped_and_raw() {
        assert_eq!(escape("\\& & \\%"), "\\& \\& \\%");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape("Improved throughput by 2.5x"), "Improved throughput by 2.5x");
        assert_eq!(escape(""), "");
    }
}
