use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to truncated titles.
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Fit `s` into `max_width` terminal columns.
///
/// Strings that already fit are returned borrowed. Longer strings are cut and
/// get "..." appended, except when `max_width` is too narrow to hold a
/// character plus the ellipsis, in which case as many characters as fit are
/// returned without one.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    if max_width <= ELLIPSIS_WIDTH {
        let end = prefix_end(s, max_width);
        return Cow::Owned(s[..end].to_string());
    }

    let end = prefix_end(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
}

/// Byte index just past the longest prefix of `s` no wider than `budget`.
fn prefix_end(s: &str, budget: usize) -> usize {
    let mut width = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        end = idx + c.len_utf8();
    }
    end
}

/// Make a server-supplied title safe to draw on a single terminal line.
///
/// Removes ANSI CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`)
/// sequences, a bare ESC, and every other control character. Tabs and line
/// breaks become spaces so one todo never spans several rows.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c.is_control()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameter and intermediate bytes until the final byte.
                    for n in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&n) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(n) = chars.next() {
                        if n == '\x07' {
                            break;
                        }
                        if n == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' | '\n' | '\r' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_is_borrowed() {
        assert!(matches!(truncate_to_width("Short", 10), Cow::Borrowed("Short")));
        assert_eq!(truncate_to_width("", 0), "");
    }

    #[test]
    fn test_ascii_truncation() {
        // target 8 - 3 = 5 columns of text
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_cjk_truncation() {
        // Each CJK char is 2 columns; 7 - 3 leaves room for two of them
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
        assert_eq!(truncate_to_width("你好世界", 5), "你...");
        assert_eq!(truncate_to_width("你好", 4), "你好");
    }

    #[test]
    fn test_narrow_widths_skip_ellipsis() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test!", 1), "T");
        assert_eq!(truncate_to_width("Test!", 3), "Tes");
        assert_eq!(truncate_to_width("你好", 1), "");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("todo"), 4);
        assert_eq!(display_width("你好"), 4);
    }

    #[test]
    fn test_sanitize_clean_is_borrowed() {
        assert!(matches!(sanitize_for_display("buy milk"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_sanitize_strips_csi_and_osc() {
        assert_eq!(sanitize_for_display("a\x1b[1;31mb\x1b[0m"), "ab");
        assert_eq!(sanitize_for_display("x\x1b]0;title\x07y"), "xy");
        assert_eq!(sanitize_for_display("x\x1b]8;;url\x1b\\y"), "xy");
        assert_eq!(sanitize_for_display("bare\x1besc"), "bareesc");
    }

    #[test]
    fn test_sanitize_flattens_line_breaks() {
        assert_eq!(sanitize_for_display("one\ntwo\tthree\r"), "one two three ");
        assert_eq!(sanitize_for_display("bell\x07\x7f"), "bell");
    }
}
