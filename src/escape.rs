//! Character level escaping used for attribute values and arguments.

use std::borrow::Cow;

/// A reversible per-character escaping rule.
///
/// `unescape(escape(c)) == Some(c)` must hold for every mapped character, and
/// the marker must map to itself so a literal marker is representable.
pub trait Escaper {
    /// Replacement written after the marker, `None` when `c` is left as is.
    fn escape(&self, c: char) -> Option<char>;

    /// Original character for a replacement, `None` when `c` is not one.
    fn unescape(&self, c: char) -> Option<char>;

    fn marker(&self) -> char;
}

/// The `|` escaping of the wire format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StdEscaper;

impl Escaper for StdEscaper {
    #[inline]
    fn escape(&self, c: char) -> Option<char> {
        let replacement = match c {
            '\n' => 'n',
            '\r' => 'r',
            // next line
            '\u{0085}' => 'x',
            // line separator
            '\u{2028}' => 'l',
            // paragraph separator
            '\u{2029}' => 'p',
            '|' => '|',
            '\'' => '\'',
            '[' => '[',
            ']' => ']',
            _ => return None,
        };

        Some(replacement)
    }

    #[inline]
    fn unescape(&self, c: char) -> Option<char> {
        let original = match c {
            'n' => '\n',
            'r' => '\r',
            'x' => '\u{0085}',
            'l' => '\u{2028}',
            'p' => '\u{2029}',
            '|' => '|',
            '\'' => '\'',
            '[' => '[',
            ']' => ']',
            _ => return None,
        };

        Some(original)
    }

    #[inline]
    fn marker(&self) -> char {
        '|'
    }
}

// Multi-byte separators shrink when escaped, so the length alone can't tell
// whether anything changed.
fn escaped_len<E: Escaper>(input: &str, escaper: &E) -> (usize, bool) {
    let marker = escaper.marker().len_utf8();
    let mut len = 0;
    let mut changed = false;

    for c in input.chars() {
        match escaper.escape(c) {
            Some(r) => {
                len += marker + r.len_utf8();
                changed = true;
            }
            None => len += c.len_utf8(),
        }
    }

    (len, changed)
}

/// Escape every character the rule maps, in a single pass over a buffer
/// sized up front. Returns the input untouched when nothing needs escaping.
pub fn escape_str<'a, E: Escaper>(input: &'a str, escaper: &E) -> Cow<'a, str> {
    let (len, changed) = escaped_len(input, escaper);
    if !changed {
        return Cow::Borrowed(input);
    }

    let marker = escaper.marker();
    let mut out = String::with_capacity(len);
    for c in input.chars() {
        match escaper.escape(c) {
            Some(r) => {
                out.push(marker);
                out.push(r);
            }
            None => out.push(c),
        }
    }

    debug_assert_eq!(out.len(), len);
    Cow::Owned(out)
}

// Walks the input the way `unescape_str` does and reports the output length
// plus whether any escape sequence was seen.
fn unescaped_len<E: Escaper>(input: &str, escaper: &E) -> (usize, bool) {
    let marker = escaper.marker();
    let mut len = 0;
    let mut changed = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == marker {
            if let Some(original) = chars.peek().and_then(|next| escaper.unescape(*next)) {
                chars.next();
                len += original.len_utf8();
                changed = true;
                continue;
            }
        }

        len += c.len_utf8();
    }

    (len, changed)
}

/// Reverse of [`escape_str`]. A marker that is last in the input, or followed
/// by a character without a mapping, is kept literally.
pub fn unescape_str<'a, E: Escaper>(input: &'a str, escaper: &E) -> Cow<'a, str> {
    let (len, changed) = unescaped_len(input, escaper);
    if !changed {
        return Cow::Borrowed(input);
    }

    let marker = escaper.marker();
    let mut out = String::with_capacity(len);
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == marker {
            if let Some(original) = chars.peek().and_then(|next| escaper.unescape(*next)) {
                chars.next();
                out.push(original);
                continue;
            }
        }

        out.push(c);
    }

    debug_assert_eq!(out.len(), len);
    Cow::Owned(out)
}

/// Byte index of the first `needle` in `input` that is not preceded by the
/// escape marker. The character right after a marker is always skipped.
pub fn index_of<E: Escaper>(input: &str, needle: char, escaper: &E) -> Option<usize> {
    let marker = escaper.marker();
    let mut chars = input.char_indices();

    while let Some((index, c)) = chars.next() {
        if c == marker {
            chars.next();
        } else if c == needle {
            return Some(index);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_all_mapped() {
        let input = "a\nb\rc\u{0085}d\u{2028}e\u{2029}f|g'h[i]";
        assert_eq!(
            escape_str(input, &StdEscaper),
            "a|nb|rc|xd|le|pf||g|'h|[i|]"
        );
    }

    #[test]
    fn escape_borrows_when_clean() {
        let escaped = escape_str("plain text", &StdEscaper);
        assert!(matches!(escaped, Cow::Borrowed("plain text")));

        let unescaped = unescape_str("plain", &StdEscaper);
        assert!(matches!(unescaped, Cow::Borrowed(_)));
    }

    #[test]
    fn unescape_mapped() {
        assert_eq!(
            unescape_str("a|nb|rc|xd|le|pf||g|'h|[i|]", &StdEscaper),
            "a\nb\rc\u{0085}d\u{2028}e\u{2029}f|g'h[i]"
        );
    }

    #[test]
    fn unescape_trailing_marker() {
        assert_eq!(unescape_str("abc|", &StdEscaper), "abc|");
        assert_eq!(unescape_str("|", &StdEscaper), "|");
    }

    #[test]
    fn unescape_unknown_sequence() {
        assert_eq!(unescape_str("a|zb", &StdEscaper), "a|zb");
        assert_eq!(unescape_str("a|z|n", &StdEscaper), "a|z\n");
    }

    #[test]
    fn inverse_over_mapped_set() {
        for c in [
            '\n', '\r', '\u{0085}', '\u{2028}', '\u{2029}', '|', '\'', '[', ']',
        ] {
            let r = StdEscaper.escape(c).unwrap();
            assert_eq!(StdEscaper.unescape(r), Some(c));
        }
        assert_eq!(StdEscaper.escape('|'), Some(StdEscaper.marker()));
    }

    #[test]
    fn multibyte_round_trip() {
        let input = "привет\u{2028}мир 'quoted' [x]";
        let escaped = escape_str(input, &StdEscaper);
        assert_eq!(unescape_str(&escaped, &StdEscaper), input);
    }

    #[test]
    fn index_of_skips_escaped() {
        assert_eq!(index_of("ab|'c'", '\'', &StdEscaper), Some(5));
        assert_eq!(index_of("||'", '\'', &StdEscaper), Some(2));
        assert_eq!(index_of("|'", '\'', &StdEscaper), None);
        assert_eq!(index_of("", '\'', &StdEscaper), None);
    }
}
