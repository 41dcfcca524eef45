//! Common utilities

/// Iterator over the lines of a string, including the `\n` character.
pub struct LineIter<'a>(&'a str);

impl<'a> LineIter<'a> {
    pub fn new(text: &'a str) -> Self {
        Self(text)
    }
}

impl<'a> Iterator for LineIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None;
        }

        let end = if let Some(idx) = self.0.find('\n') {
            idx + 1
        } else {
            self.0.len()
        };

        let (line, remaining) = self.0.split_at(end);
        self.0 = remaining;
        Some(line)
    }
}

/// Number of characters (Unicode scalar values) in `s`. Every public
/// length and position in this crate counts characters, never bytes.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the character at `char_idx`, or the string length when
/// `char_idx` is past the end.
pub(crate) fn byte_of(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(byte, _)| byte)
}

/// Slice `s` from a character position to the end.
pub(crate) fn char_slice_from(s: &str, start: usize) -> &str {
    &s[byte_of(s, start)..]
}

/// Slice `s` from the start up to a character position.
pub(crate) fn char_slice_to(s: &str, end: usize) -> &str {
    &s[..byte_of(s, end)]
}

pub(crate) fn is_alphanumeric(c: char) -> bool {
    c.is_alphanumeric()
}

pub(crate) fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Only CR and LF count as line-break controls for boundary scoring.
pub(crate) fn is_linebreak(c: char) -> bool {
    c == '\n' || c == '\r'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_iter_keeps_newlines() {
        let lines: Vec<_> = LineIter::new("a\nbb\n\nc").collect();
        assert_eq!(lines, ["a\n", "bb\n", "\n", "c"]);
        assert_eq!(LineIter::new("").count(), 0);
    }

    #[test]
    fn char_slicing_is_character_based() {
        let s = "a\u{fb01}b";
        assert_eq!(char_len(s), 3);
        assert_eq!(char_slice_from(s, 2), "b");
        assert_eq!(char_slice_from(s, 9), "");
        assert_eq!(char_slice_to(s, 1), "a");
        assert_eq!(char_slice_to(s, 2), "a\u{fb01}");
    }
}
