use std::fmt::Write as _;
use std::time::Instant;

use thiserror::Error;

use crate::codec;
use crate::settings::Settings;
use crate::utils::char_len;

mod cleanup;
mod lines;
mod myers;
pub(crate) mod solve;

#[cfg(test)]
mod tests;

pub use cleanup::{cleanup_efficiency, cleanup_merge, cleanup_semantic, cleanup_semantic_lossless};

use solve::SeqDiff;

/// The operation a [`Diff`] performs on the old text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Text present only in the old text.
    Delete,
    /// Text present only in the new text.
    Insert,
    /// Text shared by both.
    Equal,
}

/// One entry of an edit script: an operation and the text it covers.
///
/// The text is owned, so scripts stay valid after the inputs they were
/// computed from are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub op: Op,
    pub text: String,
}

impl Diff {
    pub fn new(op: Op, text: impl Into<String>) -> Self {
        Self {
            op,
            text: text.into(),
        }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(Op::Equal, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(Op::Delete, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(Op::Insert, text)
    }
}

pub(crate) fn to_seq(diffs: &[Diff]) -> Vec<SeqDiff<char>> {
    diffs
        .iter()
        .map(|d| SeqDiff::new(d.op, d.text.chars().collect()))
        .collect()
}

pub(crate) fn from_seq(seq: Vec<SeqDiff<char>>) -> Vec<Diff> {
    seq.into_iter()
        .map(|d| Diff::new(d.op, d.text.into_iter().collect::<String>()))
        .collect()
}

/// Compute the edit script transforming `old` into `new`.
///
/// With `check_lines` set, inputs longer than 100 characters are first
/// diffed line-by-line and the changed blocks re-diffed character-wise;
/// faster on large texts, at some cost in minimality. The script always
/// reconstructs both inputs exactly:
///
/// ```
/// use mend::{diff, modified_text, original_text, Settings};
///
/// let settings = Settings::default();
/// let diffs = diff(&settings, "the lazy dog", "the hazy dog", false);
/// assert_eq!(original_text(&diffs), "the lazy dog");
/// assert_eq!(modified_text(&diffs), "the hazy dog");
/// ```
pub fn diff(settings: &Settings, old: &str, new: &str, check_lines: bool) -> Vec<Diff> {
    let deadline = settings.diff_timeout.map(|t| Instant::now() + t);
    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();
    from_seq(solve::diff_seq(settings, &old, &new, check_lines, deadline))
}

/// Number of characters shared at the start of both strings.
pub fn common_prefix(first: &str, second: &str) -> usize {
    first
        .chars()
        .zip(second.chars())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Number of characters shared at the end of both strings.
pub fn common_suffix(first: &str, second: &str) -> usize {
    first
        .chars()
        .rev()
        .zip(second.chars().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Length of the longest suffix of `first` that is a prefix of `second`.
pub fn common_overlap(first: &str, second: &str) -> usize {
    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();
    if first.is_empty() || second.is_empty() {
        return 0;
    }

    // Truncate to the shared window.
    let first: &[char] = if first.len() > second.len() {
        &first[first.len() - second.len()..]
    } else {
        &first
    };
    let second: &[char] = &second[..first.len().min(second.len())];
    let text_length = first.len();
    if first == second {
        return text_length;
    }

    // Grow a candidate overlap one character at a time, jumping ahead by
    // the distance of each failed probe.
    let mut best = 0;
    let mut length = 1;
    loop {
        if length > text_length {
            return best;
        }
        let pattern = &first[text_length - length..];
        let Some(found) = solve::find_sub(second, pattern, 0) else {
            return best;
        };
        length += found;
        if found == 0 || first[text_length - length..] == second[..length] {
            best = length;
            length += 1;
        }
    }
}

/// The old text a script was computed from: all equalities and deletions.
pub fn original_text(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Op::Insert)
        .map(|d| d.text.as_str())
        .collect()
}

/// The new text a script produces: all equalities and insertions.
pub fn modified_text(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Op::Delete)
        .map(|d| d.text.as_str())
        .collect()
}

/// Map a character position in the old text to its equivalent in the new
/// text. A position inside a deleted region maps to the position just
/// before the deleted text.
pub fn translate_position(diffs: &[Diff], loc: usize) -> usize {
    let mut chars1 = 0;
    let mut chars2 = 0;
    let mut last_chars1 = 0;
    let mut last_chars2 = 0;
    let mut overshot: Option<&Diff> = None;
    for d in diffs {
        if d.op != Op::Insert {
            chars1 += char_len(&d.text);
        }
        if d.op != Op::Delete {
            chars2 += char_len(&d.text);
        }
        if chars1 > loc {
            overshot = Some(d);
            break;
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }
    if overshot.is_some_and(|d| d.op == Op::Delete) {
        return last_chars2;
    }
    last_chars2 + (loc - last_chars1)
}

/// Edit distance of a script in characters: paired deletions and
/// insertions count as substitutions.
pub fn levenshtein(diffs: &[Diff]) -> usize {
    let mut total = 0;
    let mut insertions = 0;
    let mut deletions = 0;
    for d in diffs {
        match d.op {
            Op::Insert => insertions += char_len(&d.text),
            Op::Delete => deletions += char_len(&d.text),
            Op::Equal => {
                total += insertions.max(deletions);
                insertions = 0;
                deletions = 0;
            }
        }
    }
    total + insertions.max(deletions)
}

/// Failure modes of [`from_delta`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseDeltaError {
    #[error("invalid count {token:?} at offset {offset}")]
    InvalidCount { token: String, offset: usize },
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },
    #[error("unknown delta operation {op:?} at offset {offset}")]
    UnknownOperation { op: char, offset: usize },
    #[error("delta spans {consumed} characters but the source text has {expected}")]
    LengthMismatch { consumed: usize, expected: usize },
}

/// Crush a script into a compact delta: tab-separated tokens of the form
/// `=N` (keep `N` chars), `-N` (delete `N` chars), and `+text` (insert
/// percent-encoded text).
///
/// ```
/// use mend::{to_delta, Diff};
///
/// let diffs = vec![Diff::equal("jump"), Diff::delete("s"), Diff::insert("ed")];
/// assert_eq!(to_delta(&diffs), "=4\t-1\t+ed");
/// ```
pub fn to_delta(diffs: &[Diff]) -> String {
    let mut out = String::new();
    for (i, d) in diffs.iter().enumerate() {
        if i != 0 {
            out.push('\t');
        }
        match d.op {
            Op::Insert => {
                out.push('+');
                codec::encode_into(&mut out, &d.text);
            }
            Op::Delete => {
                let _ = write!(out, "-{}", char_len(&d.text));
            }
            Op::Equal => {
                let _ = write!(out, "={}", char_len(&d.text));
            }
        }
    }
    out
}

/// Rebuild a full script from the old text and a delta produced by
/// [`to_delta`].
pub fn from_delta(text1: &str, delta: &str) -> Result<Vec<Diff>, ParseDeltaError> {
    let chars: Vec<char> = text1.chars().collect();
    let mut diffs = Vec::new();
    // Cursor into `chars`.
    let mut pointer = 0usize;
    // Byte offset of the current token within `delta`.
    let mut offset = 0usize;

    for token in delta.split('\t') {
        let token_offset = offset;
        offset += token.len() + 1;
        // Blank tokens are ok, from a trailing tab.
        let Some(op) = token.chars().next() else {
            continue;
        };
        let param = &token[op.len_utf8()..];
        match op {
            '+' => {
                // A literal `+` in the payload stays a `+` here, unlike
                // in patch bodies.
                let text = codec::decode(param, false).map_err(|e| {
                    ParseDeltaError::InvalidEscape {
                        offset: token_offset + 1 + e.offset,
                    }
                })?;
                diffs.push(Diff::insert(text));
            }
            '-' | '=' => {
                let n: isize = param.parse().map_err(|_| ParseDeltaError::InvalidCount {
                    token: token.to_string(),
                    offset: token_offset,
                })?;
                if n < 0 {
                    return Err(ParseDeltaError::InvalidCount {
                        token: token.to_string(),
                        offset: token_offset,
                    });
                }
                let n = n as usize;
                if pointer + n > chars.len() {
                    return Err(ParseDeltaError::LengthMismatch {
                        consumed: pointer + n,
                        expected: chars.len(),
                    });
                }
                let text: String = chars[pointer..pointer + n].iter().collect();
                pointer += n;
                if op == '=' {
                    diffs.push(Diff::equal(text));
                } else {
                    diffs.push(Diff::delete(text));
                }
            }
            op => {
                return Err(ParseDeltaError::UnknownOperation {
                    op,
                    offset: token_offset,
                })
            }
        }
    }

    if pointer != chars.len() {
        return Err(ParseDeltaError::LengthMismatch {
            consumed: pointer,
            expected: chars.len(),
        });
    }
    Ok(diffs)
}

/// Render a script as simple HTML, with insertions and deletions tinted.
pub fn pretty_html(diffs: &[Diff]) -> String {
    let mut out = String::new();
    for d in diffs {
        out.push_str(match d.op {
            Op::Insert => "<ins style=\"background:#e6ffe6;\">",
            Op::Delete => "<del style=\"background:#ffe6e6;\">",
            Op::Equal => "<span>",
        });
        for c in d.text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '\n' => out.push_str("&para;<br>"),
                c => out.push(c),
            }
        }
        out.push_str(match d.op {
            Op::Insert => "</ins>",
            Op::Delete => "</del>",
            Op::Equal => "</span>",
        });
    }
    out
}
