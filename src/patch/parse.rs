//! Parse the patch text format

use thiserror::Error;

use super::Patch;
use crate::codec;
use crate::diff::Diff;
use crate::utils::LineIter;

type Result<T, E = ParsePatchError> = std::result::Result<T, E>;

/// Failure modes of [`patches_from_text`]. Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParsePatchError {
    #[error("malformed patch header at line {line}")]
    BadHeader { line: usize },
    #[error("unknown line prefix {sign:?} at line {line}")]
    BadSign { sign: char, line: usize },
    #[error("invalid escape sequence at line {line}")]
    BadEscape { line: usize },
}

struct Parser<'a> {
    lines: std::iter::Peekable<LineIter<'a>>,
    line_no: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: LineIter::new(input).peekable(),
            line_no: 0,
        }
    }

    fn peek(&mut self) -> Option<&'a str> {
        self.lines.peek().copied()
    }

    /// Next line without its terminator, paired with its line number.
    fn next(&mut self) -> Option<(&'a str, usize)> {
        let line = self.lines.next()?;
        self.line_no += 1;
        Some((line.strip_suffix('\n').unwrap_or(line), self.line_no))
    }
}

/// Parse the textual form produced by
/// [`patches_to_text`](crate::patches_to_text) back into a patch list.
///
/// The parser is strict: every header must match
/// `@@ -<s1>[,<l1>] +<s2>[,<l2>] @@` exactly, and body lines must carry a
/// known sign. A `+` inside a body is decoded to a space before percent
/// escapes are resolved.
pub fn patches_from_text(text: &str) -> Result<Vec<Patch>> {
    let mut parser = Parser::new(text);
    let mut patches = Vec::new();
    while parser.peek().is_some() {
        patches.push(patch(&mut parser)?);
    }
    Ok(patches)
}

fn patch(parser: &mut Parser<'_>) -> Result<Patch> {
    let (line, line_no) = parser.next().ok_or(ParsePatchError::BadHeader { line: 0 })?;
    let mut patch = header(line, line_no)?;

    while let Some(line) = parser.peek() {
        if line.starts_with('@') {
            break;
        }
        let (line, line_no) = parser.next().ok_or(ParsePatchError::BadHeader { line: 0 })?;
        let Some(sign) = line.chars().next() else {
            // Blank line, skip it.
            continue;
        };
        let body = codec::decode(&line[sign.len_utf8()..], true)
            .map_err(|_| ParsePatchError::BadEscape { line: line_no })?;
        match sign {
            '-' => patch.diffs.push(Diff::delete(body)),
            '+' => patch.diffs.push(Diff::insert(body)),
            ' ' => patch.diffs.push(Diff::equal(body)),
            sign => return Err(ParsePatchError::BadSign { sign, line: line_no }),
        }
    }

    Ok(patch)
}

fn header(line: &str, line_no: usize) -> Result<Patch> {
    let err = ParsePatchError::BadHeader { line: line_no };

    let rest = line.strip_prefix("@@ -").ok_or(err.clone())?;
    let (start1, rest) = digits(rest).ok_or(err.clone())?;
    let (length1, rest) = coord_length(rest);
    let rest = rest.strip_prefix(" +").ok_or(err.clone())?;
    let (start2, rest) = digits(rest).ok_or(err.clone())?;
    let (length2, rest) = coord_length(rest);
    if rest != " @@" {
        return Err(err);
    }

    let (start1, length1) = coords(start1, length1).ok_or(err.clone())?;
    let (start2, length2) = coords(start2, length2).ok_or(err)?;
    Ok(Patch {
        diffs: Vec::new(),
        start1,
        start2,
        length1,
        length2,
    })
}

/// Split a leading run of ASCII digits off `s`.
fn digits(s: &str) -> Option<(&str, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((&s[..end], &s[end..]))
}

/// The optional `,<digits>` length part of a coordinate. A bare comma is
/// treated as absent.
fn coord_length(s: &str) -> (Option<&str>, &str) {
    match s.strip_prefix(',') {
        Some(rest) => {
            let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            (Some(&rest[..end]), &rest[end..])
        }
        None => (None, s),
    }
}

/// Undo the header printing rules: a missing length means one affected
/// character at a 1-based start, a literal `0` keeps the start as-is,
/// anything else is 1-based with an explicit length.
fn coords(start: &str, length: Option<&str>) -> Option<(usize, usize)> {
    let mut start: usize = start.parse().ok()?;
    let length = match length {
        None | Some("") => {
            start = start.saturating_sub(1);
            1
        }
        Some("0") => 0,
        Some(digits) => {
            start = start.saturating_sub(1);
            digits.parse().ok()?
        }
    };
    Some((start, length))
}
