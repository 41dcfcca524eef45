//! Line-mode speedup: intern each line as an opaque 16-bit token, diff
//! the token sequences, rehydrate, then re-diff every replacement block
//! character by character.

use std::collections::HashMap;
use std::time::Instant;

use super::cleanup;
use super::solve::{self, SeqDiff};
use super::{from_seq, to_seq, Diff, Op};
use crate::settings::Settings;

/// Distinct-line cap for the first text. The remainder of the token
/// space is reserved for lines that only the second text introduces.
pub(crate) const TEXT1_MAX_LINES: usize = 40_000;
/// Distinct-line cap for the second text; the token is 16 bits wide.
pub(crate) const TEXT2_MAX_LINES: usize = 65_535;

/// Interning table mapping lines to tokens and back. Entry 0 is a
/// sentinel so that tokens start at 1.
pub(crate) struct LineTable<'a> {
    lines: Vec<&'a str>,
    ids: HashMap<&'a str, u16>,
}

impl<'a> LineTable<'a> {
    pub fn new() -> Self {
        Self {
            lines: vec![""],
            ids: HashMap::new(),
        }
    }

    /// Encode `text` as one token per line (terminator `\n`, final line
    /// implicit), deduplicating through the shared table. When the table
    /// reaches `max_lines` entries the rest of `text` collapses into a
    /// single synthesised line, so decoding still rebuilds the full
    /// input.
    pub fn encode(&mut self, text: &'a str, max_lines: usize) -> Vec<u16> {
        let mut encoded = Vec::with_capacity(64);
        let mut offset = 0;
        while offset < text.len() {
            let rest = &text[offset..];
            let mut line = match rest.find('\n') {
                Some(i) => &rest[..i + 1],
                None => rest,
            };
            if self.lines.len() == max_lines {
                line = rest;
            }
            offset += line.len();

            let id = match self.ids.get(line) {
                Some(&id) => id,
                None => {
                    let id = self.lines.len() as u16;
                    self.lines.push(line);
                    self.ids.insert(line, id);
                    id
                }
            };
            encoded.push(id);
        }
        encoded
    }

    /// Rehydrate token diffs back into real text.
    pub fn decode(&self, token_diffs: Vec<SeqDiff<u16>>) -> Vec<Diff> {
        token_diffs
            .into_iter()
            .map(|d| {
                let mut text = String::new();
                for &token in &d.text {
                    text.push_str(self.lines[token as usize]);
                }
                Diff::new(d.op, text)
            })
            .collect()
    }
}

/// Diff line-by-line first, then re-diff each delete/insert block
/// character-wise. Faster than a raw character diff on large inputs, at
/// the cost of minimality.
pub(crate) fn line_mode(
    settings: &Settings,
    text1: &[char],
    text2: &[char],
    deadline: Option<Instant>,
) -> Vec<SeqDiff<char>> {
    let text1: String = text1.iter().collect();
    let text2: String = text2.iter().collect();

    let mut table = LineTable::new();
    let tokens1 = table.encode(&text1, TEXT1_MAX_LINES);
    let tokens2 = table.encode(&text2, TEXT2_MAX_LINES);

    let token_diffs = solve::diff_seq(settings, &tokens1, &tokens2, false, deadline);
    let mut diffs = table.decode(token_diffs);

    // Absorb freak matches such as blank lines.
    cleanup::cleanup_semantic(&mut diffs);

    // Re-diff each replacement block, this time character by character.
    diffs.push(Diff::equal(""));
    let mut pointer = 0usize;
    let mut count_delete = 0usize;
    let mut count_insert = 0usize;
    let mut text_delete = String::new();
    let mut text_insert = String::new();
    while pointer < diffs.len() {
        match diffs[pointer].op {
            Op::Insert => {
                count_insert += 1;
                text_insert.push_str(&diffs[pointer].text);
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.push_str(&diffs[pointer].text);
            }
            Op::Equal => {
                if count_delete >= 1 && count_insert >= 1 {
                    let deleted: Vec<char> = text_delete.chars().collect();
                    let inserted: Vec<char> = text_insert.chars().collect();
                    let sub = from_seq(solve::diff_seq(
                        settings, &deleted, &inserted, false, deadline,
                    ));
                    let start = pointer - count_delete - count_insert;
                    let sub_len = sub.len();
                    diffs.splice(start..pointer, sub);
                    pointer = start + sub_len;
                }
                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
        pointer += 1;
    }
    diffs.pop();

    to_seq(&diffs)
}
