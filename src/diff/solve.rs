//! Unit-generic solver driver.
//!
//! The same machinery diffs characters and, during line mode, opaque
//! 16-bit line tokens. `Unit` is the seam between the two: it decides
//! whether the line-mode speedup applies at this unit. Everything here
//! borrows `&[C]` slices from the two inputs and only materialises owned
//! runs when a diff entry is produced.

use std::time::Instant;

use crate::diff::{lines, myers, Op};
use crate::settings::Settings;

/// One edit over a sequence of units. The char instantiation converts to
/// and from the public [`Diff`](crate::Diff) at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeqDiff<C> {
    pub op: Op,
    pub text: Vec<C>,
}

impl<C> SeqDiff<C> {
    pub fn new(op: Op, text: Vec<C>) -> Self {
        Self { op, text }
    }

    pub fn equal(text: Vec<C>) -> Self {
        Self::new(Op::Equal, text)
    }

    pub fn delete(text: Vec<C>) -> Self {
        Self::new(Op::Delete, text)
    }

    pub fn insert(text: Vec<C>) -> Self {
        Self::new(Op::Insert, text)
    }
}

/// A sequence unit the solver can diff.
pub(crate) trait Unit: Copy + Eq {
    /// Run the line-mode speedup if it exists at this unit. Only the
    /// character instantiation has one; line tokens diff directly.
    fn line_mode(
        settings: &Settings,
        text1: &[Self],
        text2: &[Self],
        deadline: Option<Instant>,
    ) -> Option<Vec<SeqDiff<Self>>>;
}

impl Unit for u16 {
    fn line_mode(
        _settings: &Settings,
        _text1: &[Self],
        _text2: &[Self],
        _deadline: Option<Instant>,
    ) -> Option<Vec<SeqDiff<Self>>> {
        None
    }
}

impl Unit for char {
    fn line_mode(
        settings: &Settings,
        text1: &[Self],
        text2: &[Self],
        deadline: Option<Instant>,
    ) -> Option<Vec<SeqDiff<Self>>> {
        Some(lines::line_mode(settings, text1, text2, deadline))
    }
}

pub(crate) fn over_deadline(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

pub(crate) fn common_prefix_len<C: PartialEq>(a: &[C], b: &[C]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

pub(crate) fn common_suffix_len<C: PartialEq>(a: &[C], b: &[C]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// First occurrence of `needle` in `hay` at or after `from`.
pub(crate) fn find_sub<C: PartialEq>(hay: &[C], needle: &[C], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(hay.len()));
    }
    if from + needle.len() > hay.len() {
        return None;
    }
    hay[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Last occurrence of `needle` starting at or before `from`.
pub(crate) fn rfind_sub<C: PartialEq>(hay: &[C], needle: &[C], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(hay.len()));
    }
    if needle.len() > hay.len() {
        return None;
    }
    let last = from.min(hay.len() - needle.len());
    (0..=last)
        .rev()
        .find(|&i| &hay[i..i + needle.len()] == needle)
}

/// Diff two sequences. The result satisfies the merge invariants: no two
/// adjacent entries share an op, no equality is empty, and an adjacent
/// delete/insert pair shares no common affix.
pub(crate) fn diff_seq<C: Unit>(
    settings: &Settings,
    text1: &[C],
    text2: &[C],
    check_lines: bool,
    deadline: Option<Instant>,
) -> Vec<SeqDiff<C>> {
    if text1 == text2 {
        if text1.is_empty() {
            return Vec::new();
        }
        return vec![SeqDiff::equal(text1.to_vec())];
    }

    let prefix = common_prefix_len(text1, text2);
    let common_prefix = &text1[..prefix];
    let text1 = &text1[prefix..];
    let text2 = &text2[prefix..];

    let suffix = common_suffix_len(text1, text2);
    let common_suffix = &text1[text1.len() - suffix..];
    let text1 = &text1[..text1.len() - suffix];
    let text2 = &text2[..text2.len() - suffix];

    let mut diffs = compute(settings, text1, text2, check_lines, deadline);

    if !common_prefix.is_empty() {
        diffs.insert(0, SeqDiff::equal(common_prefix.to_vec()));
    }
    if !common_suffix.is_empty() {
        diffs.push(SeqDiff::equal(common_suffix.to_vec()));
    }
    cleanup_merge_seq(&mut diffs);
    diffs
}

/// Diff two sequences that share no common affix.
fn compute<C: Unit>(
    settings: &Settings,
    text1: &[C],
    text2: &[C],
    check_lines: bool,
    deadline: Option<Instant>,
) -> Vec<SeqDiff<C>> {
    if text1.is_empty() {
        return vec![SeqDiff::insert(text2.to_vec())];
    }
    if text2.is_empty() {
        return vec![SeqDiff::delete(text1.to_vec())];
    }

    let text1_longer = text1.len() > text2.len();
    let (long, short) = if text1_longer {
        (text1, text2)
    } else {
        (text2, text1)
    };

    if let Some(i) = find_sub(long, short, 0) {
        // The shorter text sits inside the longer one.
        let op = if text1_longer { Op::Delete } else { Op::Insert };
        return vec![
            SeqDiff::new(op, long[..i].to_vec()),
            SeqDiff::equal(short.to_vec()),
            SeqDiff::new(op, long[i + short.len()..].to_vec()),
        ];
    }

    if short.len() == 1 {
        // Single unit with no containment; it cannot be an equality.
        return vec![
            SeqDiff::delete(text1.to_vec()),
            SeqDiff::insert(text2.to_vec()),
        ];
    }

    if let Some(hm) = half_match(settings, text1, text2) {
        let mut diffs = diff_seq(settings, hm.text1_a, hm.text2_a, check_lines, deadline);
        diffs.push(SeqDiff::equal(hm.common.to_vec()));
        diffs.extend(diff_seq(
            settings,
            hm.text1_b,
            hm.text2_b,
            check_lines,
            deadline,
        ));
        return diffs;
    }

    if check_lines && text1.len() > 100 && text2.len() > 100 {
        if let Some(diffs) = C::line_mode(settings, text1, text2, deadline) {
            return diffs;
        }
    }

    myers::bisect(settings, text1, text2, deadline)
}

/// A split of the two inputs around a shared middle that is at least half
/// as long as the longer input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct HalfMatch<'a, C> {
    pub text1_a: &'a [C],
    pub text1_b: &'a [C],
    pub text2_a: &'a [C],
    pub text2_b: &'a [C],
    pub common: &'a [C],
}

struct Seeded<'a, C> {
    long_a: &'a [C],
    long_b: &'a [C],
    short_a: &'a [C],
    short_b: &'a [C],
    common: &'a [C],
}

/// Look for a shared substring at least half the length of the longer
/// input. Disabled without a deadline: with unlimited time there is no
/// reason to risk a non-minimal diff.
pub(crate) fn half_match<'a, C: Copy + Eq>(
    settings: &Settings,
    text1: &'a [C],
    text2: &'a [C],
) -> Option<HalfMatch<'a, C>> {
    settings.diff_timeout?;

    let text1_longer = text1.len() > text2.len();
    let (long, short) = if text1_longer {
        (text1, text2)
    } else {
        (text2, text1)
    };
    if long.len() < 4 || short.len() * 2 < long.len() {
        return None;
    }

    // Seed from the second quarter, then from the third.
    let hm1 = half_match_seeded(long, short, (long.len() + 3) / 4);
    let hm2 = half_match_seeded(long, short, (long.len() + 1) / 2);
    let hm = match (hm1, hm2) {
        (None, None) => return None,
        (Some(hm), None) => hm,
        (None, Some(hm)) => hm,
        // Both matched; keep the longer middle, ties to the later seed.
        (Some(a), Some(b)) => {
            if a.common.len() > b.common.len() {
                a
            } else {
                b
            }
        }
    };

    Some(if text1_longer {
        HalfMatch {
            text1_a: hm.long_a,
            text1_b: hm.long_b,
            text2_a: hm.short_a,
            text2_b: hm.short_b,
            common: hm.common,
        }
    } else {
        HalfMatch {
            text1_a: hm.short_a,
            text1_b: hm.short_b,
            text2_a: hm.long_a,
            text2_b: hm.long_b,
            common: hm.common,
        }
    })
}

/// Take a quarter-length substring of `long` starting at `i` as a seed,
/// locate each of its occurrences in `short`, and extend symmetrically.
/// Valid only when the best common middle covers half of `long`.
fn half_match_seeded<'a, C: Copy + Eq>(
    long: &'a [C],
    short: &'a [C],
    i: usize,
) -> Option<Seeded<'a, C>> {
    let seed = &long[i..i + long.len() / 4];
    let mut best: Option<Seeded<'a, C>> = None;
    let mut best_common_len = 0;

    let mut at = find_sub(short, seed, 0);
    while let Some(j) = at {
        let prefix_len = common_prefix_len(&long[i..], &short[j..]);
        let suffix_len = common_suffix_len(&long[..i], &short[..j]);
        if best_common_len < suffix_len + prefix_len {
            best_common_len = suffix_len + prefix_len;
            best = Some(Seeded {
                common: &short[j - suffix_len..j + prefix_len],
                long_a: &long[..i - suffix_len],
                long_b: &long[i + prefix_len..],
                short_a: &short[..j - suffix_len],
                short_b: &short[j + prefix_len..],
            });
        }
        at = find_sub(short, seed, j + 1);
    }

    best.filter(|b| b.common.len() * 2 >= long.len())
}

/// Reorder and merge like edit sections, factoring shared affixes out of
/// delete/insert runs into the neighbouring equalities, then slide single
/// edits over equalities they fully overlap. Repeats until stable.
pub(crate) fn cleanup_merge_seq<C: Copy + PartialEq>(diffs: &mut Vec<SeqDiff<C>>) {
    diffs.push(SeqDiff::equal(Vec::new()));
    let mut pointer = 0usize;
    let mut count_delete = 0usize;
    let mut count_insert = 0usize;
    let mut text_delete: Vec<C> = Vec::new();
    let mut text_insert: Vec<C> = Vec::new();

    while pointer < diffs.len() {
        match diffs[pointer].op {
            Op::Insert => {
                count_insert += 1;
                text_insert.extend_from_slice(&diffs[pointer].text);
                pointer += 1;
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.extend_from_slice(&diffs[pointer].text);
                pointer += 1;
            }
            Op::Equal => {
                if count_delete + count_insert > 1 {
                    if count_delete != 0 && count_insert != 0 {
                        let common = common_prefix_len(&text_insert, &text_delete);
                        if common != 0 {
                            let run_start = pointer - count_delete - count_insert;
                            if run_start > 0 && diffs[run_start - 1].op == Op::Equal {
                                diffs[run_start - 1]
                                    .text
                                    .extend_from_slice(&text_insert[..common]);
                            } else {
                                diffs.insert(0, SeqDiff::equal(text_insert[..common].to_vec()));
                                pointer += 1;
                            }
                            text_insert.drain(..common);
                            text_delete.drain(..common);
                        }
                        let common = common_suffix_len(&text_insert, &text_delete);
                        if common != 0 {
                            let mut joined = text_insert[text_insert.len() - common..].to_vec();
                            joined.append(&mut diffs[pointer].text);
                            diffs[pointer].text = joined;
                            text_insert.truncate(text_insert.len() - common);
                            text_delete.truncate(text_delete.len() - common);
                        }
                    }
                    // Replace the run with its merged residue.
                    pointer -= count_delete + count_insert;
                    diffs.drain(pointer..pointer + count_delete + count_insert);
                    if !text_delete.is_empty() {
                        diffs.insert(pointer, SeqDiff::delete(std::mem::take(&mut text_delete)));
                        pointer += 1;
                    }
                    if !text_insert.is_empty() {
                        diffs.insert(pointer, SeqDiff::insert(std::mem::take(&mut text_insert)));
                        pointer += 1;
                    }
                    pointer += 1;
                } else if pointer != 0 && diffs[pointer - 1].op == Op::Equal {
                    // Merge with the previous equality.
                    let mut text = std::mem::take(&mut diffs[pointer].text);
                    diffs[pointer - 1].text.append(&mut text);
                    diffs.remove(pointer);
                } else {
                    pointer += 1;
                }
                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }
    if diffs.last().is_some_and(|d| d.text.is_empty()) {
        diffs.pop();
    }

    // Second pass: slide single edits over an equality they start or end
    // with, eliminating the equality.
    let mut changes = false;
    let mut pointer = 1usize;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            let prev = diffs[pointer - 1].text.clone();
            let next = diffs[pointer + 1].text.clone();
            if diffs[pointer].text.ends_with(&prev) {
                let kept = diffs[pointer].text.len() - prev.len();
                let mut shifted = prev.clone();
                shifted.extend_from_slice(&diffs[pointer].text[..kept]);
                diffs[pointer].text = shifted;
                let mut grown = prev;
                grown.extend_from_slice(&next);
                diffs[pointer + 1].text = grown;
                diffs.remove(pointer - 1);
                changes = true;
            } else if diffs[pointer].text.starts_with(&next) {
                diffs[pointer - 1].text.extend_from_slice(&next);
                let mut shifted = diffs[pointer].text[next.len()..].to_vec();
                shifted.extend_from_slice(&next);
                diffs[pointer].text = shifted;
                diffs.remove(pointer + 1);
                changes = true;
            }
        }
        pointer += 1;
    }
    if changes {
        cleanup_merge_seq(diffs);
    }
}
