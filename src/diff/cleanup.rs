//! Rewrites that trade minimality for human-meaningful scripts.

use super::{common_overlap, common_suffix, from_seq, solve, to_seq, Diff, Op};
use crate::settings::Settings;
use crate::utils::{
    char_len, char_slice_from, char_slice_to, is_alphanumeric, is_linebreak, is_whitespace,
};

/// Reorder and merge like edit sections, factoring shared affixes out of
/// delete/insert runs and merging adjacent equalities. After this runs,
/// no two adjacent entries share an op, no equality is empty, and an
/// adjacent delete/insert pair shares no common prefix or suffix.
pub fn cleanup_merge(diffs: &mut Vec<Diff>) {
    let mut seq = to_seq(diffs);
    solve::cleanup_merge_seq(&mut seq);
    *diffs = from_seq(seq);
}

/// Reduce the number of edits by eliminating equalities that are smaller
/// than the edit volume on both of their sides, then pull shared overlap
/// out of adjacent delete/insert pairs.
pub fn cleanup_semantic(diffs: &mut Vec<Diff>) {
    if diffs.is_empty() {
        return;
    }

    let mut changes = false;
    // Indices of equalities seen on the way down, so elimination can back
    // up and reconsider earlier entries.
    let mut equalities: Vec<isize> = Vec::new();
    let mut last_equality: Option<String> = None;
    let mut pointer: isize = 0;
    // Edit volume before the current equality.
    let mut length_insertions1 = 0usize;
    let mut length_deletions1 = 0usize;
    // Edit volume after the current equality.
    let mut length_insertions2 = 0usize;
    let mut length_deletions2 = 0usize;

    while (pointer as usize) < diffs.len() {
        let idx = pointer as usize;
        if diffs[idx].op == Op::Equal {
            equalities.push(pointer);
            length_insertions1 = length_insertions2;
            length_deletions1 = length_deletions2;
            length_insertions2 = 0;
            length_deletions2 = 0;
            last_equality = Some(diffs[idx].text.clone());
        } else {
            if diffs[idx].op == Op::Insert {
                length_insertions2 += char_len(&diffs[idx].text);
            } else {
                length_deletions2 += char_len(&diffs[idx].text);
            }
            let eliminate = last_equality.as_ref().is_some_and(|eq| {
                let len = char_len(eq);
                !eq.is_empty()
                    && len <= length_insertions1.max(length_deletions1)
                    && len <= length_insertions2.max(length_deletions2)
            });
            if eliminate {
                let eq_idx = *equalities.last().expect("equality recorded") as usize;
                // Duplicate the equality as a deletion and turn the
                // original into an insertion.
                diffs.insert(
                    eq_idx,
                    Diff::delete(last_equality.take().unwrap_or_default()),
                );
                diffs[eq_idx + 1].op = Op::Insert;
                equalities.pop();
                equalities.pop();
                pointer = equalities.last().copied().unwrap_or(-1);
                length_insertions1 = 0;
                length_deletions1 = 0;
                length_insertions2 = 0;
                length_deletions2 = 0;
                last_equality = None;
                changes = true;
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
    cleanup_semantic_lossless(diffs);

    // Pull overlap between a deletion and the insertion after it into an
    // equality, in whichever direction covers at least half of either
    // edit. The halving comparison runs in floating point so it cannot
    // wrap.
    let mut pointer = 1usize;
    while pointer < diffs.len() {
        if diffs[pointer - 1].op == Op::Delete && diffs[pointer].op == Op::Insert {
            let deletion = diffs[pointer - 1].text.clone();
            let insertion = diffs[pointer].text.clone();
            let deletion_len = char_len(&deletion);
            let insertion_len = char_len(&insertion);
            let overlap_length1 = common_overlap(&deletion, &insertion);
            let overlap_length2 = common_overlap(&insertion, &deletion);
            if overlap_length1 >= overlap_length2 {
                if overlap_length1 as f64 >= deletion_len as f64 / 2.0
                    || overlap_length1 as f64 >= insertion_len as f64 / 2.0
                {
                    diffs.insert(pointer, Diff::equal(char_slice_to(&insertion, overlap_length1)));
                    diffs[pointer - 1].text =
                        char_slice_to(&deletion, deletion_len - overlap_length1).to_string();
                    diffs[pointer + 1].text =
                        char_slice_from(&insertion, overlap_length1).to_string();
                    pointer += 1;
                }
            } else if overlap_length2 as f64 >= deletion_len as f64 / 2.0
                || overlap_length2 as f64 >= insertion_len as f64 / 2.0
            {
                // Reverse overlap; the surrounding edits swap roles.
                diffs.insert(pointer, Diff::equal(char_slice_to(&deletion, overlap_length2)));
                diffs[pointer - 1] =
                    Diff::insert(char_slice_to(&insertion, insertion_len - overlap_length2));
                diffs[pointer + 1] = Diff::delete(char_slice_from(&deletion, overlap_length2));
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
}

/// Shift single edits sandwiched between two equalities onto word, line,
/// sentence, or alphanumeric boundaries. Purely cosmetic; the scripts
/// before and after describe the same transformation.
pub fn cleanup_semantic_lossless(diffs: &mut Vec<Diff>) {
    let mut pointer = 1usize;
    // The first and last entries need no checking.
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            let mut equality1 = diffs[pointer - 1].text.clone();
            let mut edit = diffs[pointer].text.clone();
            let mut equality2 = diffs[pointer + 1].text.clone();

            // Shift the edit as far left as it will go.
            let common_offset = common_suffix(&equality1, &edit);
            if common_offset > 0 {
                let edit_len = char_len(&edit);
                let common_string = char_slice_from(&edit, edit_len - common_offset).to_string();
                equality1 =
                    char_slice_to(&equality1, char_len(&equality1) - common_offset).to_string();
                edit = format!(
                    "{}{}",
                    common_string,
                    char_slice_to(&edit, edit_len - common_offset)
                );
                equality2 = format!("{}{}", common_string, equality2);
            }

            // Step right one character at a time, keeping the best
            // boundary score.
            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score =
                semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
            loop {
                let (Some(e), Some(q)) = (edit.chars().next(), equality2.chars().next()) else {
                    break;
                };
                if e != q {
                    break;
                }
                equality1.push(e);
                edit = format!("{}{}", char_slice_from(&edit, 1), q);
                equality2 = char_slice_from(&equality2, 1).to_string();
                let score = semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
                // >= favours trailing over leading whitespace on edits.
                if score >= best_score {
                    best_score = score;
                    best_equality1 = equality1.clone();
                    best_edit = edit.clone();
                    best_equality2 = equality2.clone();
                }
            }

            if diffs[pointer - 1].text != best_equality1 {
                // An improvement was found.
                if !best_equality1.is_empty() {
                    diffs[pointer - 1].text = best_equality1;
                } else {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                }
                diffs[pointer].text = best_edit;
                if !best_equality2.is_empty() {
                    diffs[pointer + 1].text = best_equality2;
                } else {
                    diffs.remove(pointer + 1);
                    pointer = pointer.saturating_sub(1);
                }
            }
        }
        pointer += 1;
    }
}

/// Score how well the boundary between `one` and `two` lands: 6 for an
/// edge, 5 for a blank line, 4 for any line break, 3 for end of
/// sentence, 2 for whitespace, 1 for non-alphanumeric, else 0.
fn semantic_score(one: &str, two: &str) -> usize {
    let (Some(char1), Some(char2)) = (one.chars().last(), two.chars().next()) else {
        // Edges are the best boundaries.
        return 6;
    };

    let non_alphanumeric1 = !is_alphanumeric(char1);
    let non_alphanumeric2 = !is_alphanumeric(char2);
    let whitespace1 = non_alphanumeric1 && is_whitespace(char1);
    let whitespace2 = non_alphanumeric2 && is_whitespace(char2);
    let line_break1 = whitespace1 && is_linebreak(char1);
    let line_break2 = whitespace2 && is_linebreak(char2);
    let blank_line1 = line_break1 && (one.ends_with("\n\n") || one.ends_with("\n\r\n"));
    let blank_line2 = line_break2
        && (two.starts_with("\n\n")
            || two.starts_with("\n\r\n")
            || two.starts_with("\r\n\n")
            || two.starts_with("\r\n\r\n"));

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alphanumeric1 && !whitespace1 && whitespace2 {
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alphanumeric1 || non_alphanumeric2 {
        1
    } else {
        0
    }
}

/// Eliminate equalities shorter than
/// [`diff_edit_cost`](crate::Settings::diff_edit_cost) that sit between
/// edits on both sides, turning them into a paired delete and insert.
/// Repeats until stable.
pub fn cleanup_efficiency(settings: &Settings, diffs: &mut Vec<Diff>) {
    if diffs.is_empty() {
        return;
    }

    let edit_cost = settings.diff_edit_cost;
    let mut changes = false;
    let mut equalities: Vec<isize> = Vec::new();
    let mut last_equality: Option<String> = None;
    let mut pointer: isize = 0;
    // Edits on either side of the candidate equality.
    let mut pre_ins = false;
    let mut pre_del = false;
    let mut post_ins = false;
    let mut post_del = false;

    while (pointer as usize) < diffs.len() {
        let idx = pointer as usize;
        if diffs[idx].op == Op::Equal {
            if char_len(&diffs[idx].text) < edit_cost && (post_ins || post_del) {
                // Candidate found.
                equalities.push(pointer);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(diffs[idx].text.clone());
            } else {
                // Not a candidate and can never become one.
                equalities.clear();
                last_equality = None;
            }
            post_ins = false;
            post_del = false;
        } else {
            if diffs[idx].op == Op::Delete {
                post_del = true;
            } else {
                post_ins = true;
            }
            // An equality is expendable when edits surround it on all
            // four sides, or on any three sides while it is shorter than
            // half the edit cost.
            let eliminate = last_equality.as_ref().is_some_and(|eq| {
                !eq.is_empty()
                    && ((pre_ins && pre_del && post_ins && post_del)
                        || (char_len(eq) < edit_cost / 2
                            && usize::from(pre_ins)
                                + usize::from(pre_del)
                                + usize::from(post_ins)
                                + usize::from(post_del)
                                == 3))
            });
            if eliminate {
                let eq_idx = *equalities.last().expect("equality recorded") as usize;
                diffs.insert(
                    eq_idx,
                    Diff::delete(last_equality.take().unwrap_or_default()),
                );
                diffs[eq_idx + 1].op = Op::Insert;
                equalities.pop();
                last_equality = None;
                if pre_ins && pre_del {
                    // No changes could affect earlier entries; keep going.
                    post_ins = true;
                    post_del = true;
                    equalities.clear();
                } else {
                    equalities.pop();
                    pointer = equalities.last().copied().unwrap_or(-1);
                    post_ins = false;
                    post_del = false;
                }
                changes = true;
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
}
