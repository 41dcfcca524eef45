//! Apply patches to a base image that may have drifted from the text the
//! patches were made against. Each patch is located with the fuzzy
//! matcher; an imperfect match triggers a nested diff so the edits land
//! on equivalent positions.

use crate::bitap::match_chars;
use crate::diff::{
    self, cleanup_semantic_lossless, levenshtein, modified_text, original_text,
    translate_position, Diff, Op,
};
use crate::patch::Patch;
use crate::settings::Settings;
use crate::utils::{char_len, char_slice_from, char_slice_to};

/// Apply `patches` to `base`, tolerating drift. Returns the patched text
/// and one flag per applied patch (patches are split to the bitap width
/// first, so the flags can outnumber the input list). A failed patch
/// records `false` and application carries on; the input list is never
/// mutated.
///
/// ```
/// use mend::{apply, make_patches, Settings};
///
/// let settings = Settings::default();
/// let patches = make_patches(
///     &settings,
///     "The quick brown fox jumps over the lazy dog.",
///     "That quick brown fox jumped over a lazy dog.",
/// );
/// let (patched, results) = apply(
///     &settings,
///     &patches,
///     "The quick red rabbit jumps over the tired tiger.",
/// );
/// assert_eq!(patched, "That quick red rabbit jumped over a tired tiger.");
/// assert_eq!(results, vec![true, true]);
/// ```
pub fn apply(settings: &Settings, patches: &[Patch], base: &str) -> (String, Vec<bool>) {
    if patches.is_empty() {
        return (base.to_string(), Vec::new());
    }

    // Work on a copy so the caller's patches stay untouched.
    let mut patches = patches.to_vec();
    let null_padding = add_padding(settings, &mut patches);
    let pad_len = char_len(&null_padding);
    let mut text: Vec<char> = null_padding
        .chars()
        .chain(base.chars())
        .chain(null_padding.chars())
        .collect();
    split_max(settings, &mut patches);

    // Offset between the expected and actual location of the previous
    // patch. If patches were expected at 10 and 20 but the first was
    // found at 12, the second is looked for at 22.
    let mut delta = 0isize;
    let mut results = Vec::with_capacity(patches.len());
    for patch in &patches {
        let expected_loc = (patch.start2 as isize + delta).max(0) as usize;
        let text1: Vec<char> = original_text(&patch.diffs).chars().collect();
        let max_bits = settings.match_max_bits;

        let mut start_loc;
        let mut end_loc = None;
        if text1.len() > max_bits {
            // Splitting only leaves an oversized pattern for a monster
            // deletion; find its two ends separately.
            start_loc = match_chars(settings, &text, &text1[..max_bits], expected_loc);
            if let Some(found_start) = start_loc {
                end_loc = match_chars(
                    settings,
                    &text,
                    &text1[text1.len() - max_bits..],
                    expected_loc + text1.len() - max_bits,
                );
                match end_loc {
                    Some(found_end) if found_start < found_end => {}
                    // No valid trailing context; drop this patch.
                    _ => start_loc = None,
                }
            }
        } else {
            start_loc = match_chars(settings, &text, &text1, expected_loc);
        }

        let Some(start_loc) = start_loc else {
            results.push(false);
            // Keep later patches from inheriting this patch's shift.
            delta -= patch.length2 as isize - patch.length1 as isize;
            continue;
        };

        delta = start_loc as isize - expected_loc as isize;
        let found: Vec<char> = match end_loc {
            None => text[start_loc..(start_loc + text1.len()).min(text.len())].to_vec(),
            Some(end_loc) => text[start_loc..(end_loc + max_bits).min(text.len())].to_vec(),
        };

        if text1 == found {
            // Perfect match; splice the replacement straight in.
            let replacement: Vec<char> = modified_text(&patch.diffs).chars().collect();
            text.splice(start_loc..start_loc + text1.len(), replacement);
            results.push(true);
            continue;
        }

        // Imperfect match. Diff the pattern against what was actually
        // found and run this patch's edits through the equivalence.
        let pattern: String = text1.iter().collect();
        let found: String = found.iter().collect();
        let mut inner = diff::diff(settings, &pattern, &found, false);
        if text1.len() > max_bits
            && levenshtein(&inner) as f64 / text1.len() as f64 > settings.patch_delete_threshold
        {
            // The end points match but the content is unacceptably bad.
            results.push(false);
            continue;
        }

        cleanup_semantic_lossless(&mut inner);
        let mut index1 = 0usize;
        for d in &patch.diffs {
            let dlen = char_len(&d.text);
            if d.op != Op::Equal {
                let index2 = translate_position(&inner, index1);
                if d.op == Op::Insert {
                    let at = (start_loc + index2).min(text.len());
                    text.splice(at..at, d.text.chars());
                } else {
                    let from = (start_loc + index2).min(text.len());
                    let to = (start_loc + translate_position(&inner, index1 + dlen))
                        .min(text.len());
                    text.drain(from..to.max(from));
                }
            }
            if d.op != Op::Delete {
                index1 += dlen;
            }
        }
        results.push(true);
    }

    // Strip the padding off.
    let end = text.len().saturating_sub(pad_len);
    let patched: String = text[pad_len.min(end)..end].iter().collect();
    (patched, results)
}

/// Prefix and suffix the patch list with a synthesised padding string so
/// that patches at the very edges of the text still have context to
/// match. Returns the padding.
pub(crate) fn add_padding(settings: &Settings, patches: &mut [Patch]) -> String {
    let padding_length = settings.patch_margin;
    let null_padding: String = (1..=padding_length as u8).map(char::from).collect();

    // Bump every patch forward past the padding.
    for patch in patches.iter_mut() {
        patch.start1 += padding_length;
        patch.start2 += padding_length;
    }

    if let Some(patch) = patches.first_mut() {
        if patch.diffs.first().map_or(true, |d| d.op != Op::Equal) {
            patch.diffs.insert(0, Diff::equal(null_padding.as_str()));
            patch.start1 -= padding_length;
            patch.start2 -= padding_length;
            patch.length1 += padding_length;
            patch.length2 += padding_length;
        } else {
            let first_len = char_len(&patch.diffs[0].text);
            if padding_length > first_len {
                // Grow the first equality out into the padding.
                let extra = padding_length - first_len;
                let mut grown = char_slice_from(&null_padding, first_len).to_string();
                grown.push_str(&patch.diffs[0].text);
                patch.diffs[0].text = grown;
                patch.start1 -= extra;
                patch.start2 -= extra;
                patch.length1 += extra;
                patch.length2 += extra;
            }
        }
    }

    if let Some(patch) = patches.last_mut() {
        let n = patch.diffs.len();
        if n == 0 || patch.diffs[n - 1].op != Op::Equal {
            patch.diffs.push(Diff::equal(null_padding.as_str()));
            patch.length1 += padding_length;
            patch.length2 += padding_length;
        } else {
            let last_len = char_len(&patch.diffs[n - 1].text);
            if padding_length > last_len {
                // Grow the last equality out into the padding.
                let extra = padding_length - last_len;
                patch.diffs[n - 1]
                    .text
                    .push_str(char_slice_to(&null_padding, extra));
                patch.length1 += extra;
                patch.length2 += extra;
            }
        }
    }

    null_padding
}

/// Break up any patch whose pattern is wider than the bitap word,
/// carrying a margin of context between the pieces. Oversized deletions
/// are allowed through whole.
pub(crate) fn split_max(settings: &Settings, patches: &mut Vec<Patch>) {
    let patch_size = settings.match_max_bits;
    let margin = settings.patch_margin;
    if patch_size <= 2 * margin {
        return;
    }

    let mut x = 0;
    while x < patches.len() {
        if patches[x].length1 <= patch_size {
            x += 1;
            continue;
        }
        let mut bigpatch = patches.remove(x);
        let mut start1 = bigpatch.start1;
        let mut start2 = bigpatch.start2;
        let mut precontext: Vec<char> = Vec::new();
        let mut bpi = 0;

        while bpi < bigpatch.diffs.len() {
            // Carve off one bite-sized patch.
            let mut patch = Patch {
                start1: start1 - precontext.len(),
                start2: start2 - precontext.len(),
                ..Patch::default()
            };
            let mut empty = true;
            if !precontext.is_empty() {
                patch.length1 = precontext.len();
                patch.length2 = precontext.len();
                patch
                    .diffs
                    .push(Diff::equal(precontext.iter().collect::<String>()));
            }

            while bpi < bigpatch.diffs.len() && patch.length1 < patch_size - margin {
                let diff_op = bigpatch.diffs[bpi].op;
                let diff_len = char_len(&bigpatch.diffs[bpi].text);
                if diff_op == Op::Insert {
                    // Insertions are harmless.
                    patch.length2 += diff_len;
                    start2 += diff_len;
                    patch.diffs.push(bigpatch.diffs[bpi].clone());
                    bpi += 1;
                    empty = false;
                } else if diff_op == Op::Delete
                    && patch.diffs.len() == 1
                    && patch.diffs[0].op == Op::Equal
                    && diff_len > 2 * patch_size
                {
                    // A monster deletion passes through in one chunk.
                    patch.length1 += diff_len;
                    start1 += diff_len;
                    empty = false;
                    patch.diffs.push(bigpatch.diffs[bpi].clone());
                    bpi += 1;
                } else {
                    // Deletion or equality; take as much as fits.
                    let take = diff_len.min(patch_size - patch.length1 - margin);
                    let taken = char_slice_to(&bigpatch.diffs[bpi].text, take).to_string();
                    patch.length1 += take;
                    start1 += take;
                    if diff_op == Op::Equal {
                        patch.length2 += take;
                        start2 += take;
                    } else {
                        empty = false;
                    }
                    patch.diffs.push(Diff::new(diff_op, taken));
                    if take == diff_len {
                        bpi += 1;
                    } else {
                        bigpatch.diffs[bpi].text =
                            char_slice_from(&bigpatch.diffs[bpi].text, take).to_string();
                    }
                }
            }

            // Head context for the next piece.
            let pre: Vec<char> = modified_text(&patch.diffs).chars().collect();
            precontext = pre[pre.len().saturating_sub(margin)..].to_vec();

            // Tail context for this piece.
            let remainder = original_text(&bigpatch.diffs[bpi..]);
            let postcontext = if char_len(&remainder) > margin {
                char_slice_to(&remainder, margin).to_string()
            } else {
                remainder
            };
            if !postcontext.is_empty() {
                let post_len = char_len(&postcontext);
                patch.length1 += post_len;
                patch.length2 += post_len;
                let n = patch.diffs.len();
                if n > 0 && patch.diffs[n - 1].op == Op::Equal {
                    patch.diffs[n - 1].text.push_str(&postcontext);
                } else {
                    patch.diffs.push(Diff::equal(postcontext));
                }
            }

            if !empty {
                patches.insert(x, patch);
                x += 1;
            }
        }
    }
}
