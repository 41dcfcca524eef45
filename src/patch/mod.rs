mod format;
mod parse;

pub use format::{patches_to_text, PatchFormatter};
pub use parse::{patches_from_text, ParsePatchError};

use crate::diff::solve::{find_sub, rfind_sub};
use crate::diff::{self, cleanup_efficiency, cleanup_semantic, original_text, Diff, Op};
use crate::settings::Settings;
use crate::utils::char_len;

/// A self-contained replacement: an edit script plus enough surrounding
/// context to locate itself in a drifted copy of the original text.
///
/// `start1`/`length1` cover the affected characters of the original
/// text, `start2`/`length2` the affected characters of the modified
/// text. Positions are 0-based and counted in characters.
///
/// The `Display` impl renders the wire format parsed by
/// [`patches_from_text`](crate::patches_from_text).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub diffs: Vec<Diff>,
    pub start1: usize,
    pub start2: usize,
    pub length1: usize,
    pub length2: usize,
}

/// Compute the patches turning `original` into `modified`.
///
/// ```
/// use mend::{apply, make_patches, Settings};
///
/// let settings = Settings::default();
/// let patches = make_patches(&settings, "The cat sat.", "The cat spat.");
/// let (patched, results) = apply(&settings, &patches, "The cat sat?");
/// assert_eq!(patched, "The cat spat?");
/// assert!(results.iter().all(|&ok| ok));
/// ```
pub fn make_patches(settings: &Settings, original: &str, modified: &str) -> Vec<Patch> {
    let mut diffs = diff::diff(settings, original, modified, true);
    if diffs.len() > 2 {
        cleanup_semantic(&mut diffs);
        cleanup_efficiency(settings, &mut diffs);
    }
    make_patches_with_base(settings, original, &diffs)
}

/// Compute patches from an existing script; the original text is
/// reconstructed from the script itself.
pub fn make_patches_from_diffs(settings: &Settings, diffs: &[Diff]) -> Vec<Patch> {
    make_patches_with_base(settings, &original_text(diffs), diffs)
}

/// Compute patches from a script against the original text it was
/// computed from.
pub fn make_patches_with_base(settings: &Settings, base: &str, diffs: &[Diff]) -> Vec<Patch> {
    if diffs.is_empty() {
        return Vec::new();
    }

    let margin = settings.patch_margin;
    let mut patches = Vec::new();
    let mut patch = Patch::default();
    // Character counts into the original and modified texts.
    let mut char_count1 = 0usize;
    let mut char_count2 = 0usize;

    // Each patch's context comes from the text as it stands *before*
    // that patch applies, so the base is advanced patch by patch rather
    // than taken from `base` throughout.
    let mut prepatch: Vec<char> = base.chars().collect();
    let mut postpatch: Vec<char> = prepatch.clone();

    for (x, d) in diffs.iter().enumerate() {
        let dlen = char_len(&d.text);
        if patch.diffs.is_empty() && d.op != Op::Equal {
            // A new patch starts here.
            patch.start1 = char_count1;
            patch.start2 = char_count2;
        }

        match d.op {
            Op::Insert => {
                patch.diffs.push(d.clone());
                patch.length2 += dlen;
                postpatch.splice(char_count2..char_count2, d.text.chars());
            }
            Op::Delete => {
                patch.length1 += dlen;
                patch.diffs.push(d.clone());
                postpatch.drain(char_count2..char_count2 + dlen);
            }
            Op::Equal => {
                if dlen <= 2 * margin && !patch.diffs.is_empty() && x != diffs.len() - 1 {
                    // Small equality inside a patch.
                    patch.diffs.push(d.clone());
                    patch.length1 += dlen;
                    patch.length2 += dlen;
                }
                if dlen >= 2 * margin && !patch.diffs.is_empty() {
                    // Time for a new patch.
                    add_context(settings, &mut patch, &prepatch);
                    patches.push(std::mem::take(&mut patch));
                    prepatch = postpatch.clone();
                    char_count1 = char_count2;
                }
            }
        }

        if d.op != Op::Insert {
            char_count1 += dlen;
        }
        if d.op != Op::Delete {
            char_count2 += dlen;
        }
    }

    if !patch.diffs.is_empty() {
        add_context(settings, &mut patch, &prepatch);
        patches.push(patch);
    }

    patches
}

/// Grow the context around `patch` until the pattern it describes is
/// unique in `text` (or the pattern hits the bitap width cap), then add
/// one more margin of context on each side.
pub(crate) fn add_context(settings: &Settings, patch: &mut Patch, text: &[char]) {
    if text.is_empty() {
        return;
    }

    let margin = settings.patch_margin;
    let mut pattern = &text[patch.start2..patch.start2 + patch.length1];
    let mut padding = 0;

    while find_sub(text, pattern, 0) != rfind_sub(text, pattern, text.len())
        && settings.match_max_bits > 2 * margin
        && pattern.len() < settings.match_max_bits - 2 * margin
    {
        padding += margin;
        let start = patch.start2.saturating_sub(padding);
        let end = (patch.start2 + patch.length1 + padding).min(text.len());
        pattern = &text[start..end];
    }
    // One extra chunk of context for good measure.
    padding += margin;

    let prefix = &text[patch.start2.saturating_sub(padding)..patch.start2];
    if !prefix.is_empty() {
        patch
            .diffs
            .insert(0, Diff::equal(prefix.iter().collect::<String>()));
    }
    let suffix_end = (patch.start2 + patch.length1 + padding).min(text.len());
    let suffix = &text[patch.start2 + patch.length1..suffix_end];
    if !suffix.is_empty() {
        patch
            .diffs
            .push(Diff::equal(suffix.iter().collect::<String>()));
    }

    patch.start1 -= prefix.len();
    patch.start2 -= prefix.len();
    patch.length1 += prefix.len() + suffix.len();
    patch.length2 += prefix.len() + suffix.len();
}
