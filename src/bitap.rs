//! Fuzzy pattern location based on the bitap algorithm: one bit-parallel
//! row per error level, with a score that weighs both error count and
//! distance from the expected location.

use std::collections::HashMap;

use crate::diff::solve::{find_sub, rfind_sub};
use crate::settings::Settings;

/// Locate the best instance of `pattern` in `text` near `loc`, or `None`
/// when nothing scores within
/// [`match_threshold`](Settings::match_threshold).
///
/// `loc` is clamped to the text. An empty pattern matches at the clamped
/// location; an empty text matches nothing. Patterns wider than
/// [`match_max_bits`](Settings::match_max_bits) exceed the bitap machine
/// word and are unmatchable.
///
/// ```
/// use mend::{match_main, Settings};
///
/// let settings = Settings::default();
/// assert_eq!(match_main(&settings, "abcdefghijk", "fgh", 5), Some(5));
/// assert_eq!(match_main(&settings, "abcdefghijk", "efxhi", 0), Some(4));
/// assert_eq!(match_main(&settings, "", "abc", 0), None);
/// ```
pub fn match_main(settings: &Settings, text: &str, pattern: &str, loc: usize) -> Option<usize> {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    match_chars(settings, &text, &pattern, loc)
}

pub(crate) fn match_chars(
    settings: &Settings,
    text: &[char],
    pattern: &[char],
    loc: usize,
) -> Option<usize> {
    let loc = loc.min(text.len());
    if text == pattern {
        // Shortcut; the scored search does not guarantee this.
        return Some(0);
    }
    if text.is_empty() {
        return None;
    }
    if loc + pattern.len() <= text.len() && &text[loc..loc + pattern.len()] == pattern {
        // Perfect match at the perfect spot, including the empty pattern.
        return Some(loc);
    }
    bitap(settings, text, pattern, loc)
}

/// One bitmask per pattern character; bit `len - 1 - i` marks position
/// `i`, and repeated characters accumulate.
fn alphabet(pattern: &[char]) -> HashMap<char, u64> {
    let mut masks = HashMap::new();
    let len = pattern.len();
    for (i, &c) in pattern.iter().enumerate() {
        *masks.entry(c).or_insert(0) |= 1u64 << (len - i - 1);
    }
    masks
}

/// Score a match with `errors` errors found at `x`: 0.0 is perfect, 1.0
/// is a complete miss. Distance from `loc` is weighed by
/// `match_distance`; a zero distance setting demands the exact location.
fn bitap_score(errors: usize, x: usize, loc: usize, pattern_len: usize, settings: &Settings) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    let proximity = loc.abs_diff(x);
    if settings.match_distance == 0 {
        return if proximity == 0 { accuracy } else { 1.0 };
    }
    accuracy + proximity as f64 / settings.match_distance as f64
}

fn bitap(settings: &Settings, text: &[char], pattern: &[char], loc: usize) -> Option<usize> {
    let pattern_len = pattern.len();
    let text_len = text.len();
    if pattern_len > settings.match_max_bits.min(64) {
        return None;
    }

    let masks = alphabet(pattern);

    // Highest score beyond which we give up, tightened by any nearby
    // exact occurrence before the scan starts.
    let mut score_threshold = settings.match_threshold;
    if let Some(best) = find_sub(text, pattern, loc) {
        score_threshold = bitap_score(0, best, loc, pattern_len, settings).min(score_threshold);
        if let Some(best) = rfind_sub(text, pattern, (loc + pattern_len).min(text_len)) {
            score_threshold = bitap_score(0, best, loc, pattern_len, settings).min(score_threshold);
        }
    }

    let match_mask = 1u64 << (pattern_len - 1);
    let mut best_loc: Option<usize> = None;

    let mut bin_max = pattern_len + text_len;
    let mut last_rd: Vec<u64> = Vec::new();
    for d in 0..pattern_len {
        // Binary search for the widest radius around `loc` that still
        // scores within the threshold at this error level.
        let mut bin_min = 0;
        let mut bin_mid = bin_max;
        while bin_min < bin_mid {
            if bitap_score(d, loc + bin_mid, loc, pattern_len, settings) <= score_threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid;
            }
            bin_mid = (bin_max - bin_min) / 2 + bin_min;
        }
        // This iteration's result caps the next one.
        bin_max = bin_mid;

        let mut start = 1.max(loc as isize - bin_mid as isize + 1) as usize;
        let finish = (loc + bin_mid).min(text_len) + pattern_len;

        let mut rd = vec![0u64; finish + 2];
        rd[finish + 1] = (1u64 << d) - 1;
        let mut j = finish;
        while j >= start {
            let char_match = if text_len < j {
                // Past the end of the text.
                0
            } else {
                masks.get(&text[j - 1]).copied().unwrap_or(0)
            };
            rd[j] = if d == 0 {
                // Exact-match row.
                ((rd[j + 1] << 1) | 1) & char_match
            } else {
                // Fold in substitutions, insertions, and deletions from
                // the previous error level.
                (((rd[j + 1] << 1) | 1) & char_match)
                    | (((last_rd[j + 1] | last_rd[j]) << 1) | 1)
                    | last_rd[j + 1]
            };
            if rd[j] & match_mask != 0 {
                let score = bitap_score(d, j - 1, loc, pattern_len, settings);
                // Almost certainly better than any previous match, but
                // check anyway.
                if score <= score_threshold {
                    score_threshold = score;
                    best_loc = Some(j - 1);
                    if j - 1 > loc {
                        // When passing loc, don't widen the left radius
                        // beyond the current distance from loc.
                        start = 1.max(2 * loc as isize - (j as isize - 1)) as usize;
                    } else {
                        // Already before loc; downhill from here.
                        break;
                    }
                }
            }
            j -= 1;
        }
        if bitap_score(d + 1, loc, loc, pattern_len, settings) > score_threshold {
            // No hope of a better match with more errors.
            break;
        }
        last_rd = rd;
    }
    best_loc
}
