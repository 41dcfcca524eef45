//! Tools for computing differences between texts and applying them to
//! copies that may have drifted
//!
//! ## Overview
//!
//! This library implements three cooperating cores:
//!
//! * **Diff**: compute a minimal, human-meaningful edit script turning
//!   one string into another, with optional semantic and efficiency
//!   cleanups, a compact delta serialisation, and an HTML renderer.
//! * **Match**: locate a pattern in a text *near* an expected position,
//!   tolerating errors, using a scored bitap search.
//! * **Patch**: package edits with surrounding context so they can be
//!   found and applied even when the target text has changed since the
//!   patch was made.
//!
//! All positions and lengths count characters (Unicode scalar values),
//! never bytes, and every returned value owns its text.
//!
//! ## Computing a diff
//!
//! ```
//! use mend::{diff, Diff, Settings};
//!
//! let settings = Settings::default();
//! let diffs = diff(&settings, "The cat sat.", "The cat spat.", false);
//! assert_eq!(
//!     diffs,
//!     vec![
//!         Diff::equal("The cat s"),
//!         Diff::insert("p"),
//!         Diff::equal("at."),
//!     ],
//! );
//! ```
//!
//! Setting [`Settings::diff_timeout`] to `None` removes the time cap and
//! the half-match speedup, making output fully minimal and
//! deterministic. The cleanup passes ([`cleanup_semantic`],
//! [`cleanup_efficiency`]) rewrite a script to favour human-meaningful
//! or operationally cheap boundaries.
//!
//! ## Making and applying patches
//!
//! Patches carry context (controlled by [`Settings::patch_margin`]) and
//! locate themselves with the fuzzy matcher, so they survive drift in
//! the text they are applied to:
//!
//! ```
//! use mend::{apply, make_patches, patches_from_text, patches_to_text, Settings};
//!
//! let settings = Settings::default();
//! let patches = make_patches(
//!     &settings,
//!     "The quick brown fox jumps over the lazy dog.",
//!     "That quick brown fox jumped over a lazy dog.",
//! );
//!
//! // The wire format round-trips.
//! let wire = patches_to_text(&patches);
//! assert_eq!(patches_from_text(&wire).unwrap(), patches);
//!
//! // The target has drifted, but both patches still land.
//! let (patched, results) = apply(
//!     &settings,
//!     &patches,
//!     "The quick red rabbit jumps over the tired tiger.",
//! );
//! assert_eq!(patched, "That quick red rabbit jumped over a tired tiger.");
//! assert_eq!(results, vec![true, true]);
//! ```
//!
//! ## Fuzzy matching
//!
//! ```
//! use mend::{match_main, Settings};
//!
//! let settings = Settings::default();
//! assert_eq!(match_main(&settings, "abcdefghijk", "efxhi", 0), Some(4));
//! ```
//!
//! ## Deltas
//!
//! A delta is a compact encoding of an edit script against its source
//! text, useful when the receiver already holds the original:
//!
//! ```
//! use mend::{diff, from_delta, original_text, to_delta, Settings};
//!
//! let settings = Settings::default();
//! let diffs = diff(&settings, "jumps over the", "jumped over a", false);
//! let delta = to_delta(&diffs);
//! assert_eq!(from_delta(&original_text(&diffs), &delta).unwrap(), diffs);
//! ```

mod apply;
mod bitap;
mod codec;
mod diff;
mod patch;
mod settings;
mod utils;

pub use apply::apply;
pub use bitap::match_main;
pub use diff::{
    cleanup_efficiency, cleanup_merge, cleanup_semantic, cleanup_semantic_lossless,
    common_overlap, common_prefix, common_suffix, diff, from_delta, levenshtein, modified_text,
    original_text, pretty_html, to_delta, translate_position, Diff, Op, ParseDeltaError,
};
pub use patch::{
    make_patches, make_patches_from_diffs, make_patches_with_base, patches_from_text,
    patches_to_text, ParsePatchError, Patch, PatchFormatter,
};
pub use settings::Settings;
