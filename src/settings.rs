use std::time::Duration;

/// Tuning knobs shared by the diff, match, and patch entry points.
///
/// The defaults are good for interactive use; most callers can pass
/// `&Settings::default()` everywhere. All fields are public so that a
/// caller can adjust a single knob with struct-update syntax:
///
/// ```
/// use mend::Settings;
///
/// let strict = Settings {
///     match_threshold: 0.2,
///     ..Settings::default()
/// };
/// # assert_eq!(strict.match_distance, 1000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// How long a single diff may run before it degrades to a coarser
    /// result. `None` means unlimited time, which also disables the
    /// half-match speedup so the output is fully minimal and
    /// deterministic.
    pub diff_timeout: Option<Duration>,

    /// Cost of an empty edit operation, in characters, used by
    /// [`cleanup_efficiency`](crate::cleanup_efficiency) when deciding
    /// whether a short equality is worth keeping.
    pub diff_edit_cost: usize,

    /// Highest acceptable score for a fuzzy match (0.0 is a perfect
    /// match, 1.0 accepts nearly anything).
    pub match_threshold: f64,

    /// Distance, in characters, at which a match adds 1.0 to its score.
    /// `0` requires the match at the exact expected location.
    pub match_distance: usize,

    /// Width of the bitap machine word; also the per-patch pattern cap
    /// used when splitting oversized patches. 32 is the portable floor.
    pub match_max_bits: usize,

    /// When an imperfectly matched patch deletes a large block, the
    /// largest tolerated ratio of edit distance to pattern length before
    /// the patch is rejected.
    pub patch_delete_threshold: f64,

    /// Characters of context carried on each side of a patch.
    pub patch_margin: usize,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            diff_timeout: Some(Duration::from_secs(1)),
            diff_edit_cost: 4,
            match_threshold: 0.5,
            match_distance: 1000,
            match_max_bits: 32,
            patch_delete_threshold: 0.5,
            patch_margin: 4,
        }
    }
}
