//! State differ
//!
//! Holds the last accepted projection and decides whether a freshly fetched
//! one differs from it. The baseline is owned by the scheduler instance that
//! drives the loop; there is no process-wide state.

use crate::types::Projection;

/// The last projection that was successfully rendered and published.
///
/// Starts empty, which compares unequal to any non-empty projection and so
/// bootstraps the first render. The caller replaces it wholesale via
/// [`Baseline::accept`] only after publishing succeeds; a failed publish
/// leaves the baseline pointing at the previous state so a restarted process
/// re-detects the change.
#[derive(Debug, Default)]
pub struct Baseline {
    accepted: Projection,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Structural comparison: same row indices, and value-for-value equal
    /// sequences per row. An empty fetch against an empty baseline is not a
    /// change.
    pub fn has_changed(&self, current: &Projection) -> bool {
        self.accepted != *current
    }

    /// Commit `current` as the new baseline. Call only after the rendered
    /// artifact for `current` has been published.
    pub fn accept(&mut self, current: Projection) {
        self.accepted = current;
    }

    pub fn rows(&self) -> &Projection {
        &self.accepted
    }
}
