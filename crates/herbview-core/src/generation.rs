//! Load generations for supersede/cancel semantics.
//!
//! Every asynchronous load is stamped with a generation taken from a
//! monotonically increasing counter. Only the most recently started load is
//! current; a completion carrying any other generation is stale and must be
//! dropped without touching session state.

/// Identifies one started load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Returns the raw counter value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Tracks which load, if any, is current for a session.
#[derive(Debug, Default)]
pub struct LoadTracker {
    counter: u64,
    pending: Option<Generation>,
}

impl LoadTracker {
    /// Creates a tracker with no load in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load, superseding any load still in flight.
    pub fn begin(&mut self) -> Generation {
        self.counter += 1;
        let generation = Generation(self.counter);
        if let Some(previous) = self.pending.replace(generation) {
            log::debug!(
                "load {} supersedes in-flight load {}",
                generation.0,
                previous.0
            );
        }
        generation
    }

    /// Returns whether `generation` is the load currently in flight.
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.pending == Some(generation)
    }

    /// Marks `generation` as settled. Returns `false` if it was stale.
    pub fn settle(&mut self, generation: Generation) -> bool {
        if self.is_current(generation) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Returns whether a load is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Abandons the in-flight load, if any. Its completion will be stale.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// The most recently issued generation, if any load was ever started.
    #[must_use]
    pub fn latest(&self) -> Option<Generation> {
        (self.counter > 0).then_some(Generation(self.counter))
    }
}
