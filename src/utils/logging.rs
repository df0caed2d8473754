use log::{log_enabled, warn, Level};
use std::collections::HashSet;
use std::hash::Hash;
use std::time::Instant;

/// Simple scoped timer for tracing the per-frame systems.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("⏱️ start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            log::trace!("⏱️ end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Remembers which failure causes a component already reported, so a condition that
/// persists across frames produces a single warning.
#[derive(Debug, Clone)]
pub struct Diagnostics<C> {
    component: &'static str,
    reported: HashSet<C>,
}

impl<C: Hash + Eq> Diagnostics<C> {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            reported: HashSet::new(),
        }
    }

    /// Logs `message` at warn level the first time `cause` is seen. Returns whether it logged.
    pub fn warn_once(&mut self, cause: C, message: impl std::fmt::Display) -> bool {
        if !self.reported.insert(cause) {
            return false;
        }
        warn!("[{}] {}", self.component, message);
        true
    }

    pub fn has_reported(&self, cause: &C) -> bool {
        self.reported.contains(cause)
    }

    pub fn reported_count(&self) -> usize {
        self.reported.len()
    }

    /// Forgets every reported cause, e.g. after a successful reinitialization.
    pub fn clear(&mut self) {
        self.reported.clear();
    }
}
