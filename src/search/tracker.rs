//! Objective trace with an early stop.

use tracing::debug;

use super::callback::{SolutionCallback, SolutionContext};

/// Records the sequence of strictly improving objective values.
///
/// Once `max_solutions` values are recorded it asks the search to finish,
/// so an aggressive solution limit can be enforced on observed progress
/// rather than on raw notifications.
///
/// # Examples
///
/// ```
/// use u_pdptw::search::SolutionTracker;
///
/// let tracker = SolutionTracker::new(15);
/// assert!(tracker.trace().is_empty());
/// assert_eq!(tracker.max_solutions(), 15);
/// ```
#[derive(Debug, Clone)]
pub struct SolutionTracker {
    max_solutions: usize,
    trace: Vec<i64>,
    notifications: usize,
}

impl SolutionTracker {
    /// Tracker that finishes the search after `max_solutions` improvements.
    pub fn new(max_solutions: usize) -> Self {
        Self {
            max_solutions,
            trace: Vec::new(),
            notifications: 0,
        }
    }

    /// Improvement cap.
    pub fn max_solutions(&self) -> usize {
        self.max_solutions
    }

    /// Recorded objective values, strictly decreasing.
    pub fn trace(&self) -> &[i64] {
        &self.trace
    }

    /// Number of notifications received, recorded or not.
    pub fn notifications(&self) -> usize {
        self.notifications
    }

    /// Best recorded objective.
    pub fn best(&self) -> Option<i64> {
        self.trace.last().copied()
    }

    /// Consumes the tracker, returning the trace.
    pub fn into_trace(self) -> Vec<i64> {
        self.trace
    }

    /// Records `objective` if it improves; returns `true` when the cap is
    /// reached.
    fn record(&mut self, objective: i64) -> bool {
        self.notifications += 1;
        if self.trace.last().map_or(true, |&last| objective < last) {
            self.trace.push(objective);
            debug!(objective, recorded = self.trace.len(), "tracked solution");
        }
        self.trace.len() >= self.max_solutions
    }
}

impl SolutionCallback for SolutionTracker {
    fn on_solution(&mut self, ctx: &SolutionContext<'_>) {
        if self.record(ctx.objective()) {
            ctx.finish_search();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_only_strict_improvements() {
        let mut t = SolutionTracker::new(10);
        for obj in [50, 40, 40, 45, 30] {
            t.record(obj);
        }
        assert_eq!(t.trace(), &[50, 40, 30]);
        assert_eq!(t.notifications(), 5);
        assert_eq!(t.best(), Some(30));
    }

    #[test]
    fn test_cap_reached() {
        let mut t = SolutionTracker::new(2);
        assert!(!t.record(10));
        assert!(!t.record(10));
        assert!(t.record(9));
        assert_eq!(t.into_trace(), vec![10, 9]);
    }

    #[test]
    fn test_zero_cap_finishes_at_first() {
        let mut t = SolutionTracker::new(0);
        assert!(t.record(7));
    }
}
