//! Search outcome and lifecycle states.

use serde::Serialize;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SolverStatus {
    /// The improvement phase ran to completion before any limit.
    OptimalWithinLimit,
    /// A solution exists; the time or solution limit stopped the search.
    Feasible,
    /// No solution serving every mandatory location was found, either
    /// because none exists or because the time limit expired first.
    Infeasible,
    /// The caller cancelled the search; the best solution so far is kept.
    Cancelled,
}

/// Position of a [`SearchEngine`](super::SearchEngine) in its lifecycle.
///
/// ```text
/// Unstarted → Constructing → Improving → Terminated
///     │            │              └────→ Cancelled
///     │            ├────────────────────→ Cancelled
///     │            └────────────────────→ Infeasible
///     └─────────────────────────────────→ Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    /// `run` has not been called.
    Unstarted,
    /// Building the first solution.
    Constructing,
    /// Improving by local search.
    Improving,
    /// Stopped by exhaustion or a limit.
    Terminated,
    /// Stopped by the cancellation token.
    Cancelled,
    /// Construction found no feasible solution.
    Infeasible,
}
