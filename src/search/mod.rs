//! Search over a closed routing model.
//!
//! - [`SearchEngine`] — Construction followed by first-improvement local
//!   search under Guided Local Search, with time and solution limits
//! - [`SearchParameters`] — Limits and strategy selection
//! - [`SolutionCallback`] / [`SolutionContext`] — Observers of every reported solution
//! - [`SolutionTracker`] — Strictly decreasing objective trace with early stop
//! - [`CancellationToken`] — Cooperative cancellation from any thread

mod callback;
mod cancel;
mod engine;
mod gls;
mod parameters;
mod status;
mod tracker;

pub use callback::{SolutionCallback, SolutionContext};
pub use cancel::CancellationToken;
pub use engine::{SearchEngine, SearchOutcome};
pub use parameters::{FirstSolutionStrategy, LocalSearchMetaheuristic, SearchParameters};
pub use status::{SearchPhase, SolverStatus};
pub use tracker::SolutionTracker;
