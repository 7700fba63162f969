//! Solution observers.

use std::cell::Cell;

use crate::evaluation::RouteEvaluator;
use crate::routing::Assignment;

/// View of a solution handed to [`SolutionCallback`]s.
///
/// Observers read the objective cheaply; the full [`Assignment`] with
/// cumul and slack ranges is materialized only on request.
pub struct SolutionContext<'a> {
    eval: RouteEvaluator<'a>,
    routes: &'a [Vec<usize>],
    objective: i64,
    sequence: usize,
    finish: &'a Cell<bool>,
}

impl<'a> SolutionContext<'a> {
    pub(crate) fn new(
        eval: RouteEvaluator<'a>,
        routes: &'a [Vec<usize>],
        objective: i64,
        sequence: usize,
        finish: &'a Cell<bool>,
    ) -> Self {
        Self {
            eval,
            routes,
            objective,
            sequence,
            finish,
        }
    }

    /// Objective value of this solution.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// 1-based count of solutions reported so far, this one included.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// Interior indices visited by each vehicle.
    pub fn routes(&self) -> &'a [Vec<usize>] {
        self.routes
    }

    /// Full assignment of the solution.
    pub fn assignment(&self) -> Option<Assignment> {
        self.eval.assignment(self.routes)
    }

    /// Asks the search to stop after this notification.
    pub fn finish_search(&self) {
        self.finish.set(true);
    }
}

/// Receives every solution the search reports.
///
/// Closures taking a [`SolutionContext`] implement it directly.
pub trait SolutionCallback {
    /// Called on the first solution and on each improving accepted move.
    fn on_solution(&mut self, ctx: &SolutionContext<'_>);
}

impl<F> SolutionCallback for F
where
    F: FnMut(&SolutionContext<'_>),
{
    fn on_solution(&mut self, ctx: &SolutionContext<'_>) {
        self(ctx)
    }
}
