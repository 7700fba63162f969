//! Two-phase search: construction, then local search.

use std::cell::Cell;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::callback::{SolutionCallback, SolutionContext};
use super::cancel::CancellationToken;
use super::gls::{LocalSearch, SearchEnd};
use super::parameters::{FirstSolutionStrategy, SearchParameters};
use super::status::{SearchPhase, SolverStatus};
use crate::constructive::{cheapest_insertion, path_cheapest_arc};
use crate::error::ModelError;
use crate::evaluation::RouteEvaluator;
use crate::local_search::RoutePlan;
use crate::routing::{Assignment, RoutingModel};

/// Result of [`SearchEngine::run`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// How the search ended.
    pub status: SolverStatus,
    /// Best solution found, if any.
    pub assignment: Option<Assignment>,
    /// Objective of `assignment`.
    pub objective: Option<i64>,
    /// Wall-clock time spent.
    pub wall_time: Duration,
    /// Number of solutions reported to callbacks.
    pub solutions: usize,
}

/// Runs the search over a closed [`RoutingModel`].
///
/// The first solution comes from the configured construction heuristic.
/// Local search then improves it until it stagnates, a limit is hit, a
/// callback calls [`finish_search`](SolutionContext::finish_search), or the
/// [`CancellationToken`] fires. Callbacks see the first solution and every
/// accepted move that lowers the objective.
///
/// The time limit and the token also bound construction. Optional units not
/// placed when either fires stay unvisited; a mandatory one left over ends
/// the run as [`SolverStatus::Infeasible`] (or `Cancelled`).
///
/// # Examples
///
/// ```
/// use u_pdptw::index::IndexManager;
/// use u_pdptw::routing::RoutingModel;
/// use u_pdptw::search::{SearchEngine, SearchParameters, SolverStatus};
///
/// let manager = IndexManager::new(4, 1, &[0], &[0]).unwrap();
/// let mut model = RoutingModel::new(manager.clone());
/// let m = manager.clone();
/// let cb = model.register_transit_callback(move |i, j| {
///     (m.index_to_location(i) as i64 - m.index_to_location(j) as i64).abs()
/// });
/// model.set_arc_cost_evaluator_of_all_vehicles(cb).unwrap();
/// model.close().unwrap();
///
/// let params = SearchParameters::default();
/// let mut engine = SearchEngine::new(&model, &params).unwrap();
/// let outcome = engine.run();
/// assert_eq!(outcome.status, SolverStatus::OptimalWithinLimit);
/// assert_eq!(outcome.objective, Some(6));
/// ```
pub struct SearchEngine<'a> {
    model: &'a RoutingModel,
    params: &'a SearchParameters,
    callbacks: Vec<&'a mut dyn SolutionCallback>,
    cancel: CancellationToken,
    phase: SearchPhase,
}

impl<'a> SearchEngine<'a> {
    /// Prepares a search; fails if the model is not closed.
    pub fn new(model: &'a RoutingModel, params: &'a SearchParameters) -> Result<Self, ModelError> {
        if !model.is_closed() {
            return Err(ModelError::ModelNotClosed);
        }
        Ok(Self {
            model,
            params,
            callbacks: Vec::new(),
            cancel: CancellationToken::new(),
            phase: SearchPhase::Unstarted,
        })
    }

    /// Uses `token` for cooperative cancellation.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Registers an observer; observers are called in registration order.
    pub fn add_callback(&mut self, callback: &'a mut dyn SolutionCallback) {
        self.callbacks.push(callback);
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Runs the search to completion.
    pub fn run(&mut self) -> SearchOutcome {
        let started = Instant::now();
        let eval = RouteEvaluator::new(self.model);
        let cancel = self.cancel.clone();
        let finish = Cell::new(false);
        let deadline = self
            .params
            .time_limit
            .and_then(|limit| started.checked_add(limit));
        let solution_limit = self.params.solution_limit;

        let expired = || deadline.is_some_and(|d| Instant::now() >= d);
        if cancel.is_cancelled() {
            self.phase = SearchPhase::Cancelled;
            info!("cancelled before construction");
            return SearchOutcome {
                status: SolverStatus::Cancelled,
                assignment: None,
                objective: None,
                wall_time: started.elapsed(),
                solutions: 0,
            };
        }

        self.phase = SearchPhase::Constructing;
        info!(
            strategy = ?self.params.first_solution_strategy,
            vehicles = self.model.num_vehicles(),
            "building first solution"
        );
        let stop_requested = || cancel.is_cancelled() || expired();
        let routes = match self.params.first_solution_strategy {
            FirstSolutionStrategy::CheapestInsertion => cheapest_insertion(&eval, &stop_requested),
            FirstSolutionStrategy::PathCheapestArc => path_cheapest_arc(&eval, &stop_requested),
        };
        if expired() {
            debug!("time limit reached during construction");
        }
        let Some(routes) = routes else {
            let (phase, status) = if cancel.is_cancelled() {
                (SearchPhase::Cancelled, SolverStatus::Cancelled)
            } else {
                (SearchPhase::Infeasible, SolverStatus::Infeasible)
            };
            self.phase = phase;
            info!(?status, "no first solution");
            return SearchOutcome {
                status,
                assignment: None,
                objective: None,
                wall_time: started.elapsed(),
                solutions: 0,
            };
        };

        let mut plan = RoutePlan::new(&eval, routes);
        let mut best_routes = plan.routes().to_vec();
        let mut best = plan.objective();
        let mut last_accepted = best;
        let mut solutions = 1usize;
        info!(objective = best, "first solution");
        notify(&mut self.callbacks, eval, &plan, solutions, &finish);

        let limit_reached = |count: usize| solution_limit.is_some_and(|l| count >= l);
        let end = if finish.get() || limit_reached(solutions) {
            SearchEnd::Interrupted
        } else {
            self.phase = SearchPhase::Improving;
            let stop = || stop_requested() || finish.get();
            let callbacks = &mut self.callbacks;
            let mut on_move = |current: &RoutePlan| {
                let objective = current.objective();
                if objective < best {
                    best = objective;
                    best_routes = current.routes().to_vec();
                }
                if objective < last_accepted {
                    solutions += 1;
                    debug!(objective, solutions, "improving solution");
                    notify(&mut callbacks[..], eval, current, solutions, &finish);
                }
                last_accepted = objective;
                !(finish.get() || limit_reached(solutions))
            };
            LocalSearch::new(eval, self.params).run(&mut plan, &stop, &mut on_move)
        };

        let (phase, status) = match end {
            SearchEnd::Exhausted => (SearchPhase::Terminated, SolverStatus::OptimalWithinLimit),
            SearchEnd::Interrupted if cancel.is_cancelled() => {
                (SearchPhase::Cancelled, SolverStatus::Cancelled)
            }
            SearchEnd::Interrupted => (SearchPhase::Terminated, SolverStatus::Feasible),
        };
        self.phase = phase;
        let wall_time = started.elapsed();
        info!(?status, objective = best, solutions, ?wall_time, "search finished");
        SearchOutcome {
            status,
            assignment: eval.assignment(&best_routes),
            objective: Some(best),
            wall_time,
            solutions,
        }
    }
}

fn notify(
    callbacks: &mut [&mut dyn SolutionCallback],
    eval: RouteEvaluator<'_>,
    plan: &RoutePlan,
    sequence: usize,
    finish: &Cell<bool>,
) {
    let ctx = SolutionContext::new(eval, plan.routes(), plan.objective(), sequence, finish);
    for callback in callbacks.iter_mut() {
        callback.on_solution(&ctx);
    }
}
