//! First-improvement descent with Guided Local Search.
//!
//! # Algorithm
//!
//! The descent tries the operators in a fixed order and applies the first
//! move that lowers the penalty-augmented objective, until no operator finds
//! one (a local optimum). Under plain descent the search ends there.
//!
//! Under GLS, each local optimum penalizes the arcs of the current routes
//! with maximal utility `cost / (1 + penalty)`. The augmented objective adds
//! `λ × Σ penalty` over used arcs, where `λ` is a fraction of the average arc
//! cost of the first local optimum. Penalties reshape the landscape so the
//! descent can leave the optimum; the search stops once a number of
//! consecutive local optima bring no new best true objective.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its application
//! to the traveling salesman problem", *European Journal of Operational
//! Research* 113(2), 469-499.

use tracing::{debug, trace};

use super::parameters::{LocalSearchMetaheuristic, SearchParameters};
use crate::evaluation::RouteEvaluator;
use crate::local_search::{default_operators, ArcPenalties, MoveContext, MoveOperator, RoutePlan};

/// Tolerance when comparing arc utilities.
const UTILITY_EPSILON: f64 = 1e-9;

/// Why the improvement loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchEnd {
    /// Local optimum (descent) or stagnation (GLS).
    Exhausted,
    /// `stop` fired or the move hook asked to finish.
    Interrupted,
}

/// Improvement loop over a [`RoutePlan`].
pub(crate) struct LocalSearch<'a> {
    eval: RouteEvaluator<'a>,
    operators: Vec<Box<dyn MoveOperator>>,
    metaheuristic: LocalSearchMetaheuristic,
    lambda_coefficient: f64,
    max_stale_rounds: usize,
}

impl<'a> LocalSearch<'a> {
    pub(crate) fn new(eval: RouteEvaluator<'a>, params: &SearchParameters) -> Self {
        Self {
            eval,
            operators: default_operators(),
            metaheuristic: params.local_search_metaheuristic,
            lambda_coefficient: params.gls_lambda_coefficient,
            max_stale_rounds: params.max_stale_rounds,
        }
    }

    /// Improves `plan` in place.
    ///
    /// `on_move` sees the plan after every accepted move; returning `false`
    /// ends the search.
    pub(crate) fn run(
        &self,
        plan: &mut RoutePlan,
        stop: &dyn Fn() -> bool,
        on_move: &mut dyn FnMut(&RoutePlan) -> bool,
    ) -> SearchEnd {
        let model = self.eval.model();
        let mut penalties = ArcPenalties::new(model.num_indices());
        let mut best = plan.objective();
        let mut stale = 0usize;
        let mut rounds = 0usize;

        loop {
            let mut improved = false;
            loop {
                if stop() {
                    return SearchEnd::Interrupted;
                }
                let found = {
                    let ctx = MoveContext {
                        eval: self.eval,
                        plan: &*plan,
                        penalties: &penalties,
                        stop,
                    };
                    self.operators
                        .iter()
                        .find_map(|op| op.find_improving(&ctx).map(|mv| (op.name(), mv)))
                };
                let Some((name, mv)) = found else {
                    break;
                };
                trace!(
                    operator = name,
                    delta = mv.delta,
                    objective_delta = mv.objective_delta,
                    "move accepted"
                );
                plan.apply(&self.eval, mv);
                if plan.objective() < best {
                    best = plan.objective();
                    improved = true;
                }
                if !on_move(plan) {
                    return SearchEnd::Interrupted;
                }
            }
            // a scan cut short by `stop` is not a local optimum
            if stop() {
                return SearchEnd::Interrupted;
            }
            rounds += 1;
            debug!(round = rounds, objective = plan.objective(), best, "local optimum");

            if self.metaheuristic == LocalSearchMetaheuristic::GreedyDescent {
                return SearchEnd::Exhausted;
            }
            if improved {
                stale = 0;
            } else {
                stale += 1;
                if stale >= self.max_stale_rounds {
                    return SearchEnd::Exhausted;
                }
            }
            if penalties.lambda() == 0.0 {
                let (cost, arcs) = self.arc_totals(plan);
                let lambda = if arcs == 0 {
                    0.0
                } else {
                    self.lambda_coefficient * cost as f64 / arcs as f64
                };
                if lambda <= 0.0 {
                    return SearchEnd::Exhausted;
                }
                debug!(lambda, "guided local search weight set");
                penalties.set_lambda(lambda);
            }
            if !self.penalize(plan, &mut penalties) {
                return SearchEnd::Exhausted;
            }
        }
    }

    /// Total arc cost and arc count over the used routes.
    fn arc_totals(&self, plan: &RoutePlan) -> (i64, usize) {
        let mut cost = 0;
        let mut arcs = 0;
        for (v, route) in plan.routes().iter().enumerate() {
            if !route.is_empty() {
                cost += plan.route_cost(v);
                arcs += route.len() + 1;
            }
        }
        (cost, arcs)
    }

    /// Increments the penalty of every max-utility arc; `false` if the plan
    /// uses no arc.
    fn penalize(&self, plan: &RoutePlan, penalties: &mut ArcPenalties) -> bool {
        let model = self.eval.model();
        let mut best_utility = f64::NEG_INFINITY;
        let mut selected: Vec<(usize, usize)> = Vec::new();
        for (v, route) in plan.routes().iter().enumerate() {
            if route.is_empty() {
                continue;
            }
            let mut prev = model.start(v);
            for &i in route.iter().chain(std::iter::once(&model.end(v))) {
                let cost = model.arc_cost(prev, i) as f64;
                let utility = cost / (1.0 + f64::from(penalties.get(prev, i)));
                if utility > best_utility + UTILITY_EPSILON {
                    best_utility = utility;
                    selected.clear();
                    selected.push((prev, i));
                } else if (utility - best_utility).abs() <= UTILITY_EPSILON {
                    selected.push((prev, i));
                }
                prev = i;
            }
        }
        for &(from, to) in &selected {
            penalties.increment(from, to);
            trace!(from, to, penalty = penalties.get(from, to), "arc penalized");
        }
        !selected.is_empty()
    }
}
