//! Working state of the local search and the move protocol.
//!
//! A [`RoutePlan`] holds one route per vehicle plus the bookkeeping needed to
//! read the objective in O(1). Operators never mutate it: they propose a
//! [`Move`] (a set of replacement routes) through a [`MoveContext`], and the
//! search applies it atomically.

use crate::evaluation::RouteEvaluator;
use crate::routing::{RoutingModel, Unit};

/// Smallest augmented improvement a move must bring.
pub(crate) const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Replacement route for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    /// Vehicle whose route is replaced.
    pub vehicle: usize,
    /// New sequence of interior indices.
    pub route: Vec<usize>,
}

/// An improving, feasible change to a [`RoutePlan`].
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    /// Routes replaced by the move (distinct vehicles).
    pub changes: Vec<RouteChange>,
    /// Change of the penalty-augmented objective (negative).
    pub delta: f64,
    /// Change of the true objective.
    pub objective_delta: i64,
}

/// GLS penalty counters on arcs `(from, to)` of the routing index space.
#[derive(Debug, Clone)]
pub struct ArcPenalties {
    counts: Vec<u32>,
    size: usize,
    lambda: f64,
}

impl ArcPenalties {
    /// Zero penalties over `num_indices` indices; `lambda` starts at zero.
    pub fn new(num_indices: usize) -> Self {
        Self {
            counts: vec![0; num_indices * num_indices],
            size: num_indices,
            lambda: 0.0,
        }
    }

    /// Penalty count of an arc.
    pub fn get(&self, from: usize, to: usize) -> u32 {
        self.counts[from * self.size + to]
    }

    /// Increments the penalty count of an arc.
    pub fn increment(&mut self, from: usize, to: usize) {
        self.counts[from * self.size + to] += 1;
    }

    /// Weight of one penalty unit in the augmented objective.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Sets the penalty weight.
    pub fn set_lambda(&mut self, lambda: f64) {
        self.lambda = lambda;
    }

    /// Sum of penalty counts over the arcs of a route (0 for an unused vehicle).
    pub fn route_penalty(&self, model: &RoutingModel, vehicle: usize, route: &[usize]) -> u64 {
        if route.is_empty() {
            return 0;
        }
        let mut sum = 0u64;
        let mut prev = model.start(vehicle);
        for &i in route.iter().chain(std::iter::once(&model.end(vehicle))) {
            sum += u64::from(self.get(prev, i));
            prev = i;
        }
        sum
    }
}

/// Routes under improvement, with cached costs and disjunction activity.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    routes: Vec<Vec<usize>>,
    route_of: Vec<Option<usize>>,
    costs: Vec<i64>,
    active: Vec<usize>,
    dropped_penalty: i64,
}

impl RoutePlan {
    /// Wraps feasible routes (one per vehicle).
    pub fn new(eval: &RouteEvaluator<'_>, routes: Vec<Vec<usize>>) -> Self {
        let model = eval.model();
        let mut route_of = vec![None; model.num_indices()];
        let mut active = vec![0; model.disjunctions().len()];
        for (v, route) in routes.iter().enumerate() {
            for &i in route {
                route_of[i] = Some(v);
                if let Some(d) = model.disjunction_of(i) {
                    active[d] += 1;
                }
            }
        }
        let costs = routes
            .iter()
            .enumerate()
            .map(|(v, r)| eval.route_cost(v, r))
            .collect();
        let dropped_penalty = model
            .disjunctions()
            .iter()
            .zip(&active)
            .filter(|(_, &a)| a == 0)
            .map(|(d, _)| d.penalty())
            .sum();
        Self {
            routes,
            route_of,
            costs,
            active,
            dropped_penalty,
        }
    }

    /// All routes, indexed by vehicle.
    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Route of `vehicle`.
    pub fn route(&self, vehicle: usize) -> &[usize] {
        &self.routes[vehicle]
    }

    /// Vehicle currently visiting `index`.
    pub fn route_of(&self, index: usize) -> Option<usize> {
        self.route_of[index]
    }

    /// Cached arc cost of `vehicle`'s route.
    pub fn route_cost(&self, vehicle: usize) -> i64 {
        self.costs[vehicle]
    }

    /// True objective: arc costs plus penalties of unvisited disjunctions.
    pub fn objective(&self) -> i64 {
        self.costs
            .iter()
            .fold(self.dropped_penalty, |acc, &c| acc.saturating_add(c))
    }

    /// Number of visited members of disjunction `d`.
    pub fn active_count(&self, d: usize) -> usize {
        self.active[d]
    }

    /// Replaces the routes named by `mv`.
    pub fn apply(&mut self, eval: &RouteEvaluator<'_>, mv: Move) {
        let model = eval.model();
        for change in &mv.changes {
            let old = std::mem::take(&mut self.routes[change.vehicle]);
            for i in old {
                self.route_of[i] = None;
                if let Some(d) = model.disjunction_of(i) {
                    self.active[d] -= 1;
                    if self.active[d] == 0 {
                        self.dropped_penalty += model.disjunctions()[d].penalty();
                    }
                }
            }
        }
        for change in mv.changes {
            for &i in &change.route {
                self.route_of[i] = Some(change.vehicle);
                if let Some(d) = model.disjunction_of(i) {
                    if self.active[d] == 0 {
                        self.dropped_penalty -= model.disjunctions()[d].penalty();
                    }
                    self.active[d] += 1;
                }
            }
            self.costs[change.vehicle] = eval.route_cost(change.vehicle, &change.route);
            self.routes[change.vehicle] = change.route;
        }
    }
}

/// Everything an operator needs to look for an improving move.
pub struct MoveContext<'a, 'b> {
    /// Evaluator over the closed model.
    pub eval: RouteEvaluator<'a>,
    /// Current routes.
    pub plan: &'b RoutePlan,
    /// GLS arc penalties; all zero under plain descent.
    pub penalties: &'b ArcPenalties,
    /// Polled between candidates; `true` aborts the scan.
    pub stop: &'b dyn Fn() -> bool,
}

impl<'a, 'b> MoveContext<'a, 'b> {
    /// The model being searched.
    pub fn model(&self) -> &'a RoutingModel {
        self.eval.model()
    }

    /// Penalty-augmented value of a route.
    pub fn augmented_cost(&self, vehicle: usize, route: &[usize]) -> f64 {
        let cost = self.eval.route_cost(vehicle, route) as f64;
        let lambda = self.penalties.lambda();
        if lambda == 0.0 {
            cost
        } else {
            cost + lambda * self.penalties.route_penalty(self.model(), vehicle, route) as f64
        }
    }

    /// Turns replacement routes into a [`Move`] if they improve the
    /// augmented objective and are all feasible.
    ///
    /// `penalty_delta` is the change in disjunction penalties caused by
    /// visiting or dropping units.
    pub fn evaluate(&self, changes: Vec<RouteChange>, penalty_delta: i64) -> Option<Move> {
        let mut delta = penalty_delta as f64;
        let mut objective_delta = penalty_delta;
        for c in &changes {
            let current = self.plan.route(c.vehicle);
            delta += self.augmented_cost(c.vehicle, &c.route) - self.augmented_cost(c.vehicle, current);
            objective_delta +=
                self.eval.route_cost(c.vehicle, &c.route) - self.plan.route_cost(c.vehicle);
        }
        if delta >= -IMPROVEMENT_EPSILON {
            return None;
        }
        if !changes
            .iter()
            .all(|c| self.eval.is_feasible(c.vehicle, &c.route))
        {
            return None;
        }
        Some(Move {
            changes,
            delta,
            objective_delta,
        })
    }

    /// Penalty saved by visiting `unit`, or `None` if a disjunction it
    /// belongs to already has a visited member.
    pub fn activation_gain(&self, unit: Unit) -> Option<i64> {
        let model = self.model();
        let mut seen: Vec<usize> = Vec::new();
        let mut gain = 0;
        for i in unit.indices() {
            if let Some(d) = model.disjunction_of(i) {
                if seen.contains(&d) || self.plan.active_count(d) > 0 {
                    return None;
                }
                seen.push(d);
                gain += model.disjunctions()[d].penalty();
            }
        }
        Some(gain)
    }

    /// Penalty incurred by dropping a visited `unit`.
    pub fn drop_cost(&self, unit: Unit) -> i64 {
        let model = self.model();
        let mut seen: Vec<usize> = Vec::new();
        let mut cost = 0;
        for i in unit.indices() {
            if let Some(d) = model.disjunction_of(i) {
                if !seen.contains(&d) && self.plan.active_count(d) == 1 {
                    cost += model.disjunctions()[d].penalty();
                }
                seen.push(d);
            }
        }
        cost
    }

    /// Position of `index` in its route.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        let v = self.plan.route_of(index)?;
        let pos = self.plan.route(v).iter().position(|&i| i == index)?;
        Some((v, pos))
    }
}

/// A neighborhood explored with first improvement.
pub trait MoveOperator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// First improving feasible move in the operator's fixed enumeration
    /// order, or `None` if there is none (or the scan was stopped).
    fn find_improving(&self, ctx: &MoveContext<'_, '_>) -> Option<Move>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::fixtures::line_model;

    #[test]
    fn test_plan_objective_tracks_drops() {
        let model = line_model(1, &[3, 4]);
        let eval = RouteEvaluator::new(&model);
        let mut plan = RoutePlan::new(&eval, vec![vec![0, 1]]);
        // route 0 → 1 → 2 → 0 costs 4, locations 3 and 4 dropped at 100 each
        assert_eq!(plan.objective(), 4 + 200);

        plan.apply(
            &eval,
            Move {
                changes: vec![RouteChange {
                    vehicle: 0,
                    route: vec![0, 1, 2],
                }],
                delta: -1.0,
                objective_delta: -98,
            },
        );
        assert_eq!(plan.objective(), 6 + 100);
        assert_eq!(plan.route_of(2), Some(0));
        assert_eq!(plan.route_of(3), None);
    }

    #[test]
    fn test_route_penalty_sums_arcs() {
        let model = line_model(1, &[]);
        let mut penalties = ArcPenalties::new(model.num_indices());
        let start = model.start(0);
        penalties.increment(start, 0);
        penalties.increment(start, 0);
        penalties.increment(1, model.end(0));
        assert_eq!(penalties.route_penalty(&model, 0, &[0, 1]), 3);
        assert_eq!(penalties.route_penalty(&model, 0, &[]), 0);
    }

    #[test]
    fn test_evaluate_requires_improvement() {
        let model = line_model(1, &[]);
        let eval = RouteEvaluator::new(&model);
        let plan = RoutePlan::new(&eval, vec![vec![1, 0, 2, 3]]);
        let penalties = ArcPenalties::new(model.num_indices());
        let ctx = MoveContext {
            eval,
            plan: &plan,
            penalties: &penalties,
            stop: &|| false,
        };
        let better = ctx.evaluate(
            vec![RouteChange {
                vehicle: 0,
                route: vec![0, 1, 2, 3],
            }],
            0,
        );
        assert_eq!(better.map(|m| m.objective_delta), Some(-2));
        let same = ctx.evaluate(
            vec![RouteChange {
                vehicle: 0,
                route: vec![1, 0, 2, 3],
            }],
            0,
        );
        assert!(same.is_none());
    }

    #[test]
    fn test_augmented_cost_uses_lambda() {
        let model = line_model(1, &[]);
        let eval = RouteEvaluator::new(&model);
        let plan = RoutePlan::new(&eval, vec![vec![0]]);
        let mut penalties = ArcPenalties::new(model.num_indices());
        penalties.increment(model.start(0), 0);
        penalties.set_lambda(0.5);
        let ctx = MoveContext {
            eval,
            plan: &plan,
            penalties: &penalties,
            stop: &|| false,
        };
        assert!((ctx.augmented_cost(0, &[0]) - 2.5).abs() < 1e-12);
    }
}
