//! Route evaluator: cost, feasibility and cumul schedules.
//!
//! # Algorithm
//!
//! A route `start → r_1 → … → r_k → end` is checked dimension by dimension.
//! Each cumul starts from its domain (per-index range ∩ `[0, capacity]`,
//! the start pinned to zero when requested) and is tightened along the chain:
//!
//! ```text
//! forward:  C_k  ∩= [C_{k-1}.min + t,         C_{k-1}.max + t + slack_max]
//! backward: C_{k-1} ∩= [C_k.min - t - slack_max, C_k.max - t]
//! ```
//!
//! One forward and one backward pass make a chain bounds-consistent.
//! Cumul precedences (pickup ≤ delivery) are applied afterwards and the
//! passes repeat until nothing changes. An empty domain means the route is
//! infeasible.
//!
//! The finalizer then fixes the requested cumuls to their minimum, one at a
//! time, re-propagating after each.
//!
//! # Complexity
//!
//! O(D × k) per pass for D dimensions and a route of k stops.

use crate::routing::{Assignment, DimensionId, Interval, PairRole, RoutingModel};

/// Upper bound on propagation rounds before a route is declared infeasible.
const MAX_PROPAGATION_ROUNDS: usize = 64;

/// Realized cumul and slack bounds along one route.
///
/// Position 0 is the vehicle start, the last position is the vehicle end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSchedule {
    indices: Vec<usize>,
    cumuls: Vec<Vec<Interval>>,
    slacks: Vec<Vec<Interval>>,
}

impl RouteSchedule {
    /// Routing indices of the route, start and end included.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Cumul bounds at `position` in `dimension`.
    pub fn cumul(&self, dimension: DimensionId, position: usize) -> Interval {
        self.cumuls[dimension.get()][position]
    }

    /// Slack bounds after `position` in `dimension`; `None` at the end.
    pub fn slack(&self, dimension: DimensionId, position: usize) -> Option<Interval> {
        self.slacks[dimension.get()].get(position).copied()
    }
}

/// Evaluates candidate routes against a closed [`RoutingModel`].
///
/// Routes are given as the sequence of interior indices between a vehicle's
/// start and end.
///
/// # Examples
///
/// ```
/// use u_pdptw::evaluation::RouteEvaluator;
/// use u_pdptw::index::IndexManager;
/// use u_pdptw::routing::RoutingModel;
///
/// let manager = IndexManager::new(3, 1, &[0], &[0]).unwrap();
/// let mut model = RoutingModel::new(manager.clone());
/// let m = manager.clone();
/// let cb = model.register_transit_callback(move |i, j| {
///     (m.index_to_location(i) as i64 - m.index_to_location(j) as i64).abs()
/// });
/// model.set_arc_cost_evaluator_of_all_vehicles(cb).unwrap();
/// model.add_dimension(cb, 0, 3, true, "Time").unwrap();
/// model.close().unwrap();
///
/// let eval = RouteEvaluator::new(&model);
/// assert_eq!(eval.route_cost(0, &[0, 1]), 4);
/// assert!(!eval.is_feasible(0, &[0, 1])); // returns at time 4 > 3
/// assert!(eval.is_feasible(0, &[0]));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteEvaluator<'a> {
    model: &'a RoutingModel,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates an evaluator over a closed model.
    pub fn new(model: &'a RoutingModel) -> Self {
        Self { model }
    }

    /// The evaluated model.
    pub fn model(&self) -> &'a RoutingModel {
        self.model
    }

    /// Arc cost of a route; an unused vehicle costs nothing.
    pub fn route_cost(&self, vehicle: usize, route: &[usize]) -> i64 {
        if route.is_empty() {
            return 0;
        }
        let mut cost: i64 = 0;
        let mut prev = self.model.start(vehicle);
        for &i in route {
            cost = cost.saturating_add(self.model.arc_cost(prev, i));
            prev = i;
        }
        cost.saturating_add(self.model.arc_cost(prev, self.model.end(vehicle)))
    }

    /// Returns `true` if `vehicle` can serve `route` under every constraint.
    pub fn is_feasible(&self, vehicle: usize, route: &[usize]) -> bool {
        self.check_structure(vehicle, route) && self.propagate(vehicle, route).is_some()
    }

    /// Realized schedule of a feasible route, after finalization.
    pub fn schedule(&self, vehicle: usize, route: &[usize]) -> Option<RouteSchedule> {
        if !self.check_structure(vehicle, route) {
            return None;
        }
        let indices = self.sequence(vehicle, route);
        let mut domains = self.propagate_sequence(vehicle, &indices)?;

        for &(dim, index) in self.model.finalizer_vars() {
            let Some(pos) = indices.iter().position(|&i| i == index) else {
                continue;
            };
            let mut trial = domains.clone();
            let d = &mut trial[dim.get()][pos];
            *d = Interval::point(d.min);
            if let Some(fixed) = self.tighten(&indices, trial) {
                domains = fixed;
            }
        }

        let slacks = self
            .model
            .dimensions()
            .iter()
            .map(|dim| {
                let id = dim.id();
                (0..indices.len() - 1)
                    .map(|k| {
                        let t = self.model.transit(id, indices[k], indices[k + 1]);
                        let here = domains[id.get()][k];
                        let there = domains[id.get()][k + 1];
                        Interval::new(
                            (there.min - here.max - t).max(0),
                            (there.max - here.min - t).min(dim.slack_max()),
                        )
                    })
                    .collect()
            })
            .collect();

        Some(RouteSchedule {
            indices,
            cumuls: domains,
            slacks,
        })
    }

    /// Objective of a full set of routes: arc costs plus the penalty of
    /// every disjunction none of whose members is visited.
    pub fn objective(&self, routes: &[Vec<usize>]) -> i64 {
        let mut performed = vec![false; self.model.num_indices()];
        let mut total: i64 = 0;
        for (v, route) in routes.iter().enumerate() {
            total = total.saturating_add(self.route_cost(v, route));
            for &i in route {
                performed[i] = true;
            }
        }
        self.model
            .disjunctions()
            .iter()
            .filter(|d| d.indices().iter().all(|&i| !performed[i]))
            .fold(total, |acc, d| acc.saturating_add(d.penalty()))
    }

    /// Builds the assignment of a full set of routes (one per vehicle).
    ///
    /// Vehicles without an entry in `routes` stay unused. Returns `None` if
    /// any route is infeasible or a mandatory index is missing.
    pub fn assignment(&self, routes: &[Vec<usize>]) -> Option<Assignment> {
        let model = self.model;
        let n = model.num_indices();
        let mut next: Vec<usize> = (0..n).collect();
        let mut vehicle = vec![None; n];
        let mut cumuls: Vec<Vec<Interval>> = model
            .dimensions()
            .iter()
            .map(|d| (0..n).map(|i| d.cumul_range(i)).collect())
            .collect();
        let mut slacks = vec![vec![None; n]; model.dimensions().len()];

        for v in 0..model.num_vehicles() {
            let route = routes.get(v).map(Vec::as_slice).unwrap_or(&[]);
            let schedule = self.schedule(v, route)?;
            let indices = schedule.indices();
            for (k, &i) in indices.iter().enumerate() {
                vehicle[i] = Some(v);
                if k + 1 < indices.len() {
                    next[i] = indices[k + 1];
                }
                for dim in model.dimensions() {
                    let id = dim.id();
                    cumuls[id.get()][i] = schedule.cumul(id, k);
                    if dim.has_slack_in_assignment(i) {
                        slacks[id.get()][i] = schedule.slack(id, k);
                    }
                }
            }
        }

        let mandatory_missing = model.units().iter().any(|&u| {
            !model.is_droppable(u) && u.indices().iter().any(|&i| vehicle[i].is_none())
        });
        if mandatory_missing {
            return None;
        }

        let objective = self.objective(routes);
        let starts = (0..model.num_vehicles()).map(|v| model.start(v)).collect();
        let ends = (0..model.num_vehicles()).map(|v| model.end(v)).collect();
        Some(Assignment::new(
            next, vehicle, starts, ends, cumuls, slacks, objective,
        ))
    }

    /// Tightened cumul domains of a route, indexed by dimension then position.
    pub fn propagate(&self, vehicle: usize, route: &[usize]) -> Option<Vec<Vec<Interval>>> {
        let indices = self.sequence(vehicle, route);
        self.propagate_sequence(vehicle, &indices)
    }

    fn sequence(&self, vehicle: usize, route: &[usize]) -> Vec<usize> {
        let mut indices = Vec::with_capacity(route.len() + 2);
        indices.push(self.model.start(vehicle));
        indices.extend_from_slice(route);
        indices.push(self.model.end(vehicle));
        indices
    }

    /// Eligibility and pickup-before-delivery on the same route.
    fn check_structure(&self, vehicle: usize, route: &[usize]) -> bool {
        route.iter().enumerate().all(|(k, &i)| {
            self.model.is_vehicle_allowed(vehicle, i)
                && match self.model.pair_role(i) {
                    Some(PairRole::Pickup { delivery }) => route[k + 1..].contains(&delivery),
                    Some(PairRole::Delivery { pickup }) => route[..k].contains(&pickup),
                    None => true,
                }
        })
    }

    fn propagate_sequence(&self, vehicle: usize, indices: &[usize]) -> Option<Vec<Vec<Interval>>> {
        let domains = self
            .model
            .dimensions()
            .iter()
            .map(|dim| {
                let horizon = Interval::new(0, dim.vehicle_capacity(vehicle));
                indices
                    .iter()
                    .enumerate()
                    .map(|(k, &i)| {
                        let d = dim.cumul_range(i).intersect(horizon);
                        if k == 0 && dim.fix_start_cumul_to_zero() {
                            d.intersect(Interval::point(0))
                        } else {
                            d
                        }
                    })
                    .collect()
            })
            .collect();
        self.tighten(indices, domains)
    }

    fn tighten(
        &self,
        indices: &[usize],
        mut domains: Vec<Vec<Interval>>,
    ) -> Option<Vec<Vec<Interval>>> {
        if domains.iter().flatten().any(|d| d.is_empty()) {
            return None;
        }
        let precedences: Vec<(usize, usize, usize)> = self
            .model
            .precedences()
            .iter()
            .filter_map(|p| {
                let before = indices.iter().position(|&i| i == p.before)?;
                let after = indices.iter().position(|&i| i == p.after)?;
                Some((p.dimension, before, after))
            })
            .collect();

        for _ in 0..MAX_PROPAGATION_ROUNDS {
            for dim in self.model.dimensions() {
                self.tighten_chain(dim.id(), dim.slack_max(), indices, &mut domains[dim.id().get()])?;
            }
            let mut changed = false;
            for &(dim, before, after) in &precedences {
                let b = domains[dim][before];
                let a = domains[dim][after];
                if a.min < b.min {
                    domains[dim][after].min = b.min;
                    changed = true;
                }
                if b.max > a.max {
                    domains[dim][before].max = a.max;
                    changed = true;
                }
                if domains[dim][after].is_empty() || domains[dim][before].is_empty() {
                    return None;
                }
            }
            if !changed {
                return Some(domains);
            }
        }
        None
    }

    fn tighten_chain(
        &self,
        dim: DimensionId,
        slack_max: i64,
        indices: &[usize],
        domains: &mut [Interval],
    ) -> Option<()> {
        for k in 1..indices.len() {
            let t = self.model.transit(dim, indices[k - 1], indices[k]);
            let prev = domains[k - 1];
            let reach = Interval::new(
                prev.min.saturating_add(t),
                prev.max.saturating_add(t).saturating_add(slack_max),
            );
            domains[k] = domains[k].intersect(reach);
            if domains[k].is_empty() {
                return None;
            }
        }
        for k in (1..indices.len()).rev() {
            let t = self.model.transit(dim, indices[k - 1], indices[k]);
            let next = domains[k];
            let support = Interval::new(
                next.min.saturating_sub(t).saturating_sub(slack_max),
                next.max.saturating_sub(t),
            );
            domains[k - 1] = domains[k - 1].intersect(support);
            if domains[k - 1].is_empty() {
                return None;
            }
        }
        Some(())
    }
}
