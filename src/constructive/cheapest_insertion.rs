//! Parallel cheapest insertion.
//!
//! # Algorithm
//!
//! Starting from empty routes, repeatedly evaluates every way of inserting
//! every unplaced unit (a single index, or a pickup and its delivery with the
//! pickup first) into every route, and performs the cheapest feasible one.
//! Ties go to the unit with the lowest location (a pair counts by the lower
//! of its two locations), then the lowest vehicle, then the earliest
//! position. Units that fit nowhere are left out when they are optional; a
//! mandatory unit that fits nowhere makes the instance infeasible.
//!
//! A `stop` request ends construction between two units. Units not placed
//! by then are left out under the same rule.
//!
//! # Complexity
//!
//! O(U² × V × n² × n) for U units, V vehicles and routes of n stops (pairs
//! try O(n²) position combinations, each checked in O(n)).
//!
//! # Reference
//!
//! Solomon, M.M. (1987). "Algorithms for the Vehicle Routing and Scheduling
//! Problems with Time Window Constraints", *Operations Research* 35(2), 254-265.

use crate::evaluation::RouteEvaluator;
use crate::routing::{RoutingModel, Unit};

/// A candidate placement of one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Insertion {
    pub(crate) vehicle: usize,
    pub(crate) route: Vec<usize>,
    pub(crate) delta: i64,
}

/// Returns `route` with `unit` inserted.
///
/// A single index goes before position `first`. For a pair, the pickup goes
/// before position `first` and the delivery before position `second` of the
/// original route (`first <= second`).
pub(crate) fn insert_unit(route: &[usize], unit: Unit, first: usize, second: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(route.len() + 2);
    match unit {
        Unit::Single(i) => {
            out.extend_from_slice(&route[..first]);
            out.push(i);
            out.extend_from_slice(&route[first..]);
        }
        Unit::Pair(p, d) => {
            out.extend_from_slice(&route[..first]);
            out.push(p);
            out.extend_from_slice(&route[first..second]);
            out.push(d);
            out.extend_from_slice(&route[second..]);
        }
    }
    out
}

/// Cheapest feasible placement of `unit` into any of `routes`.
///
/// Only placements strictly cheaper than `bound` (if given) are considered.
pub(crate) fn best_insertion(
    eval: &RouteEvaluator<'_>,
    routes: &[Vec<usize>],
    unit: Unit,
    bound: Option<i64>,
) -> Option<Insertion> {
    let model = eval.model();
    let indices = unit.indices();
    let mut best: Option<Insertion> = None;

    for (v, route) in routes.iter().enumerate() {
        if !indices.iter().all(|&i| model.is_vehicle_allowed(v, i)) {
            continue;
        }
        let base = eval.route_cost(v, route);
        let len = route.len();
        let seconds = |first: usize| match unit {
            Unit::Single(_) => first..first + 1,
            Unit::Pair(..) => first..len + 1,
        };
        for first in 0..=len {
            for second in seconds(first) {
                let candidate = insert_unit(route, unit, first, second);
                let delta = eval.route_cost(v, &candidate) - base;
                let limit = best.as_ref().map(|b| b.delta).or(bound);
                if limit.is_some_and(|l| delta >= l) {
                    continue;
                }
                if eval.is_feasible(v, &candidate) {
                    best = Some(Insertion {
                        vehicle: v,
                        route: candidate,
                        delta,
                    });
                }
            }
        }
    }
    best
}

/// Inserts `pending` units into `routes` by parallel cheapest insertion.
///
/// Returns the units that could not be placed, or `None` when one of them is
/// mandatory.
pub(crate) fn insert_all(
    eval: &RouteEvaluator<'_>,
    routes: &mut [Vec<usize>],
    mut pending: Vec<Unit>,
    stop: &dyn Fn() -> bool,
) -> Option<Vec<Unit>> {
    let model = eval.model();
    let manager = model.manager();
    let mut performed = vec![false; model.num_indices()];
    for &i in routes.iter().flatten() {
        performed[i] = true;
    }
    pending.sort_by_key(|u| {
        u.indices()
            .into_iter()
            .map(|i| manager.index_to_location(i))
            .min()
    });
    'insert: while !pending.is_empty() {
        let mut best: Option<(usize, Insertion)> = None;
        for (k, &unit) in pending.iter().enumerate() {
            if stop() {
                break 'insert;
            }
            if is_blocked(model, unit, &performed) {
                continue;
            }
            let bound = best.as_ref().map(|(_, b)| b.delta);
            if let Some(ins) = best_insertion(eval, routes, unit, bound) {
                best = Some((k, ins));
            }
        }
        match best {
            Some((k, ins)) => {
                for i in pending.remove(k).indices() {
                    performed[i] = true;
                }
                routes[ins.vehicle] = ins.route;
            }
            None => break,
        }
    }
    if pending.iter().any(|&u| !model.is_droppable(u)) {
        return None;
    }
    Some(pending)
}

/// Returns `true` if visiting `unit` would put a second visited member
/// into one of its disjunctions.
fn is_blocked(model: &RoutingModel, unit: Unit, performed: &[bool]) -> bool {
    let indices = unit.indices();
    indices.iter().enumerate().any(|(k, &i)| {
        model.disjunction_of(i).is_some_and(|d| {
            model.disjunctions()[d]
                .indices()
                .iter()
                .any(|&j| performed[j] || (j != i && indices[k + 1..].contains(&j)))
        })
    })
}

/// Builds initial routes by parallel cheapest insertion.
///
/// Returns one route per vehicle (interior indices only), or `None` if a
/// mandatory location cannot be served. Once `stop` returns `true` the
/// remaining optional units are left unvisited.
///
/// # Examples
///
/// ```
/// use u_pdptw::constructive::cheapest_insertion;
/// use u_pdptw::evaluation::RouteEvaluator;
/// use u_pdptw::index::IndexManager;
/// use u_pdptw::routing::RoutingModel;
///
/// let manager = IndexManager::new(4, 2, &[0, 0], &[0, 0]).unwrap();
/// let mut model = RoutingModel::new(manager.clone());
/// let m = manager.clone();
/// let cb = model.register_transit_callback(move |i, j| {
///     (m.index_to_location(i) as i64 - m.index_to_location(j) as i64).abs()
/// });
/// model.set_arc_cost_evaluator_of_all_vehicles(cb).unwrap();
/// model.close().unwrap();
///
/// let eval = RouteEvaluator::new(&model);
/// let routes = cheapest_insertion(&eval, &|| false).unwrap();
/// assert_eq!(routes.len(), 2);
/// assert_eq!(routes.iter().map(Vec::len).sum::<usize>(), 3);
/// ```
pub fn cheapest_insertion(
    eval: &RouteEvaluator<'_>,
    stop: &dyn Fn() -> bool,
) -> Option<Vec<Vec<usize>>> {
    let model = eval.model();
    let mut routes = vec![Vec::new(); model.num_vehicles()];
    insert_all(eval, &mut routes, model.units().to_vec(), stop)?;
    Some(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexManager;

    /// Line 0..5, depot 0, travel = distance, horizon 100.
    fn line(vehicles: usize) -> (IndexManager, RoutingModel) {
        let manager = IndexManager::new(5, vehicles, &vec![0; vehicles], &vec![0; vehicles])
            .expect("valid");
        let mut model = RoutingModel::new(manager.clone());
        let m = manager.clone();
        let cb = model.register_transit_callback(move |i, j| {
            (m.index_to_location(i) as i64 - m.index_to_location(j) as i64).abs()
        });
        model
            .set_arc_cost_evaluator_of_all_vehicles(cb)
            .expect("valid");
        model.add_dimension(cb, 0, 100, true, "Time").expect("valid");
        (manager, model)
    }

    #[test]
    fn test_insert_unit_positions() {
        assert_eq!(insert_unit(&[1, 2], Unit::Single(9), 1, 1), vec![1, 9, 2]);
        assert_eq!(insert_unit(&[1, 2], Unit::Pair(8, 9), 0, 2), vec![8, 1, 2, 9]);
        assert_eq!(insert_unit(&[], Unit::Pair(8, 9), 0, 0), vec![8, 9]);
    }

    #[test]
    fn test_all_on_one_line_route() {
        let (manager, mut model) = line(1);
        model.close().expect("closes");
        let eval = RouteEvaluator::new(&model);
        let routes = cheapest_insertion(&eval, &|| false).expect("feasible");
        let locs: Vec<usize> = routes[0]
            .iter()
            .map(|&i| manager.index_to_location(i))
            .collect();
        // any order visiting 1..4 monotonically costs 8
        assert_eq!(eval.route_cost(0, &routes[0]), 8);
        assert_eq!(locs.len(), 4);
    }

    #[test]
    fn test_pair_inserted_together_in_order() {
        let (manager, mut model) = line(2);
        let p = manager.location_to_index(3).expect("p");
        let d = manager.location_to_index(1).expect("d");
        model.add_pickup_and_delivery(p, d).expect("valid");
        model.close().expect("closes");
        let eval = RouteEvaluator::new(&model);
        let routes = cheapest_insertion(&eval, &|| false).expect("feasible");
        let holder = routes
            .iter()
            .position(|r| r.contains(&p))
            .expect("pickup placed");
        let r = &routes[holder];
        let pp = r.iter().position(|&i| i == p).expect("p");
        let dp = r.iter().position(|&i| i == d).expect("d on same route");
        assert!(pp < dp);
    }

    #[test]
    fn test_ties_prefer_lowest_vehicle() {
        let (_, mut model) = line(3);
        model.close().expect("closes");
        let eval = RouteEvaluator::new(&model);
        let routes = cheapest_insertion(&eval, &|| false).expect("feasible");
        assert!(!routes[0].is_empty());
        assert!(routes[1].is_empty() && routes[2].is_empty());
    }

    #[test]
    fn test_optional_unit_left_out() {
        let (manager, mut model) = line(1);
        let far = manager.location_to_index(4).expect("far");
        model
            .dimension_mut("Time")
            .expect("time")
            .set_cumul_range(far, 0, 1)
            .expect("valid");
        model.add_disjunction(&[far], 1000).expect("valid");
        model.close().expect("closes");
        let eval = RouteEvaluator::new(&model);
        let routes = cheapest_insertion(&eval, &|| false).expect("feasible");
        assert!(!routes[0].contains(&far));
        assert_eq!(routes[0].len(), 3);
    }

    #[test]
    fn test_mandatory_unit_unplaceable() {
        let (manager, mut model) = line(1);
        let far = manager.location_to_index(4).expect("far");
        model
            .dimension_mut("Time")
            .expect("time")
            .set_cumul_range(far, 0, 1)
            .expect("valid");
        model.close().expect("closes");
        let eval = RouteEvaluator::new(&model);
        assert!(cheapest_insertion(&eval, &|| false).is_none());
    }

    #[test]
    fn test_grouped_disjunction_visits_one_member() {
        let (manager, mut model) = line(1);
        let a = manager.location_to_index(3).expect("a");
        let b = manager.location_to_index(4).expect("b");
        model.add_disjunction(&[a, b], 50).expect("valid");
        model.close().expect("closes");
        let eval = RouteEvaluator::new(&model);
        let routes = cheapest_insertion(&eval, &|| false).expect("feasible");
        assert!(routes[0].contains(&a));
        assert!(!routes[0].contains(&b));
    }

    #[test]
    fn test_stop_fails_on_mandatory_units() {
        let (_, mut model) = line(1);
        model.close().expect("closes");
        let eval = RouteEvaluator::new(&model);
        assert!(cheapest_insertion(&eval, &|| true).is_none());
    }

    #[test]
    fn test_stop_leaves_optional_units_out() {
        let (manager, mut model) = line(1);
        for location in 1..5 {
            let i = manager.location_to_index(location).expect("interior");
            model.add_disjunction(&[i], 100).expect("valid");
        }
        model.close().expect("closes");
        let eval = RouteEvaluator::new(&model);
        let polls = std::cell::Cell::new(0);
        let stop = || {
            polls.set(polls.get() + 1);
            polls.get() > 4
        };
        let routes = cheapest_insertion(&eval, &stop).expect("optional units");
        // one full scan of the four units places exactly one of them
        assert_eq!(routes[0].len(), 1);
        assert!(eval.is_feasible(0, &routes[0]));
    }

    #[test]
    fn test_pair_ordered_by_lowest_location() {
        // the pair (4 → 1) and the single stop 2 both cost 6 to insert;
        // the pair counts as location 1 and wins the tie
        let manager = IndexManager::new(5, 1, &[0], &[0]).expect("valid");
        let mut model = RoutingModel::new(manager.clone());
        let m = manager.clone();
        let cb = model.register_transit_callback(move |i, j| {
            let (a, b) = (m.index_to_location(i), m.index_to_location(j));
            if a == b {
                0
            } else if a == 2 || b == 2 {
                3
            } else {
                2
            }
        });
        model
            .set_arc_cost_evaluator_of_all_vehicles(cb)
            .expect("valid");
        let p = manager.location_to_index(4).expect("p");
        let d = manager.location_to_index(1).expect("d");
        model.add_pickup_and_delivery(p, d).expect("valid");
        model.close().expect("closes");
        let eval = RouteEvaluator::new(&model);
        let two = manager.location_to_index(2).expect("two");
        let pending = vec![Unit::Single(two), Unit::Pair(p, d)];
        let mut routes = vec![Vec::new()];
        // stop after the first full scan
        let polls = std::cell::Cell::new(0);
        let stop = || {
            polls.set(polls.get() + 1);
            polls.get() > 2
        };
        assert!(insert_all(&eval, &mut routes, pending, &stop).is_none());
        assert_eq!(routes[0], vec![p, d]);
    }
}
