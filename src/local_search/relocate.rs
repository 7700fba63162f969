//! Relocation of single stops and of pickup/delivery pairs.
//!
//! # Algorithm
//!
//! [`Relocate`] removes one unpaired stop from its route and reinserts it at
//! another position of any route (its own included). [`PairRelocate`] does
//! the same for a pickup and its delivery together, trying every pair of
//! positions with the pickup first. Candidates are enumerated by ascending
//! routing index, then target vehicle, then position; the first one that
//! lowers the augmented cost while keeping both routes feasible wins.
//!
//! # Complexity
//!
//! Relocate: O(n × V × n) candidates. PairRelocate: O(P × V × n²)
//! candidates for P pairs. Each candidate is evaluated in O(n).
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::plan::{Move, MoveContext, MoveOperator, RouteChange};
use crate::constructive::insert_unit;
use crate::routing::Unit;

/// Moves one unpaired stop to a new position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relocate;

impl MoveOperator for Relocate {
    fn name(&self) -> &'static str {
        "relocate"
    }

    fn find_improving(&self, ctx: &MoveContext<'_, '_>) -> Option<Move> {
        let model = ctx.model();
        for i in model.manager().interior_indices() {
            if (ctx.stop)() {
                return None;
            }
            if model.pair_role(i).is_some() {
                continue;
            }
            let Some((from, pos)) = ctx.position(i) else {
                continue;
            };
            let mut rest = ctx.plan.route(from).to_vec();
            rest.remove(pos);

            for to in 0..model.num_vehicles() {
                if !model.is_vehicle_allowed(to, i) {
                    continue;
                }
                let base = if to == from {
                    rest.as_slice()
                } else {
                    ctx.plan.route(to)
                };
                for at in 0..=base.len() {
                    if to == from && at == pos {
                        continue;
                    }
                    let candidate = insert_unit(base, Unit::Single(i), at, at);
                    let changes = if to == from {
                        vec![RouteChange {
                            vehicle: from,
                            route: candidate,
                        }]
                    } else {
                        vec![
                            RouteChange {
                                vehicle: from,
                                route: rest.clone(),
                            },
                            RouteChange {
                                vehicle: to,
                                route: candidate,
                            },
                        ]
                    };
                    if let Some(mv) = ctx.evaluate(changes, 0) {
                        return Some(mv);
                    }
                }
            }
        }
        None
    }
}

/// Moves a pickup and its delivery together.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairRelocate;

impl MoveOperator for PairRelocate {
    fn name(&self) -> &'static str {
        "pair_relocate"
    }

    fn find_improving(&self, ctx: &MoveContext<'_, '_>) -> Option<Move> {
        let model = ctx.model();
        for &unit in model.units() {
            let Unit::Pair(p, d) = unit else {
                continue;
            };
            if (ctx.stop)() {
                return None;
            }
            let Some(from) = ctx.plan.route_of(p) else {
                continue;
            };
            let current = ctx.plan.route(from);
            let rest: Vec<usize> = current
                .iter()
                .copied()
                .filter(|&i| i != p && i != d)
                .collect();

            for to in 0..model.num_vehicles() {
                if !model.is_vehicle_allowed(to, p) || !model.is_vehicle_allowed(to, d) {
                    continue;
                }
                let base = if to == from {
                    rest.as_slice()
                } else {
                    ctx.plan.route(to)
                };
                for first in 0..=base.len() {
                    for second in first..=base.len() {
                        let candidate = insert_unit(base, unit, first, second);
                        if to == from && candidate == current {
                            continue;
                        }
                        let changes = if to == from {
                            vec![RouteChange {
                                vehicle: from,
                                route: candidate,
                            }]
                        } else {
                            vec![
                                RouteChange {
                                    vehicle: from,
                                    route: rest.clone(),
                                },
                                RouteChange {
                                    vehicle: to,
                                    route: candidate,
                                },
                            ]
                        };
                        if let Some(mv) = ctx.evaluate(changes, 0) {
                            return Some(mv);
                        }
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::fixtures::{first_move, line_model, line_model_with_pairs};

    #[test]
    fn test_relocate_within_route() {
        let model = line_model(1, &[]);
        // locations 2, 1, 3, 4: moving 1 to the front saves 2
        let mv = first_move(&model, vec![vec![1, 0, 2, 3]], &Relocate).expect("improves");
        assert_eq!(mv.changes.len(), 1);
        assert_eq!(mv.changes[0].route, vec![0, 1, 2, 3]);
        assert_eq!(mv.objective_delta, -2);
    }

    #[test]
    fn test_relocate_across_routes() {
        let model = line_model(2, &[]);
        // vehicle 0 serves 1 (cost 2), vehicle 1 serves 2, 3, 4 (cost 8);
        // moving 1 onto vehicle 1 frees vehicle 0
        let mv = first_move(&model, vec![vec![0], vec![1, 2, 3]], &Relocate).expect("improves");
        assert_eq!(mv.objective_delta, -2);
        assert_eq!(mv.changes[0].vehicle, 0);
        assert!(mv.changes[0].route.is_empty());
        assert_eq!(mv.changes[1].route, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_relocate_skips_paired_stops() {
        let model = line_model_with_pairs(2, &[], &[(1, 2)]);
        // the pair sits alone on vehicle 1; only a pair move can merge it
        assert!(first_move(&model, vec![vec![2, 3], vec![0, 1]], &Relocate).is_none());
        let mv = first_move(&model, vec![vec![2, 3], vec![0, 1]], &PairRelocate).expect("improves");
        assert_eq!(mv.objective_delta, -4);
        assert_eq!(mv.changes[0].route, Vec::<usize>::new());
        assert_eq!(mv.changes[1].route, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_pair_relocate_keeps_order() {
        let model = line_model_with_pairs(1, &[], &[(4, 1)]);
        // 4, 2, 3, 1 → 2, 4, 3, 1 saves 2 and keeps the pickup first
        let mv = first_move(&model, vec![vec![3, 1, 2, 0]], &PairRelocate).expect("improves");
        assert_eq!(mv.objective_delta, -2);
        assert_eq!(mv.changes[0].route, vec![1, 3, 2, 0]);
    }
}
