//! Inter-route exchange operators: stop swap and tail exchange (2-opt*).
//!
//! # Algorithm
//!
//! [`Exchange`] swaps two unpaired stops, in the same route or in two
//! different routes.
//!
//! [`CrossExchange`] swaps tail segments between two routes. Given
//! R1 = [a₁, ..., aᵢ, aᵢ₊₁, ..., aₙ] and R2 = [b₁, ..., bⱼ, bⱼ₊₁, ..., bₘ]:
//!
//! ```text
//! R1' = [a₁, ..., aᵢ, bⱼ₊₁, ..., bₘ]
//! R2' = [b₁, ..., bⱼ, aᵢ₊₁, ..., aₙ]
//! ```
//!
//! A cut that separates a pickup from its delivery leaves one of the two
//! routes infeasible and is rejected.
//!
//! # Complexity
//!
//! Exchange: O(n²) candidates. CrossExchange: O(n² × V²) candidates. Each
//! candidate is evaluated in O(n).
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use super::plan::{Move, MoveContext, MoveOperator, RouteChange};

/// Swaps the positions of two unpaired stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exchange;

impl MoveOperator for Exchange {
    fn name(&self) -> &'static str {
        "exchange"
    }

    fn find_improving(&self, ctx: &MoveContext<'_, '_>) -> Option<Move> {
        let model = ctx.model();
        let singles: Vec<(usize, usize, usize)> = model
            .manager()
            .interior_indices()
            .filter(|&i| model.pair_role(i).is_none())
            .filter_map(|i| ctx.position(i).map(|(v, pos)| (i, v, pos)))
            .collect();

        for (k, &(a, va, pa)) in singles.iter().enumerate() {
            if (ctx.stop)() {
                return None;
            }
            for &(b, vb, pb) in &singles[k + 1..] {
                let changes = if va == vb {
                    let mut route = ctx.plan.route(va).to_vec();
                    route.swap(pa, pb);
                    vec![RouteChange { vehicle: va, route }]
                } else {
                    if !model.is_vehicle_allowed(vb, a) || !model.is_vehicle_allowed(va, b) {
                        continue;
                    }
                    let mut ra = ctx.plan.route(va).to_vec();
                    let mut rb = ctx.plan.route(vb).to_vec();
                    ra[pa] = b;
                    rb[pb] = a;
                    vec![
                        RouteChange {
                            vehicle: va,
                            route: ra,
                        },
                        RouteChange {
                            vehicle: vb,
                            route: rb,
                        },
                    ]
                };
                if let Some(mv) = ctx.evaluate(changes, 0) {
                    return Some(mv);
                }
            }
        }
        None
    }
}

/// Exchanges the tails of two routes (2-opt*).
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossExchange;

impl MoveOperator for CrossExchange {
    fn name(&self) -> &'static str {
        "cross_exchange"
    }

    fn find_improving(&self, ctx: &MoveContext<'_, '_>) -> Option<Move> {
        let routes = ctx.plan.routes();
        for r1 in 0..routes.len() {
            for r2 in r1 + 1..routes.len() {
                let (a, b) = (&routes[r1], &routes[r2]);
                if a.is_empty() && b.is_empty() {
                    continue;
                }
                for cut1 in 0..=a.len() {
                    if (ctx.stop)() {
                        return None;
                    }
                    for cut2 in 0..=b.len() {
                        if cut1 == a.len() && cut2 == b.len() {
                            continue;
                        }
                        let new1: Vec<usize> = a[..cut1].iter().chain(&b[cut2..]).copied().collect();
                        let new2: Vec<usize> = b[..cut2].iter().chain(&a[cut1..]).copied().collect();
                        let changes = vec![
                            RouteChange {
                                vehicle: r1,
                                route: new1,
                            },
                            RouteChange {
                                vehicle: r2,
                                route: new2,
                            },
                        ];
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
    fn test_exchange_within_route() {
        let model = line_model(1, &[]);
        // locations 1, 3, 2, 4 → swapping 1 and 4 first gives 4, 3, 2, 1
        let mv = first_move(&model, vec![vec![0, 2, 1, 3]], &Exchange).expect("improves");
        assert_eq!(mv.changes[0].route, vec![3, 2, 1, 0]);
        assert_eq!(mv.objective_delta, -2);
    }

    #[test]
    fn test_exchange_across_routes() {
        let model = line_model(2, &[]);
        // vehicle 0: 1, 4 (cost 8); vehicle 1: 2, 3 (cost 6)
        // swapping 1 and 3 gives 3, 4 (cost 8) and 2, 1 (cost 4)
        let mv = first_move(&model, vec![vec![0, 3], vec![1, 2]], &Exchange).expect("improves");
        assert_eq!(mv.objective_delta, -2);
    }

    #[test]
    fn test_cross_exchange_swaps_tails() {
        let model = line_model(2, &[]);
        // vehicle 0: 1, 4 (cost 8); vehicle 1: 2 (cost 4)
        let mv = first_move(&model, vec![vec![0, 3], vec![1]], &CrossExchange).expect("improves");
        assert!(mv.objective_delta < 0);
        let total: usize = mv.changes.iter().map(|c| c.route.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_cross_exchange_never_splits_pairs() {
        let model = line_model_with_pairs(2, &[], &[(1, 4)]);
        // the pair 1 → 4 rides vehicle 0, vehicle 1 serves 2, 3
        let mv = first_move(&model, vec![vec![0, 3], vec![1, 2]], &CrossExchange);
        if let Some(mv) = mv {
            for c in &mv.changes {
                assert_eq!(c.route.contains(&0), c.route.contains(&3));
            }
        }
    }
}
