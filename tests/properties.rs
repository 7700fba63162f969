mod common;

use std::time::Duration;

use proptest::prelude::*;

use common::assert_report_consistent;
use u_pdptw::distance::TransitMatrix;
use u_pdptw::models::{Location, ProblemData, TimeWindow, Vehicle};
use u_pdptw::search::{FirstSolutionStrategy, LocalSearchMetaheuristic, SearchParameters};
use u_pdptw::solver::CpdptwSolver;

prop_compose! {
    /// Small instances on a grid with Manhattan travel times, up to two
    /// pickup/delivery pairs and an optional eligibility restriction.
    fn small_instance()
    (
        n in 4usize..9,
        vehicles in 1usize..4,
    )
    (
        points in prop::collection::vec((0i64..15, 0i64..15), n),
        windows in prop::collection::vec((0i64..30, 5i64..60), n),
        quantities in prop::collection::vec(1i64..4, 2),
        capacities in prop::collection::vec(0i64..6, vehicles),
        restricted in prop::option::of((1..n, 0..vehicles)),
        n in Just(n),
    ) -> ProblemData {
        let rows = points
            .iter()
            .map(|a| points.iter().map(|b| (a.0 - b.0).abs() + (a.1 - b.1).abs()).collect())
            .collect();
        let matrix = TransitMatrix::from_rows(rows).expect("square");

        let mut demands = vec![0i64; n];
        let mut pairs = Vec::new();
        for (k, &q) in quantities.iter().enumerate() {
            let (p, d) = (1 + 2 * k, 2 + 2 * k);
            if d < n {
                demands[p] = q;
                demands[d] = -q;
                pairs.push((p, d));
            }
        }
        let locations = (0..n)
            .map(|id| {
                let (open, width) = windows[id];
                Location::new(id, demands[id])
                    .with_time_window(TimeWindow::new(open, open + width).expect("valid"))
            })
            .collect();
        let fleet = capacities
            .iter()
            .enumerate()
            .map(|(id, &c)| Vehicle::new(id, c))
            .collect();

        let mut data = ProblemData::new(matrix, locations, fleet).with_max_waiting(20);
        for (p, d) in pairs {
            data = data.with_pair(p, d);
        }
        if let Some((location, vehicle)) = restricted {
            data = data.with_allowed_vehicles(location, vec![vehicle]);
        }
        data
    }
}

fn strategy() -> impl Strategy<Value = FirstSolutionStrategy> {
    prop_oneof![
        Just(FirstSolutionStrategy::CheapestInsertion),
        Just(FirstSolutionStrategy::PathCheapestArc),
    ]
}

fn metaheuristic() -> impl Strategy<Value = LocalSearchMetaheuristic> {
    prop_oneof![
        Just(LocalSearchMetaheuristic::GuidedLocalSearch),
        Just(LocalSearchMetaheuristic::GreedyDescent),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn solutions_respect_every_hard_constraint(
        data in small_instance(),
        first in strategy(),
        meta in metaheuristic(),
        max_tracked in 1usize..20,
    ) {
        let params = SearchParameters::default()
            .with_time_limit(Duration::from_secs(2))
            .with_first_solution_strategy(first)
            .with_metaheuristic(meta)
            .with_max_stale_rounds(8);
        let report = CpdptwSolver::new(&data)
            .expect("valid instance")
            .with_max_tracked_solutions(max_tracked)
            .solve(&params)
            .expect("closed model");

        // every stop is optional, so a solution always exists
        assert_report_consistent(&data, &report);
        prop_assert!(report.objective_trace.len() <= max_tracked);
        prop_assert_eq!(report.objective_trace.last().copied(), report.objective);
    }

    #[test]
    fn objective_never_exceeds_dropping_everything(data in small_instance()) {
        let params = SearchParameters::default()
            .with_time_limit(Duration::from_secs(2))
            .with_max_stale_rounds(5);
        let report = CpdptwSolver::new(&data)
            .expect("valid instance")
            .solve(&params)
            .expect("closed model");
        let stops = (0..data.locations().len()).filter(|&l| !data.is_depot(l)).count() as i64;
        let all_dropped = stops * data.drop_penalty().unwrap_or(0);
        prop_assert!(report.objective.expect("solution") <= all_dropped);
    }
}
