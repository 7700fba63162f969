//! Shared fixtures and invariant checks for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use u_pdptw::distance::TransitMatrix;
use u_pdptw::models::{Location, ProblemData, TimeWindow, Vehicle};
use u_pdptw::solver::SolveReport;

/// Travel times of the 17-location reference instance.
pub const REFERENCE_MATRIX: [[i64; 17]; 17] = [
    [0, 6, 9, 8, 7, 3, 6, 2, 3, 2, 6, 6, 4, 4, 5, 9, 7],
    [6, 0, 8, 3, 2, 6, 8, 4, 8, 8, 13, 7, 5, 8, 12, 10, 14],
    [9, 8, 0, 11, 10, 6, 3, 9, 5, 8, 4, 15, 14, 13, 9, 18, 9],
    [8, 3, 11, 0, 1, 7, 10, 6, 10, 10, 14, 6, 7, 9, 14, 6, 16],
    [7, 2, 10, 1, 0, 6, 9, 4, 8, 9, 13, 4, 6, 8, 12, 8, 14],
    [3, 6, 6, 7, 6, 0, 2, 3, 2, 2, 7, 9, 7, 7, 6, 12, 8],
    [6, 8, 3, 10, 9, 2, 0, 6, 2, 5, 4, 12, 10, 10, 6, 15, 5],
    [2, 4, 9, 6, 4, 3, 6, 0, 4, 4, 8, 5, 4, 3, 7, 8, 10],
    [3, 8, 5, 10, 8, 2, 2, 4, 0, 3, 4, 9, 8, 7, 3, 13, 6],
    [2, 8, 8, 10, 9, 2, 5, 4, 3, 0, 4, 6, 5, 4, 3, 9, 5],
    [6, 13, 4, 14, 13, 7, 4, 8, 4, 4, 0, 10, 9, 8, 4, 13, 4],
    [6, 7, 15, 6, 4, 9, 12, 5, 9, 6, 10, 0, 1, 3, 7, 3, 10],
    [4, 5, 14, 7, 6, 7, 10, 4, 8, 5, 9, 1, 0, 2, 6, 4, 8],
    [4, 8, 13, 9, 8, 7, 10, 3, 7, 4, 8, 3, 2, 0, 4, 5, 6],
    [5, 12, 9, 14, 12, 6, 6, 7, 3, 3, 4, 7, 6, 4, 0, 9, 2],
    [9, 10, 18, 6, 8, 12, 15, 8, 13, 9, 13, 3, 4, 5, 9, 0, 9],
    [7, 14, 9, 16, 14, 8, 5, 10, 6, 5, 4, 10, 8, 6, 2, 9, 0],
];

/// Arrival windows of the reference instance.
pub const REFERENCE_WINDOWS: [(i64, i64); 17] = [
    (0, 5),
    (7, 12),
    (10, 15),
    (16, 18),
    (10, 13),
    (0, 5),
    (5, 10),
    (0, 4),
    (5, 10),
    (0, 3),
    (10, 16),
    (10, 15),
    (0, 5),
    (5, 10),
    (7, 8),
    (10, 15),
    (11, 15),
];

/// Signed demands of the reference instance.
pub const REFERENCE_DEMANDS: [i64; 17] = [0, 0, -1, 0, 0, 1, 1, 0, 0, 1, -1, 0, 0, 0, -1, 0, 0];

/// Pickup/delivery pairs of the reference instance.
pub const REFERENCE_PAIRS: [(usize, usize); 3] = [(6, 2), (9, 14), (5, 10)];

/// The 17-location, 4-vehicle reference instance.
pub fn reference_instance() -> ProblemData {
    let matrix = TransitMatrix::from_rows(REFERENCE_MATRIX.iter().map(|r| r.to_vec()).collect())
        .expect("square");
    let locations = (0..17)
        .map(|id| {
            let (earliest, latest) = REFERENCE_WINDOWS[id];
            Location::new(id, REFERENCE_DEMANDS[id])
                .with_time_window(TimeWindow::new(earliest, latest).expect("valid window"))
        })
        .collect();
    let vehicles = (0..4).map(|id| Vehicle::new(id, 15)).collect();
    let mut data = ProblemData::new(matrix, locations, vehicles)
        .with_drop_penalty(Some(1000))
        .with_max_waiting(30)
        .with_max_route_duration(360);
    for (p, d) in REFERENCE_PAIRS {
        data = data.with_pair(p, d);
    }
    for location in [0, 2, 5, 6, 9, 10, 14] {
        data = data.with_allowed_vehicles(location, vec![0, 1, 2, 3]);
    }
    data
}

/// Checks every hard constraint and the objective of a report against its
/// instance.
pub fn assert_report_consistent(data: &ProblemData, report: &SolveReport) {
    assert!(report.has_solution(), "no solution: {:?}", report.status);
    let n = data.locations().len();
    let mut served: BTreeMap<usize, (usize, usize, i64)> = BTreeMap::new();
    let mut cost = 0;

    for route in &report.routes {
        let vehicle = &data.vehicles()[route.vehicle];
        let first = route.visits.first().expect("start node");
        assert_eq!(first.location, vehicle.start());
        assert_eq!(first.load, 0);
        assert_eq!(route.end.location, vehicle.end());
        assert!(route.end.slack.is_none());

        let locations: Vec<usize> = route
            .visits
            .iter()
            .map(|r| r.location)
            .chain(std::iter::once(route.end.location))
            .collect();
        if !route.is_empty() {
            cost += locations
                .windows(2)
                .map(|w| data.matrix().get(w[0], w[1]))
                .sum::<i64>();
        }

        for (pos, node) in route.visits.iter().enumerate().skip(1) {
            let loc = &data.locations()[node.location];
            let tw = loc.time_window();
            assert!(
                tw.contains(node.time.min) && tw.contains(node.time.max),
                "location {} arrives {:?} outside {:?}",
                node.location,
                node.time,
                tw
            );
            assert!(node.load >= 0 && node.load <= vehicle.capacity());
            if let Some(allowed) = data.allowed_vehicles().get(&node.location) {
                assert!(allowed.is_empty() || allowed.contains(&route.vehicle));
            }
            let previous = served.insert(node.location, (route.vehicle, pos, node.time.min));
            assert!(previous.is_none(), "location {} visited twice", node.location);
        }
        assert!(route.end.load >= 0 && route.end.load <= vehicle.capacity());
        assert!(route.end.time.min <= data.max_route_duration());
    }

    let dropped: BTreeSet<usize> = report.dropped.iter().copied().collect();
    for location in (0..n).filter(|&l| !data.is_depot(l)) {
        assert_ne!(
            served.contains_key(&location),
            dropped.contains(&location),
            "location {} must be either served or dropped",
            location
        );
    }

    for pair in data.pairs() {
        match (served.get(&pair.pickup), served.get(&pair.delivery)) {
            (Some(p), Some(d)) => {
                assert_eq!(p.0, d.0, "pair served by two vehicles");
                assert!(p.1 < d.1, "delivery before pickup");
                assert!(p.2 <= d.2);
            }
            (None, None) => {}
            _ => panic!("pair {:?} half served", pair),
        }
    }

    let penalty = data.drop_penalty().unwrap_or(0);
    assert_eq!(
        report.objective,
        Some(cost + penalty * report.dropped.len() as i64)
    );
    assert!(report.objective_trace.windows(2).all(|w| w[1] < w[0]));
}
