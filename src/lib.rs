//! # u-pdptw
//!
//! Capacitated pickup-and-delivery routing with time windows (CPDPTW):
//! a routing model with cumulative dimensions, construction heuristics, and
//! first-improvement local search under Guided Local Search.
//!
//! ## Modules
//!
//! - [`models`] — Instance data (Location, TimeWindow, Vehicle, PickupDeliveryPair, ProblemData)
//! - [`distance`] — Transit matrix
//! - [`index`] — Location ⇄ routing index mapping with per-vehicle start/end indices
//! - [`routing`] — Routing model builder, dimensions, disjunctions and assignments
//! - [`evaluation`] — Dimension propagation, route feasibility and cost
//! - [`constructive`] — First-solution heuristics (cheapest insertion, path cheapest arc)
//! - [`local_search`] — Route plan and move operators (2-opt, or-opt, relocate, exchange, ...)
//! - [`search`] — Search engine, Guided Local Search, limits, callbacks, cancellation
//! - [`extract`] — Route records, dropped locations and totals from a solution
//! - [`solver`] — Instance-to-report orchestration
//!
//! ## Example
//!
//! ```
//! use u_pdptw::distance::TransitMatrix;
//! use u_pdptw::models::{Location, ProblemData, TimeWindow, Vehicle};
//! use u_pdptw::search::SearchParameters;
//! use u_pdptw::solver::solve;
//!
//! let matrix = TransitMatrix::from_rows(vec![
//!     vec![0, 3, 5, 4],
//!     vec![3, 0, 2, 6],
//!     vec![5, 2, 0, 3],
//!     vec![4, 6, 3, 0],
//! ])
//! .unwrap();
//! let locations = vec![
//!     Location::depot(0),
//!     Location::new(1, 1).with_time_window(TimeWindow::new(0, 10).unwrap()),
//!     Location::new(2, -1).with_time_window(TimeWindow::new(0, 20).unwrap()),
//!     Location::new(3, 0),
//! ];
//! let vehicles = vec![Vehicle::new(0, 5), Vehicle::new(1, 5)];
//! let data = ProblemData::new(matrix, locations, vehicles).with_pair(1, 2);
//!
//! let report = solve(&data, &SearchParameters::default()).unwrap();
//! assert!(report.has_solution());
//! assert!(report.dropped.is_empty());
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod extract;
pub mod index;
pub mod local_search;
pub mod models;
pub mod routing;
pub mod search;
pub mod solver;

pub use error::ModelError;
