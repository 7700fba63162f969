//! Reporting view of solutions.
//!
//! - [`SolutionExtractor`] — Walks each vehicle's path and reads cumul and slack bounds
//! - [`RouteRecord`] / [`NodeRecord`] — Per-route and per-stop records
//! - [`SolutionReport`] — Records, dropped locations and totals in one value

mod extractor;

pub use extractor::{NodeRecord, RouteRecord, SolutionExtractor, SolutionReport};
