//! Location and time window types.

use serde::{Deserialize, Serialize};

/// An arrival time window at a location.
///
/// A vehicle may arrive as early as `earliest` and no later than `latest`;
/// waiting before the window opens is allowed (bounded by the Time slack).
///
/// # Examples
///
/// ```
/// use u_pdptw::models::TimeWindow;
///
/// let tw = TimeWindow::new(7, 12).unwrap();
/// assert!(tw.contains(7));
/// assert!(tw.contains(12));
/// assert!(!tw.contains(13));
/// assert!(TimeWindow::new(5, 4).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    earliest: i64,
    latest: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `earliest > latest`.
    pub fn new(earliest: i64, latest: i64) -> Option<Self> {
        if earliest > latest {
            return None;
        }
        Some(Self { earliest, latest })
    }

    /// A window that never constrains arrival.
    pub fn unbounded() -> Self {
        Self {
            earliest: 0,
            latest: i64::MAX,
        }
    }

    /// Earliest allowable arrival time.
    pub fn earliest(&self) -> i64 {
        self.earliest
    }

    /// Latest allowable arrival time.
    pub fn latest(&self) -> i64 {
        self.latest
    }

    /// Returns `true` if the given time falls within this window (inclusive).
    pub fn contains(&self, time: i64) -> bool {
        time >= self.earliest && time <= self.latest
    }

    /// Waiting time when arriving at `arrival`; zero once the window is open.
    pub fn waiting_time(&self, arrival: i64) -> i64 {
        (self.earliest - arrival).max(0)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A stop in a routing problem, depots included.
///
/// Demand is signed: pickups load the vehicle (positive), deliveries unload
/// it (negative), depots carry zero.
///
/// # Examples
///
/// ```
/// use u_pdptw::models::{Location, TimeWindow};
///
/// let depot = Location::depot(0);
/// assert_eq!(depot.demand(), 0);
///
/// let pickup = Location::new(5, 1).with_time_window(TimeWindow::new(0, 5).unwrap());
/// assert!(pickup.is_pickup());
/// assert_eq!(pickup.time_window().latest(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    id: usize,
    demand: i64,
    #[serde(default)]
    time_window: TimeWindow,
}

impl Location {
    /// Creates a location with the given id and signed demand.
    pub fn new(id: usize, demand: i64) -> Self {
        Self {
            id,
            demand,
            time_window: TimeWindow::unbounded(),
        }
    }

    /// Creates a depot location (zero demand).
    pub fn depot(id: usize) -> Self {
        Self::new(id, 0)
    }

    /// Sets the arrival time window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = tw;
        self
    }

    /// Location id (its row in the transit matrix).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Signed demand.
    pub fn demand(&self) -> i64 {
        self.demand
    }

    /// Arrival time window.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Returns `true` if this location loads goods.
    pub fn is_pickup(&self) -> bool {
        self.demand > 0
    }

    /// Returns `true` if this location unloads goods.
    pub fn is_delivery(&self) -> bool {
        self.demand < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.earliest(), 10);
        assert_eq!(tw.latest(), 20);
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20, 10).is_none());
    }

    #[test]
    fn test_time_window_point() {
        let tw = TimeWindow::new(7, 7).expect("valid");
        assert!(tw.contains(7));
        assert!(!tw.contains(6));
        assert!(!tw.contains(8));
    }

    #[test]
    fn test_time_window_waiting() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.waiting_time(4), 6);
        assert_eq!(tw.waiting_time(10), 0);
        assert_eq!(tw.waiting_time(15), 0);
    }

    #[test]
    fn test_unbounded_default() {
        let tw = TimeWindow::default();
        assert!(tw.contains(0));
        assert!(tw.contains(1_000_000));
    }

    #[test]
    fn test_location_roles() {
        assert!(Location::new(1, 3).is_pickup());
        assert!(Location::new(2, -3).is_delivery());
        let depot = Location::depot(0);
        assert!(!depot.is_pickup());
        assert!(!depot.is_delivery());
    }

    #[test]
    fn test_location_deserialize_without_window() {
        let loc: Location = serde_json::from_str(r#"{"id":3,"demand":-1}"#).expect("json");
        assert_eq!(loc.id(), 3);
        assert_eq!(loc.demand(), -1);
        assert_eq!(*loc.time_window(), TimeWindow::unbounded());
    }
}
