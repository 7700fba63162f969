//! The routing model builder.

use std::fmt;

use tracing::debug;

use super::constraints::{CumulPrecedence, Disjunction, PairRole, Unit};
use super::dimension::{DimensionId, RoutingDimension};
use crate::error::ModelError;
use crate::index::IndexManager;

type BinaryTransit = Box<dyn Fn(usize, usize) -> i64 + Send + Sync>;
type UnaryTransit = Box<dyn Fn(usize) -> i64 + Send + Sync>;

/// A registered transit function over routing indices.
enum TransitCallback {
    Binary(BinaryTransit),
    Unary(UnaryTransit),
}

impl TransitCallback {
    fn eval(&self, from: usize, to: usize) -> i64 {
        match self {
            TransitCallback::Binary(f) => f(from, to),
            TransitCallback::Unary(f) => f(from),
        }
    }
}

/// Constraint model of a pickup-and-delivery routing problem.
///
/// The model owns every routing variable as a slot in flat arenas indexed by
/// routing index (see [`IndexManager`]). It is assembled with the builder
/// methods below, then [closed](Self::close): closing caches every transit
/// and arc cost into dense matrices and freezes the model for search.
///
/// # Examples
///
/// ```
/// use u_pdptw::index::IndexManager;
/// use u_pdptw::routing::RoutingModel;
///
/// let times = vec![vec![0, 3, 4], vec![3, 0, 2], vec![4, 2, 0]];
/// let manager = IndexManager::new(3, 1, &[0], &[0]).unwrap();
/// let mut model = RoutingModel::new(manager.clone());
///
/// let m = manager.clone();
/// let transit = model.register_transit_callback(move |i, j| {
///     times[m.index_to_location(i)][m.index_to_location(j)]
/// });
/// model.set_arc_cost_evaluator_of_all_vehicles(transit).unwrap();
/// model.add_dimension(transit, 10, 100, false, "Time").unwrap();
///
/// let p = manager.location_to_index(1).unwrap();
/// let d = manager.location_to_index(2).unwrap();
/// model.add_pickup_and_delivery(p, d).unwrap();
/// model.close().unwrap();
/// assert_eq!(model.arc_cost(p, d), 2);
/// ```
pub struct RoutingModel {
    manager: IndexManager,
    callbacks: Vec<TransitCallback>,
    arc_cost_callback: Option<usize>,
    dimensions: Vec<RoutingDimension>,
    disjunctions: Vec<Disjunction>,
    disjunction_of: Vec<Option<usize>>,
    pair_of: Vec<Option<PairRole>>,
    allowed_vehicles: Vec<Option<Vec<bool>>>,
    precedences: Vec<CumulPrecedence>,
    finalizer_vars: Vec<(DimensionId, usize)>,
    closed: bool,
    arc_costs: Vec<i64>,
    transits: Vec<Vec<i64>>,
    units: Vec<Unit>,
}

impl fmt::Debug for RoutingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingModel")
            .field("manager", &self.manager)
            .field("callbacks", &self.callbacks.len())
            .field("dimensions", &self.dimensions)
            .field("disjunctions", &self.disjunctions)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl RoutingModel {
    /// Creates an empty model over the index space of `manager`.
    pub fn new(manager: IndexManager) -> Self {
        let n = manager.num_indices();
        Self {
            manager,
            callbacks: Vec::new(),
            arc_cost_callback: None,
            dimensions: Vec::new(),
            disjunctions: Vec::new(),
            disjunction_of: vec![None; n],
            pair_of: vec![None; n],
            allowed_vehicles: vec![None; n],
            precedences: Vec::new(),
            finalizer_vars: Vec::new(),
            closed: false,
            arc_costs: Vec::new(),
            transits: Vec::new(),
            units: Vec::new(),
        }
    }

    /// The index manager this model was built on.
    pub fn manager(&self) -> &IndexManager {
        &self.manager
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.manager.num_vehicles()
    }

    /// Number of indices carrying a successor (interior + starts).
    pub fn size(&self) -> usize {
        self.manager.size()
    }

    /// Total number of indices (interior + starts + ends).
    pub fn num_indices(&self) -> usize {
        self.manager.num_indices()
    }

    /// Start index of `vehicle`.
    pub fn start(&self, vehicle: usize) -> usize {
        self.manager.start(vehicle)
    }

    /// End index of `vehicle`.
    pub fn end(&self, vehicle: usize) -> usize {
        self.manager.end(vehicle)
    }

    /// Returns `true` if `index` is a vehicle start.
    pub fn is_start(&self, index: usize) -> bool {
        self.manager.is_start(index)
    }

    /// Returns `true` if `index` is a vehicle end.
    pub fn is_end(&self, index: usize) -> bool {
        self.manager.is_end(index)
    }

    /// Returns `true` once [`close`](Self::close) succeeded.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Registers a transit function of `(from_index, to_index)`.
    ///
    /// Returns the callback id used by dimensions and the arc cost evaluator.
    pub fn register_transit_callback<F>(&mut self, callback: F) -> usize
    where
        F: Fn(usize, usize) -> i64 + Send + Sync + 'static,
    {
        self.callbacks
            .push(TransitCallback::Binary(Box::new(callback)));
        self.callbacks.len() - 1
    }

    /// Registers a transit function depending only on the departure index.
    pub fn register_unary_transit_callback<F>(&mut self, callback: F) -> usize
    where
        F: Fn(usize) -> i64 + Send + Sync + 'static,
    {
        self.callbacks.push(TransitCallback::Unary(Box::new(callback)));
        self.callbacks.len() - 1
    }

    /// Uses `callback` as the travel cost of every arc for every vehicle.
    pub fn set_arc_cost_evaluator_of_all_vehicles(
        &mut self,
        callback: usize,
    ) -> Result<(), ModelError> {
        self.ensure_open()?;
        self.check_callback(callback)?;
        self.arc_cost_callback = Some(callback);
        Ok(())
    }

    /// Adds a dimension with the same `capacity` for every vehicle.
    ///
    /// `capacity` bounds every cumul value of the dimension, so for a time
    /// dimension it is the latest time any route may end.
    pub fn add_dimension(
        &mut self,
        callback: usize,
        slack_max: i64,
        capacity: i64,
        fix_start_cumul_to_zero: bool,
        name: &str,
    ) -> Result<DimensionId, ModelError> {
        let capacities = vec![capacity; self.num_vehicles()];
        self.add_dimension_with_vehicle_capacity(
            callback,
            slack_max,
            capacities,
            fix_start_cumul_to_zero,
            name,
        )
    }

    /// Adds a dimension with one capacity per vehicle.
    pub fn add_dimension_with_vehicle_capacity(
        &mut self,
        callback: usize,
        slack_max: i64,
        vehicle_capacities: Vec<i64>,
        fix_start_cumul_to_zero: bool,
        name: &str,
    ) -> Result<DimensionId, ModelError> {
        self.ensure_open()?;
        self.check_callback(callback)?;
        if slack_max < 0 {
            return Err(ModelError::NegativeLimit {
                what: "slack_max",
                value: slack_max,
            });
        }
        if vehicle_capacities.len() != self.num_vehicles() {
            return Err(ModelError::CapacityCountMismatch {
                expected: self.num_vehicles(),
                actual: vehicle_capacities.len(),
            });
        }
        if let Some((vehicle, &capacity)) = vehicle_capacities
            .iter()
            .enumerate()
            .find(|(_, &c)| c < 0)
        {
            return Err(ModelError::NegativeCapacity { vehicle, capacity });
        }
        if self.dimension(name).is_some() {
            return Err(ModelError::DuplicateDimension(name.to_string()));
        }
        let id = DimensionId(self.dimensions.len());
        self.dimensions.push(RoutingDimension::new(
            id,
            name.to_string(),
            callback,
            slack_max,
            vehicle_capacities,
            fix_start_cumul_to_zero,
            self.num_indices(),
            self.size(),
        ));
        Ok(id)
    }

    /// Looks up a dimension by name.
    pub fn dimension(&self, name: &str) -> Option<&RoutingDimension> {
        self.dimensions.iter().find(|d| d.name() == name)
    }

    /// Looks up a dimension by name, failing with [`ModelError::UnknownDimension`].
    pub fn dimension_or_err(&self, name: &str) -> Result<&RoutingDimension, ModelError> {
        self.dimension(name)
            .ok_or_else(|| ModelError::UnknownDimension(name.to_string()))
    }

    /// Mutable access to a dimension while the model is open.
    pub fn dimension_mut(&mut self, name: &str) -> Result<&mut RoutingDimension, ModelError> {
        self.ensure_open()?;
        self.dimensions
            .iter_mut()
            .find(|d| d.name() == name)
            .ok_or_else(|| ModelError::UnknownDimension(name.to_string()))
    }

    /// All dimensions in registration order.
    pub fn dimensions(&self) -> &[RoutingDimension] {
        &self.dimensions
    }

    /// Makes the given interior indices optional: at most one of them is
    /// visited, and `penalty` is paid when none is.
    ///
    /// Indices outside any disjunction must be visited.
    pub fn add_disjunction(&mut self, indices: &[usize], penalty: i64) -> Result<usize, ModelError> {
        self.ensure_open()?;
        if indices.is_empty() {
            return Err(ModelError::EmptyDisjunction);
        }
        if penalty < 0 {
            return Err(ModelError::NegativePenalty(penalty));
        }
        for &i in indices {
            self.check_interior(i)?;
            if self.disjunction_of[i].is_some() || indices.iter().filter(|&&j| j == i).count() > 1
            {
                return Err(ModelError::DuplicateDisjunction(i));
            }
        }
        let id = self.disjunctions.len();
        for &i in indices {
            self.disjunction_of[i] = Some(id);
        }
        self.disjunctions
            .push(Disjunction::new(indices.to_vec(), penalty));
        Ok(id)
    }

    /// All disjunctions in registration order.
    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    /// Disjunction containing `index`, if any.
    pub fn disjunction_of(&self, index: usize) -> Option<usize> {
        self.disjunction_of.get(index).copied().flatten()
    }

    /// Couples a pickup and a delivery: both are served by the same vehicle,
    /// the pickup is visited before the delivery, and they are dropped
    /// together or not at all.
    pub fn add_pickup_and_delivery(&mut self, pickup: usize, delivery: usize) -> Result<(), ModelError> {
        self.ensure_open()?;
        self.check_interior(pickup)?;
        self.check_interior(delivery)?;
        if pickup == delivery || self.pair_of[pickup].is_some() || self.pair_of[delivery].is_some()
        {
            return Err(ModelError::InvalidPair { pickup, delivery });
        }
        self.pair_of[pickup] = Some(PairRole::Pickup { delivery });
        self.pair_of[delivery] = Some(PairRole::Delivery { pickup });
        Ok(())
    }

    /// Pair role of `index`, if it belongs to a pickup/delivery pair.
    pub fn pair_role(&self, index: usize) -> Option<PairRole> {
        self.pair_of.get(index).copied().flatten()
    }

    /// Requires `cumul(before) <= cumul(after)` in the named dimension.
    ///
    /// Both indices must form a pickup/delivery pair, which keeps them on the
    /// same route.
    pub fn add_cumul_less_or_equal(
        &mut self,
        dimension: &str,
        before: usize,
        after: usize,
    ) -> Result<(), ModelError> {
        self.ensure_open()?;
        let dim = self.dimension_or_err(dimension)?.id();
        self.check_index(before)?;
        self.check_index(after)?;
        if self.pair_role(before).map(|r| r.partner()) != Some(after) {
            return Err(ModelError::InvalidPair {
                pickup: before,
                delivery: after,
            });
        }
        self.precedences.push(CumulPrecedence {
            dimension: dim.get(),
            before,
            after,
        });
        Ok(())
    }

    /// Restricts the vehicles allowed to visit `index`.
    ///
    /// An empty list, or a list naming every vehicle, adds no constraint.
    pub fn set_allowed_vehicles_for_index(
        &mut self,
        vehicles: &[usize],
        index: usize,
    ) -> Result<(), ModelError> {
        self.ensure_open()?;
        self.check_interior(index)?;
        let num_vehicles = self.num_vehicles();
        let mut allowed = vec![false; num_vehicles];
        for &v in vehicles {
            if v >= num_vehicles {
                return Err(ModelError::VehicleOutOfRange {
                    vehicle: v,
                    num_vehicles,
                });
            }
            allowed[v] = true;
        }
        self.allowed_vehicles[index] = if vehicles.is_empty() || allowed.iter().all(|&a| a) {
            None
        } else {
            Some(allowed)
        };
        Ok(())
    }

    /// Returns `true` if `vehicle` may visit `index`.
    pub fn is_vehicle_allowed(&self, vehicle: usize, index: usize) -> bool {
        match &self.allowed_vehicles[index] {
            Some(allowed) => allowed[vehicle],
            None => true,
        }
    }

    /// Asks the search to realize the cumul of `index` at its smallest
    /// feasible value once routes are fixed.
    ///
    /// Variables are minimized in registration order.
    pub fn add_variable_minimized_by_finalizer(
        &mut self,
        dimension: &str,
        index: usize,
    ) -> Result<(), ModelError> {
        self.ensure_open()?;
        let dim = self.dimension_or_err(dimension)?.id();
        self.check_index(index)?;
        self.finalizer_vars.push((dim, index));
        Ok(())
    }

    /// Cumul variables minimized by the finalizer, in order.
    pub fn finalizer_vars(&self) -> &[(DimensionId, usize)] {
        &self.finalizer_vars
    }

    pub(crate) fn precedences(&self) -> &[CumulPrecedence] {
        &self.precedences
    }

    /// Freezes the model and caches all transit values.
    ///
    /// Calling `close` on a closed model is a no-op.
    pub fn close(&mut self) -> Result<(), ModelError> {
        if self.closed {
            return Ok(());
        }
        let cost_cb = self.arc_cost_callback.ok_or(ModelError::MissingArcCost)?;
        let n = self.num_indices();

        self.arc_costs = self.tabulate(cost_cb);
        self.transits = self
            .dimensions
            .iter()
            .map(|d| d.transit_callback())
            .collect::<Vec<_>>()
            .into_iter()
            .map(|cb| self.tabulate(cb))
            .collect();

        self.units = self
            .manager
            .interior_indices()
            .filter_map(|i| match self.pair_of[i] {
                None => Some(Unit::Single(i)),
                Some(PairRole::Pickup { delivery }) => Some(Unit::Pair(i, delivery)),
                Some(PairRole::Delivery { .. }) => None,
            })
            .collect();

        self.closed = true;
        debug!(
            indices = n,
            vehicles = self.num_vehicles(),
            dimensions = self.dimensions.len(),
            disjunctions = self.disjunctions.len(),
            units = self.units.len(),
            "routing model closed"
        );
        Ok(())
    }

    /// Arc cost from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if the model is not closed or an index is out of range.
    pub fn arc_cost(&self, from: usize, to: usize) -> i64 {
        self.arc_costs[from * self.num_indices() + to]
    }

    /// Transit of dimension `dimension` from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if the model is not closed or an index is out of range.
    pub fn transit(&self, dimension: DimensionId, from: usize, to: usize) -> i64 {
        self.transits[dimension.get()][from * self.num_indices() + to]
    }

    /// Insertion units in ascending order of their head location.
    ///
    /// Empty until the model is closed.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// The unit containing interior `index`.
    pub fn unit_of(&self, index: usize) -> Unit {
        match self.pair_of[index] {
            None => Unit::Single(index),
            Some(PairRole::Pickup { delivery }) => Unit::Pair(index, delivery),
            Some(PairRole::Delivery { pickup }) => Unit::Pair(pickup, index),
        }
    }

    /// Returns `true` if every index of `unit` belongs to a disjunction.
    pub fn is_droppable(&self, unit: Unit) -> bool {
        unit.indices()
            .iter()
            .all(|&i| self.disjunction_of[i].is_some())
    }

    fn tabulate(&self, callback: usize) -> Vec<i64> {
        let n = self.num_indices();
        let cb = &self.callbacks[callback];
        let mut values = Vec::with_capacity(n * n);
        for from in 0..n {
            for to in 0..n {
                values.push(cb.eval(from, to));
            }
        }
        values
    }

    fn ensure_open(&self) -> Result<(), ModelError> {
        if self.closed {
            Err(ModelError::ModelClosed)
        } else {
            Ok(())
        }
    }

    fn check_callback(&self, callback: usize) -> Result<(), ModelError> {
        if callback < self.callbacks.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownCallback(callback))
        }
    }

    fn check_index(&self, index: usize) -> Result<(), ModelError> {
        if index < self.num_indices() {
            Ok(())
        } else {
            Err(ModelError::IndexOutOfRange {
                index,
                num_indices: self.num_indices(),
            })
        }
    }

    fn check_interior(&self, index: usize) -> Result<(), ModelError> {
        self.check_index(index)?;
        if index < self.manager.num_interior() {
            Ok(())
        } else {
            Err(ModelError::NotInterior(index))
        }
    }
}
