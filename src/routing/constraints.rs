//! Disjunctions, pickup/delivery pairs and insertion units.

/// A group of indices of which at most one may be visited.
///
/// When no member is visited, `penalty` is added to the objective once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disjunction {
    indices: Vec<usize>,
    penalty: i64,
}

impl Disjunction {
    pub(crate) fn new(indices: Vec<usize>, penalty: i64) -> Self {
        Self { indices, penalty }
    }

    /// Member indices.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Penalty paid when no member is visited.
    pub fn penalty(&self) -> i64 {
        self.penalty
    }
}

/// Role of an index inside a pickup/delivery pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRole {
    /// The index is a pickup; its delivery must follow on the same route.
    Pickup {
        /// Paired delivery index.
        delivery: usize,
    },
    /// The index is a delivery; its pickup must precede it on the same route.
    Delivery {
        /// Paired pickup index.
        pickup: usize,
    },
}

impl PairRole {
    /// The other index of the pair.
    pub fn partner(&self) -> usize {
        match *self {
            PairRole::Pickup { delivery } => delivery,
            PairRole::Delivery { pickup } => pickup,
        }
    }
}

/// A cumul ordering `cumul(before) <= cumul(after)` in one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CumulPrecedence {
    pub(crate) dimension: usize,
    pub(crate) before: usize,
    pub(crate) after: usize,
}

/// The smallest group of indices inserted into or removed from routes together.
///
/// Paired pickups and deliveries always travel as one unit, so a pair is
/// either fully visited or fully dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// An unpaired index.
    Single(usize),
    /// A pickup index and its delivery index.
    Pair(usize, usize),
}

impl Unit {
    /// First index of the unit (the pickup for pairs).
    pub fn head(&self) -> usize {
        match *self {
            Unit::Single(i) | Unit::Pair(i, _) => i,
        }
    }

    /// All indices of the unit.
    pub fn indices(&self) -> Vec<usize> {
        match *self {
            Unit::Single(i) => vec![i],
            Unit::Pair(p, d) => vec![p, d],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_partner() {
        assert_eq!(PairRole::Pickup { delivery: 4 }.partner(), 4);
        assert_eq!(PairRole::Delivery { pickup: 2 }.partner(), 2);
    }

    #[test]
    fn test_unit_indices() {
        assert_eq!(Unit::Single(3).indices(), vec![3]);
        assert_eq!(Unit::Pair(1, 5).indices(), vec![1, 5]);
        assert_eq!(Unit::Pair(1, 5).head(), 1);
    }
}
