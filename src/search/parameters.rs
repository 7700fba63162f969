//! Search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Heuristic building the first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FirstSolutionStrategy {
    /// Parallel cheapest insertion; ties broken by lowest location, then
    /// lowest vehicle.
    #[default]
    CheapestInsertion,
    /// Extend each vehicle's path by its cheapest feasible arc.
    PathCheapestArc,
}

/// Acceptance scheme of the improvement phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocalSearchMetaheuristic {
    /// Guided Local Search: penalize arcs of local optima and keep going.
    #[default]
    GuidedLocalSearch,
    /// Plain first-improvement descent; stops at the first local optimum.
    GreedyDescent,
}

/// Limits and strategies of one search run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pdptw::search::{FirstSolutionStrategy, SearchParameters};
///
/// let params = SearchParameters::default()
///     .with_time_limit(Duration::from_secs(5))
///     .with_solution_limit(100)
///     .with_first_solution_strategy(FirstSolutionStrategy::PathCheapestArc);
/// assert_eq!(params.solution_limit, Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    /// Wall-clock budget; `None` means unbounded.
    pub time_limit: Option<Duration>,
    /// Maximum number of solutions reported to callbacks.
    pub solution_limit: Option<usize>,
    /// Construction heuristic.
    pub first_solution_strategy: FirstSolutionStrategy,
    /// Improvement scheme.
    pub local_search_metaheuristic: LocalSearchMetaheuristic,
    /// GLS penalty weight as a fraction of the average arc cost of the
    /// first local optimum.
    pub gls_lambda_coefficient: f64,
    /// GLS stops after this many local optima in a row without a new best.
    pub max_stale_rounds: usize,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            time_limit: None,
            solution_limit: None,
            first_solution_strategy: FirstSolutionStrategy::default(),
            local_search_metaheuristic: LocalSearchMetaheuristic::default(),
            gls_lambda_coefficient: 0.1,
            max_stale_rounds: 30,
        }
    }
}

impl SearchParameters {
    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the maximum number of reported solutions.
    pub fn with_solution_limit(mut self, limit: usize) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    /// Sets the construction heuristic.
    pub fn with_first_solution_strategy(mut self, strategy: FirstSolutionStrategy) -> Self {
        self.first_solution_strategy = strategy;
        self
    }

    /// Sets the improvement scheme.
    pub fn with_metaheuristic(mut self, metaheuristic: LocalSearchMetaheuristic) -> Self {
        self.local_search_metaheuristic = metaheuristic;
        self
    }

    /// Sets the GLS lambda coefficient.
    pub fn with_gls_lambda_coefficient(mut self, coefficient: f64) -> Self {
        self.gls_lambda_coefficient = coefficient;
        self
    }

    /// Sets the GLS stagnation limit.
    pub fn with_max_stale_rounds(mut self, rounds: usize) -> Self {
        self.max_stale_rounds = rounds;
        self
    }
}
