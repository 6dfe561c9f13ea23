//! Elimination GA configuration.
//!
//! [`EliminationConfig`] holds all parameters that control a run. It is an
//! explicit value passed to every run; independent runs never share state.

use super::operators::BlendWeight;
use super::population::check_bounds;
use super::selection::Selection;
use crate::error::{GaError, Result};
use std::path::PathBuf;

/// Number of contestants per elimination tournament.
pub const TOURNAMENT_SIZE: usize = 3;

/// Configuration for the elimination GA.
///
/// # Defaults
///
/// ```
/// use elimination_ga::ga::EliminationConfig;
///
/// let config = EliminationConfig::default();
/// assert_eq!(config.population_size, 30);
/// assert_eq!(config.max_iterations, 10_000);
/// assert_eq!(config.stall_limit, 1000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use elimination_ga::ga::{BlendWeight, EliminationConfig, Selection};
///
/// let config = EliminationConfig::default()
///     .with_population_size(50)
///     .with_num_genes(1)
///     .with_bounds(-4.0, 4.0)
///     .with_selection(Selection::Roulette)
///     .with_blend_weight(BlendWeight::Random)
///     .with_mutation_probability(0.05)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EliminationConfig {
    /// Number of individuals. Must be at least [`TOURNAMENT_SIZE`].
    pub population_size: usize,

    /// Genes per chromosome, i.e. the model's parameter count.
    pub num_genes: usize,

    /// Inclusive lower bound for initial and mutated gene values.
    pub lower_bound: f64,

    /// Inclusive upper bound for initial and mutated gene values.
    pub upper_bound: f64,

    /// Generation budget. Zero evaluates the initial population only.
    pub max_iterations: usize,

    /// Per-gene probability of a uniform redraw (0.0–1.0).
    pub mutation_probability: f64,

    /// How tournament contestants are drawn.
    pub selection: Selection,

    /// Arithmetic crossover weight policy.
    pub blend_weight: BlendWeight,

    /// Consecutive generations without strict improvement before stopping.
    ///
    /// Set to 0 to disable stall-based termination.
    pub stall_limit: usize,

    /// A best fitness at or below this value counts as converged.
    pub convergence_epsilon: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Dataset source for runs that load their own records.
    pub dataset: Option<PathBuf>,
}

impl Default for EliminationConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            num_genes: 5,
            lower_bound: -4.0,
            upper_bound: 4.0,
            max_iterations: 10_000,
            mutation_probability: 0.01,
            selection: Selection::default(),
            blend_weight: BlendWeight::default(),
            stall_limit: 1000,
            convergence_epsilon: 1e-6,
            seed: None,
            dataset: None,
        }
    }
}

impl EliminationConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of genes per chromosome.
    pub fn with_num_genes(mut self, n: usize) -> Self {
        self.num_genes = n;
        self
    }

    /// Sets the inclusive gene bounds.
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the per-gene mutation probability.
    ///
    /// Not clamped: out-of-range values are reported by [`validate`](Self::validate).
    pub fn with_mutation_probability(mut self, pm: f64) -> Self {
        self.mutation_probability = pm;
        self
    }

    /// Sets the tournament sampling policy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the crossover weight policy.
    pub fn with_blend_weight(mut self, weight: BlendWeight) -> Self {
        self.blend_weight = weight;
        self
    }

    /// Sets the stall limit (0 to disable).
    pub fn with_stall_limit(mut self, limit: usize) -> Self {
        self.stall_limit = limit;
        self
    }

    /// Sets the convergence threshold.
    pub fn with_convergence_epsilon(mut self, epsilon: f64) -> Self {
        self.convergence_epsilon = epsilon;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the dataset source.
    pub fn with_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset = Some(path.into());
        self
    }

    /// Validates the configuration.
    ///
    /// Returns [`GaError::Config`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < TOURNAMENT_SIZE {
            return Err(GaError::config(format!(
                "population_size must be at least {TOURNAMENT_SIZE}, got {}",
                self.population_size
            )));
        }
        if self.num_genes == 0 {
            return Err(GaError::config("num_genes must be at least 1"));
        }
        check_bounds(self.lower_bound, self.upper_bound)?;
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(GaError::config(format!(
                "mutation_probability must be in [0, 1], got {}",
                self.mutation_probability
            )));
        }
        self.blend_weight.validate()?;
        if self.convergence_epsilon.is_nan() || self.convergence_epsilon < 0.0 {
            return Err(GaError::config("convergence_epsilon must be non-negative"));
        }
        Ok(())
    }
}
