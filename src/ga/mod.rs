//! Steady-state elimination genetic algorithm.
//!
//! Each generation samples a tournament of three distinct individuals,
//! breeds the two better ones with arithmetic crossover, mutates and
//! evaluates the child, and writes it over the tournament's loser. The
//! population size never changes and exactly one slot is replaced per
//! generation.
//!
//! # Key Types
//!
//! - [`Chromosome`]: Real-valued gene vector with cached fitness
//! - [`Population`]: Fixed-size population with per-slot identity
//! - [`ErrorFunction`]: Squared-residual error of a [`Model`](crate::model::Model)
//! - [`EliminationConfig`]: Algorithm parameters
//! - [`EliminationRunner`]: Executes the evolutionary loop
//! - [`EliminationResult`]: Best solution, generation count, termination cause
//!
//! # Submodules
//!
//! - [`operators`]: Arithmetic crossover and uniform mutation
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms" (steady-state GA)
//! - Whitley (1989), "The GENITOR Algorithm and Selection Pressure"

mod chromosome;
mod config;
mod fitness;
pub mod operators;
mod population;
mod runner;
mod selection;

pub use chromosome::Chromosome;
pub use config::{EliminationConfig, TOURNAMENT_SIZE};
pub use fitness::{Aggregate, ErrorFunction};
pub use operators::BlendWeight;
pub use population::Population;
pub use runner::{
    elimination_step, EliminationResult, EliminationRunner, GenerationReport, StepOutcome,
    Termination,
};
pub use selection::{worst_of, Selection};
