//! Steady-state elimination genetic algorithm for model fitting.
//!
//! Fits the parameters of a [`model::Model`] to a table of measurement
//! [`records::Records`] by minimizing the squared-residual error over a
//! population of real-valued chromosomes.
//!
//! - **Records**: Immutable input/output rows, loaded once from text.
//! - **Models**: Linear and a five-parameter damped oscillator; any type
//!   implementing [`model::Model`] can be fitted.
//! - **Elimination GA**: Tournament of three, arithmetic crossover of the
//!   two winners, uniform mutation, replacement of the loser. Stops when
//!   converged, stalled, or out of generations.
//!
//! # Example
//!
//! ```
//! use elimination_ga::ga::{EliminationConfig, EliminationRunner, ErrorFunction, Termination};
//! use elimination_ga::model::LinearModel;
//! use elimination_ga::records::Records;
//!
//! let records = Records::parse("1 2\n2 4\n3 6\n4 8\n").unwrap();
//! let config = EliminationConfig::default()
//!     .with_num_genes(1)
//!     .with_bounds(-4.0, 1.0)
//!     .with_max_iterations(0)
//!     .with_seed(7);
//!
//! let result = EliminationRunner::run(&ErrorFunction::new(LinearModel::new()), &records, &config)
//!     .unwrap();
//! assert_eq!(result.termination, Termination::Exhausted);
//! assert_eq!(result.generations, 0);
//! ```

pub mod error;
pub mod ga;
pub mod model;
pub mod random;
pub mod records;

pub use error::{GaError, Result};
