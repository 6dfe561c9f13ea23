//! Real-valued chromosome.

use crate::error::{GaError, Result};
use std::fmt;

/// A candidate parameter vector with a cached fitness.
///
/// Lower fitness is better. The fitness is `None` until the error function
/// evaluates the chromosome, and any gene change resets it to `None`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromosome {
    genes: Vec<f64>,
    fitness: Option<f64>,
}

impl Chromosome {
    /// Creates an unevaluated chromosome from `genes`.
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Mutable gene access. Invalidates the cached fitness.
    pub fn genes_mut(&mut self) -> &mut [f64] {
        self.fitness = None;
        &mut self.genes
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn gene(&self, index: usize) -> Result<f64> {
        self.genes
            .get(index)
            .copied()
            .ok_or_else(|| GaError::index(index, self.genes.len()))
    }

    /// Overwrites one gene and invalidates the cached fitness.
    pub fn set_gene(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.genes.len();
        let slot = self
            .genes
            .get_mut(index)
            .ok_or_else(|| GaError::index(index, len))?;
        *slot = value;
        self.fitness = None;
        Ok(())
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Fitness for ordering purposes: unevaluated counts as worst.
    pub fn fitness_or_worst(&self) -> f64 {
        self.fitness.unwrap_or(f64::INFINITY)
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Drops the cached fitness.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, g) in self.genes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{g:.6}")?;
        }
        f.write_str("]")?;
        match self.fitness {
            Some(v) => write!(f, " -> {v:.6e}"),
            None => f.write_str(" -> ?"),
        }
    }
}
