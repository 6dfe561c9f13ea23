//! Fixed-size population with slot identities.

use super::chromosome::Chromosome;
use crate::error::{GaError, Result};
use rand::Rng;

/// An ordered population of constant size.
///
/// Every slot carries an identity stamp that changes whenever the slot's
/// occupant is replaced. Two chromosomes with identical genes in different
/// slots are still distinct individuals.
#[derive(Debug, Clone)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
    stamps: Vec<u64>,
    next_stamp: u64,
}

impl Population {
    /// Creates a population of `size` chromosomes with `num_genes` genes each,
    /// every gene drawn uniformly from `[lower, upper]`.
    pub fn create_initial<R: Rng>(
        size: usize,
        num_genes: usize,
        lower: f64,
        upper: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if size == 0 {
            return Err(GaError::config("population size must be positive"));
        }
        if num_genes == 0 {
            return Err(GaError::config("number of genes must be positive"));
        }
        check_bounds(lower, upper)?;

        let chromosomes = (0..size)
            .map(|_| {
                let genes = (0..num_genes)
                    .map(|_| rng.random_range(lower..=upper))
                    .collect();
                Chromosome::new(genes)
            })
            .collect();
        Ok(Self::from_chromosomes(chromosomes))
    }

    /// Wraps existing chromosomes, assigning fresh identities.
    ///
    /// All chromosomes must have the same number of genes.
    pub fn from_vec(chromosomes: Vec<Chromosome>) -> Result<Self> {
        let Some(first) = chromosomes.first() else {
            return Err(GaError::config("population size must be positive"));
        };
        let n = first.len();
        if let Some(bad) = chromosomes.iter().find(|c| c.len() != n) {
            return Err(GaError::dimension_mismatch(n, bad.len()));
        }
        Ok(Self::from_chromosomes(chromosomes))
    }

    fn from_chromosomes(chromosomes: Vec<Chromosome>) -> Self {
        let stamps = (0..chromosomes.len() as u64).collect();
        Self {
            next_stamp: chromosomes.len() as u64,
            chromosomes,
            stamps,
        }
    }

    /// Number of individuals. Constant for the population's lifetime.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Genes per chromosome.
    pub fn num_genes(&self) -> usize {
        self.chromosomes.first().map_or(0, Chromosome::len)
    }

    pub fn get(&self, index: usize) -> Result<&Chromosome> {
        self.chromosomes
            .get(index)
            .ok_or_else(|| GaError::index(index, self.chromosomes.len()))
    }

    /// Replaces the occupant of slot `index` with `chromosome`.
    ///
    /// The slot receives a new identity stamp. The chromosome must have the
    /// same number of genes as the rest of the population.
    pub fn set(&mut self, index: usize, chromosome: Chromosome) -> Result<()> {
        let len = self.chromosomes.len();
        if index >= len {
            return Err(GaError::index(index, len));
        }
        let expected = self.num_genes();
        if chromosome.len() != expected {
            return Err(GaError::dimension_mismatch(expected, chromosome.len()));
        }
        self.chromosomes[index] = chromosome;
        self.stamps[index] = self.next_stamp;
        self.next_stamp += 1;
        Ok(())
    }

    /// Identity stamp of the current occupant of slot `index`.
    pub fn stamp(&self, index: usize) -> Result<u64> {
        self.stamps
            .get(index)
            .copied()
            .ok_or_else(|| GaError::index(index, self.stamps.len()))
    }

    /// Index of the chromosome with the lowest fitness.
    ///
    /// Ties go to the earliest slot. Unevaluated chromosomes are skipped;
    /// fails with [`GaError::State`] if none is evaluated.
    pub fn best_index(&self) -> Result<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, c) in self.chromosomes.iter().enumerate() {
            let Some(f) = c.fitness() else { continue };
            match best {
                Some((_, bf)) if f >= bf => {}
                _ => best = Some((i, f)),
            }
        }
        best.map(|(i, _)| i)
            .ok_or(GaError::State("no chromosome has been evaluated"))
    }

    /// The chromosome with the lowest fitness. See [`best_index`](Self::best_index).
    pub fn best(&self) -> Result<&Chromosome> {
        let idx = self.best_index()?;
        Ok(&self.chromosomes[idx])
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    /// Mutable view used for in-place evaluation. Slot identities are kept.
    pub(crate) fn chromosomes_mut(&mut self) -> &mut [Chromosome] {
        &mut self.chromosomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chromosome> {
        self.chromosomes.iter()
    }
}

pub(crate) fn check_bounds(lower: f64, upper: f64) -> Result<()> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(GaError::config("gene bounds must be finite"));
    }
    if lower > upper {
        return Err(GaError::config(format!(
            "lower bound {lower} exceeds upper bound {upper}"
        )));
    }
    if !(upper - lower).is_finite() {
        return Err(GaError::config(format!(
            "gene range [{lower}, {upper}] is too wide to sample"
        )));
    }
    Ok(())
}
