//! Real-valued genetic operators.
//!
//! # Crossover
//!
//! - [`arithmetic_crossover`]: weighted average of two parents, gene by gene
//!
//! # Mutation
//!
//! - [`uniform_mutation`]: per-gene redraw from the allowed range
//!
//! Both operators are stateless; randomness comes from the caller's stream.
//!
//! # References
//!
//! - Michalewicz (1996), *Genetic Algorithms + Data Structures = Evolution
//!   Programs*, ch. 6 (arithmetic crossover, uniform mutation)

use super::chromosome::Chromosome;
use crate::error::{GaError, Result};
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// How the arithmetic crossover weight is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendWeight {
    /// The same weight for every crossover. `Fixed(0.5)` is the midpoint.
    Fixed(f64),

    /// A fresh weight in `[0, 1)` drawn for every crossover.
    ///
    /// Explores the whole segment between the parents instead of always
    /// landing on its midpoint. Consumes one draw per child.
    Random,
}

impl Default for BlendWeight {
    fn default() -> Self {
        BlendWeight::Fixed(0.5)
    }
}

impl BlendWeight {
    /// Returns the weight for the next crossover.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            BlendWeight::Fixed(w) => w,
            BlendWeight::Random => rng.random::<f64>(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            BlendWeight::Fixed(w) => check_weight(w),
            BlendWeight::Random => Ok(()),
        }
    }
}

fn check_weight(weight: f64) -> Result<()> {
    if (0.0..=1.0).contains(&weight) {
        Ok(())
    } else {
        Err(GaError::config(format!(
            "crossover weight must be in [0, 1], got {weight}"
        )))
    }
}

/// Arithmetic crossover.
///
/// Produces one child with `child[i] = w * a[i] + (1 - w) * b[i]`. The
/// child is unevaluated. Because the child lies on the segment between
/// the parents it stays inside any box both parents lie in.
///
/// # Errors
///
/// [`GaError::DimensionMismatch`] if the parents differ in length,
/// [`GaError::Config`] if `weight` is outside `[0, 1]`.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn arithmetic_crossover(a: &Chromosome, b: &Chromosome, weight: f64) -> Result<Chromosome> {
    if a.len() != b.len() {
        return Err(GaError::dimension_mismatch(a.len(), b.len()));
    }
    check_weight(weight)?;

    let genes = a
        .genes()
        .iter()
        .zip(b.genes())
        .map(|(&x, &y)| weight * x + (1.0 - weight) * y)
        .collect();
    Ok(Chromosome::new(genes))
}

// ============================================================================
// Mutation
// ============================================================================

/// Uniform mutation.
///
/// Each gene is independently redrawn from `[lower, upper]` with
/// probability `pm`. The chromosome's fitness is always invalidated; the
/// caller re-evaluates it.
///
/// Draw order per gene: one Bernoulli trial, followed by the value draw
/// only when the trial fires.
///
/// # Errors
///
/// [`GaError::Config`] if `pm` is outside `[0, 1]` or the bounds are
/// invalid.
///
/// # Complexity
/// O(n)
pub fn uniform_mutation<R: Rng>(
    chromosome: &mut Chromosome,
    rng: &mut R,
    pm: f64,
    lower: f64,
    upper: f64,
) -> Result<()> {
    if !(0.0..=1.0).contains(&pm) {
        return Err(GaError::config(format!(
            "mutation probability must be in [0, 1], got {pm}"
        )));
    }
    super::population::check_bounds(lower, upper)?;

    for gene in chromosome.genes_mut() {
        if rng.random_bool(pm) {
            *gene = rng.random_range(lower..=upper);
        }
    }
    Ok(())
}
