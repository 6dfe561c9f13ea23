//! Tournament sampling for elimination.
//!
//! Selection draws `k` **distinct** slots from the population (sampling
//! without replacement). The runner uses `k = 3`: the worst of the three is
//! eliminated and the other two breed its replacement.
//!
//! Slot indices, not chromosomes, are returned so that replacement can
//! target the exact individual even when several slots hold equal genes.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::population::Population;
use crate::error::{GaError, Result};
use rand::seq::index;
use rand::Rng;

/// Sampling policy for tournament contestants.
///
/// All strategies assume **minimization** (lower fitness = better).
///
/// # Examples
///
/// ```
/// use elimination_ga::ga::Selection;
///
/// // Every k-subset equally likely
/// let sel = Selection::Uniform;
///
/// // Better individuals more likely to be drawn
/// let sel = Selection::Roulette;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Uniformly random k-subset.
    ///
    /// # Complexity
    /// O(k) per sample
    #[default]
    Uniform,

    /// Fitness-proportionate (roulette wheel) sampling without replacement.
    ///
    /// Each draw picks from the remaining pool with weight
    /// `max_fitness - fitness + ε`, so the lowest error gets the largest
    /// slice. The picked slot is removed before the next draw.
    ///
    /// # Complexity
    /// O(k·n) per sample
    Roulette,
}

impl Selection {
    /// Samples `k` distinct slot indices from `population`.
    ///
    /// Fails with [`GaError::Config`] if `k` is zero or exceeds the
    /// population size. When `k` equals the population size every slot is
    /// returned.
    pub fn sample<R: Rng>(
        &self,
        k: usize,
        population: &Population,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        let n = population.len();
        if k == 0 {
            return Err(GaError::config("tournament size must be at least 1"));
        }
        if k > n {
            return Err(GaError::config(format!(
                "tournament size {k} exceeds population size {n}"
            )));
        }

        Ok(match self {
            Selection::Uniform => index::sample(rng, n, k).into_vec(),
            Selection::Roulette => roulette(population, k, rng),
        })
    }
}

/// Roulette wheel without replacement using inverse fitness weights.
///
/// Unevaluated or non-finite individuals get the minimum weight. When the
/// weights of a draw sum past `f64::MAX` that draw is uniform over the pool.
fn roulette<R: Rng>(population: &Population, k: usize, rng: &mut R) -> Vec<usize> {
    const EPSILON: f64 = 1e-10;

    let fitnesses: Vec<f64> = population.iter().map(|c| c.fitness_or_worst()).collect();
    let mut pool: Vec<usize> = (0..fitnesses.len()).collect();
    let mut picked = Vec::with_capacity(k);

    for _ in 0..k {
        let max_fitness = pool
            .iter()
            .map(|&i| fitnesses[i])
            .filter(|f| f.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);

        let weights: Vec<f64> = pool
            .iter()
            .map(|&i| {
                let f = fitnesses[i];
                if f.is_finite() && max_fitness.is_finite() {
                    (max_fitness - f + EPSILON).max(EPSILON)
                } else {
                    EPSILON
                }
            })
            .collect();
        let total: f64 = weights.iter().sum();
        if !total.is_finite() {
            // fitness spread too wide to weigh; draw uniformly from the pool
            picked.push(pool.swap_remove(rng.random_range(0..pool.len())));
            continue;
        }

        let threshold = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        // floating-point fallback is the last pool entry
        let mut chosen = pool.len() - 1;
        for (pos, &w) in weights.iter().enumerate() {
            cumulative += w;
            if cumulative > threshold {
                chosen = pos;
                break;
            }
        }
        picked.push(pool.swap_remove(chosen));
    }
    picked
}

/// Position (within `tournament`) of the contestant with the highest fitness.
///
/// Ties go to the earliest contestant. Unevaluated contestants count as
/// worst.
pub fn worst_of(population: &Population, tournament: &[usize]) -> Result<usize> {
    let mut worst: Option<(usize, f64)> = None;
    for (pos, &slot) in tournament.iter().enumerate() {
        let f = population.get(slot)?.fitness_or_worst();
        match worst {
            Some((_, wf)) if f <= wf => {}
            _ => worst = Some((pos, f)),
        }
    }
    worst
        .map(|(pos, _)| pos)
        .ok_or_else(|| GaError::config("tournament must not be empty"))
}
