//! Elimination GA loop execution.
//!
//! [`EliminationRunner`] drives a steady-state run:
//! initialization → evaluation → (tournament → crossover → mutation →
//! evaluation → replace the loser) per generation → termination.
//!
//! Exactly one population slot changes per generation, so the population
//! size never changes and the best individual is never lost.

use super::chromosome::Chromosome;
use super::config::{EliminationConfig, TOURNAMENT_SIZE};
use super::fitness::ErrorFunction;
use super::operators::{arithmetic_crossover, uniform_mutation};
use super::population::Population;
use super::selection::worst_of;
use crate::error::{GaError, Result};
use crate::model::Model;
use crate::random::create_rng;
use crate::records::Records;
use rand::Rng;
use std::fmt;
use tracing::{debug, info, warn};

/// Why a run stopped. All three are successful outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Best fitness reached the convergence threshold.
    Converged,
    /// The stall limit was reached without strict improvement.
    Stalled,
    /// The generation budget was used up.
    Exhausted,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Termination::Converged => "converged",
            Termination::Stalled => "stalled",
            Termination::Exhausted => "exhausted",
        })
    }
}

/// Result of an elimination GA run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EliminationResult {
    /// The best chromosome found.
    pub best: Chromosome,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// Best fitness after initialization and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Progress snapshot passed to an observer after every generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationReport<'a> {
    /// 1-based generation index.
    pub generation: usize,
    pub best: &'a Chromosome,
    pub best_fitness: f64,
    /// Consecutive generations without strict improvement.
    pub stall_count: usize,
}

/// What one elimination step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Slot that received the child.
    pub replaced: usize,
    /// Slots of the two parents.
    pub parents: [usize; 2],
    pub child_fitness: f64,
}

/// Performs one elimination generation on `population`.
///
/// Draws a tournament of three distinct slots, breeds the two better
/// contestants, mutates and evaluates the child, and writes it into the
/// worst contestant's slot. Random draws happen in a fixed order:
/// selection, crossover weight, mutation.
pub fn elimination_step<M: Model, R: Rng>(
    population: &mut Population,
    error_fn: &ErrorFunction<M>,
    records: &Records,
    config: &EliminationConfig,
    rng: &mut R,
) -> Result<StepOutcome> {
    let tournament = config
        .selection
        .sample(TOURNAMENT_SIZE, population, rng)?;
    let worst_pos = worst_of(population, &tournament)?;
    let replaced = tournament[worst_pos];

    let mut parents = tournament
        .iter()
        .enumerate()
        .filter(|&(pos, _)| pos != worst_pos)
        .map(|(_, &slot)| slot);
    let (Some(p1), Some(p2)) = (parents.next(), parents.next()) else {
        return Err(GaError::State("tournament yielded fewer than two parents"));
    };

    let weight = config.blend_weight.draw(rng);
    let mut child = arithmetic_crossover(population.get(p1)?, population.get(p2)?, weight)?;
    uniform_mutation(
        &mut child,
        rng,
        config.mutation_probability,
        config.lower_bound,
        config.upper_bound,
    )?;
    let child_fitness = error_fn.evaluate(&mut child, records);

    population.set(replaced, child)?;

    Ok(StepOutcome {
        replaced,
        parents: [p1, p2],
        child_fitness,
    })
}

/// Executes the elimination GA loop.
///
/// # Usage
///
/// ```
/// use elimination_ga::ga::{EliminationConfig, EliminationRunner, ErrorFunction};
/// use elimination_ga::model::LinearModel;
/// use elimination_ga::records::Records;
///
/// let records = Records::parse("1 2\n2 4\n3 6\n4 8\n").unwrap();
/// let error_fn = ErrorFunction::new(LinearModel::new());
/// let config = EliminationConfig::default()
///     .with_num_genes(1)
///     .with_max_iterations(200)
///     .with_seed(42);
///
/// let result = EliminationRunner::run(&error_fn, &records, &config).unwrap();
/// assert!(result.generations <= 200);
/// ```
pub struct EliminationRunner;

impl EliminationRunner {
    /// Runs with a generator seeded from `config.seed`.
    pub fn run<M: Model>(
        error_fn: &ErrorFunction<M>,
        records: &Records,
        config: &EliminationConfig,
    ) -> Result<EliminationResult> {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::run_with_rng(error_fn, records, config, &mut rng)
    }

    /// Loads records from `config.dataset` and runs.
    ///
    /// The configuration is validated before the dataset is touched.
    pub fn run_from_dataset<M: Model>(
        error_fn: &ErrorFunction<M>,
        config: &EliminationConfig,
    ) -> Result<EliminationResult> {
        config.validate()?;
        let path = config
            .dataset
            .as_ref()
            .ok_or_else(|| GaError::config("no dataset configured"))?;
        let records = Records::load(path)?;
        Self::run(error_fn, &records, config)
    }

    /// Runs using the caller's random stream.
    pub fn run_with_rng<M: Model, R: Rng>(
        error_fn: &ErrorFunction<M>,
        records: &Records,
        config: &EliminationConfig,
        rng: &mut R,
    ) -> Result<EliminationResult> {
        Self::run_observed(error_fn, records, config, rng, |_| {})
    }

    /// Runs using the caller's random stream, reporting every generation to
    /// `observer`.
    pub fn run_observed<M, R, F>(
        error_fn: &ErrorFunction<M>,
        records: &Records,
        config: &EliminationConfig,
        rng: &mut R,
        mut observer: F,
    ) -> Result<EliminationResult>
    where
        M: Model,
        R: Rng,
        F: FnMut(&GenerationReport<'_>),
    {
        // Initializing
        config.validate()?;
        error_fn.check_dimensions(config.num_genes, records)?;
        info!(
            population_size = config.population_size,
            num_genes = config.num_genes,
            max_iterations = config.max_iterations,
            mutation_probability = config.mutation_probability,
            rows = records.len(),
            "starting elimination GA"
        );

        let mut population = Population::create_initial(
            config.population_size,
            config.num_genes,
            config.lower_bound,
            config.upper_bound,
            rng,
        )?;
        error_fn.evaluate_population(&mut population, records);

        let mut best = population.best()?.clone();
        let mut best_fitness = best.fitness_or_worst();
        let mut fitness_history = Vec::with_capacity(config.max_iterations.min(1 << 16) + 1);
        fitness_history.push(best_fitness);

        let mut stall_count = 0usize;
        let mut generations = 0usize;

        // Evolving
        let termination = loop {
            if best_fitness <= config.convergence_epsilon {
                break Termination::Converged;
            }
            if config.stall_limit > 0 && stall_count >= config.stall_limit {
                warn!(
                    stall_limit = config.stall_limit,
                    "no improvement within stall limit, stopping"
                );
                break Termination::Stalled;
            }
            if generations >= config.max_iterations {
                break Termination::Exhausted;
            }

            elimination_step(&mut population, error_fn, records, config, rng)?;
            generations += 1;

            let current = population.best()?;
            let current_fitness = current.fitness_or_worst();
            if current_fitness < best_fitness {
                best = current.clone();
                best_fitness = current_fitness;
                stall_count = 0;
            } else {
                stall_count += 1;
            }
            fitness_history.push(best_fitness);

            debug!(generation = generations, best = %best, "generation complete");
            observer(&GenerationReport {
                generation: generations,
                best: &best,
                best_fitness,
                stall_count,
            });
        };

        info!(
            %termination,
            generations,
            best_fitness,
            best = %best,
            "elimination GA finished"
        );

        Ok(EliminationResult {
            best,
            best_fitness,
            generations,
            termination,
            fitness_history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{BlendWeight, Selection};
    use crate::model::{LinearModel, OscillatorModel};
    use crate::records::Record;

    // ---- y = 2x: four rows, one gene ----

    fn doubling() -> Records {
        Records::from_rows(
            (1..=4)
                .map(|x| Record::new(vec![x as f64], 2.0 * x as f64))
                .collect(),
        )
        .unwrap()
    }

    fn linear_config() -> EliminationConfig {
        EliminationConfig::default()
            .with_population_size(10)
            .with_num_genes(1)
            .with_bounds(-4.0, 4.0)
            .with_max_iterations(500)
            .with_mutation_probability(0.5)
    }

    #[test]
    fn test_linear_convergence() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());

        // A single 500-generation run with 10 individuals can settle early,
        // so take the best of a few seeded restarts.
        let best = (0..8)
            .map(|seed| {
                let config = linear_config().with_seed(seed);
                EliminationRunner::run(&error_fn, &records, &config).unwrap()
            })
            .inspect(|r| {
                assert!(r.generations <= 500);
                assert!((-4.0..=4.0).contains(&r.best.genes()[0]));
            })
            .min_by(|a, b| a.best_fitness.total_cmp(&b.best_fitness))
            .unwrap();

        assert!(
            best.best_fitness < 1e-4,
            "expected fitness < 1e-4, got {}",
            best.best_fitness
        );
        assert!(
            (best.best.genes()[0] - 2.0).abs() < 0.01,
            "expected gene near 2.0, got {}",
            best.best.genes()[0]
        );
    }

    #[test]
    fn test_linear_single_run_converges() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        // One seeded run; a generous budget with stalling disabled leaves no
        // room for an unlucky stream.
        let config = linear_config()
            .with_max_iterations(20_000)
            .with_stall_limit(0)
            .with_convergence_epsilon(1e-4)
            .with_seed(2024);

        let result = EliminationRunner::run(&error_fn, &records, &config).unwrap();

        assert_eq!(result.termination, Termination::Converged);
        assert!(result.best_fitness <= 1e-4);
        assert!(
            (result.best.genes()[0] - 2.0).abs() < 0.01,
            "expected gene near 2.0, got {}",
            result.best.genes()[0]
        );
        assert_eq!(result.fitness_history.len(), result.generations + 1);
    }

    #[test]
    fn test_zero_iterations_exhausts_immediately() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        // Upper bound below 2.0 keeps the initial best from converging.
        let config = linear_config().with_bounds(-4.0, 1.0).with_max_iterations(0);

        let mut rng = create_rng(11);
        let result = EliminationRunner::run_with_rng(&error_fn, &records, &config, &mut rng)
            .unwrap();

        // Rebuild the same initial population from the same stream.
        let mut rng = create_rng(11);
        let mut initial = Population::create_initial(10, 1, -4.0, 1.0, &mut rng).unwrap();
        error_fn.evaluate_population(&mut initial, &records);
        let expected = initial.best().unwrap();

        assert_eq!(result.termination, Termination::Exhausted);
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history.len(), 1);
        assert_eq!(&result.best, expected);
    }

    #[test]
    fn test_converged_before_first_generation() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        // Degenerate bounds pin every gene to the exact answer.
        let config = linear_config().with_bounds(2.0, 2.0).with_seed(1);

        let result = EliminationRunner::run(&error_fn, &records, &config).unwrap();
        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.generations, 0);
        assert_eq!(result.best_fitness, 0.0);
    }

    #[test]
    fn test_stall_termination() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        // Every gene is 1.0, so the error can never improve.
        let config = linear_config()
            .with_bounds(1.0, 1.0)
            .with_max_iterations(100)
            .with_stall_limit(5)
            .with_seed(3);

        let result = EliminationRunner::run(&error_fn, &records, &config).unwrap();
        assert_eq!(result.termination, Termination::Stalled);
        assert_eq!(result.generations, 5);
        assert!((result.best_fitness - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_stall_limit_disabled() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        let config = linear_config()
            .with_bounds(1.0, 1.0)
            .with_max_iterations(50)
            .with_stall_limit(0)
            .with_seed(3);

        let result = EliminationRunner::run(&error_fn, &records, &config).unwrap();
        assert_eq!(result.termination, Termination::Exhausted);
        assert_eq!(result.generations, 50);
    }

    #[test]
    fn test_best_fitness_non_increasing() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        let config = linear_config()
            .with_mutation_probability(0.2)
            .with_convergence_epsilon(0.0)
            .with_seed(5);

        let result = EliminationRunner::run(&error_fn, &records, &config).unwrap();
        assert_eq!(result.fitness_history.len(), result.generations + 1);
        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best fitness got worse: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        let config = linear_config()
            .with_blend_weight(BlendWeight::Random)
            .with_selection(Selection::Roulette)
            .with_seed(99);

        let a = EliminationRunner::run(&error_fn, &records, &config).unwrap();
        let b = EliminationRunner::run(&error_fn, &records, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.generations, b.generations);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_observer_sees_every_generation() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        let config = linear_config()
            .with_max_iterations(40)
            .with_convergence_epsilon(0.0);

        let mut seen = Vec::new();
        let mut rng = create_rng(8);
        let result =
            EliminationRunner::run_observed(&error_fn, &records, &config, &mut rng, |report| {
                seen.push((report.generation, report.best_fitness));
            })
            .unwrap();

        assert_eq!(seen.len(), result.generations);
        for (i, (generation, fitness)) in seen.iter().enumerate() {
            assert_eq!(*generation, i + 1);
            assert_eq!(*fitness, result.fitness_history[i + 1]);
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_run() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());

        let config = linear_config().with_population_size(2);
        assert!(matches!(
            EliminationRunner::run(&error_fn, &records, &config),
            Err(GaError::Config(_))
        ));

        let config = linear_config().with_num_genes(3);
        assert!(matches!(
            EliminationRunner::run(&error_fn, &records, &config),
            Err(GaError::Config(_))
        ));
    }

    #[test]
    fn test_run_from_dataset_errors() {
        let error_fn = ErrorFunction::new(LinearModel::new());

        let config = linear_config();
        assert!(matches!(
            EliminationRunner::run_from_dataset(&error_fn, &config),
            Err(GaError::Config(_))
        ));

        let config = linear_config().with_dataset("/no/such/dataset.txt");
        assert!(matches!(
            EliminationRunner::run_from_dataset(&error_fn, &config),
            Err(GaError::Io { .. })
        ));
    }

    #[test]
    fn test_run_from_dataset() {
        let path = std::env::temp_dir().join(format!(
            "elimination-ga-runner-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "1 2\n2 4\n3 6\n4 8\n").unwrap();

        let error_fn = ErrorFunction::new(LinearModel::new());
        let config = linear_config().with_dataset(&path).with_seed(4);
        let result = EliminationRunner::run_from_dataset(&error_fn, &config);
        std::fs::remove_file(&path).ok();

        let result = result.unwrap();
        assert!(result.best_fitness <= result.fitness_history[0]);
    }

    // ---- Single-step invariants ----

    fn tagged_population(fitnesses: &[f64]) -> Population {
        let chromosomes = fitnesses
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let mut c = Chromosome::new(vec![i as f64]);
                c.set_fitness(f);
                c
            })
            .collect();
        Population::from_vec(chromosomes).unwrap()
    }

    #[test]
    fn test_step_replaces_exact_worst() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        let config = linear_config().with_mutation_probability(0.0);

        // Slot 1 carries fitness 10 and is the unique worst of the only
        // possible tournament.
        let mut pop = tagged_population(&[1.0, 10.0, 2.0]);
        let worst_stamp = pop.stamp(1).unwrap();
        let mut rng = create_rng(21);

        let outcome = elimination_step(&mut pop, &error_fn, &records, &config, &mut rng).unwrap();

        assert_eq!(outcome.replaced, 1);
        let mut parents = outcome.parents;
        parents.sort_unstable();
        assert_eq!(parents, [0, 2]);

        assert_ne!(pop.stamp(1).unwrap(), worst_stamp);
        assert!((0..3).all(|i| pop.stamp(i).unwrap() != worst_stamp));

        // Midpoint of genes 0.0 and 2.0, unmutated.
        let child = pop.get(1).unwrap();
        assert_eq!(child.genes(), &[1.0]);
        assert_eq!(child.fitness(), Some(outcome.child_fitness));
        assert!((outcome.child_fitness - 7.5).abs() < 1e-12);
        assert_eq!(pop.get(0).unwrap().fitness(), Some(1.0));
        assert_eq!(pop.get(2).unwrap().fitness(), Some(2.0));
    }

    #[test]
    fn test_step_distinguishes_equal_genes() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        let config = linear_config().with_mutation_probability(0.0);

        // Identical genes everywhere; only slot 2 is marked worst.
        let chromosomes = [1.0, 2.0, 10.0]
            .iter()
            .map(|&f| {
                let mut c = Chromosome::new(vec![3.0]);
                c.set_fitness(f);
                c
            })
            .collect();
        let mut pop = Population::from_vec(chromosomes).unwrap();
        let stamps: Vec<u64> = (0..3).map(|i| pop.stamp(i).unwrap()).collect();
        let mut rng = create_rng(2);

        elimination_step(&mut pop, &error_fn, &records, &config, &mut rng).unwrap();

        assert_eq!(pop.stamp(0).unwrap(), stamps[0]);
        assert_eq!(pop.stamp(1).unwrap(), stamps[1]);
        assert_ne!(pop.stamp(2).unwrap(), stamps[2]);
    }

    #[test]
    fn test_steps_preserve_size_and_change_one_slot() {
        let records = doubling();
        let error_fn = ErrorFunction::new(LinearModel::new());
        let config = linear_config().with_mutation_probability(0.3);
        let mut rng = create_rng(17);

        let mut pop = Population::create_initial(10, 1, -4.0, 4.0, &mut rng).unwrap();
        error_fn.evaluate_population(&mut pop, &records);

        for _ in 0..300 {
            let before: Vec<u64> = (0..pop.len()).map(|i| pop.stamp(i).unwrap()).collect();
            let outcome =
                elimination_step(&mut pop, &error_fn, &records, &config, &mut rng).unwrap();
            let after: Vec<u64> = (0..pop.len()).map(|i| pop.stamp(i).unwrap()).collect();

            assert_eq!(pop.len(), 10);
            let changed: Vec<usize> = (0..10).filter(|&i| before[i] != after[i]).collect();
            assert_eq!(changed, vec![outcome.replaced]);
            assert!(pop
                .iter()
                .all(|c| c.genes().iter().all(|g| (-4.0..=4.0).contains(g))));
        }
    }

    // ---- Five-parameter oscillator ----

    #[test]
    fn test_oscillator_fit_improves() {
        let truth = [0.5, 1.0, 2.0, -1.0, 0.5];
        let model = OscillatorModel;
        let mut rows = Vec::new();
        for i in -4..=4 {
            for j in -4..=4 {
                let (x, y) = (i as f64, j as f64);
                rows.push(Record::new(vec![x, y], model.predict(&truth, &[x, y])));
            }
        }
        let records = Records::from_rows(rows).unwrap();
        let error_fn = ErrorFunction::new(OscillatorModel);
        let config = EliminationConfig::default()
            .with_max_iterations(3000)
            .with_mutation_probability(0.1)
            .with_seed(2024);

        let result = EliminationRunner::run(&error_fn, &records, &config).unwrap();
        assert_eq!(result.best.len(), 5);
        assert!(result.best_fitness <= result.fitness_history[0]);
        assert!(result.best_fitness.is_finite());
    }
}
