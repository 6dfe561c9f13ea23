use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use elimination_ga::ga::{
    BlendWeight, EliminationConfig, EliminationResult, EliminationRunner, ErrorFunction,
    GenerationReport, Selection,
};
use elimination_ga::model::{LinearModel, Model, OscillatorModel};
use elimination_ga::random::create_rng;
use elimination_ga::records::Records;
use tracing_subscriber::EnvFilter;

/// Fit a model to measurement data with an elimination genetic algorithm
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Measurement file: one row per line, last field is the expected output
    #[arg(long)]
    dataset: PathBuf,

    /// Model whose parameters are evolved
    #[arg(long, value_enum, default_value_t = ModelKind::Oscillator)]
    model: ModelKind,

    #[arg(long, default_value_t = 30)]
    population_size: usize,

    /// Genes per chromosome (defaults to the model's parameter count)
    #[arg(long)]
    genes: Option<usize>,

    #[arg(long, default_value_t = -4.0, allow_hyphen_values = true)]
    lower: f64,

    #[arg(long, default_value_t = 4.0, allow_hyphen_values = true)]
    upper: f64,

    /// Generation budget
    #[arg(long, default_value_t = 10_000)]
    iterations: usize,

    /// Per-gene mutation probability
    #[arg(long, default_value_t = 0.01)]
    pm: f64,

    /// Generations without improvement before stopping (0 disables)
    #[arg(long, default_value_t = 1000)]
    stall_limit: usize,

    #[arg(long, default_value_t = 1e-6)]
    epsilon: f64,

    #[arg(long, value_enum, default_value_t = SelectionKind::Uniform)]
    selection: SelectionKind,

    /// Crossover weight in [0, 1], or `random` for a fresh weight per child
    #[arg(long, default_value = "0.5", value_parser = parse_blend)]
    blend: BlendWeight,

    #[arg(long)]
    seed: Option<u64>,

    /// Do not print a line per generation
    #[arg(long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelKind {
    Linear,
    LinearIntercept,
    Oscillator,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SelectionKind {
    Uniform,
    Roulette,
}

fn parse_blend(s: &str) -> Result<BlendWeight, String> {
    if s.eq_ignore_ascii_case("random") {
        return Ok(BlendWeight::Random);
    }
    let w: f64 = s
        .parse()
        .map_err(|_| format!("expected a number or `random`, got {s:?}"))?;
    Ok(BlendWeight::Fixed(w))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let records = Records::load(&args.dataset)
        .with_context(|| format!("failed to load dataset {}", args.dataset.display()))?;

    let result = match args.model {
        ModelKind::Linear => fit(&args, &records, LinearModel::new())?,
        ModelKind::LinearIntercept => fit(&args, &records, LinearModel::with_intercept())?,
        ModelKind::Oscillator => fit(&args, &records, OscillatorModel)?,
    };

    println!();
    println!("Solution: {}", result.best);
    println!("Fitness: {:e}", result.best_fitness);
    println!("Number of iterations: {}", result.generations);
    println!("Termination: {}", result.termination);
    Ok(())
}

fn fit<M: Model>(args: &Args, records: &Records, model: M) -> anyhow::Result<EliminationResult> {
    let num_genes = match args.genes {
        Some(n) => n,
        None => model
            .param_count(records.input_dim())
            .with_context(|| {
                format!(
                    "model {:?} cannot fit records with {} inputs",
                    args.model,
                    records.input_dim()
                )
            })?,
    };

    let mut config = EliminationConfig::default()
        .with_population_size(args.population_size)
        .with_num_genes(num_genes)
        .with_bounds(args.lower, args.upper)
        .with_max_iterations(args.iterations)
        .with_mutation_probability(args.pm)
        .with_stall_limit(args.stall_limit)
        .with_convergence_epsilon(args.epsilon)
        .with_selection(match args.selection {
            SelectionKind::Uniform => Selection::Uniform,
            SelectionKind::Roulette => Selection::Roulette,
        })
        .with_blend_weight(args.blend);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut rng = create_rng(config.seed.unwrap_or_else(rand::random));
    let error_fn = ErrorFunction::new(model);
    let quiet = args.quiet;
    let result = EliminationRunner::run_observed(
        &error_fn,
        records,
        &config,
        &mut rng,
        |report: &GenerationReport<'_>| {
            if !quiet {
                println!("{}: {}", report.generation, report.best);
            }
        },
    )
    .context("optimization failed")?;
    Ok(result)
}
