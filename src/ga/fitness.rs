//! Error function: how well a chromosome's parameters fit the records.

use super::chromosome::Chromosome;
use super::population::Population;
use crate::error::{GaError, Result};
use crate::model::Model;
use crate::records::Records;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How squared residuals are combined into one error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregate {
    /// Mean squared error.
    #[default]
    Mean,
    /// Sum of squared residuals.
    Sum,
}

/// Scalar error of a model parameterized by a chromosome's genes.
///
/// Evaluation is a pure function of `(genes, records)`; it consumes no
/// randomness. Lower is better.
#[derive(Debug, Clone)]
pub struct ErrorFunction<M> {
    model: M,
    aggregate: Aggregate,
}

impl<M: Model> ErrorFunction<M> {
    /// Mean squared error of `model`.
    pub fn new(model: M) -> Self {
        Self {
            model,
            aggregate: Aggregate::Mean,
        }
    }

    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    /// Checks that the model takes `num_genes` parameters for these records.
    pub fn check_dimensions(&self, num_genes: usize, records: &Records) -> Result<()> {
        match self.model.param_count(records.input_dim()) {
            Some(n) if n == num_genes => Ok(()),
            Some(n) => Err(GaError::config(format!(
                "model expects {n} parameters for {} inputs, configured {num_genes} genes",
                records.input_dim()
            ))),
            None => Err(GaError::config(format!(
                "model cannot consume records with {} inputs",
                records.input_dim()
            ))),
        }
    }

    /// Error of `genes` over all records.
    ///
    /// Non-finite results (overflow, NaN from the model) map to
    /// `f64::INFINITY`, the worst possible fitness.
    pub fn error(&self, genes: &[f64], records: &Records) -> f64 {
        let sum: f64 = records
            .iter()
            .map(|r| {
                let residual = self.model.predict(genes, &r.inputs) - r.output;
                residual * residual
            })
            .sum();
        let err = match self.aggregate {
            Aggregate::Sum => sum,
            Aggregate::Mean => sum / records.len() as f64,
        };
        if err.is_finite() {
            err
        } else {
            f64::INFINITY
        }
    }

    /// Evaluates `chromosome` and stores the result as its fitness.
    pub fn evaluate(&self, chromosome: &mut Chromosome, records: &Records) -> f64 {
        let err = self.error(chromosome.genes(), records);
        chromosome.set_fitness(err);
        err
    }

    /// Evaluates every chromosome of `population` in place.
    pub fn evaluate_population(&self, population: &mut Population, records: &Records) {
        #[cfg(feature = "parallel")]
        population.chromosomes_mut().par_iter_mut().for_each(|c| {
            self.evaluate(c, records);
        });
        #[cfg(not(feature = "parallel"))]
        population.chromosomes_mut().iter_mut().for_each(|c| {
            self.evaluate(c, records);
        });
    }
}
