//! Parametric models fitted by the optimizer.
//!
//! A [`Model`] maps a parameter vector (the chromosome's genes) and one
//! row of inputs to a predicted output. The error function compares that
//! prediction with the row's expected output.

/// A model whose parameters are evolved by the GA.
pub trait Model: Send + Sync {
    /// Number of parameters this model takes for rows of `input_dim` inputs.
    ///
    /// Returns `None` when the model cannot consume rows of that width.
    fn param_count(&self, input_dim: usize) -> Option<usize>;

    /// Predicts the output for `inputs` under `params`.
    fn predict(&self, params: &[f64], inputs: &[f64]) -> f64;
}

impl<M: Model + ?Sized> Model for &M {
    fn param_count(&self, input_dim: usize) -> Option<usize> {
        (**self).param_count(input_dim)
    }

    fn predict(&self, params: &[f64], inputs: &[f64]) -> f64 {
        (**self).predict(params, inputs)
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn param_count(&self, input_dim: usize) -> Option<usize> {
        (**self).param_count(input_dim)
    }

    fn predict(&self, params: &[f64], inputs: &[f64]) -> f64 {
        (**self).predict(params, inputs)
    }
}

/// Linear model `y = β₀ + Σ βᵢ·xᵢ`.
///
/// Without an intercept the model has one parameter per input. With an
/// intercept the first parameter is the constant term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearModel {
    pub intercept: bool,
}

impl LinearModel {
    /// Linear model through the origin.
    pub fn new() -> Self {
        Self { intercept: false }
    }

    /// Linear model with a constant term.
    pub fn with_intercept() -> Self {
        Self { intercept: true }
    }
}

impl Model for LinearModel {
    fn param_count(&self, input_dim: usize) -> Option<usize> {
        Some(input_dim + usize::from(self.intercept))
    }

    fn predict(&self, params: &[f64], inputs: &[f64]) -> f64 {
        let (bias, weights) = if self.intercept {
            match params.split_first() {
                Some((b, w)) => (*b, w),
                None => (0.0, params),
            }
        } else {
            (0.0, params)
        };
        bias + weights
            .iter()
            .zip(inputs)
            .map(|(w, x)| w * x)
            .sum::<f64>()
    }
}

/// Damped oscillator transfer function of two inputs and five parameters:
///
/// ```text
/// f(x, y) = sin(β0 + β1·x) + β2·cos(x·(β3 + y)) / (1 + exp((x − β4)²))
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OscillatorModel;

impl OscillatorModel {
    pub const PARAMS: usize = 5;
}

impl Model for OscillatorModel {
    fn param_count(&self, input_dim: usize) -> Option<usize> {
        (input_dim == 2).then_some(Self::PARAMS)
    }

    fn predict(&self, params: &[f64], inputs: &[f64]) -> f64 {
        let [b0, b1, b2, b3, b4] = match params {
            [b0, b1, b2, b3, b4] => [*b0, *b1, *b2, *b3, *b4],
            _ => return f64::NAN,
        };
        let (x, y) = match inputs {
            [x, y] => (*x, *y),
            _ => return f64::NAN,
        };
        (b0 + b1 * x).sin() + b2 * (x * (b3 + y)).cos() / (1.0 + ((x - b4).powi(2)).exp())
    }
}
