//! Neuron summation and activation functions.

/// How a neuron folds its weighted inputs and bias into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Summation {
    /// `bias + Σ w_i · x_i`.
    #[default]
    Weighted,

    /// `bias + (Σ w_i · x_i) / n`, keeping pre-activations in scale for wide
    /// layers.
    Mean,
}

impl Summation {
    /// Combines `inputs` with `weights`, where `weights[0]` is the bias.
    ///
    /// `weights.len()` must be `inputs.len() + 1`.
    pub fn apply(&self, inputs: &[f64], weights: &[f64]) -> f64 {
        let (bias, weights) = match weights.split_first() {
            Some((bias, rest)) => (*bias, rest),
            None => return 0.0,
        };
        let dot: f64 = inputs.iter().zip(weights).map(|(x, w)| x * w).sum();
        match self {
            Summation::Weighted => bias + dot,
            Summation::Mean => {
                if inputs.is_empty() {
                    bias
                } else {
                    bias + dot / inputs.len() as f64
                }
            }
        }
    }
}

/// Neuron activation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Activation {
    /// Hyperbolic tangent, range (-1, 1).
    #[default]
    Tanh,

    /// Logistic sigmoid, range (0, 1).
    Sigmoid,

    /// Rectified linear unit.
    Relu,

    /// Pass-through.
    Identity,
}

impl Activation {
    /// Applies the activation to `x`.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Relu => x.max(0.0),
            Activation::Identity => x,
        }
    }
}
