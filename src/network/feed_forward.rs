//! Fully-connected feed-forward network.

use super::config::NetworkConfig;
use super::types::NetworkGenome;
use crate::error::NetworkError;
use rand::Rng;
use std::ops::Range;

/// A dense feed-forward network with flat weight storage.
///
/// Weights are stored layer by layer; within a layer, neuron by neuron,
/// each neuron's bias first followed by one weight per neuron of the
/// previous layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedForwardNetwork {
    config: NetworkConfig,
    weights: Vec<f64>,
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl FeedForwardNetwork {
    /// Creates a network with every weight set to zero.
    pub fn zeroed(config: &NetworkConfig) -> Self {
        Self {
            config: config.clone(),
            weights: vec![0.0; config.weight_count()],
            inputs: vec![0.0; config.input_count],
            outputs: vec![0.0; config.output_count],
        }
    }

    /// Creates a network from explicit weights.
    ///
    /// # Errors
    /// Returns [`NetworkError::WeightLength`] if `weights` does not match
    /// [`NetworkConfig::weight_count`].
    pub fn with_weights(config: &NetworkConfig, weights: Vec<f64>) -> Result<Self, NetworkError> {
        let expected = config.weight_count();
        if weights.len() != expected {
            return Err(NetworkError::WeightLength {
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self {
            config: config.clone(),
            weights,
            inputs: vec![0.0; config.input_count],
            outputs: vec![0.0; config.output_count],
        })
    }

    /// Number of weight layers (hidden layers + 1).
    pub fn layer_count(&self) -> usize {
        self.config.hidden_layers + 1
    }
}

impl NetworkGenome for FeedForwardNetwork {
    fn random<R: Rng>(config: &NetworkConfig, rng: &mut R) -> Self {
        let range = config.weight_range;
        let weights = (0..config.weight_count())
            .map(|_| range * rng.random_range(-1.0..=1.0))
            .collect();
        Self {
            config: config.clone(),
            weights,
            inputs: vec![0.0; config.input_count],
            outputs: vec![0.0; config.output_count],
        }
    }

    fn config(&self) -> &NetworkConfig {
        &self.config
    }

    fn set_inputs(&mut self, inputs: &[f64]) -> Result<(), NetworkError> {
        if inputs.len() != self.inputs.len() {
            return Err(NetworkError::InputLength {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }
        self.inputs.copy_from_slice(inputs);
        Ok(())
    }

    fn process(&mut self) {
        let sizes = self.config.layer_sizes();
        let last = sizes.len() - 2;
        let mut activations = self.inputs.clone();
        let mut offset = 0;

        for (layer, pair) in sizes.windows(2).enumerate() {
            let (fan_in, width) = (pair[0], pair[1]);
            let activation = if layer == last {
                self.config.output_activation
            } else {
                self.config.activation
            };
            let stride = fan_in + 1;

            let next: Vec<f64> = self.weights[offset..offset + width * stride]
                .chunks_exact(stride)
                .map(|neuron| activation.apply(self.config.summation.apply(&activations, neuron)))
                .collect();

            offset += width * stride;
            activations = next;
        }

        self.outputs = activations;
    }

    fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    fn layer_spans(&self) -> Vec<Range<usize>> {
        let mut start = 0;
        self.config
            .layer_sizes()
            .windows(2)
            .map(|w| {
                let end = start + (w[0] + 1) * w[1];
                let span = start..end;
                start = end;
                span
            })
            .collect()
    }
}
