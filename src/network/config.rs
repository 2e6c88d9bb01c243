//! Network topology configuration.
//!
//! [`NetworkConfig`] describes the shape shared by every individual of a run.
//! Only weights differ between individuals.

use super::functions::{Activation, Summation};
use crate::error::ConfigError;

/// Topology of a fully-connected feed-forward network.
///
/// Every neuron carries one bias weight in addition to one weight per
/// incoming connection.
///
/// # Examples
///
/// ```
/// use u_neuroevo::network::{Activation, NetworkConfig};
///
/// let config = NetworkConfig::new(3, 1)
///     .with_hidden_layers(1, 5)
///     .with_activation(Activation::Tanh);
///
/// assert!(config.validate().is_ok());
/// // (3 + 1) * 5 + (5 + 1) * 1
/// assert_eq!(config.weight_count(), 26);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Number of input neurons.
    pub input_count: usize,

    /// Number of output neurons.
    pub output_count: usize,

    /// Number of hidden layers. Zero wires inputs directly to outputs.
    pub hidden_layers: usize,

    /// Neurons per hidden layer.
    pub hidden_neurons: usize,

    /// How a neuron combines its weighted inputs.
    pub summation: Summation,

    /// Activation applied by hidden neurons.
    pub activation: Activation,

    /// Activation applied by output neurons.
    pub output_activation: Activation,

    /// Initial weights are drawn uniformly from `[-weight_range, weight_range]`.
    pub weight_range: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            input_count: 1,
            output_count: 1,
            hidden_layers: 0,
            hidden_neurons: 0,
            summation: Summation::default(),
            activation: Activation::default(),
            output_activation: Activation::default(),
            weight_range: 1.0,
        }
    }
}

impl NetworkConfig {
    /// Creates a configuration with no hidden layers.
    pub fn new(input_count: usize, output_count: usize) -> Self {
        Self {
            input_count,
            output_count,
            ..Self::default()
        }
    }

    /// Sets the hidden layer count and width.
    pub fn with_hidden_layers(mut self, layers: usize, neurons: usize) -> Self {
        self.hidden_layers = layers;
        self.hidden_neurons = neurons;
        self
    }

    /// Sets the summation strategy.
    pub fn with_summation(mut self, summation: Summation) -> Self {
        self.summation = summation;
        self
    }

    /// Sets the activation for hidden and output neurons alike.
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self.output_activation = activation;
        self
    }

    /// Sets the activation for output neurons only.
    pub fn with_output_activation(mut self, activation: Activation) -> Self {
        self.output_activation = activation;
        self
    }

    /// Sets the initial weight range.
    pub fn with_weight_range(mut self, range: f64) -> Self {
        self.weight_range = range;
        self
    }

    /// Neuron counts per layer, input layer first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers + 2);
        sizes.push(self.input_count);
        sizes.extend(std::iter::repeat(self.hidden_neurons).take(self.hidden_layers));
        sizes.push(self.output_count);
        sizes
    }

    /// Total number of weights (including biases) of one network.
    pub fn weight_count(&self) -> usize {
        self.layer_sizes()
            .windows(2)
            .map(|w| (w[0] + 1) * w[1])
            .sum()
    }

    /// Validates the topology.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_count == 0 {
            return Err(ConfigError::Topology("input_count must be at least 1"));
        }
        if self.output_count == 0 {
            return Err(ConfigError::Topology("output_count must be at least 1"));
        }
        if self.hidden_layers > 0 && self.hidden_neurons == 0 {
            return Err(ConfigError::Topology(
                "hidden layers require at least 1 hidden neuron",
            ));
        }
        if !self.weight_range.is_finite() || self.weight_range <= 0.0 {
            return Err(ConfigError::WeightRange(self.weight_range));
        }
        Ok(())
    }
}
