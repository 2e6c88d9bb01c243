//! The genome contract between networks and the evolution engine.

use super::config::NetworkConfig;
use crate::error::NetworkError;
use rand::Rng;
use std::ops::Range;

/// A neural network that can be evolved.
///
/// The engine treats a network as a flat vector of weights. Crossover and
/// mutation only ever read and write that vector; the forward pass is
/// driven exclusively by fitness evaluators through [`set_inputs`],
/// [`process`] and [`outputs`].
///
/// `Clone` must be a deep copy: a mutated child must never alias the weight
/// storage of its parent.
///
/// # Thread Safety
///
/// Genomes must be `Send + Sync` because the working set may evaluate them
/// in parallel using rayon.
///
/// [`set_inputs`]: NetworkGenome::set_inputs
/// [`process`]: NetworkGenome::process
/// [`outputs`]: NetworkGenome::outputs
pub trait NetworkGenome: Clone + Send + Sync {
    /// Creates a network with the given topology and random initial weights.
    fn random<R: Rng>(config: &NetworkConfig, rng: &mut R) -> Self;

    /// Topology this network was built from.
    fn config(&self) -> &NetworkConfig;

    /// Loads the input layer.
    ///
    /// # Errors
    /// Returns [`NetworkError::InputLength`] if `inputs` does not match the
    /// input count.
    fn set_inputs(&mut self, inputs: &[f64]) -> Result<(), NetworkError>;

    /// Runs one forward pass over the current inputs.
    fn process(&mut self);

    /// Output layer values from the last [`process`](NetworkGenome::process).
    fn outputs(&self) -> &[f64];

    /// All weights, layer by layer.
    fn weights(&self) -> &[f64];

    /// Mutable access to all weights. The length is fixed by the topology.
    fn weights_mut(&mut self) -> &mut [f64];

    /// Replaces all weights.
    ///
    /// # Errors
    /// Returns [`NetworkError::WeightLength`] if the length differs from
    /// [`weights`](NetworkGenome::weights).
    fn set_weights(&mut self, weights: &[f64]) -> Result<(), NetworkError> {
        let current = self.weights_mut();
        if current.len() != weights.len() {
            return Err(NetworkError::WeightLength {
                expected: current.len(),
                actual: weights.len(),
            });
        }
        current.copy_from_slice(weights);
        Ok(())
    }

    /// Index ranges of [`weights`](NetworkGenome::weights) belonging to each
    /// layer, in order. Used by layer-aware crossover.
    fn layer_spans(&self) -> Vec<Range<usize>> {
        vec![0..self.weights().len()]
    }

    /// Convenience: load `inputs`, run a forward pass, return the outputs.
    fn evaluate_at(&mut self, inputs: &[f64]) -> Result<&[f64], NetworkError> {
        self.set_inputs(inputs)?;
        self.process();
        Ok(self.outputs())
    }
}
