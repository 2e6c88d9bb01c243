//! Weight mutation.
//!
//! Mutation is applied in place: the engine hands each freshly bred
//! offspring to the [`Mutator`] before it joins the next population.

use crate::error::ConfigError;
use crate::network::NetworkGenome;
use crate::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Distribution perturbation deltas are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Perturbation {
    /// Uniform in `[-magnitude, magnitude]`.
    #[default]
    Uniform,

    /// Normal with mean 0 and standard deviation `magnitude`.
    Gaussian,
}

/// Mutation parameters.
///
/// # Examples
///
/// ```
/// use u_neuroevo::evolution::{MutationConfig, Perturbation};
///
/// let config = MutationConfig::default()
///     .with_probability(0.1)
///     .with_magnitude(0.5)
///     .with_perturbation(Perturbation::Gaussian)
///     .with_weight_bound(4.0);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutationConfig {
    /// Per-weight mutation probability (0.0–1.0).
    ///
    /// Zero turns the mutator into a no-op.
    pub probability: f64,

    /// Perturbation scale: half-width for uniform, standard deviation for
    /// Gaussian.
    pub magnitude: f64,

    /// Shape of the perturbation.
    pub perturbation: Perturbation,

    /// Mutated weights are clamped to `[-bound, bound]` when set.
    pub weight_bound: Option<f64>,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            probability: 0.1,
            magnitude: 0.5,
            perturbation: Perturbation::Uniform,
            weight_bound: None,
        }
    }
}

impl MutationConfig {
    /// Sets the per-weight mutation probability.
    ///
    /// Out-of-range values are rejected by [`validate`](Self::validate)
    /// rather than clamped.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Sets the perturbation magnitude.
    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// Sets the perturbation distribution.
    pub fn with_perturbation(mut self, perturbation: Perturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    /// Clamps mutated weights to `[-bound, bound]`.
    pub fn with_weight_bound(mut self, bound: f64) -> Self {
        self.weight_bound = Some(bound);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(ConfigError::MutationProbability(self.probability));
        }
        if !self.magnitude.is_finite() || self.magnitude < 0.0 {
            return Err(ConfigError::MutationMagnitude(self.magnitude));
        }
        if let Some(bound) = self.weight_bound {
            if !bound.is_finite() || bound <= 0.0 {
                return Err(ConfigError::WeightBound(bound));
            }
        }
        Ok(())
    }
}

/// Perturbs genome weights in place.
///
/// Mutation never changes topology, only weight values.
pub trait Mutator<G: NetworkGenome> {
    /// Mutates `genome`, returning how many weights were perturbed.
    fn mutate(&mut self, genome: &mut G) -> usize;
}

/// Independent per-weight Bernoulli mutation.
///
/// Every weight is perturbed with probability
/// [`MutationConfig::probability`] by a delta drawn from the configured
/// [`Perturbation`].
#[derive(Debug, Clone)]
pub struct WeightMutator {
    config: MutationConfig,
    gaussian: Normal<f64>,
    rng: StdRng,
}

impl WeightMutator {
    /// Creates a mutator drawing from `rng`.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if `config` does not validate.
    pub fn new(config: MutationConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let gaussian = Normal::new(0.0, config.magnitude)
            .map_err(|_| ConfigError::MutationMagnitude(config.magnitude))?;
        Ok(Self {
            config,
            gaussian,
            rng,
        })
    }

    /// Creates a mutator with a generator seeded from `seed`.
    pub fn with_seed(config: MutationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, create_rng(seed))
    }

    /// The mutation parameters.
    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    fn delta(&mut self) -> f64 {
        let m = self.config.magnitude;
        match self.config.perturbation {
            Perturbation::Uniform => m * self.rng.random_range(-1.0..=1.0),
            Perturbation::Gaussian => self.gaussian.sample(&mut self.rng),
        }
    }
}

impl<G: NetworkGenome> Mutator<G> for WeightMutator {
    fn mutate(&mut self, genome: &mut G) -> usize {
        let probability = self.config.probability;
        let bound = self.config.weight_bound;
        let mut mutated = 0;

        for weight in genome.weights_mut() {
            if !self.rng.random_bool(probability) {
                continue;
            }
            let mut value = *weight + self.delta();
            if let Some(b) = bound {
                value = value.clamp(-b, b);
            }
            *weight = value;
            mutated += 1;
        }

        mutated
    }
}
