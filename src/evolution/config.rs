//! Run configuration.
//!
//! [`EvolutionConfig`] holds every parameter of a run: topology, mutation
//! policy, selection and crossover policy, and the run parameters.

use super::mutator::MutationConfig;
use super::operators::Crossover;
use super::selection::Selection;
use crate::error::ConfigError;
use crate::network::NetworkConfig;

/// Configuration for an evolution run.
///
/// # Defaults
///
/// ```
/// use u_neuroevo::evolution::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations, 100);
/// assert_eq!(config.offspring_count(), 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_neuroevo::evolution::{EvolutionConfig, MutationConfig, Selection};
/// use u_neuroevo::network::NetworkConfig;
///
/// let config = EvolutionConfig::new(NetworkConfig::new(3, 1).with_hidden_layers(1, 5))
///     .with_population_size(10)
///     .with_generations(5)
///     .with_mutation(MutationConfig::default().with_probability(0.1))
///     .with_selection(Selection::Rank)
///     .with_seed(42);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Topology shared by every individual.
    pub network: NetworkConfig,

    /// Mutation policy for the default mutator.
    pub mutation: MutationConfig,

    /// Number of individuals in the population. Constant for the whole run.
    pub population_size: usize,

    /// Number of generations to run.
    pub generations: usize,

    /// Offspring bred per generation.
    ///
    /// `None` means `population_size` (full replacement). A smaller value
    /// carries the best `population_size - offspring_count` individuals of
    /// the scored roster over, unmutated.
    pub offspring_count: Option<usize>,

    /// Parent selection strategy for the default breeder.
    pub selection: Selection,

    /// Crossover scheme for the default breeder.
    pub crossover: Crossover,

    /// Whether to evaluate individuals in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` draws one random seed at construction; the engine reports it
    /// through `seed()` so the run can be replayed.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            mutation: MutationConfig::default(),
            population_size: 100,
            generations: 100,
            offspring_count: None,
            selection: Selection::default(),
            crossover: Crossover::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Creates a default configuration for the given topology.
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Sets the topology.
    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    /// Sets the mutation policy.
    pub fn with_mutation(mut self, mutation: MutationConfig) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the offspring bred per generation.
    pub fn with_offspring_count(mut self, n: usize) -> Self {
        self.offspring_count = Some(n);
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the crossover scheme.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Offspring bred per generation, resolving the default.
    pub fn offspring_count(&self) -> usize {
        self.offspring_count.unwrap_or(self.population_size)
    }

    /// Number of roster individuals carried into the next generation.
    pub fn survivor_count(&self) -> usize {
        self.population_size.saturating_sub(self.offspring_count())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        let offspring_count = self.offspring_count();
        if offspring_count == 0 || offspring_count > self.population_size {
            return Err(ConfigError::OffspringCount {
                offspring_count,
                population_size: self.population_size,
            });
        }
        self.network.validate()?;
        self.mutation.validate()?;
        self.selection.validate()?;
        Ok(())
    }
}
