//! Neuroevolution of fixed-topology feed-forward networks.
//!
//! Evolves the weights of a population of neural networks with a
//! generational genetic algorithm:
//!
//! - **Network**: Dense feed-forward networks with configurable layers,
//!   summation, and activation functions, behind the [`NetworkGenome`] trait.
//! - **Evolution**: Population lifecycle, parallel fitness evaluation with
//!   fault containment, selection, crossover, mutation, and best-performer
//!   tracking.
//!
//! The fitness strategy is the only problem-specific part: callers implement
//! [`EvaluatorFactory`] or wrap a closure in [`FitnessFn`].
//!
//! # Example
//!
//! ```
//! use u_neuroevo::error::EvaluationError;
//! use u_neuroevo::evolution::{EvaluationSlot, EvolutionConfig, EvolutionEngine, FitnessFn};
//! use u_neuroevo::network::{FeedForwardNetwork, NetworkConfig, NetworkGenome};
//!
//! // Reward networks whose output at the origin is close to 0.5.
//! let strategy = FitnessFn::new(
//!     |net: &mut FeedForwardNetwork, _slot: EvaluationSlot| -> Result<f64, EvaluationError> {
//!         let out = net.evaluate_at(&[0.0, 0.0])?[0];
//!         Ok(-(out - 0.5).abs())
//!     },
//! );
//!
//! let config = EvolutionConfig::new(NetworkConfig::new(2, 1).with_hidden_layers(1, 4))
//!     .with_population_size(20)
//!     .with_generations(10)
//!     .with_seed(7);
//!
//! let mut engine = EvolutionEngine::new(config, strategy).unwrap();
//! engine.run_simulation().unwrap();
//! assert!(engine.best_performer().is_some());
//! ```
//!
//! [`NetworkGenome`]: network::NetworkGenome
//! [`EvaluatorFactory`]: evolution::EvaluatorFactory
//! [`FitnessFn`]: evolution::FitnessFn

pub mod error;
pub mod evolution;
pub mod network;
pub mod random;
