//! Generational neuroevolution.
//!
//! A fixed-size population of network genomes is evolved for a configured
//! number of generations. Each generation is scored by a user-supplied
//! fitness strategy, then replaced by offspring bred from the scored roster
//! and mutated in place.
//!
//! # Core Traits
//!
//! - [`EvaluatorFactory`] / [`Evaluator`]: Fitness strategy, one evaluator per
//!   genome per generation
//! - [`Breeder`]: Selection plus crossover, roster → offspring
//! - [`Mutator`]: In-place weight perturbation
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: Run parameters (population size, generations, policies)
//! - [`EvolutionEngine`]: Executes the generational loop
//! - [`WorkingSet`]: Scores a population, optionally in parallel
//! - [`BestPerformer`]: Best genome ever scored, with its generation
//!
//! # Submodules
//!
//! - [`operators`]: Weight-vector crossover operators
//!
//! # References
//!
//! - Montana & Davis (1989), "Training Feedforward Neural Networks Using
//!   Genetic Algorithms"
//! - Yao (1999), "Evolving Artificial Neural Networks"
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod breeder;
mod config;
mod engine;
mod evaluation;
mod mutator;
pub mod operators;
mod selection;
mod types;

pub use breeder::{Breeder, GeneticBreeder};
pub use config::EvolutionConfig;
pub use engine::{EngineState, EvolutionEngine, RunOutcome};
pub use evaluation::{EvaluationSlot, Evaluator, EvaluatorFactory, FitnessFn, FnEvaluator, WorkingSet};
pub use mutator::{MutationConfig, Mutator, Perturbation, WeightMutator};
pub use operators::Crossover;
pub use selection::Selection;
pub use types::{best_index, rank_indices, BestPerformer, GenerationStats, ScoredIndividual, FAULT_FITNESS};
