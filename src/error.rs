//! Error types.
//!
//! Configuration problems are fatal and surface when an engine is built.
//! Evaluation problems are contained inside a generation: the affected
//! individual is scored with [`FAULT_FITNESS`](crate::evolution::FAULT_FITNESS)
//! and the run continues.

use thiserror::Error;

/// Invalid configuration, reported before a run can start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population_size must be at least 1")]
    EmptyPopulation,

    #[error("generations must be at least 1")]
    NoGenerations,

    #[error("offspring_count must be in 1..={population_size}, got {offspring_count}")]
    OffspringCount {
        offspring_count: usize,
        population_size: usize,
    },

    #[error("invalid network topology: {0}")]
    Topology(&'static str),

    #[error("initial weight range must be finite and positive, got {0}")]
    WeightRange(f64),

    #[error("mutation probability must be within [0, 1], got {0}")]
    MutationProbability(f64),

    #[error("mutation magnitude must be finite and non-negative, got {0}")]
    MutationMagnitude(f64),

    #[error("weight bound must be finite and positive, got {0}")]
    WeightBound(f64),

    #[error("selection size must be at least 1")]
    SelectionSize,
}

/// Misuse of a network's input or weight buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("expected {expected} inputs, got {actual}")]
    InputLength { expected: usize, actual: usize },

    #[error("expected {expected} weights, got {actual}")]
    WeightLength { expected: usize, actual: usize },
}

/// Failure of a single fitness evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("evaluation produced a non-finite fitness: {0}")]
    NonFinite(f64),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("evaluation failed: {0}")]
    Failed(String),
}

/// Fatal error returned by a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolutionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("every individual of generation {generation} failed evaluation")]
    EvaluationUnavailable { generation: usize },

    #[error("breeder produced {actual} offspring, expected {expected}")]
    BreedingShortfall { expected: usize, actual: usize },

    #[error("simulation already completed")]
    AlreadyCompleted,
}
