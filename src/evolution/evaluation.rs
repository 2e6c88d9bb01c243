//! Fitness evaluation harness.
//!
//! A fitness strategy is supplied as an [`EvaluatorFactory`]: for every
//! genome of every generation the [`WorkingSet`] binds a fresh [`Evaluator`]
//! to that genome, runs it, and reads back one scalar. Evaluations share no
//! mutable state, so the working set runs them in parallel with rayon when
//! the `parallel` feature is enabled.

use super::types::ScoredIndividual;
use crate::error::EvaluationError;
use crate::network::NetworkGenome;
use crate::random::evaluation_seed;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Identifies one evaluation within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationSlot {
    /// Zero-based generation.
    pub generation: usize,

    /// Position of the genome in the population.
    pub index: usize,

    /// Seed reserved for this evaluation.
    ///
    /// Derived from the run seed, generation, and index. Stochastic
    /// evaluators should seed their own generator from it instead of using a
    /// shared one, which keeps parallel runs reproducible.
    pub seed: u64,
}

/// Scores one genome.
///
/// Created by an [`EvaluatorFactory`] bound to a single genome.
/// [`run_evaluation`](Evaluator::run_evaluation) may drive the genome's
/// forward pass any number of times; [`evaluation`](Evaluator::evaluation)
/// is read only after it succeeded.
pub trait Evaluator {
    /// Runs the task against the bound genome.
    fn run_evaluation(&mut self) -> Result<(), EvaluationError>;

    /// Fitness computed by the last run. Higher is better.
    fn evaluation(&self) -> f64;
}

/// Builds evaluators; this is the pluggable fitness strategy.
///
/// # Implementing
///
/// ```
/// use u_neuroevo::error::EvaluationError;
/// use u_neuroevo::evolution::{EvaluationSlot, Evaluator, EvaluatorFactory};
/// use u_neuroevo::network::{FeedForwardNetwork, NetworkGenome};
///
/// struct SumOfOutputs<'g> {
///     network: &'g mut FeedForwardNetwork,
///     sum: f64,
/// }
///
/// impl Evaluator for SumOfOutputs<'_> {
///     fn run_evaluation(&mut self) -> Result<(), EvaluationError> {
///         self.sum = self.network.evaluate_at(&[0.0, 0.0, 0.0])?.iter().sum();
///         Ok(())
///     }
///
///     fn evaluation(&self) -> f64 {
///         self.sum
///     }
/// }
///
/// struct SumFactory;
///
/// impl EvaluatorFactory<FeedForwardNetwork> for SumFactory {
///     type Evaluator<'g> = SumOfOutputs<'g>;
///
///     fn create<'g>(
///         &'g self,
///         network: &'g mut FeedForwardNetwork,
///         _slot: EvaluationSlot,
///     ) -> SumOfOutputs<'g> {
///         SumOfOutputs { network, sum: 0.0 }
///     }
/// }
/// ```
pub trait EvaluatorFactory<G: NetworkGenome>: Send + Sync {
    /// Evaluator type, borrowing the factory and the genome.
    type Evaluator<'g>: Evaluator
    where
        Self: 'g,
        G: 'g;

    /// Binds a fresh evaluator to `genome`.
    fn create<'g>(&'g self, genome: &'g mut G, slot: EvaluationSlot) -> Self::Evaluator<'g>;
}

/// Adapts a closure into a fitness strategy.
///
/// # Examples
///
/// ```
/// use u_neuroevo::error::EvaluationError;
/// use u_neuroevo::evolution::{EvaluationSlot, FitnessFn};
/// use u_neuroevo::network::{FeedForwardNetwork, NetworkGenome};
///
/// let strategy = FitnessFn::new(
///     |net: &mut FeedForwardNetwork, _slot: EvaluationSlot| -> Result<f64, EvaluationError> {
///         Ok(net.evaluate_at(&[1.0])?[0])
///     },
/// );
/// ```
pub struct FitnessFn<F> {
    f: F,
}

impl<F> FitnessFn<F> {
    /// Wraps `f`, called once per genome per generation.
    pub fn new<G>(f: F) -> Self
    where
        F: Fn(&mut G, EvaluationSlot) -> Result<f64, EvaluationError>,
    {
        Self { f }
    }
}

/// Evaluator produced by [`FitnessFn`].
pub struct FnEvaluator<'g, G, F> {
    f: &'g F,
    genome: &'g mut G,
    slot: EvaluationSlot,
    fitness: f64,
}

impl<G, F> Evaluator for FnEvaluator<'_, G, F>
where
    F: Fn(&mut G, EvaluationSlot) -> Result<f64, EvaluationError>,
{
    fn run_evaluation(&mut self) -> Result<(), EvaluationError> {
        self.fitness = (self.f)(&mut *self.genome, self.slot)?;
        Ok(())
    }

    fn evaluation(&self) -> f64 {
        self.fitness
    }
}

impl<G, F> EvaluatorFactory<G> for FitnessFn<F>
where
    G: NetworkGenome,
    F: Fn(&mut G, EvaluationSlot) -> Result<f64, EvaluationError> + Send + Sync,
{
    type Evaluator<'g>
        = FnEvaluator<'g, G, F>
    where
        Self: 'g,
        G: 'g;

    fn create<'g>(&'g self, genome: &'g mut G, slot: EvaluationSlot) -> FnEvaluator<'g, G, F> {
        FnEvaluator {
            f: &self.f,
            genome,
            slot,
            fitness: f64::NAN,
        }
    }
}

/// Scores whole populations with a fitness strategy.
pub struct WorkingSet<F> {
    factory: F,
    seed: u64,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl<F> WorkingSet<F> {
    /// Creates a working set; `seed` is the run seed evaluation seeds are
    /// derived from.
    pub fn new(factory: F, seed: u64) -> Self {
        Self {
            factory,
            seed,
            parallel: true,
        }
    }

    /// Enables or disables parallel evaluation.
    ///
    /// Has no effect without the `parallel` feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The fitness strategy.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Scores every genome of `population`.
    ///
    /// The returned roster has the same length as `population` and entry `i`
    /// holds genome `i`, whatever order evaluations complete in. A failed or
    /// non-finite evaluation scores
    /// [`FAULT_FITNESS`](super::FAULT_FITNESS) instead of aborting.
    pub fn evaluate<G>(&self, population: Vec<G>, generation: usize) -> Vec<ScoredIndividual<G>>
    where
        G: NetworkGenome,
        F: EvaluatorFactory<G>,
    {
        let score = |(index, mut genome): (usize, G)| {
            let slot = EvaluationSlot {
                generation,
                index,
                seed: evaluation_seed(self.seed, generation, index),
            };
            match score_genome(&self.factory, &mut genome, slot) {
                Ok(fitness) => ScoredIndividual::new(genome, fitness),
                Err(e) => {
                    log::warn!("generation {generation}: individual {index} faulted: {e}");
                    ScoredIndividual::faulted(genome)
                }
            }
        };

        #[cfg(feature = "parallel")]
        if self.parallel {
            return population.into_par_iter().enumerate().map(score).collect();
        }

        population.into_iter().enumerate().map(score).collect()
    }
}

/// Runs one evaluator to completion.
fn score_genome<G, F>(factory: &F, genome: &mut G, slot: EvaluationSlot) -> Result<f64, EvaluationError>
where
    G: NetworkGenome,
    F: EvaluatorFactory<G>,
{
    let mut evaluator = factory.create(genome, slot);
    evaluator.run_evaluation()?;
    let fitness = evaluator.evaluation();
    if fitness.is_finite() {
        Ok(fitness)
    } else {
        Err(EvaluationError::NonFinite(fitness))
    }
}
