//! The generational evolution loop.
//!
//! [`EvolutionEngine`] orchestrates the complete process:
//! evaluation → best-performer tracking → breeding → mutation → replacement.

use super::breeder::{Breeder, GeneticBreeder};
use super::config::EvolutionConfig;
use super::evaluation::{EvaluatorFactory, WorkingSet};
use super::mutator::{Mutator, WeightMutator};
use super::types::{best_index, rank_indices, BestPerformer, GenerationStats, ScoredIndividual};
use crate::error::{ConfigError, EvolutionError};
use crate::network::NetworkGenome;
use crate::random::{stream_rng, BREED_STREAM, INIT_STREAM, MUTATE_STREAM};
use std::sync::atomic::{AtomicBool, Ordering};

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Population created, no generation evaluated yet.
    Initialized,

    /// A run is in progress, or was cancelled at a generation boundary.
    Running,

    /// All configured generations ran, or the run hit a fatal error.
    Completed,
}

/// Summary of one call to [`EvolutionEngine::run_simulation`] or
/// [`EvolutionEngine::run_simulation_with_cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Generations executed by this call.
    pub generations: usize,

    /// Whether the call stopped early because of the cancellation flag.
    pub cancelled: bool,
}

/// Evolves a population of network genomes.
///
/// The engine owns the population across generations and keeps the best
/// genome ever scored in a separate [`BestPerformer`] record, which never
/// re-enters the population.
///
/// All randomness of initialization, breeding, and mutation is consumed on
/// the calling thread from streams derived from one run seed, and evaluation
/// draws no shared randomness, so a fixed seed reproduces a run exactly,
/// parallel or not.
///
/// # Usage
///
/// ```
/// use u_neuroevo::error::EvaluationError;
/// use u_neuroevo::evolution::{EvaluationSlot, EvolutionConfig, EvolutionEngine, FitnessFn};
/// use u_neuroevo::network::{FeedForwardNetwork, NetworkConfig, NetworkGenome};
///
/// let config = EvolutionConfig::new(NetworkConfig::new(3, 1).with_hidden_layers(1, 5))
///     .with_population_size(10)
///     .with_generations(5)
///     .with_seed(42);
///
/// let strategy = FitnessFn::new(
///     |net: &mut FeedForwardNetwork, _slot: EvaluationSlot| -> Result<f64, EvaluationError> {
///         Ok(net.evaluate_at(&[0.0, 0.0, 0.0])?.iter().sum())
///     },
/// );
///
/// let mut engine = EvolutionEngine::new(config, strategy).unwrap();
/// engine.run_simulation().unwrap();
///
/// let best = engine.best_performer().unwrap();
/// assert_eq!(best.genome.outputs().len(), 1);
/// ```
pub struct EvolutionEngine<G, F, B = GeneticBreeder, M = WeightMutator> {
    config: EvolutionConfig,
    seed: u64,
    working_set: WorkingSet<F>,
    breeder: B,
    mutator: M,
    population: Vec<G>,
    best: Option<BestPerformer<G>>,
    fitness_history: Vec<f64>,
    history: Vec<GenerationStats>,
    generation: usize,
    state: EngineState,
}

impl<G, F> EvolutionEngine<G, F>
where
    G: NetworkGenome,
    F: EvaluatorFactory<G>,
{
    /// Creates an engine with the default [`GeneticBreeder`] and
    /// [`WeightMutator`], configured from `config`.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if `config` does not validate.
    pub fn new(config: EvolutionConfig, factory: F) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = resolve_seed(&config);
        let breeder = GeneticBreeder::new(
            config.selection,
            config.crossover,
            stream_rng(seed, BREED_STREAM),
        );
        let mutator = WeightMutator::new(config.mutation.clone(), stream_rng(seed, MUTATE_STREAM))?;
        Ok(Self::assemble(config, seed, factory, breeder, mutator))
    }
}

impl<G, F, B, M> EvolutionEngine<G, F, B, M>
where
    G: NetworkGenome,
    F: EvaluatorFactory<G>,
    B: Breeder<G>,
    M: Mutator<G>,
{
    /// Creates an engine with custom breeding and mutation policies.
    ///
    /// `config.selection`, `config.crossover`, and `config.mutation` are
    /// validated but otherwise unused; the supplied policies replace them.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if `config` does not validate.
    pub fn with_policies(
        config: EvolutionConfig,
        factory: F,
        breeder: B,
        mutator: M,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = resolve_seed(&config);
        Ok(Self::assemble(config, seed, factory, breeder, mutator))
    }

    fn assemble(config: EvolutionConfig, seed: u64, factory: F, breeder: B, mutator: M) -> Self {
        let mut rng = stream_rng(seed, INIT_STREAM);
        let population = (0..config.population_size)
            .map(|_| G::random(&config.network, &mut rng))
            .collect();

        Self {
            working_set: WorkingSet::new(factory, seed).with_parallel(config.parallel),
            fitness_history: Vec::with_capacity(config.generations),
            history: Vec::with_capacity(config.generations),
            config,
            seed,
            breeder,
            mutator,
            population,
            best: None,
            generation: 0,
            state: EngineState::Initialized,
        }
    }

    /// Runs every remaining generation.
    ///
    /// # Errors
    /// - [`EvolutionError::AlreadyCompleted`] if the engine already completed
    /// - [`EvolutionError::EvaluationUnavailable`] if every individual of a
    ///   generation failed evaluation
    /// - [`EvolutionError::BreedingShortfall`] if the breeder returned the
    ///   wrong number of offspring
    pub fn run_simulation(&mut self) -> Result<RunOutcome, EvolutionError> {
        self.run_until(|| false)
    }

    /// Runs every remaining generation, checking `cancel` before each one.
    ///
    /// Generation boundaries are the only cancellation points. A cancelled
    /// engine stays [`EngineState::Running`] and a later call resumes where
    /// it stopped.
    pub fn run_simulation_with_cancel(
        &mut self,
        cancel: &AtomicBool,
    ) -> Result<RunOutcome, EvolutionError> {
        self.run_until(|| cancel.load(Ordering::Relaxed))
    }

    fn run_until(&mut self, cancelled: impl Fn() -> bool) -> Result<RunOutcome, EvolutionError> {
        if self.state == EngineState::Completed {
            return Err(EvolutionError::AlreadyCompleted);
        }
        self.state = EngineState::Running;
        log::info!(
            "evolving {} individuals for {} generations (seed {})",
            self.config.population_size,
            self.config.generations - self.generation,
            self.seed
        );

        let mut executed = 0;
        while self.generation < self.config.generations {
            if cancelled() {
                log::info!("run cancelled before generation {}", self.generation);
                return Ok(RunOutcome {
                    generations: executed,
                    cancelled: true,
                });
            }
            if let Err(e) = self.step() {
                log::error!("run aborted in generation {}: {e}", self.generation);
                self.state = EngineState::Completed;
                return Err(e);
            }
            executed += 1;
        }

        self.state = EngineState::Completed;
        if let Some(best) = &self.best {
            log::info!(
                "run completed: best fitness {:.6} from generation {}",
                best.fitness,
                best.generation
            );
        }
        Ok(RunOutcome {
            generations: executed,
            cancelled: false,
        })
    }

    /// Runs one generation.
    fn step(&mut self) -> Result<(), EvolutionError> {
        let generation = self.generation;
        let population = std::mem::take(&mut self.population);
        let roster = self.working_set.evaluate(population, generation);

        let stats = GenerationStats::from_roster(generation, &roster);
        if stats.faults == roster.len() {
            self.population = into_genomes(roster);
            return Err(EvolutionError::EvaluationUnavailable { generation });
        }
        self.record_best(&roster, generation);
        self.history.push(stats);
        log::info!(
            "generation {}: best {:.6}, mean {:.6}, worst {:.6}, faults {}",
            generation,
            stats.best,
            stats.mean,
            stats.worst,
            stats.faults
        );

        let expected = self.config.offspring_count();
        let mut next = self.breeder.breed(&roster, expected);
        if next.len() != expected {
            let actual = next.len();
            self.population = into_genomes(roster);
            return Err(EvolutionError::BreedingShortfall { expected, actual });
        }

        let mutated: usize = next
            .iter_mut()
            .map(|child| self.mutator.mutate(child))
            .sum();
        log::debug!("mutated {mutated} weights across {expected} offspring");

        let survivors = self.config.survivor_count();
        if survivors > 0 {
            let order = rank_indices(&roster);
            let mut slots: Vec<Option<ScoredIndividual<G>>> = roster.into_iter().map(Some).collect();
            next.extend(
                order
                    .iter()
                    .take(survivors)
                    .filter_map(|&i| slots[i].take())
                    .map(ScoredIndividual::into_genome),
            );
        }

        self.population = next;
        self.generation += 1;
        Ok(())
    }

    fn record_best(&mut self, roster: &[ScoredIndividual<G>], generation: usize) {
        if let Some(i) = best_index(roster) {
            let candidate = &roster[i];
            let improved = self
                .best
                .as_ref()
                .map_or(true, |best| candidate.fitness() > best.fitness);
            if improved {
                log::debug!(
                    "new best performer in generation {generation}: {:.6}",
                    candidate.fitness()
                );
                self.best = Some(BestPerformer {
                    genome: candidate.genome().clone(),
                    fitness: candidate.fitness(),
                    generation,
                });
            }
        }
        if let Some(best) = &self.best {
            self.fitness_history.push(best.fitness);
        }
    }
}

impl<G, F, B, M> EvolutionEngine<G, F, B, M> {
    /// Best genome found so far; `None` before the first generation.
    pub fn best_performer(&self) -> Option<&BestPerformer<G>> {
        self.best.as_ref()
    }

    /// Consumes the engine, returning the best performer.
    pub fn into_best_performer(self) -> Option<BestPerformer<G>> {
        self.best
    }

    /// Current population.
    pub fn population(&self) -> &[G] {
        &self.population
    }

    /// Per-generation fitness summaries.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Best-performer fitness after each generation.
    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    /// Number of generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Seed the run was derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The run configuration.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }
}

fn resolve_seed(config: &EvolutionConfig) -> u64 {
    config.seed.unwrap_or_else(rand::random)
}

fn into_genomes<G>(roster: Vec<ScoredIndividual<G>>) -> Vec<G> {
    roster.into_iter().map(ScoredIndividual::into_genome).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;
    use crate::evolution::{EvaluationSlot, FitnessFn, MutationConfig, Selection};
    use crate::network::{FeedForwardNetwork, NetworkConfig};

    type Net = FeedForwardNetwork;
    type Strategy = fn(&mut Net, EvaluationSlot) -> Result<f64, EvaluationError>;

    fn topology() -> NetworkConfig {
        NetworkConfig::new(3, 1).with_hidden_layers(1, 5)
    }

    fn config() -> EvolutionConfig {
        EvolutionConfig::new(topology())
            .with_population_size(10)
            .with_generations(5)
            .with_mutation(MutationConfig::default().with_probability(0.1))
            .with_seed(42)
            .with_parallel(false)
    }

    fn output_sum(net: &mut Net, _slot: EvaluationSlot) -> Result<f64, EvaluationError> {
        Ok(net.evaluate_at(&[0.0, 0.0, 0.0])?.iter().sum())
    }

    /// Rewards networks whose first weight is close to 3.
    fn near_three(net: &mut Net, _slot: EvaluationSlot) -> Result<f64, EvaluationError> {
        Ok(-(net.weights()[0] - 3.0).abs())
    }

    fn engine(config: EvolutionConfig, f: Strategy) -> EvolutionEngine<Net, FitnessFn<Strategy>> {
        EvolutionEngine::new(config, FitnessFn::new(f)).unwrap()
    }

    // ---- Construction ----

    #[test]
    fn test_initialized_state() {
        let e = engine(config(), output_sum);
        assert_eq!(e.state(), EngineState::Initialized);
        assert_eq!(e.population().len(), 10);
        assert!(e.best_performer().is_none());
        assert_eq!(e.generation(), 0);
        assert_eq!(e.seed(), 42);
        for net in e.population() {
            assert_eq!(net.config(), &topology());
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = EvolutionEngine::<Net, _>::new(
            config().with_offspring_count(0),
            FitnessFn::new(output_sum as Strategy),
        );
        assert!(matches!(result, Err(ConfigError::OffspringCount { .. })));

        let result = EvolutionEngine::<Net, _>::new(
            config().with_population_size(0),
            FitnessFn::new(output_sum as Strategy),
        );
        assert!(matches!(result, Err(ConfigError::EmptyPopulation)));
    }

    #[test]
    fn test_random_seed_is_reported() {
        let mut c = config();
        c.seed = None;
        let a = engine(c.clone(), output_sum);
        let b = engine(c.with_seed(a.seed()), output_sum);
        assert_eq!(a.population(), b.population());
    }

    // ---- Running ----

    #[test]
    fn test_run_completes() {
        let mut e = engine(config(), output_sum);
        let outcome = e.run_simulation().unwrap();

        assert_eq!(
            outcome,
            RunOutcome {
                generations: 5,
                cancelled: false
            }
        );
        assert_eq!(e.state(), EngineState::Completed);
        assert_eq!(e.generation(), 5);
        assert_eq!(e.population().len(), 10);
        assert_eq!(e.history().len(), 5);
        assert_eq!(e.fitness_history().len(), 5);
        let best = e.best_performer().unwrap();
        assert_eq!(best.genome.outputs().len(), 1);
        assert!(best.fitness.is_finite());
    }

    #[test]
    fn test_rerun_after_completion_fails() {
        let mut e = engine(config(), output_sum);
        e.run_simulation().unwrap();
        assert_eq!(e.run_simulation(), Err(EvolutionError::AlreadyCompleted));
    }

    #[test]
    fn test_first_generation_best_is_initial_max() {
        let mut e = engine(config().with_generations(1), output_sum);
        let expected = e
            .population()
            .iter()
            .map(|net| {
                let mut net = net.clone();
                output_sum(&mut net, EvaluationSlot {
                    generation: 0,
                    index: 0,
                    seed: 0,
                })
                .unwrap()
            })
            .fold(f64::NEG_INFINITY, f64::max);

        e.run_simulation().unwrap();

        let best = e.best_performer().unwrap();
        assert_eq!(best.fitness, expected);
        assert_eq!(best.generation, 0);
    }

    #[test]
    fn test_best_fitness_monotone() {
        let mut e = engine(config().with_generations(30), near_three);
        e.run_simulation().unwrap();
        for pair in e.fitness_history().windows(2) {
            assert!(pair[1] >= pair[0], "best fitness decreased: {pair:?}");
        }
        let best = e.best_performer().unwrap();
        assert_eq!(Some(&best.fitness), e.fitness_history().last());
    }

    #[test]
    fn test_evolution_improves_fitness() {
        let c = config()
            .with_population_size(30)
            .with_generations(60)
            .with_selection(Selection::Tournament(3))
            .with_mutation(MutationConfig::default().with_probability(0.3).with_magnitude(0.3));
        let mut e = engine(c, near_three);
        e.run_simulation().unwrap();

        let first = e.history()[0].best;
        let best = e.best_performer().unwrap().fitness;
        assert!(best > first, "expected improvement: {first} -> {best}");
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut a = engine(config().with_generations(10), near_three);
        let mut b = engine(config().with_generations(10), near_three);
        a.run_simulation().unwrap();
        b.run_simulation().unwrap();

        let (a, b) = (a.best_performer().unwrap(), b.best_performer().unwrap());
        assert_eq!(a.genome.weights(), b.genome.weights());
        assert_eq!(a.fitness, b.fitness);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = engine(config().with_generations(10).with_parallel(false), near_three);
        let mut b = engine(config().with_generations(10).with_parallel(true), near_three);
        a.run_simulation().unwrap();
        b.run_simulation().unwrap();
        assert_eq!(
            a.best_performer().unwrap().genome.weights(),
            b.best_performer().unwrap().genome.weights()
        );
    }

    #[test]
    fn test_survivors_carried_over() {
        // Fitness is the first weight; with a zero-probability mutator and a
        // single offspring, the best 9 individuals must survive verbatim.
        let c = config()
            .with_generations(1)
            .with_offspring_count(1)
            .with_mutation(MutationConfig::default().with_probability(0.0));
        let first_weight: Strategy = |net, _| Ok(net.weights()[0]);
        let mut e = engine(c, first_weight);

        let mut initial: Vec<Net> = e.population().to_vec();
        initial.sort_by(|a, b| b.weights()[0].total_cmp(&a.weights()[0]));

        e.run_simulation().unwrap();

        assert_eq!(e.population().len(), 10);
        assert_eq!(&e.population()[1..], &initial[..9]);
    }

    // ---- Faults ----

    #[test]
    fn test_partial_faults_do_not_abort() {
        let flaky: Strategy = |net, slot| {
            if slot.index % 3 == 0 {
                Err(EvaluationError::Failed("blew up".into()))
            } else {
                Ok(net.weights()[0])
            }
        };
        let mut e = engine(config(), flaky);
        e.run_simulation().unwrap();

        assert_eq!(e.state(), EngineState::Completed);
        assert!(e.history().iter().all(|s| s.faults == 4));
        assert!(e.best_performer().unwrap().fitness.is_finite());
    }

    #[test]
    fn test_all_faults_is_fatal() {
        let broken: Strategy = |_, _| Ok(f64::NAN);
        let mut e = engine(config(), broken);

        assert_eq!(
            e.run_simulation(),
            Err(EvolutionError::EvaluationUnavailable { generation: 0 })
        );
        assert_eq!(e.state(), EngineState::Completed);
        assert_eq!(e.population().len(), 10);
        assert!(e.best_performer().is_none());
    }

    // ---- Custom policies ----

    struct ShortBreeder;

    impl Breeder<Net> for ShortBreeder {
        fn breed(&mut self, roster: &[ScoredIndividual<Net>], _num_to_breed: usize) -> Vec<Net> {
            vec![roster[0].genome().clone()]
        }
    }

    struct NoMutation;

    impl Mutator<Net> for NoMutation {
        fn mutate(&mut self, _genome: &mut Net) -> usize {
            0
        }
    }

    #[test]
    fn test_breeding_shortfall_is_fatal() {
        let mut e = EvolutionEngine::with_policies(
            config(),
            FitnessFn::new(output_sum as Strategy),
            ShortBreeder,
            NoMutation,
        )
        .unwrap();

        assert_eq!(
            e.run_simulation(),
            Err(EvolutionError::BreedingShortfall {
                expected: 10,
                actual: 1
            })
        );
        assert_eq!(e.population().len(), 10);
        assert!(e.best_performer().is_some());
    }

    // ---- Cancellation ----

    #[test]
    fn test_cancel_before_start() {
        let mut e = engine(config(), output_sum);
        let cancel = AtomicBool::new(true);

        let outcome = e.run_simulation_with_cancel(&cancel).unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.generations, 0);
        assert_eq!(e.state(), EngineState::Running);
        assert!(e.best_performer().is_none());
    }

    #[test]
    fn test_resume_after_cancel() {
        let mut e = engine(config(), output_sum);
        let cancel = AtomicBool::new(true);
        e.run_simulation_with_cancel(&cancel).unwrap();

        cancel.store(false, Ordering::Relaxed);
        let outcome = e.run_simulation_with_cancel(&cancel).unwrap();

        assert!(!outcome.cancelled);
        assert_eq!(outcome.generations, 5);
        assert_eq!(e.state(), EngineState::Completed);
    }
}
