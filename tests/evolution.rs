//! End-to-end runs of the evolution engine.

use rand::Rng;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use u_neuroevo::error::{ConfigError, EvaluationError, EvolutionError};
use u_neuroevo::evolution::{
    Crossover, EngineState, EvaluationSlot, Evaluator, EvaluatorFactory, EvolutionConfig,
    EvolutionEngine, FitnessFn, MutationConfig, Perturbation, Selection,
};
use u_neuroevo::network::{Activation, FeedForwardNetwork, NetworkConfig, NetworkGenome};
use u_neuroevo::random::create_rng;

type Net = FeedForwardNetwork;
type Strategy = fn(&mut Net, EvaluationSlot) -> Result<f64, EvaluationError>;

fn small_config() -> EvolutionConfig {
    EvolutionConfig::new(NetworkConfig::new(3, 1).with_hidden_layers(1, 5))
        .with_population_size(10)
        .with_generations(5)
        .with_mutation(MutationConfig::default().with_probability(0.1))
        .with_seed(42)
}

fn output_sum(net: &mut Net, _slot: EvaluationSlot) -> Result<f64, EvaluationError> {
    Ok(net.evaluate_at(&[0.0, 0.0, 0.0])?.iter().sum())
}

// ---- A hand-written evaluator: mean squared error on XOR ----

const XOR: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

struct XorFactory {
    created: Arc<AtomicUsize>,
}

struct XorEvaluator<'g> {
    net: &'g mut Net,
    error: Option<f64>,
}

impl Evaluator for XorEvaluator<'_> {
    fn run_evaluation(&mut self) -> Result<(), EvaluationError> {
        let mut error = 0.0;
        for (inputs, target) in &XOR {
            let out = self.net.evaluate_at(inputs)?[0];
            error += (out - target).powi(2);
        }
        self.error = Some(error / XOR.len() as f64);
        Ok(())
    }

    fn evaluation(&self) -> f64 {
        self.error.map_or(f64::NAN, |e| -e)
    }
}

impl EvaluatorFactory<Net> for XorFactory {
    type Evaluator<'g> = XorEvaluator<'g>;

    fn create<'g>(&'g self, genome: &'g mut Net, _slot: EvaluationSlot) -> XorEvaluator<'g> {
        self.created.fetch_add(1, Ordering::Relaxed);
        XorEvaluator {
            net: genome,
            error: None,
        }
    }
}

// ---- Scenarios ----

#[test]
fn test_small_run_completes() {
    let strategy = FitnessFn::new(output_sum as Strategy);
    let mut engine = EvolutionEngine::new(small_config(), strategy).unwrap();

    let outcome = engine.run_simulation().unwrap();

    assert_eq!(outcome.generations, 5);
    assert!(!outcome.cancelled);
    assert_eq!(engine.state(), EngineState::Completed);
    let best = engine.best_performer().unwrap();
    assert_eq!(best.genome.outputs().len(), 1);
    assert_eq!(best.genome.weights().len(), 26);
}

#[test]
fn test_one_generation_keeps_initial_best() {
    let strategy = FitnessFn::new(output_sum as Strategy);
    let mut engine = EvolutionEngine::new(small_config().with_generations(1), strategy).unwrap();

    let mut initial: Vec<Net> = engine.population().to_vec();
    let expected = initial
        .iter_mut()
        .map(|net| net.evaluate_at(&[0.0, 0.0, 0.0]).unwrap().iter().sum::<f64>())
        .fold(f64::NEG_INFINITY, f64::max);

    engine.run_simulation().unwrap();

    assert_eq!(engine.best_performer().unwrap().fitness, expected);
}

#[test]
fn test_zero_offspring_rejected() {
    let strategy = FitnessFn::new(output_sum as Strategy);
    let result = EvolutionEngine::new(small_config().with_offspring_count(0), strategy);
    assert!(matches!(
        result,
        Err(ConfigError::OffspringCount {
            offspring_count: 0,
            ..
        })
    ));
}

#[test]
fn test_custom_factory_evaluates_every_genome() {
    let created = Arc::new(AtomicUsize::new(0));
    let factory = XorFactory {
        created: Arc::clone(&created),
    };
    let config = EvolutionConfig::new(
        NetworkConfig::new(2, 1)
            .with_hidden_layers(1, 4)
            .with_output_activation(Activation::Sigmoid),
    )
    .with_population_size(40)
    .with_generations(25)
    .with_selection(Selection::Tournament(3))
    .with_crossover(Crossover::SinglePoint)
    .with_offspring_count(36)
    .with_seed(3);
    let mut engine = EvolutionEngine::new(config, factory).unwrap();

    engine.run_simulation().unwrap();

    assert_eq!(engine.history().len(), 25);
    assert_eq!(created.load(Ordering::Relaxed), 40 * 25);
    let first = engine.history()[0].best;
    let best = engine.best_performer().unwrap();
    assert!(best.fitness >= first);
    assert!(best.fitness <= 0.0);
}

#[test]
fn test_every_policy_combination_runs() {
    let selections = [
        Selection::Truncation(3),
        Selection::Tournament(2),
        Selection::Roulette,
        Selection::Rank,
    ];
    let crossovers = [Crossover::Uniform, Crossover::SinglePoint];
    let perturbations = [Perturbation::Uniform, Perturbation::Gaussian];

    for &selection in &selections {
        for &crossover in &crossovers {
            for &perturbation in &perturbations {
                let config = small_config()
                    .with_selection(selection)
                    .with_crossover(crossover)
                    .with_mutation(
                        MutationConfig::default()
                            .with_perturbation(perturbation)
                            .with_weight_bound(3.0),
                    );
                let strategy = FitnessFn::new(output_sum as Strategy);
                let mut engine = EvolutionEngine::new(config, strategy).unwrap();
                engine.run_simulation().unwrap();
                assert_eq!(engine.population().len(), 10);
            }
        }
    }
}

#[test]
fn test_stochastic_evaluator_reproducible_in_parallel() {
    // The fitness depends on random scenario draws seeded from the slot.
    let noisy: Strategy = |net, slot| {
        let mut rng = create_rng(slot.seed);
        let inputs: Vec<f64> = (0..3).map(|_| rng.random_range(-1.0..1.0)).collect();
        Ok(net.evaluate_at(&inputs)?[0])
    };

    let run = |parallel: bool| {
        let config = small_config().with_generations(8).with_parallel(parallel);
        let mut engine = EvolutionEngine::new(config, FitnessFn::new(noisy)).unwrap();
        engine.run_simulation().unwrap();
        engine.into_best_performer().unwrap()
    };

    let sequential = run(false);
    let parallel = run(true);
    let again = run(true);
    assert_eq!(sequential.genome.weights(), parallel.genome.weights());
    assert_eq!(parallel.genome.weights(), again.genome.weights());
    assert_eq!(sequential.fitness, parallel.fitness);
}

#[test]
fn test_faulting_evaluator_does_not_abort() {
    let picky: Strategy = |net, _| {
        let out = net.evaluate_at(&[0.0, 0.0, 0.0])?[0];
        if out < 0.0 {
            Err(EvaluationError::Failed("negative output".into()))
        } else {
            Ok(out)
        }
    };
    let config = small_config().with_population_size(30);
    let mut engine = EvolutionEngine::new(config, FitnessFn::new(picky)).unwrap();

    match engine.run_simulation() {
        Ok(_) => {
            assert!(engine.best_performer().unwrap().fitness >= 0.0);
            assert!(engine.history().iter().all(|s| s.best >= 0.0));
        }
        // Possible only if a whole generation turned negative.
        Err(e) => assert!(matches!(e, EvolutionError::EvaluationUnavailable { .. })),
    }
}

#[test]
fn test_wrong_input_length_is_a_fault() {
    let wrong: Strategy = |net, _| Ok(net.evaluate_at(&[0.0])?[0]);
    let mut engine = EvolutionEngine::new(small_config(), FitnessFn::new(wrong)).unwrap();
    assert_eq!(
        engine.run_simulation(),
        Err(EvolutionError::EvaluationUnavailable { generation: 0 })
    );
    assert_eq!(engine.state(), EngineState::Completed);
    assert_eq!(engine.run_simulation(), Err(EvolutionError::AlreadyCompleted));
}

#[test]
fn test_cancel_from_evaluator() {
    let cancel = AtomicBool::new(false);
    let calls = AtomicUsize::new(0);
    let strategy = FitnessFn::new(|net: &mut Net, _slot: EvaluationSlot| -> Result<f64, EvaluationError> {
        // Trip the flag during generation 2.
        if calls.fetch_add(1, Ordering::Relaxed) == 25 {
            cancel.store(true, Ordering::Relaxed);
        }
        Ok(net.weights()[0])
    });
    let config = small_config().with_generations(10).with_parallel(false);
    let mut engine = EvolutionEngine::new(config, strategy).unwrap();

    let outcome = engine.run_simulation_with_cancel(&cancel).unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.generations, 3);
    assert_eq!(engine.generation(), 3);
    assert_eq!(engine.state(), EngineState::Running);
}

#[test]
fn test_extreme_ranges_construct_and_run() {
    let config = EvolutionConfig::new(NetworkConfig::new(3, 1).with_weight_range(1e308))
        .with_population_size(6)
        .with_generations(2)
        .with_mutation(MutationConfig::default().with_probability(1.0).with_magnitude(1e308))
        .with_seed(5);
    let strategy = FitnessFn::new(output_sum as Strategy);
    let mut engine = EvolutionEngine::new(config, strategy).unwrap();

    assert_eq!(engine.population().len(), 6);
    // Saturated networks may fault, but nothing panics.
    let _ = engine.run_simulation();
    assert_eq!(engine.state(), EngineState::Completed);
}
