//! Data shared between the working set, breeder, and engine.

use crate::network::NetworkGenome;

/// Fitness assigned to an individual whose evaluation failed.
///
/// Finite, so every fitness in a roster stays comparable, and lower than any
/// fitness a working evaluator can return.
pub const FAULT_FITNESS: f64 = f64::MIN;

/// A genome paired with the fitness it scored in one generation.
///
/// Higher fitness is better (maximization).
#[derive(Debug, Clone)]
pub struct ScoredIndividual<G> {
    genome: G,
    fitness: f64,
    faulted: bool,
}

impl<G> ScoredIndividual<G> {
    /// Pairs a genome with a successfully computed fitness.
    ///
    /// A non-finite `fitness` is recorded as a fault.
    pub fn new(genome: G, fitness: f64) -> Self {
        if fitness.is_finite() {
            Self {
                genome,
                fitness,
                faulted: false,
            }
        } else {
            Self::faulted(genome)
        }
    }

    /// Records a failed evaluation.
    pub fn faulted(genome: G) -> Self {
        Self {
            genome,
            fitness: FAULT_FITNESS,
            faulted: true,
        }
    }

    /// The scored genome.
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Fitness; [`FAULT_FITNESS`] when faulted.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Whether the evaluator failed for this individual.
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Releases the genome.
    pub fn into_genome(self) -> G {
        self.genome
    }
}

/// Roster indices ordered best first.
///
/// Ties keep input order, so ranking is deterministic.
pub fn rank_indices<G>(roster: &[ScoredIndividual<G>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..roster.len()).collect();
    // Stable sort: equal fitness keeps first-seen order.
    order.sort_by(|&a, &b| roster[b].fitness.total_cmp(&roster[a].fitness));
    order
}

/// Index of the best non-faulted individual; first seen wins ties.
pub fn best_index<G>(roster: &[ScoredIndividual<G>]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, ind) in roster.iter().enumerate() {
        if ind.faulted {
            continue;
        }
        match best {
            Some(b) if roster[b].fitness >= ind.fitness => {}
            _ => best = Some(i),
        }
    }
    best
}

/// The best genome observed across all generations of a run.
#[derive(Debug, Clone)]
pub struct BestPerformer<G> {
    /// Copy of the best genome.
    pub genome: G,

    /// Its fitness.
    pub fitness: f64,

    /// Zero-based generation in which it was scored.
    pub generation: usize,
}

/// Fitness summary of one generation.
///
/// `best`, `worst`, and `mean` cover non-faulted individuals only; they are
/// [`FAULT_FITNESS`] when every individual faulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,

    /// Highest fitness.
    pub best: f64,

    /// Lowest fitness.
    pub worst: f64,

    /// Mean fitness.
    pub mean: f64,

    /// Number of individuals whose evaluation failed.
    pub faults: usize,
}

impl GenerationStats {
    /// Summarizes a scored roster.
    pub fn from_roster<G: NetworkGenome>(generation: usize, roster: &[ScoredIndividual<G>]) -> Self {
        let scores: Vec<f64> = roster
            .iter()
            .filter(|ind| !ind.faulted)
            .map(|ind| ind.fitness)
            .collect();
        let faults = roster.len() - scores.len();

        if scores.is_empty() {
            return Self {
                generation,
                best: FAULT_FITNESS,
                worst: FAULT_FITNESS,
                mean: FAULT_FITNESS,
                faults,
            };
        }

        let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = scores
            .iter()
            .zip(1usize..)
            .fold(0.0, |mean, (&x, k)| mean + (x - mean) / k as f64);

        Self {
            generation,
            best,
            worst,
            mean,
            faults,
        }
    }
}
