//! Offspring production: selection followed by crossover.

use super::operators::Crossover;
use super::selection::Selection;
use super::types::{rank_indices, ScoredIndividual};
use crate::network::NetworkGenome;
use crate::random::create_rng;
use rand::rngs::StdRng;

/// Produces the next generation's genomes from a scored roster.
///
/// Implementations must return exactly `num_to_breed` fresh genomes sharing
/// the parents' topology and must leave the roster untouched.
pub trait Breeder<G: NetworkGenome> {
    /// Breeds `num_to_breed` offspring.
    fn breed(&mut self, roster: &[ScoredIndividual<G>], num_to_breed: usize) -> Vec<G>;
}

/// Rank-based parent selection plus weight crossover.
///
/// # Algorithm
///
/// 1. Rank the roster by fitness, best first; ties keep roster order
/// 2. Drop faulted individuals from the parent pool, unless every
///    individual faulted
/// 3. For each offspring, select two parents with [`Selection`] (with
///    replacement) and combine them with [`Crossover`]
/// 4. If both draws hit the same individual, the child is a clone of it
///
/// A roster with a single individual therefore degrades to cloning.
#[derive(Debug, Clone)]
pub struct GeneticBreeder {
    selection: Selection,
    crossover: Crossover,
    rng: StdRng,
}

impl GeneticBreeder {
    /// Creates a breeder drawing from `rng`.
    pub fn new(selection: Selection, crossover: Crossover, rng: StdRng) -> Self {
        Self {
            selection,
            crossover,
            rng,
        }
    }

    /// Creates a breeder with a generator seeded from `seed`.
    pub fn with_seed(selection: Selection, crossover: Crossover, seed: u64) -> Self {
        Self::new(selection, crossover, create_rng(seed))
    }

    /// The selection strategy.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The crossover scheme.
    pub fn crossover(&self) -> Crossover {
        self.crossover
    }
}

impl<G: NetworkGenome> Breeder<G> for GeneticBreeder {
    fn breed(&mut self, roster: &[ScoredIndividual<G>], num_to_breed: usize) -> Vec<G> {
        if num_to_breed == 0 || roster.is_empty() {
            return Vec::new();
        }

        let order = rank_indices(roster);
        let healthy = order
            .iter()
            .take_while(|&&i| !roster[i].is_faulted())
            .count();
        let pool = if healthy > 0 { &order[..healthy] } else { &order[..] };
        let ranked: Vec<f64> = pool.iter().map(|&i| roster[i].fitness()).collect();

        let mut clones = 0usize;
        let offspring: Vec<G> = (0..num_to_breed)
            .map(|_| {
                let a = pool[self.selection.select(&ranked, &mut self.rng)];
                let b = pool[self.selection.select(&ranked, &mut self.rng)];
                if a == b {
                    clones += 1;
                    roster[a].genome().clone()
                } else {
                    self.crossover
                        .apply(roster[a].genome(), roster[b].genome(), &mut self.rng)
                }
            })
            .collect();

        log::debug!(
            "bred {} offspring from {} parents ({} clones)",
            offspring.len(),
            pool.len(),
            clones
        );
        offspring
    }
}
