//! Parent selection strategies.
//!
//! Selection picks parents from a roster already ranked best first, so every
//! strategy returns a *rank position*. Each strategy gives a better-ranked
//! individual at least the selection probability of a worse-ranked one.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use crate::error::ConfigError;
use rand::Rng;

/// Selection strategy for choosing parents.
///
/// All strategies assume **maximization** (higher fitness = better).
///
/// # Examples
///
/// ```
/// use u_neuroevo::evolution::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Only the best 5 individuals breed
/// let sel = Selection::Truncation(5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Truncation selection: uniform among the `k` best-ranked individuals.
    ///
    /// `k` larger than the roster means uniform over the whole roster.
    Truncation(usize),

    /// Tournament selection: draw `k` individuals at random, keep the best.
    ///
    /// Higher `k` = stronger selection pressure.
    /// - k=2: light pressure (good for diversity)
    /// - k=3-5: moderate pressure (typical default)
    /// - k>5: strong pressure (risk of premature convergence)
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Fitness is shifted so the worst individual has a tiny positive weight,
    /// which makes negative fitness values usable.
    ///
    /// **Warning**: Susceptible to super-individual dominance when
    /// fitness variance is high.
    Roulette,

    /// Linear rank selection: weight `n - rank`.
    ///
    /// Avoids the scaling problems of roulette wheel selection.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Validates the strategy parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Selection::Truncation(0) | Selection::Tournament(0) => Err(ConfigError::SelectionSize),
            _ => Ok(()),
        }
    }

    /// Selects a rank position from `ranked`, fitness values sorted best
    /// first.
    ///
    /// # Panics
    /// Panics if `ranked` is empty.
    pub fn select<R: Rng>(&self, ranked: &[f64], rng: &mut R) -> usize {
        assert!(!ranked.is_empty(), "cannot select from empty roster");

        match self {
            Selection::Truncation(k) => truncation(ranked.len(), *k, rng),
            Selection::Tournament(k) => tournament(ranked.len(), *k, rng),
            Selection::Roulette => roulette(ranked, rng),
            Selection::Rank => rank(ranked.len(), rng),
        }
    }
}

fn truncation<R: Rng>(n: usize, k: usize, rng: &mut R) -> usize {
    rng.random_range(0..k.clamp(1, n))
}

/// Positions are ranks, so the smallest drawn position is the winner.
fn tournament<R: Rng>(n: usize, k: usize, rng: &mut R) -> usize {
    (0..k.max(1))
        .map(|_| rng.random_range(0..n))
        .min()
        .unwrap_or(0)
}

/// weight_i = (fitness_i - worst) / (best - worst) + epsilon
///
/// Operands are halved before subtracting so extreme finite fitness values
/// cannot overflow the span.
fn roulette<R: Rng>(ranked: &[f64], rng: &mut R) -> usize {
    let n = ranked.len();
    if n == 1 {
        return 0;
    }

    let (best, worst) = (ranked[0] / 2.0, ranked[n - 1] / 2.0);
    let span = best - worst;
    let epsilon = 1e-10;
    let weights: Vec<f64> = ranked
        .iter()
        .map(|&f| {
            let w = if span > 0.0 { (f / 2.0 - worst) / span } else { 0.0 };
            if w.is_finite() && w > 0.0 {
                w + epsilon
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

fn rank<R: Rng>(n: usize, rng: &mut R) -> usize {
    if n == 1 {
        return 0;
    }

    let total = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for position in 0..n {
        cumulative += (n - position) as f64;
        if cumulative > threshold {
            return position;
        }
    }

    n - 1
}
