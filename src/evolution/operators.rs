//! Weight-vector crossover operators.
//!
//! Both operators write into a child that starts as a copy of the first
//! parent and copy selected positions from the second parent (the donor).
//! They only visit positions present in both vectors, so parents of
//! different sizes never cause out-of-bounds reads.
//!
//! # Crossover Operators
//!
//! - [`uniform_crossover`]: independent coin flip per weight
//! - [`single_point_crossover`]: one cut point per layer
//!
//! # References
//!
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"
//! - Montana & Davis (1989), "Training Feedforward Neural Networks Using
//!   Genetic Algorithms"

use crate::network::NetworkGenome;
use rand::Rng;
use std::ops::Range;

/// Crossover scheme used by the breeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Each weight comes from either parent with probability 1/2.
    #[default]
    Uniform,

    /// Within each layer, weights before a random cut come from the first
    /// parent and weights after it from the second. Keeps neurons' incoming
    /// weights together more often than [`Crossover::Uniform`].
    SinglePoint,
}

impl Crossover {
    /// Builds a child of `first` and `second`. Neither parent is modified.
    pub fn apply<G: NetworkGenome, R: Rng>(&self, first: &G, second: &G, rng: &mut R) -> G {
        let mut child = first.clone();
        match self {
            Crossover::Uniform => uniform_crossover(child.weights_mut(), second.weights(), rng),
            Crossover::SinglePoint => {
                let spans = first.layer_spans();
                single_point_crossover(child.weights_mut(), second.weights(), &spans, rng);
            }
        }
        child
    }
}

/// Replaces each weight of `child` by the donor's with probability 1/2.
pub fn uniform_crossover<R: Rng>(child: &mut [f64], donor: &[f64], rng: &mut R) {
    for (c, &d) in child.iter_mut().zip(donor) {
        if rng.random_bool(0.5) {
            *c = d;
        }
    }
}

/// For every span, picks a cut in `start..=end` and copies the donor's
/// weights from the cut to the end of the span.
///
/// Spans are clipped to the shorter of the two vectors.
pub fn single_point_crossover<R: Rng>(
    child: &mut [f64],
    donor: &[f64],
    spans: &[Range<usize>],
    rng: &mut R,
) {
    let limit = child.len().min(donor.len());
    for span in spans {
        let start = span.start.min(limit);
        let end = span.end.min(limit);
        if start >= end {
            continue;
        }
        let cut = rng.random_range(start..=end);
        child[cut..end].copy_from_slice(&donor[cut..end]);
    }
}
