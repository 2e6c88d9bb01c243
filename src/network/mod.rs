//! Network genomes.
//!
//! The evolution engine is generic over [`NetworkGenome`]; this module also
//! ships [`FeedForwardNetwork`], a dense fixed-topology implementation.
//!
//! # Key Types
//!
//! - [`NetworkConfig`]: Topology shared by every individual of a run
//! - [`NetworkGenome`]: Weight access plus forward pass, as seen by evaluators
//! - [`Summation`] / [`Activation`]: Per-neuron functions

mod config;
mod feed_forward;
mod functions;
mod types;

pub use config::NetworkConfig;
pub use feed_forward::FeedForwardNetwork;
pub use functions::{Activation, Summation};
pub use types::NetworkGenome;
