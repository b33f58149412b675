//! Engine module - placement search for the CPU opponent

pub mod scorer;

pub use scorer::{find_destination, Destination, ScoreWeights};
