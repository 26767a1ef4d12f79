// src/patterns/mod.rs — Sequence mining and next-action prediction

pub mod miner;
pub mod predictor;

pub use miner::{MiningReport, Pattern, PatternMiner, PatternRegistry};
pub use predictor::{Prediction, PredictionSource, Predictor};
