// src/lib.rs — Library root for Foresight

pub mod assistant;
pub mod cli;
pub mod export;
pub mod history;
pub mod infra;
pub mod patterns;
pub mod suggest;
pub mod tasks;

pub use assistant::Assistant;
