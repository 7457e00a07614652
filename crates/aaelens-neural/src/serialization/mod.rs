//! Checkpoint serialization

pub mod weight_loader;

pub use weight_loader::{LoadConfig, LoadResult, WeightFormat, WeightLoader};
