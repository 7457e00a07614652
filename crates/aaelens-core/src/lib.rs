//! Core tensor type and numeric ops for aaelens.
//!
//! A small dense CPU tensor built on `scirs2_core::ndarray`,
//! covering what inference through fully connected encoder/decoder networks
//! needs: matrix products, activations, concatenation and row reductions.

pub mod error;
pub mod ops;
pub mod shape;
pub mod tensor;

pub use error::{Result, TensorError};
pub use shape::Shape;
pub use tensor::Tensor;
