//! Numeric operations on 2-D tensors
//!
//! The encoder and decoder are stacks of fully connected layers, so every op
//! here works on `[rows, cols]` tensors with one sample per row.

pub mod activation;
pub mod manipulation;
pub mod matmul;
pub mod reduction;

pub use activation::{relu, sigmoid, softmax, tanh};
pub use manipulation::{column, concat, rows};
pub use matmul::{add_row_broadcast, matmul, transpose};
pub use reduction::{argmax, max};
