pub mod dense;

pub use dense::Dense;

use aaelens_core::{Result, Tensor};

/// A network building block usable for inference
pub trait Layer<T> {
    fn forward(&self, input: &Tensor<T>) -> Result<Tensor<T>>;

    fn parameters(&self) -> Vec<&Tensor<T>>;

    /// Total number of scalar parameters
    fn parameter_count(&self) -> usize {
        self.parameters().iter().map(|p| p.numel()).sum()
    }
}

/// Run `input` through `layers` in order
pub fn forward_all<T>(layers: &[&dyn Layer<T>], input: &Tensor<T>) -> Result<Tensor<T>>
where
    T: Clone,
{
    let mut x = input.clone();
    for layer in layers {
        x = layer.forward(&x)?;
    }
    Ok(x)
}
