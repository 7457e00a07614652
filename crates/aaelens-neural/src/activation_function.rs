use aaelens_core::{ops, Result, Tensor};
use scirs2_core::num_traits::Float;

/// Type-safe activation function enum for compile-time dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationFunction {
    /// Identity
    #[default]
    Linear,
    ReLU,
    Sigmoid,
    Tanh,
    /// Row-wise softmax, turns logits into class probabilities
    Softmax,
}

impl ActivationFunction {
    /// Apply the activation function to a tensor
    pub fn apply<T: Float>(&self, input: &Tensor<T>) -> Result<Tensor<T>> {
        match self {
            ActivationFunction::Linear => Ok(input.clone()),
            ActivationFunction::ReLU => ops::relu(input),
            ActivationFunction::Sigmoid => ops::sigmoid(input),
            ActivationFunction::Tanh => ops::tanh(input),
            ActivationFunction::Softmax => ops::softmax(input),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Linear => "linear",
            ActivationFunction::ReLU => "relu",
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::Softmax => "softmax",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_is_identity() -> Result<()> {
        let x = Tensor::from_vec(vec![-1.0f32, 2.0], &[1, 2])?;
        assert_eq!(ActivationFunction::Linear.apply(&x)?, x);
        assert_eq!(ActivationFunction::ReLU.apply(&x)?.to_vec(), vec![0.0, 2.0]);
        assert_eq!(ActivationFunction::default().name(), "linear");
        Ok(())
    }
}
