use crate::layers::Layer;
use crate::ActivationFunction;
use aaelens_core::{ops, Result, Tensor, TensorError};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use scirs2_core::num_traits::Float;

/// Fully connected layer computing `activation(x · W + b)`.
///
/// The weight is stored as `[input_dim, output_dim]`. Checkpoints written by
/// PyTorch's `nn.Linear` hold `[output_dim, input_dim]`; use [`Dense::from_torch`]
/// for those.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense<T> {
    weight: Tensor<T>,
    bias: Option<Tensor<T>>,
    activation: ActivationFunction,
}

impl<T: Float> Dense<T> {
    pub fn new(input_dim: usize, output_dim: usize, use_bias: bool) -> Self {
        Self {
            weight: Tensor::zeros(&[input_dim, output_dim]),
            bias: use_bias.then(|| Tensor::zeros(&[output_dim])),
            activation: ActivationFunction::Linear,
        }
    }

    /// Create Dense layer with Xavier/Glorot initialization
    pub fn new_xavier<R: Rng + ?Sized>(
        input_dim: usize,
        output_dim: usize,
        use_bias: bool,
        rng: &mut R,
    ) -> Result<Self> {
        let std_dev = (2.0 / (input_dim + output_dim).max(1) as f64).sqrt();
        let normal = Normal::new(0.0, std_dev).map_err(|e| {
            TensorError::invalid_argument_op("new_xavier", &e.to_string())
        })?;
        let data = (0..input_dim * output_dim)
            .map(|_| T::from(normal.sample(rng)).unwrap_or_else(T::zero))
            .collect();

        Ok(Self {
            weight: Tensor::from_vec(data, &[input_dim, output_dim])?,
            bias: use_bias.then(|| Tensor::zeros(&[output_dim])),
            activation: ActivationFunction::Linear,
        })
    }

    /// Build from an `[output_dim, input_dim]` weight as stored by PyTorch
    pub fn from_torch(weight: &Tensor<T>, bias: Option<&Tensor<T>>) -> Result<Self> {
        let (output_dim, _) = weight.shape().as_matrix().ok_or_else(|| {
            TensorError::invalid_shape("Dense::from_torch", "weight must be 2-D", weight.shape().dims())
        })?;
        if let Some(b) = bias {
            if b.rank() != 1 || b.numel() != output_dim {
                return Err(TensorError::shape_mismatch(
                    "Dense::from_torch",
                    &format!("bias [{output_dim}]"),
                    &b.shape().to_string(),
                ));
            }
        }

        Ok(Self {
            weight: ops::transpose(weight)?,
            bias: bias.cloned(),
            activation: ActivationFunction::Linear,
        })
    }

    /// Weight and bias in PyTorch `nn.Linear` layout
    pub fn to_torch(&self) -> Result<(Tensor<T>, Option<Tensor<T>>)> {
        Ok((ops::transpose(&self.weight)?, self.bias.clone()))
    }

    pub fn with_activation(mut self, activation: ActivationFunction) -> Self {
        self.activation = activation;
        self
    }

    pub fn weight(&self) -> &Tensor<T> {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Tensor<T>> {
        self.bias.as_ref()
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn input_dim(&self) -> usize {
        self.weight.shape()[0]
    }

    pub fn output_dim(&self) -> usize {
        self.weight.shape()[1]
    }
}

impl<T: Float + 'static> Layer<T> for Dense<T> {
    fn forward(&self, input: &Tensor<T>) -> Result<Tensor<T>> {
        let (_, features) = input.shape().as_matrix().ok_or_else(|| {
            TensorError::invalid_shape("Dense::forward", "input must be [batch, features]", input.shape().dims())
        })?;
        if features != self.input_dim() {
            return Err(TensorError::shape_mismatch(
                "Dense::forward",
                &format!("[_, {}]", self.input_dim()),
                &input.shape().to_string(),
            ));
        }

        let output = ops::matmul(input, &self.weight)?;
        let output = match self.bias {
            Some(ref bias) => ops::add_row_broadcast(&output, bias)?,
            None => output,
        };

        self.activation.apply(&output)
    }

    fn parameters(&self) -> Vec<&Tensor<T>> {
        let mut params = vec![&self.weight];
        if let Some(ref bias) = self.bias {
            params.push(bias);
        }
        params
    }
}
