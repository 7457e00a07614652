//! The adversarial autoencoder's networks
//!
//! Checkpoints use PyTorch `state_dict` naming: every linear layer `name`
//! contributes `name.weight` (`[out, in]`) and `name.bias` (`[out]`).

pub mod decoder;
pub mod encoder;

pub use decoder::{latent_vector, PNet};
pub use encoder::QNet;

use crate::layers::Dense;
use aaelens_core::{Result, Tensor, TensorError};
use std::collections::HashMap;

/// Named parameter tensors, as stored in a checkpoint
pub type StateDict = HashMap<String, Tensor<f32>>;

/// Expected `(input, output)` dimensions of a linear layer; `None` accepts any size
#[derive(Debug, Clone, Copy)]
pub(crate) struct LinearSpec {
    input: Option<usize>,
    output: Option<usize>,
}

impl LinearSpec {
    pub(crate) fn any() -> Self {
        Self {
            input: None,
            output: None,
        }
    }

    pub(crate) fn input(input: usize) -> Self {
        Self {
            input: Some(input),
            output: None,
        }
    }

    pub(crate) fn exact(input: usize, output: usize) -> Self {
        Self {
            input: Some(input),
            output: Some(output),
        }
    }
}

fn required<'a>(state: &'a StateDict, name: &str) -> Result<&'a Tensor<f32>> {
    state
        .get(name)
        .ok_or_else(|| TensorError::serialization_error("load_model", &format!("missing tensor '{name}'")))
}

/// Both `name.weight` and `name.bias` must be present; every trained layer carries a bias
pub(crate) fn expect_linear(state: &StateDict, name: &str, spec: LinearSpec) -> Result<Dense<f32>> {
    let weight_name = format!("{name}.weight");
    let weight = required(state, &weight_name)?;
    let (output, input) = weight.shape().as_matrix().ok_or_else(|| {
        TensorError::invalid_shape("load_model", &format!("'{weight_name}' must be 2-D"), weight.shape().dims())
    })?;

    let expected_in = spec.input.unwrap_or(input);
    let expected_out = spec.output.unwrap_or(output);
    if (output, input) != (expected_out, expected_in) {
        return Err(TensorError::shape_mismatch(
            "load_model",
            &format!("'{weight_name}' of shape [{expected_out}, {expected_in}]"),
            &weight.shape().to_string(),
        ));
    }

    let bias = required(state, &format!("{name}.bias"))?;
    Dense::from_torch(weight, Some(bias))
}

pub(crate) fn insert_linear(state: &mut StateDict, name: &str, layer: &Dense<f32>) -> Result<()> {
    let (weight, bias) = layer.to_torch()?;
    state.insert(format!("{name}.weight"), weight);
    if let Some(bias) = bias {
        state.insert(format!("{name}.bias"), bias);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_missing_bias_is_named() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(12);
        let mut state = QNet::new_random(9, 5, 3, 2, &mut rng)?.state_dict()?;
        state.remove("lin2.bias");

        match QNet::from_state_dict(&state, 2, 3) {
            Err(TensorError::SerializationError { details, .. }) => assert!(details.contains("lin2.bias")),
            other => panic!("expected a missing tensor error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_missing_weight_is_named() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(13);
        let mut state = PNet::new_random(3, 2, 5, 9, &mut rng)?.state_dict()?;
        state.remove("lin3.weight");

        let err = PNet::from_state_dict(&state, 2, 3).map(|_| ()).unwrap_err();
        assert!(err.to_string().contains("lin3.weight"));
        Ok(())
    }
}
