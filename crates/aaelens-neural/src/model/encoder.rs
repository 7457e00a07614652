//! Encoder network Q

use super::{expect_linear, LinearSpec, StateDict};
use crate::layers::{Dense, Layer};
use crate::serialization::WeightLoader;
use crate::ActivationFunction;
use aaelens_core::{ops, Result, Tensor};
use rand::Rng;
use std::path::Path;

/// Encoder `Q`: maps a flattened image to class probabilities (latent y) and a
/// continuous style vector (latent z).
///
/// ```text
/// x ─ lin1 ─ relu ─ lin2 ─ relu ─┬─ lin3cat ─ softmax ─ y
///                                └─ lin3gauss ───────── z
/// ```
///
/// The trained network also applies dropout after `lin1` and `lin2`; that is
/// the identity at evaluation time and is not represented here.
#[derive(Debug, Clone)]
pub struct QNet {
    lin1: Dense<f32>,
    lin2: Dense<f32>,
    lin3cat: Dense<f32>,
    lin3gauss: Dense<f32>,
}

impl QNet {
    /// Randomly initialised encoder, used for smoke runs and tests
    pub fn new_random<R: Rng + ?Sized>(
        input_size: usize,
        hidden: usize,
        n_classes: usize,
        z_dim: usize,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(Self {
            lin1: Dense::new_xavier(input_size, hidden, true, rng)?
                .with_activation(ActivationFunction::ReLU),
            lin2: Dense::new_xavier(hidden, hidden, true, rng)?
                .with_activation(ActivationFunction::ReLU),
            lin3cat: Dense::new_xavier(hidden, n_classes, true, rng)?
                .with_activation(ActivationFunction::Softmax),
            lin3gauss: Dense::new_xavier(hidden, z_dim, true, rng)?,
        })
    }

    /// Load a checkpoint and check it against the declared latent sizes
    pub fn load(path: impl AsRef<Path>, z_dim: usize, n_classes: usize) -> Result<Self> {
        let loaded = WeightLoader::new().load_from_file::<f32>(path.as_ref())?;
        Self::from_state_dict(&loaded.weights, z_dim, n_classes)
    }

    /// Build from PyTorch-style tensors named `lin1.weight`, `lin1.bias`, ...
    pub fn from_state_dict(state: &StateDict, z_dim: usize, n_classes: usize) -> Result<Self> {
        let lin1 = expect_linear(state, "lin1", LinearSpec::any())?;
        let hidden = lin1.output_dim();
        let lin2 = expect_linear(state, "lin2", LinearSpec::exact(hidden, hidden))?;
        let lin3cat = expect_linear(state, "lin3cat", LinearSpec::exact(hidden, n_classes))?;
        let lin3gauss = expect_linear(state, "lin3gauss", LinearSpec::exact(hidden, z_dim))?;

        tracing::debug!(
            input_size = lin1.input_dim(),
            hidden,
            n_classes,
            z_dim,
            "loaded encoder"
        );

        Ok(Self {
            lin1: lin1.with_activation(ActivationFunction::ReLU),
            lin2: lin2.with_activation(ActivationFunction::ReLU),
            lin3cat: lin3cat.with_activation(ActivationFunction::Softmax),
            lin3gauss,
        })
    }

    /// Export in the PyTorch layout accepted by [`QNet::from_state_dict`]
    pub fn state_dict(&self) -> Result<StateDict> {
        let mut state = StateDict::new();
        super::insert_linear(&mut state, "lin1", &self.lin1)?;
        super::insert_linear(&mut state, "lin2", &self.lin2)?;
        super::insert_linear(&mut state, "lin3cat", &self.lin3cat)?;
        super::insert_linear(&mut state, "lin3gauss", &self.lin3gauss)?;
        Ok(state)
    }

    /// Encode a `[batch, input_size]` batch into `(latent_y, latent_z)`
    pub fn encode(&self, x: &Tensor<f32>) -> Result<(Tensor<f32>, Tensor<f32>)> {
        let h = self.lin2.forward(&self.lin1.forward(x)?)?;
        let latent_y = self.lin3cat.forward(&h)?;
        let latent_z = self.lin3gauss.forward(&h)?;
        Ok((latent_y, latent_z))
    }

    /// Most probable class for each row of `x`
    pub fn predict(&self, x: &Tensor<f32>) -> Result<Vec<usize>> {
        let (latent_y, _) = self.encode(x)?;
        ops::argmax(&latent_y, 1)
    }

    pub fn input_size(&self) -> usize {
        self.lin1.input_dim()
    }

    pub fn hidden_size(&self) -> usize {
        self.lin1.output_dim()
    }

    pub fn n_classes(&self) -> usize {
        self.lin3cat.output_dim()
    }

    pub fn z_dim(&self) -> usize {
        self.lin3gauss.output_dim()
    }

    pub fn parameter_count(&self) -> usize {
        [&self.lin1, &self.lin2, &self.lin3cat, &self.lin3gauss]
            .iter()
            .map(|l| l.parameter_count())
            .sum()
    }
}
