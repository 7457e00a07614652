//! Decoder network P

use super::{expect_linear, LinearSpec, StateDict};
use crate::layers::{forward_all, Dense, Layer};
use crate::serialization::WeightLoader;
use crate::ActivationFunction;
use aaelens_core::{ops, Result, Tensor, TensorError};
use rand::Rng;
use std::path::Path;

/// Decoder `P`: maps `[latent_y | latent_z]` back to pixel intensities in `[0, 1]`.
///
/// ```text
/// [y | z] ─ lin1 ─ relu ─ lin2 ─ relu ─ lin3 ─ sigmoid ─ x
/// ```
///
/// A mode decoder is a `PNet` with `z_dim == 0`: its input is the class vector only.
#[derive(Debug, Clone)]
pub struct PNet {
    lin1: Dense<f32>,
    lin2: Dense<f32>,
    lin3: Dense<f32>,
    n_classes: usize,
    z_dim: usize,
}

impl PNet {
    pub fn new_random<R: Rng + ?Sized>(
        n_classes: usize,
        z_dim: usize,
        hidden: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(Self {
            lin1: Dense::new_xavier(n_classes + z_dim, hidden, true, rng)?
                .with_activation(ActivationFunction::ReLU),
            lin2: Dense::new_xavier(hidden, hidden, true, rng)?
                .with_activation(ActivationFunction::ReLU),
            lin3: Dense::new_xavier(hidden, output_size, true, rng)?
                .with_activation(ActivationFunction::Sigmoid),
            n_classes,
            z_dim,
        })
    }

    /// Load a checkpoint and check it against the declared latent sizes
    pub fn load(path: impl AsRef<Path>, z_dim: usize, n_classes: usize) -> Result<Self> {
        let loaded = WeightLoader::new().load_from_file::<f32>(path.as_ref())?;
        Self::from_state_dict(&loaded.weights, z_dim, n_classes)
    }

    pub fn from_state_dict(state: &StateDict, z_dim: usize, n_classes: usize) -> Result<Self> {
        let lin1 = expect_linear(state, "lin1", LinearSpec::input(n_classes + z_dim))?;
        let hidden = lin1.output_dim();
        let lin2 = expect_linear(state, "lin2", LinearSpec::exact(hidden, hidden))?;
        let lin3 = expect_linear(state, "lin3", LinearSpec::input(hidden))?;

        tracing::debug!(
            n_classes,
            z_dim,
            hidden,
            output_size = lin3.output_dim(),
            "loaded decoder"
        );

        Ok(Self {
            lin1: lin1.with_activation(ActivationFunction::ReLU),
            lin2: lin2.with_activation(ActivationFunction::ReLU),
            lin3: lin3.with_activation(ActivationFunction::Sigmoid),
            n_classes,
            z_dim,
        })
    }

    pub fn state_dict(&self) -> Result<StateDict> {
        let mut state = StateDict::new();
        super::insert_linear(&mut state, "lin1", &self.lin1)?;
        super::insert_linear(&mut state, "lin2", &self.lin2)?;
        super::insert_linear(&mut state, "lin3", &self.lin3)?;
        Ok(state)
    }

    /// Decode a `[batch, n_classes + z_dim]` latent batch
    pub fn decode(&self, latent: &Tensor<f32>) -> Result<Tensor<f32>> {
        let layers: [&dyn Layer<f32>; 3] = [&self.lin1, &self.lin2, &self.lin3];
        forward_all(&layers, latent)
    }

    /// Decode a single class with the given style vector
    pub fn decode_class(&self, label: usize, z: &[f32]) -> Result<Tensor<f32>> {
        if z.len() != self.z_dim {
            return Err(TensorError::shape_mismatch(
                "PNet::decode_class",
                &format!("z of length {}", self.z_dim),
                &format!("length {}", z.len()),
            ));
        }
        let y = Tensor::<f32>::one_hot_row(self.n_classes, label)?;
        let z = Tensor::from_vec(z.to_vec(), &[1, self.z_dim])?;
        self.decode(&latent_vector(&y, &z)?)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn z_dim(&self) -> usize {
        self.z_dim
    }

    pub fn output_size(&self) -> usize {
        self.lin3.output_dim()
    }

    pub fn is_mode_decoder(&self) -> bool {
        self.z_dim == 0
    }
}

/// Concatenate latent y and latent z column-wise into decoder input
pub fn latent_vector(latent_y: &Tensor<f32>, latent_z: &Tensor<f32>) -> Result<Tensor<f32>> {
    ops::concat(&[latent_y, latent_z], 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_decode_range() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(4);
        let p = PNet::new_random(3, 2, 8, 16, &mut rng)?;
        let out = p.decode_class(1, &[0.0, 0.0])?;
        assert_eq!(out.shape().dims(), &[1, 16]);
        assert!(out.to_vec().iter().all(|v| (0.0..=1.0).contains(v)));
        Ok(())
    }

    #[test]
    fn test_mode_decoder_takes_class_only() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let p = PNet::new_random(4, 0, 8, 9, &mut rng)?;
        assert!(p.is_mode_decoder());
        assert_eq!(p.decode_class(3, &[])?.shape().dims(), &[1, 9]);
        assert!(p.decode_class(3, &[0.0]).is_err());
        Ok(())
    }

    #[test]
    fn test_state_dict_checks_latent_width() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(6);
        let state = PNet::new_random(4, 2, 8, 9, &mut rng)?.state_dict()?;
        assert!(PNet::from_state_dict(&state, 2, 4).is_ok());
        assert!(PNet::from_state_dict(&state, 0, 4).is_err());
        Ok(())
    }
}
