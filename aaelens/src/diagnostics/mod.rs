//! The diagnostic figures and scores
//!
//! Each function runs the networks over data it is handed and returns a
//! figure model or a value. None of them touch the filesystem.

pub mod accuracy;
pub mod class_samples;
pub mod distributions;
pub mod generation;
pub mod modes;
pub mod reconstruction;
pub mod traversal;

pub use accuracy::unsupervised_accuracy_score;
pub use class_samples::{show_sample_from_each_class, show_samples_of_classes_and_reconstructions};
pub use distributions::{plot_latent_distribution, plot_predicted_label_distribution};
pub use generation::generate_digits;
pub use modes::show_all_learned_modes;
pub use reconstruction::show_reconstruction;
pub use traversal::show_learned_latent_features;

use crate::error::{AaeError, Result};
use aaelens_core::Tensor;
use aaelens_neural::{latent_vector, PNet};

/// The decoder must accept exactly `n_classes + z_dim` latent inputs
pub(crate) fn check_decoder(p: &PNet, n_classes: usize, z_dim: usize) -> Result<()> {
    if p.n_classes() != n_classes || p.z_dim() != z_dim {
        return Err(AaeError::invalid_argument(
            "decoder",
            format!(
                "decoder expects n_classes={} z_dim={}, got n_classes={n_classes} z_dim={z_dim}",
                p.n_classes(),
                p.z_dim()
            ),
        ));
    }
    Ok(())
}

/// `[rows, n_classes + z.len()]` latent batch: one-hot `label` on every row,
/// followed by that row's style vector
pub(crate) fn class_latents(n_classes: usize, label: usize, z: &[Vec<f32>]) -> Result<Tensor<f32>> {
    if label >= n_classes {
        return Err(AaeError::invalid_argument(
            "class_latents",
            format!("label {label} out of range for {n_classes} classes"),
        ));
    }
    let rows = z.len();
    let z_dim = z.first().map_or(0, Vec::len);
    let mut y = vec![0.0f32; rows * n_classes];
    for row in 0..rows {
        y[row * n_classes + label] = 1.0;
    }
    let y = Tensor::from_vec(y, &[rows, n_classes])?;
    let z = Tensor::from_vec(z.concat(), &[rows, z_dim])?;
    Ok(latent_vector(&y, &z)?)
}
