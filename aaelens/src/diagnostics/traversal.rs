use super::{check_decoder, class_latents};
use crate::error::{AaeError, Result};
use crate::figure::{images_from_batch, Figure, ImageGrid};
use aaelens_core::Tensor;
use aaelens_neural::PNet;

pub const TRAVERSAL_STEPS: usize = 10;

pub const TRAVERSAL_TITLE: &str = "latent feature impact of decoded image";

/// Values taken by `z[0]` along each row of the traversal grid
pub fn traversal_values() -> Result<Vec<f32>> {
    Ok(Tensor::<f32>::linspace(-1.0, 1.0, TRAVERSAL_STEPS)?.to_vec())
}

/// `n_classes x 10` grid: row `c` decodes class `c` while `z[0]` sweeps
/// `[-1, 1]`; the remaining style components stay at zero
pub fn show_learned_latent_features(p: &PNet, n_classes: usize, z_dim: usize) -> Result<Figure> {
    check_decoder(p, n_classes, z_dim)?;
    if z_dim == 0 {
        return Err(AaeError::invalid_argument(
            "show_learned_latent_features",
            "z_dim must be at least 1",
        ));
    }

    let styles: Vec<Vec<f32>> = traversal_values()?
        .into_iter()
        .map(|z0| {
            let mut z = vec![0.0; z_dim];
            z[0] = z0;
            z
        })
        .collect();

    let mut grid = ImageGrid::new(n_classes, TRAVERSAL_STEPS).with_title(TRAVERSAL_TITLE);
    for label in 0..n_classes {
        let decoded = p.decode(&class_latents(n_classes, label, &styles)?)?;
        for (col, image) in images_from_batch(&decoded)?.into_iter().enumerate() {
            grid.set(label, col, image, None)?;
        }
    }
    Ok(Figure::Images(grid))
}
