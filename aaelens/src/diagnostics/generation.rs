use super::{check_decoder, class_latents};
use crate::error::{AaeError, Result};
use crate::figure::{images_from_batch, Figure, ImageGrid};
use aaelens_neural::PNet;
use rand::Rng;
use rand_distr::StandardNormal;

/// Images per row of the generated grid
pub const GENERATED_COLUMNS: usize = 8;

/// Decode `count` digits of class `label` with styles drawn from `N(0, 1)`
pub fn generate_digits<R: Rng + ?Sized>(
    p: &PNet,
    label: usize,
    n_classes: usize,
    z_dim: usize,
    count: usize,
    rng: &mut R,
) -> Result<Figure> {
    check_decoder(p, n_classes, z_dim)?;
    if label >= n_classes {
        return Err(AaeError::invalid_argument(
            "generate_digits",
            format!("label {label} out of range for {n_classes} classes"),
        ));
    }
    if count == 0 {
        return Err(AaeError::invalid_argument("generate_digits", "count must be at least 1"));
    }

    let styles: Vec<Vec<f32>> = (0..count)
        .map(|_| (0..z_dim).map(|_| rng.sample(StandardNormal)).collect())
        .collect();
    let decoded = p.decode(&class_latents(n_classes, label, &styles)?)?;

    let cols = count.min(GENERATED_COLUMNS);
    let rows = count.div_ceil(cols);
    let mut grid = ImageGrid::new(rows, cols).with_title(format!("generated digits for label {label}"));
    for (i, image) in images_from_batch(&decoded)?.into_iter().enumerate() {
        grid.set(i / cols, i % cols, image, None)?;
    }
    tracing::debug!(label, count, "generated digits");
    Ok(Figure::Images(grid))
}
