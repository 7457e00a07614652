use super::reconstruction::show_reconstruction;
use super::{check_decoder, class_latents};
use crate::error::Result;
use crate::figure::{images_from_batch, Figure, GrayImage, ImageGrid};
use aaelens_core::Tensor;
use aaelens_dataset::{DataLoader, Dataset};
use aaelens_neural::{PNet, QNet};

/// Batch samples shown next to each class mode
pub const SAMPLES_PER_CLASS: usize = 8;

pub const CLASS_SAMPLES_TITLE: &str = "Representative mode & samples from each possible label";

/// `n_classes x 9` grid: column 0 holds the decoded mode of the row's class
/// (one-hot y, zero z), the other columns the first images of `x` the
/// encoder assigns to that class. Classes with fewer samples keep empty cells.
pub fn show_sample_from_each_class(
    q: &QNet,
    p: &PNet,
    x: &Tensor<f32>,
    n_classes: usize,
    z_dim: usize,
) -> Result<Figure> {
    check_decoder(p, n_classes, z_dim)?;
    let predicted = q.predict(x)?;
    let images = images_from_batch(x)?;

    let mut grid = ImageGrid::new(n_classes, SAMPLES_PER_CLASS + 1).with_title(CLASS_SAMPLES_TITLE);
    for label in 0..n_classes {
        let mode = p.decode(&class_latents(n_classes, label, &[vec![0.0; z_dim]])?)?;
        if let Some(mode) = images_from_batch(&mode)?.pop() {
            grid.set(label, 0, mode, None)?;
        }

        let members: Vec<&GrayImage> = predicted
            .iter()
            .zip(&images)
            .filter(|&(&pred, _)| pred == label)
            .map(|(_, image)| image)
            .take(SAMPLES_PER_CLASS)
            .collect();
        for (col, image) in members.into_iter().enumerate() {
            grid.set(label, col + 1, image.clone(), None)?;
        }
    }
    Ok(Figure::Images(grid))
}

/// For every batch of `loader`: the class sample grid, then the reconstruction
pub fn show_samples_of_classes_and_reconstructions<D: Dataset<f32>>(
    q: &QNet,
    p: &PNet,
    loader: &DataLoader<D>,
    n_classes: usize,
    z_dim: usize,
) -> Result<Vec<Figure>> {
    let mut figures = Vec::with_capacity(loader.num_batches() * 2);
    for batch in loader.iter() {
        let batch = batch?;
        figures.push(show_sample_from_each_class(q, p, &batch.images, n_classes, z_dim)?);
        figures.push(show_reconstruction(q, p, &batch.images)?);
    }
    Ok(figures)
}
