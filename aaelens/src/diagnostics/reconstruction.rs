use crate::error::{AaeError, Result};
use crate::figure::{images_from_batch, Figure, ImageGrid};
use aaelens_core::{ops, Tensor};
use aaelens_neural::{latent_vector, PNet, QNet};

/// First image of `x` next to its reconstruction through `Q` then `P`,
/// titled with the predicted label
pub fn show_reconstruction(q: &QNet, p: &PNet, x: &Tensor<f32>) -> Result<Figure> {
    let (latent_y, latent_z) = q.encode(x)?;
    let reconstructed = p.decode(&latent_vector(&latent_y, &latent_z)?)?;

    let label = ops::argmax(&latent_y, 1)?
        .first()
        .copied()
        .ok_or_else(|| AaeError::invalid_argument("show_reconstruction", "empty batch"))?;

    let mut originals = images_from_batch(&x.row(0)?)?;
    let mut outputs = images_from_batch(&reconstructed.row(0)?)?;

    let mut grid = ImageGrid::new(1, 2).with_title(format!("predicted label: {label}"));
    if let (Some(original), Some(output)) = (originals.pop(), outputs.pop()) {
        grid.set(0, 0, original, None)?;
        grid.set(0, 1, output, None)?;
    }
    Ok(Figure::Images(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reconstruction_pair() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(10);
        let q = QNet::new_random(16, 8, 3, 2, &mut rng)?;
        let p = PNet::new_random(3, 2, 8, 16, &mut rng)?;
        let x = Tensor::<f32>::full(&[4, 16], 0.3);

        let figure = show_reconstruction(&q, &p, &x)?;
        let expected = q.predict(&x)?[0];
        assert_eq!(figure.title(), Some(format!("predicted label: {expected}").as_str()));

        let grid = figure.as_grid().ok_or_else(|| AaeError::invalid_argument("test", "not a grid"))?;
        assert_eq!((grid.rows(), grid.cols()), (1, 2));
        assert_eq!(grid.image(0, 0).map(|i| i.side()), Some(4));
        assert!(grid.image(0, 1).is_some());
        Ok(())
    }

    #[test]
    fn test_empty_batch_rejected() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let q = QNet::new_random(4, 4, 2, 1, &mut rng)?;
        let p = PNet::new_random(2, 1, 4, 4, &mut rng)?;
        assert!(show_reconstruction(&q, &p, &Tensor::zeros(&[0, 4])).is_err());
        Ok(())
    }
}
