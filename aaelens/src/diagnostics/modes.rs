use super::class_latents;
use crate::error::{AaeError, Result};
use crate::figure::{images_from_batch, Figure, ImageGrid};
use aaelens_neural::PNet;

pub const MODES_TITLE: &str = "learned modes";

/// `1 x n_classes` grid of the mode decoder's output per class, each cell
/// captioned with its label
///
/// A decoder with a style input is fed zeros for it.
pub fn show_all_learned_modes(mode_decoder: &PNet, n_classes: usize) -> Result<Figure> {
    if mode_decoder.n_classes() != n_classes {
        return Err(AaeError::invalid_argument(
            "show_all_learned_modes",
            format!(
                "mode decoder expects {} classes, got {n_classes}",
                mode_decoder.n_classes()
            ),
        ));
    }

    let z = vec![0.0; mode_decoder.z_dim()];
    let mut grid = ImageGrid::new(1, n_classes).with_title(MODES_TITLE);
    for label in 0..n_classes {
        let decoded = mode_decoder.decode(&class_latents(n_classes, label, &[z.clone()])?)?;
        if let Some(image) = images_from_batch(&decoded)?.pop() {
            grid.set(0, label, image, Some(label.to_string()))?;
        }
    }
    Ok(Figure::Images(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_modes_row() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(50);
        let mode_decoder = PNet::new_random(5, 0, 8, 16, &mut rng)?;
        let figure = show_all_learned_modes(&mode_decoder, 5)?;
        assert_eq!(figure.title(), Some(MODES_TITLE));

        let grid = figure.as_grid().expect("image grid");
        assert_eq!((grid.rows(), grid.cols()), (1, 5));
        for label in 0..5 {
            let cell = grid.cell(0, label).expect("cell");
            assert_eq!(cell.caption.as_deref(), Some(label.to_string().as_str()));
            assert!(cell.image.is_some());
        }
        Ok(())
    }

    #[test]
    fn test_class_count_checked() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(51);
        let mode_decoder = PNet::new_random(5, 0, 8, 16, &mut rng)?;
        assert!(show_all_learned_modes(&mode_decoder, 6).is_err());
        Ok(())
    }
}
