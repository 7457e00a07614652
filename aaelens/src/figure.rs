//! Figure models
//!
//! Diagnostics build these plain data structures; [`crate::render`] turns
//! them into PNG files. Keeping the two apart lets every figure be checked
//! without a drawing backend.

use crate::error::{AaeError, Result};
use aaelens_core::{ops, Tensor};
use aaelens_dataset::Histogram;

/// Square grayscale image with intensities in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct GrayImage {
    side: usize,
    pixels: Vec<f32>,
}

impl GrayImage {
    /// Wrap `side * side` row-major pixels
    pub fn from_pixels(pixels: Vec<f32>) -> Result<Self> {
        let side = square_side(pixels.len()).ok_or_else(|| {
            AaeError::invalid_argument(
                "GrayImage::from_pixels",
                format!("{} pixels do not form a square image", pixels.len()),
            )
        })?;
        Ok(Self { side, pixels })
    }

    pub fn blank(side: usize) -> Self {
        Self {
            side,
            pixels: vec![0.0; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.side || col >= self.side {
            return None;
        }
        self.pixels.get(row * self.side + col).copied()
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0.0)
    }
}

fn square_side(len: usize) -> Option<usize> {
    let side = (len as f64).sqrt().round() as usize;
    (side > 0 && side * side == len).then_some(side)
}

/// One image per row of a `[batch, side * side]` tensor
pub fn images_from_batch(batch: &Tensor<f32>) -> Result<Vec<GrayImage>> {
    ops::rows(batch)?
        .into_iter()
        .map(GrayImage::from_pixels)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridCell {
    /// `None` renders as an empty (black) cell
    pub image: Option<GrayImage>,
    pub caption: Option<String>,
}

/// `rows x cols` grid of images, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGrid {
    pub title: Option<String>,
    rows: usize,
    cols: usize,
    cells: Vec<GridCell>,
}

impl ImageGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            title: None,
            rows,
            cols,
            cells: vec![GridCell::default(); rows * cols],
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn image(&self, row: usize, col: usize) -> Option<&GrayImage> {
        self.cell(row, col).and_then(|c| c.image.as_ref())
    }

    pub fn set(&mut self, row: usize, col: usize, image: GrayImage, caption: Option<String>) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(AaeError::invalid_argument(
                "ImageGrid::set",
                format!("cell ({row}, {col}) outside a {}x{} grid", self.rows, self.cols),
            ));
        }
        self.cells[row * self.cols + col] = GridCell {
            image: Some(image),
            caption,
        };
        Ok(())
    }

    /// Side of the largest image in the grid, 0 when empty
    pub fn image_side(&self) -> usize {
        self.cells
            .iter()
            .filter_map(|c| c.image.as_ref().map(GrayImage::side))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPlot {
    pub title: String,
    pub x_label: Option<String>,
    pub histogram: Histogram,
}

impl HistogramPlot {
    pub fn new(title: impl Into<String>, histogram: Histogram) -> Self {
        Self {
            title: title.into(),
            x_label: None,
            histogram,
        }
    }

    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Images(ImageGrid),
    Histogram(HistogramPlot),
}

impl Figure {
    pub fn title(&self) -> Option<&str> {
        match self {
            Figure::Images(grid) => grid.title.as_deref(),
            Figure::Histogram(plot) => Some(&plot.title),
        }
    }

    pub fn as_grid(&self) -> Option<&ImageGrid> {
        match self {
            Figure::Images(grid) => Some(grid),
            Figure::Histogram(_) => None,
        }
    }

    pub fn as_histogram(&self) -> Option<&HistogramPlot> {
        match self {
            Figure::Histogram(plot) => Some(plot),
            Figure::Images(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_image_requires_square() {
        assert!(GrayImage::from_pixels(vec![0.0; 784]).is_ok());
        assert!(GrayImage::from_pixels(vec![0.0; 10]).is_err());
        assert!(GrayImage::from_pixels(Vec::new()).is_err());
    }

    #[test]
    fn test_gray_image_access() -> Result<()> {
        let image = GrayImage::from_pixels(vec![0.0, 0.5, 1.0, 0.0])?;
        assert_eq!(image.side(), 2);
        assert_eq!(image.get(0, 1), Some(0.5));
        assert_eq!(image.get(2, 0), None);
        assert!(!image.is_blank());
        assert!(GrayImage::blank(3).is_blank());
        Ok(())
    }

    #[test]
    fn test_grid_cells() -> Result<()> {
        let mut grid = ImageGrid::new(2, 3).with_title("grid");
        grid.set(1, 2, GrayImage::blank(4), Some("7".to_string()))?;
        assert!(grid.image(1, 2).is_some());
        assert!(grid.image(0, 0).is_none());
        assert_eq!(grid.cell(1, 2).and_then(|c| c.caption.as_deref()), Some("7"));
        assert!(grid.set(2, 0, GrayImage::blank(4), None).is_err());
        assert_eq!(grid.image_side(), 4);
        assert_eq!(Figure::Images(grid).title(), Some("grid"));
        Ok(())
    }

    #[test]
    fn test_images_from_batch() -> Result<()> {
        let batch = Tensor::<f32>::zeros(&[3, 9]);
        let images = images_from_batch(&batch)?;
        assert_eq!(images.len(), 3);
        assert_eq!(images[0].side(), 3);
        Ok(())
    }
}
