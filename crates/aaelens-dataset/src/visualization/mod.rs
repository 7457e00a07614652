//! Distribution statistics for diagnostics
//!
//! - `types`: histogram and label-count data structures
//! - `visualizer`: how they are computed from raw values
//! - `formatting`: text bar charts

pub mod formatting;
pub mod types;
pub mod visualizer;

pub use types::{Histogram, LabelDistribution};

#[cfg(test)]
mod tests {
    use super::*;
    use aaelens_core::Result;

    #[test]
    fn test_histogram_display_bars() -> Result<()> {
        let hist = Histogram::compute(&[0.0f32, 0.1, 0.9, 1.0], 2)?;
        let text = hist.display(10);
        assert!(text.contains("Bin 0:"));
        assert!(text.contains("Bin 1:"));
        assert!(text.contains(&"█".repeat(10)));
        Ok(())
    }

    #[test]
    fn test_label_distribution_display() {
        let dist = LabelDistribution::from_labels(&[3, 3, 1]);
        let text = dist.display(4);
        assert!(text.starts_with("Label distribution (3 samples)"));
        assert!(text.contains("label 3:"));
    }
}
