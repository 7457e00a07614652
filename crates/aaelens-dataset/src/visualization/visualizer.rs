//! Histogram and label-count computation

use super::types::{Histogram, LabelDistribution};
use aaelens_core::{Result, TensorError};
use scirs2_core::num_traits::ToPrimitive;

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their own range.
    ///
    /// The maximum value lands in the last bin. When all values are equal
    /// every value lands in bin 0. Without values the range is `[0, 1]`.
    pub fn compute<T: ToPrimitive>(values: &[T], bins: usize) -> Result<Self> {
        let values = to_f64(values)?;
        let (lo, hi) = values
            .iter()
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((0.0, 1.0));
        Self::bin(&values, bins, lo, hi)
    }

    /// Bin `values` over the fixed range `[lo, hi]`; values outside are dropped
    pub fn compute_in_range<T: ToPrimitive>(values: &[T], bins: usize, lo: f64, hi: f64) -> Result<Self> {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(TensorError::invalid_argument_op(
                "Histogram::compute_in_range",
                &format!("empty range [{lo}, {hi}]"),
            ));
        }
        Self::bin(&to_f64(values)?, bins, lo, hi)
    }

    fn bin(values: &[f64], bins: usize, lo: f64, hi: f64) -> Result<Self> {
        if bins == 0 {
            return Err(TensorError::invalid_argument_op(
                "Histogram::compute",
                "bins must be at least 1",
            ));
        }

        let range = hi - lo;
        let bin_width = if range > 0.0 { range / bins as f64 } else { 1.0 };
        let mut bin_counts = vec![0; bins];

        for &v in values {
            if v < lo || v > hi {
                continue;
            }
            let index = if range > 0.0 {
                (((v - lo) / bin_width) as usize).min(bins - 1)
            } else {
                0
            };
            bin_counts[index] += 1;
        }

        Ok(Self {
            min_value: lo,
            max_value: hi,
            bin_width,
            bin_counts,
        })
    }

    pub fn bins(&self) -> usize {
        self.bin_counts.len()
    }

    pub fn total(&self) -> usize {
        self.bin_counts.iter().sum()
    }

    /// `bins + 1` edges from `min_value` to `max_value`
    pub fn bin_edges(&self) -> Vec<f64> {
        (0..=self.bins())
            .map(|i| self.min_value + self.bin_width * i as f64)
            .collect()
    }
}

fn to_f64<T: ToPrimitive>(values: &[T]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|v| {
            v.to_f64()
                .filter(|x| x.is_finite())
                .ok_or_else(|| TensorError::invalid_argument("histogram values must be finite".to_string()))
        })
        .collect()
}

impl LabelDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_labels(labels: &[usize]) -> Self {
        let mut dist = Self::new();
        dist.extend(labels);
        dist
    }

    pub fn extend(&mut self, labels: &[usize]) {
        for &label in labels {
            *self.counts.entry(label).or_default() += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn count(&self, label: usize) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Distinct labels seen, ascending
    pub fn labels(&self) -> Vec<usize> {
        self.counts.keys().copied().collect()
    }

    /// Histogram with one unit-wide bin per label in `0..n_classes`
    pub fn histogram(&self, n_classes: usize) -> Result<Histogram> {
        let values: Vec<usize> = self
            .counts
            .iter()
            .flat_map(|(&label, &count)| std::iter::repeat(label).take(count))
            .collect();
        Histogram::compute_in_range(&values, n_classes, -0.5, n_classes as f64 - 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_max_value_in_last_bin() -> Result<()> {
        let hist = Histogram::compute(&[0.0f32, 0.5, 1.0], 4)?;
        assert_eq!(hist.bin_counts, vec![1, 0, 1, 1]);
        assert_relative_eq!(hist.bin_width, 0.25);
        assert_eq!(hist.bin_edges().len(), 5);
        Ok(())
    }

    #[test]
    fn test_degenerate_range_uses_first_bin() -> Result<()> {
        let hist = Histogram::compute(&[2.0f64, 2.0, 2.0], 5)?;
        assert_eq!(hist.bin_counts, vec![3, 0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_empty_values() -> Result<()> {
        let hist = Histogram::compute::<f32>(&[], 3)?;
        assert_eq!(hist.total(), 0);
        assert_relative_eq!(hist.max_value, 1.0);
        Ok(())
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(Histogram::compute(&[1.0f32], 0).is_err());
        assert!(Histogram::compute(&[f32::NAN], 2).is_err());
    }

    #[test]
    fn test_compute_in_range_drops_outliers() -> Result<()> {
        let hist = Histogram::compute_in_range(&[-1.0, 0.0, 0.4, 1.0, 2.0], 2, 0.0, 1.0)?;
        assert_eq!(hist.bin_counts, vec![2, 1]);
        assert!(Histogram::compute_in_range(&[0.0], 2, 1.0, 0.0).is_err());
        Ok(())
    }

    #[test]
    fn test_label_distribution_counts() -> Result<()> {
        let mut dist = LabelDistribution::from_labels(&[2, 0, 2, 5]);
        dist.extend(&[2]);
        assert_eq!(dist.total(), 5);
        assert_eq!(dist.count(2), 3);
        assert_eq!(dist.count(7), 0);
        assert_eq!(dist.labels(), vec![0, 2, 5]);

        let hist = dist.histogram(6)?;
        assert_eq!(hist.bin_counts, vec![1, 0, 3, 0, 0, 1]);
        Ok(())
    }
}
