//! # aaelens-dataset
//!
//! Data access for the autoencoder diagnostics: the [`Dataset`] abstraction,
//! an IDX (MNIST format) loader, a sequential [`DataLoader`](dataloader::DataLoader)
//! and histogram statistics with text rendering.

pub mod dataloader;
pub mod real_datasets;
pub mod visualization;

pub use dataloader::{Batch, DataLoader, DataLoaderConfig};
pub use real_datasets::{IdxDataset, MnistConfig, Split};
pub use visualization::{Histogram, LabelDistribution};

use aaelens_core::{Result, Tensor, TensorError};

/// Indexed collection of `(features, label)` samples
pub trait Dataset<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `index` as `(features, label)`; the label is a scalar tensor
    fn get(&self, index: usize) -> Result<(Tensor<T>, Tensor<T>)>;
}

impl<T, D: Dataset<T> + ?Sized> Dataset<T> for &D {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Result<(Tensor<T>, Tensor<T>)> {
        (**self).get(index)
    }
}

/// In-memory dataset over a `[N, features]` tensor and `N` labels
#[derive(Debug, Clone)]
pub struct TensorDataset<T> {
    features: Tensor<T>,
    labels: Tensor<T>,
}

impl<T: Clone> TensorDataset<T> {
    pub fn new(features: Tensor<T>, labels: Tensor<T>) -> Result<Self> {
        let rows = features.rows_count()?;
        if labels.rank() != 1 || labels.numel() != rows {
            return Err(TensorError::shape_mismatch(
                "TensorDataset::new",
                &format!("[{rows}] labels"),
                &labels.shape().to_string(),
            ));
        }
        Ok(Self { features, labels })
    }

    pub fn features(&self) -> &Tensor<T> {
        &self.features
    }

    pub fn labels(&self) -> &Tensor<T> {
        &self.labels
    }
}

impl<T: Clone> Dataset<T> for TensorDataset<T> {
    fn len(&self) -> usize {
        self.labels.numel()
    }

    fn get(&self, index: usize) -> Result<(Tensor<T>, Tensor<T>)> {
        if index >= self.len() {
            return Err(TensorError::invalid_argument(format!(
                "Index {} out of bounds for dataset of length {}",
                index,
                self.len()
            )));
        }

        let row = self.features.row(index)?;
        let cols = row.numel();
        let label = self
            .labels
            .get(&[index])
            .ok_or_else(|| TensorError::invalid_argument(format!("missing label {index}")))?;
        Ok((row.reshape(&[cols])?, Tensor::from_vec(vec![label], &[])?))
    }
}
