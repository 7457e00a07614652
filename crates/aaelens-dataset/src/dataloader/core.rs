//! Core DataLoader functionality

use crate::Dataset;
use aaelens_core::{Result, Tensor, TensorError};

/// Configuration for DataLoader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLoaderConfig {
    pub batch_size: usize,
    /// Drop a trailing batch smaller than `batch_size`
    pub drop_last: bool,
    /// Stop after this many batches
    pub max_batches: Option<usize>,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            drop_last: false,
            max_batches: None,
        }
    }
}

impl DataLoaderConfig {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }

    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    pub fn max_batches(mut self, max_batches: Option<usize>) -> Self {
        self.max_batches = max_batches;
        self
    }
}

/// A batch of flattened images with their integer labels
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// `[batch, features]`
    pub images: Tensor<f32>,
    pub labels: Vec<usize>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Sequential loader: samples are read in index order, never shuffled
#[derive(Debug, Clone)]
pub struct DataLoader<D> {
    dataset: D,
    config: DataLoaderConfig,
}

impl<D: Dataset<f32>> DataLoader<D> {
    pub fn new(dataset: D, config: DataLoaderConfig) -> Self {
        Self { dataset, config }
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &DataLoaderConfig {
        &self.config
    }

    /// Number of batches `iter` yields
    pub fn num_batches(&self) -> usize {
        let batch_size = self.config.batch_size.max(1);
        let len = self.dataset.len();
        let full = if self.config.drop_last {
            len / batch_size
        } else {
            len.div_ceil(batch_size)
        };
        match self.config.max_batches {
            Some(max) => full.min(max),
            None => full,
        }
    }

    pub fn iter(&self) -> BatchIter<'_, D> {
        BatchIter {
            loader: self,
            next_batch: 0,
            total: self.num_batches(),
        }
    }

    /// Load batch `index` in sequential order
    pub fn batch(&self, index: usize) -> Result<Batch> {
        if self.config.batch_size == 0 {
            return Err(TensorError::invalid_argument_op(
                "DataLoader::batch",
                "batch_size must be at least 1",
            ));
        }
        let start = index * self.config.batch_size;
        let end = (start + self.config.batch_size).min(self.dataset.len());
        if start >= end {
            return Err(TensorError::invalid_argument_op(
                "DataLoader::batch",
                &format!("batch {index} is past the end of a dataset of {} samples", self.dataset.len()),
            ));
        }

        let mut pixels = Vec::new();
        let mut labels = Vec::with_capacity(end - start);
        let mut features = None;
        for i in start..end {
            let (image, label) = self.dataset.get(i)?;
            match features {
                None => features = Some(image.numel()),
                Some(n) if n != image.numel() => {
                    return Err(TensorError::shape_mismatch(
                        "DataLoader::batch",
                        &format!("{n} features"),
                        &format!("{} features in sample {i}", image.numel()),
                    ));
                }
                Some(_) => {}
            }
            pixels.extend(image.to_vec());
            labels.push(label_index(&label)?);
        }

        let images = Tensor::from_vec(pixels, &[labels.len(), features.unwrap_or(0)])?;
        Ok(Batch { images, labels })
    }

    /// The first batch, as the single-batch diagnostics use it
    pub fn first_batch(&self) -> Result<Batch> {
        if self.num_batches() == 0 {
            return Err(TensorError::invalid_argument_op(
                "DataLoader::first_batch",
                "the loader yields no batches",
            ));
        }
        self.batch(0)
    }
}

fn label_index(label: &Tensor<f32>) -> Result<usize> {
    match label.to_vec().as_slice() {
        [value] if *value >= 0.0 && value.fract() == 0.0 => Ok(*value as usize),
        other => Err(TensorError::invalid_argument_op(
            "DataLoader::batch",
            &format!("label must be a single non-negative integer, got {other:?}"),
        )),
    }
}

/// Iterator over the batches of a [`DataLoader`]
pub struct BatchIter<'a, D> {
    loader: &'a DataLoader<D>,
    next_batch: usize,
    total: usize,
}

impl<D: Dataset<f32>> Iterator for BatchIter<'_, D> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_batch >= self.total {
            return None;
        }
        let batch = self.loader.batch(self.next_batch);
        self.next_batch += 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next_batch;
        (remaining, Some(remaining))
    }
}
