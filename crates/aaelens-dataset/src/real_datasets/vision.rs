//! IDX image datasets (MNIST layout)

use crate::Dataset;
use aaelens_core::{Result, Tensor, TensorError};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::common::{byte_utils, error_utils, validation, IDX_IMAGES_MAGIC, IDX_LABELS_MAGIC};

/// Which half of the dataset to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum Split {
    Train,
    #[default]
    Validation,
}

impl Split {
    /// Base names of the `(images, labels)` files
    pub fn file_stems(&self) -> (&'static str, &'static str) {
        match self {
            Split::Train => ("train-images-idx3-ubyte", "train-labels-idx1-ubyte"),
            Split::Validation => ("t10k-images-idx3-ubyte", "t10k-labels-idx1-ubyte"),
        }
    }
}

/// Configuration for MNIST dataset loading
#[derive(Debug, Clone)]
pub struct MnistConfig {
    /// Directory holding the IDX files, directly or under `MNIST/raw/`
    pub root: PathBuf,
    pub split: Split,
}

impl Default for MnistConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("../data"),
            split: Split::Validation,
        }
    }
}

impl MnistConfig {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    /// Find `stem` (plain or gzipped) in the root or its `MNIST/raw` subdirectory
    pub fn locate(&self, stem: &str) -> Option<PathBuf> {
        let dirs = [self.root.clone(), self.root.join("MNIST").join("raw")];
        dirs.iter()
            .flat_map(|dir| [dir.join(stem), dir.join(format!("{stem}.gz"))])
            .find(|path| path.is_file())
    }
}

/// Digits read from a pair of IDX files, images flattened to `[n, rows * cols]`
/// and scaled to `[0, 1]`
#[derive(Debug, Clone)]
pub struct IdxDataset {
    images: Tensor<f32>,
    labels: Vec<usize>,
    rows: usize,
    cols: usize,
    split: Split,
}

impl IdxDataset {
    pub fn new(config: MnistConfig) -> Result<Self> {
        let (images_stem, labels_stem) = config.split.file_stems();
        let (Some(images_path), Some(labels_path)) =
            (config.locate(images_stem), config.locate(labels_stem))
        else {
            return Err(error_utils::dataset_not_found_error(
                "MNIST",
                &format!(
                    "Expected {images_stem} and {labels_stem} (optionally .gz) in {} or {}",
                    config.root.display(),
                    config.root.join("MNIST").join("raw").display()
                ),
            ));
        };

        let dataset = Self::from_bytes(
            &read_maybe_gz(&images_path)?,
            &read_maybe_gz(&labels_path)?,
            config.split,
        )?;
        tracing::info!(
            images = %images_path.display(),
            samples = dataset.len(),
            rows = dataset.rows,
            cols = dataset.cols,
            "loaded IDX dataset"
        );
        Ok(dataset)
    }

    /// Parse in-memory IDX image and label files
    pub fn from_bytes(images: &[u8], labels: &[u8], split: Split) -> Result<Self> {
        let images = parse_images(images)?;
        let labels = parse_labels(labels)?;
        let count = images.count;
        if labels.len() != count {
            return Err(error_utils::invalid_format_error(
                "MNIST labels",
                &format!(
                    "Label count {} doesn't match image count {}",
                    labels.len(),
                    count
                ),
            ));
        }

        Ok(Self {
            images: Tensor::from_vec(images.pixels, &[count, images.image_size])?,
            labels,
            rows: images.rows,
            cols: images.cols,
            split,
        })
    }

    /// All images as `[n, rows * cols]`
    pub fn images(&self) -> &Tensor<f32> {
        &self.images
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn image_dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn feature_size(&self) -> usize {
        self.rows * self.cols
    }

    pub fn split(&self) -> Split {
        self.split
    }

    /// Largest label plus one
    pub fn num_classes(&self) -> usize {
        self.labels.iter().max().map_or(0, |m| m + 1)
    }
}

impl Dataset<f32> for IdxDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn get(&self, index: usize) -> Result<(Tensor<f32>, Tensor<f32>)> {
        let label = *self.labels.get(index).ok_or_else(|| {
            TensorError::invalid_argument(format!(
                "Index {} out of bounds for dataset of length {}",
                index,
                self.labels.len()
            ))
        })?;
        let image = self.images.row(index)?.reshape(&[self.feature_size()])?;
        Ok((image, Tensor::from_vec(vec![label as f32], &[])?))
    }
}

fn read_maybe_gz(path: &Path) -> Result<Vec<u8>> {
    validation::validate_file_exists(path, "IDX")?;
    let mut file = File::open(path)
        .map_err(|e| error_utils::io_error_with_context(e, "open IDX file", path))?;

    let mut bytes = Vec::new();
    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    let read = if gzipped {
        GzDecoder::new(file).read_to_end(&mut bytes)
    } else {
        file.read_to_end(&mut bytes)
    };
    read.map_err(|e| error_utils::io_error_with_context(e, "read IDX file", path))?;
    Ok(bytes)
}

fn check_magic(bytes: &[u8], expected: u32, what: &str) -> Result<()> {
    match byte_utils::header_field(bytes, 0) {
        Some(magic) if magic == expected => Ok(()),
        Some(magic) => Err(error_utils::invalid_format_error(
            what,
            &format!("Invalid magic number {magic}, expected {expected}"),
        )),
        None => Err(error_utils::invalid_format_error(what, "missing header")),
    }
}

struct IdxImages {
    /// Scaled to `[0, 1]`
    pixels: Vec<f32>,
    count: usize,
    rows: usize,
    cols: usize,
    image_size: usize,
}

fn parse_images(bytes: &[u8]) -> Result<IdxImages> {
    check_magic(bytes, IDX_IMAGES_MAGIC, "MNIST images")?;
    validation::validate_length(bytes, 16, "MNIST images header")?;

    let field = |i| byte_utils::header_field(bytes, i).map_or(0, |v| v as usize);
    let (count, rows, cols) = (field(1), field(2), field(3));

    // header sizes are untrusted
    let sizes = rows
        .checked_mul(cols)
        .filter(|&image_size| image_size > 0 || count == 0)
        .and_then(|image_size| Some((image_size, count.checked_mul(image_size)?.checked_add(16)?)));
    let (image_size, end) = sizes.ok_or_else(|| {
        error_utils::invalid_format_error(
            "MNIST images",
            &format!("header declares an impossible size: {count} images of {rows}x{cols}"),
        )
    })?;
    validation::validate_length(bytes, end, "MNIST pixel data")?;

    let pixels = bytes[16..end]
        .iter()
        .map(|&pixel| pixel as f32 / 255.0)
        .collect();
    Ok(IdxImages {
        pixels,
        count,
        rows,
        cols,
        image_size,
    })
}

fn parse_labels(bytes: &[u8]) -> Result<Vec<usize>> {
    check_magic(bytes, IDX_LABELS_MAGIC, "MNIST labels")?;
    validation::validate_length(bytes, 8, "MNIST labels header")?;

    let count = byte_utils::header_field(bytes, 1).map_or(0, |v| v as usize);
    let end = count.checked_add(8).ok_or_else(|| {
        error_utils::invalid_format_error("MNIST labels", &format!("header declares {count} labels"))
    })?;
    validation::validate_length(bytes, end, "MNIST label data")?;
    Ok(bytes[8..end].iter().map(|&l| l as usize).collect())
}

/// Encode images and labels as IDX files; used to build fixtures
pub fn encode_idx(images: &[Vec<u8>], rows: usize, cols: usize, labels: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut image_bytes = Vec::with_capacity(16 + images.len() * rows * cols);
    for field in [IDX_IMAGES_MAGIC, images.len() as u32, rows as u32, cols as u32] {
        image_bytes.extend_from_slice(&field.to_be_bytes());
    }
    for image in images {
        image_bytes.extend_from_slice(image);
    }

    let mut label_bytes = Vec::with_capacity(8 + labels.len());
    for field in [IDX_LABELS_MAGIC, labels.len() as u32] {
        label_bytes.extend_from_slice(&field.to_be_bytes());
    }
    label_bytes.extend_from_slice(labels);
    (image_bytes, label_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_idx_pair() -> Result<()> {
        let (images, labels) = encode_idx(&[vec![0, 255, 51, 102], vec![255; 4]], 2, 2, &[3, 7]);
        let dataset = IdxDataset::from_bytes(&images, &labels, Split::Validation)?;
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.image_dims(), (2, 2));
        assert_eq!(dataset.images().shape().dims(), &[2, 4]);
        assert_eq!(dataset.labels(), &[3, 7]);
        assert_eq!(dataset.num_classes(), 8);

        let (image, label) = dataset.get(0)?;
        let pixels = image.to_vec();
        assert_relative_eq!(pixels[1], 1.0);
        assert_relative_eq!(pixels[2], 0.2, epsilon = 1e-6);
        assert_eq!(label.to_vec(), vec![3.0]);
        Ok(())
    }

    #[test]
    fn test_bad_magic_rejected() {
        let (images, labels) = encode_idx(&[vec![0; 4]], 2, 2, &[1]);
        assert!(IdxDataset::from_bytes(&labels, &images, Split::Train).is_err());
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let (images, labels) = encode_idx(&[vec![0; 4], vec![0; 4]], 2, 2, &[1]);
        assert!(IdxDataset::from_bytes(&images, &labels, Split::Train).is_err());
    }

    #[test]
    fn test_truncated_pixels_rejected() {
        let (mut images, labels) = encode_idx(&[vec![0; 4]], 2, 2, &[1]);
        images.truncate(18);
        assert!(IdxDataset::from_bytes(&images, &labels, Split::Train).is_err());
    }

    fn images_header(count: u32, rows: u32, cols: u32) -> Vec<u8> {
        [IDX_IMAGES_MAGIC, count, rows, cols]
            .iter()
            .flat_map(|field| field.to_be_bytes())
            .collect()
    }

    #[test]
    fn test_oversized_header_is_a_format_error() {
        let (_, labels) = encode_idx(&[], 1, 1, &[]);
        for header in [
            images_header(u32::MAX, u32::MAX, u32::MAX),
            images_header(2, u32::MAX, u32::MAX),
            images_header(1, 0, 28),
        ] {
            let err = IdxDataset::from_bytes(&header, &labels, Split::Validation);
            assert!(matches!(err, Err(TensorError::InvalidArgument { .. })), "{err:?}");
        }
    }

    #[test]
    fn test_empty_image_file() -> Result<()> {
        let (images, labels) = encode_idx(&[], 28, 28, &[]);
        let dataset = IdxDataset::from_bytes(&images, &labels, Split::Validation)?;
        assert!(dataset.is_empty());
        assert_eq!(dataset.images().shape().dims(), &[0, 784]);
        Ok(())
    }

    #[test]
    fn test_split_file_stems() {
        assert_eq!(Split::Validation.file_stems().0, "t10k-images-idx3-ubyte");
        assert_eq!(Split::Train.file_stems().1, "train-labels-idx1-ubyte");
    }
}
