//! Loaders for datasets stored on disk
//!
//! - [`common`]: byte order helpers, file validation and error constructors
//! - [`vision`]: IDX image/label files (MNIST and look-alikes)

pub mod common;
pub mod vision;

pub use common::{IDX_IMAGES_MAGIC, IDX_LABELS_MAGIC};
pub use vision::{encode_idx, IdxDataset, MnistConfig, Split};
