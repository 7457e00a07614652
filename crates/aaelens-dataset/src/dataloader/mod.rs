//! Sequential batching over a [`Dataset`](crate::Dataset)
//!
//! ```rust,ignore
//! use aaelens_dataset::{DataLoader, DataLoaderConfig};
//!
//! let loader = DataLoader::new(&dataset, DataLoaderConfig::new(100).max_batches(Some(5)));
//! for batch in loader.iter() {
//!     let batch = batch?;
//!     // batch.images: [100, 784]
//! }
//! ```

pub mod core;

pub use self::core::{Batch, BatchIter, DataLoader, DataLoaderConfig};
