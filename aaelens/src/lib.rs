//! # aaelens
//!
//! Diagnostics for a semi-supervised adversarial autoencoder trained on
//! MNIST-like digits: reconstructions, per-class sample grids, latent
//! histograms, latent traversals, learned modes, sampled digits and an
//! unsupervised clustering accuracy.
//!
//! ```rust,no_run
//! use aaelens::prelude::*;
//!
//! # fn main() -> aaelens::Result<()> {
//! let session = Session::load(VisualizerConfig::default())?;
//! let mut sink = PngSink::new("plots")?;
//! let summary = session.run_all(&mut sink, &mut std::io::stdout())?;
//! println!("accuracy: {:.2}%", summary.accuracy.percentage());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod figure;
pub mod logging;
pub mod render;
pub mod session;

pub use error::{AaeError, Result};

pub mod prelude {
    pub use crate::config::{ConfigOverrides, VisualizerConfig};
    pub use crate::diagnostics::*;
    pub use crate::error::{AaeError, Result};
    pub use crate::figure::{Figure, GrayImage, HistogramPlot, ImageGrid};
    pub use crate::render::{FigureSink, MemorySink, PngSink};
    pub use crate::session::{RunSummary, Session};

    pub use aaelens_core::{ops, Tensor};
    pub use aaelens_dataset::{DataLoader, DataLoaderConfig, Dataset, IdxDataset, LabelDistribution};
    pub use aaelens_neural::{ClusterAccuracy, PNet, QNet};
}
