//! # aaelens-neural
//!
//! Inference-only networks of a semi-supervised adversarial autoencoder.
//!
//! - [`QNet`]: encoder producing class probabilities (latent y) and a style
//!   vector (latent z)
//! - [`PNet`]: decoder mapping `[y | z]` back to an image; with `z_dim == 0`
//!   it is a mode decoder
//! - [`serialization`]: PyTorch-style checkpoints in SafeTensors or JSON form
//! - [`metrics`]: majority-vote cluster accuracy
//!
//! ```rust,no_run
//! use aaelens_neural::{metrics, QNet};
//! use aaelens_core::Tensor;
//!
//! # fn main() -> aaelens_core::Result<()> {
//! let q = QNet::load("../data/encoder_unsupervised.safetensors", 2, 16)?;
//! let labels = metrics::predict_labels(&q, &Tensor::zeros(&[4, 784]))?;
//! # Ok(())
//! # }
//! ```

pub mod activation_function;
pub mod layers;
pub mod metrics;
pub mod model;
pub mod serialization;

pub use activation_function::ActivationFunction;
pub use layers::{Dense, Layer};
pub use metrics::{cluster_accuracy, ClusterAccuracy, ContingencyTable};
pub use model::{latent_vector, PNet, QNet, StateDict};
pub use serialization::{LoadConfig, WeightLoader};
