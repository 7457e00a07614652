//! Run configuration
//!
//! Layered as defaults, then an optional JSON file, then command line flags.

use crate::error::{AaeError, Result};
use aaelens_dataset::{DataLoaderConfig, MnistConfig, Split};
use aaelens_neural::WeightLoader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything a diagnostics run needs to locate models and data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Directory holding checkpoints and the IDX files
    pub data_dir: PathBuf,
    /// Training mode the checkpoints were produced in, e.g. `unsupervised`
    pub mode: String,
    pub n_classes: usize,
    pub z_dim: usize,
    pub batch_size: usize,
    pub output_dir: PathBuf,
    /// Seed for sampled latent vectors
    pub seed: u64,
    /// Checkpoint stem of the mode decoder
    pub mode_decoder: String,
    pub max_batches: Option<usize>,
    pub split: Split,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("../data"),
            mode: "unsupervised".to_string(),
            n_classes: 16,
            z_dim: 2,
            batch_size: 100,
            output_dir: PathBuf::from("plots"),
            seed: 0,
            mode_decoder: "mode_decoder_unsupervised".to_string(),
            max_batches: None,
            split: Split::Validation,
        }
    }
}

impl VisualizerConfig {
    /// Read a JSON config file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AaeError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| AaeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, or the file at `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_classes == 0 {
            return Err(AaeError::InvalidConfig("n_classes must be at least 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(AaeError::InvalidConfig("batch_size must be at least 1".to_string()));
        }
        if self.mode.trim().is_empty() {
            return Err(AaeError::InvalidConfig("mode must not be empty".to_string()));
        }
        if self.max_batches == Some(0) {
            return Err(AaeError::InvalidConfig("max_batches must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn encoder_stem(&self) -> String {
        format!("encoder_{}", self.mode)
    }

    pub fn decoder_stem(&self) -> String {
        format!("decoder_{}", self.mode)
    }

    pub fn encoder_path(&self) -> Result<PathBuf> {
        Ok(WeightLoader::resolve_checkpoint(&self.data_dir, &self.encoder_stem())?)
    }

    pub fn decoder_path(&self) -> Result<PathBuf> {
        Ok(WeightLoader::resolve_checkpoint(&self.data_dir, &self.decoder_stem())?)
    }

    /// The mode decoder is optional; `None` when no checkpoint is found
    pub fn mode_decoder_path(&self) -> Option<PathBuf> {
        WeightLoader::resolve_checkpoint(&self.data_dir, &self.mode_decoder).ok()
    }

    pub fn dataset_config(&self) -> MnistConfig {
        MnistConfig::new(&self.data_dir).split(self.split)
    }

    pub fn loader_config(&self) -> DataLoaderConfig {
        DataLoaderConfig::new(self.batch_size).max_batches(self.max_batches)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref data_dir) = overrides.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(ref mode) = overrides.mode {
            self.mode = mode.clone();
        }
        if let Some(n_classes) = overrides.n_classes {
            self.n_classes = n_classes;
        }
        if let Some(z_dim) = overrides.z_dim {
            self.z_dim = z_dim;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(ref output_dir) = overrides.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(max_batches) = overrides.max_batches {
            self.max_batches = Some(max_batches);
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
    }
}

/// Command line flags layered over the file configuration
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Directory with checkpoints and IDX files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Training mode suffix of the checkpoint names
    #[arg(long, global = true)]
    pub mode: Option<String>,

    /// Number of latent classes
    #[arg(long, global = true)]
    pub n_classes: Option<usize>,

    /// Size of the latent style vector
    #[arg(long, global = true)]
    pub z_dim: Option<usize>,

    #[arg(long, global = true)]
    pub batch_size: Option<usize>,

    /// Where PNG figures are written
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Stop after this many validation batches
    #[arg(long, global = true)]
    pub max_batches: Option<usize>,

    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = VisualizerConfig::default();
        assert_eq!(config.n_classes, 16);
        assert_eq!(config.z_dim, 2);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.encoder_stem(), "encoder_unsupervised");
        assert_eq!(config.decoder_stem(), "decoder_unsupervised");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_then_overrides() -> Result<()> {
        let dir = TempDir::new().map_err(|e| AaeError::io("tempdir", e))?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"mode": "semi_supervised", "n_classes": 10, "split": "train"}"#)
            .map_err(|e| AaeError::io(&path, e))?;

        let mut config = VisualizerConfig::load(Some(&path))?;
        assert_eq!(config.mode, "semi_supervised");
        assert_eq!(config.n_classes, 10);
        assert_eq!(config.split, Split::Train);
        assert_eq!(config.batch_size, 100);

        config.apply(&ConfigOverrides {
            n_classes: Some(12),
            max_batches: Some(3),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.n_classes, 12);
        assert_eq!(config.max_batches, Some(3));
        assert_eq!(config.mode, "semi_supervised");
        Ok(())
    }

    #[test]
    fn test_validate_rejects_zeros() {
        let config = VisualizerConfig {
            n_classes: 0,
            ..VisualizerConfig::default()
        };
        assert!(matches!(config.validate(), Err(AaeError::InvalidConfig(_))));

        let config = VisualizerConfig {
            batch_size: 0,
            ..VisualizerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file() -> Result<()> {
        let dir = TempDir::new().map_err(|e| AaeError::io("tempdir", e))?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ n_classes: ").map_err(|e| AaeError::io(&path, e))?;
        assert!(matches!(
            VisualizerConfig::from_file(&path),
            Err(AaeError::ConfigParse { .. })
        ));
        Ok(())
    }
}
