//! Weight loading for pretrained checkpoints
//!
//! ## Supported formats
//!
//! - **SafeTensors**: binary format written by `safetensors.torch.save_file`
//!   (`F32` and `F64` tensors)
//! - **JSON**: `{"lin1.weight": {"shape": [1000, 784], "data": [...]}, ...}`,
//!   convenient for small models and hand-made fixtures
//!
//! ## Example
//!
//! ```rust,ignore
//! use aaelens_neural::serialization::{LoadConfig, WeightLoader};
//!
//! let loader = WeightLoader::with_config(LoadConfig::new().strip_prefix("module."));
//! let result = loader.load_from_file::<f32>("../data/encoder_unsupervised.safetensors")?;
//! println!("{} tensors loaded", result.num_loaded);
//! ```

use aaelens_core::{Result, Tensor, TensorError};
use safetensors::{Dtype, SafeTensors};
use scirs2_core::num_traits::Float;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Weight format for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightFormat {
    SafeTensors,
    Json,
}

impl WeightFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("safetensors") => Some(WeightFormat::SafeTensors),
            Some("json") => Some(WeightFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            WeightFormat::SafeTensors => "safetensors",
            WeightFormat::Json => "json",
        }
    }
}

/// Configuration for weight loading
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Strict mode: fail if a tensor cannot be converted instead of skipping it
    pub strict: bool,

    /// Prefix removed from weight names, e.g. `module.` left by `DataParallel`
    pub strip_prefixes: Vec<String>,

    /// Weight name mapping (old_name -> new_name), applied after prefix stripping
    pub name_mapping: HashMap<String, String>,

    /// Weights to exclude from loading
    pub exclude_patterns: Vec<String>,

    /// Weights to include (if empty, include all)
    pub include_patterns: Vec<String>,
}

impl LoadConfig {
    pub fn new() -> Self {
        Self {
            strict: true,
            strip_prefixes: vec!["module.".to_string()],
            name_mapping: HashMap::new(),
            exclude_patterns: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn strip_prefix(mut self, prefix: &str) -> Self {
        self.strip_prefixes.push(prefix.to_string());
        self
    }

    pub fn with_mapping(mut self, old_name: String, new_name: String) -> Self {
        self.name_mapping.insert(old_name, new_name);
        self
    }

    pub fn exclude(mut self, pattern: String) -> Self {
        self.exclude_patterns.push(pattern);
        self
    }

    pub fn include(mut self, pattern: String) -> Self {
        self.include_patterns.push(pattern);
        self
    }

    /// Apply name transformation
    pub fn transform_name(&self, name: &str) -> String {
        let mut result = name;
        for prefix in &self.strip_prefixes {
            if let Some(stripped) = result.strip_prefix(prefix.as_str()) {
                result = stripped;
            }
        }

        match self.name_mapping.get(result) {
            Some(mapped) => mapped.clone(),
            None => result.to_string(),
        }
    }

    /// Check if a weight name should be included
    pub fn should_include(&self, name: &str) -> bool {
        if self.exclude_patterns.iter().any(|p| name.contains(p.as_str())) {
            return false;
        }
        if !self.include_patterns.is_empty() {
            return self.include_patterns.iter().any(|p| name.contains(p.as_str()));
        }
        true
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Weight loading result with metadata
#[derive(Debug)]
pub struct LoadResult<T> {
    /// Loaded weights (name -> tensor)
    pub weights: HashMap<String, Tensor<T>>,
    pub num_loaded: usize,
    pub num_skipped: usize,
    pub warnings: Vec<String>,
    /// Total size of the loaded tensors in bytes
    pub total_bytes: usize,
}

impl<T> LoadResult<T> {
    pub fn new(weights: HashMap<String, Tensor<T>>) -> Self {
        let num_loaded = weights.len();
        let total_bytes = weights
            .values()
            .map(|t| t.numel() * std::mem::size_of::<T>())
            .sum();

        Self {
            weights,
            num_loaded,
            num_skipped: 0,
            warnings: Vec::new(),
            total_bytes,
        }
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn get(&self, name: &str) -> Option<&Tensor<T>> {
        self.weights.get(name)
    }

    pub fn is_success(&self) -> bool {
        self.num_loaded > 0
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonTensor {
    shape: Vec<usize>,
    data: Vec<f64>,
}

/// Raw tensor read from a file, before name filtering and type conversion
struct RawTensor {
    name: String,
    shape: Vec<usize>,
    values: std::result::Result<Vec<f64>, String>,
}

/// Weight loader for managing pretrained weight loading
#[derive(Debug, Default)]
pub struct WeightLoader {
    default_config: LoadConfig,
}

impl WeightLoader {
    pub fn new() -> Self {
        Self {
            default_config: LoadConfig::new(),
        }
    }

    pub fn with_config(config: LoadConfig) -> Self {
        Self {
            default_config: config,
        }
    }

    /// Load weights from file with the loader's configuration
    pub fn load_from_file<T: Float>(&self, path: impl AsRef<Path>) -> Result<LoadResult<T>> {
        self.load_with_config(path, &self.default_config)
    }

    /// Load weights from file with custom configuration
    pub fn load_with_config<T: Float>(
        &self,
        path: impl AsRef<Path>,
        config: &LoadConfig,
    ) -> Result<LoadResult<T>> {
        let path = path.as_ref();
        let format = WeightFormat::from_path(path).ok_or_else(|| {
            TensorError::serialization_error(
                "load_weights",
                &format!("unrecognised checkpoint format: {}", path.display()),
            )
        })?;

        let bytes = std::fs::read(path)
            .map_err(|e| TensorError::io_error("load_weights", &e, Some(path)))?;

        let raw = match format {
            WeightFormat::Json => Self::parse_json(&bytes)?,
            WeightFormat::SafeTensors => Self::parse_safetensors(&bytes)?,
        };

        let result = Self::collect(raw, config)?;
        tracing::info!(
            path = %path.display(),
            tensors = result.num_loaded,
            skipped = result.num_skipped,
            bytes = result.total_bytes,
            "loaded checkpoint"
        );
        for warning in &result.warnings {
            tracing::warn!(path = %path.display(), "{warning}");
        }
        Ok(result)
    }

    fn parse_json(bytes: &[u8]) -> Result<Vec<RawTensor>> {
        let parsed: BTreeMap<String, JsonTensor> = serde_json::from_slice(bytes).map_err(|e| {
            TensorError::serialization_error("load_weights", &format!("invalid JSON checkpoint: {e}"))
        })?;

        Ok(parsed
            .into_iter()
            .map(|(name, t)| RawTensor {
                name,
                shape: t.shape,
                values: Ok(t.data),
            })
            .collect())
    }

    fn parse_safetensors(bytes: &[u8]) -> Result<Vec<RawTensor>> {
        let tensors = SafeTensors::deserialize(bytes).map_err(|e| {
            TensorError::serialization_error("load_weights", &format!("invalid safetensors file: {e}"))
        })?;

        let mut raw: Vec<RawTensor> = tensors
            .tensors()
            .into_iter()
            .map(|(name, view)| {
                let data = view.data();
                let values = match view.dtype() {
                    Dtype::F32 => Ok(data
                        .chunks_exact(4)
                        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
                        .collect()),
                    Dtype::F64 => Ok(data
                        .chunks_exact(8)
                        .map(|c| {
                            let mut buf = [0u8; 8];
                            buf.copy_from_slice(c);
                            f64::from_le_bytes(buf)
                        })
                        .collect()),
                    other => Err(format!("unsupported dtype {other:?}")),
                };
                RawTensor {
                    name,
                    shape: view.shape().to_vec(),
                    values,
                }
            })
            .collect();
        raw.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(raw)
    }

    fn collect<T: Float>(raw: Vec<RawTensor>, config: &LoadConfig) -> Result<LoadResult<T>> {
        let mut weights = HashMap::new();
        let mut warnings = Vec::new();
        let mut skipped = 0;

        for tensor in raw {
            let name = config.transform_name(&tensor.name);
            if !config.should_include(&name) {
                skipped += 1;
                continue;
            }

            let values = match tensor.values {
                Ok(values) => values,
                Err(reason) if config.strict => {
                    return Err(TensorError::serialization_error(
                        "load_weights",
                        &format!("tensor '{}': {reason}", tensor.name),
                    ));
                }
                Err(reason) => {
                    warnings.push(format!("skipped tensor '{}': {reason}", tensor.name));
                    skipped += 1;
                    continue;
                }
            };

            let converted = values
                .into_iter()
                .map(|v| T::from(v).unwrap_or_else(T::nan))
                .collect();
            let tensor = Tensor::from_vec(converted, &tensor.shape).map_err(|e| {
                TensorError::serialization_error("load_weights", &format!("tensor '{name}': {e}"))
            })?;
            weights.insert(name, tensor);
        }

        let mut result = LoadResult::new(weights);
        result.num_skipped = skipped;
        result.warnings = warnings;
        Ok(result)
    }

    /// Save weights to file; the format follows the file extension
    pub fn save_to_file<T: Float>(
        &self,
        weights: &HashMap<String, Tensor<T>>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let format = WeightFormat::from_path(path).ok_or_else(|| {
            TensorError::serialization_error(
                "save_weights",
                &format!("unrecognised checkpoint format: {}", path.display()),
            )
        })?;

        let bytes = match format {
            WeightFormat::Json => Self::encode_json(weights)?,
            WeightFormat::SafeTensors => Self::encode_safetensors(weights)?,
        };

        std::fs::write(path, bytes).map_err(|e| TensorError::io_error("save_weights", &e, Some(path)))
    }

    fn encode_json<T: Float>(weights: &HashMap<String, Tensor<T>>) -> Result<Vec<u8>> {
        let out: BTreeMap<&str, JsonTensor> = weights
            .iter()
            .map(|(name, t)| {
                let data = t.to_vec().into_iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect();
                (
                    name.as_str(),
                    JsonTensor {
                        shape: t.shape().to_vec(),
                        data,
                    },
                )
            })
            .collect();
        serde_json::to_vec(&out).map_err(|e| TensorError::serialization_error("save_weights", &e.to_string()))
    }

    fn encode_safetensors<T: Float>(weights: &HashMap<String, Tensor<T>>) -> Result<Vec<u8>> {
        let encoded: Vec<(String, Vec<usize>, Vec<u8>)> = weights
            .iter()
            .map(|(name, t)| {
                let bytes = t
                    .to_vec()
                    .into_iter()
                    .flat_map(|v| v.to_f32().unwrap_or(f32::NAN).to_le_bytes())
                    .collect();
                (name.clone(), t.shape().to_vec(), bytes)
            })
            .collect();

        let views = encoded
            .iter()
            .map(|(name, shape, bytes)| {
                safetensors::tensor::TensorView::new(Dtype::F32, shape.clone(), bytes)
                    .map(|view| (name.clone(), view))
                    .map_err(|e| TensorError::serialization_error("save_weights", &e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        safetensors::tensor::serialize(views, &None)
            .map_err(|e| TensorError::serialization_error("save_weights", &e.to_string()))
    }

    /// Find a checkpoint named `stem` in `dir`, trying the bare name first and
    /// then each supported extension
    pub fn resolve_checkpoint(dir: &Path, stem: &str) -> Result<PathBuf> {
        let bare = dir.join(stem);
        if bare.is_file() && WeightFormat::from_path(&bare).is_some() {
            return Ok(bare);
        }

        for format in [WeightFormat::SafeTensors, WeightFormat::Json] {
            let candidate = dir.join(format!("{stem}.{}", format.extension()));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        Err(TensorError::IoError {
            operation: "resolve_checkpoint".to_string(),
            details: format!("no checkpoint named '{stem}' (.safetensors or .json)"),
            path: Some(dir.display().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_format_detection() {
        assert_eq!(
            WeightFormat::from_path(Path::new("model.safetensors")),
            Some(WeightFormat::SafeTensors)
        );
        assert_eq!(
            WeightFormat::from_path(Path::new("weights.json")),
            Some(WeightFormat::Json)
        );
        assert_eq!(WeightFormat::from_path(Path::new("encoder_unsupervised")), None);
    }

    #[test]
    fn test_name_transformation() {
        let config = LoadConfig::new().with_mapping("fc1.weight".to_string(), "lin1.weight".to_string());
        assert_eq!(config.transform_name("module.fc1.weight"), "lin1.weight");
        assert_eq!(config.transform_name("lin2.bias"), "lin2.bias");
    }

    #[test]
    fn test_should_include_filters() {
        let config = LoadConfig::new().exclude("bias".to_string());
        assert!(!config.should_include("lin1.bias"));
        assert!(config.should_include("lin1.weight"));

        let config = LoadConfig::new().include("lin3".to_string());
        assert!(config.should_include("lin3cat.weight"));
        assert!(!config.should_include("lin1.weight"));
    }

    #[test]
    fn test_load_result_counts_bytes() -> Result<()> {
        let mut weights = HashMap::new();
        weights.insert("w".to_string(), Tensor::<f32>::zeros(&[2, 3]));
        let result = LoadResult::new(weights);
        assert_eq!(result.num_loaded, 1);
        assert_eq!(result.total_bytes, 24);
        assert!(result.is_success());
        Ok(())
    }

    #[test]
    fn test_json_parse_and_collect() -> Result<()> {
        let json = br#"{"module.lin1.weight": {"shape": [2, 2], "data": [1, 2, 3, 4]},
                        "lin1.bias": {"shape": [2], "data": [0.5, -0.5]}}"#;
        let raw = WeightLoader::parse_json(json)?;
        let result = WeightLoader::collect::<f32>(raw, &LoadConfig::new())?;
        assert_eq!(result.num_loaded, 2);
        assert_eq!(
            result.get("lin1.weight").map(|t| t.to_vec()),
            Some(vec![1.0, 2.0, 3.0, 4.0])
        );
        Ok(())
    }

    #[test]
    fn test_json_shape_mismatch_is_error() {
        let json = br#"{"w": {"shape": [3], "data": [1, 2]}}"#;
        let raw = WeightLoader::parse_json(json).expect("valid json");
        assert!(WeightLoader::collect::<f32>(raw, &LoadConfig::new()).is_err());
    }
}
