//! IDX header constants and helpers shared by the dataset loaders

/// Magic number of an IDX file holding `u8` images (`[n, rows, cols]`)
pub const IDX_IMAGES_MAGIC: u32 = 2051;

/// Magic number of an IDX file holding `u8` labels (`[n]`)
pub const IDX_LABELS_MAGIC: u32 = 2049;

/// IDX headers are big-endian `u32` fields
pub mod byte_utils {
    /// `None` unless `bytes` holds exactly four bytes
    pub fn bytes_to_u32_be(bytes: &[u8]) -> Option<u32> {
        bytes.try_into().ok().map(u32::from_be_bytes)
    }

    /// Header field at `index`; 0 is the magic number
    pub fn header_field(bytes: &[u8], index: usize) -> Option<u32> {
        let start = index * 4;
        bytes.get(start..start + 4).and_then(bytes_to_u32_be)
    }
}

pub mod validation {
    use aaelens_core::{Result, TensorError};
    use std::path::Path;

    pub fn validate_file_exists(path: &Path, description: &str) -> Result<()> {
        if !path.is_file() {
            return Err(TensorError::invalid_argument(format!(
                "{} file not found: {}",
                description,
                path.display()
            )));
        }
        Ok(())
    }

    /// Validate that `bytes` holds at least `expected` bytes
    pub fn validate_length(bytes: &[u8], expected: usize, description: &str) -> Result<()> {
        if bytes.len() < expected {
            return Err(TensorError::invalid_argument(format!(
                "{} is truncated: {} bytes, expected at least {}",
                description,
                bytes.len(),
                expected
            )));
        }
        Ok(())
    }
}

/// Error constructors shared by the loaders
pub mod error_utils {
    use aaelens_core::TensorError;
    use std::path::Path;

    pub fn io_error_with_context(error: std::io::Error, context: &str, path: &Path) -> TensorError {
        TensorError::io_error(context, &error, Some(path))
    }

    /// Neither the plain nor the gzipped file was found
    pub fn dataset_not_found_error(dataset_name: &str, suggestion: &str) -> TensorError {
        TensorError::invalid_argument(format!("{} files not found. {}", dataset_name, suggestion))
    }

    pub fn invalid_format_error(dataset_name: &str, details: &str) -> TensorError {
        TensorError::invalid_argument(format!("Invalid {} format: {}", dataset_name, details))
    }
}
