//! Error types surfaced while reading, normalising, and resolving a manifest.

use thiserror::Error;

use crate::dependencies::DependencyScanError;

/// Result alias used by the manifest pipeline.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Failures raised by the manifest pipeline.
///
/// Read and parse failures are passed through untouched so callers can tell a broken file
/// apart from a structurally invalid manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The manifest file is missing or unreadable.
  #[error(transparent)]
  Read(#[from] std::io::Error),
  /// The manifest is not valid JSON once comments are stripped.
  #[error(transparent)]
  Parse(#[from] serde_json::Error),
  /// The document is valid JSON but does not describe a manifest.
  #[error("Manifest File Error: {0}")]
  Malformed(String),
  /// A resource type declared a pattern that cannot be compiled.
  #[error("invalid pattern `{pattern}` for resource type `{resource}`: {reason}")]
  InvalidPattern {
    /// Resource type that declared the pattern.
    resource: String,
    /// Pattern as written in the manifest.
    pattern: String,
    /// Compiler message.
    reason: String,
  },
  /// The glob builder was asked to resolve before resource definitions were supplied.
  #[error("glob builder has no resource definitions; normalise the manifest first")]
  UninitializedBuilder,
  /// Enumerating installed dependency files failed.
  #[error(transparent)]
  Dependencies(#[from] DependencyScanError),
}

impl ManifestError {
  /// Build a [`ManifestError::Malformed`] error for a missing required property.
  pub fn missing(property: &str) -> Self {
    Self::Malformed(format!("missing \"{property}\" property"))
  }

  /// Build a [`ManifestError::Malformed`] error with the generic message.
  pub fn malformed() -> Self {
    Self::Malformed("file seems to be malformed".into())
  }
}
