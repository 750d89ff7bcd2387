#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod dependencies;
pub mod error;
pub mod globs;
pub mod manifest;
pub mod models;

pub use config::{ManifestConfig, PathsConfig};
pub use dependencies::{DependencyIndex, DependencyScanError, DependencySource, InstalledPackages};
pub use error::{ManifestError, ManifestResult};
pub use globs::GlobBuilder;
pub use manifest::{Manifest, normalize_manifest, read_manifest};
pub use models::{AssetSpec, NormalizedManifest, Output, ResolvedGlobs, ResourceType};
