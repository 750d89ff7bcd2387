//! The resolved manifest and its lookup helpers.

use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use crate::asset_paths::join_path;
use crate::config::ManifestConfig;
use crate::dependencies::{DependencyIndex, DependencySource, InstalledPackages};
use crate::error::ManifestResult;
use crate::globs::GlobBuilder;
use crate::manifest::normalize::normalize_manifest;
use crate::manifest::reading::read_manifest;
use crate::models::{NormalizedManifest, Output, ResolvedGlobs, ResourceType};

/// A manifest resolved against the installed dependencies of a project.
#[derive(Debug, Clone)]
pub struct Manifest {
  config: ManifestConfig,
  resources: IndexMap<String, ResourceType>,
  globs: ResolvedGlobs,
}

impl Manifest {
  /// Read the manifest at `path` and resolve it against packages installed next to it.
  ///
  /// Package directories are looked up relative to the manifest's parent directory.
  pub fn load(path: impl AsRef<Path>, overrides: Option<&Value>) -> ManifestResult<Self> {
    let path = path.as_ref();
    let root = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    Self::load_with(path, overrides, &InstalledPackages::new(root))
  }

  /// Read the manifest at `path` and resolve it against files enumerated by `source`.
  pub fn load_with<S: DependencySource>(
    path: impl AsRef<Path>,
    overrides: Option<&Value>,
    source: &S,
  ) -> ManifestResult<Self> {
    let document = read_manifest(path)?;
    let normalized = normalize_manifest(document, overrides)?;
    let dependencies = source.dependency_files(&normalized.config)?;
    Self::resolve(normalized, dependencies)
  }

  /// Resolve an already parsed manifest document without touching the filesystem.
  pub fn from_document(
    document: Value,
    overrides: Option<&Value>,
    dependencies: DependencyIndex,
  ) -> ManifestResult<Self> {
    Self::resolve(normalize_manifest(document, overrides)?, dependencies)
  }

  /// Build the output globs of a normalised manifest.
  pub fn resolve(
    normalized: NormalizedManifest,
    dependencies: DependencyIndex,
  ) -> ManifestResult<Self> {
    let NormalizedManifest { config, resources } = normalized;
    let outputs = GlobBuilder::new(&config)
      .resources(&resources)
      .dependencies(&dependencies)
      .build()?;

    tracing::debug!(
      resource_types = outputs.len(),
      dependency_files = dependencies.len(),
      "resolved manifest"
    );

    Ok(Self {
      config,
      resources,
      globs: ResolvedGlobs {
        outputs,
        dependencies,
      },
    })
  }

  /// Configuration the manifest was resolved with.
  pub fn config(&self) -> &ManifestConfig {
    &self.config
  }

  /// Normalised resource definitions.
  pub fn resources(&self) -> &IndexMap<String, ResourceType> {
    &self.resources
  }

  /// Resolved outputs together with the raw dependency lists.
  pub fn globs(&self) -> &ResolvedGlobs {
    &self.globs
  }

  /// Outputs of one resource type in declaration order, empty for unknown types.
  pub fn outputs(&self, type_name: &str) -> &[Output] {
    self
      .globs
      .outputs
      .get(type_name)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// Call `visitor` for each output of `type_name`, in order.
  pub fn for_each_output<F>(&self, type_name: &str, visitor: F)
  where
    F: FnMut(&Output),
  {
    self.outputs(type_name).iter().for_each(visitor);
  }

  /// Find an output by its exact name, falling back to `<resource type>/<name>`.
  ///
  /// The fallback lets directory buckets be addressed through their owning type, so the
  /// `/` output of `images` answers to `images/`.
  pub fn find_output_by_name(&self, name: &str) -> Option<&Output> {
    let all = || self.globs.outputs.values().flatten();
    all()
      .find(|output| output.output_name() == name)
      .or_else(|| all().find(|output| join_path(output.resource_name(), output.output_name()) == name))
  }

  /// Declared first-party files per resource type, without any dependency files.
  pub fn project_globs(&self) -> IndexMap<String, Vec<String>> {
    let mut project = IndexMap::new();
    for (resource_name, resource) in &self.resources {
      let files: &mut Vec<String> = project.entry(resource_name.clone()).or_default();
      for asset in resource.assets.values() {
        files.extend(asset.files.iter().cloned());
      }
    }
    project
  }

  /// Raw file list enumerated for `manager`.
  pub fn dependency_files(&self, manager: &str) -> &[String] {
    self.globs.dependencies.files(manager)
  }
}
