//! Resolving every declared output into its ordered glob list.

use indexmap::IndexMap;

use crate::asset_paths::{
  TypePattern, filter_by_package, filter_by_type, is_directory_name, reject_by_package,
};
use crate::config::ManifestConfig;
use crate::dependencies::DependencyIndex;
use crate::error::{ManifestError, ManifestResult};
use crate::globs::scanning::excluded_packages;
use crate::models::{Output, ResourceType};

/// Builds the per-type output lists from normalised resource definitions.
///
/// For every output, dependency files come first, followed by its `vendor` and `files`
/// entries. Package managers are processed in configuration order and each one's matches
/// are prepended, so the last manager ends up at the front.
#[derive(Debug, Clone, Copy)]
pub struct GlobBuilder<'a> {
  config: &'a ManifestConfig,
  resources: Option<&'a IndexMap<String, ResourceType>>,
  dependencies: Option<&'a DependencyIndex>,
}

impl<'a> GlobBuilder<'a> {
  /// Create a builder for `config` with no resources and no dependency files.
  pub fn new(config: &'a ManifestConfig) -> Self {
    Self {
      config,
      resources: None,
      dependencies: None,
    }
  }

  /// Supply the normalised resource definitions to resolve.
  pub fn resources(mut self, resources: &'a IndexMap<String, ResourceType>) -> Self {
    self.resources = Some(resources);
    self
  }

  /// Supply the installed dependency files outputs may draw from.
  pub fn dependencies(mut self, dependencies: &'a DependencyIndex) -> Self {
    self.dependencies = Some(dependencies);
    self
  }

  /// Resolve every resource type into its ordered outputs.
  pub fn build(&self) -> ManifestResult<IndexMap<String, Vec<Output>>> {
    let resources = self.resources.ok_or(ManifestError::UninitializedBuilder)?;

    let mut globs = IndexMap::new();
    for (resource_name, resource) in resources {
      let outputs = self.output_files(resource_name, resource)?;
      tracing::debug!(
        resource = %resource_name,
        outputs = outputs.len(),
        "resolved resource type"
      );
      globs.insert(resource_name.clone(), outputs);
    }
    Ok(globs)
  }

  /// Resolve the outputs of a single resource type.
  pub fn output_files(
    &self,
    resource_name: &str,
    resource: &ResourceType,
  ) -> ManifestResult<Vec<Output>> {
    let pattern =
      TypePattern::new(&resource.pattern).map_err(|err| ManifestError::InvalidPattern {
        resource: resource_name.to_string(),
        pattern: resource.pattern.clone(),
        reason: err.to_string(),
      })?;

    let mut candidates = Vec::new();
    for (manager, dir) in self.config.dependency_dirs() {
      let typed = self
        .dependencies
        .map(|index| filter_by_type(index.files(manager), &pattern))
        .unwrap_or_default();
      let excluded: Vec<String> = excluded_packages(manager, &resource.assets)
        .into_iter()
        .collect();
      candidates.push(ManagerCandidates {
        manager,
        dir,
        typed,
        excluded,
      });
    }

    let mut outputs = Vec::with_capacity(resource.assets.len());
    for (output_name, asset) in &resource.assets {
      if !is_directory_name(output_name) && !pattern.is_match(output_name) {
        tracing::warn!(
          resource = %resource_name,
          output = %output_name,
          pattern = %pattern.as_str(),
          "skipping output whose name does not match the resource pattern"
        );
        continue;
      }

      let mut output = Output::new(resource_name, output_name, asset);
      let claims_packages = asset.claims_packages(self.config);

      for candidate in &candidates {
        let matched = match asset.packages_for(candidate.manager) {
          Some(names) => filter_by_package(&candidate.typed, candidate.dir, names),
          None if asset.main && !claims_packages => {
            reject_by_package(&candidate.typed, candidate.dir, candidate.excluded.as_slice())
          }
          None => continue,
        };
        output.prepend_globs(matched);
      }

      outputs.push(output);
    }

    Ok(outputs)
  }
}

/// Type-filtered dependency files of one package manager, shared by every output of a type.
struct ManagerCandidates<'a> {
  manager: &'a str,
  dir: &'a str,
  typed: Vec<String>,
  excluded: Vec<String>,
}
