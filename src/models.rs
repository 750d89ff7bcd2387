//! Data structures describing a normalised manifest and the outputs resolved from it.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::asset_paths::is_directory_name;
use crate::config::ManifestConfig;
use crate::dependencies::DependencyIndex;

/// Declaration of how a single output is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetSpec {
  /// First-party path fragments, prefixed with the source root unless `external` is set.
  pub files: Vec<String>,
  /// Vendored files placed ahead of `files` and never prefixed.
  pub vendor: Vec<String>,
  /// Pull in every dependency file of the resource type not claimed by another output.
  pub main: bool,
  /// Files are already rooted correctly and must not be prefixed.
  pub external: bool,
  /// Resource type that owns the asset, stamped during normalisation.
  #[serde(skip_deserializing, rename = "resourceName")]
  pub resource_name: String,
  /// Package manager name mapped to the packages whose installed files are pulled in.
  #[serde(flatten)]
  pub packages: BTreeMap<String, Vec<String>>,
}

impl AssetSpec {
  /// Packages claimed from `manager`, when the asset lists any.
  pub fn packages_for(&self, manager: &str) -> Option<&[String]> {
    self.packages.get(manager).map(Vec::as_slice)
  }

  /// Whether the asset names packages for at least one configured manager.
  pub fn claims_packages(&self, config: &ManifestConfig) -> bool {
    self.packages.keys().any(|manager| config.is_manager(manager))
  }
}

/// A category of build output such as scripts or styles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceType {
  /// Glob selecting dependency files that belong to this type, e.g. `*.js`.
  pub pattern: String,
  /// Output name mapped to its declaration, in the order the manifest lists them.
  #[serde(default)]
  pub assets: IndexMap<String, AssetSpec>,
}

/// Manifest after defaults are applied and every asset satisfies its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedManifest {
  /// Configuration shared by every later stage.
  pub config: ManifestConfig,
  /// Resource type name mapped to its definition, in manifest order.
  pub resources: IndexMap<String, ResourceType>,
}

/// One build artifact and the ordered globs that feed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
  #[serde(rename = "type")]
  kind: String,
  resource_name: String,
  output_name: String,
  is_directory: bool,
  globs: Vec<String>,
}

impl Output {
  /// Seed an output from its declaration: vendor files first, then first-party files.
  pub fn new(resource_name: &str, output_name: &str, asset: &AssetSpec) -> Self {
    let is_directory = is_directory_name(output_name);
    let kind = if is_directory {
      "directory".to_string()
    } else {
      Self::parse_type(output_name).to_string()
    };

    Self {
      kind,
      resource_name: resource_name.to_string(),
      output_name: output_name.to_string(),
      is_directory,
      globs: asset.vendor.iter().chain(&asset.files).cloned().collect(),
    }
  }

  /// Extension of an output name, `js` for `app.min.1.11.1.js`.
  pub fn parse_type(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
  }

  /// Insert `files` ahead of the current globs, keeping their order.
  pub(crate) fn prepend_globs(&mut self, files: Vec<String>) {
    if files.is_empty() {
      return;
    }
    let mut globs = files;
    globs.append(&mut self.globs);
    self.globs = globs;
  }

  /// Derived type: the output name's extension, or `directory`.
  pub fn kind(&self) -> &str {
    &self.kind
  }

  /// Resource type the output was declared under.
  pub fn resource_name(&self) -> &str {
    &self.resource_name
  }

  /// Output file or directory name as declared in the manifest.
  pub fn output_name(&self) -> &str {
    &self.output_name
  }

  /// Whether the output name denotes a directory bucket.
  pub fn is_directory(&self) -> bool {
    self.is_directory
  }

  /// Ordered globs: dependency files first, then vendor and first-party files.
  pub fn globs(&self) -> &[String] {
    &self.globs
  }
}

/// Outputs grouped per resource type plus the raw dependency file lists they were drawn from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedGlobs {
  /// Resource type name mapped to its ordered outputs.
  pub outputs: IndexMap<String, Vec<Output>>,
  /// Installed dependency files per package manager.
  pub dependencies: DependencyIndex,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sets_type_and_globs_from_declaration() {
    let asset = AssetSpec {
      vendor: vec!["test.js".into()],
      files: vec!["test1.js".into()],
      ..AssetSpec::default()
    };
    let output = Output::new("scripts", "app.js", &asset);
    assert_eq!(output.kind(), "js");
    assert_eq!(output.resource_name(), "scripts");
    assert!(!output.is_directory());
    assert_eq!(output.globs(), ["test.js", "test1.js"]);

    let bare = Output::new("styles", "app.css", &AssetSpec::default());
    assert_eq!(bare.kind(), "css");
    assert!(bare.globs().is_empty());
  }

  #[test]
  fn directory_outputs_use_directory_type() {
    let output = Output::new("images", "/", &AssetSpec::default());
    assert!(output.is_directory());
    assert_eq!(output.kind(), "directory");

    let fonts = Output::new("fonts", "fonts", &AssetSpec::default());
    assert_eq!(fonts.kind(), "directory");
  }

  #[test]
  fn prepends_dependency_globs_ahead_of_declared_files() {
    let asset = AssetSpec {
      vendor: vec!["v1".into(), "v2".into()],
      files: vec!["f1".into(), "f2".into()],
      ..AssetSpec::default()
    };
    let mut output = Output::new("scripts", "app.js", &asset);
    output.prepend_globs(vec!["d1".into()]);
    assert_eq!(output.globs(), ["d1", "v1", "v2", "f1", "f2"]);
  }

  #[test]
  fn parses_type_from_last_extension() {
    assert_eq!(Output::parse_type("app.css"), "css");
    assert_eq!(Output::parse_type("app.js"), "js");
    assert_eq!(Output::parse_type("app.min.1.11.1.js"), "js");
  }

  #[test]
  fn package_lists_are_collected_from_unknown_keys() {
    let asset: AssetSpec = serde_json::from_value(serde_json::json!({
      "files": ["a.js"],
      "bower": ["jquery"],
      "main": true
    }))
    .unwrap();
    assert!(asset.main);
    assert!(!asset.external);
    assert_eq!(asset.packages_for("bower"), Some(&["jquery".to_string()][..]));
    assert_eq!(asset.packages_for("npm"), None);
    assert!(asset.claims_packages(&ManifestConfig::default()));
  }

  #[test]
  fn assets_keep_manifest_order() {
    let resource: ResourceType = serde_json::from_str(
      r#"{"pattern": "*.css", "assets": {"main.css": {}, "editor-style.css": {}, "admin.css": {}}}"#,
    )
    .unwrap();
    assert_eq!(
      resource.assets.keys().collect::<Vec<_>>(),
      ["main.css", "editor-style.css", "admin.css"]
    );
  }

  #[test]
  fn serialises_outputs_in_camel_case() {
    let output = Output::new("images", "/", &AssetSpec::default());
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["type"], "directory");
    assert_eq!(value["outputName"], "/");
    assert_eq!(value["resourceName"], "images");
    assert_eq!(value["isDirectory"], true);
  }
}
