//! Manifest configuration describing the project layout and installed package managers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_SOURCE_DIR: &str = "assets/";
const DEFAULT_DIST_DIR: &str = "dist/";

/// Source and destination roots of the project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
  /// Directory prepended to every first-party file that is not marked `external`.
  pub source: String,
  /// Directory the downstream bundler writes outputs into.
  pub dist: String,
}

impl Default for PathsConfig {
  fn default() -> Self {
    Self {
      source: DEFAULT_SOURCE_DIR.into(),
      dist: DEFAULT_DIST_DIR.into(),
    }
  }
}

/// Normalised `config` section of a manifest.
///
/// Built once per manifest and then only ever borrowed by later stages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ManifestConfig {
  /// Project source and destination roots.
  pub paths: PathsConfig,
  /// Package manager name mapped to the directory its packages are installed into.
  pub dependencies: BTreeMap<String, String>,
}

impl Default for ManifestConfig {
  fn default() -> Self {
    Self {
      paths: PathsConfig::default(),
      dependencies: BTreeMap::from([
        ("bower".to_string(), "bower_components".to_string()),
        ("npm".to_string(), "node_modules".to_string()),
      ]),
    }
  }
}

impl ManifestConfig {
  /// Default configuration rendered as the document the user manifest is merged over.
  pub fn defaults_document() -> Value {
    serde_json::json!({ "config": Self::default() })
  }

  /// Names of the configured package managers, in the order they are processed.
  pub fn managers(&self) -> impl Iterator<Item = &str> {
    self.dependencies.keys().map(String::as_str)
  }

  /// Package managers paired with their trimmed install directories.
  pub fn dependency_dirs(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .dependencies
      .iter()
      .map(|(manager, dir)| (manager.as_str(), trim_dir(dir)))
  }

  /// Install directory of `manager` without leading `./` or surrounding slashes.
  pub fn dependency_dir(&self, manager: &str) -> Option<&str> {
    self.dependencies.get(manager).map(|dir| trim_dir(dir))
  }

  /// Whether `name` is a configured package manager.
  pub fn is_manager(&self, name: &str) -> bool {
    self.dependencies.contains_key(name)
  }
}

fn trim_dir(dir: &str) -> &str {
  let mut trimmed = dir.trim();
  while let Some(rest) = trimmed.strip_prefix("./") {
    trimmed = rest;
  }
  trimmed.trim_matches(|c| c == '/' || c == '\\')
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_cover_bower_and_npm() {
    let config = ManifestConfig::default();
    assert_eq!(config.paths.source, "assets/");
    assert_eq!(config.paths.dist, "dist/");
    assert_eq!(config.managers().collect::<Vec<_>>(), vec!["bower", "npm"]);
  }

  #[test]
  fn defaults_document_nests_under_config() {
    let document = ManifestConfig::defaults_document();
    assert_eq!(document["config"]["paths"]["source"], "assets/");
    assert_eq!(
      document["config"]["dependencies"]["bower"],
      "bower_components"
    );
  }

  #[test]
  fn partial_config_keeps_remaining_defaults() {
    let config: ManifestConfig =
      serde_json::from_str(r#"{"paths": {"source": "src/"}}"#).unwrap();
    assert_eq!(config.paths.source, "src/");
    assert_eq!(config.paths.dist, "dist/");
    assert!(config.is_manager("npm"));
  }

  #[test]
  fn dependency_dir_is_trimmed() {
    let config = ManifestConfig {
      dependencies: BTreeMap::from([("bower".into(), "./vendor/bower_components/".into())]),
      ..ManifestConfig::default()
    };
    assert_eq!(
      config.dependency_dir("bower"),
      Some("vendor/bower_components")
    );
    assert_eq!(config.dependency_dir("npm"), None);
  }
}
