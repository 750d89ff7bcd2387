//! Turning a parsed manifest document into a [`NormalizedManifest`].

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::asset_paths::join_source_path;
use crate::config::ManifestConfig;
use crate::error::{ManifestError, ManifestResult};
use crate::manifest::merge::deep_merge;
use crate::models::{NormalizedManifest, ResourceType};

/// Validate a manifest document, apply defaults, and bring every asset into canonical form.
///
/// `overrides` is merged over the document's `config` section before anything else runs, so
/// an overridden source root is the one used for prefixing. Prefixing happens here and only
/// here: normalising the result a second time would prefix the paths twice.
pub fn normalize_manifest(
  document: Value,
  overrides: Option<&Value>,
) -> ManifestResult<NormalizedManifest> {
  if !document.is_object() {
    return Err(ManifestError::malformed());
  }

  let mut merged = ManifestConfig::defaults_document();
  deep_merge(&mut merged, document);

  if let Some(overrides) = overrides {
    if !overrides.is_object() {
      return Err(ManifestError::Malformed(
        "configuration overrides must be an object".into(),
      ));
    }
    if let Some(config) = merged.get_mut("config") {
      deep_merge(config, overrides.clone());
    }
  }

  let Value::Object(mut root) = merged else {
    return Err(ManifestError::malformed());
  };

  let mut resources = match root.remove("resources") {
    Some(Value::Object(resources)) => resources,
    Some(_) => {
      return Err(ManifestError::Malformed(
        "\"resources\" must be an object".into(),
      ));
    }
    None => return Err(ManifestError::missing("resources")),
  };
  validate_resources(&resources)?;

  for resource in resources.values_mut() {
    if let Some(assets) = resource.get_mut("assets") {
      coerce_leaves(assets, false);
    }
  }

  let config: ManifestConfig = serde_json::from_value(root.remove("config").unwrap_or_default())
    .map_err(|err| ManifestError::Malformed(format!("invalid \"config\" section: {err}")))?;
  let mut resources: IndexMap<String, ResourceType> =
    serde_json::from_value(Value::Object(resources))
      .map_err(|err| ManifestError::Malformed(format!("invalid \"resources\" section: {err}")))?;

  for (resource_name, resource) in &mut resources {
    for (output_name, asset) in &mut resource.assets {
      asset.resource_name = resource_name.clone();

      for manager in asset.packages.keys() {
        if !config.is_manager(manager) {
          tracing::warn!(
            resource = %resource_name,
            output = %output_name,
            key = %manager,
            "ignoring package list for unconfigured package manager"
          );
        }
      }

      if !asset.external {
        asset.files = asset
          .files
          .iter()
          .map(|file| join_source_path(&config.paths.source, file))
          .collect();
      }
    }
  }

  tracing::debug!(
    resource_types = resources.len(),
    source = %config.paths.source,
    "normalised manifest"
  );

  Ok(NormalizedManifest { config, resources })
}

fn validate_resources(resources: &Map<String, Value>) -> ManifestResult<()> {
  for (name, resource) in resources {
    let Value::Object(resource) = resource else {
      return Err(ManifestError::Malformed(format!(
        "resource type \"{name}\" must be an object"
      )));
    };
    match resource.get("pattern") {
      Some(Value::String(_)) => {}
      Some(_) => {
        return Err(ManifestError::Malformed(format!(
          "\"resources.{name}.pattern\" must be a string"
        )));
      }
      None => return Err(ManifestError::missing(&format!("resources.{name}.pattern"))),
    }
  }
  Ok(())
}

/// Wrap bare leaves in one-element arrays so a single path can stand in for a list.
///
/// Strings are trimmed first. Arrays, booleans, and values that already sit inside an
/// array are left alone.
fn coerce_leaves(node: &mut Value, parent_is_array: bool) {
  match node {
    Value::Object(map) => {
      for value in map.values_mut() {
        coerce_leaves(value, false);
      }
    }
    Value::Array(items) => {
      for item in items.iter_mut() {
        coerce_leaves(item, true);
      }
    }
    Value::Bool(_) | Value::Null => {}
    Value::String(text) if !parent_is_array => {
      let trimmed = text.trim().to_string();
      *node = Value::Array(vec![Value::String(trimmed)]);
    }
    Value::Number(_) if !parent_is_array => {
      let leaf = node.take();
      *node = Value::Array(vec![leaf]);
    }
    Value::String(_) | Value::Number(_) => {}
  }
}
