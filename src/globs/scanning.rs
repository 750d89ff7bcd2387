//! Collecting the packages that outputs of one resource type claim explicitly.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::models::AssetSpec;

/// Every package named under `manager` by any asset of a single resource type.
///
/// A `main` output subtracts this set from the dependency files it pulls in, so a package
/// is never bundled both by the output that claims it and by the catch-all.
pub fn excluded_packages(manager: &str, assets: &IndexMap<String, AssetSpec>) -> BTreeSet<String> {
  assets
    .values()
    .filter_map(|asset| asset.packages_for(manager))
    .flatten()
    .map(|name| name.trim().to_string())
    .filter(|name| !name.is_empty())
    .collect()
}
