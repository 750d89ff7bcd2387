//! Installed dependency files, grouped per package manager.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::asset_paths::{contains_segment, join_path};
use crate::config::ManifestConfig;

/// Package metadata files consulted for a package's main files, in order of preference.
pub const PACKAGE_METADATA_FILES: [&str; 3] = [".bower.json", "bower.json", "package.json"];

/// Flat lists of installed package files keyed by package manager name.
///
/// The index is read-only input to glob building: outputs copy entries out of it but never
/// modify it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyIndex {
  files: BTreeMap<String, Vec<String>>,
}

impl DependencyIndex {
  /// Create an empty index.
  pub fn new() -> Self {
    Self::default()
  }

  /// Append `files` to the list of `manager`, returning the updated index.
  pub fn with_files<I, S>(mut self, manager: impl Into<String>, files: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.extend(manager, files);
    self
  }

  /// Append `files` to the list of `manager`.
  pub fn extend<I, S>(&mut self, manager: impl Into<String>, files: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self
      .files
      .entry(manager.into())
      .or_default()
      .extend(files.into_iter().map(Into::into));
  }

  /// Partition a flat listing by the install directory each path lives under.
  ///
  /// Paths under no configured directory are dropped.
  pub fn from_listing<I, S>(config: &ManifestConfig, lines: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut index = Self::new();
    for (manager, _) in config.dependency_dirs() {
      index.files.entry(manager.to_string()).or_default();
    }

    for line in lines {
      let path = line.as_ref().trim();
      if path.is_empty() {
        continue;
      }

      let owner = config
        .dependency_dirs()
        .find(|(_, dir)| contains_segment(path, dir));
      match owner {
        Some((manager, _)) => index.extend(manager, [path]),
        None => tracing::debug!(path, "dropping path outside every dependency directory"),
      }
    }
    index
  }

  /// Files installed by `manager`, empty when none were recorded.
  pub fn files(&self, manager: &str) -> &[String] {
    self.files.get(manager).map(Vec::as_slice).unwrap_or_default()
  }

  /// Managers with a recorded file list.
  pub fn managers(&self) -> impl Iterator<Item = &str> {
    self.files.keys().map(String::as_str)
  }

  /// Total number of recorded files across managers.
  pub fn len(&self) -> usize {
    self.files.values().map(Vec::len).sum()
  }

  /// Whether no files are recorded at all.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Collaborator that enumerates the files of installed packages.
pub trait DependencySource {
  /// Produce the dependency file index for the managers configured in `config`.
  fn dependency_files(&self, config: &ManifestConfig) -> Result<DependencyIndex, DependencyScanError>;
}

impl DependencySource for DependencyIndex {
  fn dependency_files(&self, _config: &ManifestConfig) -> Result<DependencyIndex, DependencyScanError> {
    Ok(self.clone())
  }
}

/// Main files declared by packages installed under a project root.
///
/// For each configured manager the project's own metadata file (`bower.json` for bower,
/// `package.json` otherwise) names the packages to include. Each package is emitted after
/// the packages its own metadata depends on, so concatenating the files in order satisfies
/// every dependency. Installed packages nobody depends on are left out. Without a project
/// metadata file every installed package is visited in name order. Scoped packages
/// (`@scope/name`) are supported.
#[derive(Debug, Clone)]
pub struct InstalledPackages {
  root: PathBuf,
}

impl InstalledPackages {
  /// Look for installed packages below `root`.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Packages the project itself asks for, or every installed package when it declares none.
  fn requested_packages(&self, manager: &str, base: &Path) -> Result<Vec<String>, DependencyScanError> {
    let project_file = self.root.join(project_metadata_file(manager));
    if let Some(project) = read_metadata_file(&project_file)? {
      return Ok(project.dependencies.keys().cloned().collect());
    }

    tracing::debug!(manager, "no project metadata, including every installed package");
    let mut names = Vec::new();
    for dir in package_dirs(base)? {
      if let Ok(relative) = dir.strip_prefix(base) {
        names.push(path_string(relative));
      }
    }
    Ok(names)
  }
}

impl DependencySource for InstalledPackages {
  fn dependency_files(&self, config: &ManifestConfig) -> Result<DependencyIndex, DependencyScanError> {
    let mut index = DependencyIndex::new();
    let root = path_string(&self.root);

    for (manager, dir) in config.dependency_dirs() {
      let base = self.root.join(dir);
      let mut walk = PackageWalk::new(&base);
      for name in self.requested_packages(manager, &base)? {
        walk.visit(&name)?;
      }

      let mut files = Vec::new();
      for (package_dir, metadata) in walk.ordered {
        let Ok(relative) = package_dir.strip_prefix(&self.root) else {
          continue;
        };
        let package_root = join_path(&root, &path_string(relative));
        files.extend(
          metadata
            .main_files()
            .iter()
            .map(|entry| join_path(&package_root, entry)),
        );
      }

      tracing::debug!(manager, files = files.len(), "enumerated installed packages");
      index.extend(manager, files);
    }

    Ok(index)
  }
}

/// Depth-first walk emitting each package after its dependencies.
struct PackageWalk<'a> {
  base: &'a Path,
  seen: HashSet<String>,
  ordered: Vec<(PathBuf, PackageMetadata)>,
}

impl<'a> PackageWalk<'a> {
  fn new(base: &'a Path) -> Self {
    Self {
      base,
      seen: HashSet::new(),
      ordered: Vec::new(),
    }
  }

  fn visit(&mut self, name: &str) -> Result<(), DependencyScanError> {
    let name = name.trim().trim_matches('/');
    if name.is_empty() || !self.seen.insert(name.to_string()) {
      return Ok(());
    }

    let package_dir = self.base.join(name);
    let Some(metadata) = read_package_metadata(&package_dir)? else {
      tracing::debug!(package = name, "skipping package that is not installed");
      return Ok(());
    };

    let dependencies: Vec<String> = metadata.dependencies.keys().cloned().collect();
    for dependency in &dependencies {
      self.visit(dependency)?;
    }
    self.ordered.push((package_dir, metadata));
    Ok(())
  }
}

fn project_metadata_file(manager: &str) -> &'static str {
  match manager {
    "bower" => "bower.json",
    _ => "package.json",
  }
}

#[derive(Debug, Deserialize)]
struct PackageMetadata {
  #[serde(default)]
  main: Option<MainField>,
  #[serde(default)]
  dependencies: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MainField {
  One(String),
  Many(Vec<String>),
}

impl PackageMetadata {
  fn main_files(&self) -> Vec<String> {
    let entries = match &self.main {
      Some(MainField::One(entry)) => std::slice::from_ref(entry),
      Some(MainField::Many(entries)) => entries.as_slice(),
      None => &[],
    };
    entries
      .iter()
      .map(|entry| entry.trim().to_string())
      .filter(|entry| !entry.is_empty())
      .collect()
  }
}

fn read_package_metadata(package_dir: &Path) -> Result<Option<PackageMetadata>, DependencyScanError> {
  for name in PACKAGE_METADATA_FILES {
    if let Some(metadata) = read_metadata_file(&package_dir.join(name))? {
      return Ok(Some(metadata));
    }
  }
  Ok(None)
}

fn read_metadata_file(path: &Path) -> Result<Option<PackageMetadata>, DependencyScanError> {
  let contents = match fs::read_to_string(path) {
    Ok(contents) => contents,
    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
    Err(err) => {
      return Err(DependencyScanError::Io {
        path: path.to_path_buf(),
        source: err,
      });
    }
  };
  let metadata = serde_json::from_str(&contents).map_err(|err| DependencyScanError::Parse {
    path: path.to_path_buf(),
    source: err,
  })?;
  Ok(Some(metadata))
}

fn package_dirs(base: &Path) -> Result<Vec<PathBuf>, DependencyScanError> {
  let mut packages = Vec::new();
  for dir in list_dirs(base)? {
    let is_scope = dir
      .file_name()
      .is_some_and(|name| name.to_string_lossy().starts_with('@'));
    if is_scope {
      packages.extend(list_dirs(&dir)?);
    } else {
      packages.push(dir);
    }
  }
  Ok(packages)
}

fn list_dirs(path: &Path) -> Result<Vec<PathBuf>, DependencyScanError> {
  let io_error = |source| DependencyScanError::Io {
    path: path.to_path_buf(),
    source,
  };
  let entries = match fs::read_dir(path) {
    Ok(entries) => entries,
    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
    Err(err) => return Err(io_error(err)),
  };

  let mut dirs = Vec::new();
  for entry in entries {
    let entry = entry.map_err(io_error)?;
    let hidden = entry.file_name().to_string_lossy().starts_with('.');
    if !hidden && entry.file_type().map_err(io_error)?.is_dir() {
      dirs.push(entry.path());
    }
  }
  dirs.sort();
  Ok(dirs)
}

fn path_string(path: &Path) -> String {
  path.to_string_lossy().replace('\\', "/")
}

/// Errors raised while enumerating installed packages.
#[derive(Debug)]
pub enum DependencyScanError {
  /// A directory or metadata file could not be read.
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// A package metadata file is not valid JSON.
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
}

impl std::fmt::Display for DependencyScanError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Io { path, source } => {
        write!(f, "failed to read {}: {}", path.display(), source)
      }
      Self::Parse { path, source } => {
        write!(f, "failed to parse {}: {}", path.display(), source)
      }
    }
  }
}

impl std::error::Error for DependencyScanError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io { source, .. } => Some(source),
      Self::Parse { source, .. } => Some(source),
    }
  }
}
