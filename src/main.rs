use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use asset_manifest::{DependencyIndex, Manifest, read_manifest};
use clap::Parser;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Parser, Debug)]
#[command(
  name = "asset-manifest",
  version,
  about = "Resolve an asset manifest into ordered source globs"
)]
struct Cli {
  /// Path to the manifest JSON file
  manifest: PathBuf,

  /// Override `config.paths.source`
  #[arg(long, value_name = "DIR")]
  source: Option<String>,

  /// Override `config.paths.dist`
  #[arg(long, value_name = "DIR")]
  dist: Option<String>,

  /// Newline-separated list of installed dependency files, used instead of scanning packages
  #[arg(long, value_name = "FILE")]
  deps: Option<PathBuf>,

  /// Print only the outputs of this resource type
  #[arg(long = "type", value_name = "NAME", conflicts_with_all = ["output", "project"])]
  resource_type: Option<String>,

  /// Print a single output by name
  #[arg(long, value_name = "NAME", conflicts_with = "project")]
  output: Option<String>,

  /// Print the declared first-party files per resource type
  #[arg(long)]
  project: bool,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let overrides = path_overrides(&cli);
  let manifest = match &cli.deps {
    Some(listing) => load_with_listing(&cli.manifest, overrides.as_ref(), listing)?,
    None => Manifest::load(&cli.manifest, overrides.as_ref())
      .with_context(|| format!("failed to resolve {}", cli.manifest.display()))?,
  };

  if cli.project {
    return print_json(&manifest.project_globs());
  }

  if let Some(name) = &cli.output {
    let Some(output) = manifest.find_output_by_name(name) else {
      bail!("no output named `{name}` in {}", cli.manifest.display());
    };
    return print_json(output);
  }

  if let Some(resource_type) = &cli.resource_type {
    if !manifest.resources().contains_key(resource_type) {
      bail!("no resource type `{resource_type}` in {}", cli.manifest.display());
    }
    return print_json(&manifest.outputs(resource_type));
  }

  print_json(manifest.globs())
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_env("ASSET_MANIFEST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
    )
    .with_writer(std::io::stderr)
    .init();
}

fn path_overrides(cli: &Cli) -> Option<Value> {
  let mut paths = Map::new();
  if let Some(source) = &cli.source {
    paths.insert("source".into(), Value::String(source.clone()));
  }
  if let Some(dist) = &cli.dist {
    paths.insert("dist".into(), Value::String(dist.clone()));
  }
  (!paths.is_empty()).then(|| serde_json::json!({ "paths": paths }))
}

fn load_with_listing(
  manifest_path: &Path,
  overrides: Option<&Value>,
  listing: &Path,
) -> Result<Manifest> {
  let content = fs::read_to_string(listing)
    .with_context(|| format!("failed to read dependency listing {}", listing.display()))?;
  let document = read_manifest(manifest_path)
    .with_context(|| format!("failed to read {}", manifest_path.display()))?;
  let normalized = asset_manifest::normalize_manifest(document, overrides)
    .with_context(|| format!("failed to normalise {}", manifest_path.display()))?;
  let dependencies = DependencyIndex::from_listing(&normalized.config, content.lines());
  Manifest::resolve(normalized, dependencies)
    .with_context(|| format!("failed to resolve {}", manifest_path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  let rendered = serde_json::to_string_pretty(value).context("failed to serialise output")?;
  println!("{rendered}");
  Ok(())
}
