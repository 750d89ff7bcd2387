//! Loading manifest documents from disk.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::error::ManifestResult;

fn comment_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|//[^\n]*|(?s:/\*.*?\*/)"#).expect("invalid comment regex")
  })
}

/// Remove `//` and `/* */` comments from JSON text, leaving string literals untouched.
///
/// Newlines inside block comments are kept so parse errors still point at the right line.
pub fn strip_json_comments(text: &str) -> String {
  comment_pattern()
    .replace_all(text, |caps: &Captures<'_>| {
      let matched = &caps[0];
      if matched.starts_with('"') {
        matched.to_string()
      } else {
        matched.chars().filter(|c| *c == '\n').collect()
      }
    })
    .into_owned()
}

/// Read a manifest file, strip its comments, and parse it as JSON.
///
/// Read and parse failures are returned as-is so callers can tell them apart from
/// structural problems detected later.
pub fn read_manifest(path: impl AsRef<Path>) -> ManifestResult<Value> {
  let path = path.as_ref();
  let content = fs::read_to_string(path)?;
  let document = serde_json::from_str(&strip_json_comments(&content))?;
  tracing::debug!(path = %path.display(), "read manifest");
  Ok(document)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ManifestError;
  use tempfile::tempdir;

  #[test]
  fn strips_line_and_block_comments() {
    let text = "{\n  // scripts\n  \"a\": 1, /* block\n comment */ \"b\": 2\n}";
    let value: Value = serde_json::from_str(&strip_json_comments(text)).unwrap();
    assert_eq!(value, serde_json::json!({"a": 1, "b": 2}));
  }

  #[test]
  fn keeps_comment_markers_inside_strings() {
    let text = r#"{"url": "http://example.com/*x*/", "escaped": "a \" // b"}"#;
    assert_eq!(strip_json_comments(text), text);
  }

  #[test]
  fn missing_file_is_a_read_error() {
    let err = read_manifest("totally/bogus/file.json").unwrap_err();
    assert!(matches!(err, ManifestError::Read(_)));
  }

  #[test]
  fn invalid_json_is_a_parse_error() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("invalid.json");
    fs::write(&path, "{ \"resources\": ").expect("failed to write manifest");

    let err = read_manifest(&path).unwrap_err();
    assert!(matches!(err, ManifestError::Parse(_)));
  }

  #[test]
  fn reads_commented_manifest() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("manifest.json");
    fs::write(
      &path,
      "{\n  // project assets\n  \"resources\": {}\n}\n",
    )
    .expect("failed to write manifest");

    let value = read_manifest(&path).expect("manifest should parse");
    assert!(value["resources"].is_object());
  }
}
