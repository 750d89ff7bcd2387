use super::matching::TypePattern;

/// Keep the files whose name is selected by `pattern`, preserving input order.
pub fn filter_by_type(files: &[String], pattern: &TypePattern) -> Vec<String> {
    files
        .iter()
        .filter(|file| pattern.is_match(file))
        .cloned()
        .collect()
}

/// Keep the files installed under `<dependency_dir>/<name>/` for any of `names`.
pub fn filter_by_package<S: AsRef<str>>(
    files: &[String],
    dependency_dir: &str,
    names: &[S],
) -> Vec<String> {
    files
        .iter()
        .filter(|file| belongs_to_any(file, dependency_dir, names))
        .cloned()
        .collect()
}

/// Complement of [`filter_by_package`]: drop every file installed under one of `names`.
pub fn reject_by_package<S: AsRef<str>>(
    files: &[String],
    dependency_dir: &str,
    names: &[S],
) -> Vec<String> {
    files
        .iter()
        .filter(|file| !belongs_to_any(file, dependency_dir, names))
        .cloned()
        .collect()
}

/// Whether `path` contains `segment` as whole path components.
///
/// The segment may start the path or follow a separator and must be followed by one.
pub(crate) fn contains_segment(path: &str, segment: &str) -> bool {
    let path = path.replace('\\', "/");
    let segment = segment.trim_matches('/');
    if segment.is_empty() {
        return false;
    }

    let needle = format!("{segment}/");
    path.starts_with(&needle) || path.contains(&format!("/{needle}"))
}

fn belongs_to_any<S: AsRef<str>>(file: &str, dependency_dir: &str, names: &[S]) -> bool {
    names.iter().any(|name| {
        let name = name.as_ref().trim().trim_matches('/');
        !name.is_empty() && contains_segment(file, &format!("{dependency_dir}/{name}"))
    })
}
