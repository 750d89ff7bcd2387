/// Join `path` onto `base` and normalise the result with forward slashes.
///
/// `.` segments and redundant separators are dropped and `..` climbs a directory where one
/// is available. A trailing slash is preserved so directory globs keep their shape.
pub fn join_path(base: &str, path: &str) -> String {
    let joined = match (base.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{path}"),
    };
    normalize_path(&joined)
}

/// Prefix a manifest file entry with the project source root.
///
/// A leading `!` marks an exclusion for the downstream bundler and stays in front of the
/// joined path instead of becoming part of it.
pub fn join_source_path(source_root: &str, file: &str) -> String {
    match file.strip_prefix('!') {
        Some(negated) => format!("!{}", join_path(source_root, negated)),
        None => join_path(source_root, file),
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if absolute {
        normalized.insert(0, '/');
    }
    if normalized.is_empty() {
        normalized.push('.');
    }
    if trailing && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_redundant_separators() {
        assert_eq!(join_path("assets/", "styles/main.less"), "assets/styles/main.less");
        assert_eq!(join_path("assets", "/main.js"), "assets/main.js");
        assert_eq!(join_path("./assets//", "./scripts/**/*"), "assets/scripts/**/*");
    }

    #[test]
    fn resolves_parent_segments() {
        assert_eq!(join_path("assets/", "../vendor/plugin.js"), "vendor/plugin.js");
        assert_eq!(join_path("", "../../plugin.js"), "../../plugin.js");
        assert_eq!(join_path("/", "../root.js"), "/root.js");
    }

    #[test]
    fn keeps_trailing_slash_and_absolute_roots() {
        assert_eq!(join_path("images", "/"), "images/");
        assert_eq!(join_path("/srv/site", "bower_components/"), "/srv/site/bower_components/");
    }

    #[test]
    fn empty_inputs_normalise_to_current_dir() {
        assert_eq!(join_path("", ""), ".");
        assert_eq!(join_path("assets", ".."), ".");
    }

    #[test]
    fn keeps_negation_outside_the_join() {
        assert_eq!(join_source_path("assets/", "!scripts/skip.js"), "!assets/scripts/skip.js");
        assert_eq!(join_source_path("assets/", "scripts/main.js"), "assets/scripts/main.js");
    }

    #[test]
    fn normalises_backslashes() {
        assert_eq!(join_path("assets\\", "styles\\main.css"), "assets/styles/main.css");
    }
}
