use globset::{GlobBuilder, GlobMatcher};

/// Compiled glob selecting the files that belong to a resource type.
///
/// Patterns without a `/` are matched against the base name only, so `*.js` accepts a script
/// at any directory depth. Patterns that mention a directory are matched against the full
/// path. Backslashes in candidate paths are treated as separators. Wildcards never match a
/// leading `.`, so `*.js` skips `.eslintrc.js` unless the pattern spells out the dot.
#[derive(Debug, Clone)]
pub struct TypePattern {
    raw: String,
    matcher: GlobMatcher,
    base_name: bool,
}

impl TypePattern {
    /// Compile `pattern`, failing when the glob syntax is invalid.
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let glob = GlobBuilder::new(pattern).literal_separator(true).build()?;
        Ok(Self {
            raw: pattern.to_string(),
            matcher: glob.compile_matcher(),
            base_name: !pattern.contains('/'),
        })
    }

    /// Pattern as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `path` is selected by the pattern.
    pub fn is_match(&self, path: &str) -> bool {
        let path = path.replace('\\', "/");
        if self.base_name {
            let name = path.rsplit('/').next().unwrap_or(&path);
            if is_hidden(name) && !self.raw.starts_with('.') {
                return false;
            }
            self.matcher.is_match(name)
        } else {
            let names_dot = self.raw.starts_with('.') || self.raw.contains("/.");
            if !names_dot && path.split('/').any(is_hidden) {
                return false;
            }
            self.matcher.is_match(&path)
        }
    }
}

fn is_hidden(segment: &str) -> bool {
    segment.starts_with('.') && segment != "." && segment != ".."
}

/// Match `path` against `pattern` with base-name semantics.
///
/// An invalid pattern matches nothing.
pub fn matches(path: &str, pattern: &str) -> bool {
    match TypePattern::new(pattern) {
        Ok(compiled) => compiled.is_match(path),
        Err(err) => {
            tracing::debug!(pattern, %err, "ignoring invalid glob pattern");
            false
        }
    }
}

/// Crude check for output names that denote a directory rather than a file.
pub fn is_directory_name(name: &str) -> bool {
    name.ends_with('/') || name.ends_with('\\') || !name.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_base_name_at_any_depth() {
        assert!(matches("/bower_components/jquery/dist/jquery.js", "*.js"));
        assert!(matches("jquery.js", "*.js"));
        assert!(!matches("/bower_components/bootstrap/dist/bootstrap.css", "*.js"));
    }

    #[test]
    fn supports_brace_alternatives() {
        let fonts = TypePattern::new("*.{eot,otf,svg,ttc,ttf,woff,woff2}").unwrap();
        assert!(fonts.is_match("/lib/fonts/icons.woff2"));
        assert!(fonts.is_match("/lib/fonts/icons.woff"));
        assert!(!fonts.is_match("/lib/fonts/icons.woff3"));
        assert_eq!(fonts.as_str(), "*.{eot,otf,svg,ttc,ttf,woff,woff2}");
    }

    #[test]
    fn patterns_with_directories_match_full_path() {
        let pattern = TypePattern::new("**/dist/*.js").unwrap();
        assert!(pattern.is_match("bower_components/jquery/dist/jquery.js"));
        assert!(!pattern.is_match("bower_components/jquery/src/jquery.js"));
    }

    #[test]
    fn wildcards_skip_dotfiles() {
        assert!(!matches("/project/.eslintrc.js", "*.js"));
        assert!(matches("/project/.eslintrc.js", ".*.js"));

        let nested = TypePattern::new("**/dist/*.js").unwrap();
        assert!(!nested.is_match("bower_components/.cache/dist/jquery.js"));
        assert!(nested.is_match("../bower_components/jquery/dist/jquery.js"));
    }

    #[test]
    fn accepts_windows_separators() {
        assert!(matches("C:\\bower_components\\jquery\\jquery.js", "*.js"));
    }

    #[test]
    fn invalid_patterns_match_nothing() {
        assert!(TypePattern::new("*.{js").is_err());
        assert!(!matches("app.js", "*.{js"));
    }

    #[test]
    fn detects_directory_names() {
        assert!(is_directory_name("/"));
        assert!(is_directory_name("images/"));
        assert!(is_directory_name("fonts"));
        assert!(!is_directory_name("app.js"));
    }
}
