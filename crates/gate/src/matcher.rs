//! Resource predicates over filesystem paths.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use grant::{Allowed, Grant, GrantExt};

/// Matches paths against a list of patterns.
///
/// - `*` or `**` match every path.
/// - `dir/*` matches direct children of `dir`.
/// - `dir/**` matches `dir` and everything below it.
/// - Anything else is a prefix, compared component by component.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    patterns: Vec<String>,
}

impl PathMatcher {
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.patterns.iter().any(|pattern| pattern_matches(pattern, path))
    }

    /// Attach this matcher to a grant. Resources must be [`PathBuf`]s.
    pub fn attach<G: Grant>(self, grant: G) -> Allowed<G> {
        grant.allow_as(move |path: &PathBuf| Ok(self.matches(path)))
    }
}

fn pattern_matches(pattern: &str, path: &Path) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }
    if let Some(dir) = pattern.strip_suffix("/**") {
        return path.starts_with(dir);
    }
    if let Some(dir) = pattern.strip_suffix("/*") {
        return path.parent() == Some(Path::new(dir));
    }
    path.starts_with(pattern)
}

/// Allows an exact set of files.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: HashSet<PathBuf>,
}

impl FileSet {
    pub fn new(files: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// Attach this set to a grant. Resources must be [`PathBuf`]s.
    pub fn attach<G: Grant>(self, grant: G) -> Allowed<G> {
        grant.allow_as(move |path: &PathBuf| Ok(self.contains(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(patterns: &[&str]) -> PathMatcher {
        PathMatcher::new(patterns.iter().copied())
    }

    #[test]
    fn test_wildcard_matches_everything() {
        assert!(matcher(&["*"]).matches(Path::new("/etc/passwd")));
        assert!(matcher(&["**"]).matches(Path::new("relative/file")));
    }

    #[test]
    fn test_prefix_is_component_wise() {
        let m = matcher(&["/srv/data"]);
        assert!(m.matches(Path::new("/srv/data")));
        assert!(m.matches(Path::new("/srv/data/a/b")));
        assert!(!m.matches(Path::new("/srv/database")));
        assert!(!m.matches(Path::new("/srv")));
    }

    #[test]
    fn test_single_level_glob() {
        let m = matcher(&["./build/*"]);
        assert!(m.matches(Path::new("./build/out.o")));
        assert!(!m.matches(Path::new("./build/sub/out.o")));
        assert!(!m.matches(Path::new("./build")));
    }

    #[test]
    fn test_recursive_glob() {
        let m = matcher(&["/tmp/**"]);
        assert!(m.matches(Path::new("/tmp/bar/baz")));
        assert!(m.matches(Path::new("/tmp")));
        assert!(!m.matches(Path::new("/var/tmp/x")));
    }

    #[test]
    fn test_empty_matcher_matches_nothing() {
        assert!(!PathMatcher::default().matches(Path::new("/")));
    }

    #[test]
    fn test_file_set_is_exact() {
        let files = FileSet::new(["/etc/motd", "/etc/hosts"]);
        assert!(files.contains(Path::new("/etc/motd")));
        assert!(!files.contains(Path::new("/etc")));
        assert!(!files.contains(Path::new("/etc/motd.bak")));
    }

    #[test]
    fn test_attached_matchers_fail_closed_on_other_types() {
        let paths = matcher(&["/srv/**"]).attach(grant::new());
        let grant = FileSet::new(["/etc/motd"]).attach(paths);

        assert!(grant.allows(&PathBuf::from("/srv/x")).unwrap());
        assert!(grant.allows(&PathBuf::from("/etc/motd")).unwrap());
        assert!(!grant.allows(&PathBuf::from("/etc/shadow")).unwrap());
        assert!(!grant.allows(&"/srv/x").unwrap());
        assert!(!grant.allows(&"/srv/x".to_string()).unwrap());
    }
}
