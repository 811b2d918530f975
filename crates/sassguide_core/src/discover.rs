//! Input discovery: files, directories and glob patterns.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult};

/// Extensions picked up when walking a directory. `.sass` is included so the
/// pipeline can report it as unsupported instead of silently skipping it.
pub const STYLESHEET_EXTENSIONS: &[&str] = &["scss", "css", "sass"];

/// Whether a path is in the indented syntax, which is not parsed.
pub fn is_indented_syntax(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("sass"))
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Compiled `ignore` globs from the configuration.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    pub fn new(patterns: &[String]) -> CoreResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p).map_err(|e| CoreError::Config(format!("ignore pattern '{}': {}", p, e))))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// A path is ignored when a pattern matches it as given, or relative to `root`.
    pub fn is_ignored(&self, path: &Path, root: Option<&Path>) -> bool {
        let relative = root.and_then(|r| path.strip_prefix(r).ok());
        self.patterns.iter().any(|pattern| {
            pattern.matches_path(path) || relative.is_some_and(|rel| pattern.matches_path(rel))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Resolve inputs to a sorted, de-duplicated list of files.
///
/// A file is taken as named, whatever its extension. A directory is walked
/// for stylesheets. Anything else is expanded as a glob pattern, and a pattern
/// (or plain path) that matches nothing is an error.
pub fn discover(inputs: &[String], ignore: &IgnoreSet) -> CoreResult<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            if !ignore.is_ignored(path, None) {
                files.insert(path.to_path_buf());
            }
        } else if path.is_dir() {
            walk(path, ignore, &mut files);
        } else if is_glob(input) {
            let mut matched = false;
            for entry in glob::glob(input)? {
                let Ok(entry) = entry else { continue };
                matched = true;
                if entry.is_file() && is_stylesheet(&entry) && !ignore.is_ignored(&entry, None) {
                    files.insert(entry);
                } else if entry.is_dir() {
                    walk(&entry, ignore, &mut files);
                }
            }
            if !matched {
                return Err(CoreError::InputNotFound(input.clone()));
            }
        } else {
            return Err(CoreError::InputNotFound(input.clone()));
        }
    }

    debug!("Discovered {} file(s) from {} input(s)", files.len(), inputs.len());
    Ok(files.into_iter().collect())
}

fn walk(root: &Path, ignore: &IgnoreSet, files: &mut BTreeSet<PathBuf>) {
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !ignore.is_ignored(e.path(), Some(root)))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if is_stylesheet(path) {
            trace!("Found {:?}", path);
            files.insert(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("components")).unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("main.scss"), ".a {\n}\n").unwrap();
        fs::write(dir.path().join("components/_button.scss"), ".b {\n}\n").unwrap();
        fs::write(dir.path().join("legacy.sass"), ".c\n  color: red\n").unwrap();
        fs::write(dir.path().join("reset.css"), "a {\n}\n").unwrap();
        fs::write(dir.path().join("notes.md"), "# notes\n").unwrap();
        fs::write(dir.path().join("vendor/lib.scss"), "#x {\n}\n").unwrap();
        dir
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_walk_directory() {
        let dir = tree();
        let inputs = vec![dir.path().to_string_lossy().to_string()];
        let files = discover(&inputs, &IgnoreSet::default()).unwrap();
        assert_eq!(
            names(&files, dir.path()),
            vec!["components/_button.scss", "legacy.sass", "main.scss", "reset.css", "vendor/lib.scss"]
        );
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = tree();
        let inputs = vec![dir.path().to_string_lossy().to_string()];
        let ignore = IgnoreSet::new(&["vendor".to_string(), "*.css".to_string()]).unwrap();
        let files = discover(&inputs, &ignore).unwrap();
        assert_eq!(
            names(&files, dir.path()),
            vec!["components/_button.scss", "legacy.sass", "main.scss"]
        );
    }

    #[test]
    fn test_glob_input() {
        let dir = tree();
        let pattern = format!("{}/**/*.scss", dir.path().display());
        let files = discover(&[pattern], &IgnoreSet::default()).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_missing_input() {
        let result = discover(&["does/not/exist.scss".to_string()], &IgnoreSet::default());
        assert!(matches!(result, Err(CoreError::InputNotFound(_))));
    }

    #[test]
    fn test_bad_ignore_pattern() {
        let err = IgnoreSet::new(&["[".to_string()]).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_indented_syntax_detection() {
        assert!(is_indented_syntax(Path::new("a/legacy.sass")));
        assert!(!is_indented_syntax(Path::new("a/main.scss")));
    }
}
