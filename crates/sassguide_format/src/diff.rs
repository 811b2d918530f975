//! Line diffs between source text and formatter output.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// One contiguous changed region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    /// First affected line in the original text, 1-based.
    pub line: usize,
    /// Lines removed from the original.
    pub removed: Vec<String>,
    /// Lines the formatter wants instead.
    pub added: Vec<String>,
}

impl Hunk {
    pub fn summary(&self) -> String {
        match (self.removed.len(), self.added.len()) {
            (0, added) => format!("formatter would insert {} line(s)", added),
            (removed, 0) => format!("formatter would remove {} line(s)", removed),
            (removed, added) => format!(
                "formatter would rewrite {} line(s) as {} line(s)",
                removed, added
            ),
        }
    }
}

/// Changed regions between `original` and `formatted`, in order.
pub fn diff(original: &str, formatted: &str) -> Vec<Hunk> {
    let text_diff = TextDiff::from_lines(original, formatted);
    let line_count = original.lines().count().max(1);

    text_diff
        .grouped_ops(0)
        .iter()
        .filter_map(|group| {
            let first = group.first()?;
            let mut hunk = Hunk {
                line: (first.old_range().start + 1).min(line_count),
                removed: Vec::new(),
                added: Vec::new(),
            };
            for op in group {
                for change in text_diff.iter_changes(op) {
                    let text = change.value().trim_end_matches(['\n', '\r']).to_string();
                    match change.tag() {
                        ChangeTag::Delete => hunk.removed.push(text),
                        ChangeTag::Insert => hunk.added.push(text),
                        ChangeTag::Equal => {}
                    }
                }
            }
            (!hunk.removed.is_empty() || !hunk.added.is_empty()).then_some(hunk)
        })
        .collect()
}

/// Unified diff text, for showing what `fix` would change.
pub fn unified_diff(original: &str, formatted: &str, path: &str) -> String {
    TextDiff::from_lines(original, formatted)
        .unified_diff()
        .context_radius(2)
        .header(path, path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_has_no_hunks() {
        let text = ".a {\n  color: red;\n}\n";
        assert!(diff(text, text).is_empty());
    }

    #[test]
    fn test_hunk_lines() {
        let original = ".a {\n  color:red;\n}\n.b {\n}\n";
        let formatted = ".a {\n  color: red;\n}\n\n.b {\n}\n";
        let hunks = diff(original, formatted);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].line, 2);
        assert_eq!(hunks[0].removed, vec!["  color:red;".to_string()]);
        assert_eq!(hunks[0].added, vec!["  color: red;".to_string()]);
        assert_eq!(hunks[1].line, 4);
        assert_eq!(hunks[1].added, vec![String::new()]);
        assert!(hunks[1].summary().contains("insert 1"));
    }

    #[test]
    fn test_single_line_input() {
        let original = ".avatar{border-radius:50%;border:2px solid white; }";
        let formatted = ".avatar {\n  border-radius: 50%;\n  border: 2px solid white;\n}\n";
        let hunks = diff(original, formatted);
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].line, 1);
        assert_eq!(hunks[0].added.len(), 4);
    }

    #[test]
    fn test_unified_diff_names_the_file() {
        let text = unified_diff("a{}\n", "a {\n}\n", "main.scss");
        assert!(text.contains("main.scss"));
        assert!(text.contains("+a {"));
    }
}
