//! Outline file reader.
//!
//! One entry per line. Each nesting level is indented by two spaces or one
//! tab. Blank lines and lines starting with `#` are skipped. An entry may end
//! with `[disabled]` and/or `[hidden]` markers.

use super::node::{join_path, OutlineNode, PATH_SEPARATOR};
use super::Outline;
use crate::error::{ArboristError, Result};
use std::collections::HashSet;
use std::path::Path;

const DISABLED_MARKER: &str = "[disabled]";
const HIDDEN_MARKER: &str = "[hidden]";

/// Outline reader.
#[derive(Debug)]
pub struct OutlineReader;

impl OutlineReader {
    /// Read an outline file.
    pub fn read_file(path: &Path) -> Result<Outline> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ArboristError::file_open(path.to_path_buf(), e))?;
        let mut outline = Self::parse(&text)?;
        outline.source = Some(path.to_path_buf());
        tracing::info!("Read {} outline entries from {}", outline.len(), path.display());
        Ok(outline)
    }

    /// Parse outline text.
    pub fn parse(text: &str) -> Result<Outline> {
        // Open ancestors of the line being read, outermost first.
        let mut open: Vec<OutlineNode> = Vec::new();
        let mut roots = Vec::new();
        let mut seen = HashSet::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let level = Self::indent_level(raw, line)?;
            if level > open.len() {
                return Err(ArboristError::outline_parse(
                    line,
                    format!("indented {} levels under a level-{} entry", level, open.len()),
                ));
            }
            while open.len() > level {
                Self::close(&mut open, &mut roots);
            }

            let (name, enabled, visible) = Self::split_markers(trimmed);
            if name.is_empty() {
                return Err(ArboristError::outline_parse(line, "missing entry name"));
            }
            if name.contains(PATH_SEPARATOR) {
                return Err(ArboristError::outline_parse(
                    line,
                    format!("entry names may not contain '{}'", PATH_SEPARATOR),
                ));
            }

            let parent_path = open.last().map_or("", |parent| parent.path.as_str());
            let path = join_path(parent_path, name);
            if !seen.insert(path.clone()) {
                return Err(ArboristError::outline_parse(
                    line,
                    format!("duplicate entry {}", path),
                ));
            }

            let mut node = OutlineNode::new(name.to_string(), path);
            node.enabled = enabled;
            node.visible = visible;
            open.push(node);
        }

        while !open.is_empty() {
            Self::close(&mut open, &mut roots);
        }
        Ok(Outline::new(None, roots))
    }

    fn close(open: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
        if let Some(node) = open.pop() {
            match open.last_mut() {
                Some(parent) => parent.add_child(node),
                None => roots.push(node),
            }
        }
    }

    fn indent_level(raw: &str, line: usize) -> Result<usize> {
        let mut tabs = 0;
        let mut spaces = 0;
        for ch in raw.chars() {
            match ch {
                '\t' => tabs += 1,
                ' ' => spaces += 1,
                _ => break,
            }
        }
        if spaces % 2 != 0 {
            return Err(ArboristError::outline_parse(
                line,
                "indentation must be a multiple of two spaces",
            ));
        }
        Ok(tabs + spaces / 2)
    }

    /// Strip trailing markers. Returns the name and the enabled and visible flags.
    fn split_markers(entry: &str) -> (&str, bool, bool) {
        let mut rest = entry;
        let mut enabled = true;
        let mut visible = true;
        loop {
            if let Some(stripped) = rest.strip_suffix(DISABLED_MARKER) {
                enabled = false;
                rest = stripped.trim_end();
            } else if let Some(stripped) = rest.strip_suffix(HIDDEN_MARKER) {
                visible = false;
                rest = stripped.trim_end();
            } else {
                return (rest, enabled, visible);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn names(nodes: &[OutlineNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn nesting_follows_indentation() {
        let text = "\
# project layout
src
  main.rs
  ui
\tmod.rs [disabled]

docs [hidden]
";
        let outline = OutlineReader::parse(text).unwrap();
        assert_eq!(names(&outline.roots), vec!["src", "docs"]);

        let src = &outline.roots[0];
        // A tab is one level, so mod.rs is a sibling of main.rs.
        assert_eq!(names(&src.children), vec!["main.rs", "ui", "mod.rs"]);
        assert!(!src.children[2].enabled);
        assert!(src.children[1].children.is_empty());
        let docs = &outline.roots[1];
        assert!(!docs.visible);
        assert!(docs.enabled);
        assert_eq!(outline.len(), 5);
    }

    #[test]
    fn markers_combine_in_any_order() {
        let text = "a [hidden] [disabled]\nb [disabled][hidden]\n";
        let outline = OutlineReader::parse(text).unwrap();
        for node in &outline.roots {
            assert!(!node.enabled);
            assert!(!node.visible);
        }
        assert_eq!(names(&outline.roots), vec!["a", "b"]);
    }

    #[test]
    fn paths_join_names() {
        let outline = OutlineReader::parse("a\n  b\n    c\n  d\n").unwrap();
        let a = &outline.roots[0];
        assert_eq!(a.children[0].children[0].path, "a/b/c");
        assert_eq!(a.children[1].path, "a/d");
    }

    #[test]
    fn bad_lines_report_their_number() {
        let cases = [
            ("a\n    b\n", 2),
            ("a\n   b\n", 2),
            ("a\n\n[hidden]\n", 3),
            ("a/b\n", 1),
            ("a\n  b\n  b\n", 3),
        ];
        for (text, expected) in cases {
            match OutlineReader::parse(text) {
                Err(ArboristError::OutlineParse { line, .. }) => assert_eq!(line, expected),
                other => panic!("expected parse error for {:?}, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn same_name_under_different_parents_is_fine() {
        let outline = OutlineReader::parse("a\n  x\nb\n  x\n").unwrap();
        assert_eq!(outline.roots[1].children[0].path, "b/x");
    }

    #[test]
    fn read_file_records_the_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "root\n  leaf").unwrap();
        let outline = OutlineReader::read_file(file.path()).unwrap();
        assert_eq!(outline.source.as_deref(), Some(file.path()));
        assert!(outline.find("root/leaf").is_some());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = OutlineReader::read_file(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ArboristError::FileOpen { .. }));
    }
}
