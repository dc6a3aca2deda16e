// src/services/tags.rs

//! Tag line detection.
//!
//! A tag line is a top-level paragraph with a raw-text node starting with `#`,
//! e.g. `#blog #rust`. Headings are a separate block kind and code or nested
//! blocks are never inspected, so a `#` in those places is not mistaken for a
//! tag.

use super::document::{Block, Document, RawText};

/// Tags declared by one top-level paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLine {
    /// Position of the paragraph among the document's direct children
    pub index: usize,
    /// Declared tags, `#` stripped, in source order
    pub tags: Vec<String>,
}

impl TagLine {
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Tags declared by a block, or `None` if it is not a tag line.
pub fn tags_of(block: &Block) -> Option<Vec<String>> {
    if !block.is_paragraph() {
        return None;
    }

    let mut found = false;
    let mut tags = Vec::new();
    for node in block.inlines().iter().map(RawText::content) {
        if node.starts_with('#') {
            found = true;
            tags.extend(split_tags(node));
        }
    }
    found.then_some(tags)
}

/// Collect every tag line of the document.
pub fn scan(doc: &Document) -> Vec<TagLine> {
    doc.blocks()
        .iter()
        .enumerate()
        .filter_map(|(index, block)| tags_of(block).map(|tags| TagLine { index, tags }))
        .collect()
}

/// Whether any tag line of the document declares `sentinel`.
///
/// Stops at the first tag line that does.
pub fn is_eligible(doc: &Document, sentinel: &str) -> bool {
    doc.blocks()
        .iter()
        .filter_map(tags_of)
        .any(|tags| tags.iter().any(|t| t == sentinel))
}

fn split_tags(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split_whitespace()
        .map(|token| token.strip_prefix('#').unwrap_or(token))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_single_tag_line() {
        let doc = Document::parse("# Title\n\n#blog #systems #design\n\nBody\n");
        let lines = scan(&doc);

        assert_eq!(
            lines,
            vec![TagLine {
                index: 1,
                tags: vec!["blog".into(), "systems".into(), "design".into()],
            }]
        );
    }

    #[test]
    fn test_scan_collects_every_tag_line() {
        let doc = Document::parse("#rust\n\nBody\n\n#blog #rust\n");
        let lines = scan(&doc);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[0].tags, vec!["rust"]);
        assert_eq!(lines[1].index, 2);
        assert!(lines[1].contains("blog"));
    }

    #[test]
    fn test_heading_is_not_a_tag_line() {
        let doc = Document::parse("# blog\n\n## blog\n");
        assert!(scan(&doc).is_empty());
        assert!(!is_eligible(&doc, "blog"));
    }

    #[test]
    fn test_code_block_is_ignored() {
        let doc = Document::parse("Intro\n\n```sh\n#blog\n```\n\n    #blog\n");
        assert!(scan(&doc).is_empty());
        assert!(!is_eligible(&doc, "blog"));
    }

    #[test]
    fn test_prose_mentioning_blog_is_ignored() {
        let doc = Document::parse("My blog is about #blog things.\n\nAlso `#blog` here.\n");
        assert!(!is_eligible(&doc, "blog"));
    }

    #[test]
    fn test_nested_tag_line_is_ignored() {
        let doc = Document::parse("- #blog #rust\n\n> #blog\n");
        assert!(scan(&doc).is_empty());
        assert!(!is_eligible(&doc, "blog"));
    }

    #[test]
    fn test_eligible_requires_exact_sentinel() {
        assert!(is_eligible(&Document::parse("#rust #blog\n"), "blog"));
        assert!(!is_eligible(&Document::parse("#blogging #rust\n"), "blog"));
        assert!(!is_eligible(&Document::parse("Just text\n"), "blog"));
    }

    #[test]
    fn test_custom_sentinel() {
        let doc = Document::parse("#publish #notes\n");
        assert!(is_eligible(&doc, "publish"));
        assert!(!is_eligible(&doc, "blog"));
    }

    #[test]
    fn test_tag_line_followed_by_soft_break() {
        let doc = Document::parse("#blog #a\n#b\n");
        let lines = scan(&doc);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].tags, vec!["blog", "a", "b"]);
    }
}
