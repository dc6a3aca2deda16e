// src/services/document.rs

//! Block-level view of a markdown note.
//!
//! pulldown-cmark does the parsing; this module only records the top-level
//! blocks of a note together with the raw-text nodes that are direct children
//! of top-level paragraphs. Serializing splices the original source, so
//! anything that is not removed or rewritten comes back byte for byte.

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag};

/// Kind of a top-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading,
    CodeBlock,
    List,
    BlockQuote,
    Other,
}

impl BlockKind {
    fn from_tag(tag: &Tag<'_>) -> Self {
        match tag {
            Tag::Paragraph => Self::Paragraph,
            Tag::Heading { .. } => Self::Heading,
            Tag::CodeBlock(_) => Self::CodeBlock,
            Tag::List(_) => Self::List,
            Tag::BlockQuote(..) => Self::BlockQuote,
            _ => Self::Other,
        }
    }
}

/// A run of plain text directly inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText {
    span: Range<usize>,
    content: String,
    replacement: Option<String>,
}

impl RawText {
    /// Current text of the node.
    pub fn content(&self) -> &str {
        self.replacement.as_deref().unwrap_or(&self.content)
    }

    /// Replace the node's text in the serialized output.
    pub fn rewrite(&mut self, content: impl Into<String>) {
        self.replacement = Some(content.into());
    }

    /// Whether the node has been rewritten.
    pub fn is_rewritten(&self) -> bool {
        self.replacement.is_some()
    }
}

/// A direct child of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    /// Start of the gap separating this block from the previous one
    lead: usize,
    span: Range<usize>,
    inlines: Vec<RawText>,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn is_paragraph(&self) -> bool {
        self.kind == BlockKind::Paragraph
    }

    /// Raw-text nodes that are direct children of this block.
    ///
    /// Always empty for anything but paragraphs.
    pub fn inlines(&self) -> &[RawText] {
        &self.inlines
    }

    pub fn inlines_mut(&mut self) -> &mut [RawText] {
        &mut self.inlines
    }

    fn render_into(&self, source: &str, out: &mut String) {
        out.push_str(&source[self.lead..self.span.start]);

        let mut cursor = self.span.start;
        for node in self.inlines.iter().filter(|n| n.is_rewritten()) {
            out.push_str(&source[cursor..node.span.start]);
            out.push_str(node.content());
            cursor = node.span.end;
        }
        out.push_str(&source[cursor..self.span.end]);
    }
}

/// A parsed note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source: String,
    blocks: Vec<Block>,
    /// End of the last block of the original parse
    tail: usize,
}

impl Document {
    /// Parse markdown text into its top-level blocks.
    pub fn parse(text: &str) -> Self {
        let mut blocks: Vec<Block> = Vec::new();
        let mut current: Option<Block> = None;
        let mut pending: Option<RawText> = None;
        let mut depth = 0usize;
        let mut cursor = 0usize;

        for (event, range) in Parser::new_ext(text, parser_options()).into_offset_iter() {
            let in_paragraph = current.as_ref().is_some_and(Block::is_paragraph);

            match event {
                Event::Start(tag) => {
                    if depth == 0 {
                        let start = range.start.max(cursor);
                        current = Some(Block {
                            kind: BlockKind::from_tag(&tag),
                            lead: cursor,
                            span: start..range.end.max(start),
                            inlines: Vec::new(),
                        });
                    } else if in_paragraph {
                        flush(&mut pending, current.as_mut());
                    }
                    depth += 1;
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if in_paragraph {
                        flush(&mut pending, current.as_mut());
                    }
                    if depth == 0 {
                        if let Some(block) = current.take() {
                            cursor = block.span.end;
                            blocks.push(block);
                        }
                    }
                }
                Event::Text(content) if in_paragraph && depth == 1 => match pending.as_mut() {
                    Some(node) if node.span.end == range.start => {
                        node.content.push_str(&content);
                        node.span.end = range.end;
                    }
                    _ => {
                        flush(&mut pending, current.as_mut());
                        pending = Some(RawText {
                            span: range,
                            content: content.into_string(),
                            replacement: None,
                        });
                    }
                },
                _ if depth == 0 => {
                    // Leaf blocks such as thematic breaks have no Start/End pair.
                    let start = range.start.max(cursor);
                    let end = range.end.max(start);
                    blocks.push(Block {
                        kind: BlockKind::Other,
                        lead: cursor,
                        span: start..end,
                        inlines: Vec::new(),
                    });
                    cursor = end;
                }
                _ => {
                    if in_paragraph {
                        flush(&mut pending, current.as_mut());
                    }
                }
            }
        }

        Self {
            source: text.to_string(),
            blocks,
            tail: cursor,
        }
    }

    /// Direct children of the document.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// A document over the same source with a new block list.
    ///
    /// `blocks` must come from this document, in their original order.
    pub fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            source: self.source.clone(),
            blocks,
            tail: self.tail,
        }
    }

    /// Serialize back to markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for block in &self.blocks {
            block.render_into(&self.source, &mut out);
        }
        out.push_str(&self.source[self.tail..]);

        match out.find(|c: char| c != '\n' && c != '\r') {
            Some(0) => out,
            Some(start) => out.split_off(start),
            None => String::new(),
        }
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

fn flush(pending: &mut Option<RawText>, block: Option<&mut Block>) {
    if let (Some(node), Some(block)) = (pending.take(), block) {
        block.inlines.push(node);
    }
}
