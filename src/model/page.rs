//! Page-level types.

use super::Sentence;
use serde::{Deserialize, Serialize};

/// A reconstructed page: classified blocks in reading order.
///
/// Serializes to `{ "width", "height", "blocks" }`, the shape consumed by
/// the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page width in source units
    pub width: f32,

    /// Page height in source units
    pub height: f32,

    /// Content blocks on the page, top to bottom
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Get plain text content of the page, one block per paragraph.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the page is empty (no content blocks).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterate over blocks of one type.
    pub fn blocks_of(&self, block_type: BlockType) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(move |b| b.block_type == block_type)
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// Semantic role of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Page or section title
    Title,
    /// Secondary heading
    Subtitle,
    /// Body text
    #[default]
    Paragraph,
}

impl BlockType {
    /// Lowercase name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Title => "title",
            BlockType::Subtitle => "subtitle",
            BlockType::Paragraph => "paragraph",
        }
    }

    /// Check if this is a heading role (title or subtitle).
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockType::Title | BlockType::Subtitle)
    }
}

/// A classified content block.
///
/// `sentences` holds one inner list per source paragraph. A block built by the
/// reconstructor wraps exactly one paragraph; the outer list leaves room for
/// grouping several paragraphs under one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block role
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Sentences, grouped by source paragraph
    pub sentences: Vec<Vec<Sentence>>,
}

impl Block {
    /// Create a block wrapping a single paragraph's sentences.
    pub fn new(block_type: BlockType, sentences: Vec<Sentence>) -> Self {
        Self {
            block_type,
            sentences: vec![sentences],
        }
    }

    /// Create a title block.
    pub fn title(sentences: Vec<Sentence>) -> Self {
        Self::new(BlockType::Title, sentences)
    }

    /// Create a subtitle block.
    pub fn subtitle(sentences: Vec<Sentence>) -> Self {
        Self::new(BlockType::Subtitle, sentences)
    }

    /// Create a paragraph block.
    pub fn paragraph(sentences: Vec<Sentence>) -> Self {
        Self::new(BlockType::Paragraph, sentences)
    }

    /// Iterate over all sentences in order, across source paragraphs.
    pub fn iter_sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter().flatten()
    }

    /// Number of sentences in the block.
    pub fn sentence_count(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    /// Get plain text of the block; sentences joined by spaces,
    /// source paragraphs by newlines.
    pub fn plain_text(&self) -> String {
        self.sentences
            .iter()
            .map(|paragraph| {
                paragraph
                    .iter()
                    .map(Sentence::plain_text)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
