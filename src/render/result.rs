//! Rendering result and reconstruction statistics.

use serde::{Deserialize, Serialize};

use crate::model::{BlockType, Page, Sentence};

/// Rendered content together with statistics about what it contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Statistics over the rendered pages
    pub stats: ReconstructionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: ReconstructionStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts over reconstructed pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionStats {
    /// Pages seen
    pub page_count: usize,

    /// Blocks classified as titles
    pub title_count: usize,

    /// Blocks classified as subtitles
    pub subtitle_count: usize,

    /// Blocks classified as body paragraphs
    pub paragraph_count: usize,

    /// Sentences across all blocks
    pub sentence_count: usize,

    /// Sentences carrying bold or italic spans
    pub styled_sentence_count: usize,

    /// Whitespace-separated words
    pub word_count: usize,

    /// Non-whitespace characters
    pub char_count: usize,
}

impl ReconstructionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics over pages.
    pub fn from_pages(pages: &[Page]) -> Self {
        let mut stats = Self::new();
        for page in pages {
            stats.add_page(page);
        }
        stats
    }

    /// Count one page and its blocks.
    pub fn add_page(&mut self, page: &Page) {
        self.page_count += 1;
        for block in &page.blocks {
            match block.block_type {
                BlockType::Title => self.title_count += 1,
                BlockType::Subtitle => self.subtitle_count += 1,
                BlockType::Paragraph => self.paragraph_count += 1,
            }
            block.iter_sentences().for_each(|s| self.add_sentence(s));
        }
    }

    fn add_sentence(&mut self, sentence: &Sentence) {
        self.sentence_count += 1;
        if sentence.is_styled() {
            self.styled_sentence_count += 1;
        }
        self.count_text(&sentence.plain_text());
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count();
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count();
    }

    /// Total number of blocks of any type.
    pub fn block_count(&self) -> usize {
        self.title_count + self.subtitle_count + self.paragraph_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ReconstructionStats) {
        self.page_count += other.page_count;
        self.title_count += other.title_count;
        self.subtitle_count += other.subtitle_count;
        self.paragraph_count += other.paragraph_count;
        self.sentence_count += other.sentence_count;
        self.styled_sentence_count += other.styled_sentence_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Span};

    #[test]
    fn test_stats_from_pages() {
        let mut page = Page::new(600.0, 800.0);
        page.add_block(Block::title(vec![Sentence::from("Intro")]));
        page.add_block(Block::paragraph(vec![
            Sentence::from("One two."),
            Sentence::Styled(vec![Span::italic("Three"), Span::new(" four!")]),
        ]));
        let stats = ReconstructionStats::from_pages(&[page, Page::new(1.0, 1.0)]);

        assert_eq!(stats.page_count, 2);
        assert_eq!(stats.title_count, 1);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.block_count(), 2);
        assert_eq!(stats.sentence_count, 3);
        assert_eq!(stats.styled_sentence_count, 1);
        assert_eq!(stats.word_count, 5);
        assert_eq!(stats.char_count, 5 + 7 + 10);
    }

    #[test]
    fn test_stats_merge() {
        let mut a = ReconstructionStats {
            page_count: 1,
            sentence_count: 4,
            ..Default::default()
        };
        let b = ReconstructionStats {
            page_count: 2,
            subtitle_count: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.page_count, 3);
        assert_eq!(a.sentence_count, 4);
        assert_eq!(a.subtitle_count, 1);
    }
}
