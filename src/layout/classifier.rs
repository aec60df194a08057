//! Block classification by font size and position.

use std::collections::BTreeMap;

use crate::model::{BlockType, Fragment};

use super::options::LayoutOptions;
use super::paragraph::Paragraph;

/// Font size statistics for a page.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Observed font sizes (tenths of a unit) with frequency
    pub size_histogram: BTreeMap<i32, usize>,
}

impl FontStatistics {
    /// Collect statistics from a page's fragments.
    pub fn from_fragments(fragments: &[Fragment]) -> Self {
        let mut stats = Self::default();
        for size in fragments.iter().filter_map(|f| f.font_size) {
            stats.add_size(size);
        }
        stats
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        *self.size_histogram.entry(size_key(size)).or_insert(0) += 1;
    }

    /// Most common font size; ties resolve to the smaller size.
    pub fn dominant_size(&self) -> Option<f32> {
        let mut best: Option<(i32, usize)> = None;
        for (&key, &count) in &self.size_histogram {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((key, count));
            }
        }
        best.map(|(key, _)| key_size(key))
    }

    /// Number of observations.
    pub fn sample_count(&self) -> usize {
        self.size_histogram.values().sum()
    }
}

/// Histogram key of a font size, rounded to 0.1 precision.
fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

fn key_size(key: i32) -> f32 {
    key as f32 / 10.0
}

/// Round a font size to the precision of [`FontStatistics`].
fn round_font_size(size: f32) -> f32 {
    key_size(size_key(size))
}

/// Page-level facts a classifier may consult.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyContext {
    /// Position of the paragraph on the page (0 = topmost)
    pub index: usize,
    /// Number of paragraphs on the page
    pub paragraph_count: usize,
    /// Dominant font size across the page's fragments
    pub dominant_font_size: Option<f32>,
    /// Page width
    pub page_width: f32,
    /// Page height
    pub page_height: f32,
}

/// Strategy for assigning a semantic role to a paragraph.
///
/// Returning `None` abstains; the reconstructor then falls back to the
/// [`HeuristicClassifier`], so every paragraph still gets exactly one role.
pub trait BlockClassifier: Send + Sync {
    /// Get the name of this classifier.
    fn name(&self) -> &str;

    /// Classify one paragraph.
    fn classify(&self, paragraph: &Paragraph, context: &ClassifyContext) -> Option<BlockType>;
}

/// Deterministic classifier comparing a paragraph's largest font size
/// with the page's dominant size.
///
/// - `title`: at least `title_ratio` × dominant and among the first `title_top_n` paragraphs
/// - `subtitle`: at least `subtitle_ratio` × dominant
/// - `paragraph`: everything else, including pages without font sizes
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicClassifier {
    title_ratio: f32,
    subtitle_ratio: f32,
    title_top_n: usize,
}

impl HeuristicClassifier {
    /// Create a classifier with explicit thresholds.
    pub fn new(title_ratio: f32, subtitle_ratio: f32, title_top_n: usize) -> Self {
        Self {
            title_ratio,
            subtitle_ratio,
            title_top_n,
        }
    }

    /// Create a classifier from layout options.
    pub fn from_options(options: &LayoutOptions) -> Self {
        Self::new(
            options.title_size_ratio,
            options.subtitle_size_ratio,
            options.title_top_n,
        )
    }

    /// Classify by font size and position. Total: always returns a role.
    pub fn block_type(&self, paragraph: &Paragraph, context: &ClassifyContext) -> BlockType {
        let (Some(size), Some(dominant)) = (paragraph.max_font_size(), context.dominant_font_size)
        else {
            return BlockType::Paragraph;
        };
        // Same precision as the dominant size
        let size = round_font_size(size);

        // Never promote text that is not strictly larger than body text
        if size <= dominant {
            return BlockType::Paragraph;
        }

        if size >= dominant * self.title_ratio && context.index < self.title_top_n {
            BlockType::Title
        } else if size >= dominant * self.subtitle_ratio {
            BlockType::Subtitle
        } else {
            BlockType::Paragraph
        }
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::from_options(&LayoutOptions::default())
    }
}

impl BlockClassifier for HeuristicClassifier {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn classify(&self, paragraph: &Paragraph, context: &ClassifyContext) -> Option<BlockType> {
        Some(self.block_type(paragraph, context))
    }
}
