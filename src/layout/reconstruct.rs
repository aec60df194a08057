//! Per-page reconstruction pipeline.
//!
//! ```text
//! RawFragment[] -> Fragment[] -> Line[] -> ComposedLine[] -> Paragraph[] -> Block[]
//!   (validate)      group        compose    segment           split + classify
//! ```
//!
//! Every stage is pure and synchronous. A page never fails: malformed input
//! degrades to warnings and a best-effort [`Page`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Warning;
use crate::input::SourcePage;
use crate::model::{Block, Fragment, Page, RawFragment};

use super::classifier::{BlockClassifier, ClassifyContext, FontStatistics, HeuristicClassifier};
use super::lines::{compose_line, group_fragments_into_lines, sort_lines};
use super::options::LayoutOptions;
use super::paragraph::segment_paragraphs;
use super::sentence::SentenceSplitter;

/// A reconstructed page together with the warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    /// The reconstructed page
    pub page: Page,
    /// Non-fatal conditions, in the order they were encountered
    pub warnings: Vec<Warning>,
}

impl Reconstruction {
    /// Check if reconstruction raised no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Turns a page of positioned fragments into classified prose blocks.
#[derive(Clone)]
pub struct Reconstructor {
    options: LayoutOptions,
    splitter: SentenceSplitter,
    heuristic: HeuristicClassifier,
    classifier: Option<Arc<dyn BlockClassifier>>,
}

impl Reconstructor {
    /// Create a reconstructor with default options.
    pub fn new() -> Self {
        Self::with_options(LayoutOptions::default())
    }

    /// Create a reconstructor with custom options.
    pub fn with_options(options: LayoutOptions) -> Self {
        Self {
            heuristic: HeuristicClassifier::from_options(&options),
            splitter: SentenceSplitter::new(),
            classifier: None,
            options,
        }
    }

    /// Layer a custom classifier over the heuristic one.
    ///
    /// Whenever the custom classifier abstains, the heuristic decides.
    pub fn with_classifier(mut self, classifier: Arc<dyn BlockClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Get the options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Reconstruct a page as delivered by the decoding collaborator.
    pub fn reconstruct(&self, source: &SourcePage) -> Reconstruction {
        let (fragments, mut warnings) = validate_fragments(&source.fragments);
        let mut result = self.reconstruct_fragments(source.width, source.height, fragments);
        warnings.append(&mut result.warnings);
        result.warnings = warnings;
        result
    }

    /// Reconstruct a page from already validated fragments.
    ///
    /// Fragments are processed in the given order, which determines line
    /// discovery; callers should pass them in source order.
    pub fn reconstruct_fragments(
        &self,
        width: f32,
        height: f32,
        fragments: Vec<Fragment>,
    ) -> Reconstruction {
        let mut page = Page::new(width, height);
        let mut warnings = Vec::new();

        if fragments.is_empty() {
            log::warn!("Page has no usable fragments");
            warnings.push(Warning::EmptyInput);
            return Reconstruction { page, warnings };
        }

        let dominant_font_size = FontStatistics::from_fragments(&fragments).dominant_size();
        log::debug!(
            "Reconstructing {} fragments, dominant font size {:?}",
            fragments.len(),
            dominant_font_size
        );

        let mut lines = group_fragments_into_lines(fragments, self.options.line_threshold);
        sort_lines(&mut lines);
        let composed = lines
            .into_iter()
            .map(|line| compose_line(line, self.options.spacing_threshold))
            .collect();

        let mut paragraphs = segment_paragraphs(composed, self.options.paragraph_gap);
        let segmented = paragraphs.len();
        paragraphs.retain(|p| !p.is_blank());
        log::debug!(
            "Segmented {} paragraphs ({} whitespace-only dropped)",
            paragraphs.len(),
            segmented - paragraphs.len()
        );

        let paragraph_count = paragraphs.len();
        for (index, paragraph) in paragraphs.iter().enumerate() {
            let mut split = self.splitter.split(paragraph, index);
            warnings.append(&mut split.warnings);

            let context = ClassifyContext {
                index,
                paragraph_count,
                dominant_font_size,
                page_width: width,
                page_height: height,
            };
            let block_type = self
                .classifier
                .as_ref()
                .and_then(|c| c.classify(paragraph, &context))
                .unwrap_or_else(|| self.heuristic.block_type(paragraph, &context));

            page.add_block(Block::new(block_type, split.sentences));
        }

        Reconstruction { page, warnings }
    }
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Reconstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconstructor")
            .field("options", &self.options)
            .field("classifier", &self.classifier.as_ref().map(|c| c.name()))
            .finish()
    }
}

/// Validate raw fragments, keeping source order and skipping unusable ones.
fn validate_fragments(raw: &[RawFragment]) -> (Vec<Fragment>, Vec<Warning>) {
    let mut fragments = Vec::with_capacity(raw.len());
    let mut warnings = Vec::new();

    for (index, fragment) in raw.iter().enumerate() {
        match fragment.validate(index) {
            Ok(fragment) => fragments.push(fragment),
            Err(reason) => {
                log::warn!("Skipping fragment {}: {}", index, reason);
                warnings.push(Warning::MalformedFragment { index, reason });
            }
        }
    }

    (fragments, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Paragraph;
    use crate::model::{BlockType, Sentence};

    fn source(fragments: Vec<RawFragment>) -> SourcePage {
        SourcePage::new(600.0, 800.0, fragments)
    }

    #[test]
    fn test_empty_page_yields_no_blocks() {
        let result = Reconstructor::new().reconstruct(&source(Vec::new()));
        assert!(result.page.is_empty());
        assert_eq!(result.warnings, vec![Warning::EmptyInput]);
    }

    #[test]
    fn test_malformed_fragments_are_skipped() {
        let mut missing_y = RawFragment::new("ghost", 0.0, 0.0);
        missing_y.y = None;
        let result = Reconstructor::new().reconstruct(&source(vec![
            RawFragment::new("Kept.", 0.0, 0.0),
            missing_y,
        ]));

        assert_eq!(result.page.block_count(), 1);
        assert_eq!(
            result.warnings,
            vec![Warning::MalformedFragment {
                index: 1,
                reason: "missing y".to_string()
            }]
        );
    }

    #[test]
    fn test_only_malformed_fragments_is_empty_input() {
        let mut bad = RawFragment::new("x", 0.0, 0.0);
        bad.x = None;
        let result = Reconstructor::new().reconstruct(&source(vec![bad]));
        assert!(result.page.is_empty());
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[1], Warning::EmptyInput);
    }

    #[test]
    fn test_lines_are_read_top_to_bottom() {
        let result = Reconstructor::new().reconstruct(&source(vec![
            RawFragment::new("second.", 0.0, 1.0),
            RawFragment::new("First", 0.0, 0.0),
        ]));
        assert_eq!(result.page.blocks.len(), 1);
        assert_eq!(
            result.page.blocks[0].sentences,
            vec![vec![Sentence::from("First second.")]]
        );
    }

    #[test]
    fn test_blank_paragraph_is_dropped() {
        let result = Reconstructor::new().reconstruct(&source(vec![
            RawFragment::new("   ", 0.0, 0.0),
            RawFragment::new("Body.", 0.0, 20.0),
        ]));
        assert_eq!(result.page.block_count(), 1);
        assert_eq!(result.page.blocks[0].plain_text(), "Body.");
    }

    #[test]
    fn test_custom_classifier_falls_back_on_abstain() {
        struct SubtitleFirst;
        impl BlockClassifier for SubtitleFirst {
            fn name(&self) -> &str {
                "subtitle-first"
            }
            fn classify(&self, _: &Paragraph, ctx: &ClassifyContext) -> Option<BlockType> {
                (ctx.index == 0).then_some(BlockType::Subtitle)
            }
        }

        let reconstructor = Reconstructor::new().with_classifier(Arc::new(SubtitleFirst));
        let result = reconstructor.reconstruct(&source(vec![
            RawFragment::new("A", 0.0, 0.0).with_font_size(12.0),
            RawFragment::new("B", 0.0, 20.0).with_font_size(12.0),
        ]));

        let types: Vec<BlockType> = result.page.blocks.iter().map(|b| b.block_type).collect();
        assert_eq!(types, vec![BlockType::Subtitle, BlockType::Paragraph]);
        assert!(format!("{:?}", reconstructor).contains("subtitle-first"));
    }
}
