//! Paragraph segmentation.

use crate::model::{push_span, Span};

use super::lines::ComposedLine;

/// Consecutive lines separated by small vertical gaps.
///
/// A paragraph always holds at least one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Lines in reading order
    pub lines: Vec<ComposedLine>,
}

impl Paragraph {
    /// Start a paragraph with its first line.
    pub fn new(first: ComposedLine) -> Self {
        Self { lines: vec![first] }
    }

    /// Anchor y of the paragraph's first line.
    pub fn top(&self) -> f32 {
        self.lines.first().map(|l| l.y).unwrap_or(0.0)
    }

    /// Paragraph text: line texts joined by a single space.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Style runs of the whole paragraph; their concatenation equals [`Paragraph::text`].
    ///
    /// The space joining two lines takes the style of the preceding run.
    pub fn spans(&self) -> Vec<Span> {
        let mut spans: Vec<Span> = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                let (bold, italic) = spans
                    .last()
                    .map(|s| (s.bold, s.italic))
                    .unwrap_or((false, false));
                push_span(&mut spans, Span::styled(" ", bold, italic));
            }
            for span in &line.spans {
                push_span(&mut spans, span.clone());
            }
        }
        spans
    }

    /// Largest fragment font size in the paragraph.
    pub fn max_font_size(&self) -> Option<f32> {
        self.lines
            .iter()
            .filter_map(|l| l.max_font_size)
            .fold(None, |acc: Option<f32>, size| {
                Some(acc.map_or(size, |m| m.max(size)))
            })
    }

    /// Check if any run is bold or italic.
    pub fn has_styling(&self) -> bool {
        self.lines.iter().any(ComposedLine::has_styling)
    }

    /// Check if the paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.text.trim().is_empty())
    }
}

/// Group lines (sorted top to bottom) into paragraphs.
///
/// A new paragraph starts whenever the gap to the previous line exceeds
/// `paragraph_gap`. The trailing paragraph is always flushed.
pub fn segment_paragraphs(lines: Vec<ComposedLine>, paragraph_gap: f32) -> Vec<Paragraph> {
    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut current: Option<Paragraph> = None;
    let mut prev_y: Option<f32> = None;

    for line in lines {
        let line_y = line.y;
        current = match (current.take(), prev_y) {
            (Some(mut paragraph), Some(y)) if line_y - y <= paragraph_gap => {
                paragraph.lines.push(line);
                Some(paragraph)
            }
            (Some(paragraph), _) => {
                paragraphs.push(paragraph);
                Some(Paragraph::new(line))
            }
            (None, _) => Some(Paragraph::new(line)),
        };
        prev_y = Some(line_y);
    }

    // Don't forget the last paragraph
    if let Some(paragraph) = current {
        paragraphs.push(paragraph);
    }

    paragraphs
}
