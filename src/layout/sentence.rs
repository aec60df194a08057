//! Sentence segmentation over plain text and styled span runs.
//!
//! Boundaries come from a punctuation heuristic: a sentence is one or more
//! non-terminal characters followed by one or more of `.`, `!`, `?`. Text
//! outside any match (leading punctuation, a trailing fragment without a
//! terminator) stays attached to a neighbouring piece, so no character is
//! dropped except surrounding whitespace.

use std::ops::Range;

use regex::Regex;

use crate::error::Warning;
use crate::model::{push_span, Sentence, Span};

use super::paragraph::Paragraph;

/// Sentences of one paragraph plus any warnings raised while splitting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitResult {
    /// Sentences in reading order
    pub sentences: Vec<Sentence>,
    /// Non-fatal conditions encountered
    pub warnings: Vec<Warning>,
}

/// Punctuation-driven sentence splitter.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    boundary: Regex,
}

impl SentenceSplitter {
    /// Create a splitter with the default boundary pattern.
    pub fn new() -> Self {
        Self {
            boundary: Regex::new(r"[^.!?]+[.!?]+").unwrap(),
        }
    }

    /// Split a paragraph, using style-aware splitting when any run is bold or italic.
    ///
    /// `paragraph_index` is only used to label warnings.
    pub fn split(&self, paragraph: &Paragraph, paragraph_index: usize) -> SplitResult {
        if paragraph.has_styling() {
            self.split_spans(&paragraph.spans(), paragraph_index)
        } else {
            SplitResult {
                sentences: self.split_text(&paragraph.text()),
                warnings: Vec::new(),
            }
        }
    }

    /// Split plain text into trimmed sentences.
    ///
    /// Text without terminal punctuation yields exactly one sentence.
    pub fn split_text(&self, text: &str) -> Vec<Sentence> {
        self.pieces(text, &self.cuts(text))
            .into_iter()
            .map(|range| text[range].trim())
            .filter(|s| !s.is_empty())
            .map(Sentence::from)
            .collect()
    }

    /// Split styled runs, keeping each run's style on the pieces it is cut into.
    ///
    /// A boundary whose terminal punctuation spans runs of different styles is
    /// not used; the text on both sides stays one sentence and an
    /// [`Warning::AmbiguousStyleBoundary`] is recorded.
    pub fn split_spans(&self, spans: &[Span], paragraph_index: usize) -> SplitResult {
        let text: String = spans.iter().map(|s| s.text.as_str()).collect();
        let offsets = span_offsets(spans);

        let mut warnings = Vec::new();
        let mut cuts = Vec::new();
        for cut in self.cuts(&text) {
            let run = terminal_run(&text, cut);
            if style_changes_within(spans, &offsets, &run) {
                log::warn!(
                    "Ambiguous style boundary in paragraph {} at byte {}; keeping one sentence",
                    paragraph_index,
                    cut
                );
                warnings.push(Warning::AmbiguousStyleBoundary {
                    paragraph: paragraph_index,
                    offset: cut,
                });
                continue;
            }
            cuts.push(cut);
        }

        let sentences = self
            .pieces(&text, &cuts)
            .into_iter()
            .filter_map(|range| {
                let pieces = trim_spans(slice_spans(spans, &offsets, &range));
                if pieces.is_empty() {
                    None
                } else {
                    Some(Sentence::from_spans(pieces))
                }
            })
            .collect();

        SplitResult {
            sentences,
            warnings,
        }
    }

    /// Byte offsets just past each sentence terminator run.
    fn cuts(&self, text: &str) -> Vec<usize> {
        self.boundary.find_iter(text).map(|m| m.end()).collect()
    }

    /// Ranges covering all of `text`, cut at the given offsets.
    fn pieces(&self, text: &str, cuts: &[usize]) -> Vec<Range<usize>> {
        let mut ranges = Vec::with_capacity(cuts.len() + 1);
        let mut start = 0;
        for &cut in cuts {
            if cut > start {
                ranges.push(start..cut);
                start = cut;
            }
        }
        if start < text.len() {
            ranges.push(start..text.len());
        }
        ranges
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// The run of terminal punctuation ending at `cut`.
fn terminal_run(text: &str, cut: usize) -> Range<usize> {
    let start = text[..cut]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_terminal(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(cut);
    start..cut
}

/// Byte range of each span within the concatenated text.
fn span_offsets(spans: &[Span]) -> Vec<Range<usize>> {
    let mut offsets = Vec::with_capacity(spans.len());
    let mut start = 0;
    for span in spans {
        let end = start + span.text.len();
        offsets.push(start..end);
        start = end;
    }
    offsets
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Check whether runs of different styles share the byte range.
fn style_changes_within(spans: &[Span], offsets: &[Range<usize>], range: &Range<usize>) -> bool {
    let mut covering = spans
        .iter()
        .zip(offsets)
        .filter(|(_, offset)| overlaps(offset, range))
        .map(|(span, _)| span);

    match covering.next() {
        Some(first) => covering.any(|span| !span.same_style(first)),
        None => false,
    }
}

/// Cut the spans down to a byte range of their concatenated text.
fn slice_spans(spans: &[Span], offsets: &[Range<usize>], range: &Range<usize>) -> Vec<Span> {
    let mut sliced = Vec::new();
    for (span, offset) in spans.iter().zip(offsets) {
        if !overlaps(offset, range) {
            continue;
        }
        let start = range.start.max(offset.start) - offset.start;
        let end = range.end.min(offset.end) - offset.start;
        push_span(
            &mut sliced,
            Span::styled(&span.text[start..end], span.bold, span.italic),
        );
    }
    sliced
}

/// Trim leading and trailing whitespace across span edges.
fn trim_spans(mut spans: Vec<Span>) -> Vec<Span> {
    while let Some(first) = spans.first_mut() {
        let trimmed = first.text.trim_start();
        if trimmed.is_empty() {
            spans.remove(0);
        } else {
            first.text = trimmed.to_string();
            break;
        }
    }
    while let Some(last) = spans.last_mut() {
        let trimmed = last.text.trim_end();
        if trimmed.is_empty() {
            spans.pop();
        } else {
            last.text = trimmed.to_string();
            break;
        }
    }
    spans
}
