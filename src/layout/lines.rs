//! Line grouping and line composition.
//!
//! Fragments are clustered into lines by vertical position, then each line's
//! fragments are ordered left to right and joined with gap-driven spacing.

use std::cmp::Ordering;

use crate::model::{push_span, Fragment, Span};

/// Fragments sharing an approximate vertical position.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Anchor y: the y of the fragment that opened the line
    pub y: f32,
    /// Fragments in discovery order (not yet sorted by x)
    pub fragments: Vec<Fragment>,
}

impl Line {
    /// Open a new line anchored at a fragment.
    fn anchored(fragment: Fragment) -> Self {
        Self {
            y: fragment.y,
            fragments: vec![fragment],
        }
    }

    /// Check if a y coordinate falls within `threshold` of this line's anchor.
    pub fn accepts(&self, y: f32, threshold: f32) -> bool {
        (self.y - y).abs() < threshold
    }
}

/// A line joined into text, with its style runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedLine {
    /// Anchor y of the source line
    pub y: f32,
    /// Joined text, including inserted spaces
    pub text: String,
    /// Style runs; their concatenation equals `text`
    pub spans: Vec<Span>,
    /// Largest font size among the line's fragments
    pub max_font_size: Option<f32>,
}

impl ComposedLine {
    /// Check if any run in the line is bold or italic.
    pub fn has_styling(&self) -> bool {
        self.spans.iter().any(Span::has_styling)
    }
}

/// Group fragments into lines with greedy first-fit clustering.
///
/// Fragments are visited in input order; each joins the first existing line
/// whose anchor is within `threshold`, or opens a new line. Lines are returned
/// in discovery order and are never empty.
pub fn group_fragments_into_lines(fragments: Vec<Fragment>, threshold: f32) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();

    for fragment in fragments {
        match lines.iter_mut().find(|line| line.accepts(fragment.y, threshold)) {
            Some(line) => line.fragments.push(fragment),
            None => lines.push(Line::anchored(fragment)),
        }
    }

    lines
}

/// Sort lines top to bottom. Equal anchors keep discovery order.
pub fn sort_lines(lines: &mut [Line]) {
    lines.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal));
}

/// Join a line's fragments into a single string.
///
/// Fragments are ordered by x (stable for equal x). A single space is
/// inserted between neighbours whose x positions differ by more than
/// `spacing_threshold`; otherwise texts are concatenated directly. Fragment
/// text is never altered.
pub fn compose_line(line: Line, spacing_threshold: f32) -> ComposedLine {
    let Line { y, mut fragments } = line;
    fragments.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

    let mut text = String::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut max_font_size: Option<f32> = None;

    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            let prev = &fragments[i - 1];
            if fragment.x - prev.x > spacing_threshold {
                // The separator takes the style of the word it follows.
                text.push(' ');
                push_span(&mut spans, Span::styled(" ", prev.bold, prev.italic));
            }
        }

        text.push_str(&fragment.text);
        push_span(
            &mut spans,
            Span::styled(fragment.text.as_str(), fragment.bold, fragment.italic),
        );

        if let Some(size) = fragment.font_size {
            max_font_size = Some(max_font_size.map_or(size, |m| m.max(size)));
        }
    }

    ComposedLine {
        y,
        text,
        spans,
        max_font_size,
    }
}
