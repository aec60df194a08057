//! Sentence and styled-span types.

use serde::{Deserialize, Serialize};

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,

    /// Bold text
    #[serde(default)]
    pub bold: bool,

    /// Italic text
    #[serde(default)]
    pub italic: bool,
}

impl Span {
    /// Create a new span with no styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    /// Create a span with explicit style flags.
    pub fn styled(text: impl Into<String>, bold: bool, italic: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
        }
    }

    /// Create a bold span.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(text, true, false)
    }

    /// Create an italic span.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::styled(text, false, true)
    }

    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic
    }

    /// Check if two spans carry the same style flags.
    pub fn same_style(&self, other: &Span) -> bool {
        self.bold == other.bold && self.italic == other.italic
    }

    /// Check if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Append a span, merging it into the previous one when the style matches.
///
/// Keeps span lists minimal without changing their concatenated text.
pub fn push_span(spans: &mut Vec<Span>, span: Span) {
    if span.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.same_style(&span) => last.text.push_str(&span.text),
        _ => spans.push(span),
    }
}

/// One sentence of a paragraph.
///
/// Serialized untagged: either a bare string, or an array of styled spans
/// whose concatenation is the sentence text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sentence {
    /// Unstyled sentence text
    Plain(String),

    /// Sentence with bold/italic runs
    Styled(Vec<Span>),
}

impl Sentence {
    /// Build a sentence from spans, collapsing to plain text when no span is styled.
    pub fn from_spans(spans: Vec<Span>) -> Self {
        if spans.iter().any(Span::has_styling) {
            Sentence::Styled(spans)
        } else {
            Sentence::Plain(spans.into_iter().map(|s| s.text).collect())
        }
    }

    /// Get the plain text of the sentence (what a speech engine reads).
    pub fn plain_text(&self) -> String {
        match self {
            Sentence::Plain(text) => text.clone(),
            Sentence::Styled(spans) => spans.iter().map(|s| s.text.as_str()).collect(),
        }
    }

    /// Check if the sentence carries style spans.
    pub fn is_styled(&self) -> bool {
        matches!(self, Sentence::Styled(_))
    }

    /// Check if the sentence has no text.
    pub fn is_empty(&self) -> bool {
        match self {
            Sentence::Plain(text) => text.is_empty(),
            Sentence::Styled(spans) => spans.iter().all(Span::is_empty),
        }
    }
}

impl From<&str> for Sentence {
    fn from(text: &str) -> Self {
        Sentence::Plain(text.to_string())
    }
}

impl From<String> for Sentence {
    fn from(text: String) -> Self {
        Sentence::Plain(text)
    }
}
