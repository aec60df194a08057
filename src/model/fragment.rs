//! Positioned text fragments.

use serde::{Deserialize, Serialize};

/// A fragment as delivered by the PDF-decoding collaborator.
///
/// Positions are optional at this boundary: a fragment without a usable
/// `x`/`y` is skipped during validation instead of failing the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    /// Decoded text content
    pub text: String,

    /// Horizontal position
    #[serde(default)]
    pub x: Option<f32>,

    /// Vertical position (grows downward)
    #[serde(default)]
    pub y: Option<f32>,

    /// Font size, when the source reports one
    #[serde(default, rename = "fontSize")]
    pub font_size: Option<f32>,

    /// Bold style flag
    #[serde(default)]
    pub bold: bool,

    /// Italic style flag
    #[serde(default)]
    pub italic: bool,
}

impl RawFragment {
    /// Create a raw fragment with a position and no font information.
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x: Some(x),
            y: Some(y),
            font_size: None,
            bold: false,
            italic: false,
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Mark the fragment bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Mark the fragment italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Validate into a [`Fragment`], or explain why it cannot be used.
    ///
    /// `index` is the fragment's position in the page's raw list and becomes
    /// the fragment's ordering key.
    pub fn validate(&self, index: usize) -> std::result::Result<Fragment, String> {
        let x = match self.x {
            Some(x) if x.is_finite() => x,
            Some(_) => return Err("x is not a finite number".to_string()),
            None => return Err("missing x".to_string()),
        };
        let y = match self.y {
            Some(y) if y.is_finite() => y,
            Some(_) => return Err("y is not a finite number".to_string()),
            None => return Err("missing y".to_string()),
        };

        Ok(Fragment {
            index,
            text: self.text.clone(),
            x,
            y,
            font_size: self.font_size.filter(|s| s.is_finite() && *s > 0.0),
            bold: self.bold,
            italic: self.italic,
        })
    }
}

/// A validated fragment with a guaranteed finite position.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Position in the page's raw fragment list
    pub index: usize,
    /// The text content, never re-encoded
    pub text: String,
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
    /// Font size in source units
    pub font_size: Option<f32>,
    /// Whether the fragment is bold
    pub bold: bool,
    /// Whether the fragment is italic
    pub italic: bool,
}

impl Fragment {
    /// Create a plain fragment; handy for building pages in code.
    pub fn new(index: usize, text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            index,
            text: text.into(),
            x,
            y,
            font_size: None,
            bold: false,
            italic: false,
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the style flags.
    pub fn with_style(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }
}
