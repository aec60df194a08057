//! Input shapes delivered by the PDF-decoding collaborator.
//!
//! The normalized shape is a list of pages, each
//! `{ width, height, fragments: [{ text, x, y, fontSize, bold?, italic? }] }`.
//! `texts` is accepted in place of `fragments`. Raw pdf2json output is
//! handled by [`pdf2json`].

pub mod pdf2json;

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::RawFragment;

/// One page of positioned fragments, before reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePage {
    /// Page width
    pub width: f32,

    /// Page height
    pub height: f32,

    /// Fragments in source order
    #[serde(default, alias = "texts")]
    pub fragments: Vec<RawFragment>,
}

impl SourcePage {
    /// Create a page from its dimensions and fragments.
    pub fn new(width: f32, height: f32, fragments: Vec<RawFragment>) -> Self {
        Self {
            width,
            height,
            fragments,
        }
    }

    /// Number of fragments, including malformed ones.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }
}

/// A whole document of source pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Pages in document order
    pub pages: Vec<SourcePage>,
}

/// Accepts both `{ "pages": [...] }` and a bare page array.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentShape {
    Wrapped { pages: Vec<SourcePage> },
    Bare(Vec<SourcePage>),
}

impl SourceDocument {
    /// Create a document from pages.
    pub fn new(pages: Vec<SourcePage>) -> Self {
        Self { pages }
    }

    /// Decode a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let shape: DocumentShape =
            serde_json::from_str(json).map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(shape.into())
    }

    /// Decode a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let shape: DocumentShape =
            serde_json::from_reader(reader).map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(shape.into())
    }

    /// Decode a document from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl From<DocumentShape> for SourceDocument {
    fn from(shape: DocumentShape) -> Self {
        match shape {
            DocumentShape::Wrapped { pages } | DocumentShape::Bare(pages) => Self { pages },
        }
    }
}
