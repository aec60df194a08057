//! # readflow
//!
//! Deterministic reading-order reconstruction for PDF text.
//!
//! A PDF decoder hands over pages of positioned text fragments. This library
//! turns each page into classified prose blocks (titles, subtitles,
//! paragraphs), each split into sentences with bold/italic runs preserved,
//! ready for display or for speech synthesis one sentence at a time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use readflow::{reconstruct_file, render};
//!
//! fn main() -> readflow::Result<()> {
//!     let output = reconstruct_file("pages.json")?;
//!
//!     let text = render::to_text(&output.document.pages, &render::TextOptions::default())?;
//!     println!("{}", text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Line grouping**: fragments with nearly equal `y` share a line
//! - **Line composition**: fragments joined left to right, spaces inserted at gaps
//! - **Paragraph segmentation**: large vertical gaps start a new paragraph
//! - **Sentence splitting**: on terminal punctuation, style runs preserved
//! - **Classification**: font size against the page's dominant size
//!
//! Pages are independent; [`BatchProcessor`] runs them on a bounded rayon
//! pool and [`ReconstructionCache`] memoizes results by content digest.

pub mod batch;
pub mod cache;
pub mod error;
pub mod input;
pub mod layout;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use batch::{BatchOutput, BatchProcessor, PageWarning};
pub use cache::{CacheKey, ReconstructionCache};
pub use error::{Error, Result, Warning};
pub use input::{SourceDocument, SourcePage};
pub use layout::{
    BlockClassifier, ClassifyContext, HeuristicClassifier, LayoutOptions, Paragraph,
    Reconstruction, Reconstructor,
};
pub use model::{Block, BlockType, Document, Fragment, Page, RawFragment, Sentence, Span};
pub use render::{JsonFormat, MarkdownOptions, PageSelection, TextOptions};

use std::path::Path;
use std::sync::Arc;

/// Reconstruct a single page with default options.
///
/// # Example
///
/// ```
/// use readflow::{reconstruct_page, RawFragment, SourcePage};
///
/// let page = SourcePage::new(600.0, 800.0, vec![
///     RawFragment::new("Hello", 10.0, 40.0),
///     RawFragment::new("world.", 50.0, 40.0),
/// ]);
/// let result = reconstruct_page(&page);
/// assert_eq!(result.page.plain_text(), "Hello world.");
/// ```
pub fn reconstruct_page(page: &SourcePage) -> Reconstruction {
    Reconstructor::new().reconstruct(page)
}

/// Reconstruct every page of a document with default options.
pub fn reconstruct_document(source: &SourceDocument) -> Result<BatchOutput> {
    Readflow::new().reconstruct(source)
}

/// Reconstruct a document from normalized JSON text.
pub fn reconstruct_json(json: &str) -> Result<BatchOutput> {
    Readflow::new().reconstruct_json(json)
}

/// Reconstruct a document from a normalized JSON file.
///
/// # Example
///
/// ```no_run
/// use readflow::reconstruct_file;
///
/// let output = reconstruct_file("pages.json").unwrap();
/// println!("Pages: {}", output.document.page_count());
/// ```
pub fn reconstruct_file<P: AsRef<Path>>(path: P) -> Result<BatchOutput> {
    Readflow::new().reconstruct_file(path)
}

/// Convert a normalized JSON file to Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    Readflow::new().open(path)?.to_markdown()
}

/// Convert a normalized JSON file to sentence-per-line text.
pub fn to_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Readflow::new().open(path)?.to_text()
}

/// Convert a normalized JSON file to the reconstructed-page JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    Readflow::new().open(path)?.to_json(format)
}

/// Builder for reconstructing documents.
///
/// # Example
///
/// ```no_run
/// use readflow::Readflow;
///
/// let markdown = Readflow::new()
///     .with_paragraph_gap(3.0)
///     .with_concurrency(4)
///     .with_page_separators()
///     .open("pages.json")?
///     .to_markdown()?;
/// # Ok::<(), readflow::Error>(())
/// ```
pub struct Readflow {
    options: LayoutOptions,
    classifier: Option<Arc<dyn BlockClassifier>>,
    cache: Option<Arc<ReconstructionCache>>,
    pdf2json: bool,
    text_options: TextOptions,
    markdown_options: MarkdownOptions,
}

impl Readflow {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::with_options(LayoutOptions::default())
    }

    /// Create a builder around existing layout options.
    pub fn with_options(options: LayoutOptions) -> Self {
        Self {
            options,
            classifier: None,
            cache: None,
            pdf2json: false,
            text_options: TextOptions::default(),
            markdown_options: MarkdownOptions::default(),
        }
    }

    /// Set the same-line threshold.
    pub fn with_line_threshold(mut self, threshold: f32) -> Self {
        self.options = self.options.with_line_threshold(threshold);
        self
    }

    /// Set the paragraph gap.
    pub fn with_paragraph_gap(mut self, gap: f32) -> Self {
        self.options = self.options.with_paragraph_gap(gap);
        self
    }

    /// Set the spacing threshold.
    pub fn with_spacing_threshold(mut self, threshold: f32) -> Self {
        self.options = self.options.with_spacing_threshold(threshold);
        self
    }

    /// Set the number of pages reconstructed at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.options = self.options.with_concurrency(concurrency);
        self
    }

    /// Reconstruct pages one at a time.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Layer a custom classifier over the heuristic one.
    pub fn with_classifier(mut self, classifier: Arc<dyn BlockClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Memoize pages in a shared cache.
    pub fn with_cache(mut self, cache: Arc<ReconstructionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Read input as raw pdf2json output instead of the normalized shape.
    pub fn pdf2json(mut self) -> Self {
        self.pdf2json = true;
        self
    }

    /// Emit page headers in text output.
    pub fn with_page_headers(mut self) -> Self {
        self.text_options = self.text_options.with_page_headers(true);
        self
    }

    /// Emit `---` between pages in Markdown output.
    pub fn with_page_separators(mut self) -> Self {
        self.markdown_options = self.markdown_options.with_page_separators(true);
        self
    }

    /// Restrict text and Markdown output to some pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.text_options = self.text_options.with_pages(pages.clone());
        self.markdown_options = self.markdown_options.with_pages(pages);
        self
    }

    /// Get the layout options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Build the batch processor these settings describe.
    pub fn processor(&self) -> Result<BatchProcessor> {
        let mut reconstructor = Reconstructor::with_options(self.options.clone());
        if let Some(classifier) = &self.classifier {
            reconstructor = reconstructor.with_classifier(Arc::clone(classifier));
        }
        let processor = BatchProcessor::new(reconstructor)?;
        Ok(match &self.cache {
            Some(cache) => processor.with_cache(Arc::clone(cache)),
            None => processor,
        })
    }

    /// Reconstruct an already decoded document.
    pub fn reconstruct(&self, source: &SourceDocument) -> Result<BatchOutput> {
        Ok(self.processor()?.process_document(source))
    }

    /// Decode JSON text and reconstruct it.
    pub fn reconstruct_json(&self, json: &str) -> Result<BatchOutput> {
        let source = if self.pdf2json {
            input::pdf2json::from_json(json)?
        } else {
            SourceDocument::from_json(json)?
        };
        self.reconstruct(&source)
    }

    /// Decode a JSON file and reconstruct it.
    pub fn reconstruct_file<P: AsRef<Path>>(&self, path: P) -> Result<BatchOutput> {
        let source = if self.pdf2json {
            input::pdf2json::from_path(path)?
        } else {
            SourceDocument::from_path(path)?
        };
        self.reconstruct(&source)
    }

    /// Reconstruct a JSON file and keep the render settings for output.
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<ReadflowResult> {
        let output = self.reconstruct_file(path)?;
        Ok(self.into_result(output))
    }

    /// Reconstruct JSON text and keep the render settings for output.
    pub fn open_json(self, json: &str) -> Result<ReadflowResult> {
        let output = self.reconstruct_json(json)?;
        Ok(self.into_result(output))
    }

    fn into_result(self, output: BatchOutput) -> ReadflowResult {
        ReadflowResult {
            output,
            text_options: self.text_options,
            markdown_options: self.markdown_options,
        }
    }
}

impl Default for Readflow {
    fn default() -> Self {
        Self::new()
    }
}

/// A reconstructed document together with its render settings.
pub struct ReadflowResult {
    /// Pages and warnings
    pub output: BatchOutput,
    text_options: TextOptions,
    markdown_options: MarkdownOptions,
}

impl ReadflowResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.output.document.pages, &self.markdown_options)
    }

    /// Convert to sentence-per-line text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.output.document.pages, &self.text_options)
    }

    /// Convert to the reconstructed-page JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.output.document.pages, format)
    }

    /// Statistics over the reconstructed pages.
    pub fn stats(&self) -> render::ReconstructionStats {
        render::ReconstructionStats::from_pages(&self.output.document.pages)
    }

    /// Warnings raised while reconstructing.
    pub fn warnings(&self) -> &[PageWarning] {
        &self.output.warnings
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.output.document
    }
}
