//! Layout options and configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Thresholds and ratios driving reconstruction.
///
/// All distances are in the same units as fragment coordinates. Field names
/// (de)serialize in camelCase (`lineThreshold`, `paragraphGap`, ...); missing
/// keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Max vertical distance from a line's anchor for same-line grouping
    pub line_threshold: f32,

    /// Max vertical gap between consecutive lines of one paragraph
    pub paragraph_gap: f32,

    /// Min horizontal gap between fragments to insert a space
    pub spacing_threshold: f32,

    /// Font size multiplier over the dominant size for titles
    pub title_size_ratio: f32,

    /// Font size multiplier over the dominant size for subtitles
    pub subtitle_size_ratio: f32,

    /// Only the first N paragraphs of a page may be titles
    #[serde(rename = "titleTopN")]
    pub title_top_n: usize,

    /// Pages reconstructed concurrently by the batch processor
    pub batch_concurrency: usize,
}

impl LayoutOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("JSON options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set the same-line threshold.
    pub fn with_line_threshold(mut self, threshold: f32) -> Self {
        self.line_threshold = threshold;
        self
    }

    /// Set the paragraph gap.
    pub fn with_paragraph_gap(mut self, gap: f32) -> Self {
        self.paragraph_gap = gap;
        self
    }

    /// Set the spacing threshold.
    pub fn with_spacing_threshold(mut self, threshold: f32) -> Self {
        self.spacing_threshold = threshold;
        self
    }

    /// Set the title size ratio.
    pub fn with_title_ratio(mut self, ratio: f32) -> Self {
        self.title_size_ratio = ratio;
        self
    }

    /// Set the subtitle size ratio.
    pub fn with_subtitle_ratio(mut self, ratio: f32) -> Self {
        self.subtitle_size_ratio = ratio;
        self
    }

    /// Set how many leading paragraphs may be titles.
    pub fn with_title_top_n(mut self, n: usize) -> Self {
        self.title_top_n = n;
        self
    }

    /// Set the batch concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency;
        self
    }

    /// Process pages one at a time.
    pub fn sequential(mut self) -> Self {
        self.batch_concurrency = 1;
        self
    }

    /// Check that every option is in range.
    pub fn validate(&self) -> Result<()> {
        let distances = [
            ("lineThreshold", self.line_threshold),
            ("paragraphGap", self.paragraph_gap),
            ("spacingThreshold", self.spacing_threshold),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let ratios = [
            ("titleSizeRatio", self.title_size_ratio),
            ("subtitleSizeRatio", self.subtitle_size_ratio),
        ];
        for (name, value) in ratios {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.batch_concurrency == 0 {
            return Err(Error::InvalidConfig(
                "batchConcurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_threshold: 0.5,
            paragraph_gap: 2.0,
            spacing_threshold: 1.5,
            title_size_ratio: 1.4,
            subtitle_size_ratio: 1.15,
            title_top_n: 2,
            batch_concurrency: 2,
        }
    }
}
