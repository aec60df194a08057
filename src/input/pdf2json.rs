//! Decoder for raw pdf2json output.
//!
//! pdf2json emits `{ "Pages": [{ "Width", "Height", "Texts": [...] }] }` where
//! each text carries its position and a list of runs `R`. A run's `T` is
//! percent-encoded and `TS` is `[fontFaceId, fontSize, bold, italic]`.

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::RawFragment;

use super::{SourceDocument, SourcePage};

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "Pages", default)]
    pages: Vec<RawPage>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(rename = "Width", default)]
    width: f32,
    #[serde(rename = "Height", default)]
    height: f32,
    #[serde(rename = "Texts", default)]
    texts: Vec<RawText>,
}

#[derive(Debug, Deserialize)]
struct RawText {
    #[serde(default)]
    x: Option<f32>,
    #[serde(default)]
    y: Option<f32>,
    #[serde(rename = "R", default)]
    runs: Vec<RawRun>,
}

#[derive(Debug, Deserialize)]
struct RawRun {
    #[serde(rename = "T", default)]
    text: String,
    #[serde(rename = "TS", default)]
    style: Vec<f32>,
}

/// Decode pdf2json JSON into a [`SourceDocument`].
pub fn from_json(json: &str) -> Result<SourceDocument> {
    let raw: RawDocument =
        serde_json::from_str(json).map_err(|e| Error::InvalidInput(e.to_string()))?;
    Ok(convert(raw))
}

/// Decode pdf2json JSON from a reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SourceDocument> {
    let raw: RawDocument =
        serde_json::from_reader(reader).map_err(|e| Error::InvalidInput(e.to_string()))?;
    Ok(convert(raw))
}

/// Decode a pdf2json JSON file.
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SourceDocument> {
    let file = std::fs::File::open(path)?;
    from_reader(std::io::BufReader::new(file))
}

fn convert(raw: RawDocument) -> SourceDocument {
    let pages = raw
        .pages
        .into_iter()
        .map(|page| {
            let fragments = page.texts.into_iter().map(convert_text).collect();
            SourcePage::new(page.width, page.height, fragments)
        })
        .collect();
    SourceDocument::new(pages)
}

fn convert_text(text: RawText) -> RawFragment {
    let decoded: String = text.runs.iter().map(|run| decode_text(&run.text)).collect();
    let style = text.runs.first().map(|run| run.style.as_slice()).unwrap_or(&[]);

    RawFragment {
        text: decoded,
        x: text.x,
        y: text.y,
        font_size: style.get(1).copied().filter(|s| *s > 0.0),
        bold: style.get(2).is_some_and(|flag| *flag != 0.0),
        italic: style.get(3).is_some_and(|flag| *flag != 0.0),
    }
}

/// Percent-decode run text, keeping the raw text when it is not valid UTF-8.
fn decode_text(encoded: &str) -> Cow<'_, str> {
    match urlencoding::decode(encoded) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("Keeping undecodable text {:?}: {}", encoded, e);
            Cow::Borrowed(encoded)
        }
    }
}
