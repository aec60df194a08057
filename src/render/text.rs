//! Plain text rendering, one sentence per line.
//!
//! This is the feed for speech synthesis: the reader speaks one line at a
//! time. Blocks and source paragraphs are separated by a blank line.

use crate::error::Result;
use crate::model::Page;

use super::TextOptions;

/// Render pages as plain text.
pub fn to_text(pages: &[Page], options: &TextOptions) -> Result<String> {
    let mut sections: Vec<String> = Vec::new();

    for (index, page) in pages.iter().enumerate() {
        let number = index + 1;
        if !options.page_selection.includes(number) {
            continue;
        }

        if options.page_headers {
            sections.push(format!("--- Page {} ---", number));
        }

        for block in &page.blocks {
            for paragraph in &block.sentences {
                let lines: Vec<String> = paragraph
                    .iter()
                    .map(|s| s.plain_text().trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if !lines.is_empty() {
                    sections.push(lines.join("\n"));
                }
            }
        }
    }

    Ok(sections.join("\n\n"))
}
