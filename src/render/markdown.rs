//! Markdown rendering of reconstructed pages.

use crate::error::Result;
use crate::model::{Block, BlockType, Page, Sentence, Span};

use super::{MarkdownOptions, ReconstructionStats, RenderResult};

/// Render pages as Markdown.
pub fn to_markdown(pages: &[Page], options: &MarkdownOptions) -> Result<String> {
    MarkdownRenderer::new(options.clone()).render(pages)
}

/// Render pages as Markdown together with statistics over the rendered pages.
pub fn to_markdown_with_stats(pages: &[Page], options: &MarkdownOptions) -> Result<RenderResult> {
    MarkdownRenderer::new(options.clone()).render_with_stats(pages)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: MarkdownOptions,
    stats: ReconstructionStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            stats: ReconstructionStats::new(),
        }
    }

    /// Render pages to Markdown.
    pub fn render(mut self, pages: &[Page]) -> Result<String> {
        Ok(self.render_internal(pages))
    }

    /// Render pages to Markdown with statistics.
    pub fn render_with_stats(mut self, pages: &[Page]) -> Result<RenderResult> {
        let content = self.render_internal(pages);
        Ok(RenderResult::new(content, self.stats))
    }

    fn render_internal(&mut self, pages: &[Page]) -> String {
        let mut output = String::new();
        let mut rendered = 0;

        for (index, page) in pages.iter().enumerate() {
            if !self.options.page_selection.includes(index + 1) {
                continue;
            }
            if rendered > 0 && self.options.page_separators {
                output.push_str("---\n\n");
            }
            self.stats.add_page(page);
            self.render_page(&mut output, page);
            rendered += 1;
        }

        output.trim().to_string()
    }

    fn render_page(&self, output: &mut String, page: &Page) {
        for block in &page.blocks {
            self.render_block(output, block);
        }
    }

    fn render_block(&self, output: &mut String, block: &Block) {
        let prefix = match block.block_type {
            BlockType::Title => "# ",
            BlockType::Subtitle => "## ",
            BlockType::Paragraph => "",
        };

        for paragraph in &block.sentences {
            let text = paragraph
                .iter()
                .map(|s| self.render_sentence(s))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if text.is_empty() {
                continue;
            }
            let text = if block.block_type == BlockType::Paragraph
                && self.options.escape_special_chars
            {
                escape_block_start(&text)
            } else {
                text
            };
            output.push_str(prefix);
            output.push_str(&text);
            output.push_str("\n\n");
        }
    }

    fn render_sentence(&self, sentence: &Sentence) -> String {
        match sentence {
            Sentence::Plain(text) => self.escape(text.trim()),
            Sentence::Styled(spans) => {
                let rendered: String = spans.iter().map(|span| self.render_span(span)).collect();
                rendered.trim().to_string()
            }
        }
    }

    fn render_span(&self, span: &Span) -> String {
        let text = self.escape(&span.text);
        let marker = match (span.bold, span.italic) {
            (true, true) => "***",
            (true, false) => "**",
            (false, true) => "*",
            (false, false) => return text,
        };
        wrap_emphasis(&text, marker)
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Wrap text in an emphasis marker, keeping edge whitespace outside it.
///
/// `** bold **` is not emphasis in CommonMark, `**bold**` is.
fn wrap_emphasis(text: &str, marker: &str) -> String {
    let inner = text.trim();
    if inner.is_empty() {
        return text.to_string();
    }
    let start = text.len() - text.trim_start().len();
    let end = start + inner.len();
    format!("{}{}{}{}{}", &text[..start], marker, inner, marker, &text[end..])
}

/// Escape characters that Markdown would read as inline syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Escape a leading marker that would turn a body line into a heading,
/// quote, list item or thematic break.
fn escape_block_start(text: &str) -> String {
    match text.chars().next() {
        Some('#' | '>' | '-' | '+' | '=') => format!("\\{}", text),
        Some(c) if c.is_ascii_digit() => {
            let digits = text.bytes().take_while(u8::is_ascii_digit).count();
            match text[digits..].chars().next() {
                Some('.' | ')') if digits <= 9 => {
                    format!("{}\\{}", &text[..digits], &text[digits..])
                }
                _ => text.to_string(),
            }
        }
        _ => text.to_string(),
    }
}
