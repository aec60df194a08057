//! Rendering reconstructed pages to output formats.

mod json;
mod markdown;
mod options;
mod result;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{MarkdownOptions, PageSelection, TextOptions};
pub use result::{ReconstructionStats, RenderResult};
pub use text::to_text;
