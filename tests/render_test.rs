//! Integration tests for rendering reconstructed pages.

use std::io::Write;

use readflow::render::{
    to_json, to_markdown, to_markdown_with_stats, to_text, ReconstructionStats,
};
use readflow::{
    reconstruct_json, Document, JsonFormat, MarkdownOptions, Page, PageSelection, Readflow,
    TextOptions,
};

const TWO_PAGES: &str = r#"{"pages": [
    {"width": 600, "height": 800, "fragments": [
        {"text": "A Short Story", "x": 50, "y": 40, "fontSize": 28},
        {"text": "Part one", "x": 50, "y": 80, "fontSize": 16},
        {"text": "It was a", "x": 50, "y": 120, "fontSize": 12},
        {"text": "dark", "x": 110, "y": 120, "fontSize": 12, "bold": true},
        {"text": "night. The wind", "x": 150, "y": 120, "fontSize": 12},
        {"text": "howled!", "x": 50, "y": 121.5, "fontSize": 12},
        {"text": "Nobody slept", "x": 50, "y": 160, "fontSize": 12}
    ]},
    {"width": 600, "height": 800, "texts": [
        {"text": "The end.", "x": 50, "y": 40, "fontSize": 12, "italic": true}
    ]}
]}"#;

fn pages() -> Vec<Page> {
    reconstruct_json(TWO_PAGES).unwrap().document.pages
}

#[test]
fn test_text_is_one_sentence_per_line() {
    let text = to_text(&pages(), &TextOptions::default()).unwrap();
    assert_eq!(
        text,
        "A Short Story\n\n\
         Part one\n\n\
         It was a dark night.\nThe wind howled!\n\n\
         Nobody slept\n\n\
         The end."
    );
}

#[test]
fn test_markdown_headings_and_emphasis() {
    let md = to_markdown(&pages(), &MarkdownOptions::new().with_page_separators(true)).unwrap();
    assert_eq!(
        md,
        "# A Short Story\n\n\
         ## Part one\n\n\
         It was a **dark** night. The wind howled!\n\n\
         Nobody slept\n\n\
         ---\n\n\
         *The end.*"
    );
}

#[test]
fn test_markdown_page_selection() {
    let options = MarkdownOptions::new().with_pages(PageSelection::parse("2").unwrap());
    let md = to_markdown(&pages(), &options).unwrap();
    assert_eq!(md, "*The end.*");
}

#[test]
fn test_json_matches_document_serialization() {
    let pages = pages();
    let json = to_json(&pages, JsonFormat::Compact).unwrap();
    let document = Document::from_pages(pages);
    assert_eq!(json, serde_json::to_string(&document).unwrap());
    assert!(json.contains(r#"{"text":"dark ","bold":true,"italic":false}"#));
}

#[test]
fn test_stats_agree_across_renderers() {
    let pages = pages();
    let stats = ReconstructionStats::from_pages(&pages);
    let rendered = to_markdown_with_stats(&pages, &MarkdownOptions::default()).unwrap();

    assert_eq!(stats, rendered.stats);
    assert_eq!(stats.page_count, 2);
    assert_eq!(stats.title_count, 1);
    assert_eq!(stats.subtitle_count, 1);
    assert_eq!(stats.paragraph_count, 3);
    assert_eq!(stats.sentence_count, 6);
    assert_eq!(stats.styled_sentence_count, 2);
}

#[test]
fn test_builder_renders_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TWO_PAGES.as_bytes()).unwrap();

    let result = Readflow::new()
        .sequential()
        .with_pages(PageSelection::Range(1..=1))
        .open(file.path())
        .unwrap();

    let text = result.to_text().unwrap();
    assert!(text.starts_with("A Short Story"));
    assert!(!text.contains("The end."));
    assert_eq!(result.document().page_count(), 2);
}
