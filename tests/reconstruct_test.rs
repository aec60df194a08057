//! Integration tests for page reconstruction.

use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;

use readflow::layout::{
    compose_line, group_fragments_into_lines, segment_paragraphs, sort_lines, SentenceSplitter,
};
use readflow::{
    input, BlockClassifier, BlockType, ClassifyContext, Error, Fragment, HeuristicClassifier,
    LayoutOptions, Paragraph, RawFragment, Reconstructor, Sentence, SourceDocument, SourcePage,
    Span, Warning,
};

fn page(fragments: Vec<RawFragment>) -> SourcePage {
    SourcePage::new(600.0, 800.0, fragments)
}

fn line_at(y: f32, text: &str) -> Vec<Fragment> {
    vec![Fragment::new(0, text, 0.0, y)]
}

// ==================== Line Grouping ====================

#[test]
fn test_close_fragments_share_a_line() {
    let fragments = vec![
        Fragment::new(0, "a", 0.0, 10.0),
        Fragment::new(1, "b", 5.0, 10.3),
        Fragment::new(2, "c", 10.0, 10.4),
        Fragment::new(3, "d", 0.0, 12.0),
    ];
    let lines = group_fragments_into_lines(fragments, 0.5);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].fragments.len(), 3);
    assert_eq!(lines[1].y, 12.0);
}

#[test]
fn test_outlier_forms_its_own_line() {
    let fragments = vec![
        Fragment::new(0, "a", 0.0, 10.0),
        Fragment::new(1, "lonely", 0.0, 50.0),
        Fragment::new(2, "b", 5.0, 10.1),
    ];
    let lines = group_fragments_into_lines(fragments, 0.5);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].fragments.len(), 1);
    assert_eq!(lines[1].fragments[0].text, "lonely");
}

#[test]
fn test_grouping_is_first_fit_from_anchor() {
    // 10.4 is within 0.5 of the first anchor, 10.8 is not, even though it is
    // within 0.5 of 10.4.
    let fragments = vec![
        Fragment::new(0, "a", 0.0, 10.0),
        Fragment::new(1, "b", 1.0, 10.4),
        Fragment::new(2, "c", 2.0, 10.8),
    ];
    let lines = group_fragments_into_lines(fragments, 0.5);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].y, 10.8);
}

// ==================== Line Composition ====================

#[test]
fn test_spacing_threshold() {
    let mut lines = group_fragments_into_lines(
        vec![
            Fragment::new(0, "World", 3.0, 0.0),
            Fragment::new(1, "Hello", 0.0, 0.0),
        ],
        0.5,
    );
    assert_eq!(compose_line(lines.remove(0), 1.5).text, "Hello World");

    let mut lines = group_fragments_into_lines(
        vec![
            Fragment::new(0, "Hello", 0.0, 0.0),
            Fragment::new(1, "World", 0.5, 0.0),
        ],
        0.5,
    );
    assert_eq!(compose_line(lines.remove(0), 1.5).text, "HelloWorld");
}

#[test]
fn test_equal_x_keeps_source_order() {
    let mut lines = group_fragments_into_lines(
        vec![
            Fragment::new(0, "first", 4.0, 0.0),
            Fragment::new(1, "second", 4.0, 0.1),
        ],
        0.5,
    );
    assert_eq!(compose_line(lines.remove(0), 1.5).text, "firstsecond");
}

// ==================== Paragraph Segmentation ====================

#[test]
fn test_paragraph_split_and_trailing_flush() {
    let fragments: Vec<Fragment> = [0.0, 1.0, 2.0, 10.0]
        .iter()
        .flat_map(|&y| line_at(y, "x"))
        .collect();
    let mut lines = group_fragments_into_lines(fragments, 0.5);
    sort_lines(&mut lines);
    let composed = lines.into_iter().map(|l| compose_line(l, 1.5)).collect();

    let paragraphs = segment_paragraphs(composed, 2.0);
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].lines.len(), 3);
    assert_eq!(paragraphs[1].lines.len(), 1);
}

// ==================== Sentence Splitting ====================

#[test]
fn test_sentence_split_total() {
    let splitter = SentenceSplitter::new();
    assert_eq!(
        splitter.split_text("Hello world"),
        vec![Sentence::from("Hello world")]
    );
    assert_eq!(
        splitter.split_text("Hi. Bye!"),
        vec![Sentence::from("Hi."), Sentence::from("Bye!")]
    );
}

#[test]
fn test_styled_sentences_keep_their_runs() {
    let result = Reconstructor::new().reconstruct(&page(vec![
        RawFragment::new("Plain", 0.0, 0.0),
        RawFragment::new("start.", 10.0, 0.0),
        RawFragment::new("Bold", 20.0, 0.0).bold(),
        RawFragment::new("finish.", 30.0, 0.0),
    ]));

    assert!(result.is_clean());
    assert_eq!(
        result.page.blocks[0].sentences[0],
        vec![
            Sentence::from("Plain start."),
            Sentence::Styled(vec![Span::bold("Bold "), Span::new("finish.")]),
        ]
    );
}

#[test]
fn test_ambiguous_style_boundary_keeps_one_sentence() {
    // The terminator run "?!" is split across an italic and a plain fragment.
    let result = Reconstructor::new().reconstruct(&page(vec![
        RawFragment::new("Really?", 0.0, 0.0).italic(),
        RawFragment::new("!", 0.5, 0.0),
        RawFragment::new("Yes.", 10.0, 0.0),
    ]));

    assert_eq!(
        result.warnings,
        vec![Warning::AmbiguousStyleBoundary {
            paragraph: 0,
            offset: 8
        }]
    );
    assert_eq!(result.page.blocks[0].sentence_count(), 1);
    assert_eq!(result.page.plain_text(), "Really?! Yes.");
}

// ==================== Classification ====================

#[test]
fn test_classification_by_font_size() {
    let result = Reconstructor::new().reconstruct(&page(vec![
        RawFragment::new("Big", 0.0, 0.0).with_font_size(20.0),
        RawFragment::new("Medium", 0.0, 20.0).with_font_size(14.0),
        RawFragment::new("Body one.", 0.0, 40.0).with_font_size(12.0),
        RawFragment::new("Body two.", 0.0, 41.0).with_font_size(12.0),
        RawFragment::new("Body three.", 0.0, 42.0).with_font_size(12.0),
    ]));

    let types: Vec<BlockType> = result.page.blocks.iter().map(|b| b.block_type).collect();
    assert_eq!(
        types,
        vec![BlockType::Title, BlockType::Subtitle, BlockType::Paragraph]
    );
}

#[test]
fn test_large_text_below_top_n_is_subtitle() {
    let options = LayoutOptions::new().with_title_top_n(1);
    let result = Reconstructor::with_options(options).reconstruct(&page(vec![
        RawFragment::new("Body.", 0.0, 0.0).with_font_size(10.0),
        RawFragment::new("Body.", 0.0, 1.0).with_font_size(10.0),
        RawFragment::new("Late heading", 0.0, 20.0).with_font_size(20.0),
    ]));

    assert_eq!(result.page.blocks[1].block_type, BlockType::Subtitle);
}

#[test]
fn test_dominant_size_text_is_paragraph() {
    let result = Reconstructor::new().reconstruct(&page(vec![
        RawFragment::new("Only size.", 0.0, 0.0).with_font_size(12.0),
        RawFragment::new("Same size.", 0.0, 20.0).with_font_size(12.0),
    ]));
    assert!(result
        .page
        .blocks
        .iter()
        .all(|b| b.block_type == BlockType::Paragraph));
}

#[test]
fn test_unrounded_body_size_is_paragraph_at_low_ratios() {
    let options = LayoutOptions::new()
        .with_title_ratio(0.5)
        .with_subtitle_ratio(0.5);
    let result = Reconstructor::with_options(options).reconstruct(&page(vec![
        RawFragment::new("Only size.", 0.0, 0.0).with_font_size(12.04),
        RawFragment::new("Same size.", 0.0, 20.0).with_font_size(12.04),
    ]));
    let types: Vec<BlockType> = result.page.blocks.iter().map(|b| b.block_type).collect();
    assert_eq!(types, vec![BlockType::Paragraph, BlockType::Paragraph]);
}

#[test]
fn test_custom_classifier_layers_over_heuristic() {
    struct ShoutingIsTitle;
    impl BlockClassifier for ShoutingIsTitle {
        fn name(&self) -> &str {
            "shouting"
        }
        fn classify(&self, paragraph: &Paragraph, _: &ClassifyContext) -> Option<BlockType> {
            let text = paragraph.text();
            (text.chars().any(char::is_alphabetic) && text == text.to_uppercase())
                .then_some(BlockType::Title)
        }
    }

    let reconstructor = Reconstructor::new().with_classifier(Arc::new(ShoutingIsTitle));
    let result = reconstructor.reconstruct(&page(vec![
        RawFragment::new("INTRODUCTION", 0.0, 0.0),
        RawFragment::new("Some text.", 0.0, 20.0),
    ]));

    assert_eq!(result.page.blocks[0].block_type, BlockType::Title);
    assert_eq!(result.page.blocks[1].block_type, BlockType::Paragraph);
    assert_eq!(HeuristicClassifier::default().name(), "heuristic");
}

// ==================== End to End ====================

#[test]
fn test_end_to_end_scenario() {
    let result = Reconstructor::new().reconstruct(&page(vec![
        RawFragment::new("T", 10.0, 10.0).with_font_size(24.0),
        RawFragment::new("Hello", 10.0, 40.0).with_font_size(12.0),
        RawFragment::new("world.", 50.0, 40.0).with_font_size(12.0),
    ]));

    let blocks: Vec<String> = result
        .page
        .blocks
        .iter()
        .map(|b| serde_json::to_string(b).unwrap())
        .collect();
    assert_eq!(
        blocks,
        vec![
            r#"{"type":"title","sentences":[["T"]]}"#,
            r#"{"type":"paragraph","sentences":[["Hello world."]]}"#,
        ]
    );
}

#[test]
fn test_determinism() {
    let source = page(vec![
        RawFragment::new("Zeta", 40.0, 5.2).with_font_size(11.0),
        RawFragment::new("alpha.", 2.0, 5.0).italic(),
        RawFragment::new("Heading", 0.0, 0.0).with_font_size(18.0),
        RawFragment::new("More text here! And more?", 0.0, 7.0),
    ]);
    let reconstructor = Reconstructor::new();

    let first = serde_json::to_string(&reconstructor.reconstruct(&source)).unwrap();
    for _ in 0..5 {
        let again = serde_json::to_string(&reconstructor.reconstruct(&source)).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_completeness() {
    let texts = [
        "Once", "upon", "a", "time,", "there", "was", "text.", "Was", "it", "kept?", "Yes!",
        "trailing",
    ];
    let fragments: Vec<RawFragment> = texts
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let fragment = RawFragment::new(*t, (i % 4) as f32 * 10.0, (i / 4) as f32 * 5.0);
            if i % 3 == 0 {
                fragment.bold()
            } else {
                fragment
            }
        })
        .collect();

    let result = Reconstructor::new().reconstruct(&page(fragments));

    let input_chars: BTreeSet<char> = texts.iter().flat_map(|t| t.chars()).collect();
    let output_chars: BTreeSet<char> = result
        .page
        .blocks
        .iter()
        .flat_map(|b| b.iter_sentences())
        .flat_map(|s| s.plain_text().chars().collect::<Vec<_>>())
        .filter(|c| !c.is_whitespace())
        .collect();
    assert_eq!(input_chars, output_chars);
}

// ==================== Input Boundary ====================

#[test]
fn test_malformed_fragments_yield_warnings_not_errors() {
    let doc = SourceDocument::from_json(
        r#"[{"width":600,"height":800,"fragments":[
            {"text":"Good.","x":0,"y":0},
            {"text":"No y","x":0},
            {"text":"Also good.","x":0,"y":1}
        ]}]"#,
    )
    .unwrap();

    let result = Reconstructor::new().reconstruct(&doc.pages[0]);
    assert_eq!(result.page.plain_text(), "Good. Also good.");
    assert_eq!(
        result.warnings,
        vec![Warning::MalformedFragment {
            index: 1,
            reason: "missing y".to_string()
        }]
    );
}

#[test]
fn test_wrong_shape_is_rejected() {
    let result = SourceDocument::from_json(r#"{"pages":[{"width":"wide"}]}"#);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_read_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"pages":[{{"width":10,"height":10,"texts":[{{"text":"From disk.","x":1,"y":1}}]}}]}}"#
    )
    .unwrap();

    let doc = SourceDocument::from_path(file.path()).unwrap();
    let result = Reconstructor::new().reconstruct(&doc.pages[0]);
    assert_eq!(result.page.plain_text(), "From disk.");
}

#[test]
fn test_pdf2json_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"Pages":[{{"Width":10,"Height":10,"Texts":[{{"x":1,"y":1,"R":[{{"T":"Caf%C3%A9%20open.","TS":[0,12,0,1]}}]}}]}}]}}"#
    )
    .unwrap();

    let doc = input::pdf2json::from_path(file.path()).unwrap();
    let result = Reconstructor::new().reconstruct(&doc.pages[0]);
    assert_eq!(
        result.page.blocks[0].sentences[0],
        vec![Sentence::Styled(vec![Span::italic("Café open.")])]
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let result = SourceDocument::from_path("/nonexistent/readflow/pages.json");
    assert!(matches!(result, Err(Error::Io(_))));
}
