//! Rendering options.

use std::ops::RangeInclusive;

/// Options for the plain-text (speech) renderer.
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Emit a `--- Page N ---` line before each page
    pub page_headers: bool,

    /// Pages to render
    pub page_selection: PageSelection,
}

impl TextOptions {
    /// Create new text options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable page headers.
    pub fn with_page_headers(mut self, enabled: bool) -> Self {
        self.page_headers = enabled;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }
}

/// Options for the Markdown renderer.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Insert a `---` rule between pages
    pub page_separators: bool,

    /// Escape characters Markdown would interpret
    pub escape_special_chars: bool,

    /// Pages to render
    pub page_selection: PageSelection,
}

impl MarkdownOptions {
    /// Create new Markdown options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable page separators.
    pub fn with_page_separators(mut self, enabled: bool) -> Self {
        self.page_separators = enabled;
        self
    }

    /// Enable or disable escaping.
    pub fn with_escaping(mut self, enabled: bool) -> Self {
        self.escape_special_chars = enabled;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            page_separators: false,
            escape_special_chars: true,
            page_selection: PageSelection::All,
        }
    }
}

/// Which pages to render (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page
    #[default]
    All,
    /// An inclusive range
    Range(RangeInclusive<usize>),
    /// An explicit, sorted list
    Pages(Vec<usize>),
}

impl PageSelection {
    /// Check if a page number should be rendered.
    pub fn includes(&self, page: usize) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.binary_search(&page).is_ok(),
        }
    }

    /// Parse `all`, `3`, `2-5` or a comma list such as `1,3,5-7`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if let [single] = parts.as_slice() {
            if let Some((start, end)) = single.split_once('-') {
                return Ok(PageSelection::Range(parse_page(start)?..=parse_page(end)?));
            }
        }

        let mut pages = Vec::new();
        for part in parts {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(parse_page(start)?..=parse_page(end)?),
                None => pages.push(parse_page(part)?),
            }
        }
        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("Page numbers start at 1".to_string()),
        Ok(page) => Ok(page),
        Err(_) => Err(format!("Invalid page number: {:?}", s.trim())),
    }
}
