//! Document queries over rendered markup.

use std::sync::LazyLock;

use scraper::{Html, Selector};

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

static SCRIPTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("script selector is valid"));

/// Queries the crawler and media extractor run against page markup
pub trait DocumentQuery: Send + Sync {
    /// Non-empty `href` values of anchors whose href contains `marker`, in document order
    fn hrefs_containing(&self, markup: &str, marker: &str) -> Vec<String>;

    /// Text content of every inline `<script>` element
    fn script_bodies(&self, markup: &str) -> Vec<String>;
}

/// [`DocumentQuery`] backed by the `scraper` HTML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlQuery;

impl DocumentQuery for HtmlQuery {
    fn hrefs_containing(&self, markup: &str, marker: &str) -> Vec<String> {
        let document = Html::parse_document(markup);
        document
            .select(&ANCHORS)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty() && href.contains(marker))
            .map(String::from)
            .collect()
    }

    fn script_bodies(&self, markup: &str) -> Vec<String> {
        let document = Html::parse_document(markup);
        document
            .select(&SCRIPTS)
            .map(|script| script.text().collect::<String>())
            .filter(|body| !body.trim().is_empty())
            .collect()
    }
}
