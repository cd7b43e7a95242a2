use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use usfm_model::Block;

/// MediaWiki article body; everything outside it is navigation chrome.
pub const CONTENT_SELECTOR: &str = "div.mw-parser-output";

static CONTENT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(CONTENT_SELECTOR).expect("valid selector"));
static BLOCK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, h2, h3").expect("valid selector"));

/// Locate the content container of a parsed page.
pub fn content_container(document: &Html) -> Result<ElementRef<'_>> {
    document
        .select(&CONTENT_SEL)
        .next()
        .with_context(|| format!("Could not find {CONTENT_SELECTOR}"))
}

/// All text under an element, NFC-composed.
pub fn element_text(elem: ElementRef<'_>) -> String {
    elem.text().collect::<String>().nfc().collect()
}

/// Extract paragraph and heading blocks of a book page in document order.
///
/// Text is returned raw (footnote markers and surrounding whitespace kept);
/// cleaning belongs to the classifier.
pub fn extract_blocks(html: &str) -> Result<Vec<Block>> {
    let document = Html::parse_document(html);
    let content = content_container(&document)?;

    let blocks = content
        .select(&BLOCK_SEL)
        .map(|elem| {
            let text = element_text(elem);
            match elem.value().name() {
                "h2" => Block::heading(2, text),
                "h3" => Block::heading(3, text),
                _ => Block::paragraph(text),
            }
        })
        .collect();

    Ok(blocks)
}
