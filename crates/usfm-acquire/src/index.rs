use crate::extract::{content_container, element_text};
use anyhow::{Context, Result};
use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use usfm_model::{lookup_code, ResolvedBook};

/// Link texts containing these are wiki chrome ("Wikisource", "Edit"), not books.
pub const EXCLUDED_TITLE_LABELS: &[&str] = &["Вікіджерела", "Редагувати"];

/// Only article links are considered.
const WIKI_PATH: &str = "/wiki/";

static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Resolve the book links of the listing page.
///
/// Links are matched against the title table in encounter order; the first
/// link for a code wins and later links resolving to the same code are
/// dropped.
pub fn resolve_index(html: &str, origin: &str) -> Result<Vec<ResolvedBook>> {
    let origin = Url::parse(origin).with_context(|| format!("Invalid origin URL: {origin}"))?;
    let document = Html::parse_document(html);
    let content = content_container(&document).context("Index page has no content")?;

    let mut seen: HashSet<&'static str> = HashSet::new();
    let mut books = Vec::new();

    for link in content.select(&LINK_SEL) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let title = element_text(link);

        if !href.contains(WIKI_PATH) || is_excluded(&title) {
            continue;
        }

        let Some(code) = lookup_code(&title) else {
            tracing::trace!(title = %title.trim(), "No book code for link");
            continue;
        };

        if seen.contains(code) {
            tracing::debug!(code, title = %title.trim(), "Skipping duplicate book link");
            continue;
        }

        let url = match origin.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(href, error = %e, "Skipping unresolvable book link");
                continue;
            }
        };

        seen.insert(code);
        books.push(ResolvedBook {
            code: code.to_string(),
            title: title.trim().to_string(),
            url: url.to_string(),
        });
    }

    tracing::info!(books = books.len(), "Resolved book index");
    Ok(books)
}

fn is_excluded(title: &str) -> bool {
    EXCLUDED_TITLE_LABELS.iter().any(|label| title.contains(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://uk.wikisource.org";

    fn index_page(links: &str) -> String {
        format!(
            r#"<html><body>
            <div id="p-navigation"><a href="/wiki/Буття_(Огієнко)">Буття</a></div>
            <div class="mw-parser-output">{links}</div>
            </body></html>"#
        )
    }

    #[test]
    fn test_resolves_in_encounter_order() {
        let html = index_page(
            r#"<ul>
            <li><a href="/wiki/Exodus">Вихід</a></li>
            <li><a href="/wiki/Genesis">Буття</a></li>
            <li><a href="/wiki/Revelation">Об'явлення св. Івана Богослова</a></li>
            </ul>"#,
        );
        let books = resolve_index(&html, ORIGIN).unwrap();
        let codes: Vec<&str> = books.iter().map(|b| b.code.as_str()).collect();
        // "Івана" precedes "Об'явлення" in the table
        assert_eq!(codes, vec!["EXO", "GEN", "JHN"]);
        assert_eq!(books[0].url, "https://uk.wikisource.org/wiki/Exodus");
        assert_eq!(books[0].title, "Вихід");
    }

    #[test]
    fn test_duplicate_codes_keep_first() {
        let html = index_page(
            r#"<a href="/wiki/1Cor_a">1-е до коринтян</a>
            <a href="/wiki/1Cor_b">Перше послання св. апостола Павла до коринтян</a>
            <a href="/wiki/Gen">Буття</a>"#,
        );
        let books = resolve_index(&html, ORIGIN).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].code, "1CO");
        assert_eq!(books[0].url, "https://uk.wikisource.org/wiki/1Cor_a");
        assert_eq!(books[1].code, "GEN");
    }

    #[test]
    fn test_filters_non_book_links() {
        let html = index_page(
            r#"<a href="https://example.org/Буття">Буття</a>
            <a href="/w/index.php?title=Буття&action=edit">Буття</a>
            <a href="/wiki/Вікіджерела:Буття">Вікіджерела Буття</a>
            <a href="/wiki/Edit">Редагувати Буття</a>
            <a href="/wiki/Main">Головна</a>
            <a>Вихід</a>
            <a href="/wiki/Lev">Левит</a>"#,
        );
        let books = resolve_index(&html, ORIGIN).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].code, "LEV");
    }

    #[test]
    fn test_links_outside_content_ignored() {
        let html = index_page("");
        let books = resolve_index(&html, ORIGIN).unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn test_missing_content_is_error() {
        let html = r#"<html><body><a href="/wiki/Gen">Буття</a></body></html>"#;
        assert!(resolve_index(html, ORIGIN).is_err());
    }

    #[test]
    fn test_absolute_and_protocol_relative_hrefs() {
        let html = index_page(
            r#"<a href="https://uk.wikisource.org/wiki/Num">Числа</a>
            <a href="//uk.wikisource.org/wiki/Deu">Повторення Закону</a>"#,
        );
        let books = resolve_index(&html, ORIGIN).unwrap();
        assert_eq!(books[0].url, "https://uk.wikisource.org/wiki/Num");
        assert_eq!(books[1].url, "https://uk.wikisource.org/wiki/Deu");
    }
}
