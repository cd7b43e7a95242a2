use crate::extract::extract_blocks;
use crate::fetch::PageSource;
use crate::index::resolve_index;
use crate::output;
use crate::types::{BookOutcome, BookRecord, RunManifest};
use crate::{INDEX_URL, ORIGIN, OUTPUT_DIR};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use usfm_model::{is_known_code, ResolvedBook, UsfmDocument};

/// Settings for one conversion run. Defaults reproduce the fixed behaviour.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub index_url: String,
    pub origin: String,
    pub output_dir: PathBuf,
    /// Restrict conversion to these codes; empty means every resolved book.
    pub books: Vec<String>,
    /// Keep fetched HTML under `<output_dir>/raw/`.
    pub cache_html: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            index_url: INDEX_URL.to_string(),
            origin: ORIGIN.to_string(),
            output_dir: PathBuf::from(OUTPUT_DIR),
            books: Vec::new(),
            cache_html: false,
        }
    }
}

/// Fetch the listing page and resolve its book links.
pub async fn list_books<S: PageSource>(
    source: &S,
    index_url: &str,
    origin: &str,
) -> Result<Vec<ResolvedBook>> {
    let (_, books) = fetch_index(source, index_url, origin).await?;
    Ok(books)
}

/// Fetch the listing page, returning its HTML alongside the resolved books.
async fn fetch_index<S: PageSource>(
    source: &S,
    index_url: &str,
    origin: &str,
) -> Result<(String, Vec<ResolvedBook>)> {
    tracing::info!(url = %index_url, "Fetching book list");
    let html = source
        .fetch(index_url)
        .await
        .context("Failed to fetch index page")?;
    let books = resolve_index(&html, origin)?;
    Ok((html, books))
}

/// Convert every resolved book, writing one `.usfm` file per success.
///
/// A failure on the index page aborts the run. A failure on a single book is
/// logged and recorded in the manifest, and the run moves on; no file is
/// written for that book.
pub async fn run<S: PageSource>(source: &S, opts: &ConvertOptions) -> Result<RunManifest> {
    fs::create_dir_all(&opts.output_dir).with_context(|| {
        format!("Failed to create output directory {}", opts.output_dir.display())
    })?;

    let (index_html, books) = fetch_index(source, &opts.index_url, &opts.origin).await?;
    if opts.cache_html {
        cache_page(opts, "index", &index_html);
    }

    let books = select_books(books, &opts.books);

    let mut manifest = RunManifest::new(&opts.index_url, &opts.output_dir.display().to_string());

    for book in books {
        tracing::info!(code = %book.code, url = %book.url, "Processing book");

        let outcome = match convert_book(source, &book, opts).await {
            Ok(doc) => {
                let stats = doc.stats();
                tracing::info!(
                    code = %book.code,
                    chapters = stats.chapters,
                    verses = stats.verses,
                    "Converted book"
                );
                BookOutcome::Converted { file: doc.file_name(), stats }
            }
            Err(e) => {
                let error = format!("{e:#}");
                tracing::error!(code = %book.code, error = %error, "Skipping book");
                BookOutcome::Failed { error }
            }
        };

        manifest.books.push(BookRecord { book, outcome });
    }

    output::write_manifest(&manifest, &opts.output_dir)?;
    tracing::info!(
        converted = manifest.converted(),
        failed = manifest.failed(),
        "Run complete"
    );

    Ok(manifest)
}

/// Fetch, classify, and write a single book.
async fn convert_book<S: PageSource>(
    source: &S,
    book: &ResolvedBook,
    opts: &ConvertOptions,
) -> Result<UsfmDocument> {
    let html = source.fetch(&book.url).await?;
    tracing::debug!(code = %book.code, bytes = html.len(), "Received HTML");

    if opts.cache_html {
        cache_page(opts, &book.code, &html);
    }

    let blocks = extract_blocks(&html)
        .with_context(|| format!("Could not find content for {}", book.code))?;
    let doc = usfm_parse::convert_blocks(&book.code, &book.title, &blocks);

    output::write_usfm(&doc, &opts.output_dir)?;
    Ok(doc)
}

/// The raw cache is for re-examination only, so a failed write never fails the run.
fn cache_page(opts: &ConvertOptions, name: &str, html: &str) {
    if let Err(e) = output::cache_html(&opts.output_dir, name, html) {
        let error = format!("{e:#}");
        tracing::warn!(page = %name, error = %error, "Could not cache raw HTML");
    }
}

/// Apply the `--book` filter, preserving index order.
fn select_books(books: Vec<ResolvedBook>, only: &[String]) -> Vec<ResolvedBook> {
    if only.is_empty() {
        return books;
    }

    let wanted: Vec<String> = only.iter().map(|c| c.trim().to_uppercase()).collect();
    for code in &wanted {
        if !is_known_code(code) {
            tracing::warn!(code = %code, "Unknown book code in filter");
        } else if !books.iter().any(|b| &b.code == code) {
            tracing::warn!(code = %code, "Book not found on index page");
        }
    }

    books
        .into_iter()
        .filter(|b| wanted.contains(&b.code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TEST_INDEX: &str = "https://wiki.test/wiki/Index";
    const TEST_ORIGIN: &str = "https://wiki.test";

    /// In-memory pages keyed by URL; unknown URLs fail like a dead host.
    struct FixtureSource {
        pages: HashMap<String, String>,
    }

    impl FixtureSource {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            }
        }
    }

    impl PageSource for FixtureSource {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .with_context(|| format!("connection refused: {url}"))
        }
    }

    const INDEX_HTML: &str = r#"
        <div class="mw-parser-output">
            <a href="/wiki/Gen">Буття</a>
            <a href="/wiki/Exo">Вихід</a>
            <a href="/wiki/Gen2">Буття (інше видання)</a>
            <a href="/wiki/Lev">Левит</a>
            <a href="/wiki/Num">Числа</a>
        </div>
    "#;

    const GEN_HTML: &str = r#"
        <div class="mw-parser-output">
            <p>Вступ</p>
            <p>1 На початку[1]</p>
            <p>2 А земля</p>
        </div>
    "#;

    const LEV_HTML: &str = r#"
        <div class="mw-parser-output">
            <h2>Закон</h2>
            <p>1 І кликнув Господь</p>
        </div>
    "#;

    fn options(dir: &std::path::Path) -> ConvertOptions {
        ConvertOptions {
            index_url: TEST_INDEX.to_string(),
            origin: TEST_ORIGIN.to_string(),
            output_dir: dir.join("out"),
            books: Vec::new(),
            cache_html: false,
        }
    }

    #[tokio::test]
    async fn test_failed_books_do_not_stop_the_run() {
        let source = FixtureSource::new(&[
            (TEST_INDEX, INDEX_HTML),
            ("https://wiki.test/wiki/Gen", GEN_HTML),
            // Exodus page lacks the content container
            ("https://wiki.test/wiki/Exo", "<html><body><p>1 текст</p></body></html>"),
            ("https://wiki.test/wiki/Lev", LEV_HTML),
            // Numbers is not served at all
        ]);
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path());

        let manifest = run(&source, &opts).await.unwrap();

        let codes: Vec<&str> = manifest.books.iter().map(|b| b.book.code.as_str()).collect();
        assert_eq!(codes, vec!["GEN", "EXO", "LEV", "NUM"]);
        assert_eq!(manifest.converted(), 2);
        assert_eq!(manifest.failed(), 2);

        assert!(opts.output_dir.join("GEN.usfm").exists());
        assert!(!opts.output_dir.join("EXO.usfm").exists());
        assert!(opts.output_dir.join("LEV.usfm").exists());
        assert!(!opts.output_dir.join("NUM.usfm").exists());
        assert!(opts.output_dir.join("manifest.json").exists());

        let genesis = fs::read_to_string(opts.output_dir.join("GEN.usfm")).unwrap();
        assert_eq!(
            genesis,
            "\\id GEN Ohienko Bible 1988 (Wikisource)\n\
             \\ide UTF-8\n\
             \\h Буття\n\
             \\toc1 Буття\n\
             \\mt1 Буття\n\
             \\rem Вступ\n\
             \\c 1\n\
             \\v 1 На початку\n\
             \\c 2\n\
             \\v 1 А земля"
        );

        match &manifest.books[1].outcome {
            BookOutcome::Failed { error } => assert!(error.contains("mw-parser-output")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_index_failure_is_fatal() {
        let source = FixtureSource::new(&[]);
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path());

        let err = run(&source, &opts).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to fetch index page"));
        assert!(!opts.output_dir.join("manifest.json").exists());
    }

    #[tokio::test]
    async fn test_book_filter_and_html_cache() {
        let source = FixtureSource::new(&[
            (TEST_INDEX, INDEX_HTML),
            ("https://wiki.test/wiki/Lev", LEV_HTML),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path());
        opts.books = vec!["lev".to_string()];
        opts.cache_html = true;

        let manifest = run(&source, &opts).await.unwrap();
        assert_eq!(manifest.books.len(), 1);
        assert_eq!(manifest.converted(), 1);

        assert!(opts.output_dir.join("raw").join("index.html").exists());
        assert!(opts.output_dir.join("raw").join("LEV.html").exists());

        let leviticus = fs::read_to_string(opts.output_dir.join("LEV.usfm")).unwrap();
        assert!(leviticus.contains("\\s1 Закон\n\\c 1\n\\v 1 І кликнув Господь"));
    }

    #[tokio::test]
    async fn test_cache_failure_does_not_fail_books() {
        let source = FixtureSource::new(&[
            (TEST_INDEX, INDEX_HTML),
            ("https://wiki.test/wiki/Gen", GEN_HTML),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path());
        opts.books = vec!["GEN".to_string()];
        opts.cache_html = true;

        // A plain file where the raw/ directory should go
        fs::create_dir_all(&opts.output_dir).unwrap();
        fs::write(opts.output_dir.join("raw"), "not a directory").unwrap();

        let manifest = run(&source, &opts).await.unwrap();
        assert_eq!(manifest.converted(), 1);
        assert_eq!(manifest.failed(), 0);
        assert!(opts.output_dir.join("GEN.usfm").exists());
    }

    #[tokio::test]
    async fn test_list_books_dedups() {
        let source = FixtureSource::new(&[(TEST_INDEX, INDEX_HTML)]);
        let books = list_books(&source, TEST_INDEX, TEST_ORIGIN).await.unwrap();
        let urls: Vec<&str> = books.iter().map(|b| b.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://wiki.test/wiki/Gen",
                "https://wiki.test/wiki/Exo",
                "https://wiki.test/wiki/Lev",
                "https://wiki.test/wiki/Num",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_and_list_books_agree() {
        let source = FixtureSource::new(&[(TEST_INDEX, INDEX_HTML)]);
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path());

        let listed = list_books(&source, TEST_INDEX, TEST_ORIGIN).await.unwrap();
        let manifest = run(&source, &opts).await.unwrap();
        let run_urls: Vec<&str> = manifest.books.iter().map(|r| r.book.url.as_str()).collect();
        let listed_urls: Vec<&str> = listed.iter().map(|b| b.url.as_str()).collect();
        assert_eq!(run_urls, listed_urls);
    }

    #[test]
    fn test_select_books_keeps_index_order() {
        let book = |code: &str| ResolvedBook {
            code: code.to_string(),
            title: code.to_string(),
            url: format!("https://wiki.test/wiki/{code}"),
        };
        let books = vec![book("GEN"), book("EXO"), book("LEV")];
        let selected = select_books(books.clone(), &["lev".into(), "GEN".into(), "XYZ".into()]);
        let codes: Vec<&str> = selected.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["GEN", "LEV"]);
        assert_eq!(select_books(books, &[]).len(), 3);
    }
}
