//! Fetch the Wikisource Ohienko Bible and write one USFM file per book.

pub mod convert;
pub mod extract;
pub mod fetch;
pub mod index;
pub mod output;
pub mod types;

pub use convert::{list_books, run, ConvertOptions};
pub use fetch::{HttpSource, PageSource};

/// Listing page of the Ohienko translation ("Біблія (Огієнко)").
pub const INDEX_URL: &str = "https://uk.wikisource.org/wiki/%D0%91%D1%96%D0%B1%D0%BB%D1%96%D1%8F_(%D0%9E%D0%B3%D1%96%D1%94%D0%BD%D0%BA%D0%BE)";

/// Origin that relative book links are resolved against.
pub const ORIGIN: &str = "https://uk.wikisource.org";

/// Default directory for generated files.
pub const OUTPUT_DIR: &str = "USFM_Output";
