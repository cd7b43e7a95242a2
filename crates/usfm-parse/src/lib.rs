//! Turn the block stream of a Wikisource book page into USFM markers.
//!
//! `normalize` cleans extracted text; `classify` runs the chapter/verse
//! heuristic over the cleaned blocks.

pub mod normalize;
pub mod classify;

pub use classify::{classify_block, convert_blocks, ParseState};
pub use normalize::normalize_text;
