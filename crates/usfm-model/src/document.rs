use crate::marker::Marker;
use serde::{Deserialize, Serialize};

/// Source attribution written into every `\id` line.
pub const SOURCE_ATTRIBUTION: &str = "Ohienko Bible 1988 (Wikisource)";

/// Encoding declared by `\ide`.
pub const ENCODING: &str = "UTF-8";

/// File extension for generated books.
pub const USFM_EXTENSION: &str = "usfm";

/// Kind of block-level element taken from a book page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// `<h2>` / `<h3>`; the level is kept for diagnostics only.
    Heading(u8),
    /// `<p>`
    Paragraph,
}

/// A block-level element in document order, with its raw extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self { kind: BlockKind::Paragraph, text: text.into() }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self { kind: BlockKind::Heading(level), text: text.into() }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading(_))
    }
}

/// The complete USFM output for a single book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsfmDocument {
    pub code: String,
    pub title: String,
    pub markers: Vec<Marker>,
}

/// Chapter/verse counts for logging and the run manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub lines: usize,
    pub chapters: usize,
    pub verses: usize,
    pub sections: usize,
}

impl UsfmDocument {
    /// Start a document with the five identification/title lines.
    pub fn new(code: &str, title: &str) -> Self {
        let markers = vec![
            Marker::Id {
                code: code.to_string(),
                description: SOURCE_ATTRIBUTION.to_string(),
            },
            Marker::Ide(ENCODING.to_string()),
            Marker::Header(title.to_string()),
            Marker::Toc1(title.to_string()),
            Marker::MainTitle(title.to_string()),
        ];
        Self {
            code: code.to_string(),
            title: title.to_string(),
            markers,
        }
    }

    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn extend(&mut self, markers: impl IntoIterator<Item = Marker>) {
        self.markers.extend(markers);
    }

    /// Output file name, e.g. `GEN.usfm`.
    pub fn file_name(&self) -> String {
        format!("{}.{USFM_EXTENSION}", self.code)
    }

    /// Render as newline-joined lines, without a trailing newline.
    pub fn render(&self) -> String {
        self.markers
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn stats(&self) -> DocumentStats {
        let mut stats = DocumentStats {
            lines: self.markers.len(),
            ..Default::default()
        };
        for marker in &self.markers {
            match marker {
                Marker::Chapter(_) => stats.chapters += 1,
                Marker::Verse { .. } => stats.verses += 1,
                Marker::Section(_) => stats.sections += 1,
                _ => {}
            }
        }
        stats
    }
}
