use serde::{Deserialize, Serialize};
use usfm_model::{DocumentStats, ResolvedBook};

/// Record of one conversion run, written as `manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub generated_at: String,
    pub index_url: String,
    pub output_dir: String,
    pub books: Vec<BookRecord>,
}

/// Outcome for a single resolved book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(flatten)]
    pub book: ResolvedBook,
    #[serde(flatten)]
    pub outcome: BookOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookOutcome {
    Converted {
        file: String,
        stats: DocumentStats,
    },
    Failed {
        error: String,
    },
}

impl RunManifest {
    pub fn new(index_url: &str, output_dir: &str) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            index_url: index_url.to_string(),
            output_dir: output_dir.to_string(),
            books: Vec::new(),
        }
    }

    pub fn converted(&self) -> usize {
        self.books
            .iter()
            .filter(|b| matches!(b.outcome, BookOutcome::Converted { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.books.len() - self.converted()
    }
}
