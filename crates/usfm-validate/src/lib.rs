use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use usfm_model::{is_known_code, Marker, MarkerError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("document is empty")]
    Empty,

    #[error("first line must be \\id, found: {0}")]
    MissingId(String),

    #[error("unknown book code: {0}")]
    UnknownBookCode(String),

    #[error("file name '{file}' does not match book code '{code}'")]
    FileNameMismatch { file: String, code: String },

    #[error("line {line}: expected \\{expected} in the title block")]
    PreludeOutOfOrder { line: usize, expected: &'static str },

    #[error("line {line}: {source}")]
    InvalidMarker {
        line: usize,
        #[source]
        source: MarkerError,
    },

    #[error("line {line}: chapter {found} follows chapter {previous}")]
    ChapterOutOfSequence { line: usize, previous: u64, found: u64 },

    #[error("line {line}: verse {verse} appears before any chapter")]
    VerseBeforeChapter { line: usize, verse: String },

    #[error("line {line}: verse {verse} repeated in chapter {chapter}")]
    DuplicateVerse { line: usize, chapter: u64, verse: String },
}

/// Title block tags in the order every generated book starts with.
const PRELUDE: [&str; 5] = ["id", "ide", "h", "toc1", "mt1"];

/// Validate a generated `.usfm` file on disk.
///
/// Findings are logged as warnings and returned; an unreadable file is an error.
pub fn validate(file_path: &Path) -> Result<Vec<ValidationError>> {
    let contents = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    let mut errors = validate_document(&contents);

    if let (Some(stem), Some(Marker::Id { code, .. })) = (
        file_path.file_stem().and_then(|s| s.to_str()),
        contents.lines().next().and_then(|l| Marker::parse_line(l).ok()),
    ) {
        if stem != code {
            errors.push(ValidationError::FileNameMismatch {
                file: stem.to_string(),
                code,
            });
        }
    }

    for e in &errors {
        tracing::warn!(file = %file_path.display(), "{e}");
    }

    Ok(errors)
}

/// Check the structure of rendered USFM text.
pub fn validate_document(text: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if text.trim().is_empty() {
        errors.push(ValidationError::Empty);
        return errors;
    }

    let mut chapter: Option<u64> = None;
    let mut verses_in_chapter: HashSet<String> = HashSet::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;

        let marker = match Marker::parse_line(raw) {
            Ok(m) => m,
            Err(source) => {
                errors.push(ValidationError::InvalidMarker { line, source });
                continue;
            }
        };

        if let Some(&expected) = PRELUDE.get(index) {
            if marker.tag() != Some(expected) {
                if index == 0 {
                    errors.push(ValidationError::MissingId(raw.to_string()));
                } else {
                    errors.push(ValidationError::PreludeOutOfOrder { line, expected });
                }
            }
        }

        match marker {
            Marker::Id { code, .. } => {
                if !is_known_code(&code) {
                    errors.push(ValidationError::UnknownBookCode(code));
                }
            }
            Marker::Chapter(found) => {
                let previous = chapter.unwrap_or(0);
                if previous.checked_add(1) != Some(found) {
                    errors.push(ValidationError::ChapterOutOfSequence { line, previous, found });
                }
                chapter = Some(found);
                verses_in_chapter.clear();
            }
            Marker::Verse { number, .. } => match chapter {
                None => errors.push(ValidationError::VerseBeforeChapter { line, verse: number }),
                Some(c) => {
                    if !verses_in_chapter.insert(number.clone()) {
                        errors.push(ValidationError::DuplicateVerse {
                            line,
                            chapter: c,
                            verse: number,
                        });
                    }
                }
            },
            _ => {}
        }
    }

    errors
}
