// Chapter/verse heuristic for Wikisource Bible pages.
//
// Book pages carry no chapter markup of their own: chapters and verses are
// plain paragraphs that begin with a number. A paragraph whose leading
// number is exactly one past the current chapter opens that chapter (and is
// its first verse); any other leading number is a verse.

use crate::normalize::normalize_text;
use regex::Regex;
use std::sync::LazyLock;
use usfm_model::{canonical_digits, Block, Marker, UsfmDocument};

// ASCII digits only; other Unicode decimal digits are ordinary text.
static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\s*(.*)").expect("valid regex"));

/// State carried across the blocks of one book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseState {
    /// Last chapter opened, 0 before the first one.
    pub current_chapter: u64,
}

/// Classify one block, returning the markers it produces and the next state.
pub fn classify_block(state: ParseState, block: &Block) -> (Vec<Marker>, ParseState) {
    let text = normalize_text(&block.text);
    if text.is_empty() {
        return (Vec::new(), state);
    }

    if block.is_heading() {
        return (vec![Marker::Section(text)], state);
    }

    match leading_number(&text) {
        Some(lead) if lead.value.is_some() && lead.value == state.current_chapter.checked_add(1) => {
            let chapter = state.current_chapter + 1;
            (
                vec![
                    Marker::Chapter(chapter),
                    Marker::Verse { number: "1".into(), text: lead.rest },
                ],
                ParseState { current_chapter: chapter },
            )
        }
        Some(lead) => (
            vec![Marker::Verse { number: lead.digits, text: lead.rest }],
            state,
        ),
        None if state.current_chapter == 0 => (vec![Marker::Remark(text)], state),
        None => (vec![Marker::Paragraph, Marker::Text(text)], state),
    }
}

/// Build the full document for one book from its blocks in page order.
pub fn convert_blocks(code: &str, title: &str, blocks: &[Block]) -> UsfmDocument {
    let mut doc = UsfmDocument::new(code, title);

    let final_state = blocks.iter().fold(ParseState::default(), |state, block| {
        let (markers, next) = classify_block(state, block);
        doc.extend(markers);
        next
    });

    tracing::debug!(
        code = %code,
        blocks = blocks.len(),
        last_chapter = final_state.current_chapter,
        "Classified blocks"
    );

    doc
}

/// A paragraph's leading integer and the rest of its first line.
struct LeadingNumber {
    /// Digits without leading zeros.
    digits: String,
    /// Numeric value, `None` when it does not fit in `u64`.
    value: Option<u64>,
    rest: String,
}

fn leading_number(text: &str) -> Option<LeadingNumber> {
    let caps = LEADING_NUMBER_RE.captures(text)?;
    let digits = canonical_digits(&caps[1]);
    Some(LeadingNumber {
        value: digits.parse().ok(),
        digits,
        rest: caps[2].to_string(),
    })
}
