use regex::Regex;
use std::sync::LazyLock;

// ASCII digits only; `[１]` with fullwidth digits is left in place.
static FOOTNOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[0-9]+\]").expect("valid regex"));

/// Strip bracketed footnote markers like `[12]` and trim surrounding whitespace.
///
/// Removal repeats until no marker is left, so nested leftovers such as
/// `[1[2]]` collapse too and the function is idempotent.
pub fn normalize_text(input: &str) -> String {
    let mut text = input.to_string();
    while FOOTNOTE_RE.is_match(&text) {
        text = FOOTNOTE_RE.replace_all(&text, "").into_owned();
    }
    text.trim().to_string()
}
