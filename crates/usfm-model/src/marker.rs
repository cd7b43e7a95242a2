use std::fmt;
use thiserror::Error;

/// One output line of a USFM document.
///
/// Only the markers this tool emits are modelled. `Text` is a bare line with
/// no marker, used for paragraph content following `\p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// `\id <CODE> <description>`
    Id { code: String, description: String },
    /// `\ide <encoding>`
    Ide(String),
    /// `\h <running header>`
    Header(String),
    /// `\toc1 <long table-of-contents title>`
    Toc1(String),
    /// `\mt1 <main title>`
    MainTitle(String),
    /// `\s1 <section heading>`
    Section(String),
    /// `\c <n>`
    Chapter(u64),
    /// `\v <n> <text>`
    ///
    /// The number is kept as its digit string without leading zeros, since
    /// page text can carry verse numbers of any length.
    Verse { number: String, text: String },
    /// `\p`
    Paragraph,
    /// `\rem <remark>`
    Remark(String),
    /// Unmarked content line.
    Text(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkerError {
    #[error("unknown marker: \\{0}")]
    UnknownMarker(String),

    #[error("\\{0} requires a number")]
    MissingNumber(String),

    #[error("\\{marker} has invalid number '{value}'")]
    InvalidNumber { marker: String, value: String },

    #[error("\\id requires a book code")]
    MissingCode,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Id { code, description } => write!(f, "\\id {code} {description}"),
            Marker::Ide(enc) => write!(f, "\\ide {enc}"),
            Marker::Header(t) => write!(f, "\\h {t}"),
            Marker::Toc1(t) => write!(f, "\\toc1 {t}"),
            Marker::MainTitle(t) => write!(f, "\\mt1 {t}"),
            Marker::Section(t) => write!(f, "\\s1 {t}"),
            Marker::Chapter(n) => write!(f, "\\c {n}"),
            // Empty verse text still keeps the separating space
            Marker::Verse { number, text } => write!(f, "\\v {number} {text}"),
            Marker::Paragraph => write!(f, "\\p"),
            Marker::Remark(t) => write!(f, "\\rem {t}"),
            Marker::Text(t) => write!(f, "{t}"),
        }
    }
}

impl Marker {
    /// Parse a single rendered line back into a marker.
    ///
    /// Lines that don't start with a backslash are `Text`.
    pub fn parse_line(line: &str) -> Result<Marker, MarkerError> {
        let Some(body) = line.strip_prefix('\\') else {
            return Ok(Marker::Text(line.to_string()));
        };

        let (tag, rest) = match body.split_once(' ') {
            Some((tag, rest)) => (tag, rest),
            None => (body, ""),
        };

        match tag {
            "id" => {
                let (code, description) = rest.split_once(' ').unwrap_or((rest, ""));
                if code.is_empty() {
                    return Err(MarkerError::MissingCode);
                }
                Ok(Marker::Id {
                    code: code.to_string(),
                    description: description.to_string(),
                })
            }
            "ide" => Ok(Marker::Ide(rest.to_string())),
            "h" => Ok(Marker::Header(rest.to_string())),
            "toc1" => Ok(Marker::Toc1(rest.to_string())),
            "mt1" => Ok(Marker::MainTitle(rest.to_string())),
            "s1" => Ok(Marker::Section(rest.to_string())),
            "c" => Ok(Marker::Chapter(parse_number(tag, rest.trim())?)),
            "v" => {
                let (num, text) = rest.split_once(' ').unwrap_or((rest, ""));
                Ok(Marker::Verse {
                    number: parse_digits(tag, num)?,
                    text: text.to_string(),
                })
            }
            "p" => Ok(Marker::Paragraph),
            "rem" => Ok(Marker::Remark(rest.to_string())),
            other => Err(MarkerError::UnknownMarker(other.to_string())),
        }
    }

    /// Short tag name without the backslash, or `None` for plain text.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Marker::Id { .. } => Some("id"),
            Marker::Ide(_) => Some("ide"),
            Marker::Header(_) => Some("h"),
            Marker::Toc1(_) => Some("toc1"),
            Marker::MainTitle(_) => Some("mt1"),
            Marker::Section(_) => Some("s1"),
            Marker::Chapter(_) => Some("c"),
            Marker::Verse { .. } => Some("v"),
            Marker::Paragraph => Some("p"),
            Marker::Remark(_) => Some("rem"),
            Marker::Text(_) => None,
        }
    }
}

fn parse_number(tag: &str, value: &str) -> Result<u64, MarkerError> {
    if value.is_empty() {
        return Err(MarkerError::MissingNumber(tag.to_string()));
    }
    value.parse().map_err(|_| MarkerError::InvalidNumber {
        marker: tag.to_string(),
        value: value.to_string(),
    })
}

fn parse_digits(tag: &str, value: &str) -> Result<String, MarkerError> {
    if value.is_empty() {
        return Err(MarkerError::MissingNumber(tag.to_string()));
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MarkerError::InvalidNumber {
            marker: tag.to_string(),
            value: value.to_string(),
        });
    }
    Ok(canonical_digits(value))
}

/// Drop leading zeros from an ASCII digit run, keeping a lone `0`.
pub fn canonical_digits(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
