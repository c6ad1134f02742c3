use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::title_case;

/// Rendered in exported documents when a field could not be extracted.
pub const NOT_FOUND: &str = "Not Found";

/// Longest first line (in words) still accepted as a name.
const MAX_NAME_WORDS: usize = 4;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

// The regex crate has no lookaround, so the non-digit context is consumed
// and the number itself is captured.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{10})(?:[^0-9]|$)").expect("valid phone regex"));

/// Candidate contact details. `None` means "not found" for that field only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CandidateIdentity {
    pub fn name_or_not_found(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_FOUND)
    }

    pub fn email_or_not_found(&self) -> &str {
        self.email.as_deref().unwrap_or(NOT_FOUND)
    }

    pub fn phone_or_not_found(&self) -> &str {
        self.phone.as_deref().unwrap_or(NOT_FOUND)
    }
}

/// Extracts name, email and phone from raw (un-normalized) resume text.
/// Each field is extracted independently and never fails.
pub fn extract_identity(raw_text: &str) -> CandidateIdentity {
    CandidateIdentity {
        name: extract_name(raw_text),
        email: extract_email(raw_text),
        phone: extract_phone(raw_text),
    }
}

/// First non-empty line, title-cased, if it is short enough to be a name.
/// Resumes that open with a header or a sentence yield `None` or a wrong name.
fn extract_name(raw_text: &str) -> Option<String> {
    let first_line = raw_text.lines().map(str::trim).find(|l| !l.is_empty())?;
    if first_line.split_whitespace().count() <= MAX_NAME_WORDS {
        Some(title_case(first_line))
    } else {
        None
    }
}

fn extract_email(raw_text: &str) -> Option<String> {
    EMAIL_RE.find(raw_text).map(|m| m.as_str().to_string())
}

/// Exactly ten consecutive digits. Numbers written with separators
/// ("987-654-3210") are not recognized.
fn extract_phone(raw_text: &str) -> Option<String> {
    PHONE_RE
        .captures(raw_text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
