use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single dependency declaration taken from the project manifest.
///
/// The text is kept opaque: a specifier is a package name plus whatever
/// version constraint the manifest author wrote (`numpy>=1.20`,
/// `pandas==2.0`, a direct URL, ...). The only normalization applied is
/// trimming, everything after that is carried verbatim into the generated
/// files.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Specifier(String);

impl Specifier {
    /// Builds a specifier from a raw manifest entry. Surrounding whitespace
    /// is dropped first, then a single matched pair of enclosing quote
    /// characters (`"` or `'`), if present.
    pub fn new(raw: &str) -> Self {
        Self(strip_quote_pair(raw.trim()).to_string())
    }

    /// Wraps an already-synthesized specifier without any trimming.
    ///
    /// Nightly entries are constructed by this tool, so whatever they
    /// contain is intentional and must not be normalized away.
    pub fn synthesized(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the leading package name, when the specifier starts with
    /// one. Used for validation only; filtering never parses names.
    pub fn package_name(&self) -> Option<&str> {
        let re = Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?").ok()?;
        re.find(&self.0).map(|m| m.as_str())
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Removes one pair of enclosing quotes when both ends carry the same quote
/// character. `"foo"` becomes `foo`, a lone or mismatched quote is left
/// alone.
fn strip_quote_pair(text: &str) -> &str {
    if text.len() >= 2 {
        for quote in ['"', '\''] {
            if text.starts_with(quote) && text.ends_with(quote) {
                return &text[1..text.len() - 1];
            }
        }
    }
    text
}
