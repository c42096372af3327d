//! ORCID iD validation.

use std::fmt;

use crate::error::{CoreError, Result};

/// A structurally valid ORCID iD in canonical dashed form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrcidId(String);

impl OrcidId {
    /// Parse an ORCID iD, accepting the bare dashed form or the
    /// `https://orcid.org/…` URL spelling.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let bare = trimmed
            .strip_prefix("https://orcid.org/")
            .or_else(|| trimmed.strip_prefix("http://orcid.org/"))
            .unwrap_or(trimmed);

        if is_valid(bare) {
            Ok(Self(bare.to_ascii_uppercase()))
        } else {
            Err(CoreError::InvalidOrcid(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrcidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Format: 0000-0000-0000-000X where the final character is a digit or
// the checksum letter X.
fn is_valid(candidate: &str) -> bool {
    let parts: Vec<&str> = candidate.split('-').collect();
    if parts.len() != 4 {
        return false;
    }
    for part in &parts[0..3] {
        if part.len() != 4 || !part.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }

    let last: Vec<char> = parts[3].chars().collect();
    last.len() == 4
        && last[0..3].iter().all(|c| c.is_ascii_digit())
        && (last[3].is_ascii_digit() || last[3].eq_ignore_ascii_case(&'X'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_id_accepted() {
        let id = OrcidId::parse("0000-0002-1825-0097").unwrap();
        assert_eq!(id.as_str(), "0000-0002-1825-0097");
    }

    #[test]
    fn url_spelling_accepted() {
        let id = OrcidId::parse("https://orcid.org/0000-0002-1825-0097").unwrap();
        assert_eq!(id.as_str(), "0000-0002-1825-0097");
    }

    #[test]
    fn checksum_letter_uppercased() {
        let id = OrcidId::parse("0000-0002-9079-593x").unwrap();
        assert_eq!(id.as_str(), "0000-0002-9079-593X");
    }

    #[test]
    fn malformed_ids_rejected() {
        assert!(OrcidId::parse("").is_err());
        assert!(OrcidId::parse("0000-0002-1825").is_err());
        assert!(OrcidId::parse("0000-0002-1825-00971").is_err());
        assert!(OrcidId::parse("abcd-0002-1825-0097").is_err());
        assert!(OrcidId::parse("0000-0002-1825-009Y").is_err());
    }
}
