//! DOI canonicalization.
//!
//! DOIs arrive spelled half a dozen ways: bare, `doi:`-prefixed, or as
//! resolver URLs with or without the `dx.` host. Every equality check in
//! the engine runs on the canonical lowercase form produced here.

const RESOLVER_PREFIXES: [&str; 5] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

/// Canonicalize a raw DOI string: trim, strip a resolver prefix
/// (case-insensitive), lowercase the remainder. Blank input yields
/// `None`; this never fails.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    let stripped = RESOLVER_PREFIXES
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix))
        .unwrap_or(&lower)
        .trim();

    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Landing-page URL for a canonical DOI.
pub fn to_url(normalized: &str) -> String {
    format!("https://doi.org/{normalized}")
}
