//! Roster input: one researcher per row, `orcid` and `name` columns.

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

use pubrecon_core::identifiers::OrcidId;
use pubrecon_core::models::Researcher;

#[derive(Debug, Deserialize)]
struct RosterRow {
    orcid: String,
    name: String,
}

/// Read the roster, keeping rows with a structurally valid ORCID iD.
/// Invalid rows are logged and skipped; whether zero valid rows is fatal
/// is the caller's call.
pub fn load(path: &Path) -> Result<Vec<Researcher>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut researchers = Vec::new();
    for row in reader.deserialize() {
        let row: RosterRow = row?;
        match OrcidId::parse(&row.orcid) {
            Ok(orcid) => researchers.push(Researcher::new(orcid, row.name.trim())),
            Err(err) => warn!(%err, "skipping roster row"),
        }
    }
    Ok(researchers)
}
