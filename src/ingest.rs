//! Ingestion of the raw ladder exports.
//!
//! Two inputs are accepted:
//! - the match table, a CSV export with one game per row
//! - the tier side table, a two-column `id,tier` list
//!
//! Rows are normalized here (trimmed, identifiers and map codes case-folded)
//! and rows missing either competitor are dropped before aggregation ever
//! sees them.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Competitor, MatchRecord, TierTable};

/// Errors raised while reading a raw export.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Match table has no header row")]
    MissingHeader,
}

/// One row of the match export, columns as named in the sheet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(rename = "No")]
    pub no: String,
    #[serde(rename = "DATE")]
    pub date: String,
    #[serde(rename = "NAME.COMP")]
    pub name_comp: String,
    #[serde(rename = "STATUS")]
    pub status: String,
    #[serde(rename = "M.Type")]
    pub match_type: String,
    #[serde(rename = "ROUND")]
    pub round: String,
    #[serde(rename = "MAP")]
    pub map: String,
    #[serde(rename = "points")]
    pub points: String,
    #[serde(rename = "ID.BATTLENET1")]
    pub id1: String,
    #[serde(rename = "Tier1")]
    pub tier1: String,
    #[serde(rename = "RACE1")]
    pub race1: String,
    #[serde(rename = "R.L1")]
    pub r_l1: String,
    #[serde(rename = "R.L2")]
    pub r_l2: String,
    #[serde(rename = "R.R2")]
    pub r_r2: String,
    #[serde(rename = "R.R1")]
    pub r_r1: String,
    #[serde(rename = "ID.BATTLENET2")]
    pub id2: String,
    #[serde(rename = "Tier2")]
    pub tier2: String,
    #[serde(rename = "RACE2")]
    pub race2: String,
    #[serde(rename = "R")]
    pub r: String,
    #[serde(rename = "REMARK")]
    pub remark: String,
    #[serde(rename = "REMARK2")]
    pub remark2: String,
}

/// Outcome of parsing a match export.
#[derive(Debug, Default)]
pub struct ParsedMatches {
    pub records: Vec<MatchRecord>,
    /// Rows dropped for a missing competitor id
    pub dropped: usize,
    /// Rows the CSV reader could not decode
    pub malformed: usize,
}

/// Normalize one raw row. Returns `None` when either competitor id is empty.
pub fn normalize_row(raw: RawRow) -> Option<MatchRecord> {
    let id1 = raw.id1.trim();
    let id2 = raw.id2.trim();
    if id1.is_empty() || id2.is_empty() {
        return None;
    }

    Some(MatchRecord {
        first: Competitor {
            id: id1.to_lowercase(),
            display_name: id1.to_string(),
            tier: raw.tier1.trim().to_string(),
            race: raw.race1.trim().to_string(),
            result_outer: raw.r_l1,
            result: raw.r_l2,
        },
        second: Competitor {
            id: id2.to_lowercase(),
            display_name: id2.to_string(),
            tier: raw.tier2.trim().to_string(),
            race: raw.race2.trim().to_string(),
            result_outer: raw.r_r1,
            result: raw.r_r2,
        },
        no: raw.no,
        date: raw.date,
        tournament: raw.name_comp,
        status: raw.status,
        match_type: raw.match_type,
        round: raw.round,
        map: raw.map.trim().to_lowercase(),
        points: raw.points,
        result: raw.r.trim().to_string(),
        remark: raw.remark,
        category: raw.remark2.trim().to_string(),
    })
}

/// Parse the match export.
///
/// Undecodable rows are logged and skipped; only an unreadable header fails
/// the whole table.
pub fn parse_matches(text: &str) -> Result<ParsedMatches, IngestError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    if reader.headers()?.is_empty() {
        return Err(IngestError::MissingHeader);
    }

    let mut parsed = ParsedMatches::default();
    for (i, row) in reader.deserialize::<RawRow>().enumerate() {
        match row {
            Ok(raw) => match normalize_row(raw) {
                Some(record) => parsed.records.push(record),
                None => parsed.dropped += 1,
            },
            Err(e) => {
                // Row numbers are 1-based and count the header line.
                warn!("Skipping malformed row {}: {}", i + 2, e);
                parsed.malformed += 1;
            }
        }
    }

    info!(
        "Parsed {} match records ({} dropped, {} malformed)",
        parsed.records.len(),
        parsed.dropped,
        parsed.malformed
    );
    Ok(parsed)
}

/// Parse the `id,tier` side table. The first line is a header; blank lines
/// and bare separators are ignored, as are lines missing either column.
pub fn parse_tier_table(text: &str) -> TierTable {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut table = TierTable::new();

    for line in text.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() || line == "," {
            continue;
        }

        let mut parts = line.split(',');
        let id = parts.next().unwrap_or_default().trim();
        let tier = parts.next().unwrap_or_default().trim();
        if id.is_empty() || tier.is_empty() {
            debug!("Ignoring tier line without id or tier: {:?}", line);
            continue;
        }
        table.insert(id, tier);
    }

    info!("Parsed {} tier entries", table.len());
    table
}
