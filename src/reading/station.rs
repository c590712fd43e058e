use log::warn;
use serde::Serialize;

use super::{blocks_between, Indices, Levels, RowShape};
use crate::error::{Result, SoundingError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    pub name: String,
    pub indices: Indices,
    pub levels: Levels,
    /// Pressures of rows whose layout was not recognised and were mapped positionally.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub irregular: Vec<String>,
}

/// Parses a TEXT:LIST report page into a station record.
///
/// The page holds an `<H2>` heading such as `47778 ROK Shionomisaki Observations at ...`,
/// followed by two `<PRE>` blocks: the level table and the indices block.
pub fn parse_report(page: &str) -> Result<StationRecord> {
    let header = blocks_between(page, "<H2>", "</H2>")
        .into_iter()
        .next()
        .ok_or(SoundingError::MissingHeader)?;
    let name = station_name(header);

    let blocks = blocks_between(page, "<PRE>", "</PRE>");
    let &[table, indices, ..] = blocks.as_slice() else {
        return Err(SoundingError::MissingBlocks {
            found: blocks.len(),
        });
    };

    let levels = Levels::from_table(table);
    let irregular: Vec<String> = levels
        .iter()
        .filter_map(|level| match level.shape {
            RowShape::Irregular(count) => {
                warn!(
                    "{}: level {} has {} tokens, mapped positionally",
                    name, level.pressure, count
                );
                Some(level.pressure.clone())
            }
            _ => None,
        })
        .collect();

    Ok(StationRecord {
        name,
        indices: Indices::from_block(indices),
        levels,
        irregular,
    })
}

/// Third word of the heading; short headings fall back to the whole text.
fn station_name(header: &str) -> String {
    header
        .split_whitespace()
        .nth(2)
        .map(str::to_string)
        .unwrap_or_else(|| header.trim().to_string())
}

// -- Tests -------------------------------------------------------------------
