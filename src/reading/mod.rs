//! Parsing of the archive's TEXT:LIST report page.

pub mod indices;
pub mod levels;
pub mod station;

pub use indices::Indices;
pub use levels::{Field, Levels, RowShape};
pub use station::{parse_report, StationRecord};

/// Returns the text between every `open`..`close` pair, in document order.
fn blocks_between<'a>(text: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(open) {
        let after_open = &rest[start + open.len()..];
        match after_open.find(close) {
            Some(end) => {
                blocks.push(&after_open[..end]);
                rest = &after_open[end + close.len()..];
            }
            None => break,
        }
    }

    blocks
}

// -- Tests -------------------------------------------------------------------
