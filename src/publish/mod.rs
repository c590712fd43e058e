//! Serialises the aggregate to gzip-compressed JSON and writes it under two keys.

pub mod store;

use std::io::Write;

use flate2::{write::GzEncoder, Compression};
use log::info;

use crate::{
    aggregate::Aggregate,
    error::{Result, SoundingError},
    window::ObservationWindow,
};

pub use store::{Destination, ObjectStore};

pub const CURRENT_KEY: &str = "sounding-current.json.gz";

/// `<YYYYMM>/sounding-<YYYYMMDDHH>.json.gz`
pub fn timestamped_key(window: &ObservationWindow) -> String {
    let timestamp = window.timestamp();
    format!("{}/sounding-{}.json.gz", &timestamp[..6], timestamp)
}

pub fn encode_payload(aggregate: &Aggregate) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(aggregate)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json).map_err(SoundingError::Encode)?;
    encoder.finish().map_err(SoundingError::Encode)
}

/// Writes the same payload to the timestamped key and the current alias.
/// Returns the keys written.
pub async fn publish<O: ObjectStore>(
    store: &O,
    aggregate: &Aggregate,
    window: &ObservationWindow,
) -> Result<Vec<String>> {
    let payload = encode_payload(aggregate)?;
    let keys = vec![timestamped_key(window), CURRENT_KEY.to_string()];

    for key in &keys {
        info!("upload: {} ({} bytes)", key, payload.len());
        store.put(key, &payload).await?;
    }

    Ok(keys)
}

// -- Tests -------------------------------------------------------------------
