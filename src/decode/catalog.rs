// src/decode/catalog.rs
use log::debug;

use crate::error::DirectoryError;
use crate::models::MapRecord;

/// Decodes the map catalog. One malformed element fails the whole catalog.
pub fn decode_catalog(json: &str) -> Result<Vec<MapRecord>, DirectoryError> {
    let maps: Vec<MapRecord> = serde_json::from_str(json)?;
    debug!("Successfully parsed {} maps", maps.len());
    Ok(maps)
}
