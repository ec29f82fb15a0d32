//! Stateless JSON encoding of task and job payloads
//!
//! Every function here is pure, so concurrent job workers can share them
//! without any serializer instance.

use crate::types::RowPayload;
use crate::Result;

/// Encode one row payload as a JSON object.
pub fn encode_row(row: &RowPayload) -> Result<String> {
    Ok(serde_json::to_string(row)?)
}

/// Decode a JSON object into a row payload.
pub fn decode_row(payload: &str) -> Result<RowPayload> {
    Ok(serde_json::from_str(payload)?)
}

/// Encode aggregated rows as a JSON array, the job-level result format.
pub fn encode_rows(rows: &[RowPayload]) -> Result<String> {
    Ok(serde_json::to_string(rows)?)
}

/// Decode a job-level result array.
pub fn decode_rows(payload: &str) -> Result<Vec<RowPayload>> {
    Ok(serde_json::from_str(payload)?)
}
