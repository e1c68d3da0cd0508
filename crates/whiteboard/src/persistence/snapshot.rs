//! Serialized session snapshot

use std::time::Duration;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Event, duration_ms};

/// Length of generated session ids
pub const SESSION_ID_LEN: usize = 11;

/// Everything needed to rebuild a recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub unique_id: String,
    /// Recording length
    #[serde(with = "duration_ms")]
    pub recording_time: Duration,
    /// Real time excluded from the recording
    #[serde(with = "duration_ms")]
    pub subtract_time: Duration,
    /// Wall-clock time recording last stopped
    #[serde(with = "duration_ms")]
    pub last_end_time: Duration,
    pub stroke_color: String,
    pub events: Vec<Event>,
}

impl Snapshot {
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Random alphanumeric session id
pub fn generate_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
