//! # Core Types
//!
//! Shared records for the TIC reader workspace: protocol modes, decoded data
//! groups and frames, and the byte-source seam consumed by the framer.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod mode;
pub mod transport;
pub use mode::{ParityMode, ProtocolMode, SerialConfig};
pub use transport::{ByteSource, IoSource, TransportError};

/// Start of a frame.
pub const STX: u8 = 0x02;
/// End of a frame.
pub const ETX: u8 = 0x03;
/// Start of a data group.
pub const LF: u8 = 0x0A;
/// End of a data group.
pub const CR: u8 = 0x0D;

/// One label/data(/horodate) record of a frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataGroup {
    pub label: String,
    pub data: String,
    /// Only present in standard mode, on groups that carry a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horodate: Option<String>,
    /// Checksum field exactly as received (normally a single character).
    #[serde(skip)]
    pub checksum: String,
    /// Outcome of checksum verification. `false` is a data-quality flag,
    /// the group itself is well formed.
    pub valid: bool,
}

/// Diagnostics attached to a frame whose decoding was aborted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameError {
    #[serde(rename = "error")]
    pub message: String,
    /// Raw text of the group that failed to parse.
    #[serde(rename = "errorDetails")]
    pub details: String,
}

/// One decoded STX…ETX span.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    /// Decode completion time.
    pub timestamp: DateTime<Utc>,
    /// Groups in order of appearance. Empty on error frames.
    pub groups: Vec<DataGroup>,
    #[serde(flatten)]
    pub error: Option<FrameError>,
}

impl Frame {
    pub fn decoded(groups: Vec<DataGroup>) -> Self {
        Self {
            timestamp: Utc::now(),
            groups,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            groups: Vec::new(),
            error: Some(FrameError {
                message: message.into(),
                details: details.into(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Number of groups whose checksum did not verify.
    pub fn invalid_groups(&self) -> usize {
        self.groups.iter().filter(|g| !g.valid).count()
    }

    /// First group carrying `label`.
    pub fn get(&self, label: &str) -> Option<&DataGroup> {
        self.groups.iter().find(|g| g.label == label)
    }
}

/// Turns the body of one frame (bytes between STX and ETX) into a [`Frame`].
///
/// Implemented by the TIC decoder for a fixed [`ProtocolMode`]; the stream
/// framer only depends on this trait.
pub trait Decoder: Send {
    fn decode(&mut self, body: &[u8]) -> Frame;

    /// Mode whose separator and field-count rules this decoder applies.
    fn mode(&self) -> ProtocolMode;

    /// Human-readable name (e.g., "TIC historical").
    fn name(&self) -> &'static str;
}
