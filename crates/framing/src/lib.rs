//! # Framing
//!
//! Splits the TIC byte stream into frame bodies at STX/ETX boundaries.
//!
//! - [`StxEtxFramer`]: push-style automaton for chunked transports
//! - [`StreamFramer`]: pull-style loop over a blocking [`core_types::ByteSource`]
//!   that decodes every completed body

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod stream;
pub mod stx_etx;

pub use stream::StreamFramer;
pub use stx_etx::{FrameState, StxEtxFramer, DEFAULT_MAX_BODY_LEN};

/// Trait for converting a stream of bytes into discrete frame bodies.
pub trait Framer: Send {
    /// Ingest new bytes and return the bodies of any frames they complete.
    ///
    /// # Arguments
    /// * `bytes` - The new chunk of data read from transport.
    fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>>;

    /// Reset internal state (e.g., clear buffers).
    fn reset(&mut self);

    /// Get the name of the framer.
    fn name(&self) -> &'static str;
}
