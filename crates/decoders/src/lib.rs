//! # Decoders
//!
//! TIC frame decoding: checksum engine, group parser and frame decoder.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod checksum;
pub mod frame;
pub mod group;

pub use core_types::Decoder;
pub use frame::{decode_frame, TicDecoder};
pub use group::{encode_group, parse_group, DecodeError};
