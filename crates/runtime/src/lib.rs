//! # Runtime
//!
//! Runs the TIC decoding pipeline on its own thread.
//!
//! This crate defines:
//! - **Reader**: producer thread publishing decoded frames on an ordered channel
//! - **Cancellation**: cooperative stop flag checked between byte reads
//! - **Configuration**: reader settings loaded from TOML
//! - **Logging**: `tic_*` macros over the `log` facade
//!
//! ## Example
//!
//! ```ignore
//! use runtime::{spawn_reader, ReaderConfig};
//! use core_types::IoSource;
//!
//! let port = std::fs::File::open("/dev/ttyUSB0")?;
//! let mut handle = spawn_reader(IoSource::new(port), ReaderConfig::default())?;
//!
//! for item in futures::executor::block_on_stream(handle.frames()) {
//!     println!("{:?}", item);
//! }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod cancellation;
pub mod config;
pub mod constants;
pub mod logging;
pub mod reader;

pub use cancellation::CancelToken;
pub use config::{ConfigError, ReaderConfig};
pub use reader::{
    spawn_reader, spawn_reader_with, FrameResult, ReaderControl, ReaderError, ReaderHandle,
    ReaderStats,
};
