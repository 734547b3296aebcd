//! Reader thread
//!
//! Owns the byte source and a [`StreamFramer`] on a dedicated thread and
//! publishes every decoded frame, in arrival order, on a bounded channel.
//!
//! # Termination
//!
//! - **Transport error**: published once as `Err`, then the channel closes
//! - **Cancellation**: checked before every byte read; the thread exits and
//!   drops the source without reading it again
//! - **Receiver dropped**: the next publish fails and the thread exits
//!
//! A thread blocked inside `read_byte` only notices cancellation once that
//! read returns.

use crate::cancellation::CancelToken;
use crate::config::{ConfigError, ReaderConfig};
use crate::constants::READER_THREAD_NAME;
use crate::{tic_debug, tic_error, tic_info, tic_warn};
use core_types::{ByteSource, Decoder, Frame, TransportError};
use decoders::TicDecoder;
use framing::StreamFramer;
use futures::executor::block_on;
use futures::SinkExt;
use futures_channel::mpsc;
use std::thread;
use thiserror::Error;

/// One item of the frame channel.
pub type FrameResult = Result<Frame, TransportError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to spawn reader thread: {0}")]
    Spawn(String),

    #[error("Reader thread panicked")]
    Panicked,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Counters accumulated by the reader thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    pub frames: u64,
    /// Frames aborted on a malformed group.
    pub error_frames: u64,
    /// Groups whose checksum did not verify, across all frames.
    pub invalid_groups: u64,
}

impl ReaderStats {
    fn record(&mut self, frame: &Frame) {
        self.frames += 1;
        if frame.is_error() {
            self.error_frames += 1;
        }
        self.invalid_groups += frame.invalid_groups() as u64;
    }
}

/// Stop/join half of a [`ReaderHandle`].
pub struct ReaderControl {
    cancel: CancelToken,
    join: thread::JoinHandle<Result<ReaderStats, TransportError>>,
}

impl ReaderControl {
    /// Ask the reader to exit at the next byte boundary.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the reader thread. Returns the transport error that ended it,
    /// if any.
    pub fn join(self) -> Result<ReaderStats, ReaderError> {
        match self.join.join() {
            Ok(result) => result.map_err(ReaderError::from),
            Err(_) => Err(ReaderError::Panicked),
        }
    }
}

pub struct ReaderHandle {
    frames: mpsc::Receiver<FrameResult>,
    control: ReaderControl,
}

impl ReaderHandle {
    /// Decoded frames, in arrival order. Ends when the reader exits.
    pub fn frames(&mut self) -> &mut mpsc::Receiver<FrameResult> {
        &mut self.frames
    }

    pub fn stop(&self) {
        self.control.stop();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.control.cancel_token()
    }

    pub fn into_parts(self) -> (mpsc::Receiver<FrameResult>, ReaderControl) {
        (self.frames, self.control)
    }

    /// Drop the receiver and wait for the reader thread.
    pub fn join(self) -> Result<ReaderStats, ReaderError> {
        let Self { frames, control } = self;
        drop(frames);
        control.join()
    }
}

/// Start a reader over `source` with a fresh cancel token.
pub fn spawn_reader<S>(source: S, config: ReaderConfig) -> Result<ReaderHandle, ReaderError>
where
    S: ByteSource + Send + 'static,
{
    spawn_reader_with(source, config, CancelToken::new())
}

/// Start a reader over `source`, stopped through `cancel`.
pub fn spawn_reader_with<S>(
    source: S,
    config: ReaderConfig,
    cancel: CancelToken,
) -> Result<ReaderHandle, ReaderError>
where
    S: ByteSource + Send + 'static,
{
    config.validate()?;

    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let framer = StreamFramer::with_limits(
        source,
        TicDecoder::new(config.mode),
        config.buffer_capacity,
        config.max_frame_len,
    );
    let token = cancel.clone();

    let join = thread::Builder::new()
        .name(READER_THREAD_NAME.to_string())
        .spawn(move || run(framer, tx, token))
        .map_err(|e| ReaderError::Spawn(e.to_string()))?;

    Ok(ReaderHandle {
        frames: rx,
        control: ReaderControl { cancel, join },
    })
}

fn run<S, D>(
    mut framer: StreamFramer<S, D>,
    mut tx: mpsc::Sender<FrameResult>,
    cancel: CancelToken,
) -> Result<ReaderStats, TransportError>
where
    S: ByteSource,
    D: Decoder,
{
    let mut stats = ReaderStats::default();
    tic_info!("Reader started: {}", framer.decoder().name());

    loop {
        match framer.next_frame_until(|| cancel.is_cancelled()) {
            Ok(Some(frame)) => {
                stats.record(&frame);
                if let Some(error) = &frame.error {
                    tic_warn!("Frame dropped: {} (group {:?})", error.message, error.details);
                } else if frame.invalid_groups() > 0 {
                    tic_debug!(
                        "Frame with {}/{} groups failing checksum",
                        frame.invalid_groups(),
                        frame.groups.len()
                    );
                }
                if block_on(tx.send(Ok(frame))).is_err() {
                    tic_info!("Frame receiver dropped, reader stopping");
                    return Ok(stats);
                }
            }
            Ok(None) => {
                tic_info!("Reader cancelled after {} frames", stats.frames);
                return Ok(stats);
            }
            Err(e) => {
                tic_error!("Reader stopped: {}", e);
                // Receiver may already be gone
                let _ = block_on(tx.send(Err(e.clone())));
                return Err(e);
            }
        }
    }
}
