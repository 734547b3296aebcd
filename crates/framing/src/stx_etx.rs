use crate::Framer;
use core_types::{ETX, STX};

/// Longest frame body kept before the framer gives up on a missing ETX.
pub const DEFAULT_MAX_BODY_LEN: usize = 16 * 1024;

/// Position of the framer relative to the STX…ETX delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    OutsideFrame,
    InsideFrame,
}

/// Buffers the bytes between STX and ETX and emits them as one body.
///
/// STX always (re)starts a frame, even in the middle of one, so a truncated
/// frame is dropped as soon as the next one begins. Everything seen outside a
/// frame is discarded.
///
/// A body that reaches `max_body_len` without an ETX is dropped and the
/// framer waits for the next STX.
pub struct StxEtxFramer {
    state: FrameState,
    buffer: Vec<u8>,
    max_body_len: usize,
}

impl StxEtxFramer {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_limits(capacity, DEFAULT_MAX_BODY_LEN)
    }

    /// `capacity` pre-sizes the body buffer, `max_body_len` bounds it.
    pub fn with_limits(capacity: usize, max_body_len: usize) -> Self {
        Self {
            state: FrameState::OutsideFrame,
            buffer: Vec::with_capacity(capacity.min(max_body_len)),
            max_body_len,
        }
    }

    pub fn max_body_len(&self) -> usize {
        self.max_body_len
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Feed one byte. Returns the frame body when `byte` is the closing ETX.
    pub fn accept(&mut self, byte: u8) -> Option<Vec<u8>> {
        match (self.state, byte) {
            (FrameState::InsideFrame, STX) => {
                log::debug!(
                    "STX inside frame, discarding {} buffered bytes",
                    self.buffer.len()
                );
                self.buffer.clear();
                None
            }
            (FrameState::OutsideFrame, STX) => {
                self.buffer.clear();
                self.state = FrameState::InsideFrame;
                None
            }
            (FrameState::InsideFrame, ETX) => {
                self.state = FrameState::OutsideFrame;
                let body = self.buffer.clone();
                self.buffer.clear();
                Some(body)
            }
            (FrameState::InsideFrame, _) if self.buffer.len() >= self.max_body_len => {
                log::debug!(
                    "No ETX within {} bytes, discarding frame",
                    self.max_body_len
                );
                self.buffer.clear();
                self.state = FrameState::OutsideFrame;
                None
            }
            (FrameState::InsideFrame, b) => {
                self.buffer.push(b);
                None
            }
            (FrameState::OutsideFrame, ETX) => {
                log::debug!("ETX outside frame ignored");
                None
            }
            (FrameState::OutsideFrame, _) => None,
        }
    }
}

impl Default for StxEtxFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer for StxEtxFramer {
    fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        bytes.iter().filter_map(|&b| self.accept(b)).collect()
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.state = FrameState::OutsideFrame;
    }

    fn name(&self) -> &'static str {
        "STX/ETX"
    }
}
