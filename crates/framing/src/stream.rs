use crate::stx_etx::{StxEtxFramer, DEFAULT_MAX_BODY_LEN};
use core_types::{ByteSource, Decoder, Frame, TransportError};

/// Reads a byte source one byte at a time and decodes every complete frame.
///
/// This is the only blocking part of the pipeline: it suspends inside
/// [`ByteSource::read_byte`]. Read failures are returned as is, without retry.
pub struct StreamFramer<S, D> {
    source: S,
    decoder: D,
    framer: StxEtxFramer,
    finished: bool,
}

impl<S: ByteSource, D: Decoder> StreamFramer<S, D> {
    pub fn new(source: S, decoder: D) -> Self {
        Self::with_capacity(source, decoder, 1024)
    }

    /// `capacity` pre-sizes the frame body buffer.
    pub fn with_capacity(source: S, decoder: D, capacity: usize) -> Self {
        Self::with_limits(source, decoder, capacity, DEFAULT_MAX_BODY_LEN)
    }

    /// Bodies longer than `max_body_len` are dropped without being decoded.
    pub fn with_limits(source: S, decoder: D, capacity: usize, max_body_len: usize) -> Self {
        Self {
            source,
            decoder,
            framer: StxEtxFramer::with_limits(capacity, max_body_len),
            finished: false,
        }
    }

    /// Blocks until the next ETX and returns the decoded frame.
    pub fn next_frame(&mut self) -> Result<Frame, TransportError> {
        loop {
            let byte = self.source.read_byte()?;
            if let Some(body) = self.framer.accept(byte) {
                return Ok(self.decoder.decode(&body));
            }
        }
    }

    /// Like [`next_frame`](Self::next_frame), but checks `stop` before every
    /// byte read. Returns `Ok(None)` as soon as it fires; the source is not
    /// read again by this call.
    pub fn next_frame_until<F>(&mut self, mut stop: F) -> Result<Option<Frame>, TransportError>
    where
        F: FnMut() -> bool,
    {
        loop {
            if stop() {
                return Ok(None);
            }
            let byte = self.source.read_byte()?;
            if let Some(body) = self.framer.accept(byte) {
                return Ok(Some(self.decoder.decode(&body)));
            }
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

/// Yields frames until the first transport error, which is yielded once.
impl<S: ByteSource, D: Decoder> Iterator for StreamFramer<S, D> {
    type Item = Result<Frame, TransportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_frame();
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}
