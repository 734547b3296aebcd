use std::io::{self, BufReader, Read};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(String),
    #[error("End of stream")]
    EndOfStream,
}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => TransportError::EndOfStream,
            _ => TransportError::Io(e.to_string()),
        }
    }
}

/// Sequential, blocking byte input (serial port, capture file, socket).
///
/// `read_byte` may block indefinitely waiting on the device.
pub trait ByteSource {
    fn read_byte(&mut self) -> Result<u8, TransportError>;
}

/// Buffered [`ByteSource`] over any [`Read`] implementation.
pub struct IoSource<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, inner),
        }
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Err(TransportError::EndOfStream),
                Ok(_) => {
                    let [b] = byte;
                    return Ok(b);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_byte(&mut self) -> Result<u8, TransportError> {
        (**self).read_byte()
    }
}
