//! Reader sizing constants
//!
//! **Before changing any constant:** check it against the frame sizes of real
//! meters. A historical "base" contract sends ~10 groups per frame, a
//! standard three-phase meter up to ~60.

/// Default depth of the frame channel
///
/// **Value**: 16 frames
///
/// **Rationale**: A historical meter emits one frame every ~1.5s, a standard
/// meter one every ~2s. 16 frames absorb ~30s of consumer stall before the
/// reader blocks and the serial driver starts buffering instead.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Upper bound accepted for the frame channel depth
pub const MAX_CHANNEL_CAPACITY: usize = 4096;

/// Default pre-allocation of the frame body buffer (bytes)
///
/// **Value**: 1024 bytes
///
/// **Rationale**: Standard mode frames run to ~900 bytes on three-phase
/// meters; historical frames stay under 300. The buffer still grows if a
/// frame is longer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Upper bound accepted for the frame body pre-allocation (bytes)
pub const MAX_BUFFER_CAPACITY: usize = 64 * 1024;

/// Default cap on a frame body without ETX (bytes)
///
/// **Value**: 16 KiB
///
/// **Rationale**: More than ten times the longest standard frame. A body
/// that grows past it means a lost ETX or a wrong line speed; the framer
/// drops it and waits for the next STX.
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024;

/// Upper bound accepted for the frame body cap (bytes)
pub const MAX_FRAME_LEN_LIMIT: usize = 1024 * 1024;

/// Name given to the reader thread
pub const READER_THREAD_NAME: &str = "tic-reader";
