//! Integration tests for the reader thread
//!
//! These tests drive the full pipeline (byte source → framer → decoder →
//! channel) from an async consumer.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]

use core_types::{ByteSource, IoSource, ProtocolMode, TransportError};
use futures::stream::StreamExt;
use runtime::{spawn_reader, spawn_reader_with, CancelToken, ReaderConfig, ReaderError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const HISTORICAL_STREAM: &[u8] = b"noise\x03\
    \x02\nADCO 012345678901 E\r\nOPTARIF BASE 0\r\x03\
    \x02\nADCO\r\x03\
    \x02\nISOUSC 45 ?\r\nIINST 002 Z\r\x03";

/// Repeats one frame forever and counts reads.
struct LoopingSource {
    frame: &'static [u8],
    reads: Arc<AtomicUsize>,
}

impl ByteSource for LoopingSource {
    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        self.frame
            .get(n % self.frame.len())
            .copied()
            .ok_or(TransportError::EndOfStream)
    }
}

/// Yields its bytes, then fails with an I/O error.
struct FailingSource {
    bytes: &'static [u8],
    pos: usize,
}

impl ByteSource for FailingSource {
    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let b = self
            .bytes
            .get(self.pos)
            .copied()
            .ok_or_else(|| TransportError::Io("device unplugged".into()))?;
        self.pos += 1;
        Ok(b)
    }
}

#[tokio::test]
async fn test_frames_arrive_in_order_then_end_of_stream() {
    let mut handle = spawn_reader(
        IoSource::new(HISTORICAL_STREAM),
        ReaderConfig::new(ProtocolMode::Historical),
    )
    .expect("Should spawn reader");

    let first = handle.frames().next().await.unwrap().unwrap();
    assert_eq!(first.groups.len(), 2);
    assert_eq!(first.groups[0].label, "ADCO");
    assert!(first.groups.iter().all(|g| g.valid));

    let second = handle.frames().next().await.unwrap().unwrap();
    assert!(second.is_error());
    assert_eq!(second.error.as_ref().unwrap().details, "ADCO");

    let third = handle.frames().next().await.unwrap().unwrap();
    assert_eq!(third.groups.len(), 2);
    assert!(third.groups[0].valid);
    assert!(!third.groups[1].valid);
    assert!(third.timestamp >= first.timestamp);

    let end = handle.frames().next().await.unwrap();
    assert_eq!(end, Err(TransportError::EndOfStream));
    assert!(handle.frames().next().await.is_none());

    match handle.join() {
        Err(ReaderError::Transport(TransportError::EndOfStream)) => {}
        other => panic!("Expected end of stream, got {:?}", other),
    }
}

#[tokio::test]
async fn test_io_error_is_surfaced_once() {
    let source = FailingSource {
        bytes: b"\x02\nOPTARIF BASE 0\r\x03\x02\nISOU",
        pos: 0,
    };
    let (mut frames, control) = spawn_reader(source, ReaderConfig::default())
        .unwrap()
        .into_parts();

    let frame = frames.next().await.unwrap().unwrap();
    assert_eq!(frame.groups[0].label, "OPTARIF");

    match frames.next().await {
        Some(Err(TransportError::Io(msg))) => assert!(msg.contains("unplugged")),
        other => panic!("Expected Io error, got {:?}", other),
    }
    assert!(frames.next().await.is_none());
    assert!(matches!(
        control.join(),
        Err(ReaderError::Transport(TransportError::Io(_)))
    ));
}

#[tokio::test]
async fn test_standard_mode_reader() {
    let stream: &'static [u8] = b"\x02\nADSC\t041876097468\tI\r\nSMAXSN\tH250221001022\t02560\t+\r\x03";
    let mut handle = spawn_reader(
        IoSource::new(stream),
        ReaderConfig::new(ProtocolMode::Standard),
    )
    .unwrap();

    let frame = handle.frames().next().await.unwrap().unwrap();
    let smaxsn = frame.get("SMAXSN").unwrap();
    assert_eq!(smaxsn.horodate.as_deref(), Some("H250221001022"));
    assert!(smaxsn.valid);
    assert_eq!(frame.invalid_groups(), 0);
}

#[tokio::test]
async fn test_max_frame_len_drops_runaway_frame() {
    // The first body runs past the cap before its ETX arrives
    let mut stream = b"\x02\nADCO ".to_vec();
    stream.extend(std::iter::repeat(b'9').take(512));
    stream.extend_from_slice(b"\x03\x02\nOPTARIF BASE 0\r\x03");

    let mut config = ReaderConfig::new(ProtocolMode::Historical);
    config.max_frame_len = 128;
    let mut handle = spawn_reader(IoSource::new(std::io::Cursor::new(stream)), config).unwrap();

    let frame = handle.frames().next().await.unwrap().unwrap();
    assert_eq!(frame.groups.len(), 1);
    assert_eq!(frame.groups[0].label, "OPTARIF");
    assert_eq!(
        handle.frames().next().await.unwrap(),
        Err(TransportError::EndOfStream)
    );
}

#[tokio::test]
async fn test_stop_ends_stream() {
    let reads = Arc::new(AtomicUsize::new(0));
    let source = LoopingSource {
        frame: b"\x02\nPAPP 00350 )\r\x03",
        reads: reads.clone(),
    };
    let mut config = ReaderConfig::new(ProtocolMode::Historical);
    config.channel_capacity = 2;
    let mut handle = spawn_reader(source, config).unwrap();

    let frame = handle.frames().next().await.unwrap().unwrap();
    assert_eq!(frame.groups[0].data, "00350");

    handle.stop();
    // Drain whatever was already published; the stream must end
    let mut drained = 0;
    while let Some(item) = handle.frames().next().await {
        assert!(item.is_ok());
        drained += 1;
    }
    assert!(drained <= 4);

    let stats = handle.join().expect("Cancelled reader should finish cleanly");
    assert!(stats.frames >= 1);
    assert_eq!(stats.error_frames, 0);

    // The source is never read after the reader exits
    let after = reads.load(Ordering::SeqCst);
    std::thread::sleep(std::time::Duration::from_millis(20));
    assert_eq!(reads.load(Ordering::SeqCst), after);
}

#[tokio::test]
async fn test_pre_cancelled_reader_never_reads() {
    let reads = Arc::new(AtomicUsize::new(0));
    let source = LoopingSource {
        frame: b"\x02\nPAPP 00350 )\r\x03",
        reads: reads.clone(),
    };
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut handle = spawn_reader_with(source, ReaderConfig::default(), cancel).unwrap();
    assert!(handle.frames().next().await.is_none());

    let stats = handle.join().unwrap();
    assert_eq!(stats.frames, 0);
    assert_eq!(reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_dropped_receiver_stops_reader() {
    let source = LoopingSource {
        frame: b"\x02\nPAPP 00350 )\r\x03",
        reads: Arc::new(AtomicUsize::new(0)),
    };
    let handle = spawn_reader(source, ReaderConfig::default()).unwrap();

    // No consumer ever reads; join drops the receiver
    let stats = handle.join().expect("Reader should exit once the receiver is gone");
    assert!(stats.frames >= 1);
}
