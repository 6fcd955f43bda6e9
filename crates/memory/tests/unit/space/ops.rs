//! Bulk Operation Tests.
//!
//! Verifies copy, fill, bulk and stream writes, string reads, hashing,
//! reset, and dumps, including how many breakpoint scans each one runs.

use pretty_assertions::assert_eq;
use pspmem_core::common::constants::{DUMP_SIZE, MAINMEM_BASE};
use pspmem_core::config::{BackendKind, Config};
use pspmem_core::{AddressSpace, MemoryBase, MemoryError};
use rstest::rstest;
use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::common::harness::TestContext;

const BASE: u32 = 0x0880_0000;

/// Registers a counting action on every byte address in `[start, start + len)`.
fn count_scans(space: &mut AddressSpace, start: u32, len: u32) -> Arc<AtomicUsize> {
    let hits = Arc::new(AtomicUsize::new(0));
    for address in start..start + len {
        let hits = Arc::clone(&hits);
        let _ = space.add_write_action(address, move |_, _| {
            let _ = hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
    }
    hits
}

// ══════════════════════════════════════════════════════════
// 1. Copy
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::unified(BackendKind::Unified)]
#[case::segmented(BackendKind::Segmented)]
fn copy_duplicates_range(#[case] kind: BackendKind) {
    let mut ctx = TestContext::new(kind).with_bytes(BASE, &[1, 2, 3, 4, 5, 6]);
    ctx.space.copy(BASE, BASE + 0x100, 6).unwrap();
    assert_eq!(ctx.space.read_bytes(BASE + 0x100, 6).unwrap(), vec![1, 2, 3, 4, 5, 6]);
}

#[rstest]
#[case::unified(BackendKind::Unified)]
#[case::segmented(BackendKind::Segmented)]
fn copy_handles_overlap(#[case] kind: BackendKind) {
    let mut ctx = TestContext::new(kind).with_bytes(BASE, &[1, 2, 3, 4, 5, 6]);
    ctx.space.copy(BASE, BASE + 2, 4).unwrap();
    assert_eq!(ctx.space.read_bytes(BASE, 6).unwrap(), vec![1, 2, 1, 2, 3, 4]);

    ctx.space.copy(BASE + 2, BASE, 4).unwrap();
    assert_eq!(ctx.space.read_bytes(BASE, 6).unwrap(), vec![1, 2, 3, 4, 3, 4]);
}

#[test]
fn copy_across_segments() {
    let mut ctx = TestContext::segmented().with_bytes(0x0001_0000, b"spad");
    ctx.space.copy(0x0001_0000, 0x0400_0000, 4).unwrap();
    assert_eq!(ctx.space.read_bytes(0x0400_0000, 4).unwrap(), b"spad".to_vec());
}

#[rstest]
#[case(0)]
#[case(-1)]
#[case(i32::MIN)]
fn copy_non_positive_is_noop(#[case] length: i32) {
    let mut ctx = TestContext::segmented().with_bytes(BASE, &[9]);
    let hits = count_scans(&mut ctx.space, BASE + 0x10, 1);
    ctx.space.copy(BASE, BASE + 0x10, length).unwrap();
    assert_eq!(ctx.space.read_u8(BASE + 0x10).unwrap(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn copy_scans_destination_once() {
    let mut ctx = TestContext::segmented();
    let dst = count_scans(&mut ctx.space, BASE + 0x100, 8);
    let src = count_scans(&mut ctx.space, BASE, 8);
    ctx.space.copy(BASE, BASE + 0x100, 8).unwrap();
    assert_eq!(dst.load(Ordering::SeqCst), 8);
    assert_eq!(src.load(Ordering::SeqCst), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Fill and bulk writes
// ══════════════════════════════════════════════════════════

#[test]
fn memset_fills_low_byte() {
    let mut ctx = TestContext::segmented();
    ctx.space.memset(BASE, 0x1AB, 4).unwrap();
    assert_eq!(ctx.space.read_u32(BASE).unwrap(), 0xABAB_ABAB);
    assert_eq!(ctx.space.read_u8(BASE + 4).unwrap(), 0);
}

#[test]
fn memset_runs_a_single_scan() {
    let mut ctx = TestContext::segmented();
    let inside = count_scans(&mut ctx.space, BASE + 0x80, 1);
    let outside = count_scans(&mut ctx.space, BASE + 0x100, 1);
    ctx.space.memset(BASE, 0xFF, 0x100).unwrap();
    assert_eq!(inside.load(Ordering::SeqCst), 1);
    assert_eq!(outside.load(Ordering::SeqCst), 0);
}

#[test]
fn memset_non_positive_is_noop() {
    let mut ctx = TestContext::segmented().with_bytes(BASE, &[7]);
    ctx.space.memset(BASE, 0, -4).unwrap();
    assert_eq!(ctx.space.read_u8(BASE).unwrap(), 7);
}

#[test]
fn write_bytes_fires_each_covered_breakpoint_once() {
    let mut ctx = TestContext::unified();
    let hits = count_scans(&mut ctx.space, BASE, 4);
    ctx.space.write_bytes(BASE, &[1, 2, 3, 4]).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 4);
    assert_eq!(ctx.space.read_u32(BASE).unwrap(), 0x0403_0201);
}

#[test]
fn write_bytes_rejects_segment_crossing() {
    let mut ctx = TestContext::segmented();
    assert!(matches!(
        ctx.space.write_bytes(0x041F_FFFE, &[1, 2, 3, 4]),
        Err(MemoryError::SegmentCrossing { .. })
    ));
}

#[test]
fn write_u8_array_scans_once() {
    let mut ctx = TestContext::segmented();
    let hits = count_scans(&mut ctx.space, BASE + 1, 1);
    ctx.space.write_u8_array(BASE, &[0xAA, 0xBB, 0xCC]).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.space.read_bytes(BASE, 3).unwrap(), vec![0xAA, 0xBB, 0xCC]);
}

#[test]
fn write_u8_array_fails_at_first_unmapped_byte() {
    let mut ctx = TestContext::segmented();
    let err = ctx
        .space
        .write_u8_array(0x041F_FFFE, &[1, 2, 3])
        .unwrap_err();
    assert!(matches!(err, MemoryError::Unmapped { address: 0x0420_0000 }));
    assert_eq!(ctx.space.read_u8(0x041F_FFFF).unwrap(), 2);
}

#[test]
fn write_u8_array_scans_written_prefix_before_failing() {
    let mut ctx = TestContext::segmented();
    let hits = count_scans(&mut ctx.space, 0x09FF_FFFE, 2);
    let err = ctx
        .space
        .write_u8_array(0x09FF_FFFE, &[0xAA, 0xBB, 0xCC, 0xDD])
        .unwrap_err();
    assert!(matches!(err, MemoryError::Unmapped { address: 0x0A00_0000 }));
    assert_eq!(ctx.space.read_u8(0x09FF_FFFE).unwrap(), 0xAA);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

// ══════════════════════════════════════════════════════════
// 3. Stream writes
// ══════════════════════════════════════════════════════════

#[test]
fn write_stream_copies_reader() {
    let mut ctx = TestContext::segmented();
    let written = ctx.space.write_stream(BASE, &b"stream"[..]).unwrap();
    assert_eq!(written, 6);
    assert_eq!(ctx.space.read_bytes(BASE, 6).unwrap(), b"stream".to_vec());
}

#[test]
fn write_stream_fires_per_byte_and_once_more() {
    let mut ctx = TestContext::segmented();
    let hits = count_scans(&mut ctx.space, BASE + 2, 1);
    let _ = ctx.space.write_stream(BASE, &[0u8; 4][..]).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

struct FailingReader(usize);

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0 == 0 {
            return Err(io::Error::other("source gone"));
        }
        let n = self.0.min(buf.len());
        buf[..n].fill(0x11);
        self.0 -= n;
        Ok(n)
    }
}

#[test]
fn write_stream_propagates_reader_errors() {
    let mut ctx = TestContext::segmented();
    let err = ctx.space.write_stream(BASE, FailingReader(2)).unwrap_err();
    assert!(matches!(err, MemoryError::Io(_)));
    assert_eq!(ctx.space.read_u16(BASE).unwrap(), 0x1111);
}

// ══════════════════════════════════════════════════════════
// 4. Strings and hashing
// ══════════════════════════════════════════════════════════

#[test]
fn read_stringz_basic() {
    let ctx = TestContext::segmented().with_bytes(BASE, &[0x68, 0x69, 0x00]);
    assert_eq!(ctx.space.read_stringz(BASE).unwrap().as_deref(), Some("hi"));
    assert_eq!(ctx.space.read_stringz(0).unwrap(), None);
}

#[test]
fn read_stringz_stops_at_segment_end() {
    let ctx = TestContext::segmented().with_bytes(0x0001_3FFE, b"ab");
    assert!(matches!(
        ctx.space.read_stringz(0x0001_3FFE),
        Err(MemoryError::UnterminatedString { .. })
    ));
}

#[test]
fn read_stringz_unmapped() {
    let ctx = TestContext::segmented();
    assert!(matches!(
        ctx.space.read_stringz(0x0C00_0000),
        Err(MemoryError::Unmapped { .. })
    ));
}

#[rstest]
#[case::unified(BackendKind::Unified)]
#[case::segmented(BackendKind::Segmented)]
fn hash_is_deterministic_and_sensitive(#[case] kind: BackendKind) {
    let mut ctx = TestContext::new(kind).with_words(BASE, &[0x1234_ABCD, 0xDEAD_BEEF, 7, 9]);
    let first = ctx.space.hash(BASE + 1, 14).unwrap();
    assert_eq!(ctx.space.hash(BASE + 1, 14).unwrap(), first);

    ctx.space.write_u8(BASE + 6, 0x00).unwrap();
    assert_ne!(ctx.space.hash(BASE + 1, 14).unwrap(), first);
}

#[test]
fn hash_agrees_across_backends() {
    let words = [0x0102_0304, 0xFFFF_0000, 0x8000_0001, 0x1234_5678];
    let unified = TestContext::unified().with_words(BASE, &words);
    let segmented = TestContext::segmented().with_words(BASE, &words);
    for (address, count) in [(BASE, 16), (BASE + 3, 11), (BASE + 1, 2)] {
        assert_eq!(
            unified.space.hash(address, count).unwrap(),
            segmented.space.hash(address, count).unwrap()
        );
    }
}

#[test]
fn hash_word_count_matches_middle_run() {
    let ctx = TestContext::segmented().with_words(BASE, &[1, 2, 3]);
    assert_eq!(ctx.space.hash_word_count(BASE, 12).unwrap(), 7);
    assert_eq!(ctx.space.hash(BASE, 12).unwrap(), 7);
}

// ══════════════════════════════════════════════════════════
// 5. Reset, host copies, and dumps
// ══════════════════════════════════════════════════════════

#[test]
fn reset_clears_frame_buffer_only() {
    let mut ctx = TestContext::segmented()
        .with_words(0x0400_0000, &[0xFFFF_FFFF])
        .with_words(0x041F_FFFC, &[0xFFFF_FFFF])
        .with_words(BASE, &[0xFFFF_FFFF]);
    ctx.space.reset().unwrap();
    assert_eq!(ctx.space.read_u32(0x0400_0000).unwrap(), 0);
    assert_eq!(ctx.space.read_u32(0x041F_FFFC).unwrap(), 0);
    assert_eq!(ctx.space.read_u32(BASE).unwrap(), 0xFFFF_FFFF);
}

#[test]
fn memory_copy_is_host_only() {
    let mut destination = [0u8; 4];
    AddressSpace::memory_copy(b"abcd", 2, &mut destination, 1, 2).unwrap();
    assert_eq!(&destination, b"\0cd\0");
}

#[test]
fn dump_writes_main_memory_raw() {
    let ctx = TestContext::segmented()
        .with_words(MAINMEM_BASE, &[0x0403_0201])
        .with_words(MAINMEM_BASE + DUMP_SIZE as u32 - 4, &[0xDDCC_BBAA]);
    let mut out = Vec::new();
    ctx.space.dump(&mut out).unwrap();
    assert_eq!(out.len(), DUMP_SIZE);
    assert_eq!(&out[..4], &[1, 2, 3, 4]);
    assert_eq!(&out[DUMP_SIZE - 4..], &[0xAA, 0xBB, 0xCC, 0xDD]);
}

#[test]
fn dump_to_path_uses_configured_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.memory.backend = BackendKind::Segmented;
    config.debug.dump_path = dir.path().join("ram.bin").to_string_lossy().into_owned();
    let ctx = TestContext::with_config(&config).with_bytes(MAINMEM_BASE, b"PSP");

    let path = ctx.space.dump_to_path(None).unwrap();
    assert_eq!(path, dir.path().join("ram.bin"));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), DUMP_SIZE);
    assert_eq!(&bytes[..3], b"PSP");
}

#[test]
fn dump_to_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("explicit.bin");
    let ctx = TestContext::unified();
    let path = ctx.space.dump_to_path(Some(target.as_path())).unwrap();
    assert_eq!(path, target);
    assert_eq!(std::fs::metadata(&target).unwrap().len(), DUMP_SIZE as u64);
}
