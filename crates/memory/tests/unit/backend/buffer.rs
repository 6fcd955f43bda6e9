//! Guest Buffer Unit Tests.
//!
//! Verifies allocation, zero initialisation, and little-endian
//! read/write at byte, half-word, and word width.

use pspmem_core::backend::buffer::GuestBuffer;

// ══════════════════════════════════════════════════════════
// 1. Allocation and size
// ══════════════════════════════════════════════════════════

#[test]
fn buffer_allocation_size() {
    let buf = GuestBuffer::new(4096).unwrap();
    assert_eq!(buf.len(), 4096);
    assert!(!buf.is_empty());
}

#[test]
fn buffer_initial_zeroed() {
    let buf = GuestBuffer::new(256).unwrap();
    assert!(buf.as_slice().iter().all(|&b| b == 0));
}

// ══════════════════════════════════════════════════════════
// 2. Typed read/write
// ══════════════════════════════════════════════════════════

#[test]
fn buffer_write_read_u8() {
    let mut buf = GuestBuffer::new(256).unwrap();
    buf.write_u8(0, 0xAB);
    buf.write_u8(255, 0xCD);
    assert_eq!(buf.read_u8(0), 0xAB);
    assert_eq!(buf.read_u8(255), 0xCD);
}

#[test]
fn buffer_words_are_little_endian() {
    let mut buf = GuestBuffer::new(16).unwrap();
    buf.write_u32(4, 0xDEAD_BEEF);
    assert_eq!(&buf.as_slice()[4..8], &[0xEF, 0xBE, 0xAD, 0xDE]);
    assert_eq!(buf.read_u16(4), 0xBEEF);
    assert_eq!(buf.read_u16(6), 0xDEAD);
    assert_eq!(buf.read_u32(4), 0xDEAD_BEEF);
}

#[test]
fn buffer_half_word_write() {
    let mut buf = GuestBuffer::new(16).unwrap();
    buf.write_u16(2, 0x1234);
    assert_eq!(buf.read_u8(2), 0x34);
    assert_eq!(buf.read_u8(3), 0x12);
}

#[test]
fn buffer_mut_slice_writes_through() {
    let mut buf = GuestBuffer::new(8).unwrap();
    buf.as_mut_slice()[..4].copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(buf.read_u32(0), 0x0403_0201);
}
