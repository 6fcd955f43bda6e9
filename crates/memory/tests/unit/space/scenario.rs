//! End-to-End Scenario.
//!
//! Allocates an address space, stores a word, reads it back, and checks the
//! content hash against the word-accumulation formula, on both backends.

use pspmem_core::config::BackendKind;
use pspmem_core::MemoryBase;
use rstest::rstest;

use crate::common::harness::TestContext;

#[rstest]
#[case::unified(BackendKind::Unified)]
#[case::segmented(BackendKind::Segmented)]
fn store_read_and_hash_a_word(#[case] kind: BackendKind) {
    let mut ctx = TestContext::new(kind);

    ctx.space.write_i32(0x0800_0010, 0x1234_ABCD).unwrap();
    assert_eq!(ctx.space.read_u32(0x0800_0010).unwrap(), 0x1234_ABCD);

    // One aligned word, index 0: (0 + word) ^ 0.
    let expected = (0i32).wrapping_add(0x1234_ABCD) ^ 0;
    assert_eq!(ctx.space.hash(0x0800_0010, 4).unwrap(), expected);
}

#[test]
fn syscall_style_round_trip() {
    let mut ctx = TestContext::segmented();
    let _ = ctx.space.add_watch(0x0880_0100);

    // A guest passes a path pointer and an output buffer.
    ctx.space.write_bytes(0x0880_0000, b"ms0:/PSP/GAME\0").unwrap();
    let path = ctx.space.read_stringz(0x4880_0000).unwrap();
    assert_eq!(path.as_deref(), Some("ms0:/PSP/GAME"));

    let mut out = ctx.space.get_pointer_stream(0x0880_0100, Some(8));
    out.write_u32(path.map_or(0, |p| p.len() as u32)).unwrap();
    out.write_u32(0xFFFF_FFFF).unwrap();
    assert_eq!(out.available(), 0);

    assert_eq!(ctx.space.read_u32(0x0880_0100).unwrap(), 13);
    assert_eq!(ctx.space.read_i32(0x0880_0104).unwrap(), -1);
}
