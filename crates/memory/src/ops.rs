//! Derived operations over the typed access contract.
//!
//! Everything here is written against [`MemoryBase`] alone, so it runs unchanged on either
//! backend store, on the [`AddressSpace`](crate::AddressSpace) facade, or on a test double.
//! It provides:
//! 1. **Content Hash:** The checksum the HLE layer uses to fingerprint guest code regions.
//! 2. **String Reads:** Zero-terminated Latin-1 strings with a bounded scan.
//! 3. **Copies:** Owned reads of guest ranges and bounds-checked host-to-host copies.
//!
//! None of these functions write guest memory, so none of them interact with breakpoints.

use crate::backend::MemoryBase;
use crate::common::addr::{is_null, mask};
use crate::common::constants::HASH_TAIL_WEIGHT;
use crate::common::error::{MemoryError, Result};

/// Resolves `[address, address + length)` to masked `u32` bounds.
///
/// # Errors
///
/// `OutOfBounds` if the length does not fit the 32-bit address space.
pub fn span(address: u32, length: usize) -> Result<(u32, u32)> {
    let low = mask(address);
    u32::try_from(length)
        .ok()
        .and_then(|length| low.checked_add(length))
        .map(|high| (low, high))
        .ok_or(MemoryError::OutOfBounds { address, length })
}

/// Hashes `count` bytes of aligned words starting at `address_aligned`.
///
/// `count` is in bytes and is truncated to whole words. Each word `n` folds into the
/// accumulator as `acc = (acc + word) ^ n` in wrapping 32-bit signed arithmetic.
///
/// # Errors
///
/// `Unmapped` if a word cannot be resolved.
pub fn hash_word_count<M>(memory: &M, address_aligned: u32, count: u32) -> Result<i32>
where
    M: MemoryBase + ?Sized,
{
    let first = address_aligned >> 2;
    let words = count >> 2;

    let mut result: i32 = 0;
    for n in 0..words {
        let word = memory.read_u32_word(first.wrapping_add(n))?;
        result = result.wrapping_add(word as i32) ^ (n as i32);
    }
    Ok(result)
}

/// Content hash of `count` bytes at `address`.
///
/// Leading bytes up to the first word boundary are summed, the aligned middle goes
/// through [`hash_word_count`], and trailing bytes are summed with a weight of 7. The
/// result is a pure function of the covered bytes. All sums wrap in 32-bit signed
/// arithmetic.
///
/// # Errors
///
/// `Unmapped` if a covered byte or word cannot be resolved.
///
/// # Examples
///
/// ```
/// use pspmem_core::{AddressSpace, MemoryBase, ops};
///
/// let mut space = AddressSpace::segmented().unwrap();
/// space.write_u32(0x0880_0000, 0x1234_ABCD).unwrap();
///
/// let first = ops::hash(&space, 0x0880_0000, 16).unwrap();
/// assert_eq!(first, ops::hash(&space, 0x0880_0000, 16).unwrap());
/// ```
pub fn hash<M>(memory: &M, address: u32, count: u32) -> Result<i32>
where
    M: MemoryBase + ?Sized,
{
    let mut address = address;
    let mut count = count;
    let mut result: i32 = 0;

    while address & 3 != 0 && count > 0 {
        result = result.wrapping_add(i32::from(memory.read_u8(address)?));
        address = address.wrapping_add(1);
        count -= 1;
    }

    let middle = count & !3;
    result = result.wrapping_add(hash_word_count(memory, address, middle)?);
    address = address.wrapping_add(middle);
    count -= middle;

    while count > 0 {
        let byte = i32::from(memory.read_u8(address)?);
        result = result.wrapping_add(byte.wrapping_mul(HASH_TAIL_WEIGHT));
        address = address.wrapping_add(1);
        count -= 1;
    }

    Ok(result)
}

/// Reads a zero-terminated string, mapping each byte to the code point of the same value.
///
/// Returns `Ok(None)` for the null pointer. The scan never runs past the end of the
/// buffer that owns `address`.
///
/// # Errors
///
/// * `Unmapped` if no backend region contains `address`.
/// * `UnterminatedString` if no zero byte is found before the end of the owning buffer.
pub fn read_stringz<M>(memory: &M, address: u32) -> Result<Option<String>>
where
    M: MemoryBase + ?Sized,
{
    if is_null(address) {
        return Ok(None);
    }
    let available = memory.available_after_address(address)?;
    let (low, high) = span(address, available)?;
    let bytes = memory.slice(low, high)?;
    let end = bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or(MemoryError::UnterminatedString { address })?;
    Ok(Some(latin1(&bytes[..end])))
}

/// Decodes bytes as Latin-1.
pub(crate) fn latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Returns an owned copy of `length` bytes at `address`.
///
/// # Errors
///
/// `OutOfBounds` if the range overflows the space, otherwise any
/// [`MemoryBase::slice`] failure.
pub fn read_bytes<M>(memory: &M, address: u32, length: usize) -> Result<Vec<u8>>
where
    M: MemoryBase + ?Sized,
{
    let (low, high) = span(address, length)?;
    Ok(memory.slice(low, high)?.to_vec())
}

/// Copies `length` bytes between two host buffers.
///
/// Unrelated to the guest space; used by collaborators shuffling file and stream data.
///
/// # Errors
///
/// `HostBuffer` if either range falls outside its buffer.
pub fn memory_copy(
    source: &[u8],
    source_position: usize,
    destination: &mut [u8],
    destination_position: usize,
    length: usize,
) -> Result<()> {
    let error = MemoryError::HostBuffer {
        length,
        source_len: source.len(),
        destination_len: destination.len(),
    };
    let src = source_position
        .checked_add(length)
        .and_then(|end| source.get(source_position..end));
    let Some(src) = src else {
        return Err(error);
    };
    let dst = destination_position
        .checked_add(length)
        .and_then(|end| destination.get_mut(destination_position..end));
    let Some(dst) = dst else {
        return Err(error);
    };
    dst.copy_from_slice(src);
    Ok(())
}
