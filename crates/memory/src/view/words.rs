//! Half-word views.
//!
//! `WordView` reinterprets a byte slice of guest memory as little-endian 16-bit elements
//! without copying. Used for CLUTs, vertex indices, and UTF-16 strings handed to syscalls.
//! A trailing odd byte is not addressable through the view.

/// A little-endian `u16` view over borrowed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordView<B> {
    bytes: B,
}

impl<B: AsRef<[u8]>> WordView<B> {
    /// Wraps `bytes`.
    pub const fn new(bytes: B) -> Self {
        Self { bytes }
    }

    /// Number of whole half-words.
    pub fn len(&self) -> usize {
        self.bytes.as_ref().len() / 2
    }

    /// Returns `true` if no whole half-word fits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<u16> {
        let start = index.checked_mul(2)?;
        let raw = self.bytes.as_ref().get(start..start.checked_add(2)?)?;
        Some(u16::from_le_bytes([raw[0], raw[1]]))
    }

    /// Iterates the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.bytes
            .as_ref()
            .chunks_exact(2)
            .map(|raw| u16::from_le_bytes([raw[0], raw[1]]))
    }

    /// Underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Unwraps the byte slice.
    pub fn into_inner(self) -> B {
        self.bytes
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> WordView<B> {
    /// Stores `value` at `index`. Returns `false` if `index` is out of range.
    ///
    /// Writes go straight into guest memory and do not fire write breakpoints.
    pub fn set(&mut self, index: usize, value: u16) -> bool {
        let Some((start, end)) = index
            .checked_mul(2)
            .and_then(|start| Some((start, start.checked_add(2)?)))
        else {
            return false;
        };
        let Some(raw) = self.bytes.as_mut().get_mut(start..end) else {
            return false;
        };
        raw.copy_from_slice(&value.to_le_bytes());
        true
    }
}
