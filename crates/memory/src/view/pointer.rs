//! Typed guest pointers.
//!
//! A [`Pointer`] pairs a guest address with a [`GuestType`] describing how to decode and
//! encode the value stored there. Syscall handlers receive guest structure pointers as
//! plain addresses; wrapping them here keeps the byte layout in one place per type.

use std::fmt;
use std::marker::PhantomData;

use super::stream::MemoryStream;
use crate::common::error::Result;
use crate::space::AddressSpace;

/// A value with a fixed little-endian guest layout.
///
/// Implemented here for the primitive widths; collaborators implement it for the guest
/// structures they exchange with the HLE layer.
pub trait GuestType: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Decodes a value from the stream cursor.
    ///
    /// # Errors
    ///
    /// Any stream failure, typically `StreamOverrun` on a short window.
    fn read_from(stream: &mut MemoryStream<'_>) -> Result<Self>;

    /// Encodes `self` at the stream cursor.
    ///
    /// # Errors
    ///
    /// Any stream failure, typically `StreamOverrun` on a short window.
    fn write_to(&self, stream: &mut MemoryStream<'_>) -> Result<()>;
}

macro_rules! guest_primitive {
    ($ty:ty, $read:ident, $write:ident) => {
        impl GuestType for $ty {
            const SIZE: usize = size_of::<$ty>();

            fn read_from(stream: &mut MemoryStream<'_>) -> Result<Self> {
                stream.$read()
            }

            fn write_to(&self, stream: &mut MemoryStream<'_>) -> Result<()> {
                stream.$write(*self)
            }
        }
    };
}

guest_primitive!(u8, read_u8, write_u8);
guest_primitive!(i8, read_i8, write_i8);
guest_primitive!(u16, read_u16, write_u16);
guest_primitive!(i16, read_i16, write_i16);
guest_primitive!(u32, read_u32, write_u32);
guest_primitive!(i32, read_i32, write_i32);
guest_primitive!(f32, read_f32, write_f32);

/// A typed handle on a guest address.
///
/// Reads decode from a copy of the guest bytes. Writes encode into a scratch buffer and
/// store it with [`AddressSpace::write_bytes`], so write breakpoints see one bulk write.
pub struct Pointer<'a, T> {
    space: &'a mut AddressSpace,
    address: u32,
    _type: PhantomData<T>,
}

impl<'a, T: GuestType> Pointer<'a, T> {
    pub(crate) const fn new(space: &'a mut AddressSpace, address: u32) -> Self {
        Self {
            space,
            address,
            _type: PhantomData,
        }
    }

    /// The guest address this pointer refers to.
    pub const fn address(&self) -> u32 {
        self.address
    }

    /// Decodes the value at the pointer.
    ///
    /// # Errors
    ///
    /// Backend failures reading `T::SIZE` bytes, then any decoding failure.
    pub fn read(&self) -> Result<T> {
        let mut bytes = self.space.read_bytes(self.address, T::SIZE)?;
        T::read_from(&mut MemoryStream::new(&mut bytes))
    }

    /// Encodes `value` and stores it at the pointer.
    ///
    /// # Errors
    ///
    /// Any encoding failure, then backend failures storing the bytes.
    pub fn write(&mut self, value: &T) -> Result<()> {
        let mut bytes = vec![0u8; T::SIZE];
        value.write_to(&mut MemoryStream::new(&mut bytes))?;
        self.space.write_bytes(self.address, &bytes)
    }
}

impl<T> fmt::Debug for Pointer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pointer")
            .field("address", &format_args!("{:#010x}", self.address))
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
