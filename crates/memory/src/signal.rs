//! Change notification.
//!
//! A `Signal<T>` is an explicit list of subscribers that the owner dispatches to by hand.
//! The address space owns two: one for "a range of guest data changed" and one for
//! "everything changed". Nothing in this crate emits them on its own; the loader and
//! syscall layers call [`AddressSpace::notify_invalidate_range`](crate::AddressSpace::notify_invalidate_range)
//! and [`AddressSpace::notify_invalidate_all`](crate::AddressSpace::notify_invalidate_all)
//! after bulk writes that caches downstream (decoded code, textures) need to know about.

use std::fmt;

/// Handle returned by [`Signal::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A half-open range of guest addresses `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NumericRange {
    /// Inclusive start address.
    pub start: u32,
    /// Exclusive end address.
    pub end: u32,
}

impl NumericRange {
    /// Creates a range from its bounds.
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a range from a start address and a length.
    pub const fn from_len(start: u32, length: u32) -> Self {
        Self {
            start,
            end: start.wrapping_add(length),
        }
    }

    /// Number of addresses covered.
    pub const fn len(&self) -> u32 {
        self.end.wrapping_sub(self.start)
    }

    /// Returns `true` if the range covers nothing.
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns `true` if `address` lies in `[start, end)`.
    pub const fn contains(&self, address: u32) -> bool {
        address >= self.start && address < self.end
    }
}

type Subscriber<T> = Box<dyn FnMut(&T) + Send>;

/// An ordered list of subscribers notified with a borrowed payload.
pub struct Signal<T> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
}

impl<T> Signal<T> {
    /// Creates a signal with no subscribers.
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Registers `f`; subscribers are notified in registration order.
    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Removes the subscriber registered under `id`. Returns `false` if it was not present.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Notifies every subscriber with `payload`.
    pub fn dispatch(&mut self, payload: &T) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(payload);
        }
    }

    /// Number of live subscribers.
    pub const fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nobody is subscribed.
    pub const fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("next_id", &self.next_id)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
