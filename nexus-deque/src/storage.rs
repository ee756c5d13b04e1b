//! Slab-style arenas with stable indices.
//!
//! Queue nodes live in storage and refer to each other by index, so a
//! node can be unlinked, moved to another queue, or spliced elsewhere
//! without touching the allocator. Nothing is freed until a node is
//! explicitly removed from storage.

use crate::Index;

/// Slab-like storage with stable indices.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable indices**: an index remains valid until explicitly removed
/// - **O(1)** remove and get
/// - **Slot reuse**: removed slots can be reused by future inserts
///
/// Insertion lives in [`BoundedStorage`] or [`UnboundedStorage`] depending
/// on whether the storage can run out of room.
pub trait Storage<T> {
    /// Index type for this storage.
    type Index: Index;

    /// Removes and returns the value at `index`, if present.
    fn remove(&mut self, index: Self::Index) -> Option<T>;

    /// Returns a reference to the value at `index`, if present.
    fn get(&self, index: Self::Index) -> Option<&T>;

    /// Returns a mutable reference to the value at `index`, if present.
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage with a fixed number of slots.
///
/// Running out of slots is the recoverable form of allocation failure:
/// the rejected value is handed back inside [`Full`].
pub trait BoundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its stable index.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if every slot is occupied.
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Full<T>>;

    /// Returns the total number of slots.
    fn capacity(&self) -> usize;
}

/// Storage that grows on demand.
pub trait UnboundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its stable index.
    fn insert(&mut self, value: T) -> Self::Index;
}

/// Error returned when fixed-capacity storage is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// BoxedStorage - runtime capacity, single slot allocation, LIFO free stack
// =============================================================================

#[derive(Debug)]
enum Slot<T> {
    Vacant,
    Occupied(T),
}

/// Fixed-capacity storage with runtime-determined size.
///
/// One boxed slice of slots plus a stack of vacant indices. Capacity is
/// rounded up to the next power of 2 and never changes afterwards, so
/// inserting into a full storage fails instead of reallocating.
///
/// # Example
///
/// ```
/// use nexus_deque::{BoundedStorage, BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<String> = BoxedStorage::with_capacity(1000);
/// assert_eq!(storage.capacity(), 1024);
///
/// let idx = storage.try_insert("hello".to_string()).unwrap();
/// assert_eq!(storage.get(idx).map(String::as_str), Some("hello"));
/// ```
#[derive(Debug)]
pub struct BoxedStorage<T, Idx: Index = u32> {
    slots: Box<[Slot<T>]>,
    /// Vacant indices; the top of the stack is handed out next.
    free: Vec<Idx>,
}

impl<T, Idx: Index> BoxedStorage<T, Idx> {
    /// Creates storage with at least `min_capacity` slots.
    ///
    /// Actual capacity is rounded up to the next power of 2.
    ///
    /// # Panics
    ///
    /// Panics if `min_capacity` is 0 or exceeds the index type's maximum.
    pub fn with_capacity(min_capacity: usize) -> Self {
        assert!(min_capacity > 0, "capacity must be > 0");

        let capacity = min_capacity.next_power_of_two();
        assert!(
            capacity <= Idx::SLOTS,
            "capacity exceeds index type maximum"
        );

        let slots = (0..capacity).map(|_| Slot::Vacant).collect();
        // Reversed so the lowest index is handed out first
        let free = (0..capacity).rev().map(Idx::from_slot).collect();

        Self { slots, free }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.len() == self.slots.len()
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Removes all elements from storage.
    ///
    /// # Warning
    ///
    /// Any queue still holding indices into this storage is left dangling.
    /// Release or forget those queues first. [`OwnedQueue`](crate::OwnedQueue)
    /// handles this itself.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Vacant;
        }
        self.free.clear();
        self.free
            .extend((0..self.slots.len()).rev().map(Idx::from_slot));
    }
}

impl<T, Idx: Index> Storage<T> for BoxedStorage<T, Idx> {
    type Index = Idx;

    #[inline]
    fn remove(&mut self, index: Self::Index) -> Option<T> {
        let slot = self.slots.get_mut(index.slot())?;
        match core::mem::replace(slot, Slot::Vacant) {
            Slot::Occupied(value) => {
                self.free.push(index);
                Some(value)
            }
            Slot::Vacant => None,
        }
    }

    #[inline]
    fn get(&self, index: Self::Index) -> Option<&T> {
        match self.slots.get(index.slot())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T> {
        match self.slots.get_mut(index.slot())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant => None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        BoxedStorage::len(self)
    }
}

impl<T, Idx: Index> BoundedStorage<T> for BoxedStorage<T, Idx> {
    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Full<T>> {
        let Some(index) = self.free.pop() else {
            return Err(Full(value));
        };
        self.slots[index.slot()] = Slot::Occupied(value);
        Ok(index)
    }

    #[inline]
    fn capacity(&self) -> usize {
        BoxedStorage::capacity(self)
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Index = usize;

    #[inline]
    fn remove(&mut self, index: Self::Index) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: Self::Index) -> Option<&T> {
        slab::Slab::get(self, index)
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T> {
        slab::Slab::get_mut(self, index)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}

#[cfg(feature = "slab")]
impl<T> UnboundedStorage<T> for slab::Slab<T> {
    #[inline]
    fn insert(&mut self, value: T) -> Self::Index {
        slab::Slab::insert(self, value)
    }
}
