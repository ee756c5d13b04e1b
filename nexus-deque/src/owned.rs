//! OwnedQueue - a queue that owns its storage.
//!
//! Use [`OwnedQueue`] when one queue is all you need and there is no
//! reason to share a storage pool: no `&mut storage` on every call, and
//! dropping the queue releases every element. Use [`Queue`] with external
//! storage when elements have to move between queues, e.g. for
//! [`merge`](crate::merge).

use crate::{BoxedQueueStorage, Full, Index, Iter, Queue};

/// A double-ended string queue that owns its storage.
///
/// # Example
///
/// ```
/// use nexus_deque::OwnedQueue;
///
/// let mut queue: OwnedQueue = OwnedQueue::with_capacity(8);
/// for s in ["b", "a", "c"] {
///     queue.try_push_tail(s).unwrap();
/// }
///
/// queue.sort(false);
/// assert_eq!(queue.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
/// assert_eq!(queue.pop_head().as_deref(), Some("a"));
/// ```
#[derive(Debug)]
pub struct OwnedQueue<Idx: Index = u32> {
    storage: BoxedQueueStorage<Idx>,
    queue: Queue<BoxedQueueStorage<Idx>, Idx>,
}

impl<Idx: Index> OwnedQueue<Idx> {
    /// Creates a queue with room for at least `capacity` elements.
    ///
    /// One extra slot is reserved for the sentinel, then the total is
    /// rounded up to the next power of 2.
    ///
    /// # Panics
    ///
    /// Panics if the rounded capacity exceeds the index type's maximum.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut storage = BoxedQueueStorage::<Idx>::with_capacity(capacity + 1);
        let queue =
            Queue::try_new(&mut storage).expect("fresh storage has a slot for the sentinel");
        Self { storage, queue }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns how many elements fit, not counting the sentinel's slot.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity() - 1
    }

    /// Counts the elements by walking the list. O(n).
    #[inline]
    pub fn size(&self) -> usize {
        self.queue.size(&self.storage)
    }

    /// Pushes a value to the front.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the queue is at capacity.
    #[inline]
    pub fn try_push_head(&mut self, value: impl Into<String>) -> Result<Idx, Full<String>> {
        self.queue.try_push_head(&mut self.storage, value)
    }

    /// Pushes a value to the back.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the queue is at capacity.
    #[inline]
    pub fn try_push_tail(&mut self, value: impl Into<String>) -> Result<Idx, Full<String>> {
        self.queue.try_push_tail(&mut self.storage, value)
    }

    /// Removes and returns the first element.
    #[inline]
    pub fn pop_head(&mut self) -> Option<String> {
        self.queue.pop_head(&mut self.storage)
    }

    /// Removes and returns the last element.
    #[inline]
    pub fn pop_tail(&mut self) -> Option<String> {
        self.queue.pop_tail(&mut self.storage)
    }

    /// Removes the first element, also copying it NUL-terminated into `buf`.
    #[inline]
    pub fn pop_head_into(&mut self, buf: &mut [u8]) -> Option<String> {
        self.queue.pop_head_into(&mut self.storage, buf)
    }

    /// Removes the last element, also copying it NUL-terminated into `buf`.
    #[inline]
    pub fn pop_tail_into(&mut self, buf: &mut [u8]) -> Option<String> {
        self.queue.pop_tail_into(&mut self.storage, buf)
    }

    /// Returns the first element.
    #[inline]
    pub fn front(&self) -> Option<&str> {
        self.queue.front(&self.storage)
    }

    /// Returns the last element.
    #[inline]
    pub fn back(&self) -> Option<&str> {
        self.queue.back(&self.storage)
    }

    /// Returns an iterator over the values, head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, BoxedQueueStorage<Idx>, Idx> {
        self.queue.iter(&self.storage)
    }

    /// Releases every element.
    #[inline]
    pub fn clear(&mut self) {
        self.queue.clear(&mut self.storage);
    }

    /// See [`Queue::delete_mid`].
    #[inline]
    pub fn delete_mid(&mut self) -> bool {
        self.queue.delete_mid(&mut self.storage)
    }

    /// See [`Queue::delete_dup`].
    #[inline]
    pub fn delete_dup(&mut self) -> usize {
        self.queue.delete_dup(&mut self.storage)
    }

    /// See [`Queue::swap`].
    #[inline]
    pub fn swap(&mut self) {
        self.queue.swap(&mut self.storage);
    }

    /// See [`Queue::reverse`].
    #[inline]
    pub fn reverse(&mut self) {
        self.queue.reverse(&mut self.storage);
    }

    /// See [`Queue::reverse_k`].
    #[inline]
    pub fn reverse_k(&mut self, k: isize) {
        self.queue.reverse_k(&mut self.storage, k);
    }

    /// See [`Queue::ascend`].
    #[inline]
    pub fn ascend(&mut self) -> usize {
        self.queue.ascend(&mut self.storage)
    }

    /// See [`Queue::descend`].
    #[inline]
    pub fn descend(&mut self) -> usize {
        self.queue.descend(&mut self.storage)
    }

    /// See [`Queue::sort`].
    #[inline]
    pub fn sort(&mut self, descend: bool) {
        self.queue.sort(&mut self.storage, descend);
    }

    /// See [`Queue::check_links`].
    #[inline]
    pub fn check_links(&self) -> bool {
        self.queue.check_links(&self.storage)
    }
}
