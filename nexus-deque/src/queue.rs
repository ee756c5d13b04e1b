//! Double-ended string queue on a sentinel circular list.
//!
//! A [`Queue`] is just a sentinel index and a cached length. Its nodes live
//! in external storage, so several queues can share one storage pool and
//! hand elements to each other by relinking instead of reallocating.
//!
//! # Storage Invariant
//!
//! A queue must always be used with the storage instance it was created
//! in. Passing a different storage is a contract violation; lookups that
//! miss panic with "invalid index".
//!
//! # Bounded vs Unbounded Storage
//!
//! ```
//! use nexus_deque::{BoxedQueueStorage, Queue};
//!
//! // Bounded storage - fallible insertion, running out of slots is an error
//! let mut storage: BoxedQueueStorage = BoxedQueueStorage::with_capacity(16);
//! let mut queue: Queue<BoxedQueueStorage> = Queue::try_new(&mut storage).unwrap();
//!
//! queue.try_push_tail(&mut storage, "b").unwrap();
//! queue.try_push_head(&mut storage, "a").unwrap();
//! assert_eq!(queue.pop_head(&mut storage).as_deref(), Some("a"));
//! ```
//!
//! ```
//! # #[cfg(feature = "slab")]
//! # {
//! use nexus_deque::{Queue, SlabQueueStorage};
//!
//! // Unbounded storage - infallible insertion
//! let mut storage = SlabQueueStorage::new();
//! let mut queue: Queue<SlabQueueStorage, usize> = Queue::new(&mut storage);
//!
//! queue.push_tail(&mut storage, "x");
//! assert_eq!(queue.len(), 1);
//! # }
//! ```

use std::marker::PhantomData;

use crate::link::{self, node};
use crate::{BoundedStorage, BoxedStorage, Full, Index, Node, Storage, UnboundedStorage};

/// Type alias for bounded queue storage backed by a boxed allocation.
pub type BoxedQueueStorage<Idx = u32> = BoxedStorage<Node<Idx>, Idx>;

/// Type alias for unbounded queue storage backed by `slab::Slab`.
#[cfg(feature = "slab")]
pub type SlabQueueStorage = slab::Slab<Node<usize>>;

/// A double-ended queue of owned strings over external storage.
///
/// The queue owns every element reachable from its sentinel. Elements
/// leave either by being popped (the string moves to the caller) or when
/// the queue is released with [`free`](Queue::free).
///
/// # Type Parameters
///
/// - `S`: Storage type (e.g., [`BoxedQueueStorage`])
/// - `Idx`: Index type (default `u32`)
#[derive(Debug)]
pub struct Queue<S, Idx: Index = u32>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    pub(crate) head: Idx,
    pub(crate) len: usize,
    _marker: PhantomData<S>,
}

// =============================================================================
// Base impl - works with any Storage
// =============================================================================

impl<S, Idx: Index> Queue<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    fn with_sentinel(storage: &mut S, head: Idx) -> Self {
        link::init_empty(storage, head);
        Self {
            head,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements, from the cached count.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue holds no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the sentinel's index.
    ///
    /// The sentinel occupies one storage slot for the queue's lifetime.
    #[inline]
    pub const fn sentinel(&self) -> Idx {
        self.head
    }

    /// Counts the elements by walking the whole cycle. O(n).
    pub fn size(&self, storage: &S) -> usize {
        let mut count = 0;
        let mut cur = link::next(storage, self.head);
        while cur != self.head {
            count += 1;
            cur = link::next(storage, cur);
        }
        count
    }

    // ========================================================================
    // Remove operations (unlink + release)
    // ========================================================================

    /// Unlinks `idx` and takes its value out of storage.
    pub(crate) fn release(&mut self, storage: &mut S, idx: Idx) -> Option<String> {
        link::unlink(storage, idx);
        self.len -= 1;
        storage.remove(idx).and_then(Node::into_value)
    }

    /// Removes and returns the first element.
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn pop_head(&mut self, storage: &mut S) -> Option<String> {
        let first = link::next(storage, self.head);
        if first == self.head {
            return None;
        }
        self.release(storage, first)
    }

    /// Removes and returns the last element.
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn pop_tail(&mut self, storage: &mut S) -> Option<String> {
        let last = link::prev(storage, self.head);
        if last == self.head {
            return None;
        }
        self.release(storage, last)
    }

    /// Removes the first element, also copying it into `buf`.
    ///
    /// At most `buf.len() - 1` bytes are copied and a NUL terminator is
    /// written after them, so a short buffer truncates the copy (possibly
    /// mid-character). An empty `buf` receives nothing. The full value is
    /// still returned.
    pub fn pop_head_into(&mut self, storage: &mut S, buf: &mut [u8]) -> Option<String> {
        let value = self.pop_head(storage)?;
        copy_truncated(&value, buf);
        Some(value)
    }

    /// Removes the last element, also copying it into `buf`.
    ///
    /// See [`pop_head_into`](Queue::pop_head_into) for the truncation rule.
    pub fn pop_tail_into(&mut self, storage: &mut S, buf: &mut [u8]) -> Option<String> {
        let value = self.pop_tail(storage)?;
        copy_truncated(&value, buf);
        Some(value)
    }

    /// Removes an element by index.
    ///
    /// Returns `None` if `idx` is not an element of this queue, including
    /// elements of other queues sharing the storage. O(n): membership is
    /// checked by walking to the owning sentinel.
    pub fn remove(&mut self, storage: &mut S, idx: Idx) -> Option<String> {
        if !self.contains(storage, idx) {
            return None;
        }
        self.release(storage, idx)
    }

    /// Returns `true` if `idx` is an element of this queue.
    ///
    /// Walks forward from `idx` to the first sentinel, so the cost is the
    /// distance to the tail.
    pub fn contains(&self, storage: &S, idx: Idx) -> bool {
        match storage.get(idx) {
            Some(node) if !node.is_sentinel() => {}
            _ => return false,
        }

        let mut cur = link::next(storage, idx);
        while !node(storage, cur).is_sentinel() {
            // Detached runs have no sentinel
            if cur == idx {
                return false;
            }
            cur = link::next(storage, cur);
        }
        cur == self.head
    }

    /// Releases every element, keeping the sentinel.
    pub fn clear(&mut self, storage: &mut S) {
        let mut cur = link::next(storage, self.head);
        while cur != self.head {
            let next = link::next(storage, cur);
            storage.remove(cur);
            cur = next;
        }
        link::init_empty(storage, self.head);
        self.len = 0;
    }

    /// Releases every element and then the sentinel, consuming the queue.
    ///
    /// Afterwards every storage slot the queue held is vacant again.
    pub fn free(mut self, storage: &mut S) {
        self.clear(storage);
        storage.remove(self.head);
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the value of the element at `idx`.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, idx: Idx) -> Option<&'a str>
    where
        Idx: 'a,
    {
        storage.get(idx).and_then(Node::value)
    }

    /// Returns the first element.
    #[inline]
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a str>
    where
        Idx: 'a,
    {
        node(storage, link::next(storage, self.head)).value()
    }

    /// Returns the last element.
    #[inline]
    pub fn back<'a>(&self, storage: &'a S) -> Option<&'a str>
    where
        Idx: 'a,
    {
        node(storage, link::prev(storage, self.head)).value()
    }

    /// Returns the index of the first element, or `None` if empty.
    #[inline]
    pub fn front_key(&self, storage: &S) -> Option<Idx> {
        let first = link::next(storage, self.head);
        (first != self.head).then_some(first)
    }

    /// Returns the index of the last element, or `None` if empty.
    #[inline]
    pub fn back_key(&self, storage: &S) -> Option<Idx> {
        let last = link::prev(storage, self.head);
        (last != self.head).then_some(last)
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Moves every element of `other` to the back of this queue.
    ///
    /// `other` is left empty. O(1).
    pub fn append(&mut self, storage: &mut S, other: &mut Self) {
        let last = link::prev(storage, self.head);
        link::splice(storage, other.head, last);
        self.len += other.len;
        other.len = 0;
    }

    /// Detaches every element as a `NONE`-terminated `next` chain.
    ///
    /// The queue is left empty; the chain's `prev` links are stale until
    /// it is handed back through [`attach_chain`](Queue::attach_chain).
    pub(crate) fn detach_chain(&mut self, storage: &mut S) -> Idx {
        if link::is_empty(storage, self.head) {
            return Idx::NONE;
        }
        let first = link::next(storage, self.head);
        let last = link::prev(storage, self.head);
        link::set_next(storage, last, Idx::NONE);
        link::init_empty(storage, self.head);
        self.len = 0;
        first
    }

    /// Links a `NONE`-terminated chain into this (empty) queue, in chain
    /// order or reversed. Returns the number of elements attached.
    pub(crate) fn attach_chain(&mut self, storage: &mut S, chain: Idx, reversed: bool) -> usize {
        debug_assert!(link::is_empty(storage, self.head));

        let mut count = 0;
        let mut last = self.head;
        let mut cur = chain;
        while cur.is_some() {
            let following = link::next(storage, cur);
            if reversed {
                link::set_next(storage, cur, last);
                link::set_prev(storage, last, cur);
            } else {
                link::set_prev(storage, cur, last);
                link::set_next(storage, last, cur);
            }
            last = cur;
            cur = following;
            count += 1;
        }

        if reversed {
            link::set_prev(storage, last, self.head);
            link::set_next(storage, self.head, last);
        } else {
            link::set_next(storage, last, self.head);
            link::set_prev(storage, self.head, last);
        }

        self.len = count;
        count
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks the circular-list invariant and the cached length.
    ///
    /// Walks the cycle both ways; every hop must be mirrored by its back
    /// link and both walks must count [`len`](Queue::len) elements.
    pub fn check_links(&self, storage: &S) -> bool {
        link::check_cycle(storage, self.head) == Some(self.len)
    }

    /// Returns `true` if the elements are in non-decreasing byte order, or
    /// non-increasing when `descend` is set.
    ///
    /// [`delete_dup`](Queue::delete_dup) assumes a sorted queue; this is the
    /// check for that precondition.
    pub fn is_sorted(&self, storage: &S, descend: bool) -> bool {
        let mut iter = self.iter(storage);
        let Some(mut prev) = iter.next() else {
            return true;
        };
        for value in iter {
            let ordered = if descend {
                prev.as_bytes() >= value.as_bytes()
            } else {
                prev.as_bytes() <= value.as_bytes()
            };
            if !ordered {
                return false;
            }
            prev = value;
        }
        true
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over the values, head to tail.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, S, Idx> {
        let (front, back) = self.ends(storage);
        Iter {
            storage,
            front,
            back,
        }
    }

    /// Returns an iterator over element indices, head to tail.
    ///
    /// Indices are stable across every relinking operation, so they can
    /// be used to follow an element through sorts and reversals.
    #[inline]
    pub fn keys<'a>(&self, storage: &'a S) -> Keys<'a, S, Idx> {
        let (front, back) = self.ends(storage);
        Keys {
            storage,
            front,
            back,
        }
    }

    fn ends(&self, storage: &S) -> (Idx, Idx) {
        match (self.front_key(storage), self.back_key(storage)) {
            (Some(front), Some(back)) => (front, back),
            _ => (Idx::NONE, Idx::NONE),
        }
    }

    /// Returns a cursor positioned at the first element.
    ///
    /// The cursor allows removal during iteration.
    #[inline]
    pub fn cursor_front<'a>(&'a mut self, storage: &'a mut S) -> Cursor<'a, S, Idx> {
        let current = link::next(storage, self.head);
        Cursor {
            queue: self,
            storage,
            current,
        }
    }

    /// Returns a cursor positioned at the last element.
    #[inline]
    pub fn cursor_back<'a>(&'a mut self, storage: &'a mut S) -> Cursor<'a, S, Idx> {
        let current = link::prev(storage, self.head);
        Cursor {
            queue: self,
            storage,
            current,
        }
    }
}

fn copy_truncated(value: &str, buf: &mut [u8]) {
    let Some(room) = buf.len().checked_sub(1) else {
        return;
    };
    let n = value.len().min(room);
    buf[..n].copy_from_slice(&value.as_bytes()[..n]);
    buf[n] = 0;
}

// =============================================================================
// Bounded storage impl - fallible insertion
// =============================================================================

impl<S, Idx: Index> Queue<S, Idx>
where
    S: BoundedStorage<Node<Idx>, Index = Idx>,
{
    /// Creates an empty queue, taking one storage slot for its sentinel.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(()))` if storage has no free slot.
    pub fn try_new(storage: &mut S) -> Result<Self, Full<()>> {
        let head = storage.try_insert(Node::sentinel()).map_err(|_| Full(()))?;
        Ok(Self::with_sentinel(storage, head))
    }

    /// Pushes a value to the front of the queue.
    ///
    /// Returns the index of the new element.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full; the queue is unchanged.
    #[inline]
    pub fn try_push_head(
        &mut self,
        storage: &mut S,
        value: impl Into<String>,
    ) -> Result<Idx, Full<String>> {
        let idx = try_alloc(storage, value.into())?;
        link::link_after(storage, idx, self.head);
        self.len += 1;
        Ok(idx)
    }

    /// Pushes a value to the back of the queue.
    ///
    /// Returns the index of the new element.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full; the queue is unchanged.
    #[inline]
    pub fn try_push_tail(
        &mut self,
        storage: &mut S,
        value: impl Into<String>,
    ) -> Result<Idx, Full<String>> {
        let idx = try_alloc(storage, value.into())?;
        let last = link::prev(storage, self.head);
        link::link_after(storage, idx, last);
        self.len += 1;
        Ok(idx)
    }
}

#[inline]
fn try_alloc<S, Idx>(storage: &mut S, value: String) -> Result<Idx, Full<String>>
where
    S: BoundedStorage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    storage
        .try_insert(Node::element(value))
        .map_err(|Full(node)| Full(node.into_value().unwrap_or_default()))
}

// =============================================================================
// Unbounded storage impl - infallible insertion
// =============================================================================

impl<S, Idx: Index> Queue<S, Idx>
where
    S: UnboundedStorage<Node<Idx>, Index = Idx>,
{
    /// Creates an empty queue, taking one storage slot for its sentinel.
    pub fn new(storage: &mut S) -> Self {
        let head = storage.insert(Node::sentinel());
        Self::with_sentinel(storage, head)
    }

    /// Pushes a value to the front of the queue, returning its index.
    #[inline]
    pub fn push_head(&mut self, storage: &mut S, value: impl Into<String>) -> Idx {
        let idx = storage.insert(Node::element(value.into()));
        link::link_after(storage, idx, self.head);
        self.len += 1;
        idx
    }

    /// Pushes a value to the back of the queue, returning its index.
    #[inline]
    pub fn push_tail(&mut self, storage: &mut S, value: impl Into<String>) -> Idx {
        let idx = storage.insert(Node::element(value.into()));
        let last = link::prev(storage, self.head);
        link::link_after(storage, idx, last);
        self.len += 1;
        idx
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// A cursor over a queue that can remove the element it points at.
///
/// The cursor is exhausted once it steps onto the sentinel; moving an
/// exhausted cursor does nothing. Removal advances to the next element, so
/// a forward scan never revisits or skips a node.
///
/// # Example
///
/// ```
/// use nexus_deque::{BoxedQueueStorage, Queue};
///
/// let mut storage = BoxedQueueStorage::with_capacity(8);
/// let mut queue: Queue<BoxedQueueStorage> = Queue::try_new(&mut storage).unwrap();
/// for s in ["keep", "drop", "keep"] {
///     queue.try_push_tail(&mut storage, s).unwrap();
/// }
///
/// let mut cursor = queue.cursor_front(&mut storage);
/// while let Some(value) = cursor.current() {
///     if value == "drop" {
///         cursor.remove_current();
///     } else {
///         cursor.move_next();
///     }
/// }
/// assert_eq!(queue.len(), 2);
/// ```
pub struct Cursor<'a, S, Idx: Index>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    queue: &'a mut Queue<S, Idx>,
    storage: &'a mut S,
    current: Idx,
}

impl<S, Idx: Index> Cursor<'_, S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Returns the current element.
    ///
    /// Returns `None` if the cursor is exhausted.
    #[inline]
    pub fn current(&self) -> Option<&str> {
        node(&*self.storage, self.current).value()
    }

    /// Returns the current element's index, or `None` if exhausted.
    #[inline]
    pub fn key(&self) -> Option<Idx> {
        (!self.is_exhausted()).then_some(self.current)
    }

    /// Returns `true` if the cursor has stepped off either end.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.current == self.queue.head
    }

    /// Advances toward the tail.
    #[inline]
    pub fn move_next(&mut self) {
        if !self.is_exhausted() {
            self.current = link::next(&*self.storage, self.current);
        }
    }

    /// Steps toward the head.
    #[inline]
    pub fn move_prev(&mut self) {
        if !self.is_exhausted() {
            self.current = link::prev(&*self.storage, self.current);
        }
    }

    /// Peeks at the element after the current one.
    #[inline]
    pub fn peek_next(&self) -> Option<&str> {
        if self.is_exhausted() {
            return None;
        }
        node(&*self.storage, link::next(&*self.storage, self.current)).value()
    }

    /// Peeks at the element before the current one.
    #[inline]
    pub fn peek_prev(&self) -> Option<&str> {
        if self.is_exhausted() {
            return None;
        }
        node(&*self.storage, link::prev(&*self.storage, self.current)).value()
    }

    /// Removes the current element and advances to the next.
    ///
    /// Returns the removed value, or `None` if the cursor is exhausted.
    #[inline]
    pub fn remove_current(&mut self) -> Option<String> {
        if self.is_exhausted() {
            return None;
        }
        let idx = self.current;
        self.current = link::next(&*self.storage, idx);
        self.queue.release(self.storage, idx)
    }

    /// Removes the element before the current one, staying in place.
    ///
    /// Returns `None` if the cursor is exhausted or at the first element.
    #[inline]
    pub fn remove_prev(&mut self) -> Option<String> {
        if self.is_exhausted() {
            return None;
        }
        let before = link::prev(&*self.storage, self.current);
        if before == self.queue.head {
            return None;
        }
        self.queue.release(self.storage, before)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over queue values.
pub struct Iter<'a, S, Idx: Index> {
    storage: &'a S,
    front: Idx,
    back: Idx,
}

impl<'a, S, Idx: Index + 'a> Iterator for Iter<'a, S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front.is_none() {
            return None;
        }

        let node = node(self.storage, self.front);

        // Met in the middle
        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.front = node.next;
        }

        node.value()
    }
}

impl<'a, S, Idx: Index + 'a> DoubleEndedIterator for Iter<'a, S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back.is_none() {
            return None;
        }

        let node = node(self.storage, self.back);

        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.back = node.prev;
        }

        node.value()
    }
}

/// Iterator over element indices.
pub struct Keys<'a, S, Idx: Index> {
    storage: &'a S,
    front: Idx,
    back: Idx,
}

impl<S, Idx: Index> Iterator for Keys<'_, S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    type Item = Idx;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front.is_none() {
            return None;
        }

        let key = self.front;
        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.front = link::next(self.storage, key);
        }

        Some(key)
    }
}

impl<S, Idx: Index> DoubleEndedIterator for Keys<'_, S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back.is_none() {
            return None;
        }

        let key = self.back;
        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.back = link::prev(self.storage, key);
        }

        Some(key)
    }
}
