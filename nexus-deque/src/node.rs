//! Queue nodes: an owned string plus its links.

use crate::Index;

/// A node in a queue's circular list.
///
/// Element nodes own exactly one `String`. A queue's sentinel is a node
/// with no value whose links point at the first and last element (or at
/// itself when the queue is empty). Users only see `&str` through the
/// queue's accessors; the links are an implementation detail.
#[derive(Debug)]
pub struct Node<Idx: Index = u32> {
    pub(crate) value: Option<String>,
    pub(crate) prev: Idx,
    pub(crate) next: Idx,
}

impl<Idx: Index> Node<Idx> {
    /// Creates an unlinked element node owning `value`.
    #[inline]
    pub(crate) fn element(value: String) -> Self {
        Self {
            value: Some(value),
            prev: Idx::NONE,
            next: Idx::NONE,
        }
    }

    /// Creates an unlinked sentinel.
    #[inline]
    pub(crate) fn sentinel() -> Self {
        Self {
            value: None,
            prev: Idx::NONE,
            next: Idx::NONE,
        }
    }

    /// Returns the element's value, or `None` for a sentinel.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns `true` if this node is a queue sentinel.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.value.is_none()
    }

    /// Byte view used for ordering. Sentinels never take part in
    /// comparisons and read as empty.
    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        self.value.as_deref().unwrap_or("").as_bytes()
    }

    #[inline]
    pub(crate) fn into_value(self) -> Option<String> {
        self.value
    }
}

/// Returns `true` if `a` and `b` agree over the shorter of their lengths.
///
/// This is the duplicate rule used by
/// [`Queue::delete_dup`](crate::Queue::delete_dup): `"ab"` and `"abc"`
/// count as duplicates, and so does the empty string with anything.
#[inline]
pub fn is_prefix_duplicate(a: &str, b: &str) -> bool {
    let n = a.len().min(b.len());
    a.as_bytes()[..n] == b.as_bytes()[..n]
}
