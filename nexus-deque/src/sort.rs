//! Stable merge sort over detached node chains.
//!
//! Sorting unhooks the sentinel and works on a plain chain: elements linked
//! through `next` only, terminated by `Idx::NONE`. The helpers below are
//! stateless; they take chain heads and return chain heads, and never touch
//! `prev` links. [`Queue::attach_chain`] rebuilds those afterwards.
//!
//! Values compare as bytes, which for UTF-8 is the same as `str` ordering.

use core::cmp::Ordering;

use crate::link::{self, node};
use crate::{Index, Node, Queue, Storage};

impl<S, Idx: Index> Queue<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Sorts the queue in ascending byte order, or descending when
    /// `descend` is set.
    ///
    /// Top-down merge sort on the detached chain: O(n log n) comparisons,
    /// O(log n) recursion depth, no storage allocation. Equal elements keep
    /// their relative order when ascending; descending is the exact reverse
    /// of the ascending result.
    pub fn sort(&mut self, storage: &mut S, descend: bool) {
        if self.len < 2 {
            return;
        }

        let chain = self.detach_chain(storage);
        let sorted = merge_sort(storage, chain);
        let count = self.attach_chain(storage, sorted, descend);

        tracing::trace!(count, descend, "sorted queue");
    }
}

#[inline]
fn compare<S, Idx>(storage: &S, a: Idx, b: Idx) -> Ordering
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    node(storage, a).bytes().cmp(node(storage, b).bytes())
}

/// Sorts a `NONE`-terminated chain, returning its new head.
pub(crate) fn merge_sort<S, Idx>(storage: &mut S, head: Idx) -> Idx
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    if head.is_none() || link::next(storage, head).is_none() {
        return head;
    }

    let mid = split(storage, head);
    let left = merge_sort(storage, head);
    let right = merge_sort(storage, mid);
    merge_chains(storage, left, right)
}

/// Cuts a chain of two or more nodes in half, returning the head of the
/// second half. The first half keeps the extra node on odd lengths.
pub(crate) fn split<S, Idx>(storage: &mut S, head: Idx) -> Idx
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    let mut slow = head;
    let mut fast = link::next(storage, head);
    while fast.is_some() {
        let after = link::next(storage, fast);
        if after.is_none() {
            break;
        }
        slow = link::next(storage, slow);
        fast = link::next(storage, after);
    }

    let mid = link::next(storage, slow);
    link::set_next(storage, slow, Idx::NONE);
    mid
}

/// Merges two sorted chains into one, returning its head.
///
/// On equal values the node from `left` goes first, which keeps the merge
/// stable when `left` holds the earlier elements.
pub(crate) fn merge_chains<S, Idx>(storage: &mut S, mut left: Idx, mut right: Idx) -> Idx
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    if left.is_none() {
        return right;
    }
    if right.is_none() {
        return left;
    }

    let head = if compare(storage, left, right) != Ordering::Greater {
        let taken = left;
        left = link::next(storage, left);
        taken
    } else {
        let taken = right;
        right = link::next(storage, right);
        taken
    };

    let mut tail = head;
    while left.is_some() && right.is_some() {
        let taken = if compare(storage, left, right) != Ordering::Greater {
            let taken = left;
            left = link::next(storage, left);
            taken
        } else {
            let taken = right;
            right = link::next(storage, right);
            taken
        };
        link::set_next(storage, tail, taken);
        tail = taken;
    }

    let rest = if left.is_some() { left } else { right };
    link::set_next(storage, tail, rest);
    head
}
