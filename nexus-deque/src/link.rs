//! Circular doubly linked list primitive over storage indices.
//!
//! Every list is a cycle through a sentinel node: the sentinel's `next` is
//! the first element and its `prev` the last; an empty list is a sentinel
//! linked to itself. Each function here preserves the cycle invariant
//! (`n.next.prev == n` and `n.prev.next == n`) for every node it touches.
//!
//! Nothing in this module allocates or frees. Releasing a node is the
//! caller's job, after it has been unlinked.

use crate::{Index, Node, Storage};

#[inline]
pub(crate) fn node<S, Idx>(storage: &S, idx: Idx) -> &Node<Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    storage.get(idx).expect("invalid index")
}

#[inline]
fn node_mut<S, Idx>(storage: &mut S, idx: Idx) -> &mut Node<Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    storage.get_mut(idx).expect("invalid index")
}

#[inline]
pub(crate) fn next<S, Idx>(storage: &S, idx: Idx) -> Idx
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    node(storage, idx).next
}

#[inline]
pub(crate) fn prev<S, Idx>(storage: &S, idx: Idx) -> Idx
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    node(storage, idx).prev
}

#[inline]
pub(crate) fn set_next<S, Idx>(storage: &mut S, idx: Idx, to: Idx)
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    node_mut(storage, idx).next = to;
}

#[inline]
pub(crate) fn set_prev<S, Idx>(storage: &mut S, idx: Idx, to: Idx)
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    node_mut(storage, idx).prev = to;
}

/// Makes `idx` a cycle of one: an empty list when `idx` is a sentinel.
#[inline]
pub(crate) fn init_empty<S, Idx>(storage: &mut S, idx: Idx)
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    let node = node_mut(storage, idx);
    node.prev = idx;
    node.next = idx;
}

#[inline]
pub(crate) fn is_empty<S, Idx>(storage: &S, sentinel: Idx) -> bool
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    next(storage, sentinel) == sentinel
}

/// Links `new` immediately after `existing`.
#[inline]
pub(crate) fn link_after<S, Idx>(storage: &mut S, new: Idx, existing: Idx)
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    let after = next(storage, existing);

    let node = node_mut(storage, new);
    node.prev = existing;
    node.next = after;

    set_next(storage, existing, new);
    set_prev(storage, after, new);
}

/// Removes `idx` from its cycle, closing the gap. The node is left linked
/// to itself so a second unlink is harmless.
#[inline]
pub(crate) fn unlink<S, Idx>(storage: &mut S, idx: Idx)
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    let node = node(storage, idx);
    let (before, after) = (node.prev, node.next);

    set_next(storage, before, after);
    set_prev(storage, after, before);
    init_empty(storage, idx);
}

/// Moves every element of the list at `src` to just after `dest`,
/// preserving order. `src` is left empty.
pub(crate) fn splice<S, Idx>(storage: &mut S, src: Idx, dest: Idx)
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    if is_empty(storage, src) {
        return;
    }

    let first = next(storage, src);
    let last = prev(storage, src);
    let after = next(storage, dest);

    set_prev(storage, first, dest);
    set_next(storage, dest, first);
    set_next(storage, last, after);
    set_prev(storage, after, last);

    init_empty(storage, src);
}

/// A detached run of nodes produced by [`cut`].
///
/// The run is its own cycle (`last.next == first`) without a sentinel, so
/// it stays structurally valid while it is out of any list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Run<Idx> {
    first: Idx,
    last: Idx,
}

impl<Idx: Index> Run<Idx> {
    #[cfg(test)]
    #[inline]
    pub(crate) fn first(&self) -> Idx {
        self.first
    }

    #[inline]
    pub(crate) fn last(&self) -> Idx {
        self.last
    }

    /// Reverses the run in place; `first` and `last` trade places.
    pub(crate) fn reverse<S>(&mut self, storage: &mut S)
    where
        S: Storage<Node<Idx>, Index = Idx>,
    {
        reverse_cycle(storage, self.first);
        core::mem::swap(&mut self.first, &mut self.last);
    }
}

/// Detaches the nodes from `start` up to, but not including, `end`.
///
/// `start` and `end` must be distinct members of the same cycle with
/// `start` reachable from `end`'s predecessor side, i.e. the run must not
/// wrap past `end`. The remaining list is closed around the gap.
pub(crate) fn cut<S, Idx>(storage: &mut S, start: Idx, end: Idx) -> Run<Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    debug_assert!(start != end, "cut of an empty run");

    let before = prev(storage, start);
    let last = prev(storage, end);

    set_next(storage, before, end);
    set_prev(storage, end, before);

    set_prev(storage, start, last);
    set_next(storage, last, start);

    Run { first: start, last }
}

/// Links a detached run immediately after `dest`.
pub(crate) fn splice_run<S, Idx>(storage: &mut S, run: Run<Idx>, dest: Idx)
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    let after = next(storage, dest);

    set_next(storage, dest, run.first);
    set_prev(storage, run.first, dest);
    set_next(storage, run.last, after);
    set_prev(storage, after, run.last);
}

/// Swaps `next` and `prev` on every node of the cycle through `start`.
///
/// Applied to a sentinel this reverses the whole list, sentinel included.
pub(crate) fn reverse_cycle<S, Idx>(storage: &mut S, start: Idx)
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    let mut cur = start;
    loop {
        let node = node_mut(storage, cur);
        core::mem::swap(&mut node.prev, &mut node.next);
        // The old `next` now sits in `prev`
        cur = node.prev;
        if cur == start {
            break;
        }
    }
}

/// Walks the cycle through `sentinel` in both directions, checking that
/// every hop is mirrored by its back link.
///
/// Returns the number of element nodes, or `None` if a link is broken,
/// a node is missing from storage, or the walk does not close.
pub(crate) fn check_cycle<S, Idx>(storage: &S, sentinel: Idx) -> Option<usize>
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    // A valid cycle cannot be longer than the storage holding it
    let limit = storage.len();

    let walk = |forward: bool| -> Option<usize> {
        let mut count = 0;
        let mut cur = sentinel;
        loop {
            let node = storage.get(cur)?;
            let hop = if forward { node.next } else { node.prev };
            let back = storage.get(hop)?;
            let mirrored = if forward { back.prev } else { back.next };
            if mirrored != cur {
                return None;
            }
            if hop == sentinel {
                return Some(count);
            }
            if back.is_sentinel() {
                return None;
            }
            count += 1;
            if count >= limit {
                return None;
            }
            cur = hop;
        }
    };

    let forward = walk(true)?;
    let backward = walk(false)?;
    (forward == backward).then_some(forward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoundedStorage, BoxedStorage};

    type TestStorage = BoxedStorage<Node<u32>, u32>;

    fn list(storage: &mut TestStorage, values: &[&str]) -> u32 {
        let sentinel = storage.try_insert(Node::sentinel()).unwrap();
        init_empty(storage, sentinel);
        for v in values {
            let idx = storage.try_insert(Node::element(v.to_string())).unwrap();
            let last = prev(storage, sentinel);
            link_after(storage, idx, last);
        }
        sentinel
    }

    fn values(storage: &TestStorage, sentinel: u32) -> Vec<String> {
        let mut out = Vec::new();
        let mut cur = next(storage, sentinel);
        while cur != sentinel {
            out.push(node(storage, cur).value().unwrap().to_string());
            cur = next(storage, cur);
        }
        out
    }

    fn nth(storage: &TestStorage, sentinel: u32, n: usize) -> u32 {
        let mut cur = next(storage, sentinel);
        for _ in 0..n {
            cur = next(storage, cur);
        }
        cur
    }

    #[test]
    fn empty_list_is_self_linked() {
        let mut storage = TestStorage::with_capacity(4);
        let s = list(&mut storage, &[]);
        assert!(is_empty(&storage, s));
        assert_eq!(prev(&storage, s), s);
        assert_eq!(check_cycle(&storage, s), Some(0));
    }

    #[test]
    fn link_after_and_unlink() {
        let mut storage = TestStorage::with_capacity(8);
        let s = list(&mut storage, &["a", "c"]);
        let b = storage.try_insert(Node::element("b".into())).unwrap();
        let a = nth(&storage, s, 0);
        link_after(&mut storage, b, a);
        assert_eq!(values(&storage, s), ["a", "b", "c"]);
        assert_eq!(check_cycle(&storage, s), Some(3));

        unlink(&mut storage, b);
        assert_eq!(values(&storage, s), ["a", "c"]);
        assert_eq!(next(&storage, b), b);
        assert_eq!(check_cycle(&storage, s), Some(2));

        // Self-linked node: second unlink touches nothing else
        unlink(&mut storage, b);
        assert_eq!(values(&storage, s), ["a", "c"]);
    }

    #[test]
    fn splice_moves_everything() {
        let mut storage = TestStorage::with_capacity(16);
        let a = list(&mut storage, &["1", "4"]);
        let b = list(&mut storage, &["2", "3"]);

        let one = nth(&storage, a, 0);
        splice(&mut storage, b, one);
        assert_eq!(values(&storage, a), ["1", "2", "3", "4"]);
        assert!(is_empty(&storage, b));
        assert_eq!(check_cycle(&storage, a), Some(4));
        assert_eq!(check_cycle(&storage, b), Some(0));

        // Empty source is a no-op
        splice(&mut storage, b, a);
        assert_eq!(values(&storage, a), ["1", "2", "3", "4"]);
    }

    #[test]
    fn cut_reverse_splice_run() {
        let mut storage = TestStorage::with_capacity(16);
        let s = list(&mut storage, &["1", "2", "3", "4", "5"]);

        let start = nth(&storage, s, 1);
        let end = nth(&storage, s, 4);
        let mut run = cut(&mut storage, start, end);
        assert_eq!(values(&storage, s), ["1", "5"]);
        assert_eq!(check_cycle(&storage, s), Some(2));
        assert_eq!(next(&storage, run.last()), run.first());

        run.reverse(&mut storage);
        assert_eq!(node(&storage, run.first()).value(), Some("4"));
        assert_eq!(node(&storage, run.last()).value(), Some("2"));

        let one = nth(&storage, s, 0);
        splice_run(&mut storage, run, one);
        assert_eq!(values(&storage, s), ["1", "4", "3", "2", "5"]);
        assert_eq!(check_cycle(&storage, s), Some(5));
    }

    #[test]
    fn cut_whole_list_leaves_empty_sentinel() {
        let mut storage = TestStorage::with_capacity(8);
        let s = list(&mut storage, &["a", "b"]);
        let first = next(&storage, s);
        let run = cut(&mut storage, first, s);
        assert!(is_empty(&storage, s));
        assert_eq!(check_cycle(&storage, s), Some(0));

        splice_run(&mut storage, run, s);
        assert_eq!(values(&storage, s), ["a", "b"]);
    }

    #[test]
    fn reverse_cycle_through_sentinel() {
        let mut storage = TestStorage::with_capacity(8);
        let s = list(&mut storage, &["a", "b", "c"]);
        reverse_cycle(&mut storage, s);
        assert_eq!(values(&storage, s), ["c", "b", "a"]);
        assert_eq!(check_cycle(&storage, s), Some(3));
    }

    #[test]
    fn check_cycle_detects_broken_back_link() {
        let mut storage = TestStorage::with_capacity(8);
        let s = list(&mut storage, &["a", "b", "c"]);
        let b = nth(&storage, s, 1);
        set_prev(&mut storage, b, s);
        assert_eq!(check_cycle(&storage, s), None);
    }
}
