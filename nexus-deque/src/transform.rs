//! In-place structural transforms.
//!
//! Everything here is pure relinking through the link primitive: element
//! indices and their strings stay where they are in storage. Removed
//! elements are released back to storage immediately.

use crate::link;
use crate::node::is_prefix_duplicate;
use crate::{Index, Node, Queue, Storage};

impl<S, Idx: Index> Queue<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Deletes the middle element.
    ///
    /// Two cursors walk in from both ends until they meet or become
    /// neighbours; the one coming from the tail marks the middle. For an
    /// odd length that is the centre element, for an even length the second
    /// of the two central ones (index `len / 2` either way).
    ///
    /// Returns `true` if an element was deleted, `false` on an empty queue.
    pub fn delete_mid(&mut self, storage: &mut S) -> bool {
        if link::is_empty(storage, self.head) {
            return false;
        }

        let mut fwd = link::next(storage, self.head);
        let mut back = link::prev(storage, self.head);
        while fwd != back && link::next(storage, fwd) != back {
            fwd = link::next(storage, fwd);
            back = link::prev(storage, back);
        }

        self.release(storage, back);
        true
    }

    /// Deletes every element that has an adjacent duplicate, keeping only
    /// values that were unique in their neighbourhood.
    ///
    /// Neighbours are duplicates when they agree over the shorter of their
    /// two lengths (see [`is_prefix_duplicate`](crate::is_prefix_duplicate)).
    /// All members of a duplicate run go, the first occurrence included.
    ///
    /// The queue is expected to be sorted; on an unsorted queue only
    /// adjacent repeats are found. Returns the number of deleted elements.
    pub fn delete_dup(&mut self, storage: &mut S) -> usize {
        let mut removed = 0;
        // Whether the current element matched the one before it
        let mut matched_prev = false;

        let mut cursor = self.cursor_front(storage);
        while let Some(current) = cursor.current() {
            let matches_next = cursor
                .peek_next()
                .is_some_and(|next| is_prefix_duplicate(current, next));

            if matched_prev || matches_next {
                cursor.remove_current();
                removed += 1;
            } else {
                cursor.move_next();
            }
            matched_prev = matches_next;
        }

        if removed > 0 {
            tracing::trace!(removed, "deleted duplicate run members");
        }
        removed
    }

    /// Swaps every two adjacent elements: positions (0,1), (2,3), ...
    ///
    /// A final odd element stays where it is.
    pub fn swap(&mut self, storage: &mut S) {
        let mut cur = link::next(storage, self.head);
        while cur != self.head {
            let partner = link::next(storage, cur);
            if partner == self.head {
                break;
            }
            link::unlink(storage, cur);
            link::link_after(storage, cur, partner);
            cur = link::next(storage, cur);
        }
    }

    /// Reverses the queue in place by swapping every node's links.
    #[inline]
    pub fn reverse(&mut self, storage: &mut S) {
        link::reverse_cycle(storage, self.head);
    }

    /// Reverses the elements `k` at a time.
    ///
    /// Each complete group of `k` is cut out as a detached run, reversed,
    /// and spliced back in place. A trailing group shorter than `k` keeps
    /// its order, so `k > len` changes nothing. `k <= 0` is a no-op.
    pub fn reverse_k(&mut self, storage: &mut S, k: isize) {
        if k <= 0 {
            return;
        }
        let k = k.unsigned_abs();

        let mut groups = 0usize;
        // Last node before the group being counted
        let mut anchor = self.head;
        loop {
            let start = link::next(storage, anchor);
            let mut end = start;
            let mut taken = 0;
            while taken < k && end != self.head {
                end = link::next(storage, end);
                taken += 1;
            }
            if taken < k {
                break;
            }

            let mut run = link::cut(storage, start, end);
            run.reverse(storage);
            link::splice_run(storage, run, anchor);
            anchor = run.last();
            groups += 1;
        }

        tracing::trace!(k, groups, "reversed k-groups");
    }

    /// Single left-to-right filtering pass.
    ///
    /// Each element is compared with its right neighbour; if the neighbour
    /// is strictly smaller the element is deleted, and the scan continues
    /// from the neighbour either way. `[5, 2, 13, 8, 1, 4]` becomes
    /// `[2, 1, 4]`.
    ///
    /// Only neighbours are compared, so a survivor may still have a smaller
    /// element further right (`[3, 4, 1]` keeps `3`).
    ///
    /// Returns the resulting size.
    pub fn ascend(&mut self, storage: &mut S) -> usize {
        let mut cursor = self.cursor_front(storage);
        loop {
            let drop_current = match (cursor.current(), cursor.peek_next()) {
                (Some(current), Some(next)) => next.as_bytes() < current.as_bytes(),
                _ => break,
            };
            if drop_current {
                cursor.remove_current();
            } else {
                cursor.move_next();
            }
        }
        self.size(storage)
    }

    /// Deletes every element that has a strictly greater element anywhere
    /// to its right.
    ///
    /// Scans from the tail keeping the running maximum; a left neighbour
    /// smaller than it is deleted, otherwise it becomes the new maximum.
    /// The survivors are non-increasing.
    ///
    /// Returns the resulting size.
    pub fn descend(&mut self, storage: &mut S) -> usize {
        let mut cursor = self.cursor_back(storage);
        loop {
            let drop_prev = match (cursor.current(), cursor.peek_prev()) {
                (Some(current), Some(prev)) => prev.as_bytes() < current.as_bytes(),
                _ => break,
            };
            if drop_prev {
                cursor.remove_prev();
            } else {
                cursor.move_prev();
            }
        }
        self.size(storage)
    }
}

#[cfg(test)]
mod tests {
    use crate::queue::tests::{TestQueue, contents, queue_of};
    use crate::{BoxedQueueStorage, Queue};

    fn numbered(storage: &mut BoxedQueueStorage, n: usize) -> TestQueue {
        let mut queue = Queue::try_new(storage).unwrap();
        for i in 1..=n {
            queue.try_push_tail(storage, i.to_string()).unwrap();
        }
        queue
    }

    #[test]
    fn delete_mid_odd_and_even() {
        let mut storage = BoxedQueueStorage::with_capacity(32);

        let mut five = numbered(&mut storage, 5);
        assert!(five.delete_mid(&mut storage));
        assert_eq!(contents(&five, &storage), ["1", "2", "4", "5"]);
        assert!(five.check_links(&storage));

        let mut four = numbered(&mut storage, 4);
        assert!(four.delete_mid(&mut storage));
        assert_eq!(contents(&four, &storage), ["1", "2", "4"]);

        let mut two = numbered(&mut storage, 2);
        assert!(two.delete_mid(&mut storage));
        assert_eq!(contents(&two, &storage), ["1"]);

        let mut one = numbered(&mut storage, 1);
        assert!(one.delete_mid(&mut storage));
        assert!(one.is_empty());
        assert!(!one.delete_mid(&mut storage));
        assert!(one.check_links(&storage));
    }

    #[test]
    fn delete_dup_removes_whole_runs() {
        let mut storage = BoxedQueueStorage::with_capacity(32);
        let mut queue = queue_of(&mut storage, &["a", "a", "b", "c", "c", "c", "d"]);
        assert!(queue.is_sorted(&storage, false));

        assert_eq!(queue.delete_dup(&mut storage), 5);
        assert_eq!(contents(&queue, &storage), ["b", "d"]);
        assert!(queue.check_links(&storage));
    }

    #[test]
    fn delete_dup_uses_prefix_rule() {
        let mut storage = BoxedQueueStorage::with_capacity(32);
        let mut queue = queue_of(&mut storage, &["ab", "abc", "b", "bc", "c"]);

        assert_eq!(queue.delete_dup(&mut storage), 4);
        assert_eq!(contents(&queue, &storage), ["c"]);
    }

    #[test]
    fn delete_dup_edges() {
        let mut storage = BoxedQueueStorage::with_capacity(32);

        let mut empty = queue_of(&mut storage, &[]);
        assert_eq!(empty.delete_dup(&mut storage), 0);

        let mut all = queue_of(&mut storage, &["x", "x", "x"]);
        assert_eq!(all.delete_dup(&mut storage), 3);
        assert!(all.is_empty());
        assert!(all.check_links(&storage));

        let mut unique = queue_of(&mut storage, &["a", "b", "c"]);
        assert_eq!(unique.delete_dup(&mut storage), 0);
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn swap_pairs() {
        let mut storage = BoxedQueueStorage::with_capacity(32);

        let mut odd = numbered(&mut storage, 5);
        odd.swap(&mut storage);
        assert_eq!(contents(&odd, &storage), ["2", "1", "4", "3", "5"]);
        assert!(odd.check_links(&storage));

        let mut even = numbered(&mut storage, 4);
        even.swap(&mut storage);
        assert_eq!(contents(&even, &storage), ["2", "1", "4", "3"]);

        let mut single = numbered(&mut storage, 1);
        single.swap(&mut storage);
        assert_eq!(contents(&single, &storage), ["1"]);
    }

    #[test]
    fn reverse_full() {
        let mut storage = BoxedQueueStorage::with_capacity(16);
        let mut queue = numbered(&mut storage, 4);
        queue.reverse(&mut storage);
        assert_eq!(contents(&queue, &storage), ["4", "3", "2", "1"]);
        assert!(queue.check_links(&storage));

        let mut empty = queue_of(&mut storage, &[]);
        empty.reverse(&mut storage);
        assert!(empty.check_links(&storage));
    }

    #[test]
    fn reverse_k_groups() {
        let mut storage = BoxedQueueStorage::with_capacity(64);

        let mut q = numbered(&mut storage, 5);
        q.reverse_k(&mut storage, 2);
        assert_eq!(contents(&q, &storage), ["2", "1", "4", "3", "5"]);
        assert!(q.check_links(&storage));

        let mut q = numbered(&mut storage, 5);
        q.reverse_k(&mut storage, 3);
        assert_eq!(contents(&q, &storage), ["3", "2", "1", "4", "5"]);

        let mut q = numbered(&mut storage, 5);
        q.reverse_k(&mut storage, 5);
        assert_eq!(contents(&q, &storage), ["5", "4", "3", "2", "1"]);
        assert!(q.check_links(&storage));

        let mut q = numbered(&mut storage, 5);
        q.reverse_k(&mut storage, 6);
        assert_eq!(contents(&q, &storage), ["1", "2", "3", "4", "5"]);

        let mut q = numbered(&mut storage, 5);
        q.reverse_k(&mut storage, 1);
        q.reverse_k(&mut storage, 0);
        q.reverse_k(&mut storage, -3);
        assert_eq!(contents(&q, &storage), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn reverse_k_preserves_element_identity() {
        let mut storage = BoxedQueueStorage::with_capacity(16);
        let mut q = numbered(&mut storage, 4);
        let before: Vec<_> = q.keys(&storage).collect();

        q.reverse_k(&mut storage, 2);
        let after: Vec<_> = q.keys(&storage).collect();
        assert_eq!(after, [before[1], before[0], before[3], before[2]]);
        assert_eq!(q.get(&storage, before[0]), Some("1"));
    }

    #[test]
    fn ascend_single_pass() {
        let mut storage = BoxedQueueStorage::with_capacity(16);
        let mut q = queue_of(&mut storage, &["5", "2", "13", "8", "1", "4"]);
        // Byte order, not numeric: "13" < "2"
        assert_eq!(q.ascend(&mut storage), 3);
        assert_eq!(contents(&q, &storage), ["13", "1", "4"]);
        assert!(q.check_links(&storage));
    }

    #[test]
    fn ascend_on_single_digits() {
        let mut storage = BoxedQueueStorage::with_capacity(16);
        let mut q = queue_of(&mut storage, &["5", "2", "9", "8", "1", "4"]);
        assert_eq!(q.ascend(&mut storage), 3);
        assert_eq!(contents(&q, &storage), ["2", "1", "4"]);

        let mut empty = queue_of(&mut storage, &[]);
        assert_eq!(empty.ascend(&mut storage), 0);
    }

    #[test]
    fn descend_keeps_non_increasing_suffix_maxima() {
        let mut storage = BoxedQueueStorage::with_capacity(16);
        let mut q = queue_of(&mut storage, &["5", "2", "9", "8", "1", "4"]);
        assert_eq!(q.descend(&mut storage), 3);
        assert_eq!(contents(&q, &storage), ["9", "8", "4"]);
        assert!(q.is_sorted(&storage, true));
        assert!(q.check_links(&storage));

        let mut equal = queue_of(&mut storage, &["a", "a"]);
        assert_eq!(equal.descend(&mut storage), 2);
    }
}
