//! K-way merge of queues sharing one storage.
//!
//! Each queue taking part is wrapped in a [`QueueContext`] carrying its
//! cached size. The merge moves every element into the first context's
//! queue by relinking, so no element is reallocated or copied.

use crate::sort::{merge_chains, merge_sort};
use crate::{Index, Node, Queue, Storage};

/// A queue taking part in a [`merge`], with its cached element count.
///
/// # Example
///
/// ```
/// use nexus_deque::{merge, BoxedQueueStorage, Queue, QueueContext};
///
/// let mut storage = BoxedQueueStorage::with_capacity(16);
/// let mut contexts = Vec::new();
/// for values in [["1", "4"], ["2", "5"], ["3", "6"]] {
///     let mut queue: Queue<BoxedQueueStorage> = Queue::try_new(&mut storage).unwrap();
///     for v in values {
///         queue.try_push_tail(&mut storage, v).unwrap();
///     }
///     contexts.push(QueueContext::new(queue));
/// }
///
/// assert_eq!(merge(&mut contexts, &mut storage, false), 6);
/// assert_eq!(contexts[0].size, 6);
/// assert!(contexts[1..].iter().all(|ctx| ctx.size == 0 && ctx.queue.is_empty()));
///
/// let merged: Vec<_> = contexts[0].queue.iter(&storage).collect();
/// assert_eq!(merged, ["1", "2", "3", "4", "5", "6"]);
/// ```
#[derive(Debug)]
pub struct QueueContext<S, Idx: Index = u32>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// The queue being merged.
    pub queue: Queue<S, Idx>,
    /// Element count, refreshed by [`merge`].
    pub size: usize,
}

impl<S, Idx: Index> QueueContext<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Wraps a queue, caching its current length.
    pub fn new(queue: Queue<S, Idx>) -> Self {
        let size = queue.len();
        Self { queue, size }
    }

    /// Unwraps the queue.
    pub fn into_queue(self) -> Queue<S, Idx> {
        self.queue
    }
}

/// Merges every context's elements into the first context's queue.
///
/// Each queue is detached and sorted on its own, then the sorted chains
/// are merged pairwise in rounds (0 with 1, 2 with 3, ...) until one
/// remains, which becomes the first queue's contents, in descending order
/// when `descend` is set. Ties go to the earlier context, so the ascending
/// result is stable across queues.
///
/// Afterwards every other context's queue is empty with `size == 0`.
/// Returns the total number of elements, also stored in the first
/// context's `size`. An empty slice returns 0.
pub fn merge<S, Idx>(contexts: &mut [QueueContext<S, Idx>], storage: &mut S, descend: bool) -> usize
where
    S: Storage<Node<Idx>, Index = Idx>,
    Idx: Index,
{
    if contexts.is_empty() {
        return 0;
    }

    let mut chains: Vec<Idx> = contexts
        .iter_mut()
        .map(|ctx| {
            ctx.size = 0;
            let chain = ctx.queue.detach_chain(storage);
            merge_sort(storage, chain)
        })
        .collect();

    while chains.len() > 1 {
        chains = chains
            .chunks(2)
            .map(|pair| match *pair {
                [left, right] => merge_chains(storage, left, right),
                [only] => only,
                _ => unreachable!("chunks(2) yields one or two chains"),
            })
            .collect();
    }

    let first = &mut contexts[0];
    let total = first.queue.attach_chain(storage, chains[0], descend);
    first.size = total;

    tracing::debug!(queues = contexts.len(), total, descend, "merged queues");
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxedQueueStorage;
    use crate::queue::tests::{TestQueue, contents, queue_of};

    fn contexts_of(
        storage: &mut BoxedQueueStorage,
        groups: &[&[&str]],
    ) -> Vec<QueueContext<BoxedQueueStorage>> {
        groups
            .iter()
            .map(|values| QueueContext::new(queue_of(storage, values)))
            .collect()
    }

    #[test]
    fn three_way_merge() {
        let mut storage = BoxedQueueStorage::with_capacity(32);
        let mut contexts = contexts_of(&mut storage, &[&["1", "4"], &["2", "5"], &["3", "6"]]);

        assert_eq!(merge(&mut contexts, &mut storage, false), 6);
        assert_eq!(contexts[0].size, 6);
        assert_eq!(
            contents(&contexts[0].queue, &storage),
            ["1", "2", "3", "4", "5", "6"]
        );
        for ctx in &contexts {
            assert!(ctx.queue.check_links(&storage));
        }
        for ctx in &contexts[1..] {
            assert_eq!(ctx.size, 0);
            assert!(ctx.queue.is_empty());
            assert_eq!(ctx.queue.size(&storage), 0);
        }
    }

    #[test]
    fn merge_descending() {
        let mut storage = BoxedQueueStorage::with_capacity(32);
        let mut contexts = contexts_of(&mut storage, &[&["a", "c"], &["b"], &["d", "e"]]);

        assert_eq!(merge(&mut contexts, &mut storage, true), 5);
        assert_eq!(
            contents(&contexts[0].queue, &storage),
            ["e", "d", "c", "b", "a"]
        );
    }

    #[test]
    fn merge_sorts_unsorted_inputs() {
        let mut storage = BoxedQueueStorage::with_capacity(32);
        let mut contexts = contexts_of(&mut storage, &[&["z", "a"], &["m", "b"]]);

        assert_eq!(merge(&mut contexts, &mut storage, false), 4);
        assert_eq!(contents(&contexts[0].queue, &storage), ["a", "b", "m", "z"]);
    }

    #[test]
    fn merge_with_empty_queues() {
        let mut storage = BoxedQueueStorage::with_capacity(32);
        let mut contexts = contexts_of(&mut storage, &[&[], &["b"], &[], &["a"], &[]]);

        assert_eq!(merge(&mut contexts, &mut storage, false), 2);
        assert_eq!(contents(&contexts[0].queue, &storage), ["a", "b"]);
        assert!(contexts[0].queue.check_links(&storage));
    }

    #[test]
    fn merge_single_context_sorts_in_place() {
        let mut storage = BoxedQueueStorage::with_capacity(8);
        let mut contexts = contexts_of(&mut storage, &[&["c", "a", "b"]]);

        assert_eq!(merge(&mut contexts, &mut storage, false), 3);
        assert_eq!(contents(&contexts[0].queue, &storage), ["a", "b", "c"]);
    }

    #[test]
    fn merge_nothing() {
        let mut storage = BoxedQueueStorage::with_capacity(8);
        let mut contexts: Vec<QueueContext<BoxedQueueStorage>> = Vec::new();
        assert_eq!(merge(&mut contexts, &mut storage, false), 0);

        let mut contexts = contexts_of(&mut storage, &[&[], &[]]);
        assert_eq!(merge(&mut contexts, &mut storage, false), 0);
        assert!(contexts[0].queue.check_links(&storage));
    }

    #[test]
    fn ties_go_to_earlier_context() {
        let mut storage = BoxedQueueStorage::with_capacity(16);
        let mut queues: Vec<TestQueue> = (0..3).map(|_| queue_of(&mut storage, &[])).collect();
        let keys: Vec<u32> = queues
            .iter_mut()
            .map(|q| q.try_push_tail(&mut storage, "same").unwrap())
            .collect();

        let mut contexts: Vec<_> = queues.into_iter().map(QueueContext::new).collect();
        merge(&mut contexts, &mut storage, false);

        let merged: Vec<_> = contexts[0].queue.keys(&storage).collect();
        assert_eq!(merged, keys);
    }

    #[test]
    fn merged_queue_releases_cleanly() {
        let mut storage = BoxedQueueStorage::with_capacity(32);
        let mut contexts = contexts_of(&mut storage, &[&["1", "3"], &["2"]]);
        merge(&mut contexts, &mut storage, false);

        for ctx in contexts {
            ctx.into_queue().free(&mut storage);
        }
        assert!(storage.is_empty());
    }
}
