//! String deques on a sentinel circular list, with external storage.
//!
//! A [`Queue`] is a doubly-linked circular list of owned strings. Every
//! node, the sentinel included, lives in a storage pool and is addressed by
//! a stable index; the queue itself is just the sentinel's index and a
//! cached length. Structural operations (reverse, swap, k-group reversal,
//! sort, merge) relink nodes and never move or copy a string.
//!
//! # Design
//!
//! ```text
//! Storage (BoxedStorage / Slab) - owns nodes, hands out stable indices
//! Queue                         - sentinel index + len, coordinates links
//! ```
//!
//! Because storage is separate, any number of queues can share one pool,
//! and [`merge`] can move elements between them without reallocating.
//!
//! # Quick Start
//!
//! ```
//! use nexus_deque::{BoxedQueueStorage, Queue};
//!
//! let mut storage = BoxedQueueStorage::with_capacity(64);
//! let mut queue: Queue<BoxedQueueStorage> = Queue::try_new(&mut storage).unwrap();
//!
//! queue.try_push_tail(&mut storage, "gerbil").unwrap();
//! queue.try_push_head(&mut storage, "bear").unwrap();
//! queue.try_push_tail(&mut storage, "dolphin").unwrap();
//!
//! queue.sort(&mut storage, true);
//! assert_eq!(queue.front(&storage), Some("gerbil"));
//!
//! queue.reverse(&mut storage);
//! assert_eq!(queue.pop_head(&mut storage).as_deref(), Some("bear"));
//!
//! queue.free(&mut storage);
//! assert!(storage.is_empty());
//! ```
//!
//! # Same Storage Instance
//!
//! A queue must always be used with the storage it was created in. Passing
//! another storage is a logic error: lookups of missing indices panic, and
//! indices that happen to exist in the other pool corrupt its lists.
//!
//! # Storage Options
//!
//! | Storage | Capacity | Push API |
//! |---------|----------|----------|
//! | [`BoxedQueueStorage`] | Fixed (runtime) | `try_push_*` -> `Result<Idx, Full<String>>` |
//! | [`SlabQueueStorage`] | Growable | `push_*` -> `usize` |
//!
//! [`OwnedQueue`] bundles a queue with its own fixed storage for the
//! single-queue case.
//!
//! # Feature Flags
//!
//! - `slab` (default) - [`Storage`] impl for `slab::Slab`

pub mod index;
mod link;
pub mod merge;
pub mod node;
pub mod owned;
pub mod queue;
mod sort;
pub mod storage;
mod transform;

pub use index::Index;
pub use merge::{QueueContext, merge};
pub use node::{Node, is_prefix_duplicate};
pub use owned::OwnedQueue;
pub use queue::{BoxedQueueStorage, Cursor, Iter, Keys, Queue};
pub use storage::{BoundedStorage, BoxedStorage, Full, Storage, UnboundedStorage};

#[cfg(feature = "slab")]
pub use queue::SlabQueueStorage;
