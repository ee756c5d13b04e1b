//! Slot handles for queue nodes.
//!
//! A node's `prev`/`next` links are bare unsigned integers naming storage
//! slots. The width is a type parameter so small queues can pack their
//! links into `u16` or `u8`. The all-ones value never names a slot: sort
//! and merge use it to terminate detached `next` chains.

/// A storage slot handle used for node links.
///
/// # Example
///
/// ```
/// use nexus_deque::Index;
///
/// // One value per width is kept back as the chain terminator
/// assert_eq!(u8::SLOTS, 255);
/// assert!(u8::NONE.is_none());
///
/// let idx = u16::from_slot(300);
/// assert!(idx.is_some());
/// assert_eq!(idx.slot(), 300);
/// ```
pub trait Index: Copy + Eq + core::fmt::Debug + 'static {
    /// Terminator of a detached chain; never a slot.
    const NONE: Self;

    /// How many slots this width can address, `NONE` excluded.
    const SLOTS: usize;

    /// Slot position this handle names.
    fn slot(self) -> usize;

    /// Handle for a slot position below [`SLOTS`](Index::SLOTS).
    fn from_slot(slot: usize) -> Self;

    /// Returns `true` for the chain terminator.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this names a slot.
    #[inline]
    fn is_some(self) -> bool {
        self != Self::NONE
    }
}

macro_rules! slot_handle {
    ($($ty:ty),*) => {$(
        impl Index for $ty {
            const NONE: Self = <$ty>::MAX;

            const SLOTS: usize = if (<$ty>::MAX as u128) < usize::MAX as u128 {
                <$ty>::MAX as usize
            } else {
                usize::MAX
            };

            #[inline]
            fn slot(self) -> usize {
                self as usize
            }

            #[inline]
            fn from_slot(slot: usize) -> Self {
                debug_assert!(slot < Self::SLOTS, "slot {slot} out of range");
                slot as $ty
            }
        }
    )*};
}

slot_handle!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoundedStorage, BoxedStorage, Node};

    #[test]
    fn slot_counts_leave_room_for_terminator() {
        assert_eq!(u8::SLOTS, 255);
        assert_eq!(u16::SLOTS, 65_535);
        assert_eq!(u32::SLOTS, u32::MAX as usize);
        assert_eq!(usize::SLOTS, usize::MAX);
    }

    #[test]
    fn full_u8_storage_never_hands_out_terminator() {
        let mut storage: BoxedStorage<Node<u8>, u8> = BoxedStorage::with_capacity(128);
        let mut handed_out = Vec::new();
        while let Ok(idx) = storage.try_insert(Node::element(String::new())) {
            handed_out.push(idx);
        }

        assert_eq!(handed_out.len(), 128);
        assert!(handed_out.iter().all(|idx| idx.is_some()));
        assert_eq!(handed_out.last().map(|idx| idx.slot()), Some(127));
    }

    #[test]
    fn fresh_nodes_are_unlinked() {
        let node: Node<u16> = Node::element("x".into());
        assert!(node.prev.is_none());
        assert!(node.next.is_none());
    }

    #[test]
    fn slot_positions_survive_narrowing() {
        for slot in [0usize, 1, 254] {
            assert_eq!(u8::from_slot(slot).slot(), slot);
        }
        assert_eq!(u16::from_slot(65_534).slot(), 65_534);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    #[cfg(debug_assertions)]
    fn terminator_is_not_a_slot() {
        u8::from_slot(255);
    }
}
