//! The node type backing the tree.

use core::{fmt::Debug, num::NonZeroIsize};

use alloc::vec::Vec;

use crate::storage::{ListStorage, MoveFix};

/// A node of a tree.
///
/// Created by the tree internally and only publicly exposed so that tree
/// storages' generic arguments could be specified. Nodes are neither
/// copyable nor clonable: a node is referred to by its storage key for its
/// entire lifetime.
///
/// A node records, besides its value, its complete structural surroundings:
/// the parent key (`None` for a root or a detached node), its position in
/// the parent's ordered children list, the children keys, and a cached chain
/// of ancestor keys, nearest first. The chain makes ancestry queries and the
/// cycle check on subtree moves `O(depth)` instead of repeated parent walks;
/// it is rebuilt on every reparenting and broadcast to descendants.
#[derive(Debug)]
pub struct Node<T, K = usize>
where
    K: Clone + Debug + Eq,
{
    pub(crate) value: T,
    pub(crate) parent: Option<K>,
    pub(crate) sibling_index: usize,
    pub(crate) children: Vec<K>,
    pub(crate) ancestor_chain: Vec<K>,
}

impl<T, K> Node<T, K>
where
    K: Clone + Debug + Eq,
{
    /// Creates a detached node holding `value`.
    ///
    /// The node starts out with no parent, no children and an empty ancestor
    /// chain; attaching it somewhere makes the metadata meaningful.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            parent: None,
            sibling_index: 0,
            children: Vec::new(),
            ancestor_chain: Vec::new(),
        }
    }

    /// Resets the parent metadata, turning the node into a root.
    ///
    /// The children list is untouched; descendants' ancestor chains must be
    /// rebuilt by the caller.
    #[inline]
    pub(crate) fn clear_parent_metadata(&mut self) {
        self.parent = None;
        self.sibling_index = 0;
        self.ancestor_chain.clear();
    }
}

impl<T> MoveFix for Node<T, usize> {
    unsafe fn fix_shift<S>(storage: &mut S, shifted_from: usize, shifted_by: NonZeroIsize)
    where
        S: ListStorage<Element = Self>,
    {
        let fix_starting_from = if shifted_by.get() > 0 {
            shifted_from + 1 // If an insertion happened, ignore the new element
        } else {
            shifted_from
        };
        if fix_starting_from >= storage.len() {
            return;
        }
        for i in fix_starting_from..storage.len() {
            let old_index = (i as isize - shifted_by.get()) as usize;
            Self::fix_move(storage, old_index, i);
        }
    }

    unsafe fn fix_move<S>(storage: &mut S, previous_index: usize, current_index: usize)
    where
        S: ListStorage<Element = Self>,
    {
        // Children keep pointing at the old slot, and every node in the
        // moved node's subtree has the old slot in its ancestor chain.
        let child_count = /*unsafe*/ {
            // SAFETY: index validity is guaranteed for `current_index`
            storage.get_unchecked(current_index).children.len()
        };
        for child_position in 0..child_count {
            let child = storage.get_unchecked(current_index).children[child_position];
            storage.get_unchecked_mut(child).parent = Some(current_index);
            fix_chain_entry(storage, child, previous_index, current_index);
        }
        // The parent's child slot for this node also went stale.
        let (parent, sibling_index) = {
            let node = storage.get_unchecked(current_index);
            (node.parent, node.sibling_index)
        };
        if let Some(parent) = parent {
            let parent_node = storage.get_unchecked_mut(parent);
            debug_assert_eq!(
                parent_node.children.get(sibling_index),
                Some(&previous_index),
                "parent's child list does not point at the moved node",
            );
            parent_node.children[sibling_index] = current_index;
        }
    }
}

/// Replaces `previous` with `current` in the ancestor chain of `key` and of
/// every node below it.
///
/// # Safety
/// `key` must be a valid index and the chains must actually reference
/// `previous` as an ancestor, i.e. the element at `current` must be a real
/// ancestor of `key` which just moved slots.
unsafe fn fix_chain_entry<T, S>(storage: &mut S, key: usize, previous: usize, current: usize)
where
    S: ListStorage<Element = Node<T, usize>>,
{
    let node = storage.get_unchecked_mut(key);
    if let Some(entry) = node.ancestor_chain.iter_mut().find(|k| **k == previous) {
        *entry = current;
    }
    let child_count = node.children.len();
    for child_position in 0..child_count {
        let child = storage.get_unchecked(key).children[child_position];
        fix_chain_entry(storage, child, previous, current);
    }
}
