//! The unchecked core of the tree.
//!
//! [`RawTree`] owns the backing storage for all nodes and implements every
//! structural mutation. It trusts its caller: operations which take node
//! keys are `unsafe fn`s whose contracts ("the key is in this tree", "the
//! destination is not inside the moved subtree") are verified only as debug
//! assertions. The safe [`Tree`] wrapper checks those contracts and
//! delegates here; use `RawTree` directly only when the checks are provably
//! redundant.
//!
//! [`RawTree`]: struct.RawTree.html " "
//! [`Tree`]: ../tree/struct.Tree.html " "

use core::{fmt::Debug, mem};

use alloc::vec::Vec;

use crate::{
    init::TreeInit,
    node::Node,
    storage::Storage,
    DefaultStorage,
    util::{debug_precondition, unreachable_debugchecked},
};

/// An arbitrary-arity tree without a safety layer.
///
/// The tree is either empty or holds a single connected hierarchy; besides
/// the storage it maintains the root key and cached keys of the *leftmost*
/// and *rightmost* nodes (the leaves reached by repeatedly following the
/// first, respectively last, child from the root), which the depth-first
/// iterators use as schedule endpoints.
///
/// Keys handed out by a `RawTree` stay valid until the node they name is
/// removed. This requires the backing storage to never move elements on its
/// own; the default slab storage, the sparse list storages and the
/// slotmap-backed ones qualify, plain `Vec` storage does not.
///
/// The node count is tracked by the tree itself rather than read off the
/// storage, whose `len` may count removal holes in.
#[derive(Debug)]
pub struct RawTree<T, K = usize, S = DefaultStorage<Node<T, K>>>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    storage: S,
    len: usize,
    root: Option<K>,
    leftmost: Option<K>,
    rightmost: Option<K>,
}

impl<T, K, S> RawTree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            storage: S::new(),
            len: 0,
            root: None,
            leftmost: None,
            rightmost: None,
        }
    }

    /// Creates an empty tree with the specified storage capacity.
    ///
    /// # Panics
    /// The storage may panic if it has fixed capacity and the specified
    /// value does not match it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: S::with_capacity(capacity),
            len: 0,
            root: None,
            leftmost: None,
            rightmost: None,
        }
    }

    /// Builds a tree from an initializer, moving the values out of it.
    ///
    /// The root is emplaced first, then each child initializer is emplaced
    /// under its parent in order, recursively.
    pub fn from_init(init: TreeInit<T>) -> Self {
        let TreeInit { value, children } = init;
        let mut tree = Self::new();
        let root = unsafe {
            // SAFETY: a root emplacement takes no key
            tree.emplace_node(None, value)
        };
        tree.fill_from_init(&root, children);
        tree
    }

    /// Builds a tree from a shared initializer, cloning the values.
    pub fn clone_from_init(init: &TreeInit<T>) -> Self
    where
        T: Clone,
    {
        let mut tree = Self::new();
        let root = unsafe {
            // SAFETY: as above
            tree.emplace_node(None, init.value.clone())
        };
        tree.fill_from_init_ref(&root, &init.children);
        tree
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree contains no nodes, `false` otherwise.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the additional number of nodes which the tree can store
    /// without the need to reallocate.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Reserves capacity for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional)
    }

    /// Shrinks the capacity of the storage as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.storage.shrink_to_fit()
    }

    /// Destroys every node and resets the tree to the empty state.
    pub fn clear(&mut self) {
        self.storage = S::new();
        self.len = 0;
        self.root = None;
        self.leftmost = None;
        self.rightmost = None;
    }

    /// Returns the key of the root node, or `None` if the tree is empty.
    pub fn root_key(&self) -> Option<&K> {
        self.root.as_ref()
    }

    /// Returns the key of the leftmost node, or `None` if the tree is empty.
    pub fn leftmost_key(&self) -> Option<&K> {
        self.leftmost.as_ref()
    }

    /// Returns the key of the rightmost node, or `None` if the tree is empty.
    pub fn rightmost_key(&self) -> Option<&K> {
        self.rightmost.as_ref()
    }

    /// Returns `true` if the key names a node of this tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.storage.contains_key(key)
    }

    /// Returns a reference to the value at `key`, or `None` if the key is
    /// not in this tree.
    pub fn value(&self, key: &K) -> Option<&T> {
        self.storage.get(key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value at `key`, or `None` if the
    /// key is not in this tree.
    pub fn value_mut(&mut self, key: &K) -> Option<&mut T> {
        self.storage.get_mut(key).map(|node| &mut node.value)
    }

    pub(crate) fn node(&self, key: &K) -> &Node<T, K> {
        debug_assert!(
            self.storage.contains_key(key),
            "\
debug key check failed: tried to reference key {:?} which is not present in the storage",
            key,
        );
        unsafe {
            // SAFETY: keys chased through the tree's own metadata are always
            // present, which the above check verifies in debug builds
            self.storage.get_unchecked(key)
        }
    }

    pub(crate) fn node_mut(&mut self, key: &K) -> &mut Node<T, K> {
        debug_assert!(
            self.storage.contains_key(key),
            "\
debug key check failed: tried to reference key {:?} which is not present in the storage",
            key,
        );
        unsafe {
            // SAFETY: as above
            self.storage.get_unchecked_mut(key)
        }
    }

    //─────────────────────────────────────────────────────┐
    // Structural queries over the node metadata           │
    //─────────────────────────────────────────────────────┘

    /// Follows first children from `key` down to a leaf.
    pub(crate) fn leftmost_descendant(&self, key: &K) -> K {
        let mut current = key.clone();
        while let Some(child) = self.node(&current).children.first() {
            current = child.clone();
        }
        current
    }

    /// Follows last children from `key` down to a leaf.
    pub(crate) fn rightmost_descendant(&self, key: &K) -> K {
        let mut current = key.clone();
        while let Some(child) = self.node(&current).children.last() {
            current = child.clone();
        }
        current
    }

    /// Returns `true` if `candidate` is an ancestor of `key`.
    ///
    /// Costs `O(depth)` thanks to the cached ancestor chain.
    pub(crate) fn has_ancestor(&self, key: &K, candidate: &K) -> bool {
        self.node(key).ancestor_chain.contains(candidate)
    }

    /// Counts the nodes strictly below `key`.
    pub(crate) fn descendant_count(&self, key: &K) -> usize {
        let node = self.node(key);
        node.children
            .iter()
            .map(|child| 1 + self.descendant_count(child))
            .sum()
    }

    pub(crate) fn is_leftmost_sibling(&self, key: &K) -> bool {
        debug_precondition(
            self.node(key).parent.is_some(),
            "is_leftmost_sibling",
            "node has no parent",
        );
        self.node(key).sibling_index == 0
    }

    pub(crate) fn is_rightmost_sibling(&self, key: &K) -> bool {
        let node = self.node(key);
        let parent = match &node.parent {
            Some(parent) => parent,
            None => unsafe {
                // SAFETY: callers only ask about nodes they know have parents
                unreachable_debugchecked("rightmost-sibling query on a parentless node")
            },
        };
        node.sibling_index == self.node(parent).children.len() - 1
    }

    /// Returns the key of the left sibling of `key`.
    ///
    /// Checked in debug builds: the node must have a parent and must not be
    /// the leftmost sibling.
    pub(crate) fn left_sibling_key(&self, key: &K) -> K {
        let node = self.node(key);
        debug_precondition(node.parent.is_some(), "left_sibling", "node has no parent");
        debug_precondition(
            node.sibling_index > 0,
            "left_sibling",
            "leftmost sibling has no left sibling",
        );
        let parent = match &node.parent {
            Some(parent) => parent,
            None => unsafe {
                // SAFETY: precondition of this function
                unreachable_debugchecked("left-sibling query on a parentless node")
            },
        };
        self.node(parent).children[node.sibling_index - 1].clone()
    }

    /// Returns the key of the right sibling of `key`.
    ///
    /// Checked in debug builds: the node must have a parent and must not be
    /// the rightmost sibling.
    pub(crate) fn right_sibling_key(&self, key: &K) -> K {
        let node = self.node(key);
        debug_precondition(node.parent.is_some(), "right_sibling", "node has no parent");
        debug_precondition(
            !self.is_rightmost_sibling(key),
            "right_sibling",
            "rightmost sibling has no right sibling",
        );
        let parent = match &node.parent {
            Some(parent) => parent,
            None => unsafe {
                // SAFETY: precondition of this function
                unreachable_debugchecked("right-sibling query on a parentless node")
            },
        };
        self.node(parent).children[node.sibling_index + 1].clone()
    }

    //─────────────────────────────────────────────────────┐
    // Ancestor-chain maintenance                          │
    //─────────────────────────────────────────────────────┘

    fn update_ancestor_chain(&mut self, key: &K) {
        let parent = match self.node(key).parent.clone() {
            Some(parent) => parent,
            None => unsafe {
                // SAFETY: only called on nodes which were just reparented
                unreachable_debugchecked("ancestor chain update on a parentless node")
            },
        };
        let parent_chain = &self.node(&parent).ancestor_chain;
        let mut chain = Vec::with_capacity(parent_chain.len() + 1);
        chain.push(parent.clone());
        chain.extend_from_slice(parent_chain);
        self.node_mut(key).ancestor_chain = chain;
    }

    fn propagate_ancestor_chain_update(&mut self, key: &K) {
        let child_count = self.node(key).children.len();
        for position in 0..child_count {
            let child = self.node(key).children[position].clone();
            self.update_ancestor_chain(&child);
            self.propagate_ancestor_chain_update(&child);
        }
    }

    fn update_ancestor_chain_and_propagate(&mut self, key: &K) {
        self.update_ancestor_chain(key);
        self.propagate_ancestor_chain_update(key);
    }

    //─────────────────────────────────────────────────────┐
    // Child-list surgery                                  │
    //─────────────────────────────────────────────────────┘

    /// Appends `child` to `parent`'s children, rewriting the child's parent
    /// metadata and rebuilding the ancestor chains of its whole subtree.
    fn insert_child(&mut self, parent: &K, child: &K) {
        debug_precondition(parent != child, "insert_child", "node cannot adopt itself");
        let parent_node = self.node_mut(parent);
        parent_node.children.push(child.clone());
        let sibling_index = parent_node.children.len() - 1;
        let child_node = self.node_mut(child);
        child_node.parent = Some(parent.clone());
        child_node.sibling_index = sibling_index;
        self.update_ancestor_chain_and_propagate(child);
    }

    /// Removes the child at `index` from `parent`'s children and returns its
    /// key, decrementing the sibling indices of its right siblings.
    ///
    /// The removed node's parent metadata is left as-is and is stale from
    /// this point on; it becomes valid again upon a later `insert_child`.
    fn remove_child(&mut self, parent: &K, index: usize) -> K {
        debug_precondition(
            index < self.node(parent).children.len(),
            "remove_child",
            "child index out of bounds",
        );
        let removed = self.node_mut(parent).children.remove(index);
        let remaining = self.node(parent).children.len();
        for position in index..remaining {
            let right_sibling = self.node(parent).children[position].clone();
            self.node_mut(&right_sibling).sibling_index -= 1;
        }
        removed
    }

    //─────────────────────────────────────────────────────┐
    // Whole-tree operations                               │
    //─────────────────────────────────────────────────────┘

    /// Creates a detached node holding `value` and returns its key.
    ///
    /// # Safety
    /// The node is not reachable from the root. The caller must attach it
    /// (or remove it again) before invoking any whole-tree operation, since
    /// those assume every stored node to be reachable.
    pub unsafe fn make_node(&mut self, value: T) -> K {
        self.len += 1;
        self.storage.add(Node::new(value))
    }

    /// Emplaces a new node and returns its key.
    ///
    /// With `parent = Some(key)`, the node becomes a new last child of that
    /// node. With `parent = None` on an empty tree it becomes the root; on a
    /// non-empty tree it becomes the new root and the previous root becomes
    /// its sole child.
    ///
    /// # Safety
    /// `parent`, if supplied, must be a key of this tree.
    pub unsafe fn emplace_node(&mut self, parent: Option<&K>, value: T) -> K {
        let child = self.make_node(value);
        match parent {
            None => match self.root.take() {
                None => {
                    self.root = Some(child.clone());
                    self.leftmost = Some(child.clone());
                    self.rightmost = Some(child.clone());
                }
                Some(old_root) => {
                    // The previous root keeps its subtree; leftmost and
                    // rightmost are reached through it and do not change.
                    self.root = Some(child.clone());
                    self.insert_child(&child, &old_root);
                }
            },
            Some(parent) => {
                let update_leftmost = self.emplacing_would_change_leftmost(parent);
                let update_rightmost = self.emplacing_would_change_rightmost(parent);
                self.insert_child(parent, &child);
                if update_leftmost {
                    self.leftmost = Some(child.clone());
                }
                if update_rightmost {
                    self.rightmost = Some(child.clone());
                }
            }
        }
        child
    }

    /// A new last child of `target` becomes the leftmost node only when
    /// `target` is the leftmost node itself (and therefore a childless
    /// leaf).
    fn emplacing_would_change_leftmost(&self, target: &K) -> bool {
        self.leftmost.as_ref() == Some(target)
    }

    /// A new last child of `target` becomes the rightmost node when `target`
    /// is the rightmost node or lies on the rightmost spine above it.
    fn emplacing_would_change_rightmost(&self, target: &K) -> bool {
        match self.rightmost.as_ref() {
            Some(rightmost) => rightmost == target || self.has_ancestor(rightmost, target),
            None => false,
        }
    }

    /// Returns a new tree holding a deep copy of the subtree rooted at
    /// `subtree_root`.
    ///
    /// # Safety
    /// `subtree_root` must be a key of this tree.
    pub unsafe fn copy_subtree(&self, subtree_root: &K) -> Self
    where
        T: Clone,
    {
        debug_precondition(
            self.contains_key(subtree_root),
            "copy_subtree",
            "subtree root not in tree",
        );
        let mut copy = Self::new();
        let new_root = copy.emplace_node(None, self.node(subtree_root).value.clone());
        self.copy_children_into(subtree_root, &mut copy, &new_root);
        copy
    }

    fn copy_children_into(&self, from: &K, destination_tree: &mut Self, destination: &K)
    where
        T: Clone,
    {
        let child_count = self.node(from).children.len();
        for position in 0..child_count {
            let child = self.node(from).children[position].clone();
            let value = self.node(&child).value.clone();
            let copied = unsafe {
                // SAFETY: `destination` was produced by `destination_tree`
                destination_tree.emplace_node(Some(destination), value)
            };
            self.copy_children_into(&child, destination_tree, &copied);
        }
    }

    /// Detaches the subtree rooted at `subtree_root` and returns it as a new
    /// tree.
    ///
    /// If `subtree_root` is the root, the entire tree is returned and `self`
    /// becomes empty. Node ownership transfers storage-to-storage, which
    /// reassigns keys: keys into the chopped subtree are invalidated, the
    /// returned tree hands out fresh ones.
    ///
    /// # Safety
    /// `subtree_root` must be a key of this tree.
    pub unsafe fn chop_subtree(&mut self, subtree_root: &K) -> Self {
        debug_precondition(
            self.contains_key(subtree_root),
            "chop_subtree",
            "subtree root not in tree",
        );
        if self.root.as_ref() == Some(subtree_root) {
            return mem::take(self);
        }

        let dropping_leftmost = self.spine_cache_inside_subtree(&self.leftmost, subtree_root);
        let dropping_rightmost = self.spine_cache_inside_subtree(&self.rightmost, subtree_root);

        let parent = match self.node(subtree_root).parent.clone() {
            Some(parent) => parent,
            None => {
                // SAFETY: a non-root node always has a parent
                unreachable_debugchecked("non-root node has no parent")
            }
        };
        let sibling_index = self.node(subtree_root).sibling_index;
        let subtree_size = self.descendant_count(subtree_root) + 1;
        self.remove_child(&parent, sibling_index);

        let mut chopped = Self::new();
        let new_root = self.transfer_subtree_into(subtree_root, &mut chopped.storage);
        chopped.len = subtree_size;
        chopped.root = Some(new_root.clone());
        chopped.node_mut(&new_root).clear_parent_metadata();
        chopped.propagate_ancestor_chain_update(&new_root);
        chopped.leftmost = Some(chopped.leftmost_descendant(&new_root));
        chopped.rightmost = Some(chopped.rightmost_descendant(&new_root));

        if dropping_leftmost {
            self.leftmost = Some(self.leftmost_descendant(&parent));
        }
        if dropping_rightmost {
            self.rightmost = Some(self.rightmost_descendant(&parent));
        }
        chopped
    }

    /// Whether the cached leftmost/rightmost key lies inside the subtree
    /// rooted at `subtree_root`.
    fn spine_cache_inside_subtree(&self, cache: &Option<K>, subtree_root: &K) -> bool {
        match cache {
            Some(cached) => cached == subtree_root || self.has_ancestor(cached, subtree_root),
            None => false,
        }
    }

    /// Moves the subtree rooted at `key` out of this tree's storage into
    /// `destination`, returning the root's new key. Parent links and
    /// children lists are rewritten to the new keys; ancestor chains are
    /// left stale and must be rebuilt by the caller, as must the detached
    /// root's parent metadata.
    fn transfer_subtree_into(&mut self, key: &K, destination: &mut S) -> K {
        let mut node = self.storage.remove(key);
        self.len -= 1;
        let old_children = mem::take(&mut node.children);
        let new_key = destination.add(node);
        let mut new_children = Vec::with_capacity(old_children.len());
        for old_child in &old_children {
            let new_child = self.transfer_subtree_into(old_child, destination);
            match destination.get_mut(&new_child) {
                Some(child_node) => child_node.parent = Some(new_key.clone()),
                None => unsafe {
                    // SAFETY: the key was just produced by `destination`
                    unreachable_debugchecked("transferred node vanished from destination storage")
                },
            }
            new_children.push(new_child);
        }
        match destination.get_mut(&new_key) {
            Some(node) => node.children = new_children,
            None => unsafe {
                // SAFETY: as above
                unreachable_debugchecked("transferred node vanished from destination storage")
            },
        }
        new_key
    }

    /// Consumes `other` and attaches its root as a new last child of
    /// `destination`, migrating every node into this tree's storage.
    /// Returns the key of the adopted subtree's root in this tree.
    ///
    /// # Safety
    /// `destination` must be a key of this tree, and `other` must not be
    /// empty.
    pub unsafe fn adopt_subtree(&mut self, mut other: Self, destination: &K) -> K {
        debug_precondition(
            self.contains_key(destination),
            "adopt_subtree",
            "destination not in tree",
        );
        let update_leftmost = self.emplacing_would_change_leftmost(destination);
        let update_rightmost = self.emplacing_would_change_rightmost(destination);

        let other_root = match other.root.take() {
            Some(root) => root,
            None => {
                // SAFETY: precondition of this function
                unreachable_debugchecked("cannot adopt an empty tree")
            }
        };
        let adopted_len = other.len;
        let new_subtree = other.transfer_subtree_into(&other_root, &mut self.storage);
        self.len += adopted_len;
        self.insert_child(destination, &new_subtree);

        if update_leftmost {
            self.leftmost = Some(self.leftmost_descendant(&new_subtree));
        }
        if update_rightmost {
            self.rightmost = Some(self.rightmost_descendant(&new_subtree));
        }
        new_subtree
    }

    /// Detaches the subtree rooted at `subtree_root` and re-attaches it as a
    /// new last child of `destination`, all within this tree. Keys remain
    /// valid.
    ///
    /// # Safety
    /// Both keys must be keys of this tree, `subtree_root` must not be the
    /// root, and `destination` must not lie inside the moved subtree.
    pub unsafe fn move_subtree(&mut self, subtree_root: &K, destination: &K) {
        debug_precondition(
            self.contains_key(subtree_root),
            "move_subtree",
            "subtree root not in tree",
        );
        debug_precondition(
            self.contains_key(destination),
            "move_subtree",
            "destination not in tree",
        );
        debug_precondition(
            self.root.as_ref() != Some(subtree_root),
            "move_subtree",
            "cannot move the root of the tree",
        );
        debug_precondition(
            destination != subtree_root && !self.has_ancestor(destination, subtree_root),
            "move_subtree",
            "destination is part of moved subtree",
        );

        let dropping_leftmost = self.spine_cache_inside_subtree(&self.leftmost, subtree_root);
        let dropping_rightmost = self.spine_cache_inside_subtree(&self.rightmost, subtree_root);
        let update_leftmost = self.emplacing_would_change_leftmost(destination);
        let update_rightmost = self.emplacing_would_change_rightmost(destination);

        let parent = match self.node(subtree_root).parent.clone() {
            Some(parent) => parent,
            None => {
                // SAFETY: a non-root node always has a parent
                unreachable_debugchecked("non-root node has no parent")
            }
        };
        let sibling_index = self.node(subtree_root).sibling_index;
        self.remove_child(&parent, sibling_index);
        self.insert_child(destination, subtree_root);

        // Both `dropping` and `update` can hold for the rightmost node, when
        // a subtree containing it moves somewhere further up the rightmost
        // spine; the rightmost node does not change then. The leftmost
        // equivalent cannot currently happen, but is handled symmetrically.
        if dropping_leftmost && !update_leftmost {
            self.leftmost = Some(self.leftmost_descendant(&parent));
        }
        if dropping_rightmost && !update_rightmost {
            self.rightmost = Some(self.rightmost_descendant(&parent));
        }
        if update_leftmost && !dropping_leftmost {
            self.leftmost = Some(self.leftmost_descendant(destination));
        }
        if update_rightmost && !dropping_rightmost {
            self.rightmost = Some(self.rightmost_descendant(destination));
        }
    }

    /// Destroys the subtree rooted at `subtree_root` and every node in it.
    ///
    /// Erasing the root is equivalent to [`clear`].
    ///
    /// # Safety
    /// `subtree_root` must be a key of this tree.
    ///
    /// [`clear`]: #method.clear " "
    pub unsafe fn erase_subtree(&mut self, subtree_root: &K) {
        debug_precondition(
            self.contains_key(subtree_root),
            "erase_subtree",
            "subtree root not in tree",
        );
        if self.root.as_ref() == Some(subtree_root) {
            self.clear();
            return;
        }

        let dropping_leftmost = self.spine_cache_inside_subtree(&self.leftmost, subtree_root);
        let dropping_rightmost = self.spine_cache_inside_subtree(&self.rightmost, subtree_root);

        let parent = match self.node(subtree_root).parent.clone() {
            Some(parent) => parent,
            None => {
                // SAFETY: a non-root node always has a parent
                unreachable_debugchecked("non-root node has no parent")
            }
        };
        let sibling_index = self.node(subtree_root).sibling_index;
        self.remove_child(&parent, sibling_index);
        self.delete_subtree_nodes(subtree_root);

        if dropping_leftmost {
            self.leftmost = Some(self.leftmost_descendant(&parent));
        }
        if dropping_rightmost {
            self.rightmost = Some(self.rightmost_descendant(&parent));
        }
    }

    fn delete_subtree_nodes(&mut self, key: &K) {
        let children = mem::take(&mut self.node_mut(key).children);
        for child in &children {
            self.delete_subtree_nodes(child);
        }
        self.storage.remove(key);
        self.len -= 1;
    }

    /// Merges the node at `key` into its parent: `merge` folds the node's
    /// value into the parent's, the node's children replace it among the
    /// parent's children in order, and the node itself is destroyed. Keys of
    /// the promoted children remain valid.
    ///
    /// # Safety
    /// `key` must be a key of this tree and the node must have a parent.
    pub unsafe fn merge_with_parent<F>(&mut self, key: &K, merge: F)
    where
        F: FnOnce(&mut T, T),
    {
        debug_precondition(self.contains_key(key), "merge_with_parent", "node not in tree");
        debug_precondition(
            self.node(key).parent.is_some(),
            "merge_with_parent",
            "cannot merge the root with its parent",
        );
        // Only the merged node itself can be a cached spine endpoint *and*
        // disappear: a mid-spine node passes the spine through to the child
        // which takes over its slot.
        let was_leftmost = self.leftmost.as_ref() == Some(key);
        let was_rightmost = self.rightmost.as_ref() == Some(key);

        let merged = self.storage.remove(key);
        self.len -= 1;
        let Node {
            value: merged_value,
            parent,
            sibling_index,
            children: grandchildren,
            ..
        } = merged;
        let parent = match parent {
            Some(parent) => parent,
            None => {
                // SAFETY: precondition of this function
                unreachable_debugchecked("cannot merge a parentless node")
            }
        };

        self.node_mut(&parent)
            .children
            .splice(sibling_index..=sibling_index, grandchildren.iter().cloned());
        for grandchild in &grandchildren {
            self.node_mut(grandchild).parent = Some(parent.clone());
        }
        let child_count = self.node(&parent).children.len();
        for position in sibling_index..child_count {
            let child = self.node(&parent).children[position].clone();
            self.node_mut(&child).sibling_index = position;
        }
        for grandchild in &grandchildren {
            self.update_ancestor_chain_and_propagate(grandchild);
        }

        merge(&mut self.node_mut(&parent).value, merged_value);

        if was_leftmost {
            self.leftmost = Some(self.leftmost_descendant(&parent));
        }
        if was_rightmost {
            self.rightmost = Some(self.rightmost_descendant(&parent));
        }
    }

    fn fill_from_init(&mut self, parent: &K, inits: Vec<TreeInit<T>>) {
        for TreeInit { value, children } in inits {
            let node = unsafe {
                // SAFETY: `parent` was created by this tree
                self.emplace_node(Some(parent), value)
            };
            self.fill_from_init(&node, children);
        }
    }

    fn fill_from_init_ref(&mut self, parent: &K, inits: &[TreeInit<T>])
    where
        T: Clone,
    {
        for init in inits {
            let node = unsafe {
                // SAFETY: as above
                self.emplace_node(Some(parent), init.value.clone())
            };
            self.fill_from_init_ref(&node, &init.children);
        }
    }

    /// Compares the subtrees rooted at `self_root` and `other_root` by a
    /// simultaneous pre-order walk, exiting early on the first differing
    /// child count or value.
    fn subtrees_equal(&self, self_root: &K, other: &Self, other_root: &K) -> bool
    where
        T: PartialEq,
    {
        let mut stack: Vec<(K, K)> = Vec::new();
        let mut this_key = self_root.clone();
        let mut other_key = other_root.clone();
        loop {
            let this_node = self.node(&this_key);
            let other_node = other.node(&other_key);
            if this_node.children.len() != other_node.children.len() {
                return false;
            }
            if this_node.value != other_node.value {
                return false;
            }

            if !this_node.children.is_empty() {
                stack.push((this_key.clone(), other_key.clone()));
                this_key = this_node.children[0].clone();
                other_key = other_node.children[0].clone();
            } else {
                // No child to visit: unwind until a non-rightmost node is
                // found, then hop to its right sibling. The structures are
                // identical up to here, so one set of conditions drives both
                // cursors.
                while self.node(&this_key).parent.is_some() && self.is_rightmost_sibling(&this_key)
                {
                    match stack.pop() {
                        Some((this_parent, other_parent)) => {
                            this_key = this_parent;
                            other_key = other_parent;
                        }
                        None => unsafe {
                            // SAFETY: the stack holds exactly the ancestors
                            // of the cursor, so it cannot run dry while a
                            // parent exists
                            unreachable_debugchecked("traversal stack out of sync with the tree")
                        },
                    }
                }
                if self.node(&this_key).parent.is_some() {
                    this_key = self.right_sibling_key(&this_key);
                    other_key = other.right_sibling_key(&other_key);
                } else {
                    break;
                }
            }
        }
        true
    }
}

impl<T, K, S> Default for RawTree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K, S> PartialEq for RawTree<T, K, S>
where
    T: PartialEq,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        match (self.root.as_ref(), other.root.as_ref()) {
            (None, None) => true,
            (Some(self_root), Some(other_root)) => {
                self.subtrees_equal(self_root, other, other_root)
            }
            _ => false,
        }
    }
}

impl<T, K, S> Eq for RawTree<T, K, S>
where
    T: Eq,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
}
