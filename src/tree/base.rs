//! The safe tree type.

use core::{
    fmt::{self, Debug, Formatter},
    iter::Rev,
};

use crate::{
    init::TreeInit,
    merge,
    node::Node,
    raw::RawTree,
    storage::Storage,
    DefaultStorage,
    traversal::{Dfs, DfsMut, DfsOrder, Iter, IterMut},
    TreeError,
};
use super::{NodeKey, NodeRef, NodeRefMut};

/// An arbitrary-arity tree.
///
/// Each node holds a value of type `T`, has at most one parent and any
/// number of ordered children. Nodes are addressed by [`NodeKey`] tokens and
/// accessed through [`NodeRef`]/[`NodeRefMut`]; structural operations
/// validate every key they are given and report misuse as a [`TreeError`].
///
/// # Example
/// ```rust
/// use polytree::{tree, Tree, PreOrder};
///
/// let mut tree: Tree<i32> = Tree::new();
/// assert!(tree.is_empty());
///
/// // Passing no parent to `emplace_node` grows the tree at the root.
/// let root = tree.emplace_node(None, 1).unwrap();
/// let child = tree.emplace_node(Some(&root), 2).unwrap();
/// tree.emplace_node(Some(&child), 3).unwrap();
///
/// let pre: Vec<i32> = tree.dfs::<PreOrder>().map(|n| *n.value()).collect();
/// assert_eq!(pre, [1, 2, 3]);
/// ```
///
/// [`NodeKey`]: struct.NodeKey.html " "
/// [`NodeRef`]: struct.NodeRef.html " "
/// [`NodeRefMut`]: struct.NodeRefMut.html " "
/// [`TreeError`]: ../enum.TreeError.html " "
pub struct Tree<T, K = usize, S = DefaultStorage<Node<T, K>>>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    pub(crate) raw: RawTree<T, K, S>,
}

impl<T, K, S> Tree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            raw: RawTree::new(),
        }
    }

    /// Creates an empty tree with the specified storage capacity.
    ///
    /// # Panics
    /// The storage may panic if it has fixed capacity and the specified
    /// value does not match it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Builds a tree from a shared initializer, cloning the values out of
    /// it.
    ///
    /// To move the values instead, use the `From<TreeInit<T>>` conversion.
    pub fn from_init(init: &TreeInit<T>) -> Self
    where
        T: Clone,
    {
        Self {
            raw: RawTree::clone_from_init(init),
        }
    }

    /// Builds a tree holding a deep copy of the subtree rooted at
    /// `subtree_root`, which may point into any tree.
    ///
    /// # Example
    /// ```rust
    /// use polytree::{tree, Tree};
    ///
    /// let source = Tree::<_>::from(tree!(1 => [tree!(2 => [3, 4]), 5]));
    /// let copy = Tree::from_subtree(source.root().unwrap().child(0).unwrap());
    /// assert_eq!(copy, Tree::<_>::from(tree!(2 => [3, 4])));
    /// ```
    pub fn from_subtree(subtree_root: NodeRef<'_, T, K, S>) -> Self
    where
        T: Clone,
    {
        Self {
            raw: unsafe {
                // SAFETY: a node reference's key is always in its tree
                subtree_root.tree().raw.copy_subtree(subtree_root.raw_key())
            },
        }
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no nodes, `false` otherwise.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the additional number of nodes which the tree can store
    /// without the need to reallocate.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves capacity for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional)
    }

    /// Shrinks the capacity of the storage as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit()
    }

    /// Destroys every node, making the tree empty.
    pub fn clear(&mut self) {
        self.raw.clear()
    }

    /// Returns a reference to the root node, or `None` if the tree is
    /// empty.
    pub fn root(&self) -> Option<NodeRef<'_, T, K, S>> {
        let key = self.raw.root_key()?.clone();
        Some(unsafe {
            // SAFETY: the root key is always valid
            NodeRef::new_raw_unchecked(self, key)
        })
    }

    /// Returns a *mutable* reference to the root node, or `None` if the
    /// tree is empty.
    pub fn root_mut(&mut self) -> Option<NodeRefMut<'_, T, K, S>> {
        let key = self.raw.root_key()?.clone();
        Some(unsafe {
            // SAFETY: as above
            NodeRefMut::new_raw_unchecked(self, key)
        })
    }

    /// Returns a reference to the leftmost node — the leaf reached by
    /// repeatedly taking the first child from the root — or `None` if the
    /// tree is empty.
    pub fn leftmost(&self) -> Option<NodeRef<'_, T, K, S>> {
        let key = self.raw.leftmost_key()?.clone();
        Some(unsafe {
            // SAFETY: the cached spine keys are always valid
            NodeRef::new_raw_unchecked(self, key)
        })
    }

    /// Returns a *mutable* reference to the leftmost node, or `None` if the
    /// tree is empty.
    pub fn leftmost_mut(&mut self) -> Option<NodeRefMut<'_, T, K, S>> {
        let key = self.raw.leftmost_key()?.clone();
        Some(unsafe {
            // SAFETY: as above
            NodeRefMut::new_raw_unchecked(self, key)
        })
    }

    /// Returns a reference to the rightmost node — the leaf reached by
    /// repeatedly taking the last child from the root — or `None` if the
    /// tree is empty.
    pub fn rightmost(&self) -> Option<NodeRef<'_, T, K, S>> {
        let key = self.raw.rightmost_key()?.clone();
        Some(unsafe {
            // SAFETY: as above
            NodeRef::new_raw_unchecked(self, key)
        })
    }

    /// Returns a *mutable* reference to the rightmost node, or `None` if
    /// the tree is empty.
    pub fn rightmost_mut(&mut self) -> Option<NodeRefMut<'_, T, K, S>> {
        let key = self.raw.rightmost_key()?.clone();
        Some(unsafe {
            // SAFETY: as above
            NodeRefMut::new_raw_unchecked(self, key)
        })
    }

    /// Resolves a key into a node reference.
    ///
    /// # Errors
    /// [`TreeError::HandleOutOfTree`] if the key does not name a node of
    /// this tree.
    ///
    /// [`TreeError::HandleOutOfTree`]: ../enum.TreeError.html#variant.HandleOutOfTree " "
    pub fn node(&self, key: &NodeKey<K>) -> Result<NodeRef<'_, T, K, S>, TreeError> {
        self.ensure_key(&key.key)?;
        Ok(unsafe {
            // SAFETY: the key was just checked
            NodeRef::new_raw_unchecked(self, key.key.clone())
        })
    }

    /// Resolves a key into a *mutable* node reference.
    ///
    /// # Errors
    /// [`TreeError::HandleOutOfTree`] if the key does not name a node of
    /// this tree.
    ///
    /// [`TreeError::HandleOutOfTree`]: ../enum.TreeError.html#variant.HandleOutOfTree " "
    pub fn node_mut(&mut self, key: &NodeKey<K>) -> Result<NodeRefMut<'_, T, K, S>, TreeError> {
        self.ensure_key(&key.key)?;
        let key = key.key.clone();
        Ok(unsafe {
            // SAFETY: as above
            NodeRefMut::new_raw_unchecked(self, key)
        })
    }

    /// Emplaces a new node holding `value` and returns its key.
    ///
    /// With `parent = Some(key)`, the node is appended as a new last child
    /// of that node. With `parent = None` on an empty tree, the node becomes
    /// the root; on a non-empty tree it becomes the new root and the
    /// previous root becomes its sole child.
    ///
    /// # Errors
    /// [`TreeError::HandleOutOfTree`] if `parent` does not name a node of
    /// this tree.
    ///
    /// [`TreeError::HandleOutOfTree`]: ../enum.TreeError.html#variant.HandleOutOfTree " "
    pub fn emplace_node(
        &mut self,
        parent: Option<&NodeKey<K>>,
        value: T,
    ) -> Result<NodeKey<K>, TreeError> {
        if let Some(parent) = parent {
            self.ensure_key(&parent.key)?;
        }
        let key = unsafe {
            // SAFETY: the destination was just checked
            self.raw.emplace_node(parent.map(|handle| &handle.key), value)
        };
        Ok(NodeKey { key })
    }

    /// Destroys the subtree rooted at `subtree_root` and every node in it.
    ///
    /// Erasing the root empties the tree.
    ///
    /// # Errors
    /// [`TreeError::HandleOutOfTree`] if the key does not name a node of
    /// this tree.
    ///
    /// [`TreeError::HandleOutOfTree`]: ../enum.TreeError.html#variant.HandleOutOfTree " "
    pub fn erase_subtree(&mut self, subtree_root: &NodeKey<K>) -> Result<(), TreeError> {
        self.ensure_key(&subtree_root.key)?;
        unsafe {
            // SAFETY: the key was just checked
            self.raw.erase_subtree(&subtree_root.key);
        }
        Ok(())
    }

    /// Detaches the subtree rooted at `subtree_root` and returns it as a
    /// new tree.
    ///
    /// Chopping the root returns the entire tree, leaving this one empty.
    /// Keys into the chopped subtree are invalidated; the returned tree
    /// hands out fresh ones.
    ///
    /// # Errors
    /// [`TreeError::HandleOutOfTree`] if the key does not name a node of
    /// this tree.
    ///
    /// [`TreeError::HandleOutOfTree`]: ../enum.TreeError.html#variant.HandleOutOfTree " "
    pub fn chop_subtree(&mut self, subtree_root: &NodeKey<K>) -> Result<Self, TreeError> {
        self.ensure_key(&subtree_root.key)?;
        Ok(Self {
            raw: unsafe {
                // SAFETY: the key was just checked
                self.raw.chop_subtree(&subtree_root.key)
            },
        })
    }

    /// Consumes `other` and attaches it as a new last child of
    /// `destination`, returning the key of the adopted subtree's root.
    ///
    /// # Errors
    /// - [`TreeError::HandleOutOfTree`] if `destination` does not name a
    ///   node of this tree.
    /// - [`TreeError::EmptyTree`] if `other` is empty.
    ///
    /// [`TreeError::HandleOutOfTree`]: ../enum.TreeError.html#variant.HandleOutOfTree " "
    /// [`TreeError::EmptyTree`]: ../enum.TreeError.html#variant.EmptyTree " "
    pub fn adopt_subtree(
        &mut self,
        destination: &NodeKey<K>,
        other: Self,
    ) -> Result<NodeKey<K>, TreeError> {
        self.ensure_key(&destination.key)?;
        if other.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        let key = unsafe {
            // SAFETY: the destination was just checked and `other` is
            // non-empty
            self.raw.adopt_subtree(other.raw, &destination.key)
        };
        Ok(NodeKey { key })
    }

    /// Detaches the subtree rooted at `subtree_root` and re-attaches it as
    /// a new last child of `destination`, all within this tree. Keys remain
    /// valid.
    ///
    /// # Errors
    /// - [`TreeError::HandleOutOfTree`] if either key does not name a node
    ///   of this tree.
    /// - [`TreeError::WasRootNode`] if `subtree_root` is the root.
    /// - [`TreeError::CycleWouldForm`] if `destination` lies inside the
    ///   moved subtree.
    ///
    /// [`TreeError::HandleOutOfTree`]: ../enum.TreeError.html#variant.HandleOutOfTree " "
    /// [`TreeError::WasRootNode`]: ../enum.TreeError.html#variant.WasRootNode " "
    /// [`TreeError::CycleWouldForm`]: ../enum.TreeError.html#variant.CycleWouldForm " "
    pub fn move_subtree(
        &mut self,
        subtree_root: &NodeKey<K>,
        destination: &NodeKey<K>,
    ) -> Result<(), TreeError> {
        self.ensure_key(&subtree_root.key)?;
        self.ensure_key(&destination.key)?;
        if self.raw.root_key() == Some(&subtree_root.key) {
            return Err(TreeError::WasRootNode);
        }
        if destination.key == subtree_root.key
            || self.raw.has_ancestor(&destination.key, &subtree_root.key)
        {
            return Err(TreeError::CycleWouldForm);
        }
        unsafe {
            // SAFETY: all preconditions were just checked
            self.raw.move_subtree(&subtree_root.key, &destination.key);
        }
        Ok(())
    }

    /// Merges the node at `node` into its parent, keeping the parent's
    /// value.
    ///
    /// The node's children replace it among its parent's children in order,
    /// and the node itself is destroyed, invalidating its key.
    ///
    /// # Errors
    /// - [`TreeError::HandleOutOfTree`] if the key does not name a node of
    ///   this tree.
    /// - [`TreeError::WasRootNode`] if the node is the root.
    ///
    /// [`TreeError::HandleOutOfTree`]: ../enum.TreeError.html#variant.HandleOutOfTree " "
    /// [`TreeError::WasRootNode`]: ../enum.TreeError.html#variant.WasRootNode " "
    pub fn merge_with_parent(&mut self, node: &NodeKey<K>) -> Result<(), TreeError> {
        self.merge_with_parent_with(node, merge::keep)
    }

    /// Merges the node at `node` into its parent, folding its value into
    /// the parent's with `merge`.
    ///
    /// See the [`merge`] module for the canonical policies.
    ///
    /// # Errors
    /// Same as [`merge_with_parent`].
    ///
    /// [`merge`]: ../merge/index.html " "
    /// [`merge_with_parent`]: #method.merge_with_parent " "
    pub fn merge_with_parent_with<F>(
        &mut self,
        node: &NodeKey<K>,
        merge: F,
    ) -> Result<(), TreeError>
    where
        F: FnOnce(&mut T, T),
    {
        self.ensure_key(&node.key)?;
        if self.raw.node(&node.key).parent.is_none() {
            return Err(TreeError::WasRootNode);
        }
        unsafe {
            // SAFETY: all preconditions were just checked
            self.raw.merge_with_parent(&node.key, merge);
        }
        Ok(())
    }

    /// Returns an iterator over the tree's values in an unspecified order.
    pub fn iter(&self) -> Iter<'_, T, K, S> {
        Iter(Dfs::new(self))
    }

    /// Returns an iterator over mutable references to the tree's values in
    /// an unspecified order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T, K, S> {
        DfsMut::new(self)
    }

    /// Returns an iterator over the tree's nodes in the depth-first order
    /// `O`.
    pub fn dfs<O: DfsOrder>(&self) -> Dfs<'_, T, K, S, O> {
        Dfs::new(self)
    }

    /// Returns an iterator over mutable references to the tree's values in
    /// the depth-first order `O`.
    pub fn dfs_mut<O: DfsOrder>(&mut self) -> DfsMut<'_, T, K, S, O> {
        DfsMut::new(self)
    }

    /// Returns an iterator over the tree's nodes in the reverse of the
    /// depth-first order `O`.
    pub fn reverse_dfs<O: DfsOrder>(&self) -> Rev<Dfs<'_, T, K, S, O>> {
        self.dfs::<O>().rev()
    }

    /// Returns an iterator over mutable references to the tree's values in
    /// the reverse of the depth-first order `O`.
    pub fn reverse_dfs_mut<O: DfsOrder>(&mut self) -> Rev<DfsMut<'_, T, K, S, O>> {
        self.dfs_mut::<O>().rev()
    }

    /// Returns an iterator resuming the depth-first order `O` at the node
    /// named by `start`.
    ///
    /// # Errors
    /// [`TreeError::HandleOutOfTree`] if the key does not name a node of
    /// this tree.
    ///
    /// [`TreeError::HandleOutOfTree`]: ../enum.TreeError.html#variant.HandleOutOfTree " "
    pub fn dfs_from<O: DfsOrder>(
        &self,
        start: &NodeKey<K>,
    ) -> Result<Dfs<'_, T, K, S, O>, TreeError> {
        self.ensure_key(&start.key)?;
        Ok(Dfs::starting_at(self, start.key.clone()))
    }

    fn ensure_key(&self, key: &K) -> Result<(), TreeError> {
        if self.raw.contains_key(key) {
            Ok(())
        } else {
            Err(TreeError::HandleOutOfTree)
        }
    }

    fn fmt_subtree(&self, f: &mut Formatter<'_>, key: &K, depth: usize) -> fmt::Result
    where
        T: Debug,
    {
        for _ in 0..depth {
            f.write_str("    ")?;
        }
        writeln!(f, "{:?}", self.raw.node(key).value)?;
        for child in &self.raw.node(key).children {
            self.fmt_subtree(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl<T, K, S> Debug for Tree<T, K, S>
where
    T: Debug,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Renders the hierarchy, one value per line, children indented under
    /// their parent.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.raw.root_key() {
            None => f.write_str("<empty tree>"),
            Some(root) => {
                let root = root.clone();
                self.fmt_subtree(f, &root, 0)
            }
        }
    }
}

impl<T, K, S> Default for Tree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K, S> Clone for Tree<T, K, S>
where
    T: Clone,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn clone(&self) -> Self {
        match self.raw.root_key() {
            Some(root) => {
                let root = root.clone();
                Self {
                    raw: unsafe {
                        // SAFETY: the root key is always valid
                        self.raw.copy_subtree(&root)
                    },
                }
            }
            None => Self::new(),
        }
    }
}

impl<T, K, S> From<TreeInit<T>> for Tree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn from(init: TreeInit<T>) -> Self {
        Self {
            raw: RawTree::from_init(init),
        }
    }
}

impl<T, K, S> PartialEq for Tree<T, K, S>
where
    T: PartialEq,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T, K, S> Eq for Tree<T, K, S>
where
    T: Eq,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
}

impl<'a, T, K, S> IntoIterator for &'a Tree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, K, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, K, S> IntoIterator for &'a mut Tree<T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, K, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
