//! Mutable node handles.

use core::fmt::{self, Debug, Formatter};

use crate::{
    node::Node,
    storage::Storage,
    DefaultStorage,
};
use super::{NodeChildren, NodeKey, NodeRef, Tree};

/// A *mutable* reference to a node in a tree.
///
/// Grants mutable access to the value of the node it points at (and, by
/// navigation, of any other node), but no structural mutation: structure
/// changes go through the operations on [`Tree`], addressed by [`NodeKey`].
///
/// Converts into a [`NodeRef`] via `From`; the reverse conversion does not
/// exist.
///
/// [`Tree`]: struct.Tree.html " "
/// [`NodeKey`]: struct.NodeKey.html " "
/// [`NodeRef`]: struct.NodeRef.html " "
pub struct NodeRefMut<'a, T, K = usize, S = DefaultStorage<Node<T, K>>>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    pub(crate) tree: &'a mut Tree<T, K, S>,
    pub(crate) key: K,
}

impl<'a, T, K, S> NodeRefMut<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Creates a new `NodeRefMut` pointing to the specified key in the tree,
    /// or `None` if the key is not present.
    pub fn new_raw(tree: &'a mut Tree<T, K, S>, key: K) -> Option<Self> {
        if tree.raw.contains_key(&key) {
            Some(unsafe {
                // SAFETY: we just did a key check
                Self::new_raw_unchecked(tree, key)
            })
        } else {
            None
        }
    }

    /// Creates a new `NodeRefMut` pointing to the specified key in the tree
    /// without checking the key.
    ///
    /// # Safety
    /// Causes *immediate* undefined behavior if the specified key is not
    /// present in the tree's storage.
    pub unsafe fn new_raw_unchecked(tree: &'a mut Tree<T, K, S>, key: K) -> Self {
        Self { tree, key }
    }

    fn node(&self) -> &Node<T, K> {
        self.tree.raw.node(&self.key)
    }

    /// Returns a detached token naming this node.
    pub fn key(&self) -> NodeKey<K> {
        NodeKey {
            key: self.key.clone(),
        }
    }

    /// Returns a reference to the raw storage key for the node.
    pub fn raw_key(&self) -> &K {
        &self.key
    }

    /// Consumes the reference and returns the underlying raw storage key.
    pub fn into_raw_key(self) -> K {
        self.key
    }

    /// Returns a reference to the value stored in the node.
    pub fn value(&self) -> &T {
        &self.node().value
    }

    /// Returns a *mutable* reference to the value stored in the node.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.tree.raw.node_mut(&self.key).value
    }

    /// Consumes the reference, returning a mutable value borrow for the
    /// whole lifetime of the underlying tree borrow.
    pub fn into_value_mut(self) -> &'a mut T {
        &mut self.tree.raw.node_mut(&self.key).value
    }

    /// Returns `true` if the node is the root node, `false` otherwise.
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// Returns `true` if the node has no children, `false` otherwise.
    pub fn is_leaf(&self) -> bool {
        self.node().children.is_empty()
    }

    /// Returns a reference to the parent node, or `None` if this is the
    /// root.
    pub fn parent(&self) -> Option<NodeRef<'_, T, K, S>> {
        let parent = self.node().parent.clone()?;
        Some(unsafe {
            // SAFETY: nodes can never have out-of-tree parents
            NodeRef::new_raw_unchecked(self.tree, parent)
        })
    }

    /// Returns a *mutable* reference to the parent node, or `None` if this
    /// is the root.
    pub fn parent_mut(&mut self) -> Option<NodeRefMut<'_, T, K, S>> {
        let parent = self.node().parent.clone()?;
        Some(unsafe {
            // SAFETY: as above
            NodeRefMut::new_raw_unchecked(&mut *self.tree, parent)
        })
    }

    /// Returns a reference to the child at `index`, or `None` if there is no
    /// such child.
    pub fn child(&self, index: usize) -> Option<NodeRef<'_, T, K, S>> {
        let key = self.node().children.get(index)?.clone();
        Some(unsafe {
            // SAFETY: child keys are guaranteed to be valid
            NodeRef::new_raw_unchecked(self.tree, key)
        })
    }

    /// Returns a *mutable* reference to the child at `index`, or `None` if
    /// there is no such child.
    pub fn child_mut(&mut self, index: usize) -> Option<NodeRefMut<'_, T, K, S>> {
        let key = self.node().children.get(index)?.clone();
        Some(unsafe {
            // SAFETY: as above
            NodeRefMut::new_raw_unchecked(&mut *self.tree, key)
        })
    }

    /// Returns a reference to the nearest sibling to the left, or `None` if
    /// this node is the root or its parent's leftmost child.
    pub fn left_sibling(&self) -> Option<NodeRef<'_, T, K, S>> {
        let node = self.node();
        node.parent.as_ref()?;
        if node.sibling_index == 0 {
            return None;
        }
        let key = self.tree.raw.left_sibling_key(&self.key);
        Some(unsafe {
            // SAFETY: sibling keys are guaranteed to be valid
            NodeRef::new_raw_unchecked(self.tree, key)
        })
    }

    /// Returns a reference to the nearest sibling to the right, or `None` if
    /// this node is the root or its parent's rightmost child.
    pub fn right_sibling(&self) -> Option<NodeRef<'_, T, K, S>> {
        let node = self.node();
        node.parent.as_ref()?;
        if self.tree.raw.is_rightmost_sibling(&self.key) {
            return None;
        }
        let key = self.tree.raw.right_sibling_key(&self.key);
        Some(unsafe {
            // SAFETY: as above
            NodeRef::new_raw_unchecked(self.tree, key)
        })
    }

    /// Returns an iterator over references to the node's children, leftmost
    /// first.
    pub fn children(&self) -> NodeChildren<'_, T, K, S> {
        self.as_ref().children()
    }

    /// Returns `true` if the node is its parent's leftmost child, or `None`
    /// if it is the root.
    pub fn is_leftmost_sibling(&self) -> Option<bool> {
        self.as_ref().is_leftmost_sibling()
    }

    /// Returns `true` if the node is its parent's rightmost child, or
    /// `None` if it is the root.
    pub fn is_rightmost_sibling(&self) -> Option<bool> {
        self.as_ref().is_rightmost_sibling()
    }

    /// Returns the node's position among its parent's children, or `None`
    /// if it is the root.
    pub fn sibling_index(&self) -> Option<usize> {
        self.as_ref().sibling_index()
    }

    /// Returns the number of children of the node.
    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// Returns the number of nodes strictly below this one.
    pub fn descendant_count(&self) -> usize {
        self.tree.raw.descendant_count(&self.key)
    }

    /// Reborrows into a read-only reference with the lifetime of `&self`.
    pub fn as_ref(&self) -> NodeRef<'_, T, K, S> {
        unsafe {
            // SAFETY: the key was checked when this reference was created
            NodeRef::new_raw_unchecked(self.tree, self.key.clone())
        }
    }
}

impl<'a, T, K, S> From<NodeRefMut<'a, T, K, S>> for NodeRef<'a, T, K, S>
where
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn from(node_ref: NodeRefMut<'a, T, K, S>) -> Self {
        let NodeRefMut { tree, key } = node_ref;
        unsafe {
            // SAFETY: the key was checked when the mutable reference was
            // created
            NodeRef::new_raw_unchecked(tree, key)
        }
    }
}

impl<'a, T, K, S> Debug for NodeRefMut<'a, T, K, S>
where
    T: Debug,
    S: Storage<Element = Node<T, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRefMut")
            .field("key", &self.key)
            .field("value", self.value())
            .finish()
    }
}
