//! Policies for folding a merged-away node's value into its parent's.
//!
//! [`Tree::merge_with_parent_with`] accepts any `FnOnce(&mut T, T)`: the
//! first argument is the surviving parent value, the second is the value of
//! the node being merged away, owned by the operation. The functions in this
//! module are the canonical policies; a closure with the same signature
//! works just as well:
//!
//! ```rust
//! use polytree::{tree, Tree};
//!
//! let mut tree = Tree::<_>::from(tree!(1 => [tree!(2 => [3])]));
//! let two = tree.root().unwrap().child(0).unwrap().key();
//! tree.merge_with_parent_with(&two, |parent, child| *parent += child)
//!     .unwrap();
//! assert_eq!(*tree.root().unwrap().value(), 3);
//! ```
//!
//! [`Tree::merge_with_parent_with`]: ../tree/struct.Tree.html#method.merge_with_parent_with " "

/// Keeps the parent's value, discarding the merged-away node's.
///
/// This is the default policy used by `merge_with_parent`.
pub fn keep<T>(_parent: &mut T, _merged: T) {}

/// Replaces the parent's value with the merged-away node's.
pub fn replace<T>(parent: &mut T, merged: T) {
    *parent = merged;
}
