//! The safe tree layer: [`Tree`] and its node handles.
//!
//! A [`Tree`] wraps the unchecked [`RawTree`] core and validates every
//! handle it is given before delegating, so misuse surfaces as a
//! [`TreeError`] instead of corrupting the structure. Handles come in three
//! flavors:
//!
//! - [`NodeKey`] — an opaque, cheaply clonable token naming a node. It does
//!   not borrow the tree, so it is what structural operations take and
//!   return; it goes stale when its node is removed.
//! - [`NodeRef`] — a borrowed read-only reference to a node, which can
//!   navigate to its neighborhood and read its value.
//! - [`NodeRefMut`] — the same with mutable access to values.
//!
//! # Example
//! ```rust
//! use polytree::{tree, Tree};
//!
//! let mut tree = Tree::<_>::from(tree!("root" => [tree!("left" => ["a", "b"]), "right"]));
//!
//! let root = tree.root().unwrap();
//! assert_eq!(root.child_count(), 2);
//! assert_eq!(*root.child(1).unwrap().value(), "right");
//!
//! // Keys survive the borrow and address the node for mutations.
//! let left = root.child(0).unwrap().key();
//! tree.erase_subtree(&left).unwrap();
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! [`Tree`]: struct.Tree.html " "
//! [`RawTree`]: ../raw/struct.RawTree.html " "
//! [`TreeError`]: ../enum.TreeError.html " "
//! [`NodeKey`]: struct.NodeKey.html " "
//! [`NodeRef`]: struct.NodeRef.html " "
//! [`NodeRefMut`]: struct.NodeRefMut.html " "

mod base;
mod node_ref;
mod node_ref_mut;


pub use base::Tree;
pub use node_ref::{NodeAncestors, NodeChildren, NodeKey, NodeRef};
pub use node_ref_mut::NodeRefMut;
