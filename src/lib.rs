//! An arena-allocated arbitrary-arity tree with handle-based access and bidirectional DFS traversal.
//!
//! # Overview
//! Polytree implements a single, general tree shape — every node has at most one parent and any number of ordered children — using the ["arena-allocated trees"][arena tree blog post] technique described by Ben Lovy: nodes live in a backing storage, typically a [`Vec`] variant, and link to each other through indices into that storage rather than pointers. This significantly improves element insertion and removal performance as compared to `Rc`-based trees, keeps handles valid across unrelated mutations, and gives room for supporting configurations without a global memory allocator (an allocator itself is still required, for the per-node children lists).
//!
//! The crate is split into three layers:
//! - the [`raw`] module owns the storage and performs structural mutation without checking its preconditions beyond debug assertions;
//! - [`Tree`] wraps it, validating every handle and reporting misuse as a [`TreeError`];
//! - the [`traversal`] module provides double-ended pre-order and post-order depth-first iterators over any tree, alongside plain enumeration.
//!
//! # Example
//! ```rust
//! use polytree::{tree, PostOrder, PreOrder, Tree};
//!
//! let mut sample = Tree::<_>::from(tree!(1 => [
//!     tree!(2 => [3, 4]),
//!     tree!(5 => [6, 7]),
//! ]));
//!
//! let pre: Vec<i32> = sample.dfs::<PreOrder>().map(|n| *n.value()).collect();
//! assert_eq!(pre, [1, 2, 3, 4, 5, 6, 7]);
//! let post: Vec<i32> = sample.dfs::<PostOrder>().map(|n| *n.value()).collect();
//! assert_eq!(post, [3, 4, 2, 6, 7, 5, 1]);
//!
//! // Subtrees can be detached into trees of their own and grafted back.
//! let five = sample.root().unwrap().child(1).unwrap().key();
//! let chopped = sample.chop_subtree(&five).unwrap();
//! assert_eq!(chopped.len(), 3);
//! let three = sample.leftmost().unwrap().key();
//! sample.adopt_subtree(&three, chopped).unwrap();
//!
//! let pre: Vec<i32> = sample.dfs::<PreOrder>().map(|n| *n.value()).collect();
//! assert_eq!(pre, [1, 2, 3, 5, 6, 7, 4]);
//! ```
//!
//! # Storage
//! Polytree uses [Granite] to handle arena-allocated storage. The default storage is [`Slab`], which reuses the slots of removed nodes for later insertions while keeping all other keys stable, and which can tell a live key from a stale one. Several feature flags enable other storage types by forwarding them to Granite; the slotmap-backed ones use generation-tagged keys, which additionally detect stale handles whose slot has already been reused.
//!
//! # Feature flags
//! - `std` (**enabled by default**) — enables the full standard library, disabling `no_std` for the crate. Currently, this only adds [`Error`] trait implementations for some types.
//! - `smallvec` — forwarded to Granite, adds a `ListStorage` trait implementation for [`SmallVec`].
//! - `slotmap` — forwarded to Granite, adds `Storage` trait implementations for [`SlotMap`], [`HopSlotMap`] and [`DenseSlotMap`].
//! - `union_optimizations` — forwarded to Granite, adds some layout optimizations by using untagged unions, decreasing memory usage in `SparseStorage`. **Requires a nightly compiler** (see [tracking issue for RFC 2514]) and thus is disabled by default.
//!
//! # Public dependencies
//! - `granite` (**required**) — `^1.0`
//!     - `smallvec` (*optional*) — `^1.4`
//!     - `slotmap` (*optional*) — `^0.4`
//! - `slab` (**required**) — `^0.4`
//!
//! [`raw`]: raw/index.html " "
//! [`traversal`]: traversal/index.html " "
//! [`Tree`]: tree/struct.Tree.html " "
//! [`TreeError`]: enum.TreeError.html " "
//! [`Error`]: https://doc.rust-lang.org/std/error/trait.Error.html " "
//! [`Vec`]: https://doc.rust-lang.org/std/vec/struct.Vec.html " "
//! [`SmallVec`]: https://docs.rs/smallvec/*/smallvec/struct.SmallVec.html " "
//! [`Slab`]: https://docs.rs/slab/*/slab/struct.Slab.html " "
//! [`SlotMap`]: https://docs.rs/slotmap/*/slotmap/struct.SlotMap.html " "
//! [`HopSlotMap`]: https://docs.rs/slotmap/*/slotmap/hop/struct.HopSlotMap.html " "
//! [`DenseSlotMap`]: https://docs.rs/slotmap/*/slotmap/dense/struct.DenseSlotMap.html " "
//! [Granite]: https://docs.rs/granite/*/granite/ " "
//! [tracking issue for RFC 2514]: https://github.com/rust-lang/rust/issues/55149 " "
//! [arena tree blog post]: https://dev.to/deciduously/no-more-tears-no-more-knots-arena-allocated-trees-in-rust-44k6 " "

#![warn(
    rust_2018_idioms,
    clippy::cargo,
    clippy::pedantic,
    clippy::nursery,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    variant_size_differences,
    clippy::unwrap_used, // Only .expect() allowed
)]
#![deny(anonymous_parameters, bare_trait_objects)]
#![allow(
    clippy::use_self, // FIXME reenable when it gets fixed
    clippy::wildcard_imports, // Worst lint ever
    clippy::module_name_repetitions, // Annoying and stupid
    clippy::shadow_unrelated, // Countless false positives, very annoying
)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

extern crate alloc;

pub extern crate granite as storage;
#[doc(no_inline)]
pub use storage::Storage;

/// The default backing storage used by trees unless a different one is
/// specified.
///
/// [`Slab`] keeps keys stable across removals, reports only live elements
/// through `len`, and detects keys whose node has been removed (until the
/// slot is reused by a later insertion). Any other [Granite] storage can be
/// substituted through the third type parameter of [`Tree`]; note that the
/// *sparse* list storages panic on holes instead of reporting a stale
/// handle, and that their `len` counts holes in.
///
/// [`Slab`]: https://docs.rs/slab/*/slab/struct.Slab.html " "
/// [Granite]: https://docs.rs/granite/*/granite/ " "
/// [`Tree`]: tree/struct.Tree.html " "
pub type DefaultStorage<T> = slab::Slab<T>;

mod init;
mod node;
pub mod merge;
pub mod raw;
pub mod traversal;
pub mod tree;

pub(crate) mod util;

pub use init::TreeInit;
pub use node::Node;
pub use traversal::{Dfs, DfsMut, DfsOrder, PostOrder, PreOrder};
pub use tree::{NodeKey, NodeRef, NodeRefMut, Tree};

/// A prelude for using Polytree, containing the most used types for safe glob-importing.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        tree, NodeKey, NodeRef, NodeRefMut, PostOrder, PreOrder, Tree, TreeError, TreeInit,
    };
}

use core::fmt::{self, Display, Formatter};

/// The error type reported by the checked operations on [`Tree`].
///
/// [`Tree`]: tree/struct.Tree.html " "
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum TreeError {
    /// A key was supplied to an operation on a tree it does not belong to,
    /// or its node has since been removed.
    HandleOutOfTree,
    /// The node was the root node, which cannot be moved within its tree or
    /// merged into a parent.
    WasRootNode,
    /// A subtree move would have placed a node inside its own descendant
    /// set.
    CycleWouldForm,
    /// The operation requires a non-empty tree operand.
    EmptyTree,
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::HandleOutOfTree => "the handle does not belong to this tree",
            Self::WasRootNode => "cannot detach the root node of a tree from its parent",
            Self::CycleWouldForm => "the destination is part of the moved subtree",
            Self::EmptyTree => "cannot adopt an empty tree",
        })
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl std::error::Error for TreeError {}
