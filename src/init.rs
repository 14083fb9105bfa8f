//! Bulk construction of trees from recursive initializers.

use alloc::vec::Vec;

/// A recursive initializer: a root value paired with initializers for its
/// children, in order.
///
/// Consumed by [`Tree::from`] (which moves the values into the tree) and
/// [`Tree::from_init`] (which clones them out of a shared initializer). The
/// [`tree!`] macro is the usual way to spell one out:
///
/// ```rust
/// use polytree::{tree, Tree, TreeInit};
///
/// let init: TreeInit<i32> = tree!(1 => [tree!(2 => [3, 4]), 5]);
/// let tree = Tree::<_>::from(init);
/// assert_eq!(tree.len(), 5);
/// ```
///
/// [`Tree::from`]: tree/struct.Tree.html#impl-From%3CTreeInit%3CT%3E%3E " "
/// [`Tree::from_init`]: tree/struct.Tree.html#method.from_init " "
/// [`tree!`]: macro.tree.html " "
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TreeInit<T> {
    /// The value for the node described by this initializer.
    pub value: T,
    /// Initializers for the node's children, leftmost first.
    pub children: Vec<TreeInit<T>>,
}

impl<T> TreeInit<T> {
    /// Creates an initializer from a value and its children initializers.
    pub fn new(value: T, children: Vec<TreeInit<T>>) -> Self {
        Self { value, children }
    }

    /// Creates an initializer from a value and anything iterable over
    /// children initializers.
    pub fn branch<I>(value: T, children: I) -> Self
    where
        I: IntoIterator<Item = TreeInit<T>>,
    {
        Self {
            value,
            children: children.into_iter().collect(),
        }
    }

    /// Returns the total number of nodes this initializer describes.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeInit::node_count)
            .sum::<usize>()
    }
}

impl<T> From<T> for TreeInit<T> {
    fn from(value: T) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }
}

/// Builds a [`TreeInit`] literal.
///
/// A plain expression describes a leaf; `value => [child, …]` describes a
/// node with children, where each child is either another `tree!` invocation
/// or a plain value:
///
/// ```rust
/// use polytree::{tree, Tree, PreOrder};
///
/// let tree = Tree::<_>::from(tree!(1 => [tree!(2 => [3, 4]), tree!(5 => [6, 7])]));
/// let pre: Vec<i32> = tree.dfs::<PreOrder>().map(|n| *n.value()).collect();
/// assert_eq!(pre, [1, 2, 3, 4, 5, 6, 7]);
/// ```
///
/// [`TreeInit`]: struct.TreeInit.html " "
#[macro_export]
macro_rules! tree {
    ($value:expr) => {
        $crate::TreeInit::from($value)
    };
    ($value:expr => [$($child:expr),* $(,)?]) => {
        $crate::TreeInit::branch($value, [$($crate::TreeInit::from($child)),*])
    };
}
