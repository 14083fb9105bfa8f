use pretty_assertions::assert_eq;

use polytree::{tree, PostOrder, PreOrder, Tree};

/// ```text
///         1
///        / \
///       2   5
///      /|   |\
///     3 4   6 7
/// ```
fn sample_tree() -> Tree<i32> {
    Tree::from(tree!(1 => [tree!(2 => [3, 4]), tree!(5 => [6, 7])]))
}

#[test]
fn traversals_yield_the_expected_sequences() {
    let tree = sample_tree();

    let pre: Vec<i32> = tree.dfs::<PreOrder>().map(|n| *n.value()).collect();
    assert_eq!(pre, [1, 2, 3, 4, 5, 6, 7]);

    let post: Vec<i32> = tree.dfs::<PostOrder>().map(|n| *n.value()).collect();
    assert_eq!(post, [3, 4, 2, 6, 7, 5, 1]);

    let reverse_pre: Vec<i32> = tree.reverse_dfs::<PreOrder>().map(|n| *n.value()).collect();
    assert_eq!(reverse_pre, [7, 6, 5, 4, 3, 2, 1]);

    let reverse_post: Vec<i32> = tree.reverse_dfs::<PostOrder>().map(|n| *n.value()).collect();
    assert_eq!(reverse_post, [1, 5, 7, 6, 2, 4, 3]);
}

#[test]
fn traversal_of_an_empty_tree_yields_nothing() {
    let tree: Tree<i32> = Tree::new();
    assert!(tree.dfs::<PreOrder>().next().is_none());
    assert!(tree.dfs::<PostOrder>().next().is_none());
    assert!(tree.reverse_dfs::<PreOrder>().next().is_none());
    assert!(tree.iter().next().is_none());
}

#[test]
fn traversal_of_a_single_node_yields_it_once_in_every_order() {
    let tree: Tree<i32> = Tree::from(tree!(42));
    for values in [
        tree.dfs::<PreOrder>().map(|n| *n.value()).collect::<Vec<_>>(),
        tree.dfs::<PostOrder>().map(|n| *n.value()).collect(),
        tree.reverse_dfs::<PreOrder>().map(|n| *n.value()).collect(),
        tree.reverse_dfs::<PostOrder>().map(|n| *n.value()).collect(),
    ] {
        assert_eq!(values, [42]);
    }
}

#[test]
fn forward_and_backward_cursors_meet_exactly_once() {
    let tree = sample_tree();
    let mut iter = tree.dfs::<PreOrder>();
    let mut front = Vec::new();
    let mut back = Vec::new();
    loop {
        match iter.next() {
            Some(node) => front.push(*node.value()),
            None => break,
        }
        match iter.next_back() {
            Some(node) => back.push(*node.value()),
            None => break,
        }
    }
    back.reverse();
    front.extend(back);
    assert_eq!(front, [1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn exhausted_iterators_stay_exhausted() {
    let tree = sample_tree();
    let mut iter = tree.dfs::<PostOrder>();
    assert_eq!(iter.by_ref().count(), 7);
    assert!(iter.next().is_none());
    assert!(iter.next_back().is_none());
}

#[test]
fn traversal_composes_with_sequence_algorithms() {
    let tree = sample_tree();

    // Searching in different schedules finds the same node.
    let in_pre = tree.dfs::<PreOrder>().find(|n| *n.value() == 6).unwrap();
    let in_post = tree.dfs::<PostOrder>().find(|n| *n.value() == 6).unwrap();
    assert_eq!(in_pre, in_post);
    assert_eq!(*in_pre.parent().unwrap().value(), 5);

    assert!(tree.dfs::<PreOrder>().all(|n| *n.value() >= 1));
    assert!(!tree.dfs::<PreOrder>().any(|n| *n.value() == 8));
    assert_eq!(tree.iter().sum::<i32>(), 28);
    assert_eq!(tree.dfs::<PostOrder>().position(|n| *n.value() == 2), Some(2));
}

#[test]
fn dfs_from_resumes_mid_schedule() {
    let tree = sample_tree();
    let five = tree
        .dfs::<PreOrder>()
        .find(|n| *n.value() == 5)
        .unwrap()
        .key();

    let tail: Vec<i32> = tree
        .dfs_from::<PreOrder>(&five)
        .unwrap()
        .map(|n| *n.value())
        .collect();
    assert_eq!(tail, [5, 6, 7]);

    let two = tree
        .dfs::<PreOrder>()
        .find(|n| *n.value() == 2)
        .unwrap()
        .key();
    let tail: Vec<i32> = tree
        .dfs_from::<PostOrder>(&two)
        .unwrap()
        .map(|n| *n.value())
        .collect();
    assert_eq!(tail, [2, 6, 7, 5, 1]);
}

#[test]
fn peek_exposes_the_cursor_as_a_handle() {
    let tree = sample_tree();
    let mut iter = tree.dfs::<PreOrder>();
    assert_eq!(*iter.peek().unwrap().value(), 1);
    // Peeking does not advance.
    assert_eq!(*iter.peek().unwrap().value(), 1);
    iter.next();
    assert_eq!(*iter.peek().unwrap().value(), 2);

    let rest: Vec<i32> = iter.map(|n| *n.value()).collect();
    assert_eq!(rest, [2, 3, 4, 5, 6, 7]);
}

#[test]
fn mutable_traversal_visits_every_value_once() {
    let mut tree = sample_tree();
    for value in tree.dfs_mut::<PreOrder>() {
        *value *= 10;
    }
    let pre: Vec<i32> = tree.dfs::<PreOrder>().map(|n| *n.value()).collect();
    assert_eq!(pre, [10, 20, 30, 40, 50, 60, 70]);

    // The post-order mutable schedule touches the same set of nodes.
    let mut seen = Vec::new();
    for value in tree.dfs_mut::<PostOrder>() {
        seen.push(*value);
        *value += 1;
    }
    assert_eq!(seen, [30, 40, 20, 60, 70, 50, 10]);

    let reversed: Vec<i32> = tree
        .reverse_dfs_mut::<PreOrder>()
        .map(|value| *value)
        .collect();
    assert_eq!(reversed, [71, 61, 51, 41, 31, 21, 11]);
}

#[test]
fn unordered_iteration_covers_every_value() {
    let mut tree = sample_tree();
    let mut values: Vec<i32> = tree.iter().copied().collect();
    values.sort_unstable();
    assert_eq!(values, [1, 2, 3, 4, 5, 6, 7]);

    for value in tree.iter_mut() {
        *value = -*value;
    }
    assert_eq!(tree.iter().sum::<i32>(), -28);

    // `IntoIterator` is wired up for both borrow flavors.
    let mut total = 0;
    for value in &tree {
        total += *value;
    }
    assert_eq!(total, -28);
    for value in &mut tree {
        *value = 0;
    }
    assert_eq!(tree.iter().sum::<i32>(), 0);
}

#[test]
fn iterators_borrow_the_tree_they_walk() {
    let tree = sample_tree();
    let handles: Vec<_> = tree.dfs::<PreOrder>().collect();
    // Handles from a traversal stay usable as long as the tree lives.
    assert_eq!(*handles[3].value(), 4);
    assert_eq!(handles[3].parent().unwrap(), handles[1]);
}
