use pretty_assertions::assert_eq;

use polytree::{tree, NodeKey, PreOrder, Tree, TreeError, TreeInit};

/// The tree used throughout the structural tests:
///
/// ```text
///         1
///        / \
///       2   5
///      /|   |\
///     3 4   6 7
/// ```
fn sample_tree() -> Tree<i32> {
    Tree::from(sample_init())
}

fn sample_init() -> TreeInit<i32> {
    tree!(1 => [tree!(2 => [3, 4]), tree!(5 => [6, 7])])
}

fn pre_order(tree: &Tree<i32>) -> Vec<i32> {
    tree.dfs::<PreOrder>().map(|n| *n.value()).collect()
}

fn key_of(tree: &Tree<i32>, value: i32) -> NodeKey {
    tree.dfs::<PreOrder>()
        .find(|n| *n.value() == value)
        .expect("value not in tree")
        .key()
}

/// Checks every structural invariant the tree promises to uphold after each
/// mutating operation.
fn assert_structure(tree: &Tree<i32>) {
    assert_eq!(tree.is_empty(), tree.len() == 0);
    assert_eq!(tree.root().is_none(), tree.is_empty());
    let root = match tree.root() {
        Some(root) => root,
        None => {
            assert!(tree.leftmost().is_none());
            assert!(tree.rightmost().is_none());
            assert_eq!(tree.dfs::<PreOrder>().count(), 0);
            return;
        }
    };

    // The cached endpoints match first-child and last-child walks.
    let mut cursor = root.clone();
    while let Some(child) = cursor.child(0) {
        cursor = child;
    }
    assert_eq!(tree.leftmost().unwrap(), cursor);
    let mut cursor = root.clone();
    while cursor.child_count() > 0 {
        cursor = cursor.child(cursor.child_count() - 1).unwrap();
    }
    assert_eq!(tree.rightmost().unwrap(), cursor);

    // Every node is reachable, exactly once.
    assert_eq!(tree.dfs::<PreOrder>().count(), tree.len());
    assert_eq!(root.descendant_count() + 1, tree.len());

    for node in tree.dfs::<PreOrder>() {
        // Parent and sibling bookkeeping agree with the children lists.
        for (index, child) in node.children().enumerate() {
            assert_eq!(child.parent().unwrap(), node);
            assert_eq!(child.sibling_index(), Some(index));
        }
        // The cached ancestor chain matches a walk up the parent links.
        let mut expected = Vec::new();
        let mut cursor = node.parent();
        while let Some(parent) = cursor {
            cursor = parent.parent();
            expected.push(parent);
        }
        let chain: Vec<_> = node.ancestors().collect();
        assert_eq!(chain, expected);
        assert!(!node.has_ancestor(&node));
    }
}

#[test]
fn the_sample_tree_is_structured_as_advertised() {
    let tree = sample_tree();
    assert_eq!(tree.len(), 7);
    assert_structure(&tree);

    let root = tree.root().unwrap();
    assert_eq!(*root.value(), 1);
    let children: Vec<i32> = root.children().map(|c| *c.value()).collect();
    assert_eq!(children, [2, 5]);
    assert_eq!(*tree.leftmost().unwrap().value(), 3);
    assert_eq!(*tree.rightmost().unwrap().value(), 7);
    assert_eq!(root.descendant_count(), 6);
    assert_eq!(root.child(0).unwrap().descendant_count(), 2);
}

#[test]
fn initializer_construction_matches_manual_emplacement() {
    let mut manual: Tree<i32> = Tree::new();
    let one = manual.emplace_node(None, 1).unwrap();
    let two = manual.emplace_node(Some(&one), 2).unwrap();
    manual.emplace_node(Some(&two), 3).unwrap();
    manual.emplace_node(Some(&two), 4).unwrap();
    let five = manual.emplace_node(Some(&one), 5).unwrap();
    manual.emplace_node(Some(&five), 6).unwrap();
    manual.emplace_node(Some(&five), 7).unwrap();

    assert_eq!(manual, sample_tree());
    assert_structure(&manual);
    assert_eq!(sample_init().node_count(), 7);
}

#[test]
fn cloned_and_subtree_copied_trees_are_deep_copies() {
    let original = sample_tree();
    let mut copy = original.clone();
    assert_eq!(copy, original);

    // Mutating the copy leaves the original untouched.
    *copy.root_mut().unwrap().value_mut() = 100;
    assert_ne!(copy, original);
    assert_eq!(*original.root().unwrap().value(), 1);

    let whole = Tree::from_subtree(original.root().unwrap());
    assert_eq!(whole, original);
    assert_structure(&whole);
}

#[test]
fn erase_scenarios_preserve_the_invariants() {
    // Erasing the leaf 4.
    let mut tree = sample_tree();
    tree.erase_subtree(&key_of(&tree, 4)).unwrap();
    assert_eq!(tree.len(), 6);
    assert_eq!(pre_order(&tree), [1, 2, 3, 5, 6, 7]);
    assert_structure(&tree);

    // Erasing the subtree rooted at 2.
    let mut tree = sample_tree();
    tree.erase_subtree(&key_of(&tree, 2)).unwrap();
    assert_eq!(tree.len(), 4);
    assert_eq!(pre_order(&tree), [1, 5, 6, 7]);
    assert_eq!(*tree.leftmost().unwrap().value(), 6);
    assert_structure(&tree);

    // Erasing the root.
    let mut tree = sample_tree();
    tree.erase_subtree(&key_of(&tree, 1)).unwrap();
    assert!(tree.is_empty());
    assert_structure(&tree);
}

#[test]
fn erased_keys_go_stale() {
    let mut tree = sample_tree();
    let two = key_of(&tree, 2);
    tree.erase_subtree(&two).unwrap();
    assert_eq!(tree.node(&two).unwrap_err(), TreeError::HandleOutOfTree);
    assert_eq!(
        tree.erase_subtree(&two).unwrap_err(),
        TreeError::HandleOutOfTree,
    );
}

#[test]
fn chop_then_adopt_restores_an_equal_tree() {
    let mut tree = sample_tree();
    let five = key_of(&tree, 5);
    let one = key_of(&tree, 1);

    let chopped = tree.chop_subtree(&five).unwrap();
    assert_structure(&tree);
    assert_structure(&chopped);
    assert_eq!(chopped, Tree::from(tree!(5 => [6, 7])));
    assert_eq!(*tree.rightmost().unwrap().value(), 4);

    // Re-adopting under the old parent lands at the end of its children,
    // which for a former last child is exactly the original shape.
    tree.adopt_subtree(&one, chopped).unwrap();
    assert_eq!(tree, sample_tree());
    assert_structure(&tree);
}

#[test]
fn chop_then_adopt_elsewhere_grafts_the_subtree() {
    let mut tree = sample_tree();
    let five = key_of(&tree, 5);
    let chopped = tree.chop_subtree(&five).unwrap();
    let three = key_of(&tree, 3);
    let adopted = tree.adopt_subtree(&three, chopped).unwrap();

    assert_eq!(pre_order(&tree), [1, 2, 3, 5, 6, 7, 4]);
    assert_eq!(*tree.node(&adopted).unwrap().value(), 5);
    assert_eq!(tree.node(&three).unwrap().child_count(), 1);
    assert_eq!(tree.root().unwrap().child_count(), 1);
    assert_eq!(*tree.rightmost().unwrap().value(), 4);
    assert_eq!(*tree.leftmost().unwrap().value(), 6);
    assert_structure(&tree);
}

#[test]
fn moving_subtrees_updates_the_spine_caches() {
    // Moving the subtree holding the rightmost node further up the
    // rightmost spine leaves the rightmost node in place.
    let mut tree = sample_tree();
    let seven = key_of(&tree, 7);
    let one = key_of(&tree, 1);
    tree.move_subtree(&seven, &one).unwrap();
    assert_eq!(pre_order(&tree), [1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(*tree.rightmost().unwrap().value(), 7);
    assert_structure(&tree);

    // Moving the subtree holding the leftmost node elsewhere promotes the
    // next leaf in line.
    let mut tree = sample_tree();
    let two = key_of(&tree, 2);
    let six = key_of(&tree, 6);
    tree.move_subtree(&two, &six).unwrap();
    assert_eq!(pre_order(&tree), [1, 5, 6, 2, 3, 4, 7]);
    assert_eq!(*tree.leftmost().unwrap().value(), 3);
    assert_eq!(*tree.rightmost().unwrap().value(), 7);
    assert_structure(&tree);
}

#[test]
fn merge_with_parent_scenarios() {
    // Keeping the original parent value.
    let mut tree = sample_tree();
    tree.merge_with_parent(&key_of(&tree, 2)).unwrap();
    assert_eq!(tree.len(), 6);
    let root = tree.root().unwrap();
    assert_eq!(*root.value(), 1);
    let children: Vec<i32> = root.children().map(|c| *c.value()).collect();
    assert_eq!(children, [3, 4, 5]);
    assert_structure(&tree);

    // Replacing the parent value with the merged-away one.
    let mut tree = sample_tree();
    tree.merge_with_parent_with(&key_of(&tree, 2), polytree::merge::replace)
        .unwrap();
    assert_eq!(*tree.root().unwrap().value(), 2);
    let children: Vec<i32> = tree.root().unwrap().children().map(|c| *c.value()).collect();
    assert_eq!(children, [3, 4, 5]);
    assert_structure(&tree);

    // Merging a leaf which happens to be the leftmost node.
    let mut tree = sample_tree();
    tree.merge_with_parent(&key_of(&tree, 3)).unwrap();
    assert_eq!(pre_order(&tree), [1, 2, 4, 5, 6, 7]);
    assert_eq!(*tree.leftmost().unwrap().value(), 4);
    assert_structure(&tree);

    // Merging the node holding the rightmost leaf as a child.
    let mut tree = sample_tree();
    tree.merge_with_parent(&key_of(&tree, 5)).unwrap();
    assert_eq!(pre_order(&tree), [1, 2, 3, 4, 6, 7]);
    assert_eq!(*tree.rightmost().unwrap().value(), 7);
    assert_structure(&tree);
}

#[test]
fn emplacing_a_new_root_over_a_populated_tree() {
    let mut tree = sample_tree();
    tree.emplace_node(None, 0).unwrap();
    assert_eq!(pre_order(&tree), [0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(*tree.leftmost().unwrap().value(), 3);
    assert_eq!(*tree.rightmost().unwrap().value(), 7);
    assert_structure(&tree);
}

#[test]
fn trees_can_be_swapped_and_taken() {
    let mut first = sample_tree();
    let mut second: Tree<i32> = Tree::from(tree!(8 => [9]));
    std::mem::swap(&mut first, &mut second);
    assert_eq!(first, Tree::from(tree!(8 => [9])));
    assert_eq!(second, sample_tree());

    let taken = std::mem::take(&mut second);
    assert!(second.is_empty());
    assert_eq!(taken, sample_tree());
}

#[test]
fn values_drop_exactly_once() {
    use std::cell::Cell;

    struct DropTracker<'a>(i32, &'a Cell<u32>);
    impl Drop for DropTracker<'_> {
        fn drop(&mut self) {
            self.1.set(self.1.get() + 1);
        }
    }

    let drop_counter = Cell::new(0);
    {
        let mut tree: Tree<DropTracker<'_>> = Tree::new();
        let root = tree.emplace_node(None, DropTracker(0, &drop_counter)).unwrap();
        let branch = tree
            .emplace_node(Some(&root), DropTracker(1, &drop_counter))
            .unwrap();
        for i in 2..5 {
            tree.emplace_node(Some(&branch), DropTracker(i, &drop_counter))
                .unwrap();
        }
        assert_eq!(drop_counter.get(), 0);

        // Erasing a subtree drops the subtree's values, nothing else.
        let leaf = tree.root().unwrap().child(0).unwrap().child(2).unwrap().key();
        tree.erase_subtree(&leaf).unwrap();
        assert_eq!(drop_counter.get(), 1);

        // Chopping transfers ownership without dropping.
        let chopped = tree.chop_subtree(&branch).unwrap();
        assert_eq!(drop_counter.get(), 1);
        drop(chopped);
        assert_eq!(drop_counter.get(), 4);
    }
    // Dropping the tree drops the remaining root.
    assert_eq!(drop_counter.get(), 5);
}

#[test]
fn error_conditions_leave_the_tree_intact() {
    let mut tree = sample_tree();
    let root = key_of(&tree, 1);
    let two = key_of(&tree, 2);
    let three = key_of(&tree, 3);

    assert_eq!(
        tree.move_subtree(&root, &two).unwrap_err(),
        TreeError::WasRootNode,
    );
    assert_eq!(
        tree.move_subtree(&two, &three).unwrap_err(),
        TreeError::CycleWouldForm,
    );
    assert_eq!(
        tree.merge_with_parent(&root).unwrap_err(),
        TreeError::WasRootNode,
    );
    assert_eq!(
        tree.adopt_subtree(&root, Tree::new()).unwrap_err(),
        TreeError::EmptyTree,
    );
    assert_eq!(tree, sample_tree());
    assert_structure(&tree);
}

#[test]
fn debug_output_renders_the_hierarchy() {
    let tree: Tree<i32> = Tree::from(tree!(1 => [tree!(2 => [3]), 4]));
    let rendered = format!("{:?}", tree);
    assert_eq!(rendered, "1\n    2\n        3\n    4\n");
    assert_eq!(format!("{:?}", Tree::<i32>::new()), "<empty tree>");
}
