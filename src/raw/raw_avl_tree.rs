use alloc::vec::Vec;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::mem;

use log::{debug, trace};
use smallvec::SmallVec;

use super::arena::Arena;
use super::node::{AvlNode, Side};
use super::node_id::NodeId;
use crate::compare::Comparator;

/// Inline capacity of the explicit stack used by whole-tree walks.
/// An AVL tree holding `NodeId::MAX` nodes is at most 45 levels deep, so the
/// walk never spills to the heap. 64 is one of the array sizes `smallvec`
/// implements `Array` for without its `const_generics` feature.
pub(crate) const WALK_DEPTH: usize = 64;

type WalkStack = SmallVec<[NodeId; WALK_DEPTH]>;

/// The AVL engine backing `OSAvlTree`.
#[derive(Clone)]
pub(crate) struct RawAvlTree<T, C> {
    /// Every node of the tree; links between them are `NodeId`s into this arena.
    nodes: Arena<AvlNode<T>>,
    root: Option<NodeId>,
    cmp: C,
}

impl<T, C> RawAvlTree<T, C> {
    pub(crate) const fn new(cmp: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            cmp,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Height of the whole tree; 0 when empty.
    pub(crate) fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    pub(crate) fn clear(&mut self) {
        if self.root.is_some() {
            debug!("clearing tree of {} elements", self.len());
        }
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> &T {
        &self.nodes.get(id).value
    }

    #[inline]
    fn node(&self, id: NodeId) -> &AvlNode<T> {
        self.nodes.get(id)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut AvlNode<T> {
        self.nodes.get_mut(id)
    }

    fn size_of(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.node(id).size())
    }

    fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.node(id).height())
    }

    /// The smallest value in sorted order.
    pub(crate) fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    /// The largest value in sorted order.
    pub(crate) fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// Follows `side` links from `id` until there are none left.
    fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(child) = self.node(id).child(side) {
            id = child;
        }
        id
    }

    /// The in-order neighbour of `id` towards `side`.
    pub(crate) fn step(&self, id: NodeId, side: Side) -> Option<NodeId> {
        if let Some(child) = self.node(id).child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        // Climb until we arrive from the opposite side.
        let mut from = id;
        while let Some(parent) = self.node(from).parent() {
            if self.node(parent).child(side.opposite()) == Some(from) {
                return Some(parent);
            }
            from = parent;
        }
        None
    }

    /// Finds the node at zero-based position `rank` in sorted order.
    pub(crate) fn select(&self, mut rank: usize) -> Option<NodeId> {
        if rank >= self.len() {
            return None;
        }

        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            let left_size = self.size_of(node.left());
            cursor = match rank.cmp(&left_size) {
                Less => node.left(),
                Equal => return Some(id),
                Greater => {
                    rank -= left_size + 1;
                    node.right()
                }
            };
        }

        None
    }

    /// Consumes the tree, returning its values in sorted order.
    pub(crate) fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        let mut stack = WalkStack::new();
        let mut cursor = self.root.take();

        loop {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.node(id).left();
            }
            let Some(id) = stack.pop() else {
                break;
            };
            // Ancestors still on the stack are untouched, so the node can go now.
            let node = self.nodes.remove(id);
            cursor = node.right();
            sorted.push(node.value);
        }

        sorted
    }

    /// Points whatever referenced `old` (its parent's child slot, or the root
    /// slot) at `new` instead.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self
                    .node(parent)
                    .side_of(old)
                    .expect("`RawAvlTree::replace_child()` - `old` is not a child of `parent`!");
                self.node_mut(parent).set_child(side, new);
            }
        }
    }

    /// Rotates `x` above its parent.
    ///
    /// `x` takes its parent's place, the parent becomes `x`'s child on the far
    /// side, and `x`'s inner subtree moves across to the old parent. Sizes and
    /// heights are left stale for [`restore`](Self::restore) to fix.
    fn promote(&mut self, x: NodeId) {
        let parent = self.node(x).parent().expect("`RawAvlTree::promote()` - node has no parent!");
        let grandparent = self.node(parent).parent();
        let side = self
            .node(parent)
            .side_of(x)
            .expect("`RawAvlTree::promote()` - node is not a child of its parent!");
        let inner = self.node(x).child(side.opposite());

        self.replace_child(grandparent, parent, Some(x));
        self.node_mut(x).set_parent(grandparent);

        self.node_mut(parent).set_child(side, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(parent));
        }

        self.node_mut(x).set_child(side.opposite(), Some(parent));
        self.node_mut(parent).set_parent(Some(x));

        trace!("promoted {x:?} over {parent:?}");
    }

    /// Recomputes size and height at `id`, rotating where the AVL balance is
    /// broken, and walks towards the root while `propagate` is set.
    fn restore(&mut self, mut id: NodeId, mut propagate: bool) {
        loop {
            let node = self.node(id);
            let (left, right) = (node.left(), node.right());
            let (left_height, right_height) = (self.height_of(left), self.height_of(right));
            let size = 1 + self.size_of(left) + self.size_of(right);
            self.node_mut(id).set_size(size);

            let heavy = if left_height > right_height + 1 {
                Side::Left
            } else if right_height > left_height + 1 {
                Side::Right
            } else {
                self.node_mut(id).set_height(1 + left_height.max(right_height));
                match self.node(id).parent() {
                    Some(parent) if propagate => {
                        id = parent;
                        continue;
                    }
                    _ => return,
                }
            };

            let child = self
                .node(id)
                .child(heavy)
                .expect("`RawAvlTree::restore()` - heavy side has no child!");
            let outer = self.node(child).child(heavy);
            let inner = self.node(child).child(heavy.opposite());

            if self.height_of(outer) >= self.height_of(inner) {
                // Single rotation, then revisit `id` in its new, lower position.
                self.promote(child);
                propagate = true;
                continue;
            }

            let pivot = inner.expect("`RawAvlTree::restore()` - inner grandchild is missing!");
            trace!("double rotation at {id:?} through {pivot:?}");
            self.promote(pivot);
            self.promote(pivot);

            let pivot_node = self.node(pivot);
            let lower = pivot_node.left().expect("`RawAvlTree::restore()` - pivot lost its left child!");
            let upper = pivot_node.right().expect("`RawAvlTree::restore()` - pivot lost its right child!");
            self.restore(lower, false);
            id = upper;
            propagate = true;
        }
    }

    /// Splices out a node that has at most one child and rebalances from the
    /// point where the shape changed.
    fn unlink(&mut self, id: NodeId) -> T {
        let node = self.nodes.remove(id);
        let parent = node.parent();
        let child = node.sole_child();

        self.replace_child(parent, id, child);
        if let Some(child) = child {
            self.node_mut(child).set_parent(parent);
            self.restore(child, true);
        } else if let Some(parent) = parent {
            self.restore(parent, true);
        }

        node.value
    }

    /// Removes exactly the node `id`, returning its value.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> T {
        let node = self.node(id);
        if let (Some(left), Some(_)) = (node.left(), node.right()) {
            // The in-order predecessor has no right child; its value moves up
            // into `id`, which keeps the in-order sequence intact.
            let predecessor = self.extreme(left, Side::Right);
            let replacement = self.unlink(predecessor);
            return mem::replace(&mut self.node_mut(id).value, replacement);
        }
        self.unlink(id)
    }
}

impl<T, C: Comparator<T>> RawAvlTree<T, C> {
    /// Inserts `value`, placing it after any values that compare equal.
    pub(crate) fn insert(&mut self, value: T) -> NodeId {
        let Some(mut cursor) = self.root else {
            let id = self.nodes.insert(AvlNode::leaf(value, None));
            self.root = Some(id);
            return id;
        };

        let side = loop {
            let node = self.node(cursor);
            let side = match self.cmp.compare(&value, &node.value) {
                Less => Side::Left,
                Equal | Greater => Side::Right,
            };
            match node.child(side) {
                Some(child) => cursor = child,
                None => break side,
            }
        };

        let id = self.nodes.insert(AvlNode::leaf(value, Some(cursor)));
        self.node_mut(cursor).set_child(side, Some(id));
        self.restore(id, true);
        id
    }

    /// Finds some node whose value compares equal to `value`.
    pub(crate) fn find(&self, value: &T) -> Option<NodeId> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            cursor = match self.cmp.compare(value, &node.value) {
                Less => node.left(),
                Greater => node.right(),
                Equal => return Some(id),
            };
        }
        None
    }

    /// Rank of the leftmost value that compares equal to `value`.
    pub(crate) fn rank_of(&self, value: &T) -> Option<usize> {
        let mut found = None;
        // Number of values known to sort before the current subtree.
        let mut before = 0;
        let mut cursor = self.root;

        while let Some(id) = cursor {
            let node = self.node(id);
            let left_size = self.size_of(node.left());
            cursor = match self.cmp.compare(value, &node.value) {
                Less => node.left(),
                Greater => {
                    before += left_size + 1;
                    node.right()
                }
                Equal => {
                    // Equal values may also sit further left; keep looking.
                    found = Some(before + left_size);
                    node.left()
                }
            };
        }

        found
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use crate::compare::NaturalOrder;
    use alloc::string::String;
    use alloc::vec;
    use core::cmp::Ordering;
    use proptest::prelude::*;

    type Tree = RawAvlTree<i32, NaturalOrder>;

    impl<T, C: Comparator<T>> RawAvlTree<T, C> {
        /// Checks every structural invariant and panics listing all violations.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            match self.root {
                None => {
                    if self.nodes.len() != 0 {
                        errors.push(alloc::format!("empty root but {} live nodes", self.nodes.len()));
                    }
                }
                Some(root) => {
                    if let Some(parent) = self.node(root).parent() {
                        errors.push(alloc::format!("root {:?} has parent {:?}", root, parent));
                    }
                    let (size, _) = self.validate_node(root, &mut errors);
                    if size != self.nodes.len() {
                        errors.push(alloc::format!(
                            "reachable nodes {} != live nodes {}",
                            size,
                            self.nodes.len()
                        ));
                    }
                }
            }

            // In-order walk through parent links must be sorted.
            let mut cursor = self.first();
            let mut previous: Option<NodeId> = None;
            let mut visited = 0;
            while let Some(id) = cursor {
                if let Some(previous) = previous
                    && self.cmp.compare(self.value(previous), self.value(id)) == Ordering::Greater
                {
                    errors.push(alloc::format!("in-order {:?} sorts after {:?}", previous, id));
                }
                visited += 1;
                previous = Some(id);
                cursor = self.step(id, Side::Right);
            }
            if visited != self.len() {
                errors.push(alloc::format!("in-order walk visited {} of {}", visited, self.len()));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the actual (size, height) of the subtree at `id`.
        fn validate_node(&self, id: NodeId, errors: &mut Vec<String>) -> (usize, u32) {
            let node = self.node(id);
            let (left_size, left_height) = self.validate_child(id, node.left(), errors);
            let (right_size, right_height) = self.validate_child(id, node.right(), errors);

            let size = 1 + left_size + right_size;
            let height = 1 + left_height.max(right_height);
            if node.size() != size {
                errors.push(alloc::format!("{:?}: stored size {} != actual {}", id, node.size(), size));
            }
            if node.height() != height {
                errors.push(alloc::format!("{:?}: stored height {} != actual {}", id, node.height(), height));
            }
            if left_height.abs_diff(right_height) > 1 {
                errors.push(alloc::format!(
                    "{:?}: unbalanced, left height {} vs right height {}",
                    id,
                    left_height,
                    right_height
                ));
            }
            (size, height)
        }

        fn validate_child(&self, parent: NodeId, child: Option<NodeId>, errors: &mut Vec<String>) -> (usize, u32) {
            let Some(child) = child else {
                return (0, 0);
            };
            if self.node(child).parent() != Some(parent) {
                errors.push(alloc::format!("child {:?} does not point back at {:?}", child, parent));
            }
            self.validate_node(child, errors)
        }

        fn sorted_values(&self) -> Vec<T>
        where
            T: Clone,
        {
            let mut values = Vec::with_capacity(self.len());
            let mut cursor = self.first();
            while let Some(id) = cursor {
                values.push(self.value(id).clone());
                cursor = self.step(id, Side::Right);
            }
            values
        }
    }

    fn tree_of(values: &[i32]) -> Tree {
        let mut tree = Tree::new(NaturalOrder);
        for &value in values {
            tree.insert(value);
            tree.validate_invariants();
        }
        tree
    }

    #[test]
    fn promote_rewires_the_four_node_neighbourhood() {
        // Built without rebalancing so the shape is known: 4 -> (2 -> (1, 3), 5).
        let mut tree = Tree::new(NaturalOrder);
        let four = tree.nodes.insert(AvlNode::leaf(4, None));
        let two = tree.nodes.insert(AvlNode::leaf(2, Some(four)));
        let five = tree.nodes.insert(AvlNode::leaf(5, Some(four)));
        let one = tree.nodes.insert(AvlNode::leaf(1, Some(two)));
        let three = tree.nodes.insert(AvlNode::leaf(3, Some(two)));
        tree.root = Some(four);
        tree.node_mut(four).set_child(Side::Left, Some(two));
        tree.node_mut(four).set_child(Side::Right, Some(five));
        tree.node_mut(two).set_child(Side::Left, Some(one));
        tree.node_mut(two).set_child(Side::Right, Some(three));

        tree.promote(two);

        assert_eq!(tree.root, Some(two));
        assert_eq!(tree.node(two).parent(), None);
        assert_eq!(tree.node(two).left(), Some(one));
        assert_eq!(tree.node(two).right(), Some(four));
        assert_eq!(tree.node(four).parent(), Some(two));
        assert_eq!(tree.node(four).left(), Some(three));
        assert_eq!(tree.node(three).parent(), Some(four));
        assert_eq!(tree.node(four).right(), Some(five));
        assert_eq!(tree.sorted_values(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ascending_inserts_stay_logarithmic() {
        let tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.height(), 3);
        assert_eq!(*tree.value(tree.root.unwrap()), 4);
    }

    #[test]
    fn zig_zag_insert_uses_double_rotation() {
        let tree = tree_of(&[3, 1, 2]);
        let root = tree.root.unwrap();
        assert_eq!(*tree.value(root), 2);
        assert_eq!(tree.height(), 2);

        let tree = tree_of(&[1, 3, 2]);
        assert_eq!(*tree.value(tree.root.unwrap()), 2);
    }

    #[test]
    fn duplicates_are_kept_and_counted() {
        let tree = tree_of(&[5, 5, 5, 1, 5, 9, 5]);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.sorted_values(), vec![1, 5, 5, 5, 5, 5, 9]);
        assert_eq!(tree.rank_of(&5), Some(1));
        assert_eq!(tree.rank_of(&9), Some(6));
    }

    #[test]
    fn remove_leaf_single_child_and_two_children() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9, 6]);

        // Leaf.
        let id = tree.find(&1).unwrap();
        assert_eq!(tree.remove_node(id), 1);
        tree.validate_invariants();

        // 7 now has only its left child, 6.
        let id = tree.find(&7).unwrap();
        assert_eq!(tree.remove_node(id), 7);
        tree.validate_invariants();

        // Root with two children.
        let id = tree.find(&5).unwrap();
        assert_eq!(tree.remove_node(id), 5);
        tree.validate_invariants();

        assert_eq!(tree.sorted_values(), vec![3, 4, 6, 8, 9]);
    }

    #[test]
    fn removing_last_node_empties_tree() {
        let mut tree = tree_of(&[42]);
        let id = tree.find(&42).unwrap();
        assert_eq!(tree.remove_node(id), 42);
        assert!(tree.root.is_none());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        tree.validate_invariants();
    }

    #[test]
    fn root_with_one_child_hands_over_root() {
        let mut tree = tree_of(&[1, 2]);
        let id = tree.find(&1).unwrap();
        tree.remove_node(id);
        tree.validate_invariants();
        assert_eq!(*tree.value(tree.root.unwrap()), 2);
    }

    #[test]
    fn select_walks_by_subtree_size() {
        let tree = tree_of(&[50, 20, 80, 10, 30, 70, 90, 60]);
        let expected = [10, 20, 30, 50, 60, 70, 80, 90];
        for (rank, value) in expected.iter().enumerate() {
            assert_eq!(tree.value(tree.select(rank).unwrap()), value);
        }
        assert!(tree.select(expected.len()).is_none());
    }

    #[test]
    fn step_moves_both_ways() {
        let tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        let three = tree.find(&3).unwrap();
        assert_eq!(*tree.value(tree.step(three, Side::Right).unwrap()), 4);
        assert_eq!(*tree.value(tree.step(three, Side::Left).unwrap()), 2);
        assert!(tree.step(tree.first().unwrap(), Side::Left).is_none());
        assert!(tree.step(tree.last().unwrap(), Side::Right).is_none());
    }

    #[test]
    fn into_sorted_vec_drains_in_order() {
        let tree = tree_of(&[9, 2, 7, 2, 5, 1]);
        assert_eq!(tree.into_sorted_vec(), vec![1, 2, 2, 5, 7, 9]);
    }

    #[test]
    fn walk_stack_covers_the_tallest_possible_tree() {
        // Tallest height whose minimum node count still fits in the arena.
        let (mut height, mut shorter, mut taller) = (1usize, 0u64, 1u64);
        while shorter + taller + 1 <= NodeId::MAX as u64 {
            (shorter, taller) = (taller, shorter + taller + 1);
            height += 1;
        }
        assert_eq!(height, 45);
        assert!(height <= WALK_DEPTH);
    }

    #[test]
    fn into_sorted_vec_walks_a_deep_tree() {
        let tree = tree_of(&(0..5_000).rev().collect::<Vec<_>>());
        assert!(tree.height() > 12);
        assert_eq!(tree.into_sorted_vec(), (0..5_000).collect::<Vec<_>>());
    }

    #[test]
    fn clear_resets_everything() {
        let mut tree = tree_of(&[3, 1, 2]);
        tree.clear();
        tree.validate_invariants();
        assert_eq!(tree.len(), 0);
        tree.clear();
        assert!(tree.first().is_none());
    }

    #[test]
    fn custom_comparator_orders_descending() {
        let mut tree = RawAvlTree::new(|a: &i32, b: &i32| b.cmp(a));
        for value in [1, 5, 3, 4, 2] {
            tree.insert(value);
        }
        tree.validate_invariants();
        assert_eq!(tree.sorted_values(), vec![5, 4, 3, 2, 1]);
        assert_eq!(tree.rank_of(&4), Some(1));
    }

    // Operations replayed against a sorted `Vec` model.
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        RemoveAt(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0i32..64).prop_map(Op::Insert),
            2 => (0i32..64).prop_map(Op::Remove),
            1 => any::<usize>().prop_map(Op::RemoveAt),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree = Tree::new(NaturalOrder);
            let mut model: Vec<i32> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert(value) => {
                        tree.insert(value);
                        let at = model.partition_point(|&v| v <= value);
                        model.insert(at, value);
                    }
                    Op::Remove(value) => {
                        let removed = tree.find(&value).map(|id| tree.remove_node(id));
                        let expected = model.iter().position(|&v| v == value).map(|at| model.remove(at));
                        prop_assert_eq!(removed, expected);
                    }
                    Op::RemoveAt(which) => {
                        if model.is_empty() {
                            prop_assert!(tree.select(which).is_none());
                            continue;
                        }
                        let rank = which % model.len();
                        let id = tree.select(rank).unwrap();
                        prop_assert_eq!(tree.remove_node(id), model.remove(rank));
                    }
                }

                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(tree.sorted_values(), model.clone());
            }
        }

        #[test]
        fn rank_of_finds_leftmost_equal(values in prop::collection::vec(0i32..32, 1..200)) {
            let tree = tree_of(&values);
            let mut sorted = values.clone();
            sorted.sort_unstable();

            for target in 0i32..33 {
                let expected = sorted.iter().position(|&v| v == target);
                prop_assert_eq!(tree.rank_of(&target), expected, "rank_of({})", target);
            }
        }

        #[test]
        fn height_is_within_avl_bound(count in 1usize..2000) {
            let mut tree = Tree::new(NaturalOrder);
            for value in 0..count as i32 {
                tree.insert(value);
            }
            // An AVL tree of height h holds at least fib-like N(h) = N(h-1) + N(h-2) + 1 nodes.
            let (mut shorter, mut taller) = (0usize, 1usize);
            for _ in 1..tree.height() {
                (shorter, taller) = (taller, shorter + taller + 1);
            }
            prop_assert!(taller <= count, "height {} for {} nodes", tree.height(), count);
        }
    }
}
