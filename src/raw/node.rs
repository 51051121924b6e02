use super::node_id::NodeId;

/// Which child slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A single AVL node.
///
/// `size` and `height` describe the subtree rooted here. They are derived
/// from the children and only ever rewritten by the tree's rebalancing walk.
#[derive(Clone)]
pub(crate) struct AvlNode<T> {
    pub(crate) value: T,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    // Number of nodes in this subtree, including this one.
    size: usize,
    // 1 for a leaf; a missing child counts as 0.
    height: u32,
}

impl<T> AvlNode<T> {
    /// Creates a detached leaf.
    pub(crate) const fn leaf(value: T, parent: Option<NodeId>) -> Self {
        Self {
            value,
            parent,
            left: None,
            right: None,
            size: 1,
            height: 1,
        }
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<NodeId> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<NodeId> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns which side `child` hangs from, or `None` if it is not a child of this node.
    pub(crate) fn side_of(&self, child: NodeId) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Returns the only child of a node that has at most one.
    pub(crate) fn sole_child(&self) -> Option<NodeId> {
        debug_assert!(
            self.left.is_none() || self.right.is_none(),
            "`AvlNode::sole_child()` - node has two children!"
        );
        self.left.or(self.right)
    }

    #[inline]
    pub(crate) const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    #[inline]
    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: u32) {
        self.height = height;
    }
}
