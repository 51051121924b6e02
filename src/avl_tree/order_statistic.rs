use core::ops::Index;

use super::OSAvlTree;
use crate::compare::Comparator;
use crate::{Error, Rank};

impl<T, C> OSAvlTree<T, C> {
    /// Returns the value at position `rank` in sorted order.
    ///
    /// The rank is zero-based; duplicates each occupy their own rank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RankOutOfRange`] if `rank >= self.len()`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::{ErrorKind, OSAvlTree};
    ///
    /// let tree = OSAvlTree::from([10, 30, 20]);
    /// assert_eq!(tree.get(1), Ok(&20));
    /// assert_eq!(tree.get(3).unwrap_err().kind(), ErrorKind::OutOfRange);
    /// ```
    pub fn get(&self, rank: usize) -> Result<&T, Error> {
        let id = self.raw.select(rank).ok_or(Error::RankOutOfRange { rank, len: self.len() })?;
        Ok(self.raw.value(id))
    }

    /// Removes and returns the value at position `rank` in sorted order.
    ///
    /// The node found by the rank descent is the one removed, so with
    /// duplicates present the other equal values keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RankOutOfRange`] if `rank >= self.len()`; the tree is
    /// left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::from([5, 3, 8, 1, 4, 7, 9]);
    /// assert_eq!(tree.remove_at(0), Ok(1));
    /// assert_eq!(tree.len(), 6);
    /// assert!(tree.remove_at(6).is_err());
    /// ```
    pub fn remove_at(&mut self, rank: usize) -> Result<T, Error> {
        let id = self.raw.select(rank).ok_or(Error::RankOutOfRange { rank, len: self.len() })?;
        Ok(self.raw.remove_node(id))
    }
}

impl<T, C: Comparator<T>> OSAvlTree<T, C> {
    /// Returns the rank of the first value that compares equal to `value`, or
    /// `None` if there is none.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([1, 2, 2, 2, 3]);
    /// assert_eq!(tree.index_of(&2), Some(1));
    /// assert_eq!(tree.index_of(&3), Some(4));
    /// assert_eq!(tree.index_of(&4), None);
    /// ```
    #[must_use]
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.raw.rank_of(value)
    }
}

/// Indexes into the tree by rank.
///
/// # Panics
///
/// Panics if the rank is out of bounds.
///
/// # Examples
///
/// ```
/// use avl_ost::{OSAvlTree, Rank};
///
/// let tree = OSAvlTree::from(['c', 'a', 'b']);
/// assert_eq!(tree[Rank(0)], 'a');
/// assert_eq!(tree[Rank(2)], 'c');
/// ```
impl<T, C> Index<Rank> for OSAvlTree<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &T {
        match self.get(rank.0) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}
