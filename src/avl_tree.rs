use alloc::vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::compare::{Comparator, NaturalOrder};
use crate::raw::{NodeId, RawAvlTree, Side};

mod buffer;
mod order_statistic;

/// An ordered multiset based on an AVL tree in which every subtree knows its size.
///
/// Values are kept in the order defined by the comparator `C` (by default
/// [`NaturalOrder`], i.e. `T`'s [`Ord`]). Duplicates are allowed; a value that
/// compares equal to ones already present is placed after them.
///
/// Besides the usual membership operations, the tree answers order-statistic
/// queries in O(log n): the value at a rank ([`get`](Self::get)), the rank of a
/// value ([`index_of`](Self::index_of)) and removal by rank
/// ([`remove_at`](Self::remove_at)).
///
/// Positions are always derived from the ordering. Placing a value at a chosen
/// position ([`insert_at`](Self::insert_at)) or overwriting the value at a rank
/// ([`set`](Self::set)) is rejected with [`ErrorKind::Unsupported`](crate::ErrorKind::Unsupported).
///
/// It is a logic error for a value to be modified in such a way that its
/// ordering relative to any other value changes while it is in the tree.
///
/// # Examples
///
/// ```
/// use avl_ost::OSAvlTree;
///
/// let mut tree = OSAvlTree::new();
/// for value in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(value);
/// }
///
/// assert_eq!(tree.len(), 7);
/// assert_eq!(tree.get(0), Ok(&1));
/// assert_eq!(tree.index_of(&7), Some(4));
///
/// tree.remove_at(0).unwrap();
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 4, 5, 7, 8, 9]);
/// ```
#[derive(Clone)]
pub struct OSAvlTree<T, C = NaturalOrder> {
    raw: RawAvlTree<T, C>,
}

/// An iterator over the values of an `OSAvlTree`, in order.
///
/// This `struct` is created by the [`iter`] method on [`OSAvlTree`].
///
/// # Examples
///
/// ```
/// use avl_ost::OSAvlTree;
///
/// let tree = OSAvlTree::from([3, 1, 2]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OSAvlTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T, C = NaturalOrder> {
    raw: &'a RawAvlTree<T, C>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

/// An owning iterator over the values of an `OSAvlTree`, in order.
///
/// This `struct` is created by the [`into_iter`] method on [`OSAvlTree`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: OSAvlTree#method.into_iter
pub struct IntoIter<T> {
    inner: vec::IntoIter<T>,
}

impl<T> OSAvlTree<T> {
    /// Makes a new, empty `OSAvlTree` ordered by `T`'s [`Ord`] implementation.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// tree.insert(1);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C> OSAvlTree<T, C> {
    /// Makes a new, empty `OSAvlTree` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let mut words = OSAvlTree::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// words.extend(["ccc", "a", "bb"]);
    /// assert_eq!(words.first(), Some(&"a"));
    /// ```
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        Self {
            raw: RawAvlTree::new(cmp),
        }
    }

    /// Returns the comparator that orders this tree.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the number of values in the tree, counting duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single value.
    ///
    /// The AVL balance keeps this below `1.45 * log2(len + 2)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let tree: OSAvlTree<_> = (1..=7).collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> u32 {
        self.raw.height()
    }

    /// Removes every value. Calling this on an empty tree does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::from([1, 2]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|id| self.raw.value(id))
    }

    /// Returns the largest value, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|id| self.raw.value(id))
    }

    /// Removes and returns the smallest value, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::from([2, 1, 2]);
    /// assert_eq!(tree.pop_first(), Some(1));
    /// assert_eq!(tree.pop_first(), Some(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        let id = self.raw.first()?;
        Some(self.raw.remove_node(id))
    }

    /// Removes and returns the largest value, if any.
    pub fn pop_last(&mut self) -> Option<T> {
        let id = self.raw.last()?;
        Some(self.raw.remove_node(id))
    }

    /// Gets an iterator that visits the values in order, duplicates included.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([3, 1, 3, 2]);
    /// let values: Vec<_> = tree.iter().copied().collect();
    /// assert_eq!(values, [1, 2, 3, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            raw: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }
}

impl<T, C: Comparator<T>> OSAvlTree<T, C> {
    /// Adds a value to the tree. Values equal to ones already present are kept.
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
    /// let mut tree = OSAvlTree::new();
    /// tree.insert(2);
    /// tree.insert(2);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T) {
        self.raw.insert(value);
    }

    /// Returns `true` if some value in the tree compares equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([1, 2, 3]);
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&4));
    /// ```
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.raw.find(value).is_some()
    }

    /// Removes one value that compares equal to `value`. Returns whether one was
    /// found.
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
    /// let mut tree = OSAvlTree::from([1, 1, 2]);
    /// assert!(tree.remove(&1));
    /// assert!(tree.remove(&1));
    /// assert!(!tree.remove(&1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns one value that compares equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::with_comparator(|a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
    /// tree.insert((1, 'x'));
    /// assert_eq!(tree.take(&(1, '?')), Some((1, 'x')));
    /// assert_eq!(tree.take(&(1, '?')), None);
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        let id = self.raw.find(value)?;
        Some(self.raw.remove_node(id))
    }
}

impl<T, C: Default> Default for OSAvlTree<T, C> {
    /// Creates an empty `OSAvlTree` with a default comparator.
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for OSAvlTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C, D> PartialEq<OSAvlTree<T, D>> for OSAvlTree<T, C> {
    fn eq(&self, other: &OSAvlTree<T, D>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for OSAvlTree<T, C> {}

impl<T, C: Comparator<T> + Default> FromIterator<T> for OSAvlTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::with_comparator(C::default());
        tree.extend(iter);
        tree
    }
}

impl<T, C: Comparator<T>> Extend<T> for OSAvlTree<T, C> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Copy, C: Comparator<T>> Extend<&'a T> for OSAvlTree<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for OSAvlTree<T> {
    /// Converts a `[T; N]` into an `OSAvlTree<T>`.
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let tree1 = OSAvlTree::from([1, 2, 3, 4]);
    /// let tree2: OSAvlTree<_> = [4, 3, 2, 1].into();
    /// assert_eq!(tree1, tree2);
    /// ```
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, C> IntoIterator for OSAvlTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the values in order.
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([3, 1, 2]);
    /// let values: Vec<_> = tree.into_iter().collect();
    /// assert_eq!(values, [1, 2, 3]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.into_sorted_vec().into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a OSAvlTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = self.raw.step(id, Side::Right);
        Some(self.raw.value(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T, C> DoubleEndedIterator for Iter<'a, T, C> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = self.raw.step(id, Side::Left);
        Some(self.raw.value(id))
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, C> FusedIterator for Iter<'_, T, C> {}

impl<T, C> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}
