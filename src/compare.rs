use core::cmp::Ordering;

/// A three-way comparison that defines the order of an [`OSAvlTree`](crate::OSAvlTree).
///
/// The tree never looks at values through anything but this trait, so the
/// comparator must be a total order and must not change while values are stored.
/// Every `Fn(&T, &T) -> Ordering` closure is a comparator.
///
/// # Examples
///
/// ```
/// use avl_ost::OSAvlTree;
///
/// let mut tree = OSAvlTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// tree.extend([1, 3, 2]);
/// assert_eq!(tree.to_vec(), [3, 2, 1]);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The comparator backed by `T`'s [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<T: ?Sized + Ord> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
