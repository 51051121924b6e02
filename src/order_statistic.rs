/// A zero-based position in the sorted order of an [`OSAvlTree`](crate::OSAvlTree).
///
/// Indexing with a `Rank` reads the value at that position and panics when it
/// is out of bounds; [`OSAvlTree::get`](crate::OSAvlTree::get) is the
/// non-panicking form.
///
/// # Examples
///
/// ```
/// use avl_ost::{OSAvlTree, Rank};
///
/// let tree = OSAvlTree::from([30, 10, 20]);
/// assert_eq!(tree[Rank(1)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
