use core::fmt;
use core::num::NonZero;

/// Index of a node inside the tree's arena.
///
/// Stored as `index + 1` so that `Option<NodeId>` costs nothing extra; every
/// parent and child link in the tree is an `Option<NodeId>`.
#[derive(Clone, Copy, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct NodeId(NonZero<u32>);

impl NodeId {
    /// The largest slot index a `NodeId` can address.
    pub(crate) const MAX: usize = (u32::MAX - 1) as usize;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn new(index: usize) -> Self {
        assert!(index <= Self::MAX, "`NodeId::new()` - `index` > `NodeId::MAX`!");
        match NonZero::new((index + 1) as u32) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}
