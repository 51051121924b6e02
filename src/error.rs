use core::fmt;

/// Broad classification of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// A rank or offset fell outside the valid range.
    OutOfRange,
    /// An argument was unusable, such as a destination buffer that is too short.
    InvalidArgument,
    /// The operation would place a value by position instead of by order.
    Unsupported,
}

/// Errors reported by [`OSAvlTree`](crate::OSAvlTree).
///
/// Every failing call is detected before the tree is touched, so an `Err`
/// always leaves the tree exactly as it was.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// `rank` is not in `0..len`.
    RankOutOfRange { rank: usize, len: usize },
    /// A copy was asked to start past the end of its destination.
    OffsetOutOfRange { offset: usize, len: usize },
    /// The destination has room for `available` values but `required` are needed.
    BufferTooSmall { required: usize, available: usize },
    /// Positions are derived from ordering and cannot be chosen by the caller.
    Unsupported { operation: &'static str },
}

impl Error {
    /// Returns the broad category this error belongs to.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::{ErrorKind, OSAvlTree};
    ///
    /// let tree = OSAvlTree::from([1, 2, 3]);
    /// assert_eq!(tree.get(3).unwrap_err().kind(), ErrorKind::OutOfRange);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::RankOutOfRange { .. } | Error::OffsetOutOfRange { .. } => ErrorKind::OutOfRange,
            Error::BufferTooSmall { .. } => ErrorKind::InvalidArgument,
            Error::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RankOutOfRange { rank, len } => {
                write!(f, "rank {rank} is out of range for a tree of {len} elements")
            }
            Error::OffsetOutOfRange { offset, len } => {
                write!(f, "offset {offset} is past the end of a buffer of length {len}")
            }
            Error::BufferTooSmall { required, available } => {
                write!(f, "buffer has room for {available} elements but {required} are required")
            }
            Error::Unsupported { operation } => {
                write!(f, "`{operation}` is unsupported: positions follow value order")
            }
        }
    }
}

impl core::error::Error for Error {}
