use alloc::vec::Vec;

use super::OSAvlTree;
use crate::Error;

impl<T: Clone, C> OSAvlTree<T, C> {
    /// Clones the values, in order, into `buffer` starting at `offset`.
    ///
    /// Slots outside `offset..offset + self.len()` are not touched. An empty
    /// tree copies nothing and never fails.
    ///
    /// # Errors
    ///
    /// - [`Error::OffsetOutOfRange`] if `offset > buffer.len()`.
    /// - [`Error::BufferTooSmall`] if fewer than `self.len()` slots follow `offset`.
    ///
    /// In both cases `buffer` is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([3, 1, 2]);
    /// let mut buffer = [0; 5];
    /// tree.copy_into(&mut buffer, 1).unwrap();
    /// assert_eq!(buffer, [0, 1, 2, 3, 0]);
    ///
    /// assert!(tree.copy_into(&mut buffer, 3).is_err());
    /// ```
    pub fn copy_into(&self, buffer: &mut [T], offset: usize) -> Result<(), Error> {
        let required = self.len();
        if required == 0 {
            return Ok(());
        }

        let len = buffer.len();
        let Some(tail) = buffer.get_mut(offset..) else {
            return Err(Error::OffsetOutOfRange { offset, len });
        };
        if tail.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                available: tail.len(),
            });
        }

        for (slot, value) in tail.iter_mut().zip(self.iter()) {
            slot.clone_from(value);
        }
        Ok(())
    }

    /// Returns the values in order as a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T, C> OSAvlTree<T, C> {
    /// Always fails: a value's position follows from its order, so it cannot
    /// be inserted at a chosen rank. Use [`insert`](Self::insert) instead.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`]; the tree is unchanged and
    /// `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::{ErrorKind, OSAvlTree};
    ///
    /// let mut tree = OSAvlTree::from([1, 3]);
    /// let error = tree.insert_at(1, 2).unwrap_err();
    /// assert_eq!(error.kind(), ErrorKind::Unsupported);
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[allow(clippy::needless_pass_by_value, clippy::unused_self)]
    pub fn insert_at(&mut self, rank: usize, value: T) -> Result<(), Error> {
        let _ = (rank, value);
        Err(Error::Unsupported { operation: "insert_at" })
    }

    /// Always fails: overwriting the value at a rank could break the ordering.
    /// Remove the old value and insert the new one instead.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`]; the tree is unchanged.
    #[allow(clippy::needless_pass_by_value, clippy::unused_self)]
    pub fn set(&mut self, rank: usize, value: T) -> Result<(), Error> {
        let _ = (rank, value);
        Err(Error::Unsupported { operation: "set" })
    }
}
