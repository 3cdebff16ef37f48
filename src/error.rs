//! Errors returned by tree construction and updates.

use thiserror::Error;

/// Convenient `Result` alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when building or updating a tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Level-order construction was given a different number of keys and values.
    #[error("{keys} keys were given with {values} values")]
    LengthMismatch {
        /// How many keys were passed.
        keys: usize,
        /// How many values were passed.
        values: usize,
    },

    /// Level-order construction was given no keys or no values.
    #[error("cannot build a tree from empty keys or values")]
    Empty,

    /// The level-order placement of the pairs broke the BST property.
    #[error("key, value pairs did not satisfy the BST property")]
    NotSearchTree,

    /// An update targeted a key that isn't in the tree.
    #[error("no node with the given key")]
    KeyNotFound,
}

/// The broad category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller handed over malformed input.
    InvalidArgument,
    /// The caller referred to a key that doesn't exist.
    NotFound,
}

impl Error {
    /// Returns which category this error falls into.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{Error, ErrorKind};
    ///
    /// assert_eq!(Error::Empty.kind(), ErrorKind::InvalidArgument);
    /// assert_eq!(Error::KeyNotFound.kind(), ErrorKind::NotFound);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LengthMismatch { .. } | Self::Empty | Self::NotSearchTree => {
                ErrorKind::InvalidArgument
            }
            Self::KeyNotFound => ErrorKind::NotFound,
        }
    }
}
