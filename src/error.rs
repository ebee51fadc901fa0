use core::fmt;
use thiserror::Error;

/// Error types for `Collection` and `Map` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum CollectionError {
    /// Index does not exist in the collection
    #[error("Cannot replace value at index {index} because it does not exist ({valid})")]
    IndexOutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Indexes that were valid at the time of the access
        valid: ValidIndexes,
    },
    /// Key and value sequences passed to `Map::combine` differ in length
    #[error("Cannot combine {keys} keys with {values} values")]
    LengthMismatch {
        /// Number of keys given
        keys: usize,
        /// Number of values given
        values: usize,
    },
    /// `Collection::explode` was given an empty delimiter
    #[error("Cannot explode a string using an empty delimiter")]
    EmptyDelimiter,
}

/// The range of valid indexes reported by `CollectionError::IndexOutOfBounds`
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ValidIndexes {
    /// The collection had no values
    Empty,
    /// Valid indexes were `0..=last`
    UpTo {
        /// Highest valid index
        last: usize,
    },
}

impl ValidIndexes {
    #[must_use]
    pub fn for_len(len: usize) -> Self {
        match len {
            0 => ValidIndexes::Empty,
            len => ValidIndexes::UpTo { last: len - 1 },
        }
    }
}

impl fmt::Display for ValidIndexes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidIndexes::Empty => write!(f, "the collection is empty"),
            ValidIndexes::UpTo { last } => write!(f, "valid indexes are 0 to {last}"),
        }
    }
}
