#![forbid(unsafe_code)]

//! Errors for sequence operations that reject invalid input.

use std::fmt;

/// Error returned by index-addressed mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// The index does not address a valid position.
    IndexOutOfBounds { index: usize, len: usize },
    /// The sequence was destroyed and no longer accepts mutations.
    Destroyed,
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for sequence of length {len}")
            }
            Self::Destroyed => write!(f, "sequence has been destroyed"),
        }
    }
}

impl std::error::Error for SequenceError {}
