//! Search term domain and enumeration
//!
//! The search space is the full Cartesian product of three lowercase ASCII
//! letters, 26^3 = 17,576 values, enumerated in lexicographic order. The
//! enumerator is stateless; resumption is handled by the orchestrator
//! filtering against the processed-term set.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of values in the full term space (26^3)
pub const TERM_SPACE_SIZE: usize = 26 * 26 * 26;

/// Errors from parsing a search term
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TermError {
    #[error("term must be exactly 3 characters, got {0}")]
    InvalidLength(usize),

    #[error("term must contain only lowercase ASCII letters, got '{0}'")]
    InvalidChar(char),
}

/// One 3-letter lowercase search query
///
/// Immutable value type. Ordering is lexicographic, matching the enumeration
/// order of [`term_space`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchTerm([u8; 3]);

impl SearchTerm {
    /// Builds the term at the given position in lexicographic order
    ///
    /// # Panics
    ///
    /// Panics if `index >= TERM_SPACE_SIZE`.
    pub fn from_index(index: usize) -> Self {
        assert!(index < TERM_SPACE_SIZE, "term index out of range: {index}");
        let a = (index / (26 * 26)) as u8;
        let b = ((index / 26) % 26) as u8;
        let c = (index % 26) as u8;
        Self([b'a' + a, b'a' + b, b'a' + c])
    }

    /// Position of this term in lexicographic order (0-based)
    pub fn index(&self) -> usize {
        let [a, b, c] = self.0;
        ((a - b'a') as usize) * 26 * 26 + ((b - b'a') as usize) * 26 + (c - b'a') as usize
    }

    /// The term as a string slice
    pub fn as_str(&self) -> &str {
        // Invariant: bytes are always lowercase ASCII letters
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchTerm {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() != 3 {
            return Err(TermError::InvalidLength(s.chars().count()));
        }
        let mut bytes = [0u8; 3];
        for (i, c) in s.chars().enumerate() {
            if !c.is_ascii_lowercase() {
                return Err(TermError::InvalidChar(c));
            }
            bytes[i] = c as u8;
        }
        Ok(Self(bytes))
    }
}

/// Lazy iterator over the full term space in lexicographic order
///
/// Yields exactly [`TERM_SPACE_SIZE`] distinct terms, `"aaa"` through
/// `"zzz"`, with no repeats.
pub fn term_space() -> impl Iterator<Item = SearchTerm> {
    (0..TERM_SPACE_SIZE).map(SearchTerm::from_index)
}
