//! Validated configuration
//!
//! [`SequenceBuilder`] assembles sequences and refuses to build one
//! without an equality function. [`ReadConfig`] sizes the I/O sources.

use std::fmt;

use thiserror::Error;

use crate::equality::Equality;
use crate::sequence::{Contiguous, Fallback, Linked, SequenceError};

/// Default chunk size for [`ChunkSource`](crate::source::ChunkSource).
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Chunk size must be at least one byte.
    #[error("invalid chunk size {0}: must be > 0")]
    InvalidChunkSize(usize),
}

/// Parameters for the `std::io` sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadConfig {
    /// Maximum bytes per chunk.
    pub chunk_size: usize,
    /// Record delimiter for line sources.
    pub delimiter: u8,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            delimiter: b'\n',
        }
    }
}

impl ReadConfig {
    /// Set chunk size (must be > 0).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(chunk_size));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    /// Set record delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Builder for either sequence implementation.
#[derive(Debug)]
pub struct SequenceBuilder<T> {
    capacity: isize,
    equality: Option<Equality<T>>,
}

impl<T> Default for SequenceBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SequenceBuilder<T> {
    /// Builder with no capacity and no equality.
    pub fn new() -> Self {
        Self {
            capacity: 0,
            equality: None,
        }
    }

    /// Reserve capacity (contiguous only).
    pub fn with_capacity(mut self, capacity: isize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Equality used for every comparison.
    pub fn with_equality(mut self, equality: Equality<T>) -> Self {
        self.equality = Some(equality);
        self
    }

    /// Use `PartialEq` as the equality.
    pub fn with_natural_equality(self) -> Self
    where
        T: PartialEq + 'static,
    {
        self.with_equality(Equality::natural())
    }

    /// Build an array-backed sequence.
    ///
    /// Fails with [`SequenceError::MissingEquality`] when no equality was
    /// given. A negative capacity yields [`SequenceError::InvalidCapacity`]
    /// alongside a usable zero-capacity sequence.
    pub fn build_contiguous(self) -> Result<Contiguous<T>, BuildError<Contiguous<T>>> {
        let equality = self.equality.ok_or(BuildError::Missing)?;
        Contiguous::with_capacity(self.capacity, equality).map_err(BuildError::Fallback)
    }

    /// Build a linked sequence.
    pub fn build_linked(self) -> Result<Linked<T>, SequenceError> {
        let equality = self.equality.ok_or(SequenceError::MissingEquality)?;
        Ok(Linked::new(equality))
    }
}

/// Failure to build a contiguous sequence.
#[derive(Debug)]
pub enum BuildError<S> {
    /// No equality function; nothing was built.
    Missing,

    /// Built, but with a fallback for an invalid parameter.
    Fallback(Fallback<S>),
}

impl<S> fmt::Display for BuildError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Missing => write!(f, "{}", SequenceError::MissingEquality),
            BuildError::Fallback(fallback) => write!(f, "{}", fallback),
        }
    }
}

impl<S: fmt::Debug> std::error::Error for BuildError<S> {}

impl<S> BuildError<S> {
    /// The underlying sequence error.
    pub fn sequence_error(&self) -> SequenceError {
        match self {
            BuildError::Missing => SequenceError::MissingEquality,
            BuildError::Fallback(f) => f.error.clone(),
        }
    }

    /// Usable value, if the builder produced one.
    pub fn into_fallback(self) -> Option<S> {
        match self {
            BuildError::Missing => None,
            BuildError::Fallback(f) => Some(f.into_value()),
        }
    }
}
