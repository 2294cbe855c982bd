//! # Pull-based sequences and streams
//!
//! Two interchangeable sequence implementations and one lazy iteration
//! protocol that also covers blocking external sources.
//!
//! ## Data flow
//!
//! ```text
//! Sequence ──► SequenceProducer ──┐
//!                                 ├──► Producer ──► Stream (for_each / filter / reduce)
//! ExternalSource ► ExternalProducer┘
//! ```
//!
//! 1. **Sequences**: [`Contiguous`] (buffer) and [`Linked`] (node chain), compared
//!    through an [`Equality`] bound at construction
//! 2. **Producers**: `has_next` / `next` cursors; [`SequenceProducer`] iterates a
//!    snapshot, [`ExternalProducer`] stays one read ahead of a blocking source
//! 3. **Streams**: single-pass consumption, oblivious to where elements come from
//!
//! ## Usage Example
//!
//! ```
//! use pullseq::{Contiguous, Equality, Sequence, Stream};
//!
//! let mut seq = Contiguous::new(Equality::natural());
//! seq.add(1);
//! seq.add(2);
//! seq.add(3);
//!
//! let sum = Stream::from_sequence(&seq).filter(|x| *x > 1).reduce(|a, b| a + b);
//! assert_eq!(sum, Some(5));
//! ```
//!
//! Nothing here is thread-safe: sequences and producers expect one owner on
//! one thread.

#![warn(missing_docs, missing_debug_implementations)]

pub mod config; // Validated configuration and builders
pub mod equality; // Element equality capability
pub mod external; // Lookahead producer over blocking reads
pub mod producer; // Iteration protocol and adapters
pub mod sequence; // Contiguous and linked sequences
pub mod source; // std::io backed external sources
pub mod stream; // Single-pass consumer API

// Re-exports for convenience
pub use config::{ConfigError, ReadConfig, SequenceBuilder};
pub use equality::{Equality, Equivalence, Natural};
pub use external::{ExternalProducer, ExternalSource};
pub use producer::{IterProducer, Producer, ProducerError, Pulled, SequenceProducer};
pub use sequence::{Contiguous, Fallback, Linked, Sequence, SequenceError};
pub use source::{ChunkSource, LineSource, SourceError};
pub use stream::Stream;

use thiserror::Error;

/// Any error raised by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Sequence construction or access failed.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Producer misuse.
    #[error(transparent)]
    Producer(#[from] ProducerError),

    /// External source failure.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Producer over byte chunks of `reader`.
pub fn chunks<R: std::io::Read>(reader: R, config: &ReadConfig) -> ExternalProducer<ChunkSource<R>> {
    ExternalProducer::new(ChunkSource::new(reader, config))
}

/// Producer over delimited text records of `reader`.
pub fn lines<R: std::io::BufRead>(reader: R, config: &ReadConfig) -> ExternalProducer<LineSource<R>> {
    ExternalProducer::new(LineSource::new(reader, config))
}
