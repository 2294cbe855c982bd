//! Producer over a blocking external read
//!
//! [`ExternalProducer`] wraps one read primitive and stays exactly one read
//! ahead of the consumer:
//!
//! 1. Construction performs the first read and buffers its outcome.
//! 2. `has_next()` reports whether the most recent read succeeded. It never reads.
//! 3. `next()` hands out the buffered chunk, then reads again to refill the buffer.
//!
//! Delivering N chunks therefore costs N + 1 reads, and a failing read is
//! latched rather than raised. The consumer sees it on the `has_next()` call
//! after the last good chunk was taken.
//!
//! The latch is sticky. Once a read has failed, no further reads are made
//! and `next()` fails with [`ProducerError::Exhausted`]. A source that would
//! have recovered is never consulted again.
//!
//! The producer never opens, closes or retries the underlying handle.
//! Reads block the calling thread; timeouts belong to the source.

use std::fmt;

use crate::producer::{Producer, ProducerError};

/// A blocking read that yields one chunk or an error.
pub trait ExternalSource {
    /// Unit delivered per successful read.
    type Chunk;
    /// Failure reported by a read, including end-of-stream.
    type Error;

    /// Perform one read.
    fn read(&mut self) -> Result<Self::Chunk, Self::Error>;
}

impl<T, E, F> ExternalSource for F
where
    F: FnMut() -> Result<T, E>,
{
    type Chunk = T;
    type Error = E;

    fn read(&mut self) -> Result<T, E> {
        self()
    }
}

/// Lookahead-buffered producer over an [`ExternalSource`].
pub struct ExternalProducer<S: ExternalSource> {
    source: S,
    /// Chunk from the most recent successful read, not yet delivered.
    pending: Option<S::Chunk>,
    /// Error from the most recent read, if it failed.
    error: Option<S::Error>,
    reads: usize,
}

impl<S: ExternalSource> ExternalProducer<S> {
    /// Wrap `source`, performing the first read immediately.
    ///
    /// Blocks for the duration of that read.
    pub fn new(source: S) -> Self {
        let mut producer = Self {
            source,
            pending: None,
            error: None,
            reads: 0,
        };
        producer.read_ahead();
        producer
    }

    /// Error latched by the most recent read.
    ///
    /// Distinguishes a clean end-of-stream from a genuine failure once
    /// `has_next()` has gone false.
    pub fn error(&self) -> Option<&S::Error> {
        self.error.as_ref()
    }

    /// Chunk that the next call to `next()` will deliver.
    pub fn peek(&self) -> Option<&S::Chunk> {
        self.pending.as_ref()
    }

    /// Number of reads performed so far.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Hand the source back to its owner, dropping any buffered chunk.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Split into source, undelivered chunk and latched error.
    pub fn into_parts(self) -> (S, Option<S::Chunk>, Option<S::Error>) {
        (self.source, self.pending, self.error)
    }

    fn read_ahead(&mut self) {
        self.reads += 1;
        match self.source.read() {
            Ok(chunk) => {
                tracing::trace!(reads = self.reads, "external read buffered");
                self.pending = Some(chunk);
            }
            Err(err) => {
                tracing::debug!(reads = self.reads, "external read failed, error latched");
                self.pending = None;
                self.error = Some(err);
            }
        }
    }
}

impl<S: ExternalSource> Producer for ExternalProducer<S> {
    type Item = S::Chunk;

    fn has_next(&mut self) -> bool {
        self.error.is_none()
    }

    fn next(&mut self) -> Result<S::Chunk, ProducerError> {
        if self.error.is_some() {
            tracing::warn!(reads = self.reads, "next() on exhausted external producer");
            return Err(ProducerError::Exhausted);
        }
        let Some(delivered) = self.pending.take() else {
            return Err(ProducerError::Exhausted);
        };
        self.read_ahead();
        Ok(delivered)
    }
}

impl<S> fmt::Debug for ExternalProducer<S>
where
    S: ExternalSource,
    S::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalProducer")
            .field("buffered", &self.pending.is_some())
            .field("error", &self.error)
            .field("reads", &self.reads)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Source replaying a fixed script, then reporting `"eof"` forever.
    fn scripted(
        script: Vec<Result<&'static str, &'static str>>,
    ) -> impl FnMut() -> Result<&'static str, &'static str> {
        let mut script: VecDeque<_> = script.into();
        move || script.pop_front().unwrap_or(Err("eof"))
    }

    #[test]
    fn test_two_chunks_then_eof() {
        let mut producer = ExternalProducer::new(scripted(vec![Ok("A"), Ok("B"), Err("eof")]));
        assert_eq!(producer.reads(), 1);

        assert!(producer.has_next());
        assert_eq!(producer.next(), Ok("A"));
        assert!(producer.has_next());
        assert_eq!(producer.next(), Ok("B"));
        assert!(!producer.has_next());

        assert_eq!(producer.reads(), 3);
        assert_eq!(producer.error(), Some(&"eof"));
    }

    #[test]
    fn test_first_read_failure_means_empty() {
        let mut producer = ExternalProducer::new(scripted(vec![Err("refused")]));
        assert!(!producer.has_next());
        assert_eq!(producer.peek(), None);
        assert_eq!(producer.error(), Some(&"refused"));
        assert_eq!(producer.next(), Err(ProducerError::Exhausted));
        assert_eq!(producer.reads(), 1);
    }

    #[test]
    fn test_failure_observed_one_element_late() {
        let mut producer = ExternalProducer::new(scripted(vec![Ok("A"), Err("reset")]));

        // The failing read already happened inside this next(), but the
        // chunk handed out is still the good one.
        assert!(producer.has_next());
        assert_eq!(producer.next(), Ok("A"));
        assert_eq!(producer.reads(), 2);

        assert!(!producer.has_next());
        assert_eq!(producer.error(), Some(&"reset"));
    }

    #[test]
    fn test_latch_is_sticky_after_recovery() {
        let mut producer =
            ExternalProducer::new(scripted(vec![Ok("A"), Err("blip"), Ok("B"), Ok("C")]));
        assert_eq!(producer.next(), Ok("A"));
        assert!(!producer.has_next());

        assert_eq!(producer.next(), Err(ProducerError::Exhausted));
        assert!(!producer.has_next());
        assert_eq!(producer.reads(), 2);
        assert_eq!(producer.error(), Some(&"blip"));
    }

    #[test]
    fn test_into_parts_returns_source_state() {
        let producer = ExternalProducer::new(scripted(vec![Ok("A")]));
        let (mut source, pending, error) = producer.into_parts();
        assert_eq!(pending, Some("A"));
        assert!(error.is_none());
        assert_eq!(source(), Err("eof"));
    }
}
