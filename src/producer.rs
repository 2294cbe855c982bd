//! Pull-based iteration protocol
//!
//! A [`Producer`] is a single-pass cursor: ask [`has_next`](Producer::has_next),
//! then take the element with [`next`](Producer::next). Producers are not
//! restartable and expect a single consumer on a single thread.
//!
//! Adapters in this module:
//! - [`SequenceProducer`]: snapshot of a sequence's elements
//! - [`IterProducer`]: any `Iterator` viewed as a producer
//! - [`Pulled`]: any producer viewed as an `Iterator`

use std::fmt;
use std::iter::Peekable;

use thiserror::Error;

/// Errors raised by producers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProducerError {
    /// `next()` called after `has_next()` reported no more elements.
    #[error("producer is exhausted")]
    Exhausted,
}

/// Capability pair {has-more, produce-next}.
pub trait Producer {
    /// Element type.
    type Item;

    /// Whether `next()` will deliver an element.
    ///
    /// Once this returns false it keeps returning false.
    fn has_next(&mut self) -> bool;

    /// Deliver the next element.
    ///
    /// Fails with [`ProducerError::Exhausted`] when `has_next()` is false.
    fn next(&mut self) -> Result<Self::Item, ProducerError>;

    /// `next()` guarded by `has_next()`.
    fn next_item(&mut self) -> Option<Self::Item> {
        if self.has_next() {
            self.next().ok()
        } else {
            None
        }
    }

    /// View this producer as a standard iterator.
    fn into_pulled(self) -> Pulled<Self>
    where
        Self: Sized,
    {
        Pulled { producer: self }
    }
}

impl<P: Producer + ?Sized> Producer for Box<P> {
    type Item = P::Item;

    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<P::Item, ProducerError> {
        (**self).next()
    }
}

impl<P: Producer + ?Sized> Producer for &mut P {
    type Item = P::Item;

    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<P::Item, ProducerError> {
        (**self).next()
    }
}

/// Producer over a fixed snapshot of elements.
///
/// The snapshot is taken when the producer is built, so later mutation of
/// the source sequence is never observed.
#[derive(Debug, Clone)]
pub struct SequenceProducer<T> {
    snapshot: std::vec::IntoIter<T>,
    delivered: usize,
}

impl<T> SequenceProducer<T> {
    /// Producer delivering `elements` in order.
    pub fn new(elements: Vec<T>) -> Self {
        Self {
            snapshot: elements.into_iter(),
            delivered: 0,
        }
    }

    /// Number of elements already delivered.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Number of elements still to deliver.
    pub fn remaining(&self) -> usize {
        self.snapshot.len()
    }
}

impl<T> Producer for SequenceProducer<T> {
    type Item = T;

    fn has_next(&mut self) -> bool {
        self.snapshot.len() > 0
    }

    fn next(&mut self) -> Result<T, ProducerError> {
        let element = self.snapshot.next().ok_or(ProducerError::Exhausted)?;
        self.delivered += 1;
        Ok(element)
    }
}

/// Producer backed by a standard iterator.
pub struct IterProducer<I: Iterator> {
    inner: Peekable<I>,
}

impl<I: Iterator> IterProducer<I> {
    /// Wrap an iterator.
    pub fn new<C>(iter: C) -> Self
    where
        C: IntoIterator<IntoIter = I>,
    {
        Self {
            inner: iter.into_iter().peekable(),
        }
    }
}

impl<I: Iterator> fmt::Debug for IterProducer<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterProducer").finish_non_exhaustive()
    }
}

impl<I: Iterator> Producer for IterProducer<I> {
    type Item = I::Item;

    fn has_next(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    fn next(&mut self) -> Result<I::Item, ProducerError> {
        self.inner.next().ok_or(ProducerError::Exhausted)
    }
}

/// Standard iterator draining a producer.
#[derive(Debug)]
pub struct Pulled<P> {
    producer: P,
}

impl<P> Pulled<P> {
    /// Give back the producer, e.g. to inspect a latched error.
    pub fn into_inner(self) -> P {
        self.producer
    }
}

impl<P: Producer> Iterator for Pulled<P> {
    type Item = P::Item;

    fn next(&mut self) -> Option<P::Item> {
        self.producer.next_item()
    }
}
