//! Consumer-facing stream over any producer
//!
//! A [`Stream`] does not know whether its elements come from a sequence
//! snapshot or from an external source. Operations are single-pass:
//! - `for_each` and `reduce` drain the producer
//! - `filter` is lazy and pulls upstream only as far as the next match
//!
//! There is no `map`: a stream keeps the element type of its producer.
//!
//! To look at a producer after draining it (for instance the latched error
//! of an [`ExternalProducer`]), stream over `&mut producer`.

use std::fmt;

use crate::external::{ExternalProducer, ExternalSource};
use crate::producer::{Producer, ProducerError, SequenceProducer};
use crate::sequence::Sequence;

/// Thin wrapper around a producer.
#[derive(Debug)]
pub struct Stream<P> {
    producer: P,
}

impl<P: Producer> Stream<P> {
    /// Stream pulling from `producer`.
    pub fn new(producer: P) -> Self {
        Self { producer }
    }

    /// Call `f` on every element in producer order.
    pub fn for_each<F>(mut self, mut f: F)
    where
        F: FnMut(P::Item),
    {
        while let Some(item) = self.producer.next_item() {
            f(item);
        }
    }

    /// Lazily keep the elements matching `predicate`.
    pub fn filter<F>(self, predicate: F) -> Stream<Filter<P, F>>
    where
        F: FnMut(&P::Item) -> bool,
    {
        Stream::new(Filter {
            upstream: self.producer,
            predicate,
            matched: None,
        })
    }

    /// Left fold seeded with the first element; `None` when empty.
    pub fn reduce<F>(mut self, mut f: F) -> Option<P::Item>
    where
        F: FnMut(P::Item, P::Item) -> P::Item,
    {
        let mut acc = self.producer.next_item()?;
        while let Some(item) = self.producer.next_item() {
            acc = f(acc, item);
        }
        Some(acc)
    }

    /// Borrow the underlying producer.
    pub fn producer(&self) -> &P {
        &self.producer
    }

    /// Give back the underlying producer.
    pub fn into_producer(self) -> P {
        self.producer
    }
}

impl<T> Stream<SequenceProducer<T>> {
    /// Stream over the given elements.
    pub fn of(elements: Vec<T>) -> Self {
        Self::new(SequenceProducer::new(elements))
    }

    /// Stream over a snapshot of `sequence`.
    pub fn from_sequence<S>(sequence: &S) -> Self
    where
        S: Sequence<T>,
        T: Clone,
    {
        Self::new(sequence.producer())
    }
}

impl<S: ExternalSource> Stream<ExternalProducer<S>> {
    /// Stream over an external source; performs the first read now.
    pub fn from_source(source: S) -> Self {
        Self::new(ExternalProducer::new(source))
    }
}

/// Producer yielding only the upstream elements that match a predicate.
///
/// `has_next` pulls upstream until a match is found and holds it until
/// `next` is called.
pub struct Filter<P: Producer, F> {
    upstream: P,
    predicate: F,
    matched: Option<P::Item>,
}

impl<P, F> Producer for Filter<P, F>
where
    P: Producer,
    F: FnMut(&P::Item) -> bool,
{
    type Item = P::Item;

    fn has_next(&mut self) -> bool {
        if self.matched.is_some() {
            return true;
        }
        while let Some(item) = self.upstream.next_item() {
            if (self.predicate)(&item) {
                self.matched = Some(item);
                return true;
            }
        }
        false
    }

    fn next(&mut self) -> Result<P::Item, ProducerError> {
        if !self.has_next() {
            return Err(ProducerError::Exhausted);
        }
        self.matched.take().ok_or(ProducerError::Exhausted)
    }
}

impl<P, F> fmt::Debug for Filter<P, F>
where
    P: Producer + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("upstream", &self.upstream)
            .field("matched", &self.matched.is_some())
            .finish_non_exhaustive()
    }
}
