//! Storage-agnostic sequences
//!
//! Two interchangeable implementations share the [`Sequence`] contract:
//! - [`Contiguous`]: growable buffer, O(1) positional access
//! - [`Linked`]: doubly-linked node chain, O(1) push at both ends
//!
//! Insertion order is iteration order, duplicates are allowed, and all
//! element comparisons go through the sequence's [`Equality`].
//!
//! Sequences are not thread-safe. They hold their equality behind an `Rc`,
//! so they are neither `Send` nor `Sync`.

mod contiguous;
mod linked;

pub use contiguous::{map, Contiguous};
pub use linked::{map as map_linked, Iter as LinkedIter, Linked};

use std::fmt;

use thiserror::Error;

use crate::equality::Equality;
use crate::producer::SequenceProducer;
use crate::stream::Stream;

/// Errors raised by sequence construction and access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// Negative capacity requested at construction.
    #[error("capacity must be non-negative, got {requested}")]
    InvalidCapacity {
        /// Capacity that was requested.
        requested: isize,
    },

    /// Positional access outside `[0, size)`.
    #[error("index {index} out of range for sequence of size {size}")]
    IndexOutOfRange {
        /// Index that was requested.
        index: usize,
        /// Size of the sequence at the time of access.
        size: usize,
    },

    /// First/last access on an empty sequence.
    #[error("access on empty sequence")]
    EmptyCollectionAccess,

    /// Sub-range that is reversed or exceeds the sequence.
    #[error("range {from}..{to} invalid for sequence of size {size}")]
    InvalidRange {
        /// Inclusive start.
        from: usize,
        /// Exclusive end.
        to: usize,
        /// Size of the sequence.
        size: usize,
    },

    /// Builder finished without an equality function.
    #[error("no equality function supplied")]
    MissingEquality,
}

/// A value that is usable despite a construction error.
///
/// Returned when construction fails recoverably: the caller must look at
/// [`error`](Fallback::error) but still receives a working value.
#[derive(Debug)]
pub struct Fallback<S> {
    /// What went wrong.
    pub error: SequenceError,
    value: S,
}

impl<S> Fallback<S> {
    pub(crate) fn new(error: SequenceError, value: S) -> Self {
        Self { error, value }
    }

    /// Take the fallback value, discarding the error.
    pub fn into_value(self) -> S {
        self.value
    }

    /// Split into error and value.
    pub fn into_parts(self) -> (SequenceError, S) {
        (self.error, self.value)
    }
}

impl<S> fmt::Display for Fallback<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (fallback value returned)", self.error)
    }
}

impl<S: fmt::Debug> std::error::Error for Fallback<S> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Ordered, mutable container with positional access.
pub trait Sequence<T> {
    /// Borrowing iterator in insertion order.
    type Iter<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    /// Equality bound at construction.
    fn equality(&self) -> &Equality<T>;

    /// Number of live elements.
    fn size(&self) -> usize;

    /// Iterate elements in order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Append an element.
    fn add(&mut self, element: T);

    /// Element at `index`.
    fn get(&self, index: usize) -> Result<&T, SequenceError>;

    /// Replace the element at `index`, returning the previous one.
    fn set(&mut self, index: usize, element: T) -> Result<T, SequenceError>;

    /// Remove and return the element at `index`.
    fn remove_at(&mut self, index: usize) -> Result<T, SequenceError>;

    /// Keep only the elements matching `keep`, preserving order.
    fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool;

    /// Remove all elements.
    fn clear(&mut self);

    /// First element.
    fn first(&self) -> Result<&T, SequenceError>;

    /// Last element.
    fn last(&self) -> Result<&T, SequenceError>;

    /// Independent copy of `[from, to)`.
    fn sub_sequence(&self, from: usize, to: usize) -> Result<Self, SequenceError>
    where
        Self: Sized,
        T: Clone;

    /// New sequence with the elements matching `predicate`, in order.
    fn filter<F>(&self, predicate: F) -> Self
    where
        Self: Sized,
        T: Clone,
        F: FnMut(&T) -> bool;

    /// True when the sequence holds no elements.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Membership under the sequence's equality.
    fn contains(&self, element: &T) -> bool {
        self.index_of(element).is_some()
    }

    /// Position of the first equal element.
    fn index_of(&self, element: &T) -> Option<usize> {
        let eq = self.equality();
        self.iter().position(|e| eq.matches(e, element))
    }

    /// Position of the last equal element.
    fn last_index_of(&self, element: &T) -> Option<usize> {
        let eq = self.equality();
        let mut found = None;
        for (i, e) in self.iter().enumerate() {
            if eq.matches(e, element) {
                found = Some(i);
            }
        }
        found
    }

    /// Remove the first equal element; returns whether one was found.
    fn remove(&mut self, element: &T) -> bool {
        match self.index_of(element) {
            Some(index) => self.remove_at(index).is_ok(),
            None => false,
        }
    }

    /// Append every element of `other`.
    fn add_all<S>(&mut self, other: &S)
    where
        S: Sequence<T>,
        T: Clone,
    {
        for e in other.iter() {
            self.add(e.clone());
        }
    }

    /// Remove one occurrence per element of `other`.
    fn remove_all<S>(&mut self, other: &S)
    where
        S: Sequence<T>,
    {
        for e in other.iter() {
            self.remove(e);
        }
    }

    /// Keep only elements that also occur in `other`.
    fn retain_all<S>(&mut self, other: &S)
    where
        S: Sequence<T>,
    {
        let eq = self.equality().clone();
        self.retain(|e| other.iter().any(|o| eq.matches(e, o)));
    }

    /// Same size and pairwise equal in order, using this sequence's equality.
    fn equals<S>(&self, other: &S) -> bool
    where
        S: Sequence<T>,
    {
        if self.size() != other.size() {
            return false;
        }
        let eq = self.equality();
        self.iter().zip(other.iter()).all(|(a, b)| eq.matches(a, b))
    }

    /// Copy of `[from, to)` as a plain vector.
    fn sub_slice(&self, from: usize, to: usize) -> Result<Vec<T>, SequenceError>
    where
        T: Clone,
    {
        check_range(from, to, self.size())?;
        Ok(self.iter().skip(from).take(to - from).cloned().collect())
    }

    /// Copy all elements into a vector.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Call `f` on each element in order.
    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        for e in self.iter() {
            f(e);
        }
    }

    /// Producer over a snapshot of the current elements.
    fn producer(&self) -> SequenceProducer<T>
    where
        T: Clone,
    {
        SequenceProducer::new(self.to_vec())
    }

    /// Stream over a snapshot of the current elements.
    fn stream(&self) -> Stream<SequenceProducer<T>>
    where
        T: Clone,
    {
        Stream::new(self.producer())
    }
}

pub(crate) fn check_index(index: usize, size: usize) -> Result<(), SequenceError> {
    if index >= size {
        return Err(SequenceError::IndexOutOfRange { index, size });
    }
    Ok(())
}

pub(crate) fn check_range(from: usize, to: usize, size: usize) -> Result<(), SequenceError> {
    if from > to || to > size {
        return Err(SequenceError::InvalidRange { from, to, size });
    }
    Ok(())
}

/// Render as `[a, b, c]`.
pub(crate) fn fmt_elements<'a, T, I>(f: &mut fmt::Formatter<'_>, elements: I) -> fmt::Result
where
    T: fmt::Display + 'a,
    I: Iterator<Item = &'a T>,
{
    f.write_str("[")?;
    for (i, e) in elements.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", e)?;
    }
    f.write_str("]")
}
