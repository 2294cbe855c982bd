//! Element equality bound at construction
//!
//! Containers never compare elements with `==`. Every sequence carries an
//! [`Equality`] chosen by its creator, so element types without a
//! `PartialEq` impl (or with the wrong one) still work.

use std::fmt;
use std::rc::Rc;

/// Capability to decide whether two elements are equivalent.
pub trait Equivalence<T> {
    /// Return true when `a` and `b` are the same element for container purposes.
    fn equivalent(&self, a: &T, b: &T) -> bool;
}

impl<T, F> Equivalence<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn equivalent(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Equivalence delegating to `PartialEq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Natural;

impl<T: PartialEq> Equivalence<T> for Natural {
    fn equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Shared handle to an equivalence, cloned into derived sequences.
pub struct Equality<T> {
    inner: Rc<dyn Equivalence<T>>,
}

impl<T> Equality<T> {
    /// Wrap any equivalence (including closures).
    pub fn new<E>(equivalence: E) -> Self
    where
        E: Equivalence<T> + 'static,
    {
        Self {
            inner: Rc::new(equivalence),
        }
    }

    /// Compare two elements.
    #[inline]
    pub fn matches(&self, a: &T, b: &T) -> bool {
        self.inner.equivalent(a, b)
    }

    /// True when both handles point at the same equivalence.
    pub fn same_as(&self, other: &Equality<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: PartialEq + 'static> Equality<T> {
    /// Equality using the element type's `PartialEq`.
    pub fn natural() -> Self {
        Self::new(Natural)
    }
}

impl<T> Clone for Equality<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Equality<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equality")
            .field("inner", &Rc::as_ptr(&self.inner))
            .finish()
    }
}
