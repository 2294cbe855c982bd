//! Array-backed sequence

use std::fmt;
use std::ops::Index;

use super::{check_index, check_range, fmt_elements, Fallback, Sequence, SequenceError};
use crate::equality::Equality;

/// Sequence stored in one growable buffer.
///
/// Appends are amortized O(1); positional access is O(1); searches and
/// removal by value are linear scans under the configured equality.
#[derive(Debug, Clone)]
pub struct Contiguous<T> {
    elements: Vec<T>,
    equality: Equality<T>,
}

impl<T> Contiguous<T> {
    /// Empty sequence with no reserved capacity.
    pub fn new(equality: Equality<T>) -> Self {
        Self {
            elements: Vec::new(),
            equality,
        }
    }

    /// Empty sequence with reserved capacity.
    ///
    /// A negative capacity is reported through [`Fallback`], which still
    /// carries a usable zero-capacity sequence.
    pub fn with_capacity(capacity: isize, equality: Equality<T>) -> Result<Self, Fallback<Self>> {
        if capacity < 0 {
            tracing::warn!(capacity, "negative capacity requested, falling back to 0");
            return Err(Fallback::new(
                SequenceError::InvalidCapacity {
                    requested: capacity,
                },
                Self::new(equality),
            ));
        }
        Ok(Self {
            elements: Vec::with_capacity(capacity as usize),
            equality,
        })
    }

    /// Take ownership of existing elements.
    pub fn from_vec(elements: Vec<T>, equality: Equality<T>) -> Self {
        Self { elements, equality }
    }

    /// Reserved capacity of the backing buffer.
    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    /// Borrow the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Give up the backing buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<T> Sequence<T> for Contiguous<T> {
    type Iter<'a>
        = std::slice::Iter<'a, T>
    where
        T: 'a;

    fn equality(&self) -> &Equality<T> {
        &self.equality
    }

    fn size(&self) -> usize {
        self.elements.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.elements.iter()
    }

    fn add(&mut self, element: T) {
        self.elements.push(element);
    }

    fn get(&self, index: usize) -> Result<&T, SequenceError> {
        check_index(index, self.elements.len())?;
        Ok(&self.elements[index])
    }

    fn set(&mut self, index: usize, element: T) -> Result<T, SequenceError> {
        check_index(index, self.elements.len())?;
        Ok(std::mem::replace(&mut self.elements[index], element))
    }

    fn remove_at(&mut self, index: usize) -> Result<T, SequenceError> {
        check_index(index, self.elements.len())?;
        Ok(self.elements.remove(index))
    }

    fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.elements.retain(keep);
    }

    fn clear(&mut self) {
        // Vec::clear keeps the allocation, matching a reset to the same capacity.
        self.elements.clear();
    }

    fn first(&self) -> Result<&T, SequenceError> {
        self.elements
            .first()
            .ok_or(SequenceError::EmptyCollectionAccess)
    }

    fn last(&self) -> Result<&T, SequenceError> {
        self.elements
            .last()
            .ok_or(SequenceError::EmptyCollectionAccess)
    }

    fn sub_sequence(&self, from: usize, to: usize) -> Result<Self, SequenceError>
    where
        T: Clone,
    {
        check_range(from, to, self.elements.len())?;
        Ok(Self {
            elements: self.elements[from..to].to_vec(),
            equality: self.equality.clone(),
        })
    }

    fn filter<F>(&self, mut predicate: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        let mut filtered = Vec::with_capacity(self.elements.capacity());
        for e in &self.elements {
            if predicate(e) {
                filtered.push(e.clone());
            }
        }
        Self {
            elements: filtered,
            equality: self.equality.clone(),
        }
    }

    fn add_all<S>(&mut self, other: &S)
    where
        S: Sequence<T>,
        T: Clone,
    {
        self.elements.reserve(other.size());
        self.elements.extend(other.iter().cloned());
    }

    fn last_index_of(&self, element: &T) -> Option<usize> {
        self.elements
            .iter()
            .rposition(|e| self.equality.matches(e, element))
    }

    fn sub_slice(&self, from: usize, to: usize) -> Result<Vec<T>, SequenceError>
    where
        T: Clone,
    {
        check_range(from, to, self.elements.len())?;
        Ok(self.elements[from..to].to_vec())
    }
}

/// Panics with [`SequenceError::IndexOutOfRange`] when `index >= size`.
impl<T> Index<usize> for Contiguous<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(e) => e,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Contiguous<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_elements(f, self.elements.iter())
    }
}

/// Apply `f` to every element, producing a sequence of a new element type.
///
/// The result reserves the source's capacity and compares with `equality`.
pub fn map<T, K, F>(source: &Contiguous<T>, mut f: F, equality: Equality<K>) -> Contiguous<K>
where
    F: FnMut(&T) -> K,
{
    let mut elements = Vec::with_capacity(source.elements.capacity());
    for e in &source.elements {
        elements.push(f(e));
    }
    Contiguous { elements, equality }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i32]) -> Contiguous<i32> {
        Contiguous::from_vec(values.to_vec(), Equality::natural())
    }

    #[test]
    fn test_add_and_get() {
        let mut seq = Contiguous::new(Equality::natural());
        seq.add(1);
        seq.add(2);
        seq.add(3);

        assert_eq!(seq.size(), 3);
        assert_eq!(seq.get(0), Ok(&1));
        assert_eq!(seq.get(2), Ok(&3));
        assert_eq!(
            seq.get(3),
            Err(SequenceError::IndexOutOfRange { index: 3, size: 3 })
        );
    }

    #[test]
    fn test_negative_capacity_falls_back() {
        let err = Contiguous::<i32>::with_capacity(-1, Equality::natural()).unwrap_err();
        assert_eq!(err.error, SequenceError::InvalidCapacity { requested: -1 });

        let mut seq = err.into_value();
        assert_eq!(seq.size(), 0);
        assert_eq!(seq.capacity(), 0);
        seq.add(5);
        assert!(seq.contains(&5));
    }

    #[test]
    fn test_with_capacity() {
        let seq = Contiguous::<u8>::with_capacity(10, Equality::natural()).unwrap();
        assert!(seq.capacity() >= 10);
        assert!(seq.is_empty());
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut seq = ints(&[1, 2, 3, 2]);
        assert!(seq.remove(&2));
        assert_eq!(seq.as_slice(), &[1, 3, 2]);
        assert!(!seq.remove(&9));
        assert_eq!(seq.size(), 3);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut seq = ints(&[1, 2, 3]);
        assert_eq!(seq.set(1, 20), Ok(2));
        assert_eq!(seq.as_slice(), &[1, 20, 3]);
        assert!(seq.set(3, 0).is_err());
    }

    #[test]
    fn test_index_and_last_index() {
        let seq = ints(&[4, 5, 4, 6]);
        assert_eq!(seq.index_of(&4), Some(0));
        assert_eq!(seq.last_index_of(&4), Some(2));
        assert_eq!(seq.index_of(&7), None);
        assert_eq!(seq.last_index_of(&7), None);
    }

    #[test]
    fn test_first_last_on_empty() {
        let seq = ints(&[]);
        assert_eq!(seq.first(), Err(SequenceError::EmptyCollectionAccess));
        assert_eq!(seq.last(), Err(SequenceError::EmptyCollectionAccess));
    }

    #[test]
    fn test_sub_sequence_is_independent() {
        let mut seq = ints(&[1, 2, 3, 4]);
        let sub = seq.sub_sequence(1, 3).unwrap();
        seq.set(1, 99).unwrap();

        assert_eq!(sub.as_slice(), &[2, 3]);
        assert!(seq.sub_sequence(3, 2).is_err());
        assert!(seq.sub_sequence(0, 5).is_err());
    }

    #[test]
    fn test_bulk_operations() {
        let mut seq = ints(&[1, 2, 3, 4, 2]);
        seq.add_all(&ints(&[5, 6]));
        assert_eq!(seq.as_slice(), &[1, 2, 3, 4, 2, 5, 6]);

        seq.remove_all(&ints(&[2, 6]));
        assert_eq!(seq.as_slice(), &[1, 3, 4, 2, 5]);

        seq.retain_all(&ints(&[2, 3, 5]));
        assert_eq!(seq.as_slice(), &[3, 2, 5]);
    }

    #[test]
    fn test_filter_keeps_order_and_capacity() {
        let mut seq = Contiguous::<i32>::with_capacity(16, Equality::natural()).unwrap();
        seq.add_all(&ints(&[1, 2, 3, 4, 5]));

        let even = seq.filter(|x| x % 2 == 0);
        assert_eq!(even.as_slice(), &[2, 4]);
        assert!(even.capacity() >= seq.capacity());
    }

    #[test]
    fn test_map_changes_element_type() {
        let seq = ints(&[1, 2, 3]);
        let strings = map(&seq, |x| x.to_string(), Equality::natural());
        assert_eq!(strings.as_slice(), &["1", "2", "3"]);
        assert!(strings.contains(&"2".to_string()));
    }

    #[test]
    fn test_equals_is_order_sensitive() {
        assert!(ints(&[1, 2, 3]).equals(&ints(&[1, 2, 3])));
        assert!(!ints(&[1, 2, 3]).equals(&ints(&[3, 2, 1])));
        assert!(!ints(&[1, 2]).equals(&ints(&[1, 2, 3])));
        assert!(ints(&[]).equals(&ints(&[])));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = ints(&[1, 2, 3]);
        let mut copy = original.clone();
        assert!(copy.equals(&original));

        copy.set(0, 10).unwrap();
        copy.add(4);
        assert_eq!(original.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_display() {
        assert_eq!(ints(&[1, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(ints(&[]).to_string(), "[]");
    }

    #[test]
    #[should_panic(expected = "index 5 out of range")]
    fn test_index_panics_out_of_range() {
        let seq = ints(&[1]);
        let _ = seq[5];
    }
}
