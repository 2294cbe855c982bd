//! Doubly-linked sequence
//!
//! Nodes live in an arena and link to each other by slot index:
//! - `next` is the forward chain from `head` to `tail`
//! - `prev` is the non-owning back link used for O(1) predecessor access
//!
//! Freed slots are recycled, so indices stay stable for live nodes and
//! nothing outside the list can hold on to a node.

use std::fmt;
use std::iter::FusedIterator;

use super::{check_index, check_range, fmt_elements, Sequence, SequenceError};
use crate::equality::Equality;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    next: Option<usize>,
    prev: Option<usize>,
}

/// Sequence stored as a chain of nodes.
///
/// `push` and `add` are O(1); positional access walks from whichever end
/// is closer.
#[derive(Debug, Clone)]
pub struct Linked<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    length: usize,
    equality: Equality<T>,
}

impl<T> Linked<T> {
    /// Empty list.
    pub fn new(equality: Equality<T>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            length: 0,
            equality,
        }
    }

    /// Prepend an element.
    pub fn push(&mut self, element: T) {
        let idx = self.alloc(Node {
            value: element,
            next: self.head,
            prev: None,
        });
        match self.head {
            Some(old) => self.node_mut(old).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.length += 1;
    }

    /// Remove and return the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        let idx = self.head?;
        Some(self.unlink(idx))
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        let idx = self.tail?;
        Some(self.unlink(idx))
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn node(&self, idx: usize) -> &Node<T> {
        match &self.slots[idx] {
            Some(node) => node,
            None => unreachable!("link to freed slot {}", idx),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        match &mut self.slots[idx] {
            Some(node) => node,
            None => unreachable!("link to freed slot {}", idx),
        }
    }

    /// Positional access on an empty chain has no node to reach.
    fn check_access(&self, index: usize) -> Result<(), SequenceError> {
        if self.length == 0 {
            return Err(SequenceError::EmptyCollectionAccess);
        }
        check_index(index, self.length)
    }

    /// Slot of the element at `index`; caller has range-checked.
    fn locate(&self, index: usize) -> usize {
        let slot = if index < self.length / 2 + 1 {
            let mut cursor = self.head;
            for _ in 0..index {
                cursor = cursor.and_then(|idx| self.node(idx).next);
            }
            cursor
        } else {
            let mut cursor = self.tail;
            for _ in index + 1..self.length {
                cursor = cursor.and_then(|idx| self.node(idx).prev);
            }
            cursor
        };
        slot.unwrap_or_else(|| unreachable!("chain shorter than length {}", self.length))
    }

    /// Detach a live node, restitching both neighbours and the ends.
    fn unlink(&mut self, idx: usize) -> T {
        let node = match self.slots[idx].take() {
            Some(node) => node,
            None => unreachable!("unlink of freed slot {}", idx),
        };
        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        self.free.push(idx);
        self.length -= 1;
        node.value
    }
}

impl<T> Sequence<T> for Linked<T> {
    type Iter<'a>
        = Iter<'a, T>
    where
        T: 'a;

    fn equality(&self) -> &Equality<T> {
        &self.equality
    }

    fn size(&self) -> usize {
        self.length
    }

    fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.length,
        }
    }

    fn add(&mut self, element: T) {
        let idx = self.alloc(Node {
            value: element,
            next: None,
            prev: self.tail,
        });
        match self.tail {
            Some(old) => self.node_mut(old).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.length += 1;
    }

    fn get(&self, index: usize) -> Result<&T, SequenceError> {
        self.check_access(index)?;
        Ok(&self.node(self.locate(index)).value)
    }

    fn set(&mut self, index: usize, element: T) -> Result<T, SequenceError> {
        self.check_access(index)?;
        let idx = self.locate(index);
        Ok(std::mem::replace(&mut self.node_mut(idx).value, element))
    }

    fn remove_at(&mut self, index: usize) -> Result<T, SequenceError> {
        self.check_access(index)?;
        let idx = self.locate(index);
        Ok(self.unlink(idx))
    }

    fn remove(&mut self, element: &T) -> bool {
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.node(idx);
            if self.equality.matches(&node.value, element) {
                self.unlink(idx);
                return true;
            }
            cursor = node.next;
        }
        false
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.node(idx);
            cursor = node.next;
            if !keep(&node.value) {
                self.unlink(idx);
            }
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.length = 0;
    }

    fn first(&self) -> Result<&T, SequenceError> {
        self.head
            .map(|idx| &self.node(idx).value)
            .ok_or(SequenceError::EmptyCollectionAccess)
    }

    fn last(&self) -> Result<&T, SequenceError> {
        self.tail
            .map(|idx| &self.node(idx).value)
            .ok_or(SequenceError::EmptyCollectionAccess)
    }

    fn sub_sequence(&self, from: usize, to: usize) -> Result<Self, SequenceError>
    where
        T: Clone,
    {
        check_range(from, to, self.length)?;
        let mut sub = Linked::new(self.equality.clone());
        for e in self.iter().skip(from).take(to - from) {
            sub.add(e.clone());
        }
        Ok(sub)
    }

    fn filter<F>(&self, mut predicate: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        let mut filtered = Linked::new(self.equality.clone());
        for e in self.iter() {
            if predicate(e) {
                filtered.add(e.clone());
            }
        }
        filtered
    }

    fn last_index_of(&self, element: &T) -> Option<usize> {
        self.iter()
            .rev()
            .position(|e| self.equality.matches(e, element))
            .map(|from_back| self.length - 1 - from_back)
    }
}

impl<T: fmt::Display> fmt::Display for Linked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_elements(f, self.iter())
    }
}

/// Borrowing iterator over a [`Linked`] list, walkable from either end.
#[derive(Debug)]
pub struct Iter<'a, T> {
    list: &'a Linked<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.front?);
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.back?);
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Apply `f` to every element, producing a list of a new element type.
pub fn map<T, K, F>(source: &Linked<T>, mut f: F, equality: Equality<K>) -> Linked<K>
where
    F: FnMut(&T) -> K,
{
    let mut mapped = Linked::new(equality);
    for e in source.iter() {
        mapped.add(f(e));
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i32]) -> Linked<i32> {
        let mut list = Linked::new(Equality::natural());
        for v in values {
            list.add(*v);
        }
        list
    }

    /// Walk both directions and check the structural invariants.
    fn assert_links<T>(list: &Linked<T>) {
        assert_eq!(list.head.is_none(), list.length == 0);
        assert_eq!(list.tail.is_none(), list.length == 0);

        let mut steps = 0;
        let mut cursor = list.head;
        let mut last = None;
        while let Some(idx) = cursor {
            let node = list.node(idx);
            assert_eq!(node.prev, last, "back link of slot {}", idx);
            last = Some(idx);
            cursor = node.next;
            steps += 1;
        }
        assert_eq!(last, list.tail);
        assert_eq!(steps, list.length);

        let mut steps = 0;
        let mut cursor = list.tail;
        while let Some(idx) = cursor {
            cursor = list.node(idx).prev;
            steps += 1;
        }
        assert_eq!(steps, list.length);
    }

    #[test]
    fn test_push_and_add() {
        let mut list = Linked::new(Equality::natural());
        list.add(2);
        list.push(1);
        list.add(3);

        assert_eq!(list.to_vec(), vec![1, 2, 3]);
        assert_eq!(list.first(), Ok(&1));
        assert_eq!(list.last(), Ok(&3));
        assert_links(&list);
    }

    #[test]
    fn test_empty_access_is_explicit() {
        let list = ints(&[]);
        assert_eq!(list.first(), Err(SequenceError::EmptyCollectionAccess));
        assert_eq!(list.last(), Err(SequenceError::EmptyCollectionAccess));
        assert_eq!(list.get(0), Err(SequenceError::EmptyCollectionAccess));
    }

    #[test]
    fn test_positional_access_on_empty_list() {
        let mut list = ints(&[1]);
        assert_eq!(list.remove_at(0), Ok(1));

        assert_eq!(list.get(0), Err(SequenceError::EmptyCollectionAccess));
        assert_eq!(list.set(0, 5), Err(SequenceError::EmptyCollectionAccess));
        assert_eq!(list.remove_at(3), Err(SequenceError::EmptyCollectionAccess));
        assert!(list.is_empty());

        list.add(2);
        assert_eq!(
            list.get(1),
            Err(SequenceError::IndexOutOfRange { index: 1, size: 1 })
        );
    }

    #[test]
    fn test_positional_access_from_both_ends() {
        let mut list = ints(&[10, 11, 12, 13, 14, 15]);
        for i in 0..6 {
            assert_eq!(list.get(i), Ok(&(10 + i as i32)));
        }
        assert_eq!(list.set(4, 40), Ok(14));
        assert_eq!(list.get(4), Ok(&40));
        assert!(list.get(6).is_err());
        assert!(list.set(6, 0).is_err());
    }

    #[test]
    fn test_remove_head_interior_and_tail() {
        let mut list = ints(&[1, 2, 3, 4]);

        assert!(list.remove(&1));
        assert_links(&list);
        assert_eq!(list.to_vec(), vec![2, 3, 4]);

        assert!(list.remove(&3));
        assert_links(&list);
        assert_eq!(list.to_vec(), vec![2, 4]);

        assert!(list.remove(&4));
        assert_links(&list);
        assert_eq!(list.last(), Ok(&2));

        assert!(list.remove(&2));
        assert_links(&list);
        assert!(list.is_empty());
        assert!(!list.remove(&2));
    }

    #[test]
    fn test_slots_are_recycled() {
        let mut list = ints(&[1, 2, 3]);
        list.remove(&2);
        list.add(4);
        assert_eq!(list.slots.len(), 3);
        assert_eq!(list.to_vec(), vec![1, 3, 4]);
        assert_links(&list);
    }

    #[test]
    fn test_pop_both_ends() {
        let mut list = ints(&[1, 2, 3]);
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), Some(3));
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.pop_front(), None);
        assert_links(&list);
    }

    #[test]
    fn test_sub_sequence_keeps_order() {
        let list = ints(&[1, 2, 3, 4, 5]);
        let sub = list.sub_sequence(1, 4).unwrap();
        assert_eq!(sub.to_vec(), vec![2, 3, 4]);
        assert_links(&sub);
        assert_eq!(
            list.sub_sequence(4, 6).unwrap_err(),
            SequenceError::InvalidRange {
                from: 4,
                to: 6,
                size: 5
            }
        );
    }

    #[test]
    fn test_retain_and_last_index_of() {
        let mut list = ints(&[1, 2, 1, 3, 1]);
        assert_eq!(list.index_of(&1), Some(0));
        assert_eq!(list.last_index_of(&1), Some(4));

        list.retain(|x| *x != 1);
        assert_eq!(list.to_vec(), vec![2, 3]);
        assert_links(&list);
    }

    #[test]
    fn test_reverse_iteration_matches() {
        let list = ints(&[1, 2, 3]);
        let back: Vec<_> = list.iter().rev().copied().collect();
        assert_eq!(back, vec![3, 2, 1]);

        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_clone_does_not_alias_nodes() {
        let original = ints(&[1, 2, 3]);
        let mut copy = original.clone();
        copy.set(1, 20).unwrap();
        copy.remove(&1);

        assert_eq!(original.to_vec(), vec![1, 2, 3]);
        assert_eq!(copy.to_vec(), vec![20, 3]);
    }

    #[test]
    fn test_map_and_display() {
        let list = ints(&[1, 2]);
        let doubled = map(&list, |x| x * 2, Equality::natural());
        assert_eq!(doubled.to_string(), "[2, 4]");
    }
}
