use super::{Element, Sequence};
use smallvec::SmallVec;

impl<T: Element> Sequence<T> for Vec<T> {
    fn new() -> Self {
        Vec::new()
    }

    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    fn push(&mut self, value: T) {
        Vec::push(self, value)
    }

    fn pop(&mut self) -> Option<T> {
        Vec::pop(self)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn set(&mut self, index: usize, value: T) -> bool {
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn insert(&mut self, index: usize, value: T) {
        let index = index.min(Vec::len(self));
        Vec::insert(self, index, value)
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        (index < Vec::len(self)).then(|| Vec::remove(self, index))
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len)
    }

    fn extend_from_slice(&mut self, values: &[T]) {
        Vec::extend_from_slice(self, values)
    }

    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional)
    }

    fn for_each<F: FnMut(&T)>(&self, f: F) {
        self.iter().for_each(f)
    }
}

impl<T: Element, const N: usize> Sequence<T> for SmallVec<[T; N]> {
    fn new() -> Self {
        SmallVec::new()
    }

    fn with_capacity(capacity: usize) -> Self {
        SmallVec::with_capacity(capacity)
    }

    fn push(&mut self, value: T) {
        SmallVec::push(self, value)
    }

    fn pop(&mut self) -> Option<T> {
        SmallVec::pop(self)
    }

    fn len(&self) -> usize {
        SmallVec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn set(&mut self, index: usize, value: T) -> bool {
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn insert(&mut self, index: usize, value: T) {
        let index = index.min(SmallVec::len(self));
        SmallVec::insert(self, index, value)
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        (index < SmallVec::len(self)).then(|| SmallVec::remove(self, index))
    }

    fn clear(&mut self) {
        SmallVec::clear(self)
    }

    fn truncate(&mut self, len: usize) {
        SmallVec::truncate(self, len)
    }

    fn extend_from_slice(&mut self, values: &[T]) {
        self.extend(values.iter().cloned())
    }

    fn reserve(&mut self, additional: usize) {
        SmallVec::reserve(self, additional)
    }

    fn for_each<F: FnMut(&T)>(&self, f: F) {
        self.iter().for_each(f)
    }
}
