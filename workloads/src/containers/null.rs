//! Do-nothing containers that match the shape of the real ones. Running a workload against them
//! measures the cost of the harness and the workload body, which is what the baseline captures.

use super::{Element, Sequence, Text};
use std::fmt;

/// Counts its elements and stores only one of them.
#[derive(Debug, Clone, Default)]
pub struct NullSequence<T> {
    len: usize,
    slot: T,
}

impl<T: Element> Sequence<T> for NullSequence<T> {
    fn new() -> Self {
        Self::default()
    }

    fn with_capacity(_capacity: usize) -> Self {
        Self::default()
    }

    fn push(&mut self, value: T) {
        self.slot = value;
        self.len += 1;
    }

    fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.slot.clone())
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> Option<&T> {
        (index < self.len).then_some(&self.slot)
    }

    fn set(&mut self, index: usize, value: T) -> bool {
        if index < self.len {
            self.slot = value;
            true
        } else {
            false
        }
    }

    fn insert(&mut self, _index: usize, value: T) {
        self.push(value)
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.len {
            self.pop()
        } else {
            None
        }
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    fn extend_from_slice(&mut self, values: &[T]) {
        if let Some(last) = values.last() {
            self.slot = last.clone();
        }
        self.len += values.len();
    }

    fn reserve(&mut self, _additional: usize) {}

    fn for_each<F: FnMut(&T)>(&self, mut f: F) {
        for _ in 0..self.len {
            f(&self.slot);
        }
    }
}

/// Tracks a byte length without keeping any text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullText {
    len: usize,
}

impl fmt::Write for NullText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl Text for NullText {
    fn new() -> Self {
        Self::default()
    }

    fn with_capacity(_capacity: usize) -> Self {
        Self::default()
    }

    fn push(&mut self, ch: char) {
        self.len += ch.len_utf8();
    }

    fn push_str(&mut self, s: &str) {
        self.len += s.len();
    }

    fn insert_str(&mut self, _index: usize, s: &str) {
        self.len += s.len();
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    fn as_str(&self) -> &str {
        ""
    }

    fn find(&self, needle: &str) -> Option<usize> {
        needle.is_empty().then_some(0)
    }
}
