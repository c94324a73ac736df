//! The capability traits every candidate container implements, so that one workload body can
//! drive all of them.

mod inline_string;
mod null;
mod sequence_impls;
mod text_impls;

pub use inline_string::InlineString;
pub use null::{NullSequence, NullText};

use smallvec::SmallVec;

/// A value stored in a [Sequence] by the workloads.
pub trait Element: Clone + Default + 'static {
    const NAME: &'static str;

    /// The deterministic `index`th value of the input data.
    fn nth(index: usize) -> Self;

    /// A cheap number derived from the value, summed by read workloads.
    fn weight(&self) -> u64;
}

impl Element for u32 {
    const NAME: &'static str = "u32";

    fn nth(index: usize) -> Self {
        (index as u32).wrapping_mul(2_654_435_761)
    }

    fn weight(&self) -> u64 {
        u64::from(*self)
    }
}

impl Element for String {
    const NAME: &'static str = "String";

    fn nth(index: usize) -> Self {
        format!("element-{index:05}")
    }

    fn weight(&self) -> u64 {
        self.len() as u64
    }
}

/// A growable sequence of `T`.
///
/// Index arguments never panic: out of range reads return `None`, inserts are clamped to the end.
pub trait Sequence<T: Element>: Clone {
    fn new() -> Self;

    fn with_capacity(capacity: usize) -> Self;

    fn push(&mut self, value: T);

    fn pop(&mut self) -> Option<T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&T>;

    /// Replace the value at `index`, returns false if it is out of range.
    fn set(&mut self, index: usize, value: T) -> bool;

    fn insert(&mut self, index: usize, value: T);

    fn remove(&mut self, index: usize) -> Option<T>;

    fn clear(&mut self);

    fn truncate(&mut self, len: usize);

    fn extend_from_slice(&mut self, values: &[T]);

    fn reserve(&mut self, additional: usize);

    fn for_each<F: FnMut(&T)>(&self, f: F);
}

/// Selects a [Sequence] implementation for any element type, so that the container tag can be
/// resolved once and the element type per scenario.
pub trait SequenceFactory {
    type Seq<T: Element>: Sequence<T>;
}

pub struct NullSequenceFactory;

impl SequenceFactory for NullSequenceFactory {
    type Seq<T: Element> = NullSequence<T>;
}

pub struct StdVecFactory;

impl SequenceFactory for StdVecFactory {
    type Seq<T: Element> = Vec<T>;
}

pub struct SmallVecFactory<const N: usize>;

impl<const N: usize> SequenceFactory for SmallVecFactory<N> {
    type Seq<T: Element> = SmallVec<[T; N]>;
}

/// A variable-length UTF-8 text buffer.
///
/// Byte offsets that do not fall on a character boundary are rounded down to the previous one.
pub trait Text: Clone + PartialEq + std::fmt::Write {
    fn new() -> Self;

    fn with_capacity(capacity: usize) -> Self;

    fn push(&mut self, ch: char);

    fn push_str(&mut self, s: &str);

    fn insert_str(&mut self, index: usize, s: &str);

    /// Length in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    fn truncate(&mut self, len: usize);

    fn as_str(&self) -> &str;

    fn find(&self, needle: &str) -> Option<usize> {
        self.as_str().find(needle)
    }
}

/// The largest character boundary of `s` that is not after `index`.
pub(crate) fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index)
        .rev()
        .find(|i| s.is_char_boundary(*i))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_boundary_rounds_down_inside_characters() {
        let s = "aé";
        assert_eq!(0, floor_char_boundary(s, 0));
        assert_eq!(1, floor_char_boundary(s, 1));
        assert_eq!(1, floor_char_boundary(s, 2));
        assert_eq!(3, floor_char_boundary(s, 3));
        assert_eq!(3, floor_char_boundary(s, 10));
    }

    #[test]
    fn elements_are_deterministic() {
        assert_eq!(u32::nth(7), u32::nth(7));
        assert_ne!(u32::nth(1), u32::nth(2));
        assert_eq!("element-00042", String::nth(42));
    }
}
