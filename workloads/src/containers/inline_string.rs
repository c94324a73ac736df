use super::{floor_char_boundary, Text};
use std::fmt;

/// A string that keeps up to `N` bytes inline and moves to a heap [String] once it outgrows them.
///
/// Like a spilled `SmallVec`, a heap string never moves back inline.
#[derive(Clone)]
pub struct InlineString<const N: usize> {
    repr: Repr<N>,
}

#[derive(Clone)]
enum Repr<const N: usize> {
    Inline { buf: [u8; N], len: u8 },
    Heap(String),
}

impl<const N: usize> InlineString<N> {
    const FITS_LEN: () = assert!(N <= u8::MAX as usize, "inline capacity must fit in a u8");

    pub fn is_inline(&self) -> bool {
        matches!(self.repr, Repr::Inline { .. })
    }

    fn empty() -> Self {
        let () = Self::FITS_LEN;
        Self {
            repr: Repr::Inline {
                buf: [0; N],
                len: 0,
            },
        }
    }

    fn to_heap(&self, additional: usize) -> String {
        let mut heap = String::with_capacity(self.len() + additional);
        heap.push_str(self.as_str());
        heap
    }
}

impl<const N: usize> Default for InlineString<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> Text for InlineString<N> {
    fn new() -> Self {
        Self::empty()
    }

    fn with_capacity(capacity: usize) -> Self {
        if capacity <= N {
            Self::empty()
        } else {
            Self {
                repr: Repr::Heap(String::with_capacity(capacity)),
            }
        }
    }

    fn push(&mut self, ch: char) {
        let mut encoded = [0; 4];
        self.push_str(ch.encode_utf8(&mut encoded));
    }

    fn push_str(&mut self, s: &str) {
        match &mut self.repr {
            Repr::Inline { buf, len } if *len as usize + s.len() <= N => {
                let start = *len as usize;
                buf[start..start + s.len()].copy_from_slice(s.as_bytes());
                *len += s.len() as u8;
            }
            Repr::Heap(heap) => heap.push_str(s),
            Repr::Inline { .. } => {
                let mut heap = self.to_heap(s.len());
                heap.push_str(s);
                self.repr = Repr::Heap(heap);
            }
        }
    }

    fn insert_str(&mut self, index: usize, s: &str) {
        let index = floor_char_boundary(self.as_str(), index);
        match &mut self.repr {
            Repr::Inline { buf, len } if *len as usize + s.len() <= N => {
                let end = *len as usize;
                buf.copy_within(index..end, index + s.len());
                buf[index..index + s.len()].copy_from_slice(s.as_bytes());
                *len += s.len() as u8;
            }
            Repr::Heap(heap) => heap.insert_str(index, s),
            Repr::Inline { .. } => {
                let mut heap = self.to_heap(s.len());
                heap.insert_str(index, s);
                self.repr = Repr::Heap(heap);
            }
        }
    }

    fn len(&self) -> usize {
        match &self.repr {
            Repr::Inline { len, .. } => *len as usize,
            Repr::Heap(heap) => heap.len(),
        }
    }

    fn clear(&mut self) {
        match &mut self.repr {
            Repr::Inline { len, .. } => *len = 0,
            Repr::Heap(heap) => heap.clear(),
        }
    }

    fn truncate(&mut self, new_len: usize) {
        let new_len = floor_char_boundary(self.as_str(), new_len);
        match &mut self.repr {
            Repr::Inline { len, .. } => *len = new_len as u8,
            Repr::Heap(heap) => heap.truncate(new_len),
        }
    }

    fn as_str(&self) -> &str {
        match &self.repr {
            // Only whole `&str` values are ever copied in, so the prefix is valid UTF-8.
            Repr::Inline { buf, len } => {
                std::str::from_utf8(&buf[..*len as usize]).unwrap_or_default()
            }
            Repr::Heap(heap) => heap,
        }
    }
}

impl<const N: usize> PartialEq for InlineString<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<const N: usize> Eq for InlineString<N> {}

impl<const N: usize> fmt::Write for InlineString<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl<const N: usize> fmt::Display for InlineString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for InlineString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}
