use super::{floor_char_boundary, Text};

impl Text for String {
    fn new() -> Self {
        String::new()
    }

    fn with_capacity(capacity: usize) -> Self {
        String::with_capacity(capacity)
    }

    fn push(&mut self, ch: char) {
        String::push(self, ch)
    }

    fn push_str(&mut self, s: &str) {
        String::push_str(self, s)
    }

    fn insert_str(&mut self, index: usize, s: &str) {
        let index = floor_char_boundary(self, index);
        String::insert_str(self, index, s)
    }

    fn len(&self) -> usize {
        String::len(self)
    }

    fn clear(&mut self) {
        String::clear(self)
    }

    fn truncate(&mut self, len: usize) {
        let len = floor_char_boundary(self, len);
        String::truncate(self, len)
    }

    fn as_str(&self) -> &str {
        String::as_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_offsets_round_down_to_boundaries() {
        let mut s = <String as Text>::new();
        Text::push_str(&mut s, "añb");

        Text::truncate(&mut s, 2);
        assert_eq!("a", s);

        Text::insert_str(&mut s, 0, "ñ");
        Text::insert_str(&mut s, 1, "x");
        assert_eq!("xña", s);

        assert_eq!(Some(1), Text::find(&s, "ñ"));
    }
}
