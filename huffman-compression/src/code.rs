use std::fmt;

/// Longest path a tree over 256 symbols can produce.
pub const MAX_CODE_LEN: usize = 256;

/// A bit sequence, stored most significant bit first.
///
/// Used both as the scratch path during table generation (push on descent,
/// pop on return) and as the frozen code of a single symbol.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Code {
    bytes: [u8; MAX_CODE_LEN / 8],
    len: usize,
}

impl Default for Code {
    fn default() -> Self {
        Self::new()
    }
}

impl Code {
    pub fn new() -> Self {
        Code {
            bytes: [0; MAX_CODE_LEN / 8],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends a bit. A tree over a byte alphabet is at most 255 levels deep,
    /// so a code never outgrows `MAX_CODE_LEN`.
    pub fn push(&mut self, bit: bool) {
        debug_assert!(self.len < MAX_CODE_LEN, "code longer than {MAX_CODE_LEN} bits");
        if bit {
            self.bytes[self.len / 8] |= 1 << (7 - self.len % 8);
        }
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<bool> {
        let index = self.len.checked_sub(1)?;
        let last = self.get(index)?;
        // bits past `len` stay zero so derived equality holds
        self.bytes[index / 8] &= !(1 << (7 - index % 8));
        self.len = index;
        Some(last)
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.len).then(|| self.bytes[index / 8] & (1 << (7 - index % 8)) != 0)
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).filter_map(|index| self.get(index))
    }

    pub fn starts_with(&self, prefix: &Code) -> bool {
        prefix.len <= self.len && prefix.bits().zip(self.bits()).all(|(a, b)| a == b)
    }
}

impl FromIterator<bool> for Code {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut code = Code::new();
        iter.into_iter().for_each(|bit| code.push(bit));
        code
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bits()
            .try_for_each(|bit| f.write_str(if bit { "1" } else { "0" }))
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::{Code, MAX_CODE_LEN};

    fn code(bits: &str) -> Code {
        bits.chars().map(|ch| ch == '1').collect()
    }

    #[test]
    fn test_push_and_pop_follow_stack_order() {
        let mut code = Code::new();
        code.push(true);
        code.push(false);
        code.push(true);
        assert_eq!(code.to_string(), "101");
        assert_eq!(code.pop(), Some(true));
        assert_eq!(code.pop(), Some(false));
        assert_eq!(code.to_string(), "1");
        assert_eq!(code.pop(), Some(true));
        assert_eq!(code.pop(), None);
        assert!(code.is_empty());
    }

    #[test]
    fn test_popped_bits_do_not_leak() {
        let mut path = code("111");
        path.pop();
        assert_eq!(path, code("11"));
        path.push(false);
        assert_eq!(path, code("110"));
    }

    #[test]
    fn test_clone_is_frozen() {
        let mut path = code("01");
        let frozen = path.clone();
        path.push(true);
        assert_eq!(frozen.to_string(), "01");
        assert_eq!(path.to_string(), "011");
    }

    #[test]
    fn test_spans_byte_boundaries() {
        let mut code = Code::new();
        for index in 0..MAX_CODE_LEN {
            code.push(index % 3 == 0);
        }
        assert_eq!(code.len(), MAX_CODE_LEN);
        assert_eq!(code.get(9), Some(true));
        assert_eq!(code.get(10), Some(false));
        assert_eq!(code.get(MAX_CODE_LEN), None);
    }

    #[test]
    fn test_starts_with() {
        assert!(code("0110").starts_with(&code("01")));
        assert!(code("0110").starts_with(&Code::new()));
        assert!(!code("0110").starts_with(&code("1")));
        assert!(!code("01").starts_with(&code("0110")));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "code longer than")]
    fn test_push_past_max_len() {
        let mut code = Code::new();
        for _ in 0..=MAX_CODE_LEN {
            code.push(true);
        }
    }
}
