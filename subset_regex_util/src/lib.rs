use std::fmt::{Debug, Display, Formatter};

/// Identifier of a state in an NFA or DFA.
///
/// Ids are handed out densely by a [`StateAllocator`], so `index()` can be used
/// directly to index the arena the id was allocated for.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

impl StateId {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl Debug for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Monotonic source of [`StateId`]s for a single build.
#[derive(Debug, Default)]
pub struct StateAllocator {
    next: usize,
}

impl StateAllocator {
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    pub fn allocate(&mut self) -> StateId {
        let id = StateId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub const fn allocated(&self) -> usize {
        self.next
    }
}

#[inline(always)]
const fn code_point_len(marker: u8) -> usize {
    if marker >> 7 == 0 {
        1
    }
    else if marker >> 5 == 0b110 {
        2
    }
    else if marker >> 4 == 0b1110 {
        3
    }
    else if marker >> 3 == 0b11110 {
        4
    }
    else {
        panic!("Malformed UTF-8 codepoint");
    }
}

/// Cursor over a `&str` that can be stepped one scalar value at a time in a
/// `const fn`. Used by the matchers generated by `regex!`.
#[derive(Copy, Clone)]
pub struct CharSlice<'a> {
    offset: usize,
    base: &'a str,
}

impl<'a> CharSlice<'a> {
    #[inline(always)]
    pub const fn new(s: &'a str) -> Self {
        Self { offset: 0, base: s }
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool { self.offset == self.base.len() }

    /// Returns the next scalar value and the slice positioned after it.
    ///
    /// Must not be called on an empty slice.
    #[inline(always)]
    pub const fn get_advance(&self) -> (u32, CharSlice<'a>) {
        let bs = self.base.as_bytes();
        let len = code_point_len(bs[self.offset]);

        let mut scalar = match len {
            1 => bs[self.offset] as u32,
            2 => (bs[self.offset] & 0x1F) as u32,
            3 => (bs[self.offset] & 0x0F) as u32,
            _ => (bs[self.offset] & 0x07) as u32,
        };
        let mut i = 1;
        while i < len {
            scalar = (scalar << 6) | (bs[self.offset + i] & 0x3F) as u32;
            i += 1;
        }

        (scalar, CharSlice { offset: self.offset + len, base: self.base })
    }
}
