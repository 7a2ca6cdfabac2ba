/// Number of distinct byte values a table can hold.
pub const ALPHABET_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub value: u8,
    pub frequency: u64,
}

/// Occurrence counts keyed by byte value.
///
/// Iteration always yields symbols in ascending byte order. The compressor and
/// the decompressor both feed that order into tree construction, so it decides
/// the shape of the tree on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    slots: [Option<u64>; ALPHABET_SIZE],
    occupied: usize,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            slots: [None; ALPHABET_SIZE],
            occupied: 0,
        }
    }

    pub fn include(&mut self, value: u8) {
        let count = self.slot_mut(value);
        *count = count.saturating_add(1);
    }

    /// Records `frequency` for `value`, replacing any count already present.
    /// Returns the replaced count.
    pub fn insert(&mut self, value: u8, frequency: u64) -> Option<u64> {
        let previous = self.slots[value as usize];
        *self.slot_mut(value) = frequency;
        previous
    }

    pub fn get(&self, value: u8) -> Option<u64> {
        self.slots[value as usize]
    }

    /// Number of distinct symbols seen so far.
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Sum of all frequencies, `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        self.iter()
            .try_fold(0_u64, |acc, symbol| acc.checked_add(symbol.frequency))
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(value, slot)| {
                slot.map(|frequency| Symbol {
                    value: value as u8,
                    frequency,
                })
            })
    }

    fn slot_mut(&mut self, value: u8) -> &mut u64 {
        let slot = &mut self.slots[value as usize];
        if slot.is_none() {
            self.occupied += 1;
        }
        slot.get_or_insert(0)
    }
}

impl Extend<u8> for FrequencyTable {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| self.include(value));
    }
}

impl<'a> Extend<&'a u8> for FrequencyTable {
    fn extend<I: IntoIterator<Item = &'a u8>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl FromIterator<u8> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut table = FrequencyTable::new();
        table.extend(iter);
        table
    }
}

impl<'a> FromIterator<&'a u8> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = &'a u8>>(iter: T) -> Self {
        iter.into_iter().copied().collect()
    }
}
