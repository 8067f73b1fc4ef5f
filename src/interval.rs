//! Address-interval to symbol tables, one per loaded module.

/// A half-open `[start, start + length)` range of a 64-bit address space.
///
/// `contains` uses the identity `(x - start) < length` with wrapping
/// arithmetic: a single comparison that also handles `start == 0` and an
/// `end` that overflows `u64::MAX`, without needing a separate overflow
/// check. This form is deliberate (see the crate's design notes) and must
/// not be replaced by a two-sided `start <= x && x < end` comparison, which
/// would need extra handling when `end` wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u64,
    pub length: u64,
}

impl Interval {
    pub fn new(start: u64, length: u64) -> Self {
        Interval { start, length }
    }

    pub fn end(&self) -> u64 {
        self.start.wrapping_add(self.length)
    }

    pub fn contains(&self, addr: u64) -> bool {
        addr.wrapping_sub(self.start) < self.length
    }
}

/// An ordered `(start, length) -> symbol` table for one module.
///
/// Built via repeated [`IntervalMap::add`], then frozen with
/// [`IntervalMap::finalize`]; lookups are only valid after finalization.
/// Overlapping input intervals are accepted; if more than one interval
/// would match an address, either is a valid answer.
#[derive(Debug, Default)]
pub struct IntervalMap {
    entries: Vec<(u64, u64, String)>,
    finalized: bool,
}

impl IntervalMap {
    pub fn new() -> Self {
        IntervalMap::default()
    }

    /// Appends an entry. Only valid before [`finalize`](Self::finalize).
    pub fn add(&mut self, start: u64, length: u64, symbol: impl Into<String>) {
        debug_assert!(!self.finalized, "IntervalMap::add after finalize");
        self.entries.push((start, length, symbol.into()));
    }

    /// Sorts entries by `start` ascending. No further mutation is allowed.
    pub fn finalize(&mut self) {
        self.entries.sort_by_key(|(start, _, _)| *start);
        self.finalized = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binary search for the interval containing `addr`. Returns the
    /// matched symbol and the interval's `start`.
    pub fn lookup(&self, addr: u64) -> Option<(&str, u64)> {
        debug_assert!(self.finalized, "IntervalMap::lookup before finalize");
        // The greatest `start <= addr`: the only candidate that could
        // contain `addr`, since entries are sorted by `start`.
        let idx = self.entries.partition_point(|(start, _, _)| *start <= addr);
        if idx == 0 {
            return None;
        }
        let (start, length, symbol) = &self.entries[idx - 1];
        let interval = Interval::new(*start, *length);
        if interval.contains(addr) {
            Some((symbol.as_str(), *start))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let iv = Interval::new(100, 10);
        assert!(!iv.contains(99));
        assert!(iv.contains(100));
        assert!(iv.contains(109));
        assert!(!iv.contains(110));
    }

    #[test]
    fn contains_handles_start_zero_and_wraparound() {
        let iv = Interval::new(0, 5);
        assert!(iv.contains(0));
        assert!(iv.contains(4));
        assert!(!iv.contains(5));

        let iv_near_max = Interval::new(u64::MAX - 2, 5);
        assert!(iv_near_max.contains(u64::MAX));
        assert!(iv_near_max.contains(1)); // wraps past u64::MAX
        assert!(!iv_near_max.contains(3));
    }

    #[test]
    fn lookup_finds_matching_interval() {
        let mut map = IntervalMap::new();
        map.add(0x1000, 0x100, "a");
        map.add(0x2000, 0x100, "b");
        map.finalize();
        assert_eq!(map.lookup(0x1050), Some(("a", 0x1000)));
        assert_eq!(map.lookup(0x2000), Some(("b", 0x2000)));
        assert_eq!(map.lookup(0x1100), None); // gap between a and b
        assert_eq!(map.lookup(0x0), None);
    }

    #[test]
    fn lookup_at_shared_boundary_picks_the_owning_interval() {
        let mut map = IntervalMap::new();
        map.add(0, 10, "low");
        map.add(10, 10, "high");
        map.finalize();
        assert_eq!(map.lookup(9), Some(("low", 0)));
        assert_eq!(map.lookup(10), Some(("high", 10)));
    }

    #[test]
    fn lookup_with_overlap_returns_either_match() {
        let mut map = IntervalMap::new();
        map.add(0, 20, "outer");
        map.add(5, 5, "inner");
        map.finalize();
        let result = map.lookup(7);
        assert!(result == Some(("outer", 0)) || result == Some(("inner", 5)));
    }
}
