// Orbit sieve over rotation classes.
//
// `ClassSieve` walks candidates `1, 2, 3, ...` in ascending order and keeps
// one mark per number. An unmarked candidate is the smallest member of its
// orbit, because every smaller member would have been visited first and would
// have marked it. The sieve yields it and marks the rest of its orbit by
// applying `transpose` until the walk returns to the candidate.
//
// The scan stops below `min(max_number, ceiling)`. The all-maximal number
// `max_number` is a rotation fixed point and is never scanned; callers add it
// themselves. When the ceiling cuts the range short, every yielded number is
// still a true class representative, but classes whose representative lies
// above the ceiling are never reached. `is_truncated` reports this.
//
// `binary_candidates` serves the degree-2 path, which skips the marks
// entirely: a binary class representative is always odd and, apart from the
// all-ones fixed point, below `2^(order-1)`.

use figura_structure::System;

/// Packed mark bits over `[0, len)`.
struct Marks {
    words: Vec<u64>,
}

impl Marks {
    fn new(len: u128) -> Self {
        Marks {
            words: vec![0; len.div_ceil(64) as usize],
        }
    }

    fn get(&self, index: u128) -> bool {
        self.words[(index / 64) as usize] & (1 << (index % 64)) != 0
    }

    fn set(&mut self, index: u128) {
        self.words[(index / 64) as usize] |= 1 << (index % 64);
    }
}

/// Yields the canonical representative of every rotation class whose
/// representative lies in `[1, min(max_number, ceiling))`, ascending.
pub struct ClassSieve<'a> {
    system: &'a System,
    marks: Marks,
    next: u128,
    end: u128,
}

impl<'a> ClassSieve<'a> {
    pub fn new(system: &'a System, ceiling: u64) -> Self {
        let end = system.max_number().min(u128::from(ceiling));
        ClassSieve {
            system,
            marks: Marks::new(end),
            next: 1,
            end,
        }
    }

    /// Whether the ceiling cut the scan short of `max_number`.
    pub fn is_truncated(&self) -> bool {
        self.end < self.system.max_number()
    }

    /// Exclusive upper bound of the scanned range.
    pub fn end(&self) -> u128 {
        self.end
    }
}

impl Iterator for ClassSieve<'_> {
    type Item = u128;

    fn next(&mut self) -> Option<u128> {
        while self.next < self.end {
            let candidate = self.next;
            self.next += 1;
            if self.marks.get(candidate) {
                continue;
            }
            let mut member = self.system.transpose(candidate);
            while member != candidate {
                if member < self.end {
                    self.marks.set(member);
                }
                member = self.system.transpose(member);
            }
            return Some(candidate);
        }
        None
    }
}

/// Odd numbers in `[1, 2^(order-1))`: every possible binary class
/// representative except the all-ones fixed point.
pub fn binary_candidates(system: &System) -> impl Iterator<Item = u128> + use<> {
    (1..system.capacity() / 2).step_by(2)
}
