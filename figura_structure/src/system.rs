// The system descriptor and the number arithmetic built on it.
//
// A `System` fixes the alphabet size (`degree`) and sequence length (`order`)
// of every structure built from it. Structures are numbered by reading their
// digits as a base-`degree` integer with the least significant digit at
// position 0, so numbers run over `[0, degree^order)`.
//
// Numbers are `u128`. `System::try_new` refuses any system whose capacity
// `degree^order` does not fit, so every number a system can produce is
// representable and the arithmetic below never overflows.
//
// Transposition is cyclic rotation: the digit at position `i` moves to
// `i + 1` and the top digit wraps to position 0. Numerically that is
// `(n * degree) mod (degree^order - 1)`, with the all-maximal number
// `degree^order - 1` as a fixed point. It is computed by splitting off the
// top digit rather than multiplying, so no intermediate exceeds the capacity.
//
// See also: `structure.rs` for the cached digit view of a single number, and
// the `figura_variety` crate, which walks orbits of `transpose` to sieve
// rotation classes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::error::StructureError;

/// Digit storage. Most musical systems have at most 16 positions.
pub type Digits = SmallVec<[u32; 16]>;

/// Alphabet size and sequence length shared by a family of structures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RawSystem", try_from = "RawSystem")]
pub struct System {
    degree: u32,
    order: usize,
    /// `degree^order`.
    capacity: u128,
    /// `degree^(order - 1)`, the place value of the top digit. 1 when order is 0.
    top_place: u128,
}

#[derive(Serialize, Deserialize)]
struct RawSystem {
    degree: u32,
    order: usize,
}

impl From<System> for RawSystem {
    fn from(system: System) -> Self {
        RawSystem {
            degree: system.degree,
            order: system.order,
        }
    }
}

impl TryFrom<RawSystem> for System {
    type Error = StructureError;

    fn try_from(raw: RawSystem) -> Result<Self, Self::Error> {
        System::try_new(raw.degree, raw.order)
    }
}

impl System {
    /// Create a system. Panics if `degree` is 0 or `degree^order` overflows
    /// 128 bits; use `try_new` for untrusted input.
    pub fn new(degree: u32, order: usize) -> Self {
        match System::try_new(degree, order) {
            Ok(system) => system,
            Err(e) => panic!("invalid system (degree {degree}, order {order}): {e}"),
        }
    }

    pub fn try_new(degree: u32, order: usize) -> Result<Self, StructureError> {
        if degree == 0 {
            return Err(StructureError::InvalidDegree);
        }
        let overflow = StructureError::CapacityOverflow { degree, order };
        let exponent = u32::try_from(order).map_err(|_| overflow.clone())?;
        let capacity = u128::from(degree)
            .checked_pow(exponent)
            .ok_or(overflow)?;
        let top_place = if order == 0 {
            1
        } else {
            capacity / u128::from(degree)
        };
        Ok(System {
            degree,
            order,
            capacity,
            top_place,
        })
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of distinct structures: `degree^order`.
    pub fn capacity(&self) -> u128 {
        self.capacity
    }

    /// The largest number, all digits at `degree - 1`. It is the only
    /// non-zero fixed point of `transpose`.
    pub fn max_number(&self) -> u128 {
        self.capacity - 1
    }

    pub fn is_binary(&self) -> bool {
        self.degree == 2
    }

    /// Expand a number into `order` digits, least significant first.
    /// Numbers beyond the capacity are reduced modulo the capacity.
    pub fn decode(&self, number: u128) -> Digits {
        let degree = u128::from(self.degree);
        let mut rest = number % self.capacity;
        let mut digits = Digits::with_capacity(self.order);
        for _ in 0..self.order {
            let digit = rest % degree;
            rest = (rest - digit) / degree;
            // digit < degree <= u32::MAX
            digits.push(digit as u32);
        }
        digits
    }

    /// Inverse of `decode`. Only the first `order` digits are read; each is
    /// expected to be below `degree`.
    pub fn encode(&self, digits: &[u32]) -> u128 {
        let degree = u128::from(self.degree);
        digits
            .iter()
            .take(self.order)
            .rev()
            .fold(0, |acc, &digit| acc * degree + u128::from(digit))
    }

    /// Count of nonzero digits, without materializing them.
    pub fn weight(&self, number: u128) -> usize {
        if self.is_binary() {
            return (number % self.capacity).count_ones() as usize;
        }
        let degree = u128::from(self.degree);
        let mut rest = number % self.capacity;
        let mut weight = 0;
        for _ in 0..self.order {
            if rest % degree != 0 {
                weight += 1;
            }
            rest /= degree;
        }
        weight
    }

    /// Rotate one position: the modular model of musical transposition.
    pub fn transpose(&self, number: u128) -> u128 {
        if self.order == 0 {
            return 0;
        }
        let number = number % self.capacity;
        let top = number / self.top_place;
        let rest = number % self.top_place;
        rest * u128::from(self.degree) + top
    }

    /// Rotate `steps` positions.
    pub fn transpose_by(&self, number: u128, steps: usize) -> u128 {
        if self.order == 0 {
            return 0;
        }
        (0..steps % self.order).fold(number % self.capacity, |n, _| self.transpose(n))
    }

    /// Every distinct rotation of `number`, starting with `number` itself.
    pub fn orbit(&self, number: u128) -> Vec<u128> {
        let start = number % self.capacity;
        let mut orbit = vec![start];
        let mut current = self.transpose(start);
        while current != start {
            orbit.push(current);
            current = self.transpose(current);
        }
        orbit
    }

    /// Number of distinct rotations (the orbit size). Always divides `order`.
    pub fn period(&self, number: u128) -> usize {
        self.orbit(number).len()
    }

    /// Canonical representative of the rotation class: the smallest number
    /// in the orbit.
    pub fn class_number(&self, number: u128) -> u128 {
        let start = number % self.capacity;
        let mut smallest = start;
        let mut current = self.transpose(start);
        while current != start {
            smallest = smallest.min(current);
            current = self.transpose(current);
        }
        smallest
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "degree {}, order {}", self.degree, self.order)
    }
}
