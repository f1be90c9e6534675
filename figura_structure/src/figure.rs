// The contract between structure types and the variety generator.
//
// Downstream crates wrap `FiguralStructure` in their own chord, scale and
// rhythm types. The generator only needs to build a candidate from a number,
// read its weight and digits, ask whether it is valid, and sort it. `Figure`
// is that contract; `from_number` is the factory the generator calls for
// every candidate, resolved at compile time.

use crate::structure::FiguralStructure;
use crate::system::System;

pub trait Figure: Ord + Clone {
    /// Build the figure whose digits decode from `number`.
    fn from_number(system: &System, number: u128) -> Self;

    fn number(&self) -> u128;

    /// Count of active positions.
    fn level(&self) -> usize;

    fn digits(&self) -> &[u32];

    /// Whether the figure may appear in a variety. The zero structure never
    /// may; implementors can tighten this further.
    fn is_valid(&self) -> bool {
        self.number() != 0
    }
}

impl Figure for FiguralStructure {
    fn from_number(system: &System, number: u128) -> Self {
        FiguralStructure::from_number(system, number)
    }

    fn number(&self) -> u128 {
        FiguralStructure::number(self)
    }

    fn level(&self) -> usize {
        FiguralStructure::level(self)
    }

    fn digits(&self) -> &[u32] {
        FiguralStructure::digits(self)
    }
}
