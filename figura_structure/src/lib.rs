// Figura structural algebra of musical patterns.
//
// Chords, scales and rhythms are all modeled as fixed-length digit sequences
// over a finite alphabet. This crate provides the arithmetic on those
// sequences; catalog generation lives in `figura_variety`, and the string
// format in `figura_code`.
//
// Module overview:
// - `system.rs`:    `System` (degree, order), number encode/decode, weight,
//                   rotation (`transpose`), orbits and canonical class numbers.
// - `structure.rs`: `FiguralStructure` with eagerly cached derived fields,
//                   predicates, similarity, ordering and serde support.
// - `figure.rs`:    The `Figure` trait the generator is written against.
// - `error.rs`:     `StructureError`.
//
// Structures are plain values: cloned, compared and dropped with their owning
// collection. Nothing here does I/O or holds shared state.

pub mod error;
pub mod figure;
pub mod structure;
pub mod system;

pub use error::StructureError;
pub use figure::Figure;
pub use structure::{FiguralStructure, PAUSE_START, TONE_START, distance_schema};
pub use system::{Digits, System};
