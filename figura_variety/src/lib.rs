// Figura variety generator: bounded catalogs of figural structures.
//
// Builds the collections that chord, scale and rhythm catalogs are made of:
// every structure of a level, one representative per rotation class, every
// substructure of a modality mask, and rhythm-tuned class lists. All runs are
// single-threaded, deterministic and bounded by a result cap.
//
// Architecture:
// - variety.rs:      `Variety<T>`, the generator front end (qualifier, cap,
//                    strategy dispatch, sorting, class census)
// - strategy.rs:     The `Strategy` enum
// - collector.rs:    Cap- and qualifier-enforcing result accumulation
// - sieve.rs:        Orbit sieve over rotation classes, binary candidates
// - substructure.rs: Backtracking enumeration under a mask
// - rhythm.rs:       Separability/simplicity tests and metric patterns
// - config.rs:       JSON-loadable `GeneratorConfig`
// - error.rs:        `VarietyError`
//
// Generation is generic over `figura_structure::Figure`, so downstream types
// wrapping `FiguralStructure` get catalogs of themselves directly.

mod collector;
pub mod config;
pub mod error;
pub mod rhythm;
pub mod sieve;
pub mod strategy;
mod substructure;
pub mod variety;

pub use config::{GeneratorConfig, RhythmParams};
pub use error::VarietyError;
pub use strategy::Strategy;
pub use variety::{ClassNumberFn, Qualifier, SortDirection, Variety};
