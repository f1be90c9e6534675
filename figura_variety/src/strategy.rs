use figura_structure::FiguralStructure;
use std::fmt;

/// How a variety chooses its candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Every structure with exactly `level` active positions.
    Instances { level: usize },
    /// One canonical representative (the smallest number) per rotation
    /// class of the given level, found with an orbit sieve.
    Classes { level: usize },
    /// Degree-2 rotation classes, tested one odd candidate at a time with the
    /// variety's class-number function instead of a sieve.
    BinaryClasses { level: usize },
    /// Every structure whose active positions are a subset of the mask's,
    /// with any nonzero digit on each. `level: None` covers every sub-level
    /// from 0 up to the mask's level.
    Substructures {
        mask: FiguralStructure,
        level: Option<usize>,
    },
    /// `Classes` pruned to rhythmically separable and simple patterns.
    RhythmicClasses { level: usize },
    /// One evenly spaced pattern per divisor of the order. No search.
    MetricClasses,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Instances { .. } => "instances",
            Strategy::Classes { .. } => "classes",
            Strategy::BinaryClasses { .. } => "binary-classes",
            Strategy::Substructures { .. } => "substructures",
            Strategy::RhythmicClasses { .. } => "rhythmic-classes",
            Strategy::MetricClasses => "metric-classes",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Instances { level }
            | Strategy::Classes { level }
            | Strategy::BinaryClasses { level }
            | Strategy::RhythmicClasses { level } => write!(f, "{}(level {level})", self.name()),
            Strategy::Substructures { mask, level } => match level {
                Some(level) => write!(f, "{}(mask {mask}, level {level})", self.name()),
                None => write!(f, "{}(mask {mask})", self.name()),
            },
            Strategy::MetricClasses => f.write_str(self.name()),
        }
    }
}
