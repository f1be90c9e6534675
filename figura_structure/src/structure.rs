// Figural structures: a digit sequence plus everything derived from it.
//
// A `FiguralStructure` is the value every chord, rhythm and scale pattern is
// built on. It holds `order` digits over `[0, degree)` together with cached
// derived fields: the base-`degree` number, the level (count of nonzero
// digits), the g-level (digit sum), circular first differences, variability
// and the packed structural code.
//
// The cache is never edited piecemeal. Every constructor and every whole-
// sequence replacement (`set_number`, `set_digits`, `set_code`) rebuilds the
// structure through `from_valid_digits`, so derived fields can never go stale.
//
// Digit semantics: 0 is inactive, nonzero is active. In rhythmic use the
// value `TONE_START` (1) marks a tone onset and `PAUSE_START` (2) a pause
// onset.
//
// Ordering: `Ord` sorts by level, then digit sequence, then degree. The raw
// numeric order is a different order (a level-2 structure can have a larger
// number than a level-3 one); it is available only through `cmp_by_number`
// so the two can never be confused behind `<`.
//
// See also: `system.rs` for the number arithmetic, `figure.rs` for the trait
// the generator needs, and the `figura_code` crate for the code format.

use figura_code::{parse_digits, parse_digits_strict, render, render_packed};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::StructureError;
use crate::system::{Digits, System};

/// Digit value marking a tone onset.
pub const TONE_START: u32 = 1;

/// Digit value marking a pause onset. Reserved; never a tone.
pub const PAUSE_START: u32 = 2;

/// A fixed-length digit sequence with cached arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "StructureRecord", try_from = "StructureRecord")]
pub struct FiguralStructure {
    system: System,
    number: u128,
    digits: Digits,
    level: usize,
    g_level: u64,
    diffs: Vec<i64>,
    variability: f64,
    code: String,
}

/// Persisted form: the system plus the packed code.
#[derive(Serialize, Deserialize)]
struct StructureRecord {
    system: System,
    code: String,
}

impl From<FiguralStructure> for StructureRecord {
    fn from(structure: FiguralStructure) -> Self {
        StructureRecord {
            system: structure.system,
            code: structure.code,
        }
    }
}

impl TryFrom<StructureRecord> for FiguralStructure {
    type Error = StructureError;

    fn try_from(record: StructureRecord) -> Result<Self, Self::Error> {
        FiguralStructure::try_from_code(&record.system, &record.code)
    }
}

impl FiguralStructure {
    /// Decode a number. Numbers beyond the capacity wrap modulo the capacity.
    pub fn from_number(system: &System, number: u128) -> Self {
        Self::from_valid_digits(*system, system.decode(number))
    }

    /// Leniently parse a structural code. Unreadable, negative and
    /// out-of-alphabet tokens are skipped, extra tokens are ignored and a
    /// short code is padded with zeros.
    pub fn from_code(system: &System, code: &str) -> Self {
        let digits = parse_digits(code, system.order(), system.degree());
        Self::from_valid_digits(*system, Digits::from_vec(digits))
    }

    /// Parse a structural code, rejecting anything `from_code` would skip,
    /// pad or truncate.
    pub fn try_from_code(system: &System, code: &str) -> Result<Self, StructureError> {
        let digits = parse_digits_strict(code, system.order(), system.degree())?;
        Ok(Self::from_valid_digits(*system, Digits::from_vec(digits)))
    }

    /// Build from an explicit digit list of length `order`.
    pub fn from_digits(system: &System, digits: &[u32]) -> Result<Self, StructureError> {
        check_digits(system, digits)?;
        Ok(Self::from_valid_digits(*system, Digits::from_slice(digits)))
    }

    /// Replace the whole sequence by decoding `number`.
    pub fn set_number(&mut self, number: u128) {
        *self = Self::from_number(&self.system, number);
    }

    /// Replace the whole sequence. On error the structure is unchanged.
    pub fn set_digits(&mut self, digits: &[u32]) -> Result<(), StructureError> {
        *self = Self::from_digits(&self.system, digits)?;
        Ok(())
    }

    /// Replace the whole sequence by leniently parsing `code`.
    pub fn set_code(&mut self, code: &str) {
        *self = Self::from_code(&self.system, code);
    }

    fn from_valid_digits(system: System, digits: Digits) -> Self {
        let number = system.encode(&digits);
        let level = digits.iter().filter(|&&d| d != 0).count();
        let g_level = digits.iter().map(|&d| u64::from(d)).sum();
        let diffs = circular_diffs(&digits);
        let variability = variability(&digits, g_level);
        let code = render_packed(&digits);
        FiguralStructure {
            system,
            number,
            digits,
            level,
            g_level,
            diffs,
            variability,
            code,
        }
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn order(&self) -> usize {
        self.digits.len()
    }

    pub fn number(&self) -> u128 {
        self.number
    }

    pub fn digits(&self) -> &[u32] {
        &self.digits
    }

    /// Count of nonzero digits (the weight).
    pub fn level(&self) -> usize {
        self.level
    }

    /// Sum of digit magnitudes.
    pub fn g_level(&self) -> u64 {
        self.g_level
    }

    /// Circular first difference: `digit[i+1] - digit[i]`, the last entry
    /// wrapping to `digit[0] - digit[order-1]`.
    pub fn diffs(&self) -> &[i64] {
        &self.diffs
    }

    /// `100 * sqrt(sum((digit - mean)^2)) / order` with
    /// `mean = max(1, g_level / order)`.
    pub fn variability(&self) -> f64 {
        self.variability
    }

    /// Packed structural code, e.g. `"3*1,0"`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Unpacked structural code, e.g. `"1,1,1,0"`.
    pub fn flat_code(&self) -> String {
        render(&self.digits)
    }

    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    pub fn is_on(&self, position: usize) -> bool {
        self.digits.get(position).is_some_and(|&d| d != 0)
    }

    pub fn is_one(&self, position: usize) -> bool {
        self.digits.get(position) == Some(&TONE_START)
    }

    pub fn is_tone_start(&self, position: usize) -> bool {
        self.is_one(position)
    }

    pub fn is_pause_start(&self, position: usize) -> bool {
        self.digits.get(position) == Some(&PAUSE_START)
    }

    /// Positions of the active (nonzero) digits, ascending.
    pub fn onsets(&self) -> Vec<usize> {
        self.digits
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d != 0)
            .map(|(position, _)| position)
            .collect()
    }

    /// Distances between consecutive onsets, read circularly. The final entry
    /// wraps from the last onset back around to the first, so the entries
    /// always sum to `order`. Empty when nothing is active.
    pub fn distance_schema(&self) -> Vec<usize> {
        distance_schema(&self.onsets(), self.order())
    }

    /// Percentage of positions (over the shorter of the two structures)
    /// where both carry the same nonzero digit.
    pub fn similarity(&self, other: &FiguralStructure) -> f64 {
        let span = self.order().min(other.order());
        if span == 0 {
            return 0.0;
        }
        let matches = self
            .digits
            .iter()
            .zip(other.digits.iter())
            .filter(|&(&a, &b)| a != 0 && a == b)
            .count();
        100.0 * matches as f64 / span as f64
    }

    /// The structure rotated by `steps` positions.
    pub fn transposed(&self, steps: usize) -> Self {
        Self::from_number(&self.system, self.system.transpose_by(self.number, steps))
    }

    /// Every distinct rotation, starting with this structure.
    pub fn rotations(&self) -> Vec<FiguralStructure> {
        self.system
            .orbit(self.number)
            .into_iter()
            .map(|number| Self::from_number(&self.system, number))
            .collect()
    }

    /// Number of the canonical (smallest) rotation.
    pub fn class_number(&self) -> u128 {
        self.system.class_number(self.number)
    }

    pub fn is_class_representative(&self) -> bool {
        self.class_number() == self.number
    }

    /// Number of distinct rotations.
    pub fn period(&self) -> usize {
        self.system.period(self.number)
    }

    /// Compare by raw number, then degree. This is not the `Ord` order.
    pub fn cmp_by_number(&self, other: &FiguralStructure) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.system.degree().cmp(&other.system.degree()))
    }
}

fn check_digits(system: &System, digits: &[u32]) -> Result<(), StructureError> {
    if digits.len() != system.order() {
        return Err(StructureError::LengthMismatch {
            expected: system.order(),
            found: digits.len(),
        });
    }
    if let Some((position, &digit)) = digits
        .iter()
        .enumerate()
        .find(|&(_, &d)| d >= system.degree())
    {
        return Err(StructureError::DigitOutOfRange {
            position,
            digit,
            degree: system.degree(),
        });
    }
    Ok(())
}

fn circular_diffs(digits: &[u32]) -> Vec<i64> {
    let n = digits.len();
    (0..n)
        .map(|i| i64::from(digits[(i + 1) % n]) - i64::from(digits[i]))
        .collect()
}

fn variability(digits: &[u32], g_level: u64) -> f64 {
    if digits.is_empty() {
        return 0.0;
    }
    let order = digits.len() as f64;
    let mean = (g_level as f64 / order).max(1.0);
    let squares: f64 = digits
        .iter()
        .map(|&d| {
            let deviation = f64::from(d) - mean;
            deviation * deviation
        })
        .sum();
    100.0 * squares.sqrt() / order
}

/// Circular inter-onset distances for ascending `onsets` within `order`.
pub fn distance_schema(onsets: &[usize], order: usize) -> Vec<usize> {
    let (Some(&first), Some(&last)) = (onsets.first(), onsets.last()) else {
        return Vec::new();
    };
    let mut schema: Vec<usize> = onsets.windows(2).map(|w| w[1] - w[0]).collect();
    schema.push(order - last + first);
    schema
}

impl PartialEq for FiguralStructure {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FiguralStructure {}

impl PartialOrd for FiguralStructure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FiguralStructure {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level
            .cmp(&other.level)
            .then_with(|| self.digits.as_slice().cmp(other.digits.as_slice()))
            .then_with(|| self.system.degree().cmp(&other.system.degree()))
    }
}

impl Hash for FiguralStructure {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.level.hash(state);
        self.digits.as_slice().hash(state);
        self.system.degree().hash(state);
    }
}

impl fmt::Display for FiguralStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
