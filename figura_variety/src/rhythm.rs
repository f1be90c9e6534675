// Rhythm-specific tests and constructions.
//
// A rhythmic class is a rotation class read as a cyclic onset pattern over
// `order` pulses. Two tests prune the class list down to patterns that work
// as rhythms:
//
// - Separability: the pattern must strike the midpoint pulse `order / 2`.
//   Above `separability_min_order` it must also strike at least one other
//   subdivision point (thirds, quarters or sixths of the cycle, whichever
//   divide the order evenly).
// - Simplicity: for dense patterns (level above `simplicity_min_level`) in
//   long cycles (order above `simplicity_min_order`), every inter-onset
//   distance before the final one must divide the final distance or be
//   coprime with it.
//
// Metric patterns need no search: one evenly spaced pulse train per divisor
// of the order.

use figura_structure::{System, TONE_START, distance_schema};

use crate::config::RhythmParams;

/// Subdivisions checked by the long-cycle separability rule.
const SUBDIVISIONS: [usize; 3] = [3, 4, 6];

pub fn is_separable(digits: &[u32], params: &RhythmParams) -> bool {
    let order = digits.len();
    if order == 0 {
        return false;
    }
    let midpoint = order / 2;
    if digits[midpoint] == 0 {
        return false;
    }
    if order <= params.separability_min_order {
        return true;
    }
    let points: Vec<usize> = SUBDIVISIONS
        .iter()
        .filter(|&&parts| order % parts == 0)
        .flat_map(|&parts| (1..parts).map(move |j| j * order / parts))
        .filter(|&point| point != midpoint)
        .collect();
    // Prime-like orders have no such points; the midpoint alone decides.
    points.is_empty() || points.iter().any(|&point| digits[point] != 0)
}

pub fn is_simple(digits: &[u32], params: &RhythmParams) -> bool {
    let onsets: Vec<usize> = digits
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d != 0)
        .map(|(position, _)| position)
        .collect();
    if onsets.len() <= params.simplicity_min_level || digits.len() <= params.simplicity_min_order {
        return true;
    }
    let schema = distance_schema(&onsets, digits.len());
    let Some((&last, earlier)) = schema.split_last() else {
        return true;
    };
    earlier
        .iter()
        .all(|&distance| last % distance == 0 || gcd(distance, last) == 1)
}

/// Numbers of the evenly spaced tone-onset patterns, one per divisor `d` of
/// the order (every `d`-th pulse on, starting at pulse 0), by ascending `d`.
/// Each is the smallest rotation of itself.
pub fn metric_patterns(system: &System) -> Vec<u128> {
    let order = system.order();
    if system.degree() <= TONE_START {
        return Vec::new();
    }
    (1..=order)
        .filter(|&step| order % step == 0)
        .map(|step| {
            let mut digits = vec![0; order];
            for position in (0..order).step_by(step) {
                digits[position] = TONE_START;
            }
            system.encode(&digits)
        })
        .collect()
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
