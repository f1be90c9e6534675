// Substructures of a modality mask.
//
// Given a mask with `L` active positions, a substructure of level `lev`
// switches on `lev` of those positions, each with any nonzero digit. The
// search is a plain backtracking walk over the mask's onsets: at every onset
// either skip it, or activate it with each digit in `[1, degree)` in turn,
// recurse with one less to place, and restore the zero. When nothing is left
// to place the accumulated digits are encoded and offered to the collector.
//
// There are at most `C(L, lev) * (degree - 1)^lev` leaves per level and the
// recursion is never deeper than `L`. A branch that can no longer place its
// remaining budget is cut, and the whole walk unwinds the moment the
// collector reports the cap.

use figura_structure::{FiguralStructure, Figure};
use std::ops::ControlFlow;

use crate::collector::Collector;

/// Offer every substructure of `mask` at each requested level, lowest first.
pub(crate) fn substructures<T: Figure>(
    collector: &mut Collector<'_, T>,
    mask: &FiguralStructure,
    level: Option<usize>,
) -> ControlFlow<()> {
    let onsets = mask.onsets();
    let levels = match level {
        Some(level) => level..=level,
        None => 0..=onsets.len(),
    };
    let mut digits = vec![0; mask.order()];
    for budget in levels {
        place(collector, &onsets, 0, budget, &mut digits)?;
    }
    ControlFlow::Continue(())
}

fn place<T: Figure>(
    collector: &mut Collector<'_, T>,
    onsets: &[usize],
    start: usize,
    budget: usize,
    digits: &mut [u32],
) -> ControlFlow<()> {
    if budget == 0 {
        let number = collector.system().encode(digits);
        if number == 0 {
            return ControlFlow::Continue(());
        }
        return collector.offer_number(number);
    }
    if onsets.len() - start < budget {
        return ControlFlow::Continue(());
    }

    // Leave this onset off.
    place(collector, onsets, start + 1, budget, digits)?;

    let position = onsets[start];
    for value in 1..collector.system().degree() {
        digits[position] = value;
        let flow = place(collector, onsets, start + 1, budget - 1, digits);
        digits[position] = 0;
        flow?;
    }
    ControlFlow::Continue(())
}
