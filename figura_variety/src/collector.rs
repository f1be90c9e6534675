// Result accumulation shared by every strategy.
//
// A `Collector` owns the growing result list and enforces the two acceptance
// rules: a candidate must be valid and pass the qualifier. It re-checks the
// cap after every acceptance and answers `ControlFlow::Break` once the cap is
// hit, which strategies propagate with `?` to unwind immediately.

use figura_structure::{Figure, System};
use std::ops::ControlFlow;

pub(crate) struct Collector<'a, T> {
    system: System,
    cap: usize,
    qualifier: Option<&'a dyn Fn(&T) -> bool>,
    results: Vec<T>,
    capped: bool,
}

impl<'a, T: Figure> Collector<'a, T> {
    pub(crate) fn new(system: System, cap: usize, qualifier: Option<&'a dyn Fn(&T) -> bool>) -> Self {
        Collector {
            system,
            cap,
            qualifier,
            results: Vec::new(),
            capped: cap == 0,
        }
    }

    pub(crate) fn system(&self) -> &System {
        &self.system
    }

    /// Build the figure for `number` and offer it.
    pub(crate) fn offer_number(&mut self, number: u128) -> ControlFlow<()> {
        if self.capped {
            return ControlFlow::Break(());
        }
        let figure = T::from_number(&self.system, number);
        self.offer(figure)
    }

    pub(crate) fn offer(&mut self, figure: T) -> ControlFlow<()> {
        if self.capped {
            return ControlFlow::Break(());
        }
        if !figure.is_valid() || !self.qualifier.is_none_or(|accept| accept(&figure)) {
            return ControlFlow::Continue(());
        }
        self.results.push(figure);
        if self.results.len() >= self.cap {
            self.capped = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    pub(crate) fn finish(self) -> (Vec<T>, bool) {
        (self.results, self.capped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figura_structure::FiguralStructure;

    #[test]
    fn rejects_invalid_and_unqualified_candidates() {
        let odd_only: &dyn Fn(&FiguralStructure) -> bool = &|s| s.number() % 2 == 1;
        let mut collector = Collector::new(System::new(2, 4), 10, Some(odd_only));
        assert!(collector.offer_number(0).is_continue());
        assert!(collector.offer_number(2).is_continue());
        assert!(collector.offer_number(3).is_continue());
        let (results, capped) = collector.finish();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].number(), 3);
        assert!(!capped);
    }

    #[test]
    fn breaks_once_the_cap_is_reached() {
        let mut collector: Collector<'_, FiguralStructure> = Collector::new(System::new(2, 4), 2, None);
        assert!(collector.offer_number(1).is_continue());
        assert!(collector.offer_number(2).is_break());
        assert!(collector.offer_number(3).is_break());
        let (results, capped) = collector.finish();
        assert_eq!(results.len(), 2);
        assert!(capped);
    }

    #[test]
    fn zero_cap_accepts_nothing() {
        let mut collector: Collector<'_, FiguralStructure> = Collector::new(System::new(2, 4), 0, None);
        assert!(collector.offer_number(1).is_break());
        assert!(collector.finish().0.is_empty());
    }
}
