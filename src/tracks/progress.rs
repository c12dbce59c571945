use log::info;
use thousands::Separable;

use super::Field;

/// Periodic reporting hook shared by all solvers. The sink is handed the
/// solver's current board and must not mutate it.
pub trait Progress {
    fn report_interval(&self) -> u64;
    fn report(&mut self, n_steps: u64, field: &Field);
}

/// A sink that never fires.
pub struct NullProgress;

impl Progress for NullProgress {
    fn report_interval(&self) -> u64 {
        u64::MAX
    }
    fn report(&mut self, _n_steps: u64, _field: &Field) {}
}

/// Logs the running iteration count every `interval` steps.
pub struct LogProgress {
    pub interval: u64,
}

impl Progress for LogProgress {
    fn report_interval(&self) -> u64 {
        self.interval
    }
    fn report(&mut self, n_steps: u64, _field: &Field) {
        info!("{} iterations", n_steps.separate_with_commas());
    }
}

/// Outcome of a solver run. On `solved`, the caller's `Field` holds the
/// completed board; otherwise it is back in its initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveDetail {
    pub solved: bool,
    pub n_steps: u64,
}

pub(super) fn tick(n_steps: &mut u64, progress: &mut dyn Progress, field: &Field) {
    *n_steps += 1;
    if *n_steps % progress.report_interval() == 0 {
        progress.report(*n_steps, field);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    struct CountingSink {
        reports: u64,
        last: u64,
    }
    impl Progress for CountingSink {
        fn report_interval(&self) -> u64 {
            2
        }
        fn report(&mut self, n_steps: u64, _field: &Field) {
            assert!(n_steps > self.last);
            self.last = n_steps;
            self.reports += 1;
        }
    }

    #[test]
    fn test_sink_fires_on_interval() {
        let field = field_from_text(STRAIGHT_3X3);
        let mut sink = CountingSink {
            reports: 0,
            last: 0,
        };
        let mut n_steps = 0u64;
        for _ in 0..10 {
            tick(&mut n_steps, &mut sink, &field);
        }
        assert_eq!(n_steps, 10);
        assert_eq!(sink.reports, 5);
        assert_eq!(sink.last, 10);
    }

    #[test]
    fn test_null_sink_never_fires() {
        let field = field_from_text(STRAIGHT_3X3);
        let mut n_steps = 0u64;
        for _ in 0..100 {
            tick(&mut n_steps, &mut NullProgress, &field);
        }
        assert_eq!(n_steps, 100);
    }
}
