use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Observes every position the engine visits, changed or not, before its
/// children are examined.
///
/// Observers are for progress reporting only and cannot influence the
/// outcome of a run.
pub trait ProgressObserver<T> {
    fn on_visit(&self, ancestor: Option<&T>, left: Option<&T>, right: Option<&T>);
}

impl<T, F> ProgressObserver<T> for F
where
    F: Fn(Option<&T>, Option<&T>, Option<&T>),
{
    fn on_visit(&self, ancestor: Option<&T>, left: Option<&T>, right: Option<&T>) {
        self(ancestor, left, right)
    }
}

/// The default observer: does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl<T> ProgressObserver<T> for NoProgress {
    fn on_visit(&self, _: Option<&T>, _: Option<&T>, _: Option<&T>) {}
}

/// Counts visited positions.
///
/// Clones share the count, so keep one clone and hand the other to the
/// engine.
#[derive(Clone, Debug, Default)]
pub struct VisitCounter {
    visited: Arc<AtomicUsize>,
}

impl VisitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.visited.load(Ordering::Relaxed)
    }
}

impl<T> ProgressObserver<T> for VisitCounter {
    fn on_visit(&self, _: Option<&T>, _: Option<&T>, _: Option<&T>) {
        self.visited.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_counts_visits() {
        let counter = VisitCounter::new();
        for _ in 0..3 {
            ProgressObserver::<u8>::on_visit(&counter, None, Some(&1), None);
        }
        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn counter_clones_share_the_count() {
        let counter = VisitCounter::new();
        let handle = counter.clone();
        ProgressObserver::<u8>::on_visit(&counter, None, None, Some(&2));
        assert_eq!(handle.count(), 1);
    }

    #[test]
    fn closures_observe() {
        let seen = std::cell::Cell::new(0);
        let observer = |_: Option<&u8>, left: Option<&u8>, _: Option<&u8>| {
            seen.set(seen.get() + left.copied().unwrap_or(0));
        };
        observer.on_visit(None, Some(&5), None);
        assert_eq!(seen.get(), 5);
    }
}
