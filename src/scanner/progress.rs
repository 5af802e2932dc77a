//! Completion tracking for the worker pool.

use indicatif::ProgressBar;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Receives a notification after every completed job.
///
/// `completed` is unique per call and increases by one per job, but calls
/// from different workers may arrive out of order.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize);
}

impl ProgressObserver for ProgressBar {
    fn on_progress(&self, completed: usize, _total: usize) {
        let completed = completed as u64;
        if completed > self.position() {
            self.set_position(completed);
        }
    }
}

/// Shared completed-job counter, incremented by every worker.
pub(crate) struct ProgressCounter {
    completed: AtomicUsize,
    total: usize,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl ProgressCounter {
    pub(crate) fn new(total: usize, observer: Option<Arc<dyn ProgressObserver>>) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            observer,
        }
    }

    /// Count one finished job and notify the observer.
    pub(crate) fn record(&self) -> usize {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(observer) = &self.observer {
            observer.on_progress(completed, self.total);
        }
        completed
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(usize, usize)>>);

    impl ProgressObserver for Recorder {
        fn on_progress(&self, completed: usize, total: usize) {
            self.0.lock().unwrap().push((completed, total));
        }
    }

    #[test]
    fn test_counter_notifies_observer() {
        let recorder = Arc::new(Recorder::default());
        let counter = ProgressCounter::new(3, Some(recorder.clone()));

        assert_eq!(counter.record(), 1);
        assert_eq!(counter.record(), 2);
        assert_eq!(counter.completed(), 2);
        assert_eq!(*recorder.0.lock().unwrap(), vec![(1, 3), (2, 3)]);
    }

    #[test]
    fn test_counter_without_observer() {
        let counter = ProgressCounter::new(1, None);
        assert_eq!(counter.record(), 1);
    }

    #[test]
    fn test_progress_bar_never_moves_backwards() {
        let bar = ProgressBar::hidden();
        bar.set_length(10);
        bar.on_progress(5, 10);
        bar.on_progress(4, 10);
        assert_eq!(bar.position(), 5);
    }
}
