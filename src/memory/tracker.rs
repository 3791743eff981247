use std::sync::atomic::{AtomicUsize, Ordering};

/// Approximate byte usage of the fast cache tier.
pub struct MemoryTracker {
    pub usage: AtomicUsize,
    pub limit: usize,
}

impl MemoryTracker {
    pub fn new(limit: usize) -> Self {
        MemoryTracker {
            usage: AtomicUsize::new(0),
            limit,
        }
    }

    /// Whether `size` more bytes stay within the limit.
    pub fn fits(&self, size: usize) -> bool {
        self.current_usage().saturating_add(size) <= self.limit
    }

    pub fn allocate(&self, size: usize) {
        self.usage.fetch_add(size, Ordering::SeqCst);
    }

    pub fn deallocate(&self, size: usize) {
        // Saturating: never wraps below zero.
        let _ = self
            .usage
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_sub(size))
            });
    }

    pub fn reset(&self) {
        self.usage.store(0, Ordering::SeqCst);
    }

    pub fn current_usage(&self) -> usize {
        self.usage.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_usage_against_limit() {
        let tracker = MemoryTracker::new(100);
        assert!(tracker.fits(100));

        tracker.allocate(60);
        assert!(tracker.fits(40));
        assert!(!tracker.fits(41));
        assert_eq!(tracker.current_usage(), 60);

        tracker.deallocate(80);
        assert_eq!(tracker.current_usage(), 0);
    }
}
