use std::sync::Arc;
use std::sync::atomic::{AtomicPtr, Ordering};

/// Lock-free cell holding the current state snapshot. Readers `load` an
/// `Arc` without blocking; the single writer publishes a whole new snapshot
/// with `store`. A reader observes either the entire old snapshot or the
/// entire new one, never a mix.
pub struct SwapArc<T> {
    ptr: AtomicPtr<T>,
}

impl<T> SwapArc<T> {
    pub fn new(initial: Arc<T>) -> Self {
        Self {
            ptr: AtomicPtr::new(Arc::into_raw(initial) as *mut T),
        }
    }

    pub fn from_value(value: T) -> Self { Self::new(Arc::new(value)) }

    #[inline]
    pub fn load(&self) -> Arc<T> {
        let raw = self.ptr.load(Ordering::Acquire);
        debug_assert!(!raw.is_null());
        // The cell owns one strong count for the stored pointer; hand the
        // caller its own.
        unsafe {
            Arc::increment_strong_count(raw);
            Arc::from_raw(raw)
        }
    }

    #[inline]
    pub fn store(&self, next: Arc<T>) {
        let raw = Arc::into_raw(next) as *mut T;
        let prev = self.ptr.swap(raw, Ordering::AcqRel);
        unsafe {
            drop(Arc::from_raw(prev));
        }
    }

    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let snapshot = self.load();
        f(&snapshot)
    }
}

impl<T> Drop for SwapArc<T> {
    fn drop(&mut self) {
        let raw = self.ptr.load(Ordering::Relaxed);
        if !raw.is_null() {
            unsafe {
                drop(Arc::from_raw(raw));
            }
        }
    }
}

unsafe impl<T: Send + Sync> Send for SwapArc<T> {}
unsafe impl<T: Send + Sync> Sync for SwapArc<T> {}
