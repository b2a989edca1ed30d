use std::cell::RefCell;

/// A mutex a single thread may lock recursively, must release the same number of times it
/// locked (spec §4.4: "Mutex — recursive").
///
/// Built on `parking_lot::ReentrantMutex`, which only hands out a shared `&T` on each nested
/// lock (multiple live borrows on the same thread are otherwise unsound), so interior
/// mutability is provided via `RefCell`. A caller that keeps an outer `borrow_mut()` alive while
/// re-entering the lock and borrowing again will panic, same as any other `RefCell` misuse.
pub struct RecursiveMutex<T> {
    inner: parking_lot::ReentrantMutex<RefCell<T>>,
}

/// A held lock on a [`RecursiveMutex`]. Deref/`DerefMut` through to the protected value via the
/// inner `RefCell`.
pub struct RecursiveMutexGuard<'a, T> {
    guard: parking_lot::ReentrantMutexGuard<'a, RefCell<T>>,
}

impl<T> RecursiveMutex<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: parking_lot::ReentrantMutex::new(RefCell::new(value)),
        }
    }

    /// Acquire the lock, blocking if another thread currently holds it (same-thread reentry
    /// never blocks).
    pub fn lock(&self) -> RecursiveMutexGuard<'_, T> {
        RecursiveMutexGuard {
            guard: self.inner.lock(),
        }
    }
}

impl<T> RecursiveMutexGuard<'_, T> {
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.guard.borrow()
    }

    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.guard.borrow_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_thread_can_relock() {
        let m = RecursiveMutex::new(0_i32);
        let outer = m.lock();
        *outer.borrow_mut() += 1;
        {
            // Re-entering on the same thread must not deadlock.
            let inner = m.lock();
            *inner.borrow_mut() += 1;
        }
        assert_eq!(*outer.borrow(), 2);
    }

    #[test]
    fn other_threads_block_until_release() {
        use std::sync::Arc;
        let m = Arc::new(RecursiveMutex::new(0_i32));
        let guard = m.lock();
        *guard.borrow_mut() = 10;

        let m2 = Arc::clone(&m);
        let handle = std::thread::spawn(move || {
            let g = m2.lock();
            *g.borrow()
        });

        // Give the spawned thread a moment to attempt (and block on) the lock.
        std::thread::sleep(std::time::Duration::from_millis(20));
        drop(guard);
        assert_eq!(handle.join().unwrap(), 10);
    }
}
