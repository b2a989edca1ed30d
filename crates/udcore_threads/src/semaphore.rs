use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// A counting semaphore, implemented as the `(mutex, condvar, count)` tuple spec §4.4 allows as
/// an alternative to a native OS semaphore.
pub struct Semaphore {
    count: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    #[must_use]
    pub fn new(initial_count: usize) -> Self {
        Self {
            count: Mutex::new(initial_count),
            available: Condvar::new(),
        }
    }

    /// Increment the count by one and wake a single waiter, if any.
    pub fn release(&self) {
        self.release_n(1);
    }

    /// Increment the count by `n` and wake up to `n` waiters.
    pub fn release_n(&self, n: usize) {
        let mut count = self.count.lock();
        *count += n;
        for _ in 0..n {
            self.available.notify_one();
        }
    }

    /// Block until the count is nonzero, then decrement it. Returns `true` on success, `false`
    /// on timeout (matching the original's "returns zero on success" convention inverted for
    /// Rust's bool-is-success idiom).
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.count.lock();
        while *count == 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let result = self.available.wait_for(&mut count, deadline - now);
            if result.timed_out() && *count == 0 {
                return false;
            }
        }
        *count -= 1;
        true
    }

    /// Block indefinitely until the count is nonzero, then decrement it.
    pub fn wait_forever(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.available.wait(&mut count);
        }
        *count -= 1;
    }

    /// Non-blocking probe: decrement and return `true` if the count was already nonzero.
    pub fn try_wait(&self) -> bool {
        let mut count = self.count.lock();
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_times_out_when_never_released() {
        let sem = Semaphore::new(0);
        assert!(!sem.wait(Duration::from_millis(20)));
    }

    #[test]
    fn release_wakes_a_waiter() {
        use std::sync::Arc;
        let sem = Arc::new(Semaphore::new(0));
        let sem2 = Arc::clone(&sem);
        let handle = std::thread::spawn(move || sem2.wait(Duration::from_secs(2)));
        std::thread::sleep(Duration::from_millis(20));
        sem.release();
        assert!(handle.join().unwrap());
    }

    #[test]
    fn try_wait_is_non_blocking() {
        let sem = Semaphore::new(1);
        assert!(sem.try_wait());
        assert!(!sem.try_wait());
    }
}
