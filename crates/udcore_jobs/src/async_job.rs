//! Async job (component C7): a single-shot completion handle, grounded on
//! `original_source/Include/udAsyncJob.h`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use udcore_result::UdResultCode;
use udcore_threads::Semaphore;

/// Created locked; the producer calls [`Self::set_result`] exactly once, which stores the
/// result and releases the semaphore. The consumer blocks in [`Self::get_result`] or
/// [`Self::get_result_timeout`] until that release. Single-use: a second `set_result` silently
/// overwrites the stored value (matching the source, which has no "already set" guard either).
pub struct AsyncJob {
    semaphore: Semaphore,
    result: Mutex<Option<UdResultCode>>,
    pending: AtomicBool,
}

impl AsyncJob {
    #[must_use]
    pub fn new() -> Self {
        Self {
            semaphore: Semaphore::new(0),
            result: Mutex::new(None),
            pending: AtomicBool::new(false),
        }
    }

    /// Store the result and release the waiting consumer.
    pub fn set_result(&self, result: UdResultCode) {
        *self.result.lock() = Some(result);
        self.pending.store(false, Ordering::Release);
        self.semaphore.release();
    }

    /// Block until [`Self::set_result`] is called, then return the result.
    pub fn get_result(&self) -> UdResultCode {
        self.semaphore.wait_forever();
        self.result.lock().expect("set_result always stores a value before releasing")
    }

    /// Block for up to `timeout`; returns `(true, Some(result))` if a result arrived in time,
    /// `(false, None)` on timeout.
    pub fn get_result_timeout(&self, timeout: Duration) -> (bool, Option<UdResultCode>) {
        let got = self.semaphore.wait(timeout);
        (got, if got { *self.result.lock() } else { None })
    }

    pub fn set_pending(&self) {
        self.pending.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for AsyncJob {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn s6_timeout_then_result_arrives() {
        // S6: spawn a thread running `sleep(50ms); setResult(Cancelled)`.
        let job = Arc::new(AsyncJob::new());

        // getResultTimeout(10) on a fresh job returns (false, _).
        let (got, _) = job.get_result_timeout(Duration::from_millis(10));
        assert!(!got);

        let job2 = Arc::clone(&job);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            job2.set_result(UdResultCode::Cancelled);
        });

        // getResultTimeout(1000) returns (true, Cancelled).
        let started = Instant::now();
        let (got, result) = job.get_result_timeout(Duration::from_secs(1));
        assert!(got);
        assert_eq!(result, Some(UdResultCode::Cancelled));
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn pending_flag_is_a_plain_probe() {
        let job = AsyncJob::new();
        assert!(!job.is_pending());
        job.set_pending();
        assert!(job.is_pending());
        job.set_result(UdResultCode::Success);
        assert!(!job.is_pending());
    }

    #[test]
    fn blocks_until_released_exactly_once() {
        let job = Arc::new(AsyncJob::new());
        let job2 = Arc::clone(&job);
        let handle = std::thread::spawn(move || job2.get_result());
        std::thread::sleep(Duration::from_millis(20));
        job.set_result(UdResultCode::NotFound);
        assert_eq!(handle.join().unwrap(), UdResultCode::NotFound);
    }
}
