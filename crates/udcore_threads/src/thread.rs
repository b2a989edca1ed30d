//! Cached, recyclable OS threads, grounded on `original_source/Source/udThread.cpp`'s
//! `udThread_Create`/bootstrap/16-slot thread cache.
//!
//! The source guards its cache array with a per-slot atomic CAS on a raw pointer. This
//! workspace denies `unsafe_code`, so each slot is instead a `parking_lot::Mutex<Option<Arc<..>>>`
//! — locking one slot to test-and-set it is the safe equivalent of a single-word CAS, and
//! contention is negligible since claims only happen at thread start/park, never in a hot loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use udcore_result::{UdError, UdResult, UdResultCode};

use crate::Semaphore;

/// Number of idle threads kept warm in the global cache, matching the source's fixed 16 slots.
const CACHE_SIZE: usize = 16;

/// How long a cached thread waits for a new job before giving up and exiting for good.
const CACHE_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

type BoxedJob = Box<dyn FnOnce() -> i32 + Send + 'static>;

struct ThreadSlot {
    /// Wakes a parked (cached) thread when a new job is installed, or on shutdown.
    wake: Semaphore,
    /// The next job to run, installed by `create` before releasing `wake`.
    pending: Mutex<Option<BoxedJob>>,
    /// Released once per completed job, so `ThreadHandle::join` can wait on a specific job
    /// rather than the underlying OS thread's entire (possibly recycled) lifetime.
    job_done: Semaphore,
    /// Return code of the most recently completed job.
    result: Mutex<Option<i32>>,
    shutdown: AtomicBool,
}

impl ThreadSlot {
    fn new() -> Self {
        Self {
            wake: Semaphore::new(0),
            pending: Mutex::new(None),
            job_done: Semaphore::new(0),
            result: Mutex::new(None),
            shutdown: AtomicBool::new(false),
        }
    }
}

static CACHE: Lazy<[Mutex<Option<Arc<ThreadSlot>>>; CACHE_SIZE]> =
    Lazy::new(|| std::array::from_fn(|_| Mutex::new(None)));

fn try_reclaim() -> Option<Arc<ThreadSlot>> {
    for slot_lock in CACHE.iter() {
        let mut guard = slot_lock.lock();
        if guard.is_some() {
            return guard.take();
        }
    }
    None
}

/// Try to park `slot` into an empty cache entry. Returns the claimed index on success.
fn claim_cache_slot(slot: &Arc<ThreadSlot>) -> Option<usize> {
    for (idx, slot_lock) in CACHE.iter().enumerate() {
        let mut guard = slot_lock.lock();
        if guard.is_none() {
            *guard = Some(Arc::clone(slot));
            return Some(idx);
        }
    }
    None
}

/// Remove `slot` from cache index `idx`, but only if it's still the same slot (another call to
/// `create` may have reclaimed and replaced it in the meantime).
fn release_cache_slot_if_mine(idx: usize, slot: &Arc<ThreadSlot>) {
    let mut guard = CACHE[idx].lock();
    if let Some(cached) = guard.as_ref() {
        if Arc::ptr_eq(cached, slot) {
            *guard = None;
        }
    }
}

fn bootstrap(slot: Arc<ThreadSlot>, mut job: BoxedJob) {
    loop {
        let code = job();
        *slot.result.lock() = Some(code);
        slot.job_done.release();

        // More than one live reference means the caller retained the `ThreadHandle`; in that
        // case we do not recycle the OS thread into the cache, mirroring the source's check of
        // the thread object's reference count after the user function returns.
        if Arc::strong_count(&slot) > 1 {
            break;
        }

        let Some(idx) = claim_cache_slot(&slot) else {
            break;
        };

        if slot.wake.wait(CACHE_IDLE_TIMEOUT) {
            if slot.shutdown.load(Ordering::Acquire) {
                break;
            }
            if let Some(next) = slot.pending.lock().take() {
                job = next;
                continue;
            }
            // Spurious wake with no job installed: go back to sleep isn't possible since the
            // semaphore count was already consumed; treat as idle-exit.
            break;
        } else {
            release_cache_slot_if_mine(idx, &slot);
            break;
        }
    }
    udcore_log::debug!("thread bootstrap exiting (recycled={})", Arc::strong_count(&slot) == 1);
}

/// A handle to a created thread. Dropping it without calling [`ThreadHandle::join_os_thread`]
/// detaches it (spec: "if the caller did not retain, the thread object is recycled").
pub struct ThreadHandle {
    slot: Arc<ThreadSlot>,
    os_join: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl ThreadHandle {
    /// Block until the job currently assigned to this handle completes, or `timeout` elapses.
    pub fn join(&self, timeout: Duration) -> bool {
        self.slot.job_done.wait(timeout)
    }

    /// The return code of the most recently completed job run by this thread, if any.
    #[must_use]
    pub fn last_result(&self) -> Option<i32> {
        *self.slot.result.lock()
    }

    /// Block until the underlying OS thread itself exits (after idling out of the cache or
    /// being told to shut down), consuming the handle.
    pub fn join_os_thread(self) {
        if let Some(join) = self.os_join.lock().take() {
            let _ = join.join();
        }
    }
}

/// Factory for cached, recyclable threads (component C3).
pub struct Thread;

impl Thread {
    /// Spawn (or reclaim from cache) a thread that runs `start` once, returning its exit code.
    pub fn create(
        start: impl FnOnce() -> i32 + Send + 'static,
        name: Option<&str>,
    ) -> UdResult<ThreadHandle> {
        let job: BoxedJob = Box::new(start);

        if let Some(slot) = try_reclaim() {
            *slot.pending.lock() = Some(job);
            slot.wake.release();
            return Ok(ThreadHandle {
                slot,
                os_join: Mutex::new(None),
            });
        }

        let slot = Arc::new(ThreadSlot::new());
        let slot_for_thread = Arc::clone(&slot);
        let mut builder = std::thread::Builder::new();
        if let Some(n) = name {
            builder = builder.name(n.to_owned());
        }
        let os_join = builder
            .spawn(move || bootstrap(slot_for_thread, job))
            .map_err(|e| UdError::new(UdResultCode::Failure, file!(), line!()).with_source(e))?;

        Ok(ThreadHandle {
            slot,
            os_join: Mutex::new(Some(os_join)),
        })
    }

    /// Signal every cached thread to exit and empty the cache. Blocking threads mid-job are
    /// unaffected; only idle, parked threads receive the shutdown signal.
    pub fn destroy_cached() {
        loop {
            let mut any = false;
            for slot_lock in CACHE.iter() {
                let mut guard = slot_lock.lock();
                if let Some(slot) = guard.take() {
                    any = true;
                    slot.shutdown.store(true, Ordering::Release);
                    slot.wake.release();
                }
            }
            if !any {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn create_runs_start_function() {
        let handle = Thread::create(|| 42, Some("test-thread")).unwrap();
        assert!(handle.join(Duration::from_secs(2)));
        assert_eq!(handle.last_result(), Some(42));
        handle.join_os_thread();
    }

    #[test]
    fn dropped_handle_allows_recycling() {
        let counter = Arc::new(AtomicI32::new(0));
        for _ in 0..4 {
            let c = Arc::clone(&counter);
            let handle = Thread::create(
                move || {
                    c.fetch_add(1, Ordering::SeqCst);
                    0
                },
                None,
            )
            .unwrap();
            assert!(handle.join(Duration::from_secs(2)));
            // Drop `handle` here without retaining it, so the thread becomes cache-eligible.
        }
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn destroy_cached_empties_cache() {
        let handle = Thread::create(|| 0, None).unwrap();
        assert!(handle.join(Duration::from_secs(2)));
        drop(handle);
        // Give the bootstrap loop a moment to park itself into the cache.
        std::thread::sleep(Duration::from_millis(50));
        Thread::destroy_cached();
        for slot_lock in CACHE.iter() {
            assert!(slot_lock.lock().is_none());
        }
    }
}
