//! Worker pool (component C8): a fixed thread count pool with main-thread post-work draining,
//! grounded on `original_source/Source/udWorkerPool.cpp` / `Include/udWorkerPool.h`.
//!
//! The source's task carries `{fn, postFn?, userData?, freeUserData}` as a function pointer plus
//! an opaque `void *`. Rust closures already own their captured state, so `userData`/
//! `freeUserData` fold away: a task is just `Option<Box<dyn FnOnce() + Send>>` for the worker-side
//! function and another for the optional main-thread post function, and dropping an unexecuted
//! task frees its captured data automatically.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use udcore_chunked::SafeDeque;
use udcore_config::ThreadPoolConfig;
use udcore_result::{ud_bail, UdResult, UdResultCode};
use udcore_threads::Semaphore;

pub type BoxedFn = Box<dyn FnOnce() + Send + 'static>;

struct Task {
    work: Option<BoxedFn>,
    post: Option<BoxedFn>,
}

struct PoolInner {
    task_deque: SafeDeque<Task>,
    post_deque: SafeDeque<Task>,
    semaphore: Semaphore,
    active_threads: AtomicUsize,
    is_running: AtomicBool,
}

/// A fixed-size pool of worker threads draining a task queue, with a separate post-work queue
/// intended to be drained by whichever thread calls [`WorkerPool::do_post_work`] (typically the
/// main thread), for marshalling results back.
pub struct WorkerPool {
    inner: Arc<PoolInner>,
    workers: Vec<std::thread::JoinHandle<()>>,
    poll_timeout: Duration,
}

impl WorkerPool {
    pub fn create(config: ThreadPoolConfig, thread_name_prefix: &str) -> UdResult<Self> {
        let inner = Arc::new(PoolInner {
            task_deque: SafeDeque::new(64)?,
            post_deque: SafeDeque::new(64)?,
            semaphore: Semaphore::new(0),
            active_threads: AtomicUsize::new(0),
            is_running: AtomicBool::new(true),
        });

        let poll_timeout = Duration::from_millis(config.poll_timeout_ms);
        let mut workers = Vec::with_capacity(config.total_threads);
        for i in 0..config.total_threads {
            let inner = Arc::clone(&inner);
            let name = format!("{thread_name_prefix}-{i}");
            let handle = std::thread::Builder::new()
                .name(name)
                .spawn(move || worker_loop(inner, poll_timeout))
                .expect("spawning a worker-pool thread should not fail under normal conditions");
            workers.push(handle);
        }

        Ok(Self {
            inner,
            workers,
            poll_timeout,
        })
    }

    /// Enqueue a task. `work` runs on a worker thread; `post`, if set, then runs inline on
    /// whichever thread calls [`Self::do_post_work`]. A task lacking both is rejected with
    /// `InvalidParameter` (spec §9 Open Questions: the source silently accepts this, the rewrite
    /// does not).
    pub fn add_task(&self, work: Option<BoxedFn>, post: Option<BoxedFn>) -> UdResult<()> {
        if !self.inner.is_running.load(Ordering::Acquire) {
            ud_bail!(UdResultCode::NotAllowed);
        }
        match (work, post) {
            (None, None) => ud_bail!(UdResultCode::InvalidParameter),
            (None, Some(post)) => {
                self.inner.post_deque.push_back(Task { work: None, post: Some(post) })
            }
            (work, post) => {
                self.inner.task_deque.push_back(Task { work, post })?;
                self.inner.semaphore.release();
                Ok(())
            }
        }
    }

    /// Drain up to `process_limit` post-tasks (or all of them if `0`), running each `post`
    /// function inline. Returns `NothingToDo` if nothing was drained.
    pub fn do_post_work(&self, process_limit: usize) -> UdResult<()> {
        let mut processed = 0;
        loop {
            if process_limit != 0 && processed >= process_limit {
                break;
            }
            match self.inner.post_deque.pop_front() {
                Ok(task) => {
                    if let Some(post) = task.post {
                        post();
                    }
                    processed += 1;
                }
                Err(_) => break,
            }
        }
        if processed == 0 {
            ud_bail!(UdResultCode::NothingToDo);
        }
        Ok(())
    }

    /// `(active_threads, queued_tasks)`.
    #[must_use]
    pub fn has_active_workers(&self) -> (usize, usize) {
        (
            self.inner.active_threads.load(Ordering::Acquire),
            self.inner.task_deque.len(),
        )
    }

    /// Stop accepting new tasks, join every worker thread, and drop every remaining queued task
    /// (in both the work and post deques), freeing any captured data.
    pub fn destroy(mut self) {
        self.inner.is_running.store(false, Ordering::Release);
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        while self.inner.task_deque.pop_front().is_ok() {}
        while self.inner.post_deque.pop_front().is_ok() {}
    }
}

fn worker_loop(pool: Arc<PoolInner>, poll_timeout: Duration) {
    loop {
        let got_work = pool.semaphore.wait(poll_timeout);
        if !pool.is_running.load(Ordering::Acquire) {
            break;
        }
        if !got_work {
            continue;
        }

        pool.active_threads.fetch_add(1, Ordering::SeqCst);
        if let Ok(task) = pool.task_deque.pop_front() {
            if let Some(work) = task.work {
                work();
            }
            if let Some(post) = task.post {
                let _ = pool.post_deque.push_back(Task { work: None, post: Some(post) });
            }
        }
        pool.active_threads.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI64;

    #[test]
    fn s5_task_then_post_task_pipeline() {
        // S5: single worker, two tasks each incrementing an int by 1, with post-tasks
        // multiplying by -25, then doPostWork. value = (0+1+1) * -25 * -25 = 1250.
        let pool = WorkerPool::create(
            ThreadPoolConfig {
                total_threads: 1,
                poll_timeout_ms: 20,
            },
            "test-pool",
        )
        .unwrap();

        let value = Arc::new(AtomicI64::new(0));
        for _ in 0..2 {
            let value = Arc::clone(&value);
            let value_post = Arc::clone(&value);
            pool.add_task(
                Some(Box::new(move || {
                    value.fetch_add(1, Ordering::SeqCst);
                })),
                Some(Box::new(move || {
                    let v = value_post.load(Ordering::SeqCst);
                    value_post.store(v * -25, Ordering::SeqCst);
                })),
            )
            .unwrap();
        }

        // Wait for both worker tasks to complete before draining post-work.
        loop {
            let (active, queued) = pool.has_active_workers();
            if active == 0 && queued == 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        std::thread::sleep(Duration::from_millis(20));

        while pool.do_post_work(0).is_ok() {}

        assert_eq!(value.load(Ordering::SeqCst), 1250);
        pool.destroy();
    }

    #[test]
    fn rejects_task_with_neither_fn_nor_post() {
        let pool = WorkerPool::create(ThreadPoolConfig::default(), "test-pool").unwrap();
        let err = pool.add_task(None, None).unwrap_err();
        assert_eq!(err.code, UdResultCode::InvalidParameter);
        pool.destroy();
    }

    #[test]
    fn destroy_drops_unexecuted_userdata() {
        let dropped = Arc::new(AtomicBool::new(false));
        struct DropFlag(Arc<AtomicBool>);
        impl Drop for DropFlag {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let pool = WorkerPool::create(
            ThreadPoolConfig {
                total_threads: 0,
                poll_timeout_ms: 20,
            },
            "test-pool",
        )
        .unwrap();

        let flag = DropFlag(Arc::clone(&dropped));
        pool.add_task(Some(Box::new(move || drop(flag))), None).unwrap();
        pool.destroy();
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn do_post_work_reports_nothing_to_do_when_empty() {
        let pool = WorkerPool::create(ThreadPoolConfig::default(), "test-pool").unwrap();
        assert_eq!(
            pool.do_post_work(0).unwrap_err().code,
            UdResultCode::NothingToDo
        );
        pool.destroy();
    }
}
