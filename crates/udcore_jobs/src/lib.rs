//! Async job and worker pool (components C7, C8).

mod async_job;
mod worker_pool;

pub use async_job::AsyncJob;
pub use worker_pool::{BoxedFn, WorkerPool};
