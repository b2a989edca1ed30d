//! Thread primitives (component C3): cached/recyclable OS threads, a recursive mutex, an R/W
//! lock, a counting semaphore and a condition variable. Grounded on
//! `original_source/Source/udThread.cpp` / `Include/udThread.h`.

mod mutex;
mod rwlock;
mod semaphore;
mod thread;

pub use mutex::RecursiveMutex;
pub use rwlock::RwLock;
pub use semaphore::Semaphore;
pub use thread::{Thread, ThreadHandle};

/// A condition variable associated with an external mutex, re-exported directly from
/// `parking_lot` (spec §4.4: "associated with an external mutex"); no behavioural wrapper is
/// needed since `parking_lot::Condvar::wait_for` already matches `udConditionVariable_Wait`'s
/// `(mutex, timeoutMs)` contract.
pub use parking_lot::Condvar;
