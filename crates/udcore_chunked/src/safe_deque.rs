//! Safe deque (component C6): a [`crate::ChunkedArray`] guarded by a single mutex, grounded on
//! `original_source/Include/udSafeDeque.h`. Non-blocking — `pop_front` on empty returns
//! [`UdResultCode::NotFound`] rather than parking the caller, unlike a channel.

use parking_lot::Mutex;

use udcore_result::{ud_error_if, UdResult, UdResultCode};

use crate::ChunkedArray;

pub struct SafeDeque<T> {
    inner: Mutex<ChunkedArray<T>>,
}

impl<T> SafeDeque<T> {
    pub fn new(chunk_element_count: usize) -> UdResult<Self> {
        Ok(Self {
            inner: Mutex::new(ChunkedArray::new(chunk_element_count)?),
        })
    }

    pub fn push_back(&self, value: T) -> UdResult<()> {
        self.inner.lock().push_back(value)
    }

    pub fn push_front(&self, value: T) -> UdResult<()> {
        self.inner.lock().push_front(value)
    }

    /// Pop the front element, or `NotFound` if the deque is currently empty.
    pub fn pop_front(&self) -> UdResult<T> {
        let mut guard = self.inner.lock();
        let value = guard.pop_front();
        ud_error_if!(value.is_none(), UdResultCode::NotFound);
        Ok(value.expect("checked above"))
    }

    /// Pop the back element (LIFO use), or `NotFound` if the deque is currently empty.
    pub fn pop_back(&self) -> UdResult<T> {
        let mut guard = self.inner.lock();
        let value = guard.pop_back();
        ud_error_if!(value.is_none(), UdResultCode::NotFound);
        Ok(value.expect("checked above"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<T: PartialEq> SafeDeque<T> {
    /// Whether any element equals `value`. A linear scan, appropriate for the small queues this
    /// type is intended for (spec §4.3).
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        let guard = self.inner.lock();
        guard.find_index(value) != guard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn empty_pop_front_returns_not_found() {
        let dq: SafeDeque<i32> = SafeDeque::new(4).unwrap();
        let err = dq.pop_front().unwrap_err();
        assert_eq!(err.code, UdResultCode::NotFound);
    }

    #[test]
    fn fifo_order_under_concurrent_push() {
        let dq = Arc::new(SafeDeque::new(8).unwrap());
        let mut handles = vec![];
        for t in 0..4 {
            let dq = Arc::clone(&dq);
            handles.push(std::thread::spawn(move || {
                for i in 0..25 {
                    dq.push_back(t * 100 + i).unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(dq.len(), 100);
        let mut popped = vec![];
        while let Ok(v) = dq.pop_front() {
            popped.push(v);
        }
        assert_eq!(popped.len(), 100);
    }

    #[test]
    fn contains_checks_membership() {
        let dq: SafeDeque<i32> = SafeDeque::new(4).unwrap();
        dq.push_back(1).unwrap();
        dq.push_back(2).unwrap();
        assert!(dq.contains(&2));
        assert!(!dq.contains(&3));
    }
}
