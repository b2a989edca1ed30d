/// A readers-writer lock with no explicit fairness guarantee beyond the platform's (spec
/// §4.4). `parking_lot::RwLock` already matches this contract directly, so this is a plain
/// re-export rather than a wrapper.
pub type RwLock<T> = parking_lot::RwLock<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_readers_one_writer() {
        let lock = RwLock::new(5_i32);
        {
            let r1 = lock.read();
            let r2 = lock.read();
            assert_eq!(*r1 + *r2, 10);
        }
        *lock.write() = 7;
        assert_eq!(*lock.read(), 7);
    }
}
