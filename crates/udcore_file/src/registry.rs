//! Handler registry (component C9), grounded on
//! `original_source/Include/udFileHandler.h`. `open` walks the table in order and calls the
//! first handler whose prefix matches; the `""` (OS) handler is always last, acting as a
//! catch-all fallback.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use udcore_result::{ud_bail, UdResult, UdResultCode};

use crate::handle::FileOpenFlags;
use crate::handlers::{os::OsHandler, raw::RawHandler};

/// Implemented by a file backend: the set of operations a concrete handle supports. Unsupported
/// operations keep the trait's default body, which reports `Unsupported`, mirroring the source
/// leaving the corresponding function pointer null.
pub trait FileBackend: Send {
    fn set_sub_filename(&mut self, _sub_filename: &str) -> UdResult<()> {
        ud_bail!(UdResultCode::Unsupported);
    }

    fn read(&mut self, buffer: &mut [u8], absolute_offset: i64) -> UdResult<usize>;

    fn write(&mut self, _buffer: &[u8], _absolute_offset: i64) -> UdResult<usize> {
        ud_bail!(UdResultCode::Unsupported);
    }

    fn length(&self) -> i64;

    fn release(&mut self) -> UdResult<()> {
        Ok(())
    }
}

/// A registered prefix handler, able to open a path matching its prefix into a [`FileBackend`].
pub trait FileHandler: Send + Sync {
    fn prefix(&self) -> &'static str;
    fn open(&self, path: &str, flags: FileOpenFlags) -> UdResult<Box<dyn FileBackend>>;
}

static HANDLERS: Lazy<RwLock<Vec<Arc<dyn FileHandler>>>> = Lazy::new(|| {
    RwLock::new(vec![
        Arc::new(RawHandler) as Arc<dyn FileHandler>,
        Arc::new(OsHandler) as Arc<dyn FileHandler>,
    ])
});

/// Register a custom handler. It is inserted immediately before the catch-all OS handler, so
/// the OS handler (prefix `""`) always remains the last-checked fallback.
pub fn register_handler(handler: Arc<dyn FileHandler>) -> UdResult<()> {
    let mut handlers = HANDLERS.write();
    let insert_at = handlers.len().saturating_sub(1);
    handlers.insert(insert_at, handler);
    Ok(())
}

/// Remove every registered handler with the given prefix (the OS handler's `""` prefix cannot
/// be deregistered).
pub fn deregister_handler(prefix: &str) -> UdResult<()> {
    if prefix.is_empty() {
        ud_bail!(UdResultCode::InvalidParameter);
    }
    HANDLERS.write().retain(|h| h.prefix() != prefix);
    Ok(())
}

pub(crate) fn open_backend(path: &str, flags: FileOpenFlags) -> UdResult<Box<dyn FileBackend>> {
    let handlers = HANDLERS.read();
    for handler in handlers.iter() {
        if handler.prefix().is_empty() || path.starts_with(handler.prefix()) {
            return handler.open(path, flags);
        }
    }
    ud_bail!(UdResultCode::OpenFailure);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_prefix_falls_through_to_os_handler() {
        // A path with no registered non-OS prefix match still reaches the OS handler, which
        // then fails with OpenFailure because the path does not exist.
        let err = open_backend("/definitely/not/a/real/path/xyz", FileOpenFlags::READ).unwrap_err();
        assert_eq!(err.code, UdResultCode::OpenFailure);
    }
}
