use std::cell::RefCell;
use std::fmt;

use crate::UdResultCode;

/// The file/line where an [`UdError`] was first raised, mirroring the source's
/// `g_udLastErrorFilename` / `g_udLastErrorLine` globals (made thread-local rather than
/// process-global, since `udcore` has no equivalent of the source's single-threaded test
/// harness assumption).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLocation {
    pub file: &'static str,
    pub line: u32,
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<(UdResultCode, ErrorLocation)>> = const { RefCell::new(None) };
}

/// The `(code, location)` of the most recent non-success result raised on this thread, for
/// diagnostics. Updated every time an [`UdError`] is constructed via [`UdError::new`].
#[must_use]
pub fn last_error() -> Option<(UdResultCode, ErrorLocation)> {
    LAST_ERROR.with(|slot| *slot.borrow())
}

/// A result code plus the call site where it was first raised, and an optional underlying
/// cause (e.g. an `std::io::Error` from a failed read).
pub struct UdError {
    pub code: UdResultCode,
    pub location: ErrorLocation,
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl UdError {
    /// Construct a new error, recording it into the thread-local last-error slot.
    ///
    /// Call via [`crate::ud_bail!`] rather than directly, so `file!()`/`line!()` resolve to the
    /// call site rather than here.
    #[must_use]
    pub fn new(code: UdResultCode, file: &'static str, line: u32) -> Self {
        let location = ErrorLocation { file, line };
        LAST_ERROR.with(|slot| *slot.borrow_mut() = Some((code, location)));
        Self {
            code,
            location,
            source: None,
        }
    }

    /// Attach an underlying cause, e.g. the `std::io::Error` behind a [`UdResultCode::ReadFailure`].
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for UdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.code, self.location)
    }
}

impl fmt::Debug for UdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UdError")
            .field("code", &self.code)
            .field("location", &self.location)
            .field("source", &self.source.as_ref().map(ToString::to_string))
            .finish()
    }
}

impl std::error::Error for UdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<UdResultCode> for UdError {
    /// Construct from a bare code with an unknown call site, for interop with code that only
    /// has a code to hand (e.g. converting a legacy `Option<UdResultCode>`).
    fn from(code: UdResultCode) -> Self {
        Self::new(code, "<unknown>", 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location() {
        let err = UdError::new(UdResultCode::Timeout, "foo.rs", 42);
        assert_eq!(err.to_string(), "timeout (at foo.rs:42)");
    }
}
