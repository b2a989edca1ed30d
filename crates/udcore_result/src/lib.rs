//! The closed outcome taxonomy shared by every udcore component (component C1).
//!
//! There are no exceptions and no panics for expected failure conditions anywhere in this
//! workspace: every fallible operation returns [`UdResult<T>`]. The single exception is a
//! contract violation (out-of-bounds indexed access, reuse of a destroyed handle), which remains
//! a panic because it indicates a programming error rather than an expected runtime outcome.

mod code;
mod error;

pub use code::UdResultCode;
pub use error::{last_error, ErrorLocation, UdError};

/// The result type used throughout udcore: `Result<T, UdError>`.
pub type UdResult<T> = Result<T, UdError>;

/// Construct an [`UdError`] from a [`UdResultCode`], capturing the call site.
///
/// Mirrors the source's `UD_ERROR_SET`, which stashes `(__FILE__, __LINE__)` into a pair of
/// globals before `goto epilogue`; here the equivalent is `return Err(ud_bail!(...))`.
#[macro_export]
macro_rules! ud_bail {
    ($code:expr) => {
        return ::std::result::Result::Err($crate::UdError::new($code, file!(), line!()))
    };
    ($code:expr, $source:expr) => {
        return ::std::result::Result::Err(
            $crate::UdError::new($code, file!(), line!()).with_source($source),
        )
    };
}

/// Return early with a given code if `$cond` holds. Mirrors the source's `UD_ERROR_IF`.
#[macro_export]
macro_rules! ud_error_if {
    ($cond:expr, $code:expr) => {
        if $cond {
            $crate::ud_bail!($code);
        }
    };
}

/// Return early with a given code if `$opt` is `None`. Mirrors the source's `UD_ERROR_NULL`.
#[macro_export]
macro_rules! ud_error_null {
    ($opt:expr, $code:expr) => {
        match $opt {
            ::std::option::Option::Some(v) => v,
            ::std::option::Option::None => $crate::ud_bail!($code),
        }
    };
}

/// Format an error, including its chain of sources, the way `re_error::format` does for the
/// ambient `anyhow`-style errors used elsewhere in this workspace.
pub fn format(error: &UdError) -> String {
    let mut string = error.to_string();
    if let Some(source) = &error.source {
        string.push_str(" -> ");
        string.push_str(&source.to_string());
        for source in std::iter::successors(source.source(), |e| e.source()) {
            string.push_str(" -> ");
            string.push_str(&source.to_string());
        }
    }
    string
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails() -> UdResult<()> {
        ud_bail!(UdResultCode::NotFound);
    }

    #[test]
    fn bail_captures_location() {
        let err = fails().unwrap_err();
        assert_eq!(err.code, UdResultCode::NotFound);
        assert_eq!(err.location.file, "crates/udcore_result/src/lib.rs");
        assert!(last_error().is_some());
    }

    #[test]
    fn error_if_short_circuits() {
        fn check(x: i32) -> UdResult<i32> {
            ud_error_if!(x < 0, UdResultCode::InvalidParameter);
            Ok(x)
        }
        assert!(check(-1).is_err());
        assert_eq!(check(5).unwrap(), 5);
    }

    #[test]
    fn format_walks_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = UdError::new(UdResultCode::OpenFailure, file!(), line!()).with_source(io_err);
        assert!(format(&err).contains("no such file"));
    }
}
