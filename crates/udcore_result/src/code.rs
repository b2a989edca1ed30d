/// The closed enumeration of outcome kinds, grounded on `original_source/Include/udResult.h`.
///
/// Grouped loosely along the taxonomy in spec §7; the grouping is purely documentation, the
/// enum itself is flat (matching the source, which used a single `enum udResult`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum UdResultCode {
    #[error("success")]
    Success,
    #[error("failure")]
    Failure,
    #[error("nothing to do")]
    NothingToDo,
    #[error("internal error")]
    InternalError,
    #[error("not initialized")]
    NotInitialized,

    // Programmer error
    #[error("invalid configuration")]
    InvalidConfiguration,
    #[error("invalid parameter")]
    InvalidParameter,
    #[error("outstanding references")]
    OutstandingReferences,
    #[error("called more than once")]
    CalledMoreThanOnce,
    #[error("out of order")]
    OutOfOrder,

    // Resource exhaustion
    #[error("memory allocation failure")]
    MemoryAllocationFailure,
    #[error("count exceeded")]
    CountExceeded,
    #[error("buffer too small")]
    BufferTooSmall,
    #[error("rate limited")]
    RateLimited,
    #[error("exceeded allowed limit")]
    ExceededAllowedLimit,

    // Lookup / absence
    #[error("not found")]
    NotFound,
    #[error("object expired")]
    ObjectExpired,
    #[error("out of range")]
    OutOfRange,
    #[error("object type mismatch")]
    ObjectTypeMismatch,

    // I/O
    #[error("open failure")]
    OpenFailure,
    #[error("close failure")]
    CloseFailure,
    #[error("read failure")]
    ReadFailure,
    #[error("write failure")]
    WriteFailure,
    #[error("socket error")]
    SocketError,
    #[error("input exhausted")]
    InputExhausted,
    #[error("output exhausted")]
    OutputExhausted,
    #[error("alignment required")]
    AlignmentRequired,

    // Crypto
    #[error("decryption key required")]
    DecryptionKeyRequired,
    #[error("decryption key mismatch")]
    DecryptionKeyMismatch,
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("internal crypto error")]
    InternalCryptoError,

    // Parsing / format
    #[error("parse error")]
    ParseError,
    #[error("corrupt data")]
    CorruptData,
    #[error("format variation not supported")]
    FormatVariationNotSupported,
    #[error("unsupported")]
    Unsupported,
    #[error("compression error")]
    CompressionError,
    #[error("image load failure")]
    ImageLoadFailure,
    #[error("streamer not initialised")]
    StreamerNotInitialised,

    // Flow
    #[error("pending")]
    Pending,
    #[error("in progress")]
    InProgress,
    #[error("cancelled")]
    Cancelled,
    #[error("timeout")]
    Timeout,
    #[error("out of sync")]
    OutOfSync,

    // Service
    #[error("database error")]
    DatabaseError,
    #[error("server error")]
    ServerError,
    #[error("auth error")]
    AuthError,
    #[error("not allowed")]
    NotAllowed,
    #[error("invalid license")]
    InvalidLicense,
    #[error("session expired")]
    SessionExpired,
    #[error("proxy error")]
    ProxyError,
    #[error("proxy auth required")]
    ProxyAuthRequired,
    #[error("premium only")]
    PremiumOnly,
}

impl UdResultCode {
    /// Whether this code represents success. Only [`Self::Success`] does.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_success_is_success() {
        assert!(UdResultCode::Success.is_success());
        assert!(!UdResultCode::Failure.is_success());
        assert!(!UdResultCode::Pending.is_success());
    }

    #[test]
    fn display_is_lowercase_human_text() {
        assert_eq!(UdResultCode::NotFound.to_string(), "not found");
    }
}
