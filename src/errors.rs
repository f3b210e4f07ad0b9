//! Error types.

/// Alias for [`core::result::Result`] with this crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error kinds produced by the padding codecs.
///
/// There is no explicit "success" variant: success is `Ok(())` or `Ok(len)`.
#[derive(Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Malformed padding, unrecognized flag bits, a violated length
    /// precondition, a required input that was absent, or a structural
    /// parse failure while removing/verifying a padded block.
    InvalidArgument,

    /// The caller's output buffer was present but too small to hold the
    /// recovered plaintext. `needed` is the exact length that would have
    /// been required.
    BufferTooSmall {
        /// Number of bytes the caller's buffer would need to hold the result.
        needed: usize,
    },

    /// A PKCS#1 v1.5 signature byte-compare failed.
    SignatureVerificationFailure,

    /// The random source failed; the wrapped error is whatever the caller's
    /// `rand_core` implementation returned.
    Random(rand_core::Error),
}

impl From<rand_core::Error> for Error {
    fn from(err: rand_core::Error) -> Self {
        Error::Random(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid argument or malformed encoded block"),
            Error::BufferTooSmall { needed } => {
                write!(f, "output buffer too small, need {needed} bytes")
            }
            Error::SignatureVerificationFailure => write!(f, "signature verification failed"),
            Error::Random(err) => write!(f, "random source failed: {err}"),
        }
    }
}
