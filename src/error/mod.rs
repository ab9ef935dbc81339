// Error types for the audio facade
//
// Backend failures are typed and carry numeric codes, but they never cross the
// facade's public contract: AudioManager logs them and substitutes defaults.

mod backend;

pub use backend::{log_backend_error, BackendError, BackendErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, keeping log output consistent across backends.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
