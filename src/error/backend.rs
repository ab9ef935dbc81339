// Backend error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Backend error code constants
///
/// Error code range: 3001-3005
pub struct BackendErrorCodes {}

impl BackendErrorCodes {
    /// A native entry point or host engine API is not bound
    pub const UNAVAILABLE: i32 = 3001;

    /// Backend reported a value that cannot be used (NaN, negative latency)
    pub const DEGENERATE_VALUE: i32 = 3002;

    /// Mutex/RwLock was poisoned
    pub const LOCK_POISONED: i32 = 3003;

    /// Settings file could not be read or written
    pub const SETTINGS_IO: i32 = 3004;

    /// Output device query failed
    pub const DEVICE_QUERY: i32 = 3005;
}

/// Log a backend error with structured context
///
/// Logs the numeric code, the component and the message. Used by the facade
/// right before it substitutes a safe default for the failed query.
pub fn log_backend_error(err: &BackendError, context: &str) {
    error!(
        "Backend error in {}: code={}, component=AudioBackend, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Backend-related errors
///
/// Covers missing native bindings, unusable reported values, poisoned locks
/// and settings persistence failures.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Entry point is missing from the binding table
    Unavailable { binding: String },

    /// Backend reported a value the facade cannot use
    DegenerateValue { what: String, value: f32 },

    /// Mutex/RwLock was poisoned
    LockPoisoned { component: String },

    /// Settings file read/write failed
    SettingsIo { details: String },

    /// Output device query failed
    DeviceQuery { details: String },
}

impl ErrorCode for BackendError {
    fn code(&self) -> i32 {
        match self {
            BackendError::Unavailable { .. } => BackendErrorCodes::UNAVAILABLE,
            BackendError::DegenerateValue { .. } => BackendErrorCodes::DEGENERATE_VALUE,
            BackendError::LockPoisoned { .. } => BackendErrorCodes::LOCK_POISONED,
            BackendError::SettingsIo { .. } => BackendErrorCodes::SETTINGS_IO,
            BackendError::DeviceQuery { .. } => BackendErrorCodes::DEVICE_QUERY,
        }
    }

    fn message(&self) -> String {
        match self {
            BackendError::Unavailable { binding } => {
                format!("Backend entry point not available: {}", binding)
            }
            BackendError::DegenerateValue { what, value } => {
                format!("Backend reported unusable {}: {}", what, value)
            }
            BackendError::LockPoisoned { component } => {
                format!("Lock poisoned for component: {}", component)
            }
            BackendError::SettingsIo { details } => {
                format!("Settings I/O failed: {}", details)
            }
            BackendError::DeviceQuery { details } => {
                format!("Output device query failed: {}", details)
            }
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BackendError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for BackendError {}

/// Convert from std::io::Error to BackendError
impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::SettingsIo {
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::SettingsIo {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_codes() {
        assert_eq!(
            BackendError::Unavailable {
                binding: "AudioManager_GetOutputLatency".to_string()
            }
            .code(),
            BackendErrorCodes::UNAVAILABLE
        );
        assert_eq!(
            BackendError::DegenerateValue {
                what: "latency".to_string(),
                value: f32::NAN
            }
            .code(),
            BackendErrorCodes::DEGENERATE_VALUE
        );
        assert_eq!(
            BackendError::LockPoisoned {
                component: "test".to_string()
            }
            .code(),
            BackendErrorCodes::LOCK_POISONED
        );
        assert_eq!(
            BackendError::SettingsIo {
                details: "test".to_string()
            }
            .code(),
            BackendErrorCodes::SETTINGS_IO
        );
        assert_eq!(
            BackendError::DeviceQuery {
                details: "test".to_string()
            }
            .code(),
            BackendErrorCodes::DEVICE_QUERY
        );
    }

    #[test]
    fn test_backend_error_messages() {
        let err = BackendError::Unavailable {
            binding: "AudioManager_EnableAudio".to_string(),
        };
        assert_eq!(
            err.message(),
            "Backend entry point not available: AudioManager_EnableAudio"
        );

        let err = BackendError::DegenerateValue {
            what: "output latency".to_string(),
            value: -1.0,
        };
        assert!(err.message().contains("output latency"));
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::LockPoisoned {
            component: "latency_snapshot".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("BackendError"));
        assert!(display.contains(&err.code().to_string()));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::other("disk full");
        let err: BackendError = io_err.into();
        match err {
            BackendError::SettingsIo { details } => assert!(details.contains("disk full")),
            _ => panic!("Expected SettingsIo"),
        }
    }
}
