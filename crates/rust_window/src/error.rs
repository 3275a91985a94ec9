//! Error types shared by every window and context operation
//!
//! Failures surface two ways: operations that can fail return a
//! [`WindowResult`], and every reported failure is also routed to the
//! window's error callback as an ([`ErrorCode`], message) pair so applications
//! that only poll can still observe misuse.

use std::fmt;

/// Coarse error category delivered to error callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No error
    Ok,
    /// Unclassified failure
    Generic,
    /// The operation needs a live native window but there is none
    NullWindow,
    /// An argument was rejected
    BadArgs,
    /// Graphics context negotiation or activation failed
    Context,
    /// The windowing system could not be reached
    Connection,
}

impl ErrorCode {
    /// Fixed human readable description of the category
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "no error",
            Self::Generic => "generic error",
            Self::NullWindow => "null window",
            Self::BadArgs => "bad arguments",
            Self::Context => "graphics context error",
            Self::Connection => "display connection error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Window library errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The native window could not be created
    #[error("Could not create the window: {0}")]
    WindowCreation(String),

    /// Pixel format, context creation or function loading failed
    #[error("Graphics context error: {0}")]
    Context(String),

    /// The display server or window system could not be reached
    #[error("Could not establish connection with the display server: {0}")]
    Connection(String),

    /// The operation is not allowed in the window's current state
    #[error("Invalid window state: {0}")]
    InvalidState(String),

    /// `launch` was called on a window that is already live
    #[error("Launch has already been called earlier")]
    AlreadyLaunched,

    /// The operation needs a launched window
    #[error("Window has not been launched")]
    NotLaunched,

    /// The native window has been destroyed
    #[error("Window has been closed")]
    Closed,

    /// An argument was rejected
    #[error("Bad arguments: {0}")]
    BadArgs(String),
}

impl WindowError {
    /// Category reported to error callbacks for this error
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidState(_) | Self::AlreadyLaunched => ErrorCode::Generic,
            Self::Context(_) => ErrorCode::Context,
            Self::Connection(_) => ErrorCode::Connection,
            Self::WindowCreation(_) | Self::NotLaunched | Self::Closed => ErrorCode::NullWindow,
            Self::BadArgs(_) => ErrorCode::BadArgs,
        }
    }
}

/// Result alias used across the crate
pub type WindowResult<T> = Result<T, WindowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_follow_variant() {
        assert_eq!(WindowError::Context("x".into()).code(), ErrorCode::Context);
        assert_eq!(WindowError::Connection("x".into()).code(), ErrorCode::Connection);
        assert_eq!(WindowError::NotLaunched.code(), ErrorCode::NullWindow);
        assert_eq!(WindowError::Closed.code(), ErrorCode::NullWindow);
        assert_eq!(WindowError::BadArgs("x".into()).code(), ErrorCode::BadArgs);
        assert_eq!(WindowError::AlreadyLaunched.code(), ErrorCode::Generic);
        assert_eq!(WindowError::WindowCreation("x".into()).code(), ErrorCode::NullWindow);
        assert_eq!(WindowError::InvalidState("x".into()).code(), ErrorCode::Generic);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(ErrorCode::NullWindow.to_string(), "null window");
        assert_eq!(
            WindowError::AlreadyLaunched.to_string(),
            "Launch has already been called earlier"
        );
        assert!(WindowError::InvalidState("Cannot resize a fullscreen window".into())
            .to_string()
            .contains("fullscreen"));
    }
}
