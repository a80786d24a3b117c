//! Error types for the binding.

use gurobind_sys::GRB_ERROR_NULL_ARGUMENT;
use std::num::NonZeroI32;
use thiserror::Error;

/// A non-zero status returned by a native entry point.
///
/// The code is passed through unmodified; its meaning is defined by the
/// native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("native call failed with status {code}")]
pub struct NativeError {
    code: NonZeroI32,
}

impl NativeError {
    /// Reported when the library hands back a null handle with a success status.
    pub(crate) const NULL_HANDLE: NativeError =
        match NonZeroI32::new(GRB_ERROR_NULL_ARGUMENT) {
            Some(code) => NativeError { code },
            None => panic!("null-argument status is zero"),
        };

    /// Wrap a status code. Returns `None` for 0, which is success.
    pub fn new(status: i32) -> Option<Self> {
        NonZeroI32::new(status).map(|code| Self { code })
    }

    /// The raw status code.
    pub fn code(self) -> i32 {
        self.code.get()
    }
}

/// Error type for every fallible operation in the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument was rejected before any native call was made.
    #[error("[{}] invalid argument `{param}`: {reason}", self.code())]
    InvalidArgument {
        /// Which argument, in `operation:argument` form where it helps.
        param: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The native library reported a failure.
    #[error("[{}] {}", self.code(), .0)]
    Native(#[from] NativeError),
}

impl Error {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument { .. } => "ARGUMENT_INVALID",
            Error::Native(_) => "NATIVE_STATUS",
        }
    }

    pub(crate) fn invalid(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// The argument name for pre-flight rejections.
    pub fn param(&self) -> Option<&str> {
        match self {
            Error::InvalidArgument { param, .. } => Some(param),
            Error::Native(_) => None,
        }
    }

    /// The native status code, if the failure came from the library.
    pub fn native_code(&self) -> Option<i32> {
        match self {
            Error::Native(err) => Some(err.code()),
            Error::InvalidArgument { .. } => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
