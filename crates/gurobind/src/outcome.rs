//! Mapping native status codes to `Result`.

use crate::error::{Error, NativeError, Result};
use std::ffi::c_int;
use tracing::warn;

/// Turn a status returned by `operation` into a `Result`.
pub(crate) fn check(status: c_int, operation: &'static str) -> Result<()> {
    match NativeError::new(status) {
        None => Ok(()),
        Some(err) => {
            warn!(
                component = "native",
                operation,
                status = "error",
                status_code = status,
                "Native call failed"
            );
            Err(Error::Native(err))
        }
    }
}

/// Convert a host length to the C `int` the library takes.
pub(crate) fn to_c_int(value: usize, param: &str) -> Result<c_int> {
    c_int::try_from(value).map_err(|_| {
        Error::invalid(
            param,
            format!("{value} does not fit in a native int"),
        )
    })
}

/// Log a pre-flight rejection of `operation`'s arguments and pass it on.
pub(crate) fn preflight<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        warn!(
            component = "binding",
            operation,
            status = "rejected",
            param = err.param().unwrap_or_default(),
            reason = %err,
            "Argument rejected before native call"
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_zero_is_ok() {
        assert_eq!(check(0, "test"), Ok(()));
    }

    #[test]
    fn test_check_passes_code_through() {
        let err = check(10012, "read").unwrap_err();
        assert_eq!(err.native_code(), Some(10012));
        assert_eq!(err.code(), "NATIVE_STATUS");
    }

    #[test]
    fn test_to_c_int_overflow() {
        assert_eq!(to_c_int(5, "len"), Ok(5));
        let err = to_c_int(usize::MAX, "len").unwrap_err();
        assert_eq!(err.param(), Some("len"));
    }
}
