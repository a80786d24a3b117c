//! Owning handle for a native environment.

use crate::error::{NativeError, Result};
use crate::outcome::{check, preflight};
use crate::params;
use crate::strings::{copy_c_str, opt_ptr, path_c_string};
use gurobind_sys::{GRBenv, NativeApi};
use std::fmt;
use std::path::Path;
use std::ptr::{self, NonNull};
use tracing::{debug, warn};

/// Lifecycle state of an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvState {
    /// Created; parameters may be set but no model can be built yet.
    Empty,
    /// Started; models can be created.
    Started,
}

/// Library version reported by `GRBversion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub technical: i32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.technical)
    }
}

/// Exclusive owner of one native environment.
///
/// The environment is released exactly once, when this value is dropped.
/// Models borrow the environment they were built from, so it cannot be
/// dropped while any of them is alive.
pub struct Environment<A: NativeApi> {
    ptr: NonNull<GRBenv>,
    state: EnvState,
    api: A,
}

// The handle is used from one thread at a time; the library allows moving an
// environment between threads.
unsafe impl<A: NativeApi + Send> Send for Environment<A> {}

impl<A: NativeApi> Environment<A> {
    /// Create an empty environment (`GRBemptyenv`).
    ///
    /// Parameters can be set before calling [`Environment::start`].
    pub fn empty(api: A) -> Result<Self> {
        let mut raw: *mut GRBenv = ptr::null_mut();
        let status = unsafe { api.empty_env(&raw mut raw) };
        let ptr = Self::adopt(&api, raw, status, "empty_env")?;
        debug!(
            component = "env",
            operation = "empty_env",
            status = "success",
            "Created empty environment"
        );
        Ok(Self {
            ptr,
            state: EnvState::Empty,
            api,
        })
    }

    /// Create and start an environment in one call (`GRBloadenv`).
    pub fn new(api: A, logfile: Option<&Path>) -> Result<Self> {
        let c_logfile = preflight(
            "load_env",
            logfile
                .map(|path| path_c_string(path, "load_env:logfile"))
                .transpose(),
        )?;
        let mut raw: *mut GRBenv = ptr::null_mut();
        let status = unsafe { api.load_env(&raw mut raw, opt_ptr(&c_logfile)) };
        let ptr = Self::adopt(&api, raw, status, "load_env")?;
        debug!(
            component = "env",
            operation = "load_env",
            status = "success",
            logfile = logfile.map(|path| path.display().to_string()).unwrap_or_default(),
            "Created started environment"
        );
        Ok(Self {
            ptr,
            state: EnvState::Started,
            api,
        })
    }

    /// Take ownership of a freshly created handle.
    ///
    /// On failure the library may still hand back an environment holding the
    /// error text; it is logged and released here.
    fn adopt(
        api: &A,
        raw: *mut GRBenv,
        status: i32,
        operation: &'static str,
    ) -> Result<NonNull<GRBenv>> {
        if status != 0 {
            if !raw.is_null() {
                let message = unsafe { copy_c_str(api.get_error_msg(raw)) };
                warn!(
                    component = "env",
                    operation,
                    status = "error",
                    status_code = status,
                    message = message.as_str(),
                    "Environment creation failed"
                );
                unsafe { api.free_env(raw) };
            }
            check(status, operation)?;
        }
        NonNull::new(raw).ok_or(NativeError::NULL_HANDLE.into())
    }

    /// Start an empty environment (`GRBstartenv`).
    pub fn start(&mut self) -> Result<()> {
        check(unsafe { self.api.start_env(self.ptr.as_ptr()) }, "start_env")?;
        self.state = EnvState::Started;
        debug!(
            component = "env",
            operation = "start_env",
            status = "success",
            "Started environment"
        );
        Ok(())
    }

    pub fn state(&self) -> EnvState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.state == EnvState::Started
    }

    /// Text of the most recent error recorded on this environment.
    pub fn error_message(&self) -> String {
        unsafe { copy_c_str(self.api.get_error_msg(self.ptr.as_ptr())) }
    }

    /// Version of the library behind this environment.
    pub fn version(&self) -> Version {
        let (mut major, mut minor, mut technical) = (0, 0, 0);
        unsafe {
            self.api
                .version(&raw mut major, &raw mut minor, &raw mut technical)
        };
        Version {
            major,
            minor,
            technical,
        }
    }

    pub fn set_int_param(&self, name: &str, value: i32) -> Result<()> {
        params::set_int(&self.api, self.ptr.as_ptr(), name, value)
    }

    pub fn get_int_param(&self, name: &str) -> Result<i32> {
        params::get_int(&self.api, self.ptr.as_ptr(), name)
    }

    pub fn set_float_param(&self, name: &str, value: f64) -> Result<()> {
        params::set_float(&self.api, self.ptr.as_ptr(), name, value)
    }

    pub fn get_float_param(&self, name: &str) -> Result<f64> {
        params::get_float(&self.api, self.ptr.as_ptr(), name)
    }

    pub fn set_str_param(&self, name: &str, value: &str) -> Result<()> {
        params::set_str(&self.api, self.ptr.as_ptr(), name, value)
    }

    pub fn get_str_param(&self, name: &str) -> Result<String> {
        params::get_str(&self.api, self.ptr.as_ptr(), name)
    }

    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    pub(crate) fn as_ptr(&self) -> *mut GRBenv {
        self.ptr.as_ptr()
    }
}

impl<A: NativeApi> fmt::Debug for Environment<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("ptr", &self.ptr)
            .field("state", &self.state)
            .finish()
    }
}

impl<A: NativeApi> Drop for Environment<A> {
    fn drop(&mut self) {
        unsafe { self.api.free_env(self.ptr.as_ptr()) };
        debug!(
            component = "env",
            operation = "free_env",
            status = "success",
            "Released environment"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurobind_sys::{GRB_ERROR_NO_LICENSE, GRB_ERROR_UNKNOWN_PARAMETER};
    use gurobind_testkit::Stub;

    #[test]
    fn test_empty_then_start() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
        let stub = Stub::new();
        let mut env = Environment::empty(stub.clone()).unwrap();
        assert_eq!(env.state(), EnvState::Empty);
        env.start().unwrap();
        assert!(env.is_started());
        drop(env);
        assert_eq!(stub.calls(), vec!["GRBemptyenv", "GRBstartenv", "GRBfreeenv"]);
    }

    #[test]
    fn test_creation_failure_surfaces_code() {
        let stub = Stub::new();
        stub.fail_next(GRB_ERROR_NO_LICENSE);
        let err = Environment::new(stub.clone(), None).unwrap_err();
        assert_eq!(err.native_code(), Some(GRB_ERROR_NO_LICENSE));
        assert_eq!(stub.live_envs(), 0);
    }

    #[test]
    fn test_params_roundtrip() {
        let env = Environment::empty(Stub::new()).unwrap();
        env.set_int_param("Threads", 3).unwrap();
        assert_eq!(env.get_int_param("Threads"), Ok(3));
        env.set_float_param("TimeLimit", 12.5).unwrap();
        assert_eq!(env.get_float_param("TimeLimit"), Ok(12.5));
        env.set_str_param("LogFile", "solve.log").unwrap();
        assert_eq!(env.get_str_param("LogFile").as_deref(), Ok("solve.log"));
    }

    #[test]
    fn test_unknown_param_reports_message() {
        let env = Environment::empty(Stub::new()).unwrap();
        let err = env.get_int_param("NoSuchParam").unwrap_err();
        assert_eq!(err.native_code(), Some(GRB_ERROR_UNKNOWN_PARAMETER));
        assert!(env.error_message().contains("GRBgetintparam"));
    }

    #[test]
    fn test_version_and_logfile() {
        let env = Environment::new(Stub::new(), Some(Path::new("gurobi.log"))).unwrap();
        assert!(env.is_started());
        assert!(env.version().major >= 1);
        assert_eq!(env.get_str_param("LogFile").as_deref(), Ok("gurobi.log"));
    }

    #[test]
    fn test_environment_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Environment<Stub>>();
    }
}
