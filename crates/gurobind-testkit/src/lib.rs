//! In-process stand-in for the Gurobi C API.
//!
//! [`Stub`] implements [`gurobind_sys::NativeApi`] entirely in Rust. It keeps
//! real per-handle state (parameters with their documented defaults,
//! variables, constraints, quadratic terms, objectives, solution and IIS
//! markers) and records a ledger of every entry point it serves, plus the ids
//! of each environment and model it created and freed.
//!
//! Clones of a `Stub` share one ledger, so a test can hand a clone to the code
//! under test and inspect the ledger after the handles are gone.

mod env;
mod ledger;
mod model;
mod native;
mod params;

pub use ledger::HandleId;

use ledger::LedgerState;
use std::ffi::c_int;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Instrumented stand-in for the native library.
#[derive(Debug, Clone, Default)]
pub struct Stub {
    ledger: Arc<Mutex<LedgerState>>,
}

impl Stub {
    /// Create a stand-in with an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn ledger(&self) -> MutexGuard<'_, LedgerState> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entry points served so far, in call order, by C symbol name.
    pub fn calls(&self) -> Vec<&'static str> {
        self.ledger().calls.clone()
    }

    /// Number of times `symbol` (for example `"GRBoptimize"`) was served.
    pub fn call_count(&self, symbol: &str) -> usize {
        self.ledger()
            .calls
            .iter()
            .filter(|name| **name == symbol)
            .count()
    }

    /// Forget the recorded calls. Handle bookkeeping is kept.
    pub fn clear_calls(&self) {
        self.ledger().calls.clear();
    }

    /// Make the next status-returning entry point fail with `code`.
    ///
    /// The failing call leaves all native state untouched.
    pub fn fail_next(&self, code: c_int) {
        self.ledger().fail_next = Some(code);
    }

    /// Make the next `GRBgetenv` return null, as for a corrupt model.
    pub fn null_env_next(&self) {
        self.ledger().null_env_next = true;
    }

    /// Ids of every environment created through `GRBemptyenv` or `GRBloadenv`.
    pub fn envs_created(&self) -> Vec<HandleId> {
        self.ledger().envs_created.clone()
    }

    /// Ids passed to `GRBfreeenv`, one entry per call.
    pub fn envs_freed(&self) -> Vec<HandleId> {
        self.ledger().envs_freed.clone()
    }

    /// Ids of every model created through `GRBnewmodel` or `GRBreadmodel`.
    pub fn models_created(&self) -> Vec<HandleId> {
        self.ledger().models_created.clone()
    }

    /// Ids passed to `GRBfreemodel`, one entry per call.
    pub fn models_freed(&self) -> Vec<HandleId> {
        self.ledger().models_freed.clone()
    }

    /// Environments created and not yet freed.
    pub fn live_envs(&self) -> usize {
        let ledger = self.ledger();
        ledger
            .envs_created
            .len()
            .saturating_sub(ledger.envs_freed.len())
    }

    /// Models created and not yet freed.
    pub fn live_models(&self) -> usize {
        let ledger = self.ledger();
        ledger
            .models_created
            .len()
            .saturating_sub(ledger.models_freed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurobind_sys::{GRB_ERROR_NO_LICENSE, GRBenv, NativeApi};
    use std::ptr;

    #[test]
    fn test_ledger_records_env_lifecycle() {
        let stub = Stub::new();
        let mut env: *mut GRBenv = ptr::null_mut();
        let status = unsafe { stub.empty_env(&raw mut env) };
        assert_eq!(status, 0);
        assert!(!env.is_null());
        unsafe { stub.free_env(env) };

        assert_eq!(stub.calls(), vec!["GRBemptyenv", "GRBfreeenv"]);
        assert_eq!(stub.envs_created(), stub.envs_freed());
        assert_eq!(stub.live_envs(), 0);
    }

    #[test]
    fn test_fail_next_applies_once() {
        let stub = Stub::new();
        stub.fail_next(GRB_ERROR_NO_LICENSE);
        let mut env: *mut GRBenv = ptr::null_mut();
        assert_eq!(unsafe { stub.empty_env(&raw mut env) }, GRB_ERROR_NO_LICENSE);
        assert!(env.is_null());
        assert!(stub.envs_created().is_empty());

        assert_eq!(unsafe { stub.empty_env(&raw mut env) }, 0);
        unsafe { stub.free_env(env) };
    }

    #[test]
    fn test_clones_share_ledger() {
        let stub = Stub::new();
        let clone = stub.clone();
        let mut major = 0;
        let mut minor = 0;
        let mut technical = 0;
        unsafe { clone.version(&raw mut major, &raw mut minor, &raw mut technical) };
        assert_eq!(stub.call_count("GRBversion"), 1);
        assert!(major > 0);
    }

    #[test]
    fn test_null_env_next_applies_once() {
        let stub = Stub::new();
        stub.null_env_next();
        let model = ptr::dangling_mut();
        assert!(unsafe { stub.get_env(model) }.is_null());
        assert!(unsafe { stub.get_env(ptr::null_mut()) }.is_null());
        assert_eq!(stub.call_count("GRBgetenv"), 2);
        assert!(!stub.ledger().null_env_next);
    }
}
