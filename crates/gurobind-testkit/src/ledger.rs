//! Shared call ledger.

use std::ffi::c_int;

/// Identifier the stand-in assigns to each environment and model it creates.
pub type HandleId = u64;

#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    pub(crate) calls: Vec<&'static str>,
    pub(crate) fail_next: Option<c_int>,
    pub(crate) null_env_next: bool,
    pub(crate) envs_created: Vec<HandleId>,
    pub(crate) envs_freed: Vec<HandleId>,
    pub(crate) models_created: Vec<HandleId>,
    pub(crate) models_freed: Vec<HandleId>,
    next_id: HandleId,
}

impl LedgerState {
    /// Record a call to `symbol` and hand back any scripted failure.
    pub(crate) fn enter(&mut self, symbol: &'static str) -> Option<c_int> {
        self.calls.push(symbol);
        self.fail_next.take()
    }

    /// Record a call that cannot fail (void or pointer-returning entry points).
    pub(crate) fn record(&mut self, symbol: &'static str) {
        self.calls.push(symbol);
    }

    pub(crate) fn next_id(&mut self) -> HandleId {
        self.next_id += 1;
        self.next_id
    }
}
