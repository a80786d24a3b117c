//! Environment state.

use crate::ledger::HandleId;
use crate::params::Params;
use std::ffi::{CString, c_int};

#[derive(Debug, Clone)]
pub(crate) struct StubEnv {
    pub(crate) id: HandleId,
    pub(crate) started: bool,
    pub(crate) params: Params,
    error: CString,
}

impl StubEnv {
    pub(crate) fn new(id: HandleId) -> Self {
        Self {
            id,
            started: false,
            params: Params::new(),
            error: CString::default(),
        }
    }

    /// Remember the failure so `GRBgeterrormsg` can report it.
    pub(crate) fn record_error(&mut self, symbol: &str, code: c_int) {
        let message = format!("{symbol}: error {code}");
        self.error = CString::new(message).unwrap_or_default();
    }

    pub(crate) fn error(&self) -> &CString {
        &self.error
    }
}
