//! Parameter accessors shared by environment and model scope.
//!
//! Parameters live on a native environment. A model has its own copy of the
//! environment it was created from, reached through `GRBgetenv`, so the same
//! functions serve both scopes.

use crate::error::Result;
use crate::outcome::check;
use crate::strings::{c_string, copy_c_str};
use gurobind_sys::{GRB_MAX_STRLEN, GRBenv, NativeApi};
use std::ffi::c_char;
use tracing::trace;

fn trace_access(operation: &'static str, name: &str) {
    trace!(component = "params", operation, status = "success", name, "Parameter access");
}

pub(crate) fn set_int<A: NativeApi>(
    api: &A,
    env: *mut GRBenv,
    name: &str,
    value: i32,
) -> Result<()> {
    let c_name = c_string(name, "param.name")?;
    check(unsafe { api.set_int_param(env, c_name.as_ptr(), value) }, "set_int_param")?;
    trace_access("set_int_param", name);
    Ok(())
}

pub(crate) fn get_int<A: NativeApi>(api: &A, env: *mut GRBenv, name: &str) -> Result<i32> {
    let c_name = c_string(name, "param.name")?;
    let mut value = 0;
    check(unsafe { api.get_int_param(env, c_name.as_ptr(), &raw mut value) }, "get_int_param")?;
    trace_access("get_int_param", name);
    Ok(value)
}

pub(crate) fn set_float<A: NativeApi>(
    api: &A,
    env: *mut GRBenv,
    name: &str,
    value: f64,
) -> Result<()> {
    let c_name = c_string(name, "param.name")?;
    check(unsafe { api.set_dbl_param(env, c_name.as_ptr(), value) }, "set_float_param")?;
    trace_access("set_float_param", name);
    Ok(())
}

pub(crate) fn get_float<A: NativeApi>(api: &A, env: *mut GRBenv, name: &str) -> Result<f64> {
    let c_name = c_string(name, "param.name")?;
    let mut value = 0.0;
    check(unsafe { api.get_dbl_param(env, c_name.as_ptr(), &raw mut value) }, "get_float_param")?;
    trace_access("get_float_param", name);
    Ok(value)
}

pub(crate) fn set_str<A: NativeApi>(
    api: &A,
    env: *mut GRBenv,
    name: &str,
    value: &str,
) -> Result<()> {
    let c_name = c_string(name, "param.name")?;
    let c_value = c_string(value, "param.value")?;
    check(unsafe { api.set_str_param(env, c_name.as_ptr(), c_value.as_ptr()) }, "set_str_param")?;
    trace_access("set_str_param", name);
    Ok(())
}

/// Reads into a stack buffer of the library's maximum string length.
pub(crate) fn get_str<A: NativeApi>(api: &A, env: *mut GRBenv, name: &str) -> Result<String> {
    let c_name = c_string(name, "param.name")?;
    let mut buffer: [c_char; GRB_MAX_STRLEN] = [0; GRB_MAX_STRLEN];
    check(
        unsafe { api.get_str_param(env, c_name.as_ptr(), buffer.as_mut_ptr()) },
        "get_str_param",
    )?;
    // Terminate in case the library filled the whole buffer.
    buffer[GRB_MAX_STRLEN - 1] = 0;
    trace_access("get_str_param", name);
    Ok(unsafe { copy_c_str(buffer.as_ptr()) })
}
