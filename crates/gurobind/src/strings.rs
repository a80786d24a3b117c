//! Conversion between host strings and C string arrays.

use crate::error::{Error, Result};
use std::ffi::{CStr, CString, c_char};
use std::path::Path;

/// NUL-terminated copies of a list of strings plus the pointer array the
/// library takes.
///
/// The pointers stay valid for as long as this value lives. Keep it alive
/// across the native call and let it drop afterwards.
#[derive(Debug)]
pub struct NativeStrings {
    // Owns the bytes `ptrs` points into.
    _owned: Vec<CString>,
    ptrs: Vec<*mut c_char>,
}

impl NativeStrings {
    /// Copy `values`, which must hold exactly `expected` entries.
    ///
    /// The count is checked before anything is allocated.
    pub fn new<S: AsRef<str>>(values: &[S], expected: usize, param: &str) -> Result<Self> {
        if values.len() != expected {
            return Err(Error::invalid(
                param,
                format!("expected {expected} strings, got {}", values.len()),
            ));
        }
        let owned = values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                CString::new(value.as_ref()).map_err(|_| {
                    Error::invalid(param, format!("string {index} contains a NUL byte"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let ptrs = owned.iter().map(|s| s.as_ptr().cast_mut()).collect();
        Ok(Self {
            _owned: owned,
            ptrs,
        })
    }

    pub fn len(&self) -> usize {
        self.ptrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ptrs.is_empty()
    }

    /// The `char**` argument.
    pub fn as_mut_ptr(&mut self) -> *mut *mut c_char {
        self.ptrs.as_mut_ptr()
    }
}

/// Copy `count` C strings out of a native array.
///
/// Invalid UTF-8 is replaced lossily and a null entry becomes `""`.
///
/// # Safety
///
/// `ptr` must point to `count` readable pointers, each null or pointing to a
/// NUL-terminated string.
pub unsafe fn from_native(count: usize, ptr: *const *mut c_char) -> Vec<String> {
    if count == 0 || ptr.is_null() {
        return Vec::new();
    }
    let ptrs = unsafe { std::slice::from_raw_parts(ptr, count) };
    ptrs.iter()
        .map(|p| unsafe { copy_c_str(*p) })
        .collect()
}

/// Copy one C string; null becomes `""`.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn copy_c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}

/// A single argument string for the library.
pub(crate) fn c_string(value: &str, param: &str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::invalid(param, "string contains a NUL byte"))
}

/// A filesystem path argument. The library takes paths as C strings.
pub(crate) fn path_c_string(path: &Path, param: &str) -> Result<CString> {
    let text = path
        .to_str()
        .ok_or_else(|| Error::invalid(param, "path is not valid UTF-8"))?;
    c_string(text, param)
}

/// Optional string argument; `None` is passed as a null pointer.
pub(crate) fn opt_c_string(value: Option<&str>, param: &str) -> Result<Option<CString>> {
    value.map(|v| c_string(v, param)).transpose()
}

pub(crate) fn opt_ptr(value: &Option<CString>) -> *const c_char {
    value.as_ref().map_or(std::ptr::null(), |v| v.as_ptr())
}

/// Marshal an optional list; `None` is passed as a null pointer.
pub(crate) fn opt_native<S: AsRef<str>>(
    values: Option<&[S]>,
    expected: usize,
    param: &str,
) -> Result<Option<NativeStrings>> {
    values
        .map(|v| NativeStrings::new(v, expected, param))
        .transpose()
}

pub(crate) fn opt_array_ptr(values: &mut Option<NativeStrings>) -> *mut *mut c_char {
    values
        .as_mut()
        .map_or(std::ptr::null_mut(), NativeStrings::as_mut_ptr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mismatch_is_rejected() {
        let err = NativeStrings::new(&["a", "b"], 3, "varnames").unwrap_err();
        assert_eq!(err.param(), Some("varnames"));
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        let err = NativeStrings::new(&["ok", "bad\0name"], 2, "names").unwrap_err();
        assert!(err.to_string().contains("string 1"));
    }

    #[test]
    fn test_null_entries_become_empty() {
        let x = CString::new("x").unwrap();
        let array = [x.as_ptr().cast_mut(), std::ptr::null_mut()];
        let values = unsafe { from_native(2, array.as_ptr()) };
        assert_eq!(values, vec!["x".to_string(), String::new()]);
    }

    #[test]
    fn test_empty_list() {
        let mut strings = NativeStrings::new::<&str>(&[], 0, "names").unwrap();
        assert!(strings.is_empty());
        assert!(unsafe { from_native(0, strings.as_mut_ptr()) }.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let cases: [&[&str]; 4] = [
            &[],
            &[""],
            &["x", "flow[1,2]", "ünïcode", "with space"],
            &["a"; 16],
        ];
        for values in cases {
            let mut native = NativeStrings::new(values, values.len(), "names").unwrap();
            let back = unsafe { from_native(native.len(), native.as_mut_ptr()) };
            assert_eq!(back, values);
        }
    }
}
