//! Borrowed numeric buffers and their validation.
//!
//! A [`Buffer`] is a dynamically typed view of caller memory: the element
//! kind is known only at run time, and the view carries a shape and strides.
//! Before a buffer is handed to the library it goes through [`require`],
//! which checks it is one-dimensional, dense, of the expected kind and long
//! enough. Validation never copies; the native call reads the caller's memory
//! directly.

use crate::error::{Error, Result};
use std::ffi::c_char;
use std::fmt;

/// Element kinds the library accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 64-bit floating point (`double`).
    Float64,
    /// 32-bit signed integer (`int`).
    Int32,
    /// Single byte (`char`).
    Char,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Float64 => "float64",
            ElementKind::Int32 => "int32",
            ElementKind::Char => "char",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed storage behind a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BufferData<'a> {
    Float64(&'a [f64]),
    Int32(&'a [i32]),
    Char(&'a [c_char]),
}

impl BufferData<'_> {
    pub fn kind(&self) -> ElementKind {
        match self {
            BufferData::Float64(_) => ElementKind::Float64,
            BufferData::Int32(_) => ElementKind::Int32,
            BufferData::Char(_) => ElementKind::Char,
        }
    }

    fn len(&self) -> usize {
        match self {
            BufferData::Float64(data) => data.len(),
            BufferData::Int32(data) => data.len(),
            BufferData::Char(data) => data.len(),
        }
    }
}

/// A borrowed, dynamically typed, possibly strided view of caller memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer<'a> {
    data: BufferData<'a>,
    dims: Vec<usize>,
    strides: Vec<isize>,
}

impl<'a> Buffer<'a> {
    /// One-dimensional dense view over `data`.
    pub fn dense(data: BufferData<'a>) -> Self {
        let len = data.len();
        Self {
            data,
            dims: vec![len],
            strides: vec![1],
        }
    }

    /// View with an explicit shape and element strides.
    ///
    /// Fails when the layout would address an element outside `data`.
    pub fn with_layout(
        data: BufferData<'a>,
        dims: Vec<usize>,
        strides: Vec<isize>,
    ) -> Result<Self> {
        if dims.len() != strides.len() {
            return Err(Error::invalid(
                "buffer.strides",
                format!("{} strides for {} dimensions", strides.len(), dims.len()),
            ));
        }
        if dims.iter().any(|d| *d == 0) {
            return Ok(Self { data, dims, strides });
        }
        let mut lowest: isize = 0;
        let mut highest: isize = 0;
        for (dim, stride) in dims.iter().zip(&strides) {
            let span = isize::try_from(*dim - 1)
                .ok()
                .and_then(|d| d.checked_mul(*stride))
                .ok_or_else(|| Error::invalid("buffer.dims", "layout overflows"))?;
            if span < 0 {
                lowest += span;
            } else {
                highest += span;
            }
        }
        let in_bounds = lowest >= 0 && usize::try_from(highest).is_ok_and(|h| h < data.len());
        if !in_bounds {
            return Err(Error::invalid(
                "buffer.dims",
                format!("layout addresses memory outside {} elements", data.len()),
            ));
        }
        Ok(Self { data, dims, strides })
    }

    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Number of addressable elements.
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_dense_1d(&self) -> bool {
        self.dims.len() == 1 && (self.strides[0] == 1 || self.dims[0] <= 1)
    }
}

/// Element types a [`Buffer`] can hold.
pub trait Element: sealed::Sealed + Copy {
    const KIND: ElementKind;

    #[doc(hidden)]
    fn slice<'a>(data: &BufferData<'a>) -> Option<&'a [Self]>;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f64 {}
    impl Sealed for i32 {}
    impl Sealed for std::ffi::c_char {}
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::Float64;

    fn slice<'a>(data: &BufferData<'a>) -> Option<&'a [Self]> {
        match *data {
            BufferData::Float64(values) => Some(values),
            _ => None,
        }
    }
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::Int32;

    fn slice<'a>(data: &BufferData<'a>) -> Option<&'a [Self]> {
        match *data {
            BufferData::Int32(values) => Some(values),
            _ => None,
        }
    }
}

impl Element for c_char {
    const KIND: ElementKind = ElementKind::Char;

    fn slice<'a>(data: &BufferData<'a>) -> Option<&'a [Self]> {
        match *data {
            BufferData::Char(values) => Some(values),
            _ => None,
        }
    }
}

impl<'a> From<&'a [f64]> for Buffer<'a> {
    fn from(values: &'a [f64]) -> Self {
        Buffer::dense(BufferData::Float64(values))
    }
}

impl<'a> From<&'a [i32]> for Buffer<'a> {
    fn from(values: &'a [i32]) -> Self {
        Buffer::dense(BufferData::Int32(values))
    }
}

impl<'a> From<&'a [c_char]> for Buffer<'a> {
    fn from(values: &'a [c_char]) -> Self {
        Buffer::dense(BufferData::Char(values))
    }
}

impl<'a, T> From<&'a Vec<T>> for Buffer<'a>
where
    &'a [T]: Into<Buffer<'a>>,
{
    fn from(values: &'a Vec<T>) -> Self {
        values.as_slice().into()
    }
}

impl<'a, T, const N: usize> From<&'a [T; N]> for Buffer<'a>
where
    &'a [T]: Into<Buffer<'a>>,
{
    fn from(values: &'a [T; N]) -> Self {
        values.as_slice().into()
    }
}

/// Check `buffer` and return the first `min_len` elements as a slice.
///
/// Succeeds iff the buffer is one-dimensional, dense, holds `T` and has at
/// least `min_len` elements. The returned slice may be longer than
/// `min_len`; the library reads only what the accompanying count allows.
pub fn require<'a, T: Element>(
    buffer: &Buffer<'a>,
    min_len: usize,
    param: &str,
) -> Result<&'a [T]> {
    if buffer.ndim() != 1 {
        return Err(Error::invalid(
            param,
            format!("expected a 1-D buffer, got {} dimensions", buffer.ndim()),
        ));
    }
    if !buffer.is_dense_1d() {
        return Err(Error::invalid(param, "buffer must be contiguous"));
    }
    let values = T::slice(&buffer.data).ok_or_else(|| {
        Error::invalid(
            param,
            format!("expected {} elements, got {}", T::KIND, buffer.kind()),
        )
    })?;
    let len = buffer.len();
    if len < min_len {
        return Err(Error::invalid(
            param,
            format!("expected at least {min_len} elements, got {len}"),
        ));
    }
    Ok(&values[..len])
}

/// [`require`] lifted over an optional buffer.
pub fn require_opt<'a, T: Element>(
    buffer: Option<&Buffer<'a>>,
    min_len: usize,
    param: &str,
) -> Result<Option<&'a [T]>> {
    buffer.map(|b| require(b, min_len, param)).transpose()
}

/// Pointer for a native argument that may be absent.
pub(crate) fn ptr_or_null<T>(values: Option<&[T]>) -> *mut T {
    values.map_or(std::ptr::null_mut(), |v| v.as_ptr().cast_mut())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_accepts_matching_buffer() {
        let values = [1.0, 2.0, 3.0];
        let buffer = Buffer::from(&values);
        let slice: &[f64] = require(&buffer, 2, "val").unwrap();
        assert_eq!(slice, &values);
    }

    #[test]
    fn test_require_rejects_wrong_kind() {
        let values = [1_i32, 2, 3];
        let buffer = Buffer::from(&values);
        let err = require::<f64>(&buffer, 3, "add_constr:val").unwrap_err();
        assert_eq!(err.param(), Some("add_constr:val"));
        assert!(err.to_string().contains("float64"));
    }

    #[test]
    fn test_require_rejects_two_dimensional() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let buffer =
            Buffer::with_layout(BufferData::Float64(&values), vec![2, 2], vec![2, 1]).unwrap();
        let err = require::<f64>(&buffer, 1, "rhs").unwrap_err();
        assert!(err.to_string().contains("1-D"));
    }

    #[test]
    fn test_require_rejects_strided() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let buffer =
            Buffer::with_layout(BufferData::Float64(&values), vec![2], vec![2]).unwrap();
        assert_eq!(buffer.len(), 2);
        assert!(require::<f64>(&buffer, 1, "rhs").is_err());
    }

    #[test]
    fn test_layout_outside_data_is_rejected() {
        let values = [1.0, 2.0];
        assert!(Buffer::with_layout(BufferData::Float64(&values), vec![3], vec![1]).is_err());
        assert!(Buffer::with_layout(BufferData::Float64(&values), vec![2], vec![-1]).is_err());
    }

    #[test]
    fn test_require_opt_none_passes() {
        assert_eq!(require_opt::<i32>(None, 10, "ind"), Ok(None));
    }

    #[test]
    fn test_require_succeeds_iff_kind_and_length_match() {
        for len in 0..6 {
            let floats = vec![0.0f64; len];
            let ints = vec![0i32; len];
            let chars: Vec<c_char> = vec![0; len];
            for (kind, buffer) in [
                (ElementKind::Float64, Buffer::from(&floats)),
                (ElementKind::Int32, Buffer::from(&ints)),
                (ElementKind::Char, Buffer::from(&chars)),
            ] {
                for min_len in 0..6 {
                    let ok = require::<f64>(&buffer, min_len, "x").is_ok();
                    assert_eq!(
                        ok,
                        kind == ElementKind::Float64 && len >= min_len,
                        "kind {kind}, len {len}, min_len {min_len}"
                    );
                }
            }
        }
    }
}
