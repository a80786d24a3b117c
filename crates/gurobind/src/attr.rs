//! Attribute queries and updates on a [`Model`].
//!
//! Attributes come in four shapes: scalar (model-wide), element (one index),
//! array (a contiguous range `first..first + len`) and list (arbitrary
//! indices). Array and list reads allocate the result up front; if the native
//! call fails the partially written result is discarded.

use crate::buffer::{Buffer, Element, require};
use crate::error::{Error, Result};
use crate::model::Model;
use crate::outcome::{check, preflight, to_c_int};
use crate::status::ModelStatus;
use crate::strings::{NativeStrings, c_string, copy_c_str, from_native};
use gurobind_sys::{GRBmodel, NativeApi};
use std::ffi::{CString, c_char, c_int};
use std::ptr;
use tracing::trace;

fn attr_name(name: &str) -> Result<CString> {
    c_string(name, "attr.name")
}

fn trace_access(operation: &'static str, name: &str, len: usize) {
    trace!(component = "attr", operation, status = "success", name, len, "Attribute access");
}

/// Name, start index and length of an array access.
fn range_args(
    operation: &'static str,
    name: &str,
    first: usize,
    len: usize,
) -> Result<(CString, c_int, c_int)> {
    if len == 0 {
        return Err(Error::invalid(
            format!("{operation}:len"),
            "length must be positive",
        ));
    }
    Ok((
        attr_name(name)?,
        to_c_int(first, &format!("{operation}:first"))?,
        to_c_int(len, &format!("{operation}:len"))?,
    ))
}

/// Name, length and index list of a list access.
fn list_args<'b>(
    operation: &'static str,
    name: &str,
    len: usize,
    ind: &Buffer<'b>,
) -> Result<(CString, c_int, &'b [i32])> {
    if len == 0 {
        return Err(Error::invalid(
            format!("{operation}:len"),
            "length must be positive",
        ));
    }
    Ok((
        attr_name(name)?,
        to_c_int(len, &format!("{operation}:len"))?,
        require::<i32>(ind, len, &format!("{operation}:ind"))?,
    ))
}

/// Name and index of a single-element access.
fn element_args(operation: &'static str, name: &str, element: usize) -> Result<(CString, c_int)> {
    Ok((
        attr_name(name)?,
        to_c_int(element, &format!("{operation}:element"))?,
    ))
}

/// A native element count as a host length.
fn count(name: &str, value: i32) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::invalid(name, format!("library reported a negative count {value}")))
}

impl<A: NativeApi> Model<'_, A> {
    fn read_array<T: Copy + Default>(
        &self,
        operation: &'static str,
        name: &str,
        first: usize,
        len: usize,
        read: impl FnOnce(*mut GRBmodel, *const c_char, c_int, c_int, *mut T) -> c_int,
    ) -> Result<Vec<T>> {
        let (c_name, c_first, c_len) =
            preflight(operation, range_args(operation, name, first, len))?;
        let mut values = vec![T::default(); len];
        check(
            read(self.as_ptr(), c_name.as_ptr(), c_first, c_len, values.as_mut_ptr()),
            operation,
        )?;
        trace_access(operation, name, len);
        Ok(values)
    }

    fn write_array<'b, T: Element>(
        &mut self,
        operation: &'static str,
        name: &str,
        first: usize,
        len: usize,
        values: Buffer<'b>,
        write: impl FnOnce(*mut GRBmodel, *const c_char, c_int, c_int, *mut T) -> c_int,
    ) -> Result<()> {
        let ((c_name, c_first, c_len), values) = preflight(
            operation,
            range_args(operation, name, first, len).and_then(|args| {
                Ok((args, require::<T>(&values, len, &format!("{operation}:values"))?))
            }),
        )?;
        check(
            write(
                self.as_ptr(),
                c_name.as_ptr(),
                c_first,
                c_len,
                values.as_ptr().cast_mut(),
            ),
            operation,
        )?;
        trace_access(operation, name, len);
        Ok(())
    }

    fn read_list<'b, T: Copy + Default>(
        &self,
        operation: &'static str,
        name: &str,
        len: usize,
        ind: Buffer<'b>,
        read: impl FnOnce(*mut GRBmodel, *const c_char, c_int, *mut c_int, *mut T) -> c_int,
    ) -> Result<Vec<T>> {
        let (c_name, c_len, ind) = preflight(operation, list_args(operation, name, len, &ind))?;
        let mut values = vec![T::default(); len];
        check(
            read(
                self.as_ptr(),
                c_name.as_ptr(),
                c_len,
                ind.as_ptr().cast_mut(),
                values.as_mut_ptr(),
            ),
            operation,
        )?;
        trace_access(operation, name, len);
        Ok(values)
    }

    fn write_list<'b, T: Element>(
        &mut self,
        operation: &'static str,
        name: &str,
        len: usize,
        ind: Buffer<'b>,
        values: Buffer<'b>,
        write: impl FnOnce(*mut GRBmodel, *const c_char, c_int, *mut c_int, *mut T) -> c_int,
    ) -> Result<()> {
        let ((c_name, c_len, ind), values) = preflight(
            operation,
            list_args(operation, name, len, &ind).and_then(|args| {
                Ok((args, require::<T>(&values, len, &format!("{operation}:values"))?))
            }),
        )?;
        check(
            write(
                self.as_ptr(),
                c_name.as_ptr(),
                c_len,
                ind.as_ptr().cast_mut(),
                values.as_ptr().cast_mut(),
            ),
            operation,
        )?;
        trace_access(operation, name, len);
        Ok(())
    }

    // Integer attributes.

    pub fn get_int_attr(&self, name: &str) -> Result<i32> {
        let c_name = preflight("get_int_attr", attr_name(name))?;
        let mut value = 0;
        check(
            unsafe { self.api().get_int_attr(self.as_ptr(), c_name.as_ptr(), &raw mut value) },
            "get_int_attr",
        )?;
        Ok(value)
    }

    pub fn set_int_attr(&mut self, name: &str, value: i32) -> Result<()> {
        let c_name = preflight("set_int_attr", attr_name(name))?;
        check(
            unsafe { self.api().set_int_attr(self.as_ptr(), c_name.as_ptr(), value) },
            "set_int_attr",
        )
    }

    pub fn get_int_attr_element(&self, name: &str, element: usize) -> Result<i32> {
        const OP: &str = "get_int_attr_element";
        let (c_name, index) = preflight(OP, element_args(OP, name, element))?;
        let mut value = 0;
        check(
            unsafe {
                self.api()
                    .get_int_attr_element(self.as_ptr(), c_name.as_ptr(), index, &raw mut value)
            },
            OP,
        )?;
        Ok(value)
    }

    pub fn set_int_attr_element(&mut self, name: &str, element: usize, value: i32) -> Result<()> {
        const OP: &str = "set_int_attr_element";
        let (c_name, index) = preflight(OP, element_args(OP, name, element))?;
        check(
            unsafe {
                self.api()
                    .set_int_attr_element(self.as_ptr(), c_name.as_ptr(), index, value)
            },
            OP,
        )
    }

    /// Values of `name` for elements `first..first + len`.
    pub fn get_int_attr_array(&self, name: &str, first: usize, len: usize) -> Result<Vec<i32>> {
        let api = self.api();
        self.read_array("get_int_attr_array", name, first, len, |m, n, f, l, v| unsafe {
            api.get_int_attr_array(m, n, f, l, v)
        })
    }

    pub fn set_int_attr_array<'b>(
        &mut self,
        name: &str,
        first: usize,
        len: usize,
        values: impl Into<Buffer<'b>>,
    ) -> Result<()> {
        let api = self.api();
        self.write_array(
            "set_int_attr_array",
            name,
            first,
            len,
            values.into(),
            |m, n, f, l, v| unsafe { api.set_int_attr_array(m, n, f, l, v) },
        )
    }

    /// Values of `name` for the `len` elements listed in `ind`.
    pub fn get_int_attr_list<'b>(
        &self,
        name: &str,
        len: usize,
        ind: impl Into<Buffer<'b>>,
    ) -> Result<Vec<i32>> {
        let api = self.api();
        self.read_list("get_int_attr_list", name, len, ind.into(), |m, n, l, i, v| unsafe {
            api.get_int_attr_list(m, n, l, i, v)
        })
    }

    pub fn set_int_attr_list<'b>(
        &mut self,
        name: &str,
        len: usize,
        ind: impl Into<Buffer<'b>>,
        values: impl Into<Buffer<'b>>,
    ) -> Result<()> {
        let api = self.api();
        self.write_list(
            "set_int_attr_list",
            name,
            len,
            ind.into(),
            values.into(),
            |m, n, l, i, v| unsafe { api.set_int_attr_list(m, n, l, i, v) },
        )
    }

    // Float attributes.

    pub fn get_float_attr(&self, name: &str) -> Result<f64> {
        let c_name = preflight("get_float_attr", attr_name(name))?;
        let mut value = 0.0;
        check(
            unsafe { self.api().get_dbl_attr(self.as_ptr(), c_name.as_ptr(), &raw mut value) },
            "get_float_attr",
        )?;
        Ok(value)
    }

    pub fn set_float_attr(&mut self, name: &str, value: f64) -> Result<()> {
        let c_name = preflight("set_float_attr", attr_name(name))?;
        check(
            unsafe { self.api().set_dbl_attr(self.as_ptr(), c_name.as_ptr(), value) },
            "set_float_attr",
        )
    }

    pub fn get_float_attr_element(&self, name: &str, element: usize) -> Result<f64> {
        const OP: &str = "get_float_attr_element";
        let (c_name, index) = preflight(OP, element_args(OP, name, element))?;
        let mut value = 0.0;
        check(
            unsafe {
                self.api()
                    .get_dbl_attr_element(self.as_ptr(), c_name.as_ptr(), index, &raw mut value)
            },
            OP,
        )?;
        Ok(value)
    }

    pub fn set_float_attr_element(&mut self, name: &str, element: usize, value: f64) -> Result<()> {
        const OP: &str = "set_float_attr_element";
        let (c_name, index) = preflight(OP, element_args(OP, name, element))?;
        check(
            unsafe {
                self.api()
                    .set_dbl_attr_element(self.as_ptr(), c_name.as_ptr(), index, value)
            },
            OP,
        )
    }

    pub fn get_float_attr_array(&self, name: &str, first: usize, len: usize) -> Result<Vec<f64>> {
        let api = self.api();
        self.read_array("get_float_attr_array", name, first, len, |m, n, f, l, v| unsafe {
            api.get_dbl_attr_array(m, n, f, l, v)
        })
    }

    pub fn set_float_attr_array<'b>(
        &mut self,
        name: &str,
        first: usize,
        len: usize,
        values: impl Into<Buffer<'b>>,
    ) -> Result<()> {
        let api = self.api();
        self.write_array(
            "set_float_attr_array",
            name,
            first,
            len,
            values.into(),
            |m, n, f, l, v| unsafe { api.set_dbl_attr_array(m, n, f, l, v) },
        )
    }

    pub fn get_float_attr_list<'b>(
        &self,
        name: &str,
        len: usize,
        ind: impl Into<Buffer<'b>>,
    ) -> Result<Vec<f64>> {
        let api = self.api();
        self.read_list("get_float_attr_list", name, len, ind.into(), |m, n, l, i, v| unsafe {
            api.get_dbl_attr_list(m, n, l, i, v)
        })
    }

    pub fn set_float_attr_list<'b>(
        &mut self,
        name: &str,
        len: usize,
        ind: impl Into<Buffer<'b>>,
        values: impl Into<Buffer<'b>>,
    ) -> Result<()> {
        let api = self.api();
        self.write_list(
            "set_float_attr_list",
            name,
            len,
            ind.into(),
            values.into(),
            |m, n, l, i, v| unsafe { api.set_dbl_attr_list(m, n, l, i, v) },
        )
    }

    // Char attributes have no scalar form.

    pub fn get_char_attr_element(&self, name: &str, element: usize) -> Result<c_char> {
        const OP: &str = "get_char_attr_element";
        let (c_name, index) = preflight(OP, element_args(OP, name, element))?;
        let mut value: c_char = 0;
        check(
            unsafe {
                self.api()
                    .get_char_attr_element(self.as_ptr(), c_name.as_ptr(), index, &raw mut value)
            },
            OP,
        )?;
        Ok(value)
    }

    pub fn set_char_attr_element(
        &mut self,
        name: &str,
        element: usize,
        value: c_char,
    ) -> Result<()> {
        const OP: &str = "set_char_attr_element";
        let (c_name, index) = preflight(OP, element_args(OP, name, element))?;
        check(
            unsafe {
                self.api()
                    .set_char_attr_element(self.as_ptr(), c_name.as_ptr(), index, value)
            },
            OP,
        )
    }

    pub fn get_char_attr_array(&self, name: &str, first: usize, len: usize) -> Result<Vec<c_char>> {
        let api = self.api();
        self.read_array("get_char_attr_array", name, first, len, |m, n, f, l, v| unsafe {
            api.get_char_attr_array(m, n, f, l, v)
        })
    }

    pub fn set_char_attr_array<'b>(
        &mut self,
        name: &str,
        first: usize,
        len: usize,
        values: impl Into<Buffer<'b>>,
    ) -> Result<()> {
        let api = self.api();
        self.write_array(
            "set_char_attr_array",
            name,
            first,
            len,
            values.into(),
            |m, n, f, l, v| unsafe { api.set_char_attr_array(m, n, f, l, v) },
        )
    }

    // String attributes. The library owns the returned text; it is copied
    // out before the next call can invalidate it.

    pub fn get_str_attr(&self, name: &str) -> Result<String> {
        let c_name = preflight("get_str_attr", attr_name(name))?;
        let mut value: *mut c_char = ptr::null_mut();
        check(
            unsafe { self.api().get_str_attr(self.as_ptr(), c_name.as_ptr(), &raw mut value) },
            "get_str_attr",
        )?;
        Ok(unsafe { copy_c_str(value) })
    }

    pub fn set_str_attr(&mut self, name: &str, value: &str) -> Result<()> {
        let (c_name, c_value) = preflight(
            "set_str_attr",
            attr_name(name).and_then(|n| Ok((n, c_string(value, "set_str_attr:value")?))),
        )?;
        check(
            unsafe {
                self.api()
                    .set_str_attr(self.as_ptr(), c_name.as_ptr(), c_value.as_ptr())
            },
            "set_str_attr",
        )
    }

    pub fn get_str_attr_element(&self, name: &str, element: usize) -> Result<String> {
        const OP: &str = "get_str_attr_element";
        let (c_name, index) = preflight(OP, element_args(OP, name, element))?;
        let mut value: *mut c_char = ptr::null_mut();
        check(
            unsafe {
                self.api()
                    .get_str_attr_element(self.as_ptr(), c_name.as_ptr(), index, &raw mut value)
            },
            OP,
        )?;
        Ok(unsafe { copy_c_str(value) })
    }

    pub fn set_str_attr_element(&mut self, name: &str, element: usize, value: &str) -> Result<()> {
        const OP: &str = "set_str_attr_element";
        let ((c_name, index), c_value) = preflight(
            OP,
            element_args(OP, name, element)
                .and_then(|args| Ok((args, c_string(value, "set_str_attr_element:value")?))),
        )?;
        check(
            unsafe {
                self.api().set_str_attr_element(
                    self.as_ptr(),
                    c_name.as_ptr(),
                    index,
                    c_value.as_ptr(),
                )
            },
            "set_str_attr_element",
        )
    }

    pub fn get_str_attr_array(&self, name: &str, first: usize, len: usize) -> Result<Vec<String>> {
        const OP: &str = "get_str_attr_array";
        let (c_name, c_first, c_len) = preflight(OP, range_args(OP, name, first, len))?;
        let mut ptrs: Vec<*mut c_char> = vec![ptr::null_mut(); len];
        check(
            unsafe {
                self.api().get_str_attr_array(
                    self.as_ptr(),
                    c_name.as_ptr(),
                    c_first,
                    c_len,
                    ptrs.as_mut_ptr(),
                )
            },
            OP,
        )?;
        trace_access(OP, name, len);
        Ok(unsafe { from_native(len, ptrs.as_ptr()) })
    }

    /// Set `name` for elements `first..first + len`; `values` must hold exactly `len` strings.
    pub fn set_str_attr_array(
        &mut self,
        name: &str,
        first: usize,
        len: usize,
        values: &[&str],
    ) -> Result<()> {
        const OP: &str = "set_str_attr_array";
        let ((c_name, c_first, c_len), mut strings) = preflight(
            OP,
            range_args(OP, name, first, len).and_then(|args| {
                Ok((args, NativeStrings::new(values, len, "set_str_attr_array:values")?))
            }),
        )?;
        check(
            unsafe {
                self.api().set_str_attr_array(
                    self.as_ptr(),
                    c_name.as_ptr(),
                    c_first,
                    c_len,
                    strings.as_mut_ptr(),
                )
            },
            OP,
        )?;
        trace_access(OP, name, len);
        Ok(())
    }

    // Convenience accessors for common attributes.

    /// Optimization status (`Status`).
    pub fn status(&self) -> Result<ModelStatus> {
        self.get_int_attr("Status").map(ModelStatus::from_code)
    }

    /// Objective value of the current solution (`ObjVal`).
    pub fn objective_value(&self) -> Result<f64> {
        self.get_float_attr("ObjVal")
    }

    pub fn num_vars(&self) -> Result<usize> {
        count("NumVars", self.get_int_attr("NumVars")?)
    }

    pub fn num_constrs(&self) -> Result<usize> {
        count("NumConstrs", self.get_int_attr("NumConstrs")?)
    }

    /// Values of `X` for every variable.
    pub fn solution(&self) -> Result<Vec<f64>> {
        let n = self.num_vars()?;
        if n == 0 {
            return Ok(Vec::new());
        }
        self.get_float_attr_array("X", 0, n)
    }
}

#[cfg(test)]
mod tests {
    use super::count;
    use crate::env::Environment;
    use crate::model::{Model, VarData};
    use gurobind_sys::{GRB_CONTINUOUS, GRB_ERROR_INDEX_OUT_OF_RANGE, GRB_ERROR_UNKNOWN_ATTRIBUTE};
    use gurobind_testkit::Stub;

    #[test]
    fn test_array_len_zero_is_rejected() {
        let stub = Stub::new();
        let env = Environment::new(stub.clone(), None).unwrap();
        let model = Model::new(&env, None, 3, VarData::default()).unwrap();
        stub.clear_calls();
        let err = model.get_float_attr_array("LB", 0, 0).unwrap_err();
        assert_eq!(err.param(), Some("get_float_attr_array:len"));
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn test_list_len_zero_is_rejected() {
        let stub = Stub::new();
        let env = Environment::new(stub.clone(), None).unwrap();
        let mut model = Model::new(&env, None, 3, VarData::default()).unwrap();
        stub.clear_calls();
        let err = model
            .get_float_attr_list("UB", 0, &[] as &[i32])
            .unwrap_err();
        assert_eq!(err.param(), Some("get_float_attr_list:len"));
        let err = model
            .set_int_attr_list("BranchPriority", 0, &[] as &[i32], &[] as &[i32])
            .unwrap_err();
        assert_eq!(err.param(), Some("set_int_attr_list:len"));
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn test_negative_count_is_an_error() {
        assert_eq!(count("NumVars", 4), Ok(4));
        let err = count("NumVars", -1).unwrap_err();
        assert_eq!(err.param(), Some("NumVars"));
    }

    #[test]
    fn test_failed_array_read_returns_native_code() {
        let env = Environment::new(Stub::new(), None).unwrap();
        let model = Model::new(&env, None, 2, VarData::default()).unwrap();
        let err = model.get_float_attr_array("UB", 1, 2).unwrap_err();
        assert_eq!(err.native_code(), Some(GRB_ERROR_INDEX_OUT_OF_RANGE));
        let err = model.get_int_attr("NoSuchAttr").unwrap_err();
        assert_eq!(err.native_code(), Some(GRB_ERROR_UNKNOWN_ATTRIBUTE));
    }

    #[test]
    fn test_char_and_str_arrays() {
        let env = Environment::new(Stub::new(), None).unwrap();
        let names = ["a", "b"];
        let mut model = Model::new(
            &env,
            None,
            2,
            VarData {
                names: Some(&names),
                ..VarData::default()
            },
        )
        .unwrap();
        assert_eq!(
            model.get_char_attr_array("VType", 0, 2).unwrap(),
            vec![GRB_CONTINUOUS; 2]
        );
        model.set_str_attr_array("VarName", 1, 1, &["renamed"]).unwrap();
        assert_eq!(
            model.get_str_attr_array("VarName", 0, 2).unwrap(),
            vec!["a".to_string(), "renamed".to_string()]
        );
        assert_eq!(model.get_str_attr_element("VarName", 1).unwrap(), "renamed");
    }

    #[test]
    fn test_list_access() {
        let env = Environment::new(Stub::new(), None).unwrap();
        let mut model = Model::new(&env, None, 4, VarData::default()).unwrap();
        let ind = [3_i32, 1];
        model
            .set_float_attr_list("UB", 2, &ind, &[7.0, 5.0])
            .unwrap();
        assert_eq!(model.get_float_attr_list("UB", 2, &ind).unwrap(), vec![7.0, 5.0]);
        model
            .set_int_attr_list("BranchPriority", 1, &[0_i32], &[9_i32])
            .unwrap();
        assert_eq!(model.get_int_attr_element("BranchPriority", 0), Ok(9));
    }
}
