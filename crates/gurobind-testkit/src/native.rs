//! `NativeApi` served from in-process state.
//!
//! Handles are boxed [`StubEnv`] and [`StubModel`] values cast to the opaque
//! C types. Out-parameters are written only after an operation succeeds.

use crate::Stub;
use crate::env::StubEnv;
use crate::model::{Constr, ObjectiveN, QConstr, StubModel, Var};
use gurobind_sys::{
    GRB_CONTINUOUS, GRB_ERROR_ENVIRONMENT_NOT_STARTED, GRB_ERROR_INVALID_ARGUMENT,
    GRB_ERROR_NULL_ARGUMENT, GRB_INFINITY, GRBenv, GRBmodel, NativeApi,
};
use std::ffi::{CStr, c_char, c_double, c_int};
use std::path::Path;
use std::ptr;

const VERSION: (c_int, c_int, c_int) = (11, 0, 3);

type Status = Result<(), c_int>;

fn count(n: c_int) -> Result<usize, c_int> {
    usize::try_from(n).map_err(|_| GRB_ERROR_INVALID_ARGUMENT)
}

unsafe fn slice<'a, T>(ptr: *const T, len: usize) -> Result<&'a [T], c_int> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(GRB_ERROR_NULL_ARGUMENT);
    }
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}

unsafe fn opt_slice<'a, T>(ptr: *const T, len: usize) -> Result<Option<&'a [T]>, c_int> {
    if ptr.is_null() {
        Ok(None)
    } else {
        unsafe { slice(ptr, len) }.map(Some)
    }
}

unsafe fn opt_text(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }
}

unsafe fn text(ptr: *const c_char) -> Result<String, c_int> {
    unsafe { opt_text(ptr) }.ok_or(GRB_ERROR_NULL_ARGUMENT)
}

/// A null array of names means every entry takes its default name.
unsafe fn names(ptr: *const *mut c_char, len: usize) -> Result<Vec<Option<String>>, c_int> {
    match unsafe { opt_slice(ptr, len) }? {
        Some(ptrs) => Ok(ptrs.iter().map(|p| unsafe { opt_text(*p) }).collect()),
        None => Ok(vec![None; len]),
    }
}

unsafe fn write_out<T: Copy>(dst: *mut T, values: &[T]) -> Status {
    if values.is_empty() {
        return Ok(());
    }
    if dst.is_null() {
        return Err(GRB_ERROR_NULL_ARGUMENT);
    }
    unsafe { ptr::copy_nonoverlapping(values.as_ptr(), dst, values.len()) };
    Ok(())
}

unsafe fn write_one<T>(dst: *mut T, value: T) -> Status {
    if dst.is_null() {
        return Err(GRB_ERROR_NULL_ARGUMENT);
    }
    unsafe { dst.write(value) };
    Ok(())
}

/// Split compressed storage into one `(index, value)` list per row.
fn split_compressed(
    rows: usize,
    numnz: usize,
    beg: &[c_int],
    ind: &[c_int],
    val: &[c_double],
) -> Result<Vec<Vec<(c_int, c_double)>>, c_int> {
    if numnz == 0 {
        return Ok(vec![Vec::new(); rows]);
    }
    let mut out = Vec::with_capacity(rows);
    for row in 0..rows {
        let start = count(beg[row])?;
        let end = match beg.get(row + 1) {
            Some(next) => count(*next)?,
            None => numnz,
        };
        if start > end || end > numnz {
            return Err(GRB_ERROR_INVALID_ARGUMENT);
        }
        out.push(ind[start..end].iter().copied().zip(val[start..end].iter().copied()).collect());
    }
    Ok(out)
}

fn pairs(ind: &[c_int], val: &[c_double]) -> Vec<(c_int, c_double)> {
    ind.iter().copied().zip(val.iter().copied()).collect()
}

fn triples(row: &[c_int], col: &[c_int], val: &[c_double]) -> Vec<(c_int, c_int, c_double)> {
    row.iter()
        .zip(col)
        .zip(val)
        .map(|((r, c), v)| (*r, *c, *v))
        .collect()
}

fn indices(first: c_int, len: usize) -> Result<Vec<c_int>, c_int> {
    let len = c_int::try_from(len).map_err(|_| GRB_ERROR_INVALID_ARGUMENT)?;
    Ok((first..first.saturating_add(len)).collect())
}

impl Stub {
    /// Run `op` against an environment handle, honouring scripted failures.
    unsafe fn with_env(
        &self,
        symbol: &'static str,
        env: *mut GRBenv,
        op: impl FnOnce(&mut StubEnv) -> Status,
    ) -> c_int {
        let scripted = self.ledger().enter(symbol);
        let Some(env) = (unsafe { env.cast::<StubEnv>().as_mut() }) else {
            return GRB_ERROR_NULL_ARGUMENT;
        };
        let result = match scripted {
            Some(code) => Err(code),
            None => op(env),
        };
        match result {
            Ok(()) => 0,
            Err(code) => {
                env.record_error(symbol, code);
                code
            }
        }
    }

    /// Run `op` against a model handle; failures are reported on its environment.
    unsafe fn with_model(
        &self,
        symbol: &'static str,
        model: *mut GRBmodel,
        op: impl FnOnce(&mut StubModel) -> Status,
    ) -> c_int {
        let scripted = self.ledger().enter(symbol);
        let Some(model) = (unsafe { model.cast::<StubModel>().as_mut() }) else {
            return GRB_ERROR_NULL_ARGUMENT;
        };
        let result = match scripted {
            Some(code) => Err(code),
            None => op(model),
        };
        match result {
            Ok(()) => 0,
            Err(code) => {
                model.env.record_error(symbol, code);
                code
            }
        }
    }

    fn register_model(&self, model: StubModel) -> *mut GRBmodel {
        self.ledger().models_created.push(model.id);
        Box::into_raw(Box::new(model)).cast()
    }

    unsafe fn create_env(
        &self,
        symbol: &'static str,
        env_p: *mut *mut GRBenv,
        started: bool,
        logfile: *const c_char,
    ) -> c_int {
        let mut ledger = self.ledger();
        if let Some(code) = ledger.enter(symbol) {
            return code;
        }
        if env_p.is_null() {
            return GRB_ERROR_NULL_ARGUMENT;
        }
        let mut env = StubEnv::new(ledger.next_id());
        env.started = started;
        if let Some(path) = unsafe { opt_text(logfile) } {
            if let Err(code) = env.params.set_str("LogFile", &path) {
                return code;
            }
        }
        ledger.envs_created.push(env.id);
        unsafe { env_p.write(Box::into_raw(Box::new(env)).cast()) };
        0
    }
}

unsafe impl NativeApi for Stub {
    unsafe fn empty_env(&self, env_p: *mut *mut GRBenv) -> c_int {
        unsafe { self.create_env("GRBemptyenv", env_p, false, ptr::null()) }
    }

    unsafe fn start_env(&self, env: *mut GRBenv) -> c_int {
        unsafe {
            self.with_env("GRBstartenv", env, |env| {
                env.started = true;
                Ok(())
            })
        }
    }

    unsafe fn load_env(&self, env_p: *mut *mut GRBenv, logfilename: *const c_char) -> c_int {
        unsafe { self.create_env("GRBloadenv", env_p, true, logfilename) }
    }

    unsafe fn free_env(&self, env: *mut GRBenv) {
        let mut ledger = self.ledger();
        ledger.record("GRBfreeenv");
        if env.is_null() {
            return;
        }
        let env = unsafe { Box::from_raw(env.cast::<StubEnv>()) };
        ledger.envs_freed.push(env.id);
    }

    unsafe fn get_env(&self, model: *mut GRBmodel) -> *mut GRBenv {
        let mut ledger = self.ledger();
        ledger.record("GRBgetenv");
        if std::mem::take(&mut ledger.null_env_next) {
            return ptr::null_mut();
        }
        match unsafe { model.cast::<StubModel>().as_mut() } {
            Some(model) => ptr::from_mut::<StubEnv>(&mut *model.env).cast(),
            None => ptr::null_mut(),
        }
    }

    unsafe fn get_error_msg(&self, env: *mut GRBenv) -> *const c_char {
        self.ledger().record("GRBgeterrormsg");
        match unsafe { env.cast::<StubEnv>().as_ref() } {
            Some(env) => env.error().as_ptr(),
            None => ptr::null(),
        }
    }

    unsafe fn version(&self, major: *mut c_int, minor: *mut c_int, technical: *mut c_int) {
        self.ledger().record("GRBversion");
        unsafe {
            let _ = write_one(major, VERSION.0);
            let _ = write_one(minor, VERSION.1);
            let _ = write_one(technical, VERSION.2);
        }
    }

    unsafe fn set_int_param(&self, env: *mut GRBenv, name: *const c_char, value: c_int) -> c_int {
        unsafe {
            self.with_env("GRBsetintparam", env, |env| {
                env.params.set_int(&text(name)?, value)
            })
        }
    }

    unsafe fn get_int_param(
        &self,
        env: *mut GRBenv,
        name: *const c_char,
        value_p: *mut c_int,
    ) -> c_int {
        unsafe {
            self.with_env("GRBgetintparam", env, |env| {
                let value = env.params.get_int(&text(name)?)?;
                write_one(value_p, value)
            })
        }
    }

    unsafe fn set_dbl_param(
        &self,
        env: *mut GRBenv,
        name: *const c_char,
        value: c_double,
    ) -> c_int {
        unsafe {
            self.with_env("GRBsetdblparam", env, |env| {
                env.params.set_dbl(&text(name)?, value)
            })
        }
    }

    unsafe fn get_dbl_param(
        &self,
        env: *mut GRBenv,
        name: *const c_char,
        value_p: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_env("GRBgetdblparam", env, |env| {
                let value = env.params.get_dbl(&text(name)?)?;
                write_one(value_p, value)
            })
        }
    }

    unsafe fn set_str_param(
        &self,
        env: *mut GRBenv,
        name: *const c_char,
        value: *const c_char,
    ) -> c_int {
        unsafe {
            self.with_env("GRBsetstrparam", env, |env| {
                env.params.set_str(&text(name)?, &text(value)?)
            })
        }
    }

    unsafe fn get_str_param(
        &self,
        env: *mut GRBenv,
        name: *const c_char,
        value: *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_env("GRBgetstrparam", env, |env| {
                let current = env.params.get_str(&text(name)?)?;
                let mut bytes: Vec<c_char> = current.bytes().map(|b| b as c_char).collect();
                bytes.push(0);
                write_out(value, &bytes)
            })
        }
    }

    unsafe fn new_model(
        &self,
        env: *mut GRBenv,
        model_p: *mut *mut GRBmodel,
        name: *const c_char,
        numvars: c_int,
        obj: *mut c_double,
        lb: *mut c_double,
        ub: *mut c_double,
        vtype: *mut c_char,
        varnames: *mut *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_env("GRBnewmodel", env, |env| {
                if !env.started {
                    return Err(GRB_ERROR_ENVIRONMENT_NOT_STARTED);
                }
                if model_p.is_null() {
                    return Err(GRB_ERROR_NULL_ARGUMENT);
                }
                let n = count(numvars)?;
                let vars = build_vars(0, n, obj, lb, ub, vtype, varnames)?;
                let id = self.ledger().next_id();
                let model = StubModel::new(id, env, opt_text(name).unwrap_or_default(), vars);
                model_p.write(self.register_model(model));
                Ok(())
            })
        }
    }

    unsafe fn read_model(
        &self,
        env: *mut GRBenv,
        filename: *const c_char,
        model_p: *mut *mut GRBmodel,
    ) -> c_int {
        unsafe {
            self.with_env("GRBreadmodel", env, |env| {
                if !env.started {
                    return Err(GRB_ERROR_ENVIRONMENT_NOT_STARTED);
                }
                if model_p.is_null() {
                    return Err(GRB_ERROR_NULL_ARGUMENT);
                }
                let path = text(filename)?;
                let id = self.ledger().next_id();
                let model = StubModel::read(id, env, Path::new(&path))?;
                model_p.write(self.register_model(model));
                Ok(())
            })
        }
    }

    unsafe fn write(&self, model: *mut GRBmodel, filename: *const c_char) -> c_int {
        unsafe {
            self.with_model("GRBwrite", model, |model| {
                model.write(Path::new(&text(filename)?))
            })
        }
    }

    unsafe fn free_model(&self, model: *mut GRBmodel) -> c_int {
        let mut ledger = self.ledger();
        ledger.record("GRBfreemodel");
        if model.is_null() {
            return 0;
        }
        let model = unsafe { Box::from_raw(model.cast::<StubModel>()) };
        ledger.models_freed.push(model.id);
        0
    }

    unsafe fn update_model(&self, model: *mut GRBmodel) -> c_int {
        unsafe { self.with_model("GRBupdatemodel", model, |_| Ok(())) }
    }

    unsafe fn optimize(&self, model: *mut GRBmodel) -> c_int {
        unsafe {
            self.with_model("GRBoptimize", model, |model| {
                model.optimize();
                Ok(())
            })
        }
    }

    unsafe fn compute_iis(&self, model: *mut GRBmodel) -> c_int {
        unsafe { self.with_model("GRBcomputeIIS", model, StubModel::compute_iis) }
    }

    unsafe fn add_constr(
        &self,
        model: *mut GRBmodel,
        numnz: c_int,
        cind: *mut c_int,
        cval: *mut c_double,
        sense: c_char,
        rhs: c_double,
        name: *const c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBaddconstr", model, |model| {
                let n = count(numnz)?;
                let terms = pairs(slice(cind, n)?, slice(cval, n)?);
                model.add_constr(terms, sense, rhs, opt_text(name))
            })
        }
    }

    unsafe fn add_constrs(
        &self,
        model: *mut GRBmodel,
        numconstrs: c_int,
        numnz: c_int,
        cbeg: *mut c_int,
        cind: *mut c_int,
        cval: *mut c_double,
        sense: *mut c_char,
        rhs: *mut c_double,
        names_p: *mut *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBaddconstrs", model, |model| {
                let rows = count(numconstrs)?;
                let nz = count(numnz)?;
                let beg = if nz == 0 { &[][..] } else { slice(cbeg, rows)? };
                let terms = split_compressed(rows, nz, beg, slice(cind, nz)?, slice(cval, nz)?)?;
                let senses = slice(sense, rows)?;
                let rhs = opt_slice(rhs, rows)?;
                let names = names(names_p, rows)?;
                let constrs = terms
                    .into_iter()
                    .zip(names)
                    .enumerate()
                    .map(|(i, (terms, name))| Constr {
                        terms,
                        sense: senses[i],
                        rhs: rhs.map_or(0.0, |r| r[i]),
                        name: name.unwrap_or_default(),
                    })
                    .collect();
                model.add_constrs(constrs)
            })
        }
    }

    unsafe fn add_qconstr(
        &self,
        model: *mut GRBmodel,
        numlnz: c_int,
        lind: *mut c_int,
        lval: *mut c_double,
        numqnz: c_int,
        qrow: *mut c_int,
        qcol: *mut c_int,
        qval: *mut c_double,
        sense: c_char,
        rhs: c_double,
        name: *const c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBaddqconstr", model, |model| {
                let l = count(numlnz)?;
                let q = count(numqnz)?;
                model.add_qconstr(QConstr {
                    linear: pairs(slice(lind, l)?, slice(lval, l)?),
                    quad: triples(slice(qrow, q)?, slice(qcol, q)?, slice(qval, q)?),
                    sense,
                    rhs,
                    name: opt_text(name).unwrap_or_default(),
                })
            })
        }
    }

    unsafe fn add_var(
        &self,
        model: *mut GRBmodel,
        numnz: c_int,
        vind: *mut c_int,
        vval: *mut c_double,
        obj: c_double,
        lb: c_double,
        ub: c_double,
        vtype: c_char,
        name: *const c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBaddvar", model, |model| {
                let n = count(numnz)?;
                let column = pairs(slice(vind, n)?, slice(vval, n)?);
                let mut var = Var::new(model.num_vars());
                var.obj = obj;
                var.lb = lb;
                var.ub = ub;
                var.vtype = vtype;
                if let Some(name) = opt_text(name) {
                    var.name = name;
                }
                model.add_vars(vec![var], vec![column])
            })
        }
    }

    unsafe fn add_vars(
        &self,
        model: *mut GRBmodel,
        numvars: c_int,
        numnz: c_int,
        vbeg: *mut c_int,
        vind: *mut c_int,
        vval: *mut c_double,
        obj: *mut c_double,
        lb: *mut c_double,
        ub: *mut c_double,
        vtype: *mut c_char,
        names_p: *mut *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBaddvars", model, |model| {
                let cols = count(numvars)?;
                let nz = count(numnz)?;
                let beg = if nz == 0 { &[][..] } else { slice(vbeg, cols)? };
                let columns = split_compressed(cols, nz, beg, slice(vind, nz)?, slice(vval, nz)?)?;
                let vars = build_vars(model.num_vars(), cols, obj, lb, ub, vtype, names_p)?;
                model.add_vars(vars, columns)
            })
        }
    }

    unsafe fn chg_coeffs(
        &self,
        model: *mut GRBmodel,
        cnt: c_int,
        cind: *mut c_int,
        vind: *mut c_int,
        val: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBchgcoeffs", model, |model| {
                let n = count(cnt)?;
                model.chg_coeffs(&triples(slice(cind, n)?, slice(vind, n)?, slice(val, n)?))
            })
        }
    }

    unsafe fn add_qp_terms(
        &self,
        model: *mut GRBmodel,
        numqnz: c_int,
        qrow: *mut c_int,
        qcol: *mut c_int,
        qval: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBaddqpterms", model, |model| {
                let n = count(numqnz)?;
                model.add_qp_terms(&triples(slice(qrow, n)?, slice(qcol, n)?, slice(qval, n)?))
            })
        }
    }

    unsafe fn set_objective_n(
        &self,
        model: *mut GRBmodel,
        index: c_int,
        priority: c_int,
        weight: c_double,
        abstol: c_double,
        reltol: c_double,
        name: *const c_char,
        constant: c_double,
        lnz: c_int,
        lind: *mut c_int,
        lval: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetobjectiven", model, |model| {
                let n = count(lnz)?;
                model.set_objective_n(
                    index,
                    ObjectiveN {
                        priority,
                        weight,
                        abstol,
                        reltol,
                        name: opt_text(name).unwrap_or_default(),
                        constant,
                        terms: pairs(slice(lind, n)?, slice(lval, n)?),
                    },
                )
            })
        }
    }

    unsafe fn get_int_attr(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        value_p: *mut c_int,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetintattr", model, |model| {
                let value = model.int_attr(&text(name)?)?;
                write_one(value_p, value)
            })
        }
    }

    unsafe fn set_int_attr(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        value: c_int,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetintattr", model, |model| {
                model.set_int_attr(&text(name)?, value)
            })
        }
    }

    unsafe fn get_int_attr_element(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value_p: *mut c_int,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetintattrelement", model, |model| {
                let value = model.int_element(&text(name)?, element)?;
                write_one(value_p, value)
            })
        }
    }

    unsafe fn set_int_attr_element(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value: c_int,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetintattrelement", model, |model| {
                model.set_int_element(&text(name)?, element, value)
            })
        }
    }

    unsafe fn get_int_attr_array(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_int,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetintattrarray", model, |model| {
                let attr = text(name)?;
                let out = indices(first, count(len)?)?
                    .into_iter()
                    .map(|i| model.int_element(&attr, i))
                    .collect::<Result<Vec<_>, _>>()?;
                write_out(values, &out)
            })
        }
    }

    unsafe fn set_int_attr_array(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_int,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetintattrarray", model, |model| {
                let attr = text(name)?;
                let n = count(len)?;
                let values = slice(values, n)?;
                for (i, value) in indices(first, n)?.into_iter().zip(values) {
                    model.set_int_element(&attr, i, *value)?;
                }
                Ok(())
            })
        }
    }

    unsafe fn get_int_attr_list(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_int,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetintattrlist", model, |model| {
                let attr = text(name)?;
                let out = slice(ind, count(len)?)?
                    .iter()
                    .map(|i| model.int_element(&attr, *i))
                    .collect::<Result<Vec<_>, _>>()?;
                write_out(values, &out)
            })
        }
    }

    unsafe fn set_int_attr_list(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_int,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetintattrlist", model, |model| {
                let attr = text(name)?;
                let n = count(len)?;
                for (i, value) in slice(ind, n)?.iter().zip(slice(values, n)?) {
                    model.set_int_element(&attr, *i, *value)?;
                }
                Ok(())
            })
        }
    }

    unsafe fn get_dbl_attr(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        value_p: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetdblattr", model, |model| {
                let value = model.dbl_attr(&text(name)?)?;
                write_one(value_p, value)
            })
        }
    }

    unsafe fn set_dbl_attr(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        value: c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetdblattr", model, |model| {
                model.set_dbl_attr(&text(name)?, value)
            })
        }
    }

    unsafe fn get_dbl_attr_element(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value_p: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetdblattrelement", model, |model| {
                let value = model.dbl_element(&text(name)?, element)?;
                write_one(value_p, value)
            })
        }
    }

    unsafe fn set_dbl_attr_element(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value: c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetdblattrelement", model, |model| {
                model.set_dbl_element(&text(name)?, element, value)
            })
        }
    }

    unsafe fn get_dbl_attr_array(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetdblattrarray", model, |model| {
                let attr = text(name)?;
                let out = indices(first, count(len)?)?
                    .into_iter()
                    .map(|i| model.dbl_element(&attr, i))
                    .collect::<Result<Vec<_>, _>>()?;
                write_out(values, &out)
            })
        }
    }

    unsafe fn set_dbl_attr_array(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetdblattrarray", model, |model| {
                let attr = text(name)?;
                let n = count(len)?;
                let values = slice(values, n)?;
                for (i, value) in indices(first, n)?.into_iter().zip(values) {
                    model.set_dbl_element(&attr, i, *value)?;
                }
                Ok(())
            })
        }
    }

    unsafe fn get_dbl_attr_list(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetdblattrlist", model, |model| {
                let attr = text(name)?;
                let out = slice(ind, count(len)?)?
                    .iter()
                    .map(|i| model.dbl_element(&attr, *i))
                    .collect::<Result<Vec<_>, _>>()?;
                write_out(values, &out)
            })
        }
    }

    unsafe fn set_dbl_attr_list(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_double,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetdblattrlist", model, |model| {
                let attr = text(name)?;
                let n = count(len)?;
                for (i, value) in slice(ind, n)?.iter().zip(slice(values, n)?) {
                    model.set_dbl_element(&attr, *i, *value)?;
                }
                Ok(())
            })
        }
    }

    unsafe fn get_char_attr_element(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value_p: *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetcharattrelement", model, |model| {
                let value = model.char_element(&text(name)?, element)?;
                write_one(value_p, value)
            })
        }
    }

    unsafe fn set_char_attr_element(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value: c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetcharattrelement", model, |model| {
                model.set_char_element(&text(name)?, element, value)
            })
        }
    }

    unsafe fn get_char_attr_array(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetcharattrarray", model, |model| {
                let attr = text(name)?;
                let out = indices(first, count(len)?)?
                    .into_iter()
                    .map(|i| model.char_element(&attr, i))
                    .collect::<Result<Vec<_>, _>>()?;
                write_out(values, &out)
            })
        }
    }

    unsafe fn set_char_attr_array(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetcharattrarray", model, |model| {
                let attr = text(name)?;
                let n = count(len)?;
                let values = slice(values, n)?;
                for (i, value) in indices(first, n)?.into_iter().zip(values) {
                    model.set_char_element(&attr, i, *value)?;
                }
                Ok(())
            })
        }
    }

    unsafe fn get_str_attr(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        value_p: *mut *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetstrattr", model, |model| {
                let value = model.str_attr(&text(name)?)?;
                write_one(value_p, value)
            })
        }
    }

    unsafe fn set_str_attr(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        value: *const c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetstrattr", model, |model| {
                model.set_str_attr(&text(name)?, text(value)?)
            })
        }
    }

    unsafe fn get_str_attr_element(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value_p: *mut *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetstrattrelement", model, |model| {
                let ptrs = model.str_elements(&text(name)?, std::iter::once(element))?;
                write_out(value_p, &ptrs)
            })
        }
    }

    unsafe fn set_str_attr_element(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value: *const c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetstrattrelement", model, |model| {
                model.set_str_element(&text(name)?, element, text(value)?)
            })
        }
    }

    unsafe fn get_str_attr_array(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBgetstrattrarray", model, |model| {
                let attr = text(name)?;
                let ptrs = model.str_elements(&attr, indices(first, count(len)?)?.into_iter())?;
                write_out(values, &ptrs)
            })
        }
    }

    unsafe fn set_str_attr_array(
        &self,
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut *mut c_char,
    ) -> c_int {
        unsafe {
            self.with_model("GRBsetstrattrarray", model, |model| {
                let attr = text(name)?;
                let n = count(len)?;
                let values = slice(values.cast_const(), n)?;
                for (i, value) in indices(first, n)?.into_iter().zip(values) {
                    model.set_str_element(&attr, i, text(*value)?)?;
                }
                Ok(())
            })
        }
    }
}

/// Variables `base..base + n` with the library defaults for missing arrays.
unsafe fn build_vars(
    base: usize,
    n: usize,
    obj: *const c_double,
    lb: *const c_double,
    ub: *const c_double,
    vtype: *const c_char,
    varnames: *const *mut c_char,
) -> Result<Vec<Var>, c_int> {
    let obj = unsafe { opt_slice(obj, n) }?;
    let lb = unsafe { opt_slice(lb, n) }?;
    let ub = unsafe { opt_slice(ub, n) }?;
    let vtype = unsafe { opt_slice(vtype, n) }?;
    let names = unsafe { names(varnames, n) }?;
    let vars = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let mut var = Var::new(base + i);
            var.obj = obj.map_or(0.0, |v| v[i]);
            var.lb = lb.map_or(0.0, |v| v[i]);
            var.ub = ub.map_or(GRB_INFINITY, |v| v[i]);
            var.vtype = vtype.map_or(GRB_CONTINUOUS, |v| v[i]);
            if let Some(name) = name {
                var.name = name;
            }
            var
        })
        .collect();
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurobind_sys::GRB_OPTIMAL;
    use std::ffi::CString;

    fn started_env(stub: &Stub) -> *mut GRBenv {
        let mut env = ptr::null_mut();
        assert_eq!(unsafe { stub.load_env(&raw mut env, ptr::null()) }, 0);
        env
    }

    #[test]
    fn test_new_model_requires_started_env() {
        let stub = Stub::new();
        let mut env = ptr::null_mut();
        let mut model = ptr::null_mut();
        unsafe {
            assert_eq!(stub.empty_env(&raw mut env), 0);
            let status = stub.new_model(
                env,
                &raw mut model,
                ptr::null(),
                0,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            );
            assert_eq!(status, GRB_ERROR_ENVIRONMENT_NOT_STARTED);
            assert!(model.is_null());
            let message = CStr::from_ptr(stub.get_error_msg(env));
            assert!(message.to_string_lossy().contains("GRBnewmodel"));
            stub.free_env(env);
        }
    }

    #[test]
    fn test_model_env_is_a_copy() {
        let stub = Stub::new();
        let env = started_env(&stub);
        let mut model = ptr::null_mut();
        let threads = CString::new("Threads").unwrap();
        unsafe {
            let mut obj = [1.0, 2.0];
            let status = stub.new_model(
                env,
                &raw mut model,
                ptr::null(),
                2,
                obj.as_mut_ptr(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            );
            assert_eq!(status, 0);
            let model_env = stub.get_env(model);
            assert_eq!(stub.set_int_param(model_env, threads.as_ptr(), 2), 0);

            let mut value = -1;
            assert_eq!(stub.get_int_param(env, threads.as_ptr(), &raw mut value), 0);
            assert_eq!(value, 0);

            assert_eq!(stub.optimize(model), 0);
            let status_name = CString::new("Status").unwrap();
            let mut status = 0;
            assert_eq!(stub.get_int_attr(model, status_name.as_ptr(), &raw mut status), 0);
            assert_eq!(status, GRB_OPTIMAL);

            assert_eq!(stub.free_model(model), 0);
            stub.free_env(env);
        }
        assert_eq!(stub.live_models(), 0);
        assert_eq!(stub.live_envs(), 0);
    }

    #[test]
    fn test_split_compressed_rejects_decreasing_starts() {
        let ind = [0, 1, 2];
        let val = [1.0, 1.0, 1.0];
        assert_eq!(
            split_compressed(2, 3, &[2, 1], &ind, &val),
            Err(GRB_ERROR_INVALID_ARGUMENT)
        );
        let rows = split_compressed(2, 3, &[0, 1], &ind, &val).unwrap();
        assert_eq!(rows[1], vec![(1, 1.0), (2, 1.0)]);
    }
}
