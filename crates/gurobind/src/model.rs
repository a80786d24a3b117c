//! Owning handle for a native model and the operations that build it.
//!
//! Every operation validates all of its arguments first and only then makes
//! exactly one native call. Arguments that fail validation are reported as
//! [`Error::InvalidArgument`] naming the argument, in `operation:argument`
//! form (`"add_constr:val"`) or, for compressed matrices, as
//! `"compressed.beg"`, `"compressed.ind"` and `"compressed.val"`.

use crate::buffer::{Buffer, ptr_or_null, require, require_opt};
use crate::env::Environment;
use crate::error::{Error, NativeError, Result};
use crate::memory::{self, CallFootprint};
use crate::outcome::{check, preflight, to_c_int};
use crate::params;
use crate::strings::{
    NativeStrings, opt_array_ptr, opt_c_string, opt_native, opt_ptr, path_c_string,
};
use gurobind_sys::{
    GRB_BINARY, GRB_CONTINUOUS, GRB_EQUAL, GRB_GREATER_EQUAL, GRB_INTEGER, GRB_LESS_EQUAL,
    GRB_SEMICONT, GRB_SEMIINT, GRBenv, GRBmodel, NativeApi,
};
use std::ffi::{CString, c_char, c_int};
use std::fmt;
use std::path::Path;
use std::ptr::{self, NonNull};
use tracing::{Level, debug, warn};

/// Constraint sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl Sense {
    pub fn as_char(self) -> c_char {
        match self {
            Sense::LessEqual => GRB_LESS_EQUAL,
            Sense::GreaterEqual => GRB_GREATER_EQUAL,
            Sense::Equal => GRB_EQUAL,
        }
    }
}

/// Variable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Continuous,
    Binary,
    Integer,
    SemiContinuous,
    SemiInteger,
}

impl VarType {
    pub fn as_char(self) -> c_char {
        match self {
            VarType::Continuous => GRB_CONTINUOUS,
            VarType::Binary => GRB_BINARY,
            VarType::Integer => GRB_INTEGER,
            VarType::SemiContinuous => GRB_SEMICONT,
            VarType::SemiInteger => GRB_SEMIINT,
        }
    }
}

/// Compressed sparse rows (or columns) of a coefficient matrix.
///
/// Row `i` owns entries `beg[i]..beg[i + 1]` of `ind`/`val`; the last row
/// runs to `numnz`.
#[derive(Debug, Clone)]
pub struct Compressed<'b> {
    pub numnz: usize,
    pub beg: Buffer<'b>,
    pub ind: Buffer<'b>,
    pub val: Buffer<'b>,
}

impl<'b> Compressed<'b> {
    pub fn new(
        numnz: usize,
        beg: impl Into<Buffer<'b>>,
        ind: impl Into<Buffer<'b>>,
        val: impl Into<Buffer<'b>>,
    ) -> Self {
        Self {
            numnz,
            beg: beg.into(),
            ind: ind.into(),
            val: val.into(),
        }
    }

    fn validate(&self, count: usize) -> Result<RawCompressed<'b>> {
        let numnz = to_c_int(self.numnz, "compressed.numnz")?;
        let beg = require::<i32>(&self.beg, count, "compressed.beg")?;
        let ind = require::<i32>(&self.ind, self.numnz, "compressed.ind")?;
        let val = require::<f64>(&self.val, self.numnz, "compressed.val")?;
        let mut previous = 0;
        for (row, start) in beg[..count].iter().enumerate() {
            if *start < previous || *start > numnz {
                return Err(Error::invalid(
                    "compressed.beg",
                    format!(
                        "offset {start} at position {row} is out of order or past numnz {numnz}"
                    ),
                ));
            }
            previous = *start;
        }
        Ok(RawCompressed {
            numnz,
            beg,
            ind,
            val,
        })
    }
}

struct RawCompressed<'b> {
    numnz: c_int,
    beg: &'b [i32],
    ind: &'b [i32],
    val: &'b [f64],
}

/// `(numnz, beg, ind, val)` for an optional matrix; absent means no coefficients.
fn compressed_args(
    matrix: Option<&RawCompressed<'_>>,
) -> (c_int, *mut c_int, *mut c_int, *mut f64) {
    match matrix {
        Some(m) => (
            m.numnz,
            m.beg.as_ptr().cast_mut(),
            m.ind.as_ptr().cast_mut(),
            m.val.as_ptr().cast_mut(),
        ),
        None => (0, ptr::null_mut(), ptr::null_mut(), ptr::null_mut()),
    }
}

/// Sparse linear terms: `numnz` index/value pairs.
#[derive(Debug, Clone)]
pub struct SparseTerms<'b> {
    pub numnz: usize,
    pub ind: Buffer<'b>,
    pub val: Buffer<'b>,
}

impl<'b> SparseTerms<'b> {
    pub fn new(numnz: usize, ind: impl Into<Buffer<'b>>, val: impl Into<Buffer<'b>>) -> Self {
        Self {
            numnz,
            ind: ind.into(),
            val: val.into(),
        }
    }

    fn validate(&self, operation: &str) -> Result<RawTerms<'b>> {
        let numnz = to_c_int(self.numnz, &format!("{operation}:numnz"))?;
        let ind = require::<i32>(&self.ind, self.numnz, &format!("{operation}:ind"))?;
        let val = require::<f64>(&self.val, self.numnz, &format!("{operation}:val"))?;
        Ok((numnz, ind, val))
    }
}

/// Quadratic terms: `numqnz` `(row, col, val)` triples.
#[derive(Debug, Clone)]
pub struct QuadTerms<'b> {
    pub numqnz: usize,
    pub row: Buffer<'b>,
    pub col: Buffer<'b>,
    pub val: Buffer<'b>,
}

impl<'b> QuadTerms<'b> {
    pub fn new(
        numqnz: usize,
        row: impl Into<Buffer<'b>>,
        col: impl Into<Buffer<'b>>,
        val: impl Into<Buffer<'b>>,
    ) -> Self {
        Self {
            numqnz,
            row: row.into(),
            col: col.into(),
            val: val.into(),
        }
    }

    fn validate(&self, operation: &str) -> Result<RawQuad<'b>> {
        let numqnz = to_c_int(self.numqnz, &format!("{operation}:numqnz"))?;
        let row = require::<i32>(&self.row, self.numqnz, &format!("{operation}:qrow"))?;
        let col = require::<i32>(&self.col, self.numqnz, &format!("{operation}:qcol"))?;
        let val = require::<f64>(&self.val, self.numqnz, &format!("{operation}:qval"))?;
        Ok((numqnz, row, col, val))
    }
}

/// Per-variable arrays for bulk variable creation. Every field is optional;
/// an absent array takes the library's defaults.
#[derive(Debug, Clone, Default)]
pub struct VarData<'b> {
    pub obj: Option<Buffer<'b>>,
    pub lb: Option<Buffer<'b>>,
    pub ub: Option<Buffer<'b>>,
    pub vtype: Option<Buffer<'b>>,
    pub names: Option<&'b [&'b str]>,
}

struct RawVarData<'b> {
    obj: Option<&'b [f64]>,
    lb: Option<&'b [f64]>,
    ub: Option<&'b [f64]>,
    vtype: Option<&'b [c_char]>,
    names: Option<NativeStrings>,
}

impl<'b> VarData<'b> {
    fn validate(&self, count: usize, operation: &str) -> Result<RawVarData<'b>> {
        Ok(RawVarData {
            obj: require_opt(self.obj.as_ref(), count, &format!("{operation}:obj"))?,
            lb: require_opt(self.lb.as_ref(), count, &format!("{operation}:lb"))?,
            ub: require_opt(self.ub.as_ref(), count, &format!("{operation}:ub"))?,
            vtype: require_opt(self.vtype.as_ref(), count, &format!("{operation}:vtype"))?,
            names: opt_native(self.names, count, &format!("{operation}:names"))?,
        })
    }
}

type RawTerms<'b> = (c_int, &'b [i32], &'b [f64]);
type RawQuad<'b> = (c_int, &'b [i32], &'b [i32], &'b [f64]);

fn validate_new_model<'b>(
    name: Option<&str>,
    num_vars: usize,
    vars: &VarData<'b>,
) -> Result<(Option<CString>, c_int, RawVarData<'b>)> {
    Ok((
        opt_c_string(name, "new_model:name")?,
        to_c_int(num_vars, "new_model:num_vars")?,
        vars.validate(num_vars, "new_model")?,
    ))
}

type RawConstrs<'b> = (
    c_int,
    Option<RawCompressed<'b>>,
    &'b [c_char],
    &'b [f64],
    Option<NativeStrings>,
);

fn validate_constrs<'b>(
    num: usize,
    matrix: Option<&Compressed<'b>>,
    sense: &Buffer<'b>,
    rhs: &Buffer<'b>,
    names: Option<&[&str]>,
) -> Result<RawConstrs<'b>> {
    Ok((
        to_c_int(num, "add_constrs:num")?,
        matrix.map(|m| m.validate(num)).transpose()?,
        require::<c_char>(sense, num, "add_constrs:sense")?,
        require::<f64>(rhs, num, "add_constrs:rhs")?,
        opt_native(names, num, "add_constrs:names")?,
    ))
}

fn validate_qconstr<'b>(
    linear: Option<&SparseTerms<'b>>,
    quad: &QuadTerms<'b>,
    name: Option<&str>,
) -> Result<(Option<RawTerms<'b>>, RawQuad<'b>, Option<CString>)> {
    const OP: &str = "add_qconstr";
    Ok((
        linear.map(|terms| terms.validate(OP)).transpose()?,
        quad.validate(OP)?,
        opt_c_string(name, "add_qconstr:name")?,
    ))
}

fn validate_vars<'b>(
    num: usize,
    matrix: Option<&Compressed<'b>>,
    vars: &VarData<'b>,
) -> Result<(c_int, Option<RawCompressed<'b>>, RawVarData<'b>)> {
    Ok((
        to_c_int(num, "add_vars:num")?,
        matrix.map(|m| m.validate(num)).transpose()?,
        vars.validate(num, "add_vars")?,
    ))
}

fn validate_coeffs<'b>(
    cnt: usize,
    cind: &Buffer<'b>,
    vind: &Buffer<'b>,
    val: &Buffer<'b>,
) -> Result<(c_int, &'b [i32], &'b [i32], &'b [f64])> {
    Ok((
        to_c_int(cnt, "chg_coeffs:cnt")?,
        require::<i32>(cind, cnt, "chg_coeffs:cind")?,
        require::<i32>(vind, cnt, "chg_coeffs:vind")?,
        require::<f64>(val, cnt, "chg_coeffs:val")?,
    ))
}

/// One objective of a multi-objective model.
#[derive(Debug, Clone)]
pub struct MultiObjective<'b> {
    pub index: usize,
    pub priority: i32,
    pub weight: f64,
    pub abstol: f64,
    pub reltol: f64,
    pub name: Option<&'b str>,
    pub constant: f64,
    pub terms: SparseTerms<'b>,
}

impl<'b> MultiObjective<'b> {
    fn validate(&self) -> Result<(c_int, RawTerms<'b>, Option<CString>)> {
        const OP: &str = "set_objective_n";
        Ok((
            to_c_int(self.index, "set_objective_n:index")?,
            self.terms.validate(OP)?,
            opt_c_string(self.name, "set_objective_n:name")?,
        ))
    }
}

/// Exclusive owner of one native model.
///
/// The model borrows the [`Environment`] it was created from, so the
/// environment outlives it. Dropping the model frees the model only.
pub struct Model<'env, A: NativeApi> {
    ptr: NonNull<GRBmodel>,
    env: &'env Environment<A>,
}

impl<'env, A: NativeApi> Model<'env, A> {
    /// Create a model with `num_vars` variables (`GRBnewmodel`).
    ///
    /// Each array in `vars` that is present must hold at least `num_vars`
    /// elements; names, when given, exactly `num_vars`.
    pub fn new(
        env: &'env Environment<A>,
        name: Option<&str>,
        num_vars: usize,
        vars: VarData<'_>,
    ) -> Result<Self> {
        const OP: &str = "new_model";
        let (c_name, numvars, mut raw) = preflight(OP, validate_new_model(name, num_vars, &vars))?;
        let mut model: *mut GRBmodel = ptr::null_mut();
        let status = unsafe {
            env.api().new_model(
                env.as_ptr(),
                &raw mut model,
                opt_ptr(&c_name),
                numvars,
                ptr_or_null(raw.obj),
                ptr_or_null(raw.lb),
                ptr_or_null(raw.ub),
                ptr_or_null(raw.vtype),
                opt_array_ptr(&mut raw.names),
            )
        };
        check(status, OP)?;
        let ptr = NonNull::new(model).ok_or(Error::Native(NativeError::NULL_HANDLE))?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            num_vars,
            "Created model"
        );
        Ok(Self { ptr, env })
    }

    /// Load a model from a file (`GRBreadmodel`).
    ///
    /// Returns `Ok(None)` without calling the library when `path` does not
    /// exist.
    pub fn read(env: &'env Environment<A>, path: impl AsRef<Path>) -> Result<Option<Self>> {
        const OP: &str = "read_model";
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                component = "model",
                operation = OP,
                status = "missing",
                path = %path.display(),
                "Model file does not exist"
            );
            return Ok(None);
        }
        let c_path = preflight(OP, path_c_string(path, "read_model:path"))?;
        let mut model: *mut GRBmodel = ptr::null_mut();
        check(
            unsafe { env.api().read_model(env.as_ptr(), c_path.as_ptr(), &raw mut model) },
            OP,
        )?;
        let ptr = NonNull::new(model).ok_or(Error::Native(NativeError::NULL_HANDLE))?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            path = %path.display(),
            "Loaded model"
        );
        Ok(Some(Self { ptr, env }))
    }

    /// The environment this model was created from.
    pub fn environment(&self) -> &'env Environment<A> {
        self.env
    }

    pub(crate) fn api(&self) -> &'env A {
        self.env.api()
    }

    pub(crate) fn as_ptr(&self) -> *mut GRBmodel {
        self.ptr.as_ptr()
    }

    /// The model's own copy of its environment, where model parameters live.
    ///
    /// # Panics
    ///
    /// Panics if the library reports no environment for a live model.
    fn native_env(&self) -> *mut GRBenv {
        let env = unsafe { self.api().get_env(self.as_ptr()) };
        assert!(!env.is_null(), "native model has no environment");
        env
    }

    /// Add `num` linear constraints (`GRBaddconstrs`).
    ///
    /// With `matrix` absent the constraints have no coefficients yet.
    pub fn add_constrs<'b>(
        &mut self,
        num: usize,
        matrix: Option<Compressed<'b>>,
        sense: impl Into<Buffer<'b>>,
        rhs: impl Into<Buffer<'b>>,
        names: Option<&[&str]>,
    ) -> Result<()> {
        const OP: &str = "add_constrs";
        let sense = sense.into();
        let rhs = rhs.into();
        let (numconstrs, matrix, sense, rhs, mut names) = preflight(
            OP,
            validate_constrs(num, matrix.as_ref(), &sense, &rhs, names),
        )?;
        let (numnz, beg, ind, val) = compressed_args(matrix.as_ref());
        let status = unsafe {
            self.api().add_constrs(
                self.as_ptr(),
                numconstrs,
                numnz,
                beg,
                ind,
                val,
                sense.as_ptr().cast_mut(),
                rhs.as_ptr().cast_mut(),
                opt_array_ptr(&mut names),
            )
        };
        check(status, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            num,
            numnz,
            "Added constraints"
        );
        Ok(())
    }

    /// Add one linear constraint (`GRBaddconstr`).
    pub fn add_constr(
        &mut self,
        terms: SparseTerms<'_>,
        sense: Sense,
        rhs: f64,
        name: Option<&str>,
    ) -> Result<()> {
        const OP: &str = "add_constr";
        let ((numnz, ind, val), c_name) = preflight(
            OP,
            terms
                .validate(OP)
                .and_then(|raw| Ok((raw, opt_c_string(name, "add_constr:name")?))),
        )?;
        let status = unsafe {
            self.api().add_constr(
                self.as_ptr(),
                numnz,
                ind.as_ptr().cast_mut(),
                val.as_ptr().cast_mut(),
                sense.as_char(),
                rhs,
                opt_ptr(&c_name),
            )
        };
        check(status, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            numnz,
            "Added constraint"
        );
        Ok(())
    }

    /// Add one quadratic constraint (`GRBaddqconstr`).
    pub fn add_qconstr(
        &mut self,
        linear: Option<SparseTerms<'_>>,
        quad: QuadTerms<'_>,
        sense: Sense,
        rhs: f64,
        name: Option<&str>,
    ) -> Result<()> {
        const OP: &str = "add_qconstr";
        let (linear, (numqnz, qrow, qcol, qval), c_name) =
            preflight(OP, validate_qconstr(linear.as_ref(), &quad, name))?;
        let (numlnz, lind, lval) = match linear {
            Some((numnz, ind, val)) => (numnz, ind.as_ptr().cast_mut(), val.as_ptr().cast_mut()),
            None => (0, ptr::null_mut(), ptr::null_mut()),
        };
        let status = unsafe {
            self.api().add_qconstr(
                self.as_ptr(),
                numlnz,
                lind,
                lval,
                numqnz,
                qrow.as_ptr().cast_mut(),
                qcol.as_ptr().cast_mut(),
                qval.as_ptr().cast_mut(),
                sense.as_char(),
                rhs,
                opt_ptr(&c_name),
            )
        };
        check(status, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            numlnz,
            numqnz,
            "Added quadratic constraint"
        );
        Ok(())
    }

    /// Add `num` variables (`GRBaddvars`), with optional column coefficients.
    pub fn add_vars(
        &mut self,
        num: usize,
        matrix: Option<Compressed<'_>>,
        vars: VarData<'_>,
    ) -> Result<()> {
        const OP: &str = "add_vars";
        let (numvars, matrix, mut raw) = preflight(OP, validate_vars(num, matrix.as_ref(), &vars))?;
        let (numnz, beg, ind, val) = compressed_args(matrix.as_ref());
        let status = unsafe {
            self.api().add_vars(
                self.as_ptr(),
                numvars,
                numnz,
                beg,
                ind,
                val,
                ptr_or_null(raw.obj),
                ptr_or_null(raw.lb),
                ptr_or_null(raw.ub),
                ptr_or_null(raw.vtype),
                opt_array_ptr(&mut raw.names),
            )
        };
        check(status, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            num,
            numnz,
            "Added variables"
        );
        Ok(())
    }

    /// Add one variable (`GRBaddvar`); `column` holds its constraint coefficients.
    pub fn add_var(
        &mut self,
        column: SparseTerms<'_>,
        obj: f64,
        lb: f64,
        ub: f64,
        vtype: VarType,
        name: Option<&str>,
    ) -> Result<()> {
        const OP: &str = "add_var";
        let ((numnz, ind, val), c_name) = preflight(
            OP,
            column
                .validate(OP)
                .and_then(|raw| Ok((raw, opt_c_string(name, "add_var:name")?))),
        )?;
        let status = unsafe {
            self.api().add_var(
                self.as_ptr(),
                numnz,
                ind.as_ptr().cast_mut(),
                val.as_ptr().cast_mut(),
                obj,
                lb,
                ub,
                vtype.as_char(),
                opt_ptr(&c_name),
            )
        };
        check(status, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            numnz,
            "Added variable"
        );
        Ok(())
    }

    /// Change `cnt` coefficients (`GRBchgcoeffs`).
    pub fn chg_coeffs<'b>(
        &mut self,
        cnt: usize,
        cind: impl Into<Buffer<'b>>,
        vind: impl Into<Buffer<'b>>,
        val: impl Into<Buffer<'b>>,
    ) -> Result<()> {
        const OP: &str = "chg_coeffs";
        let (cind, vind, val) = (cind.into(), vind.into(), val.into());
        let (count, cind, vind, val) = preflight(OP, validate_coeffs(cnt, &cind, &vind, &val))?;
        let status = unsafe {
            self.api().chg_coeffs(
                self.as_ptr(),
                count,
                cind.as_ptr().cast_mut(),
                vind.as_ptr().cast_mut(),
                val.as_ptr().cast_mut(),
            )
        };
        check(status, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            cnt,
            "Changed coefficients"
        );
        Ok(())
    }

    /// Add quadratic objective terms (`GRBaddqpterms`).
    pub fn add_qp_terms(&mut self, terms: QuadTerms<'_>) -> Result<()> {
        const OP: &str = "add_qp_terms";
        let (numqnz, row, col, val) = preflight(OP, terms.validate(OP))?;
        let status = unsafe {
            self.api().add_qp_terms(
                self.as_ptr(),
                numqnz,
                row.as_ptr().cast_mut(),
                col.as_ptr().cast_mut(),
                val.as_ptr().cast_mut(),
            )
        };
        check(status, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            numqnz,
            "Added quadratic objective terms"
        );
        Ok(())
    }

    /// Configure one objective of a multi-objective model (`GRBsetobjectiven`).
    pub fn set_objective_n(&mut self, objective: MultiObjective<'_>) -> Result<()> {
        const OP: &str = "set_objective_n";
        let (index, (lnz, lind, lval), c_name) = preflight(OP, objective.validate())?;
        let status = unsafe {
            self.api().set_objective_n(
                self.as_ptr(),
                index,
                objective.priority,
                objective.weight,
                objective.abstol,
                objective.reltol,
                opt_ptr(&c_name),
                objective.constant,
                lnz,
                lind.as_ptr().cast_mut(),
                lval.as_ptr().cast_mut(),
            )
        };
        check(status, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            index,
            priority = objective.priority,
            "Set objective"
        );
        Ok(())
    }

    /// Apply pending modifications (`GRBupdatemodel`).
    pub fn update(&mut self) -> Result<()> {
        check(unsafe { self.api().update_model(self.as_ptr()) }, "update_model")
    }

    /// Solve the model (`GRBoptimize`). Blocks until the library returns.
    ///
    /// With debug logging on, the completion event carries the solve's
    /// [`CallFootprint`].
    pub fn optimize(&mut self) -> Result<()> {
        self.solve(tracing::enabled!(Level::DEBUG)).map(|_| ())
    }

    /// Solve the model and return the process footprint of the native solve.
    ///
    /// The footprint is `None` only when the process RSS cannot be read.
    pub fn optimize_measured(&mut self) -> Result<Option<CallFootprint>> {
        self.solve(true)
    }

    fn solve(&mut self, measured: bool) -> Result<Option<CallFootprint>> {
        const OP: &str = "optimize";
        let api = self.api();
        let model = self.as_ptr();
        let (status, footprint) = memory::measure(OP, measured, || unsafe { api.optimize(model) });
        check(status, OP)?;
        match &footprint {
            Some(footprint) => debug!(
                component = "model",
                operation = OP,
                status = "success",
                rss_before = footprint.rss_before,
                rss_after = footprint.rss_after,
                rss_delta = footprint.rss_delta(),
                duration_ms = footprint.elapsed.as_millis() as u64,
                "Optimization finished"
            ),
            None => debug!(
                component = "model",
                operation = OP,
                status = "success",
                "Optimization finished"
            ),
        }
        Ok(footprint)
    }

    /// Write the model, or its solution, to `path` (`GRBwrite`).
    ///
    /// The file format follows the extension.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        const OP: &str = "write";
        let path = path.as_ref();
        let c_path = preflight(OP, path_c_string(path, "write:path"))?;
        check(unsafe { self.api().write(self.as_ptr(), c_path.as_ptr()) }, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            path = %path.display(),
            "Wrote model"
        );
        Ok(())
    }

    /// Compute an irreducible inconsistent subsystem (`GRBcomputeIIS`).
    pub fn compute_iis(&mut self) -> Result<()> {
        const OP: &str = "compute_iis";
        check(unsafe { self.api().compute_iis(self.as_ptr()) }, OP)?;
        debug!(
            component = "model",
            operation = OP,
            status = "success",
            "Computed IIS"
        );
        Ok(())
    }

    pub fn set_int_param(&self, name: &str, value: i32) -> Result<()> {
        params::set_int(self.api(), self.native_env(), name, value)
    }

    pub fn get_int_param(&self, name: &str) -> Result<i32> {
        params::get_int(self.api(), self.native_env(), name)
    }

    pub fn set_float_param(&self, name: &str, value: f64) -> Result<()> {
        params::set_float(self.api(), self.native_env(), name, value)
    }

    pub fn get_float_param(&self, name: &str) -> Result<f64> {
        params::get_float(self.api(), self.native_env(), name)
    }

    pub fn set_str_param(&self, name: &str, value: &str) -> Result<()> {
        params::set_str(self.api(), self.native_env(), name, value)
    }

    pub fn get_str_param(&self, name: &str) -> Result<String> {
        params::get_str(self.api(), self.native_env(), name)
    }
}

impl<A: NativeApi> fmt::Debug for Model<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model").field("ptr", &self.ptr).finish()
    }
}

impl<A: NativeApi> Drop for Model<'_, A> {
    fn drop(&mut self) {
        let status = unsafe { self.api().free_model(self.as_ptr()) };
        if status != 0 {
            warn!(
                component = "model",
                operation = "free_model",
                status = "error",
                status_code = status,
                "Failed to release model"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ModelStatus;
    use gurobind_sys::{GRB_ERROR_ENVIRONMENT_NOT_STARTED, GRB_ERROR_NUMERIC};
    use gurobind_testkit::Stub;

    fn started() -> (Stub, Environment<Stub>) {
        let stub = Stub::new();
        let env = Environment::new(stub.clone(), None).unwrap();
        (stub, env)
    }

    #[test]
    fn test_new_model_validates_arrays_against_count() {
        let (stub, env) = started();
        stub.clear_calls();
        let lb = [0.0];
        let err = Model::new(
            &env,
            None,
            2,
            VarData {
                lb: Some(Buffer::from(&lb)),
                ..VarData::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.param(), Some("new_model:lb"));
        assert_eq!(stub.call_count("GRBnewmodel"), 0);
    }

    #[test]
    fn test_names_must_match_count() {
        let (stub, env) = started();
        let names = ["x"];
        let err = Model::new(
            &env,
            Some("m"),
            2,
            VarData {
                names: Some(&names),
                ..VarData::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.param(), Some("new_model:names"));
        assert_eq!(stub.call_count("GRBnewmodel"), 0);
    }

    #[test]
    fn test_unstarted_env_surfaces_native_code() {
        let stub = Stub::new();
        let env = Environment::empty(stub.clone()).unwrap();
        let err = Model::new(&env, None, 0, VarData::default()).unwrap_err();
        assert_eq!(err.native_code(), Some(GRB_ERROR_ENVIRONMENT_NOT_STARTED));
    }

    #[test]
    fn test_beg_past_numnz_is_rejected() {
        let (stub, env) = started();
        let mut model = Model::new(&env, None, 2, VarData::default()).unwrap();
        stub.clear_calls();
        let beg = [0_i32, 3];
        let ind = [0_i32, 1];
        let val = [1.0, 1.0];
        let sense = [GRB_LESS_EQUAL; 2];
        let rhs = [1.0, 1.0];
        let err = model
            .add_constrs(2, Some(Compressed::new(2, &beg, &ind, &val)), &sense, &rhs, None)
            .unwrap_err();
        assert_eq!(err.param(), Some("compressed.beg"));
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn test_model_params_use_model_env() {
        let (_stub, env) = started();
        let model = Model::new(&env, None, 0, VarData::default()).unwrap();
        model.set_int_param("Threads", 2).unwrap();
        assert_eq!(model.get_int_param("Threads"), Ok(2));
        assert_eq!(env.get_int_param("Threads"), Ok(0));
    }

    #[test]
    fn test_optimize_measured_reports_footprint() {
        let (stub, env) = started();
        let mut model = Model::new(&env, None, 1, VarData::default()).unwrap();
        let footprint = model.optimize_measured().unwrap().expect("footprint");
        assert_eq!(footprint.operation, "optimize");
        assert!(footprint.rss_after > 0);
        assert_eq!(model.status(), Ok(ModelStatus::Optimal));

        stub.fail_next(GRB_ERROR_NUMERIC);
        let err = model.optimize_measured().unwrap_err();
        assert_eq!(err.native_code(), Some(GRB_ERROR_NUMERIC));
        assert_eq!(stub.call_count("GRBoptimize"), 2);
    }

    #[test]
    #[should_panic(expected = "native model has no environment")]
    fn test_null_model_env_is_fatal() {
        let (stub, env) = started();
        let model = Model::new(&env, None, 0, VarData::default()).unwrap();
        stub.null_env_next();
        let _ = model.get_int_param("Threads");
    }

    #[test]
    fn test_quadratic_terms_validated_per_array() {
        let (_stub, env) = started();
        let mut model = Model::new(&env, None, 2, VarData::default()).unwrap();
        let row = [0_i32, 1];
        let col = [0_i32];
        let val = [1.0, 1.0];
        let err = model
            .add_qp_terms(QuadTerms::new(2, &row, &col, &val))
            .unwrap_err();
        assert_eq!(err.param(), Some("add_qp_terms:qcol"));
        model
            .add_qp_terms(QuadTerms::new(1, &row, &col, &val))
            .unwrap();
    }
}
