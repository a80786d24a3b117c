//! Raw declarations of the Gurobi C API.
//!
//! Only the entry points used by `gurobind` are declared. Nothing here is
//! safe to call directly: every function takes raw pointers whose validity
//! the caller must guarantee. Linking is opt-in through the `link` feature,
//! which also enables the [`Gurobi`] implementation of [`NativeApi`].
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::ffi::{c_char, c_double, c_int};
use std::marker::{PhantomData, PhantomPinned};

mod api;

pub use api::{Gurobi, NativeApi};

/// Opaque Gurobi environment.
#[repr(C)]
pub struct GRBenv {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque Gurobi model.
#[repr(C)]
pub struct GRBmodel {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Size of the buffer `GRBgetstrparam` writes into, terminator included.
pub const GRB_MAX_STRLEN: usize = 512;
pub const GRB_MAX_NAMELEN: usize = 255;

pub const GRB_INFINITY: c_double = 1e100;
pub const GRB_UNDEFINED: c_double = 1e101;

pub const GRB_LESS_EQUAL: c_char = b'<' as c_char;
pub const GRB_GREATER_EQUAL: c_char = b'>' as c_char;
pub const GRB_EQUAL: c_char = b'=' as c_char;

pub const GRB_CONTINUOUS: c_char = b'C' as c_char;
pub const GRB_BINARY: c_char = b'B' as c_char;
pub const GRB_INTEGER: c_char = b'I' as c_char;
pub const GRB_SEMICONT: c_char = b'S' as c_char;
pub const GRB_SEMIINT: c_char = b'N' as c_char;

pub const GRB_MINIMIZE: c_int = 1;
pub const GRB_MAXIMIZE: c_int = -1;

// Optimization status codes (the `Status` attribute).
pub const GRB_LOADED: c_int = 1;
pub const GRB_OPTIMAL: c_int = 2;
pub const GRB_INFEASIBLE: c_int = 3;
pub const GRB_INF_OR_UNBD: c_int = 4;
pub const GRB_UNBOUNDED: c_int = 5;
pub const GRB_CUTOFF: c_int = 6;
pub const GRB_ITERATION_LIMIT: c_int = 7;
pub const GRB_NODE_LIMIT: c_int = 8;
pub const GRB_TIME_LIMIT: c_int = 9;
pub const GRB_SOLUTION_LIMIT: c_int = 10;
pub const GRB_INTERRUPTED: c_int = 11;
pub const GRB_NUMERIC: c_int = 12;
pub const GRB_SUBOPTIMAL: c_int = 13;
pub const GRB_INPROGRESS: c_int = 14;
pub const GRB_USER_OBJ_LIMIT: c_int = 15;
pub const GRB_WORK_LIMIT: c_int = 16;
pub const GRB_MEM_LIMIT: c_int = 17;

// Error codes returned by the C entry points.
pub const GRB_ERROR_OUT_OF_MEMORY: c_int = 10001;
pub const GRB_ERROR_NULL_ARGUMENT: c_int = 10002;
pub const GRB_ERROR_INVALID_ARGUMENT: c_int = 10003;
pub const GRB_ERROR_UNKNOWN_ATTRIBUTE: c_int = 10004;
pub const GRB_ERROR_DATA_NOT_AVAILABLE: c_int = 10005;
pub const GRB_ERROR_INDEX_OUT_OF_RANGE: c_int = 10006;
pub const GRB_ERROR_UNKNOWN_PARAMETER: c_int = 10007;
pub const GRB_ERROR_VALUE_OUT_OF_RANGE: c_int = 10008;
pub const GRB_ERROR_NO_LICENSE: c_int = 10009;
pub const GRB_ERROR_SIZE_LIMIT_EXCEEDED: c_int = 10010;
pub const GRB_ERROR_CALLBACK: c_int = 10011;
pub const GRB_ERROR_FILE_READ: c_int = 10012;
pub const GRB_ERROR_FILE_WRITE: c_int = 10013;
pub const GRB_ERROR_NUMERIC: c_int = 10014;
pub const GRB_ERROR_IIS_NOT_INFEASIBLE: c_int = 10015;
pub const GRB_ERROR_NOT_FOR_MIP: c_int = 10016;
pub const GRB_ERROR_OPTIMIZATION_IN_PROGRESS: c_int = 10017;
pub const GRB_ERROR_DUPLICATES: c_int = 10018;
pub const GRB_ERROR_NODEFILE: c_int = 10019;
pub const GRB_ERROR_Q_NOT_PSD: c_int = 10020;
pub const GRB_ERROR_NOT_SUPPORTED: c_int = 10024;
pub const GRB_ERROR_ENVIRONMENT_NOT_STARTED: c_int = 10029;

unsafe extern "C" {
    // Environment lifecycle.
    pub fn GRBemptyenv(envP: *mut *mut GRBenv) -> c_int;
    pub fn GRBstartenv(env: *mut GRBenv) -> c_int;
    pub fn GRBloadenv(envP: *mut *mut GRBenv, logfilename: *const c_char) -> c_int;
    pub fn GRBfreeenv(env: *mut GRBenv);
    pub fn GRBgetenv(model: *mut GRBmodel) -> *mut GRBenv;
    pub fn GRBgeterrormsg(env: *mut GRBenv) -> *const c_char;
    pub fn GRBversion(majorP: *mut c_int, minorP: *mut c_int, technicalP: *mut c_int);

    // Parameters.
    pub fn GRBsetintparam(env: *mut GRBenv, paramname: *const c_char, value: c_int) -> c_int;
    pub fn GRBgetintparam(env: *mut GRBenv, paramname: *const c_char, valueP: *mut c_int)
    -> c_int;
    pub fn GRBsetdblparam(env: *mut GRBenv, paramname: *const c_char, value: c_double)
    -> c_int;
    pub fn GRBgetdblparam(
        env: *mut GRBenv,
        paramname: *const c_char,
        valueP: *mut c_double,
    ) -> c_int;
    pub fn GRBsetstrparam(
        env: *mut GRBenv,
        paramname: *const c_char,
        value: *const c_char,
    ) -> c_int;
    /// `value` must point to at least [`GRB_MAX_STRLEN`] writable bytes.
    pub fn GRBgetstrparam(env: *mut GRBenv, paramname: *const c_char, value: *mut c_char)
    -> c_int;

    // Model lifecycle.
    pub fn GRBnewmodel(
        env: *mut GRBenv,
        modelP: *mut *mut GRBmodel,
        Pname: *const c_char,
        numvars: c_int,
        obj: *mut c_double,
        lb: *mut c_double,
        ub: *mut c_double,
        vtype: *mut c_char,
        varnames: *mut *mut c_char,
    ) -> c_int;
    pub fn GRBreadmodel(
        env: *mut GRBenv,
        filename: *const c_char,
        modelP: *mut *mut GRBmodel,
    ) -> c_int;
    pub fn GRBwrite(model: *mut GRBmodel, filename: *const c_char) -> c_int;
    pub fn GRBfreemodel(model: *mut GRBmodel) -> c_int;
    pub fn GRBupdatemodel(model: *mut GRBmodel) -> c_int;
    pub fn GRBoptimize(model: *mut GRBmodel) -> c_int;
    pub fn GRBcomputeIIS(model: *mut GRBmodel) -> c_int;

    // Structural mutation.
    pub fn GRBaddconstr(
        model: *mut GRBmodel,
        numnz: c_int,
        cind: *mut c_int,
        cval: *mut c_double,
        sense: c_char,
        rhs: c_double,
        constrname: *const c_char,
    ) -> c_int;
    pub fn GRBaddconstrs(
        model: *mut GRBmodel,
        numconstrs: c_int,
        numnz: c_int,
        cbeg: *mut c_int,
        cind: *mut c_int,
        cval: *mut c_double,
        sense: *mut c_char,
        rhs: *mut c_double,
        constrnames: *mut *mut c_char,
    ) -> c_int;
    pub fn GRBaddqconstr(
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
        QCname: *const c_char,
    ) -> c_int;
    pub fn GRBaddvar(
        model: *mut GRBmodel,
        numnz: c_int,
        vind: *mut c_int,
        vval: *mut c_double,
        obj: c_double,
        lb: c_double,
        ub: c_double,
        vtype: c_char,
        varname: *const c_char,
    ) -> c_int;
    pub fn GRBaddvars(
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
        varnames: *mut *mut c_char,
    ) -> c_int;
    pub fn GRBchgcoeffs(
        model: *mut GRBmodel,
        cnt: c_int,
        cind: *mut c_int,
        vind: *mut c_int,
        val: *mut c_double,
    ) -> c_int;
    pub fn GRBaddqpterms(
        model: *mut GRBmodel,
        numqnz: c_int,
        qrow: *mut c_int,
        qcol: *mut c_int,
        qval: *mut c_double,
    ) -> c_int;
    pub fn GRBsetobjectiven(
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
    ) -> c_int;

    // Integer attributes.
    pub fn GRBgetintattr(model: *mut GRBmodel, attrname: *const c_char, valueP: *mut c_int)
    -> c_int;
    pub fn GRBsetintattr(model: *mut GRBmodel, attrname: *const c_char, newvalue: c_int)
    -> c_int;
    pub fn GRBgetintattrelement(
        model: *mut GRBmodel,
        attrname: *const c_char,
        element: c_int,
        valueP: *mut c_int,
    ) -> c_int;
    pub fn GRBsetintattrelement(
        model: *mut GRBmodel,
        attrname: *const c_char,
        element: c_int,
        newvalue: c_int,
    ) -> c_int;
    pub fn GRBgetintattrarray(
        model: *mut GRBmodel,
        attrname: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_int,
    ) -> c_int;
    pub fn GRBsetintattrarray(
        model: *mut GRBmodel,
        attrname: *const c_char,
        first: c_int,
        len: c_int,
        newvalues: *mut c_int,
    ) -> c_int;
    pub fn GRBgetintattrlist(
        model: *mut GRBmodel,
        attrname: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_int,
    ) -> c_int;
    pub fn GRBsetintattrlist(
        model: *mut GRBmodel,
        attrname: *const c_char,
        len: c_int,
        ind: *mut c_int,
        newvalues: *mut c_int,
    ) -> c_int;

    // Floating-point attributes.
    pub fn GRBgetdblattr(
        model: *mut GRBmodel,
        attrname: *const c_char,
        valueP: *mut c_double,
    ) -> c_int;
    pub fn GRBsetdblattr(model: *mut GRBmodel, attrname: *const c_char, newvalue: c_double)
    -> c_int;
    pub fn GRBgetdblattrelement(
        model: *mut GRBmodel,
        attrname: *const c_char,
        element: c_int,
        valueP: *mut c_double,
    ) -> c_int;
    pub fn GRBsetdblattrelement(
        model: *mut GRBmodel,
        attrname: *const c_char,
        element: c_int,
        newvalue: c_double,
    ) -> c_int;
    pub fn GRBgetdblattrarray(
        model: *mut GRBmodel,
        attrname: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_double,
    ) -> c_int;
    pub fn GRBsetdblattrarray(
        model: *mut GRBmodel,
        attrname: *const c_char,
        first: c_int,
        len: c_int,
        newvalues: *mut c_double,
    ) -> c_int;
    pub fn GRBgetdblattrlist(
        model: *mut GRBmodel,
        attrname: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_double,
    ) -> c_int;
    pub fn GRBsetdblattrlist(
        model: *mut GRBmodel,
        attrname: *const c_char,
        len: c_int,
        ind: *mut c_int,
        newvalues: *mut c_double,
    ) -> c_int;

    // Character attributes (no scalar form).
    pub fn GRBgetcharattrelement(
        model: *mut GRBmodel,
        attrname: *const c_char,
        element: c_int,
        valueP: *mut c_char,
    ) -> c_int;
    pub fn GRBsetcharattrelement(
        model: *mut GRBmodel,
        attrname: *const c_char,
        element: c_int,
        newvalue: c_char,
    ) -> c_int;
    pub fn GRBgetcharattrarray(
        model: *mut GRBmodel,
        attrname: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_char,
    ) -> c_int;
    pub fn GRBsetcharattrarray(
        model: *mut GRBmodel,
        attrname: *const c_char,
        first: c_int,
        len: c_int,
        newvalues: *mut c_char,
    ) -> c_int;

    // String attributes. Returned strings are owned by the library and stay
    // valid only until the next call on the same model.
    pub fn GRBgetstrattr(
        model: *mut GRBmodel,
        attrname: *const c_char,
        valueP: *mut *mut c_char,
    ) -> c_int;
    pub fn GRBsetstrattr(
        model: *mut GRBmodel,
        attrname: *const c_char,
        newvalue: *const c_char,
    ) -> c_int;
    pub fn GRBgetstrattrelement(
        model: *mut GRBmodel,
        attrname: *const c_char,
        element: c_int,
        valueP: *mut *mut c_char,
    ) -> c_int;
    pub fn GRBsetstrattrelement(
        model: *mut GRBmodel,
        attrname: *const c_char,
        element: c_int,
        newvalue: *const c_char,
    ) -> c_int;
    pub fn GRBgetstrattrarray(
        model: *mut GRBmodel,
        attrname: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut *mut c_char,
    ) -> c_int;
    pub fn GRBsetstrattrarray(
        model: *mut GRBmodel,
        attrname: *const c_char,
        first: c_int,
        len: c_int,
        newvalues: *mut *mut c_char,
    ) -> c_int;
}
