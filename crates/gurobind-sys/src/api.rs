//! The native call boundary as a trait.
//!
//! [`NativeApi`] has one method per C entry point, with the same argument
//! list. [`Gurobi`] forwards every method to the linked library; test
//! doubles implement the trait to stand in for it.

use crate::{GRBenv, GRBmodel};
use std::ffi::{c_char, c_double, c_int};

/// Handle to the Gurobi shared library linked into the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gurobi;

macro_rules! native_api {
    ($(
        $(#[$meta:meta])*
        fn $method:ident => $symbol:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)?;
    )*) => {
        /// Every C entry point the binding calls.
        ///
        /// # Safety
        ///
        /// Implementors must honour the C contract of the matching Gurobi
        /// function: out-parameters are written only on success, handles stay
        /// valid until their free function runs, and array arguments are read
        /// only within the lengths passed alongside them. Callers must pass
        /// pointers that satisfy those same contracts.
        pub unsafe trait NativeApi: Clone {
            $(
                $(#[$meta])*
                #[allow(clippy::too_many_arguments)]
                unsafe fn $method(&self, $($arg: $ty),*) $(-> $ret)?;
            )*
        }

        #[cfg(feature = "link")]
        unsafe impl NativeApi for Gurobi {
            $(
                #[inline]
                #[allow(clippy::too_many_arguments)]
                unsafe fn $method(&self, $($arg: $ty),*) $(-> $ret)? {
                    unsafe { crate::$symbol($($arg),*) }
                }
            )*
        }
    };
}

native_api! {
    fn empty_env => GRBemptyenv(env_p: *mut *mut GRBenv) -> c_int;
    fn start_env => GRBstartenv(env: *mut GRBenv) -> c_int;
    fn load_env => GRBloadenv(env_p: *mut *mut GRBenv, logfilename: *const c_char) -> c_int;
    fn free_env => GRBfreeenv(env: *mut GRBenv);
    fn get_env => GRBgetenv(model: *mut GRBmodel) -> *mut GRBenv;
    fn get_error_msg => GRBgeterrormsg(env: *mut GRBenv) -> *const c_char;
    fn version => GRBversion(major: *mut c_int, minor: *mut c_int, technical: *mut c_int);

    fn set_int_param => GRBsetintparam(
        env: *mut GRBenv,
        name: *const c_char,
        value: c_int,
    ) -> c_int;
    fn get_int_param => GRBgetintparam(
        env: *mut GRBenv,
        name: *const c_char,
        value_p: *mut c_int,
    ) -> c_int;
    fn set_dbl_param => GRBsetdblparam(
        env: *mut GRBenv,
        name: *const c_char,
        value: c_double,
    ) -> c_int;
    fn get_dbl_param => GRBgetdblparam(
        env: *mut GRBenv,
        name: *const c_char,
        value_p: *mut c_double,
    ) -> c_int;
    fn set_str_param => GRBsetstrparam(
        env: *mut GRBenv,
        name: *const c_char,
        value: *const c_char,
    ) -> c_int;
    /// `value` must point to at least `GRB_MAX_STRLEN` writable bytes.
    fn get_str_param => GRBgetstrparam(
        env: *mut GRBenv,
        name: *const c_char,
        value: *mut c_char,
    ) -> c_int;

    fn new_model => GRBnewmodel(
        env: *mut GRBenv,
        model_p: *mut *mut GRBmodel,
        name: *const c_char,
        numvars: c_int,
        obj: *mut c_double,
        lb: *mut c_double,
        ub: *mut c_double,
        vtype: *mut c_char,
        varnames: *mut *mut c_char,
    ) -> c_int;
    fn read_model => GRBreadmodel(
        env: *mut GRBenv,
        filename: *const c_char,
        model_p: *mut *mut GRBmodel,
    ) -> c_int;
    fn write => GRBwrite(model: *mut GRBmodel, filename: *const c_char) -> c_int;
    fn free_model => GRBfreemodel(model: *mut GRBmodel) -> c_int;
    fn update_model => GRBupdatemodel(model: *mut GRBmodel) -> c_int;
    fn optimize => GRBoptimize(model: *mut GRBmodel) -> c_int;
    fn compute_iis => GRBcomputeIIS(model: *mut GRBmodel) -> c_int;

    fn add_constr => GRBaddconstr(
        model: *mut GRBmodel,
        numnz: c_int,
        cind: *mut c_int,
        cval: *mut c_double,
        sense: c_char,
        rhs: c_double,
        name: *const c_char,
    ) -> c_int;
    fn add_constrs => GRBaddconstrs(
        model: *mut GRBmodel,
        numconstrs: c_int,
        numnz: c_int,
        cbeg: *mut c_int,
        cind: *mut c_int,
        cval: *mut c_double,
        sense: *mut c_char,
        rhs: *mut c_double,
        names: *mut *mut c_char,
    ) -> c_int;
    fn add_qconstr => GRBaddqconstr(
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
    ) -> c_int;
    fn add_var => GRBaddvar(
        model: *mut GRBmodel,
        numnz: c_int,
        vind: *mut c_int,
        vval: *mut c_double,
        obj: c_double,
        lb: c_double,
        ub: c_double,
        vtype: c_char,
        name: *const c_char,
    ) -> c_int;
    fn add_vars => GRBaddvars(
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
        names: *mut *mut c_char,
    ) -> c_int;
    fn chg_coeffs => GRBchgcoeffs(
        model: *mut GRBmodel,
        cnt: c_int,
        cind: *mut c_int,
        vind: *mut c_int,
        val: *mut c_double,
    ) -> c_int;
    fn add_qp_terms => GRBaddqpterms(
        model: *mut GRBmodel,
        numqnz: c_int,
        qrow: *mut c_int,
        qcol: *mut c_int,
        qval: *mut c_double,
    ) -> c_int;
    fn set_objective_n => GRBsetobjectiven(
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

    fn get_int_attr => GRBgetintattr(
        model: *mut GRBmodel,
        name: *const c_char,
        value_p: *mut c_int,
    ) -> c_int;
    fn set_int_attr => GRBsetintattr(
        model: *mut GRBmodel,
        name: *const c_char,
        value: c_int,
    ) -> c_int;
    fn get_int_attr_element => GRBgetintattrelement(
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value_p: *mut c_int,
    ) -> c_int;
    fn set_int_attr_element => GRBsetintattrelement(
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value: c_int,
    ) -> c_int;
    fn get_int_attr_array => GRBgetintattrarray(
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_int,
    ) -> c_int;
    fn set_int_attr_array => GRBsetintattrarray(
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_int,
    ) -> c_int;
    fn get_int_attr_list => GRBgetintattrlist(
        model: *mut GRBmodel,
        name: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_int,
    ) -> c_int;
    fn set_int_attr_list => GRBsetintattrlist(
        model: *mut GRBmodel,
        name: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_int,
    ) -> c_int;

    fn get_dbl_attr => GRBgetdblattr(
        model: *mut GRBmodel,
        name: *const c_char,
        value_p: *mut c_double,
    ) -> c_int;
    fn set_dbl_attr => GRBsetdblattr(
        model: *mut GRBmodel,
        name: *const c_char,
        value: c_double,
    ) -> c_int;
    fn get_dbl_attr_element => GRBgetdblattrelement(
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value_p: *mut c_double,
    ) -> c_int;
    fn set_dbl_attr_element => GRBsetdblattrelement(
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value: c_double,
    ) -> c_int;
    fn get_dbl_attr_array => GRBgetdblattrarray(
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_double,
    ) -> c_int;
    fn set_dbl_attr_array => GRBsetdblattrarray(
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_double,
    ) -> c_int;
    fn get_dbl_attr_list => GRBgetdblattrlist(
        model: *mut GRBmodel,
        name: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_double,
    ) -> c_int;
    fn set_dbl_attr_list => GRBsetdblattrlist(
        model: *mut GRBmodel,
        name: *const c_char,
        len: c_int,
        ind: *mut c_int,
        values: *mut c_double,
    ) -> c_int;

    fn get_char_attr_element => GRBgetcharattrelement(
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value_p: *mut c_char,
    ) -> c_int;
    fn set_char_attr_element => GRBsetcharattrelement(
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value: c_char,
    ) -> c_int;
    fn get_char_attr_array => GRBgetcharattrarray(
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_char,
    ) -> c_int;
    fn set_char_attr_array => GRBsetcharattrarray(
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut c_char,
    ) -> c_int;

    fn get_str_attr => GRBgetstrattr(
        model: *mut GRBmodel,
        name: *const c_char,
        value_p: *mut *mut c_char,
    ) -> c_int;
    fn set_str_attr => GRBsetstrattr(
        model: *mut GRBmodel,
        name: *const c_char,
        value: *const c_char,
    ) -> c_int;
    fn get_str_attr_element => GRBgetstrattrelement(
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value_p: *mut *mut c_char,
    ) -> c_int;
    fn set_str_attr_element => GRBsetstrattrelement(
        model: *mut GRBmodel,
        name: *const c_char,
        element: c_int,
        value: *const c_char,
    ) -> c_int;
    fn get_str_attr_array => GRBgetstrattrarray(
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut *mut c_char,
    ) -> c_int;
    fn set_str_attr_array => GRBsetstrattrarray(
        model: *mut GRBmodel,
        name: *const c_char,
        first: c_int,
        len: c_int,
        values: *mut *mut c_char,
    ) -> c_int;
}
