//! Parameter table with defaults and ranges.

use gurobind_sys::{
    GRB_ERROR_UNKNOWN_PARAMETER, GRB_ERROR_VALUE_OUT_OF_RANGE, GRB_INFINITY, GRB_MAX_STRLEN,
};
use std::collections::BTreeMap;
use std::ffi::{c_double, c_int};

#[derive(Debug, Clone, Copy)]
enum Initial {
    Int(c_int),
    Dbl(c_double),
    Str(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(c_int),
    Dbl(c_double),
    Str(String),
}

struct ParamSpec {
    name: &'static str,
    initial: Initial,
    min: c_double,
    max: c_double,
}

const fn int(name: &'static str, default: c_int, min: c_int, max: c_int) -> ParamSpec {
    ParamSpec {
        name,
        initial: Initial::Int(default),
        min: min as c_double,
        max: max as c_double,
    }
}

const fn dbl(name: &'static str, default: c_double, min: c_double, max: c_double) -> ParamSpec {
    ParamSpec {
        name,
        initial: Initial::Dbl(default),
        min,
        max,
    }
}

const fn text(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        initial: Initial::Str(""),
        min: 0.0,
        max: 0.0,
    }
}

const PARAMS: &[ParamSpec] = &[
    int("OutputFlag", 1, 0, 1),
    int("LogToConsole", 1, 0, 1),
    int("Threads", 0, 0, 1024),
    int("Presolve", -1, -1, 2),
    int("Method", -1, -1, 5),
    int("MIPFocus", 0, 0, 3),
    int("Seed", 0, 0, 2_000_000_000),
    int("SolutionLimit", 2_000_000_000, 1, 2_000_000_000),
    int("IISMethod", -1, -1, 3),
    int("ObjNumber", 0, 0, 2_000_000_000),
    dbl("TimeLimit", GRB_INFINITY, 0.0, GRB_INFINITY),
    dbl("MIPGap", 1e-4, 0.0, GRB_INFINITY),
    dbl("MIPGapAbs", 1e-10, 0.0, GRB_INFINITY),
    dbl("FeasibilityTol", 1e-6, 1e-9, 1e-2),
    dbl("OptimalityTol", 1e-6, 1e-9, 1e-2),
    text("LogFile"),
    text("ResultFile"),
];

fn spec(name: &str) -> Option<&'static ParamSpec> {
    PARAMS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}

/// Current parameter values of one environment.
#[derive(Debug, Clone)]
pub(crate) struct Params {
    values: BTreeMap<&'static str, Value>,
}

impl Params {
    pub(crate) fn new() -> Self {
        let values = PARAMS
            .iter()
            .map(|spec| {
                let value = match spec.initial {
                    Initial::Int(v) => Value::Int(v),
                    Initial::Dbl(v) => Value::Dbl(v),
                    Initial::Str(v) => Value::Str(v.to_string()),
                };
                (spec.name, value)
            })
            .collect();
        Self { values }
    }

    fn lookup(&self, name: &str) -> Result<(&'static ParamSpec, &Value), c_int> {
        let spec = spec(name).ok_or(GRB_ERROR_UNKNOWN_PARAMETER)?;
        let value = self
            .values
            .get(spec.name)
            .ok_or(GRB_ERROR_UNKNOWN_PARAMETER)?;
        Ok((spec, value))
    }

    pub(crate) fn get_int(&self, name: &str) -> Result<c_int, c_int> {
        match self.lookup(name)? {
            (_, Value::Int(v)) => Ok(*v),
            _ => Err(GRB_ERROR_UNKNOWN_PARAMETER),
        }
    }

    pub(crate) fn set_int(&mut self, name: &str, value: c_int) -> Result<(), c_int> {
        let (spec, current) = self.lookup(name)?;
        if !matches!(current, Value::Int(_)) {
            return Err(GRB_ERROR_UNKNOWN_PARAMETER);
        }
        let as_dbl = c_double::from(value);
        if as_dbl < spec.min || as_dbl > spec.max {
            return Err(GRB_ERROR_VALUE_OUT_OF_RANGE);
        }
        self.values.insert(spec.name, Value::Int(value));
        Ok(())
    }

    pub(crate) fn get_dbl(&self, name: &str) -> Result<c_double, c_int> {
        match self.lookup(name)? {
            (_, Value::Dbl(v)) => Ok(*v),
            _ => Err(GRB_ERROR_UNKNOWN_PARAMETER),
        }
    }

    pub(crate) fn set_dbl(&mut self, name: &str, value: c_double) -> Result<(), c_int> {
        let (spec, current) = self.lookup(name)?;
        if !matches!(current, Value::Dbl(_)) {
            return Err(GRB_ERROR_UNKNOWN_PARAMETER);
        }
        if value.is_nan() || value < spec.min || value > spec.max {
            return Err(GRB_ERROR_VALUE_OUT_OF_RANGE);
        }
        self.values.insert(spec.name, Value::Dbl(value));
        Ok(())
    }

    pub(crate) fn get_str(&self, name: &str) -> Result<&str, c_int> {
        match self.lookup(name)? {
            (_, Value::Str(v)) => Ok(v.as_str()),
            _ => Err(GRB_ERROR_UNKNOWN_PARAMETER),
        }
    }

    pub(crate) fn set_str(&mut self, name: &str, value: &str) -> Result<(), c_int> {
        let (spec, current) = self.lookup(name)?;
        if !matches!(current, Value::Str(_)) {
            return Err(GRB_ERROR_UNKNOWN_PARAMETER);
        }
        if value.len() >= GRB_MAX_STRLEN {
            return Err(GRB_ERROR_VALUE_OUT_OF_RANGE);
        }
        self.values.insert(spec.name, Value::Str(value.to_string()));
        Ok(())
    }
}
