//! Safe marshalling and resource-lifecycle layer over the Gurobi C API.
//!
//! This crate sits between host data and the raw entry points declared in
//! [`gurobind_sys`]. It validates numeric buffers and string lists before any
//! native call, owns environment and model handles so each is released
//! exactly once, and turns every native status code into a [`Result`].
//!
//! # Overview
//!
//! - [`Environment`]: owning handle for a native environment
//! - [`Model`]: owning handle for a model, borrowing its environment
//! - [`Buffer`]: typed view of caller-provided numeric data
//! - [`NativeStrings`]: string list marshalled to a `char**`
//! - [`SolverConfig`]: common settings applied as parameters
//! - [`Error`]: pre-flight rejections and native status codes
//!
//! Every type is generic over a [`sys::NativeApi`] backend. With the `link`
//! feature, [`sys::Gurobi`] calls the installed library:
//!
//! ```text
//! let mut env = Environment::empty(Gurobi)?;
//! env.set_int_param("OutputFlag", 0)?;
//! env.start()?;
//! let mut model = Model::new(&env, Some("demo"), 2, VarData::default())?;
//! model.add_constr(SparseTerms::new(2, &[0, 1], &[1.0, 1.0]), Sense::LessEqual, 10.0, None)?;
//! model.optimize()?;
//! ```

mod attr;
mod buffer;
mod config;
mod env;
mod error;
mod logging;
mod memory;
mod model;
mod outcome;
mod params;
mod status;
mod strings;

pub use gurobind_sys as sys;

pub use buffer::{Buffer, BufferData, Element, ElementKind, require, require_opt};
pub use config::SolverConfig;
pub use env::{EnvState, Environment, Version};
pub use error::{Error, NativeError, Result};
pub use logging::{LoggingError, init_logging};
pub use memory::CallFootprint;
pub use model::{Compressed, Model, MultiObjective, QuadTerms, Sense, SparseTerms, VarData, VarType};
pub use status::ModelStatus;
pub use strings::{NativeStrings, from_native};
