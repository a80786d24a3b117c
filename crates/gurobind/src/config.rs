//! Solver configuration applied as native parameters.

use crate::env::Environment;
use crate::error::{Error, Result};
use crate::model::Model;
use gurobind_sys::NativeApi;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Common solver settings.
///
/// Every field is optional; `None` leaves the library default in place.
/// A configuration can be built in code or loaded from JSON:
///
/// ```text
/// { "time_limit": 60.0, "threads": 4, "presolve": false }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Time limit in seconds (`TimeLimit`).
    pub time_limit: Option<f64>,
    /// Relative MIP gap tolerance (`MIPGap`).
    pub mip_gap: Option<f64>,
    /// Verbosity level; zero silences solver output (`OutputFlag`).
    pub verbosity: Option<u32>,
    /// Enable/disable presolve (`Presolve`).
    pub presolve: Option<bool>,
    /// Number of threads (`Threads`).
    pub threads: Option<u32>,
    /// Feasibility and optimality tolerance (`FeasibilityTol`, `OptimalityTol`).
    pub tolerance: Option<f64>,
    /// Solver log file (`LogFile`).
    pub log_file: Option<PathBuf>,
    /// Log solver output to console (`LogToConsole`).
    pub log_to_console: Option<bool>,
}

/// Where parameters are written: an environment or a model's copy of one.
trait ParamTarget {
    fn set_int(&self, name: &str, value: i32) -> Result<()>;
    fn set_float(&self, name: &str, value: f64) -> Result<()>;
    fn set_str(&self, name: &str, value: &str) -> Result<()>;
}

impl<A: NativeApi> ParamTarget for Environment<A> {
    fn set_int(&self, name: &str, value: i32) -> Result<()> {
        self.set_int_param(name, value)
    }

    fn set_float(&self, name: &str, value: f64) -> Result<()> {
        self.set_float_param(name, value)
    }

    fn set_str(&self, name: &str, value: &str) -> Result<()> {
        self.set_str_param(name, value)
    }
}

impl<A: NativeApi> ParamTarget for Model<'_, A> {
    fn set_int(&self, name: &str, value: i32) -> Result<()> {
        self.set_int_param(name, value)
    }

    fn set_float(&self, name: &str, value: f64) -> Result<()> {
        self.set_float_param(name, value)
    }

    fn set_str(&self, name: &str, value: &str) -> Result<()> {
        self.set_str_param(name, value)
    }
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming `config` if the text is not
    /// a valid configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| Error::invalid("config", err.to_string()))
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the relative MIP gap tolerance.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    /// Set the verbosity level.
    pub fn with_verbosity(mut self, level: u32) -> Self {
        self.verbosity = Some(level);
        self
    }

    /// Enable or disable presolve.
    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    /// Set the number of threads.
    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    /// Set the feasibility and optimality tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = Some(tol);
        self
    }

    /// Write the solver log to `path`.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Enable or disable console logging.
    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.mip_gap.is_none()
            && self.verbosity.is_none()
            && self.presolve.is_none()
            && self.threads.is_none()
            && self.tolerance.is_none()
            && self.log_file.is_none()
            && self.log_to_console.is_none()
    }

    /// Set every present field on `env`, stopping at the first failure.
    pub fn apply<A: NativeApi>(&self, env: &Environment<A>) -> Result<()> {
        self.apply_to(env)
    }

    /// Set every present field on `model`'s own environment copy.
    pub fn apply_to_model<A: NativeApi>(&self, model: &Model<'_, A>) -> Result<()> {
        self.apply_to(model)
    }

    fn apply_to(&self, target: &impl ParamTarget) -> Result<()> {
        if let Some(seconds) = self.time_limit {
            target.set_float("TimeLimit", seconds)?;
        }
        if let Some(gap) = self.mip_gap {
            target.set_float("MIPGap", gap)?;
        }
        if let Some(level) = self.verbosity {
            target.set_int("OutputFlag", i32::from(level > 0))?;
        }
        if let Some(enabled) = self.presolve {
            // -1 lets the solver pick the presolve level.
            target.set_int("Presolve", if enabled { -1 } else { 0 })?;
        }
        if let Some(count) = self.threads {
            let count = i32::try_from(count)
                .map_err(|_| Error::invalid("config.threads", format!("{count} is too large")))?;
            target.set_int("Threads", count)?;
        }
        if let Some(tol) = self.tolerance {
            target.set_float("FeasibilityTol", tol)?;
            target.set_float("OptimalityTol", tol)?;
        }
        if let Some(path) = &self.log_file {
            let text = path
                .to_str()
                .ok_or_else(|| Error::invalid("config.log_file", "path is not valid UTF-8"))?;
            target.set_str("LogFile", text)?;
        }
        if let Some(enabled) = self.log_to_console {
            target.set_int("LogToConsole", i32::from(enabled))?;
        }
        debug!(
            component = "config",
            operation = "apply",
            status = "success",
            ?self,
            "Applied solver configuration"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurobind_sys::GRB_ERROR_VALUE_OUT_OF_RANGE;
    use gurobind_testkit::Stub;

    #[test]
    fn test_config_new_is_empty() {
        let config = SolverConfig::new();
        assert!(config.is_empty());
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = SolverConfig::new()
            .with_time_limit(60.0)
            .with_mip_gap(0.01)
            .with_verbosity(1)
            .with_presolve(true)
            .with_threads(4)
            .with_tolerance(1e-6)
            .with_log_file("solve.log")
            .with_log_to_console(false);

        assert!(!config.is_empty());
        assert_eq!(config.time_limit, Some(60.0));
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.log_file, Some(PathBuf::from("solve.log")));
        assert_eq!(config.log_to_console, Some(false));
    }

    #[test]
    fn test_config_from_json() {
        let config =
            SolverConfig::from_json_str(r#"{"time_limit": 30.0, "presolve": false}"#).unwrap();
        assert_eq!(config.time_limit, Some(30.0));
        assert_eq!(config.presolve, Some(false));
        assert_eq!(config.mip_gap, None);

        let err = SolverConfig::from_json_str(r#"{"time_limt": 30.0}"#).unwrap_err();
        assert_eq!(err.param(), Some("config"));
    }

    #[test]
    fn test_apply_sets_env_params() {
        let env = Environment::empty(Stub::new()).unwrap();
        SolverConfig::new()
            .with_time_limit(12.0)
            .with_verbosity(0)
            .with_presolve(false)
            .with_threads(2)
            .with_tolerance(1e-7)
            .apply(&env)
            .unwrap();
        assert_eq!(env.get_float_param("TimeLimit"), Ok(12.0));
        assert_eq!(env.get_int_param("OutputFlag"), Ok(0));
        assert_eq!(env.get_int_param("Presolve"), Ok(0));
        assert_eq!(env.get_int_param("Threads"), Ok(2));
        assert_eq!(env.get_float_param("FeasibilityTol"), Ok(1e-7));
        assert_eq!(env.get_float_param("OptimalityTol"), Ok(1e-7));
    }

    #[test]
    fn test_apply_stops_at_first_failure() {
        let env = Environment::empty(Stub::new()).unwrap();
        let err = SolverConfig::new()
            .with_tolerance(1.0)
            .with_log_to_console(false)
            .apply(&env)
            .unwrap_err();
        assert_eq!(err.native_code(), Some(GRB_ERROR_VALUE_OUT_OF_RANGE));
        assert_eq!(env.get_int_param("LogToConsole"), Ok(1));
    }

    #[test]
    fn test_apply_to_model_leaves_env_untouched() {
        let env = Environment::new(Stub::new(), None).unwrap();
        let model = Model::new(&env, None, 0, crate::model::VarData::default()).unwrap();
        SolverConfig::new()
            .with_threads(3)
            .apply_to_model(&model)
            .unwrap();
        assert_eq!(model.get_int_param("Threads"), Ok(3));
        assert_eq!(env.get_int_param("Threads"), Ok(0));
    }
}
