//! Optimization status reported by the `Status` model attribute.

use gurobind_sys as sys;

/// Status of a model after (or before) optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelStatus {
    /// Model is loaded but not yet optimized.
    Loaded,
    /// Optimal solution found.
    Optimal,
    /// Model is infeasible.
    Infeasible,
    /// Model is infeasible or unbounded.
    InfOrUnbd,
    /// Model is unbounded.
    Unbounded,
    /// Objective is worse than the `Cutoff` parameter.
    Cutoff,
    /// Simplex or barrier iteration limit reached.
    IterationLimit,
    /// Branch-and-bound node limit reached.
    NodeLimit,
    /// Time limit reached.
    TimeLimit,
    /// Solution count limit reached.
    SolutionLimit,
    /// Optimization was interrupted.
    Interrupted,
    /// Numerical difficulties stopped optimization.
    Numeric,
    /// Unable to satisfy tolerances; a sub-optimal solution is available.
    Suboptimal,
    /// Asynchronous optimization still running.
    InProgress,
    /// User objective limit reached.
    UserObjLimit,
    /// Work limit reached.
    WorkLimit,
    /// Memory limit reached.
    MemLimit,
    /// A code this binding does not know.
    Other(i32),
}

impl ModelStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            sys::GRB_LOADED => ModelStatus::Loaded,
            sys::GRB_OPTIMAL => ModelStatus::Optimal,
            sys::GRB_INFEASIBLE => ModelStatus::Infeasible,
            sys::GRB_INF_OR_UNBD => ModelStatus::InfOrUnbd,
            sys::GRB_UNBOUNDED => ModelStatus::Unbounded,
            sys::GRB_CUTOFF => ModelStatus::Cutoff,
            sys::GRB_ITERATION_LIMIT => ModelStatus::IterationLimit,
            sys::GRB_NODE_LIMIT => ModelStatus::NodeLimit,
            sys::GRB_TIME_LIMIT => ModelStatus::TimeLimit,
            sys::GRB_SOLUTION_LIMIT => ModelStatus::SolutionLimit,
            sys::GRB_INTERRUPTED => ModelStatus::Interrupted,
            sys::GRB_NUMERIC => ModelStatus::Numeric,
            sys::GRB_SUBOPTIMAL => ModelStatus::Suboptimal,
            sys::GRB_INPROGRESS => ModelStatus::InProgress,
            sys::GRB_USER_OBJ_LIMIT => ModelStatus::UserObjLimit,
            sys::GRB_WORK_LIMIT => ModelStatus::WorkLimit,
            sys::GRB_MEM_LIMIT => ModelStatus::MemLimit,
            other => ModelStatus::Other(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ModelStatus::Loaded => sys::GRB_LOADED,
            ModelStatus::Optimal => sys::GRB_OPTIMAL,
            ModelStatus::Infeasible => sys::GRB_INFEASIBLE,
            ModelStatus::InfOrUnbd => sys::GRB_INF_OR_UNBD,
            ModelStatus::Unbounded => sys::GRB_UNBOUNDED,
            ModelStatus::Cutoff => sys::GRB_CUTOFF,
            ModelStatus::IterationLimit => sys::GRB_ITERATION_LIMIT,
            ModelStatus::NodeLimit => sys::GRB_NODE_LIMIT,
            ModelStatus::TimeLimit => sys::GRB_TIME_LIMIT,
            ModelStatus::SolutionLimit => sys::GRB_SOLUTION_LIMIT,
            ModelStatus::Interrupted => sys::GRB_INTERRUPTED,
            ModelStatus::Numeric => sys::GRB_NUMERIC,
            ModelStatus::Suboptimal => sys::GRB_SUBOPTIMAL,
            ModelStatus::InProgress => sys::GRB_INPROGRESS,
            ModelStatus::UserObjLimit => sys::GRB_USER_OBJ_LIMIT,
            ModelStatus::WorkLimit => sys::GRB_WORK_LIMIT,
            ModelStatus::MemLimit => sys::GRB_MEM_LIMIT,
            ModelStatus::Other(code) => code,
        }
    }

    /// Check if the status indicates an optimal solution.
    pub fn is_optimal(self) -> bool {
        matches!(self, ModelStatus::Optimal)
    }

    /// Check if the status indicates infeasibility.
    pub fn is_infeasible(self) -> bool {
        matches!(self, ModelStatus::Infeasible)
    }

    /// Whether a solution may be available: optimal, sub-optimal, or a limit
    /// was reached (the `SolCount` attribute tells for sure).
    pub fn has_solution(self) -> bool {
        matches!(
            self,
            ModelStatus::Optimal
                | ModelStatus::Suboptimal
                | ModelStatus::IterationLimit
                | ModelStatus::NodeLimit
                | ModelStatus::TimeLimit
                | ModelStatus::SolutionLimit
                | ModelStatus::Interrupted
                | ModelStatus::UserObjLimit
                | ModelStatus::WorkLimit
                | ModelStatus::MemLimit
        )
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelStatus::Loaded => "loaded",
            ModelStatus::Optimal => "optimal",
            ModelStatus::Infeasible => "infeasible",
            ModelStatus::InfOrUnbd => "inf_or_unbd",
            ModelStatus::Unbounded => "unbounded",
            ModelStatus::Cutoff => "cutoff",
            ModelStatus::IterationLimit => "iteration_limit",
            ModelStatus::NodeLimit => "node_limit",
            ModelStatus::TimeLimit => "time_limit",
            ModelStatus::SolutionLimit => "solution_limit",
            ModelStatus::Interrupted => "interrupted",
            ModelStatus::Numeric => "numeric",
            ModelStatus::Suboptimal => "suboptimal",
            ModelStatus::InProgress => "in_progress",
            ModelStatus::UserObjLimit => "user_obj_limit",
            ModelStatus::WorkLimit => "work_limit",
            ModelStatus::MemLimit => "mem_limit",
            ModelStatus::Other(_) => "unknown",
        }
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelStatus::Other(code) => write!(f, "unknown({code})"),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for code in 1..=17 {
            assert_eq!(ModelStatus::from_code(code).code(), code);
        }
        assert_eq!(ModelStatus::from_code(99), ModelStatus::Other(99));
    }

    #[test]
    fn test_status_helpers() {
        assert!(ModelStatus::Optimal.is_optimal());
        assert!(ModelStatus::TimeLimit.has_solution());
        assert!(!ModelStatus::Infeasible.has_solution());
        assert!(ModelStatus::Infeasible.is_infeasible());
        assert_eq!(ModelStatus::InfOrUnbd.as_str(), "inf_or_unbd");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", ModelStatus::Optimal), "optimal");
        assert_eq!(format!("{}", ModelStatus::Other(42)), "unknown(42)");
    }
}
