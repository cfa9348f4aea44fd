//! Error and status types shared by every solver.
//!
//! Algorithms report failures through [`SolverError`]; the dispatch surface
//! flattens them into a [`Status`] code so a malformed model never crashes
//! the caller.

use thiserror::Error;
use uuid::Uuid;

/// Status code returned by [`crate::registry::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The solve ran to its generation budget or converged.
    Ok,
    /// The caller cancelled the solve; the incumbent best was kept.
    Aborted,
    /// No solver is registered under the requested identifier.
    NotImplemented,
    /// Bounds, hints or configuration were rejected before solving.
    InvalidArgument,
    /// An internal fault (panic, numerical blow-up) stopped the solve.
    Failed,
}

impl Status {
    /// Returns `true` for [`Status::Ok`] and [`Status::Aborted`]: both carry
    /// a usable best-so-far solution.
    pub fn has_solution(self) -> bool {
        matches!(self, Status::Ok | Status::Aborted)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ok => write!(f, "ok"),
            Status::Aborted => write!(f, "aborted"),
            Status::NotImplemented => write!(f, "not implemented"),
            Status::InvalidArgument => write!(f, "invalid argument"),
            Status::Failed => write!(f, "failed"),
        }
    }
}

/// Errors that can occur while preparing or running a solve.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SolverError {
    /// Lower and upper bounds have different lengths.
    #[error("bounds mismatch: lower has {lower_len} elements, upper has {upper_len}")]
    BoundsMismatch {
        /// Length of the lower bound vector.
        lower_len: usize,
        /// Length of the upper bound vector.
        upper_len: usize,
    },

    /// A lower bound exceeds its upper bound, or either one is NaN.
    #[error("invalid bounds at index {index}: lower ({lower}) > upper ({upper})")]
    InvalidBounds {
        /// Dimension of the offending pair.
        index: usize,
        /// The lower bound value.
        lower: f64,
        /// The upper bound value.
        upper: f64,
    },

    /// The problem has zero dimensions.
    #[error("problem must have at least one dimension")]
    EmptyProblem,

    /// A hint vector does not match the problem dimensionality.
    #[error("hint {index} has {got} elements, expected {expected}")]
    HintDimension {
        /// Position of the hint in the hint list.
        index: usize,
        /// Problem dimensionality.
        expected: usize,
        /// Hint length.
        got: usize,
    },

    /// Objective count is zero or exceeds [`crate::fitness::MAX_OBJECTIVES`].
    #[error("objective count {count} must be in 1..={max}")]
    InvalidObjectiveCount {
        /// Requested number of objectives.
        count: usize,
        /// Compile-time maximum.
        max: usize,
    },

    /// An algorithm configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No solver is registered under this identifier.
    #[error("solver {0} is not implemented")]
    NotImplemented(Uuid),

    /// The solve panicked or otherwise faulted internally.
    #[error("internal solver fault: {0}")]
    Internal(String),
}

impl SolverError {
    /// Maps the error onto the dispatch status code.
    pub fn status(&self) -> Status {
        match self {
            SolverError::NotImplemented(_) => Status::NotImplemented,
            SolverError::Internal(_) => Status::Failed,
            _ => Status::InvalidArgument,
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SolverError::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            SolverError::NotImplemented(Uuid::nil()).status(),
            Status::NotImplemented
        );
        assert_eq!(SolverError::Internal("boom".into()).status(), Status::Failed);
        assert_eq!(SolverError::EmptyProblem.status(), Status::InvalidArgument);
        assert_eq!(
            SolverError::InvalidBounds {
                index: 0,
                lower: 1.0,
                upper: 0.0
            }
            .status(),
            Status::InvalidArgument
        );
    }

    #[test]
    fn test_error_messages() {
        let err = SolverError::BoundsMismatch {
            lower_len: 2,
            upper_len: 3,
        };
        assert_eq!(
            err.to_string(),
            "bounds mismatch: lower has 2 elements, upper has 3"
        );
        assert!(SolverError::config("bad").to_string().contains("bad"));
    }

    #[test]
    fn test_has_solution() {
        assert!(Status::Ok.has_solution());
        assert!(Status::Aborted.has_solution());
        assert!(!Status::Failed.has_solution());
        assert!(!Status::NotImplemented.has_solution());
    }
}
