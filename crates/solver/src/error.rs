use std::fmt;
use std::path::PathBuf;

use crate::config::SolverKind;

/// Errors from solver interaction.
///
/// Note that `unknown`/timeout outcomes are not errors; they are reported as
/// [`crate::SolverResult::Unknown`].
#[derive(Debug, PartialEq, Eq)]
pub enum SolverError {
    /// Solver binary not found at the given path.
    NotFound(SolverKind, PathBuf),
    /// Process failed to start, crashed, or its pipes broke.
    Process(String),
    /// Failed to parse solver output.
    Parse(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::NotFound(kind, path) => {
                write!(f, "{kind} binary not found at: {}", path.display())
            }
            SolverError::Process(msg) => write!(f, "solver process error: {msg}"),
            SolverError::Parse(msg) => write!(f, "failed to parse solver output: {msg}"),
        }
    }
}

impl std::error::Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = SolverError::NotFound(SolverKind::Z3, PathBuf::from("/no/z3"));
        assert_eq!(err.to_string(), "Z3 binary not found at: /no/z3");

        let err = SolverError::Process("crashed".to_string());
        assert_eq!(err.to_string(), "solver process error: crashed");

        let err = SolverError::Parse("bad output".to_string());
        assert_eq!(err.to_string(), "failed to parse solver output: bad output");
    }

    #[test]
    fn equality() {
        assert_eq!(
            SolverError::Process("x".to_string()),
            SolverError::Process("x".to_string())
        );
        assert_ne!(
            SolverError::Process("x".to_string()),
            SolverError::Parse("x".to_string())
        );
    }
}
