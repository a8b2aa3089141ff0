//! Solver driver.
//!
//! Assembles the structural encoding, the mode axioms, and the caller's
//! violation/progress predicates into one script, runs the solver, and maps
//! the outcome to a [`Verdict`]. Each call builds a fresh script and spawns a
//! fresh solver process; nothing is shared or mutated, so repeated calls on
//! the same inputs are equivalent.

use std::fmt;

use wmv_smtlib::command::Command;
use wmv_smtlib::script::Script;
use wmv_smtlib::term::Term;
use wmv_solver::{CliSolver, SolverError, SolverResult};

use crate::axioms::{self, Mode};
use crate::encode::{Ctx, PredicateError, encode};
use crate::event::Trace;
use crate::witness::Witness;

/// A violation, progress, or extra-constraint predicate: a pure function from
/// the symbolic execution context to a boolean constraint term.
pub type Predicate = dyn Fn(&Ctx) -> Result<Term, PredicateError>;

/// Outcome of a verification call.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// An admitted execution satisfies the violation; here is the witness.
    Sat(Witness),
    /// No admitted execution satisfies violation ∧ progress ∧ extra.
    Unsat,
    /// The solver gave up (timeout, resource limit, cancellation).
    /// Never conflated with Unsat.
    Unknown(String),
}

impl Verdict {
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Verdict::Unsat)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Verdict::Unknown(_))
    }

    pub fn witness(&self) -> Option<&Witness> {
        match self {
            Verdict::Sat(witness) => Some(witness),
            _ => None,
        }
    }
}

/// Verification failures. Solver `unknown` outcomes are not errors — they
/// come back as [`Verdict::Unknown`].
#[derive(Debug)]
pub enum VerifyError {
    /// A user predicate referenced something outside the trace.
    Predicate(PredicateError),
    /// The solver process could not be run or its output was unreadable.
    Solver(SolverError),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Predicate(e) => write!(f, "predicate error: {e}"),
            VerifyError::Solver(e) => write!(f, "solver error: {e}"),
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Predicate(e) => Some(e),
            VerifyError::Solver(e) => Some(e),
        }
    }
}

impl From<PredicateError> for VerifyError {
    fn from(e: PredicateError) -> Self {
        VerifyError::Predicate(e)
    }
}

impl From<SolverError> for VerifyError {
    fn from(e: SolverError) -> Self {
        VerifyError::Solver(e)
    }
}

/// A trace paired with the analysis mode to check it under.
#[derive(Debug, Clone)]
pub struct Analysis {
    trace: Trace,
    mode: Mode,
}

impl Analysis {
    pub fn new(trace: Trace, mode: Mode) -> Analysis {
        Analysis { trace, mode }
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Search for an admitted execution satisfying
    /// `violation ∧ progress ∧ extra`.
    pub fn verify(
        &self,
        solver: &CliSolver,
        violation: &Predicate,
        progress: &Predicate,
        extra: Option<&Predicate>,
    ) -> Result<Verdict, VerifyError> {
        let encoding = encode(&self.trace, self.mode);
        let mut commands = encoding.commands;
        commands.extend(axioms::emit(&self.trace, self.mode));

        commands.push(Command::Comment("violation".to_string()));
        commands.push(Command::Assert(violation(&encoding.ctx)?));
        commands.push(Command::Comment("progress".to_string()));
        commands.push(Command::Assert(progress(&encoding.ctx)?));
        if let Some(extra) = extra {
            commands.push(Command::Comment("extra constraints".to_string()));
            commands.push(Command::Assert(extra(&encoding.ctx)?));
        }

        let mut script = Script::with_commands(commands);
        script.push(Command::CheckSat);
        script.push(Command::GetModel);

        tracing::debug!(
            events = self.trace.events().len(),
            reads = self.trace.reads().count(),
            writes = self.trace.writes().count(),
            asserts = script.assert_count(),
            mode = %self.mode,
            "solving"
        );

        let result = solver.check_sat(&script)?;
        tracing::debug!(outcome = result.label(), "solver returned");
        Ok(match result {
            SolverResult::Sat(model) => {
                Verdict::Sat(Witness::from_model(&self.trace, model.as_ref()))
            }
            SolverResult::Unsat => Verdict::Unsat,
            SolverResult::Unknown(reason) => Verdict::Unknown(reason),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, MemOrder};
    use std::path::PathBuf;
    use wmv_solver::{SolverConfig, SolverKind};

    fn analysis() -> Analysis {
        let trace = Trace::build(vec![
            Event::init(-1, 0),
            Event::write(1, 0, 0, 1, MemOrder::Rel),
            Event::read(2, 1, 0, MemOrder::Acq),
        ])
        .unwrap();
        Analysis::new(trace, Mode::Ra)
    }

    fn dead_solver() -> CliSolver {
        // Never reached when a predicate fails; verify must error out first.
        CliSolver::new(SolverConfig::new(
            SolverKind::Z3,
            PathBuf::from("/nonexistent/solver"),
        ))
    }

    #[test]
    fn predicate_errors_surface_before_the_solver_runs() {
        let analysis = analysis();
        let bad: &Predicate = &|ctx| ctx.read_val(9);
        let ok: &Predicate = &|_| Ok(Term::BoolLit(true));
        let err = analysis
            .verify(&dead_solver(), bad, ok, None)
            .unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Predicate(PredicateError::ReadIndex { index: 9, count: 1 })
        ));
    }

    #[test]
    fn extra_predicate_errors_also_surface() {
        let analysis = analysis();
        let ok: &Predicate = &|_| Ok(Term::BoolLit(true));
        let bad: &Predicate = &|ctx| ctx.writes_to(99).map(|_| Term::BoolLit(true));
        let err = analysis
            .verify(&dead_solver(), ok, ok, Some(bad))
            .unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Predicate(PredicateError::UnknownAddr(99))
        ));
    }

    #[test]
    fn missing_solver_is_a_solver_error() {
        let analysis = analysis();
        let ok: &Predicate = &|_| Ok(Term::BoolLit(true));
        let err = analysis
            .verify(&dead_solver(), ok, ok, None)
            .unwrap_err();
        assert!(matches!(err, VerifyError::Solver(SolverError::NotFound(_, _))));
    }

    #[test]
    fn verdict_accessors() {
        let unsat = Verdict::Unsat;
        assert!(unsat.is_unsat());
        assert!(!unsat.is_sat());
        assert_eq!(unsat.witness(), None);

        let unknown = Verdict::Unknown("timeout".to_string());
        assert!(unknown.is_unknown());
    }

    #[test]
    fn verify_error_display() {
        let err = VerifyError::Predicate(PredicateError::UnknownAddr(3));
        assert_eq!(
            err.to_string(),
            "predicate error: address 3 does not appear in the trace"
        );
    }
}
