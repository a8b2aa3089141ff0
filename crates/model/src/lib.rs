//! # wmv-model
//!
//! Axiomatic weak-memory model with an SMT-backed execution synthesizer.
//!
//! Given a finite trace of memory events tagged with per-operation orders
//! (sc, rel, acq, rlx), the verifier searches for an execution — a concrete
//! reads-from and coherence-order assignment admitted by the model — that
//! also satisfies a caller-supplied violation predicate. Executions are
//! encoded symbolically: a boolean rf matrix, an integer coherence rank per
//! write, and an integer rank per event witnessing acyclicity of
//! ppo ∪ rf ∪ co ∪ fr.
//!
//! ```no_run
//! use wmv_model::{Analysis, Event, MemOrder, Mode, Trace};
//! use wmv_smtlib::term::Term;
//! use wmv_solver::CliSolver;
//!
//! let trace = Trace::build(vec![
//!     Event::init(-1, 0),
//!     Event::write(1, 0, 0, 1, MemOrder::Rel),
//!     Event::read(2, 1, 0, MemOrder::Acq),
//! ]).unwrap();
//!
//! let solver = CliSolver::with_default_config().unwrap();
//! let verdict = Analysis::new(trace, Mode::Ra)
//!     .verify(
//!         &solver,
//!         &|ctx| Ok(Term::eq(ctx.read_val(0)?, Term::int(0))), // stale read
//!         &|_| Ok(Term::BoolLit(true)),
//!         None,
//!     )
//!     .unwrap();
//! println!("{verdict:?}");
//! ```

pub mod axioms;
pub mod encode;
pub mod event;
pub mod relations;
pub mod verify;
pub mod witness;

pub use axioms::Mode;
pub use encode::{Ctx, Encoding, PredicateError, encode};
pub use event::{Event, EventKind, MemOrder, Trace, TraceError};
pub use verify::{Analysis, Predicate, Verdict, VerifyError};
pub use witness::{Witness, WitnessEvent};
