//! # wmv-solver
//!
//! Subprocess interface to SMT-LIB2 solvers.
//!
//! A [`CliSolver`] spawns the configured solver binary (Z3 or CVC5), writes a
//! script to its stdin, and parses `sat`/`unsat`/`unknown` plus the
//! `(get-model)` output. Timeouts are enforced both through the solver's own
//! flag and an OS-level backstop that kills the process, so a hung solver
//! surfaces as [`SolverResult::Unknown`] rather than blocking the caller.
//!
//! ## Usage
//!
//! ```no_run
//! use wmv_solver::{CliSolver, SolverResult};
//!
//! let solver = CliSolver::with_default_config().unwrap();
//! let result = solver.check_sat_raw("
//!     (declare-const x Int)
//!     (assert (> x 0))
//!     (check-sat)
//!     (get-model)
//! ").unwrap();
//!
//! match result {
//!     SolverResult::Sat(model) => println!("sat: {model:?}"),
//!     SolverResult::Unsat => println!("unsat"),
//!     SolverResult::Unknown(reason) => println!("unknown: {reason}"),
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
mod parser;
pub mod result;
pub mod solver;

pub use config::{SolverConfig, SolverKind};
pub use error::SolverError;
pub use model::Model;
pub use result::SolverResult;
pub use solver::CliSolver;
