//! # wmv-smtlib
//!
//! SMT-LIB2 abstract syntax for the weak-memory verifier.
//!
//! The memory-model encoding lives entirely in quantifier-free linear integer
//! arithmetic, so this crate covers exactly the Bool/Int fragment: literals,
//! the boolean connectives, equality/distinctness, `ite`, and integer
//! arithmetic with comparisons. `Display` implementations render valid
//! SMT-LIB2 text that Z3 and CVC5 accept on stdin.

pub mod command;
pub mod formatter;
pub mod script;
pub mod sort;
pub mod term;

pub use command::Command;
pub use script::Script;
pub use sort::Sort;
pub use term::Term;
