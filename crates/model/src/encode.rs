//! Symbolic encoder.
//!
//! Turns a concrete trace into the SMT skeleton every verification call
//! shares: variable declarations, reads-from well-formedness, coherence
//! well-formedness, rank pinning, and the rank-based acyclicity of
//! ppo ∪ co ∪ fr. The per-mode ordering axioms (including rf timing) are
//! layered on top by [`crate::axioms`].
//!
//! Constraints are accumulated into a command list and conjoined by the
//! solver; nothing is short-circuited during emission, so no axiom can be
//! dropped when a subterm collapses to a constant.
//!
//! All enumeration is done over id-sorted event lists. Two traces that differ
//! only in event sequencing therefore produce byte-identical scripts, which
//! makes the sat/unsat outcome visibly independent of trace order.

use std::fmt;

use wmv_smtlib::command::Command;
use wmv_smtlib::sort::Sort;
use wmv_smtlib::term::Term;

use crate::axioms::Mode;
use crate::event::{Event, Trace};
use crate::relations::{self, co, fr, rank, rf};

/// A user predicate referenced something outside the trace. Raised during
/// encoding, before the solver is ever invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateError {
    /// Read index out of bounds for the trace's read list.
    ReadIndex { index: usize, count: usize },
    /// Address not referenced by any event in the trace.
    UnknownAddr(i64),
    /// Event id not present in the trace.
    UnknownEvent(i64),
}

impl fmt::Display for PredicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateError::ReadIndex { index, count } => {
                write!(f, "read index {index} out of bounds (trace has {count} reads)")
            }
            PredicateError::UnknownAddr(addr) => {
                write!(f, "address {addr} does not appear in the trace")
            }
            PredicateError::UnknownEvent(id) => {
                write!(f, "event id {id} does not appear in the trace")
            }
        }
    }
}

impl std::error::Error for PredicateError {}

/// Handle through which violation/progress predicates see the symbolic
/// execution: read values, the rf and co relations, and event ranks.
pub struct Ctx<'t> {
    trace: &'t Trace,
    reads: Vec<&'t Event>,
    writes: Vec<&'t Event>,
}

impl<'t> Ctx<'t> {
    fn new(trace: &'t Trace) -> Ctx<'t> {
        Ctx {
            trace,
            reads: trace.reads().collect(),
            writes: trace.writes().collect(),
        }
    }

    /// Reads, in trace order.
    pub fn reads(&self) -> &[&'t Event] {
        &self.reads
    }

    /// Writes, in trace order.
    pub fn writes(&self) -> &[&'t Event] {
        &self.writes
    }

    /// Symbolic value of the `index`-th read (trace order).
    pub fn read_val(&self, index: usize) -> Result<Term, PredicateError> {
        self.reads
            .get(index)
            .map(|r| Term::var(relations::rval_var(r)))
            .ok_or(PredicateError::ReadIndex {
                index,
                count: self.reads.len(),
            })
    }

    /// Symbolic values of all reads, in trace order.
    pub fn read_vals(&self) -> Vec<Term> {
        self.reads
            .iter()
            .map(|r| Term::var(relations::rval_var(r)))
            .collect()
    }

    /// The rf predicate: does read `r_id` read from write `w_id`?
    pub fn rf(&self, w_id: i64, r_id: i64) -> Result<Term, PredicateError> {
        let w = self.event(w_id)?;
        let r = self.event(r_id)?;
        Ok(rf(r, w))
    }

    /// The co predicate: is `w1_id` coherence-before `w2_id`?
    pub fn co(&self, w1_id: i64, w2_id: i64) -> Result<Term, PredicateError> {
        let w1 = self.event(w1_id)?;
        let w2 = self.event(w2_id)?;
        Ok(co(w1, w2))
    }

    /// The rank of an event as a term.
    pub fn rank(&self, id: i64) -> Result<Term, PredicateError> {
        Ok(rank(self.event(id)?))
    }

    /// Writes to an address, in trace order.
    pub fn writes_to(&self, addr: i64) -> Result<Vec<&'t Event>, PredicateError> {
        if !self.trace.addresses().contains(&addr) {
            return Err(PredicateError::UnknownAddr(addr));
        }
        Ok(self.trace.writes_to(addr).collect())
    }

    fn event(&self, id: i64) -> Result<&'t Event, PredicateError> {
        self.trace.get(id).ok_or(PredicateError::UnknownEvent(id))
    }
}

/// The shared SMT skeleton for one trace plus the predicate handle.
pub struct Encoding<'t> {
    pub commands: Vec<Command>,
    pub ctx: Ctx<'t>,
}

/// Encode the structural constraints of a trace under the given mode.
pub fn encode(trace: &Trace, mode: Mode) -> Encoding<'_> {
    let mut events: Vec<&Event> = trace.events().iter().collect();
    events.sort_by_key(|e| e.id);
    let reads: Vec<&Event> = events.iter().copied().filter(|e| e.is_read()).collect();
    let writes: Vec<&Event> = events.iter().copied().filter(|e| e.is_write()).collect();

    let mut cmds = Vec::new();
    cmds.push(Command::SetLogic("QF_LIA".to_string()));

    // Declarations: read values, the rf matrix, coherence ranks, event ranks.
    for r in &reads {
        cmds.push(Command::DeclareConst(relations::rval_var(r), Sort::Int));
    }
    for r in &reads {
        for w in &writes {
            cmds.push(Command::DeclareConst(relations::rf_var(r, w), Sort::Bool));
        }
    }
    for w in &writes {
        cmds.push(Command::DeclareConst(relations::co_var(w), Sort::Int));
    }
    for e in &events {
        cmds.push(Command::DeclareConst(relations::rank_var(e), Sort::Int));
    }

    // Reads-from well-formedness: each row of the matrix is one-hot over the
    // same-address candidates, everything else is pinned false, and the
    // read's value is the candidate-selected sum.
    cmds.push(Command::Comment("reads-from selection".to_string()));
    for r in &reads {
        let mut candidates = Vec::new();
        for w in &writes {
            if w.addr == r.addr {
                candidates.push(*w);
            } else {
                cmds.push(Command::Assert(Term::not(Term::var(relations::rf_var(
                    r, w,
                )))));
            }
        }

        // At least one source; the initial write guarantees a candidate.
        let row: Vec<Term> = candidates.iter().map(|w| rf(r, w)).collect();
        cmds.push(Command::Assert(Term::or(row)));

        // At most one source.
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                cmds.push(Command::Assert(Term::not(Term::and(vec![
                    rf(r, candidates[i]),
                    rf(r, candidates[j]),
                ]))));
            }
        }

        // Value identity over the one-hot row.
        let sum = Term::add(
            candidates
                .iter()
                .map(|w| Term::ite(rf(r, w), Term::int(w.val), Term::int(0)))
                .collect(),
        );
        cmds.push(Command::Assert(Term::eq(
            Term::var(relations::rval_var(r)),
            sum,
        )));
    }

    // Coherence well-formedness: per address, ranks are pairwise distinct and
    // the initial write is minimal.
    cmds.push(Command::Comment("coherence order".to_string()));
    for addr in trace.addresses() {
        let ws: Vec<&Event> = writes.iter().copied().filter(|w| w.addr == addr).collect();
        for i in 0..ws.len() {
            for j in (i + 1)..ws.len() {
                cmds.push(Command::Assert(Term::ne(
                    Term::var(relations::co_var(ws[i])),
                    Term::var(relations::co_var(ws[j])),
                )));
            }
        }
        if let Some(init) = ws.iter().find(|w| w.is_initial()) {
            for w in ws.iter().filter(|w| !w.is_initial()) {
                cmds.push(Command::Assert(Term::lt(
                    Term::var(relations::co_var(init)),
                    Term::var(relations::co_var(w)),
                )));
            }
        }
    }

    // Ranks: initial writes are pinned to their (negative) ids so they cannot
    // float above program events; program events rank strictly positive.
    cmds.push(Command::Comment("event ranks".to_string()));
    for e in &events {
        if e.is_initial() {
            cmds.push(Command::Assert(Term::eq(rank(e), Term::int(e.id))));
        } else {
            cmds.push(Command::Assert(Term::gt(rank(e), Term::int(0))));
        }
    }

    // Acyclicity: rank strictly increases along every ppo, co, and fr edge.
    // (The rf edge is the rf-timing axiom, emitted with the other axioms.)
    cmds.push(Command::Comment("acyclicity".to_string()));
    let ppo: fn(&Event, &Event) -> bool = match mode {
        Mode::Sc => relations::ppo_sc,
        Mode::Ra | Mode::Relaxed => relations::ppo_relaxed,
    };
    for e1 in &events {
        for e2 in &events {
            if ppo(e1, e2) {
                cmds.push(Command::Assert(Term::lt(rank(e1), rank(e2))));
            }
        }
    }
    for w1 in &writes {
        for w2 in &writes {
            if w1.id != w2.id && w1.addr == w2.addr {
                cmds.push(Command::Assert(Term::implies(
                    co(w1, w2),
                    Term::lt(rank(w1), rank(w2)),
                )));
            }
        }
    }
    for r in &reads {
        for w2 in &writes {
            if w2.addr == r.addr {
                let fr_edge = fr(trace, r, w2);
                cmds.push(Command::Assert(Term::implies(
                    fr_edge,
                    Term::lt(rank(r), rank(w2)),
                )));
            }
        }
    }

    Encoding {
        commands: cmds,
        ctx: Ctx::new(trace),
    }
}
