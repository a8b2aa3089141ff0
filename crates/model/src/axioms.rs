//! Per-mode ordering axioms.
//!
//! Layered over the structural encoding: rf timing, the sc total order, the
//! sc latest-visible rule, and release-acquire happens-before. Which of these
//! fire is controlled by the event modes themselves; the analysis [`Mode`]
//! only selects the ppo variant (in the encoder) and whether release-acquire
//! visibility is enforced at all.

use std::fmt;

use wmv_smtlib::command::Command;
use wmv_smtlib::term::Term;

use crate::event::{Event, MemOrder, Trace};
use crate::relations::{co, is_acquire, is_release, rank, rf};

/// Analysis mode: which ordering guarantees the model grants by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full per-thread order (ppo = po) plus all axioms.
    Sc,
    /// Relaxed ppo, release-acquire visibility enforced.
    Ra,
    /// Relaxed ppo, no release-acquire visibility.
    Relaxed,
}

impl Mode {
    /// Whether release-acquire happens-before edges are emitted.
    pub fn release_acquire(&self) -> bool {
        matches!(self, Mode::Sc | Mode::Ra)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Sc => write!(f, "sc"),
            Mode::Ra => write!(f, "ra"),
            Mode::Relaxed => write!(f, "relaxed"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sc" => Ok(Mode::Sc),
            "ra" => Ok(Mode::Ra),
            "relaxed" | "rlx" => Ok(Mode::Relaxed),
            _ => Err(format!("unknown mode: {s}. Valid options: sc, ra, relaxed")),
        }
    }
}

/// Emit the ordering axioms for a trace under the given mode.
pub fn emit(trace: &Trace, mode: Mode) -> Vec<Command> {
    let mut events: Vec<&Event> = trace.events().iter().collect();
    events.sort_by_key(|e| e.id);
    let reads: Vec<&Event> = events.iter().copied().filter(|e| e.is_read()).collect();
    let writes: Vec<&Event> = events.iter().copied().filter(|e| e.is_write()).collect();

    let mut cmds = Vec::new();

    // rf timing: a read ranks after its source. po/co/fr cover much of this,
    // but rf edges cross threads and must order on their own.
    cmds.push(Command::Comment("rf timing".to_string()));
    for r in &reads {
        for w in &writes {
            if w.addr == r.addr {
                cmds.push(Command::Assert(Term::implies(
                    rf(r, w),
                    Term::lt(rank(w), rank(r)),
                )));
            }
        }
    }

    // sc total order: together with acyclicity, distinct ranks yield a strict
    // total order on sc events.
    let sc_events: Vec<&Event> = events
        .iter()
        .copied()
        .filter(|e| e.mode == MemOrder::Sc)
        .collect();
    if sc_events.len() >= 2 {
        cmds.push(Command::Comment("sc total order".to_string()));
        cmds.push(Command::Assert(Term::Distinct(
            sc_events.iter().map(|e| rank(e)).collect(),
        )));
    }

    // sc latest-visible: an sc read sees the co-maximal write ranked before
    // it. Without this the solver may pick a stale source whose rank happens
    // to precede the read.
    cmds.push(Command::Comment("sc latest-visible".to_string()));
    for r in reads.iter().filter(|r| r.mode == MemOrder::Sc) {
        for w in writes.iter().filter(|w| w.addr == r.addr) {
            for w2 in writes.iter().filter(|w2| w2.addr == r.addr && w2.id != w.id) {
                cmds.push(Command::Assert(Term::not(Term::and(vec![
                    rf(r, w),
                    co(w, w2),
                    Term::lt(rank(w2), rank(r)),
                ]))));
            }
        }
    }

    // Release-acquire happens-before: when an acquire read takes its value
    // from a release write, everything sequenced before the write ranks
    // before everything sequenced after the read. Message passing, in rank
    // form. An acquire reading from a non-release source creates no edge.
    if mode.release_acquire() {
        cmds.push(Command::Comment("release-acquire visibility".to_string()));
        for w in writes
            .iter()
            .filter(|w| !w.is_initial() && is_release(w.mode))
        {
            for r in reads
                .iter()
                .filter(|r| r.addr == w.addr && is_acquire(r.mode))
            {
                for pre in events.iter().filter(|e| crate::relations::po(e, w)) {
                    for post in events.iter().filter(|e| crate::relations::po(r, e)) {
                        cmds.push(Command::Assert(Term::implies(
                            rf(r, w),
                            Term::lt(rank(pre), rank(post)),
                        )));
                    }
                }
            }
        }
    }

    cmds
}
