//! Built-in verification scenarios.
//!
//! The subject is a two-slot producer/consumer ring buffer: the producer
//! fills a slot and publishes it by advancing the tail; the consumer polls
//! the tail, reads the slot behind it, and acknowledges through the head.
//! Ordering bugs show up as stale slot data visible after a tail advance, or
//! as both sides sleeping on stale progress counters.
//!
//! Addresses: DATA0=0, DATA1=1, TAIL=2, HEAD=3. Producer is thread 1,
//! consumer thread 2. Initial writes at ids -4..-1 zero the addresses.

use wmv_model::{Analysis, Ctx, Event, MemOrder, Mode, PredicateError, Trace, Verdict, VerifyError};
use wmv_smtlib::term::Term;
use wmv_solver::CliSolver;

pub const DATA0: i64 = 0;
pub const DATA1: i64 = 1;
pub const TAIL: i64 = 2;
pub const HEAD: i64 = 3;

/// What a scenario is supposed to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// No admitted execution reaches the violation (unsat).
    Verified,
    /// The violation is reachable (sat) and a witness is printed.
    Counterexample,
}

type PredicateFn = fn(&Ctx) -> Result<Term, PredicateError>;

/// One built-in scenario: a trace, its violation and progress predicates,
/// and the outcome the memory model mandates.
pub struct Scenario {
    pub id: &'static str,
    pub summary: &'static str,
    pub mode: Mode,
    pub expected: Expected,
    trace: Trace,
    violation: PredicateFn,
    progress: PredicateFn,
}

impl Scenario {
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Run the scenario against a solver.
    pub fn run(&self, solver: &CliSolver) -> Result<Verdict, VerifyError> {
        Analysis::new(self.trace.clone(), self.mode).verify(
            solver,
            &self.violation,
            &self.progress,
            None,
        )
    }
}

/// Memory orders for each group of ring-buffer operations.
#[derive(Clone, Copy)]
struct RingModes {
    data_w: MemOrder,
    tail_w1: MemOrder,
    tail_w2: MemOrder,
    head_w: MemOrder,
    tail_r: MemOrder,
    data_r: MemOrder,
}

impl RingModes {
    fn uniform(mode: MemOrder) -> RingModes {
        RingModes {
            data_w: mode,
            tail_w1: mode,
            tail_w2: mode,
            head_w: mode,
            tail_r: mode,
            data_r: mode,
        }
    }
}

fn ring_trace(m: RingModes) -> Trace {
    Trace::build(vec![
        Event::init(-4, DATA0),
        Event::init(-3, DATA1),
        Event::init(-2, TAIL),
        Event::init(-1, HEAD),
        // producer: fill slot 0, publish, fill slot 1, publish
        Event::write(1, 1, DATA0, 1, m.data_w),
        Event::write(2, 1, TAIL, 1, m.tail_w1),
        Event::write(3, 1, DATA1, 2, m.data_w),
        Event::write(4, 1, TAIL, 2, m.tail_w2),
        // consumer: poll tail, read slot, acknowledge; twice
        Event::read(5, 2, TAIL, m.tail_r),
        Event::read(6, 2, DATA0, m.data_r),
        Event::write(7, 2, HEAD, 1, m.head_w),
        Event::read(8, 2, TAIL, m.tail_r),
        Event::read(9, 2, DATA1, m.data_r),
        Event::write(10, 2, HEAD, 0, m.head_w),
    ])
    .expect("ring trace is well-formed")
}

/// A published slot still shows stale data.
/// Reads in trace order: tail, data0, tail, data1.
fn ring_violation(ctx: &Ctx) -> Result<Term, PredicateError> {
    Ok(Term::or(vec![
        Term::and(vec![
            Term::ge(ctx.read_val(0)?, Term::int(1)),
            Term::ne(ctx.read_val(1)?, Term::int(1)),
        ]),
        Term::and(vec![
            Term::ge(ctx.read_val(2)?, Term::int(2)),
            Term::ne(ctx.read_val(3)?, Term::int(2)),
        ]),
    ]))
}

/// The consumer observed both tail advances.
fn ring_progress(ctx: &Ctx) -> Result<Term, PredicateError> {
    Ok(Term::and(vec![
        Term::eq(ctx.read_val(0)?, Term::int(1)),
        Term::eq(ctx.read_val(2)?, Term::int(2)),
    ]))
}

/// One produce-consume cycle, then the producer polls HEAD while the
/// consumer polls TAIL.
fn deadlock_trace(w: MemOrder, r: MemOrder) -> Trace {
    Trace::build(vec![
        Event::init(-3, DATA0),
        Event::init(-2, TAIL),
        Event::init(-1, HEAD),
        Event::write(1, 1, DATA0, 1, w),
        Event::write(2, 1, TAIL, 1, w),
        Event::read(3, 1, HEAD, r),
        Event::read(4, 2, TAIL, r),
        Event::read(5, 2, DATA0, r),
        Event::write(6, 2, HEAD, 1, w),
        Event::read(7, 2, TAIL, r),
    ])
    .expect("deadlock trace is well-formed")
}

/// Both sides see a stale zero and would sleep forever.
/// Reads in trace order: head (producer), tail, data0, tail (poll).
fn deadlock_violation(ctx: &Ctx) -> Result<Term, PredicateError> {
    Ok(Term::and(vec![
        Term::eq(ctx.read_val(0)?, Term::int(0)),
        Term::eq(ctx.read_val(3)?, Term::int(0)),
    ]))
}

/// The first cycle did complete.
fn deadlock_progress(ctx: &Ctx) -> Result<Term, PredicateError> {
    Ok(Term::and(vec![
        Term::eq(ctx.read_val(1)?, Term::int(1)),
        Term::eq(ctx.read_val(2)?, Term::int(1)),
    ]))
}

/// All built-in scenarios, in presentation order.
pub fn all() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "p1",
            summary: "ring buffer, everything sc",
            mode: Mode::Ra,
            expected: Expected::Verified,
            trace: ring_trace(RingModes::uniform(MemOrder::Sc)),
            violation: ring_violation,
            progress: ring_progress,
        },
        Scenario {
            id: "p2",
            summary: "ring buffer, everything relaxed",
            mode: Mode::Ra,
            expected: Expected::Counterexample,
            trace: ring_trace(RingModes::uniform(MemOrder::Rlx)),
            violation: ring_violation,
            progress: ring_progress,
        },
        Scenario {
            id: "p3",
            summary: "ring buffer, all writes rel / all reads acq",
            mode: Mode::Ra,
            expected: Expected::Verified,
            trace: ring_trace(RingModes {
                data_w: MemOrder::Rel,
                tail_w1: MemOrder::Rel,
                tail_w2: MemOrder::Rel,
                head_w: MemOrder::Rel,
                tail_r: MemOrder::Acq,
                data_r: MemOrder::Acq,
            }),
            violation: ring_violation,
            progress: ring_progress,
        },
        Scenario {
            id: "p4",
            summary: "ring buffer, minimal rel/acq on the tail",
            mode: Mode::Ra,
            expected: Expected::Verified,
            trace: ring_trace(RingModes {
                data_w: MemOrder::Rlx,
                tail_w1: MemOrder::Rel,
                tail_w2: MemOrder::Rel,
                head_w: MemOrder::Rlx,
                tail_r: MemOrder::Acq,
                data_r: MemOrder::Rlx,
            }),
            violation: ring_violation,
            progress: ring_progress,
        },
        Scenario {
            id: "p5",
            summary: "ring buffer, first tail advance left relaxed",
            mode: Mode::Ra,
            expected: Expected::Counterexample,
            trace: ring_trace(RingModes {
                data_w: MemOrder::Rlx,
                tail_w1: MemOrder::Rlx,
                tail_w2: MemOrder::Rel,
                head_w: MemOrder::Rlx,
                tail_r: MemOrder::Acq,
                data_r: MemOrder::Rlx,
            }),
            violation: ring_violation,
            progress: ring_progress,
        },
        Scenario {
            id: "deadlock-sc",
            summary: "sleep/wake handshake, everything sc",
            mode: Mode::Ra,
            expected: Expected::Verified,
            trace: deadlock_trace(MemOrder::Sc, MemOrder::Sc),
            violation: deadlock_violation,
            progress: deadlock_progress,
        },
        Scenario {
            id: "deadlock-rlx",
            summary: "sleep/wake handshake, everything relaxed",
            mode: Mode::Ra,
            expected: Expected::Counterexample,
            trace: deadlock_trace(MemOrder::Rlx, MemOrder::Rlx),
            violation: deadlock_violation,
            progress: deadlock_progress,
        },
        Scenario {
            id: "deadlock-ra",
            summary: "sleep/wake handshake, rel/acq on distinct addresses",
            mode: Mode::Ra,
            expected: Expected::Counterexample,
            trace: deadlock_trace(MemOrder::Rel, MemOrder::Acq),
            violation: deadlock_violation,
            progress: deadlock_progress,
        },
    ]
}

/// Find a scenario by id.
pub fn find(id: &str) -> Option<Scenario> {
    all().into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_ids_are_unique() {
        let scenarios = all();
        let mut ids: Vec<&str> = scenarios.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), scenarios.len());
    }

    #[test]
    fn find_by_id() {
        assert_eq!(find("p3").unwrap().expected, Expected::Verified);
        assert_eq!(find("deadlock-rlx").unwrap().expected, Expected::Counterexample);
        assert!(find("p99").is_none());
    }

    #[test]
    fn ring_traces_have_the_documented_shape() {
        let s = find("p1").unwrap();
        let trace = s.trace();
        assert_eq!(trace.events().len(), 14);
        assert_eq!(trace.reads().count(), 4);
        assert_eq!(trace.addresses(), vec![DATA0, DATA1, TAIL, HEAD]);
        // Tail is written by the producer and read by the consumer
        for w in trace.writes_to(TAIL).filter(|w| !w.is_initial()) {
            assert_eq!(w.thread, 1);
        }
    }

    #[test]
    fn predicates_reference_valid_reads() {
        // Evaluate every scenario's predicates against its own trace; any
        // out-of-range read index would error here.
        for s in all() {
            let encoding = wmv_model::encode(s.trace(), s.mode);
            (s.violation)(&encoding.ctx).unwrap();
            (s.progress)(&encoding.ctx).unwrap();
        }
    }

    #[test]
    fn p5_differs_from_p4_only_in_the_first_tail_advance() {
        let p4 = find("p4").unwrap();
        let p5 = find("p5").unwrap();
        let tail_writes = |t: &Trace| -> Vec<MemOrder> {
            t.writes_to(TAIL)
                .filter(|w| !w.is_initial())
                .map(|w| w.mode)
                .collect()
        };
        assert_eq!(tail_writes(p4.trace()), vec![MemOrder::Rel, MemOrder::Rel]);
        assert_eq!(tail_writes(p5.trace()), vec![MemOrder::Rlx, MemOrder::Rel]);
    }
}
