//! Witness reconstruction and rendering.
//!
//! A satisfying model fixes every rank, every coherence rank, every rf
//! choice, and every read value. This module pulls those numbers back out of
//! the solver model and presents the execution as an ordered trace with rf
//! edges. Output is informational only.

use std::fmt;

use wmv_solver::Model;

use crate::event::{Event, EventKind, MemOrder, Trace};
use crate::relations;

/// One event of a concrete execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitnessEvent {
    pub id: i64,
    pub thread: i64,
    pub kind: EventKind,
    pub addr: i64,
    /// Resolved value: the written value for writes, the solver-chosen value
    /// for reads.
    pub val: i64,
    pub mode: MemOrder,
    /// Solver-assigned acyclicity rank.
    pub rank: i64,
    /// Solver-assigned coherence rank (writes only).
    pub co_rank: Option<i64>,
    /// Id of the rf source (reads only).
    pub rf: Option<i64>,
}

/// A concrete execution extracted from a satisfying model, ordered by
/// (rank, id) ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    pub events: Vec<WitnessEvent>,
}

impl Witness {
    /// Reconstruct the execution for `trace` from a solver model.
    ///
    /// Values the solver left unconstrained (or a missing model altogether)
    /// fall back to the event's static data; an absent rank falls back to the
    /// event id so initial writes stay in front.
    pub fn from_model(trace: &Trace, model: Option<&Model>) -> Witness {
        let mut events: Vec<WitnessEvent> = trace
            .events()
            .iter()
            .map(|e| reconstruct(trace, e, model))
            .collect();
        events.sort_by_key(|we| (we.rank, we.id));
        Witness { events }
    }

    /// Look up a witness event by id.
    pub fn event(&self, id: i64) -> Option<&WitnessEvent> {
        self.events.iter().find(|we| we.id == id)
    }

    /// The resolved value of a read, by event id.
    pub fn read_value(&self, id: i64) -> Option<i64> {
        self.event(id)
            .filter(|we| we.kind == EventKind::Read)
            .map(|we| we.val)
    }

    /// The rf source of a read, by event id.
    pub fn rf_source(&self, id: i64) -> Option<i64> {
        self.event(id).and_then(|we| we.rf)
    }

    /// Render the execution, one line per event in rank order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("  rank    id  thread  op\n");
        for we in &self.events {
            let thread = if we.thread < 0 {
                "init".to_string()
            } else {
                format!("t{}", we.thread)
            };
            let op = match we.kind {
                EventKind::Write => format!("W a{} = {}", we.addr, we.val),
                EventKind::Read => {
                    let src = we
                        .rf
                        .map(|id| format!("  <- {id}"))
                        .unwrap_or_default();
                    format!("R a{} = {}{}", we.addr, we.val, src)
                }
            };
            out.push_str(&format!(
                "{:>6} {:>5} {:>7}  {} ({})\n",
                we.rank, we.id, thread, op, we.mode
            ));
        }
        out
    }
}

impl fmt::Display for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn reconstruct(trace: &Trace, e: &Event, model: Option<&Model>) -> WitnessEvent {
    let rank = model
        .and_then(|m| m.get_int(&relations::rank_var(e)))
        .unwrap_or(e.id);

    let co_rank = if e.is_write() {
        model.and_then(|m| m.get_int(&relations::co_var(e)))
    } else {
        None
    };

    let (val, rf) = match e.kind {
        EventKind::Write => (e.val, None),
        EventKind::Read => {
            let source = trace
                .writes_to(e.addr)
                .find(|w| {
                    model
                        .and_then(|m| m.get_bool(&relations::rf_var(e, w)))
                        .unwrap_or(false)
                })
                .map(|w| w.id);
            let val = model
                .and_then(|m| m.get_int(&relations::rval_var(e)))
                .or_else(|| source.and_then(|id| trace.get(id)).map(|w| w.val))
                .unwrap_or(0);
            (val, source)
        }
    };

    WitnessEvent {
        id: e.id,
        thread: e.thread,
        kind: e.kind,
        addr: e.addr,
        val,
        mode: e.mode,
        rank,
        co_rank,
        rf,
    }
}
