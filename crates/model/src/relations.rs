//! Relation kernel.
//!
//! Concrete relations (program order and its preserved subsets) plus the
//! symbolic vocabulary: one boolean `rf_{r}_{w}` per read/write pair, one
//! integer coherence rank `co_{w}` per write, one integer `rank_{e}` per
//! event, and one integer `rval_{r}` per read. Derived relations (co as rank
//! comparison, fr as an existential over intermediate writes) are built here
//! as terms so the encoder and the axioms share one definition.

use wmv_smtlib::term::Term;

use crate::event::{Event, MemOrder, Trace};

/// Program order: same thread, smaller id first.
pub fn po(e1: &Event, e2: &Event) -> bool {
    e1.thread == e2.thread && e1.id < e2.id
}

/// Preserved program order under sequential consistency: all of po.
pub fn ppo_sc(e1: &Event, e2: &Event) -> bool {
    po(e1, e2)
}

/// Preserved program order under the relaxed model: only pairs with an
/// sc endpoint force per-thread order into the global constraint system.
/// Everything else is left to the solver, constrained only by rf/co/fr.
pub fn ppo_relaxed(e1: &Event, e2: &Event) -> bool {
    po(e1, e2) && (e1.mode == MemOrder::Sc || e2.mode == MemOrder::Sc)
}

/// True for orders with release semantics on writes.
pub fn is_release(mode: MemOrder) -> bool {
    matches!(mode, MemOrder::Rel | MemOrder::Sc)
}

/// True for orders with acquire semantics on reads.
pub fn is_acquire(mode: MemOrder) -> bool {
    matches!(mode, MemOrder::Acq | MemOrder::Sc)
}

/// Spell an event id inside a solver symbol. Negative ids (initial writes)
/// become `m<abs>` so symbols stay alphanumeric: `rank_m4`, `rf_5_m1`.
pub fn id_tag(id: i64) -> String {
    if id < 0 {
        format!("m{}", id.unsigned_abs())
    } else {
        id.to_string()
    }
}

/// Name of the rf choice variable for read `r` and write `w`.
pub fn rf_var(r: &Event, w: &Event) -> String {
    format!("rf_{}_{}", id_tag(r.id), id_tag(w.id))
}

/// Name of the coherence rank variable for write `w`.
pub fn co_var(w: &Event) -> String {
    format!("co_{}", id_tag(w.id))
}

/// Name of the acyclicity rank variable for event `e`.
pub fn rank_var(e: &Event) -> String {
    format!("rank_{}", id_tag(e.id))
}

/// Name of the symbolic value variable for read `r`.
pub fn rval_var(r: &Event) -> String {
    format!("rval_{}", id_tag(r.id))
}

/// The symbolic rf predicate: statically false unless `r` is a read and `w`
/// a write to the same address, otherwise the rf choice variable.
pub fn rf(r: &Event, w: &Event) -> Term {
    if r.is_read() && w.is_write() && r.addr == w.addr {
        Term::var(rf_var(r, w))
    } else {
        Term::BoolLit(false)
    }
}

/// The symbolic co predicate: `w1` coherence-before `w2`. Statically false
/// across addresses; same-address order is the coherence-rank comparison.
pub fn co(w1: &Event, w2: &Event) -> Term {
    if w1.is_write() && w2.is_write() && w1.addr == w2.addr && w1.id != w2.id {
        Term::lt(Term::var(co_var(w1)), Term::var(co_var(w2)))
    } else {
        Term::BoolLit(false)
    }
}

/// The rank of an event as a term.
pub fn rank(e: &Event) -> Term {
    Term::var(rank_var(e))
}

/// The derived from-read predicate: `fr(r, w2)` holds when `r` reads from
/// some write that `w2` overwrites. Expanded to a disjunction over the
/// candidate intermediate writes.
pub fn fr(trace: &Trace, r: &Event, w2: &Event) -> Term {
    if !r.is_read() || !w2.is_write() || r.addr != w2.addr {
        return Term::BoolLit(false);
    }
    // Enumerate intermediates in id order so the emitted formula does not
    // depend on how the trace happens to be sequenced.
    let mut intermediates: Vec<&Event> = trace.writes_to(r.addr).filter(|w1| w1.id != w2.id).collect();
    intermediates.sort_by_key(|w1| w1.id);
    let disjuncts: Vec<Term> = intermediates
        .into_iter()
        .map(|w1| Term::and(vec![rf(r, w1), co(w1, w2)]))
        .collect();
    Term::or(disjuncts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    #[test]
    fn po_is_same_thread_id_order() {
        let a = Event::write(1, 0, 0, 1, MemOrder::Rlx);
        let b = Event::read(2, 0, 0, MemOrder::Rlx);
        let c = Event::read(3, 1, 0, MemOrder::Rlx);
        assert!(po(&a, &b));
        assert!(!po(&b, &a));
        assert!(!po(&a, &c));
        assert!(!po(&a, &a));
    }

    #[test]
    fn ppo_relaxed_needs_an_sc_endpoint() {
        let w_rlx = Event::write(1, 0, 0, 1, MemOrder::Rlx);
        let w_rel = Event::write(2, 0, 1, 1, MemOrder::Rel);
        let w_sc = Event::write(3, 0, 2, 1, MemOrder::Sc);
        assert!(!ppo_relaxed(&w_rlx, &w_rel));
        assert!(ppo_relaxed(&w_rlx, &w_sc));
        assert!(ppo_relaxed(&w_sc, &w_rlx));
        // sc keeps the whole thread order
        assert!(ppo_sc(&w_rlx, &w_rel));
    }

    #[test]
    fn release_acquire_classification() {
        assert!(is_release(MemOrder::Rel));
        assert!(is_release(MemOrder::Sc));
        assert!(!is_release(MemOrder::Rlx));
        assert!(!is_release(MemOrder::Acq));
        assert!(is_acquire(MemOrder::Acq));
        assert!(is_acquire(MemOrder::Sc));
        assert!(!is_acquire(MemOrder::Rel));
        assert!(!is_acquire(MemOrder::Rlx));
    }

    #[test]
    fn symbol_names() {
        let r = Event::read(5, 1, 2, MemOrder::Acq);
        let w = Event::init(-3, 2);
        assert_eq!(id_tag(5), "5");
        assert_eq!(id_tag(-3), "m3");
        assert_eq!(rf_var(&r, &w), "rf_5_m3");
        assert_eq!(co_var(&w), "co_m3");
        assert_eq!(rank_var(&w), "rank_m3");
        assert_eq!(rval_var(&r), "rval_5");
    }

    #[test]
    fn rf_is_false_across_addresses_and_kinds() {
        let r = Event::read(1, 0, 0, MemOrder::Rlx);
        let w_same = Event::write(2, 1, 0, 1, MemOrder::Rlx);
        let w_other = Event::write(3, 1, 1, 1, MemOrder::Rlx);
        assert_eq!(rf(&r, &w_same), Term::var("rf_1_2"));
        assert_eq!(rf(&r, &w_other), Term::BoolLit(false));
        assert_eq!(rf(&w_same, &r), Term::BoolLit(false));
    }

    #[test]
    fn co_is_rank_comparison_on_same_address_writes() {
        let w1 = Event::write(1, 0, 0, 1, MemOrder::Rlx);
        let w2 = Event::write(2, 1, 0, 2, MemOrder::Rlx);
        let w3 = Event::write(3, 1, 1, 2, MemOrder::Rlx);
        assert_eq!(
            co(&w1, &w2),
            Term::lt(Term::var("co_1"), Term::var("co_2"))
        );
        assert_eq!(co(&w1, &w3), Term::BoolLit(false));
        assert_eq!(co(&w1, &w1), Term::BoolLit(false));
    }

    #[test]
    fn fr_expands_over_intermediate_writes() {
        let trace = Trace::build(vec![
            Event::init(-1, 0),
            Event::write(1, 0, 0, 1, MemOrder::Rlx),
            Event::write(2, 0, 0, 2, MemOrder::Rlx),
            Event::read(3, 1, 0, MemOrder::Rlx),
        ])
        .unwrap();
        let r = *trace.get(3).unwrap();
        let w2 = *trace.get(2).unwrap();
        let term = fr(&trace, &r, &w2);
        // One disjunct per other write to the address: init and write 1
        match term {
            Term::Or(disjuncts) => assert_eq!(disjuncts.len(), 2),
            other => panic!("expected Or, got {other:?}"),
        }
        // Cross-address fr is statically false
        let elsewhere = Event::write(9, 0, 7, 0, MemOrder::Rlx);
        assert_eq!(fr(&trace, &r, &elsewhere), Term::BoolLit(false));
    }
}
