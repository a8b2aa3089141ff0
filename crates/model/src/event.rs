//! Event and trace model.
//!
//! A trace is a finite, totally-identified sequence of memory events.
//! Negative ids denote initial writes (one per referenced address, value 0,
//! thread −1, sequentially consistent); positive ids are program events.
//! Traces are validated once at construction and immutable afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-event memory order tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemOrder {
    /// Sequentially consistent
    Sc,
    /// Release (writes)
    Rel,
    /// Acquire (reads)
    Acq,
    /// Relaxed
    Rlx,
}

impl fmt::Display for MemOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemOrder::Sc => write!(f, "sc"),
            MemOrder::Rel => write!(f, "rel"),
            MemOrder::Acq => write!(f, "acq"),
            MemOrder::Rlx => write!(f, "rlx"),
        }
    }
}

/// Kind of memory operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Read,
    Write,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Read => write!(f, "read"),
            EventKind::Write => write!(f, "write"),
        }
    }
}

/// One atomic memory operation.
///
/// `val` is meaningful for writes only; for reads the value is chosen by the
/// solver, and the schema defaults the field to 0 when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub thread: i64,
    pub kind: EventKind,
    pub addr: i64,
    #[serde(default)]
    pub val: i64,
    pub mode: MemOrder,
}

impl Event {
    /// A program read.
    pub fn read(id: i64, thread: i64, addr: i64, mode: MemOrder) -> Event {
        Event {
            id,
            thread,
            kind: EventKind::Read,
            addr,
            val: 0,
            mode,
        }
    }

    /// A program write.
    pub fn write(id: i64, thread: i64, addr: i64, val: i64, mode: MemOrder) -> Event {
        Event {
            id,
            thread,
            kind: EventKind::Write,
            addr,
            val,
            mode,
        }
    }

    /// The initial write for `addr`, with the given negative id.
    pub fn init(id: i64, addr: i64) -> Event {
        Event {
            id,
            thread: -1,
            kind: EventKind::Write,
            addr,
            val: 0,
            mode: MemOrder::Sc,
        }
    }

    pub fn is_initial(&self) -> bool {
        self.id < 0
    }

    pub fn is_read(&self) -> bool {
        self.kind == EventKind::Read
    }

    pub fn is_write(&self) -> bool {
        self.kind == EventKind::Write
    }
}

/// Trace construction failures. All are fatal: a `Trace` either validates
/// completely or is not constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// Two events share an id.
    DuplicateId(i64),
    /// An address is referenced but has no initial write.
    MissingInitialWrite(i64),
    /// An address has more than one initial write.
    DuplicateInitialWrite(i64),
    /// A negative-id event is not a well-formed initial write
    /// (must be a write of 0 by thread −1 with mode sc).
    BadInitialWrite(i64),
    /// A non-initial event has id 0 or a negative thread.
    BadEvent(i64),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::DuplicateId(id) => write!(f, "duplicate event id {id}"),
            TraceError::MissingInitialWrite(addr) => {
                write!(f, "no initial write for address {addr}")
            }
            TraceError::DuplicateInitialWrite(addr) => {
                write!(f, "more than one initial write for address {addr}")
            }
            TraceError::BadInitialWrite(id) => {
                write!(
                    f,
                    "event {id}: initial writes must write 0 with mode sc on thread -1"
                )
            }
            TraceError::BadEvent(id) => {
                write!(f, "event {id}: program events need id > 0 and thread >= 0")
            }
        }
    }
}

impl std::error::Error for TraceError {}

/// A validated, immutable sequence of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    events: Vec<Event>,
}

impl Trace {
    /// Validate and construct a trace.
    pub fn build(events: Vec<Event>) -> Result<Trace, TraceError> {
        let mut seen = std::collections::HashSet::new();
        for e in &events {
            if !seen.insert(e.id) {
                return Err(TraceError::DuplicateId(e.id));
            }
            if e.is_initial() {
                let ok = e.is_write() && e.thread == -1 && e.val == 0 && e.mode == MemOrder::Sc;
                if !ok {
                    return Err(TraceError::BadInitialWrite(e.id));
                }
            } else if e.id == 0 || e.thread < 0 {
                return Err(TraceError::BadEvent(e.id));
            }
        }

        let mut addrs: Vec<i64> = events.iter().map(|e| e.addr).collect();
        addrs.sort_unstable();
        addrs.dedup();
        for addr in addrs {
            let inits = events
                .iter()
                .filter(|e| e.is_initial() && e.addr == addr)
                .count();
            match inits {
                0 => return Err(TraceError::MissingInitialWrite(addr)),
                1 => {}
                _ => return Err(TraceError::DuplicateInitialWrite(addr)),
            }
        }

        Ok(Trace { events })
    }

    /// Events in trace order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Reads, in trace order.
    pub fn reads(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_read())
    }

    /// Writes (initial writes included), in trace order.
    pub fn writes(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_write())
    }

    /// Writes to one address, in trace order.
    pub fn writes_to(&self, addr: i64) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.is_write() && e.addr == addr)
    }

    /// Look up an event by id.
    pub fn get(&self, id: i64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// The initial write for an address, if the address is in the trace.
    pub fn initial_write(&self, addr: i64) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| e.is_initial() && e.addr == addr)
    }

    /// All addresses referenced by the trace, ascending.
    pub fn addresses(&self) -> Vec<i64> {
        let mut addrs: Vec<i64> = self.events.iter().map(|e| e.addr).collect();
        addrs.sort_unstable();
        addrs.dedup();
        addrs
    }
}

// Deserialization goes through `Trace::build` so a malformed trace can never
// enter the system via the JSON schema.
impl<'de> Deserialize<'de> for Trace {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let events = Vec::<Event>::deserialize(deserializer)?;
        Trace::build(events).map_err(serde::de::Error::custom)
    }
}
