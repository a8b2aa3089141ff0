use crate::model::Model;

/// What the solver concluded about one query.
///
/// For the memory-model encoding the three outcomes read as: `Sat` — the
/// constraint system admits an execution, and the model (when the solver
/// printed one) fixes every rank, coherence rank, rf choice, and read value
/// the witness needs; `Unsat` — no admitted execution exists; `Unknown` —
/// the solver gave up, with its reason. `Unknown` must always reach the
/// caller: a timeout passing for unsat would turn a bug witness search into
/// a false "verified".
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult {
    /// Satisfiable, with the parsed `(get-model)` assignment when available.
    Sat(Option<Model>),
    /// Unsatisfiable.
    Unsat,
    /// No verdict; carries the solver's stated reason.
    Unknown(String),
}

impl SolverResult {
    /// Short outcome tag for log lines: `sat`, `unsat`, or `unknown`.
    pub fn label(&self) -> &'static str {
        match self {
            SolverResult::Sat(_) => "sat",
            SolverResult::Unsat => "unsat",
            SolverResult::Unknown(_) => "unknown",
        }
    }

    pub fn is_sat(&self) -> bool {
        self.label() == "sat"
    }

    pub fn is_unsat(&self) -> bool {
        self.label() == "unsat"
    }

    pub fn is_unknown(&self) -> bool {
        self.label() == "unknown"
    }

    /// Borrow the model, when the result is `Sat` and one was printed.
    pub fn model(&self) -> Option<&Model> {
        match self {
            SolverResult::Sat(Some(model)) => Some(model),
            _ => None,
        }
    }

    /// Consume the result, keeping only a printed `Sat` model. Witness
    /// extraction wants ownership; everything else collapses to `None`.
    pub fn into_model(self) -> Option<Model> {
        match self {
            SolverResult::Sat(model) => model,
            _ => None,
        }
    }

    /// The reason string of an `Unknown` result.
    pub fn unknown_reason(&self) -> Option<&str> {
        match self {
            SolverResult::Unknown(reason) => Some(reason.as_str()),
            _ => None,
        }
    }
}
