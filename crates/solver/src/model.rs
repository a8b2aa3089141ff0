/// A satisfying assignment extracted from the solver's `(get-model)` output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model {
    /// Variable assignments: `(name, value_text)` pairs in output order.
    pub assignments: Vec<(String, String)>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assignments(assignments: Vec<(String, String)>) -> Self {
        Self { assignments }
    }

    /// Look up a variable's raw value text by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up an integer value, accepting both `5` and `(- 5)` spellings.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        parse_int(self.get(name)?)
    }

    /// Look up a boolean value.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Parse an SMT-LIB integer value: `42`, `-42`, or `(- 42)`.
fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(inner) = text.strip_prefix("(-").and_then(|s| s.strip_suffix(')')) {
        return inner.trim().parse::<i64>().ok().map(|n| -n);
    }
    text.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_model() {
        let model = Model::new();
        assert!(model.is_empty());
        assert_eq!(model.get("x"), None);
        assert_eq!(model.get_int("x"), None);
    }

    #[test]
    fn raw_lookup() {
        let model = Model::with_assignments(vec![
            ("x".to_string(), "42".to_string()),
            ("p".to_string(), "true".to_string()),
        ]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.get("x"), Some("42"));
        assert_eq!(model.get("p"), Some("true"));
        assert_eq!(model.get("missing"), None);
    }

    #[test]
    fn typed_int_lookup() {
        let model = Model::with_assignments(vec![
            ("a".to_string(), "7".to_string()),
            ("b".to_string(), "(- 3)".to_string()),
            ("c".to_string(), "(-  12)".to_string()),
            ("junk".to_string(), "#x0a".to_string()),
        ]);
        assert_eq!(model.get_int("a"), Some(7));
        assert_eq!(model.get_int("b"), Some(-3));
        assert_eq!(model.get_int("c"), Some(-12));
        assert_eq!(model.get_int("junk"), None);
    }

    #[test]
    fn typed_bool_lookup() {
        let model = Model::with_assignments(vec![
            ("p".to_string(), "true".to_string()),
            ("q".to_string(), "false".to_string()),
            ("r".to_string(), "5".to_string()),
        ]);
        assert_eq!(model.get_bool("p"), Some(true));
        assert_eq!(model.get_bool("q"), Some(false));
        assert_eq!(model.get_bool("r"), None);
    }
}
