use crate::error::SolverError;
use crate::model::Model;
use crate::result::SolverResult;

/// Parse a solver's stdout into a `SolverResult`.
///
/// Expected output: a `sat`, `unsat`, or `unknown` line, followed (for `sat`)
/// by the `(get-model)` block.
pub fn parse_solver_output(stdout: &str, stderr: &str) -> Result<SolverResult, SolverError> {
    let stdout = stdout.trim();

    if stdout.is_empty() {
        if stderr.contains("timeout") {
            return Ok(SolverResult::Unknown("timeout".to_string()));
        }
        return Err(SolverError::Parse(format!(
            "empty solver output. stderr: {stderr}"
        )));
    }

    let first_line = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    match first_line {
        "unsat" => Ok(SolverResult::Unsat),
        "sat" => Ok(SolverResult::Sat(parse_model(stdout))),
        "unknown" => Ok(SolverResult::Unknown(extract_unknown_reason(
            stdout, stderr,
        ))),
        "timeout" => Ok(SolverResult::Unknown("timeout".to_string())),
        _ => Err(SolverError::Parse(format!(
            "unexpected solver output: {first_line}"
        ))),
    }
}

/// Extract the reason string for an `unknown` result.
///
/// Z3 sometimes prints a parenthesized reason on the following line.
fn extract_unknown_reason(stdout: &str, stderr: &str) -> String {
    let after_unknown = stdout
        .lines()
        .skip_while(|line| line.trim() != "unknown")
        .skip(1)
        .map(str::trim)
        .find(|line| !line.is_empty());

    if let Some(reason) = after_unknown {
        reason
            .trim_start_matches('(')
            .trim_end_matches(')')
            .to_string()
    } else if !stderr.is_empty() {
        stderr.trim().to_string()
    } else {
        "unknown".to_string()
    }
}

/// Parse the model block from solver output.
///
/// Both known Z3 formats are handled — `(model (define-fun ...))` from older
/// releases and the bare `((define-fun ...))` block from 4.15+ — as is CVC5's
/// output, which matches the bare form. Only nullary `define-fun` entries
/// (constants) are collected.
fn parse_model(output: &str) -> Option<Model> {
    if !output.contains("(define-fun ") {
        return None;
    }

    let mut assignments = Vec::new();
    let mut pos = 0;

    while let Some(def_pos) = output[pos..].find("(define-fun ") {
        let abs_pos = pos + def_pos;
        let after_define = abs_pos + "(define-fun ".len();

        match find_sexp_end(output, abs_pos) {
            Some(end) => {
                // `end` points past the closing ')'; the body excludes both
                // the opening `(define-fun ` and that final paren
                let body = &output[after_define..end - 1];
                if let Some((name, value)) = parse_define_fun(body) {
                    assignments.push((name, value));
                }
                pos = end;
            }
            None => pos = after_define,
        }
    }

    if assignments.is_empty() {
        None
    } else {
        Some(Model::with_assignments(assignments))
    }
}

/// Find the end of the S-expression starting at `start`.
/// Returns the index just past the matching close paren.
fn find_sexp_end(input: &str, start: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if start >= bytes.len() || bytes[start] != b'(' {
        return None;
    }

    let mut depth = 1usize;
    let mut i = start + 1;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
        i += 1;
    }

    if depth == 0 { Some(i) } else { None }
}

/// Parse one `define-fun` body: `name () Sort value`.
///
/// The value may span lines; whitespace is normalized first. Entries with
/// parameters are skipped — the encoding only declares constants.
fn parse_define_fun(input: &str) -> Option<(String, String)> {
    let normalized: String = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let input = normalized.trim();
    if input.is_empty() {
        return None;
    }

    let name_end = input.find(|c: char| c.is_whitespace())?;
    let name = input[..name_end].to_string();
    let rest = input[name_end..].trim_start();

    let rest = rest.strip_prefix("()")?.trim_start();

    // Skip the sort, which may be an atom (`Int`) or compound
    let after_sort = skip_sexp(rest, 0)?;
    let value = rest[after_sort..].trim().to_string();
    if value.is_empty() {
        return None;
    }
    Some((name, value))
}

/// Skip one S-expression (atom or parenthesized) starting at `pos`.
fn skip_sexp(input: &str, pos: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if pos >= bytes.len() {
        return None;
    }

    if bytes[pos] == b'(' {
        find_sexp_end(input, pos)
    } else {
        let mut i = pos;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'('
            && bytes[i] != b')'
        {
            i += 1;
        }
        Some(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_unsat() {
        let result = parse_solver_output("unsat\n", "").unwrap();
        assert_eq!(result, SolverResult::Unsat);
    }

    #[test]
    fn parse_sat_without_model() {
        let result = parse_solver_output("sat\n", "").unwrap();
        assert_eq!(result, SolverResult::Sat(None));
    }

    #[test]
    fn parse_unknown_with_reason() {
        let result = parse_solver_output("unknown\n(timeout)\n", "").unwrap();
        assert_eq!(result, SolverResult::Unknown("timeout".to_string()));
    }

    #[test]
    fn parse_empty_output_is_error() {
        assert!(parse_solver_output("", "").is_err());
    }

    #[test]
    fn parse_garbage_is_error() {
        assert!(parse_solver_output("segmentation fault\n", "").is_err());
    }

    #[test]
    fn parse_timeout_on_stderr() {
        let result = parse_solver_output("", "timeout reached").unwrap();
        assert_eq!(result, SolverResult::Unknown("timeout".to_string()));
    }

    #[test]
    fn parse_model_old_format() {
        let output = "\
sat
(model
  (define-fun rank_1 () Int 5)
  (define-fun rf_2_1 () Bool true)
)";
        let result = parse_solver_output(output, "").unwrap();
        let model = result.model().unwrap();
        assert_eq!(model.get("rank_1"), Some("5"));
        assert_eq!(model.get_bool("rf_2_1"), Some(true));
    }

    #[test]
    fn parse_model_new_format_multiline() {
        let output = "\
sat
(
  (define-fun rank_m3 () Int
    (- 3))
  (define-fun rval_5 () Int
    0)
)";
        let result = parse_solver_output(output, "").unwrap();
        let model = result.model().unwrap();
        assert_eq!(model.get_int("rank_m3"), Some(-3));
        assert_eq!(model.get_int("rval_5"), Some(0));
    }

    #[test]
    fn define_fun_with_params_is_skipped() {
        let output = "\
sat
(
  (define-fun f ((x Int)) Int (+ x 1))
  (define-fun c () Int 2)
)";
        let result = parse_solver_output(output, "").unwrap();
        let model = result.model().unwrap();
        assert_eq!(model.len(), 1);
        assert_eq!(model.get_int("c"), Some(2));
    }

    #[test]
    fn find_sexp_end_nested() {
        let input = "(define-fun x () (_ BitVec 32) #x05)";
        assert_eq!(find_sexp_end(input, 0), Some(input.len()));
    }

    #[test]
    fn skip_sexp_atom_and_compound() {
        assert_eq!(skip_sexp("Int 5", 0), Some(3));
        assert_eq!(skip_sexp("(Array Int Int) v", 0), Some(15));
    }
}
