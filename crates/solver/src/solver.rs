use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

use wmv_smtlib::command::Command as SmtCommand;
use wmv_smtlib::script::Script;

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::parser::parse_solver_output;
use crate::result::SolverResult;

/// Generic CLI-based SMT solver interface.
///
/// Communicates with any SMT-LIB2 compatible solver by spawning it as a
/// subprocess and piping SMT-LIB2 text. Each `check_sat` call spawns a fresh
/// process; no state is shared between calls.
#[derive(Debug)]
pub struct CliSolver {
    config: SolverConfig,
}

impl CliSolver {
    /// Create a new `CliSolver` with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a `CliSolver` with an auto-detected solver.
    pub fn with_default_config() -> Result<Self, SolverError> {
        let config = SolverConfig::auto_detect()?;
        Ok(Self { config })
    }

    /// Get a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Check satisfiability of a script.
    ///
    /// Renders the script to SMT-LIB2 text, appending `(check-sat)` and
    /// `(get-model)` if the script does not already contain them.
    pub fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError> {
        let mut smtlib = script.to_string();
        let has_check_sat = script
            .commands()
            .iter()
            .any(|c| matches!(c, SmtCommand::CheckSat));
        let has_get_model = script
            .commands()
            .iter()
            .any(|c| matches!(c, SmtCommand::GetModel));
        if !has_check_sat {
            smtlib.push_str("(check-sat)\n");
        }
        if !has_get_model {
            smtlib.push_str("(get-model)\n");
        }
        self.check_sat_raw(&smtlib)
    }

    /// Check satisfiability from a raw SMT-LIB2 string.
    pub fn check_sat_raw(&self, smtlib: &str) -> Result<SolverResult, SolverError> {
        self.config.validate()?;

        let args = self.config.build_args();
        let solver_name = self.config.kind.to_string();
        tracing::debug!(solver = %solver_name, bytes = smtlib.len(), "invoking solver");

        let mut child = Command::new(&self.config.solver_path)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SolverError::Process(format!("failed to start {solver_name}: {e}")))?;

        // Write the script and close stdin so the solver sees EOF
        {
            let mut stdin = child.stdin.take().ok_or_else(|| {
                SolverError::Process(format!("failed to open {solver_name} stdin"))
            })?;
            stdin.write_all(smtlib.as_bytes()).map_err(|e| {
                SolverError::Process(format!("failed to write to {solver_name} stdin: {e}"))
            })?;
        }

        // The solver's own timeout flag is a heuristic it can ignore on hard
        // problems; back it up with an OS-level deadline that kills the
        // process, so a hung solver becomes Unknown instead of a hang.
        let timeout_ms = self.config.timeout_ms;
        if timeout_ms > 0 {
            let child_pid = child.id();
            let (tx, rx) = mpsc::channel();
            let handle = std::thread::spawn(move || {
                let _ = tx.send(child.wait_with_output());
            });

            // 3x margin so the solver's internal timeout fires first;
            // floor of 10s gives tiny limits room for startup overhead
            let os_timeout_ms = (timeout_ms * 3).max(10_000);
            return match rx.recv_timeout(Duration::from_millis(os_timeout_ms)) {
                Ok(wait_result) => {
                    let output = wait_result.map_err(|e| {
                        SolverError::Process(format!("failed to wait for {solver_name}: {e}"))
                    })?;
                    let _ = handle.join();
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    parse_solver_output(&stdout, &stderr)
                }
                Err(_) => {
                    kill_process(child_pid);
                    let _ = handle.join();
                    tracing::debug!(solver = %solver_name, "killed after OS-level timeout");
                    Ok(SolverResult::Unknown(format!(
                        "{solver_name} killed after {os_timeout_ms}ms OS-level timeout"
                    )))
                }
            };
        }

        // No timeout configured: wait indefinitely
        let output = child
            .wait_with_output()
            .map_err(|e| SolverError::Process(format!("failed to wait for {solver_name}: {e}")))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_solver_output(&stdout, &stderr)
    }
}

/// Kill a process by PID at the OS level.
///
/// Errors are ignored: if the process already exited, killing it is a no-op.
fn kill_process(pid: u32) {
    #[cfg(unix)]
    {
        // Safety: SIGKILL is always valid; pid came from a live child.
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    {
        // No portable kill-by-pid; the OS reaps the orphan when it exits.
        let _ = pid;
    }
}
