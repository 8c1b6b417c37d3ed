//! External solver invocation.
//!
//! The policy solver is a separate executable that reads the exported
//! MDP files and prints the strategy artifact on stdout. Invocation is
//! a blocking subprocess call: the solver is deterministic for
//! identical inputs, so a non-zero exit aborts the pipeline with no
//! retry. Output is captured to a temporary sibling of the artifact
//! path and renamed into place only on success, so a failed run never
//! leaves a partial artifact behind.

use crate::automaton::PolicyAutomaton;
use crate::error::PolicyError;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::SystemTime;
use veer_mdp::TransitionTable;

/// Whether [`SolverCommand::ensure_fresh`] had to run the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverOutcome {
    /// The artifact existed and was newer than its parameter source.
    UpToDate,
    /// The solver ran and the artifact was regenerated.
    Regenerated,
}

/// A configured solver executable.
#[derive(Clone, Debug)]
pub struct SolverCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl SolverCommand {
    /// Configure a solver executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument (scenario base path, solver flags).
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run the solver, capturing stdout into `artifact` atomically.
    ///
    /// Blocks until the solver exits. A non-zero exit (or death by
    /// signal) removes the partial output and surfaces the status.
    pub fn run(&self, artifact: &Path) -> Result<(), PolicyError> {
        let tmp = tmp_path(artifact);
        let result = (|| -> Result<(), PolicyError> {
            let stdout = File::create(&tmp)?;
            let status = Command::new(&self.program)
                .args(&self.args)
                .stdout(Stdio::from(stdout))
                .status()?;
            if !status.success() {
                return Err(PolicyError::SolverFailed {
                    status: status.code(),
                });
            }
            Ok(())
        })();
        match result {
            Ok(()) => {
                fs::rename(&tmp, artifact)?;
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp);
                Err(e)
            }
        }
    }

    /// Regenerate `artifact` if it is missing or older than `source`.
    ///
    /// `source` is the scenario's parameter file; a stale artifact is
    /// one whose modification time predates it. The source must exist.
    pub fn ensure_fresh(
        &self,
        artifact: &Path,
        source: &Path,
    ) -> Result<SolverOutcome, PolicyError> {
        let source_mtime = mtime(source)?;
        match mtime(artifact) {
            Ok(artifact_mtime) if artifact_mtime >= source_mtime => Ok(SolverOutcome::UpToDate),
            _ => {
                self.run(artifact)?;
                Ok(SolverOutcome::Regenerated)
            }
        }
    }
}

/// Load a checked strategy, re-running the solver when the artifact is
/// missing or stale.
///
/// This is the full load-time contract: freshness check, solver
/// invocation if needed, strict parse, and the successor-map
/// consistency check against the transition table.
pub fn load_strategy(
    solver: &SolverCommand,
    artifact: &Path,
    source: &Path,
    table: &TransitionTable,
) -> Result<PolicyAutomaton, PolicyError> {
    solver.ensure_fresh(artifact, source)?;
    let automaton = PolicyAutomaton::from_path(artifact)?;
    automaton.check_against(table)?;
    Ok(automaton)
}

fn mtime(path: &Path) -> Result<SystemTime, PolicyError> {
    Ok(fs::metadata(path)?.modified()?)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}
