//! ToolInvoker trait: extension point between the bootstrap sequence and real
//! child processes.
//!
//! The engine talks to external tools only through this trait; tests substitute
//! a scripted invoker. `SystemInvoker` runs the child with inherited stdio so
//! the tool's own diagnostics reach the terminal verbatim.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

/// Outcome of one external tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    /// Child exit code; `None` when the child was killed by a signal.
    pub code: Option<i32>,
}

impl ToolStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external tool to completion.
///
/// Implement this trait to intercept tool invocations (tests, dry runs).
pub trait ToolInvoker {
    /// Run `program` with `args` in `cwd`, blocking until the child exits.
    /// Stdio is inherited; the ambient environment is passed through unmodified.
    fn invoke(&self, program: &Path, args: &[&str], cwd: &Path) -> Result<ToolStatus>;
}

/// Spawns real child processes via `std::process::Command`.
pub struct SystemInvoker;

impl ToolInvoker for SystemInvoker {
    fn invoke(&self, program: &Path, args: &[&str], cwd: &Path) -> Result<ToolStatus> {
        tracing::info!("Executing command: {} {}", program.display(), args.join(" "));
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .with_context(|| format!("Spawn {}", program.display()))?;
        Ok(ToolStatus {
            code: status.code(),
        })
    }
}
