//! Base interpreter discovery and environment directory layout.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;

/// Resolved interpreter location inside an environment directory.
#[derive(Debug, Clone)]
pub struct EnvPaths {
    pub env_dir: PathBuf,
    /// Interpreter path: `bin/python` on Unix, `Scripts/python.exe` on Windows.
    pub python: PathBuf,
}

impl EnvPaths {
    /// Resolve the expected interpreter path for an environment directory.
    /// Does not touch the filesystem; the directory may not exist yet.
    pub fn resolve(env_dir: &Path) -> Self {
        #[cfg(windows)]
        let python = env_dir.join("Scripts").join("python.exe");
        #[cfg(not(windows))]
        let python = env_dir.join("bin").join("python");
        Self {
            env_dir: env_dir.to_path_buf(),
            python,
        }
    }

    /// Whether the environment directory actually holds an interpreter.
    /// A pre-existing directory that fails this probe is still reused as-is;
    /// callers only warn.
    pub fn looks_intact(&self) -> bool {
        self.python.exists()
    }
}

/// Find a base interpreter for environment creation: explicit override first,
/// then PATH lookup, then a `--version` probe as a last resort.
pub fn find_base_python(overridden: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = overridden {
        return Ok(p.to_path_buf());
    }
    for name in ["python3", "python"] {
        if let Ok(p) = which::which(name) {
            return Ok(p);
        }
    }
    for name in ["python3", "python"] {
        let out = Command::new(name).arg("--version").output();
        if matches!(out, Ok(ref o) if o.status.success()) {
            return Ok(PathBuf::from(name));
        }
    }
    anyhow::bail!("python3 or python not found in PATH")
}
