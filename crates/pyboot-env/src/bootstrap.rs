//! The three-step bootstrap sequence: ensure the environment exists, upgrade
//! its installer, install the project in editable mode.
//!
//! Strictly sequential and fail-fast: a failing step halts the run, later
//! steps never execute, and the failing child's exit code is carried out
//! unchanged. No retries, no error translation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::interpreter::{find_base_python, EnvPaths};
use crate::invoker::ToolInvoker;
use pyboot_core::observability;

/// Explicit engine input: the bootstrap is a function of this config plus the
/// filesystem. Only binaries derive it from ambient state.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Directory containing the project descriptor (pyproject.toml / setup.py).
    pub project_root: PathBuf,
    /// Environment directory name, relative to `project_root`.
    pub env_dir_name: String,
    /// Base interpreter used for environment creation; `None` means PATH lookup.
    pub python: Option<PathBuf>,
}

impl BootstrapConfig {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            env_dir_name: ".venv".to_string(),
            python: None,
        }
    }

    pub fn env_dir(&self) -> PathBuf {
        self.project_root.join(&self.env_dir_name)
    }
}

/// Bootstrap steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateEnv,
    UpgradeInstaller,
    InstallProject,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::CreateEnv => "create_env",
            Step::UpgradeInstaller => "upgrade_installer",
            Step::InstallProject => "install_project",
        }
    }
}

/// Errors surfaced by the bootstrap sequence.
///
/// Step failures carry the child's exit code so callers can propagate it to
/// the shell verbatim.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("no usable Python interpreter: {0}")]
    InterpreterNotFound(String),

    #[error("{step} could not be spawned: {message}")]
    Spawn { step: &'static str, message: String },

    #[error("{step} failed with exit code {code}")]
    StepFailed { step: &'static str, code: i32 },

    #[error("{step} terminated by a signal")]
    Terminated { step: &'static str },
}

impl BootstrapError {
    /// Exit code to surface to the calling shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::StepFailed { code, .. } => *code,
            _ => 1,
        }
    }
}

/// Runs the bootstrap sequence over a [`BootstrapConfig`].
pub struct Bootstrapper<'a> {
    config: BootstrapConfig,
    invoker: &'a dyn ToolInvoker,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(config: BootstrapConfig, invoker: &'a dyn ToolInvoker) -> Self {
        Self { config, invoker }
    }

    /// Execute the three steps. Safe to call repeatedly on the same root:
    /// environment creation is skipped once the directory exists.
    pub fn run(&self) -> Result<(), BootstrapError> {
        let env_dir = self.config.env_dir();

        if env_dir.exists() {
            let paths = EnvPaths::resolve(&env_dir);
            if !paths.looks_intact() {
                tracing::warn!(
                    "Environment directory {} exists but holds no interpreter; reusing it as-is",
                    env_dir.display()
                );
            }
            tracing::debug!("Environment directory {} already exists, skipping creation", env_dir.display());
            observability::event_creation_skipped(&env_dir.to_string_lossy());
        } else {
            let base_python = find_base_python(self.config.python.as_deref())
                .map_err(|e| BootstrapError::InterpreterNotFound(e.to_string()))?;
            let env_dir_arg = env_dir.to_string_lossy();
            self.run_step(
                Step::CreateEnv,
                &base_python,
                &["-m", "venv", env_dir_arg.as_ref()],
            )?;
        }

        let env_python = EnvPaths::resolve(&env_dir).python;

        // Run pip through the env interpreter so pip can replace its own
        // launcher on Windows.
        self.run_step(
            Step::UpgradeInstaller,
            &env_python,
            &["-m", "pip", "install", "--upgrade", "pip"],
        )?;
        self.run_step(
            Step::InstallProject,
            &env_python,
            &["-m", "pip", "install", "-e", "."],
        )?;

        Ok(())
    }

    fn run_step(
        &self,
        step: Step,
        program: &Path,
        args: &[&str],
    ) -> Result<(), BootstrapError> {
        let cwd = &self.config.project_root;
        observability::event_step_started(
            step.as_str(),
            &program.to_string_lossy(),
            args,
            &cwd.to_string_lossy(),
        );

        let start = Instant::now();
        let status = self
            .invoker
            .invoke(program, args, cwd)
            .map_err(|e| BootstrapError::Spawn {
                step: step.as_str(),
                message: format!("{e:#}"),
            })?;
        observability::event_step_completed(
            step.as_str(),
            status.code.unwrap_or(-1),
            start.elapsed().as_millis() as u64,
        );

        match status.code {
            Some(0) => Ok(()),
            Some(code) => Err(BootstrapError::StepFailed {
                step: step.as_str(),
                code,
            }),
            None => Err(BootstrapError::Terminated {
                step: step.as_str(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::ToolStatus;
    use anyhow::Result;
    use std::cell::RefCell;

    #[derive(Debug, Clone)]
    struct RecordedCall {
        program: PathBuf,
        args: Vec<String>,
        cwd: PathBuf,
    }

    impl RecordedCall {
        fn line(&self) -> String {
            format!("{} {}", self.program.display(), self.args.join(" "))
        }
    }

    /// Records every invocation; optionally mimics venv's directory side
    /// effect and fails the first call whose command line matches a needle.
    #[derive(Default)]
    struct ScriptedInvoker {
        calls: RefCell<Vec<RecordedCall>>,
        create_env_dir: bool,
        fail: Option<(&'static str, i32)>,
    }

    impl ToolInvoker for ScriptedInvoker {
        fn invoke(&self, program: &Path, args: &[&str], cwd: &Path) -> Result<ToolStatus> {
            let call = RecordedCall {
                program: program.to_path_buf(),
                args: args.iter().map(|s| s.to_string()).collect(),
                cwd: cwd.to_path_buf(),
            };
            let line = call.line();
            self.calls.borrow_mut().push(call);

            if let Some((needle, code)) = self.fail {
                if line.contains(needle) {
                    return Ok(ToolStatus { code: Some(code) });
                }
            }
            if self.create_env_dir && args.first() == Some(&"-m") && args.get(1) == Some(&"venv") {
                std::fs::create_dir_all(args[2])?;
            }
            Ok(ToolStatus { code: Some(0) })
        }
    }

    fn config_for(root: &Path) -> BootstrapConfig {
        let mut cfg = BootstrapConfig::new(root);
        cfg.python = Some(PathBuf::from("/fake/bin/python3"));
        cfg
    }

    #[test]
    fn fresh_root_runs_all_three_steps_in_order() {
        let root = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker {
            create_env_dir: true,
            ..Default::default()
        };

        Bootstrapper::new(config_for(root.path()), &invoker)
            .run()
            .unwrap();

        let calls = invoker.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].line().contains("-m venv"));
        assert_eq!(calls[0].program, Path::new("/fake/bin/python3"));
        assert!(calls[1].line().ends_with("-m pip install --upgrade pip"));
        assert!(calls[2].line().ends_with("-m pip install -e ."));
        // Steps 2-3 run through the environment's own interpreter.
        let env_dir = root.path().join(".venv");
        assert!(calls[1].program.starts_with(&env_dir));
        assert!(calls[2].program.starts_with(&env_dir));
        for call in calls.iter() {
            assert_eq!(call.cwd, root.path());
        }
    }

    #[test]
    fn second_run_skips_creation() {
        let root = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker {
            create_env_dir: true,
            ..Default::default()
        };
        let cfg = config_for(root.path());

        Bootstrapper::new(cfg.clone(), &invoker).run().unwrap();
        Bootstrapper::new(cfg, &invoker).run().unwrap();

        let calls = invoker.calls.borrow();
        assert_eq!(calls.len(), 5);
        let venv_calls = calls.iter().filter(|c| c.line().contains("-m venv")).count();
        assert_eq!(venv_calls, 1);
    }

    #[test]
    fn pre_existing_env_dir_skips_creation() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join(".venv")).unwrap();
        let invoker = ScriptedInvoker::default();

        Bootstrapper::new(config_for(root.path()), &invoker)
            .run()
            .unwrap();

        let calls = invoker.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].line().contains("--upgrade"));
        assert!(calls[1].line().contains("install -e"));
    }

    #[test]
    fn custom_env_dir_name_is_honored() {
        let root = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker {
            create_env_dir: true,
            ..Default::default()
        };
        let mut cfg = config_for(root.path());
        cfg.env_dir_name = ".env-py311".to_string();

        Bootstrapper::new(cfg, &invoker).run().unwrap();

        let calls = invoker.calls.borrow();
        let expected = root.path().join(".env-py311");
        assert!(calls[0].args.contains(&expected.to_string_lossy().to_string()));
        assert!(calls[1].program.starts_with(&expected));
    }

    #[test]
    fn creation_failure_halts_the_sequence() {
        let root = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker {
            fail: Some(("-m venv", 3)),
            ..Default::default()
        };

        let err = Bootstrapper::new(config_for(root.path()), &invoker)
            .run()
            .unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::StepFailed {
                step: "create_env",
                code: 3
            }
        ));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(invoker.calls.borrow().len(), 1);
    }

    #[test]
    fn upgrade_failure_prevents_install() {
        let root = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker {
            create_env_dir: true,
            fail: Some(("--upgrade", 2)),
            ..Default::default()
        };

        let err = Bootstrapper::new(config_for(root.path()), &invoker)
            .run()
            .unwrap_err();

        assert_eq!(err.exit_code(), 2);
        let calls = invoker.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(!calls.iter().any(|c| c.line().contains("install -e")));
    }

    #[test]
    fn missing_descriptor_fails_only_the_install_step() {
        // A missing pyproject.toml surfaces as the install child's own
        // failure; steps 1-2 still complete beforehand.
        let root = tempfile::tempdir().unwrap();
        let invoker = ScriptedInvoker {
            create_env_dir: true,
            fail: Some(("install -e", 1)),
            ..Default::default()
        };

        let err = Bootstrapper::new(config_for(root.path()), &invoker)
            .run()
            .unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::StepFailed {
                step: "install_project",
                ..
            }
        ));
        assert_ne!(err.exit_code(), 0);
        assert_eq!(invoker.calls.borrow().len(), 3);
    }

    #[test]
    fn signal_death_maps_to_exit_code_one() {
        struct KilledInvoker;
        impl ToolInvoker for KilledInvoker {
            fn invoke(&self, _: &Path, _: &[&str], _: &Path) -> Result<ToolStatus> {
                Ok(ToolStatus { code: None })
            }
        }

        let root = tempfile::tempdir().unwrap();
        let err = Bootstrapper::new(config_for(root.path()), &KilledInvoker)
            .run()
            .unwrap_err();
        assert!(matches!(err, BootstrapError::Terminated { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn spawn_failure_is_reported_per_step() {
        struct BrokenInvoker;
        impl ToolInvoker for BrokenInvoker {
            fn invoke(&self, program: &Path, _: &[&str], _: &Path) -> Result<ToolStatus> {
                anyhow::bail!("No such file or directory: {}", program.display())
            }
        }

        let root = tempfile::tempdir().unwrap();
        let err = Bootstrapper::new(config_for(root.path()), &BrokenInvoker)
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Spawn {
                step: "create_env",
                ..
            }
        ));
        assert_eq!(err.exit_code(), 1);
    }
}
