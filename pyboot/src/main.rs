use anyhow::{Context, Result};

use pyboot_core::config::EnvConfig;
use pyboot_core::observability;
use pyboot_env::{BootstrapConfig, BootstrapError, Bootstrapper, SystemInvoker};

fn main() {
    observability::init_tracing();

    let exit = match run() {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!("{err:#}");
            err.downcast_ref::<BootstrapError>()
                .map(BootstrapError::exit_code)
                .unwrap_or(1)
        }
    };
    std::process::exit(exit);
}

/// No flags, no subcommands: the project root is the current directory and
/// everything else comes from `EnvConfig` defaults.
fn run() -> Result<()> {
    let project_root = std::env::current_dir().context("Resolve current directory")?;
    let env_cfg = EnvConfig::from_env();

    let mut config = BootstrapConfig::new(project_root);
    config.env_dir_name = env_cfg.env_dir_name;
    config.python = env_cfg.python;

    Bootstrapper::new(config, &SystemInvoker).run()?;
    tracing::info!("Environment ready");
    Ok(())
}
