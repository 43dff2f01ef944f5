//! Environment bootstrap engine: venv creation, installer upgrade, editable install.
//!
//! Callers pass an explicit `BootstrapConfig`; the engine shells out to the base
//! interpreter and the environment's pip through the `ToolInvoker` seam.

pub mod bootstrap;
pub mod interpreter;
pub mod invoker;

pub use bootstrap::{BootstrapConfig, BootstrapError, Bootstrapper, Step};
pub use interpreter::EnvPaths;
pub use invoker::{SystemInvoker, ToolInvoker, ToolStatus};
