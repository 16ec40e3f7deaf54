//! Webshell configuration.
//!
//! A configuration document selects one of two run modes: `go-url` opens a
//! single window directly, `with-session` attaches to a remote orchestrator.
//! Window appearance is described by [`WindowOptions`], which every source
//! (CLI, config file, remote command) funnels through so the same defaults
//! and size clamps apply everywhere.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use webshell_config::{load_run_mode, RunMode};
//!
//! let (path, mode) = load_run_mode(None, None).expect("failed to load config");
//! match mode {
//!     RunMode::Direct(options) => println!("{}: open {}", path.display(), options.url()),
//!     RunMode::Orchestrated(session) => println!("{}: attach {}", path.display(), session.url),
//! }
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_path, resolve_config_path};
pub use schema::{
    ConfigDocument, GoUrlConfig, RunMode, SessionConfig, WindowFlags, WindowOptions,
    DEFAULT_TITLE, DEFAULT_URL, MIN_WINDOW_SIZE,
};

use std::path::PathBuf;

use webshell_common::ConfigError;

/// Resolve the config path from the CLI selectors, load it and pick the run mode.
///
/// Returns the path that was read alongside the mode so callers can report it.
pub fn load_run_mode(
    file: Option<&str>,
    preset: Option<&str>,
) -> Result<(PathBuf, RunMode), ConfigError> {
    let base_dir = loader::executable_dir()?;
    let path = resolve_config_path(file, preset, &base_dir);
    let document = load_from_path(&path)?;
    let mode = document.run_mode(&path)?;
    Ok((path, mode))
}
