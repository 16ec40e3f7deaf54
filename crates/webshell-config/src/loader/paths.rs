//! Config path resolution.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use webshell_common::ConfigError;

/// Directory next to the executable holding named presets.
pub const PRESET_DIR: &str = "cfg-presets";

const CONFIG_FILE: &str = "config.json";

/// Directory containing the running executable.
pub fn executable_dir() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(|source| ConfigError::Io {
        context: "could not locate executable".into(),
        source,
    })?;
    parent_dir(&exe)
}

pub(super) fn parent_dir(exe: &Path) -> Result<PathBuf, ConfigError> {
    exe.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::Io {
            context: format!("could not locate directory of {}", exe.display()),
            source: io::Error::new(io::ErrorKind::NotFound, "no parent directory"),
        })
}

/// Platform config file: `~/.config/webshell/config.json` on Linux.
pub fn platform_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("webshell").join(CONFIG_FILE))
}

/// Pick the config file to read.
///
/// Precedence: explicit `file`, then `preset` under `<base>/cfg-presets/`,
/// then `<base>/config.json`, then the platform config path. When neither
/// default exists the base-dir path is returned so the caller reports it.
pub fn resolve_config_path(file: Option<&str>, preset: Option<&str>, base_dir: &Path) -> PathBuf {
    if let Some(file) = file.filter(|f| !f.is_empty()) {
        debug!(file, "using explicit config file");
        return PathBuf::from(file);
    }
    if let Some(preset) = preset.filter(|p| !p.is_empty()) {
        debug!(preset, "using config preset");
        return base_dir.join(PRESET_DIR).join(format!("{preset}.json"));
    }

    let beside_exe = base_dir.join(CONFIG_FILE);
    if beside_exe.is_file() {
        return beside_exe;
    }
    match platform_config_path() {
        Some(platform) if platform.is_file() => platform,
        _ => beside_exe,
    }
}
