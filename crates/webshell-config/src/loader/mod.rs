//! Config file location and loading.

mod document;
mod paths;

#[cfg(test)]
mod tests;

pub use document::load_from_path;
pub use paths::{executable_dir, platform_config_path, resolve_config_path, PRESET_DIR};
