//! Read and parse a configuration document.

use std::path::Path;

use tracing::{info, warn};
use webshell_common::ConfigError;

use crate::schema::ConfigDocument;
use crate::validation;

/// Load a configuration document from `path`.
///
/// Files ending in `.toml` are parsed as TOML, everything else as JSON.
/// Validation problems are logged as warnings; the parsed document is still
/// returned.
pub fn load_from_path(path: &Path) -> Result<ConfigDocument, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::Io {
            context: format!("failed to read {}", path.display()),
            source: e,
        },
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let document: ConfigDocument = if is_toml {
        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?
    } else {
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse JSON: {e}")))?
    };

    for warning in validation::validate(&document) {
        warn!(path = %path.display(), "config validation warning: {warning}");
    }

    info!("loaded config from {}", path.display());
    Ok(document)
}
