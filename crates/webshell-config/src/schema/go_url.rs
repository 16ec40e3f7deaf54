//! `go-url` section: open one window directly.

use serde::{Deserialize, Serialize};

/// Direct-mode settings, shared by the `go-url` CLI verb and config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GoUrlConfig {
    pub url: Option<String>,
    pub width: i64,
    pub height: i64,
    pub title: Option<String>,
    pub disable_maximize_btn: bool,
    pub disable_minimize_btn: bool,
    pub maximize_on_show: bool,
    pub no_resizable: bool,
}

impl Default for GoUrlConfig {
    fn default() -> Self {
        Self {
            url: None,
            width: 800,
            height: 450,
            title: None,
            disable_maximize_btn: false,
            disable_minimize_btn: false,
            maximize_on_show: false,
            no_resizable: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: GoUrlConfig =
            serde_json::from_str(r#"{"url":"https://example.org","no-resizable":true}"#).unwrap();
        assert_eq!(cfg.url.as_deref(), Some("https://example.org"));
        assert!(cfg.no_resizable);
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, 450);
        assert!(cfg.title.is_none());
    }

    #[test]
    fn kebab_case_toml() {
        let cfg: GoUrlConfig = toml::from_str(
            r#"
url = "https://example.org"
width = 1280
disable-maximize-btn = true
"#,
        )
        .unwrap();
        assert_eq!(cfg.width, 1280);
        assert!(cfg.disable_maximize_btn);
        assert!(!cfg.disable_minimize_btn);
    }
}
