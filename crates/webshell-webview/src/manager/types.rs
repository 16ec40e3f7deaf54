/// Configuration for creating a new WebView instance.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// Initial URL to load (mutually exclusive with `html`).
    pub url: Option<String>,
    /// Initial HTML content to render (mutually exclusive with `url`).
    pub html: Option<String>,
    pub transparent: bool,
    /// Whether developer tools may be opened on this view.
    pub devtools: bool,
    /// Replaces the engine's user agent when set.
    pub user_agent: Option<String>,
    /// Scripts run before any page script, in order.
    pub init_scripts: Vec<String>,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            url: None,
            html: None,
            transparent: false,
            devtools: true,
            user_agent: None,
            init_scripts: Vec::new(),
        }
    }
}

impl WebViewConfig {
    /// Create a config that loads a URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create a config that renders inline HTML.
    pub fn with_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Default::default()
        }
    }

    pub fn init_script(mut self, script: impl Into<String>) -> Self {
        self.init_scripts.push(script.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_config_keeps_defaults() {
        let cfg = WebViewConfig::with_url("https://example.org");
        assert_eq!(cfg.url.as_deref(), Some("https://example.org"));
        assert!(cfg.html.is_none());
        assert!(cfg.devtools);
        assert!(cfg.user_agent.is_none(), "engine user agent is kept");
    }

    #[test]
    fn init_scripts_keep_order() {
        let cfg = WebViewConfig::with_html("<p></p>")
            .init_script("a()")
            .init_script("b()");
        assert_eq!(cfg.init_scripts, vec!["a()".to_string(), "b()".to_string()]);
    }
}
