//! Non-fatal checks on a loaded configuration document.

use crate::schema::ConfigDocument;

/// Collect human-readable warnings. An empty list means the document looks sane.
pub fn validate(document: &ConfigDocument) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(session) = &document.with_session {
        if session.url.is_empty() {
            warnings.push("with-session.url is empty".to_string());
        } else if !(session.url.starts_with("ws://") || session.url.starts_with("wss://")) {
            warnings.push(format!(
                "with-session.url '{}' is not a ws:// or wss:// URL",
                session.url
            ));
        }
    }

    if document.go_url.is_some() && document.with_session.is_some() {
        warnings.push("both 'go-url' and 'with-session' present; 'go-url' is used".to_string());
    }

    if let Some(go_url) = &document.go_url {
        validate_size(&mut warnings, "go-url.width", go_url.width);
        validate_size(&mut warnings, "go-url.height", go_url.height);
    }

    warnings
}

fn validate_size(warnings: &mut Vec<String>, field: &str, value: i64) {
    let min = i64::from(crate::MIN_WINDOW_SIZE);
    if value < min {
        warnings.push(format!("{field} = {value} is below {min} and will be raised"));
    }
}
