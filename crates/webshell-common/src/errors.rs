use std::path::PathBuf;

/// Failures of window registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("window name must not be empty")]
    EmptyName,

    #[error("can not create window named '{0}': window with this name already exists.")]
    DuplicateName(String),

    #[error("no such window named '{0}'")]
    NotFound(String),

    #[error("render surface of window '{0}' is not ready")]
    ToolingUnavailable(String),

    #[error("window surface error: {0}")]
    Surface(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config {0} has neither a 'go-url' nor a 'with-session' section")]
    NoMode(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("session transport error: {0}")]
    Transport(String),

    #[error("session adapter stopped")]
    Stopped,

    #[error("owning thread is no longer accepting calls")]
    OwnerUnavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum WebshellError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("{0}")]
    Other(String),
}
