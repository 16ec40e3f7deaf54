pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, SessionError, WebshellError, WindowError};
pub use id::new_correlation_id;
pub use types::{ClientPostMessage, RpcParams, RpcResult, RpcValue, SessionInfo, ValueKind};

pub type Result<T> = std::result::Result<T, WebshellError>;
