mod rpc;
mod session;
mod value;

pub use rpc::{ClientPostMessage, RpcResult};
pub use session::SessionInfo;
pub use value::{RpcParams, RpcValue, ValueKind};
