//! Orchestrator session for Webshell.
//!
//! A [`SessionClient`] talks to the orchestrator on background threads and
//! reports through a [`SessionHandler`]. The [`ProtocolAdapter`] implements
//! that handler by marshaling each remote command onto the owning thread,
//! where an [`OwnerService`] executes it.

pub mod adapter;
pub mod client;
pub mod handler;
pub mod owner;
pub mod wire;
pub mod ws_client;

pub use adapter::{AdapterHandler, ProtocolAdapter};
pub use client::SessionClient;
pub use handler::SessionHandler;
pub use owner::{OwnerService, ReattachReply, Waker};
pub use wire::{ClientFrame, ServerFrame};
pub use ws_client::WsSessionClient;
