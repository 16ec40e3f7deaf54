//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Coordinates the window registry, the run-mode lifecycle and
//! the orchestrator session.

mod core;
mod event_handler;
mod host;
mod init;
mod lifecycle;
mod notice;
mod polling;
mod reattach;
mod rpc_dispatch;
mod session_service;
mod shell;
mod shutdown;
mod types;

pub use self::core::WebshellApp;
pub use notice::show_startup_error;
pub use types::UserEvent;
