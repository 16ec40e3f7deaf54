//! Internal types and constants for the app state module.

use std::time::Duration;

/// Events delivered to the winit loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    /// The session queued work for the owning thread.
    SessionWake,
}

/// How often to poll for web view and session work (approx 60 Hz).
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Name of the window opened at startup in direct mode.
pub(super) const MAIN_WINDOW: &str = "main";

/// Outbound notification names.
pub(super) const EVENT_CORE_LOADED: &str = "webview2_core_loaded";
pub(super) const EVENT_WINDOW_CLOSED: &str = "window_closed";
pub(super) const EVENT_ALL_WINDOW_CLOSED: &str = "all_window_closed";
