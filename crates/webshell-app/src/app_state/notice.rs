//! One-button error notice for fatal startup failures.
//!
//! Failures before the event loop exists get their own short-lived loop via
//! [`show_startup_error`]. Failures while the app runs open the notice in
//! the app's loop and hold the exit until it is dismissed.

use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use webshell_webview::{IpcMessage, SurfaceEvent, WebViewManager};

use super::core::WebshellApp;
use super::host::DialogWindow;
use super::types::POLL_INTERVAL;

/// IPC kind the notice's button sends.
pub const NOTICE_DISMISSED: &str = "notice_dismissed";

/// Whether a page message dismisses the notice.
pub fn is_dismissal(body: &str) -> bool {
    IpcMessage::from_json(body).is_some_and(|msg| msg.kind == NOTICE_DISMISSED)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page showing `message` verbatim with a single OK button.
pub fn notice_html(message: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Webshell</title>
<style>
body {{ font-family: sans-serif; margin: 16px; }}
pre {{ white-space: pre-wrap; max-height: 200px; overflow: auto; }}
.buttons {{ margin-top: 16px; text-align: right; }}
button {{ min-width: 80px; }}
</style>
</head>
<body>
<p>Webshell could not start.</p>
<pre>{}</pre>
<div class="buttons">
<button autofocus onclick="window.webshell.ipc.send('{NOTICE_DISMISSED}', true)">OK</button>
</div>
</body>
</html>"#,
        escape_html(message)
    )
}

/// An open error notice window.
pub struct ErrorNotice {
    dialog: DialogWindow,
}

impl ErrorNotice {
    pub fn open(event_loop: &ActiveEventLoop, manager: &WebViewManager, message: &str) -> Option<Self> {
        match DialogWindow::open(
            event_loop,
            manager,
            LogicalSize::new(520.0, 320.0),
            &notice_html(message),
        ) {
            Ok(dialog) => Some(Self { dialog }),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to open error notice");
                None
            }
        }
    }

    pub fn surface_id(&self) -> u64 {
        self.dialog.surface_id()
    }
}

// =============================================================================
// STANDALONE NOTICE
// =============================================================================

/// Show `message` in a blocking notice window, then return.
///
/// Only usable before any other event loop has been built. When no window
/// can be shown the message has already gone to stderr and the log.
pub fn show_startup_error(message: &str) {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::warn!(error = %e, "No display for the error notice");
            return;
        }
    };
    let mut app = NoticeApp {
        message: message.to_string(),
        manager: WebViewManager::new(),
        notice: None,
        opened: false,
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::warn!(error = %e, "Error notice loop failed");
    }
}

struct NoticeApp {
    message: String,
    manager: WebViewManager,
    notice: Option<ErrorNotice>,
    opened: bool,
}

impl ApplicationHandler for NoticeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.opened {
            return;
        }
        self.opened = true;
        self.notice = ErrorNotice::open(event_loop, &self.manager, &self.message);
        if self.notice.is_none() {
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            self.notice = None;
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let dismissed = self.manager.drain_events().iter().any(|event| {
            matches!(event, SurfaceEvent::IpcMessage { body, .. } if is_dismissal(body))
        });
        if dismissed {
            self.notice = None;
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }
}

// =============================================================================
// IN-LOOP NOTICE
// =============================================================================

impl WebshellApp {
    /// Show a startup failure; a later exit waits for the notice.
    pub(super) fn show_notice(&mut self, event_loop: &ActiveEventLoop, message: &str) {
        if self.notice.is_some() {
            return;
        }
        self.notice = ErrorNotice::open(event_loop, &self.manager, message);
    }

    pub(super) fn owns_notice(&self, surface_id: u64) -> bool {
        self.notice.as_ref().is_some_and(|n| n.surface_id() == surface_id)
    }

    /// Close the notice and carry out an exit it was holding back.
    pub(super) fn dismiss_notice(&mut self, event_loop: &ActiveEventLoop) {
        if self.notice.take().is_none() {
            return;
        }
        tracing::debug!("Error notice dismissed");
        if std::mem::take(&mut self.exit_after_notice) {
            self.request_exit(event_loop);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_button_dismisses() {
        let html = notice_html("boom");
        assert!(html.contains("send('notice_dismissed', true)"));
        assert!(is_dismissal(r#"{"kind":"notice_dismissed","payload":true}"#));
    }

    #[test]
    fn other_messages_do_not_dismiss() {
        assert!(!is_dismissal(r#"{"kind":"reattach_answer","payload":true}"#));
        assert!(!is_dismissal("not json"));
    }

    #[test]
    fn message_is_escaped() {
        let html = notice_html("invalid value '<abc>' for '--width' & more");
        assert!(html.contains("invalid value &#39;&lt;abc&gt;&#39; for &#39;--width&#39; &amp; more"));
        assert!(!html.contains("<abc>"));
    }
}
