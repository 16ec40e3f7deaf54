//! Asking the user whether to reconnect after the session dropped.

use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;

use webshell_session::ReattachReply;
use webshell_webview::{IpcMessage, WebViewManager};

use super::host::DialogWindow;

/// IPC kind the dialog page answers with.
pub const REATTACH_ANSWER: &str = "reattach_answer";

/// Decides whether a dropped session should reconnect.
///
/// Runs on the owning thread and must not block it: `ask` parks the reply
/// until the user answers through [`ReattachPrompt::handle_ipc`] or closes
/// the dialog.
pub trait ReattachPrompt {
    fn ask(&mut self, event_loop: &ActiveEventLoop, manager: &WebViewManager, reply: ReattachReply);

    /// Whether `surface_id` is a window this prompt opened.
    fn owns(&self, surface_id: u64) -> bool;

    /// Route a page message. Returns whether the prompt consumed it.
    fn handle_ipc(&mut self, surface_id: u64, body: &str) -> bool;

    /// The user closed one of the prompt's windows. Returns whether it was ours.
    fn handle_close(&mut self, surface_id: u64) -> bool;

    /// Drop any pending question; it reads as "no".
    fn cancel(&mut self);
}

/// Parse the dialog's answer message.
pub fn parse_answer(body: &str) -> Option<bool> {
    let msg = IpcMessage::from_json(body)?;
    if msg.kind != REATTACH_ANSWER {
        return None;
    }
    msg.payload.as_bool()
}

// =============================================================================
// DIALOG PROMPT
// =============================================================================

const DIALOG_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Connection lost</title>
<style>
body { font-family: sans-serif; margin: 24px; }
.buttons { margin-top: 24px; text-align: right; }
button { min-width: 80px; margin-left: 8px; }
</style>
</head>
<body>
<p>The connection to the session server was lost.</p>
<p>Reconnect?</p>
<div class="buttons">
<button onclick="window.webshell.ipc.send('reattach_answer', false)">No</button>
<button autofocus onclick="window.webshell.ipc.send('reattach_answer', true)">Yes</button>
</div>
</body>
</html>"#;

struct Pending {
    reply: ReattachReply,
    dialog: Option<DialogWindow>,
}

/// Small web view window with Yes/No buttons.
#[derive(Default)]
pub struct DialogPrompt {
    pending: Option<Pending>,
}

impl DialogPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_dialog(event_loop: &ActiveEventLoop, manager: &WebViewManager) -> Option<DialogWindow> {
        match DialogWindow::open(event_loop, manager, LogicalSize::new(360.0, 160.0), DIALOG_HTML) {
            Ok(dialog) => Some(dialog),
            Err(e) => {
                tracing::error!(error = %e, "Failed to open reattach dialog");
                None
            }
        }
    }

    fn resolve(&mut self, reattach: bool) {
        if let Some(pending) = self.pending.take() {
            tracing::info!(reattach, "Reattach answered");
            pending.reply.answer(reattach);
        }
    }
}

impl ReattachPrompt for DialogPrompt {
    fn ask(&mut self, event_loop: &ActiveEventLoop, manager: &WebViewManager, reply: ReattachReply) {
        if self.pending.is_some() {
            tracing::warn!("Reattach already pending; declining the new question");
            reply.answer(false);
            return;
        }

        let Some(dialog) = Self::open_dialog(event_loop, manager) else {
            reply.answer(false);
            return;
        };
        tracing::info!("Asking whether to reattach");
        self.pending = Some(Pending {
            reply,
            dialog: Some(dialog),
        });
    }

    fn owns(&self, surface_id: u64) -> bool {
        self.pending
            .as_ref()
            .and_then(|p| p.dialog.as_ref())
            .is_some_and(|d| d.surface_id() == surface_id)
    }

    fn handle_ipc(&mut self, surface_id: u64, body: &str) -> bool {
        if !self.owns(surface_id) {
            return false;
        }
        match parse_answer(body) {
            Some(reattach) => self.resolve(reattach),
            None => tracing::debug!(surface_id, "Ignoring dialog message"),
        }
        true
    }

    fn handle_close(&mut self, surface_id: u64) -> bool {
        if !self.owns(surface_id) {
            return false;
        }
        self.resolve(false);
        true
    }

    fn cancel(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            if let Some(dialog) = pending.dialog.take() {
                dialog.hide();
            }
            tracing::debug!("Pending reattach question cancelled");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
