//! Remote command validation and dispatch onto the window registry.

use webshell_common::{RpcParams, RpcResult, RpcValue, ValueKind, WindowError};
use webshell_config::WindowOptions;
use webshell_webview::{WindowHost, WindowRegistry};

// =============================================================================
// ACTION CATALOG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcAction {
    NewWindow,
    OpenDevTool,
    ToggleMaximize,
    Minimize,
    CloseWindow,
    SetTitlebarDisplay,
}

/// A parameter an action cannot run without.
struct RequiredField {
    field: &'static str,
    kind: ValueKind,
    non_empty: bool,
}

const NAME: RequiredField = RequiredField {
    field: "name",
    kind: ValueKind::String,
    non_empty: true,
};

const VALUE_BOOL: RequiredField = RequiredField {
    field: "value",
    kind: ValueKind::Bool,
    non_empty: false,
};

impl RpcAction {
    pub const ALL: [RpcAction; 6] = [
        RpcAction::NewWindow,
        RpcAction::OpenDevTool,
        RpcAction::ToggleMaximize,
        RpcAction::Minimize,
        RpcAction::CloseWindow,
        RpcAction::SetTitlebarDisplay,
    ];

    /// Look up an action by its wire name. Case-sensitive.
    pub fn parse(action: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == action)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NewWindow => "new_window",
            Self::OpenDevTool => "open_dev_tool",
            Self::ToggleMaximize => "toggle_maximize",
            Self::Minimize => "minimize",
            Self::CloseWindow => "close_window",
            Self::SetTitlebarDisplay => "set_titlebar_display",
        }
    }

    fn required_fields(self) -> &'static [RequiredField] {
        match self {
            Self::SetTitlebarDisplay => &[NAME, VALUE_BOOL],
            _ => &[NAME],
        }
    }
}

/// Check the required fields of `action`.
///
/// Every field's presence and type is checked before any emptiness check,
/// so a wrongly-typed field wins over an empty one. Absent or wrongly-typed
/// fields are "corrupted".
pub fn validate(action: RpcAction, params: &RpcParams) -> Result<(), String> {
    let rules = action.required_fields();
    if let Some(rule) = rules
        .iter()
        .find(|rule| params.get(rule.field).map(RpcValue::kind) != Some(rule.kind))
    {
        return Err(format!(
            "invalid rpc arguments: field '{}' corrupted.",
            rule.field
        ));
    }
    if let Some(rule) = rules.iter().find(|rule| {
        rule.non_empty
            && params
                .get(rule.field)
                .and_then(RpcValue::as_str)
                .is_some_and(str::is_empty)
    }) {
        return Err(format!(
            "invalid rpc arguments: field '{}' should have non-empty value.",
            rule.field
        ));
    }
    Ok(())
}

/// Render a registry failure as the message sent back to the peer.
fn window_error_message(action: RpcAction, err: &WindowError) -> String {
    let action = action.name();
    match err {
        WindowError::NotFound(name) => {
            format!("rpc '{action}': no such window named '{name}'.")
        }
        WindowError::ToolingUnavailable(name) => format!(
            "rpc '{action}': can not open dev tool for window named '{name}': render surface not ready."
        ),
        WindowError::EmptyName => {
            "invalid rpc arguments: field 'name' should have non-empty value.".to_string()
        }
        WindowError::DuplicateName(_) | WindowError::Surface(_) => format!("rpc '{action}': {err}"),
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Validate and execute one remote command.
///
/// Every failure comes back as a failed [`RpcResult`]; nothing here panics
/// on peer input. Validation runs before any registry access.
pub fn dispatch<H: WindowHost>(
    registry: &mut WindowRegistry<H::Surface>,
    host: &mut H,
    action: &str,
    params: &RpcParams,
) -> RpcResult {
    let Some(rpc) = RpcAction::parse(action) else {
        tracing::warn!(action, "Rejected unknown rpc action");
        return RpcResult::fail(format!("invalid rpc action '{action}'"));
    };

    if let Err(msg) = validate(rpc, params) {
        tracing::warn!(action, error = %msg, "Rejected rpc arguments");
        return RpcResult::fail(msg);
    }

    // Validated above.
    let name = params.get("name").and_then(RpcValue::as_str).unwrap_or_default();

    let outcome = match rpc {
        RpcAction::NewWindow => {
            let options = WindowOptions::from_params(params);
            registry.create(host, name, options).map(|entry| {
                let mut extra = RpcParams::new();
                extra.insert("name".into(), RpcValue::from(entry.name()));
                extra.insert("width".into(), RpcValue::from(entry.options().width()));
                extra.insert("height".into(), RpcValue::from(entry.options().height()));
                Some(extra)
            })
        }
        RpcAction::OpenDevTool => registry.open_dev_tools(name).map(|_| None),
        RpcAction::ToggleMaximize => registry.toggle_maximize(name).map(|_| None),
        RpcAction::Minimize => registry.minimize(name).map(|_| None),
        RpcAction::CloseWindow => registry.close(name).map(|_| None),
        RpcAction::SetTitlebarDisplay => {
            let visible = params
                .get("value")
                .and_then(RpcValue::as_bool)
                .unwrap_or(true);
            registry.set_title_bar_visible(name, visible).map(|_| None)
        }
    };

    match outcome {
        Ok(Some(extra)) => RpcResult::ok_with(extra),
        Ok(None) => RpcResult::ok(),
        Err(err) => RpcResult::fail(window_error_message(rpc, &err)),
    }
}

// =============================================================================
// TESTS
// =============================================================================
