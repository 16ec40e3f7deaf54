//! Window appearance options.

use serde::Serialize;
use webshell_common::{RpcParams, RpcValue};

use super::go_url::GoUrlConfig;

/// Title used when none is supplied.
pub const DEFAULT_TITLE: &str = "Webshell Window";

/// URL used when none (or an empty one) is supplied.
pub const DEFAULT_URL: &str = "about:blank";

/// Smallest width/height a window may be created with, in logical pixels.
pub const MIN_WINDOW_SIZE: u32 = 200;

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 450;

/// Window chrome and behavior flags. All default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowFlags {
    /// Hide the title bar / frame.
    pub hide_frame: bool,
    pub disable_maximize: bool,
    pub disable_minimize: bool,
    /// Ignore close requests coming from the user (remote close still works).
    pub disable_close: bool,
    pub maximize_on_show: bool,
    pub no_resizable: bool,
}

/// How a window looks when it is opened.
///
/// Immutable once built. Width and height below [`MIN_WINDOW_SIZE`] are
/// raised to it; nothing is ever rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowOptions {
    title: String,
    url: String,
    width: u32,
    height: u32,
    flags: WindowFlags,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            url: DEFAULT_URL.into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            flags: WindowFlags::default(),
        }
    }
}

/// Raise a requested dimension to the minimum window size.
pub fn clamp_dimension(value: i64) -> u32 {
    value.clamp(i64::from(MIN_WINDOW_SIZE), i64::from(u32::MAX)) as u32
}

impl WindowOptions {
    /// Build options from raw values, applying defaults and clamps.
    pub fn new(
        title: Option<String>,
        url: Option<String>,
        width: i64,
        height: i64,
        flags: WindowFlags,
    ) -> Self {
        Self {
            title: title.unwrap_or_else(|| DEFAULT_TITLE.into()),
            url: url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_URL.into()),
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            flags,
        }
    }

    /// Build options from the parameter map of a `new_window` command.
    ///
    /// Fields that are absent or of the wrong kind keep their default.
    pub fn from_params(params: &RpcParams) -> Self {
        let text = |key: &str| params.get(key).and_then(RpcValue::as_str).map(str::to_string);
        let int = |key: &str, default: u32| {
            params
                .get(key)
                .and_then(RpcValue::as_int)
                .unwrap_or(i64::from(default))
        };
        let flag = |key: &str| params.get(key).and_then(RpcValue::as_bool).unwrap_or(false);

        Self::new(
            text("title"),
            text("url"),
            int("width", DEFAULT_WIDTH),
            int("height", DEFAULT_HEIGHT),
            WindowFlags {
                hide_frame: flag("hide_frame"),
                disable_maximize: flag("disable_maximize_btn"),
                disable_minimize: flag("disable_minimize_btn"),
                disable_close: flag("disable_close_btn"),
                maximize_on_show: flag("maximize_on_show"),
                no_resizable: flag("no_resizable"),
            },
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }
}

impl From<&GoUrlConfig> for WindowOptions {
    fn from(cfg: &GoUrlConfig) -> Self {
        Self::new(
            cfg.title.clone(),
            cfg.url.clone(),
            cfg.width,
            cfg.height,
            WindowFlags {
                hide_frame: false,
                disable_maximize: cfg.disable_maximize_btn,
                disable_minimize: cfg.disable_minimize_btn,
                disable_close: false,
                maximize_on_show: cfg.maximize_on_show,
                no_resizable: cfg.no_resizable,
            },
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
