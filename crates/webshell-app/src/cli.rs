use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{Args as ClapArgs, Parser, Subcommand};

use webshell_common::ConfigError;
use webshell_config::loader::{platform_config_path, PRESET_DIR};
use webshell_config::{GoUrlConfig, RunMode, SessionConfig, WindowOptions};

/// Webshell: a remote-controllable browser window shell.
#[derive(Parser, Debug)]
#[command(name = "webshell", version, about)]
pub struct Args {
    /// Log filter override (e.g. `debug`, `webshell=trace,rpc=debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open one window at a URL.
    GoUrl(GoUrlArgs),
    /// Attach to an orchestrator session.
    WithSession(WithSessionArgs),
    /// Read a configuration document (default).
    Cfg(CfgArgs),
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct GoUrlArgs {
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long, default_value_t = 800, allow_negative_numbers = true)]
    pub width: i64,

    #[arg(long, default_value_t = 450, allow_negative_numbers = true)]
    pub height: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub disable_maximize_btn: bool,

    #[arg(long)]
    pub disable_minimize_btn: bool,

    #[arg(long)]
    pub maximize_on_show: bool,

    #[arg(long)]
    pub no_resizable: bool,
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct WithSessionArgs {
    /// Orchestrator WebSocket URL.
    #[arg(long)]
    pub url: String,
}

#[derive(ClapArgs, Debug, Clone, Default, PartialEq, Eq)]
pub struct CfgArgs {
    /// Configuration file to read.
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Named preset under `cfg-presets/` next to the executable.
    #[arg(short = 'p', long = "preset")]
    pub preset: Option<String>,
}

impl From<&GoUrlArgs> for GoUrlConfig {
    fn from(args: &GoUrlArgs) -> Self {
        Self {
            url: args.url.clone(),
            width: args.width,
            height: args.height,
            title: args.title.clone(),
            disable_maximize_btn: args.disable_maximize_btn,
            disable_minimize_btn: args.disable_minimize_btn,
            maximize_on_show: args.maximize_on_show,
            no_resizable: args.no_resizable,
        }
    }
}

impl Args {
    /// Subcommand to run; `cfg` with no selectors when none was given.
    pub fn selected_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Cfg(CfgArgs::default()))
    }

    /// Turn the command line into a run mode, reading a config file for `cfg`.
    pub fn run_mode(&self) -> Result<RunMode, ConfigError> {
        match self.selected_command() {
            Command::GoUrl(go) => Ok(RunMode::Direct(WindowOptions::from(&GoUrlConfig::from(&go)))),
            Command::WithSession(ws) => Ok(RunMode::Orchestrated(SessionConfig { url: ws.url })),
            Command::Cfg(cfg) => {
                let (path, mode) =
                    webshell_config::load_run_mode(cfg.file.as_deref(), cfg.preset.as_deref())?;
                tracing::info!(path = %path.display(), "Run mode loaded from config");
                Ok(mode)
            }
        }
    }
}

/// Help printed when no configuration document could be found.
pub fn config_help() -> String {
    let platform = platform_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<config dir>/webshell/config.json".into());
    format!(
        "No configuration found. Provide one of:\n  \
         1. webshell cfg -f <FILE>\n  \
         2. webshell cfg -p <PRESET>   (reads <exe dir>/{PRESET_DIR}/<PRESET>.json)\n  \
         3. a config.json next to the executable\n  \
         4. {platform}\n\
         Or skip configuration with `webshell go-url --url <URL>` or `webshell with-session --url <WS_URL>`."
    )
}

/// What the process should do with its command line.
#[derive(Debug)]
pub enum Invocation {
    Run(Args),
    /// Help or version output was requested.
    Display(clap::Error),
    /// The command line could not be parsed.
    Invalid(clap::Error),
}

/// Parse `argv` without exiting the process on failure.
pub fn interpret<I, T>(argv: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => Invocation::Run(args),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Invocation::Display(e)
        }
        Err(e) => Invocation::Invalid(e),
    }
}

pub fn parse() -> Invocation {
    interpret(std::env::args_os())
}

// =============================================================================
// TESTS
// =============================================================================
