mod app_state;
mod cli;

use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use webshell_common::{ConfigError, Result, WebshellError};

use app_state::{UserEvent, WebshellApp};

const DEFAULT_LOG_FILTER: &str = "webshell=info";

/// `--log-level` wins over `RUST_LOG`, which wins over the default.
fn env_filter(log_level: Option<&str>) -> EnvFilter {
    if let Some(directives) = log_level {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Ignoring invalid --log-level '{directives}': {e}"),
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_logging(log_level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .init();
}

fn run(args: &cli::Args) -> Result<()> {
    let mode = match args.run_mode() {
        Ok(mode) => mode,
        Err(e) => {
            let mut message = e.to_string();
            if let ConfigError::FileNotFound(_) = e {
                let help = cli::config_help();
                eprintln!("{help}");
                message = format!("{message}\n\n{help}");
            }
            app_state::show_startup_error(&message);
            return Err(e.into());
        }
    };

    let event_loop = EventLoop::<UserEvent>::with_user_event()
        .build()
        .map_err(|e| WebshellError::EventLoop(e.to_string()))?;
    let mut app = WebshellApp::new(mode, event_loop.create_proxy());

    tracing::info!("Entering event loop");
    event_loop
        .run_app(&mut app)
        .map_err(|e| WebshellError::EventLoop(e.to_string()))
}

// Every path out of main exits with status zero, startup failures included.
fn main() {
    // Parse CLI arguments
    let args = match cli::parse() {
        cli::Invocation::Run(args) => args,
        cli::Invocation::Display(output) => {
            let _ = output.print();
            return;
        }
        cli::Invocation::Invalid(e) => {
            init_logging(None);
            let _ = e.print();
            tracing::error!(location = "cli", kind = ?e.kind(), "Invalid command line");
            app_state::show_startup_error(&e.to_string());
            return;
        }
    };

    // Initialize logging
    init_logging(args.log_level.as_deref());

    tracing::info!("Webshell v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        tracing::error!(location = "main", error = %e, "Webshell stopped with an error");
    }
    tracing::info!("Shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_log_level_wins() {
        assert_eq!(env_filter(Some("debug")).to_string(), "debug");
    }
}
