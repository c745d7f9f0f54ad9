//! envstrap CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use envstrap::cli::{resolve_output_mode, Cli, CommandDispatcher};
use envstrap::shell::is_ci;
use envstrap::ui::create_ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so `status --json` output stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("envstrap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envstrap=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Relative paths given on the command line are taken from where the user
/// ran the command, not from the project root.
fn from_cwd(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Narrow a command's exit code to what the OS accepts.
fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(c) => ExitCode::from(c),
        Err(_) => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    let mut cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("envstrap starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let cwd = std::env::current_dir().unwrap_or_default();
    let project_root = match cli.project.as_deref() {
        Some(p) => from_cwd(p, &cwd),
        None => cwd.clone(),
    };
    cli.config = cli.config.map(|p| from_cwd(&p, &cwd));
    let output_mode = resolve_output_mode(&cli, &project_root);

    // Check if non-interactive (CI mode or explicit flag)
    let is_interactive = !cli.non_interactive() && !is_ci();

    let mut ui = create_ui(is_interactive, output_mode);

    if !project_root.is_dir() {
        ui.error(&format!(
            "Project root {} is not a directory",
            project_root.display()
        ));
        return ExitCode::from(2);
    }

    let dispatcher = CommandDispatcher::new(project_root).with_config_path(cli.config.clone());

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => exit_code(result.exit_code),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
