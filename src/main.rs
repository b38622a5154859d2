//! main.rs
//! Entry point for bfm

use bfm_tui::app::{AppState, CommandRegistry};
use bfm_tui::config::Config;
use bfm_tui::core::terminal;
use bfm_tui::utils::cli::{CliAction, USAGE, handle_args};
use bfm_tui::utils::logging::init_logging;
use bfm_tui::utils::{is_browsable_dir, resolve_initial_dir};

use std::process::ExitCode;

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|info| {
        terminal::restore_terminal();

        eprintln!("\n[bfm] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let action = handle_args();
    if action == CliAction::Usage {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    let config = Config::load();
    match init_logging() {
        Ok(Some(path)) => {
            tracing::debug!(log = %path.display(), start = ?action, "logging enabled")
        }
        Ok(None) => {}
        Err(err) => eprintln!("[bfm] Could not open the log file: {err}"),
    }

    if which::which("sh").is_err() {
        eprintln!("[bfm] Error: 'sh' was not found in PATH.");
        return ExitCode::FAILURE;
    }

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("[bfm] Error: cannot read the working directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    let start = match action {
        CliAction::RunAppAtPath(arg) => {
            let target = resolve_initial_dir(&arg, &cwd);
            if !is_browsable_dir(&target) {
                eprintln!(
                    "[bfm] Error: '{}' is not a readable directory.",
                    arg.to_string_lossy()
                );
                return ExitCode::FAILURE;
            }
            target
        }
        _ => cwd,
    };

    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, &start);

    match terminal::run_terminal(&mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::warn!(%err, "terminal loop failed");
            eprintln!("[bfm] Error: {err}");
            ExitCode::FAILURE
        }
    }
}
