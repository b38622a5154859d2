//! Helpers for bfm.
//!
//! Shell quoting and command templates, path helpers for the CLI and the header, and
//! [run_suspended] which hands the terminal to an interactive command.

use crate::core::proc::run_interactive;

use std::ffi::OsStr;
use std::io;
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};
use std::process::ExitStatus;

/// Quotes `s` for `sh`: wraps it in single quotes and escapes embedded ones.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Replaces every `{path}` in `template` with the quoted `path`.
pub fn expand_template(template: &str, path: &Path) -> String {
    template.replace("{path}", &shell_quote(&path.to_string_lossy()))
}

/// Runs `command` through `sh -c` in `cwd` with the screen handed over.
///
/// Temporary disables raw mode and leaves the alternate screen while the command runs.
/// On return, restores raw mode and the alternate screen.
pub fn run_suspended(command: &str, cwd: &Path) -> io::Result<ExitStatus> {
    use crossterm::{
        cursor::{Hide, Show},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };

    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, Show)?;

    let status = run_interactive(command, cwd);

    execute!(io::stdout(), EnterAlternateScreen, Hide)?;
    enable_raw_mode()?;
    status
}

/// Util function to shorten home directory to ~.
/// Used by the header.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        } else {
            let mut short = stripped.display().to_string();
            if short.starts_with(MAIN_SEPARATOR) {
                short.remove(0);
            }
            return format!("~{}{}", MAIN_SEPARATOR, short);
        }
    }
    path.display().to_string()
}

/// Expands a leading `~` to the home directory.
pub fn expand_home_path(arg: &OsStr) -> PathBuf {
    let path = Path::new(arg);
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

/// Makes `path` absolute against `cwd` and removes `.` and `..` without touching the
/// filesystem, so symlinked directories keep the name the user typed.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// The directory bfm starts in for a command line argument.
pub fn resolve_initial_dir(arg: &OsStr, cwd: &Path) -> PathBuf {
    absolutize(&expand_home_path(arg), cwd)
}

/// True if `path` is a directory bfm can list.
pub fn is_browsable_dir(path: &Path) -> bool {
    path.is_dir() && std::fs::read_dir(path).is_ok()
}
