//! Command-line argument handling for bfm.
//!
//! bfm takes a single optional starting directory and no flags.

use std::ffi::OsString;

pub const USAGE: &str = "Usage: bfm [PATH]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    RunApp,
    RunAppAtPath(OsString),
    /// Too many arguments.
    Usage,
}

/// Reads the process arguments.
pub fn handle_args() -> CliAction {
    parse_args(std::env::args_os().skip(1))
}

/// Interprets the arguments after the program name.
pub fn parse_args<I>(args: I) -> CliAction
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (None, _) => CliAction::RunApp,
        (Some(path), None) => CliAction::RunAppAtPath(path),
        (Some(_), Some(_)) => CliAction::Usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn no_argument_runs_in_cwd() {
        assert_eq!(parse_args(args(&[])), CliAction::RunApp);
    }

    #[test]
    fn one_argument_is_the_start_dir() {
        assert_eq!(
            parse_args(args(&["~/src"])),
            CliAction::RunAppAtPath(OsString::from("~/src"))
        );
        // no flags, a leading dash is still a path
        assert_eq!(
            parse_args(args(&["-weird-dir"])),
            CliAction::RunAppAtPath(OsString::from("-weird-dir"))
        );
    }

    #[test]
    fn more_arguments_print_usage() {
        assert_eq!(parse_args(args(&["a", "b"])), CliAction::Usage);
    }
}
