//! Miscellaneous utilities for bfm.
//!
//! - [cli]: the command line, one optional start directory.
//! - [helpers]: shell quoting, command templates, path helpers and screen suspension.
//! - [logging]: the optional file logger.

pub mod cli;
pub mod helpers;
pub mod logging;

pub use helpers::{
    absolutize, expand_home_path, expand_template, is_browsable_dir, resolve_initial_dir,
    run_suspended, shell_quote, shorten_home_path,
};
