//! Configuration for bfm.
//!
//! [load] reads `bfm.toml` into a [RawConfig] and converts it into the [Config] the rest
//! of the program borrows. [general] holds timing and size limits, [commands] the shell
//! templates for the editor and the previews.

pub mod commands;
pub mod general;
pub mod load;

pub use commands::Commands;
pub use general::{General, InternalGeneral};
pub use load::{Config, RawConfig};
