//! Rendering for bfm.
//!
//! - [render]: the per-frame entry point and the screen layout.
//! - [panes]: the listing and preview panes.
//! - [widgets]: header, footer and the move popup.

pub mod panes;
pub mod render;
pub mod widgets;

pub use render::{layout_chunks, render};
