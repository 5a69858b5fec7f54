#![forbid(unsafe_code)]

//! Terminal host for reelfeed.
//!
//! Stands in for a browser page: crossterm supplies wheel, drag and key
//! input, [`surface::TerminalSurface`] plays the media element (including
//! the "no sound before user interaction" rule), and the screen shows the
//! clip under the cursor, the `N / total` indicator and the sound
//! affordance.

pub mod app;
pub mod cli;
pub mod input;
pub mod surface;
pub mod terminal;
pub mod view;

pub use cli::{Cli, run, run_from_env};
