// ~/classic-menu/src/lib.rs
// Enables the classic Explorer context menu and restarts the shell so it applies

pub mod logging;
pub mod cli;
pub mod config;
pub mod custom;
pub mod error;
pub mod menu;
pub mod notify;

pub use crate::config::MenuConfig;
pub use crate::error::{MenuError, Result};
pub use crate::menu::{enable_classic_context_menu, probe, MenuState, Outcome};
