// ~/classic-menu/src/custom/windows/mod.rs
pub mod registry;
pub mod explorer;
pub mod tray;

pub use explorer::ExplorerShell;
pub use registry::RegistryMarker;
pub use tray::TrayBalloon;
