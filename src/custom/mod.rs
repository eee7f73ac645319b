// ~/classic-menu/src/custom/mod.rs
// Platform backends for the marker, the shell and the notification surface

#[cfg(windows)]
pub mod windows;

use std::sync::Arc;

use crate::error::Result;
use crate::menu::{MarkerStore, ShellHost};
use crate::notify::NotificationSurface;

#[cfg(windows)]
pub fn marker() -> impl MarkerStore {
    self::windows::RegistryMarker::new()
}

#[cfg(windows)]
pub fn shell() -> impl ShellHost {
    self::windows::ExplorerShell::new()
}

#[cfg(windows)]
pub fn surface() -> Result<Arc<dyn NotificationSurface>> {
    Ok(Arc::new(self::windows::TrayBalloon::new()?))
}

#[cfg(not(windows))]
pub fn marker() -> impl MarkerStore {
    unsupported::Unsupported
}

#[cfg(not(windows))]
pub fn shell() -> impl ShellHost {
    unsupported::Unsupported
}

#[cfg(not(windows))]
pub fn surface() -> Result<Arc<dyn NotificationSurface>> {
    Ok(Arc::new(unsupported::Unsupported))
}

#[cfg(not(windows))]
mod unsupported {
    use std::time::Duration;

    use crate::error::{MenuError, Result};
    use crate::menu::{MarkerStore, ShellHost, ShellWindow};
    use crate::notify::{Notification, NotificationSurface};

    /// Stands in for the Win32 backend on every other target.
    pub struct Unsupported;

    impl MarkerStore for Unsupported {
        fn read(&self) -> Result<()> {
            Err(MenuError::Read("no registry on this platform".into()))
        }

        fn create(&self) -> Result<()> {
            Err(MenuError::Unsupported)
        }
    }

    impl ShellHost for Unsupported {
        fn close_windows(&self, _group: &[ShellWindow]) -> Result<()> {
            Err(MenuError::Unsupported)
        }

        fn sleep(&self, delay: Duration) {
            std::thread::sleep(delay);
        }

        fn terminate(&self, _image: &str) -> Result<()> {
            Err(MenuError::Unsupported)
        }

        fn launch(&self, _image: &str) -> Result<()> {
            Err(MenuError::Unsupported)
        }

        fn is_running(&self, _image: &str) -> bool {
            false
        }
    }

    impl NotificationSurface for Unsupported {
        fn show(&self, _notification: &Notification) -> Result<()> {
            Err(MenuError::Unsupported)
        }

        fn hide(&self) {}
    }
}
