// ~/classic-menu/src/menu.rs
// Probes, enables and applies the classic Explorer context menu

use std::time::Duration;

use serde::Serialize;

use crate::config::MenuConfig;
use crate::error::{MenuError, Result};
use crate::notify::Notify;
use crate::{error, info};

/// Key under HKEY_CURRENT_USER whose existence selects the classic menu.
pub const MARKER_SUBKEY: &str =
    r"Software\Classes\CLSID\{86ca1aa0-34aa-4e8b-a509-50c905bae2a2}\InprocServer32";
pub const MARKER_ROOT: &str = "HKEY_CURRENT_USER";

pub const SHELL_IMAGE: &str = "explorer.exe";

pub const CLOSE_SETTLE_DELAY: Duration = Duration::from_millis(500);
pub const TERMINATE_SETTLE_DELAY: Duration = Duration::from_millis(1000);

const TITLE: &str = "Classic context menu";

/// A top-level window class that belongs to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellWindow {
    pub class: &'static str,
    /// Only match windows owned by an explorer.exe process.
    pub explorer_owned_only: bool,
}

/// Windows asked to close before the shell is terminated.
pub const SHELL_WINDOW_GROUP: &[ShellWindow] = &[
    ShellWindow { class: "CabinetWClass", explorer_owned_only: false },
    ShellWindow { class: "ExploreWClass", explorer_owned_only: false },
    ShellWindow { class: "Progman", explorer_owned_only: false },
    ShellWindow { class: "WorkerW", explorer_owned_only: false },
    ShellWindow { class: "#32770", explorer_owned_only: true },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    Enabled,
    Disabled,
}

/// Where the registry marker lives.
pub trait MarkerStore {
    /// Succeeds when the marker key exists, whatever its value.
    fn read(&self) -> Result<()>;

    /// Creates the key path and writes an empty string default value.
    fn create(&self) -> Result<()>;
}

/// Window and process control over the shell.
pub trait ShellHost {
    fn close_windows(&self, group: &[ShellWindow]) -> Result<()>;
    fn sleep(&self, delay: Duration);
    fn terminate(&self, image: &str) -> Result<()>;
    fn launch(&self, image: &str) -> Result<()>;
    fn is_running(&self, image: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AlreadyEnabled,
    Enabled,
    WriteFailed(MenuError),
    RestartFailed(MenuError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::AlreadyEnabled | Outcome::Enabled)
    }
}

pub fn marker_path() -> String {
    format!(r"{MARKER_ROOT}\{MARKER_SUBKEY}")
}

pub fn probe(marker: &impl MarkerStore) -> MenuState {
    match marker.read() {
        Ok(()) => {
            info!("[Menu] Marker present, classic menu is enabled");
            MenuState::Enabled
        }
        Err(e) => {
            info!("[Menu] Marker unreadable, treating as disabled: {e}");
            MenuState::Disabled
        }
    }
}

pub fn enable_classic_menu(marker: &impl MarkerStore) -> Result<()> {
    info!("[Menu] Writing marker {}", marker_path());
    marker.create().map_err(|e| match e {
        MenuError::Write(_) => e,
        other => MenuError::Write(other.to_string()),
    })
}

/// Closes shell windows, kills explorer.exe and starts a fresh one.
/// The first failing step ends the attempt.
pub fn restart_shell(shell: &impl ShellHost) -> Result<()> {
    info!("[Menu] Restarting {}", SHELL_IMAGE);
    let restart_err = |e: MenuError| match e {
        MenuError::Restart(_) => e,
        other => MenuError::Restart(other.to_string()),
    };

    shell.close_windows(SHELL_WINDOW_GROUP).map_err(restart_err)?;
    shell.sleep(CLOSE_SETTLE_DELAY);
    shell.terminate(SHELL_IMAGE).map_err(restart_err)?;
    shell.sleep(TERMINATE_SETTLE_DELAY);
    shell.launch(SHELL_IMAGE).map_err(restart_err)?;

    info!("[Menu] {} relaunched", SHELL_IMAGE);
    Ok(())
}

/// Enables the classic context menu if needed and restarts the shell.
pub fn enable_classic_context_menu(
    config: &MenuConfig,
    marker: &impl MarkerStore,
    shell: &impl ShellHost,
    notifier: &mut impl Notify,
) -> Outcome {
    if probe(marker) == MenuState::Enabled {
        announce(config, notifier, "Already enabled.", false);
        return Outcome::AlreadyEnabled;
    }

    if let Err(e) = enable_classic_menu(marker) {
        error!("[Menu] {e}");
        announce(config, notifier, &e.to_string(), true);
        return Outcome::WriteFailed(e);
    }

    match restart_shell(shell) {
        Ok(()) => {
            announce(config, notifier, "Enabled. Explorer was restarted.", false);
            Outcome::Enabled
        }
        Err(e) => {
            error!("[Menu] {e}");
            announce(config, notifier, &e.to_string(), true);
            Outcome::RestartFailed(e)
        }
    }
}

/// Restarts the shell on its own, reporting like the full operation.
pub fn restart_explorer(config: &MenuConfig, shell: &impl ShellHost, notifier: &mut impl Notify) -> Result<()> {
    match restart_shell(shell) {
        Ok(()) => {
            announce(config, notifier, "Explorer was restarted.", false);
            Ok(())
        }
        Err(e) => {
            error!("[Menu] {e}");
            announce(config, notifier, &e.to_string(), true);
            Err(e)
        }
    }
}

fn announce(config: &MenuConfig, notifier: &mut impl Notify, message: &str, failure: bool) {
    if !config.notify {
        return;
    }
    let notification = if failure {
        config.failure(TITLE, message)
    } else {
        config.notification(TITLE, message)
    };
    // Nothing to cancel; the hide stays armed until the notifier settles.
    let _ = notifier.notify(notification);
}
