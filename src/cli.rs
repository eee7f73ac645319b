// ~/classic-menu/src/cli.rs
// Command line surface: enable (default), status, restart-explorer

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use crate::config::MenuConfig;
use crate::custom;
use crate::menu::{self, MenuState, Outcome, ShellHost, SHELL_IMAGE};
use crate::notify::{resolve_timeout, Notifier, NotifyIcon};
use crate::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Enable the classic Explorer context menu")]
pub struct Cli {
    /// Show tray notifications for the result
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub notify: bool,
    /// Write info-level lines to classic-menu.log
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long, global = true, value_enum)]
    pub icon: Option<NotifyIcon>,
    /// Suppress the notification sound
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub silent: bool,
    /// Auto-hide notifications after this many milliseconds
    #[arg(long, global = true, value_name = "MS", allow_negative_numbers = true)]
    pub timeout: Option<i64>,
    /// Legacy notification options, e.g. "Iconi T5 Mute"
    #[arg(long, global = true, value_name = "OPTIONS")]
    pub options: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enable the classic menu and restart Explorer if needed (default)
    Enable,
    /// Report whether the classic menu is enabled
    Status {
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Restart Explorer without touching the registry
    RestartExplorer,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub state: MenuState,
    pub marker: String,
    pub explorer_running: bool,
}

impl Cli {
    pub fn config(&self) -> MenuConfig {
        let config = MenuConfig {
            notify: self.notify,
            icon: self.icon.unwrap_or_default(),
            silent: self.silent,
            timeout: resolve_timeout("", self.timeout).timeout,
        };
        match &self.options {
            Some(options) => config.with_legacy_options(options, self.timeout),
            None => config,
        }
    }
}

fn build_notifier(config: &MenuConfig) -> Option<Notifier> {
    if !config.notify {
        return None;
    }
    match custom::surface().and_then(Notifier::new) {
        Ok(notifier) => Some(notifier),
        Err(e) => {
            warn!("Notifications disabled: {e}");
            None
        }
    }
}

pub fn status_report(marker: &impl menu::MarkerStore, shell: &impl ShellHost) -> StatusReport {
    StatusReport {
        state: menu::probe(marker),
        marker: menu::marker_path(),
        explorer_running: shell.is_running(SHELL_IMAGE),
    }
}

/// Runs the parsed command. `Ok(false)` means the operation ran but failed.
pub fn run_cli(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = cli.config();
    info!("CLI parsed: {:?}, config: {:?}", cli, config);

    let marker = custom::marker();
    let shell = custom::shell();

    match cli.command.unwrap_or(Command::Enable) {
        Command::Enable => {
            let mut notifier = build_notifier(&config);
            let outcome = menu::enable_classic_context_menu(&config, &marker, &shell, &mut notifier);
            if let Some(n) = notifier.as_mut() {
                n.settle();
            }
            match &outcome {
                Outcome::AlreadyEnabled => println!("Classic context menu is already enabled."),
                Outcome::Enabled => println!("Classic context menu enabled, Explorer restarted."),
                Outcome::WriteFailed(e) | Outcome::RestartFailed(e) => eprintln!("{e}"),
            }
            Ok(outcome.is_success())
        }
        Command::Status { json } => {
            let report = status_report(&marker, &shell);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let state = match report.state {
                    MenuState::Enabled => "enabled",
                    MenuState::Disabled => "disabled",
                };
                println!("Classic context menu: {state}");
                println!("Marker: {}", report.marker);
                println!("{SHELL_IMAGE} running: {}", report.explorer_running);
            }
            Ok(true)
        }
        Command::RestartExplorer => {
            let mut notifier = build_notifier(&config);
            let result = menu::restart_explorer(&config, &shell, &mut notifier);
            if let Some(n) = notifier.as_mut() {
                n.settle();
            }
            match result {
                Ok(()) => {
                    println!("Explorer restarted.");
                    Ok(true)
                }
                Err(e) => {
                    eprintln!("{e}");
                    Ok(false)
                }
            }
        }
    }
}
