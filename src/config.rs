// ~/classic-menu/src/config.rs

use std::time::Duration;

use crate::notify::{resolve_timeout, Notification, NotifyIcon};

/// How the operation reports itself. Nothing here is read from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuConfig {
    /// Show tray notifications at all. Off by default.
    pub notify: bool,
    pub icon: NotifyIcon,
    pub silent: bool,
    /// Auto-hide delay; `None` leaves the notification to the OS.
    pub timeout: Option<Duration>,
}

impl MenuConfig {
    /// Folds a legacy options string (icon words plus `T<seconds>`) and an
    /// explicit millisecond timeout into the typed fields.
    pub fn with_legacy_options(mut self, options: &str, timeout_ms: Option<i64>) -> Self {
        let resolved = resolve_timeout(options, timeout_ms);
        let icon = resolved.icon();
        if icon != NotifyIcon::None {
            self.icon = icon;
        }
        self.silent |= resolved.silent();
        self.timeout = resolved.timeout;
        self
    }

    pub fn notification(&self, title: &str, message: &str) -> Notification {
        Notification::new(title)
            .message(message)
            .icon(self.icon)
            .silent(self.silent)
            .timeout(self.timeout)
    }

    pub fn failure(&self, title: &str, message: &str) -> Notification {
        self.notification(title, message).icon(NotifyIcon::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_quiet() {
        let config = MenuConfig::default();
        assert!(!config.notify);
        assert_eq!(config.icon, NotifyIcon::None);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn legacy_options_fill_typed_fields() {
        let config = MenuConfig::default().with_legacy_options("Icon! T2 Mute", Some(500));
        assert_eq!(config.icon, NotifyIcon::Warning);
        assert!(config.silent);
        assert_eq!(config.timeout, Some(Duration::from_millis(2000)));
    }

    #[test]
    fn legacy_options_keep_explicit_icon_when_none_given() {
        let config = MenuConfig {
            icon: NotifyIcon::Info,
            ..Default::default()
        }
        .with_legacy_options("T5", Some(3000));
        assert_eq!(config.icon, NotifyIcon::Info);
        assert_eq!(config.timeout, Some(Duration::from_millis(3000)));
    }

    #[test]
    fn failures_always_use_the_error_icon() {
        let config = MenuConfig {
            notify: true,
            icon: NotifyIcon::Info,
            timeout: Some(Duration::from_secs(4)),
            ..Default::default()
        };
        let n = config.failure("Title", "boom");
        assert_eq!(n.icon, NotifyIcon::Error);
        assert_eq!(n.message.as_deref(), Some("boom"));
        assert_eq!(n.timeout, Some(Duration::from_secs(4)));
    }
}
