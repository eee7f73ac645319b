// ~/classic-menu/src/notify/mod.rs
// Transient tray notifications with an optional, cancellable auto-hide

pub mod hide;
pub mod options;

use std::{sync::Arc, time::Duration};

use clap::ValueEnum;
use serde::Serialize;
use tokio::{
    runtime::{Builder, Runtime},
    task::{AbortHandle, JoinHandle},
    time::Instant,
};

use crate::error::{MenuError, Result};
use crate::{info, warn};

pub use options::{resolve_timeout, ResolvedOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotifyIcon {
    #[default]
    None,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: Option<String>,
    pub icon: NotifyIcon,
    pub silent: bool,
    pub timeout: Option<Duration>,
}

impl Notification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: None,
            icon: NotifyIcon::None,
            silent: false,
            timeout: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn icon(mut self, icon: NotifyIcon) -> Self {
        self.icon = icon;
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The OS facility that actually draws notifications.
pub trait NotificationSurface: Send + Sync {
    fn show(&self, notification: &Notification) -> Result<()>;

    /// Forcibly removes whatever notification is currently showing.
    fn hide(&self);
}

/// Anything that can surface a notification to the user.
pub trait Notify {
    fn notify(&mut self, notification: Notification) -> Option<HideHandle>;
}

impl<N: Notify> Notify for Option<N> {
    fn notify(&mut self, notification: Notification) -> Option<HideHandle> {
        self.as_mut().and_then(|n| n.notify(notification))
    }
}

/// Cancels a scheduled auto-hide. Dropping the handle leaves the hide armed.
#[derive(Debug, Clone)]
pub struct HideHandle {
    abort: AbortHandle,
}

impl HideHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// How long the OS keeps a balloon up when nothing hides it.
pub const OS_BALLOON_LINGER: Duration = Duration::from_secs(5);

/// Shows notifications on a surface and drives their hide timers.
///
/// Timers run on a current-thread runtime, so they only make progress inside
/// [`Notifier::settle`]. Deadlines are fixed when a hide is armed, so time
/// spent before `settle` counts toward them. Scheduling itself never blocks.
pub struct Notifier {
    surface: Arc<dyn NotificationSurface>,
    runtime: Runtime,
    pending: Vec<JoinHandle<()>>,
    linger: Duration,
    // Keeps the surface alive for notifications nothing will hide
    persist_until: Option<Instant>,
}

impl Notifier {
    pub fn new(surface: Arc<dyn NotificationSurface>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| MenuError::Notify(format!("cannot start hide timer runtime: {e}")))?;
        Ok(Self {
            surface,
            runtime,
            pending: Vec::new(),
            linger: OS_BALLOON_LINGER,
            persist_until: None,
        })
    }

    pub fn with_linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }

    /// Arms a one-shot hide after `delay`.
    pub fn schedule_hide(&mut self, delay: Duration) -> HideHandle {
        let surface = Arc::clone(&self.surface);
        let deadline = Instant::now() + delay;
        let task = self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            info!("[Notify] Auto-hiding notification after {}ms", delay.as_millis());
            surface.hide();
        });
        let handle = HideHandle {
            abort: task.abort_handle(),
        };
        self.pending.push(task);
        handle
    }

    /// Number of hide timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }

    /// Blocks until every armed hide has fired or been cancelled, and until
    /// notifications without a timeout have had the OS display time.
    pub fn settle(&mut self) {
        let persist_until = self.persist_until.take();
        if self.pending.is_empty() && persist_until.is_none() {
            return;
        }
        info!("[Notify] Waiting for {} hide timer(s)", self.pending());
        let tasks: Vec<JoinHandle<()>> = self.pending.drain(..).collect();
        self.runtime.block_on(async move {
            for task in tasks {
                if let Err(e) = task.await {
                    if !e.is_cancelled() {
                        warn!("[Notify] Hide timer failed: {e}");
                    }
                }
            }
            if let Some(deadline) = persist_until {
                tokio::time::sleep_until(deadline).await;
            }
        });
    }
}

impl Notify for Notifier {
    fn notify(&mut self, notification: Notification) -> Option<HideHandle> {
        info!(
            "[Notify] {} | {} (icon {:?}, timeout {:?})",
            notification.title,
            notification.message.as_deref().unwrap_or(""),
            notification.icon,
            notification.timeout
        );

        if let Err(e) = self.surface.show(&notification) {
            warn!("[Notify] {e}");
            return None;
        }

        match notification.timeout {
            Some(delay) => Some(self.schedule_hide(delay)),
            None => {
                let until = Instant::now() + self.linger;
                self.persist_until = Some(self.persist_until.map_or(until, |current| current.max(until)));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSurface {
        shown: Mutex<Vec<Notification>>,
        hides: Mutex<usize>,
        fail: bool,
    }

    impl NotificationSurface for RecordingSurface {
        fn show(&self, notification: &Notification) -> Result<()> {
            if self.fail {
                return Err(MenuError::Notify("no tray".into()));
            }
            self.shown.lock().unwrap().push(notification.clone());
            Ok(())
        }

        fn hide(&self) {
            *self.hides.lock().unwrap() += 1;
        }
    }

    fn notifier(surface: &Arc<RecordingSurface>) -> Notifier {
        Notifier::new(surface.clone()).unwrap().with_linger(Duration::ZERO)
    }

    #[test]
    fn notification_without_timeout_persists() {
        let surface = Arc::new(RecordingSurface::default());
        let mut notifier = notifier(&surface);

        let handle = notifier.notify(Notification::new("Title").message("Body"));
        notifier.settle();

        assert!(handle.is_none());
        assert_eq!(surface.shown.lock().unwrap().len(), 1);
        assert_eq!(*surface.hides.lock().unwrap(), 0);
    }

    #[test]
    fn timeout_hides_exactly_once() {
        let surface = Arc::new(RecordingSurface::default());
        let mut notifier = notifier(&surface);

        let handle = notifier
            .notify(Notification::new("Title").timeout(Some(Duration::from_millis(10))))
            .expect("timer armed");
        assert_eq!(notifier.pending(), 1);
        notifier.settle();
        notifier.settle();

        assert!(handle.is_finished());
        assert_eq!(*surface.hides.lock().unwrap(), 1);
        assert_eq!(notifier.pending(), 0);
    }

    #[test]
    fn hide_deadline_counts_from_notify_not_settle() {
        let surface = Arc::new(RecordingSurface::default());
        let mut notifier = notifier(&surface);

        notifier.notify(Notification::new("Title").timeout(Some(Duration::from_millis(200))));
        std::thread::sleep(Duration::from_millis(300));
        let started = std::time::Instant::now();
        notifier.settle();

        assert!(started.elapsed() < Duration::from_millis(150), "{:?}", started.elapsed());
        assert_eq!(*surface.hides.lock().unwrap(), 1);
    }

    #[test]
    fn untimed_notification_keeps_the_surface_for_the_linger() {
        let surface = Arc::new(RecordingSurface::default());
        let mut notifier = Notifier::new(surface.clone())
            .unwrap()
            .with_linger(Duration::from_millis(80));

        let started = std::time::Instant::now();
        assert!(notifier.notify(Notification::new("Title")).is_none());
        notifier.settle();

        assert!(started.elapsed() >= Duration::from_millis(80));
        assert_eq!(*surface.hides.lock().unwrap(), 0);
        assert_eq!(surface.shown.lock().unwrap().len(), 1);

        // Lingering is consumed by the first settle.
        let again = std::time::Instant::now();
        notifier.settle();
        assert!(again.elapsed() < Duration::from_millis(40));
    }

    #[test]
    fn cancelled_hide_never_fires() {
        let surface = Arc::new(RecordingSurface::default());
        let mut notifier = notifier(&surface);

        let handle = notifier
            .notify(Notification::new("Title").timeout(Some(Duration::from_millis(20))))
            .expect("timer armed");
        handle.cancel();
        notifier.settle();

        assert_eq!(*surface.hides.lock().unwrap(), 0);
    }

    #[test]
    fn overlapping_timers_run_independently() {
        let surface = Arc::new(RecordingSurface::default());
        let mut notifier = notifier(&surface);

        notifier.notify(Notification::new("First").timeout(Some(Duration::from_millis(30))));
        notifier.notify(Notification::new("Second").timeout(Some(Duration::from_millis(5))));
        notifier.settle();

        assert_eq!(*surface.hides.lock().unwrap(), 2);
    }

    #[test]
    fn failed_show_arms_nothing() {
        let surface = Arc::new(RecordingSurface {
            fail: true,
            ..Default::default()
        });
        let mut notifier = notifier(&surface);

        let handle = notifier.notify(Notification::new("Title").timeout(Some(Duration::from_millis(5))));

        assert!(handle.is_none());
        assert_eq!(notifier.pending(), 0);
    }
}
