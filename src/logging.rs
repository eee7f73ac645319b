// ~/classic-menu/src/logging.rs

use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Sender},
        OnceLock,
    },
    thread,
    time::Duration,
};

/* =========================
   GLOBAL STATE
   ========================= */

static ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_TX: OnceLock<Sender<LogMessage>> = OnceLock::new();

enum LogMessage {
    Line(String),
    Flush(Sender<()>),
}

/* =========================
   PUBLIC API
   ========================= */

/// Starts the writer thread. `debug` enables `info!` lines; warnings and
/// errors are always written. A second call is ignored.
pub fn init(debug: bool) {
    ENABLED.store(debug, Ordering::Relaxed);

    let (tx, rx) = mpsc::channel::<LogMessage>();
    if LOG_TX.set(tx).is_err() {
        return;
    }

    let path = log_path().clone();
    thread::spawn(move || {
        let mut file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("classic-menu: cannot open log file {}: {e}", path.display());
                return;
            }
        };

        while let Ok(message) = rx.recv() {
            match message {
                LogMessage::Line(line) => {
                    let _ = writeln!(file, "{line}");
                    let _ = file.flush();
                }
                LogMessage::Flush(ack) => {
                    let _ = file.flush();
                    let _ = ack.send(());
                }
            }
        }
    });
}

#[inline]
pub fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Blocks until every queued line has been written, or one second passed.
pub fn flush() {
    if let Some(tx) = LOG_TX.get() {
        let (ack_tx, ack_rx) = mpsc::channel();
        if tx.send(LogMessage::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv_timeout(Duration::from_secs(1));
        }
    }
}

/* =========================
   INTERNAL
   ========================= */

#[inline]
pub fn enqueue(level: &str, msg: String) {
    if let Some(tx) = LOG_TX.get() {
        let ts = timestamp();
        let _ = tx.send(LogMessage::Line(format!("{ts} [{level}] {msg}")));
    }
}

fn timestamp() -> String {
    let now = chrono::Local::now();
    now.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/* =========================
   MACROS
   ========================= */

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if $crate::logging::enabled() {
            $crate::logging::enqueue(
                "INFO",
                format!($($arg)*)
            );
        }
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            "WARN",
            format!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            "ERROR",
            format!($($arg)*)
        );
    }};
}

/* =========================
   PATH
   ========================= */

fn log_path() -> &'static PathBuf {
    LOG_PATH.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.join("classic-menu.log")))
            .unwrap_or_else(|| PathBuf::from("classic-menu.log"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_before_init_is_dropped() {
        // No writer has been started in the test binary, so this must not block or panic.
        enqueue("WARN", "nobody is listening".to_string());
        flush();
    }

    #[test]
    fn timestamp_has_millisecond_precision() {
        let ts = timestamp();
        let (_, millis) = ts.rsplit_once('.').expect("timestamp has a fraction");
        assert_eq!(millis.len(), 3);
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
    }
}
