// ~/classic-menu/src/notify/options.rs
// Legacy "options" strings: icon words plus an embedded T<seconds> auto-hide directive

use std::time::Duration;

use super::NotifyIcon;

/// Explicit timeouts below this magnitude are treated as a lower bound
/// against the embedded directive, at or above it as an upper bound.
const EXPLICIT_TIMEOUT_PIVOT_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub timeout: Option<Duration>,
    /// The options string with the timeout directive removed.
    pub options: String,
}

impl ResolvedOptions {
    pub fn icon(&self) -> NotifyIcon {
        self.words()
            .filter_map(|word| match word {
                "Iconi" => Some(NotifyIcon::Info),
                "Icon!" => Some(NotifyIcon::Warning),
                "Iconx" => Some(NotifyIcon::Error),
                _ => None,
            })
            .last()
            .unwrap_or_default()
    }

    pub fn silent(&self) -> bool {
        self.words().any(|word| word == "Mute")
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        self.options.split_whitespace()
    }
}

/// Resolves the auto-hide timeout from an options string and an optional
/// explicit timeout in milliseconds.
///
/// A negative explicit timeout counts by its magnitude. A zero result means
/// the notification is not auto-hidden.
pub fn resolve_timeout(options: &str, timeout_ms: Option<i64>) -> ResolvedOptions {
    let directive = find_directive(options);
    let explicit = timeout_ms.map(|ms| ms.unsigned_abs());

    let resolved_ms = match (explicit, &directive) {
        (None, None) => None,
        (Some(ms), None) => Some(ms),
        (None, Some(d)) => Some(d.millis),
        (Some(ms), Some(d)) if ms < EXPLICIT_TIMEOUT_PIVOT_MS => Some(ms.max(d.millis)),
        (Some(ms), Some(d)) => Some(ms.min(d.millis)),
    };

    let options = match &directive {
        Some(d) => strip(options, d.start, d.end),
        None => normalize(options),
    };

    ResolvedOptions {
        timeout: resolved_ms.filter(|ms| *ms > 0).map(Duration::from_millis),
        options,
    }
}

struct Directive {
    start: usize,
    end: usize,
    millis: u64,
}

/// First `T` immediately followed by one or more ASCII digits.
fn find_directive(options: &str) -> Option<Directive> {
    let bytes = options.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'T' {
            let digits_start = i + 1;
            let mut end = digits_start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > digits_start {
                let seconds = options[digits_start..end].parse::<u64>().unwrap_or(u64::MAX);
                return Some(Directive {
                    start: i,
                    end,
                    millis: seconds.saturating_mul(1000),
                });
            }
        }
        i += 1;
    }
    None
}

fn strip(options: &str, start: usize, end: usize) -> String {
    normalize(&format!("{} {}", &options[..start], &options[end..]))
}

fn normalize(options: &str) -> String {
    options.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Option<Duration> {
        Some(Duration::from_millis(value))
    }

    #[test]
    fn small_explicit_timeout_takes_the_longer_duration() {
        let resolved = resolve_timeout("T2", Some(500));
        assert_eq!(resolved.timeout, ms(2000));
        assert_eq!(resolved.options, "");
    }

    #[test]
    fn large_explicit_timeout_takes_the_shorter_duration() {
        let resolved = resolve_timeout("T5", Some(3000));
        assert_eq!(resolved.timeout, ms(3000));

        let resolved = resolve_timeout("T2", Some(3000));
        assert_eq!(resolved.timeout, ms(2000));
    }

    #[test]
    fn embedded_directive_alone_is_converted_to_millis() {
        let resolved = resolve_timeout("T1", None);
        assert_eq!(resolved.timeout, ms(1000));
        assert_eq!(resolved.options, "");
    }

    #[test]
    fn directive_is_stripped_from_surrounding_flags() {
        let resolved = resolve_timeout("Iconi T3 Mute", None);
        assert_eq!(resolved.timeout, ms(3000));
        assert_eq!(resolved.options, "Iconi Mute");
        assert_eq!(resolved.icon(), NotifyIcon::Info);
        assert!(resolved.silent());
    }

    #[test]
    fn explicit_timeout_without_directive_is_used_as_is() {
        let resolved = resolve_timeout("Icon!", Some(750));
        assert_eq!(resolved.timeout, ms(750));
        assert_eq!(resolved.options, "Icon!");
        assert_eq!(resolved.icon(), NotifyIcon::Warning);
    }

    #[test]
    fn negative_explicit_timeout_counts_by_magnitude() {
        assert_eq!(resolve_timeout("T4", Some(-200)).timeout, ms(4000));
        assert_eq!(resolve_timeout("T4", Some(-2500)).timeout, ms(2500));
        assert_eq!(resolve_timeout("", Some(-1500)).timeout, ms(1500));
    }

    #[test]
    fn no_source_means_no_auto_hide() {
        let resolved = resolve_timeout("Iconx", None);
        assert_eq!(resolved.timeout, None);
        assert_eq!(resolved.icon(), NotifyIcon::Error);
        assert!(!resolved.silent());
    }

    #[test]
    fn zero_resolves_to_no_auto_hide() {
        assert_eq!(resolve_timeout("T0", None).timeout, None);
        assert_eq!(resolve_timeout("", Some(0)).timeout, None);
    }

    #[test]
    fn only_uppercase_t_followed_by_digits_is_a_directive() {
        let resolved = resolve_timeout("t5 Tx Mute", None);
        assert_eq!(resolved.timeout, None);
        assert_eq!(resolved.options, "t5 Tx Mute");
    }

    #[test]
    fn first_directive_wins() {
        let resolved = resolve_timeout("T2 T9", None);
        assert_eq!(resolved.timeout, ms(2000));
        assert_eq!(resolved.options, "T9");
    }

    #[test]
    fn unknown_words_fall_back_to_no_icon() {
        let resolved = resolve_timeout("Whatever", None);
        assert_eq!(resolved.icon(), NotifyIcon::None);
    }
}
