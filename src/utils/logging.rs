//! Structured Logging with Sensitive Data Redaction
//!
//! Provides safe logging that automatically redacts:
//! - Mnemonics, passphrases and seeds
//! - Private key material and raw entropy
//! - Addresses and digests (partial redaction)

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag to enable/disable debug logging
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable debug logging
pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

/// Disable debug logging
pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

/// Check if debug logging is enabled
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn enabled(&self) -> bool {
        *self != LogLevel::Debug || is_debug_enabled()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured log entry
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Attach a field, redacted according to its key
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let shown = redact_if_sensitive(key, &value.to_string());
        self.fields.push((key, shown));
        self
    }

    /// Attach a field that is always fully redacted
    pub fn redacted_field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, redact_value(&value.to_string())));
        self
    }

    /// Render the line without timestamp
    pub fn render(&self) -> String {
        let fields_str = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        if fields_str.is_empty() {
            format!("{} [{}] {}", self.level, self.module, self.message)
        } else {
            format!("{} [{}] {} | {}", self.level, self.module, self.message, fields_str)
        }
    }

    /// Write the entry to stderr; debug entries only when enabled
    pub fn log(self) {
        if !self.level.enabled() {
            return;
        }
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        eprintln!("[{}] {}", timestamp, self.render());
    }
}

/// How much of a field value may reach the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Redaction {
    None,
    Full,
    /// Keep `head` leading and `tail` trailing chars of values longer than `min_len`;
    /// shorter values are hidden when `hide_short` is set, shown otherwise
    Partial { head: usize, tail: usize, min_len: usize, hide_short: bool },
}

/// Secret-bearing key fragments; the whole value is hidden
const SECRET_KEYS: [&str; 9] = [
    "mnemonic", "passphrase", "password", "seed", "secret", "private", "entropy", "keystream",
    "words",
];

fn classify(key: &str) -> Redaction {
    let key = key.to_lowercase();
    if SECRET_KEYS.iter().any(|k| key.contains(k)) {
        Redaction::Full
    } else if key.contains("address") {
        Redaction::Partial { head: 6, tail: 4, min_len: 13, hide_short: true }
    } else if ["digest", "hash", "fingerprint"].iter().any(|k| key.contains(k)) {
        Redaction::Partial { head: 10, tail: 6, min_len: 20, hide_short: false }
    } else {
        Redaction::None
    }
}

fn redact_if_sensitive(key: &str, value: &str) -> String {
    match classify(key) {
        Redaction::None => value.to_string(),
        Redaction::Full => redact_value(value),
        Redaction::Partial { head, tail, min_len, hide_short } => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                "[EMPTY]".to_string()
            } else if trimmed.len() <= min_len || !trimmed.is_ascii() {
                if hide_short { redact_value(trimmed) } else { trimmed.to_string() }
            } else {
                format!("{}...{}", &trimmed[..head], &trimmed[trimmed.len() - tail..])
            }
        }
    }
}

/// Fully redact a sensitive value, keeping only its length
fn redact_value(value: &str) -> String {
    match value.len() {
        0 => "[EMPTY]".to_string(),
        1..=4 => "[REDACTED]".to_string(),
        len => format!("[REDACTED:{}chars]", len),
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:ident, $module:expr, $msg:expr $(, $key:ident = $value:expr)*) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::$level,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[macro_export]
macro_rules! log_debug {
    ($module:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__log_at!(Debug, $module, $msg $(, $key = $value)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($module:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__log_at!(Info, $module, $msg $(, $key = $value)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($module:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__log_at!(Warn, $module, $msg $(, $key = $value)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($module:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__log_at!(Error, $module, $msg $(, $key = $value)*)
    };
}
