//! Diagnostic sink passed explicitly to every pipeline component.
//!
//! The library never touches a global logger directly. Callers hand in a
//! [`DiagnosticSink`]; the binary uses [`TracingSink`], tests use [`MemorySink`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

/// Ordered diagnostic severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    #[default]
    Info,
    #[value(alias = "warn")]
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }

    /// Equivalent `tracing` level filter.
    pub fn level_filter(self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;
        match self {
            Severity::Debug => LevelFilter::DEBUG,
            Severity::Info => LevelFilter::INFO,
            Severity::Warning => LevelFilter::WARN,
            Severity::Error => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}

/// Receiver for pipeline diagnostics.
pub trait DiagnosticSink {
    /// Messages below this severity are dropped.
    fn threshold(&self) -> Severity;

    /// Record a message that already passed the threshold.
    fn record(&self, severity: Severity, message: &str);

    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold()
    }

    fn emit(&self, severity: Severity, message: &str) {
        if self.enabled(severity) {
            self.record(severity, message);
        }
    }

    fn debug(&self, message: &str) {
        self.emit(Severity::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }
}

/// Forwards diagnostics to `tracing` events.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    threshold: Severity,
}

impl TracingSink {
    pub fn new(threshold: Severity) -> Self {
        Self { threshold }
    }
}

impl DiagnosticSink for TracingSink {
    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn record(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{}", message),
            Severity::Info => tracing::info!("{}", message),
            Severity::Warning => tracing::warn!("{}", message),
            Severity::Error => tracing::error!("{}", message),
        }
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    threshold: Severity,
    records: RefCell<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new(threshold: Severity) -> Self {
        Self {
            threshold,
            records: RefCell::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.borrow().clone()
    }

    /// Messages recorded at exactly this severity.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.records.borrow().iter().any(|(_, m)| m.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn record(&self, severity: Severity, message: &str) {
        self.records.borrow_mut().push((severity, message.to_string()));
    }
}
