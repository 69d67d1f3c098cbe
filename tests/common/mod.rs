//! Shared helpers for checkpoint integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};

use checkpoint_retry::{LogInfo, LogLevel, Logger};

static TRACING: Once = Once::new();

/// Installs a fmt subscriber once per test binary, filtered by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Shared invocation counter, cheap to clone into closures.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicU32>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments and returns the new count.
    pub fn bump(&self) -> u32 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

/// A logged lifecycle message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub info: LogInfo,
}

/// Logger that keeps every message it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.records()
            .iter()
            .filter(|r| r.message.contains(needle))
            .count()
    }

    fn push(&self, level: LogLevel, message: &str, info: &LogInfo) {
        self.records.lock().unwrap().push(LogRecord {
            level,
            message: message.to_string(),
            info: info.clone(),
        });
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str, info: &LogInfo) {
        self.push(LogLevel::Debug, message, info);
    }

    fn info(&self, message: &str, info: &LogInfo) {
        self.push(LogLevel::Info, message, info);
    }

    fn warn(&self, message: &str, info: &LogInfo) {
        self.push(LogLevel::Warn, message, info);
    }

    fn error(&self, message: &str, info: &LogInfo) {
        self.push(LogLevel::Error, message, info);
    }
}

/// Application error used to check that failures pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("application error: {0}")]
pub struct AppError(pub String);
