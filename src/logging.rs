//! Логирование PRISM Review Core.
//!
//! ## Уровни логов
//! - `ERROR`: сбои построения дерева и watcher'а
//! - `WARN`:  пропущенные записи каталогов, ошибки notify
//! - `INFO`:  открытие события/файлов, запуск и остановка watcher'а
//! - `DEBUG`: пробы каталогов `Trouble`/`V1`/`V2`
//! - `TRACE`: полный outline построенного дерева
//!
//! ## Корреляция
//! Каждое построение дерева получает [`LogContext`] с `correlation_id`,
//! который печатается во всех строках этой операции.
//!
//! ## Использование
//! ```ignore
//! use prism_review::logging::{init_logging, LogContext};
//!
//! init_logging(); // один раз при старте
//!
//! let ctx = LogContext::with_operation("open_event");
//! log::info!(target: "prism_review::hierarchy", "[{}] building", ctx.correlation_id);
//! ```

use std::sync::Once;

use log::{Level, LevelFilter};
use std::io::Write;

static INIT: Once = Once::new();

/// Инициализировать логирование (idempotent).
///
/// Уровень управляется переменной окружения `RUST_LOG`, например
/// `RUST_LOG=prism_review=debug`.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env("RUST_LOG")
            .format(|buf, record| {
                let level = match record.level() {
                    Level::Error => "E",
                    Level::Warn => "W",
                    Level::Info => "I",
                    Level::Debug => "D",
                    Level::Trace => "T",
                };

                // Формат: [timestamp] [LEVEL] [target] message
                writeln!(
                    buf,
                    "[{}] [{}] [{}] {}",
                    clock_timestamp(),
                    level,
                    record.target(),
                    record.args()
                )
            })
            .filter_module("prism_review", LevelFilter::Info)
            .filter_module("notify", LevelFilter::Warn)
            .try_init();
    });
}

/// `HH:MM:SS.mmm` (UTC) без зависимости от chrono.
fn clock_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    let secs = now.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60,
        now.subsec_millis()
    )
}

/// Контекст одной пользовательской операции (open event, open files, ...).
#[derive(Debug, Clone)]
pub struct LogContext {
    pub correlation_id: String,
    pub operation: Option<String>,
}

impl LogContext {
    pub fn new() -> Self {
        Self {
            correlation_id: generate_correlation_id(),
            operation: None,
        }
    }

    pub fn with_operation(operation: impl Into<String>) -> Self {
        Self {
            correlation_id: generate_correlation_id(),
            operation: Some(operation.into()),
        }
    }

    /// Префикс для строк лога: `[corr_..:operation]`.
    pub fn tag(&self) -> String {
        match &self.operation {
            Some(op) => format!("[{}:{}]", self.correlation_id, op),
            None => format!("[{}]", self.correlation_id),
        }
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Формат: `corr_<timestamp_ms>_<counter>`
fn generate_correlation_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("corr_{}_{}", timestamp, counter % 10000)
}
