//! Named loggers with per-instance levels and pluggable handlers.
//!
//! Every [`Logger`] starts at the global level and forwards records to the
//! [`log`] facade, using its name as the record target. Applications can
//! install a user handler on all live loggers with [`set_user_log_handler`].

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock, Weak};

static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INSTANCES: LazyLock<Mutex<Vec<Weak<LoggerInner>>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

pub type LogHandler = Arc<dyn Fn(&Logger, LogLevel, &str) + Send + Sync + 'static>;
pub type LogCallback = Arc<dyn Fn(LogCallbackParams) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    name: String,
    log_level: AtomicU8,
    log_handler: RwLock<LogHandler>,
    user_log_handler: RwLock<Option<LogHandler>>,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        let inner = Arc::new(LoggerInner {
            name: name.into(),
            log_level: AtomicU8::new(GLOBAL_LOG_LEVEL.load(Ordering::SeqCst)),
            log_handler: RwLock::new(Arc::new(forward_to_log_facade)),
            user_log_handler: RwLock::new(None),
        });
        INSTANCES
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(&inner));
        Self { inner }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_u8(self.inner.log_level.load(Ordering::SeqCst))
    }

    pub fn set_log_level<L>(&self, level: L) -> Result<(), LogError>
    where
        L: IntoLogLevel,
    {
        let level = level.into_log_level()?;
        self.inner.log_level.store(level as u8, Ordering::SeqCst);
        Ok(())
    }

    pub fn set_log_handler<F>(&self, handler: F)
    where
        F: Fn(&Logger, LogLevel, &str) + Send + Sync + 'static,
    {
        *self
            .inner
            .log_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(handler);
    }

    pub fn reset_log_handler(&self) {
        *self
            .inner
            .log_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(forward_to_log_facade);
    }

    pub fn has_user_log_handler(&self) -> bool {
        self.inner
            .user_log_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn set_user_handler(&self, handler: Option<LogHandler>) {
        *self
            .inner
            .user_log_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = handler;
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Debug, message.as_ref());
    }

    pub fn log(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Verbose, message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Error, message.as_ref());
    }

    fn dispatch(&self, level: LogLevel, message: &str) {
        // Clone the handlers out so a handler may reconfigure the logger.
        let user_handler = self
            .inner
            .user_log_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = user_handler {
            handler(self, level, message);
        }
        let handler = self
            .inner
            .log_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        handler(self, level, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("log_level", &self.log_level())
            .finish()
    }
}

fn forward_to_log_facade(logger: &Logger, level: LogLevel, message: &str) {
    if level < logger.log_level() {
        return;
    }
    if let Some(level) = level.to_log_level() {
        log::log!(target: logger.name(), level, "{message}");
    }
}

fn with_instances<F>(mut f: F)
where
    F: FnMut(Logger),
{
    let mut instances = INSTANCES.lock().unwrap_or_else(PoisonError::into_inner);
    instances.retain(|weak| match weak.upgrade() {
        Some(inner) => {
            f(Logger { inner });
            true
        }
        None => false,
    });
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Verbose = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Silent = 5,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    /// Matching `log` crate level; `Silent` has none.
    pub fn to_log_level(self) -> Option<log::Level> {
        match self {
            LogLevel::Debug => Some(log::Level::Debug),
            LogLevel::Verbose => Some(log::Level::Trace),
            LogLevel::Info => Some(log::Level::Info),
            LogLevel::Warn => Some(log::Level::Warn),
            LogLevel::Error => Some(log::Level::Error),
            LogLevel::Silent => None,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Verbose,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Silent,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "verbose" | "trace" => Ok(LogLevel::Verbose),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" | "off" => Ok(LogLevel::Silent),
            other => Err(LogError::InvalidLogLevel(other.to_string())),
        }
    }
}

pub trait IntoLogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError>;
}

impl IntoLogLevel for LogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        Ok(self)
    }
}

impl IntoLogLevel for &str {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        LogLevel::from_str(self)
    }
}

impl IntoLogLevel for String {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        LogLevel::from_str(&self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub level: Option<LogLevel>,
}

#[derive(Debug, Clone)]
pub struct LogCallbackParams {
    pub level: LogLevel,
    pub message: String,
    pub logger_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    InvalidLogLevel(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::InvalidLogLevel(level) => {
                write!(f, "Invalid value \"{level}\" assigned to `logLevel`")
            }
        }
    }
}

impl std::error::Error for LogError {}

/// Sets the level of every live logger and of loggers created afterwards.
pub fn set_log_level<L>(level: L) -> Result<(), LogError>
where
    L: IntoLogLevel,
{
    let level = level.into_log_level()?;
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    with_instances(|logger| {
        logger.inner.log_level.store(level as u8, Ordering::SeqCst);
    });
    Ok(())
}

/// Installs (or with `None`, removes) a callback on every live logger.
///
/// The callback sees records at or above `options.level`, defaulting to each
/// logger's own level.
pub fn set_user_log_handler(callback: Option<LogCallback>, options: Option<LogOptions>) {
    let threshold = options.unwrap_or_default().level;
    with_instances(|logger| {
        let handler = callback.as_ref().map(|callback| {
            let callback = Arc::clone(callback);
            Arc::new(move |instance: &Logger, level: LogLevel, message: &str| {
                if level < threshold.unwrap_or_else(|| instance.log_level()) {
                    return;
                }
                callback(LogCallbackParams {
                    level,
                    message: message.to_owned(),
                    logger_type: instance.name().to_owned(),
                });
            }) as LogHandler
        });
        logger.set_user_handler(handler);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static TEST_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    fn reset_logging() {
        set_log_level(LogLevel::Info).unwrap();
        set_user_log_handler(None, None);
    }

    fn recording_logger(name: &str) -> (Logger, Arc<Mutex<Vec<(LogLevel, String)>>>) {
        let logger = Logger::new(name);
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        logger.set_log_handler(move |instance, level, message| {
            if level >= instance.log_level() {
                sink.lock().unwrap().push((level, message.to_owned()));
            }
        });
        (logger, records)
    }

    fn emit_all(logger: &Logger) {
        logger.debug("debug message");
        logger.log("verbose message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }

    #[test]
    fn log_methods_respect_global_level() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let (logger, records) = recording_logger("@firebase/logger-levels");

        set_log_level(LogLevel::Debug).unwrap();
        emit_all(&logger);

        let stored = records.lock().unwrap();
        let levels: Vec<_> = stored.iter().map(|(level, _)| *level).collect();
        assert_eq!(
            levels,
            [
                LogLevel::Debug,
                LogLevel::Verbose,
                LogLevel::Info,
                LogLevel::Warn,
                LogLevel::Error,
            ]
        );
        assert_eq!(stored[0].1, "debug message");
    }

    #[test]
    fn log_level_string_filtering() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let (logger, records) = recording_logger("@firebase/logger-strings");

        set_log_level("warn").unwrap();
        emit_all(&logger);

        let levels: Vec<_> = records.lock().unwrap().iter().map(|(l, _)| *l).collect();
        assert_eq!(levels, [LogLevel::Warn, LogLevel::Error]);
        assert!(set_log_level("loud").is_err());
    }

    #[test]
    fn user_handler_respects_custom_level() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let logger = Logger::new("@firebase/logger-user");
        let logger_name = logger.name().to_owned();

        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        let callback: LogCallback = Arc::new(move |params: LogCallbackParams| {
            if params.logger_type == logger_name {
                sink.lock().unwrap().push((params.level, params.message));
            }
        });
        set_user_log_handler(
            Some(callback),
            Some(LogOptions {
                level: Some(LogLevel::Warn),
            }),
        );
        assert!(logger.has_user_log_handler());

        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");

        let records = captured.lock().unwrap();
        assert_eq!(
            records.as_slice(),
            &[
                (LogLevel::Warn, "warn message".to_string()),
                (LogLevel::Error, "error message".to_string()),
            ]
        );
        drop(records);

        set_user_log_handler(None, None);
        assert!(!logger.has_user_log_handler());
    }

    #[test]
    fn maps_onto_log_facade_levels() {
        assert_eq!(LogLevel::Verbose.to_log_level(), Some(log::Level::Trace));
        assert_eq!(LogLevel::Silent.to_log_level(), None);
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
    }
}
