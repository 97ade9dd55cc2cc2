use std::sync::LazyLock;

pub use crate::logger::{
    set_log_level, set_user_log_handler, LogCallback, LogCallbackParams, LogLevel, LogOptions,
    Logger,
};

use crate::firestore::constants::LOGGER_NAME;

pub static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new(LOGGER_NAME));
