pub mod platform;

pub use platform::ensure_supported_platform;

// ✅ Макросы условного логирования для горячих путей опроса
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}
