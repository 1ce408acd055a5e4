use crate::assistant_error;
use crate::error::Result;
use tracing::warn;

/// Приложение работает только в Windows; в dry-run допускаем любую ОС
pub fn ensure_supported_platform(dry_run: bool) -> Result<()> {
    if cfg!(windows) {
        return Ok(());
    }

    if dry_run {
        warn!("ОС {} не поддерживается, продолжаем только в режиме сухого запуска", std::env::consts::OS);
        return Ok(());
    }

    Err(assistant_error!(
        unsupported_platform,
        "This application is designed for Windows only (current OS: {})",
        std::env::consts::OS
    ))
}
