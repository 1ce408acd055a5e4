use crate::assistant_error;
use crate::config::Config;
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::probe::CommandRunner;

const STORE_URI_PREFIX: &str = "ms-windows-store://pdp/?ProductId=";

/// The operating system accepted a request to activate a URI handler.
///
/// This is the whole guarantee. Nothing confirms that Phone Link is
/// installed, paired or listening on the scheme, and the outcome of the call
/// itself is never reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchAccepted {
    pub uri: String,
}

/// Hands a URI to the default handler registered in the OS.
#[async_trait::async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, uri: &str) -> Result<()>;
}

/// Активация URI через `cmd /C start`
pub struct ShellLauncher {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl ShellLauncher {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

#[async_trait::async_trait]
impl Launcher for ShellLauncher {
    async fn launch(&self, uri: &str) -> Result<()> {
        // Пустой аргумент - заголовок окна для start, иначе URI в кавычках принимается за заголовок
        let output = self
            .runner
            .run("cmd", &["/C", "start", "", uri], self.timeout)
            .await
            .map_err(|e| assistant_error!(launch, "{}: {}", uri, e))?;

        if !output.success {
            return Err(assistant_error!(launch, "{}: {}", uri, output.stderr.trim()));
        }

        Ok(())
    }
}

/// Dry-run: только логирует и запоминает URI
#[derive(Default)]
pub struct DryRunLauncher {
    launched: Mutex<Vec<String>>,
}

impl DryRunLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().clone()
    }
}

#[async_trait::async_trait]
impl Launcher for DryRunLauncher {
    async fn launch(&self, uri: &str) -> Result<()> {
        info!("[DRY RUN] Активация URI: {}", uri);
        self.launched.lock().push(uri.to_string());
        Ok(())
    }
}

pub fn create_launcher(config: &Config, runner: Arc<dyn CommandRunner>, dry_run: bool) -> Arc<dyn Launcher> {
    if dry_run {
        Arc::new(DryRunLauncher::new())
    } else {
        Arc::new(ShellLauncher::new(runner, config.launch_timeout()))
    }
}

/// Оставляет в номере только цифры и '+'
pub fn sanitize_number(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
}

/// Строит URI Phone Link и передаёт их Launcher'у
pub struct CallDispatcher {
    launcher: Arc<dyn Launcher>,
    app_uri: String,
    call_uri: String,
    store_product_id: String,
}

impl CallDispatcher {
    pub fn new(config: &Config, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            launcher,
            app_uri: config.bridge.app_uri.clone(),
            call_uri: config.bridge.call_uri.clone(),
            store_product_id: config.bridge.store_product_id.clone(),
        }
    }

    pub fn store_uri(&self) -> String {
        format!("{}{}", STORE_URI_PREFIX, self.store_product_id)
    }

    pub fn number_call_uri(&self, raw_number: &str) -> Result<String> {
        let number = sanitize_number(raw_number);
        if number.is_empty() {
            return Err(assistant_error!(invalid_number, "'{}' не содержит цифр", raw_number));
        }
        Ok(format!("{}?PhoneNumber={}", self.call_uri, number))
    }

    pub fn contact_call_uri(&self, contact_name: &str) -> Result<String> {
        let name = contact_name.trim();
        if name.is_empty() {
            return Err(assistant_error!(invalid_contact, "пустое имя контакта"));
        }
        Ok(format!("{}?ContactName={}", self.call_uri, urlencoding::encode(name)))
    }

    pub async fn launch_app(&self) -> Result<LaunchAccepted> {
        let uri = self.app_uri.clone();
        self.dispatch(uri).await
    }

    pub async fn open_store(&self) -> Result<LaunchAccepted> {
        self.dispatch(self.store_uri()).await
    }

    pub async fn call_number(&self, raw_number: &str) -> Result<LaunchAccepted> {
        let uri = self.number_call_uri(raw_number)?;
        self.dispatch(uri).await
    }

    pub async fn call_contact(&self, contact_name: &str) -> Result<LaunchAccepted> {
        let uri = self.contact_call_uri(contact_name)?;
        self.dispatch(uri).await
    }

    async fn dispatch(&self, uri: String) -> Result<LaunchAccepted> {
        debug!("Передаём ОС URI: {}", uri);
        self.launcher.launch(&uri).await?;
        Ok(LaunchAccepted { uri })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssistantError;
    use crate::services::probe::{Scripted, ScriptedRunner};

    fn dispatcher() -> (CallDispatcher, Arc<DryRunLauncher>) {
        let launcher = Arc::new(DryRunLauncher::new());
        (CallDispatcher::new(&Config::default(), launcher.clone()), launcher)
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["+1 (555) 010-9999", "tel: 8-800-555-35-35", "++12ab34", "", "   ", "١٢٣"] {
            let once = sanitize_number(raw);
            assert_eq!(sanitize_number(&once), once);
        }
        assert_eq!(sanitize_number("+1 (555) 010-9999"), "+15550109999");
    }

    #[tokio::test]
    async fn rejects_numbers_without_digits() {
        let (dispatcher, launcher) = dispatcher();
        for raw in ["", "   ", "call me", "(--)"] {
            let result = dispatcher.call_number(raw).await;
            assert!(matches!(result, Err(AssistantError::InvalidNumber(_))), "{raw:?}");
        }
        assert!(launcher.launched().is_empty());
    }

    #[tokio::test]
    async fn builds_call_uris() {
        let (dispatcher, launcher) = dispatcher();

        let accepted = dispatcher.call_number("+44 20 7946 0000").await.unwrap();
        assert_eq!(accepted.uri, "ms-phone-call:?PhoneNumber=+442079460000");

        let accepted = dispatcher.call_contact(" Anna Maria & Co ").await.unwrap();
        assert_eq!(accepted.uri, "ms-phone-call:?ContactName=Anna%20Maria%20%26%20Co");

        dispatcher.launch_app().await.unwrap();
        dispatcher.open_store().await.unwrap();

        assert_eq!(
            launcher.launched(),
            vec![
                "ms-phone-call:?PhoneNumber=+442079460000".to_string(),
                "ms-phone-call:?ContactName=Anna%20Maria%20%26%20Co".to_string(),
                "ms-phone:".to_string(),
                "ms-windows-store://pdp/?ProductId=9NMPJ99TJBHZ".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn blank_contact_is_rejected() {
        let (dispatcher, _) = dispatcher();
        assert!(matches!(
            dispatcher.call_contact("  ").await,
            Err(AssistantError::InvalidContact(_))
        ));
    }

    #[tokio::test]
    async fn shell_launcher_uses_start() {
        let runner = Arc::new(ScriptedRunner::new([Scripted::stdout("")]));
        let launcher = ShellLauncher::new(runner.clone(), Duration::from_secs(5));

        launcher.launch("ms-phone:").await.unwrap();
        assert_eq!(runner.calls(), vec!["cmd /C start  ms-phone:".to_string()]);
    }

    #[tokio::test]
    async fn shell_launcher_failures_are_launch_errors() {
        let runner = Arc::new(ScriptedRunner::new([
            Scripted::failed("The system cannot find the file ms-phone:."),
            Scripted::Missing,
        ]));
        let launcher = ShellLauncher::new(runner, Duration::from_secs(5));

        assert!(matches!(launcher.launch("ms-phone:").await, Err(AssistantError::Launch(_))));
        assert!(matches!(launcher.launch("ms-phone:").await, Err(AssistantError::Launch(_))));
    }
}
