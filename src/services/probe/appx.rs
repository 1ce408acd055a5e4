use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::command::{powershell_args, CommandRunner};
use super::r#trait::Probe;

/// Ищет пакет Phone Link среди установленных Appx-пакетов
pub struct AppxPackageProbe {
    runner: Arc<dyn CommandRunner>,
    shell: String,
    package_name: String,
    timeout: Duration,
}

impl AppxPackageProbe {
    pub fn new(runner: Arc<dyn CommandRunner>, shell: &str, package_name: &str, timeout: Duration) -> Self {
        Self {
            runner,
            shell: shell.to_string(),
            package_name: package_name.to_string(),
            timeout,
        }
    }

    fn script(&self) -> String {
        format!(
            "Get-AppxPackage -Name {} | Select-Object -ExpandProperty Name",
            self.package_name
        )
    }
}

#[async_trait::async_trait]
impl Probe for AppxPackageProbe {
    fn name(&self) -> &'static str {
        "appx-package"
    }

    async fn detect(&self) -> Result<bool> {
        let script = self.script();
        let output = self
            .runner
            .run(&self.shell, &powershell_args(&script), self.timeout)
            .await?;

        debug!("Get-AppxPackage вернул: '{}'", output.stdout.trim());
        Ok(output.stdout_contains(&self.package_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::probe::command::testing::{Scripted, ScriptedRunner};

    fn probe(runner: Arc<ScriptedRunner>) -> AppxPackageProbe {
        AppxPackageProbe::new(runner, "powershell", "Microsoft.YourPhone", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn detects_installed_package() {
        let runner = Arc::new(ScriptedRunner::new([Scripted::stdout("Microsoft.YourPhone\r\n")]));
        assert!(probe(runner.clone()).detect().await.unwrap());
        assert!(runner.calls()[0].contains("Get-AppxPackage -Name Microsoft.YourPhone"));
    }

    #[tokio::test]
    async fn empty_output_means_not_installed() {
        let runner = Arc::new(ScriptedRunner::new([Scripted::stdout("")]));
        assert!(!probe(runner).detect().await.unwrap());
    }

    #[tokio::test]
    async fn timeout_is_an_error() {
        let runner = Arc::new(ScriptedRunner::new([Scripted::Timeout]));
        assert!(probe(runner).detect().await.is_err());
    }
}
