use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;

use super::command::{powershell_args, CommandRunner};
use super::r#trait::Probe;

/// Проверяет регистрацию URI-схемы в HKCU\Software\Classes
pub struct UriSchemeProbe {
    runner: Arc<dyn CommandRunner>,
    shell: String,
    scheme: String,
    timeout: Duration,
}

impl UriSchemeProbe {
    pub fn new(runner: Arc<dyn CommandRunner>, shell: &str, scheme: &str, timeout: Duration) -> Self {
        Self {
            runner,
            shell: shell.to_string(),
            scheme: scheme.to_string(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl Probe for UriSchemeProbe {
    fn name(&self) -> &'static str {
        "uri-scheme"
    }

    async fn detect(&self) -> Result<bool> {
        let script = format!(
            "Get-ItemProperty -Path 'HKCU:\\Software\\Classes\\{}' -ErrorAction SilentlyContinue",
            self.scheme
        );
        let output = self
            .runner
            .run(&self.shell, &powershell_args(&script), self.timeout)
            .await?;

        // SilentlyContinue даёт код 0 и для отсутствующего ключа, смотрим на вывод
        Ok(output.success && !output.stdout_is_blank())
    }
}
