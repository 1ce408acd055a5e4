use crate::error::{AssistantError, Result};
use std::path::PathBuf;

use super::r#trait::Probe;

/// Проверяет псевдоним исполняемого файла в WindowsApps.
///
/// Псевдонимы там являются reparse point'ами, поэтому смотрим на сам
/// элемент каталога, не переходя по ссылке.
pub struct ExecutableAliasProbe {
    windows_apps_dir: Option<PathBuf>,
    executable: String,
}

impl ExecutableAliasProbe {
    pub fn new(windows_apps_dir: Option<PathBuf>, executable: &str) -> Self {
        Self {
            windows_apps_dir,
            executable: executable.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Probe for ExecutableAliasProbe {
    fn name(&self) -> &'static str {
        "executable-alias"
    }

    async fn detect(&self) -> Result<bool> {
        let Some(dir) = &self.windows_apps_dir else {
            return AssistantError::probe_failed("каталог WindowsApps не определён");
        };

        let path = dir.join(&self.executable);
        Ok(tokio::fs::symlink_metadata(&path).await.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_existing_alias() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("PhoneExperienceHost.exe"), b"").unwrap();

        let probe = ExecutableAliasProbe::new(Some(dir.path().to_path_buf()), "PhoneExperienceHost.exe");
        assert!(probe.detect().await.unwrap());
    }

    #[tokio::test]
    async fn missing_alias_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let probe = ExecutableAliasProbe::new(Some(dir.path().to_path_buf()), "PhoneExperienceHost.exe");
        assert!(!probe.detect().await.unwrap());
    }

    #[tokio::test]
    async fn unknown_directory_is_an_error() {
        let probe = ExecutableAliasProbe::new(None, "PhoneExperienceHost.exe");
        assert!(probe.detect().await.is_err());
    }
}
