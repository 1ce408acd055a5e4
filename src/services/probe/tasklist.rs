use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;

use super::command::CommandRunner;
use super::r#trait::Probe;

/// Ищет запущенный процесс Phone Link через tasklist
pub struct RunningProcessProbe {
    runner: Arc<dyn CommandRunner>,
    executable: String,
    timeout: Duration,
}

impl RunningProcessProbe {
    pub fn new(runner: Arc<dyn CommandRunner>, executable: &str, timeout: Duration) -> Self {
        Self {
            runner,
            executable: executable.to_string(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl Probe for RunningProcessProbe {
    fn name(&self) -> &'static str {
        "running-process"
    }

    async fn detect(&self) -> Result<bool> {
        let filter = format!("IMAGENAME eq {}", self.executable);
        let output = self
            .runner
            .run("tasklist", &["/FI", filter.as_str(), "/NH"], self.timeout)
            .await?;

        // tasklist печатает "INFO: No tasks..." когда фильтр ничего не нашёл
        Ok(output
            .stdout
            .to_lowercase()
            .contains(&self.executable.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::probe::command::testing::{Scripted, ScriptedRunner};

    fn probe(runner: Arc<ScriptedRunner>) -> RunningProcessProbe {
        RunningProcessProbe::new(runner, "PhoneExperienceHost.exe", Duration::from_secs(3))
    }

    #[tokio::test]
    async fn matches_process_name_case_insensitively() {
        let runner = Arc::new(ScriptedRunner::new([Scripted::stdout(
            "phoneexperiencehost.exe      10244 Console    1    84,120 K",
        )]));
        assert!(probe(runner.clone()).detect().await.unwrap());
        assert_eq!(
            runner.calls()[0],
            "tasklist /FI IMAGENAME eq PhoneExperienceHost.exe /NH"
        );
    }

    #[tokio::test]
    async fn no_tasks_message_is_absent() {
        let runner = Arc::new(ScriptedRunner::new([Scripted::stdout(
            "INFO: No tasks are running which match the specified criteria.",
        )]));
        assert!(!probe(runner).detect().await.unwrap());
    }
}
