use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::command::{powershell_args, CommandRunner};
use super::r#trait::Probe;

const USB_PHONE_SCRIPT: &str = r#"
Get-PnpDevice | Where-Object {
    ($_.Class -eq 'USB' -or $_.Class -eq 'WPD') -and
    ($_.FriendlyName -like '*Android*' -or $_.FriendlyName -like '*iPhone*' -or $_.FriendlyName -like '*Phone*')
} | Where-Object {$_.Status -eq 'OK'} | Select-Object -First 1
"#;

/// Ищет телефон среди USB/WPD-устройств PnP
pub struct UsbPhoneProbe {
    runner: Arc<dyn CommandRunner>,
    shell: String,
    timeout: Duration,
}

impl UsbPhoneProbe {
    pub fn new(runner: Arc<dyn CommandRunner>, shell: &str, timeout: Duration) -> Self {
        Self {
            runner,
            shell: shell.to_string(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl Probe for UsbPhoneProbe {
    fn name(&self) -> &'static str {
        "pnp-usb"
    }

    async fn detect(&self) -> Result<bool> {
        let output = self
            .runner
            .run(&self.shell, &powershell_args(USB_PHONE_SCRIPT), self.timeout)
            .await?;

        if !output.stdout_is_blank() {
            debug!("Найдено USB-устройство: {}", output.stdout.trim());
        }
        Ok(!output.stdout_is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::probe::command::testing::{Scripted, ScriptedRunner};

    #[tokio::test]
    async fn any_matching_device_means_connected() {
        let runner = Arc::new(ScriptedRunner::new([Scripted::stdout(
            "Status     Class  FriendlyName\n------     -----  ------------\nOK         WPD    Pixel 7 Android",
        )]));
        let probe = UsbPhoneProbe::new(runner.clone(), "powershell", Duration::from_secs(5));
        assert!(probe.detect().await.unwrap());
        assert!(runner.calls()[0].starts_with("powershell -NoProfile"));
    }

    #[tokio::test]
    async fn blank_output_means_disconnected() {
        let runner = Arc::new(ScriptedRunner::new([Scripted::stdout("\r\n\r\n")]));
        let probe = UsbPhoneProbe::new(runner, "powershell", Duration::from_secs(5));
        assert!(!probe.detect().await.unwrap());
    }
}
