use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::command::{powershell_args, CommandRunner};
use super::r#trait::Probe;

const BLUETOOTH_PHONE_SCRIPT: &str = r#"
$adapters = Get-PnpDevice -Class Bluetooth | Where-Object {$_.Status -eq 'OK'}
if ($adapters) {
    $devices = Get-PnpDevice -Class Bluetooth | Where-Object {$_.FriendlyName -like '*Phone*' -or $_.FriendlyName -like '*Mobile*'}
    if ($devices) { Write-Output 'CONNECTED' } else { Write-Output 'ENABLED' }
} else {
    Write-Output 'DISABLED'
}
"#;

/// Состояние Bluetooth по выводу скрипта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BluetoothState {
    Connected,
    Enabled,
    Disabled,
    Unknown,
}

impl BluetoothState {
    pub fn parse(output: &str) -> Self {
        if output.contains("CONNECTED") {
            BluetoothState::Connected
        } else if output.contains("ENABLED") {
            BluetoothState::Enabled
        } else if output.contains("DISABLED") {
            BluetoothState::Disabled
        } else {
            BluetoothState::Unknown
        }
    }
}

/// Ищет сопряжённый по Bluetooth телефон
pub struct BluetoothPhoneProbe {
    runner: Arc<dyn CommandRunner>,
    shell: String,
    timeout: Duration,
    treat_enabled_as_connected: bool,
}

impl BluetoothPhoneProbe {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        shell: &str,
        timeout: Duration,
        treat_enabled_as_connected: bool,
    ) -> Self {
        Self {
            runner,
            shell: shell.to_string(),
            timeout,
            treat_enabled_as_connected,
        }
    }
}

#[async_trait::async_trait]
impl Probe for BluetoothPhoneProbe {
    fn name(&self) -> &'static str {
        "pnp-bluetooth"
    }

    async fn detect(&self) -> Result<bool> {
        let output = self
            .runner
            .run(&self.shell, &powershell_args(BLUETOOTH_PHONE_SCRIPT), self.timeout)
            .await?;

        let state = BluetoothState::parse(&output.stdout);
        debug!("Состояние Bluetooth: {:?}", state);

        Ok(match state {
            BluetoothState::Connected => true,
            BluetoothState::Enabled => self.treat_enabled_as_connected,
            BluetoothState::Disabled | BluetoothState::Unknown => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::probe::command::testing::{Scripted, ScriptedRunner};

    #[test]
    fn parse_states() {
        assert_eq!(BluetoothState::parse("CONNECTED\r\n"), BluetoothState::Connected);
        assert_eq!(BluetoothState::parse("ENABLED"), BluetoothState::Enabled);
        assert_eq!(BluetoothState::parse("DISABLED"), BluetoothState::Disabled);
        assert_eq!(BluetoothState::parse(""), BluetoothState::Unknown);
    }

    #[tokio::test]
    async fn enabled_adapter_counts_when_configured() {
        let runner = Arc::new(ScriptedRunner::new([
            Scripted::stdout("ENABLED"),
            Scripted::stdout("ENABLED"),
        ]));
        let lenient = BluetoothPhoneProbe::new(runner.clone(), "powershell", Duration::from_secs(5), true);
        let strict = BluetoothPhoneProbe::new(runner, "powershell", Duration::from_secs(5), false);

        assert!(lenient.detect().await.unwrap());
        assert!(!strict.detect().await.unwrap());
    }

    #[tokio::test]
    async fn disabled_adapter_is_absent() {
        let runner = Arc::new(ScriptedRunner::new([Scripted::stdout("DISABLED")]));
        let probe = BluetoothPhoneProbe::new(runner, "powershell", Duration::from_secs(5), true);
        assert!(!probe.detect().await.unwrap());
    }
}
