use crate::config::Config;
use crate::events::{ConnectionStatus, ConnectionType};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::probe::{
    AppxPackageProbe, BluetoothPhoneProbe, CommandRunner, DryRunProbe, ExecutableAliasProbe,
    ProbeChain, RunningProcessProbe, UriSchemeProbe, UsbPhoneProbe,
};

/// Отвечает на три вопроса: установлен ли Phone Link, подключён ли телефон
/// по USB и подключён ли он по Bluetooth
pub struct PhoneDetector {
    usb: ProbeChain,
    bluetooth: ProbeChain,
    installation: ProbeChain,
    // Одновременно выполняется не больше одного опроса подключения
    probe_lock: Mutex<()>,
}

impl PhoneDetector {
    pub fn new(usb: ProbeChain, bluetooth: ProbeChain, installation: ProbeChain) -> Self {
        debug!(
            "PhoneDetector: usb={:?}, bluetooth={:?}, installation={:?}",
            usb.probe_names(),
            bluetooth.probe_names(),
            installation.probe_names()
        );
        Self {
            usb,
            bluetooth,
            installation,
            probe_lock: Mutex::new(()),
        }
    }

    /// USB важнее Bluetooth: Bluetooth опрашивается, только если USB не найден
    pub async fn detect_connection(&self) -> ConnectionStatus {
        let _guard = self.probe_lock.lock().await;

        if self.usb.detect().await {
            return ConnectionStatus::Connected(ConnectionType::Usb);
        }

        if self.bluetooth.detect().await {
            return ConnectionStatus::Connected(ConnectionType::Bluetooth);
        }

        ConnectionStatus::Disconnected
    }

    pub async fn check_installation(&self) -> bool {
        match self.installation.detect_with_source().await {
            Some(source) => {
                info!("Phone Link обнаружен проверкой {}", source);
                true
            }
            None => false,
        }
    }
}

/// Собирает детектор с реальными проверками или с эмуляцией для dry-run
pub fn create_phone_detector(
    config: &Config,
    runner: Arc<dyn CommandRunner>,
    dry_run: bool,
) -> PhoneDetector {
    if dry_run {
        return PhoneDetector::new(
            ProbeChain::new("usb").with_probe(DryRunProbe::new("dry-usb", vec![false, false, true, true])),
            ProbeChain::new("bluetooth").with_probe(DryRunProbe::new("dry-bluetooth", vec![true, false])),
            ProbeChain::new("installation").with_probe(DryRunProbe::new("dry-installation", vec![true])),
        );
    }

    let shell = config.probe.shell.as_str();
    let bridge = &config.bridge;

    let usb = ProbeChain::new("usb").with_probe(UsbPhoneProbe::new(
        runner.clone(),
        shell,
        config.shell_timeout(),
    ));

    let bluetooth = ProbeChain::new("bluetooth").with_probe(BluetoothPhoneProbe::new(
        runner.clone(),
        shell,
        config.shell_timeout(),
        config.bluetooth.treat_enabled_as_connected,
    ));

    let installation = ProbeChain::new("installation")
        .with_probe(AppxPackageProbe::new(
            runner.clone(),
            shell,
            &bridge.package_name,
            config.shell_timeout(),
        ))
        .with_probe(ExecutableAliasProbe::new(
            config.windows_apps_dir(),
            &bridge.executable,
        ))
        .with_probe(RunningProcessProbe::new(
            runner.clone(),
            &bridge.executable,
            config.tasklist_timeout(),
        ))
        .with_probe(UriSchemeProbe::new(
            runner,
            shell,
            &bridge.registry_scheme,
            config.registry_timeout(),
        ));

    PhoneDetector::new(usb, bluetooth, installation)
}
