use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub monitor: MonitorConfig,
    pub bridge: BridgeConfig,
    pub probe: ProbeConfig,
    pub bluetooth: BluetoothConfig,
    #[serde(default)]
    pub contacts: ContactsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub poll_interval_ms: u64,
}

/// Параметры приложения-моста (Phone Link) и его URI-схем
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeConfig {
    pub package_name: String,
    pub executable: String,
    pub app_uri: String,
    pub call_uri: String,
    pub registry_scheme: String,
    pub store_product_id: String,
    pub launch_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    pub shell: String,
    pub shell_timeout_ms: u64,
    pub tasklist_timeout_ms: u64,
    pub registry_timeout_ms: u64,
    #[serde(default)]
    pub windows_apps_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BluetoothConfig {
    /// Считать включённый Bluetooth-адаптер подключённым телефоном
    pub treat_enabled_as_connected: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContactsConfig {
    #[serde(default)]
    pub names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
                filter: "call_assistant=info".to_string(),
            },
            monitor: MonitorConfig {
                enabled: true,
                poll_interval_ms: 5000,
            },
            bridge: BridgeConfig {
                package_name: "Microsoft.YourPhone".to_string(),
                executable: "PhoneExperienceHost.exe".to_string(),
                app_uri: "ms-phone:".to_string(),
                call_uri: "ms-phone-call:".to_string(),
                registry_scheme: "ms-phone".to_string(),
                store_product_id: "9NMPJ99TJBHZ".to_string(),
                launch_timeout_ms: 5000,
            },
            probe: ProbeConfig {
                shell: "powershell".to_string(),
                shell_timeout_ms: 5000,
                tasklist_timeout_ms: 3000,
                registry_timeout_ms: 3000,
                windows_apps_dir: None,
            },
            bluetooth: BluetoothConfig {
                treat_enabled_as_connected: true,
            },
            contacts: ContactsConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("CALL_ASSISTANT_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.monitor.poll_interval_ms < 1000 {
            anyhow::bail!("poll_interval_ms должно быть минимум 1000");
        }

        if self.probe.shell.trim().is_empty() {
            anyhow::bail!("probe.shell не может быть пустым");
        }

        for (name, value) in [
            ("shell_timeout_ms", self.probe.shell_timeout_ms),
            ("tasklist_timeout_ms", self.probe.tasklist_timeout_ms),
            ("registry_timeout_ms", self.probe.registry_timeout_ms),
            ("launch_timeout_ms", self.bridge.launch_timeout_ms),
        ] {
            if value == 0 {
                anyhow::bail!("{} должно быть больше 0", name);
            }
        }

        for (name, value) in [
            ("package_name", &self.bridge.package_name),
            ("executable", &self.bridge.executable),
            ("app_uri", &self.bridge.app_uri),
            ("call_uri", &self.bridge.call_uri),
            ("registry_scheme", &self.bridge.registry_scheme),
            ("store_product_id", &self.bridge.store_product_id),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("bridge.{} не может быть пустым", name);
            }
        }

        if !self.bridge.call_uri.ends_with(':') || !self.bridge.app_uri.ends_with(':') {
            anyhow::bail!("URI-схемы Phone Link должны заканчиваться на ':'");
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.poll_interval_ms)
    }

    pub fn shell_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.shell_timeout_ms)
    }

    pub fn tasklist_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.tasklist_timeout_ms)
    }

    pub fn registry_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.registry_timeout_ms)
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.bridge.launch_timeout_ms)
    }

    /// Каталог псевдонимов исполняемых файлов WindowsApps текущего пользователя
    pub fn windows_apps_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.probe.windows_apps_dir {
            return Some(dir.clone());
        }

        let local_app_data = std::env::var_os("LOCALAPPDATA")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("USERPROFILE")
                    .map(|home| PathBuf::from(home).join("AppData").join("Local"))
            })?;

        Some(local_app_data.join("Microsoft").join("WindowsApps"))
    }
}
