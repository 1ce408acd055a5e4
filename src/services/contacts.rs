use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Источник списка контактов: упорядоченные отображаемые имена без ключей
#[async_trait::async_trait]
pub trait ContactSource: Send + Sync {
    async fn load(&self) -> Result<Vec<String>>;
}

/// Контакты самого Phone Link. Прямого доступа к ним у нас нет, поэтому
/// список всегда пуст и пользователю предлагается открыть Phone Link.
pub struct PhoneLinkContacts;

#[async_trait::async_trait]
impl ContactSource for PhoneLinkContacts {
    async fn load(&self) -> Result<Vec<String>> {
        debug!("Phone Link не предоставляет доступ к контактам");
        Ok(Vec::new())
    }
}

/// Контакты из секции `[contacts]` конфигурации, порядок сохраняется
pub struct ConfiguredContacts {
    names: Vec<String>,
}

impl ConfiguredContacts {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

#[async_trait::async_trait]
impl ContactSource for ConfiguredContacts {
    async fn load(&self) -> Result<Vec<String>> {
        Ok(self
            .names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }
}

pub fn create_contact_source(config: &Config) -> Arc<dyn ContactSource> {
    if config.contacts.names.is_empty() {
        Arc::new(PhoneLinkContacts)
    } else {
        info!("Используем {} контактов из конфигурации", config.contacts.names.len());
        Arc::new(ConfiguredContacts::new(config.contacts.names.clone()))
    }
}
