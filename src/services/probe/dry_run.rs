use crate::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

use super::r#trait::Probe;

/// Проверка для dry-run режима: по кругу отдаёт заранее заданные ответы
pub struct DryRunProbe {
    name: &'static str,
    answers: Vec<bool>,
    cursor: AtomicUsize,
}

impl DryRunProbe {
    pub fn new(name: &'static str, answers: Vec<bool>) -> Self {
        Self {
            name,
            answers,
            cursor: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Probe for DryRunProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn detect(&self) -> Result<bool> {
        if self.answers.is_empty() {
            return Ok(false);
        }

        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.answers.len();
        let answer = self.answers[index];
        info!("Dry-run: эмулируем проверку {} -> {}", self.name, answer);
        Ok(answer)
    }
}
