use crate::debug_if_enabled;
use smallvec::SmallVec;
use tracing::debug;

use super::r#trait::Probe;

/// Упорядоченный список проверок: первая успешная побеждает
pub struct ProbeChain {
    label: &'static str,
    probes: SmallVec<[Box<dyn Probe>; 4]>,
}

impl ProbeChain {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            probes: SmallVec::new(),
        }
    }

    pub fn with_probe(mut self, probe: impl Probe + 'static) -> Self {
        self.push(Box::new(probe));
        self
    }

    pub fn push(&mut self, probe: Box<dyn Probe>) {
        self.probes.push(probe);
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn probe_names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|probe| probe.name()).collect()
    }

    /// Опрашивает проверки по порядку и возвращает имя первой сработавшей.
    /// Следующие после неё проверки не запускаются.
    pub async fn detect_with_source(&self) -> Option<&'static str> {
        for probe in &self.probes {
            match probe.detect().await {
                Ok(true) => {
                    debug!("[{}] {}: обнаружено", self.label, probe.name());
                    return Some(probe.name());
                }
                Ok(false) => {
                    debug_if_enabled!("[{}] {}: не обнаружено", self.label, probe.name());
                }
                Err(e) => {
                    debug!("[{}] {}: проверка не удалась ({}), считаем 'нет'", self.label, probe.name(), e);
                }
            }
        }

        debug_if_enabled!("[{}] ни одна из {} проверок не сработала", self.label, self.probes.len());
        None
    }

    pub async fn detect(&self) -> bool {
        self.detect_with_source().await.is_some()
    }
}
