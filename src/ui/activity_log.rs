use chrono::{Local, NaiveTime};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub time: NaiveTime,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.time.format("%H:%M:%S"), self.message)
    }
}

/// Журнал действий для пользователя: только добавление, без сохранения на диск
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) -> &LogEntry {
        self.push_at(Local::now().time(), message)
    }

    pub fn push_at(&mut self, time: NaiveTime, message: impl Into<String>) -> &LogEntry {
        self.entries.push(LogEntry {
            time,
            message: message.into(),
        });
        &self.entries[self.entries.len() - 1]
    }

    #[allow(dead_code)]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_timestamped_in_order() {
        let mut log = ActivityLog::new();
        assert!(log.is_empty());

        let time = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        log.push_at(time, "Checking Phone Link installation...");
        log.push_at(time, "Phone Link is installed");

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.render(),
            "[09:05:07] Checking Phone Link installation...\n[09:05:07] Phone Link is installed"
        );
    }

    #[test]
    fn push_uses_current_time() {
        let mut log = ActivityLog::new();
        let entry = log.push("hello").to_string();
        assert!(entry.starts_with('['));
        assert!(entry.ends_with("] hello"));
    }
}
