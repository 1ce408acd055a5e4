use crate::events::ConnectionStatus;

/// Тексты, которые видит пользователь. Меняются только при реальной смене статуса.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    status_text: String,
    connection_text: String,
    installation_text: String,
}

impl Default for StatusView {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusView {
    pub fn new() -> Self {
        Self {
            status_text: "Status: Checking...".to_string(),
            connection_text: "Phone: Not Connected".to_string(),
            installation_text: "Phone Link: Checking...".to_string(),
        }
    }

    pub fn connection_text_for(status: ConnectionStatus) -> String {
        match status.connection_type() {
            Some(kind) => format!("Phone: Connected via {} ✓", kind),
            None => "Phone: Not Connected ✗".to_string(),
        }
    }

    fn status_text_for(status: ConnectionStatus) -> &'static str {
        if status.is_connected() {
            "Status: Ready"
        } else {
            "Status: Waiting for phone..."
        }
    }

    /// Применяет свежий статус; возвращает true, если отображаемый текст изменился
    pub fn apply(&mut self, status: ConnectionStatus) -> bool {
        let connection_text = Self::connection_text_for(status);
        let status_text = Self::status_text_for(status);

        if connection_text == self.connection_text && status_text == self.status_text {
            return false;
        }

        self.connection_text = connection_text;
        self.status_text = status_text.to_string();
        true
    }

    pub fn set_installed(&mut self, installed: bool) {
        self.installation_text = if installed {
            "Phone Link: Installed ✓".to_string()
        } else {
            "Phone Link: Not Installed ✗".to_string()
        };
    }

    #[allow(dead_code)]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    #[allow(dead_code)]
    pub fn connection_text(&self) -> &str {
        &self.connection_text
    }

    #[allow(dead_code)]
    pub fn installation_text(&self) -> &str {
        &self.installation_text
    }

    pub fn render(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.status_text, self.connection_text, self.installation_text
        )
    }
}
