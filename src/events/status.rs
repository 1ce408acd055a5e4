use serde::{Deserialize, Serialize};
use std::fmt;

/// Способ подключения телефона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionType {
    Usb,
    Bluetooth,
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionType::Usb => write!(f, "USB"),
            ConnectionType::Bluetooth => write!(f, "Bluetooth"),
        }
    }
}

/// Состояние подключения телефона по результатам последнего опроса
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected(ConnectionType),
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected(_))
    }

    pub fn connection_type(&self) -> Option<ConnectionType> {
        match self {
            ConnectionStatus::Connected(kind) => Some(*kind),
            ConnectionStatus::Disconnected => None,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected(kind) => write!(f, "connected via {}", kind),
            ConnectionStatus::Disconnected => write!(f, "not connected"),
        }
    }
}

/// Событие, передаваемое из задачи опроса в консоль
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub status: ConnectionStatus,
    pub timestamp: std::time::Instant,
    pub event_type: StatusEventType,
}

impl StatusEvent {
    pub fn new(status: ConnectionStatus, event_type: StatusEventType) -> Self {
        Self {
            status,
            timestamp: std::time::Instant::now(),
            event_type,
        }
    }

    #[allow(dead_code)]
    pub fn changed(status: ConnectionStatus) -> Self {
        Self::new(status, StatusEventType::ConnectionChanged)
    }

    pub fn refreshed(status: ConnectionStatus) -> Self {
        Self::new(status, StatusEventType::Refreshed)
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: {} ({}ms ago)",
            self.event_type,
            self.status,
            self.timestamp.elapsed().as_millis()
        )
    }
}

/// Тип события состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEventType {
    /// Фоновый опрос обнаружил изменение
    ConnectionChanged,
    /// Принудительное обновление по запросу пользователя
    Refreshed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_status_accessors() {
        let usb = ConnectionStatus::Connected(ConnectionType::Usb);
        assert!(usb.is_connected());
        assert_eq!(usb.connection_type(), Some(ConnectionType::Usb));

        let none = ConnectionStatus::default();
        assert!(!none.is_connected());
        assert_eq!(none.connection_type(), None);
    }

    #[test]
    fn test_connection_status_display() {
        assert_eq!(
            ConnectionStatus::Connected(ConnectionType::Bluetooth).to_string(),
            "connected via Bluetooth"
        );
        assert_eq!(ConnectionStatus::Disconnected.to_string(), "not connected");
    }

    #[test]
    fn test_status_event_creation() {
        let event = StatusEvent::changed(ConnectionStatus::Connected(ConnectionType::Usb));
        assert_eq!(event.event_type, StatusEventType::ConnectionChanged);
        assert_eq!(event.status.connection_type(), Some(ConnectionType::Usb));

        let event = StatusEvent::refreshed(ConnectionStatus::Disconnected);
        assert_eq!(event.event_type, StatusEventType::Refreshed);
    }
}
