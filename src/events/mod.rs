pub mod status;

pub use status::{ConnectionStatus, ConnectionType, StatusEvent, StatusEventType};
