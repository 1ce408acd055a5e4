pub mod contacts;
pub mod detector;
pub mod dispatcher;
pub mod monitor;
pub mod probe;
pub mod status_tracker;

pub use contacts::{create_contact_source, ContactSource};
pub use detector::{create_phone_detector, PhoneDetector};
pub use dispatcher::{create_launcher, CallDispatcher};
pub use monitor::ConnectionMonitor;
pub use status_tracker::StatusTracker;

#[cfg(test)]
pub use contacts::{ConfiguredContacts, PhoneLinkContacts};
#[cfg(test)]
pub use dispatcher::DryRunLauncher;
