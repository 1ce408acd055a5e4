//! Probe layer: responsibility and boundaries
//!
//! This module and its submodules answer yes/no presence questions by running
//! short, timeout-bounded external queries and matching their text output.
//! Probes never decide what the answer means for the user; that belongs to
//! PhoneDetector and the console front-end.

mod appx;
mod bluetooth;
mod chain;
mod command;
mod dry_run;
mod executable_alias;
mod registry;
mod tasklist;
mod r#trait;
mod usb;

pub use self::appx::AppxPackageProbe;
pub use self::bluetooth::BluetoothPhoneProbe;
pub use self::chain::ProbeChain;
pub use self::command::{CommandRunner, SystemCommandRunner};
pub use self::dry_run::DryRunProbe;
pub use self::executable_alias::ExecutableAliasProbe;
pub use self::registry::UriSchemeProbe;
pub use self::tasklist::RunningProcessProbe;
pub use self::usb::UsbPhoneProbe;

#[cfg(test)]
pub use self::chain::testing::FixedProbe;
#[cfg(test)]
pub use self::command::testing::{Scripted, ScriptedRunner};
