//! Authorization: group-admin checks and owner/sudo checks.

mod checker;

pub use checker::{AdminGate, AdminStatus};
