//! Address book core: the contact model, its JSON file, and the controller
//! a front-end drives.

pub mod config;
pub mod controller;
pub mod core;
pub mod message;
pub mod shell;
pub mod store;

pub use crate::config::Config;
pub use crate::controller::{ContactListController, ControllerError, ImportSummary, LoadReport};
pub use crate::core::contact::{Contact, ContactField};
pub use crate::message::{Command, ImportMode, Message, StateChange};
pub use crate::store::{ContactFile, LoadOutcome, StoreError};

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether debug logging is active, shared between the logger filter and the config toggle.
static DEBUG_LOGGING: AtomicBool = AtomicBool::new(false);

pub fn set_debug_logging(enabled: bool) {
    DEBUG_LOGGING.store(enabled, Ordering::Relaxed);
}

pub fn debug_logging() -> bool {
    DEBUG_LOGGING.load(Ordering::Relaxed)
}
