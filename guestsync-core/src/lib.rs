//! Core types and logic for guestsync.
//!
//! This crate holds everything with real decision logic and no network code:
//! - `event` and `window` for the provider-neutral data model
//! - `classify` for deciding whether an event was booked through a scheduler
//! - `reconcile` and `update` for idempotent guest additions
//! - `sync` for the fetch → classify → update → summarize run
//!
//! Calendar backends plug in through the traits in `service`.

pub mod classify;
pub mod error;
pub mod event;
pub mod reconcile;
pub mod service;
pub mod settings;
pub mod summary;
pub mod sync;
pub mod update;
pub mod window;

pub use error::{GuestSyncError, GuestSyncResult, RemoteError, RemoteErrorKind};
pub use event::*;

#[cfg(test)]
mod test_support;
