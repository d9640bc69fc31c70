//! # Tribune Autosave
//!
//! Policy layer deciding when an edited publication is persisted.
//!
//! Micro-edits (text changes, reorders) go through [`AutosaveCoordinator::queue_save`],
//! which coalesces every call inside a quiet window into one persist call
//! carrying the latest snapshot. Operations that must be durable before
//! the UI proceeds (field removal, sender change, explicit submit) use
//! [`AutosaveCoordinator::save_now`] and await the result.
//!
//! The coordinator starts in **uncreated** mode; the first successful
//! save adopts the server-assigned id (published on a watch channel so
//! the owner can update its route) and every later save targets it.
//! A failed save surfaces as a non-blocking [`SaveStatus::Failed`] and
//! leaves the snapshot dirty; editing is never blocked and nothing is
//! rolled back.

mod coordinator;
mod store;

pub use coordinator::{AutosaveConfig, AutosaveCoordinator, AutosaveError, SaveStatus};
pub use store::{DraftPayload, PublicationStore, SaveReceipt, StoreError};
