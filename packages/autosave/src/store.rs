//! Persistence boundary.
//!
//! The remote API is an external collaborator: the coordinator treats it
//! as opaque except for the returned id (adopted on first creation) and
//! the `synchronized` flag gating whether sending is allowed.

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tribune_model::Message;

/// What gets persisted on every save: the wire document plus the
/// transport HTML rendered from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftPayload {
    pub message: Message,
    pub html: String,
}

/// Server response to a create-or-update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Server-assigned publication id.
    pub id: String,
    /// Whether the remote copy matches what was sent; sending is gated
    /// on this flag.
    pub synchronized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("persistence failed: {0}")]
    Remote(String),
}

/// Remote persistence collaborator.
///
/// `id` is `None` until the first successful save creates the remote
/// document; afterwards every call carries the adopted id.
pub trait PublicationStore: Send + Sync + 'static {
    fn create_or_update(
        &self,
        draft: DraftPayload,
        id: Option<String>,
    ) -> impl Future<Output = Result<SaveReceipt, StoreError>> + Send;
}
