//! # Tribune Editor
//!
//! Core document editing engine for Tribune publications.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor: PublicationDocument                 │
//! │  - ordered field registry {id, type}        │
//! │  - per-type editing state (live content)    │
//! │  - add/remove/move with stable identity     │
//! └─────────────────────────────────────────────┘
//!                     ↓ zip / ↑ unzip
//! ┌─────────────────────────────────────────────┐
//! │ model: Message { metaData, content: [Node] }│
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Single writer**: the document is the only owner of the ordering
//!    and the editing state; callers go through its operations so the
//!    id ↔ content invariant holds by construction.
//! 2. **Stable identity**: a field's id never changes; moving a field
//!    changes only its position.
//! 3. **Defensive operations**: removing or moving an unknown field is a
//!    no-op, inserting after a missing anchor appends. UI races are
//!    expected, never fatal.
//! 4. **Ephemeral ids**: the wire document carries no ids; they are
//!    re-derived deterministically at load time.

mod codec;
mod document;
mod errors;

pub use codec::{unzip_message, zip_message};
pub use document::{FieldDescriptor, FieldId, FieldInit, InsertAt, PublicationDocument};
pub use errors::CodecError;
