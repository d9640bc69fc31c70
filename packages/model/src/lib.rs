//! # Tribune Model
//!
//! Core data model for Tribune publications.
//!
//! A publication is an ordered sequence of typed content blocks ([`Node`]):
//! rich text, images, buttons and attachments. The wire document
//! ([`Message`]) is the flat ordered array handed to the send pipeline;
//! everything position-dependent (edge styling) is recomputed from indices
//! at render time and never persisted.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor: field ordering + per-field content  │
//! └─────────────────────────────────────────────┘
//!                     ↓ zip
//! ┌─────────────────────────────────────────────┐
//! │ model: Message { metaData, content: [Node] }│
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: transport HTML               │
//! └─────────────────────────────────────────────┘
//! ```

mod message;
mod node;
mod richtext;

pub use message::{Message, MetaData, SenderInfo};
pub use node::{
    AttachmentContent, ButtonContent, EdgePosition, ImageContent, Node, NodeBody, NodeType,
};
pub use richtext::{MarkAttrs, RichNode, TextMark, VARIABLE_MARK};
