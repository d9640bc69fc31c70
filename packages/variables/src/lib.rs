//! # Tribune Variables
//!
//! Personalization variable catalog and the bidirectional token
//! transcoder between the two rich-text representations:
//!
//! - **storage**: a text run carrying a `variable` mark whose
//!   `attrs.code` holds the literal token (e.g. `"{{Prénom}}"`) while the
//!   visible text is a human label;
//! - **editor**: plain text containing literal `{{Token}}` markers and no
//!   `variable` marks.
//!
//! The two directions round-trip losslessly for well-formed tokens; an
//! unrecognized token degrades to its trimmed inner content as a label,
//! never an error.

mod catalog;
mod transcoder;

pub use catalog::{Variable, VariableCatalog};
pub use transcoder::{editor_to_storage, storage_to_editor};
