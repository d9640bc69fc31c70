//! Rich-text tree carried by `richtext` blocks.
//!
//! The shape mirrors the editor's wire JSON: a node is either a text leaf
//! (`text` + optional `marks`) or a container (`content` children). All
//! optional fields are skipped when absent so a document round-trips
//! byte-for-byte through serde.

use serde::{Deserialize, Serialize};

/// Mark kind carrying a personalization variable reference on a text run.
pub const VARIABLE_MARK: &str = "variable";

/// Attributes attached to a [`TextMark`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkAttrs {
    /// Literal token string for `variable` marks, e.g. `"{{Prénom}}"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Target for `link` marks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A style or semantic tag on a text run (`bold`, `italic`, `link`,
/// `variable`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<MarkAttrs>,
}

impl TextMark {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: None,
        }
    }

    /// A `variable` mark referencing the given token.
    pub fn variable(code: impl Into<String>) -> Self {
        Self {
            kind: VARIABLE_MARK.to_string(),
            attrs: Some(MarkAttrs {
                code: Some(code.into()),
                href: None,
            }),
        }
    }

    pub fn is_variable(&self) -> bool {
        self.kind == VARIABLE_MARK
    }
}

/// One node of the rich-text tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<TextMark>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<RichNode>>,
}

impl RichNode {
    /// A text leaf with no marks.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            marks: None,
            content: None,
        }
    }

    /// A container node of the given kind (`doc`, `paragraph`, ...).
    pub fn container(kind: impl Into<String>, content: Vec<RichNode>) -> Self {
        Self {
            kind: kind.into(),
            text: None,
            marks: None,
            content: Some(content),
        }
    }

    pub fn doc(content: Vec<RichNode>) -> Self {
        Self::container("doc", content)
    }

    pub fn paragraph(content: Vec<RichNode>) -> Self {
        Self::container("paragraph", content)
    }

    pub fn with_marks(mut self, marks: Vec<TextMark>) -> Self {
        self.marks = if marks.is_empty() { None } else { Some(marks) };
        self
    }

    pub fn is_text(&self) -> bool {
        self.kind == "text"
    }

    /// The `variable` mark on this node, if any.
    pub fn variable_mark(&self) -> Option<&TextMark> {
        self.marks
            .as_deref()
            .and_then(|marks| marks.iter().find(|m| m.is_variable()))
    }
}
