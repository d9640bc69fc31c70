//! Content block model.
//!
//! A [`Node`] is one block of a publication. Its payload shape is fully
//! determined by its [`NodeType`]; a node with no payload is "empty" and
//! still occupies a slot (the editor renders a placeholder for it).

use crate::richtext::RichNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator for the four supported block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Richtext,
    Image,
    Button,
    Attachment,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Richtext => "richtext",
            NodeType::Image => "image",
            NodeType::Button => "button",
            NodeType::Attachment => "attachment",
        };
        write!(f, "{}", name)
    }
}

/// Image payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Button payload. `color` is an optional per-button accent override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonContent {
    pub text: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Attachment payload (uploaded file descriptor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentContent {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Typed payload of a content block.
///
/// Every payload is optional: an inserted block starts empty and is filled
/// in by the user. `Unknown` absorbs node types introduced by newer
/// clients; renderers skip it rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum NodeBody {
    Richtext(Option<RichNode>),
    Image(Option<ImageContent>),
    Button(Option<ButtonContent>),
    Attachment(Option<AttachmentContent>),
    Unknown,
}

// Deserialization is manual because `#[serde(other)]` on an adjacently
// tagged enum rejects unknown tags whose `content` is anything but null,
// and unknown types from newer clients do carry content.
impl<'de> Deserialize<'de> for NodeBody {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "type")]
            node_type: String,
            #[serde(default)]
            content: serde_json::Value,
        }

        fn payload<'de, T, D>(content: serde_json::Value) -> Result<T, D::Error>
        where
            T: serde::de::DeserializeOwned,
            D: serde::Deserializer<'de>,
        {
            serde_json::from_value(content).map_err(serde::de::Error::custom)
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(match raw.node_type.as_str() {
            "richtext" => NodeBody::Richtext(payload::<_, D>(raw.content)?),
            "image" => NodeBody::Image(payload::<_, D>(raw.content)?),
            "button" => NodeBody::Button(payload::<_, D>(raw.content)?),
            "attachment" => NodeBody::Attachment(payload::<_, D>(raw.content)?),
            _ => NodeBody::Unknown,
        })
    }
}

impl NodeBody {
    /// The discriminator for this payload, if it is a known type.
    pub fn node_type(&self) -> Option<NodeType> {
        match self {
            NodeBody::Richtext(_) => Some(NodeType::Richtext),
            NodeBody::Image(_) => Some(NodeType::Image),
            NodeBody::Button(_) => Some(NodeType::Button),
            NodeBody::Attachment(_) => Some(NodeType::Attachment),
            NodeBody::Unknown => None,
        }
    }

    /// Whether the block carries no meaningful content yet.
    pub fn is_empty(&self) -> bool {
        match self {
            NodeBody::Richtext(c) => c.is_none(),
            NodeBody::Image(c) => c.is_none(),
            NodeBody::Button(c) => c.is_none(),
            NodeBody::Attachment(c) => c.is_none(),
            NodeBody::Unknown => true,
        }
    }
}

/// One content block of a publication.
///
/// `marks` is the ordered list of style tags (e.g. `primary`, `secondary`)
/// selecting theme overrides; order matters for cascade resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub body: NodeBody,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<String>,
}

impl Node {
    pub fn new(body: NodeBody) -> Self {
        Self {
            body,
            marks: Vec::new(),
        }
    }

    /// An empty block of the given type, used to seed editing state when a
    /// bare type is inserted.
    pub fn empty(node_type: NodeType) -> Self {
        let body = match node_type {
            NodeType::Richtext => NodeBody::Richtext(None),
            NodeType::Image => NodeBody::Image(None),
            NodeType::Button => NodeBody::Button(None),
            NodeType::Attachment => NodeBody::Attachment(None),
        };
        Self::new(body)
    }

    pub fn with_mark(mut self, mark: impl Into<String>) -> Self {
        self.marks.push(mark.into());
        self
    }

    pub fn node_type(&self) -> Option<NodeType> {
        self.body.node_type()
    }
}

/// Placement classifier derived from a block's index among its siblings.
///
/// Never stored on a node; recomputed wherever position-dependent styling
/// is needed. Interior blocks are always explicit `Middle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePosition {
    Alone,
    Leading,
    Middle,
    Trailing,
}

impl EdgePosition {
    /// Classify index `index` in a sequence of `len` blocks.
    pub fn of(index: usize, len: usize) -> Self {
        if len <= 1 {
            EdgePosition::Alone
        } else if index == 0 {
            EdgePosition::Leading
        } else if index + 1 == len {
            EdgePosition::Trailing
        } else {
            EdgePosition::Middle
        }
    }

    /// Theme table key for this position.
    pub fn key(&self) -> &'static str {
        match self {
            EdgePosition::Alone => "alone",
            EdgePosition::Leading => "leading",
            EdgePosition::Middle => "middle",
            EdgePosition::Trailing => "trailing",
        }
    }
}
