//! Wire document handed to the send pipeline.

use crate::node::Node;
use serde::{Deserialize, Serialize};

/// Publication metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaData {
    pub subject: String,
    /// Audience scope identifier (instance / group the publication targets).
    pub scope: String,
}

/// The wire/storage document: an immutable snapshot of the editing state.
///
/// `content` is the only ordering authority once serialized. A new snapshot
/// is produced per save; snapshots are never mutated after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "metaData")]
    pub meta_data: MetaData,
    pub content: Vec<Node>,
}

impl Message {
    pub fn new(meta_data: MetaData, content: Vec<Node>) -> Self {
        Self { meta_data, content }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Sender identity rendered into the transport-HTML header. Read-only,
/// supplied by the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderInfo {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeType};

    #[test]
    fn test_message_wire_shape() {
        let message = Message::new(
            MetaData {
                subject: "Assemblée générale".to_string(),
                scope: "instance-12".to_string(),
            },
            vec![Node::empty(NodeType::Richtext)],
        );

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["metaData"]["subject"], "Assemblée générale");
        assert_eq!(json["content"][0]["type"], "richtext");
    }

    #[test]
    fn test_message_json_round_trip() {
        let message = Message::new(MetaData::default(), vec![Node::empty(NodeType::Button)]);
        let back = Message::from_json(&message.to_json().unwrap()).unwrap();
        assert_eq!(back, message);
    }
}
