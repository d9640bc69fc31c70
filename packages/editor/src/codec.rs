//! # Document Codec
//!
//! Conversion between the editing-time shape (field ordering + per-type
//! content map) and the wire shape (flat ordered `content` array).
//!
//! Zip never drops or reorders nodes; unzip assigns fresh deterministic
//! ids in array order. Ids are ephemeral and never persisted, and edge
//! positions are recomputed at render time rather than stored.

use crate::document::PublicationDocument;
use crate::errors::CodecError;
use tribune_model::Message;

/// Flatten the editing state into an immutable wire snapshot.
pub fn zip_message(doc: &PublicationDocument) -> Result<Message, CodecError> {
    let fields = doc.fields();
    let mut content = Vec::with_capacity(fields.len());

    for descriptor in &fields {
        let node = doc
            .node(&descriptor.id)
            .ok_or_else(|| CodecError::MissingContent {
                id: descriptor.id.to_string(),
                node_type: descriptor.node_type,
            })?;
        content.push(node.clone());
    }

    Ok(Message::new(doc.meta_data().clone(), content))
}

/// Rebuild an editable document from a wire snapshot.
pub fn unzip_message(message: Message) -> Result<PublicationDocument, CodecError> {
    let Message { meta_data, content } = message;

    let mut nodes = Vec::with_capacity(content.len());
    for (index, node) in content.into_iter().enumerate() {
        let node_type = node
            .node_type()
            .ok_or(CodecError::UnsupportedNodeType(index))?;
        nodes.push((node_type, node));
    }

    Ok(PublicationDocument::from_parts(meta_data, nodes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InsertAt;
    use tribune_model::{ButtonContent, MetaData, Node, NodeBody, NodeType, RichNode};

    fn sample_message() -> Message {
        Message::new(
            MetaData {
                subject: "Réunion publique".to_string(),
                scope: "instance-3".to_string(),
            },
            vec![
                Node::new(NodeBody::Richtext(Some(RichNode::doc(vec![
                    RichNode::paragraph(vec![RichNode::text("Bonjour à toutes et tous")]),
                ])))),
                Node::new(NodeBody::Button(Some(ButtonContent {
                    text: "S'inscrire".to_string(),
                    link: "https://example.org/rsvp".to_string(),
                    color: None,
                })))
                .with_mark("primary"),
                Node::empty(NodeType::Image),
            ],
        )
    }

    #[test]
    fn test_unzip_then_zip_reproduces_content() {
        let message = sample_message();
        let doc = unzip_message(message.clone()).unwrap();
        let back = zip_message(&doc).unwrap();

        assert_eq!(back.content, message.content);
        assert_eq!(back.meta_data, message.meta_data);
    }

    #[test]
    fn test_unzip_assigns_deterministic_ids_in_order() {
        let doc = unzip_message(sample_message()).unwrap();
        let ids: Vec<String> = doc.fields().iter().map(|f| f.id.to_string()).collect();
        assert_eq!(ids, vec!["field-0", "field-1", "field-2"]);
    }

    #[test]
    fn test_zip_preserves_order_after_edits() {
        let mut doc = unzip_message(sample_message()).unwrap();
        let fields = doc.fields();

        // Move the trailing image to the front.
        doc.move_field(&fields[2].id, -2);
        let message = zip_message(&doc).unwrap();

        assert_eq!(message.content.len(), 3);
        assert_eq!(message.content[0].node_type(), Some(NodeType::Image));
        assert_eq!(message.content[1].node_type(), Some(NodeType::Richtext));
        assert_eq!(message.content[2].node_type(), Some(NodeType::Button));
    }

    #[test]
    fn test_zip_empty_document() {
        let doc = PublicationDocument::new(MetaData::default());
        let message = zip_message(&doc).unwrap();
        assert!(message.content.is_empty());
    }

    #[test]
    fn test_unzip_rejects_foreign_node_types() {
        let json = serde_json::json!({
            "metaData": { "subject": "s", "scope": "g" },
            "content": [
                { "type": "richtext", "content": null },
                { "type": "countdown", "content": {} }
            ]
        });
        let message: Message = serde_json::from_value(json).unwrap();

        assert_eq!(
            unzip_message(message),
            Err(CodecError::UnsupportedNodeType(1))
        );
    }

    #[test]
    fn test_freshly_built_document_round_trips() {
        let mut doc = PublicationDocument::new(MetaData {
            subject: "Appel à volontaires".to_string(),
            scope: "instance-7".to_string(),
        });
        doc.add_field(NodeType::Richtext, InsertAt::End);
        doc.add_field(NodeType::Attachment, InsertAt::End);

        let message = zip_message(&doc).unwrap();
        let reloaded = unzip_message(message.clone()).unwrap();
        let again = zip_message(&reloaded).unwrap();

        assert_eq!(again.content, message.content);
    }
}
