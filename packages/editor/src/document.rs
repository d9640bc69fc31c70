//! # Publication Document
//!
//! The editing-time representation of a publication: an ordered list of
//! field descriptors plus the live content for each field, owned by one
//! editor session.
//!
//! ## Lifecycle
//!
//! ```text
//! Unzip → Edit (add/remove/move/update) → Zip → Render/Persist
//!   ↓          ↓                           ↓
//! Message   registry + state           Message snapshot
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tribune_model::{MetaData, Node, NodeType};

/// Stable identifier of one field slot. Unique among currently-live
/// fields; never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(String);

impl FieldId {
    pub(crate) fn derived(index: u64) -> Self {
        Self(format!("field-{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable handle for one slot in the ordered document, independent of its
/// content. Never mutated in place: moving a field changes only its
/// position, not its id or type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub node_type: NodeType,
}

/// Initial content for an inserted field.
#[derive(Debug, Clone)]
pub struct FieldInit {
    node_type: NodeType,
    node: Node,
}

impl FieldInit {
    /// An empty block of the given type; default content is seeded into
    /// the editing state so the slot renders a placeholder.
    pub fn empty(node_type: NodeType) -> Self {
        Self {
            node_type,
            node: Node::empty(node_type),
        }
    }

    /// A pre-filled block. Returns `None` for foreign node types, which
    /// the editor cannot host.
    pub fn node(node: Node) -> Option<Self> {
        let node_type = node.node_type()?;
        Some(Self { node_type, node })
    }
}

impl From<NodeType> for FieldInit {
    fn from(node_type: NodeType) -> Self {
        Self::empty(node_type)
    }
}

/// Where to insert a new field.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertAt {
    Start,
    End,
    /// Immediately after the given field; appends when the anchor is no
    /// longer present (defensive fallback, never an error).
    After(FieldId),
}

/// Editable publication document.
///
/// Owns the field ordering and the per-type editing state. Every id in
/// the ordering has exactly one content entry of its type, and vice
/// versa; all mutations go through the operations below so that holds by
/// construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicationDocument {
    /// Publication metadata (subject, audience scope).
    meta_data: MetaData,

    /// The ordering authority while editing.
    fields: Vec<FieldDescriptor>,

    /// Live content, keyed by type then id.
    states: HashMap<NodeType, HashMap<FieldId, Node>>,

    /// Source of fresh ids, monotonic over the document's lifetime.
    next_id: u64,

    /// Current version number (increments on each mutation).
    pub version: u64,
}

impl PublicationDocument {
    pub fn new(meta_data: MetaData) -> Self {
        Self {
            meta_data,
            ..Default::default()
        }
    }

    /// Rebuild a document from load-time parts. Ids are assigned in array
    /// order; the counter continues past them so later inserts stay
    /// unique among live fields.
    pub(crate) fn from_parts(meta_data: MetaData, nodes: Vec<(NodeType, Node)>) -> Self {
        let mut doc = Self::new(meta_data);
        for (node_type, node) in nodes {
            let id = doc.fresh_id();
            doc.fields.push(FieldDescriptor {
                id: id.clone(),
                node_type,
            });
            doc.states.entry(node_type).or_default().insert(id, node);
        }
        doc
    }

    fn fresh_id(&mut self) -> FieldId {
        let id = FieldId::derived(self.next_id);
        self.next_id += 1;
        id
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    // ---- registry operations ----

    /// Insert a new field and seed its content.
    pub fn add_field(&mut self, init: impl Into<FieldInit>, at: InsertAt) -> FieldDescriptor {
        let FieldInit { node_type, node } = init.into();
        let id = self.fresh_id();
        let descriptor = FieldDescriptor {
            id: id.clone(),
            node_type,
        };

        let index = match at {
            InsertAt::Start => 0,
            InsertAt::End => self.fields.len(),
            InsertAt::After(anchor) => match self.index_of(&anchor) {
                Some(index) => index + 1,
                // Anchor gone (rapid remove/add race): append.
                None => self.fields.len(),
            },
        };

        self.fields.insert(index.min(self.fields.len()), descriptor.clone());
        self.states.entry(node_type).or_default().insert(id, node);
        self.touch();

        descriptor
    }

    /// Remove a field and release its content. No-op when the id is
    /// absent.
    pub fn remove_field(&mut self, id: &FieldId) {
        let index = match self.index_of(id) {
            Some(index) => index,
            None => return,
        };

        let descriptor = self.fields.remove(index);
        if let Some(bucket) = self.states.get_mut(&descriptor.node_type) {
            bucket.remove(id);
        }
        self.touch();
    }

    /// Move a field by a signed distance, clamped to the valid range.
    /// No-op when the id is absent.
    pub fn move_field(&mut self, id: &FieldId, distance: isize) {
        let index = match self.index_of(id) {
            Some(index) => index,
            None => return,
        };

        let descriptor = self.fields.remove(index);
        let target = (index as isize + distance).clamp(0, self.fields.len() as isize) as usize;
        self.fields.insert(target, descriptor);
        self.touch();
    }

    /// Snapshot of the current ordering (a copy, not a live reference).
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields.clone()
    }

    /// Descriptor lookup by id (the primitive UI hints like
    /// scroll-to-field build on).
    pub fn find_field(&self, id: &FieldId) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn index_of(&self, id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| &f.id == id)
    }

    // ---- content operations ----

    /// Live content for a field.
    pub fn node(&self, id: &FieldId) -> Option<&Node> {
        let descriptor = self.find_field(id)?;
        self.states.get(&descriptor.node_type)?.get(id)
    }

    /// Replace a field's content. No-op (returning `false`) when the id
    /// is absent or the replacement's type disagrees with the slot.
    pub fn set_node(&mut self, id: &FieldId, node: Node) -> bool {
        let node_type = match self.find_field(id) {
            Some(descriptor) => descriptor.node_type,
            None => return false,
        };
        if node.node_type() != Some(node_type) {
            return false;
        }

        if let Some(bucket) = self.states.get_mut(&node_type) {
            if let Some(slot) = bucket.get_mut(id) {
                *slot = node;
                self.touch();
                return true;
            }
        }
        false
    }

    // ---- metadata ----

    pub fn meta_data(&self) -> &MetaData {
        &self.meta_data
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.meta_data.subject = subject.into();
        self.touch();
    }

    pub fn set_scope(&mut self, scope: impl Into<String>) {
        self.meta_data.scope = scope.into();
        self.touch();
    }
}
