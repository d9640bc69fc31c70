//! Bidirectional token ↔ styled-span transcoding.

use crate::catalog::VariableCatalog;
use regex::Regex;
use tribune_model::{RichNode, TextMark};

/// Literal token pattern: `{{` then anything but `}` then `}}`.
const TOKEN_PATTERN: &str = r"\{\{[^}]+\}\}";

fn token_matcher() -> Regex {
    // Fresh matcher per call so no iteration state leaks between texts.
    Regex::new(TOKEN_PATTERN).unwrap()
}

/// Convert a storage tree to editor form: every `variable`-marked text run
/// is replaced by its raw token and the mark is dropped; all other marks
/// and nodes pass through unchanged.
pub fn storage_to_editor(node: RichNode) -> RichNode {
    let RichNode {
        kind,
        text,
        marks,
        content,
    } = node;

    if let Some(children) = content {
        return RichNode {
            kind,
            text,
            marks,
            content: Some(children.into_iter().map(storage_to_editor).collect()),
        };
    }

    let code = marks.as_deref().and_then(|marks| {
        marks
            .iter()
            .find(|m| m.is_variable())
            .and_then(|m| m.attrs.as_ref())
            .and_then(|attrs| attrs.code.clone())
    });
    let had_variable = marks
        .as_deref()
        .map(|marks| marks.iter().any(TextMark::is_variable))
        .unwrap_or(false);

    if !had_variable {
        return RichNode {
            kind,
            text,
            marks,
            content: None,
        };
    }

    let remaining: Vec<TextMark> = marks
        .unwrap_or_default()
        .into_iter()
        .filter(|m| !m.is_variable())
        .collect();
    let marks = if remaining.is_empty() {
        None
    } else {
        Some(remaining)
    };

    // Known token: the raw token becomes the visible text. A mark without
    // a code is just dropped and the text kept as-is.
    let text = match code {
        Some(code) if !code.is_empty() => Some(code),
        _ => text,
    };

    RichNode {
        kind,
        text,
        marks,
        content: None,
    }
}

/// Convert an editor tree to storage form: every `{{Token}}` occurrence in
/// a text run becomes its own text node carrying a `variable` mark, with
/// the catalog label (or the trimmed token content) as visible text.
///
/// A root-level text node that splits into several pieces is wrapped in a
/// synthetic `doc` container so the return value stays a single tree.
pub fn editor_to_storage(node: RichNode, catalog: &VariableCatalog) -> RichNode {
    if node.content.is_some() {
        return transcode_container(node, catalog);
    }

    if node.is_text() {
        let mut pieces = split_text_node(node, catalog);
        if pieces.len() == 1 {
            return pieces.remove(0);
        }
        return RichNode::doc(pieces);
    }

    node
}

fn transcode_container(node: RichNode, catalog: &VariableCatalog) -> RichNode {
    let RichNode {
        kind,
        text,
        marks,
        content,
    } = node;
    let children = content.unwrap_or_default();
    let mut out = Vec::with_capacity(children.len());

    for child in children {
        if child.is_text() && child.content.is_none() {
            // One text child may expand into several; splice in place.
            out.extend(split_text_node(child, catalog));
        } else {
            out.push(editor_to_storage(child, catalog));
        }
    }

    RichNode {
        kind,
        text,
        marks,
        content: Some(out),
    }
}

/// Split a text node on token occurrences.
///
/// Literal runs keep the original marks; token runs get the original marks
/// plus a `variable` mark with `attrs.code` set to the token. No `value`
/// attribute is written; resolution happens server-side.
fn split_text_node(node: RichNode, catalog: &VariableCatalog) -> Vec<RichNode> {
    let text = match &node.text {
        Some(text) => text.clone(),
        None => return vec![node],
    };

    let matcher = token_matcher();
    let matches: Vec<(usize, usize)> = matcher
        .find_iter(&text)
        .map(|m| (m.start(), m.end()))
        .collect();
    if matches.is_empty() {
        return vec![node];
    }

    let base_marks = node.marks.clone().unwrap_or_default();
    let mut pieces = Vec::with_capacity(matches.len() * 2 + 1);
    let mut cursor = 0;

    for (start, end) in matches {
        if start > cursor {
            pieces.push(literal_piece(&node, &text[cursor..start]));
        }

        let token = &text[start..end];
        let mut marks = base_marks.clone();
        marks.push(TextMark::variable(token));
        pieces.push(RichNode {
            text: Some(catalog.label_for(token)),
            marks: Some(marks),
            ..node.clone()
        });

        cursor = end;
    }

    if cursor < text.len() {
        pieces.push(literal_piece(&node, &text[cursor..]));
    }

    pieces
}

fn literal_piece(original: &RichNode, text: &str) -> RichNode {
    RichNode {
        text: Some(text.to_string()),
        ..original.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Variable;
    use tribune_model::MarkAttrs;

    fn catalog() -> VariableCatalog {
        VariableCatalog::new(vec![
            Variable {
                code: "{{Prénom}}".to_string(),
                label: "Jean".to_string(),
                description: None,
            },
            Variable {
                code: "{{Nom}}".to_string(),
                label: "Dupont".to_string(),
                description: None,
            },
        ])
    }

    /// Concatenated visible text of a tree, for round-trip checks.
    fn flat_text(node: &RichNode) -> String {
        let mut out = String::new();
        if let Some(text) = &node.text {
            out.push_str(text);
        }
        if let Some(children) = &node.content {
            for child in children {
                out.push_str(&flat_text(child));
            }
        }
        out
    }

    #[test]
    fn test_storage_to_editor_replaces_label_with_token() {
        let stored = RichNode::text("Jean").with_marks(vec![TextMark::variable("{{Prénom}}")]);
        let edited = storage_to_editor(stored);

        assert_eq!(edited.text.as_deref(), Some("{{Prénom}}"));
        assert_eq!(edited.marks, None);
    }

    #[test]
    fn test_storage_to_editor_keeps_other_marks() {
        let stored = RichNode::text("Jean").with_marks(vec![
            TextMark::new("bold"),
            TextMark::variable("{{Prénom}}"),
        ]);
        let edited = storage_to_editor(stored);

        assert_eq!(edited.text.as_deref(), Some("{{Prénom}}"));
        assert_eq!(edited.marks, Some(vec![TextMark::new("bold")]));
    }

    #[test]
    fn test_storage_to_editor_mark_without_code_is_dropped() {
        let stored = RichNode::text("Jean").with_marks(vec![TextMark {
            kind: "variable".to_string(),
            attrs: Some(MarkAttrs::default()),
        }]);
        let edited = storage_to_editor(stored);

        assert_eq!(edited.text.as_deref(), Some("Jean"));
        assert_eq!(edited.marks, None);
    }

    #[test]
    fn test_editor_to_storage_splits_around_tokens() {
        let doc = RichNode::paragraph(vec![RichNode::text("Bonjour {{Prénom}}, bienvenue")]);
        let stored = editor_to_storage(doc, &catalog());

        let children = stored.content.unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].text.as_deref(), Some("Bonjour "));
        assert_eq!(children[1].text.as_deref(), Some("Jean"));
        assert_eq!(
            children[1].marks.as_ref().unwrap()[0],
            TextMark::variable("{{Prénom}}")
        );
        assert_eq!(children[2].text.as_deref(), Some(", bienvenue"));
    }

    #[test]
    fn test_editor_to_storage_unknown_token_uses_fallback_label() {
        let doc = RichNode::paragraph(vec![RichNode::text("Bonjour {{Prénom}}, bienvenue")]);
        let stored = editor_to_storage(doc, &VariableCatalog::default());

        let children = stored.content.unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].text.as_deref(), Some("Bonjour "));
        assert_eq!(children[1].text.as_deref(), Some("Prénom"));
        assert!(children[1].marks.as_ref().unwrap()[0].is_variable());
        assert_eq!(children[2].text.as_deref(), Some(", bienvenue"));
    }

    #[test]
    fn test_literal_runs_keep_original_marks() {
        let doc = RichNode::paragraph(vec![
            RichNode::text("Salut {{Nom}}!").with_marks(vec![TextMark::new("italic")])
        ]);
        let stored = editor_to_storage(doc, &catalog());

        let children = stored.content.unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].marks, Some(vec![TextMark::new("italic")]));
        // The token run carries the original marks plus the variable mark.
        let token_marks = children[1].marks.as_ref().unwrap();
        assert_eq!(token_marks.len(), 2);
        assert_eq!(token_marks[0], TextMark::new("italic"));
        assert!(token_marks[1].is_variable());
        assert_eq!(children[2].marks, Some(vec![TextMark::new("italic")]));
    }

    #[test]
    fn test_text_without_tokens_passes_through() {
        let doc = RichNode::paragraph(vec![RichNode::text("Bonjour tout le monde")]);
        let stored = editor_to_storage(doc.clone(), &catalog());
        assert_eq!(stored, doc);
    }

    #[test]
    fn test_root_level_text_split_wraps_in_doc() {
        let stored = editor_to_storage(RichNode::text("Hi {{Prénom}}"), &catalog());
        assert_eq!(stored.kind, "doc");
        assert_eq!(stored.content.as_ref().unwrap().len(), 2);

        let single = editor_to_storage(RichNode::text("plain"), &catalog());
        assert_eq!(single, RichNode::text("plain"));
    }

    #[test]
    fn test_adjacent_tokens_without_separator() {
        let doc = RichNode::paragraph(vec![RichNode::text("{{Prénom}}{{Nom}}")]);
        let stored = editor_to_storage(doc, &catalog());

        let children = stored.content.unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].text.as_deref(), Some("Jean"));
        assert_eq!(children[1].text.as_deref(), Some("Dupont"));
    }

    #[test]
    fn test_round_trip_editor_storage_editor() {
        let texts = [
            "plain text, no tokens",
            "Bonjour {{Prénom}}, bienvenue",
            "{{Prénom}} {{Nom}} / {{Inconnu}}",
            "trailing token {{Nom}}",
            "{{Prénom}} leading token",
        ];

        for text in texts {
            let doc = RichNode::paragraph(vec![RichNode::text(text)]);
            let stored = editor_to_storage(doc.clone(), &catalog());
            let back = storage_to_editor(stored);
            assert_eq!(flat_text(&back), text, "round trip failed for {text:?}");
        }
    }

    #[test]
    fn test_round_trip_storage_editor_storage() {
        let stored = RichNode::paragraph(vec![
            RichNode::text("Bonjour "),
            RichNode::text("Jean").with_marks(vec![TextMark::variable("{{Prénom}}")]),
            RichNode::text(", bienvenue"),
        ]);

        let edited = storage_to_editor(stored.clone());
        let back = editor_to_storage(edited, &catalog());
        assert_eq!(back, stored);
    }

    #[test]
    fn test_nested_containers_recurse() {
        let doc = RichNode::doc(vec![
            RichNode::paragraph(vec![RichNode::text("Chère {{Prénom}},")]),
            RichNode::paragraph(vec![RichNode::text("À bientôt")]),
        ]);
        let stored = editor_to_storage(doc, &catalog());

        let paragraphs = stored.content.unwrap();
        assert_eq!(paragraphs[0].content.as_ref().unwrap().len(), 2);
        assert_eq!(paragraphs[1].content.as_ref().unwrap().len(), 1);
    }
}
