//! Style cascade resolution.

use crate::tables::{merge, NodeTheme, Style, StyleBuckets, Theme};
use tribune_model::{EdgePosition, Node, NodeBody};

/// Concrete styles resolved for one block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedStyle {
    pub container: Style,
    pub base: Style,
    pub wrapper: Style,
}

/// Resolve the style triple for `node` at `edge`.
///
/// Cascade, in order:
/// 1. wrapper baseline = generic item wrapper merged with the
///    edge-specific wrapper override;
/// 2. no theme table for the node's type → empty container/base;
/// 3. no marks → the type's `global` buckets;
/// 4. marks → per bucket, fold the mark overrides on top of `global` in
///    the node's mark order (later mark wins);
/// 5. an explicit button color replaces resolved accent-colored
///    properties, and only those.
pub fn resolve(theme: &Theme, node: &Node, edge: EdgePosition) -> ResolvedStyle {
    let wrapper_baseline = merge(&theme.global.item.wrapper, theme.global.item.for_edge(edge));

    let node_theme = match node.node_type().and_then(|t| theme.node_theme(t)) {
        Some(node_theme) => node_theme,
        None => {
            return ResolvedStyle {
                container: Style::new(),
                base: Style::new(),
                wrapper: wrapper_baseline,
            }
        }
    };

    let buckets = if node.marks.is_empty() {
        node_theme.global.clone()
    } else {
        fold_marks(node_theme, &node.marks)
    };

    let mut resolved = ResolvedStyle {
        container: buckets.container,
        base: buckets.base,
        // The type-specific wrapper still wins over the generic edge wrapper.
        wrapper: merge(&wrapper_baseline, &buckets.wrapper),
    };

    apply_button_color(&mut resolved, theme, node);

    resolved
}

/// Fold mark overrides on top of the type's `global` buckets, each bucket
/// independently, in the node's mark order.
fn fold_marks(node_theme: &NodeTheme, marks: &[String]) -> StyleBuckets {
    let mut out = node_theme.global.clone();
    for mark in marks {
        if let Some(overrides) = node_theme.marks.get(mark) {
            out.container = merge(&out.container, &overrides.container);
            out.base = merge(&out.base, &overrides.base);
            out.wrapper = merge(&out.wrapper, &overrides.wrapper);
        }
    }
    out
}

/// Property-level accent replacement for buttons carrying a custom color.
///
/// Only properties that currently equal the theme's accent color are
/// touched, so unrelated theme properties (radius, padding) survive.
fn apply_button_color(resolved: &mut ResolvedStyle, theme: &Theme, node: &Node) {
    let custom = match &node.body {
        NodeBody::Button(Some(content)) => match &content.color {
            Some(color) => color,
            None => return,
        },
        _ => return,
    };

    for key in ["background-color", "border-color"] {
        if resolved.container.get(key) == Some(&theme.accent_color) {
            resolved.container.insert(key.to_string(), custom.clone());
        }
    }
    if resolved.base.get("color") == Some(&theme.accent_color) {
        resolved.base.insert("color".to_string(), custom.clone());
    }
}
