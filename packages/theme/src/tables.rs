//! Theme data tables.
//!
//! A theme is a nested style table: a top-level `global` bucket shared by
//! every block (with per-edge-position item wrappers), plus one
//! [`NodeTheme`] per block type keyed by mark name or `global`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tribune_model::{EdgePosition, NodeType};

/// A flat set of CSS properties. `BTreeMap` keeps iteration order
/// deterministic so serialized inline styles are stable.
pub type Style = BTreeMap<String, String>;

/// Shallow-merge `overlay` on top of `base`; later keys win on conflict.
pub(crate) fn merge(base: &Style, overlay: &Style) -> Style {
    let mut out = base.clone();
    for (key, value) in overlay {
        out.insert(key.clone(), value.clone());
    }
    out
}

/// The three style slots resolved for every block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleBuckets {
    #[serde(default)]
    pub container: Style,
    #[serde(default)]
    pub base: Style,
    #[serde(default)]
    pub wrapper: Style,
}

/// Per-edge-position wrapper overrides for the generic item frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemTheme {
    #[serde(default)]
    pub wrapper: Style,
    #[serde(default)]
    pub leading: Style,
    #[serde(default)]
    pub middle: Style,
    #[serde(default)]
    pub trailing: Style,
    #[serde(default)]
    pub alone: Style,
}

impl ItemTheme {
    pub fn for_edge(&self, edge: EdgePosition) -> &Style {
        match edge {
            EdgePosition::Leading => &self.leading,
            EdgePosition::Middle => &self.middle,
            EdgePosition::Trailing => &self.trailing,
            EdgePosition::Alone => &self.alone,
        }
    }
}

/// Styles shared by every block plus the outer document frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalTheme {
    #[serde(default)]
    pub container: Style,
    #[serde(default)]
    pub wrapper: Style,
    #[serde(default)]
    pub item: ItemTheme,
}

/// Theme table for one block type: a `global` bucket plus per-mark
/// overrides folded on top in the node's mark order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeTheme {
    #[serde(default)]
    pub global: StyleBuckets,
    #[serde(default)]
    pub marks: BTreeMap<String, StyleBuckets>,
}

/// A complete visual theme.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub global: GlobalTheme,
    #[serde(default)]
    pub nodes: BTreeMap<NodeType, NodeTheme>,
    /// The theme's default accent color. Button-level color overrides only
    /// replace resolved properties that still equal this value.
    #[serde(default)]
    pub accent_color: String,
}

impl Theme {
    pub fn node_theme(&self, node_type: NodeType) -> Option<&NodeTheme> {
        self.nodes.get(&node_type)
    }
}

/// Convenience constructor for style literals in themes and tests.
pub(crate) fn style(pairs: &[(&str, &str)]) -> Style {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Theme {
    /// A small but realistic default theme, used by tests and as the
    /// fallback when the host application supplies none.
    pub fn standard() -> Self {
        let accent = "#e63322";

        let mut nodes = BTreeMap::new();
        nodes.insert(
            NodeType::Richtext,
            NodeTheme {
                global: StyleBuckets {
                    base: style(&[
                        ("color", "#1a1a1a"),
                        ("font-size", "16px"),
                        ("line-height", "1.5"),
                    ]),
                    ..Default::default()
                },
                marks: BTreeMap::new(),
            },
        );
        nodes.insert(
            NodeType::Image,
            NodeTheme {
                global: StyleBuckets {
                    base: style(&[("max-width", "100%"), ("border-radius", "4px")]),
                    ..Default::default()
                },
                marks: BTreeMap::new(),
            },
        );

        let mut button_marks = BTreeMap::new();
        button_marks.insert(
            "primary".to_string(),
            StyleBuckets {
                container: style(&[("background-color", accent), ("border-radius", "6px")]),
                base: style(&[("color", "#ffffff"), ("font-weight", "600")]),
                ..Default::default()
            },
        );
        button_marks.insert(
            "secondary".to_string(),
            StyleBuckets {
                container: style(&[
                    ("background-color", "transparent"),
                    ("border-color", accent),
                    ("border-style", "solid"),
                    ("border-width", "1px"),
                ]),
                base: style(&[("color", accent)]),
                ..Default::default()
            },
        );
        nodes.insert(
            NodeType::Button,
            NodeTheme {
                global: StyleBuckets {
                    container: style(&[("padding", "12px 24px"), ("text-align", "center")]),
                    base: style(&[("text-decoration", "none"), ("font-size", "15px")]),
                    ..Default::default()
                },
                marks: button_marks,
            },
        );
        nodes.insert(
            NodeType::Attachment,
            NodeTheme {
                global: StyleBuckets {
                    container: style(&[
                        ("border-color", "#dddddd"),
                        ("border-style", "solid"),
                        ("border-width", "1px"),
                        ("border-radius", "4px"),
                        ("padding", "8px 12px"),
                    ]),
                    base: style(&[("color", "#1a1a1a")]),
                    ..Default::default()
                },
                marks: BTreeMap::new(),
            },
        );

        Self {
            global: GlobalTheme {
                container: style(&[
                    ("background-color", "#ffffff"),
                    ("max-width", "600px"),
                    ("margin", "0 auto"),
                ]),
                wrapper: style(&[("font-family", "Helvetica, Arial, sans-serif")]),
                item: ItemTheme {
                    wrapper: style(&[("padding", "0 24px")]),
                    leading: style(&[("padding-top", "24px")]),
                    middle: Style::new(),
                    trailing: style(&[("padding-bottom", "24px")]),
                    alone: style(&[("padding-top", "24px"), ("padding-bottom", "24px")]),
                },
            },
            nodes,
            accent_color: accent.to_string(),
        }
    }
}
