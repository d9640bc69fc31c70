//! # Tribune Theme
//!
//! Visual theme tables for publication blocks and the pure cascade
//! resolver mapping `(theme, node, edge position)` to a concrete style
//! triple `{container, base, wrapper}`.
//!
//! Resolution never mutates the theme; it is a pure read so the same
//! inputs always produce the same styles.

mod resolver;
mod tables;

pub use resolver::{resolve, ResolvedStyle};
pub use tables::{GlobalTheme, ItemTheme, NodeTheme, Style, StyleBuckets, Theme};
