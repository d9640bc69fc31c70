//! # Tribune HTML Compiler
//!
//! Compiles a wire [`Message`](tribune_model::Message) plus a
//! [`Theme`](tribune_theme::Theme) into self-contained transport HTML.
//! All styling is inline: the output targets untrusted email-rendering
//! contexts with no external stylesheet support.

mod compiler;


pub use compiler::{compile_to_html, compile_to_html_with_options, CompileError, CompileOptions};
