use std::fmt::Write as _;
use thiserror::Error;
use tribune_model::{
    AttachmentContent, ButtonContent, EdgePosition, ImageContent, Message, Node, NodeBody,
    RichNode, SenderInfo,
};
use tribune_theme::{resolve, ResolvedStyle, Style, Theme};

/// Errors that can occur during HTML compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Compilation error: {0}")]
    Generic(String),
}

impl From<String> for CompileError {
    fn from(s: String) -> Self {
        CompileError::Generic(s)
    }
}

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        let indent = self.options.indent.clone();
        for _ in 0..self.depth {
            self.add(&indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a publication to transport HTML with default options.
pub fn compile_to_html(
    theme: &Theme,
    message: &Message,
    sender: Option<&SenderInfo>,
) -> Result<String, CompileError> {
    compile_to_html_with_options(theme, message, sender, CompileOptions::default())
}

/// Compile a publication to transport HTML.
///
/// Blocks are emitted in `content` order; each gets its edge position
/// from its index and its style triple from the theme resolver. Unknown
/// block types compile to nothing.
pub fn compile_to_html_with_options(
    theme: &Theme,
    message: &Message,
    sender: Option<&SenderInfo>,
    options: CompileOptions,
) -> Result<String, CompileError> {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    compile_head(message, &mut ctx);

    ctx.add_line(&open_tag("body", &theme.global.wrapper));
    ctx.indent();
    ctx.add_line(&open_tag("div", &theme.global.container));
    ctx.indent();

    compile_header(message, sender, &mut ctx);

    let len = message.content.len();
    for (index, node) in message.content.iter().enumerate() {
        let edge = EdgePosition::of(index, len);
        let resolved = resolve(theme, node, edge);
        compile_block(node, &resolved, &mut ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</div>");
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    Ok(ctx.get_output())
}

fn compile_head(message: &Message, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!(
        "<title>{}</title>",
        escape_html(&message.meta_data.subject)
    ));

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_header(message: &Message, sender: Option<&SenderInfo>, ctx: &mut Context) {
    ctx.add_line("<div class=\"header\">");
    ctx.indent();

    if !message.meta_data.subject.is_empty() {
        ctx.add_line(&format!(
            "<h1>{}</h1>",
            escape_html(&message.meta_data.subject)
        ));
    }

    if let Some(sender) = sender {
        ctx.add_line(&format!(
            "<p class=\"sender\">{} &lt;{}&gt;</p>",
            escape_html(&sender.name),
            escape_html(&sender.email)
        ));
        if let Some(count) = sender.recipient_count {
            ctx.add_line(&format!("<p class=\"recipients\">{} destinataires</p>", count));
        }
    }

    ctx.dedent();
    ctx.add_line("</div>");
}

/// One block: an edge-positioned wrapper, a type/mark container, and the
/// type-specific fragment inside.
fn compile_block(node: &Node, style: &ResolvedStyle, ctx: &mut Context) -> Result<(), CompileError> {
    // Foreign block types are skipped, not errors.
    if matches!(node.body, NodeBody::Unknown) {
        return Ok(());
    }

    ctx.add_line(&open_tag("div", &style.wrapper));
    ctx.indent();
    ctx.add_line(&open_tag("div", &style.container));
    ctx.indent();

    match &node.body {
        NodeBody::Richtext(Some(content)) => compile_richtext(content, &style.base, ctx),
        NodeBody::Image(Some(content)) => compile_image(content, &style.base, ctx),
        NodeBody::Button(Some(content)) => compile_button(content, &style.base, ctx),
        NodeBody::Attachment(Some(content)) => compile_attachment(content, &style.base, ctx),
        // An empty block still occupies its slot.
        _ => ctx.add_line("<!-- empty block -->"),
    }

    ctx.dedent();
    ctx.add_line("</div>");
    ctx.dedent();
    ctx.add_line("</div>");

    Ok(())
}

fn compile_richtext(root: &RichNode, base: &Style, ctx: &mut Context) {
    match root.kind.as_str() {
        "doc" => {
            for child in root.content.as_deref().unwrap_or_default() {
                compile_richtext(child, base, ctx);
            }
        }
        "paragraph" => {
            if ctx.options.pretty {
                ctx.add_indent();
            }
            ctx.add(&open_tag("p", base));
            for child in root.content.as_deref().unwrap_or_default() {
                compile_inline(child, ctx);
            }
            ctx.add("</p>");
            if ctx.options.pretty {
                ctx.add("\n");
            }
        }
        "heading" => {
            if ctx.options.pretty {
                ctx.add_indent();
            }
            ctx.add(&open_tag("h2", base));
            for child in root.content.as_deref().unwrap_or_default() {
                compile_inline(child, ctx);
            }
            ctx.add("</h2>");
            if ctx.options.pretty {
                ctx.add("\n");
            }
        }
        // Bare text at the root, or a container kind we do not know:
        // render its text/children without structure.
        _ => {
            if root.is_text() {
                if ctx.options.pretty {
                    ctx.add_indent();
                }
                ctx.add(&open_tag("p", base));
                compile_inline(root, ctx);
                ctx.add("</p>");
                if ctx.options.pretty {
                    ctx.add("\n");
                }
            } else {
                for child in root.content.as_deref().unwrap_or_default() {
                    compile_richtext(child, base, ctx);
                }
            }
        }
    }
}

/// Inline text run: escape, then wrap in tags for each known mark.
/// Variable spans render their visible label; token substitution happens
/// server-side.
fn compile_inline(node: &RichNode, ctx: &mut Context) {
    let text = match &node.text {
        Some(text) => escape_html(text),
        None => return,
    };

    let mut open = String::new();
    let mut close = String::new();
    for mark in node.marks.as_deref().unwrap_or_default() {
        match mark.kind.as_str() {
            "bold" => {
                open.push_str("<strong>");
                close.insert_str(0, "</strong>");
            }
            "italic" => {
                open.push_str("<em>");
                close.insert_str(0, "</em>");
            }
            "link" => {
                let href = mark
                    .attrs
                    .as_ref()
                    .and_then(|attrs| attrs.href.as_deref())
                    .unwrap_or("#");
                let _ = write!(open, "<a href=\"{}\">", escape_html(href));
                close.insert_str(0, "</a>");
            }
            _ => {}
        }
    }

    ctx.add(&open);
    ctx.add(&text);
    ctx.add(&close);
}

fn compile_image(content: &ImageContent, base: &Style, ctx: &mut Context) {
    let mut tag = format!("<img src=\"{}\"", escape_html(&content.url));
    if let Some(width) = content.width {
        let _ = write!(tag, " width=\"{}\"", width);
    }
    if let Some(height) = content.height {
        let _ = write!(tag, " height=\"{}\"", height);
    }
    if let Some(style) = style_attr(base) {
        let _ = write!(tag, " {}", style);
    }
    tag.push_str(" />");
    ctx.add_line(&tag);
}

fn compile_button(content: &ButtonContent, base: &Style, ctx: &mut Context) {
    let mut tag = format!("<a href=\"{}\"", escape_html(&content.link));
    if let Some(style) = style_attr(base) {
        let _ = write!(tag, " {}", style);
    }
    let _ = write!(tag, ">{}</a>", escape_html(&content.text));
    ctx.add_line(&tag);
}

fn compile_attachment(content: &AttachmentContent, base: &Style, ctx: &mut Context) {
    let mut tag = format!("<a href=\"{}\" download", escape_html(&content.url));
    if let Some(style) = style_attr(base) {
        let _ = write!(tag, " {}", style);
    }
    let _ = write!(tag, ">{}", escape_html(&content.name));
    if let Some(size) = content.size {
        let _ = write!(tag, " ({})", format_size(size));
    }
    tag.push_str("</a>");
    ctx.add_line(&tag);
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1} Mo", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.0} Ko", bytes as f64 / 1_000.0)
    } else {
        format!("{} o", bytes)
    }
}

/// Opening tag with an optional inline style attribute.
fn open_tag(name: &str, style: &Style) -> String {
    match style_attr(style) {
        Some(attr) => format!("<{} {}>", name, attr),
        None => format!("<{}>", name),
    }
}

/// `style="…"` serialized from a resolved style map; `None` when empty.
/// Map iteration is ordered, so output is deterministic.
fn style_attr(style: &Style) -> Option<String> {
    if style.is_empty() {
        return None;
    }
    let body: String = style
        .iter()
        .map(|(key, value)| format!("{}: {};", key, value))
        .collect::<Vec<_>>()
        .join(" ");
    Some(format!("style=\"{}\"", body))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
