//! Markdown token model
//!
//! The transducer emits a flat stream of [`Token`]s. Each one is either a
//! Markdown-intent token (a [`Tag`] plus its rendered `data`), a native block
//! boundary that wraps the raw `<pre>`/`<script>` tag, or a raw HTML token
//! passed through untouched.
//!
//! Context that the postprocessor needs travels on every token: the blockquote
//! depth active when the token was produced, and whether the token sits inside
//! a block-level code region.

use crate::html_token::{HtmlToken, HtmlTokenKind};

/// Semantic discriminant of a Markdown-intent token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    AnchorInline,
    /// A `[n]: href` definition line in the trailing reference block
    AnchorReference,
    AnchorSimple,
    BoldItalic,
    CharactersAdded,
    CharactersSplit,
    Emphasis,
    EndBlock,
    EndBlockquote,
    EndCode,
    EndNativeBlock,
    HeadingStart,
    HorizontalRule,
    Image,
    ListItemStart,
    Newline,
    /// `\n\n`
    NewlineBlank,
    NewlineHard,
    Space,
    StartBlock,
    StartBlockquote,
    StartCode,
    StartNativeBlock,
    Strong,
    Tab,
}

/// How the serializer treats a token's data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// Markdown syntax, rendered verbatim
    Literal,
    /// User text, escaped like HTML character data
    Text,
    /// Spacing or structural marker
    Space,
}

impl Tag {
    pub fn render_kind(self) -> RenderKind {
        match self {
            Tag::CharactersSplit => RenderKind::Text,
            Tag::Space
            | Tag::Tab
            | Tag::Newline
            | Tag::NewlineHard
            | Tag::NewlineBlank
            | Tag::StartBlock
            | Tag::EndBlock
            | Tag::StartBlockquote
            | Tag::EndBlockquote => RenderKind::Space,
            _ => RenderKind::Literal,
        }
    }

    /// Space, tab and every newline variant
    pub fn is_whitespace(self) -> bool {
        matches!(self, Tag::Space | Tag::Tab) || self.is_newline()
    }

    pub fn is_newline(self) -> bool {
        matches!(self, Tag::Newline | Tag::NewlineHard | Tag::NewlineBlank)
    }

    pub fn is_single_newline(self) -> bool {
        matches!(self, Tag::Newline | Tag::NewlineHard)
    }

    pub fn is_block_start(self) -> bool {
        matches!(self, Tag::StartBlock | Tag::StartBlockquote)
    }

    pub fn is_block_end(self) -> bool {
        matches!(self, Tag::EndBlock | Tag::EndBlockquote)
    }

    /// Tokens that carry their own leading newline
    pub fn opens_newlined_text(self) -> bool {
        matches!(
            self,
            Tag::HorizontalRule | Tag::HeadingStart | Tag::ListItemStart
        )
    }

    /// Tokens that already end their line
    pub fn closes_newlined_text(self) -> bool {
        self == Tag::HorizontalRule
    }
}

/// Which edge of a native block a boundary token marks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// Bullet of a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bullet {
    Char(char),
    Ordinal(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Markdown { tag: Tag, data: String },
    /// Raw `<pre>`/`<script>` tag marking a native block edge
    Native { edge: Edge, raw: HtmlToken },
    Html(HtmlToken),
}

/// A token of the Markdown stream
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub node: TokenNode,
    pub blockquote_depth: Option<usize>,
    pub code_blocked: bool,
}

impl Token {
    fn new(node: TokenNode) -> Self {
        Self {
            node,
            blockquote_depth: None,
            code_blocked: false,
        }
    }

    pub fn markdown(tag: Tag, data: impl Into<String>) -> Self {
        Self::new(TokenNode::Markdown {
            tag,
            data: data.into(),
        })
    }

    pub fn html(raw: HtmlToken) -> Self {
        Self::new(TokenNode::Html(raw))
    }

    pub fn native(edge: Edge, raw: HtmlToken) -> Self {
        Self::new(TokenNode::Native { edge, raw })
    }

    pub fn emphasis(ch: char) -> Self {
        Self::markdown(Tag::Emphasis, ch.to_string())
    }

    pub fn strong(ch: char) -> Self {
        Self::markdown(Tag::Strong, ch.to_string().repeat(2))
    }

    pub fn bold_italic(ch: char) -> Self {
        Self::markdown(Tag::BoldItalic, ch.to_string().repeat(3))
    }

    pub fn start_block() -> Self {
        Self::markdown(Tag::StartBlock, "")
    }

    pub fn end_block() -> Self {
        Self::markdown(Tag::EndBlock, "")
    }

    pub fn start_blockquote() -> Self {
        Self::markdown(Tag::StartBlockquote, "")
    }

    pub fn end_blockquote() -> Self {
        Self::markdown(Tag::EndBlockquote, "")
    }

    pub fn start_code() -> Self {
        Self::markdown(Tag::StartCode, "")
    }

    pub fn end_code() -> Self {
        Self::markdown(Tag::EndCode, "")
    }

    pub fn heading_start(level: usize) -> Self {
        Self::markdown(Tag::HeadingStart, format!("\n{} ", "#".repeat(level)))
    }

    pub fn horizontal_rule(rule: &str) -> Self {
        Self::markdown(Tag::HorizontalRule, rule)
    }

    pub fn list_item_start(depth: usize, bullet: Bullet) -> Self {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let bullet = match bullet {
            Bullet::Char(ch) => ch.to_string(),
            Bullet::Ordinal(n) => format!("{n}."),
        };
        Self::markdown(Tag::ListItemStart, format!("\n{indent}{bullet} "))
    }

    pub fn newline() -> Self {
        Self::markdown(Tag::Newline, "\n")
    }

    pub fn newline_hard() -> Self {
        Self::markdown(Tag::NewlineHard, "  \n")
    }

    pub fn newline_blank() -> Self {
        Self::markdown(Tag::NewlineBlank, "\n\n")
    }

    /// `Newline` for one, `NewlineBlank` for two or more
    pub fn newlines(count: usize) -> Self {
        if count >= 2 {
            Self::newline_blank()
        } else {
            Self::newline()
        }
    }

    pub fn space() -> Self {
        Self::markdown(Tag::Space, " ")
    }

    pub fn characters_split(text: &str) -> Self {
        Self::markdown(Tag::CharactersSplit, text)
    }

    pub fn characters_added(text: &str) -> Self {
        Self::markdown(Tag::CharactersAdded, text)
    }

    /// `[text](href "title")`
    pub fn anchor_inline(href: &str, text: &str, title: Option<&str>) -> Self {
        Self::markdown(
            Tag::AnchorInline,
            format!("[{text}]({href}{})", title_suffix(title)),
        )
    }

    /// `[text][n]`
    pub fn anchor_reference_link(text: &str, reference: usize) -> Self {
        Self::markdown(Tag::AnchorInline, format!("[{text}][{reference}]"))
    }

    /// `[n]: href "title"` line of the reference block
    pub fn anchor_reference(reference: usize, href: &str, title: Option<&str>) -> Self {
        Self::markdown(
            Tag::AnchorReference,
            format!("[{reference}]: {href}{}", title_suffix(title)),
        )
    }

    /// `<href>`
    pub fn anchor_simple(href: &str) -> Self {
        Self::markdown(Tag::AnchorSimple, format!("<{href}>"))
    }

    /// `![alt](src "title")` or `![alt][n]`
    pub fn image(src: &str, alt: Option<&str>, title: Option<&str>, reference: Option<usize>) -> Self {
        let alt = alt.filter(|alt| !alt.is_empty()).unwrap_or("Image");
        let data = match reference {
            Some(n) => format!("![{alt}][{n}]"),
            None => format!("![{alt}]({src}{})", title_suffix(title)),
        };
        Self::markdown(Tag::Image, data)
    }

    /// Stamp a blockquote depth; an existing depth is never overwritten
    pub fn within(mut self, depth: Option<usize>) -> Self {
        if self.blockquote_depth.is_none() {
            self.blockquote_depth = depth.filter(|d| *d > 0);
        }
        self
    }

    pub fn in_code_block(mut self) -> Self {
        self.code_blocked = true;
        self
    }

    /// Semantic tag; `None` for raw HTML
    pub fn tag(&self) -> Option<Tag> {
        match &self.node {
            TokenNode::Markdown { tag, .. } => Some(*tag),
            TokenNode::Native { edge: Edge::Start, .. } => Some(Tag::StartNativeBlock),
            TokenNode::Native { edge: Edge::End, .. } => Some(Tag::EndNativeBlock),
            TokenNode::Html(_) => None,
        }
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tag() == Some(tag)
    }

    /// Raw HTML payload, if any
    pub fn raw(&self) -> Option<&HtmlToken> {
        match &self.node {
            TokenNode::Native { raw, .. } | TokenNode::Html(raw) => Some(raw),
            TokenNode::Markdown { .. } => None,
        }
    }

    /// Tag name of a native block boundary
    pub fn native_name(&self) -> Option<&str> {
        match &self.node {
            TokenNode::Native { raw, .. } => raw.name(),
            _ => None,
        }
    }

    /// String payload: Markdown data or raw character data
    pub fn text(&self) -> Option<&str> {
        match &self.node {
            TokenNode::Markdown { data, .. } => Some(data),
            TokenNode::Html(raw) if !raw.is_tag() => raw.text.as_deref(),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut String> {
        match &mut self.node {
            TokenNode::Markdown { data, .. } => Some(data),
            TokenNode::Html(raw) if !raw.is_tag() => raw.text.as_mut(),
            _ => None,
        }
    }

    /// Space/tab marker, or raw whitespace made only of spaces and tabs
    pub fn is_pure_space(&self) -> bool {
        match &self.node {
            TokenNode::Markdown { tag, .. } => matches!(tag, Tag::Space | Tag::Tab),
            TokenNode::Html(raw) => {
                raw.kind == HtmlTokenKind::SpaceCharacters
                    && raw.text().chars().all(|c| c == ' ' || c == '\t')
            }
            TokenNode::Native { .. } => false,
        }
    }

    /// Raw whitespace token made only of newlines (`\n` or `\n\n`)
    pub fn is_raw_newline_run(&self) -> bool {
        match &self.node {
            TokenNode::Html(raw) => {
                raw.kind == HtmlTokenKind::SpaceCharacters
                    && matches!(raw.text(), "\n" | "\n\n")
            }
            _ => false,
        }
    }

    /// True when the token renders as spacing rather than text
    pub fn is_spacing(&self) -> bool {
        match &self.node {
            TokenNode::Markdown { tag, data } => {
                tag.render_kind() == RenderKind::Space && data.trim().is_empty()
            }
            TokenNode::Html(raw) => raw.kind == HtmlTokenKind::SpaceCharacters,
            TokenNode::Native { .. } => false,
        }
    }
}

fn title_suffix(title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => format!(" \"{}\"", safe_title(title)),
        _ => String::new(),
    }
}

/// Escape double quotes for use inside a link title
pub fn safe_title(title: &str) -> String {
    title.replace('"', "\\\"")
}
