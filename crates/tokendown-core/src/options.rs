//! Configuration options for HTML to Markdown transduction

use indexmap::{IndexMap, IndexSet};

/// How a `<pre>` without a `<code>` child is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreBehavior {
    /// Render as an indented code block
    #[default]
    CodeBlock,
    /// Render like a `<p>`
    Paragraph,
}

const EMPHASIS_CHARS: &[char] = &['*', '_'];
const BULLET_CHARS: &[char] = &['*', '-', '+'];

/// Options for the transducer
#[derive(Debug, Clone)]
pub struct Options {
    /// Always keep `<a>` as raw HTML
    pub render_anchors_as_tag: bool,

    /// Collapse `<a href=X>X</a>` to `<X>`
    pub simplify_self_links: bool,

    /// Interpret `<http://...>`, `<https://...>` and `<mailto:...>` as links
    pub parse_bare_autolinks: bool,

    /// Always keep `<img>` as raw HTML
    pub render_images_as_tag: bool,

    pub strip_comments: bool,

    /// Drop `<script>` elements with their content
    pub strip_scripts: bool,

    /// Emit `[text][n]` with a trailing reference block
    pub reference_style_links: bool,

    /// Emit `![alt][n]` with a trailing reference block
    pub reference_style_images: bool,

    /// When false, `div` tags are dropped (their content stays)
    pub treat_div_as_block: bool,

    /// Tags passed through as raw HTML
    pub allowed_passthrough_tags: IndexSet<String>,

    /// Passthrough tags that also get block spacing
    pub allowed_passthrough_block_tags: IndexSet<String>,

    /// Attributes kept per tag; attributes of unlisted tags are all dropped
    pub allowed_attributes: IndexMap<String, IndexSet<String>>,

    /// Emphasis delimiter (`*` or `_`)
    pub emphasis_char: char,

    /// Strong delimiter, doubled on output (`*` or `_`)
    pub strong_char: char,

    /// Bold-italic delimiter, tripled on output (`*` or `_`)
    pub bold_italic_char: char,

    /// Unordered list bullet (`*`, `-` or `+`)
    pub bullet_char: char,

    /// Horizontal rule string
    pub horizontal_rule: String,

    pub pre_behavior: PreBehavior,
}

fn string_set(items: &[&str]) -> IndexSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for Options {
    fn default() -> Self {
        let mut allowed_attributes = IndexMap::new();
        allowed_attributes.insert("a".to_string(), string_set(&["href", "title"]));
        allowed_attributes.insert(
            "img".to_string(),
            string_set(&["src", "title", "alt", "height", "width"]),
        );

        Self {
            render_anchors_as_tag: false,
            simplify_self_links: true,
            parse_bare_autolinks: true,
            render_images_as_tag: false,
            strip_comments: false,
            strip_scripts: true,
            reference_style_links: false,
            reference_style_images: false,
            treat_div_as_block: true,
            allowed_passthrough_tags: string_set(&["table", "tr", "td", "th", "thead", "tbody"]),
            allowed_passthrough_block_tags: string_set(&["table"]),
            allowed_attributes,
            emphasis_char: '_',
            strong_char: '*',
            bold_italic_char: '*',
            bullet_char: '*',
            horizontal_rule: "---".to_string(),
            pre_behavior: PreBehavior::CodeBlock,
        }
    }
}

impl Options {
    /// Replace out-of-range marker characters with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Options::default();
        self.emphasis_char = checked_char(
            "emphasis_char",
            self.emphasis_char,
            EMPHASIS_CHARS,
            defaults.emphasis_char,
        );
        self.strong_char = checked_char(
            "strong_char",
            self.strong_char,
            EMPHASIS_CHARS,
            defaults.strong_char,
        );
        self.bold_italic_char = checked_char(
            "bold_italic_char",
            self.bold_italic_char,
            EMPHASIS_CHARS,
            defaults.bold_italic_char,
        );
        self.bullet_char = checked_char(
            "bullet_char",
            self.bullet_char,
            BULLET_CHARS,
            defaults.bullet_char,
        );
        if self.horizontal_rule.trim().is_empty() {
            log::warn!("empty horizontal_rule, using {:?}", defaults.horizontal_rule);
            self.horizontal_rule = defaults.horizontal_rule;
        }
        self
    }

    pub fn is_passthrough(&self, tag: &str) -> bool {
        self.allowed_passthrough_tags.contains(tag)
    }

    pub fn is_passthrough_block(&self, tag: &str) -> bool {
        self.allowed_passthrough_block_tags.contains(tag)
    }

    /// Allowed attribute names for a tag, if the tag has an entry
    pub fn attributes_for(&self, tag: &str) -> Option<&IndexSet<String>> {
        self.allowed_attributes.get(tag)
    }
}

fn checked_char(field: &str, value: char, allowed: &[char], fallback: char) -> char {
    if allowed.contains(&value) {
        value
    } else {
        log::warn!("invalid {field} {value:?}, using {fallback:?}");
        fallback
    }
}
