//! Utility functions and constants for HTML token processing.

use once_cell::sync::Lazy;
use regex::Regex;
use tokendown_core::{Attributes, HtmlToken, Options};

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Tags with dedicated Markdown handling; these never reach the passthrough fallback
pub const MARKDOWN_CORE_TAGS: &[&str] = &[
    "div", "p", "b", "i", "em", "strong", "ul", "ol", "li", "blockquote",
    "h1", "h2", "h3", "h4", "h5", "h6", "code", "hr", "a", "img", "pre",
];

/// Tags whose content is passed through with minimal reinterpretation
pub const SENSITIVE_TAGS: &[&str] = &["code", "pre", "script"];

/// Tag names the parser produces for `<http://...>` and `<https://...>`
pub const BARE_LINK_SCHEMES: &[&str] = &["http:", "https:"];

/// Element wrapped around fragments before parsing
pub const FRAGMENT_TAG: &str = "tokendown-fragment";
pub const FRAGMENT_ID: &str = "__tokendown_fragment__";

pub const MAILTO_PREFIX: &str = "mailto:";

/// HTML space characters: tab, LF, FF, CR, space
pub const SPACE_CHARACTERS: &[char] = &['\t', '\n', '\u{c}', '\r', ' '];

static RE_NEWLINES_3P: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("RE_NEWLINES_3P is valid"));

static RE_SPACE_TAB_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+").expect("RE_SPACE_TAB_RUN is valid"));

static RE_SPACE_TAB_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]+$").expect("RE_SPACE_TAB_ONLY is valid"));

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_markdown_core(tag: &str) -> bool {
    MARKDOWN_CORE_TAGS.contains(&tag)
}

pub fn is_sensitive(tag: &str) -> bool {
    SENSITIVE_TAGS.contains(&tag)
}

pub fn is_bare_link_scheme(tag: &str) -> bool {
    BARE_LINK_SCHEMES.contains(&tag)
}

/// Heading level for `h1`..`h6`
pub fn heading_level(tag: &str) -> Option<usize> {
    let level = tag.strip_prefix('h')?.parse::<usize>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

pub fn is_space_tab_only(text: &str) -> bool {
    RE_SPACE_TAB_ONLY.is_match(text)
}

/// Normalize a run of character data the way browsers flow text.
///
/// Collapses three or more newlines to two and space/tab runs to one space,
/// drops the indentation after a newline unless a digit or bullet follows,
/// and inside a paragraph folds every newline into a space. The result is
/// trimmed.
pub fn normalize_characters(text: &str, in_paragraph: bool) -> String {
    let text = RE_NEWLINES_3P.replace_all(text, "\n\n");
    let text = RE_SPACE_TAB_RUN.replace_all(&text, " ");
    let mut text = strip_line_indents(&text);

    if in_paragraph {
        text = text.replace("\n\n", " ").replace('\n', " ");
        text = RE_SPACE_TAB_RUN.replace_all(&text, " ").into_owned();
    }

    text.trim().to_string()
}

/// Remove space/tab runs that open a line, keeping list-like indentation
fn strip_line_indents(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        result.push(c);
        if c != '\n' {
            continue;
        }

        let mut indent = String::new();
        while let Some(&next) = chars.peek() {
            if next != ' ' && next != '\t' {
                break;
            }
            indent.push(next);
            chars.next();
        }
        if chars
            .peek()
            .is_some_and(|next| next.is_ascii_digit() || matches!(next, '*' | '-' | '+'))
        {
            result.push_str(&indent);
        }
    }

    result
}

/// Keep only the attributes allowed for the token's tag
pub fn clean_attributes(token: &HtmlToken, options: &Options) -> HtmlToken {
    let mut cleaned = token.clone();
    let allowed = token.name().and_then(|name| options.attributes_for(name));
    cleaned.attributes = match allowed {
        Some(allowed) => token
            .attributes
            .iter()
            .filter(|(key, _)| allowed.contains(&key.local))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        None => Attributes::new(),
    };
    cleaned
}

/// Rebuild the URL of a bare autolink from the parser's attribute split.
///
/// `<https://example.com/path?a=b>` arrives as a tag named `https:` with the
/// attributes `example.com`, `path?a` = `b`.
pub fn bare_link_url(scheme: &str, token: &HtmlToken) -> String {
    let segments: Vec<&str> = token
        .attributes
        .keys()
        .map(|key| key.local.as_str())
        .collect();

    let mut url = format!("{scheme}//{}", segments.join("/"));
    if let Some(value) = token.attributes.values().last() {
        if !value.is_empty() {
            url.push('=');
            url.push_str(value);
        }
    }
    url
}

/// Right-trim every line
pub fn rstrip_lines(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
