//! Token stream serialization
//!
//! Renders the final token stream into text. Markdown tokens write their data
//! as-is; raw HTML tokens go through HTML serialization rules (escaped
//! character data, single-quoted alphabetical attributes, ` />` on void tags).

use crate::html_token::{HtmlToken, HtmlTokenKind};
use crate::token::{RenderKind, Token, TokenNode};

/// Elements whose character data is written without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const ESCAPED_QUOTE_MARKER: &str = "&gt; ";

/// Serialize a token stream to Markdown text
pub fn serialize(tokens: &[Token]) -> String {
    let mut output = String::with_capacity(tokens.len() * 8);
    let mut raw_text: Option<String> = None;

    for token in tokens {
        let depth = token.blockquote_depth.unwrap_or(0);
        match &token.node {
            TokenNode::Markdown { tag, data } => match tag.render_kind() {
                RenderKind::Text => {
                    output.push_str(&restore_quote_markers(&escape_text(data), depth))
                }
                RenderKind::Literal | RenderKind::Space => output.push_str(data),
            },
            TokenNode::Native { raw, .. } | TokenNode::Html(raw) => {
                serialize_html(raw, depth, &mut raw_text, &mut output)
            }
        }
    }

    output
}

fn serialize_html(raw: &HtmlToken, depth: usize, raw_text: &mut Option<String>, out: &mut String) {
    let name = raw.name().unwrap_or_default();
    match raw.kind {
        HtmlTokenKind::StartTag => {
            push_tag_open(raw, out);
            out.push('>');
            if RAW_TEXT_ELEMENTS.contains(&name) {
                *raw_text = Some(name.to_string());
            }
        }
        HtmlTokenKind::EmptyTag => {
            push_tag_open(raw, out);
            out.push_str(" />");
        }
        HtmlTokenKind::EndTag => {
            out.push_str("</");
            out.push_str(name);
            out.push('>');
            if raw_text.as_deref() == Some(name) {
                *raw_text = None;
            }
        }
        HtmlTokenKind::Characters => {
            if raw_text.is_some() {
                out.push_str(raw.text());
            } else {
                out.push_str(&restore_quote_markers(&escape_text(raw.text()), depth));
            }
        }
        HtmlTokenKind::SpaceCharacters => out.push_str(raw.text()),
        HtmlTokenKind::Comment => {
            out.push_str("<!--");
            out.push_str(raw.text());
            out.push_str("-->");
        }
        HtmlTokenKind::Doctype => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        HtmlTokenKind::ParseError => {}
    }
}

fn push_tag_open(raw: &HtmlToken, out: &mut String) {
    out.push('<');
    out.push_str(raw.name().unwrap_or_default());

    let mut attrs: Vec<_> = raw.attributes.iter().collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in attrs {
        out.push(' ');
        if let Some(ns) = &key.namespace {
            out.push_str(ns);
            out.push(':');
        }
        out.push_str(&key.local);
        out.push_str("='");
        out.push_str(&escape_attribute(value));
        out.push('\'');
    }
}

/// Escape HTML character data
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

fn escape_attribute(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Decode up to `depth` escaped `> ` markers at the start of every line after the first
fn restore_quote_markers(rendered: &str, depth: usize) -> String {
    if depth == 0 || !rendered.contains('\n') {
        return rendered.to_string();
    }

    let mut out = String::with_capacity(rendered.len());
    for (i, line) in rendered.split_inclusive('\n').enumerate() {
        let mut line = line;
        if i > 0 {
            for _ in 0..depth {
                match line.strip_prefix(ESCAPED_QUOTE_MARKER) {
                    Some(rest) => {
                        out.push_str("> ");
                        line = rest;
                    }
                    None => break,
                }
            }
        }
        out.push_str(line);
    }
    out
}
