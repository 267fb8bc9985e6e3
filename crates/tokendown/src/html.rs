//! HTML parsing support.
//!
//! Parses markup with scraper/html5ever and walks the resulting tree into the
//! linear [`HtmlToken`] sequence the transducer consumes.

use scraper::{ElementRef, Html, Node as ScraperNode};
use tokendown_core::{AttrName, Attributes, HtmlToken};

pub use crate::utilities::{FRAGMENT_ID, FRAGMENT_TAG};
use crate::utilities::{is_void, SPACE_CHARACTERS};

/// Tokenize an HTML fragment.
///
/// The fragment is wrapped in a [`FRAGMENT_TAG`] element so the parser keeps
/// bare constructs such as `<https://example.com>` inside a single parent; the
/// wrapper's own start and end tokens are part of the output.
///
/// # Example
///
/// ```rust
/// use tokendown::tokenize_fragment;
/// use tokendown_core::HtmlTokenKind;
///
/// let tokens = tokenize_fragment("<p>Hello</p>");
/// assert!(tokens.iter().any(|t| t.kind == HtmlTokenKind::Characters && t.text() == "Hello"));
/// ```
pub fn tokenize_fragment(html: &str) -> Vec<HtmlToken> {
    let wrapped = format!("<{FRAGMENT_TAG} id=\"{FRAGMENT_ID}\">{html}</{FRAGMENT_TAG}>");
    let document = Html::parse_fragment(&wrapped);

    let mut tokens = Vec::new();
    walk_children(document.root_element(), &mut tokens);
    tokens
}

/// Tokenize a full HTML document; only the `<body>` subtree is walked
pub fn tokenize_document(html: &str) -> Vec<HtmlToken> {
    let document = Html::parse_document(html);

    let mut tokens = Vec::new();
    for child in document.root_element().children() {
        if let Some(element) = ElementRef::wrap(child) {
            if element.value().name() == "body" {
                walk_children(element, &mut tokens);
            }
        }
    }
    tokens
}

fn walk_element(element: ElementRef, out: &mut Vec<HtmlToken>) {
    let name = element.value().name();
    let attributes: Attributes = element
        .value()
        .attrs()
        .map(|(key, value)| (AttrName::local(key), value.to_string()))
        .collect();

    if is_void(name) {
        out.push(HtmlToken::empty_tag(name, attributes));
        return;
    }

    out.push(HtmlToken::start_tag(name, attributes));
    walk_children(element, out);
    out.push(HtmlToken::end_tag(name));
}

fn walk_children(element: ElementRef, out: &mut Vec<HtmlToken>) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => push_text(&text.text, out),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    walk_element(child_element, out);
                }
            }
            ScraperNode::Comment(comment) => out.push(HtmlToken::comment(&comment.comment)),
            ScraperNode::Doctype(doctype) => out.push(HtmlToken::doctype(doctype.name())),
            _ => {}
        }
    }
}

/// Split text into leading space, characters and trailing space tokens
fn push_text(text: &str, out: &mut Vec<HtmlToken>) {
    if text.is_empty() {
        return;
    }

    let middle = text.trim_matches(SPACE_CHARACTERS);
    if middle.is_empty() {
        out.push(HtmlToken::space_characters(text));
        return;
    }

    let leading = &text[..text.len() - text.trim_start_matches(SPACE_CHARACTERS).len()];
    let trailing = &text[text.trim_end_matches(SPACE_CHARACTERS).len()..];

    if !leading.is_empty() {
        out.push(HtmlToken::space_characters(leading));
    }
    out.push(HtmlToken::characters(middle));
    if !trailing.is_empty() {
        out.push(HtmlToken::space_characters(trailing));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokendown_core::HtmlTokenKind;

    fn kinds(tokens: &[HtmlToken]) -> Vec<(HtmlTokenKind, String)> {
        tokens
            .iter()
            .map(|t| {
                let label = t.name().map(str::to_string).unwrap_or_else(|| t.text().to_string());
                (t.kind, label)
            })
            .collect()
    }

    #[test]
    fn test_push_text_splits_whitespace() {
        let mut out = Vec::new();
        push_text("  a b \n", &mut out);
        assert_eq!(
            kinds(&out),
            vec![
                (HtmlTokenKind::SpaceCharacters, "  ".to_string()),
                (HtmlTokenKind::Characters, "a b".to_string()),
                (HtmlTokenKind::SpaceCharacters, " \n".to_string()),
            ]
        );

        let mut only_space = Vec::new();
        push_text("\n\n", &mut only_space);
        assert_eq!(
            kinds(&only_space),
            vec![(HtmlTokenKind::SpaceCharacters, "\n\n".to_string())]
        );
    }

    #[test]
    fn test_fragment_is_wrapped() {
        let tokens = tokenize_fragment("<p>Hello</p>");
        assert_eq!(
            kinds(&tokens),
            vec![
                (HtmlTokenKind::StartTag, FRAGMENT_TAG.to_string()),
                (HtmlTokenKind::StartTag, "p".to_string()),
                (HtmlTokenKind::Characters, "Hello".to_string()),
                (HtmlTokenKind::EndTag, "p".to_string()),
                (HtmlTokenKind::EndTag, FRAGMENT_TAG.to_string()),
            ]
        );
        assert_eq!(tokens[0].attr("id"), Some(FRAGMENT_ID));
    }

    #[test]
    fn test_void_elements_are_empty_tags() {
        let tokens = tokenize_fragment(r#"a<br>b<img src="x.png" alt="X">"#);
        let br = tokens.iter().find(|t| t.name() == Some("br"));
        assert_eq!(br.map(|t| t.kind), Some(HtmlTokenKind::EmptyTag));

        let img = tokens.iter().find(|t| t.name() == Some("img"));
        let keys: Vec<&str> = img
            .map(|t| t.attributes.keys().map(|k| k.local.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["src", "alt"]);
        assert!(!tokens
            .iter()
            .any(|t| t.kind == HtmlTokenKind::EndTag && t.name() == Some("img")));
    }

    #[test]
    fn test_comments_are_kept() {
        let tokens = tokenize_fragment("<!-- note -->x");
        assert!(tokens
            .iter()
            .any(|t| t.kind == HtmlTokenKind::Comment && t.text() == " note "));
    }

    #[test]
    fn test_bare_autolink_becomes_tag() {
        let tokens = tokenize_fragment("<https://example.com/path>");
        let link = tokens.iter().find(|t| t.name() == Some("https:"));
        assert!(link.is_some_and(|t| t.kind == HtmlTokenKind::StartTag));
        assert!(link.is_some_and(|t| t.attr("example.com").is_some()));
    }

    #[test]
    fn test_document_walks_body_only() {
        let tokens = tokenize_document(
            "<!DOCTYPE html><html><head><title>T</title></head><body><p>x</p></body></html>",
        );
        assert_eq!(tokens.first().and_then(|t| t.name()), Some("p"));
        assert!(!tokens.iter().any(|t| t.name() == Some("title")));
    }
}
