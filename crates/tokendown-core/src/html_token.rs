//! HTML parse tokens
//!
//! The linear token vocabulary a tree walker produces from a parsed DOM. This is
//! the input side of the transducer and the shape raw passthrough HTML keeps on
//! the output side.

use indexmap::IndexMap;

/// Kind of an HTML parse token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlTokenKind {
    Doctype,
    Characters,
    SpaceCharacters,
    StartTag,
    EndTag,
    /// A void element such as `<img>` or `<br>`
    EmptyTag,
    Comment,
    ParseError,
}

/// Attribute key: optional namespace plus local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrName {
    pub namespace: Option<String>,
    pub local: String,
}

impl AttrName {
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: name.into(),
        }
    }
}

/// Attributes in source order
pub type Attributes = IndexMap<AttrName, String>;

/// A single HTML parse token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlToken {
    pub kind: HtmlTokenKind,
    pub name: Option<String>,
    pub attributes: Attributes,
    pub text: Option<String>,
}

impl HtmlToken {
    fn tag(kind: HtmlTokenKind, name: &str, attributes: Attributes) -> Self {
        Self {
            kind,
            name: Some(name.to_string()),
            attributes,
            text: None,
        }
    }

    fn data(kind: HtmlTokenKind, text: &str) -> Self {
        Self {
            kind,
            name: None,
            attributes: Attributes::new(),
            text: Some(text.to_string()),
        }
    }

    pub fn start_tag(name: &str, attributes: Attributes) -> Self {
        Self::tag(HtmlTokenKind::StartTag, name, attributes)
    }

    pub fn end_tag(name: &str) -> Self {
        Self::tag(HtmlTokenKind::EndTag, name, Attributes::new())
    }

    pub fn empty_tag(name: &str, attributes: Attributes) -> Self {
        Self::tag(HtmlTokenKind::EmptyTag, name, attributes)
    }

    pub fn characters(text: &str) -> Self {
        Self::data(HtmlTokenKind::Characters, text)
    }

    pub fn space_characters(text: &str) -> Self {
        Self::data(HtmlTokenKind::SpaceCharacters, text)
    }

    pub fn comment(text: &str) -> Self {
        Self::data(HtmlTokenKind::Comment, text)
    }

    pub fn doctype(name: &str) -> Self {
        Self::tag(HtmlTokenKind::Doctype, name, Attributes::new())
    }

    /// Builder-style attribute insertion (local name, no namespace)
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(AttrName::local(name), value.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Look up an attribute by local name, ignoring namespace
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.local == local)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_tag(&self) -> bool {
        matches!(
            self.kind,
            HtmlTokenKind::StartTag | HtmlTokenKind::EndTag | HtmlTokenKind::EmptyTag
        )
    }

    /// True for a start or end tag with the given name
    pub fn is_named(&self, kind: HtmlTokenKind, name: &str) -> bool {
        self.kind == kind && self.name() == Some(name)
    }
}
