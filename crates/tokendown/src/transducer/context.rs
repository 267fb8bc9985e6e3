//! Mutable state threaded through one transduction.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{Result, TransformError};

/// Kind of an open list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Unordered,
    Ordered,
}

/// One open `<ul>`/`<ol>`
#[derive(Debug, Clone)]
pub(crate) struct ListFrame {
    pub kind: ListKind,
    pub count: usize,
}

/// How an open `<pre>` is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PreMode {
    /// Native block around a `<code>` child
    Native,
    /// Native block with injected code delimiters
    InjectedCode,
    /// Rendered like `<p>`
    Paragraph,
}

/// What to do when the dispatcher reaches a fused emphasis index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fusion {
    Emit,
    Swallow,
}

/// Link and image targets for reference-style output
#[derive(Debug, Default)]
pub(crate) struct ReferenceRegistry {
    targets: IndexMap<String, Option<String>>,
}

impl ReferenceRegistry {
    /// 1-based reference number; a known URL keeps its first number
    pub fn register(&mut self, href: &str, title: Option<&str>) -> usize {
        if let Some(index) = self.targets.get_index_of(href) {
            return index + 1;
        }
        self.targets
            .insert(href.to_string(), title.map(str::to_string));
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// `(number, href, title)` in first-seen order
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str, Option<&str>)> {
        self.targets
            .iter()
            .enumerate()
            .map(|(i, (href, title))| (i + 1, href.as_str(), title.as_deref()))
    }
}

#[derive(Debug, Default)]
pub(crate) struct Context {
    pub anchor: usize,
    pub anchor_as_tag: usize,
    pub paragraph: usize,
    pub blockquote: usize,
    pub sensitive: usize,
    pub script_strip: usize,
    pub blocks: Vec<String>,
    pub lists: Vec<ListFrame>,
    pub pre_modes: Vec<PreMode>,
    /// Outermost list closed with another list right behind it
    pub list_continuation: bool,
    /// Index of a text token already consumed as link text
    pub consumed_text: Option<usize>,
    pub fusions: HashMap<usize, Fusion>,
    pub references: ReferenceRegistry,
}

/// Decrement a depth counter, failing instead of going below zero
pub(crate) fn decrement(counter: &mut usize, name: &str) -> Result<()> {
    *counter = counter.checked_sub(1).ok_or_else(|| {
        TransformError::Internal(format!("{name} depth decremented below zero"))
    })?;
    Ok(())
}

impl Context {
    pub fn in_list(&self) -> bool {
        !self.lists.is_empty() || self.list_continuation
    }

    pub fn push_block(&mut self, name: &str) {
        self.blocks.push(name.to_string());
    }

    /// Pop the innermost open block, which must be `name`
    pub fn pop_block(&mut self, name: &str) -> Result<()> {
        match self.blocks.pop() {
            Some(open) if open == name => Ok(()),
            Some(open) => Err(TransformError::Internal(format!(
                "closing <{name}> while <{open}> is open"
            ))),
            None => Err(TransformError::Internal(format!(
                "closing <{name}> with no open block"
            ))),
        }
    }

    /// Names of counters that did not return to zero
    pub fn unbalanced(&self) -> Vec<&'static str> {
        let counters = [
            ("a", self.anchor),
            ("a_as_tag", self.anchor_as_tag),
            ("paragraph", self.paragraph),
            ("blockquote", self.blockquote),
            ("sensitive", self.sensitive),
            ("script_strip", self.script_strip),
            ("blocks", self.blocks.len()),
            ("lists", self.lists.len()),
        ];
        counters
            .into_iter()
            .filter(|(_, value)| *value != 0)
            .map(|(name, _)| name)
            .collect()
    }
}
