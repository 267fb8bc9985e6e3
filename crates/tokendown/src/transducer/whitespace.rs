//! Reclassification of raw whitespace tokens into canonical spacing markers.

use tokendown_core::{HtmlToken, Tag, Token};

use crate::utilities::is_space_tab_only;

/// Outcome for one raw whitespace token
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Disposition {
    Drop,
    Push(Token),
    /// Replace the last accepted token
    ReplaceLast(Token),
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Scope {
    pub sensitive: bool,
    pub in_list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spacing {
    Space,
    Newline,
    Blank,
}

fn classify(text: &str) -> Spacing {
    match text {
        "\n\n" => Spacing::Blank,
        "\n" => Spacing::Newline,
        _ if is_space_tab_only(text) => Spacing::Space,
        _ => match text.matches('\n').count() {
            0 => Spacing::Space,
            1 => Spacing::Newline,
            _ => Spacing::Blank,
        },
    }
}

/// Decide what a raw whitespace token becomes given the last accepted token
pub(crate) fn normalize(raw: &HtmlToken, last: Option<&Token>, scope: Scope) -> Disposition {
    if scope.sensitive {
        return Disposition::Push(Token::html(raw.clone()));
    }

    let last_tag = last.and_then(Token::tag);
    match last_tag {
        Some(Tag::ListItemStart | Tag::HorizontalRule) => return Disposition::Drop,
        Some(tag) if tag.is_block_start() => return Disposition::Drop,
        Some(tag) if tag.is_block_end() => return Disposition::Push(Token::newline_blank()),
        _ => {}
    }

    let spacing = classify(raw.text());
    if scope.in_list && spacing != Spacing::Space {
        return Disposition::Drop;
    }
    if last.is_none() {
        return Disposition::Drop;
    }

    match (last_tag, spacing) {
        (Some(Tag::NewlineBlank), _) => Disposition::Drop,
        (Some(tag), Spacing::Newline | Spacing::Blank) if tag.is_single_newline() => {
            Disposition::ReplaceLast(Token::newline_blank())
        }
        (_, Spacing::Space) => Disposition::Push(Token::space()),
        (_, Spacing::Newline) => Disposition::Push(Token::newline()),
        (_, Spacing::Blank) => Disposition::Push(Token::newline_blank()),
    }
}
