//! Block-versus-inline decision for code regions.

use tokendown_core::{Tag, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CodeKind {
    Block,
    Inline,
}

/// How the code region opened at some `StartCode` renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CodeRegion {
    pub kind: CodeKind,
    /// Output index of the native `<pre>` start directly behind the region
    pub native_open: Option<usize>,
    /// Stream index of the native `<pre>` end directly after the region
    pub native_close: Option<usize>,
}

impl CodeRegion {
    const INLINE: Self = Self {
        kind: CodeKind::Inline,
        native_open: None,
        native_close: None,
    };
}

/// Decide the region opened at `tokens[start]`.
///
/// `output` is what the spacing pass has emitted so far, where block markers
/// have already become newlines. Scanning it backwards past newline markers,
/// the region can only be a block at the start of the output or directly
/// after a native `<pre>` start. Ahead, the first token after the matching
/// end marker that is not a newline must close a block or a native `<pre>`,
/// or the stream must end. A region without an end marker is inline.
pub(crate) fn classify(output: &[Token], tokens: &[Token], start: usize) -> CodeRegion {
    let Some(end) = matching_end(tokens, start) else {
        return CodeRegion::INLINE;
    };

    let behind = output
        .iter()
        .enumerate()
        .rev()
        .find(|(_, token)| !is_newline(token));
    let native_open = match behind {
        None => None,
        Some((index, token)) if is_native_pre(token, Tag::StartNativeBlock) => Some(index),
        Some(_) => return CodeRegion::INLINE,
    };

    let ahead = tokens
        .iter()
        .enumerate()
        .skip(end + 1)
        .find(|(_, token)| !is_newline(token));
    let native_close = match ahead {
        None => None,
        Some((index, token)) if is_native_pre(token, Tag::EndNativeBlock) => Some(index),
        Some((_, token)) if token.tag().is_some_and(Tag::is_block_end) => None,
        Some(_) => return CodeRegion::INLINE,
    };

    CodeRegion {
        kind: CodeKind::Block,
        native_open,
        native_close,
    }
}

fn is_native_pre(token: &Token, edge: Tag) -> bool {
    token.has_tag(edge) && token.native_name() == Some("pre")
}

/// Index of the `EndCode` matching the `StartCode` at `start`
fn matching_end(tokens: &[Token], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(start) {
        match token.tag() {
            Some(Tag::StartCode) => depth += 1,
            Some(Tag::EndCode) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_newline(token: &Token) -> bool {
    token.tag().is_some_and(Tag::is_newline)
}
