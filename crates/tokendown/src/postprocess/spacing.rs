//! Block spacing.
//!
//! A single forward pass turns block markers into newline tokens so adjacent
//! blocks are separated by exactly one blank line, resolves code regions into
//! inline or block form, and collapses redundant whitespace.

use std::collections::HashSet;

use log::trace;
use tokendown_core::{HtmlTokenKind, Tag, Token};

use super::code::{self, CodeKind};

/// Run the spacing pass over a transduced token stream
pub(crate) fn apply(tokens: &[Token]) -> Vec<Token> {
    let mut spacer = Spacer::new(tokens);
    for index in 0..tokens.len() {
        spacer.step(index);
    }
    spacer.output
}

#[derive(Debug, Clone, Copy)]
struct OpenCode {
    kind: CodeKind,
    /// Nested delimiters inside the region
    depth: usize,
}

struct Spacer<'a> {
    tokens: &'a [Token],
    output: Vec<Token>,
    code: Option<OpenCode>,
    /// Native `<pre>` ends dropped because their code region was a block
    compressed: HashSet<usize>,
    skip: Option<usize>,
}

impl<'a> Spacer<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            output: Vec::with_capacity(tokens.len()),
            code: None,
            compressed: HashSet::new(),
            skip: None,
        }
    }

    fn step(&mut self, index: usize) {
        let tokens = self.tokens;
        let token = &tokens[index];

        if self.skip == Some(index) {
            self.skip = None;
            return;
        }
        if self.code.is_some() {
            self.inside_code(token);
            return;
        }

        let Some(tag) = token.tag() else {
            self.output.push(token.clone());
            return;
        };
        let prev = index
            .checked_sub(1)
            .and_then(|i| tokens.get(i))
            .and_then(Token::tag);
        let next = tokens.get(index + 1);

        match tag {
            Tag::StartCode => self.open_code(index, token),
            Tag::EndCode => trace!("dropping unmatched code end at {index}"),
            _ if tag.is_block_start() => self.block_start(token, next),
            _ if tag.is_block_end() => self.block_end(token, prev, next.and_then(Token::tag)),
            _ if tag.is_whitespace() => self.whitespace(token, next.and_then(Token::tag)),
            Tag::StartNativeBlock => {
                self.cleanup_space_backwards(2, token.blockquote_depth);
                self.output.push(token.clone());
            }
            Tag::EndNativeBlock => {
                if !self.compressed.remove(&index) {
                    self.output.push(token.clone());
                }
            }
            Tag::HorizontalRule => {
                self.cleanup_space_backwards(1, token.blockquote_depth);
                self.output.push(token.clone());
            }
            _ => self.output.push(token.clone()),
        }
    }

    fn block_start(&mut self, token: &Token, next: Option<&Token>) {
        match next.and_then(Token::tag) {
            Some(tag) if tag.is_block_start() || tag.is_newline() => {}
            Some(tag) if tag.opens_newlined_text() => {
                self.cleanup_space_backwards(1, next.and_then(|next| next.blockquote_depth))
            }
            _ => self.cleanup_space_backwards(2, token.blockquote_depth),
        }
    }

    fn block_end(&mut self, token: &Token, prev: Option<Tag>, next: Option<Tag>) {
        if next.is_some_and(|tag| tag.is_block_end() || tag.is_newline()) {
            return;
        }
        let ensure = if prev.is_some_and(Tag::closes_newlined_text) {
            1
        } else {
            2
        };
        self.cleanup_space_backwards(ensure, token.blockquote_depth);
    }

    fn whitespace(&mut self, token: &Token, next: Option<Tag>) {
        if next.is_some_and(Tag::is_block_end) {
            return;
        }

        let is_newline = token.tag().is_some_and(Tag::is_newline);
        let last = self.output.last().and_then(Token::tag);
        match last {
            Some(tag) if is_newline && tag.is_newline() => {
                self.output.pop();
                self.output
                    .push(Token::newline_blank().within(token.blockquote_depth));
            }
            Some(Tag::HorizontalRule) if is_newline => {
                if next.is_some_and(Tag::is_block_start) {
                    return;
                }
                if token.has_tag(Tag::NewlineBlank) {
                    self.output
                        .push(Token::newline().within(token.blockquote_depth));
                }
            }
            _ => self.output.push(token.clone()),
        }
    }

    /// Rewind trailing whitespace and guarantee `ensure` newlines at `depth`.
    ///
    /// Popping stops at a newline from a different blockquote depth; that
    /// newline is kept as a single line so the depth change stays visible.
    /// A horizontal rule already ends its line, so one newline less is needed
    /// after it.
    fn cleanup_space_backwards(&mut self, mut ensure: usize, depth: Option<usize>) {
        while let Some(last) = self.output.last() {
            let Some(tag) = last.tag().filter(|tag| tag.is_whitespace()) else {
                break;
            };

            if tag.is_newline() && last.blockquote_depth != depth {
                ensure = 1;
                if tag == Tag::NewlineBlank {
                    let blank = self.output.pop();
                    let (blank_depth, blank_code) = blank
                        .map(|blank| (blank.blockquote_depth, blank.code_blocked))
                        .unwrap_or_default();
                    let replacement = if self.last_is_rule() {
                        ensure = 0;
                        Token::newline_blank()
                    } else {
                        Token::newline()
                    };
                    let mut replacement = replacement.within(blank_depth);
                    replacement.code_blocked = blank_code;
                    self.output.push(replacement);
                }
                break;
            }
            self.output.pop();
        }

        if self.output.is_empty() || self.last_is_rule() {
            ensure = ensure.saturating_sub(1);
        }
        if ensure > 0 {
            self.output.push(Token::newlines(ensure).within(depth));
        }
    }

    fn last_is_rule(&self) -> bool {
        self.output
            .last()
            .is_some_and(|last| last.has_tag(Tag::HorizontalRule))
    }

    fn open_code(&mut self, index: usize, token: &Token) {
        let region = code::classify(&self.output, self.tokens, index);
        if self
            .tokens
            .get(index + 1)
            .is_some_and(Token::is_raw_newline_run)
        {
            self.skip = Some(index + 1);
        }

        if region.kind == CodeKind::Inline {
            self.output
                .push(Token::characters_added("`").within(token.blockquote_depth));
            self.code = Some(OpenCode {
                kind: CodeKind::Inline,
                depth: 0,
            });
            return;
        }

        if region.native_open.is_some()
            && self
                .output
                .last()
                .is_some_and(|last| last.has_tag(Tag::StartNativeBlock))
        {
            self.output.pop();
        }
        if let Some(close) = region.native_close {
            self.compressed.insert(close);
        }
        self.open_code_line(token.blockquote_depth);
        self.code = Some(OpenCode {
            kind: CodeKind::Block,
            depth: 0,
        });
    }

    /// Make the newline before a code block carry the code indent
    fn open_code_line(&mut self, depth: Option<usize>) {
        match self.output.last().and_then(Token::tag) {
            Some(Tag::Newline | Tag::NewlineHard) => {
                if let Some(last) = self.output.last_mut() {
                    last.code_blocked = true;
                }
            }
            Some(Tag::NewlineBlank) => {
                let blank_depth = self.output.pop().and_then(|blank| blank.blockquote_depth);
                self.output.push(Token::newline().within(blank_depth));
                self.output
                    .push(Token::newline().within(blank_depth).in_code_block());
            }
            _ => self
                .output
                .push(Token::newline().within(depth).in_code_block()),
        }
    }

    fn inside_code(&mut self, token: &Token) {
        let Some(open) = self.code.as_mut() else {
            return;
        };
        let kind = open.kind;

        match token.tag() {
            Some(Tag::StartCode) => open.depth += 1,
            Some(Tag::EndCode) if open.depth > 0 => open.depth -= 1,
            Some(Tag::EndCode) => {
                self.code = None;
                self.close_code(kind, token);
            }
            _ if kind == CodeKind::Block => self.output.push(token.clone().in_code_block()),
            _ => self.output.push(token.clone()),
        }
    }

    fn close_code(&mut self, kind: CodeKind, token: &Token) {
        match kind {
            CodeKind::Block => {
                while self.output.last().is_some_and(|last| {
                    last.code_blocked
                        && last
                            .raw()
                            .is_some_and(|raw| raw.kind == HtmlTokenKind::SpaceCharacters)
                }) {
                    self.output.pop();
                }
            }
            CodeKind::Inline => self
                .output
                .push(Token::characters_added("`").within(token.blockquote_depth)),
        }
    }
}
