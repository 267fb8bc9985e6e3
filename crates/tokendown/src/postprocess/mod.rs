//! Passes that turn the transduced stream into its final shape.
//!
//! Each pass consumes one token sequence and produces the next:
//! block spacing (with the code decision), horizontal rule materialization,
//! line prefixes, then trimming.

mod code;
mod prefix;
mod spacing;

use tokendown_core::{Tag, Token};

/// Run every postprocessing pass over a transduced token stream
pub(crate) fn postprocess(tokens: &[Token]) -> Vec<Token> {
    let spaced = spacing::apply(tokens);
    let ruled = materialize_rules(spaced);
    let prefixed = prefix::apply(ruled);
    trim(prefixed)
}

/// Surround every horizontal rule with single newlines
fn materialize_rules(tokens: Vec<Token>) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !token.has_tag(Tag::HorizontalRule) {
            output.push(token);
            continue;
        }

        let mut newline = Token::newline().within(token.blockquote_depth);
        newline.code_blocked = token.code_blocked;
        output.push(newline.clone());
        output.push(token);
        output.push(newline);
    }
    output
}

/// Strip leading space and newlines from the first token and trailing ones
/// from the last text token
fn trim(mut tokens: Vec<Token>) -> Vec<Token> {
    let leading = tokens
        .iter()
        .take_while(|token| token.is_pure_space() || is_newline_only(token))
        .count();
    tokens.drain(..leading);
    if let Some(text) = tokens.first_mut().and_then(Token::text_mut) {
        let kept = text.trim_start_matches('\n').len();
        text.drain(..text.len() - kept);
    }

    while tokens.last().is_some_and(Token::is_pure_space) {
        tokens.pop();
    }
    if let Some(last) = tokens.last_mut().filter(|last| !last.is_spacing()) {
        if let Some(text) = last.text_mut() {
            let kept = text.trim_end_matches('\n').len();
            text.truncate(kept);
        }
    }
    tokens
}

fn is_newline_only(token: &Token) -> bool {
    token
        .text()
        .is_some_and(|text| !text.is_empty() && text.chars().all(|c| c == '\n'))
}
