//! Line prefixes for blockquotes and code blocks.

use tokendown_core::Token;

/// Indent of a line inside a code block
const CODE_INDENT: &str = "    ";

const QUOTE_MARKER: &str = "> ";

/// Prefix for lines at blockquote `depth`, optionally inside a code block
fn line_prefix(depth: usize, code: bool) -> String {
    let mut prefix = QUOTE_MARKER.repeat(depth);
    if code {
        prefix.push_str(CODE_INDENT);
    }
    prefix
}

/// Insert the line prefix after every newline of quoted or code tokens.
///
/// Raw tags carry no string payload and pass unchanged.
pub(crate) fn apply(tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().map(prefixed).collect()
}

fn prefixed(mut token: Token) -> Token {
    let depth = token.blockquote_depth.unwrap_or(0);
    if depth == 0 && !token.code_blocked {
        return token;
    }

    let prefix = line_prefix(depth, token.code_blocked);
    if let Some(text) = token.text_mut() {
        if text.contains('\n') {
            *text = text.replace('\n', &format!("\n{prefix}"));
        }
    }
    token
}
