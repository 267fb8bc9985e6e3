//! HTML token stream to Markdown token stream.
//!
//! The transducer walks a materialized [`HtmlToken`] sequence in index order.
//! Each input token yields zero or more [`Token`]s; the dispatcher may look two
//! tokens ahead and one behind. Every produced token is stamped with the
//! blockquote depth in effect once its handler returns.

mod context;
mod links;
mod whitespace;

use log::debug;
use tokendown_core::{Bullet, Edge, HtmlToken, HtmlTokenKind, Options, PreBehavior, Token};

use crate::utilities::{
    bare_link_url, clean_attributes, heading_level, is_bare_link_scheme, is_markdown_core,
    is_sensitive, normalize_characters, FRAGMENT_TAG, MAILTO_PREFIX,
};
use crate::{Result, TransformError};
use context::{decrement, Context, Fusion, ListFrame, ListKind, PreMode};
use whitespace::{Disposition, Scope};

/// Transduce HTML tokens into the raw (not yet spaced) Markdown token stream
pub(crate) fn transduce(tokens: &[HtmlToken], options: &Options) -> Result<Vec<Token>> {
    Transducer::new(tokens, options).run()
}

struct Transducer<'a> {
    tokens: &'a [HtmlToken],
    options: &'a Options,
    context: Context,
    output: Vec<Token>,
}

impl<'a> Transducer<'a> {
    fn new(tokens: &'a [HtmlToken], options: &'a Options) -> Self {
        Self {
            tokens,
            options,
            context: Context::default(),
            output: Vec::with_capacity(tokens.len()),
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        self.consume()?;
        Ok(self.finish())
    }

    /// Step through every input token, leaving the context as the stream ends
    fn consume(&mut self) -> Result<()> {
        for index in 0..self.tokens.len() {
            let produced = self.step(index)?;
            self.accept(produced);
        }

        let unbalanced = self.context.unbalanced();
        if !unbalanced.is_empty() {
            log::warn!("unbalanced at end of stream: {}", unbalanced.join(", "));
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<Token> {
        self.append_references();
        self.output
    }

    fn accept(&mut self, produced: Vec<Token>) {
        let depth = Some(self.context.blockquote);
        self.output
            .extend(produced.into_iter().map(|token| token.within(depth)));
    }

    fn step(&mut self, index: usize) -> Result<Vec<Token>> {
        let tokens = self.tokens;
        let token = &tokens[index];
        let name = token.name().unwrap_or_default();

        if self.options.strip_scripts && self.context.script_strip > 0 {
            if name == "script" {
                match token.kind {
                    HtmlTokenKind::StartTag => self.context.script_strip += 1,
                    HtmlTokenKind::EndTag => {
                        decrement(&mut self.context.script_strip, "script_strip")?
                    }
                    _ => {}
                }
            }
            return Ok(Vec::new());
        }

        if self.context.sensitive > 0 {
            if !is_sensitive(name) {
                return Ok(vec![Token::html(token.clone())]);
            }
            match token.kind {
                HtmlTokenKind::StartTag => {
                    self.context.sensitive += 1;
                    return Ok(vec![nested_sensitive(token, Edge::Start)]);
                }
                HtmlTokenKind::EndTag if self.context.sensitive >= 2 => {
                    decrement(&mut self.context.sensitive, "sensitive")?;
                    return Ok(vec![nested_sensitive(token, Edge::End)]);
                }
                _ => {}
            }
        }

        match token.kind {
            HtmlTokenKind::StartTag | HtmlTokenKind::EndTag => self.tag(index, token),
            HtmlTokenKind::EmptyTag => Ok(self.empty_tag(token)),
            HtmlTokenKind::Characters => Ok(self.characters(index, token)),
            HtmlTokenKind::SpaceCharacters => Ok(self.space_characters(token)),
            HtmlTokenKind::Comment if self.options.strip_comments => Ok(Vec::new()),
            HtmlTokenKind::Comment => Ok(vec![Token::html(token.clone())]),
            HtmlTokenKind::Doctype | HtmlTokenKind::ParseError => {
                debug!("dropping {:?} token", token.kind);
                Ok(Vec::new())
            }
        }
    }

    fn tag(&mut self, index: usize, token: &HtmlToken) -> Result<Vec<Token>> {
        let name = token.name().unwrap_or_default();

        if let Some(produced) = self.empty_pair(index, token) {
            return Ok(produced);
        }
        if let Some(level) = heading_level(name) {
            return self.heading(token, level);
        }

        match name {
            "p" => self.paragraph(token),
            "div" if self.options.treat_div_as_block => self.paragraph(token),
            "div" => Ok(Vec::new()),
            "ul" | "ol" => self.list(index, token),
            "li" => self.list_item(token),
            "i" | "em" | "b" | "strong" => Ok(self.emphasis(index, token)),
            "a" => self.anchor(index, token),
            "blockquote" => self.blockquote(token),
            "code" | "pre" | "script" => self.sensitive_tag(index, token),
            _ if is_bare_link_scheme(name) || name.starts_with(MAILTO_PREFIX) => {
                Ok(self.autolink(token))
            }
            _ => self.fallback(token),
        }
    }

    /// A start tag directly followed by its end tag (or the reverse) produces nothing
    fn empty_pair(&self, index: usize, token: &HtmlToken) -> Option<Vec<Token>> {
        let name = token.name()?;
        let paired = match token.kind {
            HtmlTokenKind::StartTag => self
                .tokens
                .get(index + 1)
                .is_some_and(|next| next.is_named(HtmlTokenKind::EndTag, name)),
            HtmlTokenKind::EndTag => index
                .checked_sub(1)
                .and_then(|prev| self.tokens.get(prev))
                .is_some_and(|prev| prev.is_named(HtmlTokenKind::StartTag, name)),
            _ => false,
        };
        if !paired {
            return None;
        }

        if is_bare_link_scheme(name) || name.starts_with(MAILTO_PREFIX) {
            return Some(self.autolink(token));
        }
        debug!("dropping empty <{name}>");
        Some(Vec::new())
    }

    fn paragraph(&mut self, token: &HtmlToken) -> Result<Vec<Token>> {
        let name = token.name().unwrap_or_default();
        if token.kind == HtmlTokenKind::StartTag {
            self.context.paragraph += 1;
            self.context.push_block(name);
            Ok(vec![Token::start_block()])
        } else {
            decrement(&mut self.context.paragraph, "paragraph")?;
            self.context.pop_block(name)?;
            Ok(vec![Token::end_block()])
        }
    }

    fn list(&mut self, index: usize, token: &HtmlToken) -> Result<Vec<Token>> {
        if token.kind == HtmlTokenKind::StartTag {
            let kind = if token.name() == Some("ol") {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            };
            self.context.lists.push(ListFrame { kind, count: 0 });
            if self.context.lists.len() > 1 {
                return Ok(Vec::new());
            }
            if self.context.list_continuation {
                self.context.list_continuation = false;
                return Ok(Vec::new());
            }
            return Ok(vec![Token::start_block()]);
        }

        self.context.lists.pop().ok_or_else(|| {
            TransformError::Internal("closing a list with no open list".to_string())
        })?;
        if !self.context.lists.is_empty() {
            return Ok(Vec::new());
        }
        if self.list_upcoming(index) {
            self.context.list_continuation = true;
            return Ok(Vec::new());
        }
        Ok(vec![Token::end_block()])
    }

    /// Another list opens right after `index`, optionally across one whitespace token
    fn list_upcoming(&self, index: usize) -> bool {
        let opens_list = |token: &HtmlToken| {
            token.kind == HtmlTokenKind::StartTag && matches!(token.name(), Some("ul" | "ol"))
        };
        match self.tokens.get(index + 1) {
            Some(next) if opens_list(next) => true,
            Some(next) if next.kind == HtmlTokenKind::SpaceCharacters => {
                self.tokens.get(index + 2).is_some_and(opens_list)
            }
            _ => false,
        }
    }

    fn list_item(&mut self, token: &HtmlToken) -> Result<Vec<Token>> {
        if token.kind == HtmlTokenKind::EndTag {
            self.context.pop_block("li")?;
            return Ok(Vec::new());
        }

        self.context.push_block("li");
        let depth = self.context.lists.len().max(1);
        let bullet = match self.context.lists.last_mut() {
            Some(frame) if frame.kind == ListKind::Ordered => {
                frame.count += 1;
                Bullet::Ordinal(frame.count)
            }
            _ => Bullet::Char(self.options.bullet_char),
        };
        Ok(vec![Token::list_item_start(depth, bullet)])
    }

    fn emphasis(&mut self, index: usize, token: &HtmlToken) -> Vec<Token> {
        if let Some(fusion) = self.context.fusions.remove(&index) {
            return match fusion {
                Fusion::Emit => vec![Token::bold_italic(self.options.bold_italic_char)],
                Fusion::Swallow => Vec::new(),
            };
        }

        if token.kind == HtmlTokenKind::StartTag {
            if let Some((inner_open, inner_close, outer_close)) = self.fusable(index) {
                self.context.fusions.insert(inner_open, Fusion::Swallow);
                self.context.fusions.insert(inner_close, Fusion::Emit);
                self.context.fusions.insert(outer_close, Fusion::Swallow);
                return vec![Token::bold_italic(self.options.bold_italic_char)];
            }
        }

        if is_strong(token.name().unwrap_or_default()) {
            vec![Token::strong(self.options.strong_char)]
        } else {
            vec![Token::emphasis(self.options.emphasis_char)]
        }
    }

    /// Indices of the inner open, inner close and outer close when a strong and an
    /// emphasis element wrap each other with nothing in between
    fn fusable(&self, index: usize) -> Option<(usize, usize, usize)> {
        let tokens = self.tokens;
        let outer = tokens[index].name()?;
        let inner = tokens.get(index + 1)?;
        let inner_name = inner.name()?;
        if inner.kind != HtmlTokenKind::StartTag
            || !matches!(inner_name, "i" | "em" | "b" | "strong")
            || is_strong(inner_name) == is_strong(outer)
        {
            return None;
        }

        let inner_close = matching_end(tokens, index + 1)?;
        if inner_close <= index + 2 {
            return None;
        }
        let outer_close = inner_close + 1;
        tokens
            .get(outer_close)?
            .is_named(HtmlTokenKind::EndTag, outer)
            .then_some((index + 1, inner_close, outer_close))
    }

    fn heading(&mut self, token: &HtmlToken, level: usize) -> Result<Vec<Token>> {
        let name = token.name().unwrap_or_default();
        if token.kind == HtmlTokenKind::StartTag {
            self.context.push_block(name);
            Ok(vec![Token::start_block(), Token::heading_start(level)])
        } else {
            self.context.pop_block(name)?;
            Ok(vec![Token::end_block()])
        }
    }

    fn blockquote(&mut self, token: &HtmlToken) -> Result<Vec<Token>> {
        if token.kind == HtmlTokenKind::StartTag {
            self.context.blockquote += 1;
            self.context.push_block("blockquote");
            Ok(vec![Token::start_block(), Token::start_blockquote()])
        } else {
            self.context.pop_block("blockquote")?;
            decrement(&mut self.context.blockquote, "blockquote")?;
            Ok(vec![Token::end_blockquote(), Token::end_block()])
        }
    }

    /// `code`, `pre` and `script` outside any other sensitive region
    fn sensitive_tag(&mut self, index: usize, token: &HtmlToken) -> Result<Vec<Token>> {
        let name = token.name().unwrap_or_default();
        let raw = clean_attributes(token, self.options);
        let opening = token.kind == HtmlTokenKind::StartTag;

        if name == "script" && opening && self.options.strip_scripts {
            self.context.script_strip += 1;
            return Ok(Vec::new());
        }

        match (name, opening) {
            ("code", true) => {
                self.context.sensitive += 1;
                Ok(vec![Token::start_code()])
            }
            ("code", false) => {
                decrement(&mut self.context.sensitive, "sensitive")?;
                Ok(vec![Token::end_code()])
            }
            ("pre", true) => {
                let mode = self.pre_mode(index);
                self.context.pre_modes.push(mode);
                match mode {
                    PreMode::Paragraph => {
                        self.context.paragraph += 1;
                        self.context.push_block("pre");
                        Ok(vec![Token::start_block()])
                    }
                    PreMode::Native => {
                        self.context.sensitive += 1;
                        Ok(vec![Token::start_block(), Token::native(Edge::Start, raw)])
                    }
                    PreMode::InjectedCode => {
                        self.context.sensitive += 1;
                        Ok(vec![
                            Token::start_block(),
                            Token::native(Edge::Start, raw),
                            Token::start_code(),
                        ])
                    }
                }
            }
            ("pre", false) => {
                let mode = self.context.pre_modes.pop().ok_or_else(|| {
                    TransformError::Internal("closing <pre> with no open <pre>".to_string())
                })?;
                match mode {
                    PreMode::Paragraph => {
                        decrement(&mut self.context.paragraph, "paragraph")?;
                        self.context.pop_block("pre")?;
                        Ok(vec![Token::end_block()])
                    }
                    PreMode::Native => {
                        decrement(&mut self.context.sensitive, "sensitive")?;
                        Ok(vec![Token::native(Edge::End, raw), Token::end_block()])
                    }
                    PreMode::InjectedCode => {
                        decrement(&mut self.context.sensitive, "sensitive")?;
                        Ok(vec![
                            Token::end_code(),
                            Token::native(Edge::End, raw),
                            Token::end_block(),
                        ])
                    }
                }
            }
            (_, true) => {
                self.context.sensitive += 1;
                Ok(vec![Token::start_block(), Token::native(Edge::Start, raw)])
            }
            (_, false) => {
                decrement(&mut self.context.sensitive, "sensitive")?;
                Ok(vec![Token::native(Edge::End, raw), Token::end_block()])
            }
        }
    }

    fn pre_mode(&self, index: usize) -> PreMode {
        let opens_code = |token: &HtmlToken| token.is_named(HtmlTokenKind::StartTag, "code");
        let has_code = match self.tokens.get(index + 1) {
            Some(next) if opens_code(next) => true,
            Some(next) if next.kind == HtmlTokenKind::SpaceCharacters => {
                self.tokens.get(index + 2).is_some_and(opens_code)
            }
            _ => false,
        };

        match (has_code, self.options.pre_behavior) {
            (true, _) => PreMode::Native,
            (false, PreBehavior::CodeBlock) => PreMode::InjectedCode,
            (false, PreBehavior::Paragraph) => PreMode::Paragraph,
        }
    }

    /// `<http://...>`, `<https://...>` and `<mailto:...>` parsed as tags
    fn autolink(&self, token: &HtmlToken) -> Vec<Token> {
        let name = token.name().unwrap_or_default();
        if !self.options.parse_bare_autolinks {
            debug!("dropping bare link <{name}>");
            return Vec::new();
        }
        if token.kind != HtmlTokenKind::StartTag {
            return Vec::new();
        }

        match name.strip_prefix(MAILTO_PREFIX) {
            Some(address) => self.link_to(name, address),
            None => {
                let url = bare_link_url(name, token);
                self.link_to(&url, &url)
            }
        }
    }

    fn link_to(&self, href: &str, text: &str) -> Vec<Token> {
        if self.options.simplify_self_links {
            vec![Token::anchor_simple(href)]
        } else if self.options.render_anchors_as_tag {
            vec![
                Token::html(HtmlToken::start_tag("a", Default::default()).with_attr("href", href)),
                Token::html(HtmlToken::characters(text)),
                Token::html(HtmlToken::end_tag("a")),
            ]
        } else {
            vec![Token::anchor_inline(href, text, None)]
        }
    }

    fn fallback(&self, token: &HtmlToken) -> Result<Vec<Token>> {
        let name = token.name().unwrap_or_default();
        if name == FRAGMENT_TAG {
            return Ok(Vec::new());
        }
        if is_markdown_core(name) {
            return Err(TransformError::Internal(format!(
                "<{name}> reached the passthrough fallback"
            )));
        }
        if !self.options.is_passthrough(name) {
            debug!("dropping <{name}>");
            return Ok(Vec::new());
        }

        let raw = Token::html(clean_attributes(token, self.options));
        if !self.options.is_passthrough_block(name) {
            return Ok(vec![raw]);
        }
        Ok(match token.kind {
            HtmlTokenKind::StartTag => vec![Token::start_block(), raw],
            _ => vec![raw, Token::end_block()],
        })
    }

    fn empty_tag(&mut self, token: &HtmlToken) -> Vec<Token> {
        let name = token.name().unwrap_or_default();
        match name {
            "img" => self.image(token),
            "br" => self.line_break(),
            "hr" => vec![
                Token::start_block(),
                Token::horizontal_rule(&self.options.horizontal_rule),
                Token::end_block(),
            ],
            _ if self.options.is_passthrough(name) => {
                vec![Token::html(clean_attributes(token, self.options))]
            }
            _ => {
                debug!("dropping <{name}>");
                Vec::new()
            }
        }
    }

    fn line_break(&self) -> Vec<Token> {
        if self.context.sensitive > 0 || self.context.in_list() {
            return Vec::new();
        }
        let follows_newline = self
            .output
            .last()
            .and_then(Token::tag)
            .is_some_and(|tag| tag.is_newline());
        if follows_newline {
            return Vec::new();
        }
        vec![Token::newline_hard()]
    }

    fn characters(&mut self, index: usize, token: &HtmlToken) -> Vec<Token> {
        if self.context.consumed_text == Some(index) {
            self.context.consumed_text = None;
            return Vec::new();
        }

        let text = normalize_characters(token.text(), self.context.paragraph > 0);
        if text.is_empty() {
            return Vec::new();
        }
        if !text.contains('\n') {
            return vec![Token::html(HtmlToken::characters(&text))];
        }

        let mut produced = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                produced.push(Token::newline());
            }
            produced.push(Token::characters_split(line));
        }
        produced
    }

    fn space_characters(&mut self, token: &HtmlToken) -> Vec<Token> {
        let scope = Scope {
            sensitive: self.context.sensitive > 0,
            in_list: self.context.in_list(),
        };
        match whitespace::normalize(token, self.output.last(), scope) {
            Disposition::Drop => Vec::new(),
            Disposition::Push(token) => vec![token],
            Disposition::ReplaceLast(token) => {
                self.output.pop();
                vec![token]
            }
        }
    }
}

fn is_strong(name: &str) -> bool {
    matches!(name, "b" | "strong")
}

/// `code` nested in a sensitive region still maps to code delimiters
fn nested_sensitive(token: &HtmlToken, edge: Edge) -> Token {
    match (token.name(), edge) {
        (Some("code"), Edge::Start) => Token::start_code(),
        (Some("code"), Edge::End) => Token::end_code(),
        _ => Token::html(token.clone()),
    }
}

/// Index of the end tag closing the element opened at `open`
fn matching_end(tokens: &[HtmlToken], open: usize) -> Option<usize> {
    let name = tokens.get(open)?.name()?;
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token.is_named(HtmlTokenKind::StartTag, name) {
            depth += 1;
        } else if token.is_named(HtmlTokenKind::EndTag, name) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests;
