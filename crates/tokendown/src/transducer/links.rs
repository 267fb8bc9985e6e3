//! Anchors, images and the trailing reference block.

use log::debug;
use tokendown_core::{HtmlToken, HtmlTokenKind, Token};

use super::context::decrement;
use super::Transducer;
use crate::utilities::{clean_attributes, normalize_characters};
use crate::Result;

impl Transducer<'_> {
    /// Anchor state machine.
    ///
    /// Only a flat anchor (start, one text token, end) becomes a Markdown link;
    /// anything else is passed through as raw HTML with a balanced end tag.
    pub(super) fn anchor(&mut self, index: usize, token: &HtmlToken) -> Result<Vec<Token>> {
        if token.kind != HtmlTokenKind::StartTag {
            decrement(&mut self.context.anchor, "a")?;
            if self.context.anchor_as_tag == 0 {
                return Ok(Vec::new());
            }
            decrement(&mut self.context.anchor_as_tag, "a_as_tag")?;
            return Ok(vec![Token::html(clean_attributes(token, self.options))]);
        }

        self.context.anchor += 1;
        let tokens = self.tokens;
        let text = tokens
            .get(index + 1)
            .filter(|next| next.kind == HtmlTokenKind::Characters);
        let flat = text.is_some()
            && tokens
                .get(index + 2)
                .is_some_and(|next| next.is_named(HtmlTokenKind::EndTag, "a"));

        if self.options.render_anchors_as_tag || !flat {
            self.context.anchor_as_tag += 1;
            return Ok(vec![Token::html(clean_attributes(token, self.options))]);
        }

        let Some(href) = token.attr("href").filter(|href| !href.is_empty()) else {
            // the text token is left to render on its own
            return Ok(Vec::new());
        };
        let text = text.map(|t| normalize_characters(t.text(), true)).unwrap_or_default();
        let title = token.attr("title").filter(|title| !title.is_empty());
        self.context.consumed_text = Some(index + 1);

        if self.options.simplify_self_links && (text.is_empty() || text == href) && title.is_none()
        {
            return Ok(vec![Token::anchor_simple(href)]);
        }
        if self.options.reference_style_links {
            let reference = self.context.references.register(href, title);
            return Ok(vec![Token::anchor_reference_link(&text, reference)]);
        }
        Ok(vec![Token::anchor_inline(href, &text, title)])
    }

    pub(super) fn image(&mut self, token: &HtmlToken) -> Vec<Token> {
        if self.options.render_images_as_tag {
            return vec![Token::html(clean_attributes(token, self.options))];
        }

        let Some(src) = token.attr("src").filter(|src| !src.is_empty()) else {
            debug!("dropping <img> without src");
            return Vec::new();
        };
        let title = token.attr("title").filter(|title| !title.is_empty());
        let reference = self
            .options
            .reference_style_images
            .then(|| self.context.references.register(src, title));

        vec![Token::image(src, token.attr("alt"), title, reference)]
    }

    /// Append `[n]: href` definitions for every registered reference
    pub(super) fn append_references(&mut self) {
        if self.context.references.is_empty() {
            return;
        }

        let trailing_space = self
            .output
            .last()
            .and_then(Token::tag)
            .is_some_and(|tag| tag.is_whitespace());
        if trailing_space {
            self.output.pop();
        }

        let mut block = vec![Token::newline_blank(), Token::start_block()];
        for (reference, href, title) in self.context.references.entries() {
            block.push(Token::newline());
            block.push(Token::anchor_reference(reference, href, title));
        }
        block.push(Token::end_block());
        self.output.extend(block);
    }
}
