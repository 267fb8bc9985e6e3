//! Transformer - the main entry point for HTML to Markdown conversion.

use tokendown_core::{serialize, HtmlToken, Options, Token};

use crate::filter::TokenFilter;
use crate::postprocess::postprocess;
use crate::transducer::transduce;
use crate::Result;
#[cfg(feature = "html")]
use crate::{
    html::{tokenize_document, tokenize_fragment},
    utilities::rstrip_lines,
    TransformError,
};

/// The main service for converting HTML to Markdown
#[derive(Debug)]
pub struct Transformer {
    options: Options,
    filters: Vec<TokenFilter>,
}

impl Transformer {
    /// Create a new Transformer with default options
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a Transformer with custom options.
    ///
    /// Marker characters outside their allowed set fall back to the defaults.
    pub fn with_options(options: Options) -> Self {
        Self {
            options: options.sanitized(),
            filters: Vec::new(),
        }
    }

    /// Get the current options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Add a filter run over the final token stream, in registration order
    pub fn add_filter(&mut self, filter: TokenFilter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Convert an HTML fragment to Markdown
    #[cfg(feature = "html")]
    pub fn transform(&self, html: &str) -> Result<String> {
        if html.trim().is_empty() {
            return Ok(String::new());
        }
        let tokens = tokenize_fragment(&rstrip_lines(html));
        self.render(&tokens)
    }

    /// Convert a full HTML document to Markdown; only `<body>` is rendered
    #[cfg(feature = "html")]
    pub fn transform_document(&self, html: &str) -> Result<String> {
        if html.trim().is_empty() {
            return Ok(String::new());
        }
        let tokens = tokenize_document(&rstrip_lines(html));
        self.render(&tokens)
    }

    /// Convert a UTF-8 encoded HTML fragment to Markdown
    #[cfg(feature = "html")]
    pub fn transform_bytes(&self, html: &[u8]) -> Result<String> {
        let html = std::str::from_utf8(html)
            .map_err(|err| TransformError::InvalidInput(err.to_string()))?;
        self.transform(html)
    }

    /// Transduce and postprocess pre-built HTML tokens into the final
    /// Markdown token stream
    pub fn adapt(&self, tokens: &[HtmlToken]) -> Result<Vec<Token>> {
        let transduced = transduce(tokens, &self.options)?;
        Ok(postprocess(&transduced))
    }

    /// Convert pre-built HTML tokens to Markdown, running the filters
    pub fn render(&self, tokens: &[HtmlToken]) -> Result<String> {
        let mut tokens = self.adapt(tokens)?;
        for filter in &self.filters {
            log::trace!("applying filter {}", filter.name());
            tokens = filter.apply(tokens);
        }
        Ok(serialize(&tokens))
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}
