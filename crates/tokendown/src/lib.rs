//! # tokendown
//!
//! Transduce an HTML token stream into a Markdown token stream.
//!
//! Markup is tokenized into a flat [`HtmlToken`] sequence, which a
//! context-tracking transducer rewrites into Markdown-intent [`Token`]s. A
//! chain of postprocessing passes then settles block spacing, decides between
//! inline and block code, applies blockquote and code-block line prefixes and
//! trims the result before serialization.
//!
//! ## Design
//!
//! The transducer works on a materialized token sequence with a small window of
//! lookahead and lookbehind, so:
//!
//! - **Parser agnostic**: any tokenizer producing [`HtmlToken`]s can feed
//!   [`Transformer::adapt`]; the `html` feature supplies one built on scraper
//! - **Structured output**: the final [`Token`] stream can be inspected or
//!   rewritten with [`TokenFilter`]s before it is rendered
//!
//! ## Example
//!
//! ```rust
//! use tokendown::Transformer;
//!
//! let transformer = Transformer::new();
//! let markdown = transformer.transform("<h1>Hello World</h1>").unwrap();
//! assert_eq!(markdown, "# Hello World\n\n");
//! ```
//!
//! ## Example (tokens)
//!
//! ```rust
//! use tokendown::{Attributes, HtmlToken, Transformer};
//!
//! let tokens = vec![
//!     HtmlToken::start_tag("p", Attributes::new()),
//!     HtmlToken::characters("Hello"),
//!     HtmlToken::end_tag("p"),
//! ];
//! let markdown = Transformer::new().render(&tokens).unwrap();
//! assert_eq!(markdown, "Hello\n\n");
//! ```

mod filter;
#[cfg(feature = "html")]
pub mod html;
mod postprocess;
mod service;
mod transducer;
mod utilities;

pub use filter::{FilterFn, TokenFilter};
#[cfg(feature = "html")]
pub use html::{tokenize_document, tokenize_fragment};
pub use service::Transformer;
pub use tokendown_core::{
    escape_text, serialize, AttrName, Attributes, Bullet, Edge, HtmlToken, HtmlTokenKind,
    Options, PreBehavior, RenderKind, Tag, Token, TokenNode,
};

/// Error type for transform operations
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Convert an HTML fragment to Markdown with default options
#[cfg(feature = "html")]
pub fn transform(html: &str) -> Result<String> {
    Transformer::new().transform(html)
}
