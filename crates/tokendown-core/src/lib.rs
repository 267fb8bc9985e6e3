//! tokendown-core - Markdown token model and serialization
//!
//! This crate provides the data structures shared by the `tokendown`
//! transducer: the HTML parse tokens it consumes, the Markdown tokens it
//! produces, the conversion options, and the serializer that renders the final
//! token stream as text.
//!
//! # Architecture
//!
//! ```text
//! HtmlToken stream ──transduce──▶ Token stream ──postprocess──▶ Token stream ──serialize──▶ Markdown
//! ```
//!
//! # Example
//!
//! ```rust
//! use tokendown_core::{serialize, HtmlToken, Token};
//!
//! let tokens = vec![
//!     Token::heading_start(1),
//!     Token::html(HtmlToken::characters("Hello World")),
//!     Token::newline_blank(),
//! ];
//!
//! assert_eq!(serialize(&tokens), "\n# Hello World\n\n");
//! ```

mod html_token;
mod options;
mod serialize;
mod token;

pub use html_token::{AttrName, Attributes, HtmlToken, HtmlTokenKind};
pub use options::{Options, PreBehavior};
pub use serialize::{escape_text, serialize};
pub use token::{safe_title, Bullet, Edge, RenderKind, Tag, Token, TokenNode};
