//! Post filters over the final token stream.

use tokendown_core::Token;

/// Type alias for filter functions
pub type FilterFn = Box<dyn Fn(Vec<Token>) -> Vec<Token> + Send + Sync>;

/// A named pass applied to the finished token stream before serialization
pub struct TokenFilter {
    name: String,
    apply: FilterFn,
}

impl TokenFilter {
    /// Create a filter from a function over the whole stream
    pub fn new<F>(name: &str, apply: F) -> Self
    where
        F: Fn(Vec<Token>) -> Vec<Token> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            apply: Box::new(apply),
        }
    }

    /// Create a filter keeping only tokens matching the predicate
    pub fn retain<P>(name: &str, predicate: P) -> Self
    where
        P: Fn(&Token) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |mut tokens| {
            tokens.retain(|token| predicate(token));
            tokens
        })
    }

    /// Create a filter rewriting each token in place
    pub fn map<M>(name: &str, mapper: M) -> Self
    where
        M: Fn(Token) -> Token + Send + Sync + 'static,
    {
        Self::new(name, move |tokens| tokens.into_iter().map(&mapper).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        (self.apply)(tokens)
    }
}

impl std::fmt::Debug for TokenFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenFilter").field("name", &self.name).finish()
    }
}
