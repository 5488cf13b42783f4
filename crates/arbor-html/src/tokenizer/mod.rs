//! HTML tokenizer module.
//!
//! Implements the parts of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! the tree builder needs to be driven end to end.

/// Reference tokenizer and the token source seam.
pub mod core;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{HTMLTokenizer, TokenSource, TokenizerState};
pub use token::{Attribute, Tag, Token};
