//! HTML tokenizer and tree builder for Arbor.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tree construction** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Every insertion mode, including tables, select, templates, framesets
//!     and SVG/MathML foreign content
//!   - The stack of open elements with its scope queries
//!   - Active formatting elements, reconstruction and the adoption agency
//!   - Foster parenting
//!   - Script pauses reported to the embedder
//!
//! - **Reference tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, script data and PLAINTEXT content states
//!   - Tags, attributes, comments and DOCTYPEs
//!
//! - **Serialization** of the resulting [`arbor_dom::DomTree`]
//!
//! # Not Implemented
//!
//! - Character reference decoding (references are kept verbatim)
//! - Script data escape states
//! - Fragment parsing

/// Caller-facing error types.
pub mod error;
/// HTML parser and tree construction.
pub mod parser;
/// Serialization and debug output.
pub mod serialize;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use error::{ParserError, TreeBuilderError};
pub use parser::{
    ActiveFormattingList, EngineKind, ErrorContext, HTMLParser, InsertionMode, IssueLog,
    NOAHS_ARK_LIMIT, OpenElementStack, ParseErrorReporter, ParseIssue, ParseStatus,
    ParserOptions, ProcessOutcome, Scope, TreeBuilder, TreeSink, parse_document,
    parse_document_with_issues, parse_document_with_options,
};
pub use serialize::{format_tree, print_tree, serialize, serialize_children};
pub use tokenizer::{Attribute, HTMLTokenizer, Tag, Token, TokenSource, TokenizerState};
