//! HTML tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! [`TreeBuilder`] consumes one token at a time and writes through a
//! [`TreeSink`]. The per-token-kind rules live in their own files; every one
//! of them matches on the current [`InsertionMode`].

mod adoption;
mod character;
mod defaults;
mod doctype_and_comment;
mod end_of_input;
mod end_tag;
mod foreign;
mod start_tag;

/// Parser driver: tokenizer, tree builder and options.
pub mod driver;
/// The list of active formatting elements.
pub mod formatting;
/// Insertion modes.
pub mod insertion_mode;
/// Parse error reporting.
pub mod issues;
/// The stack of open elements and scope queries.
pub mod open_elements;
/// Document mode selection from the DOCTYPE.
pub mod quirks;
/// The document sink the builder writes into.
pub mod sink;
/// Tag name sets.
pub mod tags;
/// The tree construction state machine.
pub mod tree_builder;

pub use driver::{
    EngineKind, HTMLParser, ParseStatus, ParserOptions, parse_document, parse_document_with_issues,
    parse_document_with_options,
};
pub use foreign::adjust_foreign_tag;
pub use formatting::{ActiveFormattingList, FormattingEntry, NOAHS_ARK_LIMIT};
pub use insertion_mode::InsertionMode;
pub use issues::{ErrorContext, IssueLog, ParseErrorReporter, ParseIssue};
pub use open_elements::{OpenElement, OpenElementStack, Scope};
pub use quirks::quirks_mode_for_doctype;
pub use sink::TreeSink;
pub use tree_builder::{ProcessOutcome, TreeBuilder};
