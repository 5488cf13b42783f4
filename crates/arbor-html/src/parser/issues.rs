use std::cell::RefCell;
use std::rc::Rc;

use super::insertion_mode::InsertionMode;
use crate::tokenizer::Token;

/// Where a parse error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorContext {
    /// Insertion mode that was handling the token.
    pub mode: InsertionMode,
    /// 1-based source line of the token, when the driver knows it.
    pub line: usize,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// Receives every recovery the tree builder performs. Reporting is purely
/// diagnostic: the tree is the same with or without a reporter.
pub trait ParseErrorReporter {
    /// Called once per parse error, with the token that caused it.
    fn report_error(&mut self, token: &Token, context: ErrorContext);
}

/// A recorded parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Insertion mode the error was raised in.
    pub mode: InsertionMode,
    /// Token kind (`"StartTag"`, `"EndOfInput"`, ...).
    pub token_kind: &'static str,
    /// 1-based source line.
    pub line: usize,
}

/// Reporter that keeps every issue in a list shared with its clones, so the
/// caller can keep one copy and hand another to the builder.
#[derive(Debug, Clone, Default)]
pub struct IssueLog {
    issues: Rc<RefCell<Vec<ParseIssue>>>,
}

impl IssueLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the issues recorded so far.
    #[must_use]
    pub fn issues(&self) -> Vec<ParseIssue> {
        self.issues.borrow().clone()
    }

    /// Number of issues recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.borrow().is_empty()
    }
}

impl ParseErrorReporter for IssueLog {
    fn report_error(&mut self, token: &Token, context: ErrorContext) {
        self.issues.borrow_mut().push(ParseIssue {
            message: format!("unexpected {token} in {} mode", context.mode),
            mode: context.mode,
            token_kind: token.kind(),
            line: context.line,
        });
    }
}
