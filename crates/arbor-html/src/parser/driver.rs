//! Runs a [`TokenSource`] through a [`TreeBuilder`], forwarding tokenizer
//! state switches and surfacing script pauses to the caller.

use arbor_common::warning::warn_once;
use arbor_dom::DomTree;

use super::issues::{IssueLog, ParseIssue};
use super::sink::TreeSink;
use super::tree_builder::{ProcessOutcome, TreeBuilder};
use crate::error::{ParserError, TreeBuilderError};
use crate::tokenizer::{HTMLTokenizer, Token, TokenSource};

/// Which tree construction engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    /// The insertion-mode tree builder in this crate.
    #[default]
    Modern,
    /// The pre-HTML5 engine. Not built; selecting it fails at construction.
    Legacy,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Engine to construct.
    pub engine: EngineKind,
    /// The scripting flag; decides how `noscript` is parsed.
    pub scripting_enabled: bool,
    /// Record parse errors for [`HTMLParser::finish`].
    pub collect_issues: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            engine: EngineKind::Modern,
            scripting_enabled: true,
            collect_issues: false,
        }
    }
}

impl ParserOptions {
    /// Select the engine.
    #[must_use]
    pub const fn engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Set the scripting flag.
    #[must_use]
    pub const fn scripting(mut self, enabled: bool) -> Self {
        self.scripting_enabled = enabled;
        self
    }

    /// Keep parse errors.
    #[must_use]
    pub const fn collect_issues(mut self, collect: bool) -> Self {
        self.collect_issues = collect;
        self
    }
}

/// Where [`HTMLParser::pump`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus<H> {
    /// End of input was processed.
    Finished,
    /// A `</script>` parked its script. Call [`HTMLParser::resume`] before
    /// pumping again.
    ScriptPaused {
        /// The script element.
        script: H,
        /// 1-based line of the script start tag.
        line: usize,
    },
}

/// HTML parser: tokenizer plus tree builder.
pub struct HTMLParser<S: TreeSink, T: TokenSource = HTMLTokenizer> {
    tokenizer: T,
    builder: TreeBuilder<S>,
    issues: Option<IssueLog>,
    finished: bool,
}

impl<S: TreeSink> HTMLParser<S> {
    /// A parser over `input` writing into `sink`.
    ///
    /// # Errors
    ///
    /// [`ParserError::LegacyEngineUnavailable`] when `options` selects the
    /// legacy engine.
    pub fn new(input: &str, sink: S, options: ParserOptions) -> Result<Self, ParserError> {
        Self::with_token_source(HTMLTokenizer::new(input), sink, options)
    }
}

impl<S: TreeSink, T: TokenSource> HTMLParser<S, T> {
    /// A parser pulling tokens from `tokenizer`.
    ///
    /// # Errors
    ///
    /// [`ParserError::LegacyEngineUnavailable`] when `options` selects the
    /// legacy engine.
    pub fn with_token_source(
        tokenizer: T,
        sink: S,
        options: ParserOptions,
    ) -> Result<Self, ParserError> {
        if options.engine == EngineKind::Legacy {
            warn_once(
                "HTML Parser",
                "the legacy tree construction engine was requested but is not built",
            );
            return Err(ParserError::LegacyEngineUnavailable);
        }

        let mut builder = TreeBuilder::new(sink);
        builder.set_scripting_enabled(options.scripting_enabled);
        let issues = options.collect_issues.then(IssueLog::new);
        if let Some(log) = &issues {
            builder.set_reporter(Box::new(log.clone()));
        }

        Ok(Self {
            tokenizer,
            builder,
            issues,
            finished: false,
        })
    }

    /// Feed tokens until end of input or the next script pause.
    ///
    /// # Errors
    ///
    /// [`TreeBuilderError::Paused`] when called again without
    /// [`Self::resume`] after a [`ParseStatus::ScriptPaused`].
    pub fn pump(&mut self) -> Result<ParseStatus<S::Handle>, ParserError> {
        if self.builder.is_paused() {
            return Err(TreeBuilderError::Paused.into());
        }

        while !self.finished {
            let token = self.tokenizer.next_token().unwrap_or(Token::EndOfInput);
            self.finished = token.is_end_of_input();
            self.builder.set_line(self.tokenizer.current_line());

            match self.builder.process(&token)? {
                ProcessOutcome::Continue => {}
                ProcessOutcome::SwitchTokenizer(state) => self.tokenizer.switch_to(state),
                ProcessOutcome::Paused => {
                    if let Some((script, line)) = self.builder.take_parked_script() {
                        return Ok(ParseStatus::ScriptPaused { script, line });
                    }
                }
            }
        }
        Ok(ParseStatus::Finished)
    }

    /// Continue after a script pause.
    ///
    /// # Errors
    ///
    /// [`TreeBuilderError::NotPaused`] when nothing is paused.
    pub fn resume(&mut self) -> Result<(), ParserError> {
        self.builder.resume()?;
        Ok(())
    }

    /// The tree builder, for inspecting its state.
    pub const fn tree_builder(&self) -> &TreeBuilder<S> {
        &self.builder
    }

    /// Hand back the sink and any collected parse errors.
    pub fn finish(self) -> (S, Vec<ParseIssue>) {
        let issues = self.issues.map(|log| log.issues()).unwrap_or_default();
        (self.builder.into_sink(), issues)
    }
}

/// Parse `html` into a fresh [`DomTree`], resuming after every script.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    parse_document_with_issues(html).0
}

/// Like [`parse_document`], also returning the parse errors.
#[must_use]
pub fn parse_document_with_issues(html: &str) -> (DomTree, Vec<ParseIssue>) {
    let options = ParserOptions::default().collect_issues(true);
    parse_document_with_options(html, options).unwrap_or_else(|error| {
        log::warn!("cannot construct the parser: {error}");
        (DomTree::new(), Vec::new())
    })
}

/// Parse `html` with `options` into a fresh [`DomTree`], resuming after
/// every script.
///
/// # Errors
///
/// [`ParserError::LegacyEngineUnavailable`] when `options` selects the
/// legacy engine.
pub fn parse_document_with_options(
    html: &str,
    options: ParserOptions,
) -> Result<(DomTree, Vec<ParseIssue>), ParserError> {
    let mut parser = HTMLParser::new(html, DomTree::new(), options)?;
    while let ParseStatus::ScriptPaused { line, .. } = parser.pump()? {
        log::debug!("script from line {line} has no engine to run it; continuing");
        parser.resume()?;
    }
    Ok(parser.finish())
}
