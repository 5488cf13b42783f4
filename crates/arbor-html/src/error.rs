use thiserror::Error;

/// Protocol violations by the code driving a [`crate::TreeBuilder`].
///
/// Malformed markup never produces one of these; it is repaired in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeBuilderError {
    /// A token was fed while the builder waits for a parked script.
    #[error("tree builder is paused on a script; call resume() first")]
    Paused,
    /// `resume()` was called while the builder was running.
    #[error("tree builder is not paused")]
    NotPaused,
}

/// Errors from the [`crate::HTMLParser`] driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// The legacy tree construction engine was selected.
    #[error("the legacy tree construction engine is not available in this build")]
    LegacyEngineUnavailable,
    /// The tree builder rejected a call.
    #[error(transparent)]
    TreeBuilder(#[from] TreeBuilderError),
}
