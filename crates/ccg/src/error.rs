//! Error types for CCG parsing.

use thiserror::Error;

/// Errors that can occur while building lexicons or parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CcgError {
    /// Word not found in the lexicon.
    #[error("Unknown word: '{word}'")]
    UnknownWord { word: String },

    /// Cannot parse an empty token sequence.
    #[error("Cannot parse an empty sentence")]
    EmptySentence,

    /// A grammar line could not be interpreted.
    #[error("Lexicon syntax error on line {line}: {message}")]
    LexiconSyntax { line: usize, message: String },

    /// A logical expression could not be read.
    #[error("Invalid logical expression '{expression}': {message}")]
    InvalidExpression { expression: String, message: String },

    /// A semantic term did not have the shape its combinator requires.
    ///
    /// This signals an inconsistency between a lexical entry's term and the
    /// combinator that fired, not an ordinary non-match, so it aborts the
    /// parse instead of degrading to a syntax-only derivation.
    #[error("Semantic term `{term}` has the wrong shape for {rule}")]
    MalformedSemantics { rule: String, term: String },
}
