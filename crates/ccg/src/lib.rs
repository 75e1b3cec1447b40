//! Combinatory Categorial Grammar
//!
//! A CCG parser: a lexicon assigns each word one or more syntactic
//! categories (optionally paired with lambda terms), and a small fixed
//! algebra of combinators — application, composition, substitution and
//! type-raising — licenses merging adjacent categories into larger ones. A
//! CYK-style chart explores every derivation of a sentence under that
//! algebra, packing ambiguity so shared subtrees are built once, and
//! composes a logical term alongside each syntactic derivation.
//!
//! # Example
//!
//! ```rust
//! use ccg::chart;
//! use ccg::combinator::DEFAULT_RULES;
//! use ccg::lexicon::Lexicon;
//! use ccg::render::render_derivation;
//!
//! let lexicon = Lexicon::from_grammar(
//!     "
//!     :- S, NP, N
//!     the => NP/N
//!     I => NP
//!     read => (S\\NP)/NP
//!     book => N
//!     ",
//!     false,
//! )
//! .unwrap();
//!
//! let parses = chart::parse(&lexicon, &["I", "read", "the", "book"], DEFAULT_RULES).unwrap();
//! assert_eq!(parses.len(), 7);
//! println!("{}", render_derivation(&parses[0]));
//! ```

pub mod category;
pub mod chart;
pub mod combinator;
pub mod derivation;
mod error;
pub mod lexicon;
pub mod logic;
pub mod render;
mod semantics;

pub use category::{Category, Direction, Slash, Substitution};
pub use chart::{parse, Chart, Edge, EdgeId, Span};
pub use combinator::{
    Combinator, Rule, APPLICATION_RULES, COMPOSITION_RULES, DEFAULT_RULES, SUBSTITUTION_RULES,
    TYPE_RAISE_RULES,
};
pub use derivation::Derivation;
pub use error::CcgError;
pub use lexicon::{cat, CatSpec, Lexicon, LexiconBuilder, Token};
pub use logic::Term;
pub use render::render_derivation;
