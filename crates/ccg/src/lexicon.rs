//! Lexicons: Word-to-Category Mappings
//!
//! A lexicon assigns each word one or more [`Token`]s, pairing a category
//! with an optional semantic term, and names the start category the parser
//! aims for. Lexicons come from two places:
//!
//! - [`Lexicon::from_grammar`] reads the textual grammar format: `:- S,NP,N`
//!   declares the primitive categories (the first is the start category),
//!   `Det :: NP/N` defines a reusable family, and `the => NP[sg]/N[sg] {\x.x}`
//!   defines a word. `#` starts a comment.
//! - [`LexiconBuilder`] constructs the same thing programmatically, with a
//!   small operator notation where `cat("NP") << cat("N")` builds `NP/N` and
//!   `cat("NP") >> cat("S")` builds `S\NP`.
//!
//! # Example
//!
//! ```rust
//! use ccg::lexicon::Lexicon;
//!
//! let lexicon = Lexicon::from_grammar(
//!     "
//!     :- S, NP, N
//!     Det :: NP/N
//!     the => Det
//!     book => N
//!     ",
//!     false,
//! )
//! .unwrap();
//!
//! assert_eq!(lexicon.start().to_string(), "S");
//! let the = lexicon.categories("the").unwrap();
//! assert_eq!(the[0].category().to_string(), "(NP/N)");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::{Shl, Shr};

use crate::category::{Category, Direction, Slash, Substitution};
use crate::error::CcgError;
use crate::logic::Term;

/// One lexical assignment: a word, its category, and an optional term.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    word: String,
    category: Category,
    semantics: Option<Term>,
}

impl Token {
    /// Create a token.
    pub fn new(word: impl Into<String>, category: Category, semantics: Option<Term>) -> Self {
        Self {
            word: word.into(),
            category,
            semantics,
        }
    }

    /// The surface word.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The assigned category.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// The assigned semantic term, if any.
    pub fn semantics(&self) -> Option<&Term> {
        self.semantics.as_ref()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.semantics {
            Some(term) => write!(f, "{} {{{term}}}", self.category),
            None => write!(f, "{}", self.category),
        }
    }
}

/// A CCG lexicon: primitive categories, category families, and per-word
/// entries.
#[derive(Debug, Clone)]
pub struct Lexicon {
    start: Category,
    primitives: Vec<String>,
    families: HashMap<String, (Category, Option<u64>)>,
    entries: HashMap<String, Vec<Token>>,
}

impl Lexicon {
    /// The goal category for parsing.
    pub fn start(&self) -> &Category {
        &self.start
    }

    /// The declared primitive category names, start category first.
    pub fn primitives(&self) -> &[String] {
        &self.primitives
    }

    /// Look up a named category family.
    pub fn family(&self, name: &str) -> Option<&Category> {
        self.families.get(name).map(|(category, _)| category)
    }

    /// All tokens for a word, in declaration order.
    pub fn categories(&self, word: &str) -> Result<&[Token], CcgError> {
        self.entries
            .get(word)
            .map(Vec::as_slice)
            .ok_or_else(|| CcgError::UnknownWord {
                word: word.to_string(),
            })
    }

    /// Read a lexicon from the textual grammar format.
    ///
    /// When `include_semantics` is set, every word entry must carry a
    /// `{...}` term.
    pub fn from_grammar(source: &str, include_semantics: bool) -> Result<Lexicon, CcgError> {
        let mut primitives: Vec<String> = Vec::new();
        let mut families: HashMap<String, (Category, Option<u64>)> = HashMap::new();
        let mut entries: HashMap<String, Vec<Token>> = HashMap::new();

        for (index, raw) in source.lines().enumerate() {
            let number = index + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix(":-") {
                primitives.extend(
                    rest.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(String::from),
                );
                continue;
            }

            let (ident, separator, rhs) = split_definition(line).ok_or_else(|| {
                CcgError::LexiconSyntax {
                    line: number,
                    message: "expected ':-', '::' or '=>'".to_string(),
                }
            })?;
            let (category_source, semantics_source) = split_semantics(rhs, number)?;

            let mut parser = CategoryParser::new(category_source, number, &primitives, &families);
            let category = parser.category()?;
            parser.finish()?;
            let variable = match parser.variable {
                Some(Category::Variable { id }) => Some(id),
                _ => None,
            };

            match separator {
                Separator::Family => {
                    families.insert(ident.to_string(), (category, variable));
                }
                Separator::Entry => {
                    let semantics = if include_semantics {
                        let term = semantics_source.ok_or_else(|| CcgError::LexiconSyntax {
                            line: number,
                            message: format!("entry for '{ident}' is missing a semantic term"),
                        })?;
                        Some(term.parse::<Term>()?)
                    } else {
                        None
                    };
                    entries
                        .entry(ident.to_string())
                        .or_default()
                        .push(Token::new(ident, category, semantics));
                }
            }
        }

        let start = primitives.first().ok_or_else(|| CcgError::LexiconSyntax {
            line: 0,
            message: "no primitive categories declared".to_string(),
        })?;
        Ok(Lexicon {
            start: Category::primitive(start.clone()),
            primitives,
            families,
            entries,
        })
    }
}

impl fmt::Display for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<&String> = self.entries.keys().collect();
        words.sort();
        for (index, word) in words.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let tokens: Vec<String> = self.entries[*word].iter().map(Token::to_string).collect();
            write!(f, "{word} => {}", tokens.join(" | "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Family,
    Entry,
}

fn split_definition(line: &str) -> Option<(&str, Separator, &str)> {
    let (position, separator) = match (line.find("::"), line.find("=>")) {
        (Some(family), Some(entry)) if family < entry => (family, Separator::Family),
        (Some(family), None) => (family, Separator::Family),
        (_, Some(entry)) => (entry, Separator::Entry),
        (None, None) => return None,
    };
    let ident = line[..position].trim();
    if ident.is_empty() {
        return None;
    }
    Some((ident, separator, line[position + 2..].trim()))
}

fn split_semantics(rhs: &str, line: usize) -> Result<(&str, Option<&str>), CcgError> {
    match rhs.find('{') {
        None => Ok((rhs.trim(), None)),
        Some(open) => {
            let inner = rhs[open + 1..]
                .strip_suffix('}')
                .ok_or_else(|| CcgError::LexiconSyntax {
                    line,
                    message: "unterminated semantic term".to_string(),
                })?;
            Ok((rhs[..open].trim(), Some(inner.trim())))
        }
    }
}

fn fresh_variable_id() -> u64 {
    match Category::fresh_var() {
        Category::Variable { id } => id,
        _ => unreachable!("fresh_var always builds a variable"),
    }
}

/// Recursive-descent reader for the category surface syntax.
///
/// The special name `var` denotes a category variable shared by every
/// occurrence within one definition; a family reference inherits or rebinds
/// the family's own variable accordingly.
struct CategoryParser<'a> {
    chars: Vec<char>,
    position: usize,
    line: usize,
    primitives: &'a [String],
    families: &'a HashMap<String, (Category, Option<u64>)>,
    variable: Option<Category>,
}

impl<'a> CategoryParser<'a> {
    fn new(
        source: &str,
        line: usize,
        primitives: &'a [String],
        families: &'a HashMap<String, (Category, Option<u64>)>,
    ) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
            line,
            primitives,
            families,
            variable: None,
        }
    }

    fn error(&self, message: impl Into<String>) -> CcgError {
        CcgError::LexiconSyntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.position += 1;
        }
    }

    fn finish(&mut self) -> Result<(), CcgError> {
        self.skip_whitespace();
        if self.position < self.chars.len() {
            return Err(self.error("unexpected trailing input after category"));
        }
        Ok(())
    }

    /// `category := operand (direction operand)*`, left-associative.
    fn category(&mut self) -> Result<Category, CcgError> {
        let mut result = self.operand()?;
        loop {
            self.skip_whitespace();
            if !matches!(self.peek(), Some('/') | Some('\\')) {
                return Ok(result);
            }
            let direction = self.direction()?;
            let argument = self.operand()?;
            result = Category::functional(result, argument, direction);
        }
    }

    fn operand(&mut self) -> Result<Category, CcgError> {
        self.skip_whitespace();
        if self.eat('(') {
            let category = self.category()?;
            self.skip_whitespace();
            if !self.eat(')') {
                return Err(self.error("unbalanced parentheses in category"));
            }
            return Ok(category);
        }
        self.primitive()
    }

    fn direction(&mut self) -> Result<Direction, CcgError> {
        let slash = if self.eat('/') {
            Slash::Forward
        } else if self.eat('\\') {
            Slash::Backward
        } else {
            return Err(self.error("expected '/' or '\\'"));
        };
        let mut composable = true;
        let mut crossable = true;
        for _ in 0..2 {
            if self.eat(',') {
                composable = false;
            } else if self.eat('.') {
                crossable = false;
            }
        }
        Ok(Direction::new(slash, composable, crossable))
    }

    fn identifier(&mut self) -> Option<String> {
        let start = self.position;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.position += 1;
        }
        (self.position > start).then(|| self.chars[start..self.position].iter().collect())
    }

    fn restrictions(&mut self) -> Result<Vec<String>, CcgError> {
        if !self.eat('[') {
            return Ok(Vec::new());
        }
        let mut tags = Vec::new();
        loop {
            match self.identifier() {
                Some(tag) => tags.push(tag),
                None => return Err(self.error("expected a restriction tag")),
            }
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                return Ok(tags);
            }
            return Err(self.error("expected ',' or ']' in restriction tags"));
        }
    }

    fn primitive(&mut self) -> Result<Category, CcgError> {
        let name = self
            .identifier()
            .ok_or_else(|| self.error("expected a category name"))?;
        let restrictions = self.restrictions()?;

        if name == "var" {
            if !restrictions.is_empty() {
                return Err(self.error("the category variable takes no restriction tags"));
            }
            return Ok(self.variable.get_or_insert_with(Category::fresh_var).clone());
        }

        if let Some((category, family_var)) = self.families.get(&name) {
            return Ok(match (&self.variable, family_var) {
                (None, _) => {
                    self.variable = family_var.map(|id| Category::Variable { id });
                    category.clone()
                }
                (Some(current), Some(family_id)) => {
                    let mut subst = Substitution::new();
                    subst.bind(*family_id, current.clone());
                    category.substitute(&subst)
                }
                (Some(_), None) => category.clone(),
            });
        }

        if self.primitives.iter().any(|primitive| primitive == &name) {
            return Ok(Category::primitive_with(name, restrictions));
        }
        Err(self.error(format!(
            "'{name}' is neither a family nor a primitive category"
        )))
    }
}

/// An unresolved category expression for [`LexiconBuilder`].
///
/// Leaves are names, resolved against the builder's primitives and families
/// when [`LexiconBuilder::build`] runs. `<<` and `>>` both read "points at
/// its argument": `cat("NP") << cat("N")` is `NP/N` and
/// `cat("NP") >> cat("S")` is `S\NP`.
#[derive(Debug, Clone, PartialEq)]
pub enum CatSpec {
    Name(String),
    Forward(Box<CatSpec>, Box<CatSpec>),
    Backward(Box<CatSpec>, Box<CatSpec>),
}

/// Shorthand for a named [`CatSpec`] leaf.
pub fn cat(name: impl Into<String>) -> CatSpec {
    CatSpec::Name(name.into())
}

impl From<&str> for CatSpec {
    fn from(name: &str) -> Self {
        CatSpec::Name(name.to_string())
    }
}

impl Shl for CatSpec {
    type Output = CatSpec;

    /// `X << Y` builds the forward functor `X/Y`.
    fn shl(self, argument: CatSpec) -> CatSpec {
        CatSpec::Forward(Box::new(self), Box::new(argument))
    }
}

impl Shr for CatSpec {
    type Output = CatSpec;

    /// `X >> Y` builds the backward functor `Y\X`.
    fn shr(self, result: CatSpec) -> CatSpec {
        CatSpec::Backward(Box::new(result), Box::new(self))
    }
}

/// Fluent construction of a [`Lexicon`].
///
/// # Example
///
/// ```rust
/// use ccg::lexicon::{cat, LexiconBuilder};
///
/// let lexicon = LexiconBuilder::new()
///     .primitives(["S", "NP", "N"])
///     .family("Det", cat("NP") << cat("N"))
///     .entry("the", "Det")
///     .entry("read", (cat("NP") >> cat("S")) << cat("NP"))
///     .build()
///     .unwrap();
///
/// let read = lexicon.categories("read").unwrap();
/// assert_eq!(read[0].category().to_string(), "((S\\NP)/NP)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LexiconBuilder {
    primitives: Vec<String>,
    families: Vec<(String, CatSpec)>,
    entries: Vec<(String, CatSpec, Option<Term>)>,
}

impl LexiconBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare one primitive category. The first declared primitive is the
    /// start category.
    pub fn primitive(mut self, name: impl Into<String>) -> Self {
        self.primitives.push(name.into());
        self
    }

    /// Declare several primitive categories at once.
    pub fn primitives<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.primitives.extend(names.into_iter().map(Into::into));
        self
    }

    /// Define a named category family.
    pub fn family(mut self, name: impl Into<String>, spec: impl Into<CatSpec>) -> Self {
        self.families.push((name.into(), spec.into()));
        self
    }

    /// Add a word entry without semantics.
    pub fn entry(mut self, word: impl Into<String>, spec: impl Into<CatSpec>) -> Self {
        self.entries.push((word.into(), spec.into(), None));
        self
    }

    /// Add a word entry with a semantic term.
    pub fn entry_with(
        mut self,
        word: impl Into<String>,
        spec: impl Into<CatSpec>,
        semantics: Term,
    ) -> Self {
        self.entries.push((word.into(), spec.into(), Some(semantics)));
        self
    }

    /// Resolve every name and produce the lexicon.
    pub fn build(self) -> Result<Lexicon, CcgError> {
        let start = self
            .primitives
            .first()
            .ok_or_else(|| CcgError::LexiconSyntax {
                line: 0,
                message: "no primitive categories declared".to_string(),
            })?
            .clone();

        let mut families: HashMap<String, (Category, Option<u64>)> = HashMap::new();
        for (name, spec) in &self.families {
            let category = resolve(spec, &self.primitives, &families)?;
            families.insert(name.clone(), (category, None));
        }

        let mut entries: HashMap<String, Vec<Token>> = HashMap::new();
        for (word, spec, semantics) in self.entries {
            let category = resolve(&spec, &self.primitives, &families)?;
            entries
                .entry(word.clone())
                .or_default()
                .push(Token::new(word, category, semantics));
        }

        Ok(Lexicon {
            start: Category::primitive(start),
            primitives: self.primitives,
            families,
            entries,
        })
    }
}

fn resolve(
    spec: &CatSpec,
    primitives: &[String],
    families: &HashMap<String, (Category, Option<u64>)>,
) -> Result<Category, CcgError> {
    let unknown = |name: &str| CcgError::LexiconSyntax {
        line: 0,
        message: format!("'{name}' is neither a family nor a primitive category"),
    };
    match spec {
        CatSpec::Name(name) => {
            if name == "var" {
                return Ok(Category::Variable {
                    id: fresh_variable_id(),
                });
            }
            let (base, restrictions) = match name.split_once('[') {
                None => (name.as_str(), Vec::new()),
                Some((base, rest)) => {
                    let tags = rest.strip_suffix(']').ok_or_else(|| unknown(name))?;
                    (
                        base,
                        tags.split(',').map(|tag| tag.trim().to_string()).collect(),
                    )
                }
            };
            if let Some((category, _)) = families.get(base) {
                return Ok(category.clone());
            }
            if primitives.iter().any(|primitive| primitive == base) {
                return Ok(Category::primitive_with(base, restrictions));
            }
            Err(unknown(base))
        }
        CatSpec::Forward(result, argument) => Ok(Category::forward(
            resolve(result, primitives, families)?,
            resolve(argument, primitives, families)?,
        )),
        CatSpec::Backward(result, argument) => Ok(Category::backward(
            resolve(result, primitives, families)?,
            resolve(argument, primitives, families)?,
        )),
    }
}
