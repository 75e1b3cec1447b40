//! Lambda Terms for Compositional Semantics
//!
//! Lexical entries may carry a logical term alongside their category; the
//! parser composes those terms as it combines categories. This module is the
//! term language: constants, variables, application and abstraction, with
//! beta reduction to normal form and capture-avoiding substitution.
//!
//! Terms are written the way lexicons write them: `\x.x` is the identity,
//! `\x y.eat(x,y)` abbreviates nested abstractions, and `read(book)` is
//! application. Free names that look like variables (a lowercase letter
//! optionally followed by digits) parse as variables, everything else as
//! constants.
//!
//! # Example
//!
//! ```rust
//! use ccg::logic::Term;
//!
//! let the: Term = "\\x.x".parse().unwrap();
//! let book: Term = "book".parse().unwrap();
//!
//! let applied = Term::apply(the, book).simplify();
//! assert_eq!(applied.to_string(), "book");
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::CcgError;

/// A logical term in the untyped lambda calculus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named constant, e.g. `book`.
    Constant(String),
    /// A variable, bound or free.
    Variable(String),
    /// Application of a function term to an argument term.
    Application {
        function: Box<Term>,
        argument: Box<Term>,
    },
    /// Abstraction over one parameter.
    Lambda { parameter: String, body: Box<Term> },
}

impl Term {
    /// Create a constant.
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    /// Create a variable.
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// Apply a function term to an argument term (unreduced).
    pub fn apply(function: Term, argument: Term) -> Self {
        Term::Application {
            function: Box::new(function),
            argument: Box::new(argument),
        }
    }

    /// Abstract over a parameter.
    pub fn lambda(parameter: impl Into<String>, body: Term) -> Self {
        Term::Lambda {
            parameter: parameter.into(),
            body: Box::new(body),
        }
    }

    /// Beta-reduce this term to normal form.
    pub fn simplify(&self) -> Term {
        match self {
            Term::Constant(_) | Term::Variable(_) => self.clone(),
            Term::Lambda { parameter, body } => Term::lambda(parameter.clone(), body.simplify()),
            Term::Application { function, argument } => {
                let function = function.simplify();
                if let Term::Lambda { parameter, body } = function {
                    body.replace(&parameter, argument).simplify()
                } else {
                    Term::apply(function, argument.simplify())
                }
            }
        }
    }

    /// The set of variable names occurring free in this term.
    pub fn free_variables(&self) -> HashSet<String> {
        match self {
            Term::Constant(_) => HashSet::new(),
            Term::Variable(name) => HashSet::from([name.clone()]),
            Term::Application { function, argument } => {
                let mut free = function.free_variables();
                free.extend(argument.free_variables());
                free
            }
            Term::Lambda { parameter, body } => {
                let mut free = body.free_variables();
                free.remove(parameter);
                free
            }
        }
    }

    /// Capture-avoiding substitution of `value` for the free variable `name`.
    fn replace(&self, name: &str, value: &Term) -> Term {
        match self {
            Term::Constant(_) => self.clone(),
            Term::Variable(v) => {
                if v == name {
                    value.clone()
                } else {
                    self.clone()
                }
            }
            Term::Application { function, argument } => Term::apply(
                function.replace(name, value),
                argument.replace(name, value),
            ),
            Term::Lambda { parameter, body } => {
                if parameter == name {
                    return self.clone();
                }
                if value.free_variables().contains(parameter) {
                    // Alpha-rename the binder so the incoming term's free
                    // variables are not captured.
                    let mut avoid = value.free_variables();
                    avoid.extend(body.free_variables());
                    avoid.insert(name.to_string());
                    let renamed = fresh_variable(parameter, &avoid);
                    let body = body.replace(parameter, &Term::Variable(renamed.clone()));
                    Term::lambda(renamed, body.replace(name, value))
                } else {
                    Term::lambda(parameter.clone(), body.replace(name, value))
                }
            }
        }
    }
}

/// Generate a variable name based on `base` that avoids the given set.
///
/// Deterministic: tries `base`, then `base1`, `base2`, and so on.
pub fn fresh_variable(base: &str, avoid: &HashSet<String>) -> String {
    if !avoid.contains(base) {
        return base.to_string();
    }
    let mut suffix = 1usize;
    loop {
        let candidate = format!("{base}{suffix}");
        if !avoid.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(name) | Term::Variable(name) => write!(f, "{name}"),
            Term::Lambda { .. } => {
                // Collapse chains of abstractions: \x y.body
                write!(f, "\\")?;
                let mut current = self;
                let mut first = true;
                loop {
                    match current {
                        Term::Lambda { parameter, body } => {
                            if !first {
                                write!(f, " ")?;
                            }
                            write!(f, "{parameter}")?;
                            first = false;
                            current = &**body;
                        }
                        other => {
                            return write!(f, ".{other}");
                        }
                    }
                }
            }
            Term::Application { .. } => {
                // Collect the application spine: f(a,b) instead of f(a)(b).
                let mut arguments = Vec::new();
                let mut head = self;
                while let Term::Application { function, argument } = head {
                    arguments.push(argument);
                    head = &**function;
                }
                arguments.reverse();
                match head {
                    Term::Lambda { .. } => write!(f, "({head})")?,
                    other => write!(f, "{other}")?,
                }
                write!(f, "(")?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl FromStr for Term {
    type Err = CcgError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut parser = ExprParser::new(source);
        let term = parser.term()?;
        parser.skip_whitespace();
        if parser.position < parser.chars.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(term)
    }
}

/// Free names that look like individual variables: a lowercase letter
/// optionally followed by digits (`x`, `y2`).
fn looks_like_variable(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase()) && chars.all(|c| c.is_ascii_digit())
}

struct ExprParser<'a> {
    source: &'a str,
    chars: Vec<char>,
    position: usize,
    scope: Vec<String>,
}

impl<'a> ExprParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            position: 0,
            scope: Vec::new(),
        }
    }

    fn error(&self, message: impl Into<String>) -> CcgError {
        CcgError::InvalidExpression {
            expression: self.source.to_string(),
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

    fn identifier(&mut self) -> Option<String> {
        self.skip_whitespace();
        let start = self.position;
        if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic() || c == '_') {
            self.position += 1;
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '\'')
            {
                self.position += 1;
            }
            Some(self.chars[start..self.position].iter().collect())
        } else {
            None
        }
    }

    fn term(&mut self) -> Result<Term, CcgError> {
        self.skip_whitespace();
        if self.eat('\\') {
            let mut parameters = Vec::new();
            while let Some(parameter) = self.identifier() {
                parameters.push(parameter);
            }
            if parameters.is_empty() {
                return Err(self.error("expected a parameter after '\\'"));
            }
            self.skip_whitespace();
            if !self.eat('.') {
                return Err(self.error("expected '.' after lambda parameters"));
            }
            let depth = self.scope.len();
            self.scope.extend(parameters.iter().cloned());
            let body = self.term()?;
            self.scope.truncate(depth);
            Ok(parameters
                .into_iter()
                .rev()
                .fold(body, |body, parameter| Term::lambda(parameter, body)))
        } else {
            self.applied()
        }
    }

    fn applied(&mut self) -> Result<Term, CcgError> {
        let mut head = self.atom()?;
        loop {
            self.skip_whitespace();
            if !self.eat('(') {
                return Ok(head);
            }
            loop {
                let argument = self.term()?;
                head = Term::apply(head, argument);
                self.skip_whitespace();
                if self.eat(',') {
                    continue;
                }
                if self.eat(')') {
                    break;
                }
                return Err(self.error("expected ',' or ')' in argument list"));
            }
        }
    }

    fn atom(&mut self) -> Result<Term, CcgError> {
        self.skip_whitespace();
        if self.eat('(') {
            let term = self.term()?;
            self.skip_whitespace();
            if !self.eat(')') {
                return Err(self.error("unbalanced parentheses"));
            }
            return Ok(term);
        }
        match self.identifier() {
            Some(name) => {
                if self.scope.contains(&name) || looks_like_variable(&name) {
                    Ok(Term::Variable(name))
                } else {
                    Ok(Term::Constant(name))
                }
            }
            None => Err(self.error("expected an identifier")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(source: &str) -> Term {
        source.parse().unwrap()
    }

    #[test]
    fn test_parse_identity() {
        assert_eq!(
            parsed("\\x.x"),
            Term::lambda("x", Term::variable("x"))
        );
    }

    #[test]
    fn test_parse_multi_parameter_sugar() {
        assert_eq!(
            parsed("\\x y.eat(x,y)"),
            Term::lambda(
                "x",
                Term::lambda(
                    "y",
                    Term::apply(
                        Term::apply(Term::constant("eat"), Term::variable("x")),
                        Term::variable("y")
                    )
                )
            )
        );
    }

    #[test]
    fn test_parse_free_names() {
        // Multi-letter free names are constants, short ones variables.
        assert_eq!(parsed("book"), Term::constant("book"));
        assert_eq!(parsed("x"), Term::variable("x"));
        assert_eq!(parsed("y2"), Term::variable("y2"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("\\.x".parse::<Term>().is_err());
        assert!("f(x".parse::<Term>().is_err());
        assert!("f(x))".parse::<Term>().is_err());
        assert!("".parse::<Term>().is_err());
    }

    #[test]
    fn test_beta_reduction() {
        let term = Term::apply(parsed("\\x.read(x)"), parsed("book"));
        assert_eq!(term.simplify(), parsed("read(book)"));
    }

    #[test]
    fn test_reduction_under_binders() {
        let term = Term::lambda("y", Term::apply(parsed("\\x.x"), Term::variable("y")));
        assert_eq!(term.simplify(), parsed("\\y.y"));
    }

    #[test]
    fn test_capture_avoiding_substitution() {
        // (\x.\y.x)(y) must not capture the free y.
        let term = Term::apply(parsed("\\x.\\y.x"), Term::variable("y"));
        let reduced = term.simplify();
        let Term::Lambda { parameter, body } = &reduced else {
            panic!("expected a lambda, got {reduced}");
        };
        assert_ne!(parameter, "y");
        assert_eq!(**body, Term::variable("y"));
    }

    #[test]
    fn test_free_variables() {
        let term = parsed("\\x.eat(x,y)");
        let free = term.free_variables();
        assert!(free.contains("y"));
        assert!(!free.contains("x"));
        assert!(!free.contains("eat"));
    }

    #[test]
    fn test_fresh_variable_is_deterministic() {
        let avoid: HashSet<String> = ["F".to_string(), "F1".to_string()].into();
        assert_eq!(fresh_variable("F", &avoid), "F2");
        assert_eq!(fresh_variable("G", &avoid), "G");
    }

    #[test]
    fn test_display_round_trip() {
        for source in ["\\x.x", "read(book)", "\\x y.eat(x,y)", "\\F.F(read)"] {
            assert_eq!(parsed(source).to_string(), source);
        }
    }
}
