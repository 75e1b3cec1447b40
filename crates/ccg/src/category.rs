//! Category Algebra: Primitives, Functions and Variables
//!
//! A CCG category is the syntactic type of a word or span:
//!
//! - **Primitive**: an atomic type such as `S`, `NP` or `N`, optionally
//!   carrying restriction tags (`N[sg]`).
//! - **Functional**: a function type `result/argument` (forward slash, takes
//!   its argument to the right) or `result\argument` (backward slash, takes
//!   its argument to the left).
//! - **Variable**: a placeholder that unifies with any category, used for
//!   polymorphic lexical entries such as conjunctions.
//!
//! Categories are immutable values: unification returns a [`Substitution`]
//! and [`Category::substitute`] produces a rewritten copy.
//!
//! # Example
//!
//! ```rust
//! use ccg::category::Category;
//!
//! // (S\NP)/NP — a transitive verb.
//! let verb = Category::forward(
//!     Category::backward(Category::primitive("S"), Category::primitive("NP")),
//!     Category::primitive("NP"),
//! );
//! assert!(verb.is_function());
//! assert!(verb.direction().is_forward());
//! assert_eq!(verb.to_string(), "((S\\NP)/NP)");
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Orientation of a functional category's slash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slash {
    /// `/` — the argument is consumed to the right.
    Forward,
    /// `\` — the argument is consumed to the left.
    Backward,
}

/// Slash orientation plus the per-occurrence rule permissions.
///
/// Two occurrences of the same slash symbol may carry different flags: the
/// lexicon writes `/,` for a slash that refuses composition and `/.` for one
/// that refuses crossing, and those permissions travel with the occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    slash: Slash,
    composable: bool,
    crossable: bool,
}

impl Direction {
    /// Create a direction with explicit permissions.
    pub fn new(slash: Slash, composable: bool, crossable: bool) -> Self {
        Self {
            slash,
            composable,
            crossable,
        }
    }

    /// An unrestricted forward slash.
    pub fn forward() -> Self {
        Self::new(Slash::Forward, true, true)
    }

    /// An unrestricted backward slash.
    pub fn backward() -> Self {
        Self::new(Slash::Backward, true, true)
    }

    /// Check if this is a forward slash.
    pub fn is_forward(&self) -> bool {
        self.slash == Slash::Forward
    }

    /// Check if this is a backward slash.
    pub fn is_backward(&self) -> bool {
        self.slash == Slash::Backward
    }

    /// Whether composition rules may use this occurrence.
    pub fn can_compose(&self) -> bool {
        self.composable
    }

    /// Whether crossing rules may use this occurrence.
    pub fn can_cross(&self) -> bool {
        self.crossable
    }

    /// The opposite orientation with the same permissions.
    pub fn flip(&self) -> Self {
        let slash = match self.slash {
            Slash::Forward => Slash::Backward,
            Slash::Backward => Slash::Forward,
        };
        Self { slash, ..*self }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slash {
            Slash::Forward => write!(f, "/")?,
            Slash::Backward => write!(f, "\\")?,
        }
        if !self.composable {
            write!(f, ",")?;
        }
        if !self.crossable {
            write!(f, ".")?;
        }
        Ok(())
    }
}

static NEXT_VARIABLE_ID: AtomicU64 = AtomicU64::new(0);

/// A syntactic category: primitive, functional or variable.
///
/// Structural equality (`PartialEq`) compares restriction tags on
/// primitives; [`Category::unify`] deliberately ignores them. The chart
/// deduplicates edges with equality while combination goes through
/// unification, so `N` and `N[sg]` combine freely but remain distinct edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// An atomic category with optional restriction tags.
    Primitive {
        name: String,
        restrictions: Vec<String>,
    },
    /// A function from `argument` to `result`, oriented by `direction`.
    Functional {
        result: Box<Category>,
        argument: Box<Category>,
        direction: Direction,
    },
    /// An unbound category variable.
    Variable { id: u64 },
}

impl Category {
    /// Create a primitive category without restriction tags.
    pub fn primitive(name: impl Into<String>) -> Self {
        Category::Primitive {
            name: name.into(),
            restrictions: Vec::new(),
        }
    }

    /// Create a primitive category with restriction tags.
    pub fn primitive_with(name: impl Into<String>, restrictions: Vec<String>) -> Self {
        Category::Primitive {
            name: name.into(),
            restrictions,
        }
    }

    /// Create a functional category.
    pub fn functional(result: Category, argument: Category, direction: Direction) -> Self {
        Category::Functional {
            result: Box::new(result),
            argument: Box::new(argument),
            direction,
        }
    }

    /// Shorthand for `result/argument`.
    pub fn forward(result: Category, argument: Category) -> Self {
        Self::functional(result, argument, Direction::forward())
    }

    /// Shorthand for `result\argument`.
    pub fn backward(result: Category, argument: Category) -> Self {
        Self::functional(result, argument, Direction::backward())
    }

    /// Create a fresh, globally unique category variable.
    pub fn fresh_var() -> Self {
        Category::Variable {
            id: NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Check if this is a primitive category.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Category::Primitive { .. })
    }

    /// Check if this is a functional category.
    pub fn is_function(&self) -> bool {
        matches!(self, Category::Functional { .. })
    }

    /// Check if this is a category variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Category::Variable { .. })
    }

    /// The result side of a functional category.
    ///
    /// # Panics
    ///
    /// Panics on non-functional categories; calling this without checking
    /// [`Category::is_function`] is a programming error.
    pub fn result(&self) -> &Category {
        match self {
            Category::Functional { result, .. } => result,
            other => panic!("result() called on non-functional category {other}"),
        }
    }

    /// The argument side of a functional category.
    ///
    /// # Panics
    ///
    /// Panics on non-functional categories.
    pub fn argument(&self) -> &Category {
        match self {
            Category::Functional { argument, .. } => argument,
            other => panic!("argument() called on non-functional category {other}"),
        }
    }

    /// The slash direction of a functional category.
    ///
    /// # Panics
    ///
    /// Panics on non-functional categories.
    pub fn direction(&self) -> Direction {
        match self {
            Category::Functional { direction, .. } => *direction,
            other => panic!("direction() called on non-functional category {other}"),
        }
    }

    /// Attempt to unify two categories, returning the variable bindings that
    /// make them identical.
    ///
    /// Primitives unify by name, ignoring restriction tags. A variable
    /// unifies with anything, binding itself. Functional categories unify
    /// componentwise when their slash orientations agree; bindings found on
    /// the result side are applied to the arguments before those are
    /// unified, and the two substitutions must agree where they overlap.
    pub fn unify(&self, other: &Category) -> Option<Substitution> {
        match (self, other) {
            (Category::Variable { id: a }, Category::Variable { id: b }) if a == b => {
                Some(Substitution::new())
            }
            (Category::Variable { id }, _) => {
                let mut subst = Substitution::new();
                subst.bind(*id, other.clone());
                Some(subst)
            }
            (_, Category::Variable { id }) => {
                let mut subst = Substitution::new();
                subst.bind(*id, self.clone());
                Some(subst)
            }
            (Category::Primitive { name: a, .. }, Category::Primitive { name: b, .. }) => {
                (a == b).then(Substitution::new)
            }
            (
                Category::Functional {
                    result: ra,
                    argument: aa,
                    direction: da,
                },
                Category::Functional {
                    result: rb,
                    argument: ab,
                    direction: db,
                },
            ) => {
                if da.is_forward() != db.is_forward() {
                    return None;
                }
                let subst = ra.unify(rb)?;
                let more = aa.substitute(&subst).unify(&ab.substitute(&subst))?;
                subst.merge(more)
            }
            _ => None,
        }
    }

    /// Rewrite every bound variable in this category, recursively.
    ///
    /// Unbound variables and primitives pass through unchanged.
    pub fn substitute(&self, subst: &Substitution) -> Category {
        if subst.is_empty() {
            return self.clone();
        }
        match self {
            Category::Primitive { .. } => self.clone(),
            Category::Variable { id } => subst
                .lookup(*id)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Category::Functional {
                result,
                argument,
                direction,
            } => Category::Functional {
                result: Box::new(result.substitute(subst)),
                argument: Box::new(argument.substitute(subst)),
                direction: *direction,
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Primitive { name, restrictions } => {
                write!(f, "{name}")?;
                if !restrictions.is_empty() {
                    write!(f, "[{}]", restrictions.join(","))?;
                }
                Ok(())
            }
            Category::Functional {
                result,
                argument,
                direction,
            } => write!(f, "({result}{direction}{argument})"),
            Category::Variable { id } => write!(f, "_{id}"),
        }
    }
}

/// A mapping from variable ids to categories, produced by unification.
///
/// Bindings are ordered by discovery; [`Substitution::bind`] rejects a
/// binding that disagrees with an earlier one for the same variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    bindings: Vec<(u64, Category)>,
}

impl Substitution {
    /// The empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no variables are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Look up the binding for a variable id.
    pub fn lookup(&self, id: u64) -> Option<&Category> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == id)
            .map(|(_, category)| category)
    }

    /// Bind a variable, returning `false` if it is already bound to a
    /// different category.
    pub fn bind(&mut self, id: u64, category: Category) -> bool {
        match self.lookup(id) {
            Some(existing) => *existing == category,
            None => {
                self.bindings.push((id, category));
                true
            }
        }
    }

    /// Merge two substitutions; fails when they disagree on a variable.
    pub fn merge(mut self, other: Substitution) -> Option<Substitution> {
        for (id, category) in other.bindings {
            if !self.bind(id, category) {
                return None;
            }
        }
        Some(self)
    }
}
