//! Combinators and Directional Rules
//!
//! CCG derivations are licensed by a small fixed algebra of combinators:
//!
//! - **Application**: `X/Y Y -> X` (and the mirrored backward form)
//! - **Composition**: `X/Y Y/Z -> X/Z` (harmonic and crossed variations)
//! - **Substitution**: `(X/Y)/Z Y/Z -> X/Z` (and crossed variations)
//! - **Type-raising**: `X -> Y/(Y\X)` (lifting an argument over its functor)
//!
//! Each [`Combinator`] is undirected: it takes a designated function operand
//! and argument operand and makes no assumption about which side of the
//! string either came from. A [`Rule`] wraps a combinator with an operand
//! order (backward rules swap left and right before delegating) and a
//! predicate restricting when it may fire; the predicate always sees the
//! operands in string order.
//!
//! # Example
//!
//! ```rust
//! use ccg::category::Category;
//! use ccg::combinator::FORWARD_APPLICATION;
//!
//! let s = Category::primitive("S");
//! let np = Category::primitive("NP");
//! let verb_phrase = Category::forward(s.clone(), np.clone());
//!
//! assert!(FORWARD_APPLICATION.can_combine(&verb_phrase, &np));
//! assert_eq!(FORWARD_APPLICATION.combine(&verb_phrase, &np), Some(s));
//! ```

use std::fmt;

use crate::category::Category;

/// The four undirected combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Application,
    Composition,
    Substitution,
    TypeRaise,
}

impl Combinator {
    /// Check whether the function operand can combine with the argument
    /// operand under this combinator.
    pub fn can_combine(&self, function: &Category, argument: &Category) -> bool {
        match self {
            Combinator::Application => {
                function.is_function() && function.argument().unify(argument).is_some()
            }
            Combinator::Composition => {
                function.is_function()
                    && argument.is_function()
                    && function.direction().can_compose()
                    && argument.direction().can_compose()
                    && function.argument().unify(argument.result()).is_some()
            }
            Combinator::Substitution => {
                function.is_function()
                    && argument.is_function()
                    && function.result().is_function()
                    && function.argument().is_primitive()
                    && function.direction().can_compose()
                    && argument.direction().can_compose()
                    // Substitution requires shared arguments by structural
                    // equality, not unification.
                    && function.result().argument() == argument.result()
                    && function.argument() == argument.argument()
            }
            Combinator::TypeRaise => {
                // The operand being raised must be primitive, and the functor
                // must nest at least two applications: raising against a
                // simple functor only reproduces plain application.
                if !(function.is_primitive()
                    && argument.is_function()
                    && argument.result().is_function())
                {
                    return false;
                }
                let inner = innermost_function(argument);
                function.unify(inner.argument()).is_some()
            }
        }
    }

    /// Combine the operands, producing the derived category if the
    /// combinator applies.
    pub fn combine(&self, function: &Category, argument: &Category) -> Option<Category> {
        match self {
            Combinator::Application => {
                if !function.is_function() {
                    return None;
                }
                let subst = function.argument().unify(argument)?;
                Some(function.result().substitute(&subst))
            }
            Combinator::Composition => {
                if !(function.is_function() && argument.is_function()) {
                    return None;
                }
                if !(function.direction().can_compose() && argument.direction().can_compose()) {
                    return None;
                }
                let subst = function.argument().unify(argument.result())?;
                Some(Category::functional(
                    function.result().substitute(&subst),
                    argument.argument().substitute(&subst),
                    argument.direction(),
                ))
            }
            Combinator::Substitution => {
                if !self.can_combine(function, argument) {
                    return None;
                }
                Some(Category::functional(
                    function.result().result().clone(),
                    argument.argument().clone(),
                    argument.direction(),
                ))
            }
            Combinator::TypeRaise => {
                if !(function.is_primitive()
                    && argument.is_function()
                    && argument.result().is_function())
                {
                    return None;
                }
                // Raising matches only the innermost application.
                let inner = innermost_function(argument);
                let subst = function.unify(inner.argument())?;
                let raised = inner.result().substitute(&subst);
                Some(Category::functional(
                    raised.clone(),
                    Category::functional(raised, function.clone(), inner.direction()),
                    inner.direction().flip(),
                ))
            }
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Application => Ok(()),
            Combinator::Composition => write!(f, "B"),
            Combinator::Substitution => write!(f, "S"),
            Combinator::TypeRaise => write!(f, "T"),
        }
    }
}

/// Descend through result categories to the innermost functional category,
/// e.g. `(N\N)/(S/NP) => N\N`.
///
/// # Panics
///
/// Panics if `category` is not functional.
pub fn innermost_function(category: &Category) -> &Category {
    let mut current = category;
    while current.result().is_function() {
        current = current.result();
    }
    current
}

/// A directional rule: an undirected combinator, an operand order, and an
/// applicability predicate.
///
/// Backward rules hand the operands to the combinator in swapped order, but
/// the predicate is always evaluated on the operands as they appear in the
/// string. Rules are plain immutable records; the standard English rule sets
/// below are ordinary constants passed explicitly into the chart engine.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    combinator: Combinator,
    swap: bool,
    predicate: fn(&Category, &Category) -> bool,
    symbol: &'static str,
}

impl Rule {
    /// The underlying undirected combinator.
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Whether this rule treats the right operand as the primary functor.
    pub fn is_backward(&self) -> bool {
        self.swap
    }

    /// Whether this is a unary type-raising rule.
    pub fn is_type_raise(&self) -> bool {
        self.combinator == Combinator::TypeRaise
    }

    /// The display symbol used in derivations, e.g. `>` or `<Bx`.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    fn ordered<'a>(&self, left: &'a Category, right: &'a Category) -> (&'a Category, &'a Category) {
        if self.swap {
            (right, left)
        } else {
            (left, right)
        }
    }

    /// Check whether this rule may combine two adjacent categories.
    pub fn can_combine(&self, left: &Category, right: &Category) -> bool {
        let (function, argument) = self.ordered(left, right);
        self.combinator.can_combine(function, argument) && (self.predicate)(left, right)
    }

    /// Combine two adjacent categories, yielding at most one category.
    ///
    /// Callers must check [`Rule::can_combine`] first; invoking `combine`
    /// on an inapplicable pair is a programming error.
    pub fn combine(&self, left: &Category, right: &Category) -> Option<Category> {
        debug_assert!(
            self.can_combine(left, right),
            "combine() called without checking can_combine()"
        );
        let (function, argument) = self.ordered(left, right);
        self.combinator.combine(function, argument)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

// Applicability predicates. All of them are total: each guards its own
// structural assumptions instead of relying on evaluation order.

/// The left operand is a forward functor.
fn forward_only(left: &Category, _right: &Category) -> bool {
    left.is_function() && left.direction().is_forward()
}

/// The right operand is a backward functor.
fn backward_only(_left: &Category, right: &Category) -> bool {
    right.is_function() && right.direction().is_backward()
}

fn both_forward(left: &Category, right: &Category) -> bool {
    left.is_function()
        && right.is_function()
        && left.direction().is_forward()
        && right.direction().is_forward()
}

/// The functors point inwards at each other.
fn crossed_directions(left: &Category, right: &Category) -> bool {
    left.is_function()
        && right.is_function()
        && left.direction().is_forward()
        && right.direction().is_backward()
}

/// Backward crossed composition: inward-pointing functors, both slashes
/// permit crossing, and the resulting argument category is primitive.
fn backward_bx_constraint(left: &Category, right: &Category) -> bool {
    crossed_directions(left, right)
        && left.direction().can_cross()
        && right.direction().can_cross()
        && left.argument().is_primitive()
}

fn forward_substitution_constraint(left: &Category, right: &Category) -> bool {
    both_forward(left, right)
        && left.result().is_function()
        && left.result().direction().is_forward()
        && left.argument().is_primitive()
}

fn backward_sx_constraint(left: &Category, right: &Category) -> bool {
    both_forward(left, right)
        && left.direction().can_cross()
        && right.direction().can_cross()
        && right.result().is_function()
        && right.result().direction().is_backward()
        && right.argument().is_primitive()
}

// Type-raising constraints: the direction of the innermost category must be
// towards the primary functor, and its result must be primitive. The latter
// restriction is not common to all formulations of CCG, but it keeps raising
// from generating categories plain application already covers.

fn forward_type_raise_constraint(_left: &Category, right: &Category) -> bool {
    if !(right.is_function() && right.result().is_function()) {
        return false;
    }
    let inner = innermost_function(right);
    inner.direction().is_backward() && inner.result().is_primitive()
}

fn backward_type_raise_constraint(left: &Category, _right: &Category) -> bool {
    if !(left.is_function() && left.result().is_function()) {
        return false;
    }
    let inner = innermost_function(left);
    inner.direction().is_forward() && inner.result().is_primitive()
}

/// Forward application: `X/Y Y -> X`.
pub const FORWARD_APPLICATION: Rule = Rule {
    combinator: Combinator::Application,
    swap: false,
    predicate: forward_only,
    symbol: ">",
};

/// Backward application: `Y X\Y -> X`.
pub const BACKWARD_APPLICATION: Rule = Rule {
    combinator: Combinator::Application,
    swap: true,
    predicate: backward_only,
    symbol: "<",
};

/// Forward harmonic composition: `X/Y Y/Z -> X/Z`.
pub const FORWARD_COMPOSITION: Rule = Rule {
    combinator: Combinator::Composition,
    swap: false,
    predicate: forward_only,
    symbol: ">B",
};

/// Backward harmonic composition: `Y\Z X\Y -> X\Z`.
pub const BACKWARD_COMPOSITION: Rule = Rule {
    combinator: Combinator::Composition,
    swap: true,
    predicate: backward_only,
    symbol: "<B",
};

/// Backward crossed composition: `Y/Z X\Y -> X/Z`.
pub const BACKWARD_BX: Rule = Rule {
    combinator: Combinator::Composition,
    swap: true,
    predicate: backward_bx_constraint,
    symbol: "<Bx",
};

/// Forward substitution: `(X/Y)/Z Y/Z -> X/Z`.
pub const FORWARD_SUBSTITUTION: Rule = Rule {
    combinator: Combinator::Substitution,
    swap: false,
    predicate: forward_substitution_constraint,
    symbol: ">S",
};

/// Backward crossed substitution: `Y/Z (X\Y)/Z -> X/Z`.
pub const BACKWARD_SX: Rule = Rule {
    combinator: Combinator::Substitution,
    swap: true,
    predicate: backward_sx_constraint,
    symbol: "<Sx",
};

/// Forward type-raising: `X -> Y/(Y\X)`.
pub const FORWARD_TYPE_RAISE: Rule = Rule {
    combinator: Combinator::TypeRaise,
    swap: false,
    predicate: forward_type_raise_constraint,
    symbol: ">T",
};

/// Backward type-raising: `X -> Y\(Y/X)`.
pub const BACKWARD_TYPE_RAISE: Rule = Rule {
    combinator: Combinator::TypeRaise,
    swap: true,
    predicate: backward_type_raise_constraint,
    symbol: "<T",
};

/// Forward and backward application only.
pub const APPLICATION_RULES: &[Rule] = &[FORWARD_APPLICATION, BACKWARD_APPLICATION];

/// Harmonic composition plus backward crossed composition.
pub const COMPOSITION_RULES: &[Rule] = &[FORWARD_COMPOSITION, BACKWARD_COMPOSITION, BACKWARD_BX];

/// Forward substitution plus backward crossed substitution.
pub const SUBSTITUTION_RULES: &[Rule] = &[FORWARD_SUBSTITUTION, BACKWARD_SX];

/// Forward and backward type-raising.
pub const TYPE_RAISE_RULES: &[Rule] = &[FORWARD_TYPE_RAISE, BACKWARD_TYPE_RAISE];

/// The standard English rule set.
pub const DEFAULT_RULES: &[Rule] = &[
    FORWARD_APPLICATION,
    BACKWARD_APPLICATION,
    FORWARD_COMPOSITION,
    BACKWARD_COMPOSITION,
    BACKWARD_BX,
    FORWARD_SUBSTITUTION,
    BACKWARD_SX,
    FORWARD_TYPE_RAISE,
    BACKWARD_TYPE_RAISE,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Direction;

    fn prim(name: &str) -> Category {
        Category::primitive(name)
    }

    #[test]
    fn test_application_combinability_matches_unification() {
        // Application combines exactly when the left operand is a functor
        // whose argument unifies with the right operand.
        let samples = [
            prim("X"),
            Category::forward(prim("X"), prim("Y")),
            Category::backward(prim("X"), prim("Y")),
            Category::forward(prim("X"), Category::fresh_var()),
        ];
        for function in &samples {
            for argument in &samples {
                let expected = function.is_function()
                    && function.argument().unify(argument).is_some();
                assert_eq!(
                    Combinator::Application.can_combine(function, argument),
                    expected,
                    "{function} applied to {argument}"
                );
            }
        }
    }

    #[test]
    fn test_application_result_substitutes_bindings() {
        let var = Category::fresh_var();
        let function = Category::forward(var.clone(), var);
        let result = Combinator::Application.combine(&function, &prim("NP"));
        assert_eq!(result, Some(prim("NP")));
    }

    #[test]
    fn test_composition_takes_argument_and_direction_from_argument_operand() {
        let function = Category::forward(prim("X"), prim("Y"));

        for argument in [
            Category::forward(prim("Y"), prim("Z")),
            Category::backward(prim("Y"), prim("Z")),
        ] {
            assert!(Combinator::Composition.can_combine(&function, &argument));
            let result = Combinator::Composition.combine(&function, &argument).unwrap();
            assert_eq!(result.argument(), argument.argument());
            assert_eq!(result.direction(), argument.direction());
            assert_eq!(result.result(), &prim("X"));
        }
    }

    #[test]
    fn test_composition_respects_composable_flag() {
        let restricted = Direction::new(crate::category::Slash::Forward, false, true);
        let function = Category::functional(prim("X"), prim("Y"), restricted);
        let argument = Category::forward(prim("Y"), prim("Z"));
        assert!(!Combinator::Composition.can_combine(&function, &argument));
    }

    #[test]
    fn test_substitution_requires_structural_equality() {
        // (X/Y)/Z Y/Z -> X/Z
        let function = Category::forward(
            Category::forward(prim("X"), prim("Y")),
            prim("Z"),
        );
        let argument = Category::forward(prim("Y"), prim("Z"));
        assert!(Combinator::Substitution.can_combine(&function, &argument));
        assert_eq!(
            Combinator::Substitution.combine(&function, &argument),
            Some(Category::forward(prim("X"), prim("Z")))
        );

        // A variable argument would unify but is not structurally equal.
        let mismatched = Category::forward(prim("Y"), Category::fresh_var());
        assert!(!Combinator::Substitution.can_combine(&function, &mismatched));
    }

    #[test]
    fn test_type_raise_uses_innermost_function() {
        // Raising NP against (S\NP)/NP matches the S\NP application.
        let verb = Category::forward(
            Category::backward(prim("S"), prim("NP")),
            prim("NP"),
        );
        let raised = Combinator::TypeRaise.combine(&prim("NP"), &verb).unwrap();
        assert_eq!(
            raised,
            Category::forward(
                prim("S"),
                Category::backward(prim("S"), prim("NP")),
            )
        );
    }

    #[test]
    fn test_type_raise_needs_nested_functor() {
        // Against a simple functor, raising is redundant and refused.
        let simple = Category::backward(prim("S"), prim("NP"));
        assert!(!Combinator::TypeRaise.can_combine(&prim("NP"), &simple));
    }

    #[test]
    fn test_backward_rules_swap_operands_but_not_predicates() {
        let np = prim("NP");
        let verb_phrase = Category::backward(prim("S"), prim("NP"));

        assert!(BACKWARD_APPLICATION.can_combine(&np, &verb_phrase));
        assert_eq!(
            BACKWARD_APPLICATION.combine(&np, &verb_phrase),
            Some(prim("S"))
        );
        // The mirrored order satisfies neither the predicate nor the swap.
        assert!(!BACKWARD_APPLICATION.can_combine(&verb_phrase, &np));
    }

    #[test]
    fn test_backward_crossed_composition() {
        // Y/Z X\Y -> X/Z
        let left = Category::forward(prim("Y"), prim("Z"));
        let right = Category::backward(prim("X"), prim("Y"));
        assert!(BACKWARD_BX.can_combine(&left, &right));
        assert_eq!(
            BACKWARD_BX.combine(&left, &right),
            Some(Category::forward(prim("X"), prim("Z")))
        );
        // Harmonic pairs are left to plain composition.
        let harmonic = Category::forward(prim("X"), prim("Y"));
        assert!(!BACKWARD_BX.can_combine(&left, &harmonic));
    }

    #[test]
    fn test_innermost_function() {
        let nested = Category::forward(
            Category::backward(prim("N"), prim("N")),
            Category::forward(prim("S"), prim("NP")),
        );
        assert_eq!(
            innermost_function(&nested),
            &Category::backward(prim("N"), prim("N"))
        );
    }
}
