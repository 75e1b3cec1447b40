//! Semantic Composition per Combinator
//!
//! While the chart combines categories, derivation extraction combines the
//! children's lambda terms in lockstep. Each combinator has its own
//! composition recipe; backward rules swap the function and argument terms
//! first, matching the operand swap on the syntactic side. Type-raising is
//! unary and never swaps.
//!
//! A child without a term makes the parent term absent (syntax-only
//! derivations keep flowing). A child term whose shape contradicts the
//! combinator that fired is a lexicon bug, reported as
//! [`CcgError::MalformedSemantics`].

use std::collections::HashSet;

use crate::combinator::{Combinator, Rule};
use crate::derivation::Derivation;
use crate::error::CcgError;
use crate::logic::{fresh_variable, Term};

/// Compose the semantic term for a derivation node from its children.
pub(crate) fn compose(rule: &Rule, children: &[Derivation]) -> Result<Option<Term>, CcgError> {
    let terms: Option<Vec<&Term>> = children.iter().map(Derivation::semantics).collect();
    let Some(terms) = terms else {
        return Ok(None);
    };

    if rule.is_type_raise() {
        return Ok(Some(type_raised(terms[0])));
    }

    let (function, argument) = if rule.is_backward() {
        (terms[1], terms[0])
    } else {
        (terms[0], terms[1])
    };

    let malformed = |term: &Term| CcgError::MalformedSemantics {
        rule: rule.symbol().to_string(),
        term: term.to_string(),
    };

    let composed = match rule.combinator() {
        Combinator::Application => {
            Term::apply(function.clone(), argument.clone()).simplify()
        }
        Combinator::Composition => {
            // X/Y Y/Z: the argument term abstracts over Z; compose inside it.
            let Term::Lambda { parameter, body } = argument else {
                return Err(malformed(argument));
            };
            Term::lambda(
                parameter.clone(),
                Term::apply(function.clone(), (**body).clone()).simplify(),
            )
        }
        Combinator::Substitution => {
            // (X/Y)/Z Y/Z: both operands abstract over Z; thread the shared
            // argument through both before recombining.
            let Term::Lambda { parameter, body } = function else {
                return Err(malformed(function));
            };
            if !matches!(**body, Term::Lambda { .. }) {
                return Err(malformed(function));
            }
            if !matches!(argument, Term::Lambda { .. }) {
                return Err(malformed(argument));
            }
            let shared = Term::variable(parameter.clone());
            let new_argument = Term::apply(argument.clone(), shared).simplify();
            let new_body = Term::apply((**body).clone(), new_argument).simplify();
            Term::lambda(parameter.clone(), new_body)
        }
        Combinator::TypeRaise => unreachable!("handled above"),
    };
    Ok(Some(composed))
}

/// Lift a term `t` to `\F.F(t)`, choosing `F` away from `t`'s free names.
fn type_raised(term: &Term) -> Term {
    let avoid: HashSet<String> = term.free_variables();
    let raised = fresh_variable("F", &avoid);
    Term::lambda(
        raised.clone(),
        Term::apply(Term::variable(raised), term.clone()),
    )
}
