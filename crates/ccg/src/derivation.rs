//! Derivation Trees
//!
//! The chart stores ambiguity packed: one edge per distinct (category, rule)
//! pair per span, each carrying every child combination that produced it.
//! This module unpacks edges into explicit [`Derivation`] trees, one per
//! reading, composing semantic terms at each internal node.
//!
//! Expansion memoizes per edge. Packed charts share subtrees across
//! exponentially many readings, so re-expanding an edge for every parent
//! would defeat the packing.

use std::collections::HashMap;

use crate::category::Category;
use crate::chart::{Chart, EdgeId, EdgeKind, Span};
use crate::error::CcgError;
use crate::lexicon::Token;
use crate::logic::Term;
use crate::semantics;

/// One node of a derivation tree.
///
/// Leaves carry the surface word; internal nodes carry the display symbol of
/// the rule that produced them (`>`, `<B`, ...) and their children in
/// left-to-right surface order.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    span: Span,
    category: Category,
    symbol: &'static str,
    semantics: Option<Term>,
    word: Option<String>,
    children: Vec<Derivation>,
}

impl Derivation {
    pub(crate) fn leaf(span: Span, token: Token) -> Self {
        Self {
            span,
            category: token.category().clone(),
            symbol: "",
            semantics: token.semantics().cloned(),
            word: Some(token.word().to_string()),
            children: Vec::new(),
        }
    }

    pub(crate) fn node(
        span: Span,
        category: Category,
        symbol: &'static str,
        semantics: Option<Term>,
        children: Vec<Derivation>,
    ) -> Self {
        Self {
            span,
            category,
            symbol,
            semantics,
            word: None,
            children,
        }
    }

    /// The half-open token span this node covers.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The category derived for this node.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// The producing rule's display symbol; empty for leaves.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// The composed semantic term, if every contributing leaf had one.
    pub fn semantics(&self) -> Option<&Term> {
        self.semantics.as_ref()
    }

    /// The surface word for leaves.
    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// Child nodes in left-to-right surface order.
    pub fn children(&self) -> &[Derivation] {
        &self.children
    }

    /// Check if this node is a lexical leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// All leaves, left to right. Concatenating their words reproduces the
    /// parsed token sequence.
    pub fn leaves(&self) -> Vec<&Derivation> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Derivation>) {
        if self.is_leaf() {
            leaves.push(self);
            return;
        }
        for child in &self.children {
            child.collect_leaves(leaves);
        }
    }
}

/// Expand one edge into all of its derivation trees.
pub(crate) fn expand(
    chart: &Chart,
    id: EdgeId,
    memo: &mut HashMap<EdgeId, Vec<Derivation>>,
) -> Result<Vec<Derivation>, CcgError> {
    if let Some(done) = memo.get(&id) {
        return Ok(done.clone());
    }
    let edge = chart.edge(id);
    let derivations = match &edge.kind {
        EdgeKind::Leaf(token) => vec![Derivation::leaf(edge.span(), token.clone())],
        EdgeKind::Derived { rule, alternatives } => {
            let mut results = Vec::new();
            for child_ids in alternatives {
                let mut expanded = Vec::with_capacity(child_ids.len());
                for child in child_ids {
                    expanded.push(expand(chart, *child, memo)?);
                }
                for children in cross_product(&expanded) {
                    let semantics = semantics::compose(rule, &children)?;
                    results.push(Derivation::node(
                        edge.span(),
                        edge.category().clone(),
                        rule.symbol(),
                        semantics,
                        children,
                    ));
                }
            }
            results
        }
    };
    memo.insert(id, derivations.clone());
    Ok(derivations)
}

/// Every way of picking one derivation per child slot, preserving order.
fn cross_product(choices: &[Vec<Derivation>]) -> Vec<Vec<Derivation>> {
    let mut combos: Vec<Vec<Derivation>> = vec![Vec::new()];
    for options in choices {
        let mut grown = Vec::with_capacity(combos.len() * options.len());
        for combo in &combos {
            for option in options {
                let mut next = combo.clone();
                next.push(option.clone());
                grown.push(next);
            }
        }
        combos = grown;
    }
    combos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_leaf(word: &str, position: usize) -> Derivation {
        Derivation::leaf(
            (position, position + 1),
            Token::new(word, Category::primitive("NP"), None),
        )
    }

    #[test]
    fn test_leaves_in_surface_order() {
        let left = word_leaf("I", 0);
        let right = Derivation::node(
            (1, 3),
            Category::primitive("S"),
            ">",
            None,
            vec![word_leaf("like", 1), word_leaf("tea", 2)],
        );
        let root = Derivation::node(
            (0, 3),
            Category::primitive("S"),
            "<",
            None,
            vec![left, right],
        );

        let words: Vec<&str> = root
            .leaves()
            .iter()
            .filter_map(|leaf| leaf.word())
            .collect();
        assert_eq!(words, ["I", "like", "tea"]);
    }

    #[test]
    fn test_leaf_carries_token_data() {
        let token = Token::new(
            "book",
            Category::primitive("N"),
            Some(Term::constant("book")),
        );
        let leaf = Derivation::leaf((2, 3), token);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.span(), (2, 3));
        assert_eq!(leaf.word(), Some("book"));
        assert_eq!(leaf.symbol(), "");
        assert_eq!(leaf.semantics(), Some(&Term::constant("book")));
    }

    #[test]
    fn test_cross_product_orders_and_counts() {
        let a = vec![word_leaf("a", 0), word_leaf("b", 0)];
        let b = vec![word_leaf("c", 1)];
        let c = vec![word_leaf("d", 2), word_leaf("e", 2)];
        let combos = cross_product(&[a, b, c]);
        assert_eq!(combos.len(), 4);
        let first: Vec<&str> = combos[0].iter().filter_map(|n| n.word()).collect();
        assert_eq!(first, ["a", "c", "d"]);
    }
}
