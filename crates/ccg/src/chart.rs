//! Chart Parsing with Ambiguity Packing
//!
//! A CYK-style chart over half-open token spans. Every adjacent pair of
//! edges is offered to every configured rule; the results are packed: a span
//! holds at most one edge per distinct (category, rule symbol) pair, and an
//! edge accumulates every child combination that produced it. Derivation
//! trees are unpacked afterwards by [`Chart::parses`].
//!
//! Type-raising is the one unary wrinkle: it fires on an adjacent pair, but
//! the produced edge covers only the raised operand and records only that
//! operand as its child. The other operand merely licenses the raise. Raised
//! edges land in a sub-span the current sweep is still reading, so span edge
//! lists are walked by index and re-checked against the growing list.
//!
//! # Example
//!
//! ```rust
//! use ccg::chart;
//! use ccg::combinator::APPLICATION_RULES;
//! use ccg::lexicon::Lexicon;
//!
//! let lexicon = Lexicon::from_grammar(
//!     ":- S, NP, N\nthe => NP/N\nI => NP\nread => (S\\NP)/NP\nbook => N",
//!     false,
//! )
//! .unwrap();
//!
//! let parses = chart::parse(&lexicon, &["I", "read", "the", "book"], APPLICATION_RULES).unwrap();
//! assert_eq!(parses.len(), 1);
//! assert_eq!(parses[0].category().to_string(), "S");
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::category::Category;
use crate::combinator::Rule;
use crate::derivation::{self, Derivation};
use crate::error::CcgError;
use crate::lexicon::{Lexicon, Token};

/// A half-open token span `[start, end)`.
pub type Span = (usize, usize);

/// Index of an edge within its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub(crate) usize);

/// How an edge came to be.
#[derive(Debug, Clone)]
pub(crate) enum EdgeKind {
    /// Seeded from a lexicon token.
    Leaf(Token),
    /// Produced by a rule; one child-id list per distinct derivation route.
    Derived {
        rule: Rule,
        alternatives: Vec<Vec<EdgeId>>,
    },
}

/// A chart edge: a category derived over a span.
#[derive(Debug, Clone)]
pub struct Edge {
    span: Span,
    category: Category,
    pub(crate) kind: EdgeKind,
}

impl Edge {
    /// The token span this edge covers.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The derived category.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Check if this is a lexical leaf edge.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, EdgeKind::Leaf(_))
    }

    /// The lexicon token behind a leaf edge.
    pub fn token(&self) -> Option<&Token> {
        match &self.kind {
            EdgeKind::Leaf(token) => Some(token),
            EdgeKind::Derived { .. } => None,
        }
    }

    /// The rule that produced a derived edge.
    pub fn rule(&self) -> Option<Rule> {
        match &self.kind {
            EdgeKind::Leaf(_) => None,
            EdgeKind::Derived { rule, .. } => Some(*rule),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) {}", self.span.0, self.span.1, self.category)?;
        if let EdgeKind::Derived { rule, .. } = &self.kind {
            write!(f, " {}", rule.symbol())?;
        }
        Ok(())
    }
}

/// A completed parse table for one token sequence.
#[derive(Debug, Clone)]
pub struct Chart {
    words: Vec<String>,
    edges: Vec<Edge>,
    by_span: HashMap<Span, Vec<EdgeId>>,
    index: HashMap<(Span, Category, &'static str), EdgeId>,
}

impl Chart {
    /// Build the full parse table for `words` under `rules`.
    ///
    /// Every word is looked up before any chart work: an unknown word aborts
    /// with [`CcgError::UnknownWord`], an empty input with
    /// [`CcgError::EmptySentence`].
    pub fn build(lexicon: &Lexicon, words: &[&str], rules: &[Rule]) -> Result<Chart, CcgError> {
        if words.is_empty() {
            return Err(CcgError::EmptySentence);
        }
        let mut lexical: Vec<&[Token]> = Vec::with_capacity(words.len());
        for word in words {
            lexical.push(lexicon.categories(word)?);
        }

        let mut chart = Chart {
            words: words.iter().map(|word| word.to_string()).collect(),
            edges: Vec::new(),
            by_span: HashMap::new(),
            index: HashMap::new(),
        };

        // One leaf per (category, term) pair per position. Leaves are not
        // deduplicated: two identical lexicon entries stay two edges.
        for (position, tokens) in lexical.iter().enumerate() {
            for token in *tokens {
                chart.insert_leaf((position, position + 1), token.clone());
            }
        }

        let n = words.len();
        for length in 2..=n {
            for start in 0..=n - length {
                let end = start + length;
                for split in start + 1..end {
                    chart.combine_spans((start, split), (split, end), rules);
                }
            }
        }
        Ok(chart)
    }

    /// The parsed words.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Resolve an edge id.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// Total number of edges in the table.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edge ids covering a span, in insertion order.
    pub fn edges_in(&self, span: Span) -> &[EdgeId] {
        self.by_span.get(&span).map_or(&[], Vec::as_slice)
    }

    /// Unpack every full-span edge whose category equals `goal` into
    /// derivation trees. No matching edge gives an empty list, not an error.
    pub fn parses(&self, goal: &Category) -> Result<Vec<Derivation>, CcgError> {
        let full = (0, self.words.len());
        let mut memo = HashMap::new();
        let mut results = Vec::new();
        for &id in self.edges_in(full) {
            if self.edge(id).category() == goal {
                results.extend(derivation::expand(self, id, &mut memo)?);
            }
        }
        Ok(results)
    }

    fn insert_leaf(&mut self, span: Span, token: Token) {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            span,
            category: token.category().clone(),
            kind: EdgeKind::Leaf(token),
        });
        self.by_span.entry(span).or_default().push(id);
    }

    /// Offer every rule to every pair of edges over two adjacent spans.
    ///
    /// Walked by index with the length re-read each step: type-raising
    /// inserts into `left_span` or `right_span` mid-sweep, and those new
    /// edges must still meet the remaining pairs.
    fn combine_spans(&mut self, left_span: Span, right_span: Span, rules: &[Rule]) {
        let mut li = 0;
        while li < self.edges_in(left_span).len() {
            let left_id = self.edges_in(left_span)[li];
            let mut ri = 0;
            while ri < self.edges_in(right_span).len() {
                let right_id = self.edges_in(right_span)[ri];
                for rule in rules {
                    self.apply_rule(*rule, left_id, right_id);
                }
                ri += 1;
            }
            li += 1;
        }
    }

    fn apply_rule(&mut self, rule: Rule, left_id: EdgeId, right_id: EdgeId) {
        let produced = {
            let left = self.edge(left_id);
            let right = self.edge(right_id);
            if !rule.can_combine(left.category(), right.category()) {
                return;
            }
            let Some(category) = rule.combine(left.category(), right.category()) else {
                return;
            };
            if rule.is_type_raise() {
                // Unary: the raise covers only the raised operand, the other
                // operand merely licensed it.
                let (operand_id, operand) = if rule.is_backward() {
                    (right_id, right)
                } else {
                    (left_id, left)
                };
                (operand.span(), category, vec![operand_id])
            } else {
                (
                    (left.span().0, right.span().1),
                    category,
                    vec![left_id, right_id],
                )
            }
        };
        let (span, category, children) = produced;
        self.insert(span, category, rule, children);
    }

    /// Insert a derived edge, packing it onto an existing edge when the span,
    /// category and rule already match. Child lists are a set: a combination
    /// already recorded is not recorded twice.
    fn insert(&mut self, span: Span, category: Category, rule: Rule, children: Vec<EdgeId>) {
        let key = (span, category.clone(), rule.symbol());
        if let Some(&id) = self.index.get(&key) {
            if let EdgeKind::Derived { alternatives, .. } = &mut self.edges[id.0].kind {
                if !alternatives.contains(&children) {
                    alternatives.push(children);
                }
            }
            return;
        }
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            span,
            category,
            kind: EdgeKind::Derived {
                rule,
                alternatives: vec![children],
            },
        });
        self.index.insert(key, id);
        self.by_span.entry(span).or_default().push(id);
    }
}

/// Parse `words` and return every derivation of the lexicon's start
/// category over the full input.
pub fn parse(
    lexicon: &Lexicon,
    words: &[&str],
    rules: &[Rule],
) -> Result<Vec<Derivation>, CcgError> {
    let chart = Chart::build(lexicon, words, rules)?;
    chart.parses(lexicon.start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{
        APPLICATION_RULES, DEFAULT_RULES, FORWARD_APPLICATION, FORWARD_COMPOSITION,
        TYPE_RAISE_RULES,
    };

    fn fragment() -> Lexicon {
        Lexicon::from_grammar(
            ":- S, NP, N\nthe => NP/N\nI => NP\nread => (S\\NP)/NP\nbook => N",
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert_eq!(
            Chart::build(&fragment(), &[], APPLICATION_RULES).err(),
            Some(CcgError::EmptySentence)
        );
    }

    #[test]
    fn test_unknown_word_aborts_before_chart_work() {
        let result = Chart::build(&fragment(), &["I", "read", "the", "unicorn"], DEFAULT_RULES);
        assert_eq!(
            result.err(),
            Some(CcgError::UnknownWord {
                word: "unicorn".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_lexicon_entries_seed_separate_leaves() {
        let lexicon = Lexicon::from_grammar(":- S, NP\na => NP\na => NP", false).unwrap();
        let chart = Chart::build(&lexicon, &["a"], APPLICATION_RULES).unwrap();
        assert_eq!(chart.edges_in((0, 1)).len(), 2);
    }

    #[test]
    fn test_application_only_parse() {
        let parses = parse(
            &fragment(),
            &["I", "read", "the", "book"],
            APPLICATION_RULES,
        )
        .unwrap();
        assert_eq!(parses.len(), 1);
        assert_eq!(parses[0].span(), (0, 4));
        assert_eq!(parses[0].category(), &Category::primitive("S"));
    }

    #[test]
    fn test_ambiguity_is_packed_onto_one_edge() {
        // N/N N/N N: with composition available, both bracketings derive N
        // with forward application on top, so the full span holds one packed
        // N edge with two child lists.
        let lexicon =
            Lexicon::from_grammar(":- N\nold => N/N\nred => N/N\nbook => N", false).unwrap();
        let rules = [FORWARD_APPLICATION, FORWARD_COMPOSITION];
        let chart = Chart::build(&lexicon, &["old", "red", "book"], &rules).unwrap();

        let full: Vec<&Edge> = chart
            .edges_in((0, 3))
            .iter()
            .map(|&id| chart.edge(id))
            .collect();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].category(), &Category::primitive("N"));

        let parses = chart.parses(&Category::primitive("N")).unwrap();
        assert_eq!(parses.len(), 2);
    }

    #[test]
    fn test_type_raised_edge_covers_only_the_operand() {
        let chart = Chart::build(
            &fragment(),
            &["I", "read", "the", "book"],
            TYPE_RAISE_RULES,
        )
        .unwrap();
        // I : NP next to read : (S\NP)/NP licenses the forward raise over
        // the left operand alone.
        let raised: Vec<&Edge> = chart
            .edges_in((0, 1))
            .iter()
            .map(|&id| chart.edge(id))
            .filter(|edge| !edge.is_leaf())
            .collect();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].category().to_string(), "(S/(S\\NP))");
        assert_eq!(raised[0].rule().unwrap().symbol(), ">T");
    }

    #[test]
    fn test_no_goal_edge_means_empty_parse_list() {
        let lexicon = Lexicon::from_grammar(":- S, NP\na => NP\nb => NP", false).unwrap();
        let parses = parse(&lexicon, &["a", "b"], APPLICATION_RULES).unwrap();
        assert!(parses.is_empty());
    }
}
