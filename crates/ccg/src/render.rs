//! ASCII Derivation Diagrams
//!
//! Renders a [`Derivation`] the way categorial-grammar textbooks draw them:
//! a word row, a row of lexical categories, then one underline per rule
//! firing, annotated with the rule symbol and the derived category, bottom
//! up and left to right.
//!
//! ```text
//!  I   sleep
//!  NP  (S\NP)
//! ------------<
//!      S
//! ```

use std::fmt;

use crate::derivation::Derivation;

impl fmt::Display for Derivation {
    /// Displays the full diagram; see [`render_derivation`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render_derivation(self))
    }
}

/// Render a derivation tree as a multi-line diagram.
pub fn render_derivation(derivation: &Derivation) -> String {
    let mut word_row = String::new();
    let mut category_row = String::new();
    for leaf in derivation.leaves() {
        let word = leaf.word().unwrap_or_default();
        let category = label(leaf);
        let width = 2 + word.chars().count().max(category.chars().count());
        push_centered(&mut word_row, word, width);
        push_centered(&mut category_row, &category, width);
    }

    let mut lines = vec![
        word_row.trim_end().to_string(),
        category_row.trim_end().to_string(),
    ];
    walk(derivation, 0, &mut lines);
    lines.join("\n")
}

/// The displayed label of a node: its category, with the semantic term in
/// braces when present.
fn label(node: &Derivation) -> String {
    match node.semantics() {
        Some(term) => format!("{} {{{term}}}", node.category()),
        None => node.category().to_string(),
    }
}

/// Append `text` centered in a field of `width`, extra space on the right.
fn push_centered(row: &mut String, text: &str, width: usize) {
    let left = (width - text.chars().count()) / 2;
    let right = width - text.chars().count() - left;
    row.push_str(&" ".repeat(left));
    row.push_str(text);
    row.push_str(&" ".repeat(right));
}

/// Emit the rule lines for `node` starting at column `lwidth`; returns the
/// column where the node's region ends.
fn walk(node: &Derivation, lwidth: usize, lines: &mut Vec<String>) -> usize {
    if node.is_leaf() {
        let word = node.word().unwrap_or_default();
        let width = 2 + word.chars().count().max(label(node).chars().count());
        return lwidth + width;
    }

    let mut rwidth = lwidth;
    for child in node.children() {
        rwidth = rwidth.max(walk(child, rwidth, lines));
    }

    lines.push(format!(
        "{}{}{}",
        " ".repeat(lwidth),
        "-".repeat(rwidth - lwidth),
        node.symbol()
    ));
    let text = label(node);
    let pad = lwidth + (rwidth - lwidth).saturating_sub(text.chars().count()) / 2;
    lines.push(format!("{}{text}", " ".repeat(pad)));
    rwidth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart;
    use crate::combinator::APPLICATION_RULES;
    use crate::lexicon::Lexicon;

    #[test]
    fn test_render_backward_application() {
        let lexicon = Lexicon::from_grammar(":- S, NP\nI => NP\nsleep => S\\NP", false).unwrap();
        let parses = chart::parse(&lexicon, &["I", "sleep"], APPLICATION_RULES).unwrap();
        assert_eq!(parses.len(), 1);

        let expected = " I   sleep\n NP  (S\\NP)\n------------<\n     S";
        assert_eq!(render_derivation(&parses[0]), expected);
    }

    #[test]
    fn test_render_includes_semantic_terms() {
        let lexicon = Lexicon::from_grammar(
            ":- S, NP\nI => NP {i}\nsleep => S\\NP {\\x.sleep(x)}",
            true,
        )
        .unwrap();
        let parses = chart::parse(&lexicon, &["I", "sleep"], APPLICATION_RULES).unwrap();
        let rendered = render_derivation(&parses[0]);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].trim(), "NP {i}  (S\\NP) {\\x.sleep(x)}");
        assert!(lines[2].ends_with('<'));
        assert_eq!(lines[3].trim(), "S {sleep(i)}");
    }

    #[test]
    fn test_render_nested_derivation_emits_one_rule_line_per_node() {
        let lexicon = Lexicon::from_grammar(
            ":- S, NP, N\nthe => NP/N\nI => NP\nread => (S\\NP)/NP\nbook => N",
            false,
        )
        .unwrap();
        let parses =
            chart::parse(&lexicon, &["I", "read", "the", "book"], APPLICATION_RULES).unwrap();
        let rendered = render_derivation(&parses[0]);

        // Three internal nodes: two rule lines plus result line each, after
        // the two header rows.
        assert_eq!(rendered.lines().count(), 2 + 3 * 2);
        assert_eq!(rendered.lines().last().unwrap().trim(), "S");
    }
}
