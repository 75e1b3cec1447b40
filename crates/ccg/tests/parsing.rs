//! # End-to-End Parsing Tests
//!
//! Whole-pipeline tests over small grammars:
//! - Ambiguity: the packed chart yields every distinct derivation
//! - Rule-set sensitivity: restricting rules restricts derivations
//! - Semantic composition along every derivation
//! - Variable categories binding against concrete ones
//! - Determinism across repeated runs

use ccg::{
    chart, parse, Category, CcgError, Chart, Derivation, Lexicon, APPLICATION_RULES,
    DEFAULT_RULES, TYPE_RAISE_RULES,
};

const TRANSITIVE: &str = "
    :- S, NP, N
    the => NP/N
    I => NP
    read => (S\\NP)/NP
    book => N
";

fn transitive() -> Lexicon {
    Lexicon::from_grammar(TRANSITIVE, false).unwrap()
}

// ============================================================================
// Ambiguity Under the Full Rule Set
// ============================================================================

#[test]
fn test_transitive_sentence_has_seven_derivations() {
    let parses = parse(&transitive(), &["I", "read", "the", "book"], DEFAULT_RULES).unwrap();

    assert_eq!(parses.len(), 7);
    for derivation in &parses {
        assert_eq!(derivation.category(), &Category::primitive("S"));
        assert_eq!(derivation.span(), (0, 4));
    }
}

#[test]
fn test_derivations_are_distinct() {
    let parses = parse(&transitive(), &["I", "read", "the", "book"], DEFAULT_RULES).unwrap();
    for (i, a) in parses.iter().enumerate() {
        for b in &parses[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_leaves_reproduce_the_input() {
    let words = ["I", "read", "the", "book"];
    let parses = parse(&transitive(), &words, DEFAULT_RULES).unwrap();
    for derivation in &parses {
        let surface: Vec<&str> = derivation
            .leaves()
            .iter()
            .filter_map(|leaf| leaf.word())
            .collect();
        assert_eq!(surface, words);
    }
}

// ============================================================================
// Rule-Set Sensitivity
// ============================================================================

#[test]
fn test_ambiguous_words_parse_under_application_alone() {
    let lexicon = Lexicon::from_grammar(
        "
        :- S, NP
        I => NP
        sleep => NP
        sleep => S\\NP
        love => NP
        love => (S\\NP)/NP
        ",
        false,
    )
    .unwrap();

    let parses = parse(&lexicon, &["I", "love", "sleep"], APPLICATION_RULES).unwrap();
    assert!(!parses.is_empty());
    for derivation in &parses {
        assert_eq!(derivation.category(), &Category::primitive("S"));
    }

    // Type-raising alone derives nothing: it only reshapes operands.
    let parses = parse(&lexicon, &["I", "love", "sleep"], TYPE_RAISE_RULES).unwrap();
    assert!(parses.is_empty());
}

// ============================================================================
// Semantic Composition
// ============================================================================

#[test]
fn test_every_reading_composes_the_same_term() {
    let lexicon = Lexicon::from_grammar(
        "
        :- S, NP, N
        read => S/NP {\\x.read(x)}
        the => NP/N {\\x.x}
        book => N {book}
        ",
        true,
    )
    .unwrap();

    let parses = parse(&lexicon, &["read", "the", "book"], DEFAULT_RULES).unwrap();
    assert!(parses.len() >= 2, "expected both bracketings");
    for derivation in &parses {
        assert_eq!(derivation.semantics().unwrap().to_string(), "read(book)");
    }
}

#[test]
fn test_semantics_absent_when_a_leaf_has_none() {
    let parses = parse(&transitive(), &["I", "read", "the", "book"], DEFAULT_RULES).unwrap();
    for derivation in &parses {
        assert_eq!(derivation.semantics(), None);
    }
}

// ============================================================================
// Variable Categories
// ============================================================================

#[test]
fn test_variable_category_binds_to_concrete_operand() {
    let lexicon = Lexicon::from_grammar(
        "
        :- S, NP
        I => NP
        sleep => S\\NP
        really => var\\.,var
        ",
        false,
    )
    .unwrap();

    let parses = parse(&lexicon, &["I", "sleep", "really"], APPLICATION_RULES).unwrap();
    assert!(!parses.is_empty());
    for derivation in &parses {
        assert_eq!(derivation.category(), &Category::primitive("S"));
    }

    // The binding propagates: modifying the verb phrase yields the verb
    // phrase's own category, not a leftover variable.
    let modified_vp = parses.iter().find_map(|derivation| {
        derivation
            .children()
            .iter()
            .find(|child| child.span() == (1, 3))
    });
    let modified_vp = modified_vp.expect("some reading modifies the verb phrase");
    assert_eq!(
        modified_vp.category(),
        &Category::backward(Category::primitive("S"), Category::primitive("NP"))
    );
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_repeated_parses_are_identical() {
    let words = ["I", "read", "the", "book"];
    let lexicon = transitive();

    let first_chart = Chart::build(&lexicon, &words, DEFAULT_RULES).unwrap();
    let second_chart = Chart::build(&lexicon, &words, DEFAULT_RULES).unwrap();
    assert_eq!(first_chart.edge_count(), second_chart.edge_count());

    let first: Vec<Derivation> = first_chart.parses(lexicon.start()).unwrap();
    let second: Vec<Derivation> = second_chart.parses(lexicon.start()).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn test_unknown_word_fails_before_parsing() {
    let result = chart::parse(&transitive(), &["I", "read", "a", "book"], DEFAULT_RULES);
    assert_eq!(
        result.err(),
        Some(CcgError::UnknownWord {
            word: "a".to_string()
        })
    );
}

#[test]
fn test_empty_input_fails() {
    let result = chart::parse(&transitive(), &[], DEFAULT_RULES);
    assert_eq!(result.err(), Some(CcgError::EmptySentence));
}
