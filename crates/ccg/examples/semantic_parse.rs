//! Composing Lambda Terms Alongside the Syntax
//!
//! Run with: cargo run -p ccg --example semantic_parse
//!
//! This example demonstrates:
//! - Grammar entries carrying lambda terms
//! - Per-combinator term composition during derivation extraction
//! - That every reading of an unambiguous sentence means the same thing

use ccg::combinator::DEFAULT_RULES;
use ccg::lexicon::Lexicon;
use ccg::{parse, render_derivation};

const GRAMMAR: &str = "
    :- S, NP, N
    I => NP {i}
    the => NP/N {\\x.x}
    book => N {book}
    read => (S\\NP)/NP {\\x y.read(x,y)}
";

fn main() -> Result<(), ccg::CcgError> {
    let lexicon = Lexicon::from_grammar(GRAMMAR, true)?;
    let words = ["I", "read", "the", "book"];

    println!("Lexicon:\n{lexicon}\n");

    let parses = parse(&lexicon, &words, DEFAULT_RULES)?;
    println!("'{}' has {} derivations.\n", words.join(" "), parses.len());

    println!("First derivation with composed terms:\n");
    println!("{}\n", render_derivation(&parses[0]));

    for (index, derivation) in parses.iter().enumerate() {
        match derivation.semantics() {
            Some(term) => println!("Reading {}: {term}", index + 1),
            None => println!("Reading {}: (no term)", index + 1),
        }
    }

    Ok(())
}
