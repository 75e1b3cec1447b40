//! Ambiguity Under the Full Rule Set
//!
//! Run with: cargo run -p ccg --example ambiguous_parse
//!
//! This example demonstrates:
//! - Building a lexicon with the operator notation
//! - Parsing with the full English rule set
//! - How composition and type-raising multiply readings
//! - Rendering every derivation as a diagram

use ccg::combinator::{APPLICATION_RULES, DEFAULT_RULES};
use ccg::lexicon::{cat, LexiconBuilder};
use ccg::{parse, render_derivation};

fn main() -> Result<(), ccg::CcgError> {
    let lexicon = LexiconBuilder::new()
        .primitives(["S", "NP", "N"])
        .family("Det", cat("NP") << cat("N"))
        .entry("the", "Det")
        .entry("I", "NP")
        .entry("book", "N")
        .entry("read", (cat("NP") >> cat("S")) << cat("NP"))
        .build()?;

    let words = ["I", "read", "the", "book"];

    // -------------------------------------------------------------------------
    // 1. Application Alone: One Reading
    // -------------------------------------------------------------------------
    println!("1. Application alone");
    println!("--------------------\n");

    let parses = parse(&lexicon, &words, APPLICATION_RULES)?;
    println!(
        "'{}' has {} derivation under pure application:\n",
        words.join(" "),
        parses.len()
    );
    println!("{}\n", render_derivation(&parses[0]));

    // -------------------------------------------------------------------------
    // 2. The Full Rule Set: Seven Readings
    // -------------------------------------------------------------------------
    println!("2. The full rule set");
    println!("--------------------\n");

    let parses = parse(&lexicon, &words, DEFAULT_RULES)?;
    println!(
        "Composition and type-raising expand that to {} derivations:\n",
        parses.len()
    );
    for (index, derivation) in parses.iter().enumerate() {
        println!("Derivation {}:", index + 1);
        println!("{}\n", render_derivation(derivation));
    }

    Ok(())
}
