use crate::grade::print_diagnostics;
use crate::load::{self, Error};
use automark::equivalence::{find_counterexample, isomorphism_diagnostics};
use automark::nfa::Nfa;
use std::path::Path;

pub fn run(first: &Path, second: &Path, max_test_length: usize) -> Result<bool, Error> {
    let first = load::load(first)?;
    let second = load::load(second)?;
    let first = Nfa::try_from(&first)?;
    let second = Nfa::try_from(&second)?;

    let a = first
        .as_deterministic()
        .unwrap_or_else(|| first.to_dfa())
        .minimized();
    let b = second
        .as_deterministic()
        .unwrap_or_else(|| second.to_dfa())
        .minimized();

    let diagnostics = isomorphism_diagnostics(&a, &b);
    if diagnostics.is_empty() {
        println!("Equivalent");
        return Ok(true);
    }

    println!("Not equivalent");
    print_diagnostics("Differences", &diagnostics);
    if let Some((witness, _)) = find_counterexample(&a, &b, max_test_length) {
        if witness.is_empty() {
            println!("The automata disagree on the empty string");
        } else {
            println!("The automata disagree on '{witness}'");
        }
    }
    Ok(false)
}
