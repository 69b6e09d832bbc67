use crate::grade::print_diagnostics;
use crate::load::{self, Error};
use automark::nfa::Nfa;
use automark::validation;
use std::path::Path;

pub fn run(file: &Path) -> Result<bool, Error> {
    let automaton = load::load(file)?;
    let problems = validation::well_formedness(&automaton);
    if problems.iter().any(|diagnostic| diagnostic.is_error()) {
        print_diagnostics("Errors", &problems);
        return Ok(false);
    }

    let nfa = Nfa::try_from(&automaton)?;
    let dfa = nfa.as_deterministic().unwrap_or_else(|| nfa.to_dfa());
    let minimal = dfa.minimized();
    println!("{}", minimal.to_automaton().ascii_table());
    Ok(true)
}
