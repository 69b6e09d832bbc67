use crate::grade::print_diagnostics;
use crate::load::{self, Error};
use automark::validation;
use std::path::Path;

pub fn run(file: &Path) -> Result<bool, Error> {
    let automaton = load::load(file)?;
    println!("{}", automaton.ascii_table());
    println!();

    let (errors, warnings): (Vec<_>, Vec<_>) = validation::validate(&automaton)
        .into_iter()
        .partition(|diagnostic| diagnostic.is_error());
    print_diagnostics("Errors", &errors);
    print_diagnostics("Warnings", &warnings);

    let ok = errors.is_empty();
    if ok {
        let info = validation::structural_info(&automaton);
        println!(
            "{} state(s), {} transition(s), {}deterministic, {}complete",
            info.state_count,
            info.transition_count,
            if info.deterministic { "" } else { "not " },
            if info.complete { "" } else { "not " },
        );
    }
    Ok(ok)
}
