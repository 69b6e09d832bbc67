use crate::load::{self, Error};
use crate::GradeArgs;
use automark::diagnostics::{Diagnostic, Highlight};
use automark::grade::{grade, Config};

pub fn run(args: &GradeArgs) -> Result<bool, Error> {
    let student = load::load(&args.student)?;
    let reference = load::load(&args.reference)?;
    let config = Config {
        evaluation_mode: args.mode.into(),
        expected_type: args.expect.into(),
        feedback_verbosity: args.verbosity.into(),
        check_minimality: args.check_minimality,
        check_completeness: args.check_completeness,
        highlight_errors: !args.no_highlights,
        show_counterexample: !args.no_counterexample,
        max_test_length: args.max_test_length,
    };
    let result = grade(&student, &reference, &config);

    println!("{}", result.feedback);
    if let Some(score) = result.score {
        println!("Score: {:.0}%", score * 100.0);
    }
    print_diagnostics("Errors", &result.details.errors);
    print_diagnostics("Warnings", &result.details.warnings);
    if !result.details.hints.is_empty() {
        println!("Hints:");
        for hint in &result.details.hints {
            println!("  - {hint}");
        }
    }
    Ok(result.is_correct)
}

pub fn print_diagnostics(title: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("{title}:");
    for diagnostic in diagnostics {
        match diagnostic.highlight() {
            Some(highlight) => println!(
                "  [{}] {} ({})",
                diagnostic.code(),
                diagnostic.message(),
                describe_highlight(highlight)
            ),
            None => println!("  [{}] {}", diagnostic.code(), diagnostic.message()),
        }
    }
}

fn describe_highlight(highlight: &Highlight) -> String {
    match highlight {
        Highlight::State(id) => format!("state {id}"),
        Highlight::AcceptState(id) => format!("accepting state {id}"),
        Highlight::InitialState(id) => format!("initial state {id}"),
        Highlight::Transition { from, symbol, to } => {
            format!("transition {from} -{symbol}-> {to}")
        }
        Highlight::Symbol(symbol) => format!("symbol {symbol}"),
    }
}
