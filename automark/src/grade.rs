//! # Grading pipeline
//! Ties everything together: given a student automaton, an instructor reference and a
//! [Config], produce a [GradeResult] with a verdict, a feedback message and a structured
//! [Feedback] for the UI.
//!
//! The pipeline runs a fixed sequence: validate the student's automaton (structural errors
//! short-circuit, comparing the language of a malformed automaton makes no sense), validate the
//! reference (an invalid reference is an internal fault, not the student's), apply the
//! configured type/completeness/minimality requirements, gather structural information, compare
//! the languages, and assemble summary and hints. Every finding along the way is a
//! [Diagnostic]; nothing here panics on bad input.
//!
//! ```
//! use automark::automaton::Automaton;
//! use automark::grade::{grade, Config};
//!
//! let reference = Automaton::new(
//!     &["s0", "s1"],
//!     &["a"],
//!     &[("s0", "a", "s1"), ("s1", "a", "s1")],
//!     "s0",
//!     &["s1"],
//! );
//! // The same language, with different state names
//! let student = Automaton::new(
//!     &["start", "done"],
//!     &["a"],
//!     &[("start", "a", "done"), ("done", "a", "done")],
//!     "start",
//!     &["done"],
//! );
//! let result = grade(&student, &reference, &Config::default());
//! assert!(result.is_correct);
//! assert!(result.details.errors.is_empty());
//! ```

use crate::automaton::Automaton;
use crate::diagnostics::{
    CounterexampleKind, Diagnostic, ErrorCode, Feedback, Highlight, LanguageComparison, Severity,
    TestResult,
};
use crate::equivalence;
use crate::nfa::{Nfa, Simulation};
use crate::validation;

/// Ceiling on the number of states the subset construction may produce for one automaton.
/// Exceeding it aborts the grading with an evaluation error instead of diverging on a
/// pathological submission
pub const MAX_CONSTRUCTED_STATES: usize = 10_000;

/// How the final verdict is decided
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Equivalence must hold and every configured requirement (type, completeness, minimality)
    /// must be met
    Strict,
    /// Equivalence decides alone; unmet requirements are demoted to warnings
    #[default]
    Lenient,
    /// Score is the fraction of passed test cases; without test cases nothing can be awarded
    Partial,
}

/// What kind of automaton the exercise expects
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpectedType {
    /// The submission must be deterministic and free of ε-moves
    Dfa,
    /// Nondeterminism and ε-moves are allowed
    Nfa,
    /// No requirement
    #[default]
    Any,
}

/// How much of the assembled feedback is kept
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Verdict and summary only: hints and structural info are stripped
    Minimal,
    /// Hints are kept
    #[default]
    Standard,
    /// Hints plus structural remarks
    Detailed,
}

/// Grading configuration. The defaults are the most forgiving sensible setup: lenient grading
/// of any automaton kind, standard verbosity, highlighting and counterexamples on
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub evaluation_mode: EvaluationMode,
    pub expected_type: ExpectedType,
    pub feedback_verbosity: Verbosity,
    pub check_minimality: bool,
    pub check_completeness: bool,
    pub highlight_errors: bool,
    pub show_counterexample: bool,
    /// Length bound for the counterexample search, clamped to 1..=50
    pub max_test_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            evaluation_mode: EvaluationMode::default(),
            expected_type: ExpectedType::default(),
            feedback_verbosity: Verbosity::default(),
            check_minimality: false,
            check_completeness: false,
            highlight_errors: true,
            show_counterexample: true,
            max_test_length: 10,
        }
    }
}

/// A test string together with the verdict the reference solution assigns to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub input: String,
    pub should_accept: bool,
}

impl TestCase {
    pub fn new(input: &str, should_accept: bool) -> Self {
        Self {
            input: input.to_string(),
            should_accept,
        }
    }
}

/// The complete outcome of one grading call
#[derive(Clone, Debug, PartialEq)]
pub struct GradeResult {
    pub is_correct: bool,
    /// A human-readable one-liner: the summary, plus the counterexample when one was found
    pub feedback: String,
    /// Fraction of passed test cases, only in partial mode with test cases present
    pub score: Option<f64>,
    pub details: Feedback,
}

/// Grades a student automaton against a reference solution
pub fn grade(student: &Automaton, reference: &Automaton, config: &Config) -> GradeResult {
    grade_with_tests(student, reference, &[], config)
}

/// Grades a student automaton against a reference solution and a set of test cases. The test
/// cases feed the partial-credit score and the per-test results in the feedback; they are run
/// through the student's automaton with full ε support, splitting each input string into
/// unicode graphemes
pub fn grade_with_tests(
    student: &Automaton,
    reference: &Automaton,
    tests: &[TestCase],
    config: &Config,
) -> GradeResult {
    let mut feedback = Feedback::default();

    // Structural errors in the submission invalidate everything downstream
    let structural_diagnostics = validation::well_formedness(student);
    if structural_diagnostics.iter().any(Diagnostic::is_error) {
        for diagnostic in structural_diagnostics {
            push(&mut feedback, diagnostic);
        }
        feedback.summary = "Your FSA has a structural problem".to_string();
        return finalize(feedback, false, None, config);
    }

    // A broken reference is the instructor's problem, not the student's
    if validation::well_formedness(reference)
        .iter()
        .any(Diagnostic::is_error)
    {
        return internal_fault(
            config,
            "The reference solution for this exercise is invalid; please contact your instructor",
        );
    }

    // Interning cannot fail after a clean validation; if it does, that is a bug in the engine
    let Ok(student_nfa) = Nfa::try_from(student) else {
        return internal_fault(config, "The evaluation failed due to an internal error");
    };
    let Ok(reference_nfa) = Nfa::try_from(reference) else {
        return internal_fault(config, "The evaluation failed due to an internal error");
    };

    let demoted = match config.evaluation_mode {
        EvaluationMode::Strict => Severity::Error,
        EvaluationMode::Lenient | EvaluationMode::Partial => Severity::Warning,
    };

    let mut type_mismatch = false;
    if config.expected_type == ExpectedType::Dfa {
        let determinism_diagnostics = validation::determinism(student);
        if !determinism_diagnostics.is_empty() {
            type_mismatch = true;
            push(
                &mut feedback,
                Diagnostic::error(
                    ErrorCode::WrongAutomatonType,
                    "This exercise expects a deterministic automaton (DFA), but yours is nondeterministic",
                )
                .with_severity(demoted)
                .with_suggestion("Remove ε-transitions and duplicate choices, or rethink the automaton as a DFA"),
            );
            for diagnostic in determinism_diagnostics {
                push(&mut feedback, diagnostic.with_severity(demoted));
            }
        }
    }

    let mut completeness_ok = true;
    if config.check_completeness {
        let completeness_diagnostics = validation::completeness(student);
        if !completeness_diagnostics.is_empty() {
            completeness_ok = false;
            for diagnostic in completeness_diagnostics {
                push(&mut feedback, diagnostic.with_severity(demoted));
            }
        }
    }

    let Some(student_dfa) = student_nfa
        .as_deterministic()
        .or_else(|| student_nfa.to_dfa_bounded(MAX_CONSTRUCTED_STATES))
    else {
        return internal_fault(
            config,
            "Your automaton expands to too many states to be analyzed",
        );
    };
    let Some(reference_dfa) = reference_nfa
        .as_deterministic()
        .or_else(|| reference_nfa.to_dfa_bounded(MAX_CONSTRUCTED_STATES))
    else {
        return internal_fault(
            config,
            "The reference solution is too large to analyze; please contact your instructor",
        );
    };

    let student_min = student_dfa.minimized();
    let reference_min = reference_dfa.minimized();

    let mut minimality_ok = true;
    if config.check_minimality && student_min.state_count() < student.states().len() {
        minimality_ok = false;
        push(
            &mut feedback,
            Diagnostic::error(
                ErrorCode::NotMinimal,
                format!(
                    "Your FSA has {} states, but an equivalent automaton needs only {}",
                    student.states().len(),
                    student_min.state_count()
                ),
            )
            .with_severity(demoted)
            .with_suggestion(
                "Look for states that behave identically and merge them, and remove unreachable states",
            ),
        );
    }

    // Structural overview and the analytical warnings, regardless of correctness
    feedback.structural = Some(validation::structural_info(student));
    for diagnostic in validation::unreachable_states(student) {
        push(&mut feedback, diagnostic);
    }
    for diagnostic in validation::dead_states(student) {
        push(&mut feedback, diagnostic);
    }

    let comparison = equivalence::isomorphism_diagnostics(&student_min, &reference_min);
    let equivalent = comparison.is_empty();
    for diagnostic in comparison {
        push(&mut feedback, diagnostic);
    }

    let mut language = LanguageComparison {
        equivalent,
        counterexample: None,
        counterexample_kind: None,
    };
    if !equivalent && config.show_counterexample {
        if let Some((witness, kind)) = equivalence::find_counterexample(
            &student_min,
            &reference_min,
            config.max_test_length.clamp(1, 50),
        ) {
            language.counterexample = Some(witness);
            language.counterexample_kind = Some(kind);
        }
    }
    feedback.language = Some(language);

    let mut passed = 0usize;
    for case in tests {
        let outcome = student_nfa.simulate_graphemes(&case.input);
        let actual = outcome.is_accepted();
        let test_passed = actual == case.should_accept;
        if test_passed {
            passed += 1;
        } else {
            let code = match &outcome {
                Simulation::UnknownSymbol { .. } => ErrorCode::InvalidSymbol,
                _ => ErrorCode::TestCaseFailed,
            };
            push(
                &mut feedback,
                Diagnostic::warning(
                    code,
                    format!(
                        "Your FSA {} '{}', but it should be {}",
                        if actual { "accepts" } else { "rejects" },
                        case.input,
                        if case.should_accept { "accepted" } else { "rejected" },
                    ),
                ),
            );
        }
        feedback.test_results.push(TestResult {
            input: case.input.clone(),
            expected: case.should_accept,
            actual,
            passed: test_passed,
        });
    }

    let (is_correct, score) = match config.evaluation_mode {
        EvaluationMode::Strict => (
            equivalent && !type_mismatch && minimality_ok && completeness_ok,
            None,
        ),
        EvaluationMode::Lenient => (equivalent, None),
        EvaluationMode::Partial => {
            if tests.is_empty() {
                (false, None)
            } else {
                let score = passed as f64 / tests.len() as f64;
                (equivalent && passed == tests.len(), Some(score))
            }
        }
    };

    feedback.summary = if is_correct {
        format!(
            "Correct! Your automaton with {} state(s) accepts the required language",
            student.states().len()
        )
    } else if config.evaluation_mode == EvaluationMode::Partial && tests.is_empty() {
        "Partial-credit grading needs test cases, but none are configured for this exercise".to_string()
    } else {
        classify(&feedback.errors)
    };

    finalize(feedback, is_correct, score, config)
}

/// Buckets the error diagnostics into the broad problem areas a student should look at first
fn classify(errors: &[Diagnostic]) -> String {
    let mut alphabet = false;
    let mut accepting = false;
    let mut transitions = false;
    let mut structure = false;
    for diagnostic in errors {
        match (diagnostic.code(), diagnostic.highlight()) {
            (ErrorCode::LanguageMismatch, Some(Highlight::Symbol(_))) => alphabet = true,
            (ErrorCode::LanguageMismatch, Some(Highlight::AcceptState(_))) => accepting = true,
            (ErrorCode::LanguageMismatch, Some(Highlight::Transition { .. }))
            | (ErrorCode::LanguageMismatch, Some(Highlight::State(_))) => transitions = true,
            (ErrorCode::LanguageMismatch, _) => structure = true,
            (
                ErrorCode::MissingTransition
                | ErrorCode::DuplicateTransition
                | ErrorCode::NotDeterministic,
                _,
            ) => transitions = true,
            _ => structure = true,
        }
    }

    let mut parts = Vec::new();
    if alphabet {
        parts.push("the alphabet");
    }
    if accepting {
        parts.push("the accepting states");
    }
    if transitions {
        parts.push("the transitions");
    }
    if structure {
        parts.push("the state structure");
    }
    if parts.is_empty() {
        "Your automaton does not accept the required language".to_string()
    } else {
        format!("Not quite right yet: check {}", parts.join(", "))
    }
}

fn push(feedback: &mut Feedback, diagnostic: Diagnostic) {
    if diagnostic.is_error() {
        feedback.errors.push(diagnostic);
    } else {
        feedback.warnings.push(diagnostic);
    }
}

fn internal_fault(config: &Config, message: &str) -> GradeResult {
    let mut feedback = Feedback {
        summary: message.to_string(),
        ..Feedback::default()
    };
    feedback
        .errors
        .push(Diagnostic::error(ErrorCode::EvaluationError, message));
    finalize(feedback, false, None, config)
}

/// Applies the verbosity and highlighting configuration and renders the one-line feedback text
fn finalize(
    mut feedback: Feedback,
    is_correct: bool,
    score: Option<f64>,
    config: &Config,
) -> GradeResult {
    let mut hints = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for diagnostic in feedback.diagnostics() {
        if let Some(suggestion) = diagnostic.suggestion() {
            if seen.insert(suggestion.to_string()) {
                hints.push(suggestion.to_string());
            }
        }
    }
    if config.feedback_verbosity == Verbosity::Detailed {
        if let Some(info) = &feedback.structural {
            hints.push(format!(
                "Structure: {} state(s), {} transition(s), {}deterministic, {}complete",
                info.state_count,
                info.transition_count,
                if info.deterministic { "" } else { "not " },
                if info.complete { "" } else { "not " },
            ));
            if !info.unreachable.is_empty() {
                hints.push(format!(
                    "Unreachable state(s): {}",
                    info.unreachable.join(", ")
                ));
            }
            if !info.dead.is_empty() {
                hints.push(format!("Dead state(s): {}", info.dead.join(", ")));
            }
        }
    }
    feedback.hints = hints;

    if config.feedback_verbosity == Verbosity::Minimal {
        feedback.hints.clear();
        feedback.structural = None;
    }
    if !config.highlight_errors {
        for diagnostic in feedback
            .errors
            .iter_mut()
            .chain(feedback.warnings.iter_mut())
        {
            diagnostic.clear_highlight();
        }
    }

    let mut text = feedback.summary.clone();
    if let Some(language) = &feedback.language {
        if let (Some(witness), Some(kind)) =
            (&language.counterexample, language.counterexample_kind)
        {
            let shown = if witness.is_empty() {
                "the empty string".to_string()
            } else {
                format!("'{witness}'")
            };
            match kind {
                CounterexampleKind::ShouldAccept => {
                    text.push_str(&format!(
                        ". For example, your automaton rejects {shown}, but it should be accepted"
                    ));
                }
                CounterexampleKind::ShouldReject => {
                    text.push_str(&format!(
                        ". For example, your automaton accepts {shown}, but it should be rejected"
                    ));
                }
            }
        }
    }

    GradeResult {
        is_correct,
        feedback: text,
        score,
        details: feedback,
    }
}
