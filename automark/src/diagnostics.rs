//! # Diagnostics and feedback
//! Every fault the engine can find (a transition to an undeclared state, a state that should
//! have been accepting, a missing transition) is reported as a [Diagnostic] value. Diagnostics
//! are never raised as errors: the analysis functions are total, and the grading pipeline
//! accumulates whatever they produce into a [Feedback] which the UI consumes.
//!
//! A diagnostic carries a human-readable message, a machine-readable [ErrorCode], a [Severity],
//! an optional [Highlight] pointing at the exact element of the automaton the UI should draw
//! attention to, and an optional suggestion for how to fix the problem.
//!
//! ```
//! use automark::diagnostics::{Diagnostic, ErrorCode, Highlight, Severity};
//!
//! let diagnostic = Diagnostic::error(
//!     ErrorCode::UnreachableState,
//!     "State 'q3' can never be reached",
//! )
//! .with_severity(Severity::Warning)
//! .with_highlight(Highlight::state("q3"))
//! .with_suggestion("Connect 'q3' to the rest of the automaton, or remove it");
//!
//! assert_eq!(diagnostic.code().to_string(), "UNREACHABLE_STATE");
//! assert!(!diagnostic.is_error());
//! ```

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// The closed set of error codes the engine can emit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidState,
    InvalidInitial,
    InvalidAccept,
    InvalidSymbol,
    InvalidTransitionSource,
    InvalidTransitionDest,
    InvalidTransitionSymbol,
    MissingTransition,
    DuplicateTransition,
    UnreachableState,
    DeadState,
    WrongAutomatonType,
    NotDeterministic,
    NotComplete,
    NotMinimal,
    LanguageMismatch,
    TestCaseFailed,
    EmptyStates,
    EmptyAlphabet,
    EvaluationError,
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            InvalidState => "INVALID_STATE",
            InvalidInitial => "INVALID_INITIAL",
            InvalidAccept => "INVALID_ACCEPT",
            InvalidSymbol => "INVALID_SYMBOL",
            InvalidTransitionSource => "INVALID_TRANSITION_SOURCE",
            InvalidTransitionDest => "INVALID_TRANSITION_DEST",
            InvalidTransitionSymbol => "INVALID_TRANSITION_SYMBOL",
            MissingTransition => "MISSING_TRANSITION",
            DuplicateTransition => "DUPLICATE_TRANSITION",
            UnreachableState => "UNREACHABLE_STATE",
            DeadState => "DEAD_STATE",
            WrongAutomatonType => "WRONG_AUTOMATON_TYPE",
            NotDeterministic => "NOT_DETERMINISTIC",
            NotComplete => "NOT_COMPLETE",
            NotMinimal => "NOT_MINIMAL",
            LanguageMismatch => "LANGUAGE_MISMATCH",
            TestCaseFailed => "TEST_CASE_FAILED",
            EmptyStates => "EMPTY_STATES",
            EmptyAlphabet => "EMPTY_ALPHABET",
            EvaluationError => "EVALUATION_ERROR",
        };
        f.write_str(name)
    }
}

/// How serious a diagnostic is. Errors make a submission incorrect, warnings and infos are
/// carried through to the feedback but never fail a grading on their own
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// The element of the automaton a diagnostic refers to, precise enough for a UI to highlight it
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Highlight {
    /// A state, by identifier
    State(Rc<str>),
    /// A state in its role as (wrongly present or missing) member of the accepting set
    AcceptState(Rc<str>),
    /// A state in its role as initial state
    InitialState(Rc<str>),
    /// A single transition
    Transition {
        from: Rc<str>,
        symbol: Rc<str>,
        to: Rc<str>,
    },
    /// A symbol of the alphabet
    Symbol(Rc<str>),
}

impl Highlight {
    pub fn state(id: &str) -> Self {
        Highlight::State(Rc::from(id))
    }

    pub fn accept_state(id: &str) -> Self {
        Highlight::AcceptState(Rc::from(id))
    }

    pub fn initial_state(id: &str) -> Self {
        Highlight::InitialState(Rc::from(id))
    }

    pub fn transition(from: &str, symbol: &str, to: &str) -> Self {
        Highlight::Transition {
            from: Rc::from(from),
            symbol: Rc::from(symbol),
            to: Rc::from(to),
        }
    }

    pub fn symbol(symbol: &str) -> Self {
        Highlight::Symbol(Rc::from(symbol))
    }
}

/// A single finding about an automaton. See the [module-level documentation](crate::diagnostics)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    code: ErrorCode,
    severity: Severity,
    highlight: Option<Highlight>,
    suggestion: Option<String>,
}

impl Diagnostic {
    /// Creates an error-severity diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            severity: Severity::Error,
            highlight: None,
            suggestion: None,
        }
    }

    /// Creates a warning-severity diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::error(code, message).with_severity(Severity::Warning)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = Some(highlight);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Removes the highlight payload. Used when the grading configuration asks for feedback
    /// without UI highlighting
    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Aggregated structural facts about an automaton, computed by
/// [validation::structural_info](crate::validation::structural_info)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralInfo {
    pub deterministic: bool,
    pub complete: bool,
    pub state_count: usize,
    pub transition_count: usize,
    pub unreachable: Vec<Rc<str>>,
    pub dead: Vec<Rc<str>>,
}

/// Whether a counterexample string should have been accepted or rejected by the student's
/// automaton
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterexampleKind {
    /// The reference accepts the string, the student's automaton rejects it
    ShouldAccept,
    /// The reference rejects the string, the student's automaton accepts it
    ShouldReject,
}

/// The outcome of comparing the two automata as language acceptors
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageComparison {
    pub equivalent: bool,
    /// A concrete string on which the automata disagree, when one was searched for and found.
    /// The empty string is a possible witness
    pub counterexample: Option<String>,
    pub counterexample_kind: Option<CounterexampleKind>,
}

/// The outcome of running one test case against the student's automaton
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestResult {
    pub input: String,
    pub expected: bool,
    pub actual: bool,
    pub passed: bool,
}

/// Everything the grading pipeline found out about a submission, structured for the UI
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feedback {
    pub summary: String,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub structural: Option<StructuralInfo>,
    pub language: Option<LanguageComparison>,
    pub test_results: Vec<TestResult>,
    pub hints: Vec<String>,
}

impl Feedback {
    /// All diagnostics, errors first
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }
}
