//!# automark
//!
//! `automark` is the analysis engine of an automated grader for finite-state automaton
//! exercises. Given a student-submitted automaton and an instructor's reference solution, it
//! decides whether the two accept the same language and, when they do not, produces diagnostics
//! that pinpoint the offending state or transition so a teaching UI can highlight it.
//!
//! ## Usage
//!
//! ```rust
//! use automark::automaton::Automaton;
//! use automark::grade::{grade, Config};
//!
//! // Reference: binary strings with an even number of 1s
//! let reference = Automaton::new(
//!     &["even", "odd"],
//!     &["0", "1"],
//!     &[
//!         ("even", "0", "even"),
//!         ("even", "1", "odd"),
//!         ("odd", "0", "odd"),
//!         ("odd", "1", "even"),
//!     ],
//!     "even",
//!     &["even"],
//! );
//!
//! // A student's submission accepting an odd number of 1s instead
//! let student = Automaton::new(
//!     &["s0", "s1"],
//!     &["0", "1"],
//!     &[("s0", "0", "s0"), ("s0", "1", "s1"), ("s1", "0", "s1"), ("s1", "1", "s0")],
//!     "s0",
//!     &["s1"],
//! );
//!
//! let result = grade(&student, &reference, &Config::default());
//! assert!(!result.is_correct);
//! // The diagnostics localize the fault: the initial state has the wrong acceptance
//! assert!(!result.details.errors.is_empty());
//! ```
//!
//! ## Pipeline
//!
//! A grading call flows through a fixed sequence of components:
//!
//! * [Structural validation](validation) of both automata; malformed submissions short-circuit
//!   with precise diagnostics instead of reaching the language comparison
//! * Interning into the dense [Nfa](nfa::Nfa)/[Dfa](dfa::Dfa) forms, with
//!   [ε-closure](nfa::Nfa::closure) and the [subset construction](nfa::Nfa::to_dfa) for
//!   nondeterministic submissions
//! * [Hopcroft minimization](dfa::Dfa::minimized) of both machines
//! * [Canonical isomorphism](equivalence::isomorphism_diagnostics) of the minimal DFAs, which
//!   either certifies equivalence or emits one diagnostic per divergence, plus an optional
//!   [counterexample search](equivalence::find_counterexample)
//! * [Feedback assembly](grade) according to the configured mode, verbosity and highlighting
//!
//! The engine is stateless across calls and purely computational: no I/O, no caches, no
//! globals. Transport concerns (JSON, HTTP, frontend encodings of transitions) are left to the
//! caller; the [parser] module provides a human-friendly text format used by the command-line
//! driver and the test suite.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing](parser::fsa) automaton tables and [validating](validation::validate) raw automata
//! * [Simulating](nfa::Nfa::simulate) a word, with full ε support
//! * Converting [NFAs to DFAs](nfa::Nfa::to_dfa) by subset construction
//! * [Minimizing a DFA](dfa::Dfa::minimized) and [testing minimality](dfa::Dfa::is_minimal)
//! * [Deciding language equivalence](equivalence::same_language) with structural witnesses
//! * [Searching for a counterexample string](equivalence::find_counterexample)
//! * [Grading a submission](grade::grade) against a reference with configurable strictness

pub mod automaton;
pub mod dfa;
pub mod diagnostics;
pub mod equivalence;
pub mod grade;
pub mod nfa;
pub mod parser;
mod table;
mod util;
pub mod validation;

#[cfg(test)]
mod tests;
