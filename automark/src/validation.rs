//! # Structural validation
//! Checks the well-formedness of a raw [Automaton] and derives its structural properties. All
//! checks are total: problems are returned as [Diagnostic]s with precise highlights, and the
//! functions never panic regardless of how broken the input is.
//!
//! The checks are ordered. [validate] runs them in sequence and stops early when a check
//! invalidates the ones after it: a malformed automaton (states referenced but not declared,
//! symbols outside the alphabet, ...) is not subjected to determinism or reachability analysis,
//! and completeness is only meaningful for deterministic automata.
//!
//! ```
//! use automark::automaton::Automaton;
//! use automark::diagnostics::ErrorCode;
//! use automark::validation;
//!
//! // The transition target "q5" is not a declared state
//! let automaton = Automaton::new(&["q0", "q1"], &["a"], &[("q0", "a", "q5")], "q0", &["q1"]);
//! let diagnostics = validation::validate(&automaton);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].code(), ErrorCode::InvalidTransitionDest);
//! ```

use crate::automaton::{is_epsilon, Automaton, Transition};
use crate::diagnostics::{Diagnostic, ErrorCode, Highlight, StructuralInfo};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// Runs all structural checks in order: well-formedness, determinism, completeness (only when
/// deterministic), reachability and liveness. Returns early with just the well-formedness
/// diagnostics if any of them is an error, since the later checks are meaningless on a malformed
/// automaton
pub fn validate(automaton: &Automaton) -> Vec<Diagnostic> {
    let mut diagnostics = well_formedness(automaton);
    if diagnostics.iter().any(Diagnostic::is_error) {
        return diagnostics;
    }
    let determinism_diagnostics = determinism(automaton);
    let deterministic = determinism_diagnostics.is_empty();
    diagnostics.extend(determinism_diagnostics);
    if deterministic {
        diagnostics.extend(completeness(automaton));
    }
    diagnostics.extend(unreachable_states(automaton));
    diagnostics.extend(dead_states(automaton));
    diagnostics
}

/// Checks the invariants of the 5-tuple itself: states and alphabet non-empty, identifiers
/// non-empty and unique, no ε marker inside the alphabet, initial and accepting states declared,
/// and every transition within the declared states and symbols. Returns immediately if there are
/// no states at all, since every other check depends on them
pub fn well_formedness(automaton: &Automaton) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if automaton.states().is_empty() {
        diagnostics.push(
            Diagnostic::error(
                ErrorCode::EmptyStates,
                "Your automaton needs at least one state to process input",
            )
            .with_suggestion("Start by adding a state, it will be the starting point of the automaton"),
        );
        return diagnostics;
    }

    let mut seen_states = HashSet::new();
    for state in automaton.states() {
        if state.is_empty() {
            diagnostics.push(
                Diagnostic::error(ErrorCode::InvalidState, "State identifiers must not be empty")
                    .with_highlight(Highlight::State(state.clone()))
                    .with_suggestion("Give every state a non-empty name"),
            );
        } else if !seen_states.insert(state.as_ref()) {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::InvalidState,
                    format!("State '{state}' is declared more than once"),
                )
                .with_highlight(Highlight::State(state.clone()))
                .with_suggestion(format!("Remove the duplicate declaration of '{state}'")),
            );
        }
    }
    let states = seen_states;

    if automaton.alphabet().is_empty() {
        diagnostics.push(
            Diagnostic::error(
                ErrorCode::EmptyAlphabet,
                "Your automaton needs an alphabet, the set of symbols it can read",
            )
            .with_suggestion("Define the input symbols the automaton should recognize, e.g. 'a', 'b' or '0', '1'"),
        );
    }

    let mut seen_symbols = HashSet::new();
    for symbol in automaton.alphabet() {
        if is_epsilon(symbol) {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::InvalidSymbol,
                    "The alphabet must not contain the ε marker; ε-moves belong on transitions, not in the alphabet",
                )
                .with_highlight(Highlight::Symbol(symbol.clone()))
                .with_suggestion("Remove ε from the alphabet and write ε-moves as transitions instead"),
            );
        } else if !seen_symbols.insert(symbol.as_ref()) {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::InvalidSymbol,
                    format!("'{symbol}' appears more than once in the alphabet"),
                )
                .with_highlight(Highlight::Symbol(symbol.clone()))
                .with_suggestion(format!("Keep a single occurrence of '{symbol}'")),
            );
        }
    }
    let alphabet = seen_symbols;

    let initial = automaton.initial_state();
    if !states.contains(initial) {
        diagnostics.push(
            Diagnostic::error(
                ErrorCode::InvalidInitial,
                format!("The initial state '{initial}' does not exist in your automaton"),
            )
            .with_highlight(Highlight::initial_state(initial))
            .with_suggestion(format!(
                "Either add '{initial}' to your states, or choose an existing state as the initial state"
            )),
        );
    }

    let mut seen_accepting = HashSet::new();
    for accept in automaton.accept_states() {
        if !states.contains(accept.as_ref()) && seen_accepting.insert(accept.as_ref()) {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::InvalidAccept,
                    format!("The accepting state '{accept}' is not part of your state set"),
                )
                .with_highlight(Highlight::AcceptState(accept.clone()))
                .with_suggestion(format!(
                    "Either add '{accept}' to your states, or remove it from the accepting states"
                )),
            );
        }
    }

    for t in automaton.transitions() {
        if !states.contains(t.from()) {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::InvalidTransitionSource,
                    format!("The transition {t} starts from '{}', but that state does not exist", t.from()),
                )
                .with_highlight(transition_highlight(t))
                .with_suggestion(format!(
                    "Add '{}' to your states, or let this transition start from an existing state",
                    t.from()
                )),
            );
        }
        if !states.contains(t.to()) {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::InvalidTransitionDest,
                    format!("The transition {t} goes to '{}', but that state does not exist", t.to()),
                )
                .with_highlight(transition_highlight(t))
                .with_suggestion(format!(
                    "Add '{}' to your states, or let this transition go to an existing state",
                    t.to()
                )),
            );
        }
        if !t.is_epsilon() && !alphabet.contains(t.symbol()) {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::InvalidTransitionSymbol,
                    format!(
                        "The symbol '{}' of the transition {t} is not in your alphabet",
                        t.symbol()
                    ),
                )
                .with_highlight(transition_highlight(t))
                .with_suggestion(format!(
                    "Either add '{}' to your alphabet, or change this transition to use an existing symbol",
                    t.symbol()
                )),
            );
        }
    }

    diagnostics
}

/// Checks whether the automaton is deterministic: no ε-transitions, and no `(from, symbol)` pair
/// used by two transitions. One diagnostic per offending transition
pub fn determinism(automaton: &Automaton) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for t in automaton.transitions() {
        if t.is_epsilon() {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::NotDeterministic,
                    format!(
                        "The ε-transition from '{}' to '{}' makes this automaton non-deterministic",
                        t.from(),
                        t.to()
                    ),
                )
                .with_highlight(transition_highlight(t))
                .with_suggestion(
                    "Remove the ε-transition for a DFA, or note that an NFA/ε-NFA is also a valid automaton",
                ),
            );
        }
    }

    let mut seen = HashSet::new();
    for t in automaton.transitions() {
        if t.is_epsilon() {
            continue;
        }
        if !seen.insert((t.from(), t.symbol())) {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::DuplicateTransition,
                    format!(
                        "There are multiple transitions from '{}' on '{}'; a DFA can only have one",
                        t.from(),
                        t.symbol()
                    ),
                )
                .with_highlight(transition_highlight(t))
                .with_suggestion(format!(
                    "Keep a single transition from '{}' on '{}', or intentionally make it an NFA",
                    t.from(),
                    t.symbol()
                )),
            );
        }
    }

    diagnostics
}

/// Checks whether every `(state, symbol)` pair has an outgoing transition. Completeness is only
/// defined for deterministic automata; on a non-deterministic input this returns a single
/// [NotComplete](ErrorCode::NotComplete) diagnostic instead of a meaningless per-pair listing
pub fn completeness(automaton: &Automaton) -> Vec<Diagnostic> {
    if !determinism(automaton).is_empty() {
        return vec![Diagnostic::error(
            ErrorCode::NotComplete,
            "Completeness is only defined for deterministic automata; resolve the determinism issues first",
        )];
    }

    let covered: HashSet<(&str, &str)> = automaton
        .transitions()
        .iter()
        .map(|t| (t.from(), t.symbol()))
        .collect();

    let mut diagnostics = Vec::new();
    for state in automaton.states() {
        for symbol in automaton.alphabet() {
            if !covered.contains(&(state.as_ref(), symbol.as_ref())) {
                diagnostics.push(
                    Diagnostic::error(
                        ErrorCode::MissingTransition,
                        format!("State '{state}' has no transition for the symbol '{symbol}'"),
                    )
                    .with_highlight(Highlight::State(state.clone()))
                    .with_suggestion(format!(
                        "Add a transition from '{state}' on '{symbol}'; it may go to any state, including a trap state"
                    )),
                );
            }
        }
    }
    diagnostics
}

/// Finds all states with no path from the initial state, following every transition including
/// ε-moves. Unreachable states are warnings: they never change the language
pub fn unreachable_states(automaton: &Automaton) -> Vec<Diagnostic> {
    unreachable_ids(automaton)
        .into_iter()
        .map(|state| {
            Diagnostic::warning(
                ErrorCode::UnreachableState,
                format!("State '{state}' can never be reached from the initial state"),
            )
            .with_highlight(Highlight::State(state.clone()))
            .with_suggestion(format!(
                "Connect '{state}' to the automaton by adding a transition to it, or remove it"
            ))
        })
        .collect()
}

/// Finds all dead states, that is, states from which no accepting state can be reached. With an
/// empty accepting set every state is dead and the language is empty. Dead states are warnings:
/// trap states are often intentional
pub fn dead_states(automaton: &Automaton) -> Vec<Diagnostic> {
    if automaton.accept_states().is_empty() {
        return automaton
            .states()
            .iter()
            .map(|state| {
                Diagnostic::warning(
                    ErrorCode::DeadState,
                    "Your automaton has no accepting states, so no input can ever be accepted",
                )
                .with_highlight(Highlight::State(state.clone()))
                .with_suggestion("Mark at least one state as accepting if the automaton should accept anything")
            })
            .collect();
    }

    dead_ids(automaton)
        .into_iter()
        .map(|state| {
            Diagnostic::warning(
                ErrorCode::DeadState,
                format!(
                    "State '{state}' is a dead end: once entered, no accepting state can be reached"
                ),
            )
            .with_highlight(Highlight::State(state.clone()))
            .with_suggestion(format!(
                "This may be an intentional trap state; otherwise add a path from '{state}' to an accepting state"
            ))
        })
        .collect()
}

/// Aggregates the derived structural properties of an automaton: determinism, completeness,
/// counts, and the unreachable and dead state sets
pub fn structural_info(automaton: &Automaton) -> StructuralInfo {
    let deterministic = determinism(automaton).is_empty();
    let complete = deterministic && completeness(automaton).is_empty();
    let dead = if automaton.accept_states().is_empty() {
        automaton.states().to_vec()
    } else {
        dead_ids(automaton)
    };
    StructuralInfo {
        deterministic,
        complete,
        state_count: automaton.states().len(),
        transition_count: automaton.transitions().len(),
        unreachable: unreachable_ids(automaton),
        dead,
    }
}

fn transition_highlight(t: &Transition) -> Highlight {
    Highlight::Transition {
        from: t.from.clone(),
        symbol: t.symbol.clone(),
        to: t.to.clone(),
    }
}

fn unreachable_ids(automaton: &Automaton) -> Vec<Rc<str>> {
    if !automaton.has_state(automaton.initial_state()) {
        // Caught by well-formedness; there is no sensible starting point here
        return Vec::new();
    }

    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for t in automaton.transitions() {
        successors.entry(t.from()).or_default().push(t.to());
    }

    let mut visited = HashSet::new();
    visited.insert(automaton.initial_state());
    let mut queue = VecDeque::from([automaton.initial_state()]);
    while let Some(state) = queue.pop_front() {
        for &next in successors.get(state).into_iter().flatten() {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    automaton
        .states()
        .iter()
        .filter(|state| !visited.contains(state.as_ref()))
        .cloned()
        .collect()
}

fn dead_ids(automaton: &Automaton) -> Vec<Rc<str>> {
    let mut predecessors: HashMap<&str, Vec<&str>> = HashMap::new();
    for t in automaton.transitions() {
        predecessors.entry(t.to()).or_default().push(t.from());
    }

    let mut live: HashSet<&str> = automaton
        .accept_states()
        .iter()
        .map(Rc::as_ref)
        .collect();
    let mut queue: VecDeque<&str> = live.iter().copied().collect();
    while let Some(state) = queue.pop_front() {
        for &previous in predecessors.get(state).into_iter().flatten() {
            if live.insert(previous) {
                queue.push_back(previous);
            }
        }
    }

    automaton
        .states()
        .iter()
        .filter(|state| !live.contains(state.as_ref()))
        .cloned()
        .collect()
}
