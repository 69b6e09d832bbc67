//! # Language equivalence
//! Decides whether two automata accept the same language and, when they do not, says exactly
//! where they differ. Both automata are brought into minimal DFA form (subset construction for
//! nondeterministic inputs, then Hopcroft minimization), and since minimal DFAs of the same
//! language are unique up to renaming, a breadth-first traversal of the two machines in
//! lockstep either completes a bijection between their states or witnesses the first fault:
//! a state with the wrong acceptance, a missing or unexpected transition, or a transition with
//! the wrong destination. Each finding becomes one [Diagnostic] with a highlight.
//!
//! ```
//! use automark::automaton::Automaton;
//! use automark::equivalence::same_language;
//! use automark::nfa::Nfa;
//!
//! let even = Automaton::new(
//!     &["e", "o"],
//!     &["a"],
//!     &[("e", "a", "o"), ("o", "a", "e")],
//!     "e",
//!     &["e"],
//! );
//! // The same automaton with the states named differently
//! let renamed = Automaton::new(
//!     &["x", "y"],
//!     &["a"],
//!     &[("x", "a", "y"), ("y", "a", "x")],
//!     "x",
//!     &["x"],
//! );
//! let even = Nfa::try_from(&even).unwrap();
//! let renamed = Nfa::try_from(&renamed).unwrap();
//! assert!(same_language(&even, &renamed).is_empty());
//! ```

use crate::dfa::Dfa;
use crate::diagnostics::{CounterexampleKind, Diagnostic, ErrorCode, Highlight};
use crate::nfa::Nfa;
use crate::util::{alphabet_difference, alphabet_equal};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

/// Compares the languages of two automata. Returns the divergence diagnostics; the automata are
/// equivalent iff the list is empty. Nondeterministic inputs are determinized, both automata
/// are minimized, and the minimal machines are compared by [isomorphism_diagnostics]
pub fn same_language(a: &Nfa, b: &Nfa) -> Vec<Diagnostic> {
    let a = a.as_deterministic().unwrap_or_else(|| a.to_dfa());
    let b = b.as_deterministic().unwrap_or_else(|| b.to_dfa());
    isomorphism_diagnostics(&a.minimized(), &b.minimized())
}

/// Checks whether two automata accept the same language
pub fn are_equivalent(a: &Nfa, b: &Nfa) -> bool {
    same_language(a, b).is_empty()
}

/// Compares two *minimal* DFAs by building the state bijection breadth-first from the pair of
/// initial states. Emits at most one primary diagnostic per diverging state or transition pair,
/// each highlighting the offending element of the first automaton (the student's). On unequal
/// alphabets the traversal is skipped entirely, since transitions cannot be matched up
pub fn isomorphism_diagnostics(student: &Dfa, reference: &Dfa) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if !alphabet_equal(student.alphabet(), reference.alphabet()) {
        let extra = alphabet_difference(student.alphabet(), reference.alphabet());
        let missing = alphabet_difference(reference.alphabet(), student.alphabet());
        let mut message = String::from("Your alphabet does not match the expected one.");
        if !extra.is_empty() {
            message.push_str(&format!(" You have extra symbols: {}.", extra.join(", ")));
        }
        if !missing.is_empty() {
            message.push_str(&format!(" You are missing symbols: {}.", missing.join(", ")));
        }
        let mut diagnostic = Diagnostic::error(ErrorCode::LanguageMismatch, message)
            .with_suggestion("Make sure your alphabet contains exactly the symbols needed for this language");
        if let Some(symbol) = extra.first().copied().or_else(|| missing.first().copied()) {
            diagnostic = diagnostic.with_highlight(Highlight::symbol(symbol));
        }
        diagnostics.push(diagnostic);
        return diagnostics;
    }

    if student.state_count() > reference.state_count() {
        diagnostics.push(
            Diagnostic::error(
                ErrorCode::LanguageMismatch,
                format!(
                    "Your FSA boils down to {} state(s), but the expected language only needs {}",
                    student.state_count(),
                    reference.state_count()
                ),
            )
            .with_suggestion("Some of your states distinguish inputs that the language does not care about"),
        );
    } else if student.state_count() < reference.state_count() {
        diagnostics.push(
            Diagnostic::error(
                ErrorCode::LanguageMismatch,
                format!(
                    "Your FSA boils down to {} state(s), but the expected language needs at least {}",
                    student.state_count(),
                    reference.state_count()
                ),
            )
            .with_suggestion(
                "Think about which situations the automaton must tell apart; each usually needs its own state",
            ),
        );
    }

    // Both alphabets hold the same symbols, possibly in different orders
    let translation: Vec<usize> = student
        .alphabet()
        .iter()
        .map(|symbol| {
            reference
                .alphabet()
                .iter()
                .position(|other| other == symbol)
                .expect("alphabets were checked equal")
        })
        .collect();

    let mut mapping: HashMap<usize, usize> =
        HashMap::from([(student.initial_state_index(), reference.initial_state_index())]);
    let mut queue = VecDeque::from([student.initial_state_index()]);

    while let Some(s) = queue.pop_front() {
        let t = mapping[&s];
        let s_state = &student.states()[s];
        let t_state = &reference.states()[t];

        if s_state.is_accepting() != t_state.is_accepting() {
            if t_state.is_accepting() {
                diagnostics.push(
                    Diagnostic::error(
                        ErrorCode::LanguageMismatch,
                        format!(
                            "State '{}' should be an accepting state; strings ending here must be accepted",
                            s_state.name()
                        ),
                    )
                    .with_highlight(Highlight::accept_state(s_state.name()))
                    .with_suggestion(format!("Mark state '{}' as accepting", s_state.name())),
                );
            } else {
                diagnostics.push(
                    Diagnostic::error(
                        ErrorCode::LanguageMismatch,
                        format!(
                            "State '{}' should not be an accepting state; strings ending here must be rejected",
                            s_state.name()
                        ),
                    )
                    .with_highlight(Highlight::accept_state(s_state.name()))
                    .with_suggestion(format!("Remove state '{}' from the accepting states", s_state.name())),
                );
            }
        }

        for (c, symbol) in student.alphabet().iter().enumerate() {
            let s_next = s_state.transitions()[c];
            let t_next = t_state.transitions()[translation[c]];
            match (s_next, t_next) {
                (None, None) => {}
                (None, Some(_)) => diagnostics.push(
                    Diagnostic::error(
                        ErrorCode::LanguageMismatch,
                        format!(
                            "State '{}' is missing a transition for '{symbol}'; some inputs get stuck here",
                            s_state.name()
                        ),
                    )
                    .with_highlight(Highlight::state(s_state.name()))
                    .with_suggestion(format!(
                        "Add a transition from '{}' on '{symbol}'",
                        s_state.name()
                    )),
                ),
                (Some(s2), None) => diagnostics.push(
                    Diagnostic::error(
                        ErrorCode::LanguageMismatch,
                        format!(
                            "State '{}' has an unexpected transition on '{symbol}'; inputs that should get rejected here continue instead",
                            s_state.name()
                        ),
                    )
                    .with_highlight(Highlight::Transition {
                        from: s_state.name.clone(),
                        symbol: symbol.clone(),
                        to: student.states()[s2].name.clone(),
                    })
                    .with_suggestion(format!(
                        "Review whether the transition from '{}' on '{symbol}' should exist",
                        s_state.name()
                    )),
                ),
                (Some(s2), Some(t2)) => match mapping.entry(s2) {
                    Entry::Vacant(entry) => {
                        entry.insert(t2);
                        queue.push_back(s2);
                    }
                    Entry::Occupied(entry) if *entry.get() != t2 => diagnostics.push(
                        Diagnostic::error(
                            ErrorCode::LanguageMismatch,
                            format!(
                                "In state '{}' reading '{symbol}' you go to '{}', which leads to incorrect behavior",
                                s_state.name(),
                                student.states()[s2].name()
                            ),
                        )
                        .with_highlight(Highlight::Transition {
                            from: s_state.name.clone(),
                            symbol: symbol.clone(),
                            to: student.states()[s2].name.clone(),
                        })
                        .with_suggestion(format!(
                            "Trace a few strings through state '{}' and check where reading '{symbol}' should lead",
                            s_state.name()
                        )),
                    ),
                    Entry::Occupied(_) => {}
                },
            }
        }
    }

    diagnostics
}

/// Searches for a shortest string on which the two DFAs disagree, exploring symbols in alphabet
/// order so the first hit is also the lexicographically least among the shortest. Missing
/// transitions behave as a rejecting sink. Returns `None` if no witness of length at most
/// `max_len` exists (or the alphabets differ, in which case there is no common word space).
/// This search is a bounded aid for feedback, never the equivalence criterion itself
pub fn find_counterexample(
    student: &Dfa,
    reference: &Dfa,
    max_len: usize,
) -> Option<(String, CounterexampleKind)> {
    if !alphabet_equal(student.alphabet(), reference.alphabet()) {
        return None;
    }
    let translation: Vec<usize> = student
        .alphabet()
        .iter()
        .map(|symbol| {
            reference
                .alphabet()
                .iter()
                .position(|other| other == symbol)
                .expect("alphabets were checked equal")
        })
        .collect();

    let start = (
        Some(student.initial_state_index()),
        Some(reference.initial_state_index()),
    );
    let mut visited = HashSet::from([start]);
    let mut queue: VecDeque<((Option<usize>, Option<usize>), Vec<usize>)> =
        VecDeque::from([(start, Vec::new())]);

    while let Some(((s, t), word)) = queue.pop_front() {
        let student_accepts = s.map_or(false, |q| student.states()[q].is_accepting());
        let reference_accepts = t.map_or(false, |q| reference.states()[q].is_accepting());
        if student_accepts != reference_accepts {
            let witness = word
                .iter()
                .map(|&c| student.alphabet()[c].as_ref())
                .collect::<String>();
            let kind = if reference_accepts {
                CounterexampleKind::ShouldAccept
            } else {
                CounterexampleKind::ShouldReject
            };
            return Some((witness, kind));
        }
        if word.len() == max_len {
            continue;
        }
        for c in 0..student.alphabet().len() {
            let s2 = s.and_then(|q| student.states()[q].transitions()[c]);
            let t2 = t.and_then(|q| reference.states()[q].transitions()[translation[c]]);
            if s2.is_none() && t2.is_none() {
                // Both machines are stuck; no extension of this word can tell them apart
                continue;
            }
            if visited.insert((s2, t2)) {
                let mut next_word = word.clone();
                next_word.push(c);
                queue.push_back(((s2, t2), next_word));
            }
        }
    }

    None
}
