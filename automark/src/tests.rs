use crate::automaton::Automaton;
use crate::diagnostics::{CounterexampleKind, ErrorCode, Highlight};
use crate::equivalence;
use crate::grade::{grade, grade_with_tests, Config, EvaluationMode, ExpectedType, TestCase, Verbosity};
use crate::nfa::Nfa;
use crate::validation;
use proptest::prelude::*;
use rand::prelude::*;
use std::collections::HashSet;

fn compile(automaton: &Automaton) -> Nfa {
    Nfa::try_from(automaton).expect("test automaton should intern")
}

// --- Concrete grading scenarios ---

#[test]
fn renamed_automaton_is_equivalent() {
    let reference = Automaton::new(
        &["q0", "q1"],
        &["a", "b"],
        &[("q0", "a", "q1"), ("q0", "b", "q0"), ("q1", "a", "q1"), ("q1", "b", "q1")],
        "q0",
        &["q1"],
    );
    let student = Automaton::new(
        &["s0", "s1"],
        &["a", "b"],
        &[("s0", "a", "s1"), ("s0", "b", "s0"), ("s1", "a", "s1"), ("s1", "b", "s1")],
        "s0",
        &["s1"],
    );
    let result = grade(&student, &reference, &Config::default());
    assert!(result.is_correct);
    assert!(result.details.errors.is_empty());
    assert!(result.details.warnings.is_empty());
}

#[test]
fn epsilon_nfa_matches_plain_dfa_reference() {
    let student = Automaton::new(
        &["q0", "q1", "q2"],
        &["a"],
        &[("q0", "ε", "q1"), ("q1", "a", "q2")],
        "q0",
        &["q2"],
    );
    let reference = Automaton::new(&["s0", "s1"], &["a"], &[("s0", "a", "s1")], "s0", &["s1"]);
    assert!(equivalence::are_equivalent(&compile(&student), &compile(&reference)));
    let result = grade(&student, &reference, &Config::default());
    assert!(result.is_correct, "{}", result.feedback);
}

#[test]
fn acceptance_polarity_mismatch_highlights_the_state() {
    // Student accepts a+, reference accepts a*
    let student = Automaton::new(
        &["q0", "q1"],
        &["a"],
        &[("q0", "a", "q1"), ("q1", "a", "q1")],
        "q0",
        &["q1"],
    );
    let reference = Automaton::new(
        &["q0", "q1"],
        &["a"],
        &[("q0", "a", "q1"), ("q1", "a", "q1")],
        "q0",
        &["q0", "q1"],
    );
    let result = grade(&student, &reference, &Config::default());
    assert!(!result.is_correct);
    let polarity = result
        .details
        .errors
        .iter()
        .find(|d| matches!(d.highlight(), Some(Highlight::AcceptState(id)) if id.as_ref() == "q0"))
        .expect("the initial state's acceptance should be flagged");
    assert_eq!(polarity.code(), ErrorCode::LanguageMismatch);
    assert!(polarity.suggestion().unwrap().contains("accepting"));
    // The empty string is the shortest witness and should be reported
    let language = result.details.language.as_ref().unwrap();
    assert_eq!(language.counterexample.as_deref(), Some(""));
    assert_eq!(
        language.counterexample_kind,
        Some(CounterexampleKind::ShouldAccept)
    );
}

#[test]
fn non_minimal_submission_fails_only_when_minimality_is_required() {
    // Accepts a(a|b)* with four states; s1, s2 and s3 are indistinguishable
    let student = Automaton::new(
        &["s0", "s1", "s2", "s3"],
        &["a", "b"],
        &[
            ("s0", "a", "s1"),
            ("s1", "a", "s2"),
            ("s1", "b", "s1"),
            ("s2", "a", "s3"),
            ("s2", "b", "s2"),
            ("s3", "a", "s1"),
            ("s3", "b", "s3"),
        ],
        "s0",
        &["s1", "s2", "s3"],
    );
    let reference = Automaton::new(
        &["r0", "r1"],
        &["a", "b"],
        &[("r0", "a", "r1"), ("r1", "a", "r1"), ("r1", "b", "r1")],
        "r0",
        &["r1"],
    );

    let strict = Config {
        evaluation_mode: EvaluationMode::Strict,
        check_minimality: true,
        ..Config::default()
    };
    let result = grade(&student, &reference, &strict);
    assert!(!result.is_correct);
    assert!(result
        .details
        .errors
        .iter()
        .any(|d| d.code() == ErrorCode::NotMinimal));

    let without_check = Config {
        evaluation_mode: EvaluationMode::Strict,
        check_minimality: false,
        ..Config::default()
    };
    assert!(grade(&student, &reference, &without_check).is_correct);
}

#[test]
fn invalid_transition_destination_short_circuits() {
    let student = Automaton::new(&["q0", "q1"], &["a"], &[("q0", "a", "q5")], "q0", &["q1"]);
    let reference = Automaton::new(&["s0", "s1"], &["a"], &[("s0", "a", "s1")], "s0", &["s1"]);
    let result = grade(&student, &reference, &Config::default());
    assert!(!result.is_correct);
    assert_eq!(result.details.summary, "Your FSA has a structural problem");
    let error = &result.details.errors[0];
    assert_eq!(error.code(), ErrorCode::InvalidTransitionDest);
    assert!(matches!(
        error.highlight(),
        Some(Highlight::Transition { to, .. }) if to.as_ref() == "q5"
    ));
    // No language comparison ran
    assert!(result.details.language.is_none());
}

#[test]
fn divisibility_by_three_beats_a_two_state_claim() {
    // Binary numbers divisible by three: residue automaton
    let student = Automaton::new(
        &["r0", "r1", "r2"],
        &["0", "1"],
        &[
            ("r0", "0", "r0"),
            ("r0", "1", "r1"),
            ("r1", "0", "r2"),
            ("r1", "1", "r0"),
            ("r2", "0", "r1"),
            ("r2", "1", "r2"),
        ],
        "r0",
        &["r0"],
    );
    // A two-state automaton cannot express that language; this one tracks the parity of 1s
    let reference = Automaton::new(
        &["s0", "s1"],
        &["0", "1"],
        &[("s0", "0", "s0"), ("s0", "1", "s1"), ("s1", "0", "s1"), ("s1", "1", "s0")],
        "s0",
        &["s0"],
    );
    let result = grade(&student, &reference, &Config::default());
    assert!(!result.is_correct);
    assert!(result
        .details
        .errors
        .iter()
        .any(|d| matches!(d.highlight(), Some(Highlight::Transition { .. }))));
    assert!(result.details.language.as_ref().unwrap().counterexample.is_some());
}

// --- Pipeline behavior ---

#[test]
fn expected_dfa_rejects_nondeterminism_in_strict_mode() {
    let student = Automaton::new(
        &["q0", "q1"],
        &["a"],
        &[("q0", "a", "q1"), ("q0", "ε", "q1"), ("q1", "a", "q1")],
        "q0",
        &["q1"],
    );
    // Same language as the student's ε-NFA: a*... except the ε makes ε accepted too
    let reference = Automaton::new(
        &["s0", "s1"],
        &["a"],
        &[("s0", "a", "s1"), ("s1", "a", "s1")],
        "s0",
        &["s0", "s1"],
    );
    let strict = Config {
        evaluation_mode: EvaluationMode::Strict,
        expected_type: ExpectedType::Dfa,
        ..Config::default()
    };
    let result = grade(&student, &reference, &strict);
    assert!(!result.is_correct);
    assert!(result
        .details
        .errors
        .iter()
        .any(|d| d.code() == ErrorCode::WrongAutomatonType));

    // Lenient mode demotes the type requirement to a warning
    let lenient = Config {
        expected_type: ExpectedType::Dfa,
        ..Config::default()
    };
    let result = grade(&student, &reference, &lenient);
    assert!(result.is_correct, "{}", result.feedback);
    assert!(result
        .details
        .warnings
        .iter()
        .any(|d| d.code() == ErrorCode::WrongAutomatonType));
}

#[test]
fn partial_mode_scores_test_cases() {
    let reference = Automaton::new(&["s0", "s1"], &["a"], &[("s0", "a", "s1")], "s0", &["s1"]);
    // Accepts a+ instead of exactly "a"
    let student = Automaton::new(
        &["q0", "q1"],
        &["a"],
        &[("q0", "a", "q1"), ("q1", "a", "q1")],
        "q0",
        &["q1"],
    );
    let tests = [
        TestCase::new("a", true),
        TestCase::new("aa", false),
        TestCase::new("", false),
        TestCase::new("aaa", false),
    ];
    let partial = Config {
        evaluation_mode: EvaluationMode::Partial,
        ..Config::default()
    };
    let result = grade_with_tests(&student, &reference, &tests, &partial);
    assert!(!result.is_correct);
    assert_eq!(result.score, Some(0.5));
    assert_eq!(result.details.test_results.len(), 4);
    assert!(result
        .details
        .warnings
        .iter()
        .any(|d| d.code() == ErrorCode::TestCaseFailed));

    // Without test cases the mode has nothing to award
    let result = grade(&student, &reference, &partial);
    assert!(!result.is_correct);
    assert_eq!(result.score, None);
}

#[test]
fn verbosity_and_highlight_flags_strip_feedback() {
    let student = Automaton::new(
        &["q0", "q1", "q2"],
        &["a"],
        &[("q0", "a", "q1"), ("q1", "a", "q0")],
        "q0",
        &["q1"],
    );
    let reference = Automaton::new(&["s0", "s1"], &["a"], &[("s0", "a", "s1")], "s0", &["s1"]);

    let full = grade(&student, &reference, &Config::default());
    assert!(!full.is_correct);
    assert!(!full.details.hints.is_empty());
    assert!(full.details.structural.is_some());
    // q2 is unreachable and dead, reported as warnings only
    assert!(full
        .details
        .warnings
        .iter()
        .any(|d| d.code() == ErrorCode::UnreachableState));

    let minimal = Config {
        feedback_verbosity: Verbosity::Minimal,
        ..Config::default()
    };
    let stripped = grade(&student, &reference, &minimal);
    assert!(stripped.details.hints.is_empty());
    assert!(stripped.details.structural.is_none());

    let no_highlights = Config {
        highlight_errors: false,
        ..Config::default()
    };
    let plain = grade(&student, &reference, &no_highlights);
    assert!(plain
        .details
        .diagnostics()
        .all(|d| d.highlight().is_none()));

    let no_witness = Config {
        show_counterexample: false,
        ..Config::default()
    };
    let quiet = grade(&student, &reference, &no_witness);
    let language = quiet.details.language.as_ref().unwrap();
    assert!(language.counterexample.is_none());
    assert!(language.counterexample_kind.is_none());
}

#[test]
fn invalid_reference_is_an_internal_fault() {
    let student = Automaton::new(&["q0"], &["a"], &[("q0", "a", "q0")], "q0", &["q0"]);
    let reference = Automaton::new(&["s0"], &["a"], &[("s0", "a", "s9")], "s0", &["s0"]);
    let result = grade(&student, &reference, &Config::default());
    assert!(!result.is_correct);
    assert_eq!(result.details.errors.len(), 1);
    assert_eq!(result.details.errors[0].code(), ErrorCode::EvaluationError);
    assert!(result.feedback.contains("instructor"));
    assert!(result.details.errors[0].highlight().is_none());
}

#[test]
fn completeness_check_requires_determinism() {
    let nondeterministic = Automaton::new(
        &["q0"],
        &["a"],
        &[("q0", "ε", "q0")],
        "q0",
        &["q0"],
    );
    let diagnostics = validation::completeness(&nondeterministic);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), ErrorCode::NotComplete);
}

// --- Module-level checks ---

#[test]
fn validator_flags_and_orders_structural_faults() {
    let empty = Automaton::new(&[], &["a"], &[], "q0", &[]);
    let diagnostics = validation::validate(&empty);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), ErrorCode::EmptyStates);

    let messy = Automaton::new(
        &["q0", "q0"],
        &["a", "ε"],
        &[("q0", "b", "q0")],
        "q1",
        &["q2"],
    );
    let codes: Vec<ErrorCode> = validation::validate(&messy).iter().map(|d| d.code()).collect();
    assert!(codes.contains(&ErrorCode::InvalidState));
    assert!(codes.contains(&ErrorCode::InvalidSymbol));
    assert!(codes.contains(&ErrorCode::InvalidInitial));
    assert!(codes.contains(&ErrorCode::InvalidAccept));
    assert!(codes.contains(&ErrorCode::InvalidTransitionSymbol));
}

#[test]
fn subset_construction_handles_the_edge_cases() {
    // ε-reachable acceptance makes the initial DFA state accepting
    let via_epsilon = Automaton::new(
        &["q0", "q1"],
        &["a"],
        &[("q0", "ε", "q1")],
        "q0",
        &["q1"],
    );
    let dfa = compile(&via_epsilon).to_dfa();
    assert!(dfa.initial_state().is_accepting());
    assert!(dfa.accepts(&[]));

    // An empty alphabet produces a single state with no transitions
    let empty_alphabet = Automaton::new(&["q0", "q1"], &[], &[("q0", "ε", "q1")], "q0", &["q1"]);
    let dfa = compile(&empty_alphabet).to_dfa();
    assert_eq!(dfa.state_count(), 1);
    assert!(dfa.accepts(&[]));
}

#[test]
fn minimization_merges_dead_states_with_missing_transitions() {
    // p has no outgoing transitions at all, q loops without accepting: both are dead, and
    // both must collapse away exactly like a missing transition does
    let automaton = Automaton::new(
        &["i", "p", "q"],
        &["a", "b"],
        &[("i", "a", "p"), ("i", "b", "q"), ("q", "a", "q"), ("q", "b", "q")],
        "i",
        &["i"],
    );
    let minimal = compile(&automaton).as_deterministic().unwrap().minimized();
    assert_eq!(minimal.state_count(), 1);
    assert!(minimal.accepts(&[]));
    assert!(!minimal.accepts(&["a"]));
    assert!(!minimal.accepts(&["b", "a"]));
}

#[test]
fn minimization_keeps_complete_automata_complete() {
    let complete = Automaton::new(
        &["a0", "a1", "trap"],
        &["x"],
        &[("a0", "x", "a1"), ("a1", "x", "trap"), ("trap", "x", "trap")],
        "a0",
        &["a1"],
    );
    let minimal = compile(&complete).as_deterministic().unwrap().minimized();
    assert!(minimal.is_complete());
    assert_eq!(minimal.state_count(), 3);
}

#[test]
fn counterexample_is_shortest_and_lex_least() {
    // Student accepts strings ending in b, reference accepts strings containing b
    let student = Automaton::new(
        &["n", "y"],
        &["a", "b"],
        &[("n", "a", "n"), ("n", "b", "y"), ("y", "a", "n"), ("y", "b", "y")],
        "n",
        &["y"],
    );
    let reference = Automaton::new(
        &["n", "y"],
        &["a", "b"],
        &[("n", "a", "n"), ("n", "b", "y"), ("y", "a", "y"), ("y", "b", "y")],
        "n",
        &["y"],
    );
    let student_min = compile(&student).as_deterministic().unwrap().minimized();
    let reference_min = compile(&reference).as_deterministic().unwrap().minimized();
    let (witness, kind) =
        equivalence::find_counterexample(&student_min, &reference_min, 10).unwrap();
    // The shortest disagreements have length 2; "ba" is the lexicographically least
    assert_eq!(witness, "ba");
    assert_eq!(kind, CounterexampleKind::ShouldAccept);
}

#[test]
fn equivalence_is_transitive_on_a_known_family() {
    // Three shapes of "one or more a's"
    let minimal = Automaton::new(
        &["q0", "q1"],
        &["a"],
        &[("q0", "a", "q1"), ("q1", "a", "q1")],
        "q0",
        &["q1"],
    );
    let padded = Automaton::new(
        &["p0", "p1", "p2"],
        &["a"],
        &[("p0", "a", "p1"), ("p1", "a", "p2"), ("p2", "a", "p2")],
        "p0",
        &["p1", "p2"],
    );
    let with_epsilon = Automaton::new(
        &["e0", "e1", "e2"],
        &["a"],
        &[("e0", "a", "e1"), ("e1", "ε", "e2"), ("e2", "a", "e1")],
        "e0",
        &["e1"],
    );
    let automata = [compile(&minimal), compile(&padded), compile(&with_epsilon)];
    for a in &automata {
        for b in &automata {
            assert!(equivalence::are_equivalent(a, b));
        }
    }
}

#[test]
fn table_rendering_round_trips_through_the_parser() {
    let automaton = Automaton::new(
        &["s0", "s1", "s2"],
        &["a", "b"],
        &[
            ("s0", "a", "s1"),
            ("s0", "ε", "s2"),
            ("s1", "b", "s1"),
            ("s2", "a", "s0"),
            ("s2", "a", "s2"),
        ],
        "s0",
        &["s1"],
    );
    let printed = automaton.ascii_table();
    let reparsed: Automaton = crate::parser::fsa(&printed)
        .expect("rendered tables parse")
        .try_into()
        .expect("rendered tables convert");
    assert_eq!(reparsed.ascii_table(), printed);
    assert_eq!(reparsed.initial_state(), automaton.initial_state());
    assert_eq!(reparsed.states(), automaton.states());
}

// --- Property tests ---

proptest! {
    /// Simulation agrees across the NFA, its subset-construction DFA and the minimized DFA
    #[test]
    fn simulation_agrees_across_constructions(
        automaton in automaton_strategy(6, 3),
        words in prop::collection::vec(prop::collection::vec(0..3usize, 0..8), 16),
    ) {
        let nfa = Nfa::try_from(&automaton).unwrap();
        let dfa = nfa.to_dfa();
        let minimal = dfa.minimized();
        for word in &words {
            let symbols: Vec<&str> = word
                .iter()
                .map(|&i| automaton.alphabet()[i % automaton.alphabet().len()].as_ref())
                .collect();
            let expected = nfa.accepts(&symbols);
            prop_assert_eq!(dfa.accepts(&symbols), expected);
            prop_assert_eq!(minimal.accepts(&symbols), expected);
        }
    }

    /// Minimizing twice does not shrink the automaton further
    #[test]
    fn minimization_is_idempotent(automaton in dfa_strategy(8)) {
        let dfa = Nfa::try_from(&automaton).unwrap().as_deterministic().unwrap();
        let once = dfa.minimized();
        let twice = once.minimized();
        prop_assert_eq!(once.state_count(), twice.state_count());
    }

    /// Language equivalence is reflexive and symmetric
    #[test]
    fn equivalence_is_reflexive_and_symmetric(
        a in automaton_strategy(5, 3),
        b in automaton_strategy(5, 3),
    ) {
        let a = Nfa::try_from(&a).unwrap();
        let b = Nfa::try_from(&b).unwrap();
        prop_assert!(equivalence::are_equivalent(&a, &a));
        prop_assert_eq!(
            equivalence::are_equivalent(&a, &b),
            equivalence::are_equivalent(&b, &a)
        );
    }

    /// The minimized DFA has no unreachable states, keeps the alphabet, and is deterministic
    /// by construction
    #[test]
    fn minimized_dfa_is_clean(automaton in automaton_strategy(6, 3)) {
        let nfa = Nfa::try_from(&automaton).unwrap();
        let minimal = nfa.to_dfa().minimized();
        prop_assert_eq!(minimal.reachable_state_idx().len(), minimal.state_count());
        prop_assert_eq!(minimal.alphabet(), nfa.alphabet());
    }

    /// ε-closure is extensive and monotone
    #[test]
    fn closure_is_extensive_and_monotone(
        automaton in automaton_strategy(6, 2),
        members in prop::collection::vec(any::<bool>(), 6),
    ) {
        let nfa = Nfa::try_from(&automaton).unwrap();
        let small: HashSet<usize> = (0..nfa.state_count())
            .filter(|&i| members.get(i).copied().unwrap_or(false))
            .collect();
        let everything: HashSet<usize> = (0..nfa.state_count()).collect();
        let closure_small = nfa.closure_set(&small);
        prop_assert!(small.is_subset(&closure_small));
        prop_assert!(closure_small.is_subset(&nfa.closure_set(&everything)));
    }

    /// The validator never panics and returns the same diagnostics when run twice, even on
    /// thoroughly broken input
    #[test]
    fn validator_is_total_and_stable(automaton in junk_automaton_strategy()) {
        let first = validation::validate(&automaton);
        let second = validation::validate(&automaton);
        prop_assert_eq!(first, second);
    }

    /// An equivalent submission never receives error-severity diagnostics
    #[test]
    fn equivalent_submission_gets_clean_feedback(automaton in automaton_strategy(5, 3)) {
        let result = grade(&automaton, &automaton, &Config::default());
        prop_assert!(result.is_correct);
        prop_assert!(result.details.errors.is_empty());
    }
}

prop_compose! {
    /// A structurally valid automaton: unique states s0..sn, alphabet a.., random transitions
    /// where the symbol index one past the alphabet stands for ε
    fn automaton_strategy(max_states: usize, max_symbols: usize)
        (num_states in 1..max_states, num_symbols in 1..max_symbols)
        (
            num_states in Just(num_states),
            num_symbols in Just(num_symbols),
            accepting in prop::collection::vec(any::<bool>(), num_states..=num_states),
            transitions in prop::collection::vec(
                (0..num_states, 0..=num_symbols, 0..num_states),
                0..=num_states * (num_symbols + 1),
            ),
            initial in 0..num_states,
        )
    -> Automaton {
        let names: Vec<String> = (0..num_states).map(|i| format!("s{i}")).collect();
        let symbols: Vec<String> = (0..num_symbols)
            .map(|i| char::from(b'a' + i as u8).to_string())
            .collect();
        let states: Vec<&str> = names.iter().map(String::as_str).collect();
        let alphabet: Vec<&str> = symbols.iter().map(String::as_str).collect();
        let mut triples: Vec<(&str, &str, &str)> = transitions
            .iter()
            .map(|&(from, symbol, to)| (
                names[from].as_str(),
                if symbol == num_symbols { "ε" } else { symbols[symbol].as_str() },
                names[to].as_str(),
            ))
            .collect();
        // The declaration order of transitions carries no meaning and nothing may depend on it
        triples.shuffle(&mut thread_rng());
        let accepts: Vec<&str> = names
            .iter()
            .zip(&accepting)
            .filter(|(_, &accept)| accept)
            .map(|(name, _)| name.as_str())
            .collect();
        Automaton::new(&states, &alphabet, &triples, names[initial].as_str(), &accepts)
    }
}

prop_compose! {
    /// A complete DFA over {a, b}
    fn dfa_strategy(max_states: usize)
        (num_states in 1..max_states)
        (
            num_states in Just(num_states),
            accepting in prop::collection::vec(any::<bool>(), num_states..=num_states),
            targets in prop::collection::vec((0..num_states, 0..num_states), num_states..=num_states),
            initial in 0..num_states,
        )
    -> Automaton {
        let names: Vec<String> = (0..num_states).map(|i| format!("s{i}")).collect();
        let states: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut triples: Vec<(&str, &str, &str)> = Vec::with_capacity(num_states * 2);
        for (idx, &(on_a, on_b)) in targets.iter().enumerate() {
            triples.push((names[idx].as_str(), "a", names[on_a].as_str()));
            triples.push((names[idx].as_str(), "b", names[on_b].as_str()));
        }
        triples.shuffle(&mut thread_rng());
        let accepts: Vec<&str> = names
            .iter()
            .zip(&accepting)
            .filter(|(_, &accept)| accept)
            .map(|(name, _)| name.as_str())
            .collect();
        Automaton::new(&states, &["a", "b"], &triples, names[initial].as_str(), &accepts)
    }
}

/// Arbitrary garbage the validator must survive: duplicated or empty state names, ε markers in
/// the alphabet, transitions to undeclared states
fn junk_automaton_strategy() -> impl Strategy<Value = Automaton> {
    let name = prop::sample::select(vec!["", "s0", "s1", "s2", "q9"]);
    let symbol = prop::sample::select(vec!["a", "b", "ε", "epsilon", "", "z"]);
    (
        prop::collection::vec(name.clone(), 0..5),
        prop::collection::vec(symbol.clone(), 0..4),
        prop::collection::vec((name.clone(), symbol, name.clone()), 0..8),
        name,
    )
        .prop_map(|(states, alphabet, transitions, initial)| {
            let triples: Vec<(&str, &str, &str)> = transitions
                .iter()
                .map(|(from, symbol, to)| (*from, *symbol, *to))
                .collect();
            let accepts: Vec<&str> = states.iter().take(1).copied().collect();
            Automaton::new(&states, &alphabet, &triples, initial, &accepts)
        })
}
