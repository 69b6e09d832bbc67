//! # Interned nondeterministic automaton
//! The NFA module includes the [Nfa] struct, the dense internal representation of a (possibly
//! nondeterministic, possibly ε-moving) automaton used by all algorithms: state identifiers are
//! interned to indices once per grading call, so ε-closure, subset construction and simulation
//! work on plain `usize` tables instead of string lookups.
//!
//! An [Nfa] is created from a raw [Automaton](crate::automaton::Automaton) with [TryFrom]. The
//! conversion only succeeds for structurally well-formed automata; the grading pipeline
//! validates first and treats a conversion failure after a clean validation as an internal
//! fault.
//!
//! ## Example
//! ```
//! use automark::automaton::Automaton;
//! use automark::nfa::Nfa;
//!
//! // An ε-NFA accepting exactly the string "a"
//! let automaton = Automaton::new(
//!     &["q0", "q1", "q2"],
//!     &["a"],
//!     &[("q0", "ε", "q1"), ("q1", "a", "q2")],
//!     "q0",
//!     &["q2"],
//! );
//! let nfa = Nfa::try_from(&automaton).unwrap();
//! assert!(!nfa.is_deterministic());
//! assert!(nfa.accepts(&["a"]));
//! assert!(!nfa.accepts(&[]));
//!
//! // The subset construction produces an equivalent DFA with states named q0, q1, ...
//! let dfa = nfa.to_dfa();
//! assert!(dfa.accepts(&["a"]));
//! assert!(!dfa.accepts(&["a", "a"]));
//! ```
//!
//! ## ε-closure
//! [Nfa::closure] computes the set of states reachable from one state by ε-moves alone, with a
//! worklist in O(|Q| + |E_ε|). [Nfa::closures] computes the table of all singleton closures
//! once, which the subset construction and the evaluator share so no closure is recomputed
//! within one call. Nothing is cached across calls: the engine is stateless.

use crate::automaton::{is_epsilon, Automaton};
use crate::dfa::{Dfa, DfaState};
pub use eval::{NfaEvaluator, Simulation};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub mod eval;

/// A nondeterministic finite automaton over interned state indices, with optional ε-moves
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<NfaState>,
    pub(crate) initial_state: usize,
}

/// A state of an [Nfa]: its name, whether it is accepting, its ε-successors, and its successors
/// for each element of the alphabet (in the alphabet's ordering)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NfaState {
    pub(crate) name: Rc<str>,
    pub(crate) accepting: bool,
    pub(crate) epsilon_transitions: Vec<usize>,
    pub(crate) transitions: Vec<Vec<usize>>,
}

impl NfaState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Gets the successor sets for each element of the alphabet, in the alphabet's ordering
    pub fn transitions(&self) -> &[Vec<usize>] {
        &self.transitions
    }

    /// Gets the ε-successors of this state
    pub fn epsilon_transitions(&self) -> &[usize] {
        &self.epsilon_transitions
    }
}

/// The ways interning a raw automaton can fail. The grading pipeline never shows these to the
/// student: validation reports the same problems as diagnostics first, so hitting one of these
/// afterwards is an engine fault
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("state identifiers must not be empty")]
    EmptyStateName,
    #[error("state '{0}' is declared more than once")]
    DuplicateState(String),
    #[error("the alphabet contains an ε marker")]
    EpsilonInAlphabet,
    #[error("'{0}' appears more than once in the alphabet")]
    DuplicateSymbol(String),
    #[error("the initial state '{0}' is not a declared state")]
    UnknownInitialState(String),
    #[error("the accepting state '{0}' is not a declared state")]
    UnknownAcceptState(String),
    #[error("the transition {0} references an undeclared state")]
    UnknownTransitionState(String),
    #[error("the transition {0} uses a symbol outside the alphabet")]
    UnknownTransitionSymbol(String),
}

impl TryFrom<&Automaton> for Nfa {
    type Error = CompileError;

    fn try_from(automaton: &Automaton) -> Result<Self, Self::Error> {
        use CompileError::*;

        let mut state_index = HashMap::new();
        for (idx, name) in automaton.states().iter().enumerate() {
            if name.is_empty() {
                return Err(EmptyStateName);
            }
            if state_index.insert(name.as_ref(), idx).is_some() {
                return Err(DuplicateState(name.to_string()));
            }
        }

        let mut symbol_index = HashMap::new();
        for (idx, symbol) in automaton.alphabet().iter().enumerate() {
            if is_epsilon(symbol) {
                return Err(EpsilonInAlphabet);
            }
            if symbol_index.insert(symbol.as_ref(), idx).is_some() {
                return Err(DuplicateSymbol(symbol.to_string()));
            }
        }

        let initial_state = *state_index
            .get(automaton.initial_state())
            .ok_or_else(|| UnknownInitialState(automaton.initial_state().to_string()))?;

        let mut accepting = vec![false; automaton.states().len()];
        for accept in automaton.accept_states() {
            let &idx = state_index
                .get(accept.as_ref())
                .ok_or_else(|| UnknownAcceptState(accept.to_string()))?;
            accepting[idx] = true;
        }

        let mut states = automaton
            .states()
            .iter()
            .zip(accepting)
            .map(|(name, accepting)| NfaState {
                name: name.clone(),
                accepting,
                epsilon_transitions: Vec::new(),
                transitions: vec![Vec::new(); automaton.alphabet().len()],
            })
            .collect::<Vec<_>>();

        for t in automaton.transitions() {
            let &from = state_index
                .get(t.from())
                .ok_or_else(|| UnknownTransitionState(t.to_string()))?;
            let &to = state_index
                .get(t.to())
                .ok_or_else(|| UnknownTransitionState(t.to_string()))?;
            if t.is_epsilon() {
                if !states[from].epsilon_transitions.contains(&to) {
                    states[from].epsilon_transitions.push(to);
                }
            } else {
                let &symbol = symbol_index
                    .get(t.symbol())
                    .ok_or_else(|| UnknownTransitionSymbol(t.to_string()))?;
                if !states[from].transitions[symbol].contains(&to) {
                    states[from].transitions[symbol].push(to);
                }
            }
        }

        Ok(Nfa {
            alphabet: automaton.alphabet().iter().cloned().collect(),
            states,
            initial_state,
        })
    }
}

impl Nfa {
    /// Gets the alphabet of this NFA
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the states of this NFA
    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    /// Gets the number of states of this NFA
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Gets the index of the initial state
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }

    /// Checks if this NFA happens to be deterministic: no ε-moves and at most one successor per
    /// `(state, symbol)` pair. Note that a deterministic NFA may still be partial
    pub fn is_deterministic(&self) -> bool {
        self.states.iter().all(|state| {
            state.epsilon_transitions.is_empty()
                && state.transitions.iter().all(|targets| targets.len() <= 1)
        })
    }

    /// Gives the ε-closure of a single state: the least set containing the state and closed
    /// under ε-moves. Worklist algorithm, each state visited at most once
    pub fn closure(&self, start: usize) -> HashSet<usize> {
        let mut all = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(state) = stack.pop() {
            for &target in &self.states[state].epsilon_transitions {
                if all.insert(target) {
                    stack.push(target);
                }
            }
        }
        all
    }

    /// Gives the ε-closure of a set of states, which is the union of the closures of its
    /// elements. The closure is extensive (`S ⊆ closure(S)`) and monotone
    pub fn closure_set(&self, states: &HashSet<usize>) -> HashSet<usize> {
        let mut all = states.clone();
        let mut stack = states.iter().copied().collect::<Vec<_>>();
        while let Some(state) = stack.pop() {
            for &target in &self.states[state].epsilon_transitions {
                if all.insert(target) {
                    stack.push(target);
                }
            }
        }
        all
    }

    /// Computes the ε-closures of all states at once. Consumers that take repeated closures of
    /// the same automaton (the subset construction, the evaluator) share this table so every
    /// singleton closure is computed exactly once per call
    pub fn closures(&self) -> Vec<HashSet<usize>> {
        (0..self.states.len()).map(|idx| self.closure(idx)).collect()
    }

    /// Checks if this automaton has any ε-moves
    pub fn has_epsilon_moves(&self) -> bool {
        self.states
            .iter()
            .any(|state| !state.epsilon_transitions.is_empty())
    }

    /// Reinterprets an already-deterministic NFA as a [Dfa] without renaming its states.
    /// Returns `None` if the automaton has ε-moves or a nondeterministic choice anywhere; use
    /// [Nfa::to_dfa] in that case
    pub fn as_deterministic(&self) -> Option<Dfa> {
        if !self.is_deterministic() {
            return None;
        }
        let states = self
            .states
            .iter()
            .map(|state| DfaState {
                name: state.name.clone(),
                accepting: state.accepting,
                transitions: state
                    .transitions
                    .iter()
                    .map(|targets| targets.first().copied())
                    .collect(),
            })
            .collect();
        Some(Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: self.initial_state,
        })
    }

    /// Converts this NFA to an equivalent DFA using the subset construction. The DFA's states
    /// are named `q0, q1, ...` in discovery order with `q0` the initial state. No transition is
    /// emitted for an empty successor set, so the result may be partial; with an empty alphabet
    /// the result is a single state without transitions
    pub fn to_dfa(&self) -> Dfa {
        self.subset_construction(usize::MAX)
            .expect("subset construction cannot exceed a cap of usize::MAX")
    }

    /// [Nfa::to_dfa] with a ceiling on the number of DFA states. Returns `None` when the
    /// construction would exceed the ceiling, which the grading pipeline reports as an
    /// evaluation error instead of grinding through an exponential blowup
    pub fn to_dfa_bounded(&self, max_states: usize) -> Option<Dfa> {
        self.subset_construction(max_states)
    }

    fn subset_construction(&self, max_states: usize) -> Option<Dfa> {
        if max_states == 0 {
            return None;
        }
        let closures = self.closures();
        let accepting = |set: &[usize]| set.iter().any(|&state| self.states[state].accepting);

        let initial_set = set_to_vec(closures[self.initial_state].clone());

        if self.alphabet.is_empty() {
            let state = DfaState {
                name: Rc::from("q0"),
                accepting: accepting(&initial_set),
                transitions: Vec::new(),
            };
            return Some(Dfa {
                alphabet: self.alphabet.clone(),
                states: vec![state],
                initial_state: 0,
            });
        }

        // Frozen NFA-state sets are keyed by their sorted index vector
        let mut ids: HashMap<Vec<usize>, usize> = HashMap::new();
        ids.insert(initial_set.clone(), 0);
        let mut sets_by_id = vec![initial_set.clone()];
        let mut rows_by_id: HashMap<usize, Vec<Option<usize>>> = HashMap::new();
        let mut worklist = vec![initial_set];

        while let Some(set) = worklist.pop() {
            let id = ids[&set];
            let mut row = Vec::with_capacity(self.alphabet.len());
            for symbol in 0..self.alphabet.len() {
                let mut moved = HashSet::new();
                for &state in &set {
                    for &target in &self.states[state].transitions[symbol] {
                        moved.extend(closures[target].iter().copied());
                    }
                }
                if moved.is_empty() {
                    row.push(None);
                    continue;
                }
                let next = set_to_vec(moved);
                let next_id = match ids.get(&next) {
                    Some(&existing) => existing,
                    None => {
                        let fresh = ids.len();
                        if fresh >= max_states {
                            return None;
                        }
                        ids.insert(next.clone(), fresh);
                        sets_by_id.push(next.clone());
                        worklist.push(next);
                        fresh
                    }
                };
                row.push(Some(next_id));
            }
            rows_by_id.insert(id, row);
        }

        let states = sets_by_id
            .iter()
            .enumerate()
            .map(|(id, set)| DfaState {
                name: Rc::from(format!("q{id}")),
                accepting: accepting(set),
                transitions: rows_by_id
                    .remove(&id)
                    .expect("every discovered set has been expanded"),
            })
            .collect();

        Some(Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: 0,
        })
    }

    /// Gets an evaluator, which tracks the set of states this NFA can be in while consuming a
    /// word symbol by symbol
    pub fn evaluator(&self) -> NfaEvaluator<'_> {
        self.into()
    }

    /// Runs a word through this automaton and reports the detailed outcome. See [Simulation]
    pub fn simulate(&self, word: &[&str]) -> Simulation {
        let mut evaluator = self.evaluator();
        for (position, symbol) in word.iter().enumerate() {
            if evaluator.step(symbol).is_none() {
                return Simulation::UnknownSymbol {
                    symbol: symbol.to_string(),
                    position,
                };
            }
            if evaluator.current_states_idx().is_empty() {
                return Simulation::Stuck { position };
            }
        }
        if evaluator.is_accepting() {
            Simulation::Accepted
        } else {
            Simulation::Rejected
        }
    }

    /// Runs a string through this automaton, splitting it into unicode grapheme clusters so
    /// each cluster is one symbol. Only meaningful when the alphabet consists of single
    /// graphemes
    pub fn simulate_graphemes(&self, word: &str) -> Simulation {
        let graphemes = word.graphemes(true).collect::<Vec<_>>();
        self.simulate(&graphemes)
    }

    /// Checks if this automaton accepts the given word
    pub fn accepts(&self, word: &[&str]) -> bool {
        self.simulate(word) == Simulation::Accepted
    }

    /// Checks if this automaton accepts the given string of graphemes
    pub fn accepts_graphemes(&self, word: &str) -> bool {
        self.simulate_graphemes(word) == Simulation::Accepted
    }
}

/// Converts a set of state indices to its canonical sorted vector, which unlike the set itself
/// is hashable
fn set_to_vec(set: HashSet<usize>) -> Vec<usize> {
    let mut vec = set.into_iter().collect::<Vec<_>>();
    vec.sort_unstable();
    vec
}
