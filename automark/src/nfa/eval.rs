use crate::nfa::{Nfa, NfaState};
use std::collections::{HashMap, HashSet};

/// The detailed outcome of running a word through an automaton. The grading pipeline maps the
/// rejection flavors to distinct diagnostic codes, which is why a plain bool is not enough here
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Simulation {
    /// The word was consumed and an accepting state was among the reached states
    Accepted,
    /// The word was consumed but no accepting state was reached
    Rejected,
    /// The automaton had no transition for the symbol at `position`; the word is rejected
    Stuck { position: usize },
    /// The symbol at `position` is not part of the alphabet; the word is rejected
    UnknownSymbol { symbol: String, position: usize },
}

impl Simulation {
    /// Checks if the outcome is an acceptance
    pub fn is_accepted(&self) -> bool {
        *self == Simulation::Accepted
    }
}

/// Tracks the set of states an [Nfa] can be in while consuming a word symbol by symbol. The
/// current set is always ε-closed: after every step (and initially) the closure of the reached
/// states is included
#[derive(Clone, Debug)]
pub struct NfaEvaluator<'a> {
    nfa: &'a Nfa,
    symbol_index: HashMap<&'a str, usize>,
    closures: Vec<HashSet<usize>>,
    current_states: HashSet<usize>,
}

impl<'a> NfaEvaluator<'a> {
    /// Checks if any of the current states is accepting
    pub fn is_accepting(&self) -> bool {
        self.current_states
            .iter()
            .any(|&state| self.nfa.states[state].accepting)
    }

    /// Gets the current states
    pub fn current_states(&self) -> Vec<&NfaState> {
        self.current_states
            .iter()
            .map(|&state| &self.nfa.states[state])
            .collect()
    }

    /// Gets the current states as indices
    pub fn current_states_idx(&self) -> &HashSet<usize> {
        &self.current_states
    }

    /// Steps this evaluator on one symbol. Returns `None` if the symbol is not in the alphabet,
    /// in which case the evaluator is unchanged. After a step the current set may be empty,
    /// meaning the automaton is stuck and rejects every extension of the word
    pub fn step(&mut self, symbol: &str) -> Option<()> {
        let &idx = self.symbol_index.get(symbol)?;
        self.current_states = self
            .current_states
            .iter()
            .flat_map(|&state| self.nfa.states[state].transitions[idx].iter())
            .flat_map(|&target| self.closures[target].iter())
            .copied()
            .collect();
        Some(())
    }

    /// Steps this evaluator on each symbol of the word in order. Returns `None` on the first
    /// symbol outside the alphabet
    pub fn step_multiple(&mut self, word: &[&str]) -> Option<()> {
        word.iter().try_for_each(|symbol| self.step(symbol))
    }
}

impl<'a> From<&'a Nfa> for NfaEvaluator<'a> {
    fn from(nfa: &'a Nfa) -> Self {
        let symbol_index = nfa
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, symbol)| (symbol as &str, idx))
            .collect();
        let closures = nfa.closures();
        let current_states = closures[nfa.initial_state].clone();
        Self {
            nfa,
            symbol_index,
            closures,
            current_states,
        }
    }
}
