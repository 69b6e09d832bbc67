use crate::dfa::{Dfa, DfaState};
use std::collections::HashMap;

/// Tracks the current state of a [Dfa] while consuming a word symbol by symbol. Stepping on a
/// symbol with no transition, or on a symbol outside the alphabet, moves the evaluator into a
/// dead configuration from which nothing is accepted
#[derive(Clone, Debug)]
pub struct DfaEvaluator<'a> {
    dfa: &'a Dfa,
    symbol_index: HashMap<&'a str, usize>,
    current_state: Option<usize>,
}

impl<'a> DfaEvaluator<'a> {
    /// Checks if the current state is accepting. A dead configuration is never accepting
    pub fn is_accepting(&self) -> bool {
        self.current_state()
            .map_or(false, DfaState::is_accepting)
    }

    /// Gets the current state, or `None` in a dead configuration
    pub fn current_state(&self) -> Option<&'a DfaState> {
        self.current_state.map(|state| &self.dfa.states[state])
    }

    /// Gets the index of the current state, or `None` in a dead configuration
    pub fn current_state_idx(&self) -> Option<usize> {
        self.current_state
    }

    /// Steps this evaluator on one symbol and returns the state it ends up in
    pub fn step(&mut self, symbol: &str) -> Option<&'a DfaState> {
        let state = self.current_state?;
        self.current_state = match self.symbol_index.get(symbol) {
            None => None,
            Some(&idx) => self.dfa.states[state].transitions[idx],
        };
        self.current_state()
    }

    /// Steps this evaluator on each symbol of the word in order and returns the state it ends
    /// up in
    pub fn step_multiple(&mut self, word: &[&str]) -> Option<&'a DfaState> {
        for symbol in word {
            self.step(symbol)?;
        }
        self.current_state()
    }
}

impl<'a> From<&'a Dfa> for DfaEvaluator<'a> {
    fn from(dfa: &'a Dfa) -> Self {
        let symbol_index = dfa
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, symbol)| (symbol as &str, idx))
            .collect();
        Self {
            dfa,
            symbol_index,
            current_state: Some(dfa.initial_state),
        }
    }
}
