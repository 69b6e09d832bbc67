//! # Interned deterministic automaton
//! The DFA module includes the [Dfa] struct, the dense deterministic form every language-level
//! comparison runs on. A [Dfa] is obtained from an [Nfa](crate::nfa::Nfa), either by
//! [reinterpreting](crate::nfa::Nfa::as_deterministic) an automaton that is already
//! deterministic or by the [subset construction](crate::nfa::Nfa::to_dfa).
//!
//! Unlike a textbook DFA, the transition function here is allowed to be partial: a missing
//! transition simply rejects the rest of the word. Completeness is a separate property that the
//! [validator](crate::validation) reports on when asked; no algorithm in this crate requires it.
//!
//! ## Minimization
//! [Dfa::minimized] produces the unique minimal DFA for the same language using Hopcroft's
//! partition refinement, after first removing all unreachable states (skipping that step would
//! make the "minimal" result spuriously large). The result has its states renamed to
//! `q0, q1, ...` in breadth-first order from the initial state, so two runs over the same input
//! produce the identical automaton.
//!
//! ```
//! use automark::automaton::Automaton;
//! use automark::nfa::Nfa;
//!
//! // Accepts a(a|b)*; the two accepting states are indistinguishable
//! let automaton = Automaton::new(
//!     &["s0", "s1", "s2"],
//!     &["a", "b"],
//!     &[
//!         ("s0", "a", "s1"),
//!         ("s1", "a", "s2"),
//!         ("s1", "b", "s2"),
//!         ("s2", "a", "s1"),
//!         ("s2", "b", "s1"),
//!     ],
//!     "s0",
//!     &["s1", "s2"],
//! );
//! let dfa = Nfa::try_from(&automaton).unwrap().as_deterministic().unwrap();
//! assert_eq!(dfa.state_count(), 3);
//!
//! let minimal = dfa.minimized();
//! assert_eq!(minimal.state_count(), 2);
//! assert!(minimal.accepts(&["a", "b", "a"]));
//! assert!(!minimal.accepts(&["b"]));
//! assert!(minimal.is_minimal());
//! ```

use crate::automaton::{Automaton, Transition};
pub use eval::DfaEvaluator;
use std::collections::{HashMap, HashSet, VecDeque};
use std::mem;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

pub mod eval;

/// A deterministic finite automaton over interned state indices, with a possibly partial
/// transition function. See the [module-level documentation](crate::dfa) for more info
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial_state: usize,
}

/// A state of a [Dfa]: its name, whether it is accepting, and for each element of the alphabet
/// (in the alphabet's ordering) the successor, if any
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) name: Rc<str>,
    pub(crate) accepting: bool,
    pub(crate) transitions: Vec<Option<usize>>,
}

impl DfaState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Gets the successors for each element of the alphabet, in the alphabet's ordering.
    /// `None` means there is no transition for that element
    pub fn transitions(&self) -> &[Option<usize>] {
        &self.transitions
    }
}

impl Dfa {
    /// Gets the alphabet of this DFA
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// Gets the number of states of this DFA
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Gets the initial state of this DFA
    pub fn initial_state(&self) -> &DfaState {
        &self.states[self.initial_state]
    }

    /// Gets the index of the initial state of this DFA
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }

    /// Checks if the transition function is total, that is, every state has a successor for
    /// every element of the alphabet
    pub fn is_complete(&self) -> bool {
        self.states
            .iter()
            .all(|state| state.transitions.iter().all(Option::is_some))
    }

    /// Finds the states reachable from the initial state by some input, as indices
    pub fn reachable_state_idx(&self) -> HashSet<usize> {
        let mut reachables = HashSet::from([self.initial_state]);
        let mut new_states = reachables.clone();
        while !new_states.is_empty() {
            new_states = new_states
                .drain()
                .flat_map(|state| self.states[state].transitions.iter().flatten().copied())
                .filter(|&state| reachables.insert(state))
                .collect();
        }
        reachables
    }

    /// Builds the unique minimal DFA accepting the same language. Unreachable states are removed
    /// first, then indistinguishable states are merged by Hopcroft's partition refinement; the
    /// result is renamed to `q0, q1, ...` in breadth-first order from the initial state. The
    /// result is complete iff this DFA is complete. This DFA itself is left untouched
    pub fn minimized(&self) -> Dfa {
        // Prune to the reachable states, compacting indices
        let mut reachable = self.reachable_state_idx().into_iter().collect::<Vec<_>>();
        reachable.sort_unstable();
        let compact: HashMap<usize, usize> = reachable
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();
        let accepting: Vec<bool> = reachable
            .iter()
            .map(|&old| self.states[old].accepting)
            .collect();
        let delta: Vec<Vec<Option<usize>>> = reachable
            .iter()
            .map(|&old| {
                self.states[old]
                    .transitions
                    .iter()
                    .map(|target| target.map(|t| compact[&t]))
                    .collect()
            })
            .collect();
        let real_states = reachable.len();
        let symbols = self.alphabet.len();

        // A partial transition function behaves like a transition into an absorbing,
        // non-accepting sink. The sink takes part in the refinement as a virtual state with
        // index `real_states`, and its block is stripped from the result again; without it,
        // a state with a missing transition and a state stepping into a dead state would be
        // wrongly distinguished.
        let partial = delta.iter().any(|row| row.iter().any(Option::is_none));
        let all_states = real_states + usize::from(partial);
        let sink = partial.then_some(real_states);
        let total = |state: usize, symbol: usize| -> usize {
            if state == real_states {
                real_states
            } else {
                delta[state][symbol].unwrap_or(real_states)
            }
        };

        let finals: HashSet<usize> = (0..real_states).filter(|&q| accepting[q]).collect();
        let nonfinals: HashSet<usize> = (0..all_states)
            .filter(|&q| q >= real_states || !accepting[q])
            .collect();
        let mut partition: Vec<HashSet<usize>> = [finals, nonfinals]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect();
        let mut worklist = partition.clone();

        while let Some(splitter) = worklist.pop() {
            for symbol in 0..symbols {
                let x: HashSet<usize> = (0..all_states)
                    .filter(|&q| splitter.contains(&total(q, symbol)))
                    .collect();
                let mut refined = Vec::with_capacity(partition.len());
                for block in mem::take(&mut partition) {
                    let inside: HashSet<usize> = block.intersection(&x).copied().collect();
                    if inside.is_empty() || inside.len() == block.len() {
                        refined.push(block);
                        continue;
                    }
                    let outside: HashSet<usize> = block.difference(&x).copied().collect();
                    if let Some(pos) = worklist.iter().position(|b| *b == block) {
                        worklist.swap_remove(pos);
                        worklist.push(inside.clone());
                        worklist.push(outside.clone());
                    } else if inside.len() <= outside.len() {
                        worklist.push(inside.clone());
                    } else {
                        worklist.push(outside.clone());
                    }
                    refined.push(inside);
                    refined.push(outside);
                }
                partition = refined;
            }
        }

        // Rebuild one state per block
        let mut block_of = vec![0usize; all_states];
        for (block_idx, block) in partition.iter().enumerate() {
            for &state in block {
                block_of[state] = block_idx;
            }
        }
        let sink_block = sink.map(|s| block_of[s]);
        let representative: Vec<Option<usize>> = partition
            .iter()
            .map(|block| block.iter().copied().filter(|&q| q < real_states).min())
            .collect();

        let initial_block = block_of[compact[&self.initial_state]];
        if Some(initial_block) == sink_block {
            // The whole language is empty; everything collapses into the sink's block
            let state = DfaState {
                name: Rc::from("q0"),
                accepting: false,
                transitions: vec![None; symbols],
            };
            return Dfa {
                alphabet: self.alphabet.clone(),
                states: vec![state],
                initial_state: 0,
            };
        }

        // Breadth-first numbering from the initial block, skipping the sink's block
        let mut order: HashMap<usize, usize> = HashMap::from([(initial_block, 0)]);
        let mut ordered_blocks = vec![initial_block];
        let mut queue = VecDeque::from([initial_block]);
        while let Some(block) = queue.pop_front() {
            let rep = representative[block].expect("a kept block has a real member");
            for symbol in 0..symbols {
                let Some(target) = delta[rep][symbol] else {
                    continue;
                };
                let target_block = block_of[target];
                if Some(target_block) == sink_block || order.contains_key(&target_block) {
                    continue;
                }
                order.insert(target_block, ordered_blocks.len());
                ordered_blocks.push(target_block);
                queue.push_back(target_block);
            }
        }

        let states = ordered_blocks
            .iter()
            .enumerate()
            .map(|(new_idx, &block)| {
                let rep = representative[block].expect("a kept block has a real member");
                let transitions = (0..symbols)
                    .map(|symbol| {
                        delta[rep][symbol].and_then(|target| {
                            let target_block = block_of[target];
                            if Some(target_block) == sink_block {
                                None
                            } else {
                                Some(order[&target_block])
                            }
                        })
                    })
                    .collect();
                DfaState {
                    name: Rc::from(format!("q{new_idx}")),
                    accepting: accepting[rep],
                    transitions,
                }
            })
            .collect();

        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: 0,
        }
    }

    /// Checks if this DFA is already minimal, that is, minimization does not reduce its number
    /// of states
    pub fn is_minimal(&self) -> bool {
        self.minimized().state_count() == self.state_count()
    }

    /// Gets an evaluator, which tracks the current state while consuming a word symbol by symbol
    pub fn evaluator(&self) -> DfaEvaluator<'_> {
        self.into()
    }

    /// Checks if this automaton accepts the given word. A missing transition or a symbol
    /// outside the alphabet rejects
    pub fn accepts(&self, word: &[&str]) -> bool {
        let mut evaluator = self.evaluator();
        evaluator.step_multiple(word);
        evaluator.is_accepting()
    }

    /// Checks if this automaton accepts the given string of graphemes, with every grapheme
    /// cluster taken as one symbol
    pub fn accepts_graphemes(&self, word: &str) -> bool {
        let graphemes = word.graphemes(true).collect::<Vec<_>>();
        self.accepts(&graphemes)
    }

    /// Converts this DFA back to the raw ingest representation, e.g. for printing as a table
    pub fn to_automaton(&self) -> Automaton {
        let states: Vec<Rc<str>> = self.states.iter().map(|s| s.name.clone()).collect();
        let mut transitions = Vec::new();
        for state in &self.states {
            for (symbol, target) in self.alphabet.iter().zip(&state.transitions) {
                if let Some(target) = target {
                    transitions.push(Transition {
                        from: state.name.clone(),
                        symbol: symbol.clone(),
                        to: self.states[*target].name.clone(),
                    });
                }
            }
        }
        let accept_states = self
            .states
            .iter()
            .filter(|s| s.accepting)
            .map(|s| s.name.clone())
            .collect();
        Automaton::from_parts(
            states,
            self.alphabet.to_vec(),
            transitions,
            self.states[self.initial_state].name.clone(),
            accept_states,
        )
    }
}
