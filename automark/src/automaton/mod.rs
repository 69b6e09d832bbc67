//! # Raw automaton model
//! The automaton module includes the [Automaton] struct, the ingest-level representation of a
//! finite-state automaton as submitted by a student or stored as a reference solution: a list of
//! state identifiers, an alphabet, a list (really a multiset) of [Transition]s, an initial state
//! and a set of accepting states.
//!
//! This representation deliberately makes *no* structural promises. Transitions may refer to
//! states that are not declared, the same `(from, symbol)` pair may appear twice, and the
//! accepting set may mention unknown states. Judging all of that is the job of the
//! [validation](crate::validation) module, which reports problems as diagnostics instead of
//! refusing to represent the automaton in the first place. Algorithms that need a well-formed
//! automaton intern this raw form into the dense [Nfa](crate::nfa::Nfa)/[Dfa](crate::dfa::Dfa)
//! types.
//!
//! ## Example
//! ```
//! use automark::automaton::Automaton;
//!
//! // An automaton accepting all strings over {a, b} that contain at least one 'a'
//! let automaton = Automaton::new(
//!     &["q0", "q1"],
//!     &["a", "b"],
//!     &[("q0", "a", "q1"), ("q0", "b", "q0"), ("q1", "a", "q1"), ("q1", "b", "q1")],
//!     "q0",
//!     &["q1"],
//! );
//! assert_eq!(automaton.states().len(), 2);
//! assert_eq!(automaton.initial_state(), "q0");
//! assert!(automaton.is_accepting("q1"));
//! assert!(!automaton.is_accepting("q0"));
//! ```
//!
//! ## ε-transitions
//! A transition may consume no input, in which case its symbol is an ε-marker. Three surface
//! forms are recognized and treated as the same marker: the letter `ε`, the word `epsilon` and
//! the empty string. The [is_epsilon] predicate is the single place where these forms are folded
//! together; the alphabet itself must never contain any of them (the validator checks this).

use crate::table::Table;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// Checks whether a transition symbol is an ε-marker. The marker has three equivalent surface
/// forms: `ε`, `epsilon` and the empty string.
///
/// ```
/// use automark::automaton::is_epsilon;
///
/// assert!(is_epsilon("ε"));
/// assert!(is_epsilon("epsilon"));
/// assert!(is_epsilon(""));
/// assert!(!is_epsilon("a"));
/// assert!(!is_epsilon("eps")); // only the three forms above count
/// ```
pub fn is_epsilon(symbol: &str) -> bool {
    matches!(symbol, "ε" | "epsilon" | "")
}

/// A single transition of an automaton: from a state, upon a symbol (or an ε-marker), to a state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub(crate) from: Rc<str>,
    pub(crate) symbol: Rc<str>,
    pub(crate) to: Rc<str>,
}

impl Transition {
    /// Creates a transition. The symbol may be an ε-marker, see [is_epsilon]
    pub fn new(from: &str, symbol: &str, to: &str) -> Self {
        Self {
            from: Rc::from(from),
            symbol: Rc::from(symbol),
            to: Rc::from(to),
        }
    }

    /// Gets the source state of this transition
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Gets the symbol this transition consumes. May be an ε-marker
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Gets the target state of this transition
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Checks if this transition consumes no input
    pub fn is_epsilon(&self) -> bool {
        is_epsilon(&self.symbol)
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = if self.is_epsilon() { "ε" } else { self.symbol.as_ref() };
        write!(f, "{} -{}-> {}", self.from, symbol, self.to)
    }
}

/// A finite-state automaton as ingested: the 5-tuple (states, alphabet, transitions, initial
/// state, accepting states) with no structural guarantees. See the
/// [module-level documentation](crate::automaton) for more info.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Automaton {
    pub(crate) states: Vec<Rc<str>>,
    pub(crate) alphabet: Vec<Rc<str>>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) initial_state: Rc<str>,
    pub(crate) accept_states: Vec<Rc<str>>,
}

impl Automaton {
    /// Creates an automaton from its five components. Nothing is checked here: duplicated state
    /// identifiers, transitions to undeclared states and so on are all representable, and are
    /// reported by [validation](crate::validation) rather than rejected
    pub fn new(
        states: &[&str],
        alphabet: &[&str],
        transitions: &[(&str, &str, &str)],
        initial_state: &str,
        accept_states: &[&str],
    ) -> Self {
        Self {
            states: states.iter().map(|s| Rc::from(*s)).collect(),
            alphabet: alphabet.iter().map(|s| Rc::from(*s)).collect(),
            transitions: transitions
                .iter()
                .map(|(from, symbol, to)| Transition::new(from, symbol, to))
                .collect(),
            initial_state: Rc::from(initial_state),
            accept_states: accept_states.iter().map(|s| Rc::from(*s)).collect(),
        }
    }

    /// Creates an automaton from already-shared components. Used by the parser and by
    /// [Dfa::to_automaton](crate::dfa::Dfa::to_automaton)
    pub fn from_parts(
        states: Vec<Rc<str>>,
        alphabet: Vec<Rc<str>>,
        transitions: Vec<Transition>,
        initial_state: Rc<str>,
        accept_states: Vec<Rc<str>>,
    ) -> Self {
        Self {
            states,
            alphabet,
            transitions,
            initial_state,
            accept_states,
        }
    }

    /// Gets the state identifiers of this automaton
    pub fn states(&self) -> &[Rc<str>] {
        &self.states
    }

    /// Gets the alphabet of this automaton
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the transitions of this automaton
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Gets the initial state identifier
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Gets the accepting state identifiers
    pub fn accept_states(&self) -> &[Rc<str>] {
        &self.accept_states
    }

    /// Checks if the given identifier is a declared state of this automaton
    pub fn has_state(&self, id: &str) -> bool {
        self.states.iter().any(|s| s.as_ref() == id)
    }

    /// Checks if the given identifier is in the accepting set
    pub fn is_accepting(&self, id: &str) -> bool {
        self.accept_states.iter().any(|s| s.as_ref() == id)
    }

    /// Checks if any transition of this automaton is an ε-transition
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.iter().any(Transition::is_epsilon)
    }

    /// Generates a transition table of this automaton suitable for printing, which may be parsed
    /// again by [the parser](crate::parser). Transitions whose symbol is neither in the alphabet
    /// nor an ε-marker cannot be placed in a column and are omitted
    pub fn to_table(&self) -> String {
        self.gen_table("ε", "→")
    }

    /// Generates a transition table of this automaton suitable for printing, using `eps` for the
    /// ε column and `->` for the initial state arrow
    pub fn ascii_table(&self) -> String {
        self.gen_table("eps", "->")
    }

    fn gen_table(&self, eps: &str, arrow: &str) -> String {
        let has_eps = self.has_epsilon_transitions();

        // targets[(state, column)] with column 0 = ε when present
        let col_of = |symbol: &str| -> Option<usize> {
            if is_epsilon(symbol) {
                has_eps.then_some(0)
            } else {
                let offset = usize::from(has_eps);
                self.alphabet
                    .iter()
                    .position(|a| a.as_ref() == symbol)
                    .map(|i| i + offset)
            }
        };
        let columns = self.alphabet.len() + usize::from(has_eps);
        let mut targets: HashMap<(usize, usize), Vec<&str>> = HashMap::new();
        for t in &self.transitions {
            let state = self.states.iter().position(|s| *s == t.from);
            if let (Some(state), Some(col)) = (state, col_of(&t.symbol)) {
                targets.entry((state, col)).or_default().push(&t.to);
            }
        }

        let mut table = Table::default();
        let mut head = vec![String::new(), String::new(), String::new()];
        if has_eps {
            head.push(eps.to_string());
        }
        head.extend(self.alphabet.iter().map(|s| s.to_string()));
        table.push_row(head);

        for (idx, state) in self.states.iter().enumerate() {
            let mut row = vec![
                if state == &self.initial_state {
                    arrow.to_string()
                } else {
                    String::new()
                },
                if self.is_accepting(state) {
                    "*".to_string()
                } else {
                    String::new()
                },
                state.to_string(),
            ];
            for col in 0..columns {
                let entry = targets
                    .get(&(idx, col))
                    .map(|tos| tos.join(" "))
                    .unwrap_or_default();
                row.push(format!("{{{entry}}}"));
            }
            table.push_row(row);
        }
        table.render(" ")
    }
}
