//! # Automaton table parser
//! Parses the text format automaton files are written in: a transition table with the alphabet
//! in the first row and one row per state.
//!
//! ```text
//!      ε    a    b
//! → s0 {}   {s1} {s0 s2}
//!   s1 {s2} {}   {s3}
//! * s3 {}   {s3} {s3}
//! ```
//!
//! The first row holds the alphabet, whitespace-separated; adding `ε` (or `eps`) as an entry
//! gives the table an ε-move column, and the marker itself is not part of the alphabet. Every
//! other row describes one state: optionally `->` or `→` for the initial state, optionally `*`
//! for an accepting state, the state name, and one entry per header element with the states
//! entered upon reading that element. An entry is either a set like `{s0 s2}` (`{}` for no
//! transition) or a single bare state name. Comments start with `#`, blank lines are ignored.
//!
//! Parsing is deliberately shallow: the target of a transition may be a state that has no row
//! of its own, an alphabet symbol may be duplicated, and so on. The parse result converts into
//! a raw [Automaton] via [TryFrom], and judging the automaton's structure is left to
//! [validation](crate::validation), which reports such problems as diagnostics with precise
//! highlights. The only facts the conversion itself enforces are the ones the [Automaton] type
//! cannot represent otherwise: there must be exactly one initial state.
//!
//! ```
//! use automark::automaton::Automaton;
//! use automark::parser;
//!
//! let input = "
//!        a    b
//! -> s0 {s1} {s0}
//!  * s1 {s1} {s1}
//! ";
//! let automaton: Automaton = parser::fsa(input).unwrap().try_into().unwrap();
//! assert_eq!(automaton.states().len(), 2);
//! assert_eq!(automaton.initial_state(), "s0");
//! assert_eq!(automaton.transitions().len(), 4);
//! ```

mod fa;

use crate::automaton::{Automaton, Transition};
use nom::{combinator::all_consuming, Finish};
use std::rc::Rc;
use thiserror::Error;

/// A parsed but unjudged automaton table: the header entries and the state rows, all borrowed
/// from the input
#[derive(Debug)]
pub struct ParsedFsa<'a> {
    pub head: Vec<AlphabetEntry<'a>>,
    pub states: Vec<ParsedState<'a>>,
}

/// One entry of the table header: an alphabet symbol or the ε-move column marker
#[derive(Debug, Clone)]
pub enum AlphabetEntry<'a> {
    Symbol(&'a str),
    Eps,
}

/// One parsed state row
#[derive(Debug)]
pub struct ParsedState<'a> {
    pub name: &'a str,
    pub initial: bool,
    pub accepting: bool,
    pub transitions: Vec<Vec<&'a str>>,
}

/// Parses an automaton table. The whole string must be parsable, otherwise this function
/// errors. The result is not guaranteed to be a well-formed automaton; convert it to an
/// [Automaton] with [TryInto] and run [validation](crate::validation) on that
pub fn fsa(input: &str) -> Result<ParsedFsa, nom::error::Error<&str>> {
    all_consuming(fa::full_fsa)(input)
        .finish()
        .map(|(_, fsa)| fsa)
}

/// The few properties of a table that cannot be carried over into a raw [Automaton] at all
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FsaFormatError {
    #[error("there is no initial state")]
    MissingInitialState,
    #[error("there are two (or more) initial states")]
    MultipleInitialStates,
}

impl<'a> TryFrom<ParsedFsa<'a>> for Automaton {
    type Error = FsaFormatError;

    fn try_from(parsed: ParsedFsa<'a>) -> Result<Self, Self::Error> {
        let mut initial = None;
        for state in &parsed.states {
            if state.initial {
                if initial.is_some() {
                    return Err(FsaFormatError::MultipleInitialStates);
                }
                initial = Some(state.name);
            }
        }
        let initial = initial.ok_or(FsaFormatError::MissingInitialState)?;

        let states: Vec<Rc<str>> = parsed.states.iter().map(|s| Rc::from(s.name)).collect();
        let alphabet: Vec<Rc<str>> = parsed
            .head
            .iter()
            .filter_map(|entry| match entry {
                AlphabetEntry::Symbol(symbol) => Some(Rc::from(*symbol)),
                AlphabetEntry::Eps => None,
            })
            .collect();
        let accept_states: Vec<Rc<str>> = parsed
            .states
            .iter()
            .filter(|s| s.accepting)
            .map(|s| Rc::from(s.name))
            .collect();

        let mut transitions = Vec::new();
        for state in &parsed.states {
            // A row with fewer entries than the header just has no transitions for the
            // remaining columns; the mismatch itself is not this layer's concern
            for (entry, targets) in parsed.head.iter().zip(&state.transitions) {
                let symbol = match entry {
                    AlphabetEntry::Symbol(symbol) => *symbol,
                    AlphabetEntry::Eps => "ε",
                };
                for &target in targets {
                    transitions.push(Transition::new(state.name, symbol, target));
                }
            }
        }

        Ok(Automaton::from_parts(
            states,
            alphabet,
            transitions,
            Rc::from(initial),
            accept_states,
        ))
    }
}
