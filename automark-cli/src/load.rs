use automark::automaton::Automaton;
use automark::nfa::CompileError;
use automark::parser::FsaFormatError;
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error reading {0}: {1}")]
    File(String, io::Error),
    #[error("Error parsing automaton table (near '{}')", .0.input)]
    Parse(nom::error::Error<String>),
    #[error("Invalid automaton table: {0}")]
    Format(#[from] FsaFormatError),
    #[error("The automaton is not well-formed: {0}")]
    Compile(#[from] CompileError),
}

/// Reads and parses an automaton table file. The result is raw: run validation on it before
/// feeding it to any algorithm that assumes well-formedness
pub fn load(path: &Path) -> Result<Automaton, Error> {
    let text =
        fs::read_to_string(path).map_err(|e| Error::File(path.display().to_string(), e))?;
    let parsed = automark::parser::fsa(&text)
        .map_err(|e| Error::Parse(nom::error::Error::new(e.input.to_string(), e.code)))?;
    Ok(parsed.try_into()?)
}
