use crate::parser::{AlphabetEntry, ParsedFsa, ParsedState};
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_while1};
use nom::character::complete::{char, line_ending, space0, space1};
use nom::combinator::{eof, map, opt, value};
use nom::error::{Error, ErrorKind};
use nom::multi::{many0, many1, separated_list0};
use nom::sequence::{pair, preceded, terminated};
use nom::IResult;

pub(crate) fn full_fsa(input: &str) -> IResult<&str, ParsedFsa> {
    let (input, _) = many0(blank_line)(input)?;
    let (input, head) = header(input)?;
    let (input, states) = many1(preceded(many0(blank_line), row))(input)?;
    let (input, _) = many0(blank_line)(input)?;
    // a last line of nothing but padding or a comment may lack its line break
    let (input, _) = space0(input)?;
    let (input, _) = opt(comment)(input)?;
    Ok((input, ParsedFsa { head, states }))
}

/// The first line of content: the alphabet, with an optional ε column marker anywhere in it
fn header(input: &str) -> IResult<&str, Vec<AlphabetEntry>> {
    let (input, _) = space0(input)?;
    let (input, first) = entry(input)?;
    let (input, rest) = many0(preceded(space1, entry))(input)?;
    let (input, _) = end_of_line(input)?;
    let mut entries = vec![first];
    entries.extend(rest);
    Ok((input, entries))
}

/// One state line: optional initial arrow, optional accepting star, the state name, and one
/// target entry per header column
fn row(input: &str) -> IResult<&str, ParsedState> {
    let (input, _) = space0(input)?;
    let (input, initial) = opt(terminated(alt((tag("→"), tag("->"))), space1))(input)?;
    let (input, accepting) = opt(terminated(char('*'), space1))(input)?;
    let (input, name) = name(input)?;
    let (input, transitions) = many0(preceded(space1, targets))(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((
        input,
        ParsedState {
            name,
            initial: initial.is_some(),
            accepting: accepting.is_some(),
            transitions,
        },
    ))
}

/// One column entry of a row: a braced set of target states, or a single bare state name
fn targets(input: &str) -> IResult<&str, Vec<&str>> {
    alt((set, map(name, |single| vec![single])))(input)
}

fn set(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, _) = char('{')(input)?;
    let (input, _) = space0(input)?;
    let (input, names) = separated_list0(space1, name)(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = char('}')(input)?;
    Ok((input, names))
}

/// A header entry: the ε marker, or an alphabet symbol. The row markers are rejected here so a
/// malformed header fails to parse instead of swallowing them as symbols
fn entry(input: &str) -> IResult<&str, AlphabetEntry> {
    let (rest, word) = word(input)?;
    match word {
        "ε" | "eps" => Ok((rest, AlphabetEntry::Eps)),
        "→" | "->" | "*" => Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
        symbol => Ok((rest, AlphabetEntry::Symbol(symbol))),
    }
}

/// A state name: any word except the tokens reserved for markers
fn name(input: &str) -> IResult<&str, &str> {
    let (rest, word) = word(input)?;
    if matches!(word, "ε" | "eps" | "→" | "->" | "*") {
        Err(nom::Err::Error(Error::new(input, ErrorKind::Verify)))
    } else {
        Ok((rest, word))
    }
}

/// A run of characters delimited by whitespace, braces or the comment character
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !"{}#".contains(c))(input)
}

/// A line carrying no content: padding and/or a comment, ended by an actual line break. The
/// break is required so this cannot match emptily at the end of input
fn blank_line(input: &str) -> IResult<&str, ()> {
    let (input, _) = space0(input)?;
    let (input, _) = opt(comment)(input)?;
    value((), line_ending)(input)
}

/// Trailing padding and/or comment of a content line, up to the line break or the end of input
fn end_of_line(input: &str) -> IResult<&str, ()> {
    let (input, _) = space0(input)?;
    let (input, _) = opt(comment)(input)?;
    value((), alt((line_ending, eof)))(input)
}

fn comment(input: &str) -> IResult<&str, ()> {
    value((), pair(char('#'), opt(is_not("\r\n"))))(input)
}
