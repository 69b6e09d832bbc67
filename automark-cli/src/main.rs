use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

mod equivalence;
mod grade;
mod load;
mod minimize;
mod validate;

#[derive(Parser)]
#[command(name = "automark", version, about = "Grade and analyze finite automata")]
pub struct MarkArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Grade a student automaton against a reference solution
    Grade(GradeArgs),
    /// Validate an automaton file and print its structural report
    Validate {
        /// The automaton table file to check
        file: PathBuf,
    },
    /// Determinize and minimize an automaton, printing the resulting table
    Minimize {
        /// The automaton table file to minimize
        file: PathBuf,
    },
    /// Check whether two automata accept the same language
    Equivalent {
        first: PathBuf,
        second: PathBuf,
        /// Longest counterexample to search for when the languages differ
        #[arg(long, default_value_t = 10)]
        max_test_length: usize,
    },
}

#[derive(Args)]
pub struct GradeArgs {
    /// The student's automaton table file
    pub(crate) student: PathBuf,
    /// The reference solution table file
    pub(crate) reference: PathBuf,
    #[arg(long, value_enum, default_value = "lenient")]
    pub(crate) mode: ModeArg,
    /// Kind of automaton the exercise expects
    #[arg(long, value_enum, default_value = "any")]
    pub(crate) expect: ExpectArg,
    #[arg(long, value_enum, default_value = "standard")]
    pub(crate) verbosity: VerbosityArg,
    /// Require the submission to be minimal
    #[arg(long)]
    pub(crate) check_minimality: bool,
    /// Require the submission to have a total transition function
    #[arg(long)]
    pub(crate) check_completeness: bool,
    /// Leave out the element highlights from the report
    #[arg(long)]
    pub(crate) no_highlights: bool,
    /// Leave out the counterexample string from the report
    #[arg(long)]
    pub(crate) no_counterexample: bool,
    /// Longest counterexample to search for
    #[arg(long, default_value_t = 10)]
    pub(crate) max_test_length: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Strict,
    Lenient,
    Partial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExpectArg {
    Dfa,
    Nfa,
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VerbosityArg {
    Minimal,
    Standard,
    Detailed,
}

impl From<ModeArg> for automark::grade::EvaluationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Strict => Self::Strict,
            ModeArg::Lenient => Self::Lenient,
            ModeArg::Partial => Self::Partial,
        }
    }
}

impl From<ExpectArg> for automark::grade::ExpectedType {
    fn from(arg: ExpectArg) -> Self {
        match arg {
            ExpectArg::Dfa => Self::Dfa,
            ExpectArg::Nfa => Self::Nfa,
            ExpectArg::Any => Self::Any,
        }
    }
}

impl From<VerbosityArg> for automark::grade::Verbosity {
    fn from(arg: VerbosityArg) -> Self {
        match arg {
            VerbosityArg::Minimal => Self::Minimal,
            VerbosityArg::Standard => Self::Standard,
            VerbosityArg::Detailed => Self::Detailed,
        }
    }
}

fn main() -> ExitCode {
    let args = MarkArgs::parse();
    let outcome = match &args.command {
        Command::Grade(grade_args) => grade::run(grade_args),
        Command::Validate { file } => validate::run(file),
        Command::Minimize { file } => minimize::run(file),
        Command::Equivalent {
            first,
            second,
            max_test_length,
        } => equivalence::run(first, second, *max_test_length),
    };
    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(2)
        }
    }
}
