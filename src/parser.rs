//! Redirection and pipeline parsing over expanded tokens.
//!
//! Parsing happens in two passes: redirection operators and their filenames
//! are stripped out first, then the residual argument vector is split at the
//! first `|` when one is present.

use std::fmt;

/// Input/output redirection targets gathered from one command line.
///
/// At most one of each is kept; when an operator is repeated the last
/// occurrence wins, matching the left-to-right scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    /// File to rebind onto the command's standard input.
    pub input: Option<String>,
    /// File to rebind onto the command's standard output.
    pub output: Option<String>,
}

impl Redirections {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }
}

/// One or two argument vectors ready to execute.
#[derive(Debug, PartialEq, Eq)]
pub enum Pipeline {
    Single(Vec<String>),
    /// The left command's standard output feeds the right command's standard
    /// input. Both argument vectors are non-empty by construction.
    Piped(Vec<String>, Vec<String>),
}

/// Errors that can occur while splitting the residual arguments at a `|`.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// `|` was the first token, so there is no command to produce input.
    PipeWithoutProducer,
    /// `|` had no command after it.
    PipeWithoutConsumer,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::PipeWithoutProducer => {
                write!(f, "malformed pipeline: no command before `|`")
            }
            ParseError::PipeWithoutConsumer => {
                write!(f, "malformed pipeline: no command after `|`")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Strip `<`/`>` operators and their filename operands out of `tokens`,
/// returning the gathered [`Redirections`] and the residual argument vector.
///
/// A trailing operator with no filename after it is dropped with no effect.
pub fn split_redirections(tokens: &[String]) -> (Redirections, Vec<String>) {
    let mut redirections = Redirections::default();
    let mut residual = Vec::new();

    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        match token.as_str() {
            "<" => {
                if let Some(path) = iter.next() {
                    redirections.input = Some(path.clone());
                }
            }
            ">" => {
                if let Some(path) = iter.next() {
                    redirections.output = Some(path.clone());
                }
            }
            _ => residual.push(token.clone()),
        }
    }

    (redirections, residual)
}

/// Split the residual argument vector at the first `|`.
///
/// Later `|` tokens are not special: they stay ordinary arguments of the
/// right-hand command, exactly as the first-match scan leaves them.
pub fn detect_pipeline(residual: Vec<String>) -> Result<Pipeline, ParseError> {
    match residual.iter().position(|token| token == "|") {
        None => Ok(Pipeline::Single(residual)),
        Some(0) => Err(ParseError::PipeWithoutProducer),
        Some(split) if split + 1 == residual.len() => Err(ParseError::PipeWithoutConsumer),
        Some(split) => {
            let mut left = residual;
            let right = left.split_off(split + 1);
            left.pop(); // the `|` itself
            Ok(Pipeline::Piped(left, right))
        }
    }
}
