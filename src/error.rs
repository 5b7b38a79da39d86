//! Failure reporting shared by the tokenizer and both parsers.

use itertools::Itertools;
use thiserror::Error;

use crate::grammar::NonTerm;
use crate::Span;

/// What went wrong, machine-readable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reason {
    /// Input was empty and the grammar does not derive the empty word.
    EmptyNotAllowed,
    /// No terminal matched at some input position.
    UnknownToken,
    /// Tokenized input is not in the language.
    UnmatchedPattern,
    /// A token was recognized but no pending derivation could consume it.
    UnexpectedToken,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        w.write_str(match self {
            Reason::EmptyNotAllowed => "empty input not allowed",
            Reason::UnknownToken => "unknown token",
            Reason::UnmatchedPattern => "unmatched pattern",
            Reason::UnexpectedToken => "unexpected token",
        })
    }
}

#[derive(Clone, PartialEq, Eq, Error, Debug)]
#[error("{}", describe(.reason, .range, .context, .input))]
pub struct SyntaxError {
    /// The offending input range. Empty when the failure sits at a
    /// boundary, such as the end of input.
    pub range: Span,
    pub reason: Reason,
    /// Nonterminals that were expected at the point of failure, if known.
    pub context: Vec<NonTerm>,
    /// The complete input, kept so the error can locate itself.
    pub input: String,
}

impl SyntaxError {
    pub(crate) fn new(reason: Reason, range: Span, input: &str) -> Self {
        SyntaxError { range, reason, context: Vec::new(), input: input.to_owned() }
    }

    pub(crate) fn with_context(mut self, context: Vec<NonTerm>) -> Self {
        self.context = context;
        self
    }

    /// Zero-based line of `range.start`, counting newlines strictly before it.
    pub fn line(&self) -> usize {
        line_of(&self.input, self.range.start)
    }

    /// Zero-based column: characters since the last newline before `range.start`.
    pub fn column(&self) -> usize {
        column_of(&self.input, self.range.start)
    }
}

fn line_of(input: &str, pos: usize) -> usize {
    input[..pos].matches('\n').count()
}

fn column_of(input: &str, pos: usize) -> usize {
    let prefix = &input[..pos];
    match prefix.rfind('\n') {
        Some(i) => prefix[i + 1..].chars().count(),
        None => prefix.chars().count(),
    }
}

fn describe(reason: &Reason, range: &Span, context: &[NonTerm], input: &str) -> String {
    let line = line_of(input, range.start);
    let column = column_of(input, range.start);
    let what = if range.start >= input.len() {
        "end of input".to_owned()
    } else {
        format!("'{}'", &input[range.start..range.end.min(input.len())])
    };
    let mut message = format!("{reason} at L{line}:{column}: {what}");
    if !context.is_empty() {
        let expected = context.iter().map(NonTerm::name).join(", ");
        message.push_str(&format!(" (expected {expected})"));
    }
    message
}
