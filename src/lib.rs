//! Chart parsing for context-free grammars.
//!
//! A grammar here is a plain list of productions over terminals and
//! nonterminals, handed to one of two parsers. [`EarleyParser`] works on
//! the grammar as written; left recursion, ambiguity, chain productions
//! and epsilon productions are all fair game. [`CykParser`] works
//! bottom-up on a Chomsky normal form computed once per parser, and
//! rewrites its trees back over the original symbols before returning
//! them. A prefix tokenizer driven by the grammar's own terminals feeds
//! both.
//!
//! Either way the result is a [`SyntaxTree`] whose nodes are the
//! grammar's nonterminals and whose leaves are the input ranges the
//! terminals matched, or a [`SyntaxError`] pinpointing the first place
//! the input fell out of the language.

mod cyk;
mod display;
mod earley;
mod error;
mod grammar;
mod normalize;
mod tokenizer;
mod tree;

pub use cyk::CykParser;
pub use display::ExportError;
pub use earley::EarleyParser;
pub use error::{Reason, SyntaxError};
pub use grammar::{CharacterRange, Grammar, NonTerm, Production, Regexp, Symbol, Terminal};
pub use tokenizer::{TokenLattice, TokenMatch};
pub use tree::SyntaxTree;

/// Half-open byte range `[start, end)` into the parsed input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The text this span covers.
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(r: std::ops::Range<usize>) -> Span {
        Span { start: r.start, end: r.end }
    }
}

/// Common face of the two chart parsers.
pub trait Parser {
    /// The token lattice the parser would consume for `input`.
    fn tokenize(&self, input: &str) -> Result<TokenLattice, SyntaxError>;

    /// Parse tree over the grammar's own nonterminals, or where and why
    /// the input fell out of the language.
    fn syntax_tree(&self, input: &str) -> Result<SyntaxTree<NonTerm, Span>, SyntaxError>;

    /// Membership only.
    fn recognizes(&self, input: &str) -> bool {
        self.syntax_tree(input).is_ok()
    }
}

#[cfg(test)]
mod tests;
