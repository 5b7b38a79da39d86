//! The symbol model: terminals, nonterminals, productions, grammars.
//!
//! A grammar G is a tuple (Sigma, Delta, A_0, R), where
//!   Sigma is a finite set of terminals,
//!   Delta is a finite set of non-terminals,
//!   A_0 in Delta is the start non-terminal, and
//!   R is a finite sequence of productions A -> beta with A in Delta and
//!   beta a word over (Sigma union Delta).
//!
//! The sequence order of R is part of a grammar's identity as far as the
//! parsers are concerned: both chart parsers and the tokenizer resolve
//! ties in production order, so two grammars with the same rules in a
//! different order may produce different (equally valid) trees.

use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct NonTerm(pub(crate) String);

impl NonTerm {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NonTerm {
    fn from(a: &str) -> Self {
        Self(a.into())
    }
}
impl From<String> for NonTerm {
    fn from(a: String) -> Self {
        Self(a)
    }
}

/// Inclusive interval of Unicode scalar values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CharacterRange {
    #[serde(rename = "lowerBound")]
    pub(crate) low: char,
    #[serde(rename = "upperBound")]
    pub(crate) high: char,
}

impl CharacterRange {
    pub fn new(low: char, high: char) -> Self {
        assert!(low <= high, "range bounds out of order: {low:?} > {high:?}");
        CharacterRange { low, high }
    }

    pub fn contains(&self, c: char) -> bool {
        self.low <= c && c <= self.high
    }
}

/// A regular-expression terminal. The pattern compiles once, anchored at
/// the match position; identity is the pattern text, never the automaton
/// behind it.
#[derive(Clone, Debug)]
pub struct Regexp {
    pattern: String,
    re: regex::Regex,
}

impl Regexp {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let re = regex::Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Regexp { pattern: pattern.to_owned(), re })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn prefix_len(&self, rest: &str) -> Option<usize> {
        self.re.find(rest).map(|m| m.end())
    }
}

impl PartialEq for Regexp {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}
impl Eq for Regexp {}

impl Hash for Regexp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state)
    }
}

impl Serialize for Regexp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

impl<'de> Deserialize<'de> for Regexp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Regexp::new(&pattern).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Terminal {
    #[serde(rename = "string")]
    Literal(String),
    #[serde(rename = "characterRange")]
    CharRange(CharacterRange),
    #[serde(rename = "regularExpression")]
    Regex(Regexp),
}

impl Terminal {
    pub fn literal(s: impl Into<String>) -> Self {
        Terminal::Literal(s.into())
    }

    pub fn range(low: char, high: char) -> Self {
        Terminal::CharRange(CharacterRange::new(low, high))
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Terminal::Regex(Regexp::new(pattern)?))
    }

    /// Empty terminals never yield a token; they matter only for
    /// nullability. Character ranges are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Terminal::Literal(s) => s.is_empty(),
            Terminal::CharRange(_) => false,
            Terminal::Regex(re) => re.pattern().is_empty(),
        }
    }

    /// Length in bytes of the match at the start of `rest`, if any.
    pub(crate) fn match_len(&self, rest: &str) -> Option<usize> {
        match self {
            Terminal::Literal(s) => rest.starts_with(s.as_str()).then(|| s.len()),
            Terminal::CharRange(r) => {
                rest.chars().next().filter(|c| r.contains(*c)).map(char::len_utf8)
            }
            Terminal::Regex(re) => re.prefix_len(rest),
        }
    }
}

impl From<&str> for Terminal {
    fn from(a: &str) -> Self {
        Terminal::Literal(a.into())
    }
}
impl From<char> for Terminal {
    fn from(a: char) -> Self {
        Terminal::Literal(a.to_string())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, derive_more::From, Serialize, Deserialize)]
pub enum Symbol {
    #[serde(rename = "terminal")]
    Terminal(Terminal),
    #[serde(rename = "nonTerminal")]
    NonTerm(NonTerm),
}

impl Symbol {
    pub fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            Symbol::Terminal(t) => Some(t),
            Symbol::NonTerm(_) => None,
        }
    }

    pub fn as_nonterm(&self) -> Option<&NonTerm> {
        match self {
            Symbol::Terminal(_) => None,
            Symbol::NonTerm(nt) => Some(nt),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Production {
    #[serde(rename = "pattern")]
    pub(crate) lhs: NonTerm,
    #[serde(rename = "body")]
    pub(crate) rhs: Vec<Symbol>,
    /// Nonterminals collapsed out of a run of chain productions, outermost
    /// first. Recorded during normalization, spliced back into trees during
    /// reconstruction.
    #[serde(rename = "nonTerminalChain", default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) chain: Vec<NonTerm>,
}

impl Production {
    pub fn new(lhs: impl Into<NonTerm>, rhs: Vec<Symbol>) -> Self {
        Production { lhs: lhs.into(), rhs, chain: Vec::new() }
    }

    pub fn pattern(&self) -> &NonTerm {
        &self.lhs
    }

    pub fn body(&self) -> &[Symbol] {
        &self.rhs
    }

    /// A production is final once its body mentions a terminal; in Chomsky
    /// normal form that means exactly one terminal and nothing else.
    pub fn is_final(&self) -> bool {
        self.rhs.iter().any(|s| matches!(s, Symbol::Terminal(_)))
    }

    pub fn is_chain(&self) -> bool {
        self.chain_target().is_some()
    }

    pub(crate) fn chain_target(&self) -> Option<&NonTerm> {
        match self.rhs.as_slice() {
            [Symbol::NonTerm(nt)] => Some(nt),
            _ => None,
        }
    }

    pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.rhs.iter().filter_map(Symbol::as_terminal)
    }

    pub fn nonterms(&self) -> impl Iterator<Item = &NonTerm> {
        self.rhs.iter().filter_map(Symbol::as_nonterm)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Grammar {
    pub(crate) productions: Vec<Production>,
    pub(crate) start: NonTerm,
    #[serde(rename = "utilityNonTerminals", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub(crate) utility: BTreeSet<NonTerm>,
}

impl Grammar {
    pub fn new(productions: Vec<Production>, start: impl Into<NonTerm>) -> Self {
        Grammar { productions, start: start.into(), utility: BTreeSet::new() }
    }

    pub fn start(&self) -> &NonTerm {
        &self.start
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Names the normalizer invented. Trees over a normalized grammar drop
    /// these nodes on reconstruction.
    pub fn utility_nonterms(&self) -> &BTreeSet<NonTerm> {
        &self.utility
    }

    pub fn nonterms(&self) -> HashSet<&NonTerm> {
        // Left-hand sides only. A nonterminal that occurs on right-hand
        // sides without ever being defined is not an error; it just never
        // derives anything.
        self.productions.iter().map(|p| &p.lhs).collect()
    }

    pub fn terminals(&self) -> HashSet<&Terminal> {
        self.productions.iter().flat_map(Production::terminals).collect()
    }

    /// Terminals in production order, first occurrence wins. The tokenizer
    /// walks this list, so its order settles tie-breaks.
    pub(crate) fn terminal_list(&self) -> Vec<&Terminal> {
        let mut seen = HashSet::new();
        self.productions
            .iter()
            .flat_map(Production::terminals)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Every production is `A -> a`, `A -> B C`, or `S -> ()` with `S` the
    /// start symbol.
    pub fn is_in_chomsky_normal_form(&self) -> bool {
        self.productions.iter().all(|p| match p.rhs.as_slice() {
            [Symbol::Terminal(_)] => true,
            [Symbol::NonTerm(_), Symbol::NonTerm(_)] => true,
            [] => p.lhs == self.start,
            _ => false,
        })
    }
}
