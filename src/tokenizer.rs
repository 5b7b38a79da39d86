//! The tokenizer is deliberately simple-minded: it has no token classes of
//! its own, only the terminals the grammar happens to mention. Walking the
//! input left to right it collects, at each position, every terminal that
//! matches a prefix there. One position, one slot; alternative readings of
//! the same stretch live side by side inside the slot and are left for the
//! parsers to arbitrate. Nondeterminism within a slot, never across
//! offsets.
//!
//! Slot boundaries need one canonical segmentation, so of all the match
//! lengths seen at a position the tokenizer keeps the one preserving the
//! most alternatives, breaking ties toward the longest match.

use std::collections::BTreeMap;

use crate::error::{Reason, SyntaxError};
use crate::grammar::{Grammar, Terminal};
use crate::Span;

/// One alternative reading of a token slot.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TokenMatch {
    pub terminal: Terminal,
    pub range: Span,
}

/// One slot per token position; each slot holds every terminal that matched
/// there.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TokenLattice {
    slots: Vec<Vec<TokenMatch>>,
}

impl TokenLattice {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Vec<TokenMatch>] {
        &self.slots
    }

    pub(crate) fn slot(&self, i: usize) -> &[TokenMatch] {
        &self.slots[i]
    }

    /// Byte offset of the boundary before slot `i`; the end of input for
    /// `i = len`.
    pub(crate) fn boundary(&self, i: usize, input: &str) -> usize {
        if i < self.slots.len() {
            self.slots[i][0].range.start
        } else {
            input.len()
        }
    }
}

pub(crate) fn tokenize(input: &str, grammar: &Grammar) -> Result<TokenLattice, SyntaxError> {
    let terminals = grammar.terminal_list();
    let mut slots = Vec::new();
    let mut pos = 0;
    while pos < input.len() {
        let rest = &input[pos..];
        let mut by_len: BTreeMap<usize, Vec<&Terminal>> = BTreeMap::new();
        for &t in &terminals {
            // Zero-length matches cannot advance the walk; skip them.
            if let Some(len) = t.match_len(rest).filter(|len| *len > 0) {
                by_len.entry(len).or_default().push(t);
            }
        }
        let mut chosen: Option<(usize, Vec<&Terminal>)> = None;
        for (len, matched) in by_len.into_iter().rev() {
            let better = chosen.as_ref().map_or(true, |(_, best)| matched.len() > best.len());
            if better {
                chosen = Some((len, matched));
            }
        }
        let Some((len, matched)) = chosen else {
            let c = rest.chars().next().expect("position is inside the input");
            let range = Span { start: pos, end: pos + c.len_utf8() };
            return Err(SyntaxError::new(Reason::UnknownToken, range, input));
        };
        let range = Span { start: pos, end: pos + len };
        slots.push(
            matched
                .into_iter()
                .map(|t| TokenMatch { terminal: t.clone(), range })
                .collect(),
        );
        pos += len;
    }
    tracing::trace!(tokens = slots.len(), "tokenized input");
    Ok(TokenLattice { slots })
}
