//! Bottom-up chart parsing over grammars in Chomsky normal form.
//!
//! The chart is a triangular table: `table[row][col]` holds candidate
//! sub-trees spanning `row + 1` tokens starting at token `col`. Row zero
//! is seeded straight from the token lattice; every later cell combines
//! two smaller spans through the binary productions. A cell keeps at most
//! one sub-tree per root nonterminal, first discovery wins, which bounds
//! the work but means one representative tree, never the whole forest.

use std::collections::HashMap;

use linear_map::LinearMap;
use once_cell::sync::OnceCell;

use crate::error::{Reason, SyntaxError};
use crate::grammar::{Grammar, NonTerm, Production, Symbol, Terminal};
use crate::normalize::denormalize;
use crate::tokenizer::{self, TokenLattice};
use crate::tree::SyntaxTree;
use crate::{Parser, Span};

type Cell = LinearMap<NonTerm, SyntaxTree<Production, Span>>;

/// Bottom-up chart parser over the Chomsky normal form of a grammar. The
/// normalization runs at most once, on first use, and is shared by every
/// later parse; trees come back rewritten over the original symbols.
pub struct CykParser {
    grammar: Grammar,
    normalized: OnceCell<Grammar>,
}

impl CykParser {
    pub fn new(grammar: Grammar) -> Self {
        CykParser { grammar, normalized: OnceCell::new() }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn normalized(&self) -> &Grammar {
        // Run the pipeline even on grammars already in normal form; it is
        // the identity there, and it restores the start-symbol side
        // condition on hand-built ones.
        self.normalized.get_or_init(|| self.grammar.chomsky_normalized())
    }
}

impl Parser for CykParser {
    fn tokenize(&self, input: &str) -> Result<TokenLattice, SyntaxError> {
        tokenizer::tokenize(input, self.normalized())
    }

    fn syntax_tree(&self, input: &str) -> Result<SyntaxTree<NonTerm, Span>, SyntaxError> {
        let grammar = self.normalized();
        let lattice = self.tokenize(input)?;
        let n = lattice.len();
        if n == 0 {
            let derives_empty = grammar
                .productions()
                .iter()
                .any(|p| p.body().is_empty() && p.pattern() == grammar.start());
            return if derives_empty {
                Ok(SyntaxTree::node(self.grammar.start().clone(), Vec::new()))
            } else {
                Err(SyntaxError::new(Reason::EmptyNotAllowed, Span { start: 0, end: 0 }, input))
            };
        }

        let mut finals: HashMap<&Terminal, Vec<&Production>> = HashMap::new();
        let mut binary: Vec<(&Production, &NonTerm, &NonTerm)> = Vec::new();
        for p in grammar.productions() {
            match p.body() {
                [Symbol::Terminal(t)] => finals.entry(t).or_default().push(p),
                [Symbol::NonTerm(b), Symbol::NonTerm(c)] => binary.push((p, b, c)),
                _ => {}
            }
        }

        let mut table: Vec<Vec<Cell>> = (0..n).map(|row| vec![Cell::new(); n - row]).collect();
        for (col, slot) in lattice.slots().iter().enumerate() {
            for m in slot {
                for p in finals.get(&m.terminal).into_iter().flatten() {
                    let cell = &mut table[0][col];
                    if !cell.contains_key(p.pattern()) {
                        let tree =
                            SyntaxTree::node((*p).clone(), vec![SyntaxTree::leaf(m.range)]);
                        cell.insert(p.pattern().clone(), tree);
                    }
                }
            }
        }

        for row in 1..n {
            let (lower, upper) = table.split_at_mut(row);
            for col in 0..n - row {
                for offset in 1..=row {
                    let left = &lower[row - offset][col];
                    let right = &lower[offset - 1][col + row - offset + 1];
                    for &(p, b, c) in &binary {
                        let (Some(lt), Some(rt)) = (left.get(b), right.get(c)) else { continue };
                        let cell = &mut upper[0][col];
                        if !cell.contains_key(p.pattern()) {
                            let tree = SyntaxTree::node(p.clone(), vec![lt.clone(), rt.clone()]);
                            cell.insert(p.pattern().clone(), tree);
                        }
                    }
                }
            }
        }

        match table[n - 1][0].get(grammar.start()) {
            Some(tree) => {
                tracing::debug!(tokens = n, "parse accepted");
                Ok(denormalize(grammar, tree.clone()))
            }
            None => Err(self.diagnose(&table, &lattice, input)),
        }
    }
}

impl CykParser {
    /// Longest prefix of the input already derivable from the start
    /// symbol; the error points at the first token past it, or at the end
    /// of the input when no prefix derives at all. This deliberately scans
    /// only spans anchored at the first token, so on grammars with
    /// ambiguous prefixes the located position may trail the true first
    /// failure.
    fn diagnose(&self, table: &[Vec<Cell>], lattice: &TokenLattice, input: &str) -> SyntaxError {
        let n = lattice.len();
        let start = self.normalized().start();
        let covered = (0..n)
            .rev()
            .find(|&rows| table[rows][0].contains_key(start))
            .map(|rows| rows + 1);
        let range = match covered {
            Some(c) if c < n => lattice.slot(c)[0].range,
            _ => Span { start: input.len(), end: input.len() },
        };
        SyntaxError::new(Reason::UnmatchedPattern, range, input)
    }
}
