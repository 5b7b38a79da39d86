//! Earley's algorithm over an arbitrary context-free grammar: gradually
//! build, from left to right, a set of items for each token boundary.
//!
//! An item `(production, dot, origin)` in column `k` records a derivation
//! of `body[..dot]` spanning the columns `origin..k`. The item sets
//! memoize: rather than reparse portions of input, later columns reuse
//! items from earlier ones. Three moves grow a column until nothing new
//! appears: predict a nonterminal after the dot, scan a terminal against
//! the token slot, and complete a finished item into everything that was
//! waiting for it.
//!
//! Predicting a nullable nonterminal also advances the predicting item on
//! the spot. Without that, a completion of an epsilon derivation races
//! against predictions arriving later in the same column, and grammars
//! like `S -> A A; A -> 'a' | ()` silently lose sentences.

use std::collections::HashSet;

use crate::error::{Reason, SyntaxError};
use crate::grammar::{Grammar, NonTerm, Production, Symbol};
use crate::normalize::{nullable_nonterms, unfold_chains};
use crate::tokenizer::{self, TokenLattice};
use crate::tree::SyntaxTree;
use crate::{Parser, Span};

/// Top-down chart parser. Works on the grammar as written: left
/// recursion, ambiguity and epsilon productions are all fine.
pub struct EarleyParser {
    grammar: Grammar,
    nullable: HashSet<NonTerm>,
}

impl EarleyParser {
    pub fn new(grammar: Grammar) -> Self {
        let nullable = nullable_nonterms(grammar.productions());
        EarleyParser { grammar, nullable }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

/// How one consumed body symbol was derived; the back-pointers of an item.
#[derive(Clone, Debug)]
enum Derivation {
    /// A scanned token.
    Token(Span),
    /// A completed sub-derivation.
    Parsed { production: usize, children: Vec<Derivation> },
    /// A nullable nonterminal skipped at prediction time; the byte offset
    /// pins its empty leaves to the right boundary.
    Nulled(NonTerm, usize),
}

#[derive(Clone, Debug)]
struct Item {
    production: usize,
    dot: usize,
    origin: usize,
    children: Vec<Derivation>,
}

impl Item {
    fn key(&self) -> (usize, usize, usize) {
        (self.production, self.dot, self.origin)
    }

    fn advanced(&self, with: Derivation) -> Item {
        let mut children = self.children.clone();
        children.push(with);
        Item { production: self.production, dot: self.dot + 1, origin: self.origin, children }
    }
}

struct Chart {
    columns: Vec<Vec<Item>>,
    keys: Vec<HashSet<(usize, usize, usize)>>,
}

impl Chart {
    fn new(columns: usize) -> Self {
        Chart { columns: vec![Vec::new(); columns], keys: vec![HashSet::new(); columns] }
    }

    /// First discovery wins; a duplicate key carries no derivation we
    /// would ever extract.
    fn push(&mut self, column: usize, item: Item) {
        if self.keys[column].insert(item.key()) {
            self.columns[column].push(item);
        }
    }
}

impl Parser for EarleyParser {
    fn tokenize(&self, input: &str) -> Result<TokenLattice, SyntaxError> {
        tokenizer::tokenize(input, &self.grammar)
    }

    fn syntax_tree(&self, input: &str) -> Result<SyntaxTree<NonTerm, Span>, SyntaxError> {
        let lattice = self.tokenize(input)?;
        let n = lattice.len();
        let productions = self.grammar.productions();
        let mut chart = Chart::new(n + 1);

        for (i, p) in productions.iter().enumerate() {
            if p.pattern() == self.grammar.start() {
                chart.push(0, Item { production: i, dot: 0, origin: 0, children: Vec::new() });
            }
        }

        for k in 0..=n {
            let mut at = 0;
            while at < chart.columns[k].len() {
                let item = chart.columns[k][at].clone();
                at += 1;
                match productions[item.production].body().get(item.dot) {
                    None => self.complete(&mut chart, k, &item),
                    Some(Symbol::NonTerm(x)) => {
                        let x = x.clone();
                        self.predict(&mut chart, k, &x);
                        if self.nullable.contains(&x) {
                            let boundary = lattice.boundary(k, input);
                            chart.push(k, item.advanced(Derivation::Nulled(x, boundary)));
                        }
                    }
                    Some(Symbol::Terminal(t)) if t.is_empty() => {
                        let boundary = lattice.boundary(k, input);
                        let span = Span { start: boundary, end: boundary };
                        chart.push(k, item.advanced(Derivation::Token(span)));
                    }
                    Some(Symbol::Terminal(t)) => {
                        if k < n {
                            if let Some(m) = lattice.slot(k).iter().find(|m| &m.terminal == t) {
                                chart.push(k + 1, item.advanced(Derivation::Token(m.range)));
                            }
                        }
                    }
                }
            }
        }

        let accepted = chart.columns[n].iter().find(|item| {
            item.origin == 0
                && item.dot == productions[item.production].body().len()
                && productions[item.production].pattern() == self.grammar.start()
        });

        match accepted {
            Some(item) => {
                tracing::debug!(columns = n + 1, "parse accepted");
                Ok(unfold_chains(self.build(item.production, &item.children)))
            }
            None if n == 0 => {
                Err(SyntaxError::new(Reason::EmptyNotAllowed, Span { start: 0, end: 0 }, input))
            }
            None => Err(self.diagnose(&chart, &lattice, input)),
        }
    }
}

impl EarleyParser {
    fn predict(&self, chart: &mut Chart, k: usize, x: &NonTerm) {
        for (i, _) in
            self.grammar.productions().iter().enumerate().filter(|(_, p)| p.pattern() == x)
        {
            chart.push(k, Item { production: i, dot: 0, origin: k, children: Vec::new() });
        }
    }

    fn complete(&self, chart: &mut Chart, k: usize, item: &Item) {
        let productions = self.grammar.productions();
        let lhs = productions[item.production].pattern();
        let waiting: Vec<Item> = chart.columns[item.origin]
            .iter()
            .filter(|w| {
                matches!(productions[w.production].body().get(w.dot),
                         Some(Symbol::NonTerm(x)) if x == lhs)
            })
            .cloned()
            .collect();
        let derivation =
            Derivation::Parsed { production: item.production, children: item.children.clone() };
        for w in waiting {
            chart.push(k, w.advanced(derivation.clone()));
        }
    }

    fn build(&self, production: usize, children: &[Derivation]) -> SyntaxTree<Production, Span> {
        let kids = children
            .iter()
            .map(|d| match d {
                Derivation::Token(span) => SyntaxTree::leaf(*span),
                Derivation::Parsed { production, children } => self.build(*production, children),
                Derivation::Nulled(x, at) => self
                    .empty_derivation(x, *at, &mut Vec::new())
                    .expect("nullable nonterminal derives the empty word"),
            })
            .collect();
        SyntaxTree::node(self.grammar.productions()[production].clone(), kids)
    }

    /// Deterministic epsilon derivation of a nullable nonterminal: the
    /// first production whose body is entirely nullable, with a busy list
    /// guarding against cycles among nullable chain rules.
    fn empty_derivation(
        &self,
        x: &NonTerm,
        at: usize,
        busy: &mut Vec<NonTerm>,
    ) -> Option<SyntaxTree<Production, Span>> {
        busy.push(x.clone());
        let mut found = None;
        for p in self.grammar.productions().iter().filter(|p| p.pattern() == x) {
            let viable = p.body().iter().all(|s| match s {
                Symbol::Terminal(t) => t.is_empty(),
                Symbol::NonTerm(nt) => self.nullable.contains(nt) && !busy.contains(nt),
            });
            if !viable {
                continue;
            }
            let mut kids = Vec::with_capacity(p.body().len());
            let mut ok = true;
            for s in p.body() {
                match s {
                    Symbol::Terminal(_) => kids.push(SyntaxTree::leaf(Span { start: at, end: at })),
                    Symbol::NonTerm(nt) => match self.empty_derivation(nt, at, busy) {
                        Some(t) => kids.push(t),
                        None => {
                            ok = false;
                            break;
                        }
                    },
                }
            }
            if ok {
                found = Some(SyntaxTree::node(p.clone(), kids));
                break;
            }
        }
        busy.pop();
        found
    }

    fn diagnose(&self, chart: &Chart, lattice: &TokenLattice, input: &str) -> SyntaxError {
        let n = lattice.len();
        let k = (0..=n).rev().find(|&k| !chart.columns[k].is_empty()).unwrap_or(0);
        let mut seen = HashSet::new();
        let context: Vec<NonTerm> = chart.columns[k]
            .iter()
            .filter_map(
                |item| match self.grammar.productions()[item.production].body().get(item.dot) {
                    Some(Symbol::NonTerm(x)) => Some(x.clone()),
                    _ => None,
                },
            )
            .filter(|x| seen.insert(x.clone()))
            .collect();
        let (reason, range) = if k < n {
            (Reason::UnexpectedToken, lattice.slot(k)[0].range)
        } else {
            (Reason::UnmatchedPattern, Span { start: input.len(), end: input.len() })
        };
        SyntaxError::new(reason, range, input).with_context(context)
    }
}
