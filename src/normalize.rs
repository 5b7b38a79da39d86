//! Rewriting an arbitrary grammar into Chomsky normal form, and undoing
//! the rewrite on parse trees afterwards.
//!
//! The pipeline runs in a fixed order: strip empty terminals, hoist
//! terminals out of mixed bodies, break long bodies into right-linear
//! cascades, eliminate epsilon productions, eliminate chain productions.
//! Each stage records enough bookkeeping for `denormalize` to rebuild
//! trees over the original symbols: invented names land in the grammar's
//! utility set, and collapsed chain runs are tagged onto the productions
//! that replaced them.

use std::collections::{BTreeSet, HashMap, HashSet};

use itertools::Itertools;

use crate::grammar::{Grammar, NonTerm, Production, Symbol, Terminal};
use crate::tree::SyntaxTree;
use crate::Span;

/// Generator for nonterminal names that cannot collide with user names.
struct FreshNames {
    used: HashSet<String>,
    next: usize,
}

impl FreshNames {
    fn reserving(grammar: &Grammar) -> Self {
        let mut used: HashSet<String> =
            grammar.productions().iter().map(|p| p.pattern().name().to_owned()).collect();
        used.extend(
            grammar
                .productions()
                .iter()
                .flat_map(Production::nonterms)
                .map(|nt| nt.name().to_owned()),
        );
        FreshNames { used, next: 0 }
    }

    fn fresh(&mut self, hint: &str) -> NonTerm {
        loop {
            let name = format!("{}~{}", hint, self.next);
            self.next += 1;
            if self.used.insert(name.clone()) {
                return NonTerm(name);
            }
        }
    }
}

impl Grammar {
    /// Equivalent grammar in Chomsky normal form. The language is
    /// unchanged; invented names are collected in the utility set and
    /// collapsed chains are recorded on the emitted productions, so trees
    /// over the result can be rewritten back over the original symbols.
    pub fn chomsky_normalized(&self) -> Grammar {
        let mut fresh = FreshNames::reserving(self);
        let mut utility = self.utility.clone();
        let mut start = self.start.clone();

        let mut productions: Vec<Production> =
            self.productions.iter().map(strip_empty_terminals).collect();
        separate_terminals(&mut productions, &mut fresh, &mut utility);
        break_long_bodies(&mut productions, &mut fresh, &mut utility);
        eliminate_empty(&mut productions, &mut start, &mut fresh, &mut utility);
        let productions = eliminate_chains(&productions);

        tracing::debug!(
            productions = productions.len(),
            utility = utility.len(),
            "rewrote grammar into Chomsky normal form"
        );
        Grammar { productions, start, utility }
    }
}

/// An empty terminal matches exactly the empty word, so dropping the
/// symbol from the body leaves the derived language alone. A body made
/// entirely of empty terminals becomes an epsilon body, which the epsilon
/// stage knows how to handle.
fn strip_empty_terminals(p: &Production) -> Production {
    let rhs = p
        .body()
        .iter()
        .filter(|s| !matches!(s, Symbol::Terminal(t) if t.is_empty()))
        .cloned()
        .collect();
    Production { lhs: p.lhs.clone(), rhs, chain: p.chain.clone() }
}

/// Hoist terminals out of bodies of length two or more: each distinct
/// terminal gets one wrapper nonterminal deriving exactly it.
fn separate_terminals(
    productions: &mut Vec<Production>,
    fresh: &mut FreshNames,
    utility: &mut BTreeSet<NonTerm>,
) {
    let mut wrappers: HashMap<Terminal, NonTerm> = HashMap::new();
    let mut hoisted: Vec<Production> = Vec::new();
    for p in productions.iter_mut() {
        if p.rhs.len() < 2 {
            continue;
        }
        let hint = p.lhs.name().to_owned();
        for sym in p.rhs.iter_mut() {
            let Symbol::Terminal(t) = sym else { continue };
            let wrapper = wrappers.entry(t.clone()).or_insert_with(|| {
                let nt = fresh.fresh(&hint);
                utility.insert(nt.clone());
                hoisted.push(Production::new(nt.clone(), vec![t.clone().into()]));
                nt
            });
            *sym = wrapper.clone().into();
        }
    }
    productions.extend(hoisted);
}

/// Rewrite every body `X1 X2 .. Xk` with `k >= 3` as a right-linear
/// cascade `A -> X1 A~i`, `A~i -> X2 A~j`, .., ending in a length-two
/// body.
fn break_long_bodies(
    productions: &mut Vec<Production>,
    fresh: &mut FreshNames,
    utility: &mut BTreeSet<NonTerm>,
) {
    let mut cascades: Vec<Production> = Vec::new();
    for p in productions.iter_mut() {
        if p.rhs.len() < 3 {
            continue;
        }
        let hint = p.lhs.name().to_owned();
        let mut rest: Vec<Symbol> = std::mem::take(&mut p.rhs);
        let first = rest.remove(0);
        let link = fresh.fresh(&hint);
        utility.insert(link.clone());
        p.rhs = vec![first, link.clone().into()];
        let mut lhs = link;
        while rest.len() > 2 {
            let head = rest.remove(0);
            let next = fresh.fresh(&hint);
            utility.insert(next.clone());
            cascades.push(Production::new(lhs, vec![head, next.clone().into()]));
            lhs = next;
        }
        cascades.push(Production::new(lhs, rest));
    }
    productions.extend(cascades);
}

/// Fixpoint of: a nonterminal is nullable when some body of it consists
/// solely of nullable symbols. Empty terminals count as nullable, they
/// never produce a token.
pub(crate) fn nullable_nonterms(productions: &[Production]) -> HashSet<NonTerm> {
    let mut nullable: HashSet<NonTerm> = HashSet::new();
    loop {
        let mut changed = false;
        for p in productions {
            if nullable.contains(&p.lhs) {
                continue;
            }
            let all = p.rhs.iter().all(|s| match s {
                Symbol::Terminal(t) => t.is_empty(),
                Symbol::NonTerm(nt) => nullable.contains(nt),
            });
            if all {
                nullable.insert(p.lhs.clone());
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

/// For every body mentioning nullable nonterminals, emit all variants
/// obtained by independently omitting each nullable occurrence, except
/// the fully empty one. The epsilon production survives only on a
/// nullable start symbol; if that start also occurs on a right-hand side,
/// a fresh start symbol takes over first.
fn eliminate_empty(
    productions: &mut Vec<Production>,
    start: &mut NonTerm,
    fresh: &mut FreshNames,
    utility: &mut BTreeSet<NonTerm>,
) {
    let nullable = nullable_nonterms(productions);
    let mut kept: Vec<Production> = Vec::new();
    let mut seen: HashSet<Production> = HashSet::new();
    for p in productions.iter() {
        if p.rhs.is_empty() {
            continue;
        }
        let omittable: Vec<usize> = p
            .rhs
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Symbol::NonTerm(nt) if nullable.contains(nt)))
            .map(|(i, _)| i)
            .collect();
        for omit in omittable.iter().copied().powerset() {
            let omit: HashSet<usize> = omit.into_iter().collect();
            let rhs: Vec<Symbol> = p
                .rhs
                .iter()
                .enumerate()
                .filter(|(i, _)| !omit.contains(i))
                .map(|(_, s)| s.clone())
                .collect();
            if rhs.is_empty() {
                continue;
            }
            let q = Production { lhs: p.lhs.clone(), rhs, chain: p.chain.clone() };
            if seen.insert(q.clone()) {
                kept.push(q);
            }
        }
    }
    if nullable.contains(start) {
        let start_on_rhs = kept.iter().any(|p| p.nonterms().any(|nt| nt == start));
        if start_on_rhs {
            let fresh_start = fresh.fresh(start.name());
            utility.insert(fresh_start.clone());
            kept.push(Production::new(fresh_start.clone(), vec![start.clone().into()]));
            *start = fresh_start;
        }
        kept.push(Production::new(start.clone(), Vec::new()));
    }
    *productions = kept;
}

/// Collapse runs of chain productions. For every nonterminal `A` and
/// every `B` reachable from `A` through chain productions alone, each
/// non-chain production `B -> beta` reappears as `A -> beta` tagged with
/// the witnessing run, `B` included and `A` excluded. Chain productions
/// themselves do not survive.
fn eliminate_chains(productions: &[Production]) -> Vec<Production> {
    let mut out: Vec<Production> = Vec::new();
    let mut seen_lhs: HashSet<&NonTerm> = HashSet::new();
    let mut emitted: HashSet<Production> = HashSet::new();
    for p in productions {
        if !seen_lhs.insert(&p.lhs) {
            continue;
        }
        let a = &p.lhs;
        // Breadth-first closure, remembering the path that witnessed each
        // reached nonterminal. The first path found wins.
        let mut frontier: Vec<(NonTerm, Vec<NonTerm>)> = vec![(a.clone(), Vec::new())];
        let mut visited: HashSet<NonTerm> = HashSet::from([a.clone()]);
        let mut at = 0;
        while at < frontier.len() {
            let (b, path) = frontier[at].clone();
            at += 1;
            for q in productions.iter().filter(|q| q.lhs == b) {
                match q.chain_target() {
                    Some(c) => {
                        if !visited.contains(c) {
                            visited.insert(c.clone());
                            let mut next = path.clone();
                            next.push(c.clone());
                            frontier.push((c.clone(), next));
                        }
                    }
                    None => {
                        let mut chain = path.clone();
                        chain.extend(q.chain.iter().cloned());
                        let r = Production { lhs: a.clone(), rhs: q.rhs.clone(), chain };
                        if emitted.insert(r.clone()) {
                            out.push(r);
                        }
                    }
                }
            }
        }
    }
    out
}

/// Rewrite a tree over the normalized grammar into one over the original
/// symbols: reintroduce collapsed chains, then splice out utility nodes.
/// Both passes run on an explicit stack; right-linear cascades nest about
/// as deep as the input is long.
pub(crate) fn denormalize(
    grammar: &Grammar,
    tree: SyntaxTree<Production, Span>,
) -> SyntaxTree<NonTerm, Span> {
    explode_utility(&grammar.utility, unfold_chains(tree))
}

/// Turn production-keyed nodes into nonterminal-keyed nodes, re-wrapping
/// the children of chain-tagged productions in the collapsed run of
/// single-child nodes, innermost last.
pub(crate) fn unfold_chains(tree: SyntaxTree<Production, Span>) -> SyntaxTree<NonTerm, Span> {
    enum Frame {
        Enter(SyntaxTree<Production, Span>),
        Exit(Production, usize),
    }
    let mut out: Vec<SyntaxTree<NonTerm, Span>> = Vec::new();
    let mut stack = vec![Frame::Enter(tree)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(SyntaxTree::Leaf(l)) => out.push(SyntaxTree::Leaf(l)),
            Frame::Enter(SyntaxTree::Node { key, children }) => {
                stack.push(Frame::Exit(key, children.len()));
                for c in children.into_iter().rev() {
                    stack.push(Frame::Enter(c));
                }
            }
            Frame::Exit(prod, arity) => {
                let kids = out.split_off(out.len() - arity);
                out.push(rewrap(prod, kids));
            }
        }
    }
    out.pop().expect("tree rewrite leaves exactly one root")
}

fn rewrap(prod: Production, children: Vec<SyntaxTree<NonTerm, Span>>) -> SyntaxTree<NonTerm, Span> {
    let Production { lhs, mut chain, .. } = prod;
    match chain.pop() {
        None => SyntaxTree::node(lhs, children),
        Some(innermost) => {
            let mut node = SyntaxTree::node(innermost, children);
            while let Some(c) = chain.pop() {
                node = SyntaxTree::node(c, vec![node]);
            }
            SyntaxTree::node(lhs, vec![node])
        }
    }
}

/// Splice the children of every utility-keyed node into its parent's
/// child list. A utility root keeps collapsing into its single child
/// until a user-declared nonterminal surfaces.
pub(crate) fn explode_utility(
    utility: &BTreeSet<NonTerm>,
    tree: SyntaxTree<NonTerm, Span>,
) -> SyntaxTree<NonTerm, Span> {
    enum Frame {
        Enter(SyntaxTree<NonTerm, Span>),
        Exit(NonTerm, usize),
    }
    let mut out: Vec<SyntaxTree<NonTerm, Span>> = Vec::new();
    let mut stack = vec![Frame::Enter(tree)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(SyntaxTree::Leaf(l)) => out.push(SyntaxTree::Leaf(l)),
            Frame::Enter(SyntaxTree::Node { key, children }) => {
                stack.push(Frame::Exit(key, children.len()));
                for c in children.into_iter().rev() {
                    stack.push(Frame::Enter(c));
                }
            }
            Frame::Exit(key, arity) => {
                let kids = out.split_off(out.len() - arity);
                let mut spliced = Vec::with_capacity(kids.len());
                for kid in kids {
                    match kid {
                        SyntaxTree::Node { key, children } if utility.contains(&key) => {
                            spliced.extend(children)
                        }
                        other => spliced.push(other),
                    }
                }
                out.push(SyntaxTree::node(key, spliced));
            }
        }
    }
    let mut root = out.pop().expect("tree rewrite leaves exactly one root");
    loop {
        root = match root {
            SyntaxTree::Node { key, mut children }
                if utility.contains(&key) && children.len() == 1 =>
            {
                children.pop().expect("checked a single child")
            }
            other => return other,
        };
    }
}
