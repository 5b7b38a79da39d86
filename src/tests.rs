use itertools::Itertools;

use super::*;

mod display;
mod grammar;
mod normalize;
mod persist;

pub(crate) fn lit(s: &str) -> Symbol {
    Terminal::literal(s).into()
}

pub(crate) fn nt(s: &str) -> Symbol {
    NonTerm::from(s).into()
}

pub(crate) fn prod(lhs: &str, body: Vec<Symbol>) -> Production {
    Production::new(lhs, body)
}

/// E -> E '+' E | E '*' E | 'a'
pub(crate) fn arithmetic() -> Grammar {
    Grammar::new(
        vec![
            prod("E", vec![nt("E"), lit("+"), nt("E")]),
            prod("E", vec![nt("E"), lit("*"), nt("E")]),
            prod("E", vec![lit("a")]),
        ],
        "E",
    )
}

/// S -> 'a' S | ()
pub(crate) fn nullable_start() -> Grammar {
    Grammar::new(vec![prod("S", vec![lit("a"), nt("S")]), prod("S", vec![])], "S")
}

/// S -> A; A -> B; B -> 'x'
pub(crate) fn chain() -> Grammar {
    Grammar::new(
        vec![
            prod("S", vec![nt("A")]),
            prod("A", vec![nt("B")]),
            prod("B", vec![lit("x")]),
        ],
        "S",
    )
}

/// S -> A A; A -> () | 'a'
pub(crate) fn double_nullable() -> Grammar {
    Grammar::new(
        vec![
            prod("S", vec![nt("A"), nt("A")]),
            prod("A", vec![]),
            prod("A", vec![lit("a")]),
        ],
        "S",
    )
}

/// S-expression rendering with the matched text at the leaves.
pub(crate) fn render(tree: &SyntaxTree<NonTerm, Span>, input: &str) -> String {
    match tree {
        SyntaxTree::Leaf(span) => format!("{:?}", span.text(input)),
        SyntaxTree::Node { key, children } if children.is_empty() => format!("({})", key.name()),
        SyntaxTree::Node { key, children } => {
            format!("({} {})", key.name(), children.iter().map(|c| render(c, input)).join(" "))
        }
    }
}

/// Concatenation of the leaf ranges, which must reproduce the input.
pub(crate) fn leaf_text(tree: &SyntaxTree<NonTerm, Span>, input: &str) -> String {
    tree.leaves().iter().map(|span| span.text(input)).collect()
}
