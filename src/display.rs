use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::grammar::{Grammar, NonTerm, Production, Symbol, Terminal};
use crate::tree::SyntaxTree;
use crate::Span;

/// A grammar that cannot be rendered on the requested surface.
#[derive(Clone, PartialEq, Eq, Error, Debug)]
pub enum ExportError {
    #[error("terminal /{0}/ has no ABNF rendering")]
    RegexTerminal(String),
}

impl fmt::Display for NonTerm {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        write!(w, "<{}>", self.0)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Terminal::Literal(s) => write!(w, "{}", quoted(s)),
            Terminal::CharRange(r) => write!(w, "{:?} ... {:?}", r.low, r.high),
            Terminal::Regex(re) => write!(w, "/{}/", re.pattern()),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(w, "{}", t),
            Symbol::NonTerm(nt) => write!(w, "{}", nt),
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        write!(w, "{} ::= {}", self.lhs, bnf_body(self))
    }
}

/// Renders as BNF; `bnf` and friends give the other surfaces.
impl fmt::Display for Grammar {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        w.write_str(&self.bnf())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        write!(w, "{}..{}", self.start, self.end)
    }
}

impl<K: fmt::Display, L: fmt::Display> fmt::Display for SyntaxTree<K, L> {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyntaxTree::Leaf(l) => write!(w, "{}", l),
            SyntaxTree::Node { key, children } => {
                write!(w, "({}", key)?;
                for c in children {
                    write!(w, " {}", c)?;
                }
                write!(w, ")")
            }
        }
    }
}

impl Grammar {
    /// Backus-Naur rendering, the alternatives of each nonterminal folded
    /// into one rule.
    pub fn bnf(&self) -> String {
        self.grouped()
            .into_iter()
            .map(|(lhs, prods)| {
                let alternatives = prods.into_iter().map(bnf_body).join(" | ");
                format!("<{}> ::= {}", lhs.name(), alternatives)
            })
            .join("\n")
    }

    /// Extended BNF: bare rule names, comma-separated concatenation,
    /// semicolon-terminated rules.
    pub fn ebnf(&self) -> String {
        self.grouped()
            .into_iter()
            .map(|(lhs, prods)| {
                let alternatives = prods
                    .iter()
                    .map(|p| {
                        if p.body().is_empty() {
                            return quoted("");
                        }
                        p.body()
                            .iter()
                            .map(|s| match s {
                                Symbol::NonTerm(nt) => nt.name().to_owned(),
                                Symbol::Terminal(t) => t.to_string(),
                            })
                            .join(", ")
                    })
                    .join(" | ");
                format!("{} = {};", lhs.name(), alternatives)
            })
            .join("\n")
    }

    /// Augmented BNF after RFC 5234, as far as the symbol model allows:
    /// character ranges become `%x` value ranges, and regular-expression
    /// terminals have no ABNF counterpart at all, so rendering refuses
    /// them.
    pub fn abnf(&self) -> Result<String, ExportError> {
        let mut rules = Vec::new();
        for (lhs, prods) in self.grouped() {
            let mut alternatives = Vec::new();
            for p in prods {
                if p.body().is_empty() {
                    alternatives.push(quoted(""));
                    continue;
                }
                let mut parts = Vec::new();
                for s in p.body() {
                    parts.push(match s {
                        Symbol::NonTerm(nt) => nt.name().to_owned(),
                        Symbol::Terminal(Terminal::Literal(s)) => quoted(s),
                        Symbol::Terminal(Terminal::CharRange(r)) => {
                            format!("%x{:X}-{:X}", r.low as u32, r.high as u32)
                        }
                        Symbol::Terminal(Terminal::Regex(re)) => {
                            return Err(ExportError::RegexTerminal(re.pattern().to_owned()))
                        }
                    });
                }
                alternatives.push(parts.join(" "));
            }
            rules.push(format!("{} = {}", lhs.name(), alternatives.join(" / ")));
        }
        Ok(rules.join("\n"))
    }

    /// Productions bucketed by pattern, in first-appearance order.
    fn grouped(&self) -> Vec<(&NonTerm, Vec<&Production>)> {
        let mut order: Vec<&NonTerm> = Vec::new();
        let mut groups: HashMap<&NonTerm, Vec<&Production>> = HashMap::new();
        for p in self.productions() {
            if !groups.contains_key(p.pattern()) {
                order.push(p.pattern());
            }
            groups.entry(p.pattern()).or_default().push(p);
        }
        order.into_iter().map(|lhs| (lhs, groups.remove(lhs).unwrap_or_default())).collect()
    }
}

fn bnf_body(p: &Production) -> String {
    if p.body().is_empty() {
        return quoted("");
    }
    p.body().iter().map(|s| s.to_string()).join(" ")
}

fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
