use std::collections::HashSet;

use crate::normalize::nullable_nonterms;

use super::*;

#[test]
fn cnf_invariant() {
    for g in [arithmetic(), nullable_start(), chain(), double_nullable()] {
        let n = g.chomsky_normalized();
        assert!(n.is_in_chomsky_normal_form(), "not in normal form:\n{}", n.bnf());
    }
}

#[test]
fn normalization_is_idempotent() {
    for g in [arithmetic(), nullable_start(), chain(), double_nullable()] {
        let once = g.chomsky_normalized();
        let twice = once.chomsky_normalized();
        assert!(twice.is_in_chomsky_normal_form());
        assert_eq!(once.utility_nonterms(), twice.utility_nonterms());
        assert_eq!(
            once.productions().iter().collect::<HashSet<_>>(),
            twice.productions().iter().collect::<HashSet<_>>(),
        );
    }
}

#[test]
fn mixed_bodies_hoist_terminals() {
    let n = arithmetic().chomsky_normalized();
    for p in n.productions() {
        if p.is_final() {
            assert_eq!(p.body().len(), 1, "mixed body survived: {p}");
        }
    }
    assert!(!n.utility_nonterms().is_empty());
}

#[test]
fn chain_runs_are_recorded() {
    let n = chain().chomsky_normalized();
    assert!(n.productions().iter().all(|p| !p.is_chain()));
    let start_prod = n.productions().iter().find(|p| p.pattern() == n.start()).unwrap();
    assert_eq!(start_prod.body(), vec![lit("x")]);
    assert_eq!(start_prod.chain, vec![NonTerm::from("A"), NonTerm::from("B")]);
    assert!(n.utility_nonterms().is_empty());
}

#[test]
fn nullable_start_gets_fresh_start() {
    let g = nullable_start();
    let n = g.chomsky_normalized();
    // the original start is nullable and occurs on a right-hand side, so a
    // fresh start takes over and keeps the sole epsilon production
    assert_ne!(n.start(), g.start());
    assert!(n.utility_nonterms().contains(n.start()));
    for p in n.productions() {
        if p.body().is_empty() {
            assert_eq!(p.pattern(), n.start());
        }
    }
}

#[test]
fn nullable_set_closes_over_chains() {
    let g = Grammar::new(
        vec![
            prod("S", vec![nt("A"), nt("B")]),
            prod("A", vec![]),
            prod("B", vec![nt("A")]),
        ],
        "S",
    );
    let nullable = nullable_nonterms(g.productions());
    assert!(nullable.contains(&NonTerm::from("S")));
    assert!(nullable.contains(&NonTerm::from("A")));
    assert!(nullable.contains(&NonTerm::from("B")));
}

#[test]
fn empty_terminals_behave_like_epsilon() {
    let g = Grammar::new(vec![prod("S", vec![lit("")])], "S");
    let n = g.chomsky_normalized();
    assert!(n.is_in_chomsky_normal_form());
    assert!(n.productions().iter().any(|p| p.body().is_empty() && p.pattern() == n.start()));
}

#[test]
fn fresh_names_avoid_user_names() {
    // the user already owns the name the generator would try first
    let g = Grammar::new(
        vec![
            prod("E", vec![nt("E~0"), lit("+"), nt("E~0")]),
            prod("E~0", vec![lit("a")]),
        ],
        "E",
    );
    let n = g.chomsky_normalized();
    assert!(n.is_in_chomsky_normal_form());
    for invented in n.utility_nonterms() {
        assert_ne!(invented.name(), "E~0");
    }
}

#[test]
fn long_bodies_cascade() {
    let g = Grammar::new(
        vec![
            prod("S", vec![nt("A"), nt("B"), nt("C"), nt("D")]),
            prod("A", vec![lit("a")]),
            prod("B", vec![lit("b")]),
            prod("C", vec![lit("c")]),
            prod("D", vec![lit("d")]),
        ],
        "S",
    );
    let n = g.chomsky_normalized();
    assert!(n.is_in_chomsky_normal_form());
    // two links for a body of four symbols
    assert_eq!(n.utility_nonterms().len(), 2);
}
