use super::*;

#[test]
fn production_predicates() {
    assert!(prod("A", vec![lit("x")]).is_final());
    assert!(prod("A", vec![nt("B"), lit("x")]).is_final());
    assert!(!prod("A", vec![nt("B"), nt("C")]).is_final());

    assert!(prod("A", vec![nt("B")]).is_chain());
    assert!(!prod("A", vec![nt("B"), nt("C")]).is_chain());
    assert!(!prod("A", vec![lit("x")]).is_chain());
    assert!(!prod("A", vec![]).is_chain());
}

#[test]
fn terminal_emptiness() {
    assert!(Terminal::literal("").is_empty());
    assert!(!Terminal::literal("a").is_empty());
    assert!(!Terminal::range('a', 'z').is_empty());
    assert!(Terminal::regex("").unwrap().is_empty());
    assert!(!Terminal::regex("a+").unwrap().is_empty());
}

#[test]
fn terminal_identity_is_content() {
    assert_eq!(Terminal::regex("[a-z]").unwrap(), Terminal::regex("[a-z]").unwrap());
    assert_ne!(Terminal::regex("[a-z]").unwrap(), Terminal::regex("[a-z]+").unwrap());
    assert_eq!(Terminal::range('a', 'z'), Terminal::range('a', 'z'));
    assert_ne!(Terminal::literal("a"), Terminal::range('a', 'a'));
}

#[test]
fn character_range_contains() {
    let r = CharacterRange::new('a', 'z');
    assert!(r.contains('a') && r.contains('m') && r.contains('z'));
    assert!(!r.contains('A'));
}

#[test]
fn prefix_matching() {
    assert_eq!(Terminal::literal("ab").match_len("abc"), Some(2));
    assert_eq!(Terminal::literal("ab").match_len("ba"), None);
    assert_eq!(Terminal::range('0', '9').match_len("42"), Some(1));
    assert_eq!(Terminal::regex("a+b").unwrap().match_len("aaab!"), Some(4));
    assert_eq!(Terminal::regex("a+b").unwrap().match_len("bb"), None);
}

#[test]
fn chomsky_normal_form_predicate() {
    let cnf = Grammar::new(
        vec![
            prod("S", vec![nt("A"), nt("B")]),
            prod("A", vec![lit("a")]),
            prod("B", vec![lit("b")]),
            prod("S", vec![]),
        ],
        "S",
    );
    assert!(cnf.is_in_chomsky_normal_form());

    let mixed = Grammar::new(vec![prod("S", vec![lit("a"), nt("S")])], "S");
    assert!(!mixed.is_in_chomsky_normal_form());

    let epsilon_elsewhere =
        Grammar::new(vec![prod("S", vec![nt("A"), nt("A")]), prod("A", vec![])], "S");
    assert!(!epsilon_elsewhere.is_in_chomsky_normal_form());

    let chained = Grammar::new(vec![prod("S", vec![nt("A")]), prod("A", vec![lit("x")])], "S");
    assert!(!chained.is_in_chomsky_normal_form());
}

#[test]
fn grammar_symbol_accessors() {
    let g = arithmetic();
    assert_eq!(g.nonterms().len(), 1);
    assert_eq!(g.terminals().len(), 3);
    assert_eq!(g.start(), &NonTerm::from("E"));
}
