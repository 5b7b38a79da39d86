use expect_test::expect;

use super::*;

#[test]
fn bnf_groups_alternatives() {
    expect![[r#"<E> ::= <E> "+" <E> | <E> "*" <E> | "a""#]].assert_eq(&arithmetic().bnf());
    expect![[r#"
        <S> ::= <A>
        <A> ::= <B>
        <B> ::= "x""#]]
    .assert_eq(&chain().bnf());
}

#[test]
fn ebnf_rendering() {
    expect![[r#"E = E, "+", E | E, "*", E | "a";"#]].assert_eq(&arithmetic().ebnf());
    expect![[r#"S = "a", S | "";"#]].assert_eq(&nullable_start().ebnf());
}

#[test]
fn abnf_rendering() {
    expect![[r#"E = E "+" E / E "*" E / "a""#]].assert_eq(&arithmetic().abnf().unwrap());

    let g = Grammar::new(vec![prod("W", vec![Symbol::Terminal(Terminal::range('a', 'z'))])], "W");
    expect!["W = %x61-7A"].assert_eq(&g.abnf().unwrap());
}

#[test]
fn abnf_refuses_regex_terminals() {
    let g = Grammar::new(
        vec![prod("N", vec![Symbol::Terminal(Terminal::regex("[0-9]+").unwrap())])],
        "N",
    );
    assert_eq!(g.abnf(), Err(ExportError::RegexTerminal("[0-9]+".into())));
}

#[test]
fn escaped_literals() {
    let g = Grammar::new(vec![prod("S", vec![lit("\"\n")])], "S");
    expect![[r#"<S> ::= "\"\n""#]].assert_eq(&g.bnf());
}

#[test]
fn production_display() {
    expect![[r#"<E> ::= <E> "+" <E>"#]]
        .assert_eq(&prod("E", vec![nt("E"), lit("+"), nt("E")]).to_string());
    expect![[r#"<S> ::= """#]].assert_eq(&prod("S", vec![]).to_string());
}

#[test]
fn tree_display() {
    let tree: SyntaxTree<NonTerm, Span> =
        SyntaxTree::node("S".into(), vec![SyntaxTree::leaf(Span { start: 0, end: 1 })]);
    expect!["(<S> 0..1)"].assert_eq(&tree.to_string());
}

#[test]
fn terminal_display_forms() {
    expect![[r#""a""#]].assert_eq(&Terminal::literal("a").to_string());
    expect!["'a' ... 'z'"].assert_eq(&Terminal::range('a', 'z').to_string());
    expect!["/[0-9]+/"].assert_eq(&Terminal::regex("[0-9]+").unwrap().to_string());
}
