use expect_test::expect;

use super::*;

#[test]
fn terminal_tags_are_stable() {
    expect![[r#"{"string":"ab"}"#]]
        .assert_eq(&serde_json::to_string(&Terminal::literal("ab")).unwrap());
    expect![[r#"{"characterRange":{"lowerBound":"a","upperBound":"z"}}"#]]
        .assert_eq(&serde_json::to_string(&Terminal::range('a', 'z')).unwrap());
    expect![[r#"{"regularExpression":"[0-9]+"}"#]]
        .assert_eq(&serde_json::to_string(&Terminal::regex("[0-9]+").unwrap()).unwrap());
}

#[test]
fn terminal_round_trip() {
    let terminals =
        [Terminal::literal("ab"), Terminal::range('0', '9'), Terminal::regex("a|b").unwrap()];
    for t in terminals {
        let json = serde_json::to_string(&t).unwrap();
        let back: Terminal = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}

#[test]
fn malformed_range_bounds_fail() {
    let too_long = r#"{"characterRange":{"lowerBound":"ab","upperBound":"z"}}"#;
    assert!(serde_json::from_str::<Terminal>(too_long).is_err());
    let empty = r#"{"characterRange":{"lowerBound":"","upperBound":"z"}}"#;
    assert!(serde_json::from_str::<Terminal>(empty).is_err());
}

#[test]
fn invalid_regex_fails_deserialization() {
    assert!(serde_json::from_str::<Terminal>(r#"{"regularExpression":"("}"#).is_err());
}

#[test]
fn production_serialization_shape() {
    let p = prod("E", vec![nt("E"), lit("+")]);
    expect![[r#"{"pattern":"E","body":[{"nonTerminal":"E"},{"terminal":{"string":"+"}}]}"#]]
        .assert_eq(&serde_json::to_string(&p).unwrap());
}

#[test]
fn grammar_round_trip_keeps_normalization_metadata() {
    let g = nullable_start().chomsky_normalized();
    let json = serde_json::to_string(&g).unwrap();
    let back: Grammar = serde_json::from_str(&json).unwrap();
    assert_eq!(g, back);
    assert!(json.contains("utilityNonTerminals"));
    assert!(json.contains("nonTerminalChain"));
}

#[test]
fn plain_grammar_omits_empty_metadata() {
    let json = serde_json::to_string(&arithmetic()).unwrap();
    assert!(!json.contains("utilityNonTerminals"));
    assert!(!json.contains("nonTerminalChain"));
    let back: Grammar = serde_json::from_str(&json).unwrap();
    assert_eq!(back, arithmetic());
}
