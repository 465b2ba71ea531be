//! Canonical text rendering compiles back to the same tree

use jsonpath_compiler::{ExpressionNode as E, compile};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("$")]
#[case("$.store.book[0].title")]
#[case("$..author")]
#[case("a|b.c")]
#[case("(a|b).c")]
#[case("a.(b.c)")]
#[case("a.b where c.d")]
#[case("(a where b).c")]
#[case("a&b|c&d")]
#[case("a..(b..c)")]
#[case("x[1:]")]
#[case("x[:5:-1]")]
#[case("x[*]")]
#[case("$.*")]
#[case("`this`.a | `parent`")]
#[case("$['first name','last-name','where']")]
#[case("[0]")]
#[case("'it\\'s'.x")]
fn display_compiles_back(#[case] input: &str) {
    let ast = compile(input).unwrap();
    let rendered = ast.to_string();
    assert_eq!(compile(&rendered).unwrap(), ast, "rendered as {rendered:?}");
}

#[rstest]
#[case("$.a", "$.a")]
#[case("a . b", "a.b")]
#[case("((a))", "a")]
#[case("a[0]", "a[0]")]
#[case("a.[0]", "a[0]")]
#[case("a where b", "a where b")]
#[case("this", "`this`")]
#[case("[:]", "[*]")]
#[case("\"x y\"", "'x y'")]
#[case("a..b|c", "a..b|c")]
#[case("(a..b)|c", "(a..b)|c")]
fn canonical_text(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(compile(input).unwrap().to_string(), expected);
}

#[test]
fn hand_built_trees_round_trip() {
    let trees = [
        E::child(E::Root, E::child(E::field("a"), E::field("b"))),
        E::union(E::field("a"), E::union(E::field("b"), E::field("c"))),
        E::filter(E::field("a"), E::filter(E::field("b"), E::field("c"))),
        E::child(E::descendants(E::Root, E::field("a")), E::index(-2)),
        E::intersect(E::index(0), E::slice(None, Some(4), None)),
        E::child(E::field("a"), E::child(E::index(0), E::field("b"))),
    ];

    for tree in trees {
        let rendered = tree.to_string();
        assert_eq!(compile(&rendered).unwrap(), tree, "rendered as {rendered:?}");
    }
}
