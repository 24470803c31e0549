#![allow(dead_code)]
//! Shared helpers for `dragnet-syntax` integration tests.

use dragnet_syntax::*;

pub fn parse_expr(input: &str) -> Expr {
    parse(input).expr
}

pub fn is_match_all(expr: &Expr) -> bool {
    matches!(expr, Expr::MatchAll)
}

pub fn as_and(expr: &Expr) -> &Vec<Expr> {
    match expr {
        Expr::And(parts) => parts,
        other => panic!("expected And, got: {other:?}"),
    }
}

pub fn as_or(expr: &Expr) -> &Vec<Expr> {
    match expr {
        Expr::Or(parts) => parts,
        other => panic!("expected Or, got: {other:?}"),
    }
}

pub fn as_not(expr: &Expr) -> &Expr {
    match expr {
        Expr::Not(inner) => inner,
        other => panic!("expected Not, got: {other:?}"),
    }
}

pub fn literal_is(expr: &Expr, expected: &str) {
    match expr {
        Expr::Literal {
            value: Scalar::Str(text),
        } => assert_eq!(text, expected),
        other => panic!("expected Literal({expected}), got: {other:?}"),
    }
}

pub fn field_is(expr: &Expr, expected_field: &str, expected_value: &Scalar) {
    match expr {
        Expr::FieldIs { field, value, .. } => {
            assert_eq!(field, expected_field);
            assert_eq!(value, expected_value);
        }
        other => panic!("expected FieldIs on {expected_field}, got: {other:?}"),
    }
}

pub fn field_is_phrase(expr: &Expr, expected_field: &str, expected_text: &str) {
    match expr {
        Expr::FieldIs {
            field,
            value: Scalar::Str(text),
            is_phrase: true,
        } => {
            assert_eq!(field, expected_field);
            assert_eq!(text, expected_text);
        }
        other => panic!("expected phrase FieldIs, got: {other:?}"),
    }
}

pub fn field_exists(expr: &Expr, expected_field: &str) {
    match expr {
        Expr::FieldExists { field } => assert_eq!(field, expected_field),
        other => panic!("expected FieldExists, got: {other:?}"),
    }
}

pub fn range_bounds(expr: &Expr) -> (&Option<Scalar>, &Option<Scalar>, bool, bool) {
    match expr {
        Expr::FieldRange {
            from,
            to,
            from_inclusive,
            to_inclusive,
            ..
        } => (from, to, *from_inclusive, *to_inclusive),
        other => panic!("expected FieldRange, got: {other:?}"),
    }
}

pub fn num(value: f64) -> Scalar {
    Scalar::Num(value)
}

pub fn text(value: &str) -> Scalar {
    Scalar::Str(value.to_string())
}
