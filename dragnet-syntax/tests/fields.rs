mod common;
use common::*;
use dragnet_syntax::*;

#[test]
fn field_value_pairs_parse() {
    field_is(&parse_expr("host.name:host-1"), "host.name", &text("host-1"));
    field_is(&parse_expr("status:200"), "status", &num(200.0));
    field_is(&parse_expr("up:true"), "up", &Scalar::Bool(true));
}

#[test]
fn quoted_values_are_phrases_and_never_coerce() {
    field_is_phrase(&parse_expr("message:\"broken pipe\""), "message", "broken pipe");
    field_is(&parse_expr("code:\"200\""), "code", &text("200"));
}

#[test]
fn wildcard_value_is_exists() {
    field_exists(&parse_expr("labels.app:*"), "labels.app");
}

#[test]
fn value_group_with_or() {
    let expr = parse_expr("status:(200 or 404 or 500)");
    let parts = as_or(&expr);
    assert_eq!(parts.len(), 3);
    field_is(&parts[0], "status", &num(200.0));
    field_is(&parts[1], "status", &num(404.0));
    field_is(&parts[2], "status", &num(500.0));
}

#[test]
fn value_group_with_and() {
    let expr = parse_expr("tags:(prod and critical)");
    let parts = as_and(&expr);
    field_is(&parts[0], "tags", &text("prod"));
    field_is(&parts[1], "tags", &text("critical"));
}

#[test]
fn value_group_with_negation() {
    let expr = parse_expr("status:(200 or not 500)");
    let parts = as_or(&expr);
    field_is(&parts[0], "status", &num(200.0));
    field_is(as_not(&parts[1]), "status", &num(500.0));
}

#[test]
fn nested_value_groups() {
    let expr = parse_expr("status:((200 or 204) and not 500)");
    let parts = as_and(&expr);
    let options = as_or(&parts[0]);
    assert_eq!(options.len(), 2);
    field_is(as_not(&parts[1]), "status", &num(500.0));
}

#[test]
fn dotted_and_dashed_field_names_survive() {
    field_is(
        &parse_expr("kubernetes.pod-name:api-0"),
        "kubernetes.pod-name",
        &text("api-0"),
    );
}

#[test]
fn wildcard_inside_value_stays_a_string() {
    field_is(&parse_expr("host:web-*"), "host", &text("web-*"));
}

#[test]
fn field_query_mixes_with_free_text() {
    let expr = parse_expr("status:500 timeout");
    let parts = as_and(&expr);
    field_is(&parts[0], "status", &num(500.0));
    literal_is(&parts[1], "timeout");
}
