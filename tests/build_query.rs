use dragnet::*;
use serde_json::json;

fn schema() -> Schema {
    Schema::new()
        .with_field("host.name", FieldType::Keyword)
        .with_field("status", FieldType::Number)
        .with_field("message", FieldType::Text)
        .with_field("timestamp", FieldType::Date)
        .with_field("client.ip", FieldType::Ip)
}

#[test]
fn conjunction_operands_land_in_must_in_order() {
    let query = build_query("host.name:a and status:200", &[], &schema()).unwrap();
    assert_eq!(query.must.len(), 2);
    assert!(matches!(&query.must[0], Clause::Term { field, .. } if field == "host.name"));
    assert!(matches!(&query.must[1], Clause::Term { field, .. } if field == "status"));
    assert!(query.must_not.is_empty());
    assert!(query.should.is_empty());
}

#[test]
fn disjunction_is_one_should_group_with_minimum_match() {
    let query = build_query("status:200 or status:500", &[], &schema()).unwrap();
    assert_eq!(query.should.len(), 2);
    assert_eq!(query.minimum_should_match, Some(1));
    assert_eq!(
        query.to_value(),
        json!({
            "bool": {
                "should": [
                    { "term": { "status": 200 } },
                    { "term": { "status": 500 } },
                ],
                "minimum_should_match": 1,
            }
        })
    );
}

#[test]
fn empty_input_compiles_to_match_all() {
    let query = build_query("", &[], &schema()).unwrap();
    assert!(query.is_match_all());
    assert_eq!(query.to_value(), json!({ "bool": {} }));
}

#[test]
fn keyword_scenario_produces_one_term_clause() {
    let query = build_query("host.name:host-1", &[], &schema()).unwrap();
    assert_eq!(
        query.to_value(),
        json!({ "bool": { "must": [{ "term": { "host.name": "host-1" } }] } })
    );
}

#[test]
fn unbalanced_input_still_compiles() {
    let query = build_query("(host.name:a and (status:200", &[], &schema()).unwrap();
    assert_eq!(query.must.len(), 2);
}

#[test]
fn compilation_has_no_hidden_state() {
    let filters = vec![FilterClause {
        id: "f1".to_string(),
        negate: false,
        disabled: false,
        body: FilterBody::Field {
            field_name: "client.ip".to_string(),
            field_type: Some(FieldType::Ip),
            operator: OperatorId::Is,
            value: Some(FilterValue::One(json!("10.0.0.1"))),
        },
    }];
    let first = build_query("message:timeout or status:500", &filters, &schema()).unwrap();
    let second = build_query("message:timeout or status:500", &filters, &schema()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_value(), second.to_value());
}

#[test]
fn text_clauses_come_before_filter_clauses() {
    let filters = vec![FilterClause {
        id: "f1".to_string(),
        negate: true,
        disabled: false,
        body: FilterBody::Field {
            field_name: "status".to_string(),
            field_type: Some(FieldType::Number),
            operator: OperatorId::Is,
            value: Some(FilterValue::One(json!(404))),
        },
    }];
    let query = build_query("not message:probe", &filters, &schema()).unwrap();
    // text-derived negation first, then the filter's
    assert_eq!(query.must_not.len(), 2);
    assert!(matches!(&query.must_not[0], Clause::Match { field, .. } if field == "message"));
    assert!(matches!(&query.must_not[1], Clause::Term { field, .. } if field == "status"));
}

#[test]
fn independent_should_scopes_stay_separate() {
    // the pinned side has no catalog path to a should group, so build one
    // by hand and merge directly
    let text = compile(&parse("status:200 or status:500").expr, &schema());
    let pinned = BoolQuery {
        should: vec![Clause::Exists {
            field: "labels.app".to_string(),
        }],
        minimum_should_match: Some(1),
        ..BoolQuery::default()
    };
    let merged = merge(text, pinned);
    assert!(merged.should.is_empty());
    assert_eq!(merged.must.len(), 2);
    assert!(matches!(merged.must[0], Clause::Bool(_)));
    assert!(matches!(merged.must[1], Clause::Bool(_)));
}

#[test]
fn whole_document_shape_for_a_mixed_query() {
    let filters = vec![FilterClause {
        id: "pinned-env".to_string(),
        negate: false,
        disabled: false,
        body: FilterBody::Field {
            field_name: "env".to_string(),
            field_type: Some(FieldType::Keyword),
            operator: OperatorId::Is,
            value: Some(FilterValue::One(json!("prod"))),
        },
    }];
    let query = build_query(
        "message:\"broken pipe\" and not host.name:canary",
        &filters,
        &schema(),
    )
    .unwrap();
    assert_eq!(
        query.to_value(),
        json!({
            "bool": {
                "must": [
                    { "match_phrase": { "message": "broken pipe" } },
                ],
                "must_not": [
                    { "term": { "host.name": "canary" } },
                ],
                "filter": [
                    { "term": { "env": "prod" } },
                ],
            }
        })
    );
}
