use crate::{BoolQuery, Clause, FieldType, Schema};
use dragnet_syntax::{Expr, Scalar};
use tracing::debug;

/// Lowers a parsed expression tree into a boolean query group. Pure and
/// total: every node kind has exactly one lowering and unknown fields
/// degrade to full-text handling instead of failing.
pub fn compile(expr: &Expr, schema: &Schema) -> BoolQuery {
    match expr {
        Expr::MatchAll => BoolQuery::default(),
        Expr::Literal { value } => free_text_group(value, schema),
        Expr::FieldIs {
            field,
            value,
            is_phrase,
        } => BoolQuery::with_must(field_is_clause(field, value, *is_phrase, schema)),
        Expr::FieldRange {
            field,
            from,
            to,
            from_inclusive,
            to_inclusive,
        } => BoolQuery::with_must(range_clause(field, from, to, *from_inclusive, *to_inclusive)),
        Expr::FieldExists { field } => BoolQuery::with_must(Clause::Exists {
            field: field.clone(),
        }),
        Expr::And(parts) => conjunction(parts, schema),
        Expr::Or(parts) => BoolQuery::should_group(subquery_clauses(parts, schema)),
        // Negation wraps: a single positive clause moves into must_not as
        // itself, anything compound goes in whole. Negation is never
        // distributed over the children.
        Expr::Not(inner) => BoolQuery {
            must_not: vec![subquery_clause(inner, schema)],
            ..BoolQuery::default()
        },
    }
}

/// Positive operands land in `must` in source order; operands that compile
/// to pure negations hoist their entries into the conjunction's own
/// `must_not` instead of nesting a one-entry `bool`.
fn conjunction(parts: &[Expr], schema: &Schema) -> BoolQuery {
    let mut group = BoolQuery::default();
    for part in parts {
        if matches!(part, Expr::MatchAll) {
            continue;
        }
        let sub = compile(part, schema);
        if sub.must.is_empty() && sub.filter.is_empty() && sub.should.is_empty() {
            group.must_not.extend(sub.must_not);
        } else {
            match sub.into_single_must() {
                Ok(clause) => group.must.push(clause),
                Err(sub) => group.must.push(Clause::Bool(sub)),
            }
        }
    }
    group
}

fn subquery_clauses(parts: &[Expr], schema: &Schema) -> Vec<Clause> {
    parts
        .iter()
        .filter(|part| !matches!(part, Expr::MatchAll))
        .map(|part| subquery_clause(part, schema))
        .collect()
}

fn subquery_clause(expr: &Expr, schema: &Schema) -> Clause {
    match compile(expr, schema).into_single_must() {
        Ok(clause) => clause,
        Err(group) => Clause::Bool(group),
    }
}

/// A bare term has no declared field, so it fans out over every
/// full-text-eligible field as one `should` group. Without any such field in
/// the schema the group holds a single field-less `multi_match`.
fn free_text_group(value: &Scalar, schema: &Schema) -> BoolQuery {
    let query = scalar_value(value);
    let fields = schema.full_text_fields();
    if fields.is_empty() {
        return BoolQuery::should_group(vec![Clause::MultiMatch { query }]);
    }
    BoolQuery::should_group(
        fields
            .into_iter()
            .map(|field| Clause::Match {
                field: field.to_string(),
                query: query.clone(),
            })
            .collect(),
    )
}

fn field_is_clause(field: &str, value: &Scalar, is_phrase: bool, schema: &Schema) -> Clause {
    let query = scalar_value(value);
    if is_phrase {
        return Clause::MatchPhrase {
            field: field.to_string(),
            query,
        };
    }
    if let Some(pattern) = value.as_str() {
        if pattern.contains('*') {
            return Clause::Wildcard {
                field: field.to_string(),
                pattern: pattern.to_string(),
            };
        }
    }
    match schema.resolve(field) {
        Some(
            FieldType::Keyword | FieldType::Boolean | FieldType::Number | FieldType::Ip
            | FieldType::Date,
        ) => Clause::Term {
            field: field.to_string(),
            value: query,
        },
        Some(FieldType::Text) => Clause::Match {
            field: field.to_string(),
            query,
        },
        None => {
            debug!(field, "unknown field type, matching as full text");
            Clause::Match {
                field: field.to_string(),
                query,
            }
        }
    }
}

/// Bound literals pass through untouched; for date fields in particular the
/// caller supplies already-normalized epoch millis or date-math strings.
fn range_clause(
    field: &str,
    from: &Option<Scalar>,
    to: &Option<Scalar>,
    from_inclusive: bool,
    to_inclusive: bool,
) -> Clause {
    let mut gt = None;
    let mut gte = None;
    let mut lt = None;
    let mut lte = None;
    if let Some(bound) = from {
        if from_inclusive {
            gte = Some(scalar_value(bound));
        } else {
            gt = Some(scalar_value(bound));
        }
    }
    if let Some(bound) = to {
        if to_inclusive {
            lte = Some(scalar_value(bound));
        } else {
            lt = Some(scalar_value(bound));
        }
    }
    Clause::Range {
        field: field.to_string(),
        gt,
        gte,
        lt,
        lte,
    }
}

/// Whole numbers serialize as integers so `status:200` compiles to `200`,
/// not `200.0`.
fn scalar_value(value: &Scalar) -> serde_json::Value {
    match value {
        Scalar::Str(text) => serde_json::Value::String(text.clone()),
        Scalar::Bool(flag) => serde_json::Value::Bool(*flag),
        Scalar::Num(number) => {
            if number.fract() == 0.0 && *number >= i64::MIN as f64 && *number <= i64::MAX as f64 {
                serde_json::Value::from(*number as i64)
            } else {
                serde_json::Value::from(*number)
            }
        }
    }
}
