use crate::{
    Arity, BoolQuery, Clause, ClauseShape, FieldType, OperatorDescriptor, OperatorId, descriptor,
    operators_for,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One pinned filter as built by the filter-pill UI and persisted in browse
/// history. The core only ever reads these; toggling and deletion happen in
/// the owning layer. Serde spelling is part of the storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub id: String,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(flatten)]
    pub body: FilterBody,
}

/// Either a catalog-driven field filter or the raw-DSL escape hatch that
/// bypasses the catalog entirely. Keeping the two as distinct variants means
/// every consumer has to handle both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterBody {
    CustomDsl { raw_dsl: Value },
    Field {
        field_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_type: Option<FieldType>,
        operator: OperatorId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<FilterValue>,
    },
}

/// The value slot of a field filter. Which variant is acceptable is decided
/// by the operator's arity at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Range(RangeBounds),
    Many(Vec<Value>),
    One(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
}

/// Compiles the pinned filter list into one clause group.
///
/// Disabled filters are skipped outright: they stay in the caller's stored
/// list but never reach the output. An operator/value mismatch aborts the
/// whole compilation: silently dropping a filter the user configured would
/// produce a wrong query with no visible sign.
pub fn compile_filters(filters: &[FilterClause]) -> Result<BoolQuery> {
    let mut group = BoolQuery::default();
    for filter in filters {
        if filter.disabled {
            continue;
        }
        match &filter.body {
            FilterBody::CustomDsl { raw_dsl } => {
                let clause = Clause::Raw(raw_dsl.clone());
                if filter.negate {
                    group.must_not.push(clause);
                } else {
                    group.must.push(clause);
                }
            }
            FilterBody::Field {
                field_name,
                field_type,
                operator,
                value,
            } => {
                let descriptor = descriptor(*operator);
                if let Some(field_type) = field_type {
                    if !operators_for(*field_type).contains(operator) {
                        bail!(
                            "filter {:?}: operator {:?} does not apply to {:?} fields",
                            filter.id,
                            operator,
                            field_type
                        );
                    }
                }
                let clause = field_clause(field_name, descriptor, value.as_ref())
                    .with_context(|| format!("filter {:?}", filter.id))?;
                // Double negation cancels: a negated toggle on an already
                // negated operator lands back in the positive group.
                if descriptor.negate != filter.negate {
                    group.must_not.push(clause);
                } else {
                    group.filter.push(clause);
                }
            }
        }
    }
    Ok(group)
}

fn field_clause(
    field: &str,
    descriptor: &OperatorDescriptor,
    value: Option<&FilterValue>,
) -> Result<Clause> {
    match descriptor.shape {
        ClauseShape::Exists => Ok(Clause::Exists {
            field: field.to_string(),
        }),
        ClauseShape::Term => Ok(Clause::Term {
            field: field.to_string(),
            value: one_value(descriptor, value)?.clone(),
        }),
        ClauseShape::Match => Ok(Clause::Match {
            field: field.to_string(),
            query: one_value(descriptor, value)?.clone(),
        }),
        ClauseShape::Regexp => {
            let pattern = one_value(descriptor, value)?;
            let Some(pattern) = pattern.as_str() else {
                bail!("operator {:?} expects a string pattern", descriptor.id);
            };
            Ok(Clause::Regexp {
                field: field.to_string(),
                pattern: pattern.to_string(),
            })
        }
        ClauseShape::Terms => {
            let Some(FilterValue::Many(values)) = value else {
                bail!("operator {:?} expects a list of values", descriptor.id);
            };
            if values.is_empty() {
                bail!("operator {:?} expects a non-empty list", descriptor.id);
            }
            Ok(Clause::Terms {
                field: field.to_string(),
                values: values.clone(),
            })
        }
        ClauseShape::Range => range_shaped_clause(field, descriptor, value),
    }
}

fn range_shaped_clause(
    field: &str,
    descriptor: &OperatorDescriptor,
    value: Option<&FilterValue>,
) -> Result<Clause> {
    match descriptor.arity {
        Arity::Range => {
            let Some(FilterValue::Range(bounds)) = value else {
                bail!("operator {:?} expects a from/to pair", descriptor.id);
            };
            let (Some(from), Some(to)) = (&bounds.from, &bounds.to) else {
                bail!("operator {:?} expects both bounds", descriptor.id);
            };
            Ok(Clause::Range {
                field: field.to_string(),
                gt: None,
                gte: Some(from.clone()),
                lt: None,
                lte: Some(to.clone()),
            })
        }
        // greater_than / less_than: one scalar, one open side
        _ => {
            let bound = one_value(descriptor, value)?.clone();
            let (gt, lt) = match descriptor.id {
                OperatorId::GreaterThan => (Some(bound), None),
                _ => (None, Some(bound)),
            };
            Ok(Clause::Range {
                field: field.to_string(),
                gt,
                gte: None,
                lt,
                lte: None,
            })
        }
    }
}

fn one_value<'a>(
    descriptor: &OperatorDescriptor,
    value: Option<&'a FilterValue>,
) -> Result<&'a Value> {
    match value {
        Some(FilterValue::One(value)) => Ok(value),
        _ => bail!("operator {:?} expects a single value", descriptor.id),
    }
}

/// Combines the text-derived group with the pinned-filter group. The
/// positional groups concatenate with text clauses first. `should` groups
/// from the two sources never merge into one scope: each keeps its own
/// `minimum_should_match`, nested as its own `bool` when both sides carry
/// one.
pub fn merge(text: BoolQuery, filters: BoolQuery) -> BoolQuery {
    let mut out = BoolQuery {
        must: text.must,
        must_not: text.must_not,
        filter: text.filter,
        should: Vec::new(),
        minimum_should_match: None,
    };
    out.must.extend(filters.must);
    out.must_not.extend(filters.must_not);
    out.filter.extend(filters.filter);

    let text_should = (!text.should.is_empty()).then_some((text.should, text.minimum_should_match));
    let filter_should =
        (!filters.should.is_empty()).then_some((filters.should, filters.minimum_should_match));
    match (text_should, filter_should) {
        (Some((should, bound)), None) | (None, Some((should, bound))) => {
            out.should = should;
            out.minimum_should_match = bound;
        }
        (Some((text_should, text_bound)), Some((filter_should, filter_bound))) => {
            out.must.push(Clause::Bool(BoolQuery {
                should: text_should,
                minimum_should_match: text_bound,
                ..BoolQuery::default()
            }));
            out.must.push(Clause::Bool(BoolQuery {
                should: filter_should,
                minimum_should_match: filter_bound,
                ..BoolQuery::default()
            }));
        }
        (None, None) => {}
    }
    out
}
