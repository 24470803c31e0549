use serde::{Serialize, Serializer};
use serde_json::{Value, json};

/// One leaf or nested entry in a compiled boolean query.
///
/// `Raw` carries an already-compiled fragment from a custom-DSL filter and is
/// serialized verbatim; `Bool` nests a whole sub-group so `or` blocks and
/// negated compounds keep their own clause scope.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Term { field: String, value: Value },
    Terms { field: String, values: Vec<Value> },
    Match { field: String, query: Value },
    MatchPhrase { field: String, query: Value },
    MultiMatch { query: Value },
    Wildcard { field: String, pattern: String },
    Range {
        field: String,
        gt: Option<Value>,
        gte: Option<Value>,
        lt: Option<Value>,
        lte: Option<Value>,
    },
    Exists { field: String },
    Regexp { field: String, pattern: String },
    Bool(BoolQuery),
    Raw(Value),
}

impl Clause {
    pub fn to_value(&self) -> Value {
        match self {
            Clause::Term { field, value } => json!({ "term": { (field.as_str()): value.clone() } }),
            Clause::Terms { field, values } => {
                json!({ "terms": { (field.as_str()): values.clone() } })
            }
            Clause::Match { field, query } => {
                json!({ "match": { (field.as_str()): query.clone() } })
            }
            Clause::MatchPhrase { field, query } => {
                json!({ "match_phrase": { (field.as_str()): query.clone() } })
            }
            Clause::MultiMatch { query } => {
                json!({ "multi_match": { "query": query.clone(), "lenient": true } })
            }
            Clause::Wildcard { field, pattern } => {
                json!({ "wildcard": { (field.as_str()): pattern.clone() } })
            }
            Clause::Range {
                field,
                gt,
                gte,
                lt,
                lte,
            } => {
                let mut bounds = serde_json::Map::new();
                if let Some(bound) = gt {
                    bounds.insert("gt".to_string(), bound.clone());
                }
                if let Some(bound) = gte {
                    bounds.insert("gte".to_string(), bound.clone());
                }
                if let Some(bound) = lt {
                    bounds.insert("lt".to_string(), bound.clone());
                }
                if let Some(bound) = lte {
                    bounds.insert("lte".to_string(), bound.clone());
                }
                json!({ "range": { (field.as_str()): bounds } })
            }
            Clause::Exists { field } => json!({ "exists": { "field": field } }),
            Clause::Regexp { field, pattern } => {
                json!({ "regexp": { (field.as_str()): pattern.clone() } })
            }
            Clause::Bool(group) => group.to_value(),
            Clause::Raw(value) => value.clone(),
        }
    }
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// The compiled boolean query: four ordered clause groups plus the
/// `minimum_should_match` bound for the `should` group. A value with every
/// group empty means match-all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<Clause>,
    pub must_not: Vec<Clause>,
    pub filter: Vec<Clause>,
    pub should: Vec<Clause>,
    pub minimum_should_match: Option<i64>,
}

impl BoolQuery {
    pub fn is_match_all(&self) -> bool {
        self.must.is_empty()
            && self.must_not.is_empty()
            && self.filter.is_empty()
            && self.should.is_empty()
    }

    pub(crate) fn with_must(clause: Clause) -> Self {
        Self {
            must: vec![clause],
            ..Self::default()
        }
    }

    /// One `should` group; `minimum_should_match` pins disjunction semantics.
    pub(crate) fn should_group(clauses: Vec<Clause>) -> Self {
        Self {
            should: clauses,
            minimum_should_match: Some(1),
            ..Self::default()
        }
    }

    /// Unwraps a group that is exactly one positive clause, handing the group
    /// back otherwise. Parents use this to place a bare clause where nesting
    /// a one-entry `bool` would only add noise.
    pub(crate) fn into_single_must(mut self) -> Result<Clause, Self> {
        if self.must.len() == 1
            && self.must_not.is_empty()
            && self.filter.is_empty()
            && self.should.is_empty()
        {
            Ok(self.must.remove(0))
        } else {
            Err(self)
        }
    }

    /// The `{"bool": {...}}` document body. Empty groups are omitted and
    /// `minimum_should_match` is only written alongside a non-empty `should`.
    pub fn to_value(&self) -> Value {
        let mut body = serde_json::Map::new();
        if !self.must.is_empty() {
            body.insert("must".to_string(), clause_array(&self.must));
        }
        if !self.must_not.is_empty() {
            body.insert("must_not".to_string(), clause_array(&self.must_not));
        }
        if !self.filter.is_empty() {
            body.insert("filter".to_string(), clause_array(&self.filter));
        }
        if !self.should.is_empty() {
            body.insert("should".to_string(), clause_array(&self.should));
            if let Some(bound) = self.minimum_should_match {
                body.insert("minimum_should_match".to_string(), Value::from(bound));
            }
        }
        json!({ "bool": body })
    }
}

impl Serialize for BoolQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn clause_array(clauses: &[Clause]) -> Value {
    Value::Array(clauses.iter().map(Clause::to_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_group_serializes_to_bare_bool() {
        assert_eq!(BoolQuery::default().to_value(), json!({ "bool": {} }));
    }

    #[test]
    fn minimum_should_match_rides_with_should() {
        let group = BoolQuery::should_group(vec![Clause::Exists {
            field: "host".to_string(),
        }]);
        let value = group.to_value();
        assert_eq!(value["bool"]["minimum_should_match"], json!(1));

        let group = BoolQuery::with_must(Clause::Exists {
            field: "host".to_string(),
        });
        assert!(group.to_value()["bool"].get("minimum_should_match").is_none());
    }

    #[test]
    fn range_omits_absent_bounds() {
        let clause = Clause::Range {
            field: "bytes".to_string(),
            gt: None,
            gte: Some(json!(100)),
            lt: Some(json!(200)),
            lte: None,
        };
        assert_eq!(
            clause.to_value(),
            json!({ "range": { "bytes": { "gte": 100, "lt": 200 } } })
        );
    }

    #[test]
    fn raw_clause_passes_through_verbatim() {
        let fragment = json!({ "match": { "foo": "bar" } });
        assert_eq!(Clause::Raw(fragment.clone()).to_value(), fragment);
    }
}
