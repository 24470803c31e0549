//! Dragnet turns what a user types into a log-search bar (free text plus a
//! list of pinned filter pills) into a single boolean query document for
//! the search backend.
//!
//! The text half goes through [`dragnet-syntax`](dragnet_syntax) for
//! tolerant parsing, then [`compile`] lowers the tree with field-type-aware
//! leaf clauses. The pinned half goes through [`compile_filters`], driven by
//! the operator catalog in [`OPERATORS`]. [`merge`] combines the two, and
//! [`build_query`] is the one-call wrapper over the whole pipeline.
//!
//! Everything here is pure and synchronous; it is meant to run on every
//! keystroke.
//!
//! ```
//! use dragnet::{FieldType, Schema, build_query};
//!
//! let schema = Schema::new().with_field("status", FieldType::Number);
//! let query = build_query("status:200", &[], &schema).unwrap();
//! assert_eq!(query.to_value()["bool"]["must"][0]["term"]["status"], 200);
//! ```

mod clause;
mod filters;
mod operators;
mod query;
mod schema;

pub use clause::*;
pub use filters::*;
pub use operators::*;
pub use query::*;
pub use schema::*;

pub use dragnet_syntax::{Expr, Query, Scalar, Token, TokenKind, parse, tokenize};

use anyhow::Result;

/// Parses the search-bar text, compiles it together with the pinned filter
/// list, and returns the combined boolean query. Free-text problems degrade
/// inside the parser and never surface here; the only error source is a
/// malformed structured filter.
pub fn build_query(input: &str, filters: &[FilterClause], schema: &Schema) -> Result<BoolQuery> {
    let parsed = dragnet_syntax::parse(input);
    let text = compile(&parsed.expr, schema);
    let pinned = compile_filters(filters)?;
    Ok(merge(text, pinned))
}
