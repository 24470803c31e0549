use crate::{Clause, FieldType};
use serde::{Deserialize, Serialize};

/// Operator identifiers the structured-filter builder can produce. These are
/// the names persisted inside serialized [`crate::FilterClause`] records, so
/// the serde spelling is part of the storage format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorId {
    Is,
    IsNot,
    IsOneOf,
    IsNotOneOf,
    Contains,
    DoesNotContain,
    Matches,
    DoesNotMatch,
    GreaterThan,
    LessThan,
    Between,
    NotBetween,
    Exists,
    NotExists,
}

/// How many values an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No value at all; any supplied value is ignored.
    Zero,
    /// Exactly one scalar.
    One,
    /// A non-empty list.
    Many,
    /// A from/to pair.
    Range,
}

/// The clause shape an operator lowers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseShape {
    Term,
    Terms,
    Match,
    Range,
    Exists,
    Regexp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDescriptor {
    pub id: OperatorId,
    pub negate: bool,
    pub arity: Arity,
    pub shape: ClauseShape,
}

const fn entry(id: OperatorId, negate: bool, arity: Arity, shape: ClauseShape) -> OperatorDescriptor {
    OperatorDescriptor {
        id,
        negate,
        arity,
        shape,
    }
}

/// The full catalog. Canonical operators for each shape come first so the
/// reverse lookup resolves to them; the single-bound range operators sit
/// after `between`/`not_between` on purpose.
pub const OPERATORS: &[OperatorDescriptor] = &[
    entry(OperatorId::Is, false, Arity::One, ClauseShape::Term),
    entry(OperatorId::IsNot, true, Arity::One, ClauseShape::Term),
    entry(OperatorId::IsOneOf, false, Arity::Many, ClauseShape::Terms),
    entry(OperatorId::IsNotOneOf, true, Arity::Many, ClauseShape::Terms),
    entry(OperatorId::Contains, false, Arity::One, ClauseShape::Match),
    entry(OperatorId::DoesNotContain, true, Arity::One, ClauseShape::Match),
    entry(OperatorId::Matches, false, Arity::One, ClauseShape::Regexp),
    entry(OperatorId::DoesNotMatch, true, Arity::One, ClauseShape::Regexp),
    entry(OperatorId::Between, false, Arity::Range, ClauseShape::Range),
    entry(OperatorId::NotBetween, true, Arity::Range, ClauseShape::Range),
    entry(OperatorId::GreaterThan, false, Arity::One, ClauseShape::Range),
    entry(OperatorId::LessThan, false, Arity::One, ClauseShape::Range),
    entry(OperatorId::Exists, false, Arity::Zero, ClauseShape::Exists),
    entry(OperatorId::NotExists, true, Arity::Zero, ClauseShape::Exists),
];

pub fn descriptor(id: OperatorId) -> &'static OperatorDescriptor {
    OPERATORS
        .iter()
        .find(|descriptor| descriptor.id == id)
        .expect("every operator id has a catalog entry")
}

/// Operators the filter builder may offer for a field of the given type.
pub fn operators_for(field_type: FieldType) -> Vec<OperatorId> {
    let text_like = [
        OperatorId::Is,
        OperatorId::IsNot,
        OperatorId::IsOneOf,
        OperatorId::IsNotOneOf,
        OperatorId::Contains,
        OperatorId::DoesNotContain,
        OperatorId::Matches,
        OperatorId::DoesNotMatch,
        OperatorId::Exists,
        OperatorId::NotExists,
    ];
    let ordered = [
        OperatorId::Is,
        OperatorId::IsNot,
        OperatorId::IsOneOf,
        OperatorId::IsNotOneOf,
        OperatorId::GreaterThan,
        OperatorId::LessThan,
        OperatorId::Between,
        OperatorId::NotBetween,
        OperatorId::Exists,
        OperatorId::NotExists,
    ];
    let boolean = [
        OperatorId::Is,
        OperatorId::IsNot,
        OperatorId::Exists,
        OperatorId::NotExists,
    ];
    match field_type {
        FieldType::Keyword | FieldType::Text => text_like.to_vec(),
        FieldType::Number | FieldType::Date | FieldType::Ip => ordered.to_vec(),
        FieldType::Boolean => boolean.to_vec(),
    }
}

/// Reverse lookup for the edit-filter flow: which operator produced a clause
/// of this shape. Single-bound ranges resolve to the canonical
/// `between`/`not_between` pair; a stored range still edits as a range.
pub fn operator_for_shape(shape: ClauseShape, negate: bool) -> Option<OperatorId> {
    OPERATORS
        .iter()
        .find(|descriptor| descriptor.shape == shape && descriptor.negate == negate)
        .map(|descriptor| descriptor.id)
}

/// Reverse lookup straight from a stored compiled clause. `None` is the
/// unsupported sentinel: the clause did not come from the catalog (custom
/// DSL, nested groups, phrase or wildcard shapes) and cannot be edited as a
/// structured filter.
pub fn operator_for_clause(clause: &Clause, negate: bool) -> Option<OperatorId> {
    let shape = match clause {
        Clause::Term { .. } => ClauseShape::Term,
        Clause::Terms { .. } => ClauseShape::Terms,
        Clause::Match { .. } => ClauseShape::Match,
        Clause::Range { .. } => ClauseShape::Range,
        Clause::Exists { .. } => ClauseShape::Exists,
        Clause::Regexp { .. } => ClauseShape::Regexp,
        Clause::MatchPhrase { .. }
        | Clause::MultiMatch { .. }
        | Clause::Wildcard { .. }
        | Clause::Bool(_)
        | Clause::Raw(_) => return None,
    };
    operator_for_shape(shape, negate)
}
