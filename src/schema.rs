use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Backend-facing type of a field, as reported by the field-capabilities
/// provider. Unknown fields resolve to `None` and the compiler degrades to
/// full-text handling for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Keyword,
    Text,
    Number,
    Date,
    Boolean,
    Ip,
}

/// The field catalog injected into compilation. Plays the role of the
/// field-capabilities provider: a plain name-to-type map, typically built
/// once per index pattern and shared across keystrokes.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: HashMap<String, FieldType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field_type: FieldType) {
        self.fields.insert(name.into(), field_type);
    }

    pub fn resolve(&self, field: &str) -> Option<FieldType> {
        self.fields.get(field).copied()
    }

    /// Every full-text-eligible field, sorted so compiled output is stable
    /// across runs regardless of map iteration order.
    pub fn full_text_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fields
            .iter()
            .filter(|(_, field_type)| **field_type == FieldType::Text)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}
