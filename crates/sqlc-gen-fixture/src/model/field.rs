use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Column;
use crate::naming::param_name;
use crate::types::TargetType;

/// One struct field, created from a catalog column.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    name: String,
    db_name: String,
    #[serde(rename = "type")]
    target: TargetType,
    tags: BTreeMap<String, String>,
    comment: String,
    is_primary_key: bool,
    /// Fields of an embedded struct that need scanning; not expanded here.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embed_fields: Vec<Field>,
    #[serde(skip)]
    column: Column,
}

impl Field {
    pub(crate) fn new(
        name: String,
        column: &Column,
        target: TargetType,
        is_primary_key: bool,
    ) -> Self {
        Self {
            name,
            db_name: column.name.clone(),
            target,
            tags: BTreeMap::new(),
            comment: column.comment.clone(),
            is_primary_key,
            embed_fields: Vec::new(),
            column: column.clone(),
        }
    }

    /// Exported identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column name as used in SQL.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn target(&self) -> &TargetType {
        &self.target
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    pub fn embed_fields(&self) -> &[Field] {
        &self.embed_fields
    }

    /// The catalog column this field was built from.
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Local variable name for this field's value.
    pub fn param_name(&self) -> String {
        param_name(&self.name)
    }
}
