//! Host-supplied generation request: engine settings, schema catalog and
//! the raw options documents.
//!
//! These types mirror the sqlc plugin request. They are read-only to the
//! resolution core and can be loaded from JSON or YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Schemas whose objects are engine internals and never produce models.
pub const INTERNAL_SCHEMAS: [&str; 2] = ["pg_catalog", "information_schema"];

/// Whether `schema` is one of the engine-internal schemas.
pub fn is_internal_schema(schema: &str) -> bool {
    INTERNAL_SCHEMAS.contains(&schema)
}

/// A full generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    pub settings: Settings,
    pub catalog: Catalog,
    /// Per-invocation options: a JSON-encoded string, an inline object, or absent.
    pub plugin_options: serde_json::Value,
    /// Global options of the same encoding; only `overrides` and `rename` apply.
    pub global_options: serde_json::Value,
}

impl Request {
    /// Load a request file. `.yaml`/`.yml` files are parsed as YAML,
    /// everything else as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Parse a request from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a request from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Host settings relevant to type resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Engine identifier: `postgresql`, `mysql` or `sqlite`.
    pub engine: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub name: String,
    pub comment: String,
    pub default_schema: String,
    pub schemas: Vec<Schema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub name: String,
    pub comment: String,
    pub tables: Vec<Table>,
    pub enums: Vec<Enum>,
    pub composite_types: Vec<CompositeType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub rel: Identifier,
    pub columns: Vec<Column>,
    pub comment: String,
}

/// A possibly qualified object name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifier {
    pub catalog: String,
    pub schema: String,
    pub name: String,
}

impl Identifier {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            catalog: String::new(),
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// `schema.name`, or `name` when unqualified.
    pub fn qualified_name(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }
}

/// Column descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub name: String,
    /// Name before any aliasing; preferred for override matching when set.
    pub original_name: String,
    pub not_null: bool,
    pub is_array: bool,
    pub array_dims: u32,
    pub unsigned: bool,
    pub is_sqlc_slice: bool,
    /// Declared display width, e.g. `1` for MySQL `tinyint(1)`.
    pub length: i32,
    pub comment: String,
    pub table: Option<Identifier>,
    #[serde(rename = "type")]
    pub type_ref: Identifier,
}

impl Column {
    /// SQL type name as the host reports it, schema-qualified when the
    /// type carries a schema (`pg_catalog.int4`).
    pub fn data_type(&self) -> String {
        self.type_ref.qualified_name()
    }

    /// Name used for override matching.
    pub fn match_name(&self) -> &str {
        if self.original_name.is_empty() {
            &self.name
        } else {
            &self.original_name
        }
    }

    /// Arrays are treated as not-null at the wrapper level.
    pub fn effective_not_null(&self) -> bool {
        self.not_null || self.is_array
    }

    /// Qualified name of the owning table for diagnostics.
    pub fn table_name(&self) -> String {
        self.table
            .as_ref()
            .map(Identifier::qualified_name)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Enum {
    pub name: String,
    pub vals: Vec<String>,
    pub comment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeType {
    pub name: String,
    pub comment: String,
}
