//! Custom type catalog: target types for user-defined enums and composites.

use serde::Serialize;

use crate::catalog::{is_internal_schema, Catalog, Column};
use crate::config::{Options, SqlDriver};
use crate::naming::NameNormalizer;
use crate::types::{Import, TargetType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomTypeKind {
    Enum,
    Composite,
}

/// One (schema, SQL type, nullability) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomType {
    pub schema: String,
    pub sql_type_name: String,
    pub kind: CustomTypeKind,
    pub nullable: bool,
    pub target: TargetType,
}

/// Custom types derived from the schema catalog.
#[derive(Debug, Clone, Default)]
pub struct CustomTypeCatalog {
    entries: Vec<CustomType>,
    default_schema: String,
}

impl CustomTypeCatalog {
    /// Derive entries from every non-internal schema.
    ///
    /// Enums register `Null<Name>` and `<Name>`, qualified by `model_import`.
    /// Composites are scanned as strings.
    pub fn build(catalog: &Catalog, options: &Options) -> Self {
        let normalizer = NameNormalizer::new(options);
        let mut entries = Vec::new();

        for schema in catalog
            .schemas
            .iter()
            .filter(|schema| !is_internal_schema(&schema.name))
        {
            for enum_type in &schema.enums {
                let base = normalizer.normalize_type_name(
                    &normalizer.normalize_sql_name(&schema.name, &enum_type.name),
                );
                for nullable in [true, false] {
                    let name = if nullable {
                        format!("Null{}", base)
                    } else {
                        base.clone()
                    };
                    entries.push(CustomType {
                        schema: schema.name.clone(),
                        sql_type_name: enum_type.name.clone(),
                        kind: CustomTypeKind::Enum,
                        nullable,
                        target: model_type(&options.model_import, &name),
                    });
                }
            }

            let pointers =
                options.driver == SqlDriver::PgxV5 && options.emit_pointers_for_null_types;
            for composite in &schema.composite_types {
                let null_target = if pointers {
                    TargetType::builtin("string").into_pointer()
                } else {
                    TargetType::qualified("sql", "NullString")
                        .with_external_ref(Import::new("database/sql"))
                };
                for (nullable, target) in
                    [(false, TargetType::builtin("string")), (true, null_target)]
                {
                    entries.push(CustomType {
                        schema: schema.name.clone(),
                        sql_type_name: composite.name.clone(),
                        kind: CustomTypeKind::Composite,
                        nullable,
                        target,
                    });
                }
            }
        }

        Self {
            entries,
            default_schema: options.default_schema.clone(),
        }
    }

    /// Entry for the column's type schema (or the default schema), SQL type
    /// name and nullability.
    pub fn lookup(&self, column: &Column, not_null: bool) -> Option<&CustomType> {
        let schema = if column.type_ref.schema.is_empty() {
            self.default_schema.as_str()
        } else {
            column.type_ref.schema.as_str()
        };
        self.entries.iter().find(|entry| {
            entry.schema == schema
                && entry.sql_type_name == column.type_ref.name
                && entry.nullable == !not_null
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomType> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A generated model type, qualified by `model_import` when it is set.
///
/// `model_import` may be a bare package name (`models`) or a full import
/// path (`example.com/app/models`).
pub fn model_type(model_import: &str, name: &str) -> TargetType {
    if model_import.is_empty() {
        return TargetType::builtin(name);
    }
    format!("{}.{}", model_import, name)
        .parse()
        .unwrap_or_else(|_| TargetType::qualified(model_import, name))
}
