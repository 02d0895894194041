use serde::Serialize;

use crate::catalog::{Identifier, Table};
use crate::config::Options;
use crate::diagnostics::Diagnostics;
use crate::dialect::model_type;
use crate::naming::inflection::singular;
use crate::naming::NameNormalizer;
use crate::types::{ImportSet, TargetType};

use super::field::Field;
use super::ColumnTypeResolver;

/// Per-table entity model.
#[derive(Debug, Clone, Serialize)]
pub struct Struct {
    table: Identifier,
    table_name: String,
    #[serde(rename = "type")]
    target: TargetType,
    fields: Vec<Field>,
    has_primary_key: bool,
    comment: String,
}

impl Struct {
    /// Build the model for `table`. `table.rel` must carry its schema.
    pub(crate) fn build(
        table: &Table,
        options: &Options,
        normalizer: &NameNormalizer<'_>,
        resolver: &ColumnTypeResolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let rel = &table.rel;
        let table_name = normalizer.normalize_sql_name(&rel.schema, &rel.name);

        let struct_name = if options.emit_exact_table_names {
            table_name.clone()
        } else {
            singular(&table_name, &options.inflection_exclude_table_names)
        };
        let target = model_type(
            &options.model_import,
            &normalizer.normalize_type_name(&struct_name),
        );

        let primary_key = options.primary_key_for(rel);
        let fields: Vec<Field> = table
            .columns
            .iter()
            .map(|column| {
                Field::new(
                    normalizer.normalize_type_name(&column.name),
                    column,
                    resolver.resolve(column, diagnostics),
                    column.name == primary_key,
                )
            })
            .collect();

        Self {
            table: rel.clone(),
            table_name,
            target,
            has_primary_key: fields.iter().any(Field::is_primary_key),
            fields,
            comment: table.comment.clone(),
        }
    }

    /// The entity type (`User`, `models.User`).
    pub fn target(&self) -> &TargetType {
        &self.target
    }

    pub fn table(&self) -> &Identifier {
        &self.table
    }

    /// Schema-qualified table name for SQL (`public.users`).
    pub fn full_table_name(&self) -> String {
        self.table.qualified_name()
    }

    /// Table name with non-default schemas folded in (`audit_users`).
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn has_primary_key(&self) -> bool {
        self.has_primary_key
    }

    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.is_primary_key())
    }

    /// Structs without a primary key are skipped by the renderer.
    pub fn is_renderable(&self) -> bool {
        self.has_primary_key
    }

    /// Add the imports a fixture for this struct needs: the entity type and
    /// the primary key type.
    pub fn imports(&self, base: &ImportSet) -> ImportSet {
        let set = base.with_type(&self.target);
        match self.primary_key() {
            Some(pk) => set.with_type(pk.target()),
            None => set,
        }
    }
}
