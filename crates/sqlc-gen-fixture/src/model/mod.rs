//! Entity model builder.
//!
//! Every non-internal table becomes a [`Struct`] whose fields carry the
//! resolved type of their column. Column types come from the first source
//! that answers:
//!
//! 1. a matching override rule
//! 2. the engine transformer, with the custom type catalog behind it
//!
//! Native arrays and sqlc slice parameters then get their array wrapper.

mod entity;
mod field;

pub use entity::Struct;
pub use field::Field;

use tracing::debug;

use crate::catalog::{is_internal_schema, Catalog, Column};
use crate::config::{Options, SqlDriver};
use crate::diagnostics::Diagnostics;
use crate::dialect::{namespace_import, CustomTypeCatalog, TypeTransformer};
use crate::naming::NameNormalizer;
use crate::overrides::OverrideResolver;
use crate::types::TargetType;

/// Resolves the target type of a single column.
pub struct ColumnTypeResolver<'a> {
    overrides: OverrideResolver<'a>,
    transformer: TypeTransformer,
    custom: &'a CustomTypeCatalog,
    driver: SqlDriver,
}

impl<'a> ColumnTypeResolver<'a> {
    pub fn new(options: &'a Options, custom: &'a CustomTypeCatalog) -> Self {
        Self {
            overrides: OverrideResolver::new(
                &options.overrides,
                options.engine,
                &options.default_schema,
            ),
            transformer: TypeTransformer::new(options),
            custom,
            driver: options.driver,
        }
    }

    pub fn resolve(&self, column: &Column, diagnostics: &mut Diagnostics) -> TargetType {
        // Dimensions stack on the element type, which may already be a slice (`[]byte`).
        let target = match self.overrides.try_override(column) {
            Some(target) => target,
            None => {
                let target = self.transformer.resolve(column, self.custom, diagnostics);
                if column.is_array {
                    let depth = target.array_depth() + column.array_dims.max(1);
                    target.with_array_depth(depth)
                } else {
                    target
                }
            }
        };
        let target = target.with_default_ref(|namespace| namespace_import(namespace, self.driver));

        if column.is_sqlc_slice && !column.is_array {
            target.into_slice()
        } else {
            target
        }
    }
}

/// Build the entity models for every table outside the internal schemas,
/// sorted by type name.
///
/// Tables without a primary key are kept; see [`Struct::is_renderable`].
pub fn build_structs(
    catalog: &Catalog,
    options: &Options,
    custom: &CustomTypeCatalog,
    diagnostics: &mut Diagnostics,
) -> Vec<Struct> {
    let normalizer = NameNormalizer::new(options);
    let resolver = ColumnTypeResolver::new(options, custom);
    let mut structs = Vec::new();

    for schema in &catalog.schemas {
        if is_internal_schema(&schema.name) {
            debug!("Skipping internal schema {}", schema.name);
            continue;
        }
        for table in &schema.tables {
            let mut table = table.clone();
            if table.rel.schema.is_empty() {
                table.rel.schema = schema.name.clone();
            }
            for column in table.columns.iter_mut().filter(|c| c.table.is_none()) {
                column.table = Some(table.rel.clone());
            }
            let model = Struct::build(&table, options, &normalizer, &resolver, diagnostics);
            debug!(
                "Table {} -> {} ({} fields, primary key: {})",
                model.full_table_name(),
                model.target(),
                model.fields().len(),
                model.primary_key().map_or("none", |pk| pk.db_name())
            );
            structs.push(model);
        }
    }

    structs.sort_by(|a, b| a.target().base_name().cmp(b.target().base_name()));
    structs
}
