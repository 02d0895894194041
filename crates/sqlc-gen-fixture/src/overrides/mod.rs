//! User-declared type overrides.
//!
//! An override either targets columns by `[catalog.][schema.]table.column`
//! pattern or targets every column of a SQL type with a given nullability
//! and signedness. Overrides run before any engine transformer.

mod pattern;

pub use pattern::Pattern;

use tracing::debug;

use crate::catalog::{Column, Identifier};
use crate::config::{Engine, GoTypeDetail, GoTypeSpec, OverrideSpec};
use crate::dialect::normalize_sql_type;
use crate::error::{GenError, Result};
use crate::types::{namespace_for_path, Import, TargetType};

/// A parsed override rule.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    kind: RuleKind,
    target: TargetType,
}

#[derive(Debug, Clone)]
enum RuleKind {
    Column {
        table: TableMatcher,
        column: Pattern,
    },
    DbType {
        /// Engine-normalized SQL type name.
        db_type: String,
        nullable: bool,
        unsigned: bool,
    },
}

#[derive(Debug, Clone)]
struct TableMatcher {
    catalog: Option<Pattern>,
    schema: Pattern,
    rel: Pattern,
}

impl TableMatcher {
    fn matches(&self, table: &Identifier, default_schema: &str) -> bool {
        let schema = if table.schema.is_empty() {
            default_schema
        } else {
            table.schema.as_str()
        };
        self.catalog
            .as_ref()
            .map_or(true, |catalog| catalog.is_match(&table.catalog))
            && self.schema.is_match(schema)
            && self.rel.is_match(&table.name)
    }
}

impl OverrideRule {
    /// Parse an options-document entry.
    ///
    /// Exactly one of `column` and `db_type` must be set. A two-part column
    /// specifier is bound to `default_schema`.
    pub fn parse(spec: &OverrideSpec, engine: Engine, default_schema: &str) -> Result<Self> {
        let kind = match (spec.column.is_empty(), spec.db_type.is_empty()) {
            (false, false) => {
                return Err(GenError::config(format!(
                    "override for column '{}' must not also set db_type '{}'",
                    spec.column, spec.db_type
                )))
            }
            (true, true) => {
                return Err(GenError::config(
                    "override must specify either column or db_type",
                ))
            }
            (false, true) => parse_column_spec(&spec.column, default_schema)?,
            (true, false) => RuleKind::DbType {
                db_type: normalize_sql_type(engine, &spec.db_type),
                nullable: spec.nullable,
                unsigned: spec.unsigned,
            },
        };

        Ok(Self {
            kind,
            target: parse_go_type(&spec.go_type)?,
        })
    }

    /// The type this rule forces.
    pub fn target(&self) -> &TargetType {
        &self.target
    }

    pub fn is_column_rule(&self) -> bool {
        matches!(self.kind, RuleKind::Column { .. })
    }

    /// Whether the rule applies to `column`, whose engine-normalized SQL
    /// type name is `data_type`.
    pub fn matches(&self, column: &Column, data_type: &str, default_schema: &str) -> bool {
        match &self.kind {
            RuleKind::Column {
                table,
                column: pattern,
            } => {
                pattern.is_match(column.match_name())
                    && column
                        .table
                        .as_ref()
                        .is_some_and(|t| table.matches(t, default_schema))
            }
            RuleKind::DbType {
                db_type,
                nullable,
                unsigned,
            } => {
                db_type == data_type
                    && *nullable != column.effective_not_null()
                    && *unsigned == column.unsigned
            }
        }
    }
}

fn parse_column_spec(spec: &str, default_schema: &str) -> Result<RuleKind> {
    let parts: Vec<&str> = spec.split('.').collect();
    let (catalog, schema, rel, column) = match parts.as_slice() {
        [table, column] => (None, default_schema, *table, *column),
        [schema, table, column] => (None, *schema, *table, *column),
        [catalog, schema, table, column] => (Some(*catalog), *schema, *table, *column),
        _ => {
            return Err(GenError::config(format!(
                "override column '{}' must be table.column, schema.table.column \
                 or catalog.schema.table.column",
                spec
            )))
        }
    };

    Ok(RuleKind::Column {
        table: TableMatcher {
            catalog: catalog.map(Pattern::compile).transpose()?,
            schema: Pattern::compile(schema)?,
            rel: Pattern::compile(rel)?,
        },
        column: Pattern::compile(column)?,
    })
}

/// Build the forced type of an override. Explicit imports are attached
/// verbatim; namespaces without one are left for the import table.
fn parse_go_type(spec: &GoTypeSpec) -> Result<TargetType> {
    match spec {
        GoTypeSpec::Name(name) if name.trim().is_empty() => {
            Err(GenError::config("override go_type is required"))
        }
        GoTypeSpec::Name(name) => name.parse(),
        GoTypeSpec::Detailed(detail) => parse_go_type_detail(detail),
    }
}

fn parse_go_type_detail(detail: &GoTypeDetail) -> Result<TargetType> {
    if detail.type_name.is_empty() {
        return Err(GenError::config("override go_type.type is required"));
    }
    if detail.import.is_empty() && !detail.package.is_empty() {
        return Err(GenError::config(format!(
            "override go_type package '{}' requires an import",
            detail.package
        )));
    }

    let mut target = if detail.import.is_empty() {
        detail.type_name.parse::<TargetType>()?
    } else {
        let namespace = if detail.package.is_empty() {
            namespace_for_path(&detail.import)
        } else {
            detail.package.clone()
        };
        TargetType::qualified(namespace, detail.type_name.clone())
            .with_external_ref(Import::with_alias(&detail.import, &detail.package))
    };
    if detail.pointer {
        target = target.into_pointer();
    }
    if detail.slice {
        target = target.into_slice();
    }
    Ok(target)
}

/// Applies override rules to columns.
///
/// Column rules are consulted before type rules. Within each kind the first
/// matching rule in declaration order wins.
#[derive(Debug, Clone, Copy)]
pub struct OverrideResolver<'a> {
    rules: &'a [OverrideRule],
    engine: Engine,
    default_schema: &'a str,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(rules: &'a [OverrideRule], engine: Engine, default_schema: &'a str) -> Self {
        Self {
            rules,
            engine,
            default_schema,
        }
    }

    /// The forced type for `column`, if any rule applies.
    pub fn try_override(&self, column: &Column) -> Option<TargetType> {
        if self.rules.is_empty() {
            return None;
        }
        let data_type = normalize_sql_type(self.engine, &column.data_type());

        let column_rules = self.rules.iter().filter(|rule| rule.is_column_rule());
        let type_rules = self.rules.iter().filter(|rule| !rule.is_column_rule());
        let rule = column_rules
            .chain(type_rules)
            .find(|rule| rule.matches(column, &data_type, self.default_schema))?;

        debug!(
            "Override for {}.{} ({}): {}",
            column.table_name(),
            column.name,
            data_type,
            rule.target
        );
        Some(rule.target.clone())
    }
}
