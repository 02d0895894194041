//! Per-engine type transformers.
//!
//! A [`TypeTransformer`] is selected once per request from the engine and
//! the options, then resolves every column:
//!
//! 1. normalize the SQL type name for the engine
//! 2. look it up in the engine's static table
//! 3. on a miss, consult the [`CustomTypeCatalog`]
//! 4. on a second miss, record a [`Diagnostic`] and fall back to `interface{}`
//! 5. attach the import implied by the resolved namespace
//!
//! # Usage
//!
//! ```rust,ignore
//! let transformer = TypeTransformer::new(&options);
//! let custom = CustomTypeCatalog::build(&request.catalog, &options);
//! let target = transformer.resolve(&column, &custom, &mut diagnostics);
//! ```

pub mod custom;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use custom::{model_type, CustomType, CustomTypeCatalog, CustomTypeKind};
pub use postgres::PostgresTypes;
pub use sqlite::SqliteTypes;

use tracing::debug;

use crate::catalog::Column;
use crate::config::{Engine, Options, SqlDriver};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::types::{Import, TargetType};

/// Result of an engine table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    Resolved(TargetType),
    /// The engine knows the type, but not under the selected driver.
    Unsupported,
    Unknown,
}

/// Normalize a SQL type name the way `engine`'s transformer does before lookup.
pub fn normalize_sql_type(engine: Engine, raw: &str) -> String {
    match engine {
        Engine::Postgresql => postgres::normalize(raw),
        Engine::Mysql => mysql::normalize(raw),
        Engine::Sqlite => sqlite::normalize(raw),
    }
}

/// Import path for a well-known namespace.
///
/// `pgtype` depends on the driver: pgx v5 bundles it, pgx v4 uses the
/// standalone module.
pub fn namespace_import(namespace: &str, driver: SqlDriver) -> Option<Import> {
    let path = match namespace {
        "sql" => "database/sql",
        "uuid" => "github.com/google/uuid",
        "netip" => "net/netip",
        "time" => "time",
        "json" => "encoding/json",
        "net" => "net",
        "pgtype" if driver == SqlDriver::PgxV5 => "github.com/jackc/pgx/v5/pgtype",
        "pgtype" => "github.com/jackc/pgtype",
        "pqtype" => "github.com/sqlc-dev/pqtype",
        "pq" => "github.com/lib/pq",
        "pgvector" => "github.com/pgvector/pgvector-go",
        _ => return None,
    };
    Some(Import::new(path))
}

/// Engine-specific column type resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTransformer {
    Postgres(PostgresTypes),
    Mysql,
    Sqlite(SqliteTypes),
}

impl TypeTransformer {
    /// Select the transformer for the options' engine.
    pub fn new(options: &Options) -> Self {
        match options.engine {
            Engine::Postgresql => TypeTransformer::Postgres(PostgresTypes::new(
                options.driver,
                options.emit_pointers_for_null_types,
            )),
            Engine::Mysql => TypeTransformer::Mysql,
            Engine::Sqlite => {
                TypeTransformer::Sqlite(SqliteTypes::new(options.emit_pointers_for_null_types))
            }
        }
    }

    pub fn engine(&self) -> Engine {
        match self {
            TypeTransformer::Postgres(_) => Engine::Postgresql,
            TypeTransformer::Mysql => Engine::Mysql,
            TypeTransformer::Sqlite(_) => Engine::Sqlite,
        }
    }

    /// Driver used to pick namespace imports.
    fn driver(&self) -> SqlDriver {
        match self {
            TypeTransformer::Postgres(types) => types.driver(),
            TypeTransformer::Mysql => SqlDriver::GoSqlDriverMysql,
            TypeTransformer::Sqlite(_) => SqlDriver::LibPq,
        }
    }

    /// Look up the engine table only.
    pub fn map(&self, column: &Column) -> Mapping {
        let sql_type = normalize_sql_type(self.engine(), &column.data_type());
        let not_null = column.effective_not_null();
        match self {
            TypeTransformer::Postgres(types) => types.map(&sql_type, not_null),
            TypeTransformer::Mysql => {
                mysql::map_type(&sql_type, not_null, column.unsigned, column.length)
            }
            TypeTransformer::Sqlite(types) => types.map(&sql_type, not_null),
        }
    }

    /// Resolve a column's type, falling back to the custom type catalog and
    /// then to `interface{}`. Never fails; gaps are recorded in `diagnostics`.
    pub fn resolve(
        &self,
        column: &Column,
        custom: &CustomTypeCatalog,
        diagnostics: &mut Diagnostics,
    ) -> TargetType {
        let kind = match self.map(column) {
            Mapping::Resolved(target) => {
                let driver = self.driver();
                return target.with_default_ref(|namespace| namespace_import(namespace, driver));
            }
            Mapping::Unsupported => DiagnosticKind::UnsupportedForDriver,
            Mapping::Unknown => DiagnosticKind::UnknownType,
        };

        if let Some(entry) = custom.lookup(column, column.effective_not_null()) {
            debug!(
                "Column {} resolved to custom {:?} type {}",
                column.name, entry.kind, entry.target
            );
            return entry.target.clone();
        }

        let sql_type = column.data_type();
        let message = match kind {
            DiagnosticKind::UnknownType => {
                format!("unknown {} type: {}", self.engine(), sql_type)
            }
            DiagnosticKind::UnsupportedForDriver => format!(
                "{} type {} is not supported by driver {}",
                self.engine(),
                sql_type,
                self.driver()
            ),
        };
        diagnostics.record(Diagnostic {
            kind,
            table: column.table_name(),
            column: column.name.clone(),
            sql_type,
            message,
        });
        TargetType::untyped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Enum, Identifier, Schema};
    use crate::config::SqlPackage;

    fn column(sql_type: &str, not_null: bool) -> Column {
        Column {
            name: "c".into(),
            not_null,
            table: Some(Identifier::new("public", "t")),
            type_ref: Identifier::new("", sql_type),
            ..Default::default()
        }
    }

    fn pgx_v5(pointers: bool) -> Options {
        let mut options = Options::new(Engine::Postgresql, "db")
            .with_sql_package(SqlPackage::PgxV5)
            .unwrap();
        options.emit_pointers_for_null_types = pointers;
        options
    }

    fn mood_catalog() -> Catalog {
        Catalog {
            schemas: vec![Schema {
                name: "public".into(),
                enums: vec![Enum {
                    name: "mood".into(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_selects_engine() {
        let options = Options::new(Engine::Mysql, "db");
        assert_eq!(TypeTransformer::new(&options), TypeTransformer::Mysql);
        let options = Options::new(Engine::Sqlite, "db");
        assert_eq!(TypeTransformer::new(&options).engine(), Engine::Sqlite);
        assert_eq!(TypeTransformer::new(&pgx_v5(false)).engine(), Engine::Postgresql);
    }

    #[test]
    fn test_attaches_namespace_import() {
        let options = pgx_v5(false);
        let transformer = TypeTransformer::new(&options);
        let mut diagnostics = Diagnostics::new();
        let target = transformer.resolve(
            &column("timestamptz", true),
            &CustomTypeCatalog::default(),
            &mut diagnostics,
        );
        assert_eq!(target.to_string(), "pgtype.Timestamptz");
        assert_eq!(
            target.external_ref(),
            Some(&Import::new("github.com/jackc/pgx/v5/pgtype"))
        );

        let options = Options::new(Engine::Postgresql, "db")
            .with_sql_package(SqlPackage::PgxV4)
            .unwrap();
        let target = TypeTransformer::new(&options).resolve(
            &column("int4", false),
            &CustomTypeCatalog::default(),
            &mut diagnostics,
        );
        assert_eq!(
            target.external_ref(),
            Some(&Import::new("github.com/jackc/pgtype"))
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_custom_type_fallback() {
        let options = pgx_v5(false);
        let custom = CustomTypeCatalog::build(&mood_catalog(), &options);
        let transformer = TypeTransformer::new(&options);
        let mut diagnostics = Diagnostics::new();

        let target = transformer.resolve(&column("mood", false), &custom, &mut diagnostics);
        assert_eq!(target.to_string(), "NullMood");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_type_records_one_diagnostic() {
        let options = Options::new(Engine::Mysql, "db");
        let transformer = TypeTransformer::new(&options);
        let mut diagnostics = Diagnostics::new();

        let target = transformer.resolve(
            &column("frobnicate", true),
            &CustomTypeCatalog::default(),
            &mut diagnostics,
        );
        assert!(target.is_untyped());
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::UnknownType);
        assert_eq!(diagnostic.sql_type, "frobnicate");
        assert_eq!(diagnostic.table, "public.t");
    }

    #[test]
    fn test_unsupported_for_driver() {
        let options = Options::new(Engine::Postgresql, "db");
        let transformer = TypeTransformer::new(&options);
        let mut diagnostics = Diagnostics::new();

        let target = transformer.resolve(
            &column("tstzrange", true),
            &CustomTypeCatalog::default(),
            &mut diagnostics,
        );
        assert!(target.is_untyped());
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::UnsupportedForDriver);
        assert!(diagnostic.message.contains("github.com/lib/pq"));
    }

    #[test]
    fn test_void_and_any_are_recorded() {
        let mut diagnostics = Diagnostics::new();
        let target = TypeTransformer::new(&pgx_v5(false)).resolve(
            &column("void", false),
            &CustomTypeCatalog::default(),
            &mut diagnostics,
        );
        assert!(target.is_untyped());

        for engine in [Engine::Mysql, Engine::Sqlite] {
            let target = TypeTransformer::new(&Options::new(engine, "db")).resolve(
                &column("any", true),
                &CustomTypeCatalog::default(),
                &mut diagnostics,
            );
            assert!(target.is_untyped());
        }

        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::UnknownType));
        assert_eq!(diagnostics.iter().next().unwrap().sql_type, "void");
    }

    #[test]
    fn test_sqlite_uses_custom_catalog() {
        let options = Options::new(Engine::Sqlite, "db");
        let mut catalog = mood_catalog();
        catalog.schemas[0].name = String::new();
        let custom = CustomTypeCatalog::build(&catalog, &options);
        let mut diagnostics = Diagnostics::new();
        let target = TypeTransformer::new(&options).resolve(
            &column("mood", true),
            &custom,
            &mut diagnostics,
        );
        assert_eq!(target.to_string(), "Mood");
    }

    #[test]
    fn test_namespace_import_table() {
        assert_eq!(
            namespace_import("sql", SqlDriver::LibPq),
            Some(Import::new("database/sql"))
        );
        assert_eq!(
            namespace_import("pqtype", SqlDriver::LibPq),
            Some(Import::new("github.com/sqlc-dev/pqtype"))
        );
        assert_eq!(
            namespace_import("pgvector", SqlDriver::PgxV5),
            Some(Import::new("github.com/pgvector/pgvector-go"))
        );
        assert_eq!(namespace_import("models", SqlDriver::PgxV5), None);
    }
}
