//! Request-level entry point.

use serde::Serialize;
use tracing::info;

use crate::catalog::Request;
use crate::config::{DefaultTypeValue, Options, SqlDriver};
use crate::diagnostics::Diagnostics;
use crate::dialect::CustomTypeCatalog;
use crate::error::Result;
use crate::model::{build_structs, Struct};
use crate::types::{Import, ImportSet};

/// The resolved model handed to the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub package: String,
    pub driver: SqlDriver,
    /// Sorted by type name. Includes structs without a primary key.
    pub structs: Vec<Struct>,
    pub diagnostics: Diagnostics,
    pub default_type_values: Vec<DefaultTypeValue>,
}

impl Generation {
    /// Structs the renderer emits fixtures for.
    pub fn renderable(&self) -> impl Iterator<Item = &Struct> {
        self.structs.iter().filter(|s| s.is_renderable())
    }

    /// Imports a fixture file for `model` needs: the driver, its connection
    /// package, the entity type and the primary key type.
    pub fn imports_for(&self, model: &Struct) -> Vec<Import> {
        let base = ImportSet::new(self.driver)
            .with_sql_driver()
            .with_connection();
        model.imports(&base).build()
    }
}

/// Resolve a request into its entity models.
///
/// Fails only on configuration errors. Unmapped column types are recorded
/// in [`Generation::diagnostics`].
pub fn generate(request: &Request) -> Result<Generation> {
    let options = Options::from_request(request)?;
    let custom = CustomTypeCatalog::build(&request.catalog, &options);

    let mut diagnostics = Diagnostics::new();
    let structs = build_structs(&request.catalog, &options, &custom, &mut diagnostics);

    info!(
        "Resolved {} structs ({} renderable) for package {} [{}], {} custom types, {} diagnostics",
        structs.len(),
        structs.iter().filter(|s| s.is_renderable()).count(),
        options.package,
        options.driver,
        custom.len(),
        diagnostics.len()
    );

    Ok(Generation {
        package: options.package,
        driver: options.driver,
        structs,
        diagnostics,
        default_type_values: options.default_type_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::error::GenError;

    const MYSQL_REQUEST: &str = r#"{
        "settings": {"engine": "mysql"},
        "catalog": {
            "schemas": [{
                "name": "",
                "tables": [{
                    "rel": {"name": "widgets"},
                    "columns": [
                        {"name": "id", "not_null": true, "type": {"name": "int"}},
                        {"name": "shape", "type": {"name": "frobnicate"}},
                        {"name": "active", "not_null": true, "length": 1, "type": {"name": "tinyint"}}
                    ]
                }]
            }]
        },
        "plugin_options": {"package": "fixtures"}
    }"#;

    #[test]
    fn test_unknown_mysql_type() {
        let request = Request::from_json(MYSQL_REQUEST).unwrap();
        let generation = generate(&request).unwrap();

        assert_eq!(generation.package, "fixtures");
        assert_eq!(generation.driver, SqlDriver::GoSqlDriverMysql);

        let widget = &generation.structs[0];
        assert_eq!(widget.target().to_string(), "Widget");
        assert!(widget.fields()[1].target().is_untyped());
        assert_eq!(widget.fields()[2].target().to_string(), "bool");

        assert_eq!(generation.diagnostics.len(), 1);
        let diagnostic = generation.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::UnknownType);
        assert_eq!(diagnostic.column, "shape");
        assert_eq!(diagnostic.sql_type, "frobnicate");
    }

    #[test]
    fn test_imports_for_struct() {
        let request = Request::from_json(
            r#"{
                "settings": {"engine": "postgresql"},
                "catalog": {
                    "default_schema": "public",
                    "schemas": [{
                        "name": "public",
                        "tables": [{
                            "rel": {"name": "sessions"},
                            "columns": [{"name": "id", "not_null": true, "type": {"name": "uuid"}}]
                        }]
                    }]
                },
                "plugin_options": {"package": "fixtures", "sql_package": "pgx/v5", "model_import": "example.com/app/db"}
            }"#,
        )
        .unwrap();
        let generation = generate(&request).unwrap();
        let session = &generation.structs[0];
        let paths: Vec<String> = generation
            .imports_for(session)
            .into_iter()
            .map(|import| import.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "example.com/app/db",
                "github.com/jackc/pgx/v5",
                "github.com/jackc/pgx/v5/pgconn",
                "github.com/jackc/pgx/v5/pgtype",
            ]
        );
    }

    #[test]
    fn test_renderable_excludes_tables_without_primary_key() {
        let request = Request::from_yaml(
            r#"
settings:
  engine: sqlite
catalog:
  schemas:
    - name: main
      tables:
        - rel: {name: notes}
          columns:
            - {name: id, not_null: true, type: {name: INTEGER}}
        - rel: {name: audit_log}
          columns:
            - {name: message, type: {name: TEXT}}
plugin_options:
  package: fixtures
  default_schema: main
"#,
        )
        .unwrap();
        let generation = generate(&request).unwrap();
        assert_eq!(generation.structs.len(), 2);
        let names: Vec<String> = generation
            .renderable()
            .map(|s| s.target().to_string())
            .collect();
        assert_eq!(names, vec!["Note"]);
    }

    #[test]
    fn test_configuration_errors_abort() {
        let request = Request::from_json(r#"{"settings": {"engine": "postgresql"}}"#).unwrap();
        assert!(matches!(generate(&request), Err(GenError::Config(_))));

        let request = Request::from_json(
            r#"{"settings": {"engine": "cockroach"}, "plugin_options": {"package": "db"}}"#,
        )
        .unwrap();
        assert!(matches!(generate(&request), Err(GenError::UnknownEngine(_))));
    }
}
