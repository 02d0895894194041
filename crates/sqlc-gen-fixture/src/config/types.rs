//! Options document definitions and the normalized options bundle.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Identifier;
use crate::error::{GenError, Result};
use crate::overrides::OverrideRule;

/// Source database family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Postgresql,
    Mysql,
    Sqlite,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Postgresql => "postgresql",
            Engine::Mysql => "mysql",
            Engine::Sqlite => "sqlite",
        }
    }

    /// Schema assumed for unqualified objects when the options do not name one.
    pub fn default_schema(&self) -> &'static str {
        match self {
            Engine::Postgresql => "public",
            Engine::Mysql | Engine::Sqlite => "",
        }
    }
}

impl FromStr for Engine {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "postgresql" => Ok(Engine::Postgresql),
            "mysql" => Ok(Engine::Mysql),
            "sqlite" => Ok(Engine::Sqlite),
            other => Err(GenError::UnknownEngine(other.to_string())),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `sql_package` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlPackage {
    /// `database/sql` (also the value of an absent option).
    #[default]
    Standard,
    PgxV4,
    PgxV5,
}

impl SqlPackage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlPackage::Standard => "database/sql",
            SqlPackage::PgxV4 => "pgx/v4",
            SqlPackage::PgxV5 => "pgx/v5",
        }
    }
}

impl FromStr for SqlPackage {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "database/sql" => Ok(SqlPackage::Standard),
            "pgx/v4" => Ok(SqlPackage::PgxV4),
            "pgx/v5" => Ok(SqlPackage::PgxV5),
            other => Err(GenError::UnknownSqlPackage(other.to_string())),
        }
    }
}

impl fmt::Display for SqlPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client library flavor; decides null handling and available structured types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SqlDriver {
    #[serde(rename = "github.com/lib/pq")]
    LibPq,
    #[serde(rename = "github.com/jackc/pgx/v4")]
    PgxV4,
    #[serde(rename = "github.com/jackc/pgx/v5")]
    PgxV5,
    #[serde(rename = "github.com/go-sql-driver/mysql")]
    GoSqlDriverMysql,
}

impl SqlDriver {
    /// Derive the driver from the package option and the engine.
    ///
    /// The standard package resolves to lib/pq for PostgreSQL, to the
    /// go-sql-driver for MySQL and to lib/pq (plain `database/sql`) for SQLite.
    pub fn resolve(package: SqlPackage, engine: Engine) -> Result<Self> {
        match (package, engine) {
            (SqlPackage::PgxV4, Engine::Postgresql) => Ok(SqlDriver::PgxV4),
            (SqlPackage::PgxV5, Engine::Postgresql) => Ok(SqlDriver::PgxV5),
            (SqlPackage::PgxV4 | SqlPackage::PgxV5, other) => Err(GenError::config(format!(
                "sql_package '{}' requires the postgresql engine, got '{}'",
                package, other
            ))),
            (SqlPackage::Standard, Engine::Mysql) => Ok(SqlDriver::GoSqlDriverMysql),
            (SqlPackage::Standard, Engine::Postgresql | Engine::Sqlite) => Ok(SqlDriver::LibPq),
        }
    }

    pub fn is_pgx(&self) -> bool {
        matches!(self, SqlDriver::PgxV4 | SqlDriver::PgxV5)
    }

    /// Package that provides the connection type.
    pub fn import_path(&self) -> &'static str {
        match self {
            SqlDriver::PgxV4 => "github.com/jackc/pgx/v4",
            SqlDriver::PgxV5 => "github.com/jackc/pgx/v5",
            SqlDriver::GoSqlDriverMysql => "github.com/go-sql-driver/mysql",
            SqlDriver::LibPq => "database/sql",
        }
    }

    pub fn package(&self) -> SqlPackage {
        match self {
            SqlDriver::PgxV4 => SqlPackage::PgxV4,
            SqlDriver::PgxV5 => SqlPackage::PgxV5,
            SqlDriver::LibPq | SqlDriver::GoSqlDriverMysql => SqlPackage::Standard,
        }
    }
}

impl fmt::Display for SqlDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SqlDriver::LibPq => "github.com/lib/pq",
            SqlDriver::PgxV4 => "github.com/jackc/pgx/v4",
            SqlDriver::PgxV5 => "github.com/jackc/pgx/v5",
            SqlDriver::GoSqlDriverMysql => "github.com/go-sql-driver/mysql",
        })
    }
}

/// Fixture default for values of a given type, passed through to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultTypeValue {
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
    pub import: String,
}

/// An override entry as written in the options document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideSpec {
    /// SQL type to match (type-match rule).
    pub db_type: String,
    /// `[catalog.][schema.]table.column` to match (column-match rule).
    pub column: String,
    pub go_type: GoTypeSpec,
    pub nullable: bool,
    pub unsigned: bool,
}

/// Target type of an override: compact string or detailed object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoTypeSpec {
    Name(String),
    Detailed(GoTypeDetail),
}

impl Default for GoTypeSpec {
    fn default() -> Self {
        GoTypeSpec::Name(String::new())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoTypeDetail {
    pub import: String,
    pub package: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub pointer: bool,
    pub slice: bool,
}

/// The per-invocation options document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsDocument {
    pub package: String,
    pub out: String,
    pub default_schema: Option<String>,
    pub sql_package: String,
    pub emit_pointers_for_null_types: bool,
    pub emit_exact_table_names: bool,
    pub overrides: Vec<OverrideSpec>,
    pub rename: HashMap<String, String>,
    pub inflection_exclude_table_names: Vec<String>,
    /// Absent means `["id"]`; an explicit empty list disables initialisms.
    pub initialisms: Option<Vec<String>>,
    pub primary_keys_columns: Vec<String>,
    pub model_import: String,
    pub default_type_values: Vec<DefaultTypeValue>,
}

/// The global options document; only overrides and renames apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalOptionsDocument {
    pub overrides: Vec<OverrideSpec>,
    pub rename: HashMap<String, String>,
}

/// Per-table primary key declaration from `primary_keys_columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyColumn {
    /// Absent for `table.column`, which matches the table in any schema.
    pub schema: Option<String>,
    pub table: String,
    pub column: String,
}

impl PrimaryKeyColumn {
    pub fn matches(&self, table: &Identifier, default_schema: &str) -> bool {
        if self.table != table.name {
            return false;
        }
        match &self.schema {
            None => true,
            Some(schema) => {
                let table_schema = if table.schema.is_empty() {
                    default_schema
                } else {
                    table.schema.as_str()
                };
                schema == table_schema
            }
        }
    }
}

impl FromStr for PrimaryKeyColumn {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(GenError::config(format!(
                "primary_keys_columns entry '{}' has an empty component",
                s
            )));
        }
        match parts.as_slice() {
            [table, column] => Ok(Self {
                schema: None,
                table: table.to_string(),
                column: column.to_string(),
            }),
            [schema, table, column] => Ok(Self {
                schema: Some(schema.to_string()),
                table: table.to_string(),
                column: column.to_string(),
            }),
            _ => Err(GenError::config(format!(
                "primary_keys_columns entry '{}' must be table.column or schema.table.column",
                s
            ))),
        }
    }
}

/// Normalized options for one generation request.
///
/// Built once by [`Options::parse`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Options {
    pub engine: Engine,
    pub package: String,
    pub out: String,
    pub default_schema: String,
    pub sql_package: SqlPackage,
    pub driver: SqlDriver,
    pub emit_pointers_for_null_types: bool,
    pub emit_exact_table_names: bool,
    /// Global rules first, then per-request rules.
    pub overrides: Vec<OverrideRule>,
    pub rename: HashMap<String, String>,
    pub inflection_exclude_table_names: Vec<String>,
    /// Lower-cased initialisms.
    pub initialisms: BTreeSet<String>,
    pub primary_keys_columns: Vec<PrimaryKeyColumn>,
    pub model_import: String,
    pub default_type_values: Vec<DefaultTypeValue>,
}

impl Options {
    /// Defaults for `engine` with the given package name.
    pub fn new(engine: Engine, package: impl Into<String>) -> Self {
        Self {
            engine,
            package: package.into(),
            out: String::new(),
            default_schema: engine.default_schema().to_string(),
            sql_package: SqlPackage::Standard,
            driver: match engine {
                Engine::Mysql => SqlDriver::GoSqlDriverMysql,
                Engine::Postgresql | Engine::Sqlite => SqlDriver::LibPq,
            },
            emit_pointers_for_null_types: false,
            emit_exact_table_names: false,
            overrides: Vec::new(),
            rename: HashMap::new(),
            inflection_exclude_table_names: Vec::new(),
            initialisms: default_initialisms(),
            primary_keys_columns: Vec::new(),
            model_import: String::new(),
            default_type_values: Vec::new(),
        }
    }

    /// Select a driver package, re-deriving the driver.
    pub fn with_sql_package(mut self, package: SqlPackage) -> Result<Self> {
        self.driver = SqlDriver::resolve(package, self.engine)?;
        self.sql_package = package;
        Ok(self)
    }

    /// The configured primary key column for `table`, `id` by default.
    pub fn primary_key_for(&self, table: &Identifier) -> &str {
        self.primary_keys_columns
            .iter()
            .find(|pk| pk.matches(table, &self.default_schema))
            .map(|pk| pk.column.as_str())
            .unwrap_or(DEFAULT_PRIMARY_KEY)
    }
}

/// Primary key column name assumed when no declaration matches.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

pub(crate) fn default_initialisms() -> BTreeSet<String> {
    BTreeSet::from(["id".to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_parse() {
        assert_eq!("postgresql".parse::<Engine>().unwrap(), Engine::Postgresql);
        assert_eq!("mysql".parse::<Engine>().unwrap(), Engine::Mysql);
        assert_eq!("sqlite".parse::<Engine>().unwrap(), Engine::Sqlite);
        assert!(matches!(
            "oracle".parse::<Engine>(),
            Err(GenError::UnknownEngine(name)) if name == "oracle"
        ));
    }

    #[test]
    fn test_sql_package_parse() {
        assert_eq!("".parse::<SqlPackage>().unwrap(), SqlPackage::Standard);
        assert_eq!(
            "database/sql".parse::<SqlPackage>().unwrap(),
            SqlPackage::Standard
        );
        assert_eq!("pgx/v4".parse::<SqlPackage>().unwrap(), SqlPackage::PgxV4);
        assert_eq!("pgx/v5".parse::<SqlPackage>().unwrap(), SqlPackage::PgxV5);
        assert!(matches!(
            "pgx/v6".parse::<SqlPackage>(),
            Err(GenError::UnknownSqlPackage(_))
        ));
    }

    #[test]
    fn test_driver_resolution() {
        use Engine::*;
        assert_eq!(
            SqlDriver::resolve(SqlPackage::PgxV5, Postgresql).unwrap(),
            SqlDriver::PgxV5
        );
        assert_eq!(
            SqlDriver::resolve(SqlPackage::PgxV4, Postgresql).unwrap(),
            SqlDriver::PgxV4
        );
        assert_eq!(
            SqlDriver::resolve(SqlPackage::Standard, Postgresql).unwrap(),
            SqlDriver::LibPq
        );
        assert_eq!(
            SqlDriver::resolve(SqlPackage::Standard, Mysql).unwrap(),
            SqlDriver::GoSqlDriverMysql
        );
        assert_eq!(
            SqlDriver::resolve(SqlPackage::Standard, Sqlite).unwrap(),
            SqlDriver::LibPq
        );
        assert!(SqlDriver::resolve(SqlPackage::PgxV5, Mysql).is_err());
    }

    #[test]
    fn test_driver_package_round_trip() {
        for driver in [SqlDriver::PgxV4, SqlDriver::PgxV5, SqlDriver::LibPq] {
            assert_eq!(
                SqlDriver::resolve(driver.package(), Engine::Postgresql).unwrap(),
                driver
            );
        }
        assert!(SqlDriver::PgxV4.is_pgx());
        assert!(!SqlDriver::LibPq.is_pgx());
    }

    #[test]
    fn test_primary_key_column_parse() {
        let pk: PrimaryKeyColumn = "orders.order_id".parse().unwrap();
        assert_eq!(pk.schema, None);
        assert_eq!(pk.table, "orders");
        assert_eq!(pk.column, "order_id");

        let pk: PrimaryKeyColumn = "sales.orders.order_id".parse().unwrap();
        assert_eq!(pk.schema.as_deref(), Some("sales"));

        assert!("order_id".parse::<PrimaryKeyColumn>().is_err());
        assert!("a.b.c.d".parse::<PrimaryKeyColumn>().is_err());
        assert!("orders.".parse::<PrimaryKeyColumn>().is_err());
    }

    #[test]
    fn test_primary_key_for() {
        let mut options = Options::new(Engine::Postgresql, "db");
        options.primary_keys_columns = vec![
            "orders.order_id".parse().unwrap(),
            "audit.events.event_id".parse().unwrap(),
        ];

        assert_eq!(
            options.primary_key_for(&Identifier::new("", "orders")),
            "order_id"
        );
        assert_eq!(options.primary_key_for(&Identifier::new("", "users")), "id");
        assert_eq!(
            options.primary_key_for(&Identifier::new("audit", "events")),
            "event_id"
        );
        assert_eq!(
            options.primary_key_for(&Identifier::new("public", "events")),
            "id"
        );
    }

    #[test]
    fn test_options_defaults() {
        let options = Options::new(Engine::Mysql, "db");
        assert_eq!(options.default_schema, "");
        assert_eq!(options.driver, SqlDriver::GoSqlDriverMysql);
        assert!(options.initialisms.contains("id"));

        let options = Options::new(Engine::Postgresql, "db")
            .with_sql_package(SqlPackage::PgxV5)
            .unwrap();
        assert_eq!(options.default_schema, "public");
        assert_eq!(options.driver, SqlDriver::PgxV5);
    }
}
