//! Import references and the persistent import collector.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::SqlDriver;

use super::target::TargetType;

/// A package dependency: import path plus optional alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Import {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Import {
    /// Import without alias.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    /// Import with an alias; an empty alias is treated as none.
    pub fn with_alias(path: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            path: path.into(),
            alias: (!alias.is_empty()).then_some(alias),
        }
    }

    /// Render as a Go import spec line: `"path"` or `alias "path"`.
    pub fn format(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} \"{}\"", alias, self.path),
            None => format!("\"{}\"", self.path),
        }
    }
}

/// Persistent import collector.
///
/// Every `with_*` call returns a new set and leaves the receiver untouched,
/// so a base set can be shared between structs without accumulating
/// imports across them.
#[derive(Debug, Clone)]
pub struct ImportSet {
    driver: SqlDriver,
    imports: Vec<Import>,
}

impl ImportSet {
    pub fn new(driver: SqlDriver) -> Self {
        Self {
            driver,
            imports: Vec::new(),
        }
    }

    /// Add an import. Empty paths are ignored.
    pub fn with(&self, import: Import) -> Self {
        let mut next = self.clone();
        if !import.path.is_empty() {
            next.imports.push(import);
        }
        next
    }

    /// Add the import of a resolved type, if it has one.
    pub fn with_type(&self, target: &TargetType) -> Self {
        match target.external_ref() {
            Some(import) => self.with(import.clone()),
            None => self.clone(),
        }
    }

    /// Add the driver package that owns the connection type.
    pub fn with_sql_driver(&self) -> Self {
        self.with(Import::new(self.driver.import_path()))
    }

    /// Add the driver's connection-error package; standard drivers add none.
    pub fn with_connection(&self) -> Self {
        match self.driver {
            SqlDriver::PgxV4 => self.with(Import::new("github.com/jackc/pgconn")),
            SqlDriver::PgxV5 => self.with(Import::new("github.com/jackc/pgx/v5/pgconn")),
            SqlDriver::LibPq | SqlDriver::GoSqlDriverMysql => self.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// De-duplicate by path (the last entry for a path wins) and sort by path.
    pub fn build(&self) -> Vec<Import> {
        let unique: BTreeMap<&str, &Import> = self
            .imports
            .iter()
            .map(|import| (import.path.as_str(), import))
            .collect();
        unique.into_values().cloned().collect()
    }
}
