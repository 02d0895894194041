//! Options parsing, merging and validation.

mod types;
mod validation;

pub use types::*;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::catalog::Request;
use crate::error::{GenError, Result};
use crate::overrides::OverrideRule;

impl Options {
    /// Normalize the request's options documents.
    ///
    /// The default schema falls back to the catalog's when the options do
    /// not name one.
    pub fn from_request(request: &Request) -> Result<Self> {
        let engine: Engine = request.settings.engine.parse()?;
        let fallback_schema = if request.catalog.default_schema.is_empty() {
            engine.default_schema()
        } else {
            request.catalog.default_schema.as_str()
        };
        Self::build(
            engine,
            fallback_schema,
            &request.plugin_options,
            &request.global_options,
        )
    }

    /// Normalize an options document and a global options document.
    ///
    /// Each document may be absent (`null`), a JSON-encoded string or an
    /// inline object.
    pub fn parse(engine: Engine, options: &Value, global: &Value) -> Result<Self> {
        Self::build(engine, engine.default_schema(), options, global)
    }

    fn build(
        engine: Engine,
        fallback_schema: &str,
        options: &Value,
        global: &Value,
    ) -> Result<Self> {
        let doc: OptionsDocument = parse_document(options, "options")?;
        let global: GlobalOptionsDocument = parse_document(global, "global options")?;

        let package = if doc.package.is_empty() {
            package_from_out(&doc.out).ok_or_else(|| {
                GenError::config("package is required when out does not name a directory")
            })?
        } else {
            doc.package.clone()
        };

        let sql_package: SqlPackage = doc.sql_package.parse()?;
        let default_schema = doc
            .default_schema
            .clone()
            .unwrap_or_else(|| fallback_schema.to_string());

        let overrides = global
            .overrides
            .iter()
            .chain(doc.overrides.iter())
            .map(|spec| OverrideRule::parse(spec, engine, &default_schema))
            .collect::<Result<Vec<_>>>()?;

        let mut rename = doc.rename;
        rename.extend(global.rename);

        let initialisms = match doc.initialisms {
            Some(list) => list.iter().map(|word| word.to_lowercase()).collect(),
            None => default_initialisms(),
        };

        let primary_keys_columns = doc
            .primary_keys_columns
            .iter()
            .map(|entry| entry.parse())
            .collect::<Result<Vec<PrimaryKeyColumn>>>()?;

        let options = Options {
            engine,
            package,
            out: doc.out,
            default_schema,
            sql_package,
            driver: SqlDriver::resolve(sql_package, engine)?,
            emit_pointers_for_null_types: doc.emit_pointers_for_null_types,
            emit_exact_table_names: doc.emit_exact_table_names,
            overrides,
            rename,
            inflection_exclude_table_names: doc.inflection_exclude_table_names,
            initialisms,
            primary_keys_columns,
            model_import: doc.model_import,
            default_type_values: doc.default_type_values,
        };
        options.validate()?;

        debug!(
            "Options: engine={} package={} driver={} default_schema={:?} overrides={}",
            options.engine,
            options.package,
            options.driver,
            options.default_schema,
            options.overrides.len()
        );
        Ok(options)
    }

    /// Validate the normalized options.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

fn parse_document<T: DeserializeOwned + Default>(value: &Value, what: &str) -> Result<T> {
    let parsed = match value {
        Value::Null => return Ok(T::default()),
        Value::String(text) if text.trim().is_empty() => return Ok(T::default()),
        Value::String(text) => serde_json::from_str(text),
        other => serde_json::from_value(other.clone()),
    };
    parsed.map_err(|e| GenError::config(format!("malformed {} document: {}", what, e)))
}

/// Last path component of `out` (`internal/db/` → `db`).
fn package_from_out(out: &str) -> Option<String> {
    out.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
}
