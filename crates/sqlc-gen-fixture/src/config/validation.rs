//! Options validation.

use tracing::warn;

use super::{Engine, Options, SqlDriver};
use crate::error::{GenError, Result};

/// Validate normalized options.
pub fn validate(options: &Options) -> Result<()> {
    if options.package.is_empty() {
        return Err(GenError::config("package is required"));
    }
    if options
        .package
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '.')
    {
        return Err(GenError::config(format!(
            "package '{}' must be a plain identifier",
            options.package
        )));
    }

    if options.initialisms.iter().any(|word| word.is_empty()) {
        return Err(GenError::config("initialisms must not contain empty entries"));
    }

    if let Some((from, to)) = options
        .rename
        .iter()
        .find(|(from, to)| from.is_empty() || to.is_empty())
    {
        return Err(GenError::config(format!(
            "rename entry '{}' -> '{}' must not be empty",
            from, to
        )));
    }

    // Only pgx v5 (and SQLite) turn nullable columns into pointers.
    let pointers_honored = match options.engine {
        Engine::Postgresql => options.driver == SqlDriver::PgxV5,
        Engine::Sqlite => true,
        Engine::Mysql => false,
    };
    if options.emit_pointers_for_null_types && !pointers_honored {
        warn!(
            "emit_pointers_for_null_types has no effect for {} with driver {}",
            options.engine, options.driver
        );
    }

    Ok(())
}
