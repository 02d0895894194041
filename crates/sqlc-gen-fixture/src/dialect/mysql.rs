//! MySQL type mapping (go-sql-driver, `database/sql` wrappers).
//!
//! MySQL never emits pointers for nullable columns.

use super::Mapping;
use crate::types::TargetType;

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Map a normalized type name. `length` is the declared display width,
/// which distinguishes `tinyint(1)` booleans from small integers.
pub fn map_type(sql_type: &str, not_null: bool, unsigned: bool, length: i32) -> Mapping {
    let integer = |signed: &str, unsigned_name: &str, null: &str| {
        if !not_null {
            sql(null)
        } else if unsigned {
            TargetType::builtin(unsigned_name)
        } else {
            TargetType::builtin(signed)
        }
    };
    let nullable = |base: TargetType, null: &str| if not_null { base } else { sql(null) };

    let target = match sql_type {
        "varchar" | "text" | "char" | "tinytext" | "mediumtext" | "longtext" => {
            nullable(TargetType::builtin("string"), "NullString")
        }

        "tinyint" if length == 1 => nullable(TargetType::builtin("bool"), "NullBool"),
        // database/sql has no NullInt8; NullInt16 is the narrowest wrapper.
        "tinyint" => integer("int8", "uint8", "NullInt16"),
        "year" => nullable(TargetType::builtin("int16"), "NullInt16"),
        "smallint" => integer("int16", "uint16", "NullInt16"),
        "int" | "integer" | "mediumint" => integer("int32", "uint32", "NullInt32"),
        "bigint" => integer("int64", "uint64", "NullInt64"),

        "blob" | "binary" | "varbinary" | "tinyblob" | "mediumblob" | "longblob" => {
            nullable(TargetType::bytes(), "NullString")
        }

        "double" | "double precision" | "real" | "float" => {
            nullable(TargetType::builtin("float64"), "NullFloat64")
        }
        "decimal" | "dec" | "fixed" => nullable(TargetType::builtin("string"), "NullString"),

        // Enum values are not modeled; columns scan into plain strings.
        "enum" => TargetType::builtin("string"),

        "date" | "timestamp" | "datetime" | "time" => {
            nullable(TargetType::qualified("time", "Time"), "NullTime")
        }

        "boolean" | "bool" => nullable(TargetType::builtin("bool"), "NullBool"),

        "json" => TargetType::qualified("json", "RawMessage"),

        _ => return Mapping::Unknown,
    };

    Mapping::Resolved(target)
}

fn sql(name: &str) -> TargetType {
    TargetType::qualified("sql", name)
}
