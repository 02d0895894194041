//! SQLite type mapping.
//!
//! SQLite uses type affinity, so the character and decimal families are
//! matched by prefix (`varchar(255)`, `decimal(10,2)`).

use super::Mapping;
use crate::types::TargetType;

/// Lower-case and drop whitespace (`DOUBLE PRECISION` → `doubleprecision`).
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

const TEXT_PREFIXES: [&str; 6] = [
    "character",
    "varchar",
    "varyingcharacter",
    "nchar",
    "nativecharacter",
    "nvarchar",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqliteTypes {
    emit_pointers: bool,
}

impl SqliteTypes {
    pub fn new(emit_pointers_for_null_types: bool) -> Self {
        Self {
            emit_pointers: emit_pointers_for_null_types,
        }
    }

    /// Map a normalized type name.
    pub fn map(&self, sql_type: &str, not_null: bool) -> Mapping {
        let target = match sql_type {
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint"
            | "unsignedbigint" | "int2" | "int8" => {
                self.nullable(not_null, TargetType::builtin("int64"), "NullInt64")
            }
            "blob" => TargetType::bytes(),
            "real" | "double" | "doubleprecision" | "float" => {
                self.nullable(not_null, TargetType::builtin("float64"), "NullFloat64")
            }
            "boolean" | "bool" => self.nullable(not_null, TargetType::builtin("bool"), "NullBool"),
            "date" | "datetime" | "timestamp" => {
                self.nullable(not_null, TargetType::qualified("time", "Time"), "NullTime")
            }
            t if t == "text" || t == "clob" || TEXT_PREFIXES.iter().any(|p| t.starts_with(p)) => {
                self.nullable(not_null, TargetType::builtin("string"), "NullString")
            }
            t if t == "numeric" || t.starts_with("decimal") => {
                self.nullable(not_null, TargetType::builtin("float64"), "NullFloat64")
            }

            _ => return Mapping::Unknown,
        };

        Mapping::Resolved(target)
    }

    fn nullable(&self, not_null: bool, base: TargetType, null: &str) -> TargetType {
        if not_null {
            base
        } else if self.emit_pointers {
            base.into_pointer()
        } else {
            TargetType::qualified("sql", null)
        }
    }
}
