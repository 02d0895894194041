//! PostgreSQL type mapping.
//!
//! Null handling depends on the driver:
//! - lib/pq: `database/sql` wrappers (`sql.NullInt32`, `sql.NullString`, ...)
//! - pgx v4: `pgtype` structs (`pgtype.Int4`, `pgtype.Text`, ...)
//! - pgx v5: `pgtype` structs, or `*T` when pointers for null types are enabled
//!
//! Pointer emission is honored only under pgx v5.

use super::Mapping;
use crate::config::SqlDriver;
use crate::types::TargetType;

/// Lower-case and drop the `pg_catalog.` qualifier.
pub fn normalize(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    match lower.strip_prefix("pg_catalog.") {
        Some(name) => name.to_string(),
        None => lower,
    }
}

/// PostgreSQL mapping settings for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostgresTypes {
    driver: SqlDriver,
    emit_pointers: bool,
}

impl PostgresTypes {
    pub fn new(driver: SqlDriver, emit_pointers_for_null_types: bool) -> Self {
        Self {
            driver,
            emit_pointers: driver == SqlDriver::PgxV5 && emit_pointers_for_null_types,
        }
    }

    pub fn driver(&self) -> SqlDriver {
        self.driver
    }

    /// Map a normalized type name.
    pub fn map(&self, sql_type: &str, not_null: bool) -> Mapping {
        let target = match sql_type {
            "serial" | "serial4" | "integer" | "int" | "int4" => {
                Some(self.scalar(not_null, "int32", "Int4", "NullInt32"))
            }
            "bigserial" | "serial8" | "bigint" | "int8" => {
                Some(self.scalar(not_null, "int64", "Int8", "NullInt64"))
            }
            "smallserial" | "serial2" | "smallint" | "int2" => {
                Some(self.scalar(not_null, "int16", "Int2", "NullInt16"))
            }
            "float" | "double precision" | "float8" => {
                Some(self.scalar(not_null, "float64", "Float8", "NullFloat64"))
            }
            // database/sql has no NullFloat32
            "real" | "float4" => Some(self.scalar(not_null, "float32", "Float4", "NullFloat64")),
            "boolean" | "bool" => Some(self.scalar(not_null, "bool", "Bool", "NullBool")),

            // The standard library has no decimal type; lib/pq scans numerics as strings.
            "numeric" | "decimal" | "money" if self.driver.is_pgx() => Some(pgtype("Numeric")),
            "numeric" | "decimal" | "money" => Some(self.standard(
                not_null,
                TargetType::builtin("string"),
                sql("NullString"),
            )),

            "json" | "jsonb" => Some(match self.driver {
                SqlDriver::PgxV5 => TargetType::bytes(),
                SqlDriver::PgxV4 if sql_type == "json" => pgtype("JSON"),
                SqlDriver::PgxV4 => pgtype("JSONB"),
                SqlDriver::LibPq | SqlDriver::GoSqlDriverMysql if not_null => {
                    TargetType::qualified("json", "RawMessage")
                }
                SqlDriver::LibPq | SqlDriver::GoSqlDriverMysql => pqtype("NullRawMessage"),
            }),

            "bytea" | "blob" => Some(TargetType::bytes()),

            "date" => Some(self.native(not_null, "Date", time(), sql("NullTime"))),
            "time" => Some(self.native(not_null, "Time", time(), sql("NullTime"))),
            "timestamp" => Some(self.native(not_null, "Timestamp", time(), sql("NullTime"))),
            "timestamptz" => Some(self.native(not_null, "Timestamptz", time(), sql("NullTime"))),
            // No pgtype counterpart for time with time zone.
            "timetz" => Some(self.standard(not_null, time(), sql("NullTime"))),

            "text" | "varchar" | "bpchar" | "character varying" | "character" | "char"
            | "string" | "citext" | "name" => {
                Some(self.scalar(not_null, "string", "Text", "NullString"))
            }
            // ltree labels are plain text on the wire.
            "ltree" | "lquery" | "ltxtquery" => {
                Some(self.scalar(not_null, "string", "Text", "NullString"))
            }

            "uuid" => Some(self.native(
                not_null,
                "UUID",
                TargetType::qualified("uuid", "UUID"),
                TargetType::qualified("uuid", "NullUUID"),
            )),

            "interval" => Some(self.native(
                not_null,
                "Interval",
                TargetType::builtin("int64"),
                sql("NullInt64"),
            )),

            "inet" => Some(self.network(not_null, "Addr", "Inet", "Inet")),
            "cidr" => Some(self.network(not_null, "Prefix", "CIDR", "CIDR")),
            "macaddr" | "macaddr8" => Some(match self.driver {
                SqlDriver::PgxV5 => TargetType::qualified("net", "HardwareAddr"),
                SqlDriver::PgxV4 => pgtype("Macaddr"),
                SqlDriver::LibPq | SqlDriver::GoSqlDriverMysql => pqtype("Macaddr"),
            }),

            "daterange" => self.range("Daterange", "Date"),
            "tsrange" => self.range("Tsrange", "Timestamp"),
            "tstzrange" => self.range("Tstzrange", "Timestamptz"),
            "numrange" => self.range("Numrange", "Numeric"),
            "int4range" => self.range("Int4range", "Int4"),
            "int8range" => self.range("Int8range", "Int8"),
            "datemultirange" => self.multirange("Date"),
            "tsmultirange" => self.multirange("Timestamp"),
            "tstzmultirange" => self.multirange("Timestamptz"),
            "nummultirange" => self.multirange("Numeric"),
            "int4multirange" => self.multirange("Int4"),
            "int8multirange" => self.multirange("Int8"),

            "hstore" => self.pgx_only("Hstore"),
            "bit" | "varbit" => self.by_pgx_version("Varbit", "Bits"),
            "cid" => self.by_pgx_version("CID", "Uint32"),
            "oid" => self.by_pgx_version("OID", "Uint32"),
            "xid" => self.by_pgx_version("XID", "Uint32"),
            "tid" => self.pgx_only("TID"),

            "box" => self.pgx_only("Box"),
            "circle" => self.pgx_only("Circle"),
            "line" => self.pgx_only("Line"),
            "lseg" => self.pgx_only("Lseg"),
            "path" => self.pgx_only("Path"),
            "point" => self.pgx_only("Point"),
            "polygon" => self.pgx_only("Polygon"),

            "vector" => (self.driver == SqlDriver::PgxV5).then(|| {
                let vector = TargetType::qualified("pgvector", "Vector");
                if !not_null && self.emit_pointers {
                    vector.into_pointer()
                } else {
                    vector
                }
            }),

            // No scan type of its own; falls back to interface{} unless the catalog says otherwise.
            "void" | "any" => return Mapping::Unknown,

            _ => return Mapping::Unknown,
        };

        target.map_or(Mapping::Unsupported, Mapping::Resolved)
    }

    /// Built-in scalar with a driver-specific nullable form.
    fn scalar(&self, not_null: bool, base: &str, native: &str, std_null: &str) -> TargetType {
        self.nullable(not_null, TargetType::builtin(base), native, sql(std_null))
    }

    fn nullable(
        &self,
        not_null: bool,
        base: TargetType,
        native: &str,
        std_null: TargetType,
    ) -> TargetType {
        if not_null {
            base
        } else if self.emit_pointers {
            base.into_pointer()
        } else if self.driver.is_pgx() {
            pgtype(native)
        } else {
            std_null
        }
    }

    /// Types pgx v5 always scans into its own struct, regardless of nullability.
    fn native(
        &self,
        not_null: bool,
        native: &str,
        base: TargetType,
        std_null: TargetType,
    ) -> TargetType {
        if self.driver == SqlDriver::PgxV5 {
            pgtype(native)
        } else {
            self.nullable(not_null, base, native, std_null)
        }
    }

    /// Types without a pgtype counterpart.
    fn standard(&self, not_null: bool, base: TargetType, std_null: TargetType) -> TargetType {
        if not_null {
            base
        } else if self.emit_pointers {
            base.into_pointer()
        } else {
            std_null
        }
    }

    fn network(&self, not_null: bool, netip: &str, v4: &str, pq: &str) -> TargetType {
        match self.driver {
            SqlDriver::PgxV5 if not_null => TargetType::qualified("netip", netip),
            SqlDriver::PgxV5 => TargetType::qualified("netip", netip).into_pointer(),
            SqlDriver::PgxV4 => pgtype(v4),
            SqlDriver::LibPq | SqlDriver::GoSqlDriverMysql => pqtype(pq),
        }
    }

    fn range(&self, v4: &str, element: &str) -> Option<TargetType> {
        match self.driver {
            SqlDriver::PgxV4 => Some(pgtype(v4)),
            SqlDriver::PgxV5 => Some(pgtype(&format!("Range[pgtype.{}]", element))),
            SqlDriver::LibPq | SqlDriver::GoSqlDriverMysql => None,
        }
    }

    fn multirange(&self, element: &str) -> Option<TargetType> {
        (self.driver == SqlDriver::PgxV5).then(|| {
            pgtype(&format!("Multirange[pgtype.Range[pgtype.{}]]", element))
        })
    }

    fn pgx_only(&self, name: &str) -> Option<TargetType> {
        self.driver.is_pgx().then(|| pgtype(name))
    }

    fn by_pgx_version(&self, v4: &str, v5: &str) -> Option<TargetType> {
        match self.driver {
            SqlDriver::PgxV4 => Some(pgtype(v4)),
            SqlDriver::PgxV5 => Some(pgtype(v5)),
            SqlDriver::LibPq | SqlDriver::GoSqlDriverMysql => None,
        }
    }
}

fn pgtype(name: &str) -> TargetType {
    TargetType::qualified("pgtype", name)
}

fn pqtype(name: &str) -> TargetType {
    TargetType::qualified("pqtype", name)
}

fn sql(name: &str) -> TargetType {
    TargetType::qualified("sql", name)
}

fn time() -> TargetType {
    TargetType::qualified("time", "Time")
}
