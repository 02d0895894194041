//! # sqlc-gen-fixture
//!
//! Type resolution and entity model building for sqlc fixture generation.
//!
//! Given a schema catalog supplied by sqlc, this library resolves every
//! column to a Go type and assembles one entity model per table:
//!
//! - **Engine transformers** for PostgreSQL (lib/pq, pgx v4, pgx v5), MySQL
//!   and SQLite
//! - **Overrides** by column pattern or by SQL type, checked first
//! - **Custom types** derived from schema enums and composite types
//! - **Identifier normalization** with initialisms, renames and
//!   singularized struct names
//!
//! Rendering the models to source text is left to the caller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sqlc_gen_fixture::{generate, Request};
//!
//! fn main() -> sqlc_gen_fixture::Result<()> {
//!     let request = Request::load("request.json")?;
//!     let generation = generate(&request)?;
//!     for model in generation.renderable() {
//!         println!("{} <- {}", model.target(), model.full_table_name());
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod error;
pub mod generator;
pub mod model;
pub mod naming;
pub mod overrides;
pub mod types;

// Re-exports for convenient access
pub use catalog::{Catalog, Column, Request};
pub use config::{Engine, Options, SqlDriver, SqlPackage};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use dialect::{CustomTypeCatalog, TypeTransformer};
pub use error::{GenError, Result};
pub use generator::{generate, Generation};
pub use model::{build_structs, Field, Struct};
pub use types::{Import, ImportSet, TargetType};
