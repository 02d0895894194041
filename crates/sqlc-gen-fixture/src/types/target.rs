//! Resolved target-language type.
//!
//! A [`TargetType`] is the single representation every resolution path
//! produces: engine transformers, the custom type catalog and overrides.
//! It is a tagged structure; the compact textual form (`[]*pkg.Type`,
//! `example.com/mod/pkg.Type`) is only parsed at configuration boundaries.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{GenError, Result};

use super::imports::Import;

/// Base name of the untyped placeholder returned for unmapped SQL types.
pub const UNTYPED: &str = "interface{}";

/// A resolved type: base name, optional namespace, optional import,
/// pointer and array wrappers.
///
/// `array_depth > 0` iff `is_array`; both are maintained by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetType {
    base_name: String,
    namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_ref: Option<Import>,
    is_pointer: bool,
    is_array: bool,
    array_depth: u32,
}

impl TargetType {
    /// A type without namespace (`int32`, `string`, `bool`).
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            base_name: name.into(),
            namespace: String::new(),
            external_ref: None,
            is_pointer: false,
            is_array: false,
            array_depth: 0,
        }
    }

    /// A namespaced type (`pgtype.Int4`, `sql.NullString`).
    pub fn qualified(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::builtin(name)
        }
    }

    /// The placeholder for types nothing knows how to map.
    pub fn untyped() -> Self {
        Self::builtin(UNTYPED)
    }

    /// `[]byte`.
    pub fn bytes() -> Self {
        Self::builtin("byte").into_slice()
    }

    /// Wrap in a pointer.
    pub fn into_pointer(mut self) -> Self {
        self.is_pointer = true;
        self
    }

    /// Add one array dimension.
    pub fn into_slice(mut self) -> Self {
        self.array_depth += 1;
        self.is_array = true;
        self
    }

    /// Set the array dimensionality; zero removes the array wrapper.
    pub fn with_array_depth(mut self, depth: u32) -> Self {
        self.array_depth = depth;
        self.is_array = depth > 0;
        self
    }

    /// Replace the import, used for explicitly declared overrides.
    pub fn with_external_ref(mut self, import: Import) -> Self {
        self.external_ref = if import.path.is_empty() {
            None
        } else {
            Some(import)
        };
        self
    }

    /// Attach the import once the owning package is known.
    ///
    /// No-op when an import is already attached or the type has no
    /// namespace, so applying it any number of times gives the same value.
    pub fn with_default_ref(mut self, import: impl FnOnce(&str) -> Option<Import>) -> Self {
        if self.external_ref.is_none() && !self.namespace.is_empty() {
            self.external_ref = import(&self.namespace);
        }
        self
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn external_ref(&self) -> Option<&Import> {
        self.external_ref.as_ref()
    }

    pub fn is_pointer(&self) -> bool {
        self.is_pointer
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn array_depth(&self) -> u32 {
        self.array_depth
    }

    /// Whether this is the untyped placeholder.
    pub fn is_untyped(&self) -> bool {
        self.namespace.is_empty() && self.base_name == UNTYPED
    }

    /// `pkg.Type` without pointer or array wrappers.
    pub fn type_with_namespace(&self) -> String {
        if self.namespace.is_empty() {
            self.base_name.clone()
        } else {
            format!("{}.{}", self.namespace, self.base_name)
        }
    }

    /// Serialize to the compact form accepted by [`FromStr`].
    ///
    /// Unlike [`Display`](fmt::Display), a namespace whose import path
    /// derives it is written with the full path, so a parsed
    /// `example.com/mod/pkg.Type` serializes back unchanged.
    pub fn to_compact_string(&self) -> String {
        let qualifier = match &self.external_ref {
            _ if self.namespace.is_empty() => None,
            Some(import)
                if import.alias.is_none()
                    && import.path.contains('/')
                    && namespace_for_path(&import.path) == self.namespace =>
            {
                Some(import.path.as_str())
            }
            _ => Some(self.namespace.as_str()),
        };

        let mut out = self.wrapper_prefix();
        if let Some(qualifier) = qualifier {
            out.push_str(qualifier);
            out.push('.');
        }
        out.push_str(&self.base_name);
        out
    }

    fn wrapper_prefix(&self) -> String {
        let mut out = "[]".repeat(self.array_depth as usize);
        if self.is_pointer {
            out.push('*');
        }
        out
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.wrapper_prefix(), self.type_with_namespace())
    }
}

impl FromStr for TargetType {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GenError::config(format!("invalid type specification {:?}", s));

        let mut rest = s.trim();
        let mut depth = 0;
        while let Some(inner) = rest.strip_prefix("[]") {
            depth += 1;
            rest = inner;
        }
        let is_pointer = match rest.strip_prefix('*') {
            Some(inner) => {
                rest = inner;
                true
            }
            None => false,
        };
        if rest.is_empty() {
            return Err(invalid());
        }

        // Generic arguments may contain dots of their own.
        let head = &rest[..rest.find('[').unwrap_or(rest.len())];
        let mut parsed = match head.rfind('.') {
            None => TargetType::builtin(rest),
            Some(dot) => {
                let (qualifier, base) = (&rest[..dot], &rest[dot + 1..]);
                if qualifier.is_empty() || base.is_empty() {
                    return Err(invalid());
                }
                if qualifier.contains('/') {
                    TargetType::qualified(namespace_for_path(qualifier), base)
                        .with_external_ref(Import::new(qualifier))
                } else {
                    TargetType::qualified(qualifier, base)
                }
            }
        };

        parsed.is_pointer = is_pointer;
        Ok(parsed.with_array_depth(depth))
    }
}

/// Package name implied by an import path.
///
/// `github.com/jackc/pgx/v5/pgtype` → `pgtype`, `github.com/x/y/v2` → `y`,
/// `github.com/pgvector/pgvector-go` → `pgvector`, `gopkg.in/yaml.v3` → `yaml`.
pub fn namespace_for_path(path: &str) -> String {
    let mut segments = path.rsplit('/');
    let mut last = segments.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(previous) = segments.next() {
            last = previous;
        }
    }
    let last = last.split('.').next().unwrap_or(last);
    let last = last.strip_prefix("go-").unwrap_or(last);
    let last = last.strip_suffix("-go").unwrap_or(last);
    last.to_string()
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}
