//! Identifier normalization: SQL names to target-language identifiers.

pub mod inflection;

use std::collections::{BTreeSet, HashMap};

use crate::config::Options;

/// Converts raw schema identifiers into exported identifiers.
///
/// Total: any input produces some identifier, never an error.
#[derive(Debug, Clone, Copy)]
pub struct NameNormalizer<'a> {
    rename: &'a HashMap<String, String>,
    initialisms: &'a BTreeSet<String>,
    default_schema: &'a str,
}

impl<'a> NameNormalizer<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            rename: &options.rename,
            initialisms: &options.initialisms,
            default_schema: &options.default_schema,
        }
    }

    /// `user_id` → `UserID` (with `id` registered as initialism).
    ///
    /// An exact `rename` entry is returned verbatim. Otherwise every
    /// character that is not a letter or digit separates words, initialism
    /// words are upper-cased, other words get a capital first letter, and a
    /// leading digit is prefixed with `_`.
    pub fn normalize_type_name(&self, raw: &str) -> String {
        if let Some(renamed) = self.rename.get(raw) {
            return renamed.clone();
        }

        let mut out = String::with_capacity(raw.len());
        for word in raw.split(|c: char| !c.is_alphanumeric()) {
            if self.initialisms.contains(&word.to_lowercase()) {
                out.push_str(&word.to_uppercase());
            } else {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                }
            }
        }

        if out.starts_with(|c: char| c.is_numeric()) {
            out.insert(0, '_');
        }
        out
    }

    /// `name` for the default schema, `schema_name` otherwise.
    pub fn normalize_sql_name(&self, schema: &str, name: &str) -> String {
        if schema == self.default_schema {
            name.to_string()
        } else {
            format!("{}_{}", schema, name)
        }
    }
}

/// Local variable name for an identifier: lower-cased first letter, with
/// Go keywords and predeclared names replaced.
pub fn param_name(name: &str) -> String {
    let mut chars = name.chars();
    let lowered: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };

    match lowered.as_str() {
        "type" => "typ",
        "range" => "rng",
        "map" => "mp",
        "string" => "str",
        "interface" => "iface",
        "select" => "sel",
        "default" => "def",
        "case" => "c",
        "switch" => "sw",
        "for" => "f",
        "func" => "fn",
        "return" => "ret",
        "package" => "pkg",
        "import" => "imp",
        "var" => "v",
        "const" => "cst",
        "struct" => "st",
        _ => return lowered,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Engine;

    fn options() -> Options {
        Options::new(Engine::Postgresql, "db")
    }

    #[test]
    fn test_initialisms() {
        let options = options();
        let n = NameNormalizer::new(&options);
        assert_eq!(n.normalize_type_name("user_id"), "UserID");
        assert_eq!(n.normalize_type_name("id"), "ID");
        assert_eq!(n.normalize_type_name("Id_card"), "IDCard");
        assert_eq!(n.normalize_type_name("identity"), "Identity");
    }

    #[test]
    fn test_separators() {
        let options = options();
        let n = NameNormalizer::new(&options);
        assert_eq!(n.normalize_type_name("created_at"), "CreatedAt");
        assert_eq!(n.normalize_type_name("first-name"), "FirstName");
        assert_eq!(n.normalize_type_name("a b.c"), "ABC");
        assert_eq!(n.normalize_type_name("user__name"), "UserName");
        assert_eq!(n.normalize_type_name("camelCase"), "CamelCase");
        assert_eq!(n.normalize_type_name(""), "");
    }

    #[test]
    fn test_leading_digit() {
        let options = options();
        let n = NameNormalizer::new(&options);
        assert_eq!(n.normalize_type_name("1st_place"), "_1stPlace");
        assert_eq!(n.normalize_type_name("_2fa"), "_2fa");
    }

    #[test]
    fn test_rename_short_circuits() {
        let mut options = options();
        options
            .rename
            .insert("user_id".to_string(), "OwnerKey".to_string());
        let n = NameNormalizer::new(&options);
        assert_eq!(n.normalize_type_name("user_id"), "OwnerKey");
        assert_eq!(n.normalize_type_name("group_id"), "GroupID");
    }

    #[test]
    fn test_custom_initialisms() {
        let mut options = options();
        options.initialisms = ["id", "url", "api"].iter().map(|s| s.to_string()).collect();
        let n = NameNormalizer::new(&options);
        assert_eq!(n.normalize_type_name("api_url"), "APIURL");

        options.initialisms.clear();
        let n = NameNormalizer::new(&options);
        assert_eq!(n.normalize_type_name("user_id"), "UserId");
    }

    #[test]
    fn test_normalize_sql_name() {
        let options = options();
        let n = NameNormalizer::new(&options);
        assert_eq!(n.normalize_sql_name("public", "users"), "users");
        assert_eq!(n.normalize_sql_name("audit", "users"), "audit_users");
        assert_eq!(n.normalize_sql_name("", "users"), "_users");
    }

    #[test]
    fn test_param_name() {
        assert_eq!(param_name("UserID"), "userID");
        assert_eq!(param_name("Type"), "typ");
        assert_eq!(param_name("Range"), "rng");
        assert_eq!(param_name("Struct"), "st");
        assert_eq!(param_name("email"), "email");
        assert_eq!(param_name(""), "");
    }
}
