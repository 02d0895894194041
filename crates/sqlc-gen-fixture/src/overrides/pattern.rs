//! Wildcard name patterns used by column overrides.

use regex::Regex;

use crate::error::{GenError, Result};

/// An anchored wildcard pattern: `*` matches any run of characters, `?`
/// matches exactly one, everything else is literal.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        let mut expr = String::with_capacity(pattern.len() + 2);
        expr.push('^');
        let mut literal = [0u8; 4];
        for c in pattern.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                c => expr.push_str(&regex::escape(c.encode_utf8(&mut literal))),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| GenError::pattern(pattern, e))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}
