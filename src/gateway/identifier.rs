//! # Identifier Discipline
//!
//! Table and column names are the only caller-supplied text that ever lands
//! inside statement text. Everything here is validated against an allow-list
//! and emitted double-quoted.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::{GatewayError, GatewayResult};

/// Postgres truncates identifiers beyond NAMEDATALEN - 1 bytes
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Upper bound for a column type expression
pub const MAX_TYPE_EXPR_LEN: usize = 128;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

fn type_expr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_ ()\[\],.]+$").expect("static regex"))
}

/// A validated table or column name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Validate a raw name
    pub fn parse(raw: &str) -> GatewayResult<Self> {
        if raw.is_empty() || raw.len() > MAX_IDENTIFIER_LEN || !identifier_pattern().is_match(raw) {
            return Err(GatewayError::InvalidIdentifier(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// A name read back from the catalog. It already names an existing
    /// relation, so it skips the allow-list; quoting still escapes it.
    pub fn from_catalog(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The name as supplied
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as it appears in statement text
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0.replace('"', "\"\""))
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted())
    }
}

/// A schema-qualified table reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Ident,
    pub table: Ident,
}

impl TableRef {
    pub fn new(schema: &Ident, table: &str) -> GatewayResult<Self> {
        Ok(Self {
            schema: schema.clone(),
            table: Ident::parse(table)?,
        })
    }

    pub fn from_catalog(schema: &Ident, table: &str) -> Self {
        Self {
            schema: schema.clone(),
            table: Ident::from_catalog(table),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// A column type expression such as `VARCHAR(50)` or `NUMERIC(10, 2)`.
///
/// Passed to the engine as written once it clears the allow-list: no
/// quotes, no statement separators, no comments, commas only inside
/// parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr(String);

impl TypeExpr {
    pub fn parse(raw: &str) -> GatewayResult<Self> {
        let trimmed = raw.trim();
        let reject = || GatewayError::InvalidTypeExpression(raw.to_string());

        if trimmed.is_empty() || trimmed.len() > MAX_TYPE_EXPR_LEN {
            return Err(reject());
        }
        if !type_expr_pattern().is_match(trimmed) {
            return Err(reject());
        }

        let mut depth: usize = 0;
        for c in trimmed.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.checked_sub(1).ok_or_else(reject)?,
                ',' if depth == 0 => return Err(reject()),
                _ => {}
            }
        }
        if depth != 0 {
            return Err(reject());
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
