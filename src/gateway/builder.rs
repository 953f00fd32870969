//! # Statement Builder
//!
//! Pure translation of structured requests into parameterized statements.
//! No I/O happens here.
//!
//! Identifiers are validated and quoted (see [`super::identifier`]). Values
//! never enter statement text. Row writes are validated up front into a
//! [`RowWrite`], then bound against the target's column types once those
//! have been read from the catalog: each value is sent as text and cast
//! `$n::text::<column type>`, which runs the type's input function, the same
//! conversion an untyped SQL literal gets.

use super::errors::{GatewayError, GatewayResult};
use super::identifier::{Ident, TableRef, TypeExpr};
use super::request::ColumnMap;

/// A bound statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
}

/// What the executor should read back from a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// DDL/DML, report rows affected
    Command,
    /// Row-producing query
    Rows,
    /// Single `BIGINT` scalar
    Scalar,
    /// Single text column, collected into a list
    Names,
    /// Two text columns, collected into pairs
    Pairs,
}

/// A statement ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<BindValue>,
    pub shape: ResultShape,
}

impl Statement {
    fn command(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
            shape: ResultShape::Command,
        }
    }

    fn with_params(sql: String, params: Vec<BindValue>, shape: ResultShape) -> Self {
        Self { sql, params, shape }
    }
}

/// Builds statements against one schema
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    schema: Ident,
}

impl StatementBuilder {
    pub fn new(schema: Ident) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Ident {
        &self.schema
    }

    fn table(&self, name: &str) -> GatewayResult<TableRef> {
        TableRef::new(&self.schema, name)
    }

    // ==================
    // Catalog
    // ==================

    /// Base tables in the working schema, engine order
    pub fn list_tables(&self) -> Statement {
        Statement::with_params(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = $1 AND table_type = 'BASE TABLE'"
                .to_string(),
            vec![BindValue::Text(self.schema.as_str().to_string())],
            ResultShape::Names,
        )
    }

    /// Columns of one table, engine order. The name is bound, so any
    /// string is acceptable and an unknown table simply yields no rows.
    pub fn list_columns(&self, table: &str) -> Statement {
        Statement::with_params(
            "SELECT column_name::text FROM information_schema.columns \
             WHERE table_schema = $1 AND table_name = $2"
                .to_string(),
            vec![
                BindValue::Text(self.schema.as_str().to_string()),
                BindValue::Text(table.to_string()),
            ],
            ResultShape::Names,
        )
    }

    // ==================
    // Tables
    // ==================

    /// `CREATE TABLE IF NOT EXISTS`. An empty column map is passed through.
    pub fn create_table(&self, table: &str, columns: &ColumnMap) -> GatewayResult<Statement> {
        let table = self.table(table)?;
        let definitions = column_definitions(columns)?
            .into_iter()
            .map(|(name, ty)| format!("{} {}", name, ty))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Statement::command(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            table, definitions
        )))
    }

    pub fn drop_table(&self, table: &str) -> GatewayResult<Statement> {
        let table = self.table(table)?;
        Ok(Statement::command(format!(
            "DROP TABLE IF EXISTS {} CASCADE",
            table
        )))
    }

    pub fn rename_table(&self, old: &str, new: &str) -> GatewayResult<Statement> {
        let old = self.table(old)?;
        let new = Ident::parse(new)?;
        Ok(Statement::command(format!(
            "ALTER TABLE {} RENAME TO {}",
            old, new
        )))
    }

    // ==================
    // Columns
    // ==================

    /// All columns in one statement
    pub fn add_columns(&self, table: &str, columns: &ColumnMap) -> GatewayResult<Statement> {
        let table = self.table(table)?;
        if columns.is_empty() {
            return Err(GatewayError::EmptyPayload("columns"));
        }
        let clauses = column_definitions(columns)?
            .into_iter()
            .map(|(name, ty)| format!("ADD COLUMN {} {}", name, ty))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Statement::command(format!("ALTER TABLE {} {}", table, clauses)))
    }

    /// One statement per column, to run inside one transaction
    pub fn drop_columns(&self, table: &str, columns: &[String]) -> GatewayResult<Vec<Statement>> {
        let table = self.table(table)?;
        if columns.is_empty() {
            return Err(GatewayError::EmptyPayload("columns"));
        }
        columns
            .iter()
            .map(|column| {
                let column = Ident::parse(column)?;
                Ok(Statement::command(format!(
                    "ALTER TABLE {} DROP COLUMN {}",
                    table, column
                )))
            })
            .collect()
    }

    /// One statement per pair, in payload order
    pub fn rename_columns(&self, table: &str, renames: &ColumnMap) -> GatewayResult<Vec<Statement>> {
        let table = self.table(table)?;
        if renames.is_empty() {
            return Err(GatewayError::EmptyPayload("renames"));
        }
        renames
            .iter()
            .map(|(old, new)| {
                let old = Ident::parse(old)?;
                let new = Ident::parse(new)?;
                Ok(Statement::command(format!(
                    "ALTER TABLE {} RENAME COLUMN {} TO {}",
                    table, old, new
                )))
            })
            .collect()
    }

    // ==================
    // Rows
    // ==================

    pub fn insert(&self, table: &str, values: &ColumnMap) -> GatewayResult<RowWrite> {
        let table = self.table(table)?;
        if values.is_empty() {
            return Err(GatewayError::EmptyPayload("values"));
        }
        Ok(RowWrite {
            table,
            kind: WriteKind::Insert {
                values: entries(values)?,
            },
        })
    }

    /// One insert per record, all against the same table
    pub fn insert_rows(&self, table: &str, rows: &[ColumnMap]) -> GatewayResult<Vec<RowWrite>> {
        if rows.is_empty() {
            self.table(table)?;
            return Err(GatewayError::EmptyPayload("rows"));
        }
        rows.iter().map(|values| self.insert(table, values)).collect()
    }

    /// Rows affected is read back so the caller can tell "no match" apart
    pub fn update(
        &self,
        table: &str,
        conditions: &ColumnMap,
        updates: &ColumnMap,
    ) -> GatewayResult<RowWrite> {
        let table = self.table(table)?;
        if conditions.is_empty() {
            return Err(GatewayError::EmptyPayload("conditions"));
        }
        if updates.is_empty() {
            return Err(GatewayError::EmptyPayload("updates"));
        }
        Ok(RowWrite {
            table,
            kind: WriteKind::Update {
                updates: entries(updates)?,
                conditions: entries(conditions)?,
            },
        })
    }

    pub fn delete(&self, table: &str, conditions: &ColumnMap) -> GatewayResult<RowWrite> {
        let table = self.table(table)?;
        if conditions.is_empty() {
            return Err(GatewayError::EmptyPayload("conditions"));
        }
        Ok(RowWrite {
            table,
            kind: WriteKind::Delete {
                conditions: entries(conditions)?,
            },
        })
    }

    /// Column name and unmodified type name of every live column of a
    /// write target. The relation is resolved by the engine from its
    /// quoted name, so a missing table is an engine fault.
    pub fn column_types(&self, table: &TableRef) -> Statement {
        Statement::with_params(
            "SELECT a.attname::text, format_type(a.atttypid, NULL) \
             FROM pg_catalog.pg_attribute a \
             WHERE a.attrelid = $1::regclass AND a.attnum > 0 AND NOT a.attisdropped \
             ORDER BY a.attnum"
                .to_string(),
            vec![BindValue::Text(table.to_string())],
            ResultShape::Pairs,
        )
    }

    pub fn select_all(&self, table: &str) -> GatewayResult<Statement> {
        let table = self.table(table)?;
        Ok(Statement::with_params(
            format!("SELECT * FROM {}", table),
            Vec::new(),
            ResultShape::Rows,
        ))
    }

    pub fn count(&self, table: &str) -> GatewayResult<Statement> {
        let table = self.table(table)?;
        Ok(Statement::with_params(
            format!("SELECT COUNT(*) FROM {}", table),
            Vec::new(),
            ResultShape::Scalar,
        ))
    }

    /// Count for a table name taken from [`Self::list_tables`] output
    pub fn count_catalog_table(&self, table: &str) -> Statement {
        let table = TableRef::from_catalog(&self.schema, table);
        Statement::with_params(
            format!("SELECT COUNT(*) FROM {}", table),
            Vec::new(),
            ResultShape::Scalar,
        )
    }
}

fn column_definitions(columns: &ColumnMap) -> GatewayResult<Vec<(Ident, TypeExpr)>> {
    columns
        .iter()
        .map(|(name, ty)| Ok((Ident::parse(name)?, TypeExpr::parse(ty)?)))
        .collect()
}

fn entries(map: &ColumnMap) -> GatewayResult<Vec<(Ident, String)>> {
    map.iter()
        .map(|(column, value)| Ok((Ident::parse(column)?, value.to_string())))
        .collect()
}

/// Column name to type name, as `format_type` spells it. Type names come
/// from the engine already quoted where needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypes(Vec<(String, String)>);

impl ColumnTypes {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, ty)| ty.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(String, String)>> for ColumnTypes {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

/// A validated insert, update or delete waiting for its target's column
/// types
#[derive(Debug, Clone, PartialEq)]
pub struct RowWrite {
    table: TableRef,
    kind: WriteKind,
}

#[derive(Debug, Clone, PartialEq)]
enum WriteKind {
    Insert {
        values: Vec<(Ident, String)>,
    },
    Update {
        updates: Vec<(Ident, String)>,
        conditions: Vec<(Ident, String)>,
    },
    Delete {
        conditions: Vec<(Ident, String)>,
    },
}

impl RowWrite {
    pub fn table(&self) -> &TableRef {
        &self.table
    }

    /// Final statement. A column missing from `types` keeps a plain text
    /// parameter and the engine reports the unknown column.
    pub fn bind(&self, types: &ColumnTypes) -> Statement {
        let mut params = Params::new(types);
        let sql = match &self.kind {
            WriteKind::Insert { values } => {
                let columns = values
                    .iter()
                    .map(|(column, _)| column.quoted())
                    .collect::<Vec<_>>()
                    .join(", ");
                let placeholders = values
                    .iter()
                    .map(|(column, value)| params.push(column, value))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    self.table, columns, placeholders
                )
            }
            WriteKind::Update {
                updates,
                conditions,
            } => {
                let assignments = updates
                    .iter()
                    .map(|(column, value)| format!("{} = {}", column, params.push(column, value)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "UPDATE {} SET {} WHERE {}",
                    self.table,
                    assignments,
                    params.predicate(conditions)
                )
            }
            WriteKind::Delete { conditions } => format!(
                "DELETE FROM {} WHERE {}",
                self.table,
                params.predicate(conditions)
            ),
        };
        Statement::with_params(sql, params.values, ResultShape::Command)
    }
}

/// Numbered text parameters cast through their column's type
struct Params<'a> {
    types: &'a ColumnTypes,
    values: Vec<BindValue>,
}

impl<'a> Params<'a> {
    fn new(types: &'a ColumnTypes) -> Self {
        Self {
            types,
            values: Vec::new(),
        }
    }

    fn push(&mut self, column: &Ident, value: &str) -> String {
        self.values.push(BindValue::Text(value.to_string()));
        let n = self.values.len();
        match self.types.get(column.as_str()) {
            Some(ty) => format!("${}::text::{}", n, ty),
            None => format!("${}::text", n),
        }
    }

    /// `"a" = $1::text::integer AND "b" = $2::text::text`
    fn predicate(&mut self, conditions: &[(Ident, String)]) -> String {
        conditions
            .iter()
            .map(|(column, value)| format!("{} = {}", column, self.push(column, value)))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}
