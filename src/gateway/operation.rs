//! Unified Operation Model
//!
//! Every gateway operation as one tagged enum, so the HTTP routes, the
//! unified endpoint and `tablegate exec` all dispatch through the same
//! code path.

use serde::{Deserialize, Serialize};

use super::errors::GatewayResult;
use super::executor::Record;
use super::request::ColumnMap;
use super::service::TableGateway;
use super::summary::CatalogSnapshot;

/// All gateway operations, tagged by `op`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Operation {
    // Catalog
    ListTables,
    ListColumns {
        table_name: String,
    },
    /// Tables and columns; `counts` adds row counts
    Summary {
        #[serde(default)]
        counts: bool,
    },
    /// Tables, columns and row counts
    SummaryWithCounts,

    // Tables
    CreateTable {
        table_name: String,
        columns: ColumnMap,
    },
    DropTable {
        table_name: String,
    },
    RenameTable {
        old_table_name: String,
        new_table_name: String,
    },

    // Columns
    AddColumns {
        table_name: String,
        columns: ColumnMap,
    },
    DropColumns {
        table_name: String,
        columns: Vec<String>,
    },
    RenameColumns {
        table_name: String,
        renames: ColumnMap,
    },

    // Rows
    Select {
        table_name: String,
    },
    Count {
        table_name: String,
    },
    Insert {
        table_name: String,
        values: ColumnMap,
    },
    /// Several records in one transaction
    InsertRows {
        table_name: String,
        rows: Vec<ColumnMap>,
    },
    Delete {
        table_name: String,
        conditions: ColumnMap,
    },
    Update {
        table_name: String,
        conditions: ColumnMap,
        updates: ColumnMap,
    },
}

impl Operation {
    /// The table this operation targets, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::ListTables | Self::Summary { .. } | Self::SummaryWithCounts => None,
            Self::RenameTable { old_table_name, .. } => Some(old_table_name),
            Self::ListColumns { table_name }
            | Self::CreateTable { table_name, .. }
            | Self::DropTable { table_name }
            | Self::AddColumns { table_name, .. }
            | Self::DropColumns { table_name, .. }
            | Self::RenameColumns { table_name, .. }
            | Self::Select { table_name }
            | Self::Count { table_name }
            | Self::Insert { table_name, .. }
            | Self::InsertRows { table_name, .. }
            | Self::Delete { table_name, .. }
            | Self::Update { table_name, .. } => Some(table_name),
        }
    }

    /// Operation name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListTables => "list_tables",
            Self::ListColumns { .. } => "list_columns",
            Self::Summary { .. } => "summary",
            Self::SummaryWithCounts => "summary_with_counts",
            Self::CreateTable { .. } => "create_table",
            Self::DropTable { .. } => "drop_table",
            Self::RenameTable { .. } => "rename_table",
            Self::AddColumns { .. } => "add_columns",
            Self::DropColumns { .. } => "drop_columns",
            Self::RenameColumns { .. } => "rename_columns",
            Self::Select { .. } => "select",
            Self::Count { .. } => "count",
            Self::Insert { .. } => "insert",
            Self::InsertRows { .. } => "insert_rows",
            Self::Delete { .. } => "delete",
            Self::Update { .. } => "update",
        }
    }

    /// Whether the operation can change the database
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::ListTables
                | Self::ListColumns { .. }
                | Self::Summary { .. }
                | Self::SummaryWithCounts
                | Self::Select { .. }
                | Self::Count { .. }
        )
    }

    /// Run the operation against `gateway`
    pub async fn dispatch(self, gateway: &TableGateway) -> GatewayResult<OperationOutput> {
        let output = match self {
            Self::ListTables => {
                let tables = gateway.list_tables().await?;
                OperationOutput::Tables {
                    count: tables.len(),
                    tables,
                }
            }
            Self::ListColumns { table_name } => {
                let columns = gateway.list_columns(&table_name).await?;
                OperationOutput::Columns {
                    table_name,
                    columns,
                }
            }
            Self::Summary { counts } => OperationOutput::Summary {
                tables_summary: gateway.summarize(counts).await?,
            },
            Self::SummaryWithCounts => OperationOutput::Summary {
                tables_summary: gateway.summarize(true).await?,
            },
            Self::CreateTable {
                table_name,
                columns,
            } => {
                gateway.create_table(&table_name, &columns).await?;
                OperationOutput::message(format!("Table '{}' created successfully", table_name))
            }
            Self::DropTable { table_name } => {
                gateway.drop_table(&table_name).await?;
                OperationOutput::message(format!("Table '{}' deleted successfully", table_name))
            }
            Self::RenameTable {
                old_table_name,
                new_table_name,
            } => {
                gateway.rename_table(&old_table_name, &new_table_name).await?;
                OperationOutput::message(format!(
                    "Table '{}' renamed to '{}' successfully",
                    old_table_name, new_table_name
                ))
            }
            Self::AddColumns {
                table_name,
                columns,
            } => {
                gateway.add_columns(&table_name, &columns).await?;
                let names = columns.keys().collect::<Vec<_>>().join(", ");
                OperationOutput::message(format!(
                    "Columns {} added to table '{}' successfully",
                    names, table_name
                ))
            }
            Self::DropColumns {
                table_name,
                columns,
            } => {
                gateway.drop_columns(&table_name, &columns).await?;
                OperationOutput::message(format!(
                    "Columns deleted successfully from table '{}'",
                    table_name
                ))
            }
            Self::RenameColumns {
                table_name,
                renames,
            } => {
                gateway.rename_columns(&table_name, &renames).await?;
                OperationOutput::message(format!(
                    "Columns in table '{}' renamed successfully",
                    table_name
                ))
            }
            Self::Select { table_name } => {
                let data = gateway.select_all(&table_name).await?;
                OperationOutput::Data { table_name, data }
            }
            Self::Count { table_name } => {
                let count = gateway.count(&table_name).await?;
                OperationOutput::Count { table_name, count }
            }
            Self::Insert { table_name, values } => {
                gateway.insert(&table_name, &values).await?;
                OperationOutput::message(format!(
                    "Data added to the table {} successfully",
                    table_name
                ))
            }
            Self::InsertRows { table_name, rows } => {
                let rows_affected = gateway.insert_rows(&table_name, &rows).await?;
                OperationOutput::RowsAffected {
                    message: format!("Data added to the table {} successfully", table_name),
                    rows_affected,
                }
            }
            Self::Delete {
                table_name,
                conditions,
            } => {
                let rows_affected = gateway.delete(&table_name, &conditions).await?;
                OperationOutput::RowsAffected {
                    message: format!("Data deleted from the table {} successfully", table_name),
                    rows_affected,
                }
            }
            Self::Update {
                table_name,
                conditions,
                updates,
            } => {
                let rows_affected = gateway.update(&table_name, &conditions, &updates).await?;
                OperationOutput::RowsAffected {
                    message: format!("Data in the table '{}' updated successfully", table_name),
                    rows_affected,
                }
            }
        };
        Ok(output)
    }
}

/// Successful result of an operation, serialized as the response body
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Message {
        message: String,
    },
    RowsAffected {
        message: String,
        rows_affected: u64,
    },
    Tables {
        tables: Vec<String>,
        count: usize,
    },
    Columns {
        table_name: String,
        columns: Vec<String>,
    },
    Data {
        table_name: String,
        data: Vec<Record>,
    },
    Count {
        table_name: String,
        count: i64,
    },
    Summary {
        tables_summary: CatalogSnapshot,
    },
}

impl OperationOutput {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}
