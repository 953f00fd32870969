//! # Summary Aggregator
//!
//! Tables, their columns and optionally their row counts, gathered in one
//! read-only session. This is an N+1 fan-out (1 + T queries, 1 + 2T with
//! counts) with no pagination. Other requests may commit in between, so the
//! snapshot is best-effort consistent.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::builder::StatementBuilder;
use super::catalog::CatalogInspector;
use super::errors::{GatewayError, GatewayResult};
use super::executor::{AccessMode, Executor};

/// One table in a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub columns: Vec<String>,
    /// Present only when counts were requested
    pub number_of_entries: Option<u64>,
}

/// Point-in-time view of the catalog, rebuilt on every call.
///
/// Serializes as a JSON object keyed by table name in catalog order. Each
/// value is the column list, or `{columns, number_of_entries}` when counts
/// were collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub tables: Vec<TableSummary>,
}

impl CatalogSnapshot {
    pub fn get(&self, table: &str) -> Option<&TableSummary> {
        self.tables.iter().find(|t| t.name == table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[derive(Serialize)]
struct CountedEntry<'a> {
    columns: &'a [String],
    number_of_entries: u64,
}

impl Serialize for CatalogSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for table in &self.tables {
            match table.number_of_entries {
                Some(count) => map.serialize_entry(
                    &table.name,
                    &CountedEntry {
                        columns: &table.columns,
                        number_of_entries: count,
                    },
                )?,
                None => map.serialize_entry(&table.name, &table.columns)?,
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone)]
pub struct SummaryAggregator {
    executor: Executor,
    builder: StatementBuilder,
    catalog: CatalogInspector,
}

impl SummaryAggregator {
    pub fn new(executor: Executor, builder: StatementBuilder, catalog: CatalogInspector) -> Self {
        Self {
            executor,
            builder,
            catalog,
        }
    }

    pub async fn summarize(&self, include_counts: bool) -> GatewayResult<CatalogSnapshot> {
        let mut session = self.executor.begin(AccessMode::ReadOnly).await?;

        let names = self.catalog.list_tables_in(&mut session).await?;
        let mut tables = Vec::with_capacity(names.len());

        for name in names {
            let columns = self.catalog.list_columns_in(&mut session, &name).await?;

            let number_of_entries = if include_counts {
                let statement = self.builder.count_catalog_table(&name);
                let count = session
                    .run(&statement)
                    .await?
                    .scalar()
                    .ok_or_else(|| GatewayError::Engine("COUNT returned no scalar".to_string()))?;
                Some(count.max(0) as u64)
            } else {
                None
            };

            tables.push(TableSummary {
                name,
                columns,
                number_of_entries,
            });
        }

        session.commit().await?;
        tracing::debug!(tables = tables.len(), include_counts, "catalog summarized");
        Ok(CatalogSnapshot { tables })
    }
}
