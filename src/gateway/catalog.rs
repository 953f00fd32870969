//! # Catalog Inspector
//!
//! Read-only queries against `information_schema`. A table that does not
//! exist has no columns; that is an empty result, not an error.

use super::builder::StatementBuilder;
use super::errors::{GatewayError, GatewayResult};
use super::executor::{AccessMode, Executor, Session};

#[derive(Debug, Clone)]
pub struct CatalogInspector {
    executor: Executor,
    builder: StatementBuilder,
}

impl CatalogInspector {
    pub fn new(executor: Executor, builder: StatementBuilder) -> Self {
        Self { executor, builder }
    }

    /// Base tables of the working schema, engine order
    pub async fn list_tables(&self) -> GatewayResult<Vec<String>> {
        let mut session = self.executor.begin(AccessMode::ReadOnly).await?;
        let tables = self.list_tables_in(&mut session).await?;
        session.commit().await?;
        Ok(tables)
    }

    /// Column names of `table`, engine order
    pub async fn list_columns(&self, table: &str) -> GatewayResult<Vec<String>> {
        let mut session = self.executor.begin(AccessMode::ReadOnly).await?;
        let columns = self.list_columns_in(&mut session, table).await?;
        session.commit().await?;
        Ok(columns)
    }

    pub(crate) async fn list_tables_in(&self, session: &mut Session) -> GatewayResult<Vec<String>> {
        names(session.run(&self.builder.list_tables()).await?.into_names())
    }

    pub(crate) async fn list_columns_in(
        &self,
        session: &mut Session,
        table: &str,
    ) -> GatewayResult<Vec<String>> {
        names(session.run(&self.builder.list_columns(table)).await?.into_names())
    }
}

fn names(outcome: Option<Vec<String>>) -> GatewayResult<Vec<String>> {
    outcome.ok_or_else(|| GatewayError::Engine("catalog query returned no name list".to_string()))
}
