//! # Table Gateway
//!
//! Catalog and row operations against one Postgres schema. Requests are
//! validated and built into parameterized statements, then executed in a
//! single transaction per operation.

pub mod builder;
pub mod catalog;
pub mod errors;
pub mod executor;
pub mod identifier;
pub mod operation;
pub mod request;
pub mod service;
pub mod summary;

pub use builder::{BindValue, ColumnTypes, ResultShape, RowWrite, Statement, StatementBuilder};
pub use catalog::CatalogInspector;
pub use errors::{GatewayError, GatewayResult};
pub use executor::{AccessMode, Executor, PoolSettings, Record, Session, StatementOutcome};
pub use identifier::{Ident, TableRef, TypeExpr};
pub use operation::{Operation, OperationOutput};
pub use request::{
    AddColumnsRequest, ColumnMap, CreateTableRequest, DropColumnsRequest, RenameTableRequest,
    UpdateRequest,
};
pub use service::TableGateway;
pub use summary::{CatalogSnapshot, SummaryAggregator, TableSummary};
