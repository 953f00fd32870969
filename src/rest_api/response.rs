//! # Response Formatting
//!
//! Response bodies for the REST routes. Operation results render as the
//! bare [`OperationOutput`] object.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::gateway::OperationOutput;

impl IntoResponse for OperationOutput {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// `?counts=true` on the summary route
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryParams {
    #[serde(default)]
    pub counts: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_columns_output_serialization() {
        let output = OperationOutput::Columns {
            table_name: "orders".into(),
            columns: vec!["id".into(), "city".into()],
        };
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({"table_name": "orders", "columns": ["id", "city"]})
        );
    }
}
