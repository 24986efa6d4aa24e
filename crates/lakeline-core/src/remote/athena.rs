//! Query engine implementation backed by AWS Athena.

use super::{QueryEngine, QueryState};
use async_trait::async_trait;
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::types::{QueryExecutionState, ResultConfiguration};
use aws_sdk_athena::Client;
use lakeline_common::{LakelineError, Result};
use tracing::debug;

/// Athena-backed [`QueryEngine`].
#[derive(Clone)]
pub struct AthenaEngine {
    client: Client,
}

impl AthenaEngine {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl QueryEngine for AthenaEngine {
    async fn start_query(&self, sql: &str, output_location: &str) -> Result<String> {
        let response = self
            .client
            .start_query_execution()
            .query_string(sql)
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(output_location)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| {
                LakelineError::Query(format!("start query: {}", DisplayErrorContext(e)))
            })?;

        response
            .query_execution_id()
            .map(|id| id.to_string())
            .ok_or_else(|| LakelineError::Query("no execution id returned".to_string()))
    }

    async fn query_state(&self, execution_id: &str) -> Result<QueryState> {
        let response = self
            .client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| {
                LakelineError::Query(format!(
                    "get query execution {}: {}",
                    execution_id,
                    DisplayErrorContext(e)
                ))
            })?;

        let status = response
            .query_execution()
            .and_then(|qe| qe.status())
            .ok_or_else(|| {
                LakelineError::Query(format!("no status for execution {}", execution_id))
            })?;

        // Prefer the structured error detail over the bare state change
        // reason when the engine reports one.
        let reason = || {
            status
                .athena_error()
                .and_then(|e| e.error_message())
                .or_else(|| status.state_change_reason())
                .unwrap_or("Unknown")
                .to_string()
        };

        let state = match status.state() {
            Some(&QueryExecutionState::Succeeded) => QueryState::Succeeded,
            Some(&QueryExecutionState::Failed) => QueryState::Failed { reason: reason() },
            Some(&QueryExecutionState::Cancelled) => QueryState::Cancelled { reason: reason() },
            _ => QueryState::Running,
        };

        debug!(execution_id = %execution_id, state = ?state, "Polled query state");
        Ok(state)
    }
}
