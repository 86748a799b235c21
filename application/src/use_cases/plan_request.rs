//! Plan request handler
//!
//! The request/response adapter over [`ExecutionPlanGenerator`]: a
//! [`PlanRequest`] comes in, a [`PlanResponse`] always goes out. Failures
//! are folded into the response with an HTTP-equivalent status rather than
//! returned as errors, so transports can forward the result as-is.

use crate::use_cases::execution_plan::{ExecutionPlanGenerator, ProvidedParameters};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toolgraph_domain::{DomainError, ErrorKind, ExecutionPlan, ToolId};
use tracing::{debug, warn};

/// Incoming execution-plan request
///
/// Wire format: `{toolIds: [string], providedParameters: {string: any}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub tool_ids: Vec<ToolId>,
    #[serde(default)]
    pub provided_parameters: ProvidedParameters,
}

impl PlanRequest {
    pub fn new(tool_ids: impl IntoIterator<Item = impl Into<ToolId>>) -> Self {
        Self {
            tool_ids: tool_ids.into_iter().map(Into::into).collect(),
            provided_parameters: ProvidedParameters::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.provided_parameters.insert(name.into(), value.into());
        self
    }
}

/// Why a request produced no plan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFailure {
    pub error_kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_ids: Vec<ToolId>,
}

/// Outgoing response: a plan with status 200, or a failure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<ExecutionPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PlanFailure>,
}

impl PlanResponse {
    pub fn ok(plan: ExecutionPlan) -> Self {
        Self {
            status: 200,
            plan: Some(plan),
            error: None,
        }
    }

    pub fn failed(error: &DomainError) -> Self {
        Self::failure(error.status_code(), error.kind(), error.to_string(), error.tool_ids())
    }

    fn failure(status: u16, kind: ErrorKind, message: String, tool_ids: Vec<ToolId>) -> Self {
        Self {
            status,
            plan: None,
            error: Some(PlanFailure {
                error_kind: kind.as_str().to_string(),
                message,
                tool_ids,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.plan.is_some()
    }
}

pub struct PlanRequestHandler {
    generator: Arc<ExecutionPlanGenerator>,
}

impl PlanRequestHandler {
    pub fn new(generator: Arc<ExecutionPlanGenerator>) -> Self {
        Self { generator }
    }

    pub fn handle(&self, request: &PlanRequest) -> PlanResponse {
        debug!(tools = request.tool_ids.len(), "Handling plan request");
        match self
            .generator
            .generate_execution_plan(&request.tool_ids, &request.provided_parameters)
        {
            Ok(plan) => PlanResponse::ok(plan.as_ref().clone()),
            Err(e) => {
                warn!(status = e.status_code(), error = %e, "Plan request failed");
                PlanResponse::failed(&e)
            }
        }
    }

    /// Decode a raw JSON request, then [`handle`](Self::handle) it. A
    /// malformed body is a 400 validation failure.
    pub fn handle_json(&self, body: serde_json::Value) -> PlanResponse {
        match serde_json::from_value::<PlanRequest>(body) {
            Ok(request) => self.handle(&request),
            Err(e) => PlanResponse::failure(
                400,
                ErrorKind::Validation,
                format!("Malformed plan request: {}", e),
                Vec::new(),
            ),
        }
    }
}
