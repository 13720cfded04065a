//! Error report payload
//!
//! Ephemeral, built per failure; lives exactly as long as one outbound POST
//! attempt. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::context::RequestContext;
use super::stack;

/// What the response-finalization path records about an unhandled failure.
///
/// Inserted into the response extensions by the 500 conversion and consumed
/// by the pipeline guard; never serialized to the client.
#[derive(Debug, Clone)]
pub struct FailureDetails {
    pub message: String,
    pub kind: &'static str,
    /// Debug-formatted error chain, including a backtrace when captured.
    pub trace: Option<String>,
    /// Display of the first error source, if any.
    pub source_message: Option<String>,
}

/// Outbound error report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    pub message: String,
    pub exception_kind: String,
    pub request_path: String,
    pub request_method: String,
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<ErrorReport>>,
}

impl ErrorReport {
    /// Assemble a report from the captured request context and the failure
    /// the guard observed.
    pub fn build(ctx: RequestContext, details: &FailureDetails) -> Self {
        let location = details.trace.as_deref().and_then(stack::parse);

        // One nested level from the first error source, matching the wire
        // shape's single inner report.
        let inner = details.source_message.as_ref().map(|message| {
            Box::new(ErrorReport {
                board_id: ctx.board_id.clone(),
                timestamp: Utc::now(),
                source_file: None,
                source_line: None,
                stack_trace: None,
                message: message.clone(),
                exception_kind: "source".to_owned(),
                request_path: ctx.path.clone(),
                request_method: ctx.method.clone(),
                user_agent: ctx.user_agent.clone(),
                inner: None,
            })
        });

        ErrorReport {
            board_id: ctx.board_id,
            timestamp: Utc::now(),
            source_file: location.as_ref().map(|l| l.file.clone()),
            source_line: location.map(|l| l.line),
            stack_trace: details.trace.clone(),
            message: details.message.clone(),
            exception_kind: details.kind.to_owned(),
            request_path: ctx.path,
            request_method: ctx.method,
            user_agent: ctx.user_agent,
            inner,
        }
    }
}
