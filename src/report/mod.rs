//! Request pipeline guard and error-report delivery
//!
//! One middleware wraps every inbound request. On the success path it is
//! transparent. When a handler finalizes an unhandled failure as a 500, the
//! guard picks the failure details out of the response extensions and, if a
//! destination is configured, schedules a single detached POST. Delivery is
//! at-most-once: any failure in the reporting path is logged and dropped,
//! and never touches the client-visible response.

pub mod context;
pub mod model;
pub mod stack;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{FromRequestParts, RawPathParams, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::http::AppState;
use context::RequestContext;
use model::{ErrorReport, FailureDetails};

/// Bound on one outbound report attempt.
pub const REPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Pipeline guard middleware. Applied over the whole router, after routing,
/// so path captures are visible.
pub async fn guard(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    // Copy request-derived values out now; the request context is gone once
    // the downstream handler consumes it.
    let (mut parts, body) = req.into_parts();
    let route_board = RawPathParams::from_request_parts(&mut parts, &())
        .await
        .ok()
        .and_then(|params| {
            params
                .iter()
                .find(|(name, _)| *name == "boardId")
                .map(|(_, value)| value.to_owned())
        });
    let req = Request::from_parts(parts, body);
    let ctx = RequestContext::capture(route_board, &req, &state.config);

    let mut response = next.run(req).await;

    let Some(details) = response.extensions_mut().remove::<FailureDetails>() else {
        return response;
    };

    if let Some(endpoint) = state.config.report_url.clone() {
        let report = ErrorReport::build(ctx, &details);
        deliver(state.http.clone(), endpoint, report);
    } else {
        tracing::debug!("no report destination configured, skipping error report");
    }

    response
}

/// Fire-and-forget delivery: one POST, short timeout, outcome logged and
/// discarded. The request path never awaits this task.
fn deliver(client: reqwest::Client, endpoint: String, report: ErrorReport) {
    tokio::spawn(async move {
        let sent = client
            .post(&endpoint)
            .timeout(REPORT_TIMEOUT)
            .json(&report)
            .send()
            .await;

        match sent {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(endpoint = %endpoint, "error report delivered");
            }
            Ok(response) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    status = %response.status(),
                    "error report rejected"
                );
            }
            Err(err) => {
                tracing::warn!(endpoint = %endpoint, error = %err, "error report delivery failed");
            }
        }
    });
}
