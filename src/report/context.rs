//! Request context capture and board-id resolution
//!
//! Everything the report needs from the request is copied out *before* the
//! downstream handler consumes it; the guard never revisits the request
//! after delegation.

use axum::extract::Request;
use axum::http::{header, HeaderMap, Uri};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;

/// Fixed hex-id shape looked for in host names and the report URL.
static HEX_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9a-f]{6,32}\b").expect("valid regex"));

/// Request-derived values captured ahead of delegation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub path: String,
    pub method: String,
    pub user_agent: String,
    pub board_id: Option<String>,
}

impl RequestContext {
    pub fn capture(route_board: Option<String>, req: &Request, config: &Config) -> Self {
        let headers = req.headers();
        let board_id = resolve_board_id(
            route_board.as_deref(),
            req.uri(),
            headers,
            config.default_board_id.as_deref(),
            config.report_url.as_deref(),
        );

        Self {
            path: req.uri().path().to_owned(),
            method: req.method().to_string(),
            user_agent: header_str(headers, header::USER_AGENT.as_str())
                .unwrap_or_default()
                .to_owned(),
            board_id,
        }
    }
}

/// Resolve the board identifier, best effort, first match wins:
/// route param, query param, `X-Board-Id` header, configured default,
/// hex id embedded in the host name, hex id embedded in the report URL.
pub fn resolve_board_id(
    route: Option<&str>,
    uri: &Uri,
    headers: &HeaderMap,
    default_id: Option<&str>,
    report_url: Option<&str>,
) -> Option<String> {
    if let Some(board) = route.filter(|v| !v.is_empty()) {
        return Some(board.to_owned());
    }
    if let Some(board) = query_param(uri, "boardId") {
        return Some(board.to_owned());
    }
    if let Some(board) = header_str(headers, "x-board-id").filter(|v| !v.is_empty()) {
        return Some(board.to_owned());
    }
    if let Some(board) = default_id.filter(|v| !v.is_empty()) {
        return Some(board.to_owned());
    }
    if let Some(board) = header_str(headers, header::HOST.as_str()).and_then(find_hex_id) {
        return Some(board.to_owned());
    }
    report_url.and_then(find_hex_id).map(str::to_owned)
}

fn query_param<'a>(uri: &'a Uri, name: &str) -> Option<&'a str> {
    uri.query()?
        .split('&')
        .find_map(|pair| pair.split_once('=').filter(|(key, _)| *key == name))
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn find_hex_id(haystack: &str) -> Option<&str> {
    HEX_ID.find(haystack).map(|m| m.as_str())
}
