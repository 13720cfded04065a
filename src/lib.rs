//! boardrelay: minimal CRUD backend with an error-reporting sidecar
//!
//! Exposes a single-table CRUD API over PostgreSQL and forwards any
//! unhandled failure to a configurable remote endpoint, tagged with a
//! best-effort board identifier.

pub mod config;
pub mod db;
pub mod http;
pub mod report;

pub use config::Config;
pub use http::{app, run_server, AppState};
