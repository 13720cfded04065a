//! Route handlers organized by resource

pub mod diag;
pub mod entries;
