//! HTTP gate: authenticates callers and enforces named policies per route.

pub mod app;
pub mod authn;
pub mod authz;
pub mod config;
pub mod middleware;
