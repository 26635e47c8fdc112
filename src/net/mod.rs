//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles the auth endpoints, `authorizer` owns the shared token
//! header, `rest` is the authorized client used by dashboards, and `types`
//! defines the wire schema.

pub mod api;
pub mod authorizer;
pub mod rest;
pub mod types;
