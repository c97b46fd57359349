//! HTTP API: routing, request validation and response mapping for the
//! expense ledger.

pub mod app;
