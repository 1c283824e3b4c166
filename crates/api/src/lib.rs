//! `assetgate-api` — the HTTP surface over the mutation gateway.
//!
//! Thin by construction: handlers parse the request, pull the session
//! token out of the cookie, and call the gateway. All authentication,
//! authorization, and lifecycle decisions happen behind that call.

pub mod app;
pub mod config;
pub mod cookie;
