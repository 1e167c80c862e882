//! Waypoint is an HTTP routing gateway with correlation tracing.
//!
//! It receives incoming HTTP requests, matches them against an ordered route
//! table by path prefix, rewrites the matched path, and forwards the request
//! to a logical backend resolved to a concrete endpoint. Every exchange is
//! wrapped in a two-phase filter chain that establishes a `correlation-id`
//! before the upstream call and guarantees it appears on the response,
//! whatever the outcome of the call.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, health).
//! - [`config`] -- Configuration loading and validation via the
//!   [`ConfigSource`](config::ConfigSource) trait. Loaded once at startup;
//!   the route table is immutable for the process lifetime.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`filter`] -- The fixed-order request/response filter chain and the
//!   correlation identifier manager.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Per-exchange forwarding: header construction and the single
//!   upstream dispatch with timeout.
//! - [`resolve`] -- Logical backend name to endpoint resolution.
//! - [`routing`] -- The ordered route table and the path rewriter.
//! - [`server`] -- Axum server setup, shared application state, HTTP client,
//!   and graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod filter;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod resolve;
pub mod routing;
pub mod server;
