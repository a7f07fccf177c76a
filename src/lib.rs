//! Exam PDF resolver library.
//!
//! This library provides the core functionality for the resolver server,
//! including filename templating, upstream resolution, and the HTTP API,
//! plus a client for the download endpoint.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
