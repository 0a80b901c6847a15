//! # FocusHub API Server Library
//!
//! This library provides the request boundary for the FocusHub productivity
//! tracker: it resolves caller identity, invokes the core components, and
//! serializes their results.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Identity resolution
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
