//! HTTP and realtime server implementation
//!
//! This module provides the HTTP server, routing, and the WebSocket
//! tracking channel.

// Submodules
pub mod routes;

// New modular server components
pub mod builder;
pub mod realtime;
pub mod server;
pub mod state;

pub use state::AppState;
