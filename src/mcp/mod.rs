//! MCP (Model Context Protocol) server for the FAQ tools.
//!
//! Lets external agents call `search_faq`, `search_detailed_faq` and
//! `reformulate_query` directly, without the built-in agent loop.
//!
//! # Feature Gate
//!
//! This module requires the `mcp` feature flag.
//!
//! ```text
//! MCP client
//!   ↓ tools/call
//! FaqMcpServer
//!   ↓ spawn_blocking
//! FaqTools → DocumentStore
//! ```

pub mod params;
pub mod server;
pub mod transport;

pub use params::{DetailedSearchParams, ReformulateParams, SearchParams};
pub use server::FaqMcpServer;
pub use transport::{serve_http, serve_stdio};
