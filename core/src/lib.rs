//! Blocking HTTP client for the conductor orchestration and billing API.
//!
//! # Overview
//! One method per remote endpoint — agents, DAGs, executions, tools, costs,
//! billing, tenant administration — each a direct pass-through to the HTTP
//! transport: build URL and query, attach an optional JSON body, block until
//! the response or timeout, return decoded JSON. No retries, no caching, no
//! pagination traversal; the orchestration engine itself lives on the server.
//!
//! # Design
//! - The wire contract is data, not code: a table of [`Endpoint`] descriptors
//!   in [`endpoints`] drives one generic dispatch routine in
//!   [`client::ConductorClient`].
//! - The pure halves (request building, response decoding) live on the
//!   descriptor and never touch the network, so every endpoint's wire shape
//!   is testable without a server.
//! - Responses are untyped [`serde_json::Value`]; bodies are whatever the
//!   caller serializes. The server's schemas are not modeled here.
//!
//! # Example
//! ```no_run
//! use conductor_core::{ClientConfig, ConductorClient};
//!
//! let config = ClientConfig::new("https://api.example.com").with_token("secret");
//! let client = ConductorClient::new(config);
//! let agents = client.list_agents(Some("active"), None, Some(10), None)?;
//! # Ok::<(), conductor_core::ApiError>(())
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod http;

pub use client::{ClientConfig, ConductorClient};
pub use error::ApiError;
pub use http::{Endpoint, HttpMethod, HttpRequest, HttpResponse, ResponseMode};
