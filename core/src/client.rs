//! The blocking API client: configuration, HTTP session, and one method per
//! remote operation.
//!
//! # Design
//! `ConductorClient` owns a `ureq::Agent` for its lifetime; connection reuse
//! is the agent's business. Every public method is a thin wrapper handing its
//! [`Endpoint`](crate::http::Endpoint) descriptor, path arguments, query
//! values, and optional body to one generic `dispatch` routine — build the
//! request, execute it, decode the response. No retries, no caching, no state
//! between calls beyond the configured token.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::endpoints;
use crate::error::ApiError;
use crate::http::{Endpoint, HttpMethod, HttpRequest, HttpResponse};

/// Connection settings for [`ConductorClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, stored without a trailing slash.
    pub base_url: String,
    /// Bearer token attached to every request when present.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with no token and a 30 second timeout.
    ///
    /// A trailing `/` on `base_url` is stripped; the URL is not otherwise
    /// validated — a malformed one fails at request time.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Blocking client for the conductor orchestration and billing API.
///
/// Each method issues one HTTP request and blocks until the response arrives
/// or the configured timeout elapses. Responses come back as untyped
/// [`serde_json::Value`] — this client does not model the server's schemas.
pub struct ConductorClient {
    config: ClientConfig,
    agent: ureq::Agent,
}

impl ConductorClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { config, agent }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replace the bearer token. Takes effect on the next request.
    ///
    /// Requires exclusive access: to rotate the token on a client shared
    /// across threads, wrap the client in your own synchronization.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.token = Some(token.into());
    }

    // --- health ---

    /// Liveness check.
    pub fn health(&self) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::HEALTH, &[], &[], None)
    }

    /// Readiness check.
    pub fn health_ready(&self) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::HEALTH_READY, &[], &[], None)
    }

    // --- auth ---

    /// Info for the user the current token belongs to.
    pub fn current_user(&self) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::CURRENT_USER, &[], &[], None)
    }

    pub fn list_api_keys(&self) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::LIST_API_KEYS, &[], &[], None)
    }

    pub fn create_api_key(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::CREATE_API_KEY, &[], &[], Some(encode_body(body)?))
    }

    pub fn revoke_api_key(&self, id: &str) -> Result<(), ApiError> {
        self.dispatch(&endpoints::REVOKE_API_KEY, &[id], &[], None)?;
        Ok(())
    }

    // --- users ---

    pub fn list_users(&self) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::LIST_USERS, &[], &[], None)
    }

    pub fn get_user(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::GET_USER, &[id], &[], None)
    }

    /// Update a user (role changes and the like).
    pub fn update_user(&self, id: &str, body: &impl Serialize) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::UPDATE_USER, &[id], &[], Some(encode_body(body)?))
    }

    pub fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.dispatch(&endpoints::DELETE_USER, &[id], &[], None)?;
        Ok(())
    }

    pub fn invite_user(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::INVITE_USER, &[], &[], Some(encode_body(body)?))
    }

    // --- agents ---

    /// List agents. Unset filters are omitted from the query string entirely.
    pub fn list_agents(
        &self,
        status: Option<&str>,
        name: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.dispatch(
            &endpoints::LIST_AGENTS,
            &[],
            &[
                status.map(str::to_string),
                name.map(str::to_string),
                limit.map(|v| v.to_string()),
                offset.map(|v| v.to_string()),
            ],
            None,
        )
    }

    pub fn create_agent(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::CREATE_AGENT, &[], &[], Some(encode_body(body)?))
    }

    pub fn get_agent(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::GET_AGENT, &[id], &[], None)
    }

    pub fn update_agent(
        &self,
        id: &str,
        body: Option<&impl Serialize>,
    ) -> Result<Value, ApiError> {
        let body = body.map(encode_body).transpose()?;
        self.dispatch(&endpoints::UPDATE_AGENT, &[id], &[], body)
    }

    pub fn delete_agent(&self, id: &str) -> Result<(), ApiError> {
        self.dispatch(&endpoints::DELETE_AGENT, &[id], &[], None)?;
        Ok(())
    }

    pub fn activate_agent(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::ACTIVATE_AGENT, &[id], &[], None)
    }

    /// Look an agent up by name rather than id.
    pub fn resolve_agent(&self, name: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::RESOLVE_AGENT, &[name], &[], None)
    }

    // --- dags ---

    /// List DAGs. `created_after`/`created_before` are date strings in
    /// whatever format the server accepts; they pass through unparsed.
    pub fn list_dags(
        &self,
        status: Option<&str>,
        created_after: Option<&str>,
        created_before: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.dispatch(
            &endpoints::LIST_DAGS,
            &[],
            &[
                status.map(str::to_string),
                created_after.map(str::to_string),
                created_before.map(str::to_string),
                limit.map(|v| v.to_string()),
                offset.map(|v| v.to_string()),
            ],
            None,
        )
    }

    /// Create a DAG from a goal description.
    pub fn create_dag(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::CREATE_DAG, &[], &[], Some(encode_body(body)?))
    }

    pub fn list_scheduled_dags(&self) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::LIST_SCHEDULED_DAGS, &[], &[], None)
    }

    pub fn get_dag(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::GET_DAG, &[id], &[], None)
    }

    pub fn update_dag(&self, id: &str, body: Option<&impl Serialize>) -> Result<Value, ApiError> {
        let body = body.map(encode_body).transpose()?;
        self.dispatch(&endpoints::UPDATE_DAG, &[id], &[], body)
    }

    pub fn delete_dag(&self, id: &str) -> Result<(), ApiError> {
        self.dispatch(&endpoints::DELETE_DAG, &[id], &[], None)?;
        Ok(())
    }

    /// Execute a stored DAG, optionally passing input for the run.
    pub fn execute_dag(
        &self,
        id: &str,
        input: Option<&impl Serialize>,
    ) -> Result<Value, ApiError> {
        let body = input.map(encode_body).transpose()?;
        self.dispatch(&endpoints::EXECUTE_DAG, &[id], &[], body)
    }

    /// Execute an ad hoc DAG definition without storing it.
    pub fn execute_dag_definition(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.dispatch(
            &endpoints::EXECUTE_DAG_DEFINITION,
            &[],
            &[],
            Some(encode_body(body)?),
        )
    }

    pub fn run_experiments(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::RUN_EXPERIMENTS, &[], &[], Some(encode_body(body)?))
    }

    // --- executions ---

    pub fn list_executions(
        &self,
        status: Option<&str>,
        dag_id: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.dispatch(
            &endpoints::LIST_EXECUTIONS,
            &[],
            &[
                status.map(str::to_string),
                dag_id.map(str::to_string),
                limit.map(|v| v.to_string()),
                offset.map(|v| v.to_string()),
            ],
            None,
        )
    }

    pub fn get_execution(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::GET_EXECUTION, &[id], &[], None)
    }

    pub fn delete_execution(&self, id: &str) -> Result<(), ApiError> {
        self.dispatch(&endpoints::DELETE_EXECUTION, &[id], &[], None)?;
        Ok(())
    }

    /// Execution with its sub-steps inlined.
    pub fn execution_details(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::EXECUTION_DETAILS, &[id], &[], None)
    }

    pub fn execution_sub_steps(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::EXECUTION_SUB_STEPS, &[id], &[], None)
    }

    /// Events recorded for an execution, returned as one decoded JSON
    /// document — this client does not stream.
    pub fn execution_events(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::EXECUTION_EVENTS, &[id], &[], None)
    }

    /// Resume a suspended execution.
    pub fn resume_execution(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::RESUME_EXECUTION, &[id], &[], None)
    }

    // --- tools ---

    pub fn list_tools(&self) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::LIST_TOOLS, &[], &[], None)
    }

    // --- costs ---

    pub fn execution_costs(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::EXECUTION_COSTS, &[id], &[], None)
    }

    pub fn dag_costs(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::DAG_COSTS, &[id], &[], None)
    }

    pub fn cost_summary(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.dispatch(
            &endpoints::COST_SUMMARY,
            &[],
            &[start_date.map(str::to_string), end_date.map(str::to_string)],
            None,
        )
    }

    // --- billing ---

    /// Usage for the current billing period.
    pub fn billing_usage(&self) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::BILLING_USAGE, &[], &[], None)
    }

    pub fn usage_history(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.dispatch(
            &endpoints::USAGE_HISTORY,
            &[],
            &[
                start_date.map(str::to_string),
                end_date.map(str::to_string),
                limit.map(|v| v.to_string()),
                offset.map(|v| v.to_string()),
            ],
            None,
        )
    }

    pub fn list_invoices(
        &self,
        status: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.dispatch(
            &endpoints::LIST_INVOICES,
            &[],
            &[
                status.map(str::to_string),
                limit.map(|v| v.to_string()),
                offset.map(|v| v.to_string()),
            ],
            None,
        )
    }

    pub fn get_invoice(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::GET_INVOICE, &[id], &[], None)
    }

    // --- tenant administration ---

    pub fn list_tenants(
        &self,
        status: Option<&str>,
        plan: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.dispatch(
            &endpoints::LIST_TENANTS,
            &[],
            &[
                status.map(str::to_string),
                plan.map(str::to_string),
                limit.map(|v| v.to_string()),
                offset.map(|v| v.to_string()),
            ],
            None,
        )
    }

    pub fn create_tenant(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::CREATE_TENANT, &[], &[], Some(encode_body(body)?))
    }

    pub fn get_tenant(&self, id: &str) -> Result<Value, ApiError> {
        self.dispatch(&endpoints::GET_TENANT, &[id], &[], None)
    }

    pub fn update_tenant(
        &self,
        id: &str,
        body: Option<&impl Serialize>,
    ) -> Result<Value, ApiError> {
        let body = body.map(encode_body).transpose()?;
        self.dispatch(&endpoints::UPDATE_TENANT, &[id], &[], body)
    }

    /// Delete or suspend a tenant (`action="suspend"` soft-deletes).
    ///
    /// Unlike the other deletes on this surface, the server answers with the
    /// updated tenant, and that body is returned rather than discarded.
    pub fn remove_tenant(&self, id: &str, action: Option<&str>) -> Result<Value, ApiError> {
        self.dispatch(
            &endpoints::REMOVE_TENANT,
            &[id],
            &[action.map(str::to_string)],
            None,
        )
    }

    // --- dispatch ---

    /// The one generic request routine every wrapper funnels through:
    /// build from the descriptor, execute on the session, decode per the
    /// descriptor's response mode.
    fn dispatch(
        &self,
        endpoint: &Endpoint,
        path_args: &[&str],
        query_args: &[Option<String>],
        body: Option<String>,
    ) -> Result<Value, ApiError> {
        let request = endpoint.request(&self.config.base_url, path_args, query_args, body);
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.execute(&request)?;
        tracing::debug!(status = response.status, "received response");
        endpoint.decode(response)
    }

    /// Execute a built request on the session and read the response back as
    /// plain data. Status interpretation happens in `Endpoint::decode`, so
    /// non-2xx responses come back here as data, not transport errors.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match (&request.method, &request.body) {
            (HttpMethod::Get, _) => self.prepare(self.agent.get(&request.url), request).call(),
            (HttpMethod::Delete, _) => {
                self.prepare(self.agent.delete(&request.url), request).call()
            }
            (HttpMethod::Post, Some(body)) => self
                .prepare(self.agent.post(&request.url), request)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self
                .prepare(self.agent.post(&request.url), request)
                .send_empty(),
            (HttpMethod::Patch, Some(body)) => self
                .prepare(self.agent.patch(&request.url), request)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Patch, None) => self
                .prepare(self.agent.patch(&request.url), request)
                .send_empty(),
        };

        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }

    /// Attach the bearer header (when a token is configured) and the query
    /// pairs. Both decorations apply to every method uniformly.
    fn prepare<Body>(
        &self,
        mut builder: ureq::RequestBuilder<Body>,
        request: &HttpRequest,
    ) -> ureq::RequestBuilder<Body> {
        if let Some(token) = &self.config.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        for (name, value) in &request.query {
            builder = builder.query(*name, value);
        }
        builder
    }
}

/// Serialize a request body through the value's own `Serialize` impl; a
/// `serde_json::Value` passes through verbatim.
fn encode_body(body: &impl Serialize) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}
