//! In-memory fake of the conductor orchestration/billing service.
//!
//! Covers the full `/api/v2` surface the client binds: agents, DAGs,
//! executions, tools, costs, billing, users, API keys, tenant
//! administration. Resources are stored as raw JSON values so the fake stays
//! as schema-agnostic as the service contract itself. Billing and cost
//! figures are canned; everything else round-trips through real state.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// All server state. Keyed by resource id throughout.
#[derive(Default)]
pub struct Store {
    pub agents: HashMap<String, Value>,
    pub dags: HashMap<String, Value>,
    pub executions: HashMap<String, Value>,
    pub users: HashMap<String, Value>,
    pub api_keys: HashMap<String, Value>,
    pub tenants: HashMap<String, Value>,
    pub invoices: HashMap<String, Value>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        invoices: seeded_invoices(),
        ..Store::default()
    }));
    Router::new()
        .route("/api/v2/health", get(health))
        .route("/api/v2/health/ready", get(health_ready))
        .route("/api/v2/auth/me", get(current_user))
        .route("/api/v2/auth/api-keys", get(list_api_keys).post(create_api_key))
        .route("/api/v2/auth/api-keys/{id}", delete(revoke_api_key))
        .route("/api/v2/users", get(list_users))
        .route("/api/v2/users/invite", post(invite_user))
        .route(
            "/api/v2/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/api/v2/agents", get(list_agents).post(create_agent))
        .route("/api/v2/agents/resolve/{name}", get(resolve_agent))
        .route(
            "/api/v2/agents/{id}",
            get(get_agent).patch(update_agent).delete(delete_agent),
        )
        .route("/api/v2/agents/{id}/activate", post(activate_agent))
        .route("/api/v2/dags", get(list_dags).post(create_dag))
        .route("/api/v2/dags/scheduled", get(list_scheduled_dags))
        .route("/api/v2/dags/execute-definition", post(execute_definition))
        .route("/api/v2/dags/experiments", post(run_experiments))
        .route(
            "/api/v2/dags/{id}",
            get(get_dag).patch(update_dag).delete(delete_dag),
        )
        .route("/api/v2/dags/{id}/execute", post(execute_dag))
        .route("/api/v2/executions", get(list_executions))
        .route(
            "/api/v2/executions/{id}",
            get(get_execution).delete(delete_execution),
        )
        .route("/api/v2/executions/{id}/details", get(execution_details))
        .route("/api/v2/executions/{id}/sub-steps", get(execution_sub_steps))
        .route("/api/v2/executions/{id}/events", get(execution_events))
        .route("/api/v2/executions/{id}/resume", post(resume_execution))
        .route("/api/v2/tools", get(list_tools))
        .route("/api/v2/costs/executions/{id}", get(execution_costs))
        .route("/api/v2/costs/dags/{id}", get(dag_costs))
        .route("/api/v2/costs/summary", get(cost_summary))
        .route("/api/v2/billing/usage", get(billing_usage))
        .route("/api/v2/billing/usage/history", get(usage_history))
        .route("/api/v2/billing/invoices", get(list_invoices))
        .route("/api/v2/billing/invoices/{id}", get(get_invoice))
        .route("/api/v2/admin/tenants", get(list_tenants).post(create_tenant))
        .route(
            "/api/v2/admin/tenants/{id}",
            get(get_tenant).patch(update_tenant).delete(remove_tenant),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn seeded_invoices() -> HashMap<String, Value> {
    let mut invoices = HashMap::new();
    invoices.insert(
        "inv-1".to_string(),
        json!({"id": "inv-1", "status": "paid", "amount": 120.0, "period": "2023-12"}),
    );
    invoices.insert(
        "inv-2".to_string(),
        json!({"id": "inv-2", "status": "open", "amount": 80.5, "period": "2024-01"}),
    );
    invoices
}

// --- helpers ---

/// Parse a request body that may legitimately be absent. Empty bodies become
/// an empty object; malformed JSON is a 400.
fn parse_optional(body: &Bytes) -> Result<Value, StatusCode> {
    if body.is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|_| StatusCode::BAD_REQUEST)
}

/// Shallow-merge `patch`'s fields over `target`'s.
fn merge(target: &mut Value, patch: &Value) {
    if let (Some(obj), Some(patch_obj)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_obj {
            obj.insert(key.clone(), value.clone());
        }
    }
}

/// Build a resource: defaults, then the caller's fields, then the generated
/// id (which the caller may not override).
fn new_resource(defaults: Value, body: &Value, id: &str) -> Value {
    let mut resource = defaults;
    merge(&mut resource, body);
    if let Some(obj) = resource.as_object_mut() {
        obj.insert("id".to_string(), json!(id));
    }
    resource
}

/// Values of a store map as a deterministically ordered list (maps iterate
/// in arbitrary order; limit/offset need stability).
fn sorted_values(map: &HashMap<String, Value>) -> Vec<Value> {
    let mut items: Vec<Value> = map.values().cloned().collect();
    items.sort_by(|a, b| a["id"].as_str().cmp(&b["id"].as_str()));
    items
}

/// Keep items whose `field` equals the `param` filter, when supplied.
fn filter_eq(items: &mut Vec<Value>, params: &HashMap<String, String>, param: &str, field: &str) {
    if let Some(want) = params.get(param) {
        items.retain(|item| item[field].as_str() == Some(want.as_str()));
    }
}

fn paginate(items: Vec<Value>, params: &HashMap<String, String>) -> Vec<Value> {
    let offset = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0usize);
    let limit = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).collect()
}

// --- health ---

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "version": "2.4.1"}))
}

async fn health_ready() -> Json<Value> {
    Json(json!({"status": "ready"}))
}

// --- auth ---

/// Requires a bearer token and echoes it back, so client tests can observe
/// exactly which credential arrived.
async fn current_user(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(json!({
        "id": "usr-1",
        "email": "admin@example.com",
        "role": "admin",
        "token": token,
    })))
}

async fn list_api_keys(State(db): State<Db>) -> Json<Vec<Value>> {
    Json(sorted_values(&db.read().await.api_keys))
}

async fn create_api_key(
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4().to_string();
    let key = new_resource(
        json!({"key": format!("ck_{}", Uuid::new_v4().simple()), "status": "active"}),
        &body,
        &id,
    );
    db.write().await.api_keys.insert(id, key.clone());
    (StatusCode::CREATED, Json(key))
}

async fn revoke_api_key(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    db.write()
        .await
        .api_keys
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

// --- users ---

async fn list_users(State(db): State<Db>) -> Json<Vec<Value>> {
    Json(sorted_values(&db.read().await.users))
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    db.read().await.users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    merge(user, &body);
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    db.write()
        .await
        .users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn invite_user(State(db): State<Db>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4().to_string();
    let user = new_resource(json!({"role": "member", "status": "invited"}), &body, &id);
    db.write().await.users.insert(id, user.clone());
    (StatusCode::CREATED, Json(user))
}

// --- agents ---

async fn list_agents(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let mut agents = sorted_values(&db.read().await.agents);
    filter_eq(&mut agents, &params, "status", "status");
    filter_eq(&mut agents, &params, "name", "name");
    Json(paginate(agents, &params))
}

async fn create_agent(State(db): State<Db>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4().to_string();
    let agent = new_resource(json!({"status": "inactive"}), &body, &id);
    db.write().await.agents.insert(id, agent.clone());
    (StatusCode::CREATED, Json(agent))
}

async fn get_agent(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    db.read().await.agents.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_agent(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let patch = parse_optional(&body)?;
    let mut store = db.write().await;
    let agent = store.agents.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    merge(agent, &patch);
    Ok(Json(agent.clone()))
}

async fn delete_agent(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    db.write()
        .await
        .agents
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn activate_agent(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let agent = store.agents.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    merge(agent, &json!({"status": "active"}));
    Ok(Json(agent.clone()))
}

async fn resolve_agent(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    db.read()
        .await
        .agents
        .values()
        .find(|agent| agent["name"].as_str() == Some(name.as_str()))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

// --- dags ---

async fn list_dags(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let mut dags = sorted_values(&db.read().await.dags);
    filter_eq(&mut dags, &params, "status", "status");
    // Date filters compare ISO-8601 strings lexicographically.
    if let Some(after) = params.get("createdAfter") {
        dags.retain(|dag| dag["createdAt"].as_str().is_some_and(|at| at > after.as_str()));
    }
    if let Some(before) = params.get("createdBefore") {
        dags.retain(|dag| dag["createdAt"].as_str().is_some_and(|at| at < before.as_str()));
    }
    Json(paginate(dags, &params))
}

async fn create_dag(State(db): State<Db>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4().to_string();
    let dag = new_resource(
        json!({"status": "draft", "createdAt": "2024-01-01T00:00:00Z"}),
        &body,
        &id,
    );
    db.write().await.dags.insert(id, dag.clone());
    (StatusCode::CREATED, Json(dag))
}

async fn list_scheduled_dags(State(db): State<Db>) -> Json<Vec<Value>> {
    let mut dags = sorted_values(&db.read().await.dags);
    dags.retain(|dag| dag.get("schedule").is_some_and(|s| !s.is_null()));
    Json(dags)
}

async fn get_dag(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    db.read().await.dags.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_dag(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let patch = parse_optional(&body)?;
    let mut store = db.write().await;
    let dag = store.dags.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    merge(dag, &patch);
    Ok(Json(dag.clone()))
}

async fn delete_dag(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    db.write()
        .await
        .dags
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Create an execution for a stored DAG. The execution carries sub-steps and
/// an event list so the execution read endpoints have something real to
/// serve.
fn build_execution(dag_id: Option<&str>, input: Value) -> (String, Value) {
    let id = Uuid::new_v4().to_string();
    let execution = json!({
        "id": id.clone(),
        "dagId": dag_id,
        "status": "running",
        "input": input,
        "subSteps": [
            {"id": format!("{id}-s1"), "name": "plan", "status": "completed"},
            {"id": format!("{id}-s2"), "name": "act", "status": "running"},
        ],
        "events": [
            {"sequence": 1, "type": "execution.started"},
            {"sequence": 2, "type": "step.completed", "step": "plan"},
        ],
    });
    (id, execution)
}

async fn execute_dag(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let input = parse_optional(&body)?;
    let mut store = db.write().await;
    if !store.dags.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let (exec_id, execution) = build_execution(Some(id.as_str()), input);
    store.executions.insert(exec_id, execution.clone());
    Ok((StatusCode::CREATED, Json(execution)))
}

async fn execute_definition(
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let (exec_id, execution) = build_execution(None, body);
    db.write().await.executions.insert(exec_id, execution.clone());
    (StatusCode::CREATED, Json(execution))
}

async fn run_experiments(
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let variants = body["variants"].as_array().map_or(1, Vec::len).max(1);
    let mut store = db.write().await;
    let mut execution_ids = Vec::with_capacity(variants);
    for _ in 0..variants {
        let (exec_id, execution) = build_execution(body["dagId"].as_str(), body.clone());
        execution_ids.push(json!(exec_id.clone()));
        store.executions.insert(exec_id, execution);
    }
    let result = json!({
        "experimentId": Uuid::new_v4().to_string(),
        "executionIds": execution_ids,
    });
    (StatusCode::CREATED, Json(result))
}

// --- executions ---

async fn list_executions(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let mut executions = sorted_values(&db.read().await.executions);
    filter_eq(&mut executions, &params, "status", "status");
    filter_eq(&mut executions, &params, "dagId", "dagId");
    for execution in &mut executions {
        strip_details(execution);
    }
    Json(paginate(executions, &params))
}

/// The plain execution resource omits sub-steps and events; `/details`
/// serves the full record.
fn strip_details(execution: &mut Value) {
    if let Some(obj) = execution.as_object_mut() {
        obj.remove("subSteps");
        obj.remove("events");
    }
}

async fn get_execution(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut execution = db
        .read()
        .await
        .executions
        .get(&id)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;
    strip_details(&mut execution);
    Ok(Json(execution))
}

async fn delete_execution(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    db.write()
        .await
        .executions
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn execution_details(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    db.read()
        .await
        .executions
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn execution_sub_steps(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    db.read()
        .await
        .executions
        .get(&id)
        .map(|execution| Json(execution["subSteps"].clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn execution_events(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    db.read()
        .await
        .executions
        .get(&id)
        .map(|execution| Json(execution["events"].clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn resume_execution(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let execution = store.executions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    merge(execution, &json!({"status": "running"}));
    Ok(Json(execution.clone()))
}

// --- tools ---

async fn list_tools() -> Json<Value> {
    Json(json!([
        {"name": "web-search", "description": "Query the web", "version": "1.2.0"},
        {"name": "code-interpreter", "description": "Run sandboxed code", "version": "0.9.3"},
        {"name": "sql", "description": "Query the warehouse", "version": "2.0.1"},
    ]))
}

// --- costs ---

const COST_PER_EXECUTION: f64 = 0.0125;

async fn execution_costs(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    if !store.executions.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "executionId": id,
        "totalCost": COST_PER_EXECUTION,
        "currency": "USD",
        "breakdown": [
            {"item": "llm.tokens", "cost": 0.01},
            {"item": "tool.calls", "cost": 0.0025},
        ],
    })))
}

async fn dag_costs(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    if !store.dags.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let runs = store
        .executions
        .values()
        .filter(|execution| execution["dagId"].as_str() == Some(id.as_str()))
        .count();
    Ok(Json(json!({
        "dagId": id,
        "executions": runs,
        "totalCost": COST_PER_EXECUTION * runs as f64,
        "currency": "USD",
    })))
}

async fn cost_summary(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let store = db.read().await;
    Json(json!({
        "startDate": params.get("startDate"),
        "endDate": params.get("endDate"),
        "executions": store.executions.len(),
        "totalCost": COST_PER_EXECUTION * store.executions.len() as f64,
        "currency": "USD",
    }))
}

// --- billing ---

async fn billing_usage(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({
        "period": "2024-01",
        "executions": store.executions.len(),
        "tokens": 48213,
        "cost": COST_PER_EXECUTION * store.executions.len() as f64,
    }))
}

async fn usage_history(Query(params): Query<HashMap<String, String>>) -> Json<Vec<Value>> {
    let mut entries = vec![
        json!({"date": "2024-01-01", "executions": 4, "tokens": 9120, "cost": 0.05}),
        json!({"date": "2024-01-02", "executions": 7, "tokens": 15830, "cost": 0.0875}),
        json!({"date": "2024-01-03", "executions": 2, "tokens": 4410, "cost": 0.025}),
    ];
    if let Some(start) = params.get("startDate") {
        entries.retain(|e| e["date"].as_str().is_some_and(|d| d >= start.as_str()));
    }
    if let Some(end) = params.get("endDate") {
        entries.retain(|e| e["date"].as_str().is_some_and(|d| d <= end.as_str()));
    }
    Json(paginate(entries, &params))
}

async fn list_invoices(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let mut invoices = sorted_values(&db.read().await.invoices);
    filter_eq(&mut invoices, &params, "status", "status");
    Json(paginate(invoices, &params))
}

async fn get_invoice(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    db.read().await.invoices.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

// --- tenant administration ---

async fn list_tenants(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let mut tenants = sorted_values(&db.read().await.tenants);
    filter_eq(&mut tenants, &params, "status", "status");
    filter_eq(&mut tenants, &params, "plan", "plan");
    Json(paginate(tenants, &params))
}

async fn create_tenant(State(db): State<Db>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4().to_string();
    let tenant = new_resource(json!({"status": "active", "plan": "free"}), &body, &id);
    db.write().await.tenants.insert(id, tenant.clone());
    (StatusCode::CREATED, Json(tenant))
}

async fn get_tenant(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    db.read().await.tenants.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_tenant(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let patch = parse_optional(&body)?;
    let mut store = db.write().await;
    let tenant = store.tenants.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    merge(tenant, &patch);
    Ok(Json(tenant.clone()))
}

/// Tenant removal is the one DELETE that answers with a body:
/// `?action=suspend` soft-deletes and reports the suspended tenant; anything
/// else removes the tenant and reports its final state.
async fn remove_tenant(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    if params.get("action").map(String::as_str) == Some("suspend") {
        let tenant = store.tenants.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
        merge(tenant, &json!({"status": "suspended"}));
        Ok(Json(tenant.clone()))
    } else {
        let mut tenant = store.tenants.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
        merge(&mut tenant, &json!({"status": "deleted"}));
        Ok(Json(tenant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overwrites_and_adds_fields() {
        let mut target = json!({"a": 1, "b": 2});
        merge(&mut target, &json!({"b": 3, "c": 4}));
        assert_eq!(target, json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn merge_ignores_non_object_patch() {
        let mut target = json!({"a": 1});
        merge(&mut target, &json!("not an object"));
        assert_eq!(target, json!({"a": 1}));
    }

    #[test]
    fn new_resource_caller_cannot_override_id() {
        let resource = new_resource(json!({"status": "active"}), &json!({"id": "forged"}), "real");
        assert_eq!(resource["id"], "real");
        assert_eq!(resource["status"], "active");
    }

    #[test]
    fn parse_optional_empty_body_is_empty_object() {
        assert_eq!(parse_optional(&Bytes::new()).unwrap(), json!({}));
    }

    #[test]
    fn parse_optional_rejects_malformed_json() {
        let err = parse_optional(&Bytes::from_static(b"nope")).unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn paginate_applies_offset_then_limit() {
        let items = vec![json!(1), json!(2), json!(3), json!(4)];
        let mut params = HashMap::new();
        params.insert("offset".to_string(), "1".to_string());
        params.insert("limit".to_string(), "2".to_string());
        assert_eq!(paginate(items, &params), vec![json!(2), json!(3)]);
    }

    #[test]
    fn filter_eq_without_param_keeps_everything() {
        let mut items = vec![json!({"status": "a"}), json!({"status": "b"})];
        filter_eq(&mut items, &HashMap::new(), "status", "status");
        assert_eq!(items.len(), 2);
    }
}
