//! Full lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then walks the client through
//! the whole surface over real HTTP: auth, agents, DAGs, executions, costs,
//! billing, users, API keys, tenants. Validates request building, bearer
//! attachment, and response decoding end-to-end with the actual server.

use std::time::Duration;

use conductor_core::{ApiError, ClientConfig, ConductorClient};
use serde_json::{json, Value};

/// Start the mock server on a random port and return its address.
fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn orchestration_lifecycle() {
    let addr = start_server();
    // Trailing slash on purpose: the config strips it.
    let config = ClientConfig::new(&format!("http://{addr}/")).with_timeout(Duration::from_secs(5));
    let mut client = ConductorClient::new(config);

    // Step 1: liveness, no credentials needed.
    let health = client.health().unwrap();
    assert_eq!(health["status"], "ok");
    let ready = client.health_ready().unwrap();
    assert_eq!(ready["status"], "ready");

    // Step 2: identity without a token is rejected with the raw 401.
    let err = client.current_user().unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));

    // Step 3: set a token; the server echoes exactly what arrived.
    client.set_token("tok-abc");
    let me = client.current_user().unwrap();
    assert_eq!(me["token"], "tok-abc");

    // Step 4: agents — create two, activate one, filter on status.
    let planner = client.create_agent(&json!({"name": "planner"})).unwrap();
    let planner_id = planner["id"].as_str().unwrap();
    client.create_agent(&json!({"name": "executor"})).unwrap();

    let activated = client.activate_agent(planner_id).unwrap();
    assert_eq!(activated["status"], "active");

    let active = client.list_agents(Some("active"), None, Some(10), None).unwrap();
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["name"], "planner");

    let resolved = client.resolve_agent("executor").unwrap();
    assert_eq!(resolved["name"], "executor");

    // Patch with a body, then patch with no body at all.
    let updated = client
        .update_agent(planner_id, Some(&json!({"description": "makes plans"})))
        .unwrap();
    assert_eq!(updated["description"], "makes plans");
    let untouched = client.update_agent(planner_id, None::<&Value>).unwrap();
    assert_eq!(untouched["description"], "makes plans");

    // Step 5: DAGs.
    let dag = client
        .create_dag(&json!({"goal": "summarize", "createdAt": "2024-02-01T00:00:00Z"}))
        .unwrap();
    let dag_id = dag["id"].as_str().unwrap();
    assert_eq!(dag["status"], "draft");

    let recent = client
        .list_dags(None, Some("2024-01-15T00:00:00Z"), None, Some(10), None)
        .unwrap();
    assert_eq!(recent.as_array().unwrap().len(), 1);

    // Step 6: execute and inspect the run.
    let execution = client
        .execute_dag(dag_id, Some(&json!({"topic": "rust"})))
        .unwrap();
    let exec_id = execution["id"].as_str().unwrap();
    assert_eq!(execution["status"], "running");
    assert_eq!(execution["dagId"], dag_id);

    let details = client.execution_details(exec_id).unwrap();
    assert!(details["subSteps"].is_array());
    let sub_steps = client.execution_sub_steps(exec_id).unwrap();
    assert_eq!(sub_steps.as_array().unwrap().len(), 2);
    let events = client.execution_events(exec_id).unwrap();
    assert_eq!(events[0]["type"], "execution.started");
    let resumed = client.resume_execution(exec_id).unwrap();
    assert_eq!(resumed["status"], "running");

    let runs = client.list_executions(None, Some(dag_id), None, None).unwrap();
    assert_eq!(runs.as_array().unwrap().len(), 1);

    // Step 7: costs and billing.
    let costs = client.execution_costs(exec_id).unwrap();
    assert_eq!(costs["currency"], "USD");
    let per_dag = client.dag_costs(dag_id).unwrap();
    assert_eq!(per_dag["executions"], 1);
    let summary = client.cost_summary(Some("2024-01-01"), None).unwrap();
    assert_eq!(summary["startDate"], "2024-01-01");

    let usage = client.billing_usage().unwrap();
    assert!(usage["executions"].is_number());
    let history = client
        .usage_history(Some("2024-01-02"), None, Some(5), None)
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);
    let paid = client.list_invoices(Some("paid"), None, None).unwrap();
    assert_eq!(paid.as_array().unwrap().len(), 1);
    let invoice = client.get_invoice("inv-1").unwrap();
    assert_eq!(invoice["status"], "paid");

    // Step 8: tools.
    let tools = client.list_tools().unwrap();
    assert!(!tools.as_array().unwrap().is_empty());

    // Step 9: API keys — create, then revoke (empty 204 response).
    let key = client.create_api_key(&json!({"name": "ci"})).unwrap();
    client.revoke_api_key(key["id"].as_str().unwrap()).unwrap();

    // Step 10: users.
    let invited = client.invite_user(&json!({"email": "new@example.com"})).unwrap();
    let user_id = invited["id"].as_str().unwrap();
    assert_eq!(invited["status"], "invited");
    let promoted = client.update_user(user_id, &json!({"role": "admin"})).unwrap();
    assert_eq!(promoted["role"], "admin");
    client.delete_user(user_id).unwrap();
    let err = client.get_user(user_id).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));

    // Step 11: clean up the run and the DAG.
    client.delete_execution(exec_id).unwrap();
    client.delete_dag(dag_id).unwrap();
    let err = client.get_dag(dag_id).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));

    // Step 12: tenants — the one delete that answers with a body.
    let tenant = client.create_tenant(&json!({"name": "acme", "plan": "pro"})).unwrap();
    let tenant_id = tenant["id"].as_str().unwrap();

    let suspended = client.remove_tenant(tenant_id, Some("suspend")).unwrap();
    assert_eq!(suspended["status"], "suspended");
    assert_eq!(suspended["id"], tenant_id);

    let listed = client.list_tenants(Some("suspended"), None, None, None).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let removed = client.remove_tenant(tenant_id, None).unwrap();
    assert_eq!(removed["status"], "deleted");
    let err = client.get_tenant(tenant_id).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
}

#[test]
fn refused_connection_is_a_transport_error() {
    // Bind then immediately drop to find a port nothing listens on.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let config = ClientConfig::new(&format!("http://{addr}")).with_timeout(Duration::from_secs(2));
    let client = ConductorClient::new(config);

    let err = client.health().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
