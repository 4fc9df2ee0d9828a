//! The endpoint table: one descriptor per remote operation.
//!
//! # Design
//! This table is the entire wire contract. Per-endpoint behavior lives in
//! descriptor data — method, path template, declared query parameters,
//! response mode — and the dispatch path in [`crate::client`] branches on
//! that data, never on the endpoint's identity. Anything surprising about a
//! single endpoint (the tenant delete that answers with a body) is therefore
//! visible right here instead of buried in a method somewhere.

use crate::http::HttpMethod::{Delete, Get, Patch, Post};
use crate::http::ResponseMode::{Empty, Json};
use crate::http::{Endpoint, HttpMethod, ResponseMode};

const fn get(path: &'static str) -> Endpoint {
    plain(Get, path, Json)
}

/// GET with declared query filters.
const fn get_filtered(path: &'static str, query: &'static [&'static str]) -> Endpoint {
    Endpoint {
        method: Get,
        path,
        query,
        has_body: false,
        response: Json,
    }
}

/// POST carrying a JSON body.
const fn post(path: &'static str) -> Endpoint {
    Endpoint {
        method: Post,
        path,
        query: &[],
        has_body: true,
        response: Json,
    }
}

/// Body-less POST (activate / resume style actions).
const fn post_action(path: &'static str) -> Endpoint {
    plain(Post, path, Json)
}

/// PATCH carrying an optional JSON body.
const fn patch(path: &'static str) -> Endpoint {
    Endpoint {
        method: Patch,
        path,
        query: &[],
        has_body: true,
        response: Json,
    }
}

/// DELETE with an empty success response.
const fn delete(path: &'static str) -> Endpoint {
    plain(Delete, path, Empty)
}

const fn plain(method: HttpMethod, path: &'static str, response: ResponseMode) -> Endpoint {
    Endpoint {
        method,
        path,
        query: &[],
        has_body: false,
        response,
    }
}

// Health
pub const HEALTH: Endpoint = get("/api/v2/health");
pub const HEALTH_READY: Endpoint = get("/api/v2/health/ready");

// Auth
pub const CURRENT_USER: Endpoint = get("/api/v2/auth/me");
pub const LIST_API_KEYS: Endpoint = get("/api/v2/auth/api-keys");
pub const CREATE_API_KEY: Endpoint = post("/api/v2/auth/api-keys");
pub const REVOKE_API_KEY: Endpoint = delete("/api/v2/auth/api-keys/{id}");

// Users
pub const LIST_USERS: Endpoint = get("/api/v2/users");
pub const GET_USER: Endpoint = get("/api/v2/users/{id}");
pub const UPDATE_USER: Endpoint = patch("/api/v2/users/{id}");
pub const DELETE_USER: Endpoint = delete("/api/v2/users/{id}");
pub const INVITE_USER: Endpoint = post("/api/v2/users/invite");

// Agents
pub const LIST_AGENTS: Endpoint =
    get_filtered("/api/v2/agents", &["status", "name", "limit", "offset"]);
pub const CREATE_AGENT: Endpoint = post("/api/v2/agents");
pub const GET_AGENT: Endpoint = get("/api/v2/agents/{id}");
pub const UPDATE_AGENT: Endpoint = patch("/api/v2/agents/{id}");
pub const DELETE_AGENT: Endpoint = delete("/api/v2/agents/{id}");
pub const ACTIVATE_AGENT: Endpoint = post_action("/api/v2/agents/{id}/activate");
pub const RESOLVE_AGENT: Endpoint = get("/api/v2/agents/resolve/{name}");

// DAGs
pub const LIST_DAGS: Endpoint = get_filtered(
    "/api/v2/dags",
    &["status", "createdAfter", "createdBefore", "limit", "offset"],
);
pub const CREATE_DAG: Endpoint = post("/api/v2/dags");
pub const LIST_SCHEDULED_DAGS: Endpoint = get("/api/v2/dags/scheduled");
pub const GET_DAG: Endpoint = get("/api/v2/dags/{id}");
pub const UPDATE_DAG: Endpoint = patch("/api/v2/dags/{id}");
pub const DELETE_DAG: Endpoint = delete("/api/v2/dags/{id}");
pub const EXECUTE_DAG: Endpoint = post("/api/v2/dags/{id}/execute");
pub const EXECUTE_DAG_DEFINITION: Endpoint = post("/api/v2/dags/execute-definition");
pub const RUN_EXPERIMENTS: Endpoint = post("/api/v2/dags/experiments");

// Executions
pub const LIST_EXECUTIONS: Endpoint =
    get_filtered("/api/v2/executions", &["status", "dagId", "limit", "offset"]);
pub const GET_EXECUTION: Endpoint = get("/api/v2/executions/{id}");
pub const DELETE_EXECUTION: Endpoint = delete("/api/v2/executions/{id}");
pub const EXECUTION_DETAILS: Endpoint = get("/api/v2/executions/{id}/details");
pub const EXECUTION_SUB_STEPS: Endpoint = get("/api/v2/executions/{id}/sub-steps");
pub const EXECUTION_EVENTS: Endpoint = get("/api/v2/executions/{id}/events");
pub const RESUME_EXECUTION: Endpoint = post_action("/api/v2/executions/{id}/resume");

// Tools
pub const LIST_TOOLS: Endpoint = get("/api/v2/tools");

// Costs
pub const EXECUTION_COSTS: Endpoint = get("/api/v2/costs/executions/{id}");
pub const DAG_COSTS: Endpoint = get("/api/v2/costs/dags/{id}");
pub const COST_SUMMARY: Endpoint = get_filtered("/api/v2/costs/summary", &["startDate", "endDate"]);

// Billing
pub const BILLING_USAGE: Endpoint = get("/api/v2/billing/usage");
pub const USAGE_HISTORY: Endpoint = get_filtered(
    "/api/v2/billing/usage/history",
    &["startDate", "endDate", "limit", "offset"],
);
pub const LIST_INVOICES: Endpoint =
    get_filtered("/api/v2/billing/invoices", &["status", "limit", "offset"]);
pub const GET_INVOICE: Endpoint = get("/api/v2/billing/invoices/{id}");

// Tenant administration
pub const LIST_TENANTS: Endpoint =
    get_filtered("/api/v2/admin/tenants", &["status", "plan", "limit", "offset"]);
pub const CREATE_TENANT: Endpoint = post("/api/v2/admin/tenants");
pub const GET_TENANT: Endpoint = get("/api/v2/admin/tenants/{id}");
pub const UPDATE_TENANT: Endpoint = patch("/api/v2/admin/tenants/{id}");

/// Tenant removal deviates from every other DELETE on this surface: the
/// server treats `?action=suspend` as a soft delete and reports the updated
/// tenant, so the response is decoded JSON rather than discarded.
pub const REMOVE_TENANT: Endpoint = Endpoint {
    method: Delete,
    path: "/api/v2/admin/tenants/{id}",
    query: &["action"],
    has_body: false,
    response: Json,
};

/// Every operation on the surface, keyed by name. Drives the vector tests
/// and table-integrity checks.
pub static ALL: &[(&str, &Endpoint)] = &[
    ("health", &HEALTH),
    ("health_ready", &HEALTH_READY),
    ("current_user", &CURRENT_USER),
    ("list_api_keys", &LIST_API_KEYS),
    ("create_api_key", &CREATE_API_KEY),
    ("revoke_api_key", &REVOKE_API_KEY),
    ("list_users", &LIST_USERS),
    ("get_user", &GET_USER),
    ("update_user", &UPDATE_USER),
    ("delete_user", &DELETE_USER),
    ("invite_user", &INVITE_USER),
    ("list_agents", &LIST_AGENTS),
    ("create_agent", &CREATE_AGENT),
    ("get_agent", &GET_AGENT),
    ("update_agent", &UPDATE_AGENT),
    ("delete_agent", &DELETE_AGENT),
    ("activate_agent", &ACTIVATE_AGENT),
    ("resolve_agent", &RESOLVE_AGENT),
    ("list_dags", &LIST_DAGS),
    ("create_dag", &CREATE_DAG),
    ("list_scheduled_dags", &LIST_SCHEDULED_DAGS),
    ("get_dag", &GET_DAG),
    ("update_dag", &UPDATE_DAG),
    ("delete_dag", &DELETE_DAG),
    ("execute_dag", &EXECUTE_DAG),
    ("execute_dag_definition", &EXECUTE_DAG_DEFINITION),
    ("run_experiments", &RUN_EXPERIMENTS),
    ("list_executions", &LIST_EXECUTIONS),
    ("get_execution", &GET_EXECUTION),
    ("delete_execution", &DELETE_EXECUTION),
    ("execution_details", &EXECUTION_DETAILS),
    ("execution_sub_steps", &EXECUTION_SUB_STEPS),
    ("execution_events", &EXECUTION_EVENTS),
    ("resume_execution", &RESUME_EXECUTION),
    ("list_tools", &LIST_TOOLS),
    ("execution_costs", &EXECUTION_COSTS),
    ("dag_costs", &DAG_COSTS),
    ("cost_summary", &COST_SUMMARY),
    ("billing_usage", &BILLING_USAGE),
    ("usage_history", &USAGE_HISTORY),
    ("list_invoices", &LIST_INVOICES),
    ("get_invoice", &GET_INVOICE),
    ("list_tenants", &LIST_TENANTS),
    ("create_tenant", &CREATE_TENANT),
    ("get_tenant", &GET_TENANT),
    ("update_tenant", &UPDATE_TENANT),
    ("remove_tenant", &REMOVE_TENANT),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_path_is_rooted_at_api_v2() {
        for (name, ep) in ALL {
            assert!(
                ep.path.starts_with("/api/v2/"),
                "{name}: unexpected path {}",
                ep.path
            );
        }
    }

    #[test]
    fn no_duplicate_method_path_pairs() {
        let mut seen = HashSet::new();
        for (name, ep) in ALL {
            assert!(
                seen.insert((ep.method.as_str(), ep.path)),
                "{name}: duplicate {} {}",
                ep.method.as_str(),
                ep.path
            );
        }
    }

    #[test]
    fn placeholders_are_balanced_and_unique_per_template() {
        for (name, ep) in ALL {
            assert_eq!(
                ep.path.matches('{').count(),
                ep.path.matches('}').count(),
                "{name}: unbalanced markers"
            );
            let markers: Vec<&str> = ep
                .path
                .split('{')
                .skip(1)
                .filter_map(|part| part.split('}').next())
                .collect();
            let unique: HashSet<&&str> = markers.iter().collect();
            assert_eq!(markers.len(), unique.len(), "{name}: repeated placeholder");
        }
    }

    #[test]
    fn only_tenant_removal_answers_a_delete_with_a_body() {
        for (name, ep) in ALL {
            if ep.method == HttpMethod::Delete {
                let expected = if *name == "remove_tenant" {
                    ResponseMode::Json
                } else {
                    ResponseMode::Empty
                };
                assert_eq!(ep.response, expected, "{name}");
            } else {
                assert_eq!(ep.response, ResponseMode::Json, "{name}");
            }
        }
    }

    #[test]
    fn tenant_suspension_request_matches_the_wire_contract() {
        let req = REMOVE_TENANT.request(
            "https://api.example.com",
            &["t1"],
            &[Some("suspend".to_string())],
            None,
        );
        assert_eq!(req.method.as_str(), "DELETE");
        assert_eq!(req.url, "https://api.example.com/api/v2/admin/tenants/t1");
        assert_eq!(req.query, vec![("action", "suspend".to_string())]);

        // A 200 with the updated tenant comes back verbatim, not discarded.
        let value = REMOVE_TENANT
            .decode(crate::http::HttpResponse {
                status: 200,
                body: r#"{"id":"t1","status":"suspended"}"#.to_string(),
            })
            .unwrap();
        assert_eq!(value["id"], "t1");
        assert_eq!(value["status"], "suspended");
    }

    #[test]
    fn agent_listing_sends_exactly_the_supplied_filters() {
        let req = LIST_AGENTS.request(
            "https://api.example.com",
            &[],
            &[Some("active".to_string()), None, Some("10".to_string()), None],
            None,
        );
        assert_eq!(req.url, "https://api.example.com/api/v2/agents");
        assert_eq!(
            req.query,
            vec![("status", "active".to_string()), ("limit", "10".to_string())]
        );
    }
}
